use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: "user".to_string(),
            parts,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn inline_data(mime_type: impl Into<String>, data_base64: impl Into<String>) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data_base64.into(),
            },
        }
    }
}

/// Base64 payload embedded directly in the request (voice clips).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: CandidateContent,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text("hello")])],
            system_instruction: None,
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: None,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("generationConfig").is_some());
        assert!(json.get("systemInstruction").is_none());
        assert_eq!(
            json["contents"][0]["parts"][0]["text"],
            serde_json::json!("hello")
        );
    }

    #[test]
    fn test_inline_data_part_serializes_mime_type() {
        let part = Part::inline_data("audio/ogg", "AAAA");
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["inlineData"]["mimeType"], serde_json::json!("audio/ogg"));
        assert_eq!(json["inlineData"]["data"], serde_json::json!("AAAA"));
    }

    #[test]
    fn test_response_text_part_deserializes() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"{\"intent\":\"get_today_sales\"}"}]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        let candidates = response.candidates.unwrap();
        match &candidates[0].content.parts[0] {
            Part::Text { text } => assert!(text.contains("get_today_sales")),
            other => panic!("unexpected part: {:?}", other),
        }
    }
}
