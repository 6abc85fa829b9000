use reqwest::Client;
use std::time::Duration;

use crate::error::{AssistantError, Result};
use crate::llm::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// Per-request HTTP timeout. The extractor applies its own overall deadline
// on top; the fallback call is never retried automatically.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, GEMINI_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key,
            base_url,
        }
    }

    /// Single structured-output generation call. Returns the first text part
    /// of the first candidate.
    pub(crate) async fn generate_content(
        &self,
        model: &str,
        system_prompt: &str,
        messages: Vec<Content>,
        response_schema: Option<serde_json::Value>,
    ) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let payload = GenerateContentRequest {
            contents: messages,
            system_instruction: Some(Content::user(vec![Part::text(system_prompt)])),
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema,
            },
        };

        let res = self.client.post(&url).json(&payload).send().await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(AssistantError::ExtractionFailed(format!(
                "Gemini API error (status {}): {}",
                status, err_text
            )));
        }

        let body: GenerateContentResponse = res.json().await?;
        let part = body
            .candidates
            .and_then(|candidates| candidates.into_iter().next())
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .ok_or_else(|| {
                AssistantError::ExtractionFailed("empty response from model".to_string())
            })?;

        match part {
            Part::Text { text } => Ok(text),
            _ => Err(AssistantError::ExtractionFailed(
                "model returned non-text content".to_string(),
            )),
        }
    }
}
