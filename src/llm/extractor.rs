use async_trait::async_trait;
use log::warn;
use serde_json::json;
use std::time::Duration;
use tokio::time::timeout;

use crate::error::Result;
use crate::intent::{RawIntent, VALID_INTENTS};
use crate::llm::client::GeminiClient;
use crate::llm::prompts;
use crate::llm::types::{Content, Part};
use crate::resolver::IntentExtractor;
use crate::utils;
use crate::AudioClip;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";

// Overall deadline for one extraction, request to parse. On expiry the
// message is treated as unrecognized; there is no retry.
const EXTRACTION_DEADLINE: Duration = Duration::from_secs(45);

pub struct GeminiExtractor {
    client: GeminiClient,
    model: String,
    system_prompt: String,
}

impl GeminiExtractor {
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
            system_prompt: prompts::EXTRACTION_SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Swap the extraction prompt (e.g. for a different language mix).
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    async fn extract_inner(&self, text: &str, audio: Option<&AudioClip>) -> Result<RawIntent> {
        let mut parts = vec![Part::text(prompts::user_prompt(utils::today(), text))];
        if let Some(clip) = audio {
            parts.push(Part::inline_data(
                clip.mime_type.clone(),
                clip.data_base64.clone(),
            ));
        }

        let raw = self
            .client
            .generate_content(
                &self.model,
                &self.system_prompt,
                vec![Content::user(parts)],
                Some(intent_schema()),
            )
            .await?;

        let cleaned = clean_json_output(&raw);
        let parsed: RawIntent = serde_json::from_str(&cleaned)?;
        Ok(parsed)
    }
}

#[async_trait]
impl IntentExtractor for GeminiExtractor {
    async fn extract(&self, text: &str, audio: Option<&AudioClip>) -> RawIntent {
        let mut raw = match timeout(EXTRACTION_DEADLINE, self.extract_inner(text, audio)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(error)) => {
                warn!("extraction failed, treating message as unrecognized: {error}");
                return RawIntent::unrecognized();
            }
            Err(_) => {
                warn!("extraction timed out after {:?}", EXTRACTION_DEADLINE);
                return RawIntent::unrecognized();
            }
        };

        match raw.intent.as_deref() {
            Some(name) if VALID_INTENTS.contains(&name) => {}
            other => {
                warn!("extractor returned unknown intent {:?}", other);
                return RawIntent::unrecognized();
            }
        }

        raw.mirror_total_amount();
        raw
    }
}

/// Gemini structured-output schema constraining `intent` to the closed set.
fn intent_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "intent": { "type": "STRING", "enum": VALID_INTENTS },
            "item": { "type": "STRING" },
            "qty": { "type": "INTEGER" },
            "price": { "type": "NUMBER" },
            "total": { "type": "NUMBER" },
            "amount": { "type": "NUMBER" },
            "person": { "type": "STRING" },
            "date": { "type": "STRING" }
        },
        "required": ["intent"]
    })
}

/// The model sometimes wraps its JSON in markdown fences or leading prose;
/// keep the outermost object and drop the rest.
fn clean_json_output(raw: &str) -> String {
    let stripped = raw.replace("```json", "").replace("```", "");
    if let (Some(start), Some(end)) = (stripped.find('{'), stripped.rfind('}')) {
        if start < end {
            return stripped[start..=end].to_string();
        }
    }
    stripped.trim().to_string()
}
