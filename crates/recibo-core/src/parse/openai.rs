//! OpenAI-backed field parser.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use super::json::extract_json_object;
use super::prompts::{PARSE_SYSTEM_PROMPT, build_parse_prompt};
use super::FieldParser;
use crate::error::ReciboError;
use crate::models::config::ParserConfig;
use crate::models::record::ReceiptFields;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Truncate very long OCR output before sending it to the API.
const MAX_PROMPT_TEXT: usize = 16_000;

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Field parser backed by the OpenAI chat completions API.
pub struct OpenAiParser {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiParser {
    /// Build a parser from the configured model and an API key.
    pub fn new(config: &ParserConfig, api_key: String) -> Result<Self, ReciboError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ReciboError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
        })
    }

    async fn request_fields(&self, text: &str) -> Result<ReceiptFields, String> {
        let text = if text.len() > MAX_PROMPT_TEXT {
            let mut end = MAX_PROMPT_TEXT;
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            &text[..end]
        } else {
            text
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": PARSE_SYSTEM_PROMPT},
                    {"role": "user", "content": build_parse_prompt(text)}
                ],
                "temperature": 0
            }))
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(format!("API error: {}", api_error.error.message));
            }
            return Err(format!("API error ({}): {}", status, error_text));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))?;

        let content = api_response
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| "Response contained no message content".to_string())?;

        let json = extract_json_object(content)?;
        let fields: ReceiptFields = serde_json::from_str(&json)
            .map_err(|e| format!("Response was not valid JSON: {}", e))?;

        Ok(fields.normalized())
    }
}

#[async_trait]
impl FieldParser for OpenAiParser {
    async fn parse_fields(&self, text: &str) -> ReceiptFields {
        match self.request_fields(text).await {
            Ok(fields) => fields,
            Err(e) => {
                warn!("Field parsing failed, falling back to UNKNOWN: {}", e);
                ReceiptFields::unknown()
            }
        }
    }
}
