//! Gemini Adapter
//!
//! Google Generative Language API (`models/{model}:generateContent`).
//! The system prompt is sent inside the final user turn together with the
//! question; earlier turns are replayed as `user` / `model` contents.

use crate::chat::{ChatMessage, ChatRole};
use crate::llm::transport::{HttpTransport, Transport};
use crate::llm::{CompletionClient, CompletionError};
use crate::prompt::compose_user_turn;
use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Gemini adapter
#[derive(Debug)]
pub struct GeminiAdapter {
    /// Base URL (e.g., https://generativelanguage.googleapis.com/v1beta)
    base_url: String,
    /// Model name (e.g., gemini-2.5-flash)
    model: String,
    /// API key
    api_key: String,
    /// HTTP transport
    transport: Transport,
}

impl GeminiAdapter {
    /// Create new Gemini adapter
    pub fn new(base_url: String, model: String, api_key: String) -> Self {
        Self::with_transport(base_url, model, api_key, Transport::default())
    }

    /// Create adapter with custom transport (for testing)
    pub fn with_transport(
        base_url: String,
        model: String,
        api_key: String,
        transport: Transport,
    ) -> Self {
        Self {
            base_url,
            model,
            api_key,
            transport,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Build the generateContent request body
    pub fn build_request(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        question: &str,
    ) -> JsonValue {
        let mut contents: Vec<JsonValue> = history
            .iter()
            .map(|msg| {
                let role = match msg.role {
                    ChatRole::User => "user",
                    ChatRole::Assistant => "model",
                };
                json!({ "role": role, "parts": [{ "text": msg.content }] })
            })
            .collect();

        contents.push(json!({
            "role": "user",
            "parts": [{ "text": compose_user_turn(system_prompt, question) }]
        }));

        json!({ "contents": contents })
    }

    /// Extract generated text from a generateContent response
    pub fn extract_content(response: &str) -> Result<String, CompletionError> {
        let json: JsonValue = serde_json::from_str(response)?;

        if let Some(message) = json["error"]["message"].as_str() {
            return Err(CompletionError::InvalidResponse(format!(
                "Gemini API error: {}",
                message
            )));
        }

        let text: String = json["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part["text"].as_str())
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            let reason = json["promptFeedback"]["blockReason"]
                .as_str()
                .or_else(|| json["candidates"][0]["finishReason"].as_str())
                .unwrap_or("missing candidates[0].content.parts");
            return Err(CompletionError::InvalidResponse(format!(
                "No text in Gemini response ({})",
                reason
            )));
        }

        Ok(text)
    }
}

#[async_trait]
impl CompletionClient for GeminiAdapter {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        question: &str,
    ) -> Result<String, CompletionError> {
        let body = self.build_request(system_prompt, history, question).to_string();
        let headers = [("x-goog-api-key", self.api_key.as_str())];

        let response = self
            .transport
            .post_json(&self.endpoint(), &headers, &body)
            .await?;
        Self::extract_content(&response)
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }
}
