//! OpenAI Adapter
//!
//! OpenAI-compatible chat completions API. The system prompt travels as a
//! `system` message; history and the question follow as chat messages.

use crate::chat::{ChatMessage, ChatRole};
use crate::llm::transport::{HttpTransport, Transport};
use crate::llm::{CompletionClient, CompletionError};
use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible adapter
#[derive(Debug)]
pub struct OpenAiAdapter {
    /// Base URL (e.g., https://api.openai.com/v1)
    base_url: String,
    /// Model name (e.g., gpt-4o-mini)
    model: String,
    /// API key
    api_key: String,
    /// HTTP transport
    transport: Transport,
}

impl OpenAiAdapter {
    /// Create new OpenAI adapter
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

    /// Build chat request body
    pub fn build_request(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        question: &str,
    ) -> JsonValue {
        let mut messages = vec![json!({"role": "system", "content": system_prompt})];

        messages.extend(history.iter().map(|msg| {
            let role_str = match msg.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            };
            json!({"role": role_str, "content": msg.content})
        }));

        messages.push(json!({"role": "user", "content": question}));

        json!({
            "model": self.model,
            "messages": messages,
            "stream": false
        })
    }

    /// Extract content from JSON response
    pub fn extract_content(response: &str) -> Result<String, CompletionError> {
        let json: JsonValue = serde_json::from_str(response)?;

        let content = json["choices"]
            .get(0)
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                CompletionError::InvalidResponse("Missing choices[0].message.content".to_string())
            })?;

        Ok(content.to_string())
    }
}

#[async_trait]
impl CompletionClient for OpenAiAdapter {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        question: &str,
    ) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = self.build_request(system_prompt, history, question).to_string();

        let auth_header = format!("Bearer {}", self.api_key);
        let headers = [("Authorization", auth_header.as_str())];

        let response = self.transport.post_json(&url, &headers, &body).await?;
        Self::extract_content(&response)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::FakeTransport;

    #[test]
    fn test_build_request_message_order() {
        let adapter = OpenAiAdapter::new(
            DEFAULT_BASE_URL.to_string(),
            "gpt-4o-mini".to_string(),
            "sk-test".to_string(),
        );
        let history = vec![ChatMessage::assistant("환영")];

        let body = adapter.build_request("SYSTEM", &history, "뭐 먹지?");
        let messages = body["messages"].as_array().unwrap();

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(messages[2]["content"], "뭐 먹지?");
    }

    #[tokio::test]
    async fn test_complete_extracts_content() {
        let reply = r#"{"choices": [{"message": {"role": "assistant", "content": "비빔밥 어때요?"}}]}"#;
        let adapter = OpenAiAdapter::with_transport(
            DEFAULT_BASE_URL.to_string(),
            "gpt-4o-mini".to_string(),
            "sk-test".to_string(),
            Transport::Fake(FakeTransport::new(reply)),
        );

        let text = adapter.complete("SYSTEM", &[], "점심 추천").await.unwrap();
        assert_eq!(text, "비빔밥 어때요?");
    }

    #[test]
    fn test_extract_content_missing_choices() {
        let err = OpenAiAdapter::extract_content("{}").unwrap_err();
        assert!(matches!(err, CompletionError::InvalidResponse(_)));
    }
}
