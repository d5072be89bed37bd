//! Completion client
//!
//! Provider-agnostic interface to the external text-generation service.
//! Given a system prompt, prior chat turns and a new question, a client
//! returns generated text or a `CompletionError`.

pub mod factory;
pub mod gemini;
pub mod openai;
pub mod stub;
pub mod transport;
pub mod transport_fake;

pub use factory::{create_adapter, create_adapter_with_key};
pub use transport::{HttpTransport, ReqwestTransport, Transport};
pub use transport_fake::FakeTransport;

use crate::chat::ChatMessage;
use async_trait::async_trait;

/// Completion errors
///
/// Transport, quota and model failures are all surfaced to the user
/// verbatim; no variant is retried.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Network error (connection refused, DNS, TLS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP error (non-2xx status)
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// Response did not contain generated text
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(String),

    /// No API credential available
    #[error("LLM not configured")]
    NotConfigured,
}

impl From<serde_json::Error> for CompletionError {
    fn from(err: serde_json::Error) -> Self {
        CompletionError::Json(err.to_string())
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => CompletionError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => CompletionError::Network(err.to_string()),
        }
    }
}

/// Completion client trait
///
/// The command router only talks to this trait.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate a reply to `question`
    ///
    /// `history` holds the turns before the question, oldest first.
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        question: &str,
    ) -> Result<String, CompletionError>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;
}

/// Adapter enum: concrete type for all providers
#[derive(Debug)]
pub enum Adapter {
    Gemini(gemini::GeminiAdapter),
    OpenAi(openai::OpenAiAdapter),
    Stub(stub::StubAdapter),
}

#[async_trait]
impl CompletionClient for Adapter {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        question: &str,
    ) -> Result<String, CompletionError> {
        match self {
            Adapter::Gemini(a) => a.complete(system_prompt, history, question).await,
            Adapter::OpenAi(a) => a.complete(system_prompt, history, question).await,
            Adapter::Stub(a) => a.complete(system_prompt, history, question).await,
        }
    }

    fn provider_name(&self) -> &str {
        match self {
            Adapter::Gemini(a) => a.provider_name(),
            Adapter::OpenAi(a) => a.provider_name(),
            Adapter::Stub(a) => a.provider_name(),
        }
    }
}
