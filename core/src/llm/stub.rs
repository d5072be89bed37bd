//! Stub Adapter
//!
//! Returns canned replies without network calls. Used for local runs
//! without a credential and for tests.

use crate::chat::ChatMessage;
use crate::llm::{CompletionClient, CompletionError};
use async_trait::async_trait;

/// Stub adapter for testing (returns fake responses)
#[derive(Debug)]
pub struct StubAdapter {
    /// Fake response to return; `None` echoes the question
    response: Option<String>,
    /// Error message to return instead
    error: Option<String>,
}

impl StubAdapter {
    /// Stub that echoes the question back
    pub fn new() -> Self {
        Self {
            response: None,
            error: None,
        }
    }

    /// Create stub adapter with custom response
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            error: None,
        }
    }

    /// Stub that always fails with a network error
    pub fn with_error(message: impl Into<String>) -> Self {
        Self {
            response: None,
            error: Some(message.into()),
        }
    }
}

impl Default for StubAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for StubAdapter {
    async fn complete(
        &self,
        _system_prompt: &str,
        history: &[ChatMessage],
        question: &str,
    ) -> Result<String, CompletionError> {
        if let Some(ref message) = self.error {
            return Err(CompletionError::Network(message.clone()));
        }
        Ok(match self.response {
            Some(ref response) => response.clone(),
            None => format!("(stub) {} ({}개의 이전 메시지)", question, history.len()),
        })
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}
