//! Fake transport for testing
//!
//! Returns fixture strings instead of making HTTP calls and remembers the
//! last request so tests can inspect the payload.

use crate::llm::transport::HttpTransport;
use crate::llm::CompletionError;
use async_trait::async_trait;
use std::sync::Mutex;

/// A request captured by `FakeTransport`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Fake transport for testing (uses fixture strings)
#[derive(Debug, Default)]
pub struct FakeTransport {
    /// Response body to return
    pub response_body: String,
    /// Error to return instead, as (status, message)
    pub error: Option<(u16, String)>,
    last_request: Mutex<Option<RecordedRequest>>,
}

impl FakeTransport {
    /// Create fake transport with given response
    pub fn new(response: &str) -> Self {
        Self {
            response_body: response.to_string(),
            ..Default::default()
        }
    }

    /// Create fake transport that returns an HTTP error
    pub fn with_error(status: u16, msg: &str) -> Self {
        Self {
            error: Some((status, msg.to_string())),
            ..Default::default()
        }
    }

    /// Last request seen, if any
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or(None)
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<String, CompletionError> {
        if let Ok(mut slot) = self.last_request.lock() {
            *slot = Some(RecordedRequest {
                url: url.to_string(),
                headers: headers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                body: body.to_string(),
            });
        }

        if let Some((status, message)) = &self.error {
            return Err(CompletionError::Http {
                status: *status,
                message: message.clone(),
            });
        }
        Ok(self.response_body.clone())
    }
}
