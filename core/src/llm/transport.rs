//! HTTP transport for completion adapters
//!
//! Adapters build JSON bodies and hand them to a transport. The real
//! transport uses reqwest; tests swap in `FakeTransport`.

use crate::llm::transport_fake::FakeTransport;
use crate::llm::CompletionError;
use async_trait::async_trait;
use std::time::Duration;

/// HTTP transport abstraction
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST a JSON body and return the response body
    ///
    /// Non-2xx responses become `CompletionError::Http` carrying the
    /// provider's error message when one can be extracted.
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<String, CompletionError>;
}

/// Concrete transport enum
#[derive(Debug)]
pub enum Transport {
    Real(ReqwestTransport),
    Fake(FakeTransport),
}

#[async_trait]
impl HttpTransport for Transport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<String, CompletionError> {
        match self {
            Transport::Real(t) => t.post_json(url, headers, body).await,
            Transport::Fake(t) => t.post_json(url, headers, body).await,
        }
    }
}

impl Default for Transport {
    fn default() -> Self {
        Transport::Real(ReqwestTransport::new())
    }
}

/// Real HTTP transport using reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport without a request timeout
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Transport with a per-request timeout
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| CompletionError::Configuration(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<String, CompletionError> {
        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "application/json");

        for (key, value) in headers {
            request = request.header(*key, *value);
        }

        let response = request.body(body.to_string()).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(CompletionError::Http {
                status: status.as_u16(),
                message: extract_error_message(&text).unwrap_or(text),
            });
        }

        Ok(text)
    }
}

/// Pull `error.message` out of a provider error body
pub fn extract_error_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    json["error"]["message"].as_str().map(|s| s.to_string())
}
