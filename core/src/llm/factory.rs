//! Adapter factory
//!
//! Builds the configured adapter. A provider that needs a key but has none
//! yields `Ok(None)`: free text is disabled while commands keep working.

use crate::config::{LlmConfig, LlmProvider};
use crate::llm::gemini::{self, GeminiAdapter};
use crate::llm::openai::{self, OpenAiAdapter};
use crate::llm::stub::StubAdapter;
use crate::llm::transport::{ReqwestTransport, Transport};
use crate::llm::{Adapter, CompletionError};
use tracing::{info, warn};

/// Create adapter from configuration, reading the key from the environment
pub fn create_adapter(config: &LlmConfig) -> Result<Option<Adapter>, CompletionError> {
    create_adapter_with_key(config, config.api_key())
}

/// Create adapter from configuration and an explicit key
pub fn create_adapter_with_key(
    config: &LlmConfig,
    api_key: Option<String>,
) -> Result<Option<Adapter>, CompletionError> {
    if config.provider == LlmProvider::Stub {
        info!("Using stub completion client");
        return Ok(Some(Adapter::Stub(StubAdapter::new())));
    }

    let Some(api_key) = api_key else {
        warn!(
            "{} is not set; free-text recommendations are disabled",
            config.api_key_env
        );
        return Ok(None);
    };

    if config.model.trim().is_empty() {
        return Err(CompletionError::Configuration(
            "llm.model must not be empty".to_string(),
        ));
    }

    let transport = match config.timeout_secs {
        Some(secs) => Transport::Real(ReqwestTransport::with_timeout(secs)?),
        None => Transport::Real(ReqwestTransport::new()),
    };

    let adapter = match config.provider {
        LlmProvider::Gemini => {
            let base_url = config
                .base_url
                .clone()
                .unwrap_or_else(|| gemini::DEFAULT_BASE_URL.to_string());
            Adapter::Gemini(GeminiAdapter::with_transport(
                base_url,
                config.model.clone(),
                api_key,
                transport,
            ))
        }
        LlmProvider::OpenAi => {
            let base_url = config
                .base_url
                .clone()
                .unwrap_or_else(|| openai::DEFAULT_BASE_URL.to_string());
            Adapter::OpenAi(OpenAiAdapter::with_transport(
                base_url,
                config.model.clone(),
                api_key,
                transport,
            ))
        }
        LlmProvider::Stub => Adapter::Stub(StubAdapter::new()),
    };

    info!(
        "Completion client ready: provider={} model={}",
        crate::llm::CompletionClient::provider_name(&adapter),
        config.model
    );
    Ok(Some(adapter))
}
