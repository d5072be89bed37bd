//! Configuration Management Module
//!
//! Layered settings for the chatbot: built-in defaults, an optional TOML
//! file, then `LUNCHBOT__SECTION__KEY` environment variables. Command-line
//! overrides are applied by the binary on top of the loaded value.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "lunchbot.toml";

/// Environment prefix for overrides
pub const ENV_PREFIX: &str = "LUNCHBOT";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config load error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Which completion provider to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Gemini,
    OpenAi,
    Stub,
}

impl std::str::FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(LlmProvider::Gemini),
            "openai" => Ok(LlmProvider::OpenAi),
            "stub" => Ok(LlmProvider::Stub),
            other => Err(ConfigError::Invalid(format!("Unknown LLM provider: {}", other))),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
        }
    }
}

/// Menu table location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MenuConfig {
    /// `.xlsx` or `.csv`; chosen by extension
    pub path: PathBuf,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("점심메뉴추천.xlsx"),
        }
    }
}

/// Completion provider settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    /// Overrides the provider's default API root
    pub base_url: Option<String>,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    /// Per-request timeout; none when unset
    pub timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Gemini,
            model: "gemini-2.5-flash".to_string(),
            base_url: None,
            api_key_env: "GOOGLE_API_KEY".to_string(),
            timeout_secs: None,
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    ///
    /// Blank values count as absent.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub menu: MenuConfig,
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Load configuration
    ///
    /// An explicit `config_file` must exist; otherwise `lunchbot.toml` in
    /// the working directory is used when present.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let file_source = match config_file {
            Some(path) => {
                info!("Loading configuration from {:?}", path);
                config::File::from(path.to_path_buf()).required(true)
            }
            None => config::File::with_name(DEFAULT_CONFIG_FILE)
                .format(config::FileFormat::Toml)
                .required(false),
        };

        let settings = config::Config::builder()
            .add_source(file_source)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app: AppConfig = settings.try_deserialize()?;
        app.validate()?;
        debug!("Resolved configuration: {:?}", app);
        Ok(app)
    }

    /// Parse configuration from a TOML string (defaults fill the gaps)
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml))
            .build()?;

        let app: AppConfig = settings.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    /// Reject values the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid("server.host must not be empty".to_string()));
        }
        if self.menu.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("menu.path must not be empty".to_string()));
        }
        if self.llm.api_key_env.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.api_key_env must not be empty".to_string()));
        }
        if self.llm.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid("llm.timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
