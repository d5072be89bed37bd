//! CLI module
//!
//! Provides:
//! - Argument parsing and config overrides
//! - Startup bootstrap (menu table, completion client)
//! - Logging setup

pub mod args;
pub mod bootstrap;

// Re-exports
pub use args::{parse_args, Args};
pub use bootstrap::{build_router, ensure_menu_table, BootstrapStatus};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str =
    "lunchbot=info,lunchbot_core=info,lunchbot_api=info,tower_http=info";

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Config error: {0}")]
    Config(#[from] lunchbot_core::ConfigError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Exit codes (deterministic)
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Install the global tracing subscriber
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}

impl Error {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgs(_) | Error::Config(_) => EXIT_CONFIG_ERROR,
            _ => EXIT_FAILURE,
        }
    }
}
