//! Lunchbot server
//!
//! Loads `.env`, resolves configuration (file → environment → flags),
//! prepares the menu table and serves the chat page.

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use lunchbot::cli::{build_router, init_logging, Args, Error, EXIT_FAILURE, EXIT_SUCCESS};
use lunchbot_api::{ApiConfig, ApiServer};
use lunchbot_core::config::AppConfig;

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();
    init_logging();

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let code = match run(args).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            e.downcast_ref::<Error>()
                .map(Error::exit_code)
                .unwrap_or(EXIT_FAILURE)
        }
    };
    std::process::exit(code);
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = AppConfig::load(args.config.as_deref())
        .map_err(Error::from)
        .context("Failed to load configuration")?;
    args.apply(&mut config);
    config
        .validate()
        .map_err(Error::from)
        .context("Invalid configuration")?;

    let router = build_router(&config).context("Failed to start lunchbot")?;
    if !router.is_ready() {
        info!(
            "Running without a completion client; set {} to enable recommendations",
            config.llm.api_key_env
        );
    }

    let server = ApiServer::new(ApiConfig::from_app_config(&config), router);
    server.start().await
}
