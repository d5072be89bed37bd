//! API Server Module
//!
//! This module contains the server setup functionality for the chat page.

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use lunchbot_core::ChatRouter;

use crate::handlers::{chat_page, clear_chat, health_check, list_menu, submit_message, ApiState};
use crate::models::ApiConfig;

/// Main API server
pub struct ApiServer {
    /// Server configuration
    config: ApiConfig,
    /// Shared state
    state: Arc<ApiState>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: ApiConfig, router: ChatRouter) -> Self {
        let state = Arc::new(ApiState::new(config.clone(), router));
        Self { config, state }
    }

    pub fn state(&self) -> Arc<ApiState> {
        self.state.clone()
    }

    /// Build the router with the shared state
    pub fn app(&self) -> Router {
        Router::new()
            // Chat page
            .route("/", get(chat_page).post(submit_message))
            .route("/clear", post(clear_chat))
            // Menu table
            .route("/api/menu", get(list_menu))
            // Health check
            .route("/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the API server
    pub async fn start(&self) -> Result<()> {
        let addr = self.config.bind_address();
        info!("Starting lunchbot server on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;
        info!("Lunchbot server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, self.app())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to start API server: {}", e))?;

        info!("Lunchbot server stopped");
        Ok(())
    }
}

/// Resolve on Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
