//! API Models Module
//!
//! Request and response types for the web surface.

use lunchbot_core::config::AppConfig;
use lunchbot_core::MenuRow;
use serde::{Deserialize, Serialize};

/// Listener configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub version: String,
}

impl ApiConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Chat form body (`application/x-www-form-urlencoded`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub query: Option<String>,
}

/// `GET /api/menu` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuResponse {
    pub success: bool,
    pub rows: Vec<MenuRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `GET /health` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub llm_ready: bool,
}
