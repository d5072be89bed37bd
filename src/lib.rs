//! Lunchbot: lunch menu recommendation chatbot
//!
//! The binary wires configuration, the menu store and the completion
//! client into the web server. Domain logic lives in `lunchbot-core`; the
//! HTTP surface lives in `lunchbot-api`.

pub mod cli;

pub use lunchbot_api::{ApiConfig, ApiServer};
pub use lunchbot_core::{AppConfig, ChatRouter, MenuStore};
