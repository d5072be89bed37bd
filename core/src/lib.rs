//! Lunchbot Core Module
//!
//! Domain logic for the lunch recommendation chatbot: the spreadsheet-backed
//! menu store, value normalization, prompt construction, command routing,
//! chat history and the completion client adapters. The web layer lives in
//! `lunchbot-api`.

pub mod chat;
pub mod command;
pub mod config;
pub mod llm;
pub mod markup;
pub mod menu;
pub mod normalize;
pub mod prompt;

pub use chat::{ChatHistory, ChatMessage, ChatRole, WELCOME_MESSAGE};
pub use command::{parse_command, ChatRouter, Command, CommandKind};
pub use config::{AppConfig, ConfigError, LlmConfig, LlmProvider};
pub use llm::{Adapter, CompletionClient, CompletionError};
pub use menu::{MenuField, MenuRow, MenuStore, MenuTable, StoreError, StoreOutcome};
pub use normalize::{normalize, CellValue};
