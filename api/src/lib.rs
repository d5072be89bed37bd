//! Lunchbot API Module
//!
//! The web surface for the lunch recommendation chatbot: a server-rendered
//! chat page backed by per-browser sessions, plus small JSON endpoints.

pub mod handlers;
pub mod models;
pub mod page;
pub mod server;
pub mod session;

pub use handlers::*;
pub use models::*;
pub use server::*;
