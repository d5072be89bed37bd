//! API Handlers Module
//!
//! Request handlers for the chat page and the JSON endpoints. Domain
//! failures never surface as HTTP errors; they become chat messages.

use axum::{
    debug_handler,
    extract::State,
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Json, Redirect, Response},
    Form,
};
use std::sync::Arc;

use lunchbot_core::{ChatHistory, ChatRouter};
use uuid::Uuid;

use crate::models::{ApiConfig, ChatForm, HealthResponse, MenuResponse};
use crate::page::render_chat_page;
use crate::session::{session_cookie, session_id, SessionStore};

/// Represents the state of the API server
pub struct ApiState {
    /// Listener configuration
    pub config: ApiConfig,
    /// Command router with the injected store and completion client
    pub router: ChatRouter,
    /// Per-browser chat histories
    pub sessions: SessionStore,
}

impl ApiState {
    pub fn new(config: ApiConfig, router: ChatRouter) -> Self {
        Self {
            config,
            router,
            sessions: SessionStore::new(),
        }
    }
}

/// Attach a `Set-Cookie` header when the browser had no session id
fn with_session_cookie(response: impl IntoResponse, id: Uuid, fresh: bool) -> Response {
    let mut response = response.into_response();
    if fresh {
        response
            .headers_mut()
            .insert(header::SET_COOKIE, session_cookie(id));
    }
    response
}

/// Session id from the cookie, or a new one that must be sent back
fn session_or_new(headers: &HeaderMap) -> (Uuid, bool) {
    match session_id(headers) {
        Some(id) => (id, false),
        None => (Uuid::new_v4(), true),
    }
}

/// Render the chat page, seeding the welcome message
///
/// An unknown session is rendered from a fresh history without storing it.
#[debug_handler]
pub async fn chat_page(State(state): State<Arc<ApiState>>, headers: HeaderMap) -> Response {
    let (id, fresh) = session_or_new(&headers);

    let page = match state.sessions.get(&id) {
        Some(handle) => {
            let mut history = handle.lock().await;
            history.ensure_seeded();
            render_chat_page(history.messages(), state.router.is_ready())
        }
        None => render_chat_page(ChatHistory::seeded().messages(), state.router.is_ready()),
    };

    with_session_cookie(Html(page), id, fresh)
}

/// Submit one message, then redirect back to the page
#[debug_handler]
pub async fn submit_message(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Form(form): Form<ChatForm>,
) -> Response {
    let (id, fresh) = session_or_new(&headers);

    let query = form.query.unwrap_or_default();
    tracing::debug!("Session {} submitted {} bytes", id, query.len());

    if query.trim().is_empty() {
        tracing::debug!("Ignored empty message");
        return with_session_cookie(Redirect::to("/"), id, fresh);
    }

    let handle = state.sessions.get_or_insert(id);
    {
        let mut history = handle.lock().await;
        if !state.router.handle_message(&mut history, &query).await {
            tracing::debug!("Ignored empty message");
        }
    }

    with_session_cookie(Redirect::to("/"), id, fresh)
}

/// Drop the session's history; the next page load reseeds it
#[debug_handler]
pub async fn clear_chat(State(state): State<Arc<ApiState>>, headers: HeaderMap) -> Response {
    if let Some(handle) = session_id(&headers).and_then(|id| state.sessions.get(&id)) {
        let mut history = handle.lock().await;
        history.clear();
        tracing::debug!("Cleared chat history");
    }
    Redirect::to("/").into_response()
}

/// Current menu table as JSON
#[debug_handler]
pub async fn list_menu(State(state): State<Arc<ApiState>>) -> Json<MenuResponse> {
    match state.router.load_menu().await {
        Ok(table) => Json(MenuResponse {
            success: true,
            rows: table.rows,
            message: None,
        }),
        Err(e) => {
            tracing::error!("Failed to load menu table: {}", e);
            Json(MenuResponse {
                success: false,
                rows: Vec::new(),
                message: Some(e.to_string()),
            })
        }
    }
}

/// Health check endpoint
#[debug_handler]
pub async fn health_check(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "lunchbot-api".to_string(),
        version: state.config.version.clone(),
        llm_ready: state.router.is_ready(),
    })
}
