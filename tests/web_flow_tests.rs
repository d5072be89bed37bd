//! Web flow integration tests
//!
//! Drives the axum router in-process with `tower::ServiceExt::oneshot`,
//! carrying the session cookie between requests like a browser would.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use lunchbot::cli::build_router;
use lunchbot_api::{ApiConfig, ApiServer, MenuResponse};
use lunchbot_core::config::{AppConfig, LlmProvider};
use lunchbot_core::llm::stub::StubAdapter;
use lunchbot_core::{ChatRouter, CompletionClient, MenuStore};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn app_with_client(dir: &TempDir, client: Option<Arc<dyn CompletionClient>>) -> Router {
    let store = Arc::new(MenuStore::new(dir.path().join("menu.xlsx")));
    store.ensure_exists().unwrap();
    let config = ApiConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        version: "test".to_string(),
    };
    ApiServer::new(config, ChatRouter::new(store, client)).app()
}

async fn get_page(app: &Router, cookie: Option<&str>) -> (Option<String>, String) {
    let mut request = Request::builder().uri("/");
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    let response = app
        .clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().split(';').next().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (set_cookie, String::from_utf8(body.to_vec()).unwrap())
}

async fn post_form(app: &Router, uri: &str, cookie: &str, body: String) -> StatusCode {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::COOKIE, cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    response.status()
}

fn form_query(text: &str) -> String {
    let mut encoded = String::from("query=");
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

fn count_bubbles(html: &str) -> usize {
    html.matches("<div class=\"msg ").count()
}

#[tokio::test]
async fn add_command_round_trip_through_page() {
    let dir = TempDir::new().unwrap();
    let app = app_with_client(&dir, Some(Arc::new(StubAdapter::new())));

    let (cookie, html) = get_page(&app, None).await;
    let cookie = cookie.expect("first visit sets a cookie");
    assert_eq!(count_bubbles(&html), 1);

    let status = post_form(
        &app,
        "/",
        &cookie,
        form_query("!추가 학식/월/김치찌개/5000원/600kcal/한식/매움"),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let (new_cookie, html) = get_page(&app, Some(&cookie)).await;
    assert!(new_cookie.is_none());
    assert_eq!(count_bubbles(&html), 3);
    assert!(html.contains("메뉴가 성공적으로 추가되었습니다."));

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/api/menu").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let menu: MenuResponse = serde_json::from_slice(&body).unwrap();
    assert!(menu.success);
    assert_eq!(menu.rows.len(), 1);
    assert_eq!(menu.rows[0].price, "5000");
}

#[tokio::test]
async fn short_add_shows_format_error() {
    let dir = TempDir::new().unwrap();
    let app = app_with_client(&dir, None);

    let (cookie, _) = get_page(&app, None).await;
    let cookie = cookie.unwrap();

    post_form(&app, "/", &cookie, form_query("!add 학식/월/김치찌개")).await;

    let (_, html) = get_page(&app, Some(&cookie)).await;
    assert!(html.contains("<b>❌ 형식 오류:</b> <code>!추가 식당/요일/메뉴/가격/칼로리/종류/맛</code>"));
}

#[tokio::test]
async fn clear_then_reload_shows_only_welcome() {
    let dir = TempDir::new().unwrap();
    let app = app_with_client(&dir, Some(Arc::new(StubAdapter::with_response("비빔밥 어때요?"))));

    let (cookie, _) = get_page(&app, None).await;
    let cookie = cookie.unwrap();

    post_form(&app, "/", &cookie, form_query("점심 추천해줘")).await;
    let (_, html) = get_page(&app, Some(&cookie)).await;
    assert_eq!(count_bubbles(&html), 3);
    assert!(html.contains("비빔밥 어때요?"));

    post_form(&app, "/clear", &cookie, String::new()).await;
    let (_, html) = get_page(&app, Some(&cookie)).await;
    assert_eq!(count_bubbles(&html), 1);
    assert!(html.contains("점심 메뉴 추천 챗봇입니다"));
}

#[tokio::test]
async fn empty_submission_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let app = app_with_client(&dir, None);

    let (cookie, _) = get_page(&app, None).await;
    let cookie = cookie.unwrap();

    post_form(&app, "/", &cookie, "query=%20%20".to_string()).await;
    post_form(&app, "/", &cookie, String::new()).await;

    let (_, html) = get_page(&app, Some(&cookie)).await;
    assert_eq!(count_bubbles(&html), 1);
}

#[tokio::test]
async fn sessions_are_isolated() {
    let dir = TempDir::new().unwrap();
    let app = app_with_client(&dir, None);

    let (first, _) = get_page(&app, None).await;
    let (second, _) = get_page(&app, None).await;
    let (first, second) = (first.unwrap(), second.unwrap());
    assert_ne!(first, second);

    post_form(&app, "/", &first, form_query("!삭제 학식")).await;

    let (_, html) = get_page(&app, Some(&second)).await;
    assert_eq!(count_bubbles(&html), 1);
}

#[tokio::test]
async fn bootstrap_router_serves_page_with_not_ready_notice() {
    let dir = TempDir::new().unwrap();
    let mut config = AppConfig::default();
    config.menu.path = dir.path().join("menu.csv");
    config.llm.provider = LlmProvider::Gemini;
    config.llm.api_key_env = "LUNCHBOT_WEB_TEST_KEY_NEVER_SET".to_string();

    let router = build_router(&config).unwrap();
    assert!(config.menu.path.exists());

    let app = ApiServer::new(ApiConfig::from_app_config(&config), router).app();
    let (_, html) = get_page(&app, None).await;
    assert!(html.contains(lunchbot_api::page::NOT_READY_NOTICE));
}
