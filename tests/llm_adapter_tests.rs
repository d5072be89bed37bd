//! LLM Adapter integration tests
//!
//! Tests adapter implementations without live network calls.
//! Uses fixtures for deterministic testing.

use lunchbot_core::chat::ChatMessage;
use lunchbot_core::llm::gemini::{self, GeminiAdapter};
use lunchbot_core::llm::openai::{self, OpenAiAdapter};
use lunchbot_core::llm::{CompletionClient, CompletionError, FakeTransport, Transport};
use lunchbot_core::WELCOME_MESSAGE;
use std::path::PathBuf;

// Test helpers
fn load_fixture(name: &str) -> String {
    let path = PathBuf::from("tests/fixtures").join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", path.display()))
}

fn gemini_with(transport: FakeTransport) -> GeminiAdapter {
    GeminiAdapter::with_transport(
        gemini::DEFAULT_BASE_URL.to_string(),
        gemini::DEFAULT_MODEL.to_string(),
        "fixture-key".to_string(),
        Transport::Fake(transport),
    )
}

#[tokio::test]
async fn gemini_joins_all_text_parts() {
    let adapter = gemini_with(FakeTransport::new(&load_fixture("gemini_generate_content.json")));

    let text = adapter.complete("SYSTEM", &[], "뭐 먹지?").await.unwrap();
    assert_eq!(
        text,
        "오늘은 월요일이니 **학식 김치찌개**(5000원, 600kcal)를 추천합니다.\n매운 맛을 좋아하신다면 딱 맞을 거예요."
    );
}

#[tokio::test]
async fn gemini_request_replays_history_as_user_and_model() {
    let adapter = gemini_with(FakeTransport::new(&load_fixture("gemini_generate_content.json")));
    let history = vec![
        ChatMessage::assistant(WELCOME_MESSAGE),
        ChatMessage::user("안녕"),
        ChatMessage::assistant("안녕하세요!"),
    ];

    adapter.complete("SYSTEM", &history, "점심 추천").await.unwrap();

    let Transport::Fake(fake) = adapter.transport() else {
        panic!("expected fake transport");
    };
    let request = fake.last_request().unwrap();
    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    let roles: Vec<&str> = body["contents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, ["model", "user", "model", "user"]);
    assert_eq!(
        body["contents"][3]["parts"][0]["text"],
        "SYSTEM\n사용자 질문: 점심 추천"
    );
}

#[tokio::test]
async fn gemini_error_body_is_surfaced() {
    let adapter = gemini_with(FakeTransport::new(&load_fixture("gemini_error.json")));

    let err = adapter.complete("SYSTEM", &[], "q").await.unwrap_err();
    assert!(matches!(err, CompletionError::InvalidResponse(_)));
    assert!(err.to_string().contains("API key not valid"));
}

#[tokio::test]
async fn openai_fixture_round_trip() {
    let adapter = OpenAiAdapter::with_transport(
        openai::DEFAULT_BASE_URL.to_string(),
        "gpt-4o-mini".to_string(),
        "sk-fixture".to_string(),
        Transport::Fake(FakeTransport::new(&load_fixture("openai_chat_completion.json"))),
    );

    let text = adapter.complete("SYSTEM", &[], "분식 추천").await.unwrap();
    assert_eq!(text, "분식집 떡볶이는 어떠세요?");
    assert_eq!(adapter.provider_name(), "openai");
}
