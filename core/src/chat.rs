//! Chat history bookkeeping
//!
//! One history per browser session. Seeded with the welcome message on
//! first access, append-only afterwards, reset by `clear`.

use serde::{Deserialize, Serialize};

/// Fixed greeting shown on a fresh history (HTML)
pub const WELCOME_MESSAGE: &str = concat!(
    "안녕하세요! 점심 메뉴 추천 챗봇입니다.<br><br>",
    "<b>[명령어 Tip]</b><br>",
    "<code>!추가 식당/요일/메뉴/가격/칼로리/종류/맛</code><br>",
    "<code>!삭제 식당이름 / 메뉴이름</code><br>",
    "<code>!수정 식당이름 / 메뉴이름 / 변경할항목 / 새값</code><br>",
    "(예: <code>!수정 학식 / 김치볶음밥 / 가격 / 5500</code>)"
);

/// Speaker of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One chat turn
///
/// User content is plain text; assistant content is trusted HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered conversation log for one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    /// Fresh history holding only the welcome message
    pub fn seeded() -> Self {
        let mut history = Self::default();
        history.ensure_seeded();
        history
    }

    /// Seed the welcome message if the history is empty
    pub fn ensure_seeded(&mut self) {
        if self.messages.is_empty() {
            self.messages.push(ChatMessage::assistant(WELCOME_MESSAGE));
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(ChatMessage::assistant(content));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Every turn except the most recent one
    pub fn prior_turns(&self) -> &[ChatMessage] {
        let end = self.messages.len().saturating_sub(1);
        &self.messages[..end]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop everything; the next render reseeds the welcome message
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_history_has_welcome_only() {
        let history = ChatHistory::seeded();
        assert_eq!(history.len(), 1);
        assert_eq!(history.messages()[0].role, ChatRole::Assistant);
        assert_eq!(history.messages()[0].content, WELCOME_MESSAGE);
    }

    #[test]
    fn test_ensure_seeded_is_idempotent() {
        let mut history = ChatHistory::seeded();
        history.push_user("안녕");
        history.ensure_seeded();
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_clear_then_reseed() {
        let mut history = ChatHistory::seeded();
        history.push_user("뭐 먹지?");
        history.push_assistant("김치찌개 어때요?");

        history.clear();
        assert!(history.is_empty());

        history.ensure_seeded();
        assert_eq!(history.messages(), &[ChatMessage::assistant(WELCOME_MESSAGE)]);
    }

    #[test]
    fn test_prior_turns_excludes_latest() {
        let mut history = ChatHistory::seeded();
        history.push_user("질문");
        assert_eq!(history.prior_turns().len(), 1);
        assert!(ChatHistory::default().prior_turns().is_empty());
    }
}
