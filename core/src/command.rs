//! Chat command routing
//!
//! Every submitted message becomes exactly one user turn and one assistant
//! turn. Messages that start with a command token (`!추가`/`!add`,
//! `!삭제`/`!delete`, `!수정`/`!modify`, case-insensitive) go to the menu
//! store; everything else is free text for the completion client.

use crate::chat::ChatHistory;
use crate::llm::CompletionClient;
use crate::markup::{escape_html, markdown_to_html};
use crate::menu::{MenuRow, MenuStore, MenuTable, StoreError, StoreOutcome};
use crate::prompt::build_system_prompt;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Reply used for free text when no completion client is configured
pub const CLIENT_UNAVAILABLE: &str =
    "⚠️ API 키가 설정되지 않아 메뉴 추천 기능을 사용할 수 없습니다. 메뉴 명령어(<code>!추가</code>, <code>!삭제</code>, <code>!수정</code>)는 계속 사용할 수 있습니다.";

/// Which command had too few segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Add,
    Delete,
    Modify,
}

impl CommandKind {
    /// Accepted prefixes, matched case-insensitively
    pub fn tokens(self) -> &'static [&'static str] {
        match self {
            CommandKind::Add => &["!추가", "!add"],
            CommandKind::Delete => &["!삭제", "!delete"],
            CommandKind::Modify => &["!수정", "!modify"],
        }
    }

    /// Minimum number of `/`-separated segments
    pub fn min_segments(self) -> usize {
        match self {
            CommandKind::Add => 7,
            CommandKind::Delete => 2,
            CommandKind::Modify => 4,
        }
    }

    /// Fixed usage message (HTML)
    pub fn format_error(self) -> &'static str {
        match self {
            CommandKind::Add => {
                "<b>❌ 형식 오류:</b> <code>!추가 식당/요일/메뉴/가격/칼로리/종류/맛</code>"
            }
            CommandKind::Delete => "<b>❌ 형식 오류:</b> <code>!삭제 식당이름 / 메뉴이름</code>",
            CommandKind::Modify => {
                "<b>❌ 형식 오류:</b> <code>!수정 식당이름 / 메뉴이름 / 변경할항목 / 새값</code>"
            }
        }
    }
}

/// Parsed message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Empty or whitespace-only input
    None,
    Add(MenuRow),
    Delete {
        restaurant: String,
        item: String,
    },
    Modify {
        restaurant: String,
        item: String,
        field: String,
        value: String,
    },
    /// Recognized command with too few segments
    FormatError(CommandKind),
    /// Free text for the completion client
    Chat(String),
}

/// Parse one submitted message
///
/// # Examples
/// ```
/// use lunchbot_core::command::{parse_command, Command, CommandKind};
///
/// assert_eq!(parse_command("   "), Command::None);
/// assert_eq!(
///     parse_command("!삭제 학식 / 김치찌개"),
///     Command::Delete { restaurant: "학식".into(), item: "김치찌개".into() }
/// );
/// assert_eq!(parse_command("!ADD a/b"), Command::FormatError(CommandKind::Add));
/// assert!(matches!(parse_command("오늘 뭐 먹지?"), Command::Chat(_)));
/// ```
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    if input.is_empty() {
        return Command::None;
    }

    let Some((kind, rest)) = match_command(input) else {
        return Command::Chat(input.to_string());
    };

    let parts: Vec<&str> = rest.split('/').map(str::trim).collect();
    if parts.len() < kind.min_segments() {
        return Command::FormatError(kind);
    }

    match kind {
        CommandKind::Add => Command::Add(MenuRow::from_cells(parts.iter().take(7).copied())),
        CommandKind::Delete => Command::Delete {
            restaurant: parts[0].to_string(),
            item: parts[1].to_string(),
        },
        CommandKind::Modify => Command::Modify {
            restaurant: parts[0].to_string(),
            item: parts[1].to_string(),
            field: parts[2].to_string(),
            value: parts[3].to_string(),
        },
    }
}

/// Find the command token at the start of `input`, returning the remainder
fn match_command(input: &str) -> Option<(CommandKind, &str)> {
    [CommandKind::Add, CommandKind::Delete, CommandKind::Modify]
        .into_iter()
        .find_map(|kind| {
            kind.tokens().iter().find_map(|token| {
                let len = token.len();
                let is_match = input.is_char_boundary(len)
                    && input.len() >= len
                    && input[..len].eq_ignore_ascii_case(token);
                is_match.then(|| (kind, &input[len..]))
            })
        })
}

/// Routes messages to the store or the completion client
///
/// Holds injected handles only; history is passed in per request.
#[derive(Clone)]
pub struct ChatRouter {
    store: Arc<MenuStore>,
    client: Option<Arc<dyn CompletionClient>>,
}

impl ChatRouter {
    pub fn new(store: Arc<MenuStore>, client: Option<Arc<dyn CompletionClient>>) -> Self {
        Self { store, client }
    }

    /// Whether free text can be answered
    pub fn is_ready(&self) -> bool {
        self.client.is_some()
    }

    /// Run a store operation on the blocking thread pool
    ///
    /// Table reads and rewrites hit the disk and take the store lock, so
    /// they stay off the async worker threads.
    async fn with_store<T, F>(&self, op: F) -> Result<T, tokio::task::JoinError>
    where
        F: FnOnce(&MenuStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(&store)).await
    }

    /// Read the current table without blocking the runtime
    pub async fn load_menu(&self) -> Result<MenuTable, StoreError> {
        self.with_store(|store| store.load())
            .await
            .unwrap_or_else(|e| Err(StoreError::Io(std::io::Error::other(e))))
    }

    /// Chat reply for a store mutation, escaped for the page
    async fn store_reply<F>(&self, op: F) -> String
    where
        F: FnOnce(&MenuStore) -> StoreOutcome + Send + 'static,
    {
        match self.with_store(op).await {
            Ok(outcome) => escape_html(&outcome.message),
            Err(e) => {
                error!("Menu store task failed: {}", e);
                escape_html(&format!("❌ 메뉴 파일 처리 중 오류가 발생했습니다: {}", e))
            }
        }
    }

    /// Process one message against `history`
    ///
    /// Returns `false` when the input was empty and nothing was recorded.
    pub async fn handle_message(&self, history: &mut ChatHistory, input: &str) -> bool {
        let command = parse_command(input);
        if command == Command::None {
            return false;
        }

        history.ensure_seeded();
        history.push_user(input.trim());

        let reply = match command {
            Command::None => return false,
            Command::Add(row) => self.store_reply(move |store| store.add(row)).await,
            Command::Delete { restaurant, item } => {
                self.store_reply(move |store| store.delete(&restaurant, &item))
                    .await
            }
            Command::Modify {
                restaurant,
                item,
                field,
                value,
            } => {
                self.store_reply(move |store| store.modify(&restaurant, &item, &field, &value))
                    .await
            }
            Command::FormatError(kind) => {
                debug!("Format error for {:?} command", kind);
                kind.format_error().to_string()
            }
            Command::Chat(question) => self.answer(history, &question).await,
        };

        history.push_assistant(reply);
        true
    }

    /// Ask the completion client, converting failures into a chat message
    async fn answer(&self, history: &ChatHistory, question: &str) -> String {
        let Some(client) = &self.client else {
            info!("Free-text message received without a completion client");
            return CLIENT_UNAVAILABLE.to_string();
        };

        let system_prompt = build_system_prompt(&self.load_menu().await);
        match client
            .complete(&system_prompt, history.prior_turns(), question)
            .await
        {
            Ok(text) => {
                debug!(
                    "{} replied with {} bytes",
                    client.provider_name(),
                    text.len()
                );
                markdown_to_html(&text)
            }
            Err(e) => {
                error!("Completion error from {}: {}", client.provider_name(), e);
                format!(
                    "죄송합니다. 챗봇 응답 중 오류가 발생했습니다: {}",
                    escape_html(&e.to_string())
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_takes_first_seven_segments() {
        let command = parse_command("!추가 학식/월/김치찌개/5000원/600kcal/한식/매움/extra");
        let Command::Add(row) = command else {
            panic!("expected add");
        };
        assert_eq!(row.restaurant, "학식");
        assert_eq!(row.price, "5000원");
        assert_eq!(row.taste, "매움");
    }

    #[test]
    fn test_parse_english_aliases_case_insensitive() {
        assert!(matches!(
            parse_command("!Add a/b/c/1/2/d/e"),
            Command::Add(_)
        ));
        assert_eq!(
            parse_command("!DELETE 학식/라면"),
            Command::Delete {
                restaurant: "학식".to_string(),
                item: "라면".to_string()
            }
        );
        assert_eq!(
            parse_command("!modify 학식 / 라면 / price / 4000"),
            Command::Modify {
                restaurant: "학식".to_string(),
                item: "라면".to_string(),
                field: "price".to_string(),
                value: "4000".to_string()
            }
        );
    }

    #[test]
    fn test_parse_format_errors() {
        assert_eq!(parse_command("!추가 학식/월/김치찌개"), Command::FormatError(CommandKind::Add));
        assert_eq!(parse_command("!삭제 학식"), Command::FormatError(CommandKind::Delete));
        assert_eq!(parse_command("!수정"), Command::FormatError(CommandKind::Modify));
    }

    #[test]
    fn test_parse_free_text_and_empty() {
        assert_eq!(parse_command(""), Command::None);
        assert_eq!(parse_command(" \t "), Command::None);
        assert_eq!(
            parse_command("  매운 거 추천해줘 "),
            Command::Chat("매운 거 추천해줘".to_string())
        );
        // Non-ASCII first character shorter than a token
        assert_eq!(parse_command("밥"), Command::Chat("밥".to_string()));
        assert_eq!(parse_command("!추"), Command::Chat("!추".to_string()));
    }

    #[test]
    fn test_format_error_messages_are_fixed() {
        assert_eq!(
            CommandKind::Add.format_error(),
            "<b>❌ 형식 오류:</b> <code>!추가 식당/요일/메뉴/가격/칼로리/종류/맛</code>"
        );
        assert_eq!(CommandKind::Delete.min_segments(), 2);
        assert_eq!(CommandKind::Modify.min_segments(), 4);
    }
}
