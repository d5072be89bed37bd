//! Chat page rendering
//!
//! Server-rendered HTML: the conversation, the message form and the clear
//! button. User turns are escaped; assistant turns are already HTML.

use lunchbot_core::markup::escape_html;
use lunchbot_core::{ChatMessage, ChatRole};
use std::fmt::Write;

/// Shown above the form when free text cannot be answered
pub const NOT_READY_NOTICE: &str =
    "⚠️ API 키가 설정되지 않았습니다. 메뉴 명령어만 사용할 수 있습니다.";

const STYLE: &str = r#"
body { font-family: "Apple SD Gothic Neo", "Malgun Gothic", sans-serif; background: #f4f5f7; margin: 0; }
main { max-width: 760px; margin: 0 auto; padding: 24px 16px; }
h1 { font-size: 1.4rem; }
.chat { display: flex; flex-direction: column; gap: 10px; }
.msg { padding: 10px 14px; border-radius: 12px; max-width: 85%; line-height: 1.5; word-break: break-word; }
.user { align-self: flex-end; background: #4a7dff; color: #fff; white-space: pre-wrap; }
.assistant { align-self: flex-start; background: #fff; border: 1px solid #e1e4e8; }
.assistant table { border-collapse: collapse; }
.assistant th, .assistant td { border: 1px solid #d0d7de; padding: 4px 8px; }
.notice { background: #fff4d6; border: 1px solid #f0c36d; padding: 8px 12px; border-radius: 8px; }
form.send { display: flex; gap: 8px; margin-top: 16px; }
form.send input[type=text] { flex: 1; padding: 10px; border-radius: 8px; border: 1px solid #c9ced6; }
form.clear { margin-top: 8px; text-align: right; }
"#;

/// Render the full chat page
pub fn render_chat_page(messages: &[ChatMessage], is_ready: bool) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>점심 메뉴 추천 챗봇</title>\n<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<main>\n<h1>🍱 점심 메뉴 추천 챗봇</h1>\n");

    if !is_ready {
        let _ = writeln!(html, "<p class=\"notice\">{}</p>", NOT_READY_NOTICE);
    }

    html.push_str("<div class=\"chat\" id=\"chat\">\n");
    for message in messages {
        html.push_str(&render_message(message));
        html.push('\n');
    }
    html.push_str("</div>\n");

    html.push_str(concat!(
        "<form class=\"send\" method=\"post\" action=\"/\">\n",
        "<input type=\"text\" name=\"query\" placeholder=\"메시지를 입력하세요 (예: 오늘 매운 거 추천해줘)\" autocomplete=\"off\" autofocus>\n",
        "<button type=\"submit\">전송</button>\n",
        "</form>\n",
        "<form class=\"clear\" method=\"post\" action=\"/clear\">\n",
        "<button type=\"submit\">대화 지우기</button>\n",
        "</form>\n",
        "</main>\n",
        "<script>window.scrollTo(0,document.body.scrollHeight);</script>\n",
        "</body>\n</html>\n"
    ));
    html
}

/// One chat bubble
fn render_message(message: &ChatMessage) -> String {
    match message.role {
        ChatRole::User => format!(
            "<div class=\"msg user\">{}</div>",
            escape_html(&message.content)
        ),
        ChatRole::Assistant => format!("<div class=\"msg assistant\">{}</div>", message.content),
    }
}
