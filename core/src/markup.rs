//! Reply rendering
//!
//! Model replies are markdown; the chat page shows HTML. Single newlines
//! inside a paragraph become `<br />` so line structure survives. Raw HTML
//! in a reply is emitted as escaped text, never as markup.

use pulldown_cmark::{html, Event, Options, Parser};

/// Convert a markdown reply to HTML, preserving line breaks
pub fn markdown_to_html(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(text, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Escape text for inclusion in HTML
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_and_lists() {
        let html = markdown_to_html("**김치찌개** 추천\n\n- 5000원\n- 600kcal");
        assert!(html.contains("<strong>김치찌개</strong>"));
        assert!(html.contains("<li>5000원</li>"));
    }

    #[test]
    fn test_single_newline_becomes_break() {
        let html = markdown_to_html("첫 줄\n둘째 줄");
        assert!(html.contains("첫 줄<br />"));
        assert!(html.contains("둘째 줄"));
    }

    #[test]
    fn test_raw_html_in_reply_is_escaped() {
        let html = markdown_to_html("추천: <img src=x onerror=alert(1)> 메뉴");
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(!html.contains("<img"));

        let html = markdown_to_html("<script>alert(1)</script>\n\n**비빔밥**");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<strong>비빔밥</strong>"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"a\" & 'b'</b>"), "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;");
    }
}
