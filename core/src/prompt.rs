//! System prompt for menu recommendations
//!
//! Renders the menu table as a markdown table and wraps it in the fixed
//! instruction template sent with every free-text question.

use crate::menu::{MenuField, MenuTable, StoreError};
use crate::normalize::normalize;
use chrono::{Datelike, Local, Weekday};

/// Placeholder when there is nothing to recommend from
pub const NO_DATA: &str = "데이터 없음 (아직 추가된 메뉴가 없습니다)";

/// Placeholder when the table could not be read
pub const LOAD_ERROR: &str = "데이터 로드 중 오류 발생";

/// Separator between the system prompt and the user's question
pub const QUESTION_PREFIX: &str = "\n사용자 질문: ";

/// Korean weekday name, matching the values used in the 요일 column
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "월요일",
        Weekday::Tue => "화요일",
        Weekday::Wed => "수요일",
        Weekday::Thu => "목요일",
        Weekday::Fri => "금요일",
        Weekday::Sat => "토요일",
        Weekday::Sun => "일요일",
    }
}

/// Render the menu block that goes into the prompt
///
/// Missing or empty tables become [`NO_DATA`]; any other read failure
/// becomes [`LOAD_ERROR`].
pub fn render_menu_data(table: &Result<MenuTable, StoreError>) -> String {
    match table {
        Ok(table) if table.is_empty() => NO_DATA.to_string(),
        Ok(table) => render_markdown_table(table),
        Err(StoreError::FileMissing(_)) => NO_DATA.to_string(),
        Err(e) => {
            tracing::error!("Failed to load menu for prompt: {}", e);
            LOAD_ERROR.to_string()
        }
    }
}

/// Pipe table with price/calories re-normalized for display
pub fn render_markdown_table(table: &MenuTable) -> String {
    let header = MenuField::header();
    let mut out = String::new();

    out.push_str("| ");
    out.push_str(&header.join(" | "));
    out.push_str(" |\n|");
    for _ in header {
        out.push_str(":---|");
    }
    out.push('\n');

    for row in &table.rows {
        let cells: Vec<String> = MenuField::ALL
            .iter()
            .map(|field| {
                let value = row.get(*field);
                let value = if field.is_numeric() {
                    normalize(value)
                } else {
                    value.to_string()
                };
                escape_cell(&value)
            })
            .collect();
        out.push_str("| ");
        out.push_str(&cells.join(" | "));
        out.push_str(" |\n");
    }

    out.trim_end().to_string()
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

/// Build the system prompt for today
pub fn build_system_prompt(table: &Result<MenuTable, StoreError>) -> String {
    build_system_prompt_for_day(table, Local::now().weekday())
}

/// Build the system prompt for a given weekday
pub fn build_system_prompt_for_day(table: &Result<MenuTable, StoreError>, today: Weekday) -> String {
    let menu_data = render_menu_data(table);
    let today = weekday_name(today);

    format!(
        r#"
당신은 사용자의 상황(요일, 예산, 칼로리, 맛 선호)을 종합적으로 고려하는 최고의 점심 메뉴 추천 AI입니다.
오늘은 {today}입니다.

[핵심 지침]
1.  아래 '메뉴 리스트'의 모든 열(식당 이름, 요일, 메뉴, 가격, 칼로리, 음식의 종류, 맛)을 종합적으로 참고하여 추천합니다.
2.  **[중요] 대화 기록을 분석하여** 사용자가 앞서 말한 예산, 칼로리, 맛 선호, 이미 먹은 메뉴를 기억하고 추천에 반영하세요.
3.  '가격' 열에 "7000~9000"처럼 범위가 있다면 최저가와 최고가를 모두 고려하여, 사용자의 예산 안에 들어갈 수 있는지 설명하세요.
4.  '요일' 열을 참고하여 오늘 또는 사용자가 말한 요일에 먹을 수 있는 메뉴를 우선 추천하세요. '매일'이나 빈 값은 모든 요일에 가능한 것으로 봅니다.
5.  리스트에 없는 메뉴는 없다고 솔직하게 말하세요.
6.  '!추가', '!삭제', '!수정' 명령어는 프로그램이 이미 처리를 완료했으므로, 다시 설명하지 말고 프로그램이 반환한 결과 메시지를 그대로 전달하거나 짧게 확인 응답만 하세요.

--- 메뉴 리스트 ---
{menu_data}
--------------------
"#
    )
}

/// Final payload for the completion client
pub fn compose_user_turn(system_prompt: &str, question: &str) -> String {
    format!("{}{}{}", system_prompt, QUESTION_PREFIX, question)
}
