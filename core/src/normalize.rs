//! Value normalization for price and calorie cells
//!
//! Strips currency, unit and noise characters from a scalar field:
//! - "4900원" → "4900"
//! - "약 850kcal" → "850"
//! - "7000~9000원" → "7000~9000" (range kept)
//! - anything unparseable → "0"

use regex::Regex;
use std::sync::OnceLock;

/// Sentinel returned when a value cannot be read as a number
pub const SENTINEL: &str = "0";

/// Raw cell value as it comes out of a table file or a chat command
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

fn noise_pattern() -> &'static Regex {
    static NOISE: OnceLock<Regex> = OnceLock::new();
    // 원 (won), comma, the letters of "kcal", 약 (approx.) and whitespace
    NOISE.get_or_init(|| Regex::new(r"[원,kcal약\s]").expect("noise pattern is valid"))
}

/// Normalize a price or calorie value
pub fn normalize(raw: impl Into<CellValue>) -> String {
    match raw.into() {
        CellValue::Number(n) => {
            if n.is_finite() {
                format!("{}", n.trunc() as i64)
            } else {
                SENTINEL.to_string()
            }
        }
        CellValue::Text(s) => normalize_text(&s),
    }
}

fn normalize_text(raw: &str) -> String {
    let stripped = noise_pattern().replace_all(raw.trim(), "");

    if stripped.contains('~') || stripped.contains('～') {
        return stripped.into_owned();
    }

    if !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit()) {
        return stripped.into_owned();
    }

    SENTINEL.to_string()
}
