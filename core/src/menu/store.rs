//! Menu store
//!
//! Every mutation loads the full table, changes it in memory and rewrites
//! the full file. A store-level lock serializes load-mutate-rewrite so two
//! requests in the same process cannot lose each other's update.

use crate::menu::table_file::{read_table, write_table};
use crate::menu::{MenuField, MenuRow, MenuTable};
use crate::normalize::normalize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, error, info, warn};

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Menu file not found: {0}")]
    FileMissing(PathBuf),

    #[error("No row for restaurant '{restaurant}' and item '{item}'")]
    NotFound { restaurant: String, item: String },

    #[error("Invalid field: {0}")]
    InvalidField(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result of a command-triggered mutation, as shown in the chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreOutcome {
    pub success: bool,
    pub message: String,
}

impl StoreOutcome {
    fn ok(message: String) -> Self {
        Self {
            success: true,
            message,
        }
    }

    fn failed(message: String) -> Self {
        Self {
            success: false,
            message,
        }
    }
}

/// What a successful modify changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyReceipt {
    pub field: MenuField,
    /// Stored value (normalized for price/calories)
    pub value: String,
    pub rows_changed: usize,
}

/// File-backed menu store
#[derive(Debug)]
pub struct MenuStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl MenuStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a header-only table if the file is absent
    ///
    /// Returns `true` when a file was created.
    pub fn ensure_exists(&self) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.path.exists() {
            return Ok(false);
        }
        info!("Menu file {} not found, creating it", self.path.display());
        write_table(&self.path, &MenuTable::default())?;
        Ok(true)
    }

    /// Read the current table
    pub fn load(&self) -> Result<MenuTable, StoreError> {
        read_table(&self.path)
    }

    /// Append a row, normalizing price and calories
    ///
    /// A missing or unreadable file is treated as an empty table and
    /// rewritten with the header plus the new row.
    pub fn try_add(&self, row: MenuRow) -> Result<MenuRow, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut table = match read_table(&self.path) {
            Ok(table) => table,
            Err(StoreError::FileMissing(_)) => MenuTable::default(),
            Err(e) => {
                warn!("Menu table unreadable, starting a new one: {}", e);
                MenuTable::default()
            }
        };

        let mut row = row;
        row.price = normalize(row.price.as_str());
        row.calories = normalize(row.calories.as_str());

        table.rows.push(row.clone());
        write_table(&self.path, &table)?;

        debug!("Added menu row {} / {}", row.restaurant, row.item);
        Ok(row)
    }

    /// Remove every row matching (restaurant, item)
    ///
    /// Returns the number of rows removed.
    pub fn try_delete(&self, restaurant: &str, item: &str) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut table = read_table(&self.path)?;
        let before = table.len();
        table.rows.retain(|row| !row.matches(restaurant, item));
        let removed = before - table.len();

        if removed == 0 {
            return Err(StoreError::NotFound {
                restaurant: restaurant.to_string(),
                item: item.to_string(),
            });
        }

        write_table(&self.path, &table)?;
        debug!("Deleted {} row(s) for {} / {}", removed, restaurant, item);
        Ok(removed)
    }

    /// Set one field on every row matching (restaurant, item)
    ///
    /// The key is checked before the field name, so an unknown row reports
    /// NotFound even when the field is also invalid.
    pub fn try_modify(
        &self,
        restaurant: &str,
        item: &str,
        field_name: &str,
        new_value: &str,
    ) -> Result<ModifyReceipt, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut table = read_table(&self.path)?;
        let matched = table.find(restaurant, item);
        if matched.is_empty() {
            return Err(StoreError::NotFound {
                restaurant: restaurant.to_string(),
                item: item.to_string(),
            });
        }

        let field = MenuField::from_name(field_name)
            .ok_or_else(|| StoreError::InvalidField(field_name.to_string()))?;

        let value = if field.is_numeric() {
            normalize(new_value)
        } else {
            new_value.to_string()
        };

        for idx in &matched {
            table.rows[*idx].set(field, value.clone());
        }

        write_table(&self.path, &table)?;
        debug!(
            "Modified {} row(s) for {} / {}: {} = {}",
            matched.len(),
            restaurant,
            item,
            field,
            value
        );

        Ok(ModifyReceipt {
            field,
            value,
            rows_changed: matched.len(),
        })
    }

    /// `!add` entry point: always yields a chat message
    pub fn add(&self, row: MenuRow) -> StoreOutcome {
        let item = row.item.clone();
        match self.try_add(row) {
            Ok(_) => StoreOutcome::ok(format!("✅ '{}' 메뉴가 성공적으로 추가되었습니다.", item)),
            Err(e) => {
                error!("Failed to add menu row: {}", e);
                StoreOutcome::failed(format!("❌ 메뉴 추가 중 오류가 발생했습니다: {}", e))
            }
        }
    }

    /// `!delete` entry point: always yields a chat message
    pub fn delete(&self, restaurant: &str, item: &str) -> StoreOutcome {
        match self.try_delete(restaurant, item) {
            Ok(_) => StoreOutcome::ok(format!(
                "✅ '{}' 식당의 '{}' 메뉴가 삭제되었습니다.",
                restaurant, item
            )),
            Err(e) => StoreOutcome::failed(failure_message(&e, "삭제")),
        }
    }

    /// `!modify` entry point: always yields a chat message
    pub fn modify(
        &self,
        restaurant: &str,
        item: &str,
        field_name: &str,
        new_value: &str,
    ) -> StoreOutcome {
        match self.try_modify(restaurant, item, field_name, new_value) {
            Ok(receipt) => StoreOutcome::ok(format!(
                "✅ '{}' 식당 '{}' 메뉴의 '{}' 항목이 '{}'(으)로 수정되었습니다.",
                restaurant, item, receipt.field, receipt.value
            )),
            Err(e) => StoreOutcome::failed(failure_message(&e, "수정")),
        }
    }
}

/// User-facing text for a failed delete/modify
fn failure_message(err: &StoreError, verb: &str) -> String {
    match err {
        StoreError::NotFound { restaurant, item } => {
            format!("❌ '{}' 식당의 '{}' 메뉴를 찾을 수 없습니다.", restaurant, item)
        }
        StoreError::InvalidField(field) => format!(
            "❌ '{}'은(는) 유효한 항목(열 이름)이 아닙니다. {} 중에서 선택해야 합니다.",
            field,
            quoted_columns()
        ),
        StoreError::FileMissing(_) => "❌ 메뉴 파일을 찾을 수 없습니다.".to_string(),
        other => {
            warn!("Menu {} failed: {}", verb, other);
            format!("❌ 메뉴 {} 중 오류가 발생했습니다: {}", verb, other)
        }
    }
}

/// Column names as `['식당 이름', '요일', ...]`
fn quoted_columns() -> String {
    let names: Vec<String> = MenuField::header()
        .iter()
        .map(|name| format!("'{}'", name))
        .collect();
    format!("[{}]", names.join(", "))
}
