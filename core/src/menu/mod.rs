//! Menu table model
//!
//! A menu table is an ordered list of rows with seven fixed text columns.
//! Rows are located by the (restaurant, item) pair; the pair is not unique.

pub mod store;
pub mod table_file;

pub use store::{MenuStore, ModifyReceipt, StoreError, StoreOutcome};
pub use table_file::TableFormat;

use serde::{Deserialize, Serialize};

/// One column of the menu table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuField {
    Restaurant,
    Day,
    Item,
    Price,
    Calories,
    Category,
    Taste,
}

/// Accepted column names, including space-omitted and English spellings
const FIELD_SYNONYMS: &[(&str, MenuField)] = &[
    ("식당 이름", MenuField::Restaurant),
    ("식당이름", MenuField::Restaurant),
    ("restaurant", MenuField::Restaurant),
    ("요일", MenuField::Day),
    ("day", MenuField::Day),
    ("메뉴", MenuField::Item),
    ("menu", MenuField::Item),
    ("item", MenuField::Item),
    ("가격", MenuField::Price),
    ("price", MenuField::Price),
    ("칼로리", MenuField::Calories),
    ("calories", MenuField::Calories),
    ("음식의 종류", MenuField::Category),
    ("음식의종류", MenuField::Category),
    ("category", MenuField::Category),
    ("맛", MenuField::Taste),
    ("taste", MenuField::Taste),
];

impl MenuField {
    /// All columns in file order
    pub const ALL: [MenuField; 7] = [
        MenuField::Restaurant,
        MenuField::Day,
        MenuField::Item,
        MenuField::Price,
        MenuField::Calories,
        MenuField::Category,
        MenuField::Taste,
    ];

    /// Canonical header text for this column
    pub fn column_name(self) -> &'static str {
        match self {
            MenuField::Restaurant => "식당 이름",
            MenuField::Day => "요일",
            MenuField::Item => "메뉴",
            MenuField::Price => "가격",
            MenuField::Calories => "칼로리",
            MenuField::Category => "음식의 종류",
            MenuField::Taste => "맛",
        }
    }

    /// Resolve a user-supplied column name
    ///
    /// Returns `None` for anything outside the synonym table.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        FIELD_SYNONYMS
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
            .map(|(_, field)| *field)
    }

    /// Price and calories are normalized before they are stored
    pub fn is_numeric(self) -> bool {
        matches!(self, MenuField::Price | MenuField::Calories)
    }

    /// Canonical header row
    pub fn header() -> [&'static str; 7] {
        Self::ALL.map(MenuField::column_name)
    }
}

impl std::fmt::Display for MenuField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column_name())
    }
}

/// A single menu row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuRow {
    pub restaurant: String,
    pub day: String,
    pub item: String,
    pub price: String,
    pub calories: String,
    pub category: String,
    pub taste: String,
}

impl MenuRow {
    /// Build a row from cells in column order
    ///
    /// Missing trailing cells become empty strings; extra cells are ignored.
    pub fn from_cells<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row = MenuRow::default();
        for (field, cell) in MenuField::ALL.into_iter().zip(cells) {
            row.set(field, cell.into());
        }
        row
    }

    /// Cells in column order
    pub fn cells(&self) -> [&str; 7] {
        MenuField::ALL.map(|field| self.get(field))
    }

    pub fn get(&self, field: MenuField) -> &str {
        match field {
            MenuField::Restaurant => &self.restaurant,
            MenuField::Day => &self.day,
            MenuField::Item => &self.item,
            MenuField::Price => &self.price,
            MenuField::Calories => &self.calories,
            MenuField::Category => &self.category,
            MenuField::Taste => &self.taste,
        }
    }

    pub fn set(&mut self, field: MenuField, value: String) {
        let slot = match field {
            MenuField::Restaurant => &mut self.restaurant,
            MenuField::Day => &mut self.day,
            MenuField::Item => &mut self.item,
            MenuField::Price => &mut self.price,
            MenuField::Calories => &mut self.calories,
            MenuField::Category => &mut self.category,
            MenuField::Taste => &mut self.taste,
        };
        *slot = value;
    }

    /// Exact, case-sensitive key match
    pub fn matches(&self, restaurant: &str, item: &str) -> bool {
        self.restaurant == restaurant && self.item == item
    }
}

/// The whole menu table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuTable {
    pub rows: Vec<MenuRow>,
}

impl MenuTable {
    pub fn new(rows: Vec<MenuRow>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Indices of rows matching the key
    pub fn find(&self, restaurant: &str, item: &str) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.matches(restaurant, item))
            .map(|(idx, _)| idx)
            .collect()
    }
}
