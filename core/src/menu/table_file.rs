//! Menu table file I/O
//!
//! Reads and rewrites the whole table as either an Excel workbook (first
//! sheet) or a CSV file. Writes go through a temporary file in the target
//! directory which is renamed into place.

use crate::menu::store::StoreError;
use crate::menu::{MenuField, MenuRow, MenuTable};
use crate::normalize::{normalize, CellValue};
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;
use std::io::Write;
use std::path::Path;

/// On-disk table format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Xlsx,
    Csv,
}

impl TableFormat {
    /// `.csv` selects CSV; everything else is treated as a workbook
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => TableFormat::Csv,
            _ => TableFormat::Xlsx,
        }
    }
}

/// Read the whole table
///
/// Returns `StoreError::FileMissing` when the file does not exist.
pub fn read_table(path: &Path) -> Result<MenuTable, StoreError> {
    if !path.exists() {
        return Err(StoreError::FileMissing(path.to_path_buf()));
    }

    let rows = match TableFormat::from_path(path) {
        TableFormat::Xlsx => read_xlsx(path)?,
        TableFormat::Csv => read_csv(path)?,
    };

    Ok(MenuTable::new(rows))
}

/// Rewrite the whole table (header first)
pub fn write_table(path: &Path, table: &MenuTable) -> Result<(), StoreError> {
    let bytes = match TableFormat::from_path(path) {
        TableFormat::Xlsx => encode_xlsx(table)?,
        TableFormat::Csv => encode_csv(table)?,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".menu-")
        .tempfile_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;

    Ok(())
}

fn read_xlsx(path: &Path) -> Result<Vec<MenuRow>, StoreError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| StoreError::Spreadsheet(format!("Failed to open workbook: {}", e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| StoreError::Spreadsheet("Workbook contains no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| StoreError::Spreadsheet(format!("Failed to read sheet '{}': {}", sheet_name, e)))?;

    let rows = range
        .rows()
        .skip(1)
        .filter(|cells| cells.iter().any(|cell| !matches!(cell, Data::Empty)))
        .map(|cells| {
            MenuRow::from_cells(
                MenuField::ALL
                    .into_iter()
                    .zip(cells)
                    .map(|(field, cell)| cell_text(field, cell)),
            )
        })
        .collect();

    Ok(rows)
}

/// Text form of a workbook cell in the given column
///
/// Numbers in the price and calorie columns are truncated to integers, so
/// both "4900.0" and "4500.5" read back without a decimal point. Other
/// columns keep whole floats integral and print fractions as-is.
fn cell_text(field: MenuField, cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) if field.is_numeric() => normalize(CellValue::Number(*n)),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                normalize(CellValue::Number(*n))
            } else {
                n.to_string()
            }
        }
        Data::Int(n) if field.is_numeric() => normalize(CellValue::Number(*n as f64)),
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn read_csv(path: &Path) -> Result<Vec<MenuRow>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        rows.push(MenuRow::from_cells(record.iter()));
    }

    Ok(rows)
}

fn encode_xlsx(table: &MenuTable) -> Result<Vec<u8>, StoreError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in MenuField::header().iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *name)
            .map_err(|e| StoreError::Spreadsheet(e.to_string()))?;
    }

    for (idx, row) in table.rows.iter().enumerate() {
        let row_num = (idx + 1) as u32;
        for (col, cell) in row.cells().iter().enumerate() {
            worksheet
                .write_string(row_num, col as u16, *cell)
                .map_err(|e| StoreError::Spreadsheet(e.to_string()))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| StoreError::Spreadsheet(format!("Failed to encode workbook: {}", e)))
}

fn encode_csv(table: &MenuTable) -> Result<Vec<u8>, StoreError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(MenuField::header())?;
    for row in &table.rows {
        writer.write_record(row.cells())?;
    }
    writer
        .into_inner()
        .map_err(|e| StoreError::Io(std::io::Error::new(e.error().kind(), e.error().to_string())))
}
