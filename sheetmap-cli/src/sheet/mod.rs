//! Spreadsheet input
//!
//! Loads the first sheet of a workbook as an ordered list of column names
//! plus row data. Everything downstream addresses cells by column name.

mod reader;
mod value;

use std::collections::HashMap;

pub use reader::read_sheet;
pub use value::{CellValue, format_float};

/// Error from reading a spreadsheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    /// Path does not point at a file
    NotFound(String),
    /// The workbook could not be opened or parsed
    Open { path: String, message: String },
    /// The workbook contains no sheets
    NoSheets,
    /// The first sheet could not be read
    Sheet { sheet: String, message: String },
}

impl std::fmt::Display for SheetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetError::NotFound(path) => write!(f, "Invalid Excel file path: {}", path),
            SheetError::Open { path, message } => {
                write!(f, "Failed to read Excel file {}: {}", path, message)
            }
            SheetError::NoSheets => write!(f, "Excel file has no sheets"),
            SheetError::Sheet { sheet, message } => {
                write!(f, "Failed to read sheet '{}': {}", sheet, message)
            }
        }
    }
}

impl std::error::Error for SheetError {}

/// Column names and rows of one sheet
#[derive(Debug, Clone, Default)]
pub struct SheetData {
    sheet_name: String,
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<CellValue>>,
}

impl SheetData {
    /// Build sheet data; every row must be as wide as `columns`
    pub fn new(sheet_name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Self {
            sheet_name: sheet_name.into(),
            columns,
            index,
            rows,
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column, if the sheet has it
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, idx: usize) -> Option<RowRef<'_>> {
        self.rows.get(idx).map(|values| RowRef { sheet: self, values })
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> {
        self.rows.iter().map(move |values| RowRef { sheet: self, values })
    }
}

/// Borrowed view of one row, addressable by column name
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    sheet: &'a SheetData,
    values: &'a [CellValue],
}

impl<'a> RowRef<'a> {
    /// Value under `column`; `None` when the sheet has no such column
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        self.sheet
            .column_index(column)
            .and_then(|idx| self.values.get(idx))
    }

    /// Value at a column position
    pub fn at(&self, idx: usize) -> Option<&'a CellValue> {
        self.values.get(idx)
    }

    /// `(column, value)` pairs in sheet column order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a CellValue)> + 'a {
        self.sheet
            .columns()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_lookup_by_name() {
        let data = SheetData::new(
            "Sheet1",
            vec!["Name".into(), "Age".into()],
            vec![vec![CellValue::String("Ann".into()), CellValue::Int(41)]],
        );
        let row = data.row(0).unwrap();
        assert_eq!(row.get("Age"), Some(&CellValue::Int(41)));
        assert_eq!(row.get("age"), None);
        assert_eq!(row.at(0), Some(&CellValue::String("Ann".into())));

        let pairs: Vec<_> = row.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("Name", &CellValue::String("Ann".into())),
                ("Age", &CellValue::Int(41)),
            ]
        );
        assert!(data.row(1).is_none());
    }
}
