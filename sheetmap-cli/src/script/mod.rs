//! INSERT script generation
//!
//! Produces one literal `INSERT INTO ... VALUES (...)` statement per
//! spreadsheet row. Values are inlined, not bound: the output is meant for
//! manual review and is unsafe to run against untrusted spreadsheet data.

mod literal;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::mapping::Mapping;
use crate::sheet::SheetData;

pub use literal::sql_literal;

/// Table name used when none is known (e.g. mock mode with a blank table)
pub const DEFAULT_TABLE: &str = "TargetTable";

/// Error from checking generation preconditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptError {
    /// No target column has a source
    EmptyMapping,
    /// No spreadsheet has been loaded
    NoRows,
    /// The target table has no columns
    NoTargetColumns,
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptError::EmptyMapping | ScriptError::NoRows => {
                write!(f, "Missing mapping or Excel data.")
            }
            ScriptError::NoTargetColumns => write!(f, "Target table has no columns."),
        }
    }
}

impl std::error::Error for ScriptError {}

/// Reject generation when there is nothing to generate from
pub fn ensure_ready(
    target_columns: &[String],
    mapping: &Mapping,
    data: Option<&SheetData>,
) -> Result<(), ScriptError> {
    if mapping.is_empty() {
        return Err(ScriptError::EmptyMapping);
    }
    if data.is_none() {
        return Err(ScriptError::NoRows);
    }
    if target_columns.is_empty() {
        return Err(ScriptError::NoTargetColumns);
    }
    Ok(())
}

/// Table name to emit, falling back to `fallback` when blank
pub fn table_name_or<'a>(table: &'a str, fallback: &'a str) -> &'a str {
    let table = table.trim();
    if table.is_empty() { fallback } else { table }
}

/// Generate one INSERT statement per row of `data`
///
/// Columns are listed in `target_columns` order. A target with no mapping
/// entry, a mapped source the sheet does not have, or a null cell all
/// produce `NULL`.
pub fn generate_insert_scripts(
    table: &str,
    target_columns: &[String],
    mapping: &Mapping,
    data: &SheetData,
) -> Vec<String> {
    let column_list = target_columns.join(", ");

    // Resolve each target to a sheet column position once
    let positions: Vec<Option<usize>> = target_columns
        .iter()
        .map(|target| {
            mapping
                .source_for(target)
                .and_then(|source| data.column_index(source))
        })
        .collect();

    data.rows()
        .map(|row| {
            let values: Vec<String> = positions
                .iter()
                .map(|pos| sql_literal(pos.and_then(|idx| row.at(idx))))
                .collect();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table,
                column_list,
                values.join(", ")
            )
        })
        .collect()
}

/// First `limit` statements joined by newlines, marking truncation
pub fn preview(scripts: &[String], limit: usize) -> String {
    let mut text = scripts
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");
    if scripts.len() > limit {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str("... (truncated)");
    }
    text
}

/// Write every statement, newline-terminated, to `path`
pub fn write_scripts<P: AsRef<Path>>(path: P, scripts: &[String]) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create script file: {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);
    for script in scripts {
        writeln!(writer, "{}", script)
            .with_context(|| format!("Failed to write script file: {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write script file: {}", path.display()))?;
    Ok(())
}
