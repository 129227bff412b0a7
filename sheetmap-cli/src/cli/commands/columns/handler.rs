//! Columns command handler

use anyhow::{Context, Result};
use colored::*;

use super::ColumnsCommands;
use crate::config::Config;
use crate::sheet::read_sheet;

/// Print spreadsheet columns (with `--excel`) or target table columns
pub async fn handle_columns_command(args: ColumnsCommands, config: &Config) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    if let Some(path) = args.excel {
        let data = tokio::task::spawn_blocking(move || read_sheet(&path))
            .await
            .context("Spreadsheet reader task failed")??;
        eprintln!(
            "{} {} ({} rows)",
            "Sheet".bold(),
            data.sheet_name().cyan(),
            data.row_count()
        );
        print_columns(data.columns());
        return Ok(());
    }

    let source = args.table.schema_source(config)?;
    log::info!("Fetching columns of {}", source.describe());
    let columns = source
        .table_columns()
        .await
        .with_context(|| format!("Failed to load columns of {}", source.describe()))?;
    eprintln!("{} {}", "Table".bold(), source.describe().cyan());
    print_columns(&columns);
    Ok(())
}

fn print_columns(columns: &[String]) {
    for column in columns {
        println!("{}", column);
    }
    eprintln!("{}", format!("{} columns", columns.len()).dimmed());
}
