//! Generate command handler

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;

use super::GenerateCommands;
use crate::config::Config;
use crate::error::AppError;
use crate::mapping::Mapping;
use crate::script;
use crate::sheet::{SheetData, read_sheet};

/// Build a mapping from flags and print or write the INSERT statements
pub async fn handle_generate_command(args: GenerateCommands, config: &Config) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let excel = args.excel.clone();
    let data = tokio::task::spawn_blocking(move || read_sheet(&excel))
        .await
        .context("Spreadsheet reader task failed")??;
    log::info!(
        "Loaded Excel columns: [{}]",
        data.columns().join(", ")
    );

    let source = args.table.schema_source(config)?;
    let target_columns = source
        .table_columns()
        .await
        .with_context(|| format!("Failed to load columns of {}", source.describe()))?;
    log::info!("Loaded table columns: [{}]", target_columns.join(", "));

    let mapping = build_mapping(&args, &target_columns, &data)?;
    warn_unknown_columns(&mapping, &target_columns, &data);

    script::ensure_ready(&target_columns, &mapping, Some(&data))?;

    let table_name = args.table.table_name(config);
    let table = script::table_name_or(&table_name, &config.output.default_table);
    let scripts = script::generate_insert_scripts(table, &target_columns, &mapping, &data);

    match &args.output {
        Some(path) => {
            script::write_scripts(path, &scripts)?;
            eprintln!(
                "{} {} SQL insert statements to {}",
                "Wrote".green().bold(),
                scripts.len(),
                path.display().to_string().cyan()
            );
        }
        None => {
            let text = match args.limit {
                Some(limit) => script::preview(&scripts, limit),
                None => scripts.join("\n"),
            };
            if !text.is_empty() {
                println!("{}", text);
            }
            eprintln!(
                "{}",
                format!("Generated {} SQL insert statements.", scripts.len()).green()
            );
        }
    }
    Ok(())
}

/// Auto-map first, then the mapping file, then `--map` pairs
fn build_mapping(
    args: &GenerateCommands,
    target_columns: &[String],
    data: &SheetData,
) -> Result<Mapping> {
    let mut mapping = Mapping::new();

    if args.auto_map {
        let count = mapping.auto_map(target_columns, data.columns());
        log::info!("Auto-mapped {} matching columns (case-insensitive)", count);
    }

    if let Some(path) = &args.mapping {
        for (target, source) in read_mapping_file(path)?.iter() {
            mapping.set(target, source);
        }
    }

    for pair in &args.map {
        let (target, source) = parse_map_pair(pair)?;
        if let Some(previous) = mapping.set(target, source) {
            if previous != source {
                log::warn!("Replaced mapping: {} -> {}", previous, target);
            }
        }
    }

    Ok(mapping)
}

fn read_mapping_file(path: &Path) -> Result<Mapping> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read mapping file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid mapping file: {}", path.display()))
}

/// Split `target=source`, trimming both sides
pub fn parse_map_pair(pair: &str) -> Result<(&str, &str), AppError> {
    let invalid = || AppError::Input(format!("Invalid mapping '{}': expected target=source", pair));
    let (target, source) = pair.split_once('=').ok_or_else(invalid)?;
    let (target, source) = (target.trim(), source.trim());
    if target.is_empty() || source.is_empty() {
        return Err(invalid());
    }
    Ok((target, source))
}

/// Entries whose endpoints are missing still generate, as NULL columns or skipped targets
fn warn_unknown_columns(mapping: &Mapping, target_columns: &[String], data: &SheetData) {
    for (target, source) in mapping.iter() {
        if !target_columns.iter().any(|c| c == target) {
            eprintln!(
                "{} target column '{}' is not in the table and will be ignored",
                "warning:".yellow().bold(),
                target
            );
        }
        if data.column_index(source).is_none() {
            eprintln!(
                "{} source column '{}' is not in the spreadsheet; '{}' will be NULL",
                "warning:".yellow().bold(),
                source,
                target
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::table::TableArgs;
    use crate::sheet::CellValue;

    fn args() -> GenerateCommands {
        GenerateCommands {
            excel: "people.xlsx".into(),
            table: TableArgs::default(),
            auto_map: false,
            map: Vec::new(),
            mapping: None,
            output: None,
            limit: None,
            no_color: true,
        }
    }

    fn people() -> SheetData {
        SheetData::new(
            "Sheet1",
            vec!["Name".into(), "Age".into(), "Mail".into()],
            vec![vec![
                CellValue::String("Ada".into()),
                CellValue::Int(36),
                CellValue::Null,
            ]],
        )
    }

    fn targets() -> Vec<String> {
        vec!["id".into(), "name".into(), "age".into(), "email".into()]
    }

    #[test]
    fn test_parse_map_pair() {
        assert_eq!(parse_map_pair("email = Mail").unwrap(), ("email", "Mail"));
        assert!(parse_map_pair("email").is_err());
        assert!(parse_map_pair("=Mail").is_err());
        assert_eq!(
            parse_map_pair("email=").unwrap_err().to_string(),
            "Invalid mapping 'email=': expected target=source"
        );
    }

    #[test]
    fn test_explicit_pairs_override_auto_map() {
        let mut args = args();
        args.auto_map = true;
        args.map = vec!["email=Mail".into(), "name=Mail".into()];

        let mapping = build_mapping(&args, &targets(), &people()).unwrap();
        assert_eq!(mapping.source_for("age"), Some("Age"));
        assert_eq!(mapping.source_for("email"), Some("Mail"));
        assert_eq!(mapping.source_for("name"), Some("Mail"));
        assert!(!mapping.contains("id"));
    }

    #[test]
    fn test_mapping_file() {
        let path = std::env::temp_dir().join(format!("sheetmap-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{"name": "Name", "email": "Mail"}"#).unwrap();

        let mut args = args();
        args.mapping = Some(path.clone());
        args.map = vec!["email=Name".into()];

        let mapping = build_mapping(&args, &targets(), &people()).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.source_for("email"), Some("Name"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_bad_pair_is_an_error() {
        let mut args = args();
        args.map = vec!["nonsense".into()];
        assert!(build_mapping(&args, &targets(), &people()).is_err());
    }
}
