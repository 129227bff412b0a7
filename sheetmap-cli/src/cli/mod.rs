//! Command-line interface

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::columns::ColumnsCommands;
use commands::generate::GenerateCommands;

#[derive(Parser, Debug)]
#[command(name = "sheetmap", version, about = "Map spreadsheet columns onto a SQL table and generate INSERT scripts")]
pub struct Cli {
    /// Config file (defaults to <config dir>/sheetmap/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive mapper (default)
    Tui {
        /// Spreadsheet to import on startup
        #[arg(long)]
        excel: Option<PathBuf>,
    },
    /// Print spreadsheet or table columns
    Columns(ColumnsCommands),
    /// Generate INSERT statements from a spreadsheet
    ///
    /// Values are inlined as literal SQL, not parameters. Review the output
    /// before running it against a database.
    Generate(GenerateCommands),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["sheetmap"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_generate_args() {
        let cli = Cli::try_parse_from([
            "sheetmap",
            "generate",
            "--excel",
            "people.xlsx",
            "--mock",
            "id, name",
            "--map",
            "name=Name",
            "--map",
            "id=Id",
            "--limit",
            "5",
        ])
        .unwrap();
        let Some(Commands::Generate(args)) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.excel, PathBuf::from("people.xlsx"));
        assert_eq!(args.table.mock.as_deref(), Some("id, name"));
        assert_eq!(args.map, vec!["name=Name", "id=Id"]);
        assert_eq!(args.limit, Some(5));
        assert!(!args.auto_map);
    }

    #[test]
    fn test_mock_conflicts_with_server() {
        let result = Cli::try_parse_from([
            "sheetmap", "columns", "--mock", "a,b", "--server", "localhost",
        ]);
        assert!(result.is_err());
    }
}
