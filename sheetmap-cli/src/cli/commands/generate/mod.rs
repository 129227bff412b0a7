mod handler;

use std::path::PathBuf;

use clap::Args;

use super::table::TableArgs;

pub use handler::{handle_generate_command, parse_map_pair};

#[derive(Args, Debug)]
pub struct GenerateCommands {
    /// Spreadsheet to read rows from
    #[arg(long)]
    pub excel: PathBuf,

    #[command(flatten)]
    pub table: TableArgs,

    /// Map target columns to spreadsheet columns with matching names (case-insensitive)
    #[arg(long)]
    pub auto_map: bool,

    /// Explicit mapping, `target=source` (repeatable, applied last)
    #[arg(long = "map", value_name = "TARGET=SOURCE")]
    pub map: Vec<String>,

    /// JSON file with a `{"target": "source"}` mapping
    #[arg(long, value_name = "FILE")]
    pub mapping: Option<PathBuf>,

    /// Write all statements to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print at most this many statements
    #[arg(long)]
    pub limit: Option<usize>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
