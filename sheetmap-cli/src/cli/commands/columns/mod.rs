mod handler;

use std::path::PathBuf;

use clap::Args;

use super::table::TableArgs;

pub use handler::handle_columns_command;

#[derive(Args, Debug)]
pub struct ColumnsCommands {
    /// Print the header columns of this spreadsheet
    #[arg(long, conflicts_with = "mock")]
    pub excel: Option<PathBuf>,

    #[command(flatten)]
    pub table: TableArgs,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
