mod cli;
mod config;
mod error;
mod mapping;
mod schema;
mod script;
mod sheet;
mod tui;

use std::fs::OpenOptions;
use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;

use cli::commands::columns::handle_columns_command;
use cli::commands::generate::handle_generate_command;
use cli::{Cli, Commands};
use config::Config;
use tui::apps::mapper::{InitParams, MapperApp};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui { excel: None });

    match &command {
        Commands::Tui { .. } => init_file_logger(),
        _ => init_stderr_logger(),
    }

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    match command {
        Commands::Tui { excel } => {
            log::info!("Starting interactive mapper");
            tui::run::<MapperApp>(runtime.handle().clone(), InitParams { config, excel })
        }
        Commands::Columns(args) => runtime.block_on(handle_columns_command(args, &config)),
        Commands::Generate(args) => runtime.block_on(handle_generate_command(args, &config)),
    }
}

/// CLI commands log to stderr, filtered by RUST_LOG
fn init_stderr_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

/// The TUI owns the terminal, so its log goes to `<cache dir>/sheetmap/sheetmap.log`
fn init_file_logger() {
    let Some(dir) = dirs::cache_dir().map(|d| d.join("sheetmap")) else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("sheetmap.log"))
    else {
        return;
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}
