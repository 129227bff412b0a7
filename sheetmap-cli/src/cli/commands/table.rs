//! Target table flags shared by `columns` and `generate`

use anyhow::{Context, Result};
use clap::Args;
use is_terminal::IsTerminal;

use crate::config::Config;
use crate::schema::{ConnectionParams, MockSchema, MssqlSchema, SchemaSource};

#[derive(Args, Debug, Clone, Default)]
pub struct TableArgs {
    /// Comma-separated mock table columns instead of a live table
    #[arg(long, conflicts_with_all = ["server", "database", "username", "password"])]
    pub mock: Option<String>,

    /// SQL Server host, optionally with `,port` or `:port`
    #[arg(long)]
    pub server: Option<String>,

    #[arg(long)]
    pub database: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    /// Password (falls back to SHEETMAP_PASSWORD, then a prompt)
    #[arg(long)]
    pub password: Option<String>,

    /// Target table, optionally schema-qualified (dbo.Customers)
    #[arg(long)]
    pub table: Option<String>,

    /// Validate the server certificate instead of trusting it
    #[arg(long)]
    pub verify_cert: bool,
}

impl TableArgs {
    /// Whether the target columns come from a live server
    pub fn is_live(&self, config: &Config) -> bool {
        self.mock.is_none() && !(config.mock.enabled && self.server.is_none())
    }

    /// Table name from the flag, else the config
    pub fn table_name(&self, config: &Config) -> String {
        self.table
            .clone()
            .unwrap_or_else(|| config.connection.table.clone())
    }

    /// Connection parameters: flags over config over environment
    pub fn connection_params(&self, config: &Config) -> ConnectionParams {
        let mut params = config.connection_params();
        let overrides = [
            (&self.server, &mut params.server),
            (&self.database, &mut params.database),
            (&self.username, &mut params.username),
            (&self.table, &mut params.table),
        ];
        for (flag, field) in overrides {
            if let Some(value) = flag {
                *field = value.trim().to_string();
            }
        }
        if self.verify_cert {
            params.trust_cert = false;
        }
        params
    }

    /// Build the schema source these flags describe
    ///
    /// Live mode needs a password; it is taken from `--password`, then
    /// `SHEETMAP_PASSWORD`, then an interactive prompt.
    pub fn schema_source(&self, config: &Config) -> Result<Box<dyn SchemaSource>> {
        if !self.is_live(config) {
            let columns = self
                .mock
                .clone()
                .unwrap_or_else(|| config.mock.columns.clone());
            return Ok(Box::new(MockSchema::new(columns)));
        }

        let mut params = self.connection_params(config);
        params.address()?;
        params.validate()?;
        params.password = match self.password.clone().or_else(Config::env_password) {
            Some(password) => password,
            None => prompt_password(&params)?,
        };
        Ok(Box::new(MssqlSchema::new(params)))
    }
}

fn prompt_password(params: &ConnectionParams) -> Result<String> {
    if !std::io::stdin().is_terminal() {
        anyhow::bail!("No password given: use --password or set SHEETMAP_PASSWORD");
    }
    rpassword::prompt_password(format!("Password for {}@{}: ", params.username, params.server))
        .context("Failed to read password")
}
