//! Configuration loaded from `config.toml` and the environment
//!
//! The file is optional and read-only; every field has a default. Connection
//! fields can be overridden with `SHEETMAP_*` environment variables (a
//! `.env` file in the working directory is honoured).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::schema::ConnectionParams;

/// Error from loading configuration
#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Invalid config {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub mock: MockConfig,
    pub output: OutputConfig,
}

/// Defaults for the live table connection form (the password is never read
/// from the file)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub server: String,
    pub database: String,
    pub username: String,
    pub table: String,
    pub trust_cert: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            database: String::new(),
            username: String::new(),
            table: String::new(),
            trust_cert: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Start the shell in mock mode
    pub enabled: bool,
    /// Initial mock column list
    pub columns: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            columns: "id, name, age".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Statements shown in the preview before truncating
    pub preview_limit: usize,
    /// Table name used when none is known
    pub default_table: String,
    /// Where the shell writes the full script
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            preview_limit: 10,
            default_table: crate::script::DEFAULT_TABLE.to_string(),
            path: PathBuf::from("inserts.sql"),
        }
    }
}

impl Config {
    /// Default location: `<config dir>/sheetmap/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sheetmap").join("config.toml"))
    }

    /// Load from `path`, or the default location, then apply environment
    /// overrides. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path(),
        };

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Config::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Override connection defaults from `SHEETMAP_*` variables
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields: [(&str, &mut String); 4] = [
            ("SHEETMAP_SERVER", &mut self.connection.server),
            ("SHEETMAP_DATABASE", &mut self.connection.database),
            ("SHEETMAP_USERNAME", &mut self.connection.username),
            ("SHEETMAP_TABLE", &mut self.connection.table),
        ];
        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *field = value;
            }
        }
    }

    /// Password from `SHEETMAP_PASSWORD`, if set
    pub fn env_password() -> Option<String> {
        std::env::var("SHEETMAP_PASSWORD").ok().filter(|p| !p.is_empty())
    }

    /// Connection parameters seeded from this config
    pub fn connection_params(&self) -> ConnectionParams {
        ConnectionParams {
            server: self.connection.server.clone(),
            database: self.connection.database.clone(),
            username: self.connection.username.clone(),
            password: String::new(),
            table: self.connection.table.clone(),
            trust_cert: self.connection.trust_cert,
        }
    }
}
