//! Target table schema sources
//!
//! A schema source yields the ordered column list of the table the INSERT
//! statements are written for: either from a live SQL Server connection or
//! from a typed comma-separated list (mock mode).

mod mock;
mod mssql;

use async_trait::async_trait;

pub use mock::{MockSchema, parse_mock_columns};
pub use mssql::{ConnectionParams, MssqlSchema, quote_table_name};

/// Error from fetching table columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Mock column list is empty after trimming
    EmptyMockColumns,
    /// A required connection parameter is blank
    MissingParameter(&'static str),
    /// Host/port could not be understood
    InvalidAddress(String),
    /// Could not reach or log in to the server
    Connection(String),
    /// The column query failed
    Query { table: String, message: String },
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::EmptyMockColumns => write!(f, "Mock column list is empty"),
            SchemaError::MissingParameter(name) => {
                write!(f, "Missing connection parameter: {}", name)
            }
            SchemaError::InvalidAddress(addr) => write!(f, "Invalid server address: {}", addr),
            SchemaError::Connection(message) => {
                write!(f, "Failed to fetch table columns: could not connect: {}", message)
            }
            SchemaError::Query { table, message } => {
                write!(f, "Failed to fetch table columns for {}: {}", table, message)
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// Anything that can list the columns of the target table
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Human-readable description for log lines
    fn describe(&self) -> String;

    /// Column names of the target table, in table order
    async fn table_columns(&self) -> Result<Vec<String>, SchemaError>;
}
