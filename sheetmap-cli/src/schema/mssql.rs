//! SQL Server column introspection (via Tiberius)

use async_trait::async_trait;
use futures::TryStreamExt;
use tiberius::{AuthMethod, Client, Config, QueryItem};
use tokio::net::TcpStream;
use tokio_util::compat::TokioAsyncWriteCompatExt;

use super::{SchemaError, SchemaSource};

const DEFAULT_PORT: u16 = 1433;

/// Connection parameters for a live table
#[derive(Debug, Clone, Default)]
pub struct ConnectionParams {
    /// `host`, `host,port` or `host:port`
    pub server: String,
    pub database: String,
    pub username: String,
    pub password: String,
    /// Table name, optionally schema-qualified (`dbo.Customers`)
    pub table: String,
    /// Accept the server certificate without validation
    pub trust_cert: bool,
}

impl ConnectionParams {
    /// Split `server` into host and port
    pub fn address(&self) -> Result<(String, u16), SchemaError> {
        let server = self.server.trim();
        if server.is_empty() {
            return Err(SchemaError::MissingParameter("server"));
        }

        let split = server.rsplit_once(',').or_else(|| server.rsplit_once(':'));
        match split {
            Some((host, port)) => {
                let port = port
                    .trim()
                    .parse::<u16>()
                    .map_err(|_| SchemaError::InvalidAddress(server.to_string()))?;
                let host = host.trim();
                if host.is_empty() {
                    return Err(SchemaError::InvalidAddress(server.to_string()));
                }
                Ok((host.to_string(), port))
            }
            None => Ok((server.to_string(), DEFAULT_PORT)),
        }
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.username.trim().is_empty() {
            return Err(SchemaError::MissingParameter("username"));
        }
        if self.table.trim().is_empty() {
            return Err(SchemaError::MissingParameter("table"));
        }
        Ok(())
    }
}

/// Bracket-quote each part of a (possibly dotted) table name
///
/// `dbo.Customers` becomes `[dbo].[Customers]`; parts that are already
/// bracketed are kept and a `]` inside an unbracketed part is doubled.
pub fn quote_table_name(table: &str) -> String {
    split_name_parts(table.trim())
        .into_iter()
        .map(|part| {
            let part = part.trim();
            if part.len() >= 2 && part.starts_with('[') && part.ends_with(']') {
                part.to_string()
            } else {
                format!("[{}]", part.replace(']', "]]"))
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Split on dots that are not inside brackets
fn split_name_parts(name: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_brackets = false;
    let mut start = 0;

    for (i, c) in name.char_indices() {
        match c {
            '[' => in_brackets = true,
            ']' => in_brackets = false,
            '.' if !in_brackets => {
                parts.push(&name[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&name[start..]);
    parts
}

/// Schema source reading a table's columns from SQL Server
#[derive(Debug, Clone)]
pub struct MssqlSchema {
    params: ConnectionParams,
}

impl MssqlSchema {
    pub fn new(params: ConnectionParams) -> Self {
        Self { params }
    }
}

#[async_trait]
impl SchemaSource for MssqlSchema {
    fn describe(&self) -> String {
        format!(
            "{} on {}/{}",
            self.params.table.trim(),
            self.params.server.trim(),
            self.params.database.trim()
        )
    }

    async fn table_columns(&self) -> Result<Vec<String>, SchemaError> {
        let params = &self.params;
        let (host, port) = params.address()?;
        params.validate()?;

        let mut config = Config::new();
        config.host(&host);
        config.port(port);
        config.authentication(AuthMethod::sql_server(&params.username, &params.password));
        if params.trust_cert {
            config.trust_cert();
        }
        if !params.database.trim().is_empty() {
            config.database(params.database.trim());
        }

        log::debug!("Connecting to {}:{}", host, port);
        let tcp = TcpStream::connect(config.get_addr())
            .await
            .map_err(|e| SchemaError::Connection(e.to_string()))?;
        tcp.set_nodelay(true)
            .map_err(|e| SchemaError::Connection(e.to_string()))?;

        let mut client = Client::connect(config, tcp.compat_write())
            .await
            .map_err(|e| SchemaError::Connection(e.to_string()))?;

        let table = quote_table_name(&params.table);
        let query = format!("SELECT TOP 0 * FROM {}", table);
        let query_error = |e: tiberius::error::Error| SchemaError::Query {
            table: table.clone(),
            message: e.to_string(),
        };

        let mut stream = client.simple_query(query).await.map_err(query_error)?;

        let mut columns = Vec::new();
        while let Some(item) = stream.try_next().await.map_err(query_error)? {
            if let QueryItem::Metadata(meta) = item {
                if columns.is_empty() {
                    columns = meta.columns().iter().map(|c| c.name().to_string()).collect();
                }
            }
        }

        log::info!("Fetched {} columns for {}", columns.len(), table);
        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(server: &str) -> ConnectionParams {
        ConnectionParams {
            server: server.to_string(),
            username: "sa".to_string(),
            table: "People".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_address_forms() {
        assert_eq!(params("db01").address().unwrap(), ("db01".to_string(), 1433));
        assert_eq!(params("db01,1444").address().unwrap(), ("db01".to_string(), 1444));
        assert_eq!(params("db01:1555").address().unwrap(), ("db01".to_string(), 1555));
        assert_eq!(
            params(" ").address(),
            Err(SchemaError::MissingParameter("server"))
        );
        assert!(matches!(
            params("db01,abc").address(),
            Err(SchemaError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_validate_requires_user_and_table() {
        let mut p = params("db01");
        assert!(p.validate().is_ok());
        p.table = String::new();
        assert_eq!(p.validate(), Err(SchemaError::MissingParameter("table")));
        p.username = String::new();
        assert_eq!(p.validate(), Err(SchemaError::MissingParameter("username")));
    }

    #[test]
    fn test_quote_table_name() {
        assert_eq!(quote_table_name("People"), "[People]");
        assert_eq!(quote_table_name("dbo.People"), "[dbo].[People]");
        assert_eq!(quote_table_name("[dbo].[My.Table]"), "[dbo].[My.Table]");
        assert_eq!(quote_table_name("odd]name"), "[odd]]name]");
        assert_eq!(quote_table_name("x; DROP TABLE y"), "[x; DROP TABLE y]");
    }

    #[tokio::test]
    async fn test_missing_parameters_fail_before_connecting() {
        let schema = MssqlSchema::new(ConnectionParams {
            server: "localhost".to_string(),
            ..Default::default()
        });
        assert_eq!(
            schema.table_columns().await,
            Err(SchemaError::MissingParameter("username"))
        );
    }
}
