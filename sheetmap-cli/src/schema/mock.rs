use async_trait::async_trait;

use super::{SchemaError, SchemaSource};

/// Split a typed comma-separated column list, trimming and dropping blanks
pub fn parse_mock_columns(input: &str) -> Result<Vec<String>, SchemaError> {
    let columns: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();

    if columns.is_empty() {
        return Err(SchemaError::EmptyMockColumns);
    }
    Ok(columns)
}

/// Schema source backed by a typed column list
#[derive(Debug, Clone)]
pub struct MockSchema {
    columns: String,
}

impl MockSchema {
    pub fn new(columns: impl Into<String>) -> Self {
        Self {
            columns: columns.into(),
        }
    }
}

#[async_trait]
impl SchemaSource for MockSchema {
    fn describe(&self) -> String {
        "mock table".to_string()
    }

    async fn table_columns(&self) -> Result<Vec<String>, SchemaError> {
        parse_mock_columns(&self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_drops_blanks() {
        assert_eq!(
            parse_mock_columns(" id, name ,, age ,").unwrap(),
            vec!["id", "name", "age"]
        );
    }

    #[test]
    fn test_parse_empty_is_error() {
        assert_eq!(parse_mock_columns(""), Err(SchemaError::EmptyMockColumns));
        assert_eq!(parse_mock_columns(" , ,"), Err(SchemaError::EmptyMockColumns));
    }
}
