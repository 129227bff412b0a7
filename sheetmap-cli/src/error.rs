//! Application error taxonomy
//!
//! Input errors and external-system errors abort the triggering action and
//! are surfaced to the user; precondition errors are rejected before any work
//! starts. None of them end the interactive session.

use crate::config::ConfigError;
use crate::schema::SchemaError;
use crate::script::ScriptError;
use crate::sheet::SheetError;

#[derive(Debug)]
pub enum AppError {
    /// Bad user input (path, mock list, mapping pair)
    Input(String),
    Sheet(SheetError),
    Schema(SchemaError),
    Script(ScriptError),
    Config(ConfigError),
}

/// Broad class of an error, used to pick how it is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    External,
    Precondition,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Input(_) | AppError::Config(_) => ErrorKind::Input,
            AppError::Sheet(SheetError::NotFound(_)) => ErrorKind::Input,
            AppError::Schema(SchemaError::EmptyMockColumns)
            | AppError::Schema(SchemaError::MissingParameter(_))
            | AppError::Schema(SchemaError::InvalidAddress(_)) => ErrorKind::Input,
            AppError::Sheet(_) | AppError::Schema(_) => ErrorKind::External,
            AppError::Script(_) => ErrorKind::Precondition,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Input(message) => write!(f, "{}", message),
            AppError::Sheet(e) => write!(f, "{}", e),
            AppError::Schema(e) => write!(f, "{}", e),
            AppError::Script(e) => write!(f, "{}", e),
            AppError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Input(_) => None,
            AppError::Sheet(e) => Some(e),
            AppError::Schema(e) => Some(e),
            AppError::Script(e) => Some(e),
            AppError::Config(e) => Some(e),
        }
    }
}

impl From<SheetError> for AppError {
    fn from(e: SheetError) -> Self {
        AppError::Sheet(e)
    }
}

impl From<SchemaError> for AppError {
    fn from(e: SchemaError) -> Self {
        AppError::Schema(e)
    }
}

impl From<ScriptError> for AppError {
    fn from(e: ScriptError) -> Self {
        AppError::Script(e)
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            AppError::from(SheetError::NotFound("x.xlsx".into())).kind(),
            ErrorKind::Input
        );
        assert_eq!(
            AppError::from(SheetError::NoSheets).kind(),
            ErrorKind::External
        );
        assert_eq!(
            AppError::from(SchemaError::EmptyMockColumns).kind(),
            ErrorKind::Input
        );
        assert_eq!(
            AppError::from(SchemaError::Connection("refused".into())).kind(),
            ErrorKind::External
        );
        assert_eq!(
            AppError::from(ScriptError::EmptyMapping).kind(),
            ErrorKind::Precondition
        );
    }

    #[test]
    fn test_display_passes_through() {
        let err = AppError::from(ScriptError::NoRows);
        assert_eq!(err.to_string(), "Missing mapping or Excel data.");
    }
}
