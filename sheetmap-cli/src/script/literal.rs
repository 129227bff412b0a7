//! SQL literal rendering for cell values

use crate::sheet::{CellValue, format_float};

/// Render a cell value as a literal SQL token
///
/// Strings and temporal values are single-quoted with embedded quotes
/// doubled. Numbers are written as-is, booleans as BIT literals, and null or
/// non-finite numbers as `NULL`.
pub fn sql_literal(value: Option<&CellValue>) -> String {
    match value {
        None | Some(CellValue::Null) => "NULL".to_string(),
        Some(CellValue::String(s)) => quote(s),
        Some(CellValue::DateTime(s)) | Some(CellValue::Duration(s)) => quote(s),
        Some(CellValue::Int(i)) => i.to_string(),
        Some(CellValue::Float(f)) if !f.is_finite() => "NULL".to_string(),
        Some(CellValue::Float(f)) => format_float(*f),
        Some(CellValue::Bool(b)) => if *b { "1" } else { "0" }.to_string(),
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_and_absent() {
        assert_eq!(sql_literal(None), "NULL");
        assert_eq!(sql_literal(Some(&CellValue::Null)), "NULL");
    }

    #[test]
    fn test_string_quote_doubling() {
        assert_eq!(
            sql_literal(Some(&CellValue::String("O'Brien".into()))),
            "'O''Brien'"
        );
        assert_eq!(sql_literal(Some(&CellValue::String("''".into()))), "''''''");
        assert_eq!(sql_literal(Some(&CellValue::String("plain".into()))), "'plain'");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(sql_literal(Some(&CellValue::Int(30))), "30");
        assert_eq!(sql_literal(Some(&CellValue::Float(30.0))), "30");
        assert_eq!(sql_literal(Some(&CellValue::Float(2.5))), "2.5");
        assert_eq!(sql_literal(Some(&CellValue::Float(f64::NAN))), "NULL");
    }

    #[test]
    fn test_bool_and_dates() {
        assert_eq!(sql_literal(Some(&CellValue::Bool(true))), "1");
        assert_eq!(sql_literal(Some(&CellValue::Bool(false))), "0");
        assert_eq!(
            sql_literal(Some(&CellValue::DateTime("2024-01-01".into()))),
            "'2024-01-01'"
        );
    }
}
