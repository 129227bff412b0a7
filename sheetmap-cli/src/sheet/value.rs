//! Spreadsheet cell value representation

use calamine::Data;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// A scalar value read from a spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty cell, empty string or error cell
    Null,
    /// Text
    String(String),
    /// Whole number
    Int(i64),
    /// Floating point
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Date and/or time, ISO-8601 text
    DateTime(String),
    /// Duration, ISO-8601 text
    Duration(String),
}

impl CellValue {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Null
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => write!(f, "(null)"),
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(fl) => write!(f, "{}", format_float(*fl)),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::DateTime(s) | CellValue::Duration(s) => write!(f, "{}", s),
        }
    }
}

/// Render a float, dropping the fraction of whole numbers (30.0 -> "30")
pub fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Null,
            Data::String(s) if s.is_empty() => CellValue::Null,
            Data::String(s) => CellValue::String(s.clone()),
            Data::Int(i) => CellValue::Int(*i),
            Data::Float(f) => CellValue::Float(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => {
                if dt.is_duration() {
                    CellValue::Duration(serial_to_duration(dt.as_f64()))
                } else {
                    match serial_to_datetime(dt.as_f64()) {
                        Some(ndt) => CellValue::DateTime(format_datetime(ndt)),
                        None => CellValue::Null,
                    }
                }
            }
            Data::DateTimeIso(s) => CellValue::DateTime(normalize_iso_datetime(s)),
            Data::DurationIso(s) => CellValue::Duration(s.clone()),
            Data::Error(_) => CellValue::Null,
        }
    }
}

/// Convert an Excel serial date (1900 date system) to a timestamp
fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    // Serial 0 is 1899-12-30 once the 1900 leap-year bug is accounted for
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}

fn format_datetime(ndt: NaiveDateTime) -> String {
    if ndt.time() == chrono::NaiveTime::MIN {
        ndt.format("%Y-%m-%d").to_string()
    } else {
        ndt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Reformat an ISO-8601 timestamp the way serial dates are rendered
fn normalize_iso_datetime(s: &str) -> String {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(format_datetime)
        .unwrap_or_else(|_| s.to_string())
}

/// Convert a fractional-day duration to ISO-8601 (PT#H#M#S)
fn serial_to_duration(days: f64) -> String {
    let total_secs = (days * 86_400.0).round() as i64;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("PT{}H{}M{}S", hours, minutes, seconds)
}

#[cfg(test)]
impl CellValue {
    /// Whole-number view of numeric cells
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CellValue::Int(i) => Some(*i),
            CellValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }
}
