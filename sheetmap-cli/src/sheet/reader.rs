//! Read the first sheet of a workbook into column names and rows

use std::collections::HashMap;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use super::{CellValue, SheetData, SheetError};

/// Read the first sheet of the workbook at `path`
///
/// The first row is taken as the header row. Blank headers become
/// `Unnamed: <index>` and repeated headers get a `.1`, `.2`, ... suffix so
/// every source column name is unique. Trailing rows with no values are
/// dropped.
pub fn read_sheet<P: AsRef<Path>>(path: P) -> Result<SheetData, SheetError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(SheetError::NotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path).map_err(|e| SheetError::Open {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SheetError::NoSheets)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| SheetError::Sheet {
            sheet: sheet_name.clone(),
            message: e.to_string(),
        })?;

    let mut rows = range.rows();
    let header = match rows.next() {
        Some(header) => header,
        None => {
            log::debug!("Sheet '{}' is empty", sheet_name);
            return Ok(SheetData::new(sheet_name, Vec::new(), Vec::new()));
        }
    };

    let columns = header_names(header);
    let width = columns.len();

    let mut data: Vec<Vec<CellValue>> = rows
        .map(|row| {
            let mut values: Vec<CellValue> = row.iter().take(width).map(CellValue::from).collect();
            values.resize(width, CellValue::Null);
            values
        })
        .collect();

    while data
        .last()
        .is_some_and(|row| row.iter().all(CellValue::is_null))
    {
        data.pop();
    }

    log::info!(
        "Read sheet '{}' from {}: {} columns, {} rows",
        sheet_name,
        path.display(),
        columns.len(),
        data.len()
    );

    Ok(SheetData::new(sheet_name, columns, data))
}

/// Turn the header row into unique column names
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(header.len());

    for (idx, cell) in header.iter().enumerate() {
        let base = match cell {
            Data::Empty => format!("Unnamed: {}", idx),
            Data::String(s) if s.trim().is_empty() => format!("Unnamed: {}", idx),
            Data::String(s) => s.trim().to_string(),
            other => CellValue::from(other).to_string(),
        };

        let count = seen.entry(base.clone()).or_insert(0);
        let name = if *count == 0 {
            base
        } else {
            format!("{}.{}", base, count)
        };
        *count += 1;
        names.push(name);
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sheetmap-{}-{}", uuid::Uuid::new_v4(), name))
    }

    fn write_people(path: &Path) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Name").unwrap();
        sheet.write_string(0, 1, "Age").unwrap();
        sheet.write_string(1, 0, "O'Brien").unwrap();
        sheet.write_number(1, 1, 30).unwrap();
        sheet.write_string(2, 0, "Smith").unwrap();
        workbook.save(path).unwrap();
    }

    #[test]
    fn test_read_columns_and_rows() {
        let path = temp_path("people.xlsx");
        write_people(&path);

        let data = read_sheet(&path).unwrap();
        assert_eq!(data.columns(), &["Name".to_string(), "Age".to_string()]);
        assert_eq!(data.row_count(), 2);

        let first = data.row(0).unwrap();
        assert_eq!(first.get("Name"), Some(&CellValue::String("O'Brien".into())));
        assert_eq!(first.get("Age").and_then(CellValue::as_int), Some(30));

        let second = data.row(1).unwrap();
        assert_eq!(second.get("Age"), Some(&CellValue::Null));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file() {
        let err = read_sheet("/definitely/not/here.xlsx").unwrap_err();
        assert!(matches!(err, SheetError::NotFound(_)));
    }

    #[test]
    fn test_unreadable_file() {
        let path = temp_path("garbage.xlsx");
        std::fs::write(&path, b"not a workbook").unwrap();

        let err = read_sheet(&path).unwrap_err();
        assert!(matches!(err, SheetError::Open { .. }));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_header_names_dedup_and_blank() {
        let header = vec![
            Data::String("A".into()),
            Data::Empty,
            Data::String("A".into()),
            Data::String("  ".into()),
            Data::String("A".into()),
            Data::Int(7),
        ];
        assert_eq!(
            header_names(&header),
            vec!["A", "Unnamed: 1", "A.1", "Unnamed: 3", "A.2", "7"]
        );
    }

    #[test]
    fn test_datetime_cells_render_as_sql_timestamps() {
        use rust_xlsxwriter::{ExcelDateTime, Format};

        let path = temp_path("dates.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
        let when = ExcelDateTime::parse_from_str("2024-01-31 08:00:00").unwrap();
        sheet.write_string(0, 0, "When").unwrap();
        sheet.write_datetime_with_format(1, 0, &when, &format).unwrap();
        workbook.save(&path).unwrap();

        let data = read_sheet(&path).unwrap();
        let value = data.row(0).unwrap().get("When").cloned();
        assert_eq!(value, Some(CellValue::DateTime("2024-01-31 08:00:00".into())));
        assert_eq!(
            crate::script::sql_literal(value.as_ref()),
            "'2024-01-31 08:00:00'"
        );
        std::fs::remove_file(&path).ok();
    }
}
