use crate::error::{DocumentError, Result};
use crate::utils::UniqueNames;
use calamine::{open_workbook_from_rs, DataType, Range, Reader, Xls, Xlsx};
use serde_json::{Map, Number, Value};
use std::fmt::Display;
use std::io::{Cursor, Read, Seek};
use tracing::debug;

/// Header used for a column whose header cell is blank.
const EMPTY_HEADER: &str = "__EMPTY";

/// Parse Excel XLSX file
pub fn parse_xlsx(content: &[u8]) -> Result<Value> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(content)).map_err(|e| {
        DocumentError::spreadsheet_error(format!("Failed to open Excel file: {}", e))
    })?;
    first_sheet_records(&mut workbook)
}

/// Parse legacy Excel XLS file
pub fn parse_xls(content: &[u8]) -> Result<Value> {
    let mut workbook: Xls<_> = open_workbook_from_rs(Cursor::new(content)).map_err(|e| {
        DocumentError::spreadsheet_error(format!("Failed to open Excel file: {}", e))
    })?;
    first_sheet_records(&mut workbook)
}

/// Convert the first worksheet into header-keyed row objects.
///
/// Only the first sheet in document order is read; later sheets are
/// ignored. A multi-sheet mode would be a new option, not a change here.
fn first_sheet_records<RS, R>(workbook: &mut R) -> Result<Value>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: Display,
{
    let sheet_names = workbook.sheet_names().to_vec();
    let Some(sheet_name) = sheet_names.first() else {
        return Ok(Value::Array(Vec::new()));
    };
    if sheet_names.len() > 1 {
        debug!(sheet = %sheet_name, ignored = sheet_names.len() - 1, "Reading first sheet only");
    }

    match workbook.worksheet_range(sheet_name) {
        Some(Ok(range)) => Ok(Value::Array(range_to_records(&range))),
        Some(Err(e)) => Err(DocumentError::spreadsheet_error(format!(
            "Could not read sheet '{}': {}",
            sheet_name, e
        ))),
        None => Err(DocumentError::spreadsheet_error(format!(
            "Sheet '{}' not found",
            sheet_name
        ))),
    }
}

fn range_to_records(range: &Range<DataType>) -> Vec<Value> {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };

    let headers = header_row.iter().map(header_text).collect();
    build_records(headers, rows.map(|row| row.iter().map(cell_value).collect()))
}

/// Key every row by the normalized header names.
///
/// Missing cells become `""` so every object carries the same keys;
/// rows with nothing but empty cells are skipped.
pub(crate) fn build_records<I>(headers: Vec<String>, rows: I) -> Vec<Value>
where
    I: IntoIterator<Item = Vec<Value>>,
{
    let headers = normalize_headers(headers);

    rows.into_iter()
        .filter(|row| row.iter().any(|cell| !is_blank(cell)))
        .map(|mut row| {
            row.resize(headers.len(), Value::String(String::new()));
            let record: Map<String, Value> = headers.iter().cloned().zip(row).collect();
            Value::Object(record)
        })
        .collect()
}

/// Blank headers become `__EMPTY`; repeated headers get `_1`, `_2`, ...
pub(crate) fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut names = UniqueNames::new();
    headers
        .into_iter()
        .map(|header| {
            if header.trim().is_empty() {
                names.claim(EMPTY_HEADER)
            } else {
                names.claim(&header)
            }
        })
        .collect()
}

fn is_blank(cell: &Value) -> bool {
    matches!(cell, Value::String(s) if s.is_empty())
}

fn header_text(cell: &DataType) -> String {
    match cell_value(cell) {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Map a cell to JSON, keeping numbers and booleans typed.
fn cell_value(cell: &DataType) -> Value {
    match cell {
        DataType::Empty => Value::String(String::new()),
        DataType::String(s) => Value::String(s.clone()),
        DataType::Int(i) => Value::from(*i),
        DataType::Float(f) => float_value(*f),
        DataType::Bool(b) => Value::Bool(*b),
        other => Value::String(other.to_string()),
    }
}

fn float_value(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        return Value::from(f as i64);
    }
    Number::from_f64(f)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(f.to_string()))
}
