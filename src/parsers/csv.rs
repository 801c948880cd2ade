use crate::error::{DocumentError, Result};
use crate::parsers::excel::build_records;
use crate::utils;
use serde_json::Value;

/// Parse CSV content into header-keyed row objects.
///
/// Cells stay strings; no number or date inference is applied. This
/// differs from the spreadsheet readers, which keep numeric and boolean
/// cell types, so `007` and `true` survive a CSV round trip unchanged.
pub fn parse_csv(content: &[u8]) -> Result<Value> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(utils::strip_utf8_bom(content));

    let mut rows = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| DocumentError::spreadsheet_error(format!("CSV parsing error: {}", e)))?;
        rows.push(
            record
                .iter()
                .map(|field| Value::String(field.to_string()))
                .collect::<Vec<_>>(),
        );
    }

    let mut rows = rows.into_iter();
    let Some(header_row) = rows.next() else {
        return Ok(Value::Array(Vec::new()));
    };

    let headers = header_row
        .into_iter()
        .map(|cell| match cell {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect();

    Ok(Value::Array(build_records(headers, rows)))
}
