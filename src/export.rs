//! Serialization of records for download, clipboard and batch archives.

use crate::error::{ConvertError, ConvertResult};
use crate::record::Record;
use crate::utils::UniqueNames;
use regex::Regex;
use serde_json::Value;
use std::io::{Seek, Write};
use tracing::{debug, info};
use zip::write::FileOptions;
use zip::ZipWriter;

/// Archive name used when none is configured.
pub const DEFAULT_ARCHIVE_NAME: &str = "Vando_Docs_Batch.zip";

const FALLBACK_BASE_NAME: &str = "document";

/// A serialized record ready to be written somewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub contents: String,
}

/// Pretty-print with two-space indentation.
pub fn to_pretty_json(value: &Value) -> ConvertResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Display name with whitespace runs turned into `_` and the last
/// extension removed.
pub fn export_base_name(display_name: &str) -> String {
    let mut base = display_name.to_string();

    if let Ok(whitespace) = Regex::new(r"\s+") {
        base = whitespace.replace_all(&base, "_").into_owned();
    }
    if let Ok(extension) = Regex::new(r"\.[^/.]+$") {
        base = extension.replace(&base, "").into_owned();
    }

    if base.is_empty() {
        FALLBACK_BASE_NAME.to_string()
    } else {
        base
    }
}

pub fn export_file_name(display_name: &str) -> String {
    format!("{}.json", export_base_name(display_name))
}

/// Single-record export: the payload as pretty JSON under `<base>.json`.
pub fn export_record(record: &Record) -> ConvertResult<ExportedFile> {
    Ok(ExportedFile {
        file_name: export_file_name(record.name()),
        contents: to_pretty_json(record.payload())?,
    })
}

/// One entry per record, in order. Colliding names get `_1`, `_2`, ...
/// in the order they are met; the first keeps the plain name.
pub fn archive_entries(records: &[Record]) -> ConvertResult<Vec<ExportedFile>> {
    let mut names = UniqueNames::new();
    records
        .iter()
        .map(|record| {
            let base = names.claim(&export_base_name(record.name()));
            Ok(ExportedFile {
                file_name: format!("{}.json", base),
                contents: to_pretty_json(record.payload())?,
            })
        })
        .collect()
}

/// Write every record into a ZIP archive and return the writer.
pub fn write_archive<W: Write + Seek>(records: &[Record], writer: W) -> ConvertResult<W> {
    let entries = archive_entries(records)?;
    let mut zip = ZipWriter::new(writer);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for entry in &entries {
        zip.start_file(entry.file_name.as_str(), options)?;
        zip.write_all(entry.contents.as_bytes())
            .map_err(|e| ConvertError::archive_error(format!("{}: {}", entry.file_name, e)))?;
        debug!(entry = %entry.file_name, bytes = entry.contents.len(), "Archived record");
    }

    let writer = zip.finish()?;
    info!(entries = entries.len(), "Archive written");
    Ok(writer)
}
