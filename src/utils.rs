use crate::error::{DocumentError, Result};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Extract the lowercase extension from a file name.
///
/// Everything after the last `.` counts, so `.json` yields `json`.
pub fn get_file_extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Guess a MIME type for a file name, falling back to its extension.
pub fn guess_mime_type(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_raw()
        .map(str::to_string)
        .or_else(|| get_file_extension(filename))
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn strip_utf8_bom(content: &[u8]) -> &[u8] {
    content.strip_prefix(UTF8_BOM).unwrap_or(content)
}

/// Decode content as strict UTF-8, dropping a leading BOM.
pub fn decode_utf8(content: &[u8]) -> Result<Cow<'_, str>> {
    let (decoded, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(content);
    if had_errors {
        let valid_up_to = std::str::from_utf8(strip_utf8_bom(content))
            .err()
            .map(|e| e.valid_up_to())
            .unwrap_or(0);
        return Err(DocumentError::encoding_error(format!(
            "invalid UTF-8 sequence after byte {}",
            valid_up_to
        )));
    }
    Ok(decoded)
}

/// Hands out names that are unique within one collection.
///
/// The first claim of a base keeps it; later claims get `_1`, `_2`, ...
/// in the order they arrive. A suffixed candidate that is already taken
/// is skipped.
#[derive(Debug, Default)]
pub struct UniqueNames {
    used: HashSet<String>,
    counters: HashMap<String, usize>,
}

impl UniqueNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        while self.used.contains(&candidate) {
            let counter = self.counters.entry(base.to_string()).or_insert(0);
            *counter += 1;
            candidate = format!("{}_{}", base, counter);
        }
        self.used.insert(candidate.clone());
        candidate
    }
}
