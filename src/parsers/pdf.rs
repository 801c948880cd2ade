use crate::error::{DocumentError, Result};
use crate::text_processor;
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

/// Info dictionary entries copied into the metadata payload.
const INFO_KEYS: [&str; 8] = [
    "Title",
    "Author",
    "Subject",
    "Keywords",
    "Creator",
    "Producer",
    "CreationDate",
    "ModDate",
];

/// Parse PDF document using lopdf
///
/// Every page is visited in order; its text runs are joined with single
/// spaces. Failing to load the document or to read a page is fatal,
/// failing to read the metadata is not.
pub fn parse_pdf(content: &[u8]) -> Result<Value> {
    let doc = Document::load_mem(content)
        .map_err(|e| DocumentError::pdf_error(format!("Failed to load PDF: {}", e)))?;

    let page_ids = doc.get_pages();
    let mut pages = Vec::with_capacity(page_ids.len());
    let mut page_texts = Vec::with_capacity(page_ids.len());

    for (page_number, page_id) in page_ids {
        let runs = page_text_runs(&doc, page_id).map_err(|e| {
            DocumentError::pdf_error(format!("Failed to extract text from page {}: {}", page_number, e))
        })?;
        let page_text = text_processor::join_text_runs(&runs);

        pages.push(json!({
            "pageNumber": page_number,
            "content": page_text,
        }));
        page_texts.push(page_text);
    }

    let metadata = match extract_pdf_metadata(&doc) {
        Ok(metadata) => metadata,
        Err(reason) => {
            warn!(%reason, "PDF metadata could not be extracted");
            Value::Object(Map::new())
        }
    };

    Ok(json!({
        "metadata": metadata,
        "pageCount": pages.len(),
        "fullText": text_processor::join_pages(&page_texts),
        "pages": pages,
    }))
}

/// Every `Tj` and `TJ` string shown on a page, in content-stream order.
///
/// Strings are decoded with the encoding of the font selected by the
/// last `Tf`. One `TJ` array is one run; a kerning offset wider than a
/// tenth of an em inside it counts as a word gap.
fn page_text_runs(doc: &Document, page_id: ObjectId) -> lopdf::Result<Vec<String>> {
    let encodings: BTreeMap<Vec<u8>, &str> = doc
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect();
    let content = Content::decode(&doc.get_page_content(page_id)?)?;

    let mut runs = Vec::new();
    let mut encoding = None;
    for operation in &content.operations {
        match operation.operator.as_str() {
            "Tf" => {
                encoding = match operation.operands.first() {
                    Some(font) => encodings.get(font.as_name()?).copied(),
                    None => None,
                };
            }
            "Tj" | "'" | "\"" => {
                if let Some(Object::String(bytes, _)) = operation.operands.last() {
                    runs.push(Document::decode_text(encoding, bytes));
                }
            }
            "TJ" => {
                if let Some(Object::Array(parts)) = operation.operands.first() {
                    runs.push(decode_text_array(encoding, parts));
                }
            }
            _ => {}
        }
    }
    Ok(runs)
}

fn decode_text_array(encoding: Option<&str>, parts: &[Object]) -> String {
    let mut run = String::new();
    for part in parts {
        match part {
            Object::String(bytes, _) => run.push_str(&Document::decode_text(encoding, bytes)),
            Object::Integer(offset) if *offset < -100 => run.push(' '),
            Object::Real(offset) if *offset < -100.0 => run.push(' '),
            _ => {}
        }
    }
    run
}

/// Extract metadata from PDF
///
/// Shape: `{ "info": {...}, "metadata": null }`.
fn extract_pdf_metadata(doc: &Document) -> std::result::Result<Value, String> {
    let mut info = Map::new();
    info.insert("PDFFormatVersion".to_string(), Value::String(doc.version.clone()));
    info.insert(
        "IsEncrypted".to_string(),
        Value::Bool(doc.trailer.get(b"Encrypt").is_ok()),
    );

    if let Ok(info_object) = doc.trailer.get(b"Info") {
        let dict = resolve_dictionary(doc, info_object)?;
        for key in INFO_KEYS {
            if let Some(text) = dict.get(key.as_bytes()).ok().and_then(object_text) {
                info.insert(key.to_string(), Value::String(text));
            }
        }
    }

    Ok(json!({
        "info": info,
        "metadata": Value::Null,
    }))
}

fn resolve_dictionary<'a>(doc: &'a Document, object: &'a Object) -> std::result::Result<&'a Dictionary, String> {
    match object {
        Object::Reference(id) => doc
            .get_dictionary(*id)
            .map_err(|e| format!("Info dictionary {:?} unreadable: {}", id, e)),
        Object::Dictionary(dict) => Ok(dict),
        other => Err(format!("Info entry is not a dictionary: {:?}", other)),
    }
}

fn object_text(object: &Object) -> Option<String> {
    match object {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE when it starts with a BOM,
/// otherwise UTF-8 with a Latin-1 fallback.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
