use crate::error::{DocumentError, Result};
use crate::text_processor;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek};
use zip::ZipArchive;

/// Compound File Binary signature used by legacy `.doc` files.
const OLE_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

const DEFAULT_MAIN_PART: &str = "word/document.xml";

/// Raw text of a Word document plus non-fatal extraction warnings.
#[derive(Debug, Default)]
struct Extraction {
    text: String,
    skipped: BTreeMap<&'static str, usize>,
}

impl Extraction {
    fn note_skipped(&mut self, element: &'static str) {
        *self.skipped.entry(element).or_insert(0) += 1;
    }

    fn warnings(&self) -> Vec<Value> {
        self.skipped
            .iter()
            .map(|(element, count)| {
                json!({
                    "type": "warning",
                    "message": format!(
                        "Embedded {} content was skipped ({} occurrence{})",
                        element,
                        count,
                        if *count == 1 { "" } else { "s" }
                    ),
                })
            })
            .collect()
    }
}

/// Parse DOCX document
///
/// Output carries `fullText` (every paragraph followed by a blank line),
/// `messages` with warnings, and the non-empty `paragraphs`.
pub fn parse_docx(content: &[u8]) -> Result<Value> {
    if content.starts_with(&OLE_SIGNATURE) {
        return Err(DocumentError::docx_error(
            "Legacy binary .doc format is not supported. Please convert to DOCX format.",
        ));
    }

    let mut archive = ZipArchive::new(Cursor::new(content))
        .map_err(|e| DocumentError::docx_error(format!("Failed to open document archive: {}", e)))?;

    let part = main_document_part(&mut archive);
    let xml = read_entry(&mut archive, &part)?;
    let extraction = extract_text(&xml)?;

    let paragraphs = text_processor::non_empty_paragraphs(&extraction.text);
    Ok(json!({
        "fullText": extraction.text,
        "messages": extraction.warnings(),
        "paragraphs": paragraphs,
    }))
}

/// Parse legacy DOC document
///
/// Word 97-2003 binaries are rejected; a `.doc` that is really an Office
/// Open XML package is read like a `.docx`.
pub fn parse_doc(content: &[u8]) -> Result<Value> {
    parse_docx(content)
}

/// Locate the main document part through the package relationships.
fn main_document_part<R: Read + Seek>(archive: &mut ZipArchive<R>) -> String {
    let rels = match read_entry(archive, "_rels/.rels") {
        Ok(rels) => rels,
        Err(_) => return DEFAULT_MAIN_PART.to_string(),
    };

    let mut reader = Reader::from_str(&rels);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let is_office_document = attribute(e, "Type")
                    .map(|t| t.ends_with("/officeDocument"))
                    .unwrap_or(false);
                if is_office_document {
                    if let Some(target) = attribute(e, "Target") {
                        return target.trim_start_matches('/').to_string();
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    DEFAULT_MAIN_PART.to_string()
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Option<String> {
    element
        .try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let mut file = archive
        .by_name(name)
        .map_err(|e| DocumentError::docx_error(format!("Missing document part '{}': {}", name, e)))?;

    let mut xml = String::new();
    file.read_to_string(&mut xml)
        .map_err(|e| DocumentError::docx_error(format!("Failed to read '{}': {}", name, e)))?;
    Ok(xml)
}

/// Walk `word/document.xml` and collect its raw text.
///
/// `mc:Fallback` branches repeat what their `mc:Choice` already holds and
/// are ignored. A drawing, object or picture only counts as skipped when
/// none of its text was collected.
fn extract_text(xml: &str) -> Result<Extraction> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut extraction = Extraction::default();
    let mut in_text = false;
    let mut deleted_depth = 0usize;
    let mut tab_stops_depth = 0usize;
    let mut fallback_depth = 0usize;
    let mut embedded: Vec<(&'static str, bool)> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"Fallback" => fallback_depth += 1,
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"Fallback" => {
                fallback_depth = fallback_depth.saturating_sub(1)
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DocumentError::docx_error(format!(
                    "XML parsing error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            Ok(_) if fallback_depth > 0 => {}
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = true,
                b"del" => deleted_depth += 1,
                b"tabs" => tab_stops_depth += 1,
                other => {
                    if let Some(element) = embedded_element(other) {
                        embedded.push((element, false));
                    }
                }
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"tab" if tab_stops_depth == 0 && deleted_depth == 0 => extraction.text.push('\t'),
                b"br" | b"cr" if deleted_depth == 0 => extraction.text.push('\n'),
                b"p" => extraction.text.push_str("\n\n"),
                other => {
                    if let Some(element) = embedded_element(other) {
                        extraction.note_skipped(element);
                    }
                }
            },
            Ok(Event::Text(ref e)) if in_text && deleted_depth == 0 => {
                let text = e.unescape().map_err(|err| {
                    DocumentError::docx_error(format!("Invalid text content: {}", err))
                })?;
                extraction.text.push_str(&text);
                if !text.trim().is_empty() {
                    for (_, has_text) in embedded.iter_mut() {
                        *has_text = true;
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"del" => deleted_depth = deleted_depth.saturating_sub(1),
                b"tabs" => tab_stops_depth = tab_stops_depth.saturating_sub(1),
                b"p" => extraction.text.push_str("\n\n"),
                other => {
                    if embedded_element(other).is_some() {
                        if let Some((element, false)) = embedded.pop() {
                            extraction.note_skipped(element);
                        }
                    }
                }
            },
            _ => {}
        }
        buf.clear();
    }

    Ok(extraction)
}

fn embedded_element(local_name: &[u8]) -> Option<&'static str> {
    match local_name {
        b"drawing" => Some("drawing"),
        b"object" => Some("object"),
        b"pict" => Some("picture"),
        _ => None,
    }
}
