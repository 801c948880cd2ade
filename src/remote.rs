//! Wrapping documents fetched from Google Docs as records.
//!
//! Fetching itself (OAuth, the Docs API call) belongs to the caller. This
//! module only resolves a document id from user input and turns a
//! fetched document into a [`Record`].

use crate::identity::IdentityProvider;
use crate::record::{Record, RecordKind};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

pub const REMOTE_MIME_TYPE: &str = "application/vnd.google-apps.document";

pub const UNTITLED_NAME: &str = "Google Doc";

/// Inputs without a `/d/<id>` segment are taken as a raw id only when
/// longer than this.
const MIN_RAW_ID_LEN: usize = 20;

/// Document id from a Docs URL, or the raw input when it is long enough
/// to be an id itself.
pub fn extract_doc_id(input: &str) -> Option<String> {
    if let Ok(doc_path) = Regex::new(r"/d/([a-zA-Z0-9_-]+)") {
        if let Some(id) = doc_path.captures(input).and_then(|c| c.get(1)) {
            return Some(id.as_str().to_string());
        }
    }

    if input.chars().count() > MIN_RAW_ID_LEN {
        Some(input.to_string())
    } else {
        None
    }
}

/// The parts of a Docs API `documents.get` response kept in a record.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteDocument {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Value,
}

impl Record {
    /// Wrap a fetched document. The body is kept as an opaque value.
    pub fn from_remote(identity: &dyn IdentityProvider, document: RemoteDocument) -> Self {
        let name = document
            .title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| UNTITLED_NAME.to_string());

        Record::capture(identity, name, RecordKind::RemoteDoc, REMOTE_MIME_TYPE, document.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FixedIdentity;

    impl IdentityProvider for FixedIdentity {
        fn new_id(&self) -> String {
            "rec-1".to_string()
        }

        fn device_id(&self) -> String {
            "device-1".to_string()
        }
    }

    #[test]
    fn test_extract_doc_id_from_url() {
        assert_eq!(
            extract_doc_id("https://docs.google.com/document/d/1AbC-d_EF/edit#heading=h.x").as_deref(),
            Some("1AbC-d_EF")
        );
    }

    #[test]
    fn test_extract_doc_id_raw() {
        let raw = "1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms";
        assert_eq!(extract_doc_id(raw).as_deref(), Some(raw));
        assert_eq!(extract_doc_id("short-id"), None);
        assert_eq!(extract_doc_id("exactly-twenty-chars"), None);
    }

    #[test]
    fn test_remote_record() {
        let document: RemoteDocument = serde_json::from_value(json!({
            "title": "Meeting notes",
            "documentId": "abc",
            "body": {"content": [{"paragraph": {}}]}
        }))
        .unwrap();

        let record = Record::from_remote(&FixedIdentity, document);
        assert_eq!(record.name(), "Meeting notes");
        assert_eq!(record.kind(), RecordKind::RemoteDoc);
        assert_eq!(record.mime_type(), REMOTE_MIME_TYPE);
        assert_eq!(record.creator_id(), "device-1");
        assert_eq!(record.payload(), &json!({"content": [{"paragraph": {}}]}));
    }

    #[test]
    fn test_untitled_remote_record() {
        let document: RemoteDocument = serde_json::from_value(json!({"title": ""})).unwrap();
        let record = Record::from_remote(&FixedIdentity, document);
        assert_eq!(record.name(), UNTITLED_NAME);
        assert!(record.payload().is_null());
    }
}
