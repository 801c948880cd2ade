use crate::identity::IdentityProvider;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Origin format of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    Spreadsheet,
    Text,
    Word,
    Json,
    Pdf,
    RemoteDoc,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spreadsheet => "spreadsheet",
            Self::Text => "text",
            Self::Word => "word",
            Self::Json => "json",
            Self::Pdf => "pdf",
            Self::RemoteDoc => "remote-doc",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One successfully parsed or fetched document.
///
/// Fields are private: a record never changes after creation. To edit
/// one, remove it from the session and add a new record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    id: String,
    creator_id: String,
    name: String,
    kind: RecordKind,
    mime_type: String,
    payload: Value,
    created_at: DateTime<Utc>,
}

impl Record {
    pub fn new(
        id: String,
        creator_id: String,
        name: String,
        kind: RecordKind,
        mime_type: String,
        payload: Value,
    ) -> Self {
        Self {
            id,
            creator_id,
            name,
            kind,
            mime_type,
            payload,
            created_at: Utc::now(),
        }
    }

    /// Build a record with a fresh id and the device id of `identity`.
    pub fn capture(
        identity: &dyn IdentityProvider,
        name: impl Into<String>,
        kind: RecordKind,
        mime_type: impl Into<String>,
        payload: Value,
    ) -> Self {
        Self::new(
            identity.new_id(),
            identity.device_id(),
            name.into(),
            kind,
            mime_type.into(),
            payload,
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn creator_id(&self) -> &str {
        &self.creator_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
