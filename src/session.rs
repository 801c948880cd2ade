//! The in-memory record collection of one session.

use crate::error::ConvertResult;
use crate::export;
use crate::i18n::{Language, Message};
use crate::record::Record;
use tracing::{debug, info};

/// Proof that the user was asked before a destructive clear.
///
/// Only [`Session::request_clear`] can create one, and only while the
/// session holds records.
#[derive(Debug)]
pub struct ClearConfirmation {
    pub title: &'static str,
    pub message: &'static str,
    pending: usize,
}

impl ClearConfirmation {
    fn new(language: Language, pending: usize) -> Self {
        Self {
            title: Message::ConfirmTitle.text(language),
            message: Message::ConfirmMessage.text(language),
            pending,
        }
    }

    /// Number of records the clear will remove.
    pub fn pending(&self) -> usize {
        self.pending
    }
}

#[derive(Debug, Default)]
pub struct Session {
    records: Vec<Record>,
    active: Option<String>,
    language: Language,
}

impl Session {
    pub fn new(language: Language) -> Self {
        Self {
            records: Vec::new(),
            active: None,
            language,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append records in order; the last one becomes active.
    pub fn add_all<I: IntoIterator<Item = Record>>(&mut self, records: I) {
        let before = self.records.len();
        self.records.extend(records);
        if self.records.len() > before {
            self.active = self.records.last().map(|r| r.id().to_string());
            debug!(added = self.records.len() - before, total = self.records.len(), "Records added");
        }
    }

    pub fn add(&mut self, record: Record) {
        self.add_all(std::iter::once(record));
    }

    /// Remove one record. When it was active, the newest remaining record
    /// is selected instead.
    pub fn remove(&mut self, id: &str) -> Option<Record> {
        let index = self.records.iter().position(|r| r.id() == id)?;
        let removed = self.records.remove(index);
        if self.active.as_deref() == Some(id) {
            self.active = self.records.last().map(|r| r.id().to_string());
        }
        Some(removed)
    }

    /// Make `id` the active record. Unknown ids leave the selection alone.
    pub fn select(&mut self, id: &str) -> bool {
        if self.records.iter().any(|r| r.id() == id) {
            self.active = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn active(&self) -> Option<&Record> {
        let id = self.active.as_deref()?;
        self.records.iter().find(|r| r.id() == id)
    }

    /// Ask for a clear. `None` means there is nothing to clear and no
    /// prompt should be shown.
    pub fn request_clear(&self) -> Option<ClearConfirmation> {
        if self.records.is_empty() {
            None
        } else {
            Some(ClearConfirmation::new(self.language, self.records.len()))
        }
    }

    pub fn clear(&mut self, confirmation: ClearConfirmation) {
        info!(removed = self.records.len(), confirmed = confirmation.pending(), "Session cleared");
        self.records.clear();
        self.active = None;
    }

    /// Pretty JSON of the active record's payload.
    pub fn clipboard_text(&self) -> ConvertResult<Option<String>> {
        self.active()
            .map(|record| export::to_pretty_json(record.payload()))
            .transpose()
    }
}
