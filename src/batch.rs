use crate::error::{ConvertError, ConvertResult, ParseError};
use crate::i18n::Message;
use crate::identity::IdentityProvider;
use crate::parsers::{self, DocumentKind, ParseOptions};
use crate::record::Record;
use crate::source::FileSource;
use crate::utils;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const DEFAULT_MAX_BATCH: usize = 15;

/// Separator used when per-file errors are shown as one message.
pub const ERROR_SEPARATOR: &str = " | ";

/// Records and per-file errors of one batch, both in submission order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<Record>,
    pub errors: Vec<String>,
}

impl BatchOutcome {
    /// All per-file errors as one line, or `None` when every file parsed.
    pub fn error_summary(&self) -> Option<String> {
        if self.errors.is_empty() {
            None
        } else {
            Some(self.errors.join(ERROR_SEPARATOR))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parses a bounded set of files concurrently, one blocking task per file.
pub struct BatchRunner {
    max_files: usize,
    options: ParseOptions,
    identity: Arc<dyn IdentityProvider>,
}

impl BatchRunner {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            max_files: DEFAULT_MAX_BATCH,
            options: ParseOptions::default(),
            identity,
        }
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    /// Parse every file and wait for all of them to settle.
    ///
    /// A batch above the limit is rejected before any file is read. One
    /// file failing, or its task panicking, never affects the others.
    pub async fn run(&self, files: Vec<Box<dyn FileSource>>) -> ConvertResult<BatchOutcome> {
        if files.len() > self.max_files {
            warn!(
                submitted = files.len(),
                max = self.max_files,
                "Batch rejected: too many files"
            );
            return Err(ConvertError::batch_limit(
                files.len(),
                self.max_files,
                self.options.language,
            ));
        }

        // First use of a local identity touches the data dir.
        let identity = Arc::clone(&self.identity);
        let creator_id = tokio::task::spawn_blocking(move || identity.device_id())
            .await
            .map_err(std::io::Error::from)?;
        let mut handles = Vec::with_capacity(files.len());

        for file in files {
            let name = file.name().to_string();
            let options = self.options.clone();
            let identity = Arc::clone(&self.identity);
            let creator_id = creator_id.clone();

            let handle = tokio::task::spawn_blocking(move || {
                let payload = parsers::parse_document(&*file, &options)?;
                let name = file.name();
                let kind = DocumentKind::from_filename(name)
                    .map(DocumentKind::record_kind)
                    .ok_or_else(|| ParseError::unsupported(name, options.language))?;

                Ok::<_, ParseError>(Record::new(
                    identity.new_id(),
                    creator_id,
                    name.to_string(),
                    kind,
                    utils::guess_mime_type(name),
                    payload,
                ))
            });
            handles.push((name, handle));
        }

        let mut outcome = BatchOutcome::default();
        for (name, handle) in handles {
            match handle.await {
                Ok(Ok(record)) => outcome.records.push(record),
                Ok(Err(e)) => outcome.errors.push(e.to_string()),
                Err(e) => {
                    error!(file = %name, error = %e, "Batch task failed");
                    outcome.errors.push(format!(
                        "{}: {}",
                        name,
                        Message::ErrorGeneral.text(self.options.language)
                    ));
                }
            }
        }

        info!(
            parsed = outcome.records.len(),
            failed = outcome.errors.len(),
            "Batch finished"
        );
        Ok(outcome)
    }
}
