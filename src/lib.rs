//! Converts spreadsheets, Word documents, plain text, PDF and JSON files
//! into a normalized JSON record, singly or in bounded batches.

pub mod batch;
pub mod config;
pub mod error;
pub mod export;
pub mod i18n;
pub mod identity;
pub mod logging;
pub mod notify;
pub mod parsers;
pub mod record;
pub mod remote;
pub mod session;
pub mod source;
pub mod text_processor;
pub mod utils;

#[cfg(feature = "python")]
mod python;

pub use batch::{BatchOutcome, BatchRunner, DEFAULT_MAX_BATCH};
pub use config::{Config, LogFormat};
pub use error::{ConvertError, ConvertResult, DocumentError, ParseError, ParseErrorKind, Result};
pub use i18n::{Language, Message};
pub use identity::{IdentityProvider, LocalIdentity};
pub use parsers::{get_supported_formats, parse_document, DocumentKind, ParseOptions};
pub use record::{Record, RecordKind};
pub use session::{ClearConfirmation, Session};
pub use source::{FileSource, LocalFile, MemoryFile};
