use crate::i18n::{Language, Message};
use thiserror::Error;

/// Result of a single extractor call.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Result of batch, export and configuration operations.
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

/// Failure raised inside one extractor, before it is localized at the
/// dispatcher boundary.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet parsing error: {0}")]
    SpreadsheetError(String),

    #[error("Text encoding error: {0}")]
    EncodingError(String),

    #[error("Word document parsing error: {0}")]
    DocxError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("PDF parsing error: {0}")]
    PdfError(String),

    #[error("Extractor panicked: {0}")]
    Panicked(String),
}

impl DocumentError {
    pub fn spreadsheet_error<S: Into<String>>(msg: S) -> Self {
        Self::SpreadsheetError(msg.into())
    }

    pub fn encoding_error<S: Into<String>>(msg: S) -> Self {
        Self::EncodingError(msg.into())
    }

    pub fn docx_error<S: Into<String>>(msg: S) -> Self {
        Self::DocxError(msg.into())
    }

    pub fn pdf_error<S: Into<String>>(msg: S) -> Self {
        Self::PdfError(msg.into())
    }

    /// The underlying library message, without the variant prefix.
    pub fn detail(&self) -> String {
        match self {
            Self::Io(e) => e.to_string(),
            Self::JsonError(e) => e.to_string(),
            Self::SpreadsheetError(msg)
            | Self::EncodingError(msg)
            | Self::DocxError(msg)
            | Self::PdfError(msg)
            | Self::Panicked(msg) => msg.clone(),
        }
    }
}

/// The typed taxonomy exposed at the dispatcher boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    UnsupportedFormat,
    SpreadsheetParse,
    TextParse,
    DocumentParse,
    JsonParse,
    PdfParse,
}

impl ParseErrorKind {
    fn message(self) -> Message {
        match self {
            Self::UnsupportedFormat => Message::ErrFormat,
            Self::SpreadsheetParse => Message::ErrExcel,
            Self::TextParse => Message::ErrTxt,
            Self::DocumentParse => Message::ErrDocx,
            Self::JsonParse => Message::ErrJson,
            Self::PdfParse => Message::ErrPdf,
        }
    }

    /// JSON and PDF failures show the parser's own message to the user.
    fn shows_detail(self) -> bool {
        matches!(self, Self::JsonParse | Self::PdfParse)
    }
}

/// A localized, per-file parse failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{file_name}: {message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub file_name: String,
    pub message: String,
    pub detail: Option<String>,
}

impl ParseError {
    pub fn new<S: Into<String>>(
        kind: ParseErrorKind,
        file_name: S,
        language: Language,
        detail: Option<String>,
    ) -> Self {
        let base = kind.message().text(language);
        let message = match &detail {
            Some(detail) if kind.shows_detail() => format!("{}: {}", base, detail),
            _ => base.to_string(),
        };

        Self {
            kind,
            file_name: file_name.into(),
            message,
            detail,
        }
    }

    pub fn unsupported<S: Into<String>>(file_name: S, language: Language) -> Self {
        Self::new(ParseErrorKind::UnsupportedFormat, file_name, language, None)
    }
}

/// Crate-wide error for everything outside a single extractor call.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{message}")]
    BatchLimitExceeded {
        submitted: usize,
        max: usize,
        message: String,
    },

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ConvertError {
    pub fn batch_limit(submitted: usize, max: usize, language: Language) -> Self {
        Self::BatchLimitExceeded {
            submitted,
            max,
            message: Message::ErrorLimit.text(language).to_string(),
        }
    }

    pub fn archive_error<S: Into<String>>(msg: S) -> Self {
        Self::Archive(msg.into())
    }
}

impl From<zip::result::ZipError> for ConvertError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Archive(err.to_string())
    }
}
