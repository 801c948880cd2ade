use crate::error::{DocumentError, ParseError, ParseErrorKind, Result};
use crate::i18n::Language;
use crate::record::RecordKind;
use crate::source::FileSource;
use crate::utils;
use serde_json::Value;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, warn};

pub mod csv;
pub mod docx;
pub mod excel;
pub mod json;
pub mod pdf;
pub mod text;

/// The closed set of formats the dispatcher accepts, keyed by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Xlsx,
    Xls,
    Csv,
    Txt,
    Docx,
    Doc,
    Json,
    Pdf,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 8] = [
        DocumentKind::Xlsx,
        DocumentKind::Xls,
        DocumentKind::Csv,
        DocumentKind::Txt,
        DocumentKind::Docx,
        DocumentKind::Doc,
        DocumentKind::Json,
        DocumentKind::Pdf,
    ];

    /// Exact match against a lowercase extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.extension() == ext)
    }

    pub fn from_filename(filename: &str) -> Option<Self> {
        utils::get_file_extension(filename).and_then(|ext| Self::from_extension(&ext))
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
            Self::Csv => "csv",
            Self::Txt => "txt",
            Self::Docx => "docx",
            Self::Doc => "doc",
            Self::Json => "json",
            Self::Pdf => "pdf",
        }
    }

    pub fn record_kind(self) -> RecordKind {
        match self {
            Self::Xlsx | Self::Xls | Self::Csv => RecordKind::Spreadsheet,
            Self::Txt => RecordKind::Text,
            Self::Docx | Self::Doc => RecordKind::Word,
            Self::Json => RecordKind::Json,
            Self::Pdf => RecordKind::Pdf,
        }
    }

    pub fn error_kind(self) -> ParseErrorKind {
        match self {
            Self::Xlsx | Self::Xls | Self::Csv => ParseErrorKind::SpreadsheetParse,
            Self::Txt => ParseErrorKind::TextParse,
            Self::Docx | Self::Doc => ParseErrorKind::DocumentParse,
            Self::Json => ParseErrorKind::JsonParse,
            Self::Pdf => ParseErrorKind::PdfParse,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Language of error messages. Never changes what is extracted.
    pub language: Language,
}

impl ParseOptions {
    pub fn with_language(language: Language) -> Self {
        Self { language }
    }
}

/// Main document parsing function
///
/// Selects an extractor by extension and turns every failure, panics
/// included, into a [`ParseError`] naming the file. Unsupported
/// extensions are rejected before the content is read.
pub fn parse_document(
    file: &dyn FileSource,
    options: &ParseOptions,
) -> std::result::Result<Value, ParseError> {
    let name = file.name();
    let Some(kind) = DocumentKind::from_filename(name) else {
        debug!(file = %name, "Rejected unsupported file extension");
        return Err(ParseError::unsupported(name, options.language));
    };

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> Result<Value> {
        let content = file.read_bytes()?;
        extract(kind, &content)
    }));

    let failure = match outcome {
        Ok(Ok(value)) => {
            debug!(file = %name, format = kind.extension(), "Parsed document");
            return Ok(value);
        }
        Ok(Err(err)) => {
            warn!(file = %name, format = kind.extension(), error = %err, "Extraction failed");
            err
        }
        Err(payload) => {
            let err = DocumentError::Panicked(panic_message(payload.as_ref()));
            error!(file = %name, format = kind.extension(), error = %err, "Extractor panicked");
            err
        }
    };

    Err(ParseError::new(
        kind.error_kind(),
        name,
        options.language,
        Some(failure.detail()),
    ))
}

/// Run the extractor for `kind` over raw content.
pub fn extract(kind: DocumentKind, content: &[u8]) -> Result<Value> {
    match kind {
        DocumentKind::Xlsx => excel::parse_xlsx(content),
        DocumentKind::Xls => excel::parse_xls(content),
        DocumentKind::Csv => csv::parse_csv(content),
        DocumentKind::Txt => text::parse_txt(content),
        DocumentKind::Docx => docx::parse_docx(content),
        DocumentKind::Doc => docx::parse_doc(content),
        DocumentKind::Json => json::parse_json(content),
        DocumentKind::Pdf => pdf::parse_pdf(content),
    }
}

/// Get list of supported file formats
pub fn get_supported_formats() -> Vec<String> {
    DocumentKind::ALL
        .iter()
        .map(|kind| kind.extension().to_string())
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryFile;
    use std::borrow::Cow;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingFile {
        name: String,
        reads: AtomicUsize,
    }

    impl FileSource for CountingFile {
        fn name(&self) -> &str {
            &self.name
        }

        fn read_bytes(&self) -> io::Result<Cow<'_, [u8]>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(Cow::Borrowed(b"{}"))
        }
    }

    struct PanickingFile;

    impl FileSource for PanickingFile {
        fn name(&self) -> &str {
            "boom.txt"
        }

        fn read_bytes(&self) -> io::Result<Cow<'_, [u8]>> {
            panic!("reader exploded")
        }
    }

    struct FailingFile;

    impl FileSource for FailingFile {
        fn name(&self) -> &str {
            "gone.csv"
        }

        fn read_bytes(&self) -> io::Result<Cow<'_, [u8]>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "access denied"))
        }
    }

    #[test]
    fn test_document_kind_from_filename() {
        assert_eq!(DocumentKind::from_filename("A.XLSX"), Some(DocumentKind::Xlsx));
        assert_eq!(DocumentKind::from_filename("notes.txt"), Some(DocumentKind::Txt));
        assert_eq!(DocumentKind::from_filename("slides.pptx"), None);
        assert_eq!(DocumentKind::from_filename("json"), None);
        assert_eq!(DocumentKind::Doc.record_kind(), RecordKind::Word);
    }

    #[test]
    fn test_supported_formats() {
        assert_eq!(
            get_supported_formats(),
            vec!["xlsx", "xls", "csv", "txt", "docx", "doc", "json", "pdf"]
        );
    }

    #[test]
    fn test_unsupported_extension_is_not_read() {
        let file = CountingFile {
            name: "image.png".to_string(),
            reads: AtomicUsize::new(0),
        };
        let err = parse_document(&file, &ParseOptions::default()).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnsupportedFormat);
        assert_eq!(err.file_name, "image.png");
        assert_eq!(file.reads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_supported_extension_is_read_once() {
        let file = CountingFile {
            name: "data.JSON".to_string(),
            reads: AtomicUsize::new(0),
        };
        let value = parse_document(&file, &ParseOptions::default()).unwrap();
        assert_eq!(value, serde_json::json!({}));
        assert_eq!(file.reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panics_become_parse_errors() {
        let err = parse_document(&PanickingFile, &ParseOptions::with_language(Language::En))
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TextParse);
        assert_eq!(err.message, "Text file could not be read.");
        assert_eq!(err.detail.as_deref(), Some("reader exploded"));
    }

    #[test]
    fn test_read_failures_use_the_format_error() {
        let err = parse_document(&FailingFile, &ParseOptions::with_language(Language::En))
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::SpreadsheetParse);
        assert_eq!(err.to_string(), "gone.csv: Excel/CSV file could not be read.");
    }

    #[test]
    fn test_language_only_changes_the_message() {
        let file = MemoryFile::new("broken.json", "{");
        let tr = parse_document(&file, &ParseOptions::with_language(Language::Tr)).unwrap_err();
        let en = parse_document(&file, &ParseOptions::with_language(Language::En)).unwrap_err();
        assert_eq!(tr.kind, en.kind);
        assert_eq!(tr.detail, en.detail);
        assert!(tr.message.starts_with("Geçersiz JSON dosyası."));
        assert!(en.message.starts_with("Invalid JSON file."));
    }
}
