use crate::batch::BatchRunner;
use crate::i18n::Language;
use crate::identity::LocalIdentity;
use crate::parsers::{self, ParseOptions};
use crate::source::{FileSource, MemoryFile};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

#[pymodule]
fn document_converter(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(parse_document, m)?)?;
    m.add_function(wrap_pyfunction!(get_supported_formats, m)?)?;
    m.add_function(wrap_pyfunction!(process_batch_documents, m)?)?;
    Ok(())
}

/// Parse a document from bytes and return its payload as JSON text
#[pyfunction]
#[pyo3(signature = (content, filename, language=None))]
fn parse_document(content: &[u8], filename: &str, language: Option<&str>) -> PyResult<String> {
    let options = parse_options(language)?;
    let file = MemoryFile::new(filename, content);

    let payload = parsers::parse_document(&file, &options)
        .map_err(|e| PyRuntimeError::new_err(format!("Document parsing failed: {}", e)))?;
    serde_json::to_string(&payload).map_err(|e| PyRuntimeError::new_err(e.to_string()))
}

/// Get list of supported file formats
#[pyfunction]
fn get_supported_formats() -> PyResult<Vec<String>> {
    Ok(parsers::get_supported_formats())
}

/// Process multiple documents in batch
///
/// Returns the records as a JSON array and the per-file error messages.
#[pyfunction]
#[pyo3(signature = (documents, language=None))]
fn process_batch_documents(
    py: Python<'_>,
    documents: Vec<(Vec<u8>, String)>,
    language: Option<&str>,
) -> PyResult<(String, Vec<String>)> {
    let options = parse_options(language)?;

    py.allow_threads(move || {
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| PyRuntimeError::new_err(format!("Failed to start runtime: {}", e)))?;

        let files: Vec<Box<dyn FileSource>> = documents
            .into_iter()
            .map(|(content, filename)| Box::new(MemoryFile::new(filename, content)) as Box<dyn FileSource>)
            .collect();

        let runner = BatchRunner::new(LocalIdentity::global()).with_options(options);
        let outcome = runtime
            .block_on(runner.run(files))
            .map_err(|e| PyValueError::new_err(e.to_string()))?;

        let records = serde_json::to_string(&outcome.records)
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        Ok((records, outcome.errors))
    })
}

fn parse_options(language: Option<&str>) -> PyResult<ParseOptions> {
    let language = match language {
        Some(tag) => tag.parse::<Language>().map_err(PyValueError::new_err)?,
        None => Language::default(),
    };
    Ok(ParseOptions::with_language(language))
}
