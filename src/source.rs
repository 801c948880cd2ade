//! File handles handed to the dispatcher.
//!
//! Content is read lazily so that a file can be rejected by name alone.

use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};

pub trait FileSource: Send + Sync {
    /// Display name, including the extension.
    fn name(&self) -> &str;

    fn read_bytes(&self) -> io::Result<Cow<'_, [u8]>>;
}

/// A file whose content is already in memory.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    bytes: Vec<u8>,
}

impl MemoryFile {
    pub fn new<S: Into<String>, B: Into<Vec<u8>>>(name: S, bytes: B) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl FileSource for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_bytes(&self) -> io::Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(&self.bytes))
    }
}

/// A file on disk, read when the dispatcher asks for it.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    name: String,
}

impl LocalFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileSource for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_bytes(&self) -> io::Result<Cow<'_, [u8]>> {
        std::fs::read(&self.path).map(Cow::Owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_file_uses_file_name() {
        let file = LocalFile::new("/tmp/some dir/Quarterly Report.xlsx");
        assert_eq!(file.name(), "Quarterly Report.xlsx");
    }

    #[test]
    fn test_local_file_missing_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = LocalFile::new(dir.path().join("missing.txt"));
        let err = file.read_bytes().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_memory_file_borrows_content() {
        let file = MemoryFile::new("a.txt", "hello");
        assert_eq!(file.read_bytes().unwrap().as_ref(), b"hello");
    }
}
