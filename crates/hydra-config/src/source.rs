//! Document text access.
//!
//! The resolver never touches the file system directly; it reads through a
//! [`TextSource`], so an editor can serve unsaved buffers and tests can run
//! against in-memory trees.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Trait for reading document text.
pub trait TextSource {
    /// Read the full text of the document at `path`.
    ///
    /// A missing document is reported as [`io::ErrorKind::NotFound`].
    fn read_text(&self, path: &Path) -> io::Result<String>;
}

/// Source that reads from the file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystem;

impl TextSource for FileSystem {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Source that serves documents from an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<PathBuf, String>,
}

impl MemorySource {
    /// Create a new empty memory source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document.
    pub fn add(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> &mut Self {
        self.documents.insert(path.into(), text.into());
        self
    }
}

impl TextSource for MemorySource {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        self.documents.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no document at {}", path.display()),
            )
        })
    }
}

impl<T: TextSource + ?Sized> TextSource for &T {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        (**self).read_text(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source() {
        let mut source = MemorySource::new();
        source.add("conf/a.yaml", "a: 1\n");

        assert_eq!(source.read_text(Path::new("conf/a.yaml")).unwrap(), "a: 1\n");
        let err = source.read_text(Path::new("conf/b.yaml")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_file_system_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "x: 1\n").unwrap();

        assert_eq!(FileSystem.read_text(&path).unwrap(), "x: 1\n");
        assert_eq!(
            FileSystem
                .read_text(&dir.path().join("missing.yaml"))
                .unwrap_err()
                .kind(),
            io::ErrorKind::NotFound
        );
    }
}
