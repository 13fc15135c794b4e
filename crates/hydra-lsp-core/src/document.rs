//! Document abstraction and the open-buffer overlay.
//!
//! Editors hold unsaved text for the documents they have open. The
//! [`DocumentStore`] keeps that text and serves it to the resolver ahead of
//! the file system, so a load always sees what the user sees.

use hydra_config::{FileSystem, TextSource, normalize};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use url::Url;

/// An open editor buffer.
#[derive(Debug, Clone)]
pub struct Document {
    /// The URI the editor opened the document under.
    uri: String,
    /// The buffer content.
    content: String,
    /// Editor version, increasing with every change.
    version: i32,
}

impl Document {
    /// Create a new document with the given URI, content and version.
    pub fn new(uri: impl Into<String>, content: impl Into<String>, version: i32) -> Self {
        Self {
            uri: uri.into(),
            content: content.into(),
            version,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    /// Replace the content with a newer version.
    pub fn set_content(&mut self, content: impl Into<String>, version: i32) {
        self.content = content.into();
        self.version = version;
    }
}

/// Convert a document URI to a file system path.
///
/// `file://` URIs are decoded; anything that does not parse as a URL is taken
/// as a plain path. Returns `None` for URIs of other schemes.
pub fn uri_to_path(uri: &str) -> Option<PathBuf> {
    match Url::parse(uri) {
        Ok(url) if url.scheme() == "file" => url.to_file_path().ok().map(|p| normalize(&p)),
        Ok(_) => None,
        Err(_) => Some(normalize(Path::new(uri))),
    }
}

/// Convert a path to the URI used in locations.
///
/// Absolute paths become `file://` URIs. Relative paths are kept as plain
/// text, which [`uri_to_path`] maps back to the same path.
pub fn path_to_uri(path: &Path) -> String {
    match Url::from_file_path(path) {
        Ok(url) => url.to_string(),
        Err(()) => path.display().to_string(),
    }
}

/// A document store for open editor buffers.
///
/// Documents are keyed by their file system path, so `file:///a/b.yaml` and
/// the path `/a/b.yaml` name the same document.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: HashMap<PathBuf, Document>,
}

impl DocumentStore {
    /// Create a new empty document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open or update a document in the store.
    ///
    /// URIs that do not name a file are ignored.
    pub fn open(&mut self, uri: impl Into<String>, content: impl Into<String>, version: i32) {
        let uri = uri.into();
        let Some(path) = uri_to_path(&uri) else {
            tracing::debug!(uri, "ignoring non-file document");
            return;
        };
        self.documents
            .insert(path, Document::new(uri, content, version));
    }

    /// Update a document's content.
    ///
    /// Changes for documents that are not open, or that do not carry a newer
    /// version than the buffer already has, are ignored.
    pub fn change(&mut self, uri: &str, content: impl Into<String>, version: i32) {
        let Some(doc) = uri_to_path(uri).and_then(|path| self.documents.get_mut(&path)) else {
            return;
        };
        if version <= doc.version() {
            tracing::debug!(uri, version, current = doc.version(), "ignoring stale change");
            return;
        }
        doc.set_content(content, version);
    }

    /// Close a document (remove from store).
    pub fn close(&mut self, uri: &str) {
        if let Some(path) = uri_to_path(uri) {
            self.documents.remove(&path);
        }
    }

    /// Get an open document by URI.
    pub fn get(&self, uri: &str) -> Option<&Document> {
        uri_to_path(uri).and_then(|path| self.documents.get(&path))
    }

    /// Check if a document is open.
    pub fn contains(&self, uri: &str) -> bool {
        self.get(uri).is_some()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Current text of a document: the open buffer, or the file on disk.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from disk, or `InvalidInput` for a URI that
    /// does not name a file.
    pub fn text(&self, uri: &str) -> io::Result<String> {
        let path = uri_to_path(uri).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("not a file URI: {uri}"))
        })?;
        self.read_text(&path)
    }
}

impl TextSource for DocumentStore {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        match self.documents.get(&normalize(path)) {
            Some(doc) => {
                tracing::debug!(uri = doc.uri(), version = doc.version(), "reading open buffer");
                Ok(doc.content().to_string())
            }
            None => FileSystem.read_text(path),
        }
    }
}
