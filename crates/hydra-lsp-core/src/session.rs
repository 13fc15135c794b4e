//! A workspace session: open documents, settings and the published table.
//!
//! Loads run to completion before anything is published. Publication is a
//! single swap of an `Arc<SymbolTable>`, so a query either sees the previous
//! table or the new one, never a partially built one.

use crate::diagnostics::{diagnose, issue_diagnostics};
use crate::document::DocumentStore;
use crate::intel;
use crate::loader::{LoadError, load};
use crate::settings::{Settings, SettingsError};
use crate::symbols::SymbolTable;
use crate::types::{Diagnostic, Hover, Location, Position};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Default)]
pub struct Session {
    documents: RwLock<DocumentStore>,
    settings: Settings,
    table: RwLock<Option<Arc<SymbolTable>>>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            documents: RwLock::new(DocumentStore::new()),
            settings,
            table: RwLock::new(None),
        }
    }

    /// Create a session with the settings file found in `root`, if any.
    pub fn for_workspace(root: &Path) -> Result<Self, SettingsError> {
        Ok(Self::new(Settings::load_from_dir(root)?))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Open or replace an editor buffer.
    pub fn open(&self, uri: &str, text: impl Into<String>, version: i32) {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .open(uri, text, version);
    }

    /// Update an open editor buffer.
    pub fn change(&self, uri: &str, text: impl Into<String>, version: i32) {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .change(uri, text, version);
    }

    /// Drop an editor buffer; the file on disk is used again.
    pub fn close(&self, uri: &str) {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .close(uri);
    }

    /// Rebuild the symbol table from `entry_uri` and publish it.
    ///
    /// On error the previously published table stays in place.
    pub fn reload(&self, entry_uri: &str) -> Result<Arc<SymbolTable>, LoadError> {
        let table = {
            let documents = self.documents.read().unwrap_or_else(PoisonError::into_inner);
            Arc::new(load(entry_uri, &*documents, &self.settings)?)
        };

        *self.table.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&table));
        tracing::info!(entry = entry_uri, "symbol table published");
        Ok(table)
    }

    /// The currently published table.
    pub fn snapshot(&self) -> Option<Arc<SymbolTable>> {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn text(&self, uri: &str) -> Option<String> {
        let documents = self.documents.read().unwrap_or_else(PoisonError::into_inner);
        match documents.text(uri) {
            Ok(text) => Some(text),
            Err(err) => {
                tracing::warn!(uri, error = %err, "cannot read document");
                None
            }
        }
    }

    pub fn hover(&self, uri: &str, position: Position) -> Option<Hover> {
        let table = self.snapshot()?;
        let text = self.text(uri)?;
        intel::hover(&table, &text, uri, position)
    }

    pub fn definition(&self, uri: &str, position: Position) -> Option<Location> {
        let table = self.snapshot()?;
        let text = self.text(uri)?;
        intel::definition(&table, &text, uri, position).cloned()
    }

    pub fn references(&self, uri: &str, position: Position) -> Vec<Location> {
        let (Some(table), Some(text)) = (self.snapshot(), self.text(uri)) else {
            return Vec::new();
        };
        intel::references(&table, &text, uri, position)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Load issues and unresolved references, optionally for one document.
    pub fn diagnostics(&self, filter: Option<&str>) -> Vec<Diagnostic> {
        let Some(table) = self.snapshot() else {
            tracing::warn!("diagnostics requested before any load");
            return Vec::new();
        };
        let documents = self.documents.read().unwrap_or_else(PoisonError::into_inner);

        let mut diagnostics = issue_diagnostics(&table, filter, &self.settings);
        diagnostics.extend(diagnose(&table, &*documents, filter, &self.settings));
        diagnostics
    }
}
