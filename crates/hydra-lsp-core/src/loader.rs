//! Building a [`SymbolTable`] from an entry document.

use crate::document::{path_to_uri, uri_to_path};
use crate::settings::Settings;
use crate::symbols::{Definitions, LoadIssue, Reference, References, SymbolTable};
use crate::types::Location;
use hydra_config::{DefaultsResolver, ResolveError, ResolveIssue, ResolveVisitor, TextSource};
use hydra_yaml::ParsedDocument;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort a load.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    /// The entry URI does not name a file.
    #[error("not a file URI: {uri}")]
    InvalidUri { uri: String },

    /// The entry document itself could not be read.
    #[error("cannot load {document}: {reason}")]
    EntryUnreadable { document: String, reason: String },
}

/// Load the config tree rooted at `entry_uri`.
///
/// Every document is read fresh through `source`. Problems below the entry
/// document (missing defaults, malformed documents, cycles) do not fail the
/// load; they are recorded in [`SymbolTable::issues`].
///
/// # Errors
///
/// Returns a [`LoadError`] only when the entry document cannot be read.
pub fn load(
    entry_uri: &str,
    source: &dyn TextSource,
    settings: &Settings,
) -> Result<SymbolTable, LoadError> {
    let entry = uri_to_path(entry_uri).ok_or_else(|| LoadError::InvalidUri {
        uri: entry_uri.to_string(),
    })?;

    let resolver = DefaultsResolver::new(source).with_options(settings.resolve_options());
    let mut collector = SymbolCollector::default();

    let tree = resolver
        .resolve(&entry, &mut collector)
        .map_err(|err| match err {
            ResolveError::Unreadable { message, .. } => LoadError::EntryUnreadable {
                document: entry_uri.to_string(),
                reason: message,
            },
            other => LoadError::EntryUnreadable {
                document: entry_uri.to_string(),
                reason: other.to_string(),
            },
        })?;

    tracing::info!(
        entry = entry_uri,
        documents = collector.indexed.len(),
        definitions = collector.definitions.len(),
        references = collector.references.len(),
        issues = collector.issues.len(),
        "config loaded"
    );

    Ok(SymbolTable::new(
        tree,
        collector.definitions,
        collector.references,
        collector.issues,
    ))
}

/// Accumulates symbols over the resolver's post-order walk.
///
/// Definitions are overwritten as documents arrive, so the document that
/// wins the merge also owns the definition location. References are taken
/// once per document, even when the document is reached along two branches.
#[derive(Default)]
struct SymbolCollector {
    definitions: Definitions,
    references: References,
    issues: Vec<LoadIssue>,
    indexed: HashSet<PathBuf>,
}

impl ResolveVisitor for SymbolCollector {
    fn on_document(&mut self, path: &Path, document: &ParsedDocument) {
        let uri = path_to_uri(path);
        tracing::debug!(
            uri,
            definitions = document.symbols.definitions.len(),
            references = document.symbols.interpolations.len(),
            "indexing config document"
        );

        for definition in &document.symbols.definitions {
            self.definitions.insert(
                definition.key.clone(),
                Location::new(uri.clone(), definition.range),
            );
        }

        if !self.indexed.insert(path.to_path_buf()) {
            return;
        }
        for interpolation in &document.symbols.interpolations {
            self.references.push(Reference {
                name: interpolation.name.clone(),
                location: Location::new(uri.clone(), interpolation.range),
                enclosing: interpolation.enclosing.clone(),
            });
        }
    }

    fn on_issue(&mut self, issue: ResolveIssue) {
        self.issues.push(LoadIssue {
            location: Location::new(path_to_uri(&issue.document), issue.range),
            error: issue.error,
        });
    }
}
