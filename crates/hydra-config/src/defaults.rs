//! Defaults-chain resolution.
//!
//! A document may list sibling documents under its `defaults` key:
//!
//! ```yaml
//! defaults:
//!   - base
//!   - _self_
//! trainer:
//!   devices: 2
//! ```
//!
//! Each entry names `<entry>.yaml` in the same directory. Entries are
//! resolved recursively, deep-merged in list order, and the document's own
//! keys are merged on top last. The `_self_` marker is skipped: the document
//! always wins over its defaults.
//!
//! Problems below the entry document never abort the walk. A missing,
//! unreadable, malformed or cyclic branch contributes an empty tree and is
//! reported to the [`ResolveVisitor`] as a [`ResolveIssue`].

use crate::convert::config_value_from_yaml;
use crate::merge::deep_merge;
use crate::source::TextSource;
use crate::types::{ConfigMap, ConfigValue, ResolveError, ResolveIssue};
use hydra_yaml::{ParsedDocument, Range, parse};
use std::io;
use std::path::{Component, Path, PathBuf};

/// Names the resolver looks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Top-level key holding the defaults list.
    pub defaults_key: String,
    /// Entry that stands for the document itself.
    pub self_marker: String,
    /// Extension appended to entry names (without the dot).
    pub extension: String,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            defaults_key: "defaults".to_string(),
            self_marker: "_self_".to_string(),
            extension: "yaml".to_string(),
        }
    }
}

/// Observer for a defaults walk.
///
/// Both methods have empty default implementations.
pub trait ResolveVisitor {
    /// Called for every successfully parsed document, in post-order: a
    /// document's defaults are visited before the document itself, and
    /// earlier entries before later ones.
    fn on_document(&mut self, _path: &Path, _document: &ParsedDocument) {}

    /// Called for every non-fatal problem.
    fn on_issue(&mut self, _issue: ResolveIssue) {}
}

/// Collects issues, ignores documents.
impl ResolveVisitor for Vec<ResolveIssue> {
    fn on_issue(&mut self, issue: ResolveIssue) {
        self.push(issue);
    }
}

/// Resolves the effective config of an entry document.
#[derive(Debug, Clone)]
pub struct DefaultsResolver<S> {
    source: S,
    options: ResolveOptions,
}

impl<S: TextSource> DefaultsResolver<S> {
    /// Create a resolver with default options.
    pub fn new(source: S) -> Self {
        Self {
            source,
            options: ResolveOptions::default(),
        }
    }

    /// Set the resolve options.
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolve `entry` and its whole defaults chain into one merged tree.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Unreadable`] only when the entry document
    /// itself cannot be read. Everything else is reported to `visitor`.
    pub fn resolve(
        &self,
        entry: &Path,
        visitor: &mut dyn ResolveVisitor,
    ) -> Result<ConfigValue, ResolveError> {
        let entry = normalize(entry);
        let text = self
            .source
            .read_text(&entry)
            .map_err(|err| ResolveError::Unreadable {
                path: entry.clone(),
                message: err.to_string(),
            })?;

        let mut chain = Vec::new();
        let tree = self.resolve_text(&entry, &text, &mut chain, visitor);
        Ok(ConfigValue::Map(tree))
    }

    fn resolve_text(
        &self,
        path: &Path,
        text: &str,
        chain: &mut Vec<PathBuf>,
        visitor: &mut dyn ResolveVisitor,
    ) -> ConfigMap {
        tracing::debug!(path = %path.display(), "resolving config document");

        let document = match parse(text) {
            Ok(document) => document,
            Err(source) => {
                tracing::warn!(path = %path.display(), error = %source, "skipping malformed config document");
                visitor.on_issue(ResolveIssue {
                    document: path.to_path_buf(),
                    range: Range::point(source.position()),
                    error: ResolveError::Malformed {
                        path: path.to_path_buf(),
                        source,
                    },
                });
                return ConfigMap::new();
            }
        };

        let own = match config_value_from_yaml(&document.yaml) {
            ConfigValue::Map(entries) => entries,
            ConfigValue::Null => ConfigMap::new(),
            other => {
                tracing::debug!(path = %path.display(), root = %other, "document root is not a mapping");
                ConfigMap::new()
            }
        };

        let anchor = self.defaults_anchor(&document);
        let names = self.default_names(path, &own, anchor, visitor);

        chain.push(path.to_path_buf());
        let mut merged = ConfigMap::new();
        for name in &names {
            let tree = self.resolve_default(path, name, anchor, chain, visitor);
            deep_merge(&mut merged, tree);
        }
        chain.pop();

        visitor.on_document(path, &document);
        deep_merge(&mut merged, own);
        merged
    }

    fn resolve_default(
        &self,
        parent: &Path,
        name: &str,
        anchor: Range,
        chain: &mut Vec<PathBuf>,
        visitor: &mut dyn ResolveVisitor,
    ) -> ConfigMap {
        let path = self.default_path(parent, name);

        if let Some(start) = chain.iter().position(|seen| *seen == path) {
            let mut cycle = chain[start..].to_vec();
            cycle.push(path.clone());
            let error = ResolveError::CyclicDefaults { path, chain: cycle };
            tracing::warn!(parent = %parent.display(), error = %error, "skipping default");
            visitor.on_issue(ResolveIssue {
                document: parent.to_path_buf(),
                range: anchor,
                error,
            });
            return ConfigMap::new();
        }

        match self.source.read_text(&path) {
            Ok(text) => self.resolve_text(&path, &text, chain, visitor),
            Err(err) => {
                let error = if err.kind() == io::ErrorKind::NotFound {
                    ResolveError::MissingDefaultFile {
                        name: name.to_string(),
                        path,
                    }
                } else {
                    ResolveError::Unreadable {
                        path,
                        message: err.to_string(),
                    }
                };
                tracing::warn!(parent = %parent.display(), error = %error, "skipping default");
                visitor.on_issue(ResolveIssue {
                    document: parent.to_path_buf(),
                    range: anchor,
                    error,
                });
                ConfigMap::new()
            }
        }
    }

    /// Plain entry names of the defaults list, self-marker excluded.
    fn default_names(
        &self,
        path: &Path,
        own: &ConfigMap,
        anchor: Range,
        visitor: &mut dyn ResolveVisitor,
    ) -> Vec<String> {
        let Some(defaults) = own.get(&self.options.defaults_key) else {
            return Vec::new();
        };

        let mut unsupported = |entry: &ConfigValue| {
            visitor.on_issue(ResolveIssue {
                document: path.to_path_buf(),
                range: anchor,
                error: ResolveError::UnsupportedDefaultsEntry {
                    entry: entry.to_string(),
                },
            });
        };

        match defaults {
            ConfigValue::Null => Vec::new(),
            ConfigValue::Array(entries) => entries
                .iter()
                .filter_map(|entry| match entry {
                    ConfigValue::String(name) if *name == self.options.self_marker => None,
                    ConfigValue::String(name) => Some(name.clone()),
                    other => {
                        unsupported(other);
                        None
                    }
                })
                .collect(),
            other => {
                unsupported(other);
                Vec::new()
            }
        }
    }

    fn default_path(&self, parent: &Path, name: &str) -> PathBuf {
        let file_name = if self.options.extension.is_empty() {
            name.to_string()
        } else {
            format!("{name}.{}", self.options.extension)
        };
        let dir = parent.parent().unwrap_or_else(|| Path::new(""));
        normalize(&dir.join(file_name))
    }

    /// Span of the top-level defaults key, where entry problems are reported.
    fn defaults_anchor(&self, document: &ParsedDocument) -> Range {
        document
            .symbols
            .definitions
            .iter()
            .find(|definition| {
                definition.key.len() == 1
                    && definition.key.last() == Some(self.options.defaults_key.as_str())
            })
            .map(|definition| definition.range)
            .unwrap_or_default()
    }
}

/// Lexically normalize a path: drop `.` and fold `..` into its parent.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
