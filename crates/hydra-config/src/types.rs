//! Core type definitions for resolved configuration.

use hydra_yaml::{KeyPath, Range};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Key-ordered mapping of config entries.
pub type ConfigMap = IndexMap<String, ConfigValue>;

/// A configuration value.
///
/// Mirrors the YAML value types. Maps keep insertion order, so a merged tree
/// lists keys in the order they were first defined along the defaults chain.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    String(String),
    Array(Vec<ConfigValue>),
    Map(ConfigMap),
}

impl ConfigValue {
    /// Create an empty map value.
    pub fn empty_map() -> Self {
        ConfigValue::Map(ConfigMap::new())
    }

    /// Check if this is null.
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Check if this is a map value.
    pub fn is_map(&self) -> bool {
        matches!(self, ConfigValue::Map(_))
    }

    /// Check if this is an array value.
    pub fn is_array(&self) -> bool {
        matches!(self, ConfigValue::Array(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as a float. Integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Real(f) => Some(*f),
            ConfigValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get as array items if this is an array.
    pub fn as_array(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get as map entries if this is a map.
    pub fn as_map(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up one path segment.
    ///
    /// On a map the segment is a key. On an array a segment that parses as
    /// an index selects an item.
    pub fn get(&self, segment: &str) -> Option<&ConfigValue> {
        match self {
            ConfigValue::Map(entries) => entries.get(segment),
            ConfigValue::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index)),
            _ => None,
        }
    }

    /// Walk a key path from this value. The root path selects `self`.
    pub fn get_path(&self, path: &KeyPath) -> Option<&ConfigValue> {
        path.segments()
            .iter()
            .try_fold(self, |value, segment| value.get(segment))
    }
}

/// Flow-style rendering, e.g. `{db: mysql}` or `[1, 2]`.
impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Null => f.write_str("null"),
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Integer(i) => write!(f, "{i}"),
            ConfigValue::Real(r) => write!(f, "{r}"),
            ConfigValue::String(s) => f.write_str(s),
            ConfigValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            ConfigValue::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(entries: ConfigMap) -> Self {
        ConfigValue::Map(entries)
    }
}

/// Errors met while walking a defaults chain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// A defaults entry names a file that does not exist.
    #[error("default `{name}` not found: {}", path.display())]
    MissingDefaultFile {
        /// The entry as written in the defaults list
        name: String,
        /// Where the file was looked for
        path: PathBuf,
    },

    /// A document exists but could not be read.
    #[error("cannot read {}: {message}", path.display())]
    Unreadable {
        path: PathBuf,
        message: String,
    },

    /// A document is not valid YAML, or breaks the key/value grammar.
    #[error("{}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: hydra_yaml::Error,
    },

    /// A defaults entry leads back to a document that is still being resolved.
    #[error("cyclic defaults: {}", DisplayChain(chain))]
    CyclicDefaults {
        /// The document that was re-entered
        path: PathBuf,
        /// Documents in resolution order, ending with `path`
        chain: Vec<PathBuf>,
    },

    /// A defaults entry that is not a plain name (e.g. a `group: option` map).
    #[error("unsupported defaults entry: {entry}")]
    UnsupportedDefaultsEntry {
        /// Rendering of the entry
        entry: String,
    },
}

struct DisplayChain<'a>(&'a [PathBuf]);

impl fmt::Display for DisplayChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, path) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}", path.display())?;
        }
        Ok(())
    }
}

/// A non-fatal problem found while resolving, anchored in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveIssue {
    /// The document the problem should be reported in.
    pub document: PathBuf,
    /// Where in that document: the `defaults` key for problems with an
    /// entry, the error position for malformed documents.
    pub range: Range,
    pub error: ResolveError,
}
