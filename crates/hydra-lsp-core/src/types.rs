//! Core types for editor-facing results.
//!
//! These types are designed to be:
//! - Transport-agnostic (no LSP protocol dependencies)
//! - Easily serializable to JSON
//! - Easily convertible to `lsp-types` by a server front end
//!
//! All positions use 0-based line and character indices. Characters count
//! Unicode scalar values.

use hydra_config::ConfigValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use hydra_yaml::{Position, Range};

/// A range inside a specific document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// The document's URI (or plain path for relative documents).
    pub uri: String,
    pub range: Range,
}

impl Location {
    /// Create a new location.
    pub fn new(uri: impl Into<String>, range: Range) -> Self {
        Self {
            uri: uri.into(),
            range,
        }
    }
}

/// Diagnostic severity levels, matching LSP DiagnosticSeverity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// Reports an error.
    Error = 1,
    /// Reports a warning.
    Warning = 2,
    /// Reports an information.
    Information = 3,
    /// Reports a hint.
    Hint = 4,
}

/// A diagnostic message attached to a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The document the diagnostic belongs to.
    pub uri: String,
    /// The range at which the diagnostic applies.
    pub range: Range,
    /// The diagnostic's severity.
    pub severity: DiagnosticSeverity,
    /// The diagnostic's code, which might appear in the user interface.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// A human-readable string describing the source of this diagnostic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// The diagnostic's message.
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(location: Location, severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            uri: location.uri,
            range: location.range,
            severity,
            code: None,
            source: None,
            message: message.into(),
        }
    }

    /// Set the diagnostic code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the diagnostic source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Hover result: a key and its effective value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hover {
    /// Dotted key path.
    pub key: String,
    pub value: ConfigValue,
}

impl Hover {
    /// Render as the body of a JSON object: `"key": value`, pretty-printed.
    pub fn to_json_entry(&self) -> serde_json::Result<String> {
        let mut object = IndexMap::new();
        object.insert(self.key.as_str(), &self.value);
        let rendered = serde_json::to_string_pretty(&object)?;

        let inner = rendered
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .unwrap_or(&rendered);
        Ok(inner.trim_matches('\n').to_string())
    }
}
