//! Error types for config document scanning.

use crate::source::{LineIndex, Position};
use thiserror::Error;

/// Result type alias for hydra-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while scanning a config document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The YAML scanner rejected the text, or the event stream broke the
    /// key/value grammar the key-path builder relies on.
    #[error("malformed document at {}:{}: {message}", .position.line + 1, .position.character + 1)]
    MalformedDocument {
        /// What went wrong.
        message: String,
        /// Where it went wrong (zero-based).
        position: Position,
    },
}

impl Error {
    /// Create a `MalformedDocument` error at a position.
    pub fn malformed(message: impl Into<String>, position: Position) -> Self {
        Error::MalformedDocument {
            message: message.into(),
            position,
        }
    }

    /// Convert a scanner error, resolving its marker against the document.
    pub(crate) fn from_scan(err: &yaml_rust2::scanner::ScanError, lines: &LineIndex) -> Self {
        Error::malformed(err.to_string(), lines.position(err.marker().index()))
    }

    /// The position the error points at.
    pub fn position(&self) -> Position {
        match self {
            Error::MalformedDocument { position, .. } => *position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_one_based_coordinates() {
        let err = Error::malformed("unexpected token", Position::new(2, 4));
        insta::assert_snapshot!(err.to_string(), @"malformed document at 3:5: unexpected token");
    }
}
