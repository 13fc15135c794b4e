//! Transport-agnostic language analysis for Hydra config trees.
//!
//! This crate indexes a tree of YAML config documents linked by `defaults`
//! lists and answers editor queries against it, without any LSP protocol
//! dependencies. A server front end converts the results to protocol types.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────────┐   ┌────────────────────────────┐
//! │  hydra-yaml  │──▶│  hydra-config  │──▶│       hydra-lsp-core       │
//! │ keys, ${..}  │   │ defaults, merge│   │ symbol table, diagnostics, │
//! └──────────────┘   └────────────────┘   │ hover/definition/references│
//!                                         └────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use hydra_lsp_core::{Position, Session, Settings};
//!
//! let session = Session::new(Settings::default());
//! let table = session.reload("file:///work/conf/config.yaml").unwrap();
//! println!("{} keys defined", table.definitions().len());
//!
//! for diagnostic in session.diagnostics(None) {
//!     println!("{}: {}", diagnostic.uri, diagnostic.message);
//! }
//!
//! if let Some(hover) = session.hover("file:///work/conf/config.yaml", Position::new(3, 12)) {
//!     println!("{}", hover.to_json_entry().unwrap());
//! }
//! ```

pub mod diagnostics;
pub mod document;
pub mod intel;
pub mod loader;
pub mod position_index;
pub mod session;
pub mod settings;
pub mod symbols;
pub mod types;

// Re-export main types and functions for convenience
pub use diagnostics::{diagnose, issue_diagnostics};
pub use document::{Document, DocumentStore, path_to_uri, uri_to_path};
pub use intel::{definition, hover, key_text_at, references, variable_at};
pub use loader::{LoadError, load};
pub use position_index::PositionIndex;
pub use session::Session;
pub use settings::{Settings, SettingsError};
pub use symbols::{Definitions, LoadIssue, Reference, References, SymbolTable, TableError};
pub use types::{Diagnostic, DiagnosticSeverity, Hover, Location, Position, Range};
