//! # hydra-yaml
//!
//! Scanning of Hydra-style YAML config documents.
//!
//! This crate turns the text of one config document into:
//! - the document's value tree (`yaml-rust2::Yaml`),
//! - the dotted key path and source span of every addressable key,
//! - every `${...}` interpolation placeholder, with the key path of the
//!   mapping that holds it.
//!
//! ## Design
//!
//! Parsing runs in two passes over the `yaml-rust2` event stream. The token
//! classifier ([`events`]) reduces parser events to a closed set of
//! structural events with explicit key/value markers. The key-path builder
//! ([`symbols`]) walks those events with a path stack. Positions are
//! zero-based lines and character columns, computed with a [`LineIndex`].
//!
//! ## Example
//!
//! ```rust
//! use hydra_yaml::parse;
//!
//! let doc = parse("data:\n  dir: ${root}/data\n").unwrap();
//! let keys: Vec<String> = doc
//!     .symbols
//!     .definitions
//!     .iter()
//!     .map(|d| d.key.to_string())
//!     .collect();
//! assert_eq!(keys, ["data", "data.dir"]);
//! assert_eq!(doc.symbols.interpolations[0].name, "root");
//! ```

mod error;
pub mod events;
pub mod interpolation;
mod key_path;
mod parser;
mod source;
pub mod symbols;

pub use error::{Error, Result};
pub use key_path::KeyPath;
pub use parser::{ParsedDocument, parse};
pub use source::{LineIndex, Position, Range};
pub use symbols::{Definition, DocumentSymbols, Interpolation};
pub use yaml_rust2::Yaml;
