//! Effective configuration of Hydra-style YAML config trees.
//!
//! A Hydra config document can inherit from sibling documents through its
//! `defaults` list. This crate resolves such a chain into one merged value
//! tree.
//!
//! # Architecture
//!
//! - [`ConfigValue`]: an owned, order-preserving value tree
//! - [`deep_merge`]: map-wise recursive merge, everything else replaces
//! - [`TextSource`]: where document text comes from (disk, editor buffers)
//! - [`DefaultsResolver`]: walks the defaults chain depth-first, reporting
//!   every parsed document and every problem to a [`ResolveVisitor`]
//!
//! # Example
//!
//! ```rust
//! use hydra_config::{ConfigValue, DefaultsResolver, MemorySource, ResolveIssue};
//! use hydra_yaml::KeyPath;
//! use std::path::Path;
//!
//! let mut source = MemorySource::new();
//! source
//!     .add("conf/config.yaml", "defaults:\n  - base\nlr: 0.1\n")
//!     .add("conf/base.yaml", "lr: 0.5\nepochs: 3\n");
//!
//! let mut issues: Vec<ResolveIssue> = Vec::new();
//! let tree = DefaultsResolver::new(&source)
//!     .resolve(Path::new("conf/config.yaml"), &mut issues)
//!     .unwrap();
//!
//! assert_eq!(tree.get_path(&KeyPath::parse("lr")), Some(&ConfigValue::Real(0.1)));
//! assert_eq!(tree.get_path(&KeyPath::parse("epochs")), Some(&ConfigValue::Integer(3)));
//! ```

mod convert;
mod defaults;
mod merge;
mod source;
mod types;

pub use convert::config_value_from_yaml;
pub use defaults::{DefaultsResolver, ResolveOptions, ResolveVisitor, normalize};
pub use merge::deep_merge;
pub use source::{FileSystem, MemorySource, TextSource};
pub use types::{ConfigMap, ConfigValue, ResolveError, ResolveIssue};
