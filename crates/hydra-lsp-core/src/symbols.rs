//! The symbol table of a loaded config tree.
//!
//! A [`SymbolTable`] is built once per load and never mutated afterwards.
//! It owns the effective (merged) value tree, where every key is defined,
//! where every `${...}` reference occurs, and the problems met on the way.

use crate::position_index::PositionIndex;
use crate::types::{Location, Position};
use hydra_config::{ConfigValue, ResolveError};
use hydra_yaml::KeyPath;
use indexmap::IndexMap;
use thiserror::Error;

/// Key path to definition location, one entry per key.
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    entries: IndexMap<KeyPath, Location>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a definition. A later write for the same key replaces the
    /// location but keeps the key's original position in iteration order.
    pub fn insert(&mut self, key: KeyPath, location: Location) {
        self.entries.insert(key, location);
    }

    /// Look up a dotted key.
    pub fn lookup(&self, key: &str) -> Option<&Location> {
        self.entries.get(&KeyPath::parse(key))
    }

    pub fn get(&self, key: &KeyPath) -> Option<&Location> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&KeyPath, &Location)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One `${name}` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// The name as written, possibly relative (`..tag`).
    pub name: String,
    /// Span of the scalar holding the placeholder.
    pub location: Location,
    /// Key path of the mapping holding the scalar.
    pub enclosing: KeyPath,
}

/// Reference name to its occurrences, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct References {
    entries: IndexMap<String, Vec<Reference>>,
}

impl References {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an occurrence. Occurrences are never deduplicated.
    pub fn push(&mut self, reference: Reference) {
        self.entries
            .entry(reference.name.clone())
            .or_default()
            .push(reference);
    }

    /// Locations of every occurrence of `name`.
    pub fn lookup(&self, name: &str) -> Vec<&Location> {
        self.occurrences(name).iter().map(|r| &r.location).collect()
    }

    pub fn occurrences(&self, name: &str) -> &[Reference] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Names with their occurrences, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Reference])> {
        self.entries
            .iter()
            .map(|(name, occurrences)| (name.as_str(), occurrences.as_slice()))
    }

    /// Every occurrence, grouped by name.
    pub fn all(&self) -> impl Iterator<Item = &Reference> {
        self.entries.values().flatten()
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A problem met while loading, located in the document to report it in.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadIssue {
    pub location: Location,
    pub error: ResolveError,
}

/// Errors from symbol table operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// The table is read-only.
    #[error("setting `{key}` is not supported: symbol tables are read-only")]
    Unsupported { key: String },
}

/// The symbol table of one load.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    tree: ConfigValue,
    definitions: Definitions,
    references: References,
    position_index: PositionIndex,
    issues: Vec<LoadIssue>,
}

impl SymbolTable {
    /// Assemble a table. The position index is built from `definitions`.
    pub fn new(
        tree: ConfigValue,
        definitions: Definitions,
        references: References,
        issues: Vec<LoadIssue>,
    ) -> Self {
        let position_index = PositionIndex::build(definitions.iter());
        Self {
            tree,
            definitions,
            references,
            position_index,
            issues,
        }
    }

    /// The effective (merged) value tree.
    pub fn tree(&self) -> &ConfigValue {
        &self.tree
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    pub fn references(&self) -> &References {
        &self.references
    }

    pub fn position_index(&self) -> &PositionIndex {
        &self.position_index
    }

    pub fn issues(&self) -> &[LoadIssue] {
        &self.issues
    }

    /// Resolve a possibly relative key to an absolute key path.
    ///
    /// Without leading dots, or at the root, `key` is taken literally. One
    /// leading dot anchors it at `enclosing`, and each further dot drops one
    /// trailing segment: `..tag` in `data.loader` is `data.tag`. Returns
    /// `None` when there are more dots than segments to drop.
    pub fn resolve_key(&self, key: &str, enclosing: &KeyPath) -> Option<KeyPath> {
        let suffix = key.trim_start_matches('.');
        let dots = key.len() - suffix.len();
        if dots == 0 || enclosing.is_empty() {
            // a literal `.x` has an empty first segment and never matches
            return Some(KeyPath::parse(key));
        }
        let base = enclosing.ancestor(dots - 1)?;
        Some(base.join(&KeyPath::parse(suffix)))
    }

    /// Effective value of `key`, resolved against `enclosing`.
    ///
    /// A key that is present with a null value is `Some(&ConfigValue::Null)`.
    pub fn get(&self, key: &str, enclosing: &KeyPath) -> Option<&ConfigValue> {
        let path = self.resolve_key(key, enclosing)?;
        self.tree.get_path(&path)
    }

    /// Always fails: tables are rebuilt on load, never edited in place.
    pub fn set(&mut self, key: &str, _value: ConfigValue) -> Result<(), TableError> {
        Err(TableError::Unsupported {
            key: key.to_string(),
        })
    }

    /// The key defined at `position` in `uri`.
    pub fn locate(&self, uri: &str, position: Position) -> Option<&KeyPath> {
        self.position_index.locate(uri, position)
    }

    /// The first reference occurrence whose scalar spans `position` in `uri`.
    pub fn reference_at(&self, uri: &str, position: Position) -> Option<&Reference> {
        self.references
            .all()
            .find(|r| r.location.uri == uri && r.location.range.contains(position))
    }

    /// Every occurrence that resolves to `key`, relative ones included.
    pub fn references_to(&self, key: &KeyPath) -> Vec<&Reference> {
        self.references
            .all()
            .filter(|r| self.resolve_key(&r.name, &r.enclosing).as_ref() == Some(key))
            .collect()
    }
}
