//! Editor queries: hover, go-to-definition and find-references.
//!
//! Queries work on a single line of the current document text. Left of the
//! first `:` the cursor is on a key; right of it, on a value that may hold
//! `${...}` placeholders.

use crate::symbols::SymbolTable;
use crate::types::{Hover, Location, Position};
use hydra_yaml::KeyPath;
use hydra_yaml::interpolation::placeholders;

/// Name inside the `${...}` placeholder under the cursor, on the value side
/// of a `key: value` line. A line without `:` continues a multi-line value
/// and is all value side.
///
/// `character` is a character offset into `line`.
pub fn variable_at(line: &str, character: u32) -> Option<String> {
    let cursor = character as usize;
    let value_start = colon_column(line).map_or(0, |colon| colon + 1);
    placeholders(line)
        .into_iter()
        .find(|p| p.start >= value_start && p.start <= cursor && cursor < p.end)
        .map(|p| p.name)
}

/// Raw key text when the cursor is left of (or on) the first `:`.
pub fn key_text_at(line: &str, character: u32) -> Option<String> {
    let colon = colon_column(line)?;
    if character as usize > colon {
        return None;
    }
    let key: String = line.chars().take(colon).collect();
    let key = key.trim().trim_start_matches("- ").trim();
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

fn colon_column(line: &str) -> Option<usize> {
    line.chars().position(|c| c == ':')
}

fn line_at(text: &str, position: Position) -> Option<&str> {
    text.lines().nth(position.line as usize)
}

fn on_value_side(line: &str, position: Position) -> bool {
    colon_column(line).is_none_or(|colon| position.character as usize > colon)
}

/// Absolute key of the placeholder under the cursor, resolved against the
/// enclosing path of the occurrence it belongs to.
fn placeholder_key(
    table: &SymbolTable,
    line: &str,
    uri: &str,
    position: Position,
) -> Option<KeyPath> {
    let name = variable_at(line, position.character)?;
    let enclosing = table
        .reference_at(uri, position)
        .map(|r| r.enclosing.clone())
        .unwrap_or_default();
    table.resolve_key(&name, &enclosing)
}

/// Key and effective value under the cursor.
///
/// On the value side the placeholder under the cursor is resolved; on the
/// key side the key defined at the cursor is used. Null values give no hover.
pub fn hover(table: &SymbolTable, text: &str, uri: &str, position: Position) -> Option<Hover> {
    let line = line_at(text, position)?;

    let key = if on_value_side(line, position) {
        placeholder_key(table, line, uri, position)?
    } else {
        table.locate(uri, position)?.clone()
    };

    // nothing to show for a key without a value
    let value = table.tree().get_path(&key).filter(|value| !value.is_null())?;
    tracing::debug!(uri, key = %key, "hover");
    Some(Hover {
        key: key.to_string(),
        value: value.clone(),
    })
}

/// Definition of the placeholder under the cursor.
pub fn definition<'a>(
    table: &'a SymbolTable,
    text: &str,
    uri: &str,
    position: Position,
) -> Option<&'a Location> {
    let line = line_at(text, position)?;
    let key = placeholder_key(table, line, uri, position)?;
    tracing::debug!(uri, key = %key, "definition");
    table.definitions().get(&key)
}

/// Every reference to the placeholder or key under the cursor.
///
/// Relative references are matched by the key they resolve to.
pub fn references<'a>(
    table: &'a SymbolTable,
    text: &str,
    uri: &str,
    position: Position,
) -> Vec<&'a Location> {
    let Some(line) = line_at(text, position) else {
        return Vec::new();
    };

    let key = if on_value_side(line, position) {
        placeholder_key(table, line, uri, position)
    } else {
        table
            .locate(uri, position)
            .cloned()
            .or_else(|| key_text_at(line, position.character).map(|k| KeyPath::parse(&k)))
    };

    let Some(key) = key else {
        return Vec::new();
    };
    let found: Vec<&Location> = table
        .references_to(&key)
        .into_iter()
        .map(|r| &r.location)
        .collect();
    tracing::debug!(uri, key = %key, count = found.len(), "references");
    found
}
