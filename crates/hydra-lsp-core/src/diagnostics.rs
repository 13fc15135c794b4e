//! Diagnostics for a loaded config tree.
//!
//! Two kinds are produced:
//! - unresolved references: `${name}` occurrences that resolve to nothing,
//!   neither as a literal key nor relative to their enclosing mapping;
//! - load issues: missing, unreadable, malformed or cyclic defaults met
//!   while resolving the tree.

use crate::document::uri_to_path;
use crate::settings::Settings;
use crate::symbols::SymbolTable;
use crate::types::{Diagnostic, DiagnosticSeverity};
use hydra_config::{ResolveError, TextSource};
use std::collections::HashMap;

/// Diagnostic code for references that resolve to nothing.
pub const UNDEFINED_VARIABLE: &str = "undefined-variable";

/// Report references that resolve to nothing.
///
/// With `filter` set, only occurrences in that document are considered. An
/// occurrence is skipped when any line its scalar spans contains the
/// suppression marker. Diagnostics follow reference order and are not
/// deduplicated.
pub fn diagnose(
    table: &SymbolTable,
    source: &dyn TextSource,
    filter: Option<&str>,
    settings: &Settings,
) -> Vec<Diagnostic> {
    if !settings.unresolved_diagnostics {
        return Vec::new();
    }

    let mut lines = LineCache::new(source);
    let mut diagnostics = Vec::new();

    for (name, occurrences) in table.references().iter() {
        if table.definitions().contains(name) {
            continue;
        }

        for occurrence in occurrences {
            let location = &occurrence.location;
            if filter.is_some_and(|uri| uri != location.uri) {
                continue;
            }
            if table.get(name, &occurrence.enclosing).is_some() {
                continue;
            }
            if lines.any_line_contains(
                &location.uri,
                location.range.lines(),
                &settings.suppression_marker,
            ) {
                tracing::debug!(name, uri = %location.uri, "unresolved reference suppressed");
                continue;
            }

            diagnostics.push(
                Diagnostic::new(
                    location.clone(),
                    DiagnosticSeverity::Error,
                    format!("{name} is not defined"),
                )
                .with_code(UNDEFINED_VARIABLE)
                .with_source(&settings.diagnostic_source),
            );
        }
    }

    tracing::debug!(count = diagnostics.len(), filter, "unresolved references");
    diagnostics
}

/// Report the load issues of `table` as warnings.
pub fn issue_diagnostics(
    table: &SymbolTable,
    filter: Option<&str>,
    settings: &Settings,
) -> Vec<Diagnostic> {
    table
        .issues()
        .iter()
        .filter(|issue| filter.is_none_or(|uri| uri == issue.location.uri))
        .map(|issue| {
            Diagnostic::new(
                issue.location.clone(),
                DiagnosticSeverity::Warning,
                issue.error.to_string(),
            )
            .with_code(issue_code(&issue.error))
            .with_source(&settings.diagnostic_source)
        })
        .collect()
}

fn issue_code(error: &ResolveError) -> &'static str {
    match error {
        ResolveError::MissingDefaultFile { .. } => "missing-default",
        ResolveError::Unreadable { .. } => "unreadable-document",
        ResolveError::Malformed { .. } => "malformed-document",
        ResolveError::CyclicDefaults { .. } => "cyclic-defaults",
        ResolveError::UnsupportedDefaultsEntry { .. } => "unsupported-defaults-entry",
    }
}

/// Document lines, read once per diagnose pass.
struct LineCache<'a> {
    source: &'a dyn TextSource,
    documents: HashMap<String, Option<Vec<String>>>,
}

impl<'a> LineCache<'a> {
    fn new(source: &'a dyn TextSource) -> Self {
        Self {
            source,
            documents: HashMap::new(),
        }
    }

    fn any_line_contains(
        &mut self,
        uri: &str,
        lines: std::ops::RangeInclusive<u32>,
        marker: &str,
    ) -> bool {
        let source = self.source;
        let document = self.documents.entry(uri.to_string()).or_insert_with(|| {
            let text = uri_to_path(uri).and_then(|path| source.read_text(&path).ok());
            if text.is_none() {
                tracing::debug!(uri, "cannot read document for suppression check");
            }
            text.map(|text| text.lines().map(str::to_string).collect())
        });

        let Some(document) = document else {
            return false;
        };
        lines
            .filter_map(|line| document.get(line as usize))
            .any(|line| line.contains(marker))
    }
}
