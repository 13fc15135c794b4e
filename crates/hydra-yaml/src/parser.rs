//! Whole-document parsing: value tree plus symbols.

use crate::error::{Error, Result};
use crate::events::classify_with;
use crate::source::LineIndex;
use crate::symbols::{DocumentSymbols, build_symbols};
use yaml_rust2::{Yaml, YamlLoader};

/// A parsed config document.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Value tree of the first document (`Yaml::Null` for empty text).
    pub yaml: Yaml,
    /// Keys and placeholders found in the document.
    pub symbols: DocumentSymbols,
    /// Line lookup for the document text.
    pub lines: LineIndex,
}

/// Parse YAML text into a value tree and its symbols.
///
/// This parses a single YAML document. If the input contains multiple
/// documents, only the first one is used.
///
/// # Example
///
/// ```rust
/// use hydra_yaml::parse;
///
/// let doc = parse("trainer:\n  accelerator: gpu\n").unwrap();
/// assert_eq!(doc.symbols.definitions.len(), 2);
/// assert_eq!(doc.yaml["trainer"]["accelerator"].as_str(), Some("gpu"));
/// ```
///
/// # Errors
///
/// Returns [`Error::MalformedDocument`] if the text is not valid YAML or a
/// mapping key is not a scalar.
pub fn parse(content: &str) -> Result<ParsedDocument> {
    let lines = LineIndex::new(content);
    let events = classify_with(content, &lines)?;
    let symbols = build_symbols(&events)?;

    let yaml = YamlLoader::load_from_str(content)
        .map_err(|err| Error::from_scan(&err, &lines))?
        .into_iter()
        .next()
        .unwrap_or(Yaml::Null);

    Ok(ParsedDocument {
        yaml,
        symbols,
        lines,
    })
}
