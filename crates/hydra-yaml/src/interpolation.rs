//! Extraction of `${name}` interpolation placeholders from scalar text.

use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(.*?)\}").expect("placeholder pattern is valid"));

/// One `${...}` occurrence inside a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// The captured name between `${` and `}`.
    pub name: String,
    /// Character offset of the `$`.
    pub start: usize,
    /// Character offset just past the closing `}`.
    pub end: usize,
}

/// All placeholders in `text`, left to right.
///
/// The pattern is non-greedy and applied once, so nested placeholders are
/// not expanded: `${a.${b}}` yields the single name `a.${b`.
pub fn placeholders(text: &str) -> Vec<Placeholder> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?;
            Some(Placeholder {
                name: name.as_str().to_string(),
                start: char_offset(text, whole.start()),
                end: char_offset(text, whole.end()),
            })
        })
        .collect()
}

/// The placeholder names in `text`, left to right.
pub fn placeholder_names(text: &str) -> Vec<String> {
    placeholders(text).into_iter().map(|p| p.name).collect()
}

fn char_offset(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_placeholder() {
        assert_eq!(placeholder_names("${bar}/x"), vec!["bar"]);
    }

    #[test]
    fn multiple_placeholders_in_order() {
        assert_eq!(
            placeholder_names("${paths.root}/${data.name}_${.tag}"),
            vec!["paths.root", "data.name", ".tag"]
        );
    }

    #[test]
    fn no_placeholders() {
        assert!(placeholder_names("plain value").is_empty());
        assert!(placeholder_names("$notone {either}").is_empty());
    }

    #[test]
    fn nested_placeholders_are_not_expanded() {
        assert_eq!(placeholder_names("${a.${b}}"), vec!["a.${b"]);
    }

    #[test]
    fn offsets_are_in_characters() {
        let found = placeholders("é ${x}");
        assert_eq!(
            found,
            vec![Placeholder {
                name: "x".into(),
                start: 2,
                end: 6,
            }]
        );
    }
}
