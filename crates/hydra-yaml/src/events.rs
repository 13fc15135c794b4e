//! Token classification: a simplified structural event stream over YAML.
//!
//! `yaml-rust2` reports nodes (scalars, collection starts and ends) but leaves
//! it to the consumer to know which node of a mapping is a key and which is a
//! value. The classifier tracks that and interleaves explicit [`ConfigEvent::Key`]
//! and [`ConfigEvent::Value`] markers, so the key-path builder can run as a
//! plain state machine over a closed set of events.

use crate::error::{Error, Result};
use crate::source::{LineIndex, Position, Range};
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// Which collection a [`ConfigEvent::BlockEnd`] closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Mapping,
    Sequence,
}

/// A scalar node with its text and source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarToken {
    /// The scalar's value (quotes and escapes already processed).
    pub text: String,
    /// Where the scalar sits in the source, quotes included.
    pub range: Range,
}

/// Structural events, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigEvent {
    StreamStart,
    DocumentStart,
    /// `flow` is set for `{ ... }` mappings.
    MappingStart { flow: bool },
    /// `flow` is set for `[ ... ]` sequences.
    SequenceStart { flow: bool },
    /// The next node is a mapping key.
    Key,
    /// The next node is a mapping value.
    Value,
    Scalar(ScalarToken),
    /// An alias node (`*name`). Aliases are not resolved.
    Alias,
    BlockEnd(CollectionKind),
    DocumentEnd,
    StreamEnd,
}

impl ConfigEvent {
    /// Short human-readable name, used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            ConfigEvent::StreamStart => "stream start",
            ConfigEvent::DocumentStart => "document start",
            ConfigEvent::MappingStart { flow: false } => "mapping",
            ConfigEvent::MappingStart { flow: true } => "flow mapping",
            ConfigEvent::SequenceStart { flow: false } => "sequence",
            ConfigEvent::SequenceStart { flow: true } => "flow sequence",
            ConfigEvent::Key => "key",
            ConfigEvent::Value => "value",
            ConfigEvent::Scalar(_) => "scalar",
            ConfigEvent::Alias => "alias",
            ConfigEvent::BlockEnd(CollectionKind::Mapping) => "end of mapping",
            ConfigEvent::BlockEnd(CollectionKind::Sequence) => "end of sequence",
            ConfigEvent::DocumentEnd => "document end",
            ConfigEvent::StreamEnd => "stream end",
        }
    }
}

/// An event together with the position it was reported at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedEvent {
    pub event: ConfigEvent,
    pub position: Position,
}

/// Classify the first document of `text` into structural events.
///
/// # Errors
///
/// Returns [`Error::MalformedDocument`] if the YAML scanner rejects the text.
pub fn classify(text: &str) -> Result<Vec<MarkedEvent>> {
    classify_with(text, &LineIndex::new(text))
}

pub(crate) fn classify_with(text: &str, lines: &LineIndex) -> Result<Vec<MarkedEvent>> {
    let mut parser = Parser::new_from_str(text);
    let mut classifier = Classifier::new(text, lines);

    parser
        .load(&mut classifier, true)
        .map_err(|err| Error::from_scan(&err, lines))?;

    Ok(classifier.events)
}

/// Collection currently open while classifying.
enum Frame {
    /// `expect_key` flips on every child node.
    Mapping { expect_key: bool },
    Sequence,
}

struct Classifier<'a> {
    source: Vec<char>,
    lines: &'a LineIndex,
    frames: Vec<Frame>,
    events: Vec<MarkedEvent>,
    /// Set once the first document has ended; later documents are skipped.
    done: bool,
}

impl<'a> Classifier<'a> {
    fn new(text: &str, lines: &'a LineIndex) -> Self {
        Self {
            source: text.chars().collect(),
            lines,
            frames: Vec::new(),
            events: Vec::new(),
            done: false,
        }
    }

    fn emit(&mut self, event: ConfigEvent, position: Position) {
        self.events.push(MarkedEvent { event, position });
    }

    /// Emit the key/value marker owed by the mapping a new node belongs to.
    fn node_start(&mut self, position: Position) {
        if let Some(Frame::Mapping { expect_key }) = self.frames.last_mut() {
            let marker = if *expect_key {
                ConfigEvent::Key
            } else {
                ConfigEvent::Value
            };
            *expect_key = !*expect_key;
            self.emit(marker, position);
        }
    }

    fn char_at(&self, index: usize) -> Option<char> {
        self.source.get(index).copied()
    }

    fn scalar_range(&self, start: usize, style: TScalarStyle, value: &str) -> Range {
        let len = match style {
            TScalarStyle::SingleQuoted => self.quoted_len(start, '\'', value),
            TScalarStyle::DoubleQuoted => self.quoted_len(start, '"', value),
            TScalarStyle::Plain => self.plain_len(start, value),
            _ => return self.block_scalar_range(start, value),
        };
        Range::new(
            self.lines.position(start),
            self.lines.position(start + len),
        )
    }

    /// Plain scalars span the source text they were read from. The scanner
    /// folds line breaks (and the indentation around them) into spaces, so a
    /// whitespace run in the value matches any whitespace run in the source.
    /// Implicit empty scalars have no source text at all.
    fn plain_len(&self, start: usize, value: &str) -> usize {
        let value: Vec<char> = value.chars().collect();
        let mut vi = 0;
        let mut si = start;
        while vi < value.len() {
            if value[vi].is_whitespace() {
                let folded = self.whitespace_run(si);
                if folded == 0 {
                    break;
                }
                si += folded;
                while vi < value.len() && value[vi].is_whitespace() {
                    vi += 1;
                }
            } else if self.char_at(si) == Some(value[vi]) {
                si += 1;
                vi += 1;
            } else {
                break;
            }
        }
        si - start
    }

    fn whitespace_run(&self, from: usize) -> usize {
        self.source
            .iter()
            .skip(from)
            .take_while(|ch| ch.is_whitespace())
            .count()
    }

    fn quoted_len(&self, start: usize, quote: char, value: &str) -> usize {
        if self.char_at(start) != Some(quote) {
            return value.chars().count();
        }
        let mut index = start + 1;
        while let Some(ch) = self.char_at(index) {
            if quote == '"' && ch == '\\' {
                index += 2;
                continue;
            }
            if ch == quote {
                if quote == '\'' && self.char_at(index + 1) == Some('\'') {
                    index += 2;
                    continue;
                }
                return index + 1 - start;
            }
            index += 1;
        }
        value.chars().count() + 2
    }

    /// Literal and folded scalars run from their indicator to the end of
    /// their last content line.
    fn block_scalar_range(&self, start: usize, value: &str) -> Range {
        let start_pos = self.lines.position(start);
        let content_lines = u32::try_from(value.lines().count()).unwrap_or(u32::MAX);
        let next_line = start_pos.line.saturating_add(content_lines).saturating_add(1);
        let end_offset = if (next_line as usize) < self.lines.line_count() {
            self.lines
                .offset(Position::new(next_line, 0))
                .saturating_sub(1)
                .max(start)
        } else {
            self.lines.len()
        };
        Range::new(start_pos, self.lines.position(end_offset))
    }
}

impl MarkedEventReceiver for Classifier<'_> {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        let index = marker.index();
        let position = self.lines.position(index);

        if self.done && !matches!(ev, Event::StreamEnd) {
            return;
        }

        match ev {
            Event::Nothing => {}
            Event::StreamStart => self.emit(ConfigEvent::StreamStart, position),
            Event::StreamEnd => self.emit(ConfigEvent::StreamEnd, position),
            Event::DocumentStart => self.emit(ConfigEvent::DocumentStart, position),
            Event::DocumentEnd => {
                self.emit(ConfigEvent::DocumentEnd, position);
                self.done = true;
            }

            Event::Scalar(value, style, ..) => {
                self.node_start(position);
                let range = self.scalar_range(index, style, &value);
                self.emit(ConfigEvent::Scalar(ScalarToken { text: value, range }), position);
            }

            Event::Alias(..) => {
                self.node_start(position);
                self.emit(ConfigEvent::Alias, position);
            }

            Event::SequenceStart(..) => {
                self.node_start(position);
                let flow = self.char_at(index) == Some('[');
                self.emit(ConfigEvent::SequenceStart { flow }, position);
                self.frames.push(Frame::Sequence);
            }

            Event::SequenceEnd => {
                self.frames.pop();
                self.emit(ConfigEvent::BlockEnd(CollectionKind::Sequence), position);
            }

            Event::MappingStart(..) => {
                self.node_start(position);
                let flow = self.char_at(index) == Some('{');
                self.emit(ConfigEvent::MappingStart { flow }, position);
                self.frames.push(Frame::Mapping { expect_key: true });
            }

            Event::MappingEnd => {
                self.frames.pop();
                self.emit(ConfigEvent::BlockEnd(CollectionKind::Mapping), position);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<&'static str> {
        classify(text)
            .unwrap()
            .iter()
            .map(|e| e.event.describe())
            .collect()
    }

    #[test]
    fn flat_mapping() {
        assert_eq!(
            kinds("a: 1\nb: two\n"),
            vec![
                "stream start",
                "document start",
                "mapping",
                "key",
                "scalar",
                "value",
                "scalar",
                "key",
                "scalar",
                "value",
                "scalar",
                "end of mapping",
                "document end",
                "stream end",
            ]
        );
    }

    #[test]
    fn nested_and_flow_collections() {
        let events = kinds("a:\n  b: [1, 2]\n  c: {d: 3}\n");
        assert!(events.contains(&"flow sequence"));
        assert!(events.contains(&"flow mapping"));
        assert_eq!(events.iter().filter(|e| **e == "end of mapping").count(), 3);
    }

    #[test]
    fn scalar_ranges_cover_source_text() {
        let events = classify("key: \"${a}\"\nother: plain text\n").unwrap();
        let scalars: Vec<&ScalarToken> = events
            .iter()
            .filter_map(|e| match &e.event {
                ConfigEvent::Scalar(token) => Some(token),
                _ => None,
            })
            .collect();

        assert_eq!(scalars[0].text, "key");
        assert_eq!(
            scalars[0].range,
            Range::new(Position::new(0, 0), Position::new(0, 3))
        );
        assert_eq!(scalars[1].text, "${a}");
        assert_eq!(
            scalars[1].range,
            Range::new(Position::new(0, 5), Position::new(0, 11))
        );
        assert_eq!(
            scalars[3].range,
            Range::new(Position::new(1, 7), Position::new(1, 17))
        );
    }

    #[test]
    fn later_documents_are_skipped() {
        let events = kinds("a: 1\n---\nb: 2\n");
        assert_eq!(events.iter().filter(|e| **e == "document start").count(), 1);
        assert_eq!(events.last(), Some(&"stream end"));
    }

    #[test]
    fn multi_line_plain_scalars_span_every_line() {
        let events = classify("cmd: run ${a}\n  and ${b}\nnext: 1\n").unwrap();
        let range = events
            .iter()
            .find_map(|e| match &e.event {
                ConfigEvent::Scalar(token) if token.text.starts_with("run") => Some(token.range),
                _ => None,
            })
            .unwrap();
        assert_eq!(range, Range::new(Position::new(0, 5), Position::new(1, 10)));
    }

    #[test]
    fn malformed_document_reports_position() {
        let err = classify("a: [1, 2\nb: 3\n").unwrap_err();
        assert!(matches!(err, Error::MalformedDocument { .. }));
    }
}
