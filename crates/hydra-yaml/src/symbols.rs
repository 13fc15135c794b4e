//! Key-path building over the classified event stream.
//!
//! Walks [`ConfigEvent`]s with a path stack and records, for one document:
//! every addressable key (its dotted path and the span of the key text), and
//! every `${...}` placeholder found in value scalars together with the path
//! of the mapping that holds the value.

use crate::error::{Error, Result};
use crate::events::{CollectionKind, ConfigEvent, MarkedEvent, ScalarToken};
use crate::interpolation::placeholder_names;
use crate::key_path::KeyPath;
use crate::source::{Position, Range};

/// A key defined in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub key: KeyPath,
    /// Span of the key scalar.
    pub range: Range,
}

/// A `${name}` placeholder found in a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolation {
    /// Text between `${` and `}`, unmodified (may start with dots).
    pub name: String,
    /// Span of the whole scalar the placeholder appears in.
    pub range: Range,
    /// Path of the mapping holding the value.
    pub enclosing: KeyPath,
}

/// Everything the builder found in one document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSymbols {
    pub definitions: Vec<Definition>,
    pub interpolations: Vec<Interpolation>,
}

/// Run the key-path builder over `events`.
///
/// Keys inside sequences and flow mappings are not addressable; their
/// scalars are still scanned for placeholders.
///
/// # Errors
///
/// Returns [`Error::MalformedDocument`] when a mapping key is not a scalar or
/// the collection structure is unbalanced.
pub fn build_symbols(events: &[MarkedEvent]) -> Result<DocumentSymbols> {
    let mut builder = KeyPathBuilder::default();
    for marked in events {
        builder.step(marked)?;
    }
    builder.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// `pushed` records whether entering this mapping pushed a path segment.
    Mapping { pushed: bool, addressable: bool },
    Sequence,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Pending {
    #[default]
    Nothing,
    Key,
    Value,
}

#[derive(Debug, Default)]
struct KeyPathBuilder {
    path: KeyPath,
    frames: Vec<Frame>,
    last_key: Option<String>,
    pending: Pending,
    last_position: Position,
    symbols: DocumentSymbols,
}

impl KeyPathBuilder {
    fn step(&mut self, marked: &MarkedEvent) -> Result<()> {
        self.last_position = marked.position;
        let pending = std::mem::take(&mut self.pending);

        match (pending, &marked.event) {
            (Pending::Key, ConfigEvent::Scalar(token)) => {
                self.define(token);
                Ok(())
            }
            (Pending::Key, other) => Err(Error::malformed(
                format!("expected a scalar mapping key, found {}", other.describe()),
                marked.position,
            )),

            (_, ConfigEvent::Key) => {
                self.pending = Pending::Key;
                Ok(())
            }
            (_, ConfigEvent::Value) => {
                self.pending = Pending::Value;
                Ok(())
            }

            (_, ConfigEvent::Scalar(token)) => {
                self.scan(token);
                Ok(())
            }
            (pending, ConfigEvent::MappingStart { flow }) => {
                self.enter_mapping(pending == Pending::Value, *flow);
                Ok(())
            }
            (_, ConfigEvent::SequenceStart { .. }) => {
                self.frames.push(Frame::Sequence);
                Ok(())
            }
            (_, ConfigEvent::BlockEnd(kind)) => self.leave(*kind, marked.position),

            (
                _,
                ConfigEvent::Alias
                | ConfigEvent::StreamStart
                | ConfigEvent::DocumentStart
                | ConfigEvent::DocumentEnd
                | ConfigEvent::StreamEnd,
            ) => Ok(()),
        }
    }

    fn define(&mut self, token: &ScalarToken) {
        if let Some(Frame::Mapping {
            addressable: true, ..
        }) = self.frames.last()
        {
            self.symbols.definitions.push(Definition {
                key: self.path.child(token.text.as_str()),
                range: token.range,
            });
        }
        self.last_key = Some(token.text.clone());
    }

    fn scan(&mut self, token: &ScalarToken) {
        for name in placeholder_names(&token.text) {
            self.symbols.interpolations.push(Interpolation {
                name,
                range: token.range,
                enclosing: self.path.clone(),
            });
        }
    }

    fn enter_mapping(&mut self, in_value: bool, flow: bool) {
        let frame = match self.frames.last() {
            // `{ ... }` does not take part in path tracking
            _ if flow => Frame::Mapping {
                pushed: false,
                addressable: false,
            },
            None => Frame::Mapping {
                pushed: false,
                addressable: true,
            },
            Some(Frame::Mapping {
                addressable: true, ..
            }) if in_value => match self.last_key.take() {
                Some(key) => {
                    self.path.push(key);
                    Frame::Mapping {
                        pushed: true,
                        addressable: true,
                    }
                }
                None => Frame::Mapping {
                    pushed: false,
                    addressable: false,
                },
            },
            // list items and anything below them
            _ => Frame::Mapping {
                pushed: false,
                addressable: false,
            },
        };
        self.frames.push(frame);
    }

    fn leave(&mut self, kind: CollectionKind, position: Position) -> Result<()> {
        match (self.frames.pop(), kind) {
            (Some(Frame::Mapping { pushed, .. }), CollectionKind::Mapping) => {
                if pushed {
                    self.path.pop();
                }
                Ok(())
            }
            (Some(Frame::Sequence), CollectionKind::Sequence) => Ok(()),
            _ => Err(Error::malformed(
                format!("unbalanced {}", ConfigEvent::BlockEnd(kind).describe()),
                position,
            )),
        }
    }

    fn finish(self) -> Result<DocumentSymbols> {
        if self.pending == Pending::Key || !self.frames.is_empty() {
            return Err(Error::malformed(
                "unexpected end of document",
                self.last_position,
            ));
        }
        Ok(self.symbols)
    }
}
