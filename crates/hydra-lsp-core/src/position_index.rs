//! Cursor position to key lookup.
//!
//! Each document gets a sorted array of the definition spans it contains.
//! A lookup binary-searches the spans starting at or before the cursor and
//! walks back while the running maximum of span ends can still reach it.

use crate::types::{Location, Position, Range};
use hydra_yaml::KeyPath;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Interval {
    range: Range,
    /// Insertion order; the earliest containing interval wins.
    seq: usize,
    key: KeyPath,
}

#[derive(Debug, Clone, Default)]
struct DocumentIntervals {
    /// Sorted by (start, seq).
    intervals: Vec<Interval>,
    /// `max_end[i]` is the largest end among `intervals[..=i]`.
    max_end: Vec<Position>,
}

impl DocumentIntervals {
    fn seal(&mut self) {
        self.intervals
            .sort_by(|a, b| (a.range.start, a.seq).cmp(&(b.range.start, b.seq)));
        self.max_end = self
            .intervals
            .iter()
            .scan(Position::default(), |max, interval| {
                *max = (*max).max(interval.range.end);
                Some(*max)
            })
            .collect();
    }

    fn locate(&self, position: Position) -> Option<&Interval> {
        let candidates = self
            .intervals
            .partition_point(|interval| interval.range.start <= position);

        let mut best: Option<&Interval> = None;
        for index in (0..candidates).rev() {
            if self.max_end[index] < position {
                break;
            }
            let interval = &self.intervals[index];
            if interval.range.contains(position) && best.is_none_or(|b| interval.seq < b.seq) {
                best = Some(interval);
            }
        }
        best
    }
}

/// Per-document interval index over definition spans.
#[derive(Debug, Clone, Default)]
pub struct PositionIndex {
    documents: HashMap<String, DocumentIntervals>,
    len: usize,
}

impl PositionIndex {
    /// Build the index. Order of `definitions` decides overlaps.
    pub fn build<'a, I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = (&'a KeyPath, &'a Location)>,
    {
        let mut documents: HashMap<String, DocumentIntervals> = HashMap::new();
        let mut len = 0;
        for (seq, (key, location)) in definitions.into_iter().enumerate() {
            documents
                .entry(location.uri.clone())
                .or_default()
                .intervals
                .push(Interval {
                    range: location.range,
                    seq,
                    key: key.clone(),
                });
            len += 1;
        }
        for document in documents.values_mut() {
            document.seal();
        }
        Self { documents, len }
    }

    /// The key whose span contains `position` in document `uri`.
    pub fn locate(&self, uri: &str, position: Position) -> Option<&KeyPath> {
        self.documents
            .get(uri)?
            .locate(position)
            .map(|interval| &interval.key)
    }

    /// Number of indexed spans.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
