//! Source positions for scanned config documents.
//!
//! All positions are zero-based. Columns count characters, which is what
//! the YAML scanner's markers count as well, so a marker index can be mapped
//! straight onto a `(line, column)` pair through a [`LineIndex`].

use serde::{Deserialize, Serialize};

/// A position in a document, expressed as zero-based line and character offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    /// Zero-based line number.
    pub line: u32,
    /// Zero-based character offset within the line.
    pub character: u32,
}

impl Position {
    /// Create a new position.
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.line.cmp(&other.line) {
            std::cmp::Ordering::Equal => self.character.cmp(&other.character),
            ord => ord,
        }
    }
}

/// A half-open range in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Range {
    /// The range's start position (inclusive).
    pub start: Position,
    /// The range's end position (exclusive).
    pub end: Position,
}

impl Range {
    /// Create a new range.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Create a range spanning a single position (zero-width).
    pub fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Check if this range contains a position.
    ///
    /// A zero-width range contains its own start so that empty scalars can
    /// still be found by position.
    pub fn contains(&self, pos: Position) -> bool {
        if self.is_empty() {
            return pos == self.start;
        }
        self.start <= pos && pos < self.end
    }

    /// Check if this range is empty (zero-width).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Lines touched by this range, inclusive on both ends.
    pub fn lines(&self) -> std::ops::RangeInclusive<u32> {
        self.start.line..=self.end.line.max(self.start.line)
    }
}

/// Maps character offsets in a document onto line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Character offset at which each line starts.
    line_starts: Vec<usize>,
    /// Total number of characters in the document.
    len: usize,
}

impl LineIndex {
    /// Build the index for a document.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        let mut len = 0;
        for ch in text.chars() {
            len += 1;
            if ch == '\n' {
                line_starts.push(len);
            }
        }
        Self { line_starts, len }
    }

    /// Total number of characters in the indexed document.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the indexed document is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of lines in the indexed document.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a character offset into a position.
    ///
    /// Offsets past the end of the document are clamped to the end.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let column = offset - self.line_starts[line];
        Position::new(to_u32(line), to_u32(column))
    }

    /// Convert a position back into a character offset, clamped to the document.
    pub fn offset(&self, position: Position) -> usize {
        let line = (position.line as usize).min(self.line_starts.len() - 1);
        (self.line_starts[line] + position.character as usize).min(self.len)
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_ordering() {
        let p1 = Position::new(0, 5);
        let p2 = Position::new(0, 10);
        let p3 = Position::new(1, 0);

        assert!(p1 < p2);
        assert!(p2 < p3);
        assert!(p1 < p3);
    }

    #[test]
    fn range_contains() {
        let range = Range::new(Position::new(1, 0), Position::new(1, 10));

        assert!(range.contains(Position::new(1, 0)));
        assert!(range.contains(Position::new(1, 5)));
        assert!(!range.contains(Position::new(1, 10))); // End is exclusive
        assert!(!range.contains(Position::new(0, 5)));
        assert!(!range.contains(Position::new(2, 0)));
    }

    #[test]
    fn empty_range_contains_its_start() {
        let range = Range::point(Position::new(3, 4));
        assert!(range.contains(Position::new(3, 4)));
        assert!(!range.contains(Position::new(3, 5)));
    }

    #[test]
    fn line_index_maps_offsets() {
        let index = LineIndex::new("a: 1\nbb: 2\n\nccc: 3");

        assert_eq!(index.line_count(), 4);
        assert_eq!(index.position(0), Position::new(0, 0));
        assert_eq!(index.position(5), Position::new(1, 0));
        assert_eq!(index.position(8), Position::new(1, 3));
        assert_eq!(index.position(11), Position::new(2, 0));
        assert_eq!(index.position(12), Position::new(3, 0));
        assert_eq!(index.position(500), Position::new(3, 6));
        assert_eq!(index.offset(Position::new(3, 2)), 14);
    }

    #[test]
    fn line_index_counts_characters() {
        let index = LineIndex::new("é: ü\nx: 1");
        assert_eq!(index.len(), 9);
        assert_eq!(index.position(3), Position::new(0, 3));
        assert_eq!(index.position(5), Position::new(1, 0));
    }
}
