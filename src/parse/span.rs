use std::ops::Range;

use serde::Serialize;

/// Half-open span of a token within its source line.
///
/// Offsets count characters, not bytes, so a host can hand them straight to an
/// editor that addresses columns by character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharSpan {
    pub start: usize,
    pub end: usize,
}

impl CharSpan {
    pub fn new(start: usize, end: usize) -> Self {
        CharSpan { start, end }
    }

    /// Zero-width span at `offset`, used for insertions
    pub fn at(offset: usize) -> Self {
        CharSpan {
            start: offset,
            end: offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `offset` falls inside the span (end exclusive)
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Convert to a byte range of `line`. Offsets past the end clamp to the
    /// line length.
    pub fn byte_range(&self, line: &str) -> Range<usize> {
        char_to_byte(line, self.start)..char_to_byte(line, self.end)
    }
}

/// Byte index of the `offset`-th character of `line`, or `line.len()`
pub fn char_to_byte(line: &str, offset: usize) -> usize {
    line.char_indices()
        .nth(offset)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}
