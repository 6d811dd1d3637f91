//! Line/column conversion for byte offsets.
//!
//! The parser and the semantic layers track positions as [`TextSize`] byte
//! offsets. Diagnostics shown to an editor need 0-indexed line/column pairs,
//! which [`LineIndex`] computes on demand.

use text_size::{TextRange, TextSize};

/// A 0-indexed line/column position (column counted in bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// Maps byte offsets of one document to line/column positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Offset of the first byte of every line.
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::from(offset as u32 + 1));
            }
        }
        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    /// Convert an offset to a line/column pair, clamping past-the-end offsets.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let col = offset - self.line_starts[line];
        LineCol::new(line as u32, col.into())
    }

    /// Convert a range to its start and end positions.
    pub fn range(&self, range: TextRange) -> (LineCol, LineCol) {
        (self.line_col(range.start()), self.line_col(range.end()))
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
