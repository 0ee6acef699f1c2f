//! Byte-offset location primitives and the line/column index.

use serde::{Deserialize, Serialize};

/// A 0-based byte offset into a source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Loc(pub u32);

impl Loc {
    /// The start-of-file location.
    pub const ZERO: Loc = Loc(0);

    /// Returns this location as a `usize` index.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for Loc {
    fn from(value: usize) -> Self {
        Loc(value as u32)
    }
}

/// A byte range `[start, start + len)` into a source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    /// Start offset.
    pub start: Loc,
    /// Length in bytes.
    pub len: u32,
}

impl Range {
    /// A zero-length range at the start of the file.
    pub const EMPTY: Range = Range {
        start: Loc::ZERO,
        len: 0,
    };

    /// Construct a range from start/end byte offsets.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: Loc::from(start),
            len: (end - start) as u32,
        }
    }

    /// The exclusive end offset of this range.
    pub fn end(&self) -> Loc {
        Loc(self.start.0 + self.len)
    }

    /// Slice the given source string with this range.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start.as_usize()..self.end().as_usize()]
    }

    /// Returns a range covering both `self` and `other`, which must be ordered.
    pub fn merge(&self, other: &Range) -> Range {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        Range::new(start.as_usize(), end.as_usize())
    }
}

/// Start/end byte positions carried by every AST node so the printer can
/// emit source-map mappings and diagnostics can point at source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Inclusive start offset.
    pub start: Loc,
    /// Exclusive end offset.
    pub end: Loc,
}

impl Position {
    /// Build a position from a [`Range`].
    pub fn from_range(range: Range) -> Self {
        Self {
            start: range.start,
            end: range.end(),
        }
    }

    /// Convert back to a [`Range`].
    pub fn to_range(self) -> Range {
        Range::new(self.start.as_usize(), self.end.as_usize())
    }
}

/// 1-based line, 0-based column — matches the convention `spec.md` §3
/// requires for translating a [`Loc`] into human terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCol {
    /// 1-based line number.
    pub line: u32,
    /// 0-based column (byte offset within the line).
    pub column: u32,
}

/// A table mapping byte offsets to 1-based line / 0-based column pairs,
/// built once per source file.
///
/// Multibyte UTF-8 characters never corrupt offsets because the table
/// stores byte offsets of line starts, not character counts.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the first character of each line; `line_starts[0] == 0`.
    line_starts: Vec<u32>,
}

impl LineIndex {
    /// Build the index by scanning `source` once for `\n` bytes.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self { line_starts }
    }

    /// Translate a byte offset into a 1-based line / 0-based column pair.
    pub fn line_col(&self, loc: Loc) -> LineCol {
        let offset = loc.0;
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line_start = self.line_starts[line_idx];
        LineCol {
            line: (line_idx as u32) + 1,
            column: offset - line_start,
        }
    }

    /// The byte offset at which the given 1-based line starts, if in range.
    pub fn line_start(&self, line: u32) -> Option<Loc> {
        self.line_starts
            .get((line.saturating_sub(1)) as usize)
            .copied()
            .map(Loc)
    }

    /// Extract the full text of the line containing `loc`, excluding the
    /// trailing newline. Used to build diagnostic excerpts.
    pub fn line_text<'a>(&self, source: &'a str, loc: Loc) -> &'a str {
        let lc = self.line_col(loc);
        let start = self.line_starts[(lc.line - 1) as usize] as usize;
        let end = self
            .line_starts
            .get(lc.line as usize)
            .map(|&o| o as usize)
            .unwrap_or(source.len());
        source[start..end].trim_end_matches(['\n', '\r'])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_first_line() {
        let idx = LineIndex::new("hello\nworld\n");
        assert_eq!(idx.line_col(Loc(0)), LineCol { line: 1, column: 0 });
        assert_eq!(idx.line_col(Loc(3)), LineCol { line: 1, column: 3 });
    }

    #[test]
    fn line_col_second_line() {
        let idx = LineIndex::new("hello\nworld\n");
        assert_eq!(idx.line_col(Loc(6)), LineCol { line: 2, column: 0 });
        assert_eq!(idx.line_col(Loc(9)), LineCol { line: 2, column: 3 });
    }

    #[test]
    fn multibyte_does_not_corrupt_offsets() {
        let source = "a\u{00e9}b\ncd\n"; // 'é' is 2 bytes in UTF-8
        let idx = LineIndex::new(source);
        // byte offset of 'b' is 3 (a=1, é=2 bytes)
        let lc = idx.line_col(Loc(3));
        assert_eq!(lc, LineCol { line: 1, column: 3 });
    }

    #[test]
    fn line_text_excerpt() {
        let idx = LineIndex::new("first\nsecond line\nthird");
        assert_eq!(idx.line_text("first\nsecond line\nthird", Loc(8)), "second line");
    }

    #[test]
    fn range_merge() {
        let a = Range::new(2, 5);
        let b = Range::new(4, 10);
        let m = a.merge(&b);
        assert_eq!(m, Range::new(2, 10));
    }
}
