//! Source spans and line lookup
//!
//! Spans are absolute byte offsets into the full source text, so a token
//! scanned from the third line of a BASIC program still points into the
//! whole program.

use serde::{Deserialize, Serialize};

/// Half-open byte range `[start, end)` in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Placeholder span for values that have no source location
    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    /// Smallest span covering both `self` and `other`
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Maps byte offsets to 1-based line and column numbers
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Offset of the first byte of every line
    line_starts: Vec<usize>,
    source_len: usize,
}

impl LineIndex {
    /// Build the index for `source`
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            line_starts,
            source_len: source.len(),
        }
    }

    /// 1-based `(line, column)` of a byte offset
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source_len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        (line + 1, offset - self.line_starts[line] + 1)
    }

    /// Text of a 1-based line, without its line terminator
    pub fn line_text<'a>(&self, source: &'a str, line: usize) -> &'a str {
        if line == 0 || line > self.line_starts.len() {
            return "";
        }
        let start = self.line_starts[line - 1];
        let end = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or(source.len());
        source
            .get(start..end)
            .unwrap_or("")
            .trim_end_matches(['\n', '\r'])
    }

    /// Number of lines in the indexed source
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge() {
        let a = Span::new(2, 4);
        let b = Span::new(6, 9);
        assert_eq!(a.merge(b), Span::new(2, 9));
        assert_eq!(b.merge(a), Span::new(2, 9));
    }

    #[test]
    fn test_locate_first_line() {
        let index = LineIndex::new("abc\ndef");
        assert_eq!(index.locate(0), (1, 1));
        assert_eq!(index.locate(2), (1, 3));
    }

    #[test]
    fn test_locate_later_lines() {
        let index = LineIndex::new("10 LET X = 5\n20 PRINT X\n");
        assert_eq!(index.locate(13), (2, 1));
        assert_eq!(index.locate(22), (2, 10));
        assert_eq!(index.line_count(), 3);
    }

    #[test]
    fn test_line_text() {
        let source = "first\r\nsecond\nthird";
        let index = LineIndex::new(source);
        assert_eq!(index.line_text(source, 1), "first");
        assert_eq!(index.line_text(source, 2), "second");
        assert_eq!(index.line_text(source, 3), "third");
        assert_eq!(index.line_text(source, 4), "");
    }
}
