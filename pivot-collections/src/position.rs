use std::fmt;

/// A line/column location in a character source.
///
/// Both indices start at 0. Positions are ordered lexicographically:
/// first by line, then by column within the same line. This makes a
/// position usable as a total-order key for per-position caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourcePosition {
    /// Line index into the buffered source, starting after each newline.
    pub line: usize,
    /// Column index within the line.
    pub column: usize,
}

impl SourcePosition {
    /// Creates a position at the given line and column.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Creates a position at the start of the source.
    pub fn start() -> Self {
        Self { line: 0, column: 0 }
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
