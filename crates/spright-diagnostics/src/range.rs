//! Line/column positions in a document.

use std::fmt;

/// A 0-based line and character column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    line: usize,
    column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Returns the 0-based line.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the 0-based column, counted in characters.
    pub fn column(&self) -> usize {
        self.column
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Editors show positions 1-based
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A range between two positions, end exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LineRange {
    start: Position,
    end: Position,
}

impl LineRange {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Creates a range within a single line.
    pub fn on_line(line: usize, start_column: usize, end_column: usize) -> Self {
        Self {
            start: Position::new(line, start_column),
            end: Position::new(line, end_column),
        }
    }

    /// The empty range at the very first character of a document.
    pub fn document_start() -> Self {
        Self::default()
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Returns `true` if the range covers no characters.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
