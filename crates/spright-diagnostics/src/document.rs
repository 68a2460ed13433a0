//! Line structure of a configuration document.

use crate::range::Position;

/// Layout of a single document line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInfo {
    offset: usize,
    byte_len: usize,
    first_non_whitespace: usize,
    len: usize,
}

impl LineInfo {
    /// Returns the byte offset of the line start in the document text.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the length of the line in bytes, without its terminator.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Returns the column of the first non-whitespace character.
    ///
    /// For a blank line this is the line length.
    pub fn first_non_whitespace(&self) -> usize {
        self.first_non_whitespace
    }

    /// Returns the length of the line in characters, without its terminator.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Line index of a document text.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`. A text ending with a line
/// terminator has a final empty line, and an empty text has one empty
/// line, so there is always at least one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLines {
    lines: Vec<LineInfo>,
}

impl DocumentLines {
    /// Indexes the lines of `text`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use spright_diagnostics::DocumentLines;
    /// let lines = DocumentLines::new("a\r\n  bc\n");
    /// assert_eq!(lines.line_count(), 3);
    /// assert_eq!(lines.line(1).unwrap().first_non_whitespace(), 2);
    /// assert_eq!(lines.line(1).unwrap().len(), 4);
    /// ```
    pub fn new(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut start = 0;
        let bytes = text.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    lines.push(Self::line_info(text, start, i));
                    i += 1;
                    start = i;
                }
                b'\r' => {
                    lines.push(Self::line_info(text, start, i));
                    i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                    start = i;
                }
                _ => i += 1,
            }
        }
        lines.push(Self::line_info(text, start, text.len()));

        Self { lines }
    }

    fn line_info(text: &str, start: usize, end: usize) -> LineInfo {
        let content = &text[start..end];
        let len = content.chars().count();
        let first_non_whitespace = content
            .chars()
            .position(|c| !c.is_whitespace())
            .unwrap_or(len);
        LineInfo {
            offset: start,
            byte_len: end - start,
            first_non_whitespace,
            len,
        }
    }

    /// Returns the number of lines, always at least one.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the line at the 0-based index, if it exists.
    pub fn line(&self, index: usize) -> Option<&LineInfo> {
        self.lines.get(index)
    }

    /// Returns the last line of the document.
    pub fn last_line(&self) -> (usize, &LineInfo) {
        let index = self.lines.len() - 1;
        (index, &self.lines[index])
    }

    /// Converts a position to a byte offset into `text`.
    ///
    /// `text` must be the text this index was built from. Positions past
    /// the end of a line or of the document are clamped.
    pub fn byte_offset(&self, text: &str, position: Position) -> usize {
        let Some(line) = self.lines.get(position.line()) else {
            return text.len();
        };
        let content = &text[line.offset..line.offset + line.byte_len];
        let within = content
            .char_indices()
            .nth(position.column())
            .map_or(line.byte_len, |(offset, _)| offset);
        line.offset + within
    }
}
