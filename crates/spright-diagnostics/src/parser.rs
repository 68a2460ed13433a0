//! Parser for the tool's stderr protocol.
//!
//! Every non-empty stderr line is one diagnostic, either a bare message or
//! `<message> in line <N>` with a 1-based line number.

use log::warn;

use crate::{
    diagnostic::{Diagnostic, DiagnosticSet},
    document::DocumentLines,
    range::LineRange,
};

/// Separates a message from its line number.
pub const LINE_SEPARATOR: &str = " in line ";

/// Parses tool stderr into diagnostics against `document`.
///
/// A diagnostic with a line number covers that line from its first
/// non-whitespace character to its end. Messages without a usable line
/// number point at the start of the document. Line numbers past the end of
/// the document are clamped to its last line.
///
/// # Arguments
///
/// * `stderr` - The tool's standard error output.
/// * `document` - Line index of the text that was passed to the tool.
///
/// # Examples
///
/// ```
/// # use spright_diagnostics::{DocumentLines, LineRange, parse_tool_output};
/// let document = DocumentLines::new("sheet\n");
/// let diagnostics = parse_tool_output("generic failure\n", &document);
/// assert_eq!(diagnostics.len(), 1);
/// assert_eq!(diagnostics.as_slice()[0].range(), LineRange::document_start());
/// ```
pub fn parse_tool_output(stderr: &str, document: &DocumentLines) -> DiagnosticSet {
    stderr
        .split(['\n', '\r'])
        .filter(|line| !line.is_empty())
        .map(|line| parse_line(line, document))
        .collect()
}

fn parse_line(line: &str, document: &DocumentLines) -> Diagnostic {
    let Some((message, rest)) = line.split_once(LINE_SEPARATOR) else {
        return Diagnostic::error(line, LineRange::document_start());
    };

    let range = match line_number(rest) {
        Some(number) if number > 0 => line_range(number - 1, document),
        _ => LineRange::document_start(),
    };
    Diagnostic::error(message, range)
}

/// Reads the leading decimal digits after optional whitespace.
fn line_number(text: &str) -> Option<usize> {
    let text = text.trim_start();
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    match text[..end].parse() {
        Ok(number) => Some(number),
        // Overflowing numbers are past any document end
        Err(_) if end > 0 => Some(usize::MAX),
        Err(_) => None,
    }
}

fn line_range(index: usize, document: &DocumentLines) -> LineRange {
    if let Some(line) = document.line(index) {
        return LineRange::on_line(index, line.first_non_whitespace(), line.len());
    }

    let (last, line) = document.last_line();
    warn!(
        line = index + 1,
        line_count = document.line_count();
        "Diagnostic line is outside the document, clamping to last line"
    );
    LineRange::on_line(last, line.first_non_whitespace(), line.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::Position;

    const DOCUMENT: &str = "sheet atlas\ninput \"hero.png\"\n  foo: bar\n  sprite\n\n";

    fn parse(stderr: &str) -> DiagnosticSet {
        parse_tool_output(stderr, &DocumentLines::new(DOCUMENT))
    }

    #[test]
    fn test_message_with_line() {
        let diagnostics = parse("bad token in line 3");
        assert_eq!(diagnostics.len(), 1);

        let diagnostic = &diagnostics.as_slice()[0];
        assert_eq!(diagnostic.message(), "bad token");
        assert_eq!(diagnostic.range(), LineRange::on_line(2, 2, 10));
    }

    #[test]
    fn test_bare_message() {
        let diagnostics = parse("generic failure");
        let diagnostic = &diagnostics.as_slice()[0];
        assert_eq!(diagnostic.message(), "generic failure");
        assert_eq!(diagnostic.range(), LineRange::document_start());
    }

    #[test]
    fn test_line_zero_points_at_document_start() {
        let diagnostics = parse("broken in line 0");
        let diagnostic = &diagnostics.as_slice()[0];
        assert_eq!(diagnostic.message(), "broken");
        assert_eq!(diagnostic.range(), LineRange::document_start());
    }

    #[test]
    fn test_missing_number_points_at_document_start() {
        let diagnostics = parse("broken in line ?");
        let diagnostic = &diagnostics.as_slice()[0];
        assert_eq!(diagnostic.message(), "broken");
        assert_eq!(diagnostic.range(), LineRange::document_start());
    }

    #[test]
    fn test_number_followed_by_text() {
        let diagnostics = parse("unexpected ':' in line  2, column 7");
        let diagnostic = &diagnostics.as_slice()[0];
        assert_eq!(diagnostic.range(), LineRange::on_line(1, 0, 16));
    }

    #[test]
    fn test_splits_on_first_separator() {
        let diagnostics = parse("value in line in line 1");
        let diagnostic = &diagnostics.as_slice()[0];
        assert_eq!(diagnostic.message(), "value");
        assert_eq!(diagnostic.range(), LineRange::document_start());
    }

    #[test]
    fn test_multiple_lines_and_separators() {
        let diagnostics = parse("first in line 1\r\n\r\nsecond in line 4\rthird\n");
        let messages: Vec<_> = diagnostics.iter().map(|d| d.message()).collect();
        assert_eq!(messages, ["first", "second", "third"]);
        assert_eq!(diagnostics.as_slice()[1].range(), LineRange::on_line(3, 2, 8));
    }

    #[test]
    fn test_empty_stderr() {
        assert!(parse("").is_empty());
        assert!(parse("\n\r\n").is_empty());
    }

    #[test]
    fn test_out_of_range_line_clamps_to_last_line() {
        let document = DocumentLines::new("sheet\n  input \"a.png\"");
        let diagnostics = parse_tool_output("oops in line 40", &document);
        let range = diagnostics.as_slice()[0].range();
        assert_eq!(range.start(), Position::new(1, 2));
        assert_eq!(range.end(), Position::new(1, 15));
    }

    #[test]
    fn test_huge_line_number_clamps() {
        let document = DocumentLines::new("sheet");
        let diagnostics = parse_tool_output("oops in line 99999999999999999999999", &document);
        assert_eq!(diagnostics.as_slice()[0].range(), LineRange::on_line(0, 0, 5));
    }

    #[test]
    fn test_empty_document_clamps_to_origin() {
        let document = DocumentLines::new("");
        let diagnostics = parse_tool_output("oops in line 3", &document);
        assert_eq!(diagnostics.as_slice()[0].range(), LineRange::document_start());
    }
}
