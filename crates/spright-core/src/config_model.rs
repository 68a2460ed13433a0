//! Structured model of the sprite sheet configuration text.
//!
//! The configuration is line oriented. Every non-blank line holds a
//! definition followed by its arguments, and indentation nests a line under
//! the closest less indented line above it:
//!
//! ```text
//! sheet "atlas"
//!   padding 1
//! input "characters/*.png"   # one input per file
//!   grid 16 16
//! ```
//!
//! Lines end at `\n`, `\r\n` or a lone `\r`. Arguments are separated by
//! whitespace and are bare words or double-quoted strings in which `\`
//! escapes the next character. `#` starts a comment outside of quotes.
//!
//! [`ConfigModel::parse`] fails instead of returning a partial model, so a
//! preview is never drawn from a half-understood configuration.

use std::fmt;

use thiserror::Error;
use winnow::{
    ModalResult, Parser as _,
    combinator::{alt, delimited, opt, preceded, repeat},
    token::{any, none_of, rest, take_while},
};

/// What went wrong while building a [`ConfigModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigModelErrorKind {
    /// A quoted argument is missing its closing quote.
    UnterminatedString,
    /// A line is dedented to a column that matches no enclosing line.
    InconsistentIndentation,
}

impl fmt::Display for ConfigModelErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString => write!(f, "unterminated string"),
            Self::InconsistentIndentation => write!(f, "inconsistent indentation"),
        }
    }
}

/// Error returned when the configuration text cannot be modeled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} in line {line}")]
pub struct ConfigModelError {
    kind: ConfigModelErrorKind,
    line: usize,
}

impl ConfigModelError {
    /// Returns the kind of the error.
    pub fn kind(&self) -> ConfigModelErrorKind {
        self.kind
    }

    /// Returns the 1-based line the error was found in.
    pub fn line(&self) -> usize {
        self.line
    }
}

/// One definition line and the lines nested below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigItem {
    definition: String,
    arguments: Vec<String>,
    line: usize,
    comments: Vec<String>,
    comment: Option<String>,
    children: Vec<ConfigItem>,
}

impl ConfigItem {
    /// Returns the definition keyword, the first word of the line.
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Returns the unquoted arguments following the definition.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Returns the 1-based line of the item in the source text.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the comment lines directly above the item, without the `#`.
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Returns the comment at the end of the item's line, without the `#`.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns the items nested below this one.
    pub fn children(&self) -> &[ConfigItem] {
        &self.children
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write_comments(f, &self.comments, depth)?;
        write!(f, "{:width$}{}", "", self.definition, width = depth * 2)?;
        for argument in &self.arguments {
            write!(f, " {}", quote_argument(argument))?;
        }
        if let Some(comment) = &self.comment {
            write!(f, " #{comment}")?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

/// The parsed configuration.
///
/// Displaying a model prints normalized text: two spaces per nesting level,
/// single spaces between arguments, arguments quoted only where needed.
/// Comments are kept. A comment line is printed at the depth of the item
/// below it, and blank lines are dropped.
///
/// # Examples
///
/// ```
/// # use spright_core::config_model::ConfigModel;
/// let model = ConfigModel::parse("input \"hero.png\"\n    grid 16 16\n").unwrap();
///
/// let input = &model.items()[0];
/// assert_eq!(input.definition(), "input");
/// assert_eq!(input.arguments(), ["hero.png"]);
/// assert_eq!(input.children()[0].arguments(), ["16", "16"]);
///
/// assert_eq!(model.to_string(), "input hero.png\n  grid 16 16\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigModel {
    items: Vec<ConfigItem>,
    trailing_comments: Vec<String>,
}

impl ConfigModel {
    /// Builds the model of a configuration text.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigModelError`] in the text.
    pub fn parse(text: &str) -> Result<Self, ConfigModelError> {
        let mut builder = TreeBuilder::default();
        let mut comments = Vec::new();

        for (index, raw_line) in split_lines(text).enumerate() {
            let line = index + 1;
            let content = raw_line.trim_start();
            let indent = raw_line.chars().count() - content.chars().count();

            let (tokens, comment) = tokenize_line(content).ok_or(ConfigModelError {
                kind: ConfigModelErrorKind::UnterminatedString,
                line,
            })?;
            let mut tokens = tokens.into_iter();
            let Some(definition) = tokens.next() else {
                comments.extend(comment);
                continue;
            };

            let item = ConfigItem {
                definition,
                arguments: tokens.collect(),
                line,
                comments: std::mem::take(&mut comments),
                comment,
                children: Vec::new(),
            };
            builder.push(indent, item).map_err(|kind| ConfigModelError { kind, line })?;
        }

        Ok(Self {
            items: builder.finish(),
            trailing_comments: comments,
        })
    }

    /// Returns the top-level items.
    pub fn items(&self) -> &[ConfigItem] {
        &self.items
    }

    /// Returns all items with the given definition, at any depth, in document order.
    pub fn find_all<'a>(&'a self, definition: &'a str) -> impl Iterator<Item = &'a ConfigItem> + 'a {
        let mut pending: Vec<&ConfigItem> = self.items.iter().rev().collect();
        std::iter::from_fn(move || {
            while let Some(item) = pending.pop() {
                pending.extend(item.children.iter().rev());
                if item.definition == definition {
                    return Some(item);
                }
            }
            None
        })
    }
}

impl fmt::Display for ConfigModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            item.write_indented(f, 0)?;
        }
        write_comments(f, &self.trailing_comments, 0)
    }
}

fn write_comments(f: &mut fmt::Formatter<'_>, comments: &[String], depth: usize) -> fmt::Result {
    for comment in comments {
        writeln!(f, "{:width$}#{comment}", "", width = depth * 2)?;
    }
    Ok(())
}

/// Splits text into lines at `\n`, `\r\n` and lone `\r`.
///
/// Like [`str::lines`], a final line terminator does not start another line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let Some(end) = rest.find(|c: char| c == '\n' || c == '\r') else {
            return Some(std::mem::take(&mut rest));
        };
        let line = &rest[..end];
        let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[end + terminator..];
        Some(line)
    })
}

/// An open line on the indentation stack.
#[derive(Debug)]
struct OpenItem {
    indent: usize,
    child_indent: Option<usize>,
    item: ConfigItem,
}

/// Assembles items into a tree from their indentation.
#[derive(Debug, Default)]
struct TreeBuilder {
    roots: Vec<ConfigItem>,
    root_indent: Option<usize>,
    open: Vec<OpenItem>,
}

impl TreeBuilder {
    fn push(&mut self, indent: usize, item: ConfigItem) -> Result<(), ConfigModelErrorKind> {
        while self.open.last().is_some_and(|top| top.indent >= indent) {
            self.close_top();
        }

        let level = match self.open.last_mut() {
            Some(parent) => &mut parent.child_indent,
            None => &mut self.root_indent,
        };
        match *level {
            Some(expected) if expected != indent => {
                return Err(ConfigModelErrorKind::InconsistentIndentation);
            }
            Some(_) => {}
            None => *level = Some(indent),
        }

        self.open.push(OpenItem {
            indent,
            child_indent: None,
            item,
        });
        Ok(())
    }

    fn close_top(&mut self) {
        let Some(closed) = self.open.pop() else {
            return;
        };
        match self.open.last_mut() {
            Some(parent) => parent.item.children.push(closed.item),
            None => self.roots.push(closed.item),
        }
    }

    fn finish(mut self) -> Vec<ConfigItem> {
        while !self.open.is_empty() {
            self.close_top();
        }
        self.roots
    }
}

/// Splits the content of a line into unquoted tokens and its comment.
///
/// Returns `None` when a quoted argument is not terminated.
fn tokenize_line(content: &str) -> Option<(Vec<String>, Option<String>)> {
    let mut input = content;
    let line = line_tokens(&mut input).ok()?;
    input.is_empty().then_some(line)
}

fn line_tokens(input: &mut &str) -> ModalResult<(Vec<String>, Option<String>)> {
    let tokens: Vec<String> =
        repeat(0.., preceded(whitespace, alt((quoted, bare_word)))).parse_next(input)?;
    let comment = preceded(whitespace, opt(preceded('#', rest)))
        .map(|comment: Option<&str>| comment.map(|text| text.trim_end().to_string()))
        .parse_next(input)?;
    Ok((tokens, comment))
}

fn whitespace<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(0.., char::is_whitespace).parse_next(input)
}

/// Parse a double-quoted argument, resolving `\` escapes.
fn quoted(input: &mut &str) -> ModalResult<String> {
    let content = repeat(0.., alt((preceded('\\', any), none_of(['"', '\\'])))).fold(
        String::new,
        |mut acc, ch| {
            acc.push(ch);
            acc
        },
    );
    delimited('"', content, '"').parse_next(input)
}

/// Parse an unquoted argument.
fn bare_word(input: &mut &str) -> ModalResult<String> {
    take_while(1.., |c: char| !c.is_whitespace() && c != '"' && c != '#')
        .map(String::from)
        .parse_next(input)
}

fn quote_argument(argument: &str) -> String {
    let needs_quotes = argument.is_empty()
        || argument
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '#' | '\\'));
    if !needs_quotes {
        return argument.to_string();
    }

    let mut quoted = String::with_capacity(argument.len() + 2);
    quoted.push('"');
    for c in argument.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_an_empty_model() {
        let model = ConfigModel::parse("").unwrap();
        assert!(model.items().is_empty());
        assert_eq!(model.to_string(), "");
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let model = ConfigModel::parse("# header\n\n   \nsheet atlas # trailing\n").unwrap();
        assert_eq!(model.items().len(), 1);
        assert_eq!(model.items()[0].arguments(), ["atlas"]);
        assert_eq!(model.items()[0].line(), 4);
        assert_eq!(model.items()[0].comments(), [" header"]);
        assert_eq!(model.items()[0].comment(), Some(" trailing"));
    }

    #[test]
    fn test_lone_carriage_returns_end_lines() {
        let model = ConfigModel::parse("sheet atlas\rinput hero.png\r  grid 8 8\r").unwrap();
        assert_eq!(model.items().len(), 2);
        assert_eq!(model.items()[1].line(), 2);
        assert_eq!(model.items()[1].children()[0].line(), 3);
        assert_eq!(model.to_string(), "sheet atlas\ninput hero.png\n  grid 8 8\n");
    }

    #[test]
    fn test_mixed_line_endings_count_lines_once() {
        let err = ConfigModel::parse("sheet atlas\r\n\rinput \"a.png\n").unwrap_err();
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn test_any_whitespace_separates_arguments() {
        let model = ConfigModel::parse("grid 16\u{a0}16\u{c}\t8 # size\n").unwrap();
        assert_eq!(model.items()[0].arguments(), ["16", "16", "8"]);
        assert_eq!(model.to_string(), "grid 16 16 8 # size\n");
    }

    #[test]
    fn test_display_keeps_comments() {
        let text = "# atlas for level 1\nsheet   atlas # main\n  # cell size\n  grid 8 8\n# end\n";
        let model = ConfigModel::parse(text).unwrap();
        let normalized = model.to_string();
        assert_eq!(
            normalized,
            "# atlas for level 1\nsheet atlas # main\n  # cell size\n  grid 8 8\n# end\n"
        );
        assert_eq!(ConfigModel::parse(&normalized).unwrap().to_string(), normalized);
    }

    #[test]
    fn test_quoted_arguments_keep_spaces_and_escapes() {
        let model = ConfigModel::parse(r#"sprite "big hero" "say \"hi\"" "a#b""#).unwrap();
        assert_eq!(
            model.items()[0].arguments(),
            ["big hero", "say \"hi\"", "a#b"]
        );
    }

    #[test]
    fn test_nesting_follows_indentation() {
        let text = "sheet atlas\n  padding 1\ninput a.png\n  grid 8 8\n    sprite one\n  grid 4 4\n";
        let model = ConfigModel::parse(text).unwrap();

        assert_eq!(model.items().len(), 2);
        let input = &model.items()[1];
        assert_eq!(input.children().len(), 2);
        assert_eq!(input.children()[0].children()[0].arguments(), ["one"]);
        assert_eq!(input.children()[1].arguments(), ["4", "4"]);
    }

    #[test]
    fn test_unterminated_string_reports_line() {
        let err = ConfigModel::parse("sheet atlas\ninput \"a.png\n").unwrap_err();
        assert_eq!(err.kind(), ConfigModelErrorKind::UnterminatedString);
        assert_eq!(err.line(), 2);
        assert_eq!(err.to_string(), "unterminated string in line 2");
    }

    #[test]
    fn test_inconsistent_dedent_is_rejected() {
        let err = ConfigModel::parse("input a.png\n    grid 8 8\n  sprite one\n").unwrap_err();
        assert_eq!(err.kind(), ConfigModelErrorKind::InconsistentIndentation);
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn test_inconsistent_root_indent_is_rejected() {
        let err = ConfigModel::parse("  sheet atlas\ninput a.png\n").unwrap_err();
        assert_eq!(err.kind(), ConfigModelErrorKind::InconsistentIndentation);
    }

    #[test]
    fn test_display_normalizes_indentation_and_quoting() {
        let text = "input   \"a.png\"  # comment\n\tgrid 8 8\n\tsprite \"big hero\" \"\"\n";
        let model = ConfigModel::parse(text).unwrap();
        assert_eq!(
            model.to_string(),
            "input a.png # comment\n  grid 8 8\n  sprite \"big hero\" \"\"\n"
        );
        assert_eq!(ConfigModel::parse(&model.to_string()).unwrap(), model);
    }

    #[test]
    fn test_find_all_walks_in_document_order() {
        let text = "input a.png\n  sprite one\n  sprite two\ninput b.png\n  sprite three\n";
        let model = ConfigModel::parse(text).unwrap();
        let ids: Vec<_> = model
            .find_all("sprite")
            .map(|item| item.arguments()[0].as_str())
            .collect();
        assert_eq!(ids, ["one", "two", "three"]);
    }
}
