//! Diagnostics for Spright configuration documents.
//!
//! The `spright` tool reports problems on standard error, one per line, as
//! either a bare message or a message followed by ` in line N`. This crate
//! turns that text into [`Diagnostic`]s positioned on the lines of the
//! configuration document.
//!
//! # Example
//!
//! ```
//! # use spright_diagnostics::{DocumentLines, parse_tool_output};
//! let document = DocumentLines::new("sheet atlas\n  input \"missing.png\"\n");
//! let diagnostics = parse_tool_output("file not found in line 2", &document);
//!
//! let diagnostic = &diagnostics.as_slice()[0];
//! assert_eq!(diagnostic.message(), "file not found");
//! assert_eq!(diagnostic.range().start().line(), 1);
//! assert_eq!(diagnostic.range().start().column(), 2);
//! ```

mod diagnostic;
mod document;
mod parser;
mod range;

pub use diagnostic::{Diagnostic, DiagnosticSet, Severity};
pub use document::{DocumentLines, LineInfo};
pub use parser::{LINE_SEPARATOR, parse_tool_output};
pub use range::{LineRange, Position};
