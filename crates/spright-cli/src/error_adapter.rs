//! Adapters rendering tool diagnostics and preview errors with miette.
//!
//! Tool diagnostics carry a [`LineRange`] in line and column coordinates.
//! [`DiagnosticAdapter`] maps that range onto a byte span of the document
//! text so miette can underline it in a source snippet. Errors without a
//! location go through [`ErrorAdapter`].

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan, SourceSpan};

use spright_diagnostics::{Diagnostic, DiagnosticSet, DocumentLines, LineRange};
use spright_preview::{PreviewError, orchestrator::RefreshError, tool::ToolError};

/// Adapter for a single tool diagnostic against the document it refers to.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    src: &'a str,
    span: SourceSpan,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    ///
    /// `lines` must index `src`.
    pub fn new(diag: &'a Diagnostic, src: &'a str, lines: &DocumentLines) -> Self {
        Self {
            diag,
            src,
            span: range_to_span(diag.range(), src, lines),
        }
    }

    pub fn span(&self) -> SourceSpan {
        self.span
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .field("span", &self.span)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("spright::tool"))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(None, self.span),
        )))
    }
}

/// Adapter for [`PreviewError`], which has no source location.
pub struct ErrorAdapter<'a>(pub &'a PreviewError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            PreviewError::Io(_) => "spright::io",
            PreviewError::Config(_) => "spright::config",
            PreviewError::Tool(_) => "spright::tool",
            PreviewError::Refresh(_) => "spright::refresh",
            PreviewError::Host(_) => "spright::host",
            PreviewError::Export(_) => "spright::export",
            PreviewError::Message(_) => "spright::message",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let spawn_failed = matches!(
            self.0,
            PreviewError::Tool(ToolError::Spawn { .. })
                | PreviewError::Refresh(RefreshError::Tool(ToolError::Spawn { .. }))
        );
        spawn_failed.then(|| {
            Box::new("Install spright or pass its location with --tool") as Box<dyn fmt::Display>
        })
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A tool diagnostic with a location in the document.
    Diagnostic(DiagnosticAdapter<'a>),
    /// An error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<miette::Severity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Maps a line range onto a byte span of `src`.
fn range_to_span(range: LineRange, src: &str, lines: &DocumentLines) -> SourceSpan {
    let start = lines.byte_offset(src, range.start());
    let end = lines.byte_offset(src, range.end()).max(start);
    SourceSpan::new(start.into(), end - start)
}

/// Convert a [`PreviewError`] into a reportable error.
pub fn to_reportable(err: &PreviewError) -> Reportable<'_> {
    Reportable::Error(ErrorAdapter(err))
}

/// Convert every diagnostic of `diagnostics` into a reportable against `src`.
pub fn diagnostic_reportables<'a>(
    diagnostics: &'a DiagnosticSet,
    src: &'a str,
) -> Vec<Reportable<'a>> {
    let lines = DocumentLines::new(src);
    diagnostics
        .iter()
        .map(|diag| Reportable::Diagnostic(DiagnosticAdapter::new(diag, src, &lines)))
        .collect()
}

/// Renders `reportable` as a graphical miette report.
pub fn render(reportable: &Reportable<'_>) -> String {
    let mut writer = String::new();
    match GraphicalReportHandler::new().render_report(&mut writer, reportable) {
        Ok(()) => writer,
        Err(_) => reportable.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use spright_diagnostics::parse_tool_output;

    use super::*;

    const DOCUMENT: &str = "sheet atlas\n  input \"hero.png\"\n  colorkey magenta\n";

    fn diagnose(stderr: &str) -> DiagnosticSet {
        parse_tool_output(stderr, &DocumentLines::new(DOCUMENT))
    }

    #[test]
    fn test_diagnostic_span_covers_trimmed_line() {
        let diagnostics = diagnose("unknown color in line 3");

        let reportables = diagnostic_reportables(&diagnostics, DOCUMENT);

        assert_eq!(reportables.len(), 1);
        let Reportable::Diagnostic(adapter) = &reportables[0] else {
            panic!("Expected Diagnostic");
        };
        let span = adapter.span();
        let underlined = &DOCUMENT[span.offset()..span.offset() + span.len()];
        assert_eq!(underlined, "colorkey magenta");
        assert_eq!(adapter.to_string(), "unknown color");
    }

    #[test]
    fn test_diagnostic_without_line_points_at_start() {
        let diagnostics = diagnose("generic failure");

        let reportables = diagnostic_reportables(&diagnostics, DOCUMENT);

        let Reportable::Diagnostic(adapter) = &reportables[0] else {
            panic!("Expected Diagnostic");
        };
        assert_eq!(adapter.span().offset(), 0);
        assert_eq!(adapter.span().len(), 0);
    }

    #[test]
    fn test_all_labels_returned() {
        let diagnostics = diagnose("a in line 1\nb in line 2");

        let reportables = diagnostic_reportables(&diagnostics, DOCUMENT);

        assert_eq!(reportables.len(), 2);
        for reportable in &reportables {
            let labels: Vec<_> = reportable.labels().unwrap().collect();
            assert_eq!(labels.len(), 1);
            assert!(labels[0].primary());
        }
    }

    #[test]
    fn test_rendered_report_shows_source_line() {
        let diagnostics = diagnose("unknown color in line 3");
        let reportables = diagnostic_reportables(&diagnostics, DOCUMENT);

        let report = render(&reportables[0]);

        assert!(report.contains("unknown color"));
        assert!(report.contains("colorkey magenta"));
    }

    #[test]
    fn test_spawn_failure_has_help() {
        let err = PreviewError::Refresh(RefreshError::Tool(ToolError::Spawn {
            program: "spright".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        }));

        let reportable = to_reportable(&err);

        assert_eq!(reportable.code().unwrap().to_string(), "spright::refresh");
        assert!(reportable.help().is_some());
    }

    #[test]
    fn test_config_error_has_no_help() {
        let err = PreviewError::Config("Invalid default zoom in config: 2.5".to_string());

        let reportable = to_reportable(&err);

        assert_eq!(reportable.code().unwrap().to_string(), "spright::config");
        assert!(reportable.help().is_none());
        assert!(reportable.labels().is_none());
    }
}
