use ariadne::{Color, Label, Report, ReportKind, Source};
use std::fmt;
use std::ops::Range;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The input cannot produce a usable chapter.
    Error,
    /// The input was parsed, but probably not as the author intended.
    Warning,
}

/// A diagnostic message with source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// How serious the finding is.
    pub severity: Severity,
    /// Byte span in the linted text.
    pub span: Range<usize>,
    /// One-line summary.
    pub message: String,
    /// Optional text attached to the highlighted span.
    pub label: Option<String>,
}

impl Diagnostic {
    /// An error at `span`.
    pub fn error(span: Range<usize>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            span,
            message: message.into(),
            label: None,
        }
    }

    /// A warning at `span`.
    pub fn warning(span: Range<usize>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            span,
            message: message.into(),
            label: None,
        }
    }

    /// Attach a label to the highlighted span.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns `true` for errors.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{prefix}: {}", self.message)
    }
}

/// Render diagnostics using ariadne for terminal output.
///
/// ariadne addresses sources by `char` index, so byte spans are converted
/// before rendering.
pub fn render_diagnostics(source: &str, filename: &str, diagnostics: &[Diagnostic]) -> String {
    let mut output = Vec::new();

    for diag in diagnostics {
        let kind = match diag.severity {
            Severity::Error => ReportKind::Error,
            Severity::Warning => ReportKind::Warning,
        };
        let color = match diag.severity {
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
        };

        let span = char_span(source, &diag.span);
        let mut report = Report::build(kind, (filename, span.clone())).with_message(&diag.message);

        let label_text = diag.label.as_deref().unwrap_or(&diag.message);
        report = report.with_label(
            Label::new((filename, span))
                .with_message(label_text)
                .with_color(color),
        );

        report
            .finish()
            .write((filename, Source::from(source)), &mut output)
            .ok();
    }

    String::from_utf8(output).unwrap_or_default()
}

fn char_span(source: &str, span: &Range<usize>) -> Range<usize> {
    let to_char = |byte: usize| source[..byte.min(source.len())].chars().count();
    to_char(span.start)..to_char(span.end)
}
