//! Report rendering for lint results.

use std::fmt::Write as _;

use crate::types::{LintResult, Severity, Violation};

/// Output format of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Multi-line entries with subject, relation and remediation hint.
    #[default]
    Text,
    /// One line per violation.
    Compact,
    /// Pretty-printed JSON.
    Json,
}

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Formats a [`LintResult`]. Rendering is pure; callers decide where the
/// text goes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    format: ReportFormat,
    color: bool,
}

impl Reporter {
    /// Creates an uncolored reporter.
    #[must_use]
    pub fn new(format: ReportFormat) -> Self {
        Self {
            format,
            color: false,
        }
    }

    /// Enables or disables ANSI colors in text output.
    #[must_use]
    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Renders the result.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render(&self, result: &LintResult) -> Result<String, serde_json::Error> {
        match self.format {
            ReportFormat::Text => Ok(self.render_text(result)),
            ReportFormat::Compact => Ok(render_compact(result)),
            ReportFormat::Json => serde_json::to_string_pretty(result),
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn render_violation(&self, out: &mut String, v: &Violation) {
        let severity = match v.severity {
            Severity::Error => self.paint(RED, "error"),
            Severity::Warning => self.paint(YELLOW, "warning"),
            Severity::Info => self.paint(BLUE, "info"),
        };

        let _ = writeln!(
            out,
            "{} {} at {}:{}:{}",
            v.code,
            v.rule,
            v.location.file.display(),
            v.location.line,
            v.location.column
        );
        let _ = writeln!(out, "  {severity}: {}", v.message);
        let _ = writeln!(out, "  subject: {}", v.subject);
        if !v.detail.is_empty() {
            let _ = writeln!(out, "  offending: {}", v.detail);
        }
        if !v.involved.is_empty() {
            let _ = writeln!(out, "  involved: {}", v.involved.join(", "));
        }
        if let Some(suggestion) = &v.suggestion {
            let _ = writeln!(out, "  = help: {}", suggestion.message);
        }
        out.push('\n');
    }

    fn render_text(&self, result: &LintResult) -> String {
        let mut out = String::new();
        for v in &result.violations {
            self.render_violation(&mut out, v);
        }

        for skipped in &result.skipped {
            let _ = writeln!(
                out,
                "{}: skipped {} ({})",
                self.paint(YELLOW, "warning"),
                skipped.path.display(),
                skipped.reason
            );
        }
        if !result.skipped.is_empty() {
            out.push('\n');
        }

        let (errors, warnings, infos) = result.count_by_severity();
        let color = if errors > 0 {
            RED
        } else if warnings > 0 {
            YELLOW
        } else {
            GREEN
        };
        let mut summary = format!(
            "Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} file(s)",
            result.files_checked
        );
        if !result.skipped.is_empty() {
            let _ = write!(summary, ", {} skipped", result.skipped.len());
        }
        out.push_str(&self.paint(color, &summary));
        out.push('\n');
        out
    }
}

fn render_compact(result: &LintResult) -> String {
    let mut out = String::new();
    for v in &result.violations {
        let _ = writeln!(out, "{v}");
    }
    out
}
