//! Shared output formatting for lint results.

use anyhow::Result;
use layer_lint_core::{LintResult, ReportFormat, Reporter};
use std::io::IsTerminal;

use crate::OutputFormat;

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Self::Text,
            OutputFormat::Json => Self::Json,
            OutputFormat::Compact => Self::Compact,
        }
    }
}

/// Print lint results in the specified format.
///
/// Colors are only used when requested and stdout is a terminal.
pub fn print(result: &LintResult, format: OutputFormat, color: bool) -> Result<()> {
    let reporter = Reporter::new(format.into()).color(color && std::io::stdout().is_terminal());
    print!("{}", reporter.render(result)?);
    Ok(())
}
