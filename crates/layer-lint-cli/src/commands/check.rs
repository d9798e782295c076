//! Check command implementation.

use anyhow::{bail, Context, Result};
use layer_lint_core::rules::rule_by_name;
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    rules_filter: Option<String>,
    exclude: Vec<String>,
    color: bool,
    source: &ConfigSource,
) -> Result<()> {
    let config = source.load()?;
    let mut builder = super::analyzer_for(path, config).excludes(exclude);

    if let Some(filter) = rules_filter {
        for name in filter.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let Some(rule) = rule_by_name(name) else {
                bail!("Unknown rule: {name} (see `layer-lint list-rules`)");
            };
            builder = builder.rule_box(rule);
        }
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with {} rules",
        analyzer.root().display(),
        analyzer.rule_count()
    );

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, format, color)?;

    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}
