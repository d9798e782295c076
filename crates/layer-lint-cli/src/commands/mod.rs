//! Subcommand implementations.

pub mod check;
pub mod graph;
pub mod init;
pub mod list_rules;
pub mod output;

use layer_lint_core::{Analyzer, AnalyzerBuilder, Config};
use layer_lint_go::GoExtractor;
use std::path::Path;

/// Starts an analyzer builder for `path` with the Go extractor.
///
/// `analyzer.root` in the config is resolved against `path`.
pub(crate) fn analyzer_for(path: &Path, config: Config) -> AnalyzerBuilder {
    let root = path.join(&config.analyzer.root);
    Analyzer::builder()
        .root(root)
        .config(config)
        .extractor(GoExtractor::new())
}

