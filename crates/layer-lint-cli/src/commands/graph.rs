//! Graph command implementation.

use anyhow::{Context, Result};
use layer_lint_core::{DependencyGraph, PackageInfo, UNKNOWN_LAYER};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::GraphFormat;

/// Runs the graph command.
pub fn run(path: &Path, format: GraphFormat, source: &ConfigSource) -> Result<()> {
    let config = source.load()?;
    let analyzer = super::analyzer_for(path, config)
        .build()
        .context("Failed to build analyzer")?;
    let model = analyzer.load().context("Failed to load sources")?;

    let rendered = match format {
        GraphFormat::Dot => model.graph.to_dot(),
        GraphFormat::Text => render_text(&model.graph, &model.packages),
    };
    print!("{rendered}");
    Ok(())
}

/// Adjacency list annotated with each package's layer.
fn render_text(graph: &DependencyGraph, packages: &[PackageInfo]) -> String {
    let layers: BTreeMap<&str, &str> = packages
        .iter()
        .map(|p| (p.package_dir.as_str(), p.layer.as_str()))
        .collect();
    let layer_of = |node: &str| layers.get(node).copied().unwrap_or(UNKNOWN_LAYER);

    let mut out = String::new();
    for node in graph.nodes() {
        let _ = writeln!(out, "{node} [{}]", layer_of(node));
        for dep in graph.dependencies(node) {
            let _ = writeln!(out, "  -> {dep} [{}]", layer_of(dep));
        }
    }
    let _ = writeln!(
        out,
        "\n{} package(s), {} edge(s)",
        graph.node_count(),
        graph.edge_count()
    );
    out
}
