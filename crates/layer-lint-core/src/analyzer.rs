//! Core analyzer for orchestrating a lint run.
//!
//! Data flows strictly downward: source loading, package extraction, graph
//! construction, rule evaluation.

use crate::config::Config;
use crate::engine::ConformanceEngine;
use crate::extractor::LanguageExtractor;
use crate::graph::{DependencyGraph, ImportResolver};
use crate::layer::LayerClassifier;
use crate::loader::{LoadError, SourceLoader};
use crate::package::PackageInfo;
use crate::rules::{RuleBox, RuleContext};
use crate::types::{LintResult, SkippedFile};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error resolving the root.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The source tree could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// No extractor was supplied to the builder.
    #[error("no language extractor configured")]
    MissingExtractor,

    /// The root directory does not exist.
    #[error("root directory not found: {0}")]
    MissingRoot(PathBuf),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    config: Option<Config>,
    extractor: Option<Box<dyn LanguageExtractor>>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    module: Option<String>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the language extractor.
    #[must_use]
    pub fn extractor<E: LanguageExtractor + 'static>(mut self, extractor: E) -> Self {
        self.extractor = Some(Box::new(extractor));
        self
    }

    /// Restricts the run to the given rule. May be called repeatedly; with
    /// no rules registered every built-in rule runs.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude pattern on top of the configured ones.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Overrides the module path used to resolve in-project imports.
    #[must_use]
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, no extractor was
    /// set, or the root directory doesn't exist.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let classifier = LayerClassifier::new(&config.layer_patterns)?;
        let extractor = self.extractor.ok_or(AnalyzerError::MissingExtractor)?;

        let root = self.root.unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };
        if !root.is_dir() {
            return Err(AnalyzerError::MissingRoot(root));
        }

        let engine = if self.rules.is_empty() {
            ConformanceEngine::new()
        } else {
            ConformanceEngine::with_rules(self.rules)
        };

        Ok(Analyzer {
            root,
            module: self.module.or_else(|| config.analyzer.module.clone()),
            exclude_patterns: self.exclude_patterns,
            config,
            classifier,
            extractor,
            engine,
        })
    }
}

/// Everything extracted from one source tree, ready for rule evaluation.
pub struct ProjectModel {
    /// Extracted packages, sorted by path.
    pub packages: Vec<PackageInfo>,
    /// In-project dependency graph.
    pub graph: DependencyGraph,
    /// Import categorisation used to build the graph.
    pub resolver: ImportResolver,
    /// Files that could not be parsed.
    pub skipped: Vec<SkippedFile>,
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    module: Option<String>,
    exclude_patterns: Vec<String>,
    config: Config,
    classifier: LayerClassifier,
    extractor: Box<dyn LanguageExtractor>,
    engine: ConformanceEngine,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.engine.rules().len()
    }

    /// Loads the source tree: parses files, extracts packages and builds
    /// the dependency graph.
    ///
    /// # Errors
    ///
    /// Returns an error if walking the tree or reading a file fails.
    pub fn load(&self) -> Result<ProjectModel, AnalyzerError> {
        let settings = &self.config.analyzer;
        let extractor = self.extractor.as_ref();

        let loader = if settings.default_excludes {
            SourceLoader::new(&self.root, extractor)?
        } else {
            SourceLoader::bare(&self.root, extractor)
        };
        let loader = loader
            .with_excludes(settings.exclude.iter().chain(&self.exclude_patterns))?
            .respect_gitignore(settings.respect_gitignore)
            .parallelism(settings.parallelism.unwrap_or(1));

        let outcome = loader.load()?;
        info!(
            "Parsed {} {} files ({} skipped)",
            outcome.analyses.len(),
            extractor.language_id(),
            outcome.skipped.len()
        );

        let mut packages: Vec<PackageInfo> = outcome
            .analyses
            .into_iter()
            .map(|a| PackageInfo::extract(a, &self.classifier))
            .collect();
        packages.sort_by(|a, b| a.path.cmp(&b.path));

        let module = self
            .module
            .clone()
            .or_else(|| extractor.module_path(&self.root));
        match &module {
            Some(m) => debug!("Module path: {m}"),
            None => debug!("No module path; resolving imports by directory suffix"),
        }

        let resolver = ImportResolver::new(&self.config, module);
        let graph = DependencyGraph::build(&packages, &resolver);
        debug!(
            "Dependency graph: {} packages, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Ok(ProjectModel {
            packages,
            graph,
            resolver,
            skipped: outcome.skipped,
        })
    }

    /// Evaluates every enabled rule against a loaded project.
    #[must_use]
    pub fn check(&self, model: &ProjectModel) -> LintResult {
        let ctx = RuleContext {
            config: &self.config,
            packages: &model.packages,
            graph: &model.graph,
            resolver: &model.resolver,
            classifier: &self.classifier,
        };

        let mut result = LintResult::new();
        result.violations = self.engine.check(&ctx);
        result.files_checked = model.packages.len();
        result.skipped.clone_from(&model.skipped);
        result.sort();

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );
        result
    }

    /// Loads and checks the source tree.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);
        let model = self.load()?;
        Ok(self.check(&model))
    }
}
