//! # layer-lint-core
//!
//! Static analysis engine for layered (Clean Architecture / DDD) dependency
//! discipline.
//!
//! A run loads a source tree through a [`LanguageExtractor`], classifies
//! every file into a layer, builds the in-project [`DependencyGraph`] and
//! evaluates six conformance rules:
//!
//! - domain isolation
//! - layer direction
//! - import cycles
//! - value-object immutability
//! - repository interface contracts
//! - service purity
//!
//! ## Example
//!
//! ```ignore
//! use layer_lint_core::{Analyzer, Config, Reporter, ReportFormat};
//! use layer_lint_go::GoExtractor;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./my-service")
//!     .config(Config::from_file("layer-lint.toml".as_ref())?)
//!     .extractor(GoExtractor::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! print!("{}", Reporter::new(ReportFormat::Text).render(&result)?);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod engine;
mod extractor;
mod graph;
mod layer;
mod loader;
mod package;
mod report;
mod types;

/// Conformance rules.
pub mod rules;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError, ProjectModel};
pub use config::{
    AnalyzerConfig, Config, ConfigError, ContractsConfig, CyclesConfig, ImmutabilityConfig,
    ImportsConfig, IsolationConfig, LayerPattern, PurityConfig, RuleConfig, TypeRef,
};
pub use engine::ConformanceEngine;
pub use extractor::{
    ExtractError, FieldDecl, FileAnalysis, FunctionDecl, ImportInfo, LanguageExtractor,
    MethodSig, ParamDecl, TypeDecl, TypeKind,
};
pub use graph::{DependencyGraph, ImportResolver, ImportSite};
pub use layer::{has_path_prefix, normalize_path, path_contains, LayerClassifier, UNKNOWN_LAYER};
pub use loader::{LoadError, LoadOutcome, SourceLoader};
pub use package::{PackageInfo, ROOT_PACKAGE};
pub use report::{ReportFormat, Reporter};
pub use rules::{ConformanceRule, RuleBox, RuleContext};
pub use types::{
    LintResult, Location, Severity, SkippedFile, Suggestion, Violation, ViolationKind,
};
