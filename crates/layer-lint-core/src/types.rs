//! Core types for conformance violations and results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for conformance violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail the run.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The conformance rule family a violation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// A domain package depends on something outside the domain.
    Isolation,
    /// A layer depends on a layer it is not allowed to depend on.
    Direction,
    /// Packages import each other in a loop.
    Cycle,
    /// A value object exposes mutable state.
    Immutability,
    /// A repository interface does not follow the method contract.
    InterfaceContract,
    /// A pure layer references a forbidden dependency category.
    Purity,
}

impl ViolationKind {
    /// Every kind, in reporting order.
    pub const ALL: [Self; 6] = [
        Self::Isolation,
        Self::Direction,
        Self::Cycle,
        Self::Immutability,
        Self::InterfaceContract,
        Self::Purity,
    ];

    /// Rule code (e.g. `"LAYER001"`).
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Isolation => "ISOLATION001",
            Self::Direction => "LAYER001",
            Self::Cycle => "CYCLE001",
            Self::Immutability => "IMMUT001",
            Self::InterfaceContract => "CONTRACT001",
            Self::Purity => "PURITY001",
        }
    }

    /// Kebab-case rule name (e.g. `"layer-direction"`).
    #[must_use]
    pub fn rule_name(self) -> &'static str {
        match self {
            Self::Isolation => "domain-isolation",
            Self::Direction => "layer-direction",
            Self::Cycle => "import-cycle",
            Self::Immutability => "value-object-immutability",
            Self::InterfaceContract => "repository-contract",
            Self::Purity => "service-purity",
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.rule_name())
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

/// A remediation hint attached to a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A conformance violation found during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule family.
    pub kind: ViolationKind,
    /// Rule code (e.g., "LAYER001").
    pub code: String,
    /// Rule name (e.g., "layer-direction").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// What is in violation: a file, a package or a type.
    pub subject: String,
    /// The offending relation: an import, a cycle path, a field or a method.
    pub detail: String,
    /// Human-readable message.
    pub message: String,
    /// Layers or types involved, for context.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub involved: Vec<String>,
    /// Optional remediation hint.
    pub suggestion: Option<Suggestion>,
}

impl Violation {
    /// Creates a new error-severity violation.
    #[must_use]
    pub fn new(
        kind: ViolationKind,
        location: Location,
        subject: impl Into<String>,
        detail: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            code: kind.code().to_string(),
            rule: kind.rule_name().to_string(),
            severity: Severity::Error,
            location,
            subject: subject.into(),
            detail: detail.into(),
            message: message.into(),
            involved: Vec::new(),
            suggestion: None,
        }
    }

    /// Adds a remediation hint to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Records the layers or types involved in this violation.
    #[must_use]
    pub fn with_involved<I, S>(mut self, involved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.involved.extend(involved.into_iter().map(Into::into));
        self
    }

    /// Overrides the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Total ordering used to make reports deterministic.
    fn sort_key(&self) -> (&Location, &str, &str, &str) {
        (&self.location, &self.code, &self.subject, &self.detail)
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// A source file that was discovered but could not be analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    /// Path relative to project root.
    pub path: PathBuf,
    /// Why the file was skipped.
    pub reason: String,
}

/// Result of running the conformance analysis.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of files analyzed.
    pub files_checked: usize,
    /// Files skipped because they failed to parse.
    #[serde(default)]
    pub skipped: Vec<SkippedFile>,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Returns violations of one rule family.
    #[must_use]
    pub fn by_kind(&self, kind: ViolationKind) -> Vec<&Violation> {
        self.violations.iter().filter(|v| v.kind == kind).collect()
    }

    /// Counts violations by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        self.violations
            .iter()
            .fold((0, 0, 0), |(e, w, i), v| match v.severity {
                Severity::Error => (e + 1, w, i),
                Severity::Warning => (e, w + 1, i),
                Severity::Info => (e, w, i + 1),
            })
    }

    /// Sorts violations by location, then code, subject and detail.
    pub fn sort(&mut self) {
        self.violations.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        self.skipped.sort_by(|a, b| a.path.cmp(&b.path));
    }

    /// Adds violations and counts from another result.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
        self.skipped.extend(other.skipped);
        self.files_checked += other.files_checked;
    }
}
