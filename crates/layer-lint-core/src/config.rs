//! Configuration types for layer-lint.
//!
//! A single TOML file carries the layer patterns, the allowed dependency
//! table, the import allow-lists and the targets of the structural checks.
//! Every section is optional; missing sections fall back to defaults for a
//! conventional Go clean-architecture layout.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use crate::types::Severity;

/// Top-level configuration for layer-lint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Layers that are never constrained, even with a `[dependencies]` entry.
    pub exempt_layers: Vec<String>,

    /// Analyzer configuration.
    pub analyzer: AnalyzerConfig,

    /// Ordered path-pattern → layer rules. First match wins.
    #[serde(rename = "layers")]
    pub layer_patterns: Vec<LayerPattern>,

    /// Layer → layers it may depend on. Same-layer imports are always allowed.
    #[serde(rename = "dependencies")]
    pub allowed_dependencies: BTreeMap<String, BTreeSet<String>>,

    /// Import allow-lists.
    pub imports: ImportsConfig,

    /// Domain isolation settings.
    pub isolation: IsolationConfig,

    /// Value-object immutability targets.
    pub immutability: ImmutabilityConfig,

    /// Repository interface contract targets.
    pub contracts: ContractsConfig,

    /// Service-layer purity settings.
    pub purity: PurityConfig,

    /// Cycle detection settings.
    pub cycles: CyclesConfig,

    /// Per-rule configurations, keyed by rule name.
    pub rules: HashMap<String, RuleConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exempt_layers: vec!["main".to_string()],
            analyzer: AnalyzerConfig::default(),
            layer_patterns: default_layer_patterns(),
            allowed_dependencies: default_dependencies(),
            imports: ImportsConfig::default(),
            isolation: IsolationConfig::default(),
            immutability: ImmutabilityConfig::default(),
            contracts: ContractsConfig::default(),
            purity: PurityConfig::default(),
            cycles: CyclesConfig::default(),
            rules: HashMap::new(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Names of all layers the patterns can produce.
    #[must_use]
    pub fn layer_names(&self) -> BTreeSet<&str> {
        self.layer_patterns.iter().map(|p| p.layer.as_str()).collect()
    }

    /// Allowed dependency set of a layer, or `None` when the layer is
    /// unconstrained (no entry, or exempt).
    #[must_use]
    pub fn allowed_for(&self, layer: &str) -> Option<&BTreeSet<String>> {
        if self.is_exempt(layer) {
            return None;
        }
        self.allowed_dependencies.get(layer)
    }

    /// Whether a layer is explicitly exempt from direction checks.
    #[must_use]
    pub fn is_exempt(&self, layer: &str) -> bool {
        self.exempt_layers.iter().any(|l| l == layer)
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }

    /// Validate config consistency.
    ///
    /// # Errors
    ///
    /// Returns error describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, p) in self.layer_patterns.iter().enumerate() {
            if p.pattern.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "layers[{i}]: empty pattern"
                )));
            }
            if p.layer.trim().is_empty() {
                return Err(ConfigError::Validation(format!("layers[{i}]: empty layer")));
            }
        }

        let layer_names = self.layer_names();

        for (layer, deps) in &self.allowed_dependencies {
            if !layer_names.contains(layer.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "dependencies.{layer}: unknown layer"
                )));
            }
            for dep in deps {
                if !layer_names.contains(dep.as_str()) {
                    return Err(ConfigError::Validation(format!(
                        "dependencies.{layer}: unknown dep '{dep}'"
                    )));
                }
            }
            if deps.contains(layer) {
                return Err(ConfigError::Validation(format!(
                    "dependencies.{layer}: self-dependency"
                )));
            }
        }

        for target in self
            .immutability
            .value_objects
            .iter()
            .chain(&self.contracts.repository_interfaces)
            .chain(&self.purity.service_types)
        {
            if target.name.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "type reference '{target}' has no type name"
                )));
            }
        }

        Ok(())
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Root directory to analyze, relative to the checked path.
    pub root: PathBuf,

    /// Glob patterns or path substrings to exclude from analysis.
    pub exclude: Vec<String>,

    /// Whether the built-in exclusions apply: the extractor's test and
    /// generated-file globs, and `vendor`/`node_modules`/`testdata` pruning.
    /// Files with a generated-code header are skipped either way.
    pub default_excludes: bool,

    /// Whether to respect .gitignore files.
    pub respect_gitignore: bool,

    /// Module path of the analyzed project. Read from the project manifest
    /// (`go.mod`) when absent.
    pub module: Option<String>,

    /// Maximum number of parallel file parses.
    pub parallelism: Option<usize>,

    /// Report only the first violation of each rule.
    pub fail_fast: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            exclude: Vec::new(),
            default_excludes: true,
            respect_gitignore: true,
            module: None,
            parallelism: None,
            fail_fast: false,
        }
    }
}

/// One ordered classification rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerPattern {
    /// Path pattern: `/`-separated segments, or a glob when it contains `*` or `?`.
    pub pattern: String,
    /// Layer name assigned on match.
    pub layer: String,
}

impl LayerPattern {
    /// Creates a new pattern rule.
    #[must_use]
    pub fn new(pattern: impl Into<String>, layer: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            layer: layer.into(),
        }
    }
}

/// Import classification lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportsConfig {
    /// Standard-library import prefixes.
    pub standard_library: Vec<String>,
    /// External packages any layer may import.
    pub allowed_external: Vec<String>,
    /// Imports only used by tests.
    pub test_only: Vec<String>,
}

impl Default for ImportsConfig {
    fn default() -> Self {
        Self {
            standard_library: GO_STANDARD_LIBRARY.iter().map(|s| (*s).to_string()).collect(),
            allowed_external: Vec::new(),
            test_only: vec![
                "testing".to_string(),
                "github.com/stretchr/testify".to_string(),
                "github.com/golang/mock".to_string(),
                "go.uber.org/mock".to_string(),
            ],
        }
    }
}

/// Domain isolation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IsolationConfig {
    /// Layers starting with this marker form the domain.
    pub domain_prefix: String,
}

impl Default for IsolationConfig {
    fn default() -> Self {
        Self {
            domain_prefix: "domain".to_string(),
        }
    }
}

/// Value-object immutability targets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImmutabilityConfig {
    /// Value-object type identifiers.
    pub value_objects: Vec<TypeRef>,
}

/// Repository interface contract targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractsConfig {
    /// Repository interface identifiers.
    pub repository_interfaces: Vec<TypeRef>,
    /// Type every method must take as its first parameter.
    pub context_type: String,
    /// Type every method must return last.
    pub error_type: String,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            repository_interfaces: Vec::new(),
            context_type: "context.Context".to_string(),
            error_type: "error".to_string(),
        }
    }
}

/// Service-layer purity settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PurityConfig {
    /// Layer that must stay pure. `None` disables the import half of the check.
    pub layer: Option<String>,
    /// Substrings that mark a forbidden dependency.
    pub forbidden_imports: Vec<String>,
    /// Service types whose fields must not reference forbidden markers.
    pub service_types: Vec<TypeRef>,
}

impl Default for PurityConfig {
    fn default() -> Self {
        Self {
            layer: Some("domain/services".to_string()),
            forbidden_imports: vec![
                "infrastructure".to_string(),
                "persistence".to_string(),
                "database/sql".to_string(),
                "gorm.io".to_string(),
            ],
            service_types: Vec::new(),
        }
    }
}

/// Cycle detection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CyclesConfig {
    /// Upper bound on reported cycles. `None` reports every cycle found.
    pub max_reported: Option<usize>,
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// A type identifier: `package/pattern.TypeName` or a bare `TypeName`.
///
/// The package part is matched by path segments against the directory of
/// the file declaring the type. A package part under the module path
/// (`github.com/acme/shop/internal/domain.User`) names that package exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeRef {
    /// Package pattern, if qualified.
    pub package: Option<String>,
    /// Type name.
    pub name: String,
}

impl TypeRef {
    /// Parses `pkg/path.Name` or `Name`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        match s.rsplit_once('.') {
            Some((pkg, name)) if !pkg.is_empty() => Self {
                package: Some(pkg.to_string()),
                name: name.to_string(),
            },
            _ => Self {
                package: None,
                name: s.trim_start_matches('.').to_string(),
            },
        }
    }
}

impl TryFrom<String> for TypeRef {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err("type reference must not be empty".to_string());
        }
        Ok(Self::parse(&value))
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.package {
            Some(pkg) => write!(f, "{pkg}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Invalid layer pattern.
    #[error("Invalid layer pattern '{pattern}': {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Glob compile error.
        source: glob::PatternError,
    },

    /// Config is structurally invalid.
    #[error("config validation: {0}")]
    Validation(String),
}

fn default_layer_patterns() -> Vec<LayerPattern> {
    [
        ("domain/entities", "domain/entities"),
        ("domain/valueobjects", "domain/valueobjects"),
        ("domain/repositories", "domain/repositories"),
        ("domain/services", "domain/services"),
        ("domain/shared", "domain/shared"),
        ("application", "application"),
        ("infrastructure", "infrastructure"),
        ("interfaces", "interfaces"),
        ("cmd", "main"),
    ]
    .into_iter()
    .map(|(p, l)| LayerPattern::new(p, l))
    .collect()
}

fn default_dependencies() -> BTreeMap<String, BTreeSet<String>> {
    let table: &[(&str, &[&str])] = &[
        ("domain/shared", &[]),
        ("domain/valueobjects", &["domain/shared"]),
        ("domain/entities", &["domain/valueobjects", "domain/shared"]),
        (
            "domain/repositories",
            &["domain/entities", "domain/valueobjects", "domain/shared"],
        ),
        (
            "domain/services",
            &[
                "domain/entities",
                "domain/valueobjects",
                "domain/repositories",
                "domain/shared",
            ],
        ),
        (
            "application",
            &[
                "domain/entities",
                "domain/valueobjects",
                "domain/repositories",
                "domain/services",
                "domain/shared",
            ],
        ),
        (
            "infrastructure",
            &[
                "domain/entities",
                "domain/valueobjects",
                "domain/repositories",
                "domain/shared",
                "application",
            ],
        ),
        (
            "interfaces",
            &[
                "domain/entities",
                "domain/valueobjects",
                "domain/shared",
                "application",
            ],
        ),
    ];

    table
        .iter()
        .map(|(layer, deps)| {
            (
                (*layer).to_string(),
                deps.iter().map(|d| (*d).to_string()).collect(),
            )
        })
        .collect()
}

/// Top-level packages of the Go standard library.
const GO_STANDARD_LIBRARY: &[&str] = &[
    "archive", "bufio", "bytes", "cmp", "compress", "container", "context", "crypto", "database",
    "debug", "embed", "encoding", "errors", "expvar", "flag", "fmt", "go", "hash", "html",
    "image", "index", "io", "iter", "log", "maps", "math", "mime", "net", "os", "path", "plugin",
    "reflect", "regexp", "runtime", "slices", "sort", "strconv", "strings", "structs", "sync",
    "syscall", "testing", "text", "time", "unicode", "unique", "unsafe", "weak",
];
