//! Layer classification: maps file paths and import paths to layer names.

use crate::config::{ConfigError, LayerPattern};

/// Layer name assigned when no pattern matches.
pub const UNKNOWN_LAYER: &str = "unknown";

enum Matcher {
    /// Contiguous path segments, e.g. `domain/entities`.
    Segments(Vec<String>),
    /// Glob over the whole normalized path.
    Glob(glob::Pattern),
}

impl Matcher {
    fn matches(&self, normalized: &str) -> bool {
        match self {
            Self::Segments(needle) => {
                let needle: Vec<&str> = needle.iter().map(String::as_str).collect();
                contains_segments(&segments(normalized), &needle)
            }
            Self::Glob(pattern) => pattern.matches(normalized),
        }
    }
}

/// Classifies paths into architecture layers.
///
/// Rules are tried in declaration order and the first match wins. The same
/// classifier is applied to file paths (`internal/domain/entities/user.go`)
/// and import strings (`github.com/acme/shop/internal/domain/entities`).
pub struct LayerClassifier {
    rules: Vec<(Matcher, String)>,
}

impl LayerClassifier {
    /// Builds a classifier from ordered pattern rules.
    ///
    /// # Errors
    ///
    /// Returns an error if a glob pattern does not compile.
    pub fn new(patterns: &[LayerPattern]) -> Result<Self, ConfigError> {
        let mut rules = Vec::with_capacity(patterns.len());
        for p in patterns {
            let normalized = normalize_path(p.pattern.trim());
            let matcher = if normalized.contains(['*', '?', '[']) {
                let glob = glob::Pattern::new(&normalized).map_err(|e| ConfigError::Pattern {
                    pattern: p.pattern.clone(),
                    source: e,
                })?;
                Matcher::Glob(glob)
            } else {
                Matcher::Segments(segments(&normalized).into_iter().map(String::from).collect())
            };
            rules.push((matcher, p.layer.clone()));
        }
        Ok(Self { rules })
    }

    /// Returns the layer of `path`, or [`UNKNOWN_LAYER`].
    #[must_use]
    pub fn classify(&self, path: &str) -> &str {
        let normalized = normalize_path(path);
        self.rules
            .iter()
            .find(|(m, _)| m.matches(&normalized))
            .map_or(UNKNOWN_LAYER, |(_, layer)| layer.as_str())
    }

    /// Whether `path` classifies into a configured layer.
    #[must_use]
    pub fn is_known(&self, path: &str) -> bool {
        self.classify(path) != UNKNOWN_LAYER
    }
}

/// Normalizes `\` and `::` separators to `/`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/").replace("::", "/")
}

/// Splits a normalized path into non-empty segments.
#[must_use]
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty() && *s != ".").collect()
}

fn contains_segments(hay: &[&str], needle: &[&str]) -> bool {
    if needle.is_empty() || needle.len() > hay.len() {
        return false;
    }
    hay.windows(needle.len()).any(|w| w == needle)
}

/// Whether `path` contains the segments of `pattern` contiguously.
#[must_use]
pub fn path_contains(path: &str, pattern: &str) -> bool {
    let path = normalize_path(path);
    let pattern = normalize_path(pattern);
    contains_segments(&segments(&path), &segments(&pattern))
}

/// Whether `path` equals `prefix` or lies below it (`prefix/...`).
#[must_use]
pub fn has_path_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    !prefix.is_empty()
        && path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> LayerClassifier {
        LayerClassifier::new(&[
            LayerPattern::new("domain/entities", "domain/entities"),
            LayerPattern::new("domain/shared", "domain/shared"),
            LayerPattern::new("domain", "domain"),
            LayerPattern::new("application", "application"),
            LayerPattern::new("infrastructure", "infrastructure"),
            LayerPattern::new("cmd/*/main.go", "main"),
        ])
        .expect("patterns compile")
    }

    #[test]
    fn classifies_file_path() {
        let c = classifier();
        assert_eq!(
            c.classify("internal/domain/entities/user.go"),
            "domain/entities"
        );
    }

    #[test]
    fn classifies_import_path() {
        let c = classifier();
        assert_eq!(
            c.classify("github.com/acme/shop/internal/infrastructure/db"),
            "infrastructure"
        );
    }

    #[test]
    fn first_match_wins() {
        let c = classifier();
        // "domain" would also match, but "domain/shared" is declared first
        assert_eq!(c.classify("internal/domain/shared/id.go"), "domain/shared");
        assert_eq!(c.classify("internal/domain/events/created.go"), "domain");
    }

    #[test]
    fn unknown_when_nothing_matches() {
        let c = classifier();
        assert_eq!(c.classify("github.com/google/uuid"), UNKNOWN_LAYER);
        assert!(!c.is_known("fmt"));
    }

    #[test]
    fn no_partial_segment_match() {
        let c = classifier();
        assert_eq!(c.classify("internal/domains/user.go"), UNKNOWN_LAYER);
        assert_eq!(c.classify("internal/applications/x.go"), UNKNOWN_LAYER);
    }

    #[test]
    fn glob_patterns_match_whole_path() {
        let c = classifier();
        assert_eq!(c.classify("cmd/api/main.go"), "main");
        assert_eq!(c.classify("cmd/api/server.go"), UNKNOWN_LAYER);
    }

    #[test]
    fn windows_and_module_separators_are_normalized() {
        let c = classifier();
        assert_eq!(
            c.classify("internal\\application\\orders.go"),
            "application"
        );
        assert_eq!(c.classify("crate::domain::entities::User"), "domain/entities");
    }

    #[test]
    fn invalid_glob_is_rejected() {
        let result = LayerClassifier::new(&[LayerPattern::new("domain/[", "domain")]);
        assert!(result.is_err());
    }

    #[test]
    fn path_prefix_respects_segments() {
        assert!(has_path_prefix("database/sql", "database"));
        assert!(has_path_prefix("fmt", "fmt"));
        assert!(!has_path_prefix("fmtx/y", "fmt"));
        assert!(!has_path_prefix("anything", ""));
    }

    #[test]
    fn path_contains_segments() {
        assert!(path_contains("internal/domain/services", "domain/services"));
        assert!(!path_contains("internal/domain/servicesx", "domain/services"));
    }
}
