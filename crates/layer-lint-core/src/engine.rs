//! Conformance rule engine.
//!
//! Runs every enabled rule over the same immutable inputs and returns the
//! union of their violations.

use tracing::debug;

use crate::rules::{all_rules, RuleBox, RuleContext};
use crate::types::Violation;

/// Evaluates conformance rules against a loaded project.
pub struct ConformanceEngine {
    rules: Vec<RuleBox>,
}

impl Default for ConformanceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConformanceEngine {
    /// Creates an engine with every built-in rule.
    #[must_use]
    pub fn new() -> Self {
        Self { rules: all_rules() }
    }

    /// Creates an engine with the given rules only.
    #[must_use]
    pub fn with_rules(rules: Vec<RuleBox>) -> Self {
        Self { rules }
    }

    /// Registered rules, in execution order.
    #[must_use]
    pub fn rules(&self) -> &[RuleBox] {
        &self.rules
    }

    /// Runs every enabled rule.
    ///
    /// Disabled rules are skipped, severity overrides are applied, and with
    /// `fail_fast` each rule contributes at most its first violation.
    #[must_use]
    pub fn check(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();

        for rule in &self.rules {
            if !ctx.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let mut found = rule.check(ctx);
            debug!("{} produced {} violation(s)", rule.name(), found.len());

            if ctx.config.analyzer.fail_fast {
                found.truncate(1);
            }
            if let Some(severity) = ctx.config.rule_severity(rule.name()) {
                for v in &mut found {
                    v.severity = severity;
                }
            }
            violations.extend(found);
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, RuleConfig};
    use crate::graph::{DependencyGraph, ImportResolver};
    use crate::layer::LayerClassifier;
    use crate::package::PackageInfo;
    use crate::rules::fixtures::{import, package, test_config, MODULE};
    use crate::rules::{DomainIsolation, ImportCycle};
    use crate::types::{Severity, ViolationKind};

    fn check(engine: &ConformanceEngine, config: &Config, packages: &[PackageInfo]) -> Vec<Violation> {
        let classifier = LayerClassifier::new(&config.layer_patterns).unwrap();
        let resolver = ImportResolver::new(config, Some(MODULE.to_string()));
        let graph = DependencyGraph::build(packages, &resolver);
        engine.check(&RuleContext {
            config,
            packages,
            graph: &graph,
            resolver: &resolver,
            classifier: &classifier,
        })
    }

    fn offending(config: &Config) -> Vec<PackageInfo> {
        let (infra, app, entities) = (
            import("infrastructure/db"),
            import("application"),
            import("domain/entities"),
        );
        vec![
            package(
                "internal/domain/entities/user.go",
                &[&infra, &app],
                vec![],
                config,
            ),
            package("internal/application/app.go", &[&entities], vec![], config),
        ]
    }

    #[test]
    fn runs_all_rules_and_unions_results() {
        let config = test_config();
        let violations = check(&ConformanceEngine::new(), &config, &offending(&config));

        let kinds: Vec<ViolationKind> = violations.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds.iter().filter(|k| **k == ViolationKind::Isolation).count(),
            2
        );
        assert!(kinds.contains(&ViolationKind::Direction));
        assert!(kinds.contains(&ViolationKind::Cycle));
    }

    #[test]
    fn fail_fast_keeps_first_violation_per_rule() {
        let mut config = test_config();
        config.analyzer.fail_fast = true;
        let engine = ConformanceEngine::with_rules(vec![Box::new(DomainIsolation)]);

        let violations = check(&engine, &config, &offending(&config));
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn rule_config_disables_and_overrides() {
        let mut config = test_config();
        config.rules.insert(
            "domain-isolation".into(),
            RuleConfig {
                enabled: Some(false),
                severity: None,
            },
        );
        config.rules.insert(
            "import-cycle".into(),
            RuleConfig {
                enabled: None,
                severity: Some(Severity::Warning),
            },
        );
        let engine =
            ConformanceEngine::with_rules(vec![Box::new(DomainIsolation), Box::new(ImportCycle)]);

        let violations = check(&engine, &config, &offending(&config));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::Cycle);
        assert_eq!(violations[0].severity, Severity::Warning);
    }
}
