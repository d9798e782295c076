//! Domain isolation: domain packages depend only on the domain.

use super::{ConformanceRule, RuleContext};
use crate::layer::has_path_prefix;
use crate::types::{Location, Suggestion, Violation, ViolationKind};

/// Every non-standard, non-allow-listed import of a domain package must
/// classify into a domain layer.
pub struct DomainIsolation;

impl ConformanceRule for DomainIsolation {
    fn kind(&self) -> ViolationKind {
        ViolationKind::Isolation
    }

    fn description(&self) -> &'static str {
        "Domain packages import only other domain packages, the standard library and allow-listed externals"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let prefix = ctx.config.isolation.domain_prefix.as_str();
        let mut violations = Vec::new();

        for pkg in ctx.packages.iter().filter(|p| has_path_prefix(&p.layer, prefix)) {
            for import in &pkg.imports {
                let path = import.path.as_str();
                if ctx.resolver.is_standard_library(path)
                    || ctx.resolver.is_test_only(path)
                    || ctx.resolver.is_allowed_external(path)
                {
                    continue;
                }

                let target = ctx.classifier.classify(path);
                if has_path_prefix(target, prefix) {
                    continue;
                }

                violations.push(
                    Violation::new(
                        self.kind(),
                        Location::new(&pkg.path, import.line, import.column),
                        &pkg.path,
                        path,
                        format!(
                            "domain package in `{}` imports `{path}` (layer `{target}`)",
                            pkg.layer
                        ),
                    )
                    .with_involved([pkg.layer.as_str(), target])
                    .with_suggestion(Suggestion::new(
                        "Define an interface in the domain and implement it in an outer layer",
                    )),
                );
            }
        }

        violations
    }
}
