//! Layer direction: imports follow the allowed dependency table.

use std::collections::BTreeSet;

use super::{ConformanceRule, RuleContext};
use crate::layer::UNKNOWN_LAYER;
use crate::types::{Location, Suggestion, Violation, ViolationKind};

/// For every constrained layer, imports into other known layers must be
/// listed in that layer's allowed set.
pub struct LayerDirection;

impl ConformanceRule for LayerDirection {
    fn kind(&self) -> ViolationKind {
        ViolationKind::Direction
    }

    fn description(&self) -> &'static str {
        "Imports between layers follow the allowed dependency table"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();

        for pkg in ctx.packages {
            let Some(allowed) = ctx.config.allowed_for(&pkg.layer) else {
                continue;
            };

            for import in &pkg.imports {
                let path = import.path.as_str();
                if ctx.resolver.is_standard_library(path) {
                    continue;
                }

                let target = ctx.classifier.classify(path);
                if target == UNKNOWN_LAYER || target == pkg.layer || allowed.contains(target) {
                    continue;
                }

                violations.push(
                    Violation::new(
                        self.kind(),
                        Location::new(&pkg.path, import.line, import.column),
                        &pkg.path,
                        path,
                        format!(
                            "{} -> {target} dependency not allowed (allowed: {})",
                            pkg.layer,
                            format_allowed(allowed)
                        ),
                    )
                    .with_involved([pkg.layer.as_str(), target])
                    .with_suggestion(Suggestion::new(format!(
                        "Invert the dependency through an interface owned by `{}`, or move this code into a layer that may depend on `{target}`",
                        pkg.layer
                    ))),
                );
            }
        }

        violations
    }
}

fn format_allowed(allowed: &BTreeSet<String>) -> String {
    let list: Vec<&str> = allowed.iter().map(String::as_str).collect();
    format!("[{}]", list.join(", "))
}
