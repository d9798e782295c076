//! Import cycles between in-project packages.

use super::{ConformanceRule, RuleContext};
use crate::types::{Location, Suggestion, Violation, ViolationKind};

/// Reports each import cycle found by a depth-first search of the graph.
pub struct ImportCycle;

impl ConformanceRule for ImportCycle {
    fn kind(&self) -> ViolationKind {
        ViolationKind::Cycle
    }

    fn description(&self) -> &'static str {
        "Packages do not import each other in a cycle"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        ctx.graph
            .find_cycles(ctx.config.cycles.max_reported)
            .into_iter()
            .filter_map(|cycle| {
                let first = cycle.first()?;
                let second = cycle.get(1)?;
                let location = ctx.graph.site(first, second).map_or_else(
                    || Location::new(first, 0, 0),
                    |site| Location::new(&site.file, site.line, site.column),
                );
                let detail = cycle.join(" -> ");
                let members = &cycle[..cycle.len() - 1];

                Some(
                    Violation::new(
                        self.kind(),
                        location,
                        first.as_str(),
                        detail.as_str(),
                        format!("import cycle: {detail}"),
                    )
                    .with_involved(members.iter().cloned())
                    .with_suggestion(Suggestion::new(
                        "Move the shared declarations into a package both sides can import, or depend on an interface",
                    )),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixtures::{import, package, run, test_config};

    #[test]
    fn reports_three_package_cycle_in_order() {
        let config = test_config();
        let (a, b, c) = (import("a"), import("b"), import("c"));
        let packages = vec![
            package("internal/a/a.go", &[&b], vec![], &config),
            package("internal/b/b.go", &[&c], vec![], &config),
            package("internal/c/c.go", &["fmt", &a], vec![], &config),
        ];

        let violations = run(&ImportCycle, &config, &packages);
        assert_eq!(violations.len(), 1);
        let v = &violations[0];
        assert_eq!(v.kind, ViolationKind::Cycle);
        assert_eq!(v.subject, "internal/a");
        assert_eq!(
            v.detail,
            "internal/a -> internal/b -> internal/c -> internal/a"
        );
        assert_eq!(v.involved, vec!["internal/a", "internal/b", "internal/c"]);
        assert_eq!(v.location.file.to_string_lossy(), "internal/a/a.go");
        assert_eq!(v.location.line, 3);
    }

    #[test]
    fn acyclic_graph_passes() {
        let config = test_config();
        let (b, c) = (import("b"), import("c"));
        let packages = vec![
            package("internal/a/a.go", &[&b, &c], vec![], &config),
            package("internal/b/b.go", &[&c], vec![], &config),
            package("internal/c/c.go", &[], vec![], &config),
        ];

        assert!(run(&ImportCycle, &config, &packages).is_empty());
    }

    #[test]
    fn max_reported_caps_output() {
        let mut config = test_config();
        config.cycles.max_reported = Some(1);
        let (a, b, c, d) = (import("a"), import("b"), import("c"), import("d"));
        let packages = vec![
            package("internal/a/a.go", &[&b], vec![], &config),
            package("internal/b/b.go", &[&a], vec![], &config),
            package("internal/c/c.go", &[&d], vec![], &config),
            package("internal/d/d.go", &[&c], vec![], &config),
        ];

        assert_eq!(run(&ImportCycle, &config, &packages).len(), 1);
        config.cycles.max_reported = None;
        assert_eq!(run(&ImportCycle, &config, &packages).len(), 2);
    }
}
