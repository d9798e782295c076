//! Service purity: the service layer stays free of persistence concerns.

use super::{ConformanceRule, RuleContext};
use crate::package::PackageInfo;
use crate::types::{Location, Suggestion, Violation, ViolationKind};

/// The configured layer must not import forbidden markers, and configured
/// service types must not hold fields typed from them.
pub struct ServicePurity;

impl ConformanceRule for ServicePurity {
    fn kind(&self) -> ViolationKind {
        ViolationKind::Purity
    }

    fn description(&self) -> &'static str {
        "Domain services do not depend on infrastructure or persistence"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let purity = &ctx.config.purity;
        let markers = &purity.forbidden_imports;
        let mut violations = Vec::new();

        if let Some(layer) = &purity.layer {
            for pkg in ctx.packages.iter().filter(|p| &p.layer == layer) {
                for import in &pkg.imports {
                    let Some(marker) = find_marker(markers, &import.path) else {
                        continue;
                    };
                    violations.push(
                        Violation::new(
                            self.kind(),
                            Location::new(&pkg.path, import.line, import.column),
                            &pkg.path,
                            &import.path,
                            format!(
                                "`{layer}` package imports `{}` (forbidden: `{marker}`)",
                                import.path
                            ),
                        )
                        .with_involved([layer.as_str()])
                        .with_suggestion(Suggestion::new(
                            "Depend on a repository interface and inject the implementation",
                        )),
                    );
                }
            }
        }

        for target in &purity.service_types {
            for (pkg, decl) in ctx.find_types(target) {
                let subject = format!("{}.{}", pkg.package_dir, decl.name);
                for field in &decl.fields {
                    let Some(marker) = field_marker(pkg, markers, &field.type_text) else {
                        continue;
                    };
                    violations.push(
                        Violation::new(
                            self.kind(),
                            Location::new(&pkg.path, field.line, 1),
                            subject.as_str(),
                            field.name.as_str(),
                            format!(
                                "service `{}` field `{}` has type `{}` (forbidden: `{marker}`)",
                                decl.name, field.name, field.type_text
                            ),
                        )
                        .with_involved([decl.name.as_str()])
                        .with_suggestion(Suggestion::new(format!(
                            "Type `{}` as a domain interface instead",
                            field.name
                        ))),
                    );
                }
            }
        }

        violations
    }
}

fn find_marker<'m>(markers: &'m [String], text: &str) -> Option<&'m str> {
    markers
        .iter()
        .find(|m| !m.is_empty() && text.contains(m.as_str()))
        .map(String::as_str)
}

/// Matches a field type against the markers, both as written and through the
/// import paths of the package qualifiers it mentions (`*sql.DB` is checked
/// against `database/sql`).
fn field_marker<'m>(pkg: &PackageInfo, markers: &'m [String], type_text: &str) -> Option<&'m str> {
    find_marker(markers, type_text).or_else(|| {
        qualifiers(type_text)
            .filter_map(|q| pkg.imports.iter().find(|i| i.local_name() == q))
            .find_map(|import| find_marker(markers, &import.path))
    })
}

/// Package qualifiers in a type expression (`map[string]*gorm.DB` yields `gorm`).
fn qualifiers(type_text: &str) -> impl Iterator<Item = &str> {
    type_text
        .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
        .filter_map(|token| token.split_once('.').map(|(q, _)| q))
        .filter(|q| !q.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TypeRef;
    use crate::extractor::{FieldDecl, TypeDecl, TypeKind};
    use crate::rules::fixtures::{import, package, run, test_config};

    fn service(fields: &[(&str, &str)]) -> TypeDecl {
        TypeDecl {
            line: 10,
            name: "PricingService".into(),
            kind: TypeKind::Struct,
            exported: true,
            fields: fields
                .iter()
                .enumerate()
                .map(|(i, (name, ty))| FieldDecl {
                    line: 11 + i,
                    name: (*name).into(),
                    type_text: (*ty).into(),
                    exported: false,
                    embedded: false,
                })
                .collect(),
            methods: vec![],
        }
    }

    #[test]
    fn service_importing_persistence_names_the_import() {
        let config = test_config();
        let persistence = import("infrastructure/persistence");
        let packages = vec![package(
            "internal/domain/services/pricing.go",
            &["context", &persistence],
            vec![],
            &config,
        )];

        let violations = run(&ServicePurity, &config, &packages);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::Purity);
        assert_eq!(violations[0].detail, persistence);
        assert_eq!(violations[0].location.line, 4);
    }

    #[test]
    fn other_layers_may_import_persistence() {
        let config = test_config();
        let packages = vec![package(
            "internal/application/orders.go",
            &["database/sql"],
            vec![],
            &config,
        )];

        assert!(run(&ServicePurity, &config, &packages).is_empty());
    }

    #[test]
    fn service_field_typed_from_forbidden_package_fails() {
        let mut config = test_config();
        config.purity.layer = None;
        config.purity.service_types = vec![TypeRef::parse("domain/services.PricingService")];
        let packages = vec![package(
            "internal/domain/services/pricing.go",
            &["database/sql"],
            vec![service(&[("rates", "RateTable"), ("db", "*sql.DB")])],
            &config,
        )];

        let violations = run(&ServicePurity, &config, &packages);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].subject, "internal/domain/services.PricingService");
        assert_eq!(violations[0].detail, "db");
        assert_eq!(violations[0].location.line, 12);
    }

    #[test]
    fn qualifiers_are_found_in_composite_types() {
        assert_eq!(
            qualifiers("map[string]*gorm.DB").collect::<Vec<_>>(),
            vec!["gorm"]
        );
        assert_eq!(qualifiers("[]time.Time").collect::<Vec<_>>(), vec!["time"]);
        assert_eq!(qualifiers("RateTable").count(), 0);
    }
}
