//! Repository interface contracts.

use super::{ConformanceRule, RuleContext};
use crate::extractor::{MethodSig, TypeKind};
use crate::package::PackageInfo;
use crate::types::{Location, Suggestion, Violation, ViolationKind};

/// Configured repository types must be interfaces whose methods take a
/// context first and return an error last.
pub struct RepositoryContract;

impl RepositoryContract {
    fn method_violation(
        &self,
        pkg: &PackageInfo,
        owner: &str,
        method: &MethodSig,
        message: String,
        hint: String,
    ) -> Violation {
        Violation::new(
            self.kind(),
            Location::new(&pkg.path, method.line, 1),
            format!("{}.{owner}", pkg.package_dir),
            method.name.as_str(),
            message,
        )
        .with_involved([owner])
        .with_suggestion(Suggestion::new(hint))
    }
}

impl ConformanceRule for RepositoryContract {
    fn kind(&self) -> ViolationKind {
        ViolationKind::InterfaceContract
    }

    fn description(&self) -> &'static str {
        "Repository interfaces take a context first and return an error last"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let contracts = &ctx.config.contracts;
        let mut violations = Vec::new();

        for target in &contracts.repository_interfaces {
            let found = ctx.find_types(target);
            if found.is_empty() {
                violations.push(
                    Violation::new(
                        self.kind(),
                        Location::new(target.to_string(), 0, 0),
                        target.to_string(),
                        "",
                        format!("repository interface `{target}` not found"),
                    )
                    .with_suggestion(Suggestion::new(
                        "Fix the type identifier under [contracts] repository_interfaces",
                    )),
                );
                continue;
            }

            for (pkg, decl) in found {
                if decl.kind != TypeKind::Interface {
                    violations.push(
                        Violation::new(
                            self.kind(),
                            Location::new(&pkg.path, decl.line, 1),
                            format!("{}.{}", pkg.package_dir, decl.name),
                            decl.kind.to_string(),
                            format!(
                                "repository `{}` must be an interface, found {}",
                                decl.name, decl.kind
                            ),
                        )
                        .with_involved([decl.name.as_str()])
                        .with_suggestion(Suggestion::new(
                            "Declare the repository as an interface in the domain and implement it in infrastructure",
                        )),
                    );
                    continue;
                }

                for method in &decl.methods {
                    match method.params.first() {
                        Some(p) if p.type_text == contracts.context_type => {}
                        other => violations.push(self.method_violation(
                            pkg,
                            &decl.name,
                            method,
                            format!(
                                "method `{}.{}` must take `{}` as its first parameter, found `{}`",
                                decl.name,
                                method.name,
                                contracts.context_type,
                                other.map_or("nothing", |p| p.type_text.as_str())
                            ),
                            format!("Add `ctx {}` as the first parameter", contracts.context_type),
                        )),
                    }

                    match method.results.last() {
                        Some(r) if *r == contracts.error_type => {}
                        other => violations.push(self.method_violation(
                            pkg,
                            &decl.name,
                            method,
                            format!(
                                "method `{}.{}` must return `{}` as its last result, found `{}`",
                                decl.name,
                                method.name,
                                contracts.error_type,
                                other.map_or("nothing", String::as_str)
                            ),
                            format!("Return `{}` as the last result", contracts.error_type),
                        )),
                    }
                }
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TypeRef;
    use crate::extractor::{ParamDecl, TypeDecl};
    use crate::rules::fixtures::{package, run, test_config};

    fn method(line: usize, name: &str, params: &[&str], results: &[&str]) -> MethodSig {
        MethodSig {
            line,
            name: name.into(),
            params: params
                .iter()
                .map(|t| ParamDecl {
                    name: None,
                    type_text: (*t).into(),
                })
                .collect(),
            results: results.iter().map(|r| (*r).into()).collect(),
        }
    }

    fn repository(kind: TypeKind, methods: Vec<MethodSig>) -> TypeDecl {
        TypeDecl {
            line: 8,
            name: "UserRepository".into(),
            kind,
            exported: true,
            fields: vec![],
            methods,
        }
    }

    fn config() -> crate::config::Config {
        let mut config = test_config();
        config.contracts.repository_interfaces =
            vec![TypeRef::parse("domain/repositories.UserRepository")];
        config
    }

    #[test]
    fn conforming_interface_passes() {
        let config = config();
        let packages = vec![package(
            "internal/domain/repositories/user.go",
            &["context"],
            vec![repository(
                TypeKind::Interface,
                vec![
                    method(9, "FindByID", &["context.Context", "string"], &["*entities.User", "error"]),
                    method(10, "Save", &["context.Context", "*entities.User"], &["error"]),
                ],
            )],
            &config,
        )];

        assert!(run(&RepositoryContract, &config, &packages).is_empty());
    }

    #[test]
    fn missing_context_names_the_method() {
        let config = config();
        let packages = vec![package(
            "internal/domain/repositories/user.go",
            &[],
            vec![repository(
                TypeKind::Interface,
                vec![method(9, "FindByID", &["string"], &["*entities.User", "error"])],
            )],
            &config,
        )];

        let violations = run(&RepositoryContract, &config, &packages);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].detail, "FindByID");
        assert_eq!(violations[0].location.line, 9);
        assert!(violations[0].message.contains("first parameter"));
    }

    #[test]
    fn method_without_parameters_lacks_context() {
        let config = config();
        let packages = vec![package(
            "internal/domain/repositories/user.go",
            &[],
            vec![repository(
                TypeKind::Interface,
                vec![method(9, "Count", &[], &["int", "error"])],
            )],
            &config,
        )];

        let violations = run(&RepositoryContract, &config, &packages);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].detail, "Count");
        assert_eq!(
            violations[0].message,
            "method `UserRepository.Count` must take `context.Context` as its first parameter, found `nothing`"
        );
    }

    #[test]
    fn variadic_only_method_lacks_context() {
        let config = config();
        let packages = vec![package(
            "internal/domain/repositories/user.go",
            &[],
            vec![repository(
                TypeKind::Interface,
                vec![method(9, "List", &["...Option"], &["[]User", "error"])],
            )],
            &config,
        )];

        let violations = run(&RepositoryContract, &config, &packages);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.ends_with("found `...Option`"));
    }

    #[test]
    fn bare_method_fails_both_halves() {
        let config = config();
        let packages = vec![package(
            "internal/domain/repositories/user.go",
            &[],
            vec![repository(TypeKind::Interface, vec![method(9, "Close", &[], &[])])],
            &config,
        )];

        let violations = run(&RepositoryContract, &config, &packages);
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.detail == "Close"));
    }

    #[test]
    fn missing_error_result_is_reported() {
        let config = config();
        let packages = vec![package(
            "internal/domain/repositories/user.go",
            &[],
            vec![repository(
                TypeKind::Interface,
                vec![method(9, "Count", &["context.Context"], &["int"])],
            )],
            &config,
        )];

        let violations = run(&RepositoryContract, &config, &packages);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("last result"));
    }

    #[test]
    fn struct_repository_is_rejected() {
        let config = config();
        let packages = vec![package(
            "internal/domain/repositories/user.go",
            &[],
            vec![repository(TypeKind::Struct, vec![])],
            &config,
        )];

        let violations = run(&RepositoryContract, &config, &packages);
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].message,
            "repository `UserRepository` must be an interface, found struct"
        );
    }
}
