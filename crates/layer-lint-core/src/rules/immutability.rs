//! Value objects expose no mutable state.

use super::{ConformanceRule, RuleContext};
use crate::types::{Location, Suggestion, Violation, ViolationKind};

/// Configured value-object types must not declare exported fields.
pub struct ValueObjectImmutability;

impl ConformanceRule for ValueObjectImmutability {
    fn kind(&self) -> ViolationKind {
        ViolationKind::Immutability
    }

    fn description(&self) -> &'static str {
        "Value objects keep all fields unexported"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();

        for target in &ctx.config.immutability.value_objects {
            let found = ctx.find_types(target);
            if found.is_empty() {
                violations.push(
                    Violation::new(
                        self.kind(),
                        Location::new(target.to_string(), 0, 0),
                        target.to_string(),
                        "",
                        format!("value object `{target}` not found"),
                    )
                    .with_suggestion(Suggestion::new(
                        "Fix the type identifier under [immutability] value_objects",
                    )),
                );
                continue;
            }

            for (pkg, decl) in found {
                let subject = format!("{}.{}", pkg.package_dir, decl.name);
                for field in decl.fields.iter().filter(|f| f.exported) {
                    violations.push(
                        Violation::new(
                            self.kind(),
                            Location::new(&pkg.path, field.line, 1),
                            subject.as_str(),
                            field.name.as_str(),
                            format!(
                                "value object `{}` exposes exported field `{}`",
                                decl.name, field.name
                            ),
                        )
                        .with_involved([decl.name.as_str()])
                        .with_suggestion(Suggestion::new(format!(
                            "Unexport `{}` and add a read-only accessor",
                            field.name
                        ))),
                    );
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
    use crate::extractor::{FieldDecl, TypeDecl, TypeKind};
    use crate::rules::fixtures::{package, run, test_config};

    fn field(line: usize, name: &str) -> FieldDecl {
        FieldDecl {
            line,
            name: name.into(),
            type_text: "string".into(),
            exported: name.starts_with(char::is_uppercase),
            embedded: false,
        }
    }

    fn email(fields: Vec<FieldDecl>) -> TypeDecl {
        TypeDecl {
            line: 5,
            name: "Email".into(),
            kind: TypeKind::Struct,
            exported: true,
            fields,
            methods: vec![],
        }
    }

    #[test]
    fn single_exported_field_is_named() {
        let mut config = test_config();
        config.immutability.value_objects = vec![TypeRef::parse("domain/valueobjects.Email")];
        let packages = vec![package(
            "internal/domain/valueobjects/email.go",
            &[],
            vec![email(vec![field(6, "local"), field(7, "Domain")])],
            &config,
        )];

        let violations = run(&ValueObjectImmutability, &config, &packages);
        assert_eq!(violations.len(), 1);
        let v = &violations[0];
        assert_eq!(v.detail, "Domain");
        assert_eq!(v.subject, "internal/domain/valueobjects.Email");
        assert_eq!(v.location.line, 7);
        assert!(v.message.contains("`Domain`"));
    }

    #[test]
    fn unexported_fields_pass() {
        let mut config = test_config();
        config.immutability.value_objects = vec![TypeRef::parse("Email")];
        let packages = vec![package(
            "internal/domain/valueobjects/email.go",
            &[],
            vec![email(vec![field(6, "local"), field(7, "domain")])],
            &config,
        )];

        assert!(run(&ValueObjectImmutability, &config, &packages).is_empty());
    }

    #[test]
    fn missing_value_object_is_reported() {
        let mut config = test_config();
        config.immutability.value_objects = vec![TypeRef::parse("domain/valueobjects.Money")];
        let packages = vec![package(
            "internal/domain/valueobjects/email.go",
            &[],
            vec![email(vec![])],
            &config,
        )];

        let violations = run(&ValueObjectImmutability, &config, &packages);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "value object `domain/valueobjects.Money` not found");
    }
}
