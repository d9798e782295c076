//! End-to-end analysis of the `fixtures/shop` Go module.

use std::path::{Path, PathBuf};

use layer_lint_core::{Analyzer, Config, LintResult, ViolationKind};
use layer_lint_go::GoExtractor;

fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/shop")
}

fn analyzer() -> Analyzer {
    let root = fixture_root();
    let config = Config::from_file(&root.join("layer-lint.toml")).expect("fixture config");
    Analyzer::builder()
        .root(root)
        .config(config)
        .extractor(GoExtractor::new())
        .build()
        .expect("analyzer builds")
}

fn analyze() -> LintResult {
    analyzer().analyze().expect("analysis runs")
}

#[test]
fn module_path_comes_from_go_mod() {
    let model = analyzer().load().unwrap();
    assert_eq!(model.resolver.module(), Some("github.com/acme/shop"));
}

#[test]
fn skips_tests_generated_and_broken_files() {
    let result = analyze();
    assert_eq!(result.files_checked, 12);
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].path, PathBuf::from("internal/broken/broken.go"));
}

#[test]
fn domain_importing_infrastructure_fails_isolation() {
    let result = analyze();
    let isolation = result.by_kind(ViolationKind::Isolation);
    let offending: Vec<(&str, &str)> = isolation
        .iter()
        .map(|v| (v.subject.as_str(), v.detail.as_str()))
        .collect();
    assert_eq!(
        offending,
        vec![
            (
                "internal/domain/entities/user.go",
                "github.com/acme/shop/internal/infrastructure/postgres"
            ),
            (
                "internal/domain/services/pricing.go",
                "github.com/acme/shop/internal/infrastructure/persistence"
            ),
        ]
    );
    assert_eq!(isolation[0].location.line, 7);
}

#[test]
fn direction_violations_cite_allowed_sets() {
    let result = analyze();
    let direction = result.by_kind(ViolationKind::Direction);
    assert_eq!(direction.len(), 2);
    assert_eq!(
        direction[0].message,
        "domain/entities -> infrastructure dependency not allowed (allowed: [domain/shared, domain/valueobjects])"
    );
}

#[test]
fn cycle_is_reconstructed_in_order() {
    let result = analyze();
    let cycles = result.by_kind(ViolationKind::Cycle);
    assert_eq!(cycles.len(), 1);
    assert_eq!(
        cycles[0].detail,
        "internal/cycle/a -> internal/cycle/b -> internal/cycle/c -> internal/cycle/a"
    );
    assert_eq!(cycles[0].location.file, PathBuf::from("internal/cycle/a/a.go"));
}

#[test]
fn value_object_exported_field_is_named() {
    let result = analyze();
    let immutability = result.by_kind(ViolationKind::Immutability);
    assert_eq!(immutability.len(), 1);
    assert_eq!(immutability[0].detail, "Address");
    assert_eq!(immutability[0].location.line, 7);
}

#[test]
fn repository_methods_without_context_are_named() {
    let result = analyze();
    let contracts = result.by_kind(ViolationKind::InterfaceContract);
    let details: Vec<&str> = contracts.iter().map(|v| v.detail.as_str()).collect();
    assert_eq!(details, vec!["Save", "Ping"]);
    assert!(contracts[0].message.contains("context.Context"));
    assert!(contracts[1].message.ends_with("found `nothing`"));
}

#[test]
fn service_purity_names_imports_and_fields() {
    let result = analyze();
    let details: Vec<&str> = result
        .by_kind(ViolationKind::Purity)
        .iter()
        .map(|v| v.detail.as_str())
        .collect();
    assert_eq!(
        details,
        vec![
            "database/sql",
            "github.com/acme/shop/internal/infrastructure/persistence",
            "db",
            "store",
        ]
    );
}

#[test]
fn repeated_runs_are_identical() {
    let analyzer = analyzer();
    let first = analyzer.analyze().unwrap();
    let second = analyzer.analyze().unwrap();
    assert_eq!(first.violations, second.violations);
    assert_eq!(first.skipped, second.skipped);
}

#[test]
fn parallel_parsing_matches_sequential() {
    let root = fixture_root();
    let mut config = Config::from_file(&root.join("layer-lint.toml")).unwrap();
    config.analyzer.parallelism = Some(4);
    let parallel = Analyzer::builder()
        .root(root)
        .config(config)
        .extractor(GoExtractor::new())
        .build()
        .unwrap()
        .analyze()
        .unwrap();

    assert_eq!(parallel.violations, analyze().violations);
}

#[test]
fn subdirectory_root_resolves_module_imports() {
    let root = fixture_root();
    let mut config = Config::from_file(&root.join("layer-lint.toml")).unwrap();
    config.analyzer.module = Some("github.com/acme/shop".to_string());
    let result = Analyzer::builder()
        .root(root.join("internal"))
        .config(config)
        .extractor(GoExtractor::new())
        .build()
        .unwrap()
        .analyze()
        .unwrap();

    let cycles = result.by_kind(ViolationKind::Cycle);
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].detail, "cycle/a -> cycle/b -> cycle/c -> cycle/a");
}
