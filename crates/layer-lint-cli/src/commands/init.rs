//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# layer-lint configuration

# Layers never checked for dependency direction.
exempt_layers = ["main"]

[analyzer]
# Root directory to analyze, relative to the checked path
# root = "."

# Glob patterns or path substrings to exclude, on top of the built-in
# exclusions (*_test.go, generated code, vendor/, testdata/)
exclude = [
    "**/mocks/**",
]

# Module path; read from go.mod when omitted
# module = "github.com/acme/shop"

# Respect .gitignore files
respect_gitignore = true

# Parse files on N worker threads
# parallelism = 4

# Report only the first violation of each rule
fail_fast = false

# Ordered classification rules, first match wins
[[layers]]
pattern = "domain/entities"
layer = "domain/entities"

[[layers]]
pattern = "domain/valueobjects"
layer = "domain/valueobjects"

[[layers]]
pattern = "domain/repositories"
layer = "domain/repositories"

[[layers]]
pattern = "domain/services"
layer = "domain/services"

[[layers]]
pattern = "domain/shared"
layer = "domain/shared"

[[layers]]
pattern = "application"
layer = "application"

[[layers]]
pattern = "infrastructure"
layer = "infrastructure"

[[layers]]
pattern = "interfaces"
layer = "interfaces"

[[layers]]
pattern = "cmd"
layer = "main"

# Layers each layer may import; a layer may always import itself
[dependencies]
"domain/shared" = []
"domain/valueobjects" = ["domain/shared"]
"domain/entities" = ["domain/valueobjects", "domain/shared"]
"domain/repositories" = ["domain/entities", "domain/valueobjects", "domain/shared"]
"domain/services" = ["domain/entities", "domain/valueobjects", "domain/repositories", "domain/shared"]
application = ["domain/entities", "domain/valueobjects", "domain/repositories", "domain/services", "domain/shared"]
infrastructure = ["domain/entities", "domain/valueobjects", "domain/repositories", "domain/shared", "application"]
interfaces = ["domain/entities", "domain/valueobjects", "domain/shared", "application"]

[imports]
# External packages any layer, including the domain, may import
allowed_external = ["github.com/google/uuid"]

[isolation]
domain_prefix = "domain"

[immutability]
# value_objects = ["domain/valueobjects.Email"]

[contracts]
# repository_interfaces = ["domain/repositories.UserRepository"]
context_type = "context.Context"
error_type = "error"

[purity]
layer = "domain/services"
forbidden_imports = ["infrastructure", "persistence", "database/sql", "gorm.io"]
# service_types = ["domain/services.PricingService"]

[cycles]
# max_reported = 10

# Each rule can be disabled or have its severity overridden
# [rules.import-cycle]
# enabled = true
# severity = "warning"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("layer-lint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created layer-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit the [[layers]] patterns to match your package layout");
    println!("  2. List value objects, repositories and services to check");
    println!("  3. Run: layer-lint check");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use layer_lint_core::Config;

    #[test]
    fn template_parses_and_validates() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        config.validate().unwrap();
        assert_eq!(config.layer_patterns.len(), 9);
        assert_eq!(config.allowed_dependencies.len(), 8);
        assert_eq!(config.imports.allowed_external, vec!["github.com/google/uuid"]);
    }

    #[test]
    fn template_matches_builtin_layers() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        let defaults = Config::default();
        assert_eq!(config.layer_patterns, defaults.layer_patterns);
        assert_eq!(config.allowed_dependencies, defaults.allowed_dependencies);
    }
}
