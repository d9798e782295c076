//! `go.mod` module path discovery.

use std::path::Path;
use tracing::debug;

/// Name of the Go module manifest.
pub const GO_MOD: &str = "go.mod";

/// Reads the module path declared in a `go.mod` file.
///
/// Returns `None` when the file is missing or declares no module.
#[must_use]
pub fn read_module_path(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_module_path(&content),
        Err(e) => {
            debug!("No module manifest at {}: {}", path.display(), e);
            None
        }
    }
}

/// Extracts the `module` directive from `go.mod` content.
#[must_use]
pub fn parse_module_path(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or(line).trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let module = rest.trim().trim_matches('"');
        (!module.is_empty()).then(|| module.to_string())
    })
}
