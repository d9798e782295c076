//! Configuration file resolution with global fallback.
//!
//! Resolution order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `{project}/layer-lint.toml` or `.layer-lint.toml`
//! 3. `$LAYER_LINT_CONFIG_DIR/config.toml`, else `~/.layer-lint/config.toml`
//! 4. Built-in defaults

use anyhow::{Context, Result};
use layer_lint_core::Config;
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config`.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Loaded from the global config directory.
    Global(PathBuf),
    /// Nothing found; built-in defaults apply.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Reads and validates the configuration this source points at.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(&self) -> Result<Config> {
        let Some(path) = self.path() else {
            tracing::debug!("No config file found, using defaults");
            return Ok(Config::default());
        };

        if matches!(self, Self::Global(_)) {
            tracing::info!("Using global config: {}", path.display());
        }
        let config = Config::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }
}

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["layer-lint.toml", ".layer-lint.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration file for a project directory.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_with(project_dir, explicit, global_config_dir().as_deref())
}

fn resolve_with(project_dir: &Path, explicit: Option<&Path>, global_dir: Option<&Path>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, |found| {
            tracing::debug!("Found global config: {}", found.display());
            ConfigSource::Global(found)
        })
}

/// Global config directory: `$LAYER_LINT_CONFIG_DIR`, else `~/.layer-lint/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("LAYER_LINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".layer-lint"))
}
