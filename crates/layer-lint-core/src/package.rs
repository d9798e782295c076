//! Package extraction: turns a [`FileAnalysis`] into a classified [`PackageInfo`].

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Component, Path};

use crate::extractor::{FileAnalysis, ImportInfo, TypeDecl};
use crate::layer::LayerClassifier;

/// Directory key used for files at the project root.
pub const ROOT_PACKAGE: &str = ".";

/// Structured metadata for one analyzed file.
///
/// Built once per file during extraction and never modified afterwards.
/// The layer is computed at construction time.
#[derive(Debug, Clone, Serialize)]
pub struct PackageInfo {
    /// File path relative to the project root, `/`-separated.
    pub path: String,
    /// Directory of the file relative to the project root; the logical package.
    pub package_dir: String,
    /// Declared package name.
    pub package_name: Option<String>,
    /// Layer assigned by the classifier.
    pub layer: String,
    /// Raw imports, in source order.
    pub imports: Vec<ImportInfo>,
    /// Exported top-level function names.
    pub exported_functions: BTreeSet<String>,
    /// Exported type names.
    pub exported_types: BTreeSet<String>,
    /// Type descriptors.
    pub types: Vec<TypeDecl>,
}

impl PackageInfo {
    /// Extracts package metadata from a file analysis.
    #[must_use]
    pub fn extract(analysis: FileAnalysis, classifier: &LayerClassifier) -> Self {
        let path = slash_path(&analysis.file_path);
        let package_dir = analysis
            .file_path
            .parent()
            .map(slash_path)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| ROOT_PACKAGE.to_string());
        let layer = classifier.classify(&path).to_string();

        let exported_functions = analysis
            .functions
            .iter()
            .filter(|f| f.exported)
            .map(|f| f.name.clone())
            .collect();
        let exported_types = analysis
            .types
            .iter()
            .filter(|t| t.exported)
            .map(|t| t.name.clone())
            .collect();

        Self {
            path,
            package_dir,
            package_name: analysis.package_name,
            layer,
            imports: analysis.imports,
            exported_functions,
            exported_types,
            types: analysis.types,
        }
    }

    /// Import paths in source order.
    pub fn import_paths(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(|i| i.path.as_str())
    }

    /// Finds a type declared in this file.
    #[must_use]
    pub fn find_type(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.name == name)
    }
}

/// Renders a relative path with `/` separators regardless of platform.
fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
