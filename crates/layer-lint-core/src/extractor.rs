//! Language-agnostic extraction types and trait.
//!
//! `LanguageExtractor` is the parser/type-descriptor seam of layer-lint.
//! Implement it to teach the engine how to pull imports, declarations and
//! type descriptors out of a language's syntax tree.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// A single import statement extracted from source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportInfo {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (1-indexed).
    pub column: usize,
    /// Raw import path (e.g., `github.com/acme/shop/internal/domain/entities`).
    pub path: String,
    /// Local name the import is bound to, when renamed.
    pub alias: Option<String>,
}

impl ImportInfo {
    /// Name the imported package is referred to by in source: the alias, or
    /// the last path segment.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.alias
            .as_deref()
            .unwrap_or_else(|| self.path.rsplit('/').next().unwrap_or(&self.path))
    }
}

/// A top-level function declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDecl {
    /// Line number (1-indexed).
    pub line: usize,
    /// Function name.
    pub name: String,
    /// Whether the name is visible outside its package.
    pub exported: bool,
}

/// Kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// `type Foo struct { ... }`
    Struct,
    /// `type Foo interface { ... }`
    Interface,
    /// `type Foo = Bar`
    Alias,
    /// Any other named type (`type ID string`, function types, ...).
    Other,
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Alias => "alias",
            Self::Other => "named type",
        };
        f.write_str(s)
    }
}

/// A struct field descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDecl {
    /// Line number (1-indexed).
    pub line: usize,
    /// Field name (the type name for embedded fields).
    pub name: String,
    /// Declared type as written in source.
    pub type_text: String,
    /// Whether the field is visible outside its package.
    pub exported: bool,
    /// Whether the field is embedded (anonymous).
    pub embedded: bool,
}

/// A parameter descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamDecl {
    /// Parameter name, when declared.
    pub name: Option<String>,
    /// Declared type as written in source.
    pub type_text: String,
}

/// A method signature descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSig {
    /// Line number (1-indexed).
    pub line: usize,
    /// Method name.
    pub name: String,
    /// Parameters in declaration order.
    pub params: Vec<ParamDecl>,
    /// Result types in declaration order.
    pub results: Vec<String>,
}

/// A type declaration with its field and method descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDecl {
    /// Line number (1-indexed).
    pub line: usize,
    /// Type name.
    pub name: String,
    /// Kind of declaration.
    pub kind: TypeKind,
    /// Whether the name is visible outside its package.
    pub exported: bool,
    /// Struct fields (empty for non-structs).
    pub fields: Vec<FieldDecl>,
    /// Interface methods (empty for non-interfaces).
    pub methods: Vec<MethodSig>,
}

/// Result of analyzing a single source file.
#[derive(Debug, Clone, Default)]
pub struct FileAnalysis {
    /// Path relative to project root.
    pub file_path: PathBuf,
    /// Package/module name declared in the file, if any.
    pub package_name: Option<String>,
    /// All import statements found, in source order.
    pub imports: Vec<ImportInfo>,
    /// Top-level functions.
    pub functions: Vec<FunctionDecl>,
    /// Top-level type declarations.
    pub types: Vec<TypeDecl>,
}

/// Errors produced while extracting a file.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The grammar could not be loaded into the parser.
    #[error("failed to load grammar: {0}")]
    Language(String),

    /// The parser produced no tree.
    #[error("parser returned no syntax tree")]
    NoTree,

    /// The source contains syntax errors.
    #[error("syntax error at {line}:{column}")]
    Syntax {
        /// Line number (1-indexed).
        line: usize,
        /// Column (1-indexed).
        column: usize,
    },
}

/// Trait for language-specific extraction.
///
/// The extractor receives raw source text and returns a [`FileAnalysis`]
/// containing the language-agnostic intermediate representation.
pub trait LanguageExtractor: Send + Sync {
    /// Language identifier (e.g., `"go"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this extractor handles (e.g., `&[".go"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Exclusion patterns that apply to every project in this language
    /// (test files, generated code).
    fn default_excludes(&self) -> &'static [&'static str] {
        &[]
    }

    /// Whether the source is machine generated and should not be analyzed.
    fn is_generated(&self, _source: &str) -> bool {
        false
    }

    /// Module path declared by the project manifest under `root`, if any.
    fn module_path(&self, _root: &Path) -> Option<String> {
        None
    }

    /// Extract imports, declarations and type descriptors from source code.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be parsed.
    fn analyze(&self, source: &str) -> Result<FileAnalysis, ExtractError>;

    /// Whether this extractor handles `path`.
    fn handles(&self, path: &Path) -> bool {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        self.extensions().contains(&ext.as_str())
    }
}
