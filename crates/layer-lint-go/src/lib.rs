//! # layer-lint-go
//!
//! Tree-sitter powered Go support for layer-lint.
//!
//! - [`GoExtractor`] implements `LanguageExtractor` for `.go` files:
//!   package clause, imports, exported functions, struct fields and
//!   interface method signatures from a single parse.
//! - [`read_module_path`] resolves the project's module path from `go.mod`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod go;
mod module;

pub use go::GoExtractor;
pub use module::{parse_module_path, read_module_path, GO_MOD};
