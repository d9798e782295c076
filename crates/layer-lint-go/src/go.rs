//! Go language extractor using Tree-sitter.

use std::path::{Path, PathBuf};
use tree_sitter::{Language, Node, Parser};

use layer_lint_core::{
    ExtractError, FieldDecl, FileAnalysis, FunctionDecl, ImportInfo, LanguageExtractor,
    MethodSig, ParamDecl, TypeDecl, TypeKind,
};

use crate::module;

/// Extracts package clauses, imports, functions and type descriptors from
/// Go source.
pub struct GoExtractor {
    language: Language,
}

impl GoExtractor {
    /// Creates a new Go extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_go::LANGUAGE.into(),
        }
    }

    fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
        node.utf8_text(src).unwrap_or("")
    }

    /// Source text with runs of whitespace collapsed.
    fn type_text(node: &Node<'_>, src: &[u8]) -> String {
        Self::text(node, src)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn line(node: &Node<'_>) -> usize {
        node.start_position().row + 1
    }

    fn extract_package(node: &Node<'_>, src: &[u8]) -> Option<String> {
        let mut cursor = node.walk();
        let name = node
            .children(&mut cursor)
            .find(|c| c.kind() == "package_identifier")
            .map(|c| Self::text(&c, src).to_owned());
        name
    }

    fn extract_imports(node: &Node<'_>, src: &[u8], out: &mut Vec<ImportInfo>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "import_spec" => out.extend(Self::extract_import_spec(&child, src)),
                "import_spec_list" => Self::extract_imports(&child, src, out),
                _ => {}
            }
        }
    }

    fn extract_import_spec(node: &Node<'_>, src: &[u8]) -> Option<ImportInfo> {
        let path = node.child_by_field_name("path")?;
        let path = Self::text(&path, src).trim_matches(|c| c == '"' || c == '`');
        if path.is_empty() {
            return None;
        }
        let alias = node
            .child_by_field_name("name")
            .map(|n| Self::text(&n, src).to_owned());
        Some(ImportInfo {
            line: Self::line(node),
            column: node.start_position().column + 1,
            path: path.to_owned(),
            alias,
        })
    }

    fn extract_function(node: &Node<'_>, src: &[u8]) -> Option<FunctionDecl> {
        let name = Self::text(&node.child_by_field_name("name")?, src).to_owned();
        Some(FunctionDecl {
            line: Self::line(node),
            exported: is_exported(&name),
            name,
        })
    }

    fn extract_type_declaration(node: &Node<'_>, src: &[u8], out: &mut Vec<TypeDecl>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            let is_alias = match child.kind() {
                "type_spec" => false,
                "type_alias" => true,
                _ => continue,
            };
            if let Some(decl) = Self::extract_type_spec(&child, src, is_alias) {
                out.push(decl);
            }
        }
    }

    fn extract_type_spec(node: &Node<'_>, src: &[u8], is_alias: bool) -> Option<TypeDecl> {
        let name = Self::text(&node.child_by_field_name("name")?, src).to_owned();
        let ty = node.child_by_field_name("type")?;

        let mut decl = TypeDecl {
            line: Self::line(node),
            exported: is_exported(&name),
            name,
            kind: TypeKind::Other,
            fields: Vec::new(),
            methods: Vec::new(),
        };

        if is_alias {
            decl.kind = TypeKind::Alias;
            return Some(decl);
        }

        match ty.kind() {
            "struct_type" => {
                decl.kind = TypeKind::Struct;
                decl.fields = Self::extract_fields(&ty, src);
            }
            "interface_type" => {
                decl.kind = TypeKind::Interface;
                decl.methods = Self::extract_methods(&ty, src);
            }
            _ => {}
        }
        Some(decl)
    }

    fn extract_fields(struct_type: &Node<'_>, src: &[u8]) -> Vec<FieldDecl> {
        let mut fields = Vec::new();
        let mut cursor = struct_type.walk();
        let Some(list) = struct_type
            .named_children(&mut cursor)
            .find(|c| c.kind() == "field_declaration_list")
        else {
            return fields;
        };

        let mut list_cursor = list.walk();
        for decl in list.named_children(&mut list_cursor) {
            if decl.kind() != "field_declaration" {
                continue;
            }
            let Some(ty) = decl.child_by_field_name("type") else {
                continue;
            };
            let line = Self::line(&decl);

            let mut name_cursor = decl.walk();
            let names: Vec<String> = decl
                .children_by_field_name("name", &mut name_cursor)
                .map(|n| Self::text(&n, src).to_owned())
                .collect();

            if names.is_empty() {
                let mut star_cursor = decl.walk();
                let pointer = decl.children(&mut star_cursor).any(|c| c.kind() == "*");
                let base = Self::type_text(&ty, src);
                let name = embedded_name(&base).to_owned();
                fields.push(FieldDecl {
                    line,
                    exported: is_exported(&name),
                    name,
                    type_text: if pointer { format!("*{base}") } else { base },
                    embedded: true,
                });
            } else {
                let type_text = Self::type_text(&ty, src);
                for name in names {
                    fields.push(FieldDecl {
                        line,
                        exported: is_exported(&name),
                        name,
                        type_text: type_text.clone(),
                        embedded: false,
                    });
                }
            }
        }
        fields
    }

    fn extract_methods(interface_type: &Node<'_>, src: &[u8]) -> Vec<MethodSig> {
        let mut methods = Vec::new();
        let mut cursor = interface_type.walk();
        for elem in interface_type.named_children(&mut cursor) {
            if !matches!(elem.kind(), "method_elem" | "method_spec") {
                continue;
            }
            let Some(name) = elem.child_by_field_name("name") else {
                continue;
            };
            let params = elem
                .child_by_field_name("parameters")
                .map(|p| Self::extract_params(&p, src))
                .unwrap_or_default();
            let results = match elem.child_by_field_name("result") {
                Some(r) if r.kind() == "parameter_list" => Self::extract_params(&r, src)
                    .into_iter()
                    .map(|p| p.type_text)
                    .collect(),
                Some(r) => vec![Self::type_text(&r, src)],
                None => Vec::new(),
            };
            methods.push(MethodSig {
                line: Self::line(&elem),
                name: Self::text(&name, src).to_owned(),
                params,
                results,
            });
        }
        methods
    }

    /// Flattens a parameter list: `(a, b int)` yields two parameters.
    fn extract_params(list: &Node<'_>, src: &[u8]) -> Vec<ParamDecl> {
        let mut params = Vec::new();
        let mut cursor = list.walk();
        for decl in list.named_children(&mut cursor) {
            let variadic = match decl.kind() {
                "parameter_declaration" => false,
                "variadic_parameter_declaration" => true,
                _ => continue,
            };
            let Some(ty) = decl.child_by_field_name("type") else {
                continue;
            };
            let ty = Self::type_text(&ty, src);
            let type_text = if variadic { format!("...{ty}") } else { ty };

            let mut name_cursor = decl.walk();
            let names: Vec<String> = decl
                .children_by_field_name("name", &mut name_cursor)
                .map(|n| Self::text(&n, src).to_owned())
                .collect();

            if names.is_empty() {
                params.push(ParamDecl {
                    name: None,
                    type_text,
                });
            } else {
                params.extend(names.into_iter().map(|name| ParamDecl {
                    name: Some(name),
                    type_text: type_text.clone(),
                }));
            }
        }
        params
    }
}

impl Default for GoExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for GoExtractor {
    fn language_id(&self) -> &'static str {
        "go"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".go"]
    }

    fn default_excludes(&self) -> &'static [&'static str] {
        &[
            "*_test.go",
            "*.pb.go",
            "*_gen.go",
            "*_templ.go",
            "*zz_generated*",
        ]
    }

    fn is_generated(&self, source: &str) -> bool {
        source
            .lines()
            .take_while(|l| !l.trim_start().starts_with("package "))
            .any(|l| {
                let l = l.trim_end();
                l.starts_with("// Code generated ") && l.ends_with("DO NOT EDIT.")
            })
    }

    fn module_path(&self, root: &Path) -> Option<String> {
        module::read_module_path(&root.join(module::GO_MOD))
    }

    fn analyze(&self, source: &str) -> Result<FileAnalysis, ExtractError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ExtractError::Language(e.to_string()))?;

        let src = source.as_bytes();
        let tree = parser.parse(src, None).ok_or(ExtractError::NoTree)?;
        let root = tree.root_node();

        if root.has_error() {
            let at = first_error(root).unwrap_or(root).start_position();
            return Err(ExtractError::Syntax {
                line: at.row + 1,
                column: at.column + 1,
            });
        }

        let mut result = FileAnalysis {
            file_path: PathBuf::new(),
            ..FileAnalysis::default()
        };

        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            match node.kind() {
                "package_clause" => {
                    result.package_name = Self::extract_package(&node, src);
                }
                "import_declaration" => Self::extract_imports(&node, src, &mut result.imports),
                "function_declaration" => {
                    result.functions.extend(Self::extract_function(&node, src));
                }
                "type_declaration" => {
                    Self::extract_type_declaration(&node, src, &mut result.types);
                }
                _ => {}
            }
        }

        Ok(result)
    }
}

/// Go visibility: an identifier is exported when it starts with an upper-case letter.
fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Field name of an embedded type: `*pkg.Base[T]` embeds as `Base`.
fn embedded_name(type_text: &str) -> &str {
    let base = type_text.trim_start_matches('*');
    let base = base.split('[').next().unwrap_or(base);
    base.rsplit('.').next().unwrap_or(base)
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error).or(Some(node))
}
