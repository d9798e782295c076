//! Dependency graph over in-project packages, with cycle detection.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt::Write;

use crate::config::Config;
use crate::layer::has_path_prefix;
use crate::package::{PackageInfo, ROOT_PACKAGE};

/// Classifies import strings as standard library, allow-listed external,
/// test-only, or in-project.
#[derive(Debug, Clone)]
pub struct ImportResolver {
    module: Option<String>,
    standard_library: Vec<String>,
    allowed_external: Vec<String>,
    test_only: Vec<String>,
}

impl ImportResolver {
    /// Creates a resolver from config and the project's module path.
    #[must_use]
    pub fn new(config: &Config, module: Option<String>) -> Self {
        Self {
            module: module.map(|m| m.trim_end_matches('/').to_string()),
            standard_library: config.imports.standard_library.clone(),
            allowed_external: config.imports.allowed_external.clone(),
            test_only: config.imports.test_only.clone(),
        }
    }

    /// Module path used to recognise in-project imports.
    #[must_use]
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    /// Whether the import belongs to the standard library.
    #[must_use]
    pub fn is_standard_library(&self, import: &str) -> bool {
        self.standard_library
            .iter()
            .any(|p| has_path_prefix(import, p))
    }

    /// Whether the import is an explicitly allowed external package.
    #[must_use]
    pub fn is_allowed_external(&self, import: &str) -> bool {
        self.allowed_external
            .iter()
            .any(|p| has_path_prefix(import, p))
    }

    /// Whether the import is only used by tests.
    #[must_use]
    pub fn is_test_only(&self, import: &str) -> bool {
        self.test_only.iter().any(|p| has_path_prefix(import, p))
    }

    /// Resolves an import to the key of an analyzed package, if it is one.
    ///
    /// With a module path, `module/rel` resolves to `rel`. When the analyzed
    /// root sits below the module root, `rel` carries that offset and is
    /// matched by suffix instead. Without a module path, the longest package
    /// directory the import ends with is used.
    #[must_use]
    pub fn resolve_internal<'p>(
        &self,
        import: &str,
        packages: &'p BTreeSet<String>,
    ) -> Option<&'p str> {
        if self.is_standard_library(import) || self.is_allowed_external(import) {
            return None;
        }

        if self.module.is_none() {
            return longest_suffix(import, packages);
        }
        let rel = self.module_relative(import)?;
        packages
            .get(rel)
            .map(String::as_str)
            .or_else(|| longest_suffix(rel, packages))
    }

    /// Strips the module path from an import: `module/x/y` gives `x/y` and
    /// the module itself gives `.`. `None` for imports outside the module.
    #[must_use]
    pub fn module_relative<'i>(&self, import: &'i str) -> Option<&'i str> {
        let module = self.module.as_deref()?;
        if import == module {
            return Some(ROOT_PACKAGE);
        }
        import.strip_prefix(module)?.strip_prefix('/')
    }
}

fn longest_suffix<'p>(import: &str, packages: &'p BTreeSet<String>) -> Option<&'p str> {
    packages
        .iter()
        .filter(|dir| dir.as_str() != ROOT_PACKAGE)
        .filter(|dir| import == dir.as_str() || import.ends_with(&format!("/{dir}")))
        .max_by_key(|dir| dir.len())
        .map(String::as_str)
}

/// Where an edge was introduced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSite {
    /// File containing the import.
    pub file: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (1-indexed).
    pub column: usize,
    /// The import string.
    pub import: String,
}

/// Directed graph of in-project package dependencies.
///
/// Nodes are package directories; an edge `a -> b` means some file in `a`
/// imports package `b`. Built once per run and never mutated.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
    sites: BTreeMap<(String, String), ImportSite>,
}

impl DependencyGraph {
    /// Builds the graph from extracted packages.
    #[must_use]
    pub fn build(packages: &[PackageInfo], resolver: &ImportResolver) -> Self {
        let keys: BTreeSet<String> = packages.iter().map(|p| p.package_dir.clone()).collect();
        let mut graph = Self {
            edges: keys.iter().map(|k| (k.clone(), BTreeSet::new())).collect(),
            sites: BTreeMap::new(),
        };

        for pkg in packages {
            for imp in &pkg.imports {
                let Some(target) = resolver.resolve_internal(&imp.path, &keys) else {
                    continue;
                };
                if target == pkg.package_dir {
                    continue;
                }
                graph.insert(
                    &pkg.package_dir,
                    target,
                    ImportSite {
                        file: pkg.path.clone(),
                        line: imp.line,
                        column: imp.column,
                        import: imp.path.clone(),
                    },
                );
            }
        }

        graph
    }

    /// Builds a graph directly from edges; the site of each edge is empty.
    pub fn from_edges<I, A, B>(edges: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        let mut graph = Self::default();
        for (from, to) in edges {
            let (from, to) = (from.into(), to.into());
            let site = ImportSite {
                file: from.clone(),
                line: 0,
                column: 0,
                import: to.clone(),
            };
            graph.edges.entry(to.clone()).or_default();
            graph.insert(&from, &to, site);
        }
        graph
    }

    fn insert(&mut self, from: &str, to: &str, site: ImportSite) {
        self.edges
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
        self.sites
            .entry((from.to_string(), to.to_string()))
            .or_insert(site);
    }

    /// All nodes, sorted.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    /// All edges, sorted.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges
            .iter()
            .flat_map(|(from, tos)| tos.iter().map(move |to| (from.as_str(), to.as_str())))
    }

    /// Direct dependencies of a node, sorted.
    pub fn dependencies<'g>(&'g self, node: &str) -> impl Iterator<Item = &'g str> {
        self.edges
            .get(node)
            .into_iter()
            .flat_map(|tos| tos.iter().map(String::as_str))
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    /// First import that introduced the edge `from -> to`.
    #[must_use]
    pub fn site(&self, from: &str, to: &str) -> Option<&ImportSite> {
        self.sites.get(&(from.to_string(), to.to_string()))
    }

    /// Finds import cycles with a depth-first search.
    ///
    /// Nodes are visited in sorted order. Every back edge to a node on the
    /// recursion stack yields the path slice from that node, closed by the
    /// node itself (`[a, b, c, a]`). Rotations of an already reported cycle
    /// are dropped. `limit` caps the number of cycles returned.
    #[must_use]
    pub fn find_cycles(&self, limit: Option<usize>) -> Vec<Vec<String>> {
        let mut search = CycleSearch {
            graph: self,
            visited: HashSet::new(),
            on_stack: HashSet::new(),
            path: Vec::new(),
            seen: HashSet::new(),
            cycles: Vec::new(),
            limit: limit.unwrap_or(usize::MAX),
        };

        for node in self.nodes() {
            if search.is_full() {
                break;
            }
            if !search.visited.contains(node) {
                search.visit(node);
            }
        }

        search.cycles
    }

    /// Renders the graph in Graphviz DOT format.
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph dependencies {\n");
        for node in self.nodes() {
            let _ = writeln!(out, "    \"{node}\";");
        }
        for (from, to) in self.edges() {
            let _ = writeln!(out, "    \"{from}\" -> \"{to}\";");
        }
        out.push_str("}\n");
        out
    }
}

struct CycleSearch<'g> {
    graph: &'g DependencyGraph,
    visited: HashSet<&'g str>,
    on_stack: HashSet<&'g str>,
    path: Vec<&'g str>,
    seen: HashSet<Vec<&'g str>>,
    cycles: Vec<Vec<String>>,
    limit: usize,
}

impl<'g> CycleSearch<'g> {
    fn is_full(&self) -> bool {
        self.cycles.len() >= self.limit
    }

    fn visit(&mut self, node: &'g str) {
        self.visited.insert(node);
        self.on_stack.insert(node);
        self.path.push(node);

        let graph = self.graph;
        for next in graph.dependencies(node) {
            if self.is_full() {
                break;
            }
            if self.on_stack.contains(next) {
                self.record(next);
            } else if !self.visited.contains(next) {
                self.visit(next);
            }
        }

        self.path.pop();
        self.on_stack.remove(node);
    }

    fn record(&mut self, repeated: &'g str) {
        let Some(start) = self.path.iter().position(|n| *n == repeated) else {
            return;
        };
        let members = &self.path[start..];
        if self.seen.insert(canonical(members)) {
            let mut cycle: Vec<String> = members.iter().map(|n| (*n).to_string()).collect();
            cycle.push(repeated.to_string());
            self.cycles.push(cycle);
        }
    }
}

/// Rotation of a cycle starting at its smallest member.
fn canonical<'g>(members: &[&'g str]) -> Vec<&'g str> {
    let min = members
        .iter()
        .enumerate()
        .min_by_key(|(_, n)| **n)
        .map_or(0, |(i, _)| i);
    members[min..].iter().chain(&members[..min]).copied().collect()
}
