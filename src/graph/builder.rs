//! Import-graph construction.
//!
//! Groups analyzed units into one node per distinct containing directory.
//! Edges come from internal imports only — third-party and standard-library
//! imports never create edges. Test-only and generated units contribute
//! neither nodes nor edges.

use crate::config::ScoringProfile;
use crate::models::AnalyzedUnit;
use crate::scoring::exemptions::UnitContext;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// One graph node: a directory of analyzed units
#[derive(Debug, Clone, Default)]
pub struct PackageNode {
    /// Outgoing internal imports (target directories)
    pub imports: BTreeSet<String>,
    /// Incoming internal imports (source directories)
    pub imported_by: BTreeSet<String>,
    /// Interface-like declarations across the node's units
    pub interface_count: usize,
    /// Concrete type declarations across the node's units
    pub concrete_count: usize,
    /// A unit imports a low-level I/O package
    pub has_low_level_io: bool,
    /// A function takes an I/O-shaped parameter
    pub has_io_params: bool,
    /// A unit declares an executable entry point
    pub has_entry_point: bool,
}

/// Directed import graph keyed by directory.
///
/// `BTreeMap` keys iterate in sorted order, so node enumeration is
/// deterministic by construction.
#[derive(Debug, Clone, Default)]
pub struct ImportGraph {
    pub nodes: BTreeMap<String, PackageNode>,
}

impl ImportGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Efferent coupling: outgoing internal edges
    pub fn efferent(&self, dir: &str) -> usize {
        self.nodes.get(dir).map_or(0, |n| n.imports.len())
    }

    /// Afferent coupling: incoming internal edges
    pub fn afferent(&self, dir: &str) -> usize {
        self.nodes.get(dir).map_or(0, |n| n.imported_by.len())
    }
}

/// Build the import graph from the unit snapshot.
///
/// `module_root` is the project's module identifier; internal import paths
/// are resolved to directories by package identifier, with a module-root
/// prefix strip as fallback.
pub fn build_import_graph(
    units: &[AnalyzedUnit],
    contexts: &[UnitContext],
    profile: &ScoringProfile,
    module_root: &str,
) -> ImportGraph {
    let mut graph = ImportGraph::default();

    // Units that shape the graph: not generated, not test-only.
    let graphed: Vec<&AnalyzedUnit> = units
        .iter()
        .zip(contexts)
        .filter(|(_, ctx)| ctx.is_scored() && !ctx.is_test)
        .map(|(u, _)| u)
        .collect();

    // Package identifier → containing directory, for import resolution.
    let mut package_dirs: BTreeMap<String, String> = BTreeMap::new();
    for unit in &graphed {
        if !unit.package.is_empty() {
            package_dirs.insert(unit.package.clone(), unit.directory());
        }
    }

    for unit in &graphed {
        let dir = unit.directory();
        let node = graph.nodes.entry(dir.clone()).or_default();

        node.interface_count += unit.interfaces.len();
        node.concrete_count += unit.concrete_types.len();
        node.has_entry_point |= unit.has_entry_point()
            || dir_has_entry_segment(&dir, &profile.vocabulary.entry_dirs);

        if unit.external_imports.iter().any(|import| {
            profile
                .vocabulary
                .io_import_hints
                .iter()
                .any(|hint| import_matches_hint(import, hint))
        }) {
            node.has_low_level_io = true;
        }

        if unit.functions.iter().any(|f| {
            f.parameters.iter().any(|param| {
                profile
                    .vocabulary
                    .io_param_hints
                    .iter()
                    .any(|hint| param.contains(hint.as_str()))
            })
        }) {
            node.has_io_params = true;
        }
    }

    // Second pass: edges, once every node exists.
    for unit in &graphed {
        let from = unit.directory();
        for import in &unit.internal_imports {
            if let Some(to) = resolve_import(import, &package_dirs, module_root) {
                if !graph.nodes.contains_key(&to) {
                    continue;
                }
                if let Some(source) = graph.nodes.get_mut(&from) {
                    source.imports.insert(to.clone());
                }
                if let Some(target) = graph.nodes.get_mut(&to) {
                    target.imported_by.insert(from.clone());
                }
            }
        }
    }

    let edge_count: usize = graph.nodes.values().map(|n| n.imports.len()).sum();
    debug!(
        "import graph: {} nodes, {} edges from {} units",
        graph.len(),
        edge_count,
        graphed.len()
    );

    graph
}

/// Resolve an internal import path to a node directory.
///
/// Tries the package map first, then falls back to stripping the module
/// root and treating the remainder as a directory path.
fn resolve_import(
    import: &str,
    package_dirs: &BTreeMap<String, String>,
    module_root: &str,
) -> Option<String> {
    if let Some(dir) = package_dirs.get(import) {
        return Some(dir.clone());
    }
    if !module_root.is_empty() {
        if let Some(rest) = import.strip_prefix(module_root) {
            let rest = rest.trim_start_matches('/');
            if rest.is_empty() {
                return Some(".".to_string());
            }
            return Some(rest.to_string());
        }
    }
    None
}

fn dir_has_entry_segment(dir: &str, entry_dirs: &[String]) -> bool {
    dir.split('/').any(|segment| {
        entry_dirs
            .iter()
            .any(|entry| entry.as_str() == segment)
    })
}

/// An external import matches an I/O hint either exactly or as a path
/// prefix; bare hints like "os" must not match "oslo".
fn import_matches_hint(import: &str, hint: &str) -> bool {
    if hint.ends_with('/') {
        return import.starts_with(hint);
    }
    import == hint || import.starts_with(&format!("{hint}/"))
}
