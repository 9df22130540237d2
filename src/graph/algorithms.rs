//! Graph algorithms over the import graph.
//!
//! Cycle detection reports every discovered simple cycle as an ordered
//! path, including length-1 self-imports, with independent cycles in
//! disjoint components reported separately. Stability metrics follow
//! Robert C. Martin's component-coupling model: instability I = Ce/(Ce+Ca),
//! abstractness A = interfaces/(interfaces+concrete), distance from the
//! main sequence D = |A + I - 1|.
//!
//! Wherever a result depends on enumeration order (node iteration for the
//! coupling median, DFS start order), keys are taken from the sorted node
//! map so output is reproducible across runs.

use super::builder::ImportGraph;
use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Find every simple cycle reachable through DFS back edges.
///
/// Each cycle is an ordered directory path, normalized to start at its
/// lexicographically smallest member so duplicates discovered from
/// different entry points collapse to one report.
pub fn detect_cycles(graph: &ImportGraph) -> Vec<Vec<String>> {
    let mut cycles: Vec<Vec<String>> = Vec::new();
    let mut seen: BTreeSet<Vec<String>> = BTreeSet::new();
    let mut finished: BTreeSet<&str> = BTreeSet::new();

    for start in graph.nodes.keys() {
        if finished.contains(start.as_str()) {
            continue;
        }
        let mut path: Vec<&str> = Vec::new();
        let mut on_path: BTreeSet<&str> = BTreeSet::new();
        dfs_cycles(
            graph,
            start,
            &mut path,
            &mut on_path,
            &mut finished,
            &mut |cycle: Vec<String>| {
                let normalized = normalize_cycle(&cycle);
                if seen.insert(normalized.clone()) {
                    cycles.push(normalized);
                }
            },
        );
    }

    debug!("cycle detection: {} cycles", cycles.len());
    cycles
}

fn dfs_cycles<'a>(
    graph: &'a ImportGraph,
    node: &'a str,
    path: &mut Vec<&'a str>,
    on_path: &mut BTreeSet<&'a str>,
    finished: &mut BTreeSet<&'a str>,
    emit: &mut impl FnMut(Vec<String>),
) {
    path.push(node);
    on_path.insert(node);

    if let Some(package) = graph.nodes.get(node) {
        for target in &package.imports {
            let target = target.as_str();
            if on_path.contains(target) {
                // Back edge: the cycle is the path suffix from the target.
                if let Some(pos) = path.iter().position(|n| *n == target) {
                    emit(path[pos..].iter().map(|s| s.to_string()).collect());
                }
            } else if !finished.contains(target) {
                if let Some((resolved, _)) = graph.nodes.get_key_value(target) {
                    dfs_cycles(graph, resolved, path, on_path, finished, emit);
                }
            }
        }
    }

    on_path.remove(node);
    path.pop();
    finished.insert(node);
}

/// Rotate a cycle to start with its lexicographically smallest element.
fn normalize_cycle(cycle: &[String]) -> Vec<String> {
    if cycle.is_empty() {
        return Vec::new();
    }
    let min_idx = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| *v)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let mut normalized = Vec::with_capacity(cycle.len());
    normalized.extend_from_slice(&cycle[min_idx..]);
    normalized.extend_from_slice(&cycle[..min_idx]);
    normalized
}

/// Nodes that belong to any cycle: members of a Tarjan SCC larger than one
/// node, plus self-importing nodes.
pub fn cycle_membership(graph: &ImportGraph) -> BTreeSet<String> {
    let keys: Vec<&String> = graph.nodes.keys().collect();
    let index_of: BTreeMap<&str, usize> = keys
        .iter()
        .enumerate()
        .map(|(i, k)| (k.as_str(), i))
        .collect();

    let mut digraph: DiGraph<(), ()> = DiGraph::new();
    let node_indices: Vec<_> = keys.iter().map(|_| digraph.add_node(())).collect();
    for (dir, node) in &graph.nodes {
        let from = index_of[dir.as_str()];
        for target in &node.imports {
            if let Some(&to) = index_of.get(target.as_str()) {
                digraph.add_edge(node_indices[from], node_indices[to], ());
            }
        }
    }

    let mut members: BTreeSet<String> = BTreeSet::new();
    for scc in tarjan_scc(&digraph) {
        if scc.len() > 1 {
            for idx in scc {
                members.insert(keys[idx.index()].clone());
            }
        }
    }
    for (dir, node) in &graph.nodes {
        if node.imports.contains(dir) {
            members.insert(dir.clone());
        }
    }
    members
}

/// Instability I = Ce/(Ce+Ca); isolated nodes are 0.
pub fn instability(graph: &ImportGraph, dir: &str) -> f64 {
    let ce = graph.efferent(dir) as f64;
    let ca = graph.afferent(dir) as f64;
    if ce + ca == 0.0 {
        return 0.0;
    }
    ce / (ce + ca)
}

/// Abstractness A = interfaces/(interfaces+concrete); type-less nodes are 0.
pub fn abstractness(graph: &ImportGraph, dir: &str) -> f64 {
    let node = match graph.nodes.get(dir) {
        Some(n) => n,
        None => return 0.0,
    };
    let total = (node.interface_count + node.concrete_count) as f64;
    if total == 0.0 {
        return 0.0;
    }
    node.interface_count as f64 / total
}

/// Distance from the main sequence D = |A + I - 1|.
pub fn distance(graph: &ImportGraph, dir: &str) -> f64 {
    (abstractness(graph, dir) + instability(graph, dir) - 1.0).abs()
}

/// Average distance over nodes that declare at least one type.
///
/// Type-less nodes are excluded from the average, not treated as D=0.
/// Returns `None` when no node declares a type.
pub fn average_distance(graph: &ImportGraph) -> Option<f64> {
    let typed: Vec<f64> = graph
        .nodes
        .iter()
        .filter(|(_, n)| n.interface_count + n.concrete_count > 0)
        .map(|(dir, _)| distance(graph, dir))
        .collect();
    if typed.is_empty() {
        return None;
    }
    Some(typed.iter().sum::<f64>() / typed.len() as f64)
}

/// Nodes whose efferent coupling exceeds `median × multiplier`.
///
/// A median below 1 means the graph has no reliable coupling baseline and
/// no outliers are reported — sparse graphs would otherwise flag every
/// connected node. Returns (directory, Ce) pairs in sorted key order.
pub fn coupling_outliers(graph: &ImportGraph, multiplier: f64) -> Vec<(String, usize)> {
    let median = match median_efferent(graph) {
        Some(m) if m >= 1.0 => m,
        _ => return Vec::new(),
    };

    graph
        .nodes
        .keys()
        .filter_map(|dir| {
            let ce = graph.efferent(dir);
            if ce as f64 > median * multiplier {
                Some((dir.clone(), ce))
            } else {
                None
            }
        })
        .collect()
}

/// Median efferent coupling across all nodes, taken over sorted node keys.
pub fn median_efferent(graph: &ImportGraph) -> Option<f64> {
    if graph.is_empty() {
        return None;
    }
    // Node keys are already sorted; sorting the values themselves keeps the
    // median independent of any map iteration order.
    let mut values: Vec<usize> = graph.nodes.keys().map(|dir| graph.efferent(dir)).collect();
    values.sort_unstable();

    let n = values.len();
    let median = if n % 2 == 1 {
        values[n / 2] as f64
    } else {
        (values[n / 2 - 1] + values[n / 2]) as f64 / 2.0
    };
    Some(median)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::PackageNode;

    /// Build a graph directly from (node, imports) pairs.
    fn graph_of(edges: &[(&str, &[&str])]) -> ImportGraph {
        let mut graph = ImportGraph::default();
        for (dir, _) in edges {
            graph.nodes.insert(dir.to_string(), PackageNode::default());
        }
        for (dir, targets) in edges {
            for target in *targets {
                if graph.nodes.contains_key(*target) {
                    graph
                        .nodes
                        .get_mut(*dir)
                        .unwrap()
                        .imports
                        .insert(target.to_string());
                    graph
                        .nodes
                        .get_mut(*target)
                        .unwrap()
                        .imported_by
                        .insert(dir.to_string());
                }
            }
        }
        graph
    }

    #[test]
    fn test_two_node_cycle() {
        let graph = graph_of(&[("a", &["b"]), ("b", &["a"])]);
        let cycles = detect_cycles(&graph);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0], vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_three_node_cycle() {
        let graph = graph_of(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]);
        let cycles = detect_cycles(&graph);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 3);
        assert_eq!(cycles[0][0], "a");
    }

    #[test]
    fn test_self_import_is_length_one_cycle() {
        let graph = graph_of(&[("a", &["a"])]);
        let cycles = detect_cycles(&graph);
        assert_eq!(cycles, vec![vec!["a".to_string()]]);
    }

    #[test]
    fn test_disjoint_cycles_reported_separately() {
        let graph = graph_of(&[
            ("a", &["b"]),
            ("b", &["a"]),
            ("x", &["y"]),
            ("y", &["x"]),
        ]);
        let cycles = detect_cycles(&graph);
        assert_eq!(cycles.len(), 2);
    }

    #[test]
    fn test_acyclic_graph_has_no_cycles() {
        let graph = graph_of(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
        assert!(detect_cycles(&graph).is_empty());
    }

    #[test]
    fn test_cycle_membership_includes_self_loops() {
        let graph = graph_of(&[("a", &["b"]), ("b", &["a"]), ("c", &["c"]), ("d", &[])]);
        let members = cycle_membership(&graph);
        assert!(members.contains("a"));
        assert!(members.contains("b"));
        assert!(members.contains("c"));
        assert!(!members.contains("d"));
    }

    #[test]
    fn test_instability_extremes() {
        let graph = graph_of(&[("source", &["sink"]), ("sink", &[]), ("mid", &["sink"])]);
        // Pure source: only imports.
        assert_eq!(instability(&graph, "source"), 1.0);
        // Pure sink: only imported.
        assert_eq!(instability(&graph, "sink"), 0.0);
    }

    #[test]
    fn test_instability_mixed() {
        let graph = graph_of(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
        assert_eq!(instability(&graph, "b"), 0.5);
    }

    #[test]
    fn test_isolated_node_instability_zero() {
        let graph = graph_of(&[("lonely", &[])]);
        assert_eq!(instability(&graph, "lonely"), 0.0);
    }

    #[test]
    fn test_abstractness_and_distance() {
        let mut graph = graph_of(&[("a", &[])]);
        {
            let node = graph.nodes.get_mut("a").unwrap();
            node.interface_count = 3;
            node.concrete_count = 1;
        }
        assert_eq!(abstractness(&graph, "a"), 0.75);
        // Isolated: I = 0, so D = |0.75 + 0 - 1| = 0.25.
        assert!((distance(&graph, "a") - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_average_distance_skips_typeless_nodes() {
        let mut graph = graph_of(&[("typed", &[]), ("plain", &[])]);
        graph.nodes.get_mut("typed").unwrap().interface_count = 1;
        let avg = average_distance(&graph).unwrap();
        // Only the typed node participates: A=1, I=0 → D=0.
        assert_eq!(avg, 0.0);

        let empty_types = graph_of(&[("a", &[]), ("b", &[])]);
        assert!(average_distance(&empty_types).is_none());
    }

    #[test]
    fn test_outliers_need_reliable_baseline() {
        // One heavily-coupled node among mostly isolated ones: median Ce
        // is 0, so no baseline and no outliers.
        let graph = graph_of(&[
            ("hub", &["a", "b", "c", "d", "e"]),
            ("a", &[]),
            ("b", &[]),
            ("c", &[]),
            ("d", &[]),
            ("e", &[]),
        ]);
        assert!(coupling_outliers(&graph, 2.0).is_empty());
    }

    #[test]
    fn test_outlier_flagged_with_median_one() {
        // Five nodes with Ce 1 and one with Ce 5: median is 1.
        let graph = graph_of(&[
            ("hub", &["a", "b", "c", "d", "e"]),
            ("a", &["b"]),
            ("b", &["c"]),
            ("c", &["d"]),
            ("d", &["e"]),
            ("e", &["a"]),
        ]);
        let outliers = coupling_outliers(&graph, 2.0);
        assert_eq!(outliers, vec![("hub".to_string(), 5)]);

        // Raising the multiplier un-flags it.
        assert!(coupling_outliers(&graph, 5.0).is_empty());
    }

    #[test]
    fn test_median_even_count() {
        let graph = graph_of(&[("a", &["b"]), ("b", &[])]);
        assert_eq!(median_efferent(&graph), Some(0.5));
    }
}
