//! Layering-violation detection.
//!
//! Checks every internal edge against an explicit allowed-dependency table
//! keyed by the endpoint roles and, for adapter-to-adapter edges, their
//! directions. Inbound adapters may wire to outbound adapters; adapters
//! within the same subtree may import each other; designated composition
//! roots are exempt from the adapter-to-adapter rule entirely. Everything
//! else on the adapter table — cross-direction and cross-sibling imports —
//! is a violation, as are Core-importing-Adapter edges and any membership
//! in an import cycle.

use super::{AnnotatedPackage, Role};
use crate::config::ScoringProfile;
use crate::graph::ImportGraph;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Direction of an adapter node, derived from the profile's hint lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterDirection {
    Inbound,
    Outbound,
    Unknown,
}

/// Classify an adapter directory as inbound or outbound by its deepest
/// matching segment.
pub fn adapter_direction(dir: &str, profile: &ScoringProfile) -> AdapterDirection {
    let vocab = &profile.vocabulary;
    for segment in dir.split('/').rev() {
        let segment = segment.to_ascii_lowercase();
        if vocab.inbound_hints.iter().any(|h| *h == segment) {
            return AdapterDirection::Inbound;
        }
        if vocab.outbound_hints.iter().any(|h| *h == segment) {
            return AdapterDirection::Outbound;
        }
    }
    AdapterDirection::Unknown
}

/// Whether one directory is an ancestor of the other (same subtree).
fn same_subtree(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    b.starts_with(&format!("{a}/")) || a.starts_with(&format!("{b}/"))
}

/// Whether a directory lies under a designated composition root.
pub fn is_composition_root(dir: &str, profile: &ScoringProfile) -> bool {
    profile
        .vocabulary
        .composition_roots
        .iter()
        .any(|root| dir == root.as_str() || dir.starts_with(&format!("{root}/")))
}

/// Run the layering pass: record violation tags on each node's annotation.
///
/// `cycle_members` comes from the graph's SCC analysis; cycle membership is
/// always a violation regardless of roles.
pub fn apply(
    graph: &ImportGraph,
    annotations: &mut BTreeMap<String, AnnotatedPackage>,
    cycle_members: &BTreeSet<String>,
    profile: &ScoringProfile,
) {
    let roles: BTreeMap<&str, Role> = annotations
        .iter()
        .map(|(dir, a)| (dir.as_str(), a.role))
        .collect();

    let mut tags: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (from, node) in &graph.nodes {
        let from_role = roles.get(from.as_str()).copied().unwrap_or_default();
        for to in &node.imports {
            if from == to {
                continue; // self-imports surface through cycle membership
            }
            let to_role = roles.get(to.as_str()).copied().unwrap_or_default();

            match (from_role, to_role) {
                (Role::Core, Role::Adapter) => {
                    tags.entry(from.clone())
                        .or_default()
                        .push(format!("domain-imports-adapter:{to}"));
                }
                (Role::Adapter, Role::Adapter) => {
                    if let Some(tag) = adapter_edge_violation(from, to, profile) {
                        tags.entry(from.clone()).or_default().push(tag);
                    }
                }
                _ => {}
            }
        }
    }

    for member in cycle_members {
        tags.entry(member.clone())
            .or_default()
            .push("cycle-member".to_string());
    }

    let total: usize = tags.values().map(|v| v.len()).sum();
    debug!("layering: {total} violations across {} nodes", tags.len());

    for (dir, mut list) in tags {
        if let Some(annotation) = annotations.get_mut(&dir) {
            annotation.violations.append(&mut list);
        }
    }
}

/// Adapter-to-adapter edge check against the allowed-dependency table.
///
/// Returns a violation tag, or `None` when the edge is allowed.
fn adapter_edge_violation(from: &str, to: &str, profile: &ScoringProfile) -> Option<String> {
    if is_composition_root(from, profile) {
        return None;
    }
    if same_subtree(from, to) {
        return None;
    }
    let from_dir = adapter_direction(from, profile);
    let to_dir = adapter_direction(to, profile);
    if from_dir == AdapterDirection::Inbound && to_dir == AdapterDirection::Outbound {
        // Normal wiring: a handler reaching its repository.
        return None;
    }
    if from_dir == AdapterDirection::Outbound && to_dir == AdapterDirection::Inbound {
        return Some(format!("adapter-cross-direction:{to}"));
    }
    Some(format!("adapter-cross-sibling:{to}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PackageNode;

    fn profile() -> ScoringProfile {
        ScoringProfile::default()
    }

    fn graph_of(edges: &[(&str, &[&str])]) -> ImportGraph {
        let mut graph = ImportGraph::default();
        for (dir, _) in edges {
            graph.nodes.insert(dir.to_string(), PackageNode::default());
        }
        for (dir, targets) in edges {
            for target in *targets {
                graph
                    .nodes
                    .get_mut(*dir)
                    .unwrap()
                    .imports
                    .insert(target.to_string());
                if let Some(t) = graph.nodes.get_mut(*target) {
                    t.imported_by.insert(dir.to_string());
                }
            }
        }
        graph
    }

    fn annotations_of(roles: &[(&str, Role)]) -> BTreeMap<String, AnnotatedPackage> {
        roles
            .iter()
            .map(|(dir, role)| {
                (
                    dir.to_string(),
                    AnnotatedPackage {
                        role: *role,
                        confidence: 0.8,
                        violations: Vec::new(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_inbound_to_outbound_is_allowed() {
        let graph = graph_of(&[("web/handlers", &["storage/db"]), ("storage/db", &[])]);
        let mut annotations = annotations_of(&[
            ("web/handlers", Role::Adapter),
            ("storage/db", Role::Adapter),
        ]);
        apply(&graph, &mut annotations, &BTreeSet::new(), &profile());
        assert!(annotations["web/handlers"].violations.is_empty());
    }

    #[test]
    fn test_outbound_to_inbound_is_cross_direction() {
        let graph = graph_of(&[("storage/db", &["web/handlers"]), ("web/handlers", &[])]);
        let mut annotations = annotations_of(&[
            ("web/handlers", Role::Adapter),
            ("storage/db", Role::Adapter),
        ]);
        apply(&graph, &mut annotations, &BTreeSet::new(), &profile());
        assert_eq!(
            annotations["storage/db"].violations,
            vec!["adapter-cross-direction:web/handlers".to_string()]
        );
    }

    #[test]
    fn test_same_subtree_adapters_allowed() {
        let graph = graph_of(&[
            ("adapters/http", &["adapters/http/middleware"]),
            ("adapters/http/middleware", &[]),
        ]);
        let mut annotations = annotations_of(&[
            ("adapters/http", Role::Adapter),
            ("adapters/http/middleware", Role::Adapter),
        ]);
        apply(&graph, &mut annotations, &BTreeSet::new(), &profile());
        assert!(annotations["adapters/http"].violations.is_empty());
    }

    #[test]
    fn test_cross_sibling_adapters_violate() {
        let graph = graph_of(&[("adapters/kafka", &["adapters/smtp"]), ("adapters/smtp", &[])]);
        let mut annotations = annotations_of(&[
            ("adapters/kafka", Role::Adapter),
            ("adapters/smtp", Role::Adapter),
        ]);
        apply(&graph, &mut annotations, &BTreeSet::new(), &profile());
        assert_eq!(
            annotations["adapters/kafka"].violations,
            vec!["adapter-cross-sibling:adapters/smtp".to_string()]
        );
    }

    #[test]
    fn test_composition_root_is_exempt() {
        let graph = graph_of(&[
            ("cmd/server", &["storage/db", "web/handlers"]),
            ("storage/db", &[]),
            ("web/handlers", &[]),
        ]);
        let mut annotations = annotations_of(&[
            ("cmd/server", Role::Adapter),
            ("storage/db", Role::Adapter),
            ("web/handlers", Role::Adapter),
        ]);
        apply(&graph, &mut annotations, &BTreeSet::new(), &profile());
        assert!(annotations["cmd/server"].violations.is_empty());
    }

    #[test]
    fn test_domain_importing_adapter_violates() {
        let graph = graph_of(&[("domain", &["storage/db"]), ("storage/db", &[])]);
        let mut annotations =
            annotations_of(&[("domain", Role::Core), ("storage/db", Role::Adapter)]);
        apply(&graph, &mut annotations, &BTreeSet::new(), &profile());
        assert_eq!(
            annotations["domain"].violations,
            vec!["domain-imports-adapter:storage/db".to_string()]
        );
    }

    #[test]
    fn test_cycle_membership_is_a_violation() {
        let graph = graph_of(&[("a", &["b"]), ("b", &["a"])]);
        let mut annotations = annotations_of(&[("a", Role::Core), ("b", Role::Core)]);
        let members = BTreeSet::from(["a".to_string(), "b".to_string()]);
        apply(&graph, &mut annotations, &members, &profile());
        assert!(annotations["a"].violations.contains(&"cycle-member".to_string()));
        assert!(annotations["b"].violations.contains(&"cycle-member".to_string()));
    }

    #[test]
    fn test_adapter_direction_vocabulary() {
        let p = profile();
        assert_eq!(adapter_direction("web/handlers", &p), AdapterDirection::Inbound);
        assert_eq!(adapter_direction("storage/db", &p), AdapterDirection::Outbound);
        assert_eq!(adapter_direction("adapters/misc", &p), AdapterDirection::Unknown);
    }
}
