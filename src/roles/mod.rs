//! Architectural role classification.
//!
//! Each graph node gets a role verdict fused from three independent,
//! possibly-conflicting evidence sources (naming, import/composition,
//! syntactic shape), then a layering pass checks the allowed-dependency
//! table and records violations.

mod fusion;
pub mod layering;
mod signals;

pub use fusion::fuse;
pub use signals::{import_signal, naming_signal, syntactic_signal};

use crate::config::ScoringProfile;
use crate::graph::ImportGraph;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Architectural role of a graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Role {
    Core,
    Ports,
    Adapter,
    Orchestrator,
    EntryPoint,
    #[default]
    Unclassified,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Core => write!(f, "core"),
            Role::Ports => write!(f, "ports"),
            Role::Adapter => write!(f, "adapter"),
            Role::Orchestrator => write!(f, "orchestrator"),
            Role::EntryPoint => write!(f, "entry-point"),
            Role::Unclassified => write!(f, "unclassified"),
        }
    }
}

/// One evidence source's opinion about a node's role
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleSignal {
    pub role: Role,
    pub confidence: f64,
    /// Which evidence source produced the signal
    pub source: &'static str,
}

/// Fused verdict plus layering violations for one node
#[derive(Debug, Clone, Serialize, Default)]
pub struct AnnotatedPackage {
    pub role: Role,
    pub confidence: f64,
    /// Violation message tags recorded by the layering pass
    pub violations: Vec<String>,
}

/// Classify every node in the graph.
///
/// Returns annotations keyed like the graph's node map; violations are
/// empty until the layering pass fills them in.
pub fn annotate(graph: &ImportGraph, profile: &ScoringProfile) -> BTreeMap<String, AnnotatedPackage> {
    let mut annotations = BTreeMap::new();
    for (dir, node) in &graph.nodes {
        let mut signals = Vec::with_capacity(3);
        if let Some(s) = naming_signal(dir, profile) {
            signals.push(s);
        }
        if let Some(s) = import_signal(node, profile) {
            signals.push(s);
        }
        if let Some(s) = syntactic_signal(node, profile) {
            signals.push(s);
        }

        let (role, confidence) = fuse(&signals, &profile.calibration);
        debug!("role: {dir} → {role} ({confidence:.2}) from {} signals", signals.len());
        annotations.insert(
            dir.clone(),
            AnnotatedPackage {
                role,
                confidence,
                violations: Vec::new(),
            },
        );
    }
    annotations
}
