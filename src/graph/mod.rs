//! Import/dependency graph for analyzed units.
//!
//! Nodes are containing directories; edges are internal-import
//! relationships only. The graph is built once per run from an immutable
//! unit snapshot and never mutated incrementally.

mod algorithms;
mod builder;

pub use algorithms::{
    abstractness, average_distance, coupling_outliers, cycle_membership, detect_cycles, distance,
    instability, median_efferent,
};
pub use builder::{build_import_graph, ImportGraph, PackageNode};
