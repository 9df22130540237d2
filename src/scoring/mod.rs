//! Category orchestration.
//!
//! Every scorer is a pure function `(profile, immutable inputs) →
//! (CategoryScore, issues)` composed into one fixed pipeline. The pipeline
//! runs a single synchronous pass: resolve unit contexts, detect
//! duplication, build the import graph, classify roles, run the layering
//! pass, then score each category against the shared snapshots.

pub mod architecture;
pub mod code_health;
pub mod credit;
pub mod discoverability;
pub mod exemptions;
pub mod unit_metrics;

use crate::config::ScoringProfile;
use crate::duplication;
use crate::graph;
use crate::models::{AnalyzedUnit, CategoryScore};
use crate::roles;
use exemptions::{ContextMatcher, UnitContext};
use tracing::info;

/// Score a repository snapshot into one `CategoryScore` per category.
///
/// `module_root` identifies the project's module namespace for resolving
/// internal imports to graph nodes. Malformed or empty input never fails:
/// anything with nothing to evaluate earns full credit.
pub fn score_repository(
    units: &[AnalyzedUnit],
    profile: &ScoringProfile,
    module_root: &str,
) -> Vec<CategoryScore> {
    let profile = profile.validated();

    let matcher = ContextMatcher::new(&profile);
    let contexts: Vec<UnitContext> = units.iter().map(|u| matcher.context(u)).collect();
    let unit_count = contexts.iter().filter(|c| c.is_scored()).count();

    let dup = duplication::duplication_by_unit(units, &contexts, &profile);

    let import_graph = graph::build_import_graph(units, &contexts, &profile, module_root);
    let cycles = graph::detect_cycles(&import_graph);
    let cycle_members = graph::cycle_membership(&import_graph);

    let mut annotations = roles::annotate(&import_graph, &profile);
    roles::layering::apply(&import_graph, &mut annotations, &cycle_members, &profile);

    let categories = vec![
        code_health::score(units, &contexts, &dup, &profile, unit_count),
        discoverability::score(units, &contexts, &annotations, &profile, unit_count),
        architecture::score(&import_graph, &cycles, &annotations, &profile, unit_count),
    ];

    for category in &categories {
        let (errors, warnings, infos) = category.issue_summary();
        info!(
            "{}: {:.0}/100 ({} errors, {} warnings, {} infos)",
            category.name, category.score, errors, warnings, infos
        );
    }

    categories
}
