//! Architecture category: dependency-graph health and layering discipline.
//!
//! Three graph-signal sub-metrics — cycles, main-sequence distance, and
//! coupling balance — weighted 40/36/24 and reweighted to the full budget
//! whenever a signal family has no data (a single-node graph has no
//! coupling baseline; a graph without type declarations has no distance).
//! Issues come from detected cycles, coupling outliers, and the layering
//! pass's violation tags.

use crate::config::ScoringProfile;
use crate::graph::{average_distance, coupling_outliers, median_efferent, ImportGraph};
use crate::models::{CategoryScore, Issue, Severity, SubMetric};
use crate::roles::AnnotatedPackage;
use crate::scoring::credit::{award_points, decay_credit, severity_for_ratio, severity_penalty};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

pub const CATEGORY: &str = "architecture";

/// One graph-signal family with a computed credit, or no data
struct Family {
    label: &'static str,
    weight: f64,
    credit: Option<f64>,
    detail: String,
}

/// Score the Architecture category.
pub fn score(
    graph: &ImportGraph,
    cycles: &[Vec<String>],
    annotations: &BTreeMap<String, AnnotatedPackage>,
    profile: &ScoringProfile,
    unit_count: usize,
) -> CategoryScore {
    let weights = &profile.graph;
    let mut issues = Vec::new();

    if graph.is_empty() {
        // Nothing to evaluate: full credit at the default weights.
        let sub_metrics = vec![
            full_credit("Dependency cycles", weights.cycle_weight),
            full_credit("Main-sequence distance", weights.distance_weight),
            full_credit("Coupling balance", weights.coupling_weight),
        ];
        return CategoryScore::assemble(
            CATEGORY,
            profile.weights.architecture,
            sub_metrics,
            issues,
            0.0,
        );
    }

    // Cycle family: any cycle zeroes the signal.
    let cycle_credit = if cycles.is_empty() { 1.0 } else { 0.0 };
    for cycle in cycles {
        issues.push(cycle_issue(cycle));
    }

    // Distance family: only nodes that declare types participate. The
    // acceptable average rides the same decay primitive as every other
    // threshold-shaped metric.
    let distance = average_distance(graph).map(|avg| {
        let credit = decay_credit(avg, weights.max_avg_distance, profile.calibration.decay_span);
        (avg, credit)
    });
    if let Some((avg, _)) = distance {
        if avg > weights.max_avg_distance {
            let severity = severity_for_ratio(avg, weights.max_avg_distance, &profile.calibration);
            issues.push(Issue::new(
                severity,
                CATEGORY,
                "main-sequence-distance",
                PathBuf::from("."),
                None,
                format!(
                    "average distance from the main sequence is {avg:.2} (budget {:.2})",
                    weights.max_avg_distance
                ),
                "main-sequence-distance",
            ));
        }
    }

    // Coupling family: needs a reliable median baseline.
    let median = median_efferent(graph).unwrap_or(0.0);
    let coupling = if median >= 1.0 {
        let outliers = coupling_outliers(graph, weights.outlier_multiplier);
        for (dir, ce) in &outliers {
            issues.push(Issue::new(
                Severity::Warning,
                CATEGORY,
                "coupling-outlier",
                PathBuf::from(dir),
                None,
                format!(
                    "package {dir} imports {ce} internal packages (median {median:.1})"
                ),
                "coupling-outlier",
            ));
        }
        let credit = 1.0 - outliers.len() as f64 / graph.len() as f64;
        Some((outliers.len(), credit.clamp(0.0, 1.0)))
    } else {
        None
    };

    let families = [
        Family {
            label: "Dependency cycles",
            weight: weights.cycle_weight,
            credit: Some(cycle_credit),
            detail: if cycles.is_empty() {
                "no import cycles".to_string()
            } else {
                format!("{} import cycles", cycles.len())
            },
        },
        Family {
            label: "Main-sequence distance",
            weight: weights.distance_weight,
            credit: distance.map(|(_, c)| c),
            detail: match distance {
                Some((avg, _)) => format!("average distance {avg:.2}"),
                None => "no typed packages".to_string(),
            },
        },
        Family {
            label: "Coupling balance",
            weight: weights.coupling_weight,
            credit: coupling.map(|(_, c)| c),
            detail: match coupling {
                Some((outliers, _)) => format!("{outliers} coupling outliers"),
                None => "no coupling baseline".to_string(),
            },
        },
    ];

    // Reweight available families so their budgets always sum to the full
    // category budget.
    let total_weight: f64 = families.iter().map(|f| f.weight).sum();
    let available_weight: f64 = families
        .iter()
        .filter(|f| f.credit.is_some())
        .map(|f| f.weight)
        .sum();

    let mut sub_metrics = Vec::with_capacity(families.len());
    for family in families {
        match family.credit {
            Some(credit) => {
                let points = family.weight / available_weight * total_weight;
                sub_metrics.push(SubMetric {
                    name: family.label.to_string(),
                    points,
                    score: award_points(credit, points),
                    detail: family.detail,
                });
            }
            None => {
                debug!("architecture: {} has no data, reweighting", family.label);
            }
        }
    }

    // Layering violations recorded by the role pass. Cycle membership is
    // already reported per cycle above.
    for (dir, annotation) in annotations {
        for tag in &annotation.violations {
            if tag == "cycle-member" {
                continue;
            }
            let severity = if tag.starts_with("domain-imports-adapter") {
                Severity::Error
            } else {
                Severity::Warning
            };
            issues.push(Issue::new(
                severity,
                CATEGORY,
                "layering",
                PathBuf::from(dir),
                None,
                format!("package {dir} breaks layering: {tag}"),
                "layering",
            ));
        }
    }

    let penalty = severity_penalty(&issues, unit_count, &profile.calibration);
    CategoryScore::assemble(
        CATEGORY,
        profile.weights.architecture,
        sub_metrics,
        issues,
        penalty,
    )
}

fn full_credit(label: &str, points: f64) -> SubMetric {
    SubMetric {
        name: label.to_string(),
        points,
        score: points,
        detail: "nothing to evaluate".to_string(),
    }
}

/// Build the issue for one detected cycle.
///
/// Severity scales with cycle length: long chains are the hardest to
/// untangle.
fn cycle_issue(cycle: &[String]) -> Issue {
    let severity = if cycle.len() >= 5 {
        Severity::Error
    } else {
        Severity::Warning
    };
    let mut chain = cycle.join(" → ");
    if let Some(first) = cycle.first() {
        chain.push_str(&format!(" → {first}"));
    }
    Issue::new(
        severity,
        CATEGORY,
        "import-cycle",
        PathBuf::from(cycle.first().map(String::as_str).unwrap_or(".")),
        None,
        format!("circular import chain: {chain}"),
        "import-cycle",
    )
}
