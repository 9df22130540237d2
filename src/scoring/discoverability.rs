//! Discoverability category: how quickly a reader — human or agent — can
//! orient inside the repository.
//!
//! Four sub-metrics: exported identifiers against the configured naming
//! convention, interface names against the expected-suffix vocabulary,
//! role clarity of graph nodes, and global mutable state per unit.

use crate::config::ScoringProfile;
use crate::models::{AnalyzedUnit, CategoryScore, Issue, Severity};
use crate::roles::{AnnotatedPackage, Role};
use crate::scoring::credit::severity_penalty;
use crate::scoring::exemptions::UnitContext;
use crate::scoring::unit_metrics::{score_ratio, score_samples, MetricSample};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const CATEGORY: &str = "discoverability";

const NAMING_POINTS: f64 = 30.0;
const SUFFIX_POINTS: f64 = 20.0;
const ROLE_CLARITY_POINTS: f64 = 25.0;
const GLOBAL_STATE_POINTS: f64 = 25.0;

/// Score the Discoverability category.
pub fn score(
    units: &[AnalyzedUnit],
    contexts: &[UnitContext],
    annotations: &BTreeMap<String, AnnotatedPackage>,
    profile: &ScoringProfile,
    unit_count: usize,
) -> CategoryScore {
    let mut sub_metrics = Vec::new();
    let mut issues = Vec::new();

    // Exported identifiers against the naming convention.
    let mode = profile.vocabulary.naming_mode;
    let mut conforming = 0usize;
    let mut total = 0usize;
    let mut naming_issues = Vec::new();
    for (idx, unit) in units.iter().enumerate() {
        if !contexts[idx].is_scored() {
            continue;
        }
        for f in unit.functions.iter().filter(|f| f.exported) {
            total += 1;
            if mode.matches(&f.name) {
                conforming += 1;
            } else {
                naming_issues.push(Issue::new(
                    Severity::Info,
                    CATEGORY,
                    "identifier-naming",
                    unit.path.clone(),
                    Some(f.line_start),
                    format!("exported function {} breaks the naming convention", f.name),
                    "identifier-naming",
                ));
            }
        }
    }
    let naming = score_ratio(
        "Identifier naming",
        NAMING_POINTS,
        conforming,
        total,
        naming_issues,
    );
    sub_metrics.push(naming.sub_metric);
    issues.extend(naming.issues);

    // Interface names against the expected-suffix vocabulary.
    let suffixes = &profile.vocabulary.expected_suffixes;
    let mut suffixed = 0usize;
    let mut iface_total = 0usize;
    let mut suffix_issues = Vec::new();
    for (idx, unit) in units.iter().enumerate() {
        if !contexts[idx].is_scored() {
            continue;
        }
        for iface in &unit.interfaces {
            iface_total += 1;
            if suffixes.iter().any(|s| iface.name.ends_with(s.as_str())) {
                suffixed += 1;
            } else {
                suffix_issues.push(Issue::new(
                    Severity::Info,
                    CATEGORY,
                    "interface-suffix",
                    unit.path.clone(),
                    None,
                    format!(
                        "interface {} carries none of the expected suffixes",
                        iface.name
                    ),
                    "interface-suffix",
                ));
            }
        }
    }
    let suffix = score_ratio(
        "Interface suffixes",
        SUFFIX_POINTS,
        suffixed,
        iface_total,
        suffix_issues,
    );
    sub_metrics.push(suffix.sub_metric);
    issues.extend(suffix.issues);

    // Role clarity across graph nodes.
    let clarity_floor = profile.calibration.clarity_floor;
    let mut clear = 0usize;
    let mut clarity_issues = Vec::new();
    for (dir, annotation) in annotations {
        if annotation.role != Role::Unclassified && annotation.confidence >= clarity_floor {
            clear += 1;
        } else {
            clarity_issues.push(Issue::new(
                Severity::Info,
                CATEGORY,
                "role-clarity",
                PathBuf::from(dir),
                None,
                format!("package {dir} has no clear architectural role"),
                "role-clarity",
            ));
        }
    }
    let clarity = score_ratio(
        "Role clarity",
        ROLE_CLARITY_POINTS,
        clear,
        annotations.len(),
        clarity_issues,
    );
    sub_metrics.push(clarity.sub_metric);
    issues.extend(clarity.issues);

    // Global mutable state per unit, through the decay primitive.
    let mut global_samples = Vec::new();
    for (idx, unit) in units.iter().enumerate() {
        if !contexts[idx].is_scored() {
            continue;
        }
        global_samples.push(MetricSample::new(
            unit.path.clone(),
            unit.global_mutables.first().map(|g| g.line),
            unit.path.to_string_lossy().to_string(),
            unit.global_mutables.len() as f64,
            profile.thresholds.max_global_mutables,
        ));
    }
    let globals = score_samples(
        CATEGORY,
        "global-mutable-state",
        "Global mutable state",
        GLOBAL_STATE_POINTS,
        &global_samples,
        profile,
        |s| {
            format!(
                "unit declares {:.0} global mutable bindings (budget {:.0})",
                s.value, s.threshold
            )
        },
    );
    sub_metrics.push(globals.sub_metric);
    issues.extend(globals.issues);

    let penalty = severity_penalty(&issues, unit_count, &profile.calibration);
    CategoryScore::assemble(
        CATEGORY,
        profile.weights.discoverability,
        sub_metrics,
        issues,
        penalty,
    )
}
