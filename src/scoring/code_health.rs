//! Code Health category: per-unit structural metrics.
//!
//! Six sub-metrics, all riding the decay primitive: function size, file
//! size, cognitive complexity, nesting depth, parameter count, and
//! cross-unit duplication. Generated units contribute nothing; the
//! exemption policy adjusts every threshold before credit computation.

use crate::config::ScoringProfile;
use crate::models::{AnalyzedUnit, CategoryScore};
use crate::scoring::credit::severity_penalty;
use crate::scoring::exemptions::{
    cognitive_threshold, file_size_threshold, function_size_threshold, nesting_threshold,
    parameter_threshold, UnitContext,
};
use crate::scoring::unit_metrics::{score_samples, MetricSample};

pub const CATEGORY: &str = "code-health";

const FUNCTION_SIZE_POINTS: f64 = 20.0;
const FILE_SIZE_POINTS: f64 = 15.0;
const COGNITIVE_POINTS: f64 = 20.0;
const NESTING_POINTS: f64 = 10.0;
const PARAMETER_POINTS: f64 = 15.0;
const DUPLICATION_POINTS: f64 = 20.0;

/// Score the Code Health category.
///
/// `duplication` is indexed like `units`; `None` entries did not
/// participate in duplicate detection. `unit_count` is the number of
/// non-generated units, used for the size-independent penalty.
pub fn score(
    units: &[AnalyzedUnit],
    contexts: &[UnitContext],
    duplication: &[Option<f64>],
    profile: &ScoringProfile,
    unit_count: usize,
) -> CategoryScore {
    let thresholds = &profile.thresholds;
    let rules = &profile.exemptions;

    let mut function_size = Vec::new();
    let mut cognitive = Vec::new();
    let mut nesting = Vec::new();
    let mut parameters = Vec::new();
    let mut file_size = Vec::new();
    let mut dup_samples = Vec::new();

    for (idx, unit) in units.iter().enumerate() {
        let ctx = contexts[idx];
        if !ctx.is_scored() {
            continue;
        }

        file_size.push(MetricSample::new(
            unit.path.clone(),
            None,
            unit.path.to_string_lossy().to_string(),
            unit.line_count as f64,
            file_size_threshold(ctx.is_test, thresholds, rules),
        ));

        if let Some(percent) = duplication[idx] {
            let mut limit = profile.duplication.max_duplication_percent;
            if ctx.is_test {
                limit *= profile.duplication.test_threshold_multiplier;
            }
            dup_samples.push(MetricSample::new(
                unit.path.clone(),
                None,
                unit.path.to_string_lossy().to_string(),
                percent,
                limit,
            ));
        }

        for f in &unit.functions {
            let line = Some(f.line_start);

            function_size.push(MetricSample::new(
                unit.path.clone(),
                line,
                f.name.clone(),
                f.line_span() as f64,
                function_size_threshold(f, ctx.is_test, thresholds, rules),
            ));

            match cognitive_threshold(f, ctx.is_test, thresholds, rules) {
                Some(limit) => cognitive.push(MetricSample::new(
                    unit.path.clone(),
                    line,
                    f.name.clone(),
                    f.cognitive as f64,
                    limit,
                )),
                // Switch dispatch: full credit, no issue.
                None => cognitive.push(MetricSample::exempt(unit.path.clone(), line, f.name.clone())),
            }

            nesting.push(MetricSample::new(
                unit.path.clone(),
                line,
                f.name.clone(),
                f.max_nesting as f64,
                nesting_threshold(ctx.is_test, thresholds, rules),
            ));

            match parameter_threshold(f, unit, ctx.is_test, thresholds, rules) {
                Some(limit) => parameters.push(MetricSample::new(
                    unit.path.clone(),
                    line,
                    f.name.clone(),
                    f.parameters.len() as f64,
                    limit,
                )),
                None => parameters.push(MetricSample::exempt(unit.path.clone(), line, f.name.clone())),
            }
        }
    }

    let scored = [
        score_samples(
            CATEGORY,
            "function-size",
            "Function size",
            FUNCTION_SIZE_POINTS,
            &function_size,
            profile,
            |s| {
                format!(
                    "function {} spans {:.0} lines (budget {:.0})",
                    s.subject, s.value, s.threshold
                )
            },
        ),
        score_samples(
            CATEGORY,
            "file-size",
            "File size",
            FILE_SIZE_POINTS,
            &file_size,
            profile,
            |s| {
                format!(
                    "unit runs {:.0} lines (budget {:.0})",
                    s.value, s.threshold
                )
            },
        ),
        score_samples(
            CATEGORY,
            "cognitive-complexity",
            "Cognitive complexity",
            COGNITIVE_POINTS,
            &cognitive,
            profile,
            |s| {
                format!(
                    "function {} has cognitive complexity {:.0} (budget {:.0})",
                    s.subject, s.value, s.threshold
                )
            },
        ),
        score_samples(
            CATEGORY,
            "nesting-depth",
            "Nesting depth",
            NESTING_POINTS,
            &nesting,
            profile,
            |s| {
                format!(
                    "function {} nests {:.0} levels deep (budget {:.0})",
                    s.subject, s.value, s.threshold
                )
            },
        ),
        score_samples(
            CATEGORY,
            "parameter-count",
            "Parameter count",
            PARAMETER_POINTS,
            &parameters,
            profile,
            |s| {
                format!(
                    "function {} takes {:.0} parameters (budget {:.0})",
                    s.subject, s.value, s.threshold
                )
            },
        ),
        score_samples(
            CATEGORY,
            "duplication",
            "Duplication",
            DUPLICATION_POINTS,
            &dup_samples,
            profile,
            |s| {
                format!(
                    "{:.1}% of the unit duplicates other units (budget {:.1}%)",
                    s.value, s.threshold
                )
            },
        ),
    ];

    let mut sub_metrics = Vec::with_capacity(scored.len());
    let mut issues = Vec::new();
    for s in scored {
        sub_metrics.push(s.sub_metric);
        issues.extend(s.issues);
    }

    let penalty = severity_penalty(&issues, unit_count, &profile.calibration);
    CategoryScore::assemble(
        CATEGORY,
        profile.weights.code_health,
        sub_metrics,
        issues,
        penalty,
    )
}
