//! Generic per-unit metric scorer.
//!
//! Every threshold-shaped metric reduces to the same pipeline: collect
//! (value, effective threshold) samples, average the decay credits, scale
//! to the point budget, and emit one issue per over-threshold sample. The
//! issue boundary is exactly the scoring boundary — a sample that loses
//! credit always files an issue, and a full-credit sample never does.

use crate::config::ScoringProfile;
use crate::models::{Issue, SubMetric};
use crate::scoring::credit::{award_points, decay_credit, severity_for_ratio};
use std::path::PathBuf;

/// One measured sample feeding a sub-metric
#[derive(Debug, Clone)]
pub struct MetricSample {
    pub file: PathBuf,
    pub line: Option<u32>,
    /// What was measured (function name, unit label)
    pub subject: String,
    pub value: f64,
    pub threshold: f64,
    /// Full credit regardless of the raw value; no issue is filed
    pub exempt: bool,
}

impl MetricSample {
    pub fn new(
        file: PathBuf,
        line: Option<u32>,
        subject: impl Into<String>,
        value: f64,
        threshold: f64,
    ) -> Self {
        Self {
            file,
            line,
            subject: subject.into(),
            value,
            threshold,
            exempt: false,
        }
    }

    pub fn exempt(file: PathBuf, line: Option<u32>, subject: impl Into<String>) -> Self {
        Self {
            file,
            line,
            subject: subject.into(),
            value: 0.0,
            threshold: 0.0,
            exempt: true,
        }
    }
}

/// A scored sub-metric together with the issues it raised
#[derive(Debug, Clone)]
pub struct ScoredMetric {
    pub sub_metric: SubMetric,
    pub issues: Vec<Issue>,
}

/// Score a set of samples into a sub-metric.
///
/// An empty sample set means nothing to evaluate and earns full credit.
/// `describe` renders the issue message for an over-threshold sample.
pub fn score_samples<F>(
    category: &str,
    metric: &str,
    metric_label: &str,
    points: f64,
    samples: &[MetricSample],
    profile: &ScoringProfile,
    describe: F,
) -> ScoredMetric
where
    F: Fn(&MetricSample) -> String,
{
    if samples.is_empty() {
        return ScoredMetric {
            sub_metric: SubMetric {
                name: metric_label.to_string(),
                points,
                score: points,
                detail: "nothing to evaluate".to_string(),
            },
            issues: Vec::new(),
        };
    }

    let span = profile.calibration.decay_span;
    let mut credit_sum = 0.0;
    let mut within = 0usize;
    let mut issues = Vec::new();

    for sample in samples {
        if sample.exempt || sample.value <= sample.threshold {
            credit_sum += 1.0;
            within += 1;
            continue;
        }
        credit_sum += decay_credit(sample.value, sample.threshold, span);
        let severity = severity_for_ratio(sample.value, sample.threshold, &profile.calibration);
        issues.push(Issue::new(
            severity,
            category,
            metric,
            sample.file.clone(),
            sample.line,
            describe(sample),
            metric,
        ));
    }

    let avg = credit_sum / samples.len() as f64;
    let score = award_points(avg, points);
    let detail = format!("{within} of {} within budget", samples.len());

    ScoredMetric {
        sub_metric: SubMetric {
            name: metric_label.to_string(),
            points,
            score,
            detail,
        },
        issues,
    }
}

/// Score a set of pass/fail observations into a sub-metric.
///
/// Used by metrics that are conformance checks rather than threshold
/// decays (identifier naming, suffix vocabulary, role clarity). Failing
/// observations carry their own pre-built issues so the boundary still
/// matches.
pub fn score_ratio(
    metric_label: &str,
    points: f64,
    passed: usize,
    total: usize,
    issues: Vec<Issue>,
) -> ScoredMetric {
    if total == 0 {
        return ScoredMetric {
            sub_metric: SubMetric {
                name: metric_label.to_string(),
                points,
                score: points,
                detail: "nothing to evaluate".to_string(),
            },
            issues: Vec::new(),
        };
    }
    let avg = passed as f64 / total as f64;
    ScoredMetric {
        sub_metric: SubMetric {
            name: metric_label.to_string(),
            points,
            score: award_points(avg, points),
            detail: format!("{passed} of {total} conform"),
        },
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    fn sample(value: f64, threshold: f64) -> MetricSample {
        MetricSample::new(PathBuf::from("a.go"), Some(1), "F", value, threshold)
    }

    #[test]
    fn test_empty_samples_full_credit() {
        let profile = ScoringProfile::default();
        let scored = score_samples("code-health", "function-size", "Function size", 20.0, &[], &profile, |_| {
            String::new()
        });
        assert_eq!(scored.sub_metric.score, 20.0);
        assert!(scored.issues.is_empty());
    }

    #[test]
    fn test_boundary_rounding_awards_full_points() {
        // 39 clean samples plus one at half the decay span short of 0.9
        // credit: value 84 on threshold 60 gives credit 0.9.
        let profile = ScoringProfile::default();
        let mut samples: Vec<MetricSample> = (0..39).map(|_| sample(50.0, 60.0)).collect();
        samples.push(sample(84.0, 60.0));

        let scored = score_samples(
            "code-health",
            "function-size",
            "Function size",
            20.0,
            &samples,
            &profile,
            |s| format!("{} runs long", s.subject),
        );
        assert_eq!(scored.sub_metric.score, 20.0);
        // The lossy sample still files an issue — no silent zone.
        assert_eq!(scored.issues.len(), 1);
        assert_eq!(scored.issues[0].severity, Severity::Info);
    }

    #[test]
    fn test_issue_boundary_matches_score_boundary() {
        let profile = ScoringProfile::default();
        let samples = vec![sample(60.0, 60.0), sample(61.0, 60.0)];
        let scored = score_samples(
            "code-health",
            "function-size",
            "Function size",
            20.0,
            &samples,
            &profile,
            |_| "over".into(),
        );
        // Exactly one sample is over threshold; exactly one issue exists.
        assert_eq!(scored.issues.len(), 1);
        assert_eq!(scored.issues[0].line, Some(1));
    }

    #[test]
    fn test_exempt_sample_awards_credit_without_issue() {
        let profile = ScoringProfile::default();
        let samples = vec![MetricSample::exempt(
            PathBuf::from("a.go"),
            Some(3),
            "ReconstructOrder",
        )];
        let scored = score_samples(
            "code-health",
            "parameter-count",
            "Parameter count",
            15.0,
            &samples,
            &profile,
            |_| "over".into(),
        );
        assert_eq!(scored.sub_metric.score, 15.0);
        assert!(scored.issues.is_empty());
    }

    #[test]
    fn test_severity_escalates_with_ratio() {
        let profile = ScoringProfile::default();
        let samples = vec![sample(200.0, 60.0)];
        let scored = score_samples(
            "code-health",
            "function-size",
            "Function size",
            20.0,
            &samples,
            &profile,
            |_| "way over".into(),
        );
        assert_eq!(scored.issues[0].severity, Severity::Error);
    }

    #[test]
    fn test_score_ratio_empty_is_full_credit() {
        let scored = score_ratio("Identifier naming", 30.0, 0, 0, vec![]);
        assert_eq!(scored.sub_metric.score, 30.0);
    }

    #[test]
    fn test_score_ratio_partial() {
        let scored = score_ratio("Identifier naming", 30.0, 3, 4, vec![]);
        assert_eq!(scored.sub_metric.score, 23.0); // 0.75 * 30 = 22.5 → 23
    }
}
