//! Decay credit and severity-weighted penalty — the primitive every other
//! scorer builds on.
//!
//! A metric value at or under its threshold earns full credit; past the
//! threshold, credit decays linearly and hits zero at `threshold × (k+1)`
//! (k = 4 by default, so zero credit at 5× the threshold). Credits are
//! averaged per metric, scaled to the sub-metric's point budget, and rounded
//! half-away-from-zero — truncation would silently drop earned points at the
//! boundary (98.75% of 20 points must award 20, not 19).

use crate::config::Calibration;
use crate::models::{Issue, Severity};

/// Continuous [0, 1] credit for a metric value relative to its threshold.
///
/// Returns 1.0 for `value <= threshold`, decays linearly to 0.0 at
/// `threshold * (span + 1)`, and never goes negative. A non-positive
/// threshold means there is nothing to evaluate and earns full credit.
pub fn decay_credit(value: f64, threshold: f64, span: f64) -> f64 {
    if threshold <= 0.0 || span <= 0.0 {
        return 1.0;
    }
    if value <= threshold {
        return 1.0;
    }
    let overshoot = (value - threshold) / (threshold * span);
    (1.0 - overshoot).max(0.0)
}

/// Convert an average credit into awarded points.
///
/// Rounds half away from zero and clamps into [0, points].
pub fn award_points(avg_credit: f64, points: f64) -> f64 {
    (avg_credit * points).round().clamp(0.0, points)
}

/// Severity for a metric issue, derived from the value/threshold ratio.
///
/// ≥ 3× the threshold is an error, ≥ 1.5× a warning, anything else over the
/// threshold an info. The cut points are calibration data.
pub fn severity_for_ratio(value: f64, threshold: f64, cal: &Calibration) -> Severity {
    if threshold <= 0.0 {
        return Severity::Info;
    }
    let ratio = value / threshold;
    if ratio >= cal.error_ratio {
        Severity::Error
    } else if ratio >= cal.warning_ratio {
        Severity::Warning
    } else {
        Severity::Info
    }
}

/// Severity weight used by the penalty aggregation
pub fn severity_weight(severity: Severity, cal: &Calibration) -> f64 {
    match severity {
        Severity::Error => cal.error_weight,
        Severity::Warning => cal.warning_weight,
        Severity::Info => cal.info_weight,
    }
}

/// Aggregate issues into a point deduction.
///
/// Issues are weighted by severity, summed, and divided by the unit count
/// to get a size-independent debt ratio, then scaled to points. The penalty
/// is floored at 1 point whenever any error-severity issue exists — errors
/// must never be absorbed by rounding to zero.
pub fn severity_penalty(issues: &[Issue], unit_count: usize, cal: &Calibration) -> f64 {
    if issues.is_empty() || unit_count == 0 {
        return 0.0;
    }

    let weighted: f64 = issues
        .iter()
        .map(|issue| severity_weight(issue.severity, cal))
        .sum();
    let debt_ratio = weighted / unit_count as f64;
    let mut penalty = (debt_ratio * cal.penalty_scale).round();

    let has_error = issues.iter().any(|i| i.severity == Severity::Error);
    if has_error && penalty < 1.0 {
        penalty = 1.0;
    }

    penalty.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Issue;
    use std::path::PathBuf;

    fn cal() -> Calibration {
        Calibration::default()
    }

    fn issue(severity: Severity) -> Issue {
        Issue::new(
            severity,
            "code-health",
            "function-size",
            PathBuf::from("a.go"),
            Some(1),
            "x".into(),
            "function-size",
        )
    }

    #[test]
    fn test_full_credit_at_or_below_threshold() {
        assert_eq!(decay_credit(0.0, 60.0, 4.0), 1.0);
        assert_eq!(decay_credit(59.0, 60.0, 4.0), 1.0);
        assert_eq!(decay_credit(60.0, 60.0, 4.0), 1.0);
    }

    #[test]
    fn test_zero_credit_at_five_times_threshold() {
        assert_eq!(decay_credit(300.0, 60.0, 4.0), 0.0);
        assert_eq!(decay_credit(1000.0, 60.0, 4.0), 0.0);
    }

    #[test]
    fn test_credit_is_non_increasing_past_threshold() {
        let mut last = 1.0;
        for v in 61..400 {
            let credit = decay_credit(v as f64, 60.0, 4.0);
            assert!(credit <= last, "credit rose at value {v}");
            assert!((0.0..=1.0).contains(&credit));
            last = credit;
        }
    }

    #[test]
    fn test_midpoint_credit() {
        // Halfway through the decay span: threshold*3 of a span ending at
        // threshold*5 leaves half the credit.
        let credit = decay_credit(180.0, 60.0, 4.0);
        assert!((credit - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_non_positive_threshold_is_full_credit() {
        assert_eq!(decay_credit(100.0, 0.0, 4.0), 1.0);
        assert_eq!(decay_credit(100.0, -5.0, 4.0), 1.0);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        // 39 full-credit samples and one at 0.9 over 40 total on a 20-point
        // metric: 0.9975 * 20 = 19.95, which must round up to 20.
        let avg = (39.0 + 0.9) / 40.0;
        assert_eq!(award_points(avg, 20.0), 20.0);
    }

    #[test]
    fn test_award_points_clamps() {
        assert_eq!(award_points(1.2, 20.0), 20.0);
        assert_eq!(award_points(-0.3, 20.0), 0.0);
    }

    #[test]
    fn test_severity_ratio_cut_points() {
        // 1.5x / 3x are calibration data, not invariant logic.
        let cal = cal();
        assert_eq!(severity_for_ratio(61.0, 60.0, &cal), Severity::Info);
        assert_eq!(severity_for_ratio(90.0, 60.0, &cal), Severity::Warning);
        assert_eq!(severity_for_ratio(180.0, 60.0, &cal), Severity::Error);
    }

    #[test]
    fn test_penalty_scale_calibration() {
        // A 6% debt ratio costs about 7 points under the default scale.
        let issues: Vec<Issue> = (0..6).map(|_| issue(Severity::Warning)).collect();
        let penalty = severity_penalty(&issues, 100, &cal());
        assert_eq!(penalty, 7.0);
    }

    #[test]
    fn test_error_floor_survives_huge_unit_count() {
        let issues = vec![issue(Severity::Error)];
        let penalty = severity_penalty(&issues, 1_000_000, &cal());
        assert!(penalty >= 1.0);
    }

    #[test]
    fn test_info_only_penalty_can_round_to_zero() {
        let issues = vec![issue(Severity::Info)];
        let penalty = severity_penalty(&issues, 1_000_000, &cal());
        assert_eq!(penalty, 0.0);
    }

    #[test]
    fn test_no_issues_no_penalty() {
        assert_eq!(severity_penalty(&[], 10, &cal()), 0.0);
        assert_eq!(severity_penalty(&[issue(Severity::Error)], 0, &cal()), 0.0);
    }
}
