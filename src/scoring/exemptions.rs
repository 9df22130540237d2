//! Exemption policy: which units and functions get lenient thresholds, and
//! which are excluded outright.
//!
//! Evaluated once per unit/function, before any credit computation.
//! Generated units are excluded from every metric and from issue
//! generation. Test-context units, template functions, table-driven test
//! bodies, switch-dispatch functions, FFI boundaries, and
//! reconstruction-style factories each adjust one or more effective
//! thresholds.

use crate::config::{ExemptionRules, ScoringProfile, Thresholds};
use crate::models::{AnalyzedUnit, FunctionRecord};
use regex::Regex;
use tracing::warn;

/// Per-unit context resolved from the profile's pattern lists
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitContext {
    pub is_test: bool,
    pub is_generated: bool,
}

impl UnitContext {
    /// Unit participates in scoring at all
    pub fn is_scored(&self) -> bool {
        !self.is_generated
    }
}

/// Compiled path matchers for unit-context resolution
pub struct ContextMatcher {
    test_patterns: Vec<Regex>,
    generated_patterns: Vec<Regex>,
}

impl ContextMatcher {
    /// Compile the profile's pattern lists. An invalid pattern is skipped
    /// with a warning rather than failing the run.
    pub fn new(profile: &ScoringProfile) -> Self {
        Self {
            test_patterns: compile(&profile.exemptions.test_path_patterns),
            generated_patterns: compile(&profile.exemptions.generated_path_patterns),
        }
    }

    pub fn context(&self, unit: &AnalyzedUnit) -> UnitContext {
        let path = unit.path.to_string_lossy().replace('\\', "/");
        let is_generated =
            unit.is_generated || self.generated_patterns.iter().any(|re| re.is_match(&path));
        let is_test = self.test_patterns.iter().any(|re| re.is_match(&path));
        UnitContext {
            is_test,
            is_generated,
        }
    }
}

fn compile(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| match Regex::new(p) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!("skipping invalid exemption pattern {p:?}: {e}");
                None
            }
        })
        .collect()
}

/// Template-shaped function: the body is dominated by string literals
pub fn is_template(f: &FunctionRecord, rules: &ExemptionRules) -> bool {
    f.literal_ratio >= rules.template_literal_cutoff
}

/// The classic table-driven-test shape: long but flat, in test context
pub fn is_data_heavy_test(f: &FunctionRecord, is_test: bool) -> bool {
    is_test && f.max_nesting <= 2 && f.max_bool_ops <= 1
}

/// Switch-dispatch shape: many short case arms
pub fn is_switch_dispatch(f: &FunctionRecord, rules: &ExemptionRules) -> bool {
    f.max_case_arms >= rules.dispatch_min_arms
        && f.avg_case_arm_lines > 0.0
        && f.avg_case_arm_lines <= rules.dispatch_max_arm_lines
}

/// Effective function-size threshold after exemptions.
///
/// Test context doubles the base; template-shaped, table-driven-test, and
/// switch-dispatch functions then multiply by the template multiplier on
/// top of whatever base applies.
pub fn function_size_threshold(
    f: &FunctionRecord,
    is_test: bool,
    thresholds: &Thresholds,
    rules: &ExemptionRules,
) -> f64 {
    let mut limit = thresholds.max_function_lines;
    if is_test {
        limit *= rules.test_size_multiplier;
    }
    if is_template(f, rules) || is_data_heavy_test(f, is_test) || is_switch_dispatch(f, rules) {
        limit *= rules.template_multiplier;
    }
    limit
}

/// Effective file-size threshold
pub fn file_size_threshold(is_test: bool, thresholds: &Thresholds, rules: &ExemptionRules) -> f64 {
    let mut limit = thresholds.max_file_lines;
    if is_test {
        limit *= rules.test_size_multiplier;
    }
    limit
}

/// Effective cognitive-complexity threshold; `None` means the function is
/// exempt from cognitive scoring entirely (switch dispatch).
pub fn cognitive_threshold(
    f: &FunctionRecord,
    is_test: bool,
    thresholds: &Thresholds,
    rules: &ExemptionRules,
) -> Option<f64> {
    if is_switch_dispatch(f, rules) {
        return None;
    }
    let mut limit = thresholds.max_cognitive;
    if is_test {
        limit += rules.test_cognitive_offset;
    }
    Some(limit)
}

/// Effective nesting-depth threshold
pub fn nesting_threshold(is_test: bool, thresholds: &Thresholds, rules: &ExemptionRules) -> f64 {
    let mut limit = thresholds.max_nesting;
    if is_test {
        limit += rules.test_nesting_offset;
    }
    limit
}

/// Effective parameter-count threshold; `None` means full credit regardless
/// of the raw value (name-prefix exemption, parameter metric only).
pub fn parameter_threshold(
    f: &FunctionRecord,
    unit: &AnalyzedUnit,
    is_test: bool,
    thresholds: &Thresholds,
    rules: &ExemptionRules,
) -> Option<f64> {
    if rules
        .param_exempt_prefixes
        .iter()
        .any(|prefix| f.name.starts_with(prefix.as_str()))
    {
        return None;
    }
    if unit.has_ffi_boundary {
        // FFI boundaries mirror foreign signatures; the ceiling is separate
        // and typically much larger.
        return Some(thresholds.ffi_max_parameters);
    }
    let mut limit = thresholds.max_parameters;
    if is_test {
        limit += rules.test_parameter_offset;
    }
    Some(limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringProfile;
    use std::path::PathBuf;

    fn profile() -> ScoringProfile {
        ScoringProfile::default()
    }

    fn func(name: &str) -> FunctionRecord {
        FunctionRecord {
            name: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_context_matcher_test_paths() {
        let profile = profile();
        let matcher = ContextMatcher::new(&profile);

        let unit = AnalyzedUnit {
            path: PathBuf::from("internal/order/order_test.go"),
            ..Default::default()
        };
        assert!(matcher.context(&unit).is_test);

        let unit = AnalyzedUnit {
            path: PathBuf::from("internal/order/order.go"),
            ..Default::default()
        };
        assert!(!matcher.context(&unit).is_test);
    }

    #[test]
    fn test_context_matcher_generated_flag_wins() {
        let profile = profile();
        let matcher = ContextMatcher::new(&profile);
        let unit = AnalyzedUnit {
            path: PathBuf::from("internal/order/order.go"),
            is_generated: true,
            ..Default::default()
        };
        let ctx = matcher.context(&unit);
        assert!(ctx.is_generated);
        assert!(!ctx.is_scored());
    }

    #[test]
    fn test_generated_path_pattern() {
        let profile = profile();
        let matcher = ContextMatcher::new(&profile);
        let unit = AnalyzedUnit {
            path: PathBuf::from("api/service.pb.go"),
            ..Default::default()
        };
        assert!(matcher.context(&unit).is_generated);
    }

    #[test]
    fn test_test_context_doubles_size_threshold() {
        let p = profile();
        let f = func("TestScore");
        let base = function_size_threshold(&f, false, &p.thresholds, &p.exemptions);
        let test = function_size_threshold(&f, true, &p.thresholds, &p.exemptions);
        assert_eq!(base, 60.0);
        assert_eq!(test, 120.0);
    }

    #[test]
    fn test_template_multiplier_applies_regardless_of_test_context() {
        let p = profile();
        let mut f = func("RenderReport");
        f.literal_ratio = 0.9;
        assert_eq!(
            function_size_threshold(&f, false, &p.thresholds, &p.exemptions),
            300.0
        );
        // In test context the multipliers stack.
        assert_eq!(
            function_size_threshold(&f, true, &p.thresholds, &p.exemptions),
            600.0
        );
    }

    #[test]
    fn test_data_heavy_test_gets_template_multiplier() {
        let p = profile();
        let mut f = func("TestCases");
        f.max_nesting = 2;
        f.max_bool_ops = 1;
        assert_eq!(
            function_size_threshold(&f, true, &p.thresholds, &p.exemptions),
            600.0
        );
        // Outside test context the same shape gets no leniency.
        assert_eq!(
            function_size_threshold(&f, false, &p.thresholds, &p.exemptions),
            60.0
        );
    }

    #[test]
    fn test_switch_dispatch_exempts_cognitive() {
        let p = profile();
        let mut f = func("Dispatch");
        f.max_case_arms = 12;
        f.avg_case_arm_lines = 2.0;
        f.cognitive = 90;
        assert!(is_switch_dispatch(&f, &p.exemptions));
        assert!(cognitive_threshold(&f, false, &p.thresholds, &p.exemptions).is_none());
        // Size still scored, with the template multiplier.
        assert_eq!(
            function_size_threshold(&f, false, &p.thresholds, &p.exemptions),
            300.0
        );
    }

    #[test]
    fn test_few_long_arms_are_not_dispatch() {
        let p = profile();
        let mut f = func("Process");
        f.max_case_arms = 12;
        f.avg_case_arm_lines = 8.0;
        assert!(!is_switch_dispatch(&f, &p.exemptions));
    }

    #[test]
    fn test_ffi_unit_raises_parameter_ceiling() {
        let p = profile();
        let f = func("Bind");
        let unit = AnalyzedUnit {
            has_ffi_boundary: true,
            ..Default::default()
        };
        assert_eq!(
            parameter_threshold(&f, &unit, false, &p.thresholds, &p.exemptions),
            Some(12.0)
        );
    }

    #[test]
    fn test_name_prefix_exempts_parameters_only() {
        let p = profile();
        let f = func("ReconstructOrder");
        let unit = AnalyzedUnit::default();
        assert_eq!(
            parameter_threshold(&f, &unit, false, &p.thresholds, &p.exemptions),
            None
        );
        // Never exempt from other metrics.
        assert_eq!(
            function_size_threshold(&f, false, &p.thresholds, &p.exemptions),
            60.0
        );
    }

    #[test]
    fn test_cognitive_offset_in_test_context() {
        let p = profile();
        let f = func("TestThing");
        assert_eq!(
            cognitive_threshold(&f, true, &p.thresholds, &p.exemptions),
            Some(20.0)
        );
        assert_eq!(
            nesting_threshold(true, &p.thresholds, &p.exemptions),
            5.0
        );
    }
}
