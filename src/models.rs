//! Core data models for Repogauge
//!
//! These models are used throughout the engine for representing analyzed
//! source units, scoring results, and issues. Inputs (`AnalyzedUnit` and
//! friends) are produced by upstream collaborators and treated as immutable
//! snapshots; outputs (`CategoryScore`, `Issue`) carry enough structure for
//! a report renderer to group and format them.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// Generate a deterministic issue ID based on content hash.
///
/// Stable IDs across runs enable tracking issues over time, suppression by
/// ID in config files, and reliable deduplication. The ID is a 16-character
/// hex string derived from hashing the metric tag, file path, line, and
/// message.
pub fn deterministic_issue_id(metric: &str, file: &str, line: u32, message: &str) -> String {
    // DefaultHasher is intentionally not stable across compiler versions,
    // so hash with sha2 instead.
    let input = format!("{metric}\n{file}\n{line}\n{message}");
    let digest = Sha256::digest(input.as_bytes());
    let mut id = String::with_capacity(16);
    for byte in digest.iter().take(8) {
        id.push_str(&format!("{:02x}", byte));
    }
    id
}

/// Severity levels for issues
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// An actionable issue attached to a category score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Issue {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub severity: Severity,
    /// Category the issue was filed under (e.g. "code-health")
    #[serde(default)]
    pub category: String,
    /// Sub-metric tag (e.g. "function-size")
    #[serde(default)]
    pub metric: String,
    #[serde(default)]
    pub file: PathBuf,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub message: String,
    /// Classification pattern tag for grouping in reports
    #[serde(default)]
    pub pattern: String,
}

impl Issue {
    pub fn new(
        severity: Severity,
        category: &str,
        metric: &str,
        file: PathBuf,
        line: Option<u32>,
        message: String,
        pattern: &str,
    ) -> Self {
        let id = deterministic_issue_id(
            metric,
            &file.to_string_lossy(),
            line.unwrap_or(0),
            &message,
        );
        Self {
            id,
            severity,
            category: category.to_string(),
            metric: metric.to_string(),
            file,
            line,
            message,
            pattern: pattern.to_string(),
        }
    }
}

/// One scored dimension inside a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubMetric {
    pub name: String,
    /// Maximum points this sub-metric can contribute
    pub points: f64,
    /// Awarded score, always within [0, points]
    pub score: f64,
    /// Human-readable summary of what was measured
    pub detail: String,
}

/// Score for one category: sum of sub-metric scores minus the severity
/// penalty, clamped into [0, 100].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScore {
    pub name: String,
    /// Relative weight of this category in the composite score
    pub weight: f64,
    pub score: f64,
    pub sub_metrics: Vec<SubMetric>,
    pub issues: Vec<Issue>,
    /// Points deducted by the severity penalty
    pub penalty: f64,
}

impl CategoryScore {
    /// Assemble a category from its sub-metrics and issues.
    ///
    /// `penalty` has already been computed from the issue list; the total is
    /// clamped into [0, 100] regardless of intermediate arithmetic.
    pub fn assemble(
        name: &str,
        weight: f64,
        sub_metrics: Vec<SubMetric>,
        issues: Vec<Issue>,
        penalty: f64,
    ) -> Self {
        let raw: f64 = sub_metrics.iter().map(|m| m.score).sum();
        let score = (raw - penalty).clamp(0.0, 100.0);
        Self {
            name: name.to_string(),
            weight,
            score,
            sub_metrics,
            issues,
            penalty,
        }
    }

    /// Summary counts by severity
    pub fn issue_summary(&self) -> (usize, usize, usize) {
        let mut counts = (0usize, 0usize, 0usize);
        for issue in &self.issues {
            match issue.severity {
                Severity::Error => counts.0 += 1,
                Severity::Warning => counts.1 += 1,
                Severity::Info => counts.2 += 1,
            }
        }
        counts
    }
}

/// An interface-like contract declared in a unit
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InterfaceContract {
    pub name: String,
    /// Method names the contract requires
    #[serde(default)]
    pub methods: Vec<String>,
}

/// A global mutable binding declared at unit scope
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GlobalBinding {
    pub name: String,
    #[serde(default)]
    pub line: u32,
}

/// A declared function inside an analyzed unit
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FunctionRecord {
    pub name: String,
    #[serde(default)]
    pub exported: bool,
    /// Receiver type; empty for free functions
    #[serde(default)]
    pub receiver: String,
    #[serde(default)]
    pub line_start: u32,
    #[serde(default)]
    pub line_end: u32,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub returns: Vec<String>,
    #[serde(default)]
    pub max_nesting: u32,
    #[serde(default)]
    pub max_bool_ops: u32,
    /// Cognitive-complexity score computed upstream
    #[serde(default)]
    pub cognitive: u32,
    /// Fraction of the body dominated by string literals, in [0, 1]
    #[serde(default)]
    pub literal_ratio: f64,
    /// Largest case-arm count of any switch-like construct in the body
    #[serde(default)]
    pub max_case_arms: u32,
    /// Average lines per case arm of that construct
    #[serde(default)]
    pub avg_case_arm_lines: f64,
}

impl FunctionRecord {
    /// Line span of the function body
    pub fn line_span(&self) -> u32 {
        self.line_end.saturating_sub(self.line_start).max(1)
    }

    /// Free function (no receiver)
    pub fn is_free(&self) -> bool {
        self.receiver.is_empty()
    }
}

/// One analyzed source unit, produced upstream and never mutated here
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalyzedUnit {
    pub path: PathBuf,
    /// Package identifier (import path) the unit belongs to
    #[serde(default)]
    pub package: String,
    /// Imports resolved as internal to the analyzed project
    #[serde(default)]
    pub internal_imports: Vec<String>,
    /// Imports resolved as third-party or standard library
    #[serde(default)]
    pub external_imports: Vec<String>,
    #[serde(default)]
    pub functions: Vec<FunctionRecord>,
    /// Names of concrete type declarations
    #[serde(default)]
    pub concrete_types: Vec<String>,
    /// Interface-like contracts declared in the unit
    #[serde(default)]
    pub interfaces: Vec<InterfaceContract>,
    #[serde(default)]
    pub global_mutables: Vec<GlobalBinding>,
    /// Machine-generated unit; excluded from every metric and issue
    #[serde(default)]
    pub is_generated: bool,
    /// Unit declares a foreign-function import
    #[serde(default)]
    pub has_ffi_boundary: bool,
    /// Normalized integer token stream; identical integers denote identical
    /// normalized tokens
    #[serde(default)]
    pub tokens: Vec<u32>,
    #[serde(default)]
    pub line_count: usize,
}

impl AnalyzedUnit {
    /// Containing directory, used as the unit's graph-node key
    pub fn directory(&self) -> String {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                parent.to_string_lossy().replace('\\', "/")
            }
            _ => ".".to_string(),
        }
    }

    /// Whether the unit declares an executable entry point
    pub fn has_entry_point(&self) -> bool {
        self.functions
            .iter()
            .any(|f| f.name == "main" && f.is_free())
    }
}
