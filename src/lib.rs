//! Repogauge — repository structural-health and agent-readiness scoring.
//!
//! Scores a source repository across weighted categories (code health,
//! discoverability, architecture), producing a 0–100 composite score per
//! category plus a list of actionable issues. The engine consumes
//! pre-analyzed unit snapshots — walking the filesystem, parsing sources,
//! and rendering reports belong to upstream and downstream collaborators —
//! and performs no I/O of its own beyond optional profile loading.
//!
//! # Scoring model
//!
//! ```text
//! SubMetric = round(avg(decay_credit(value, threshold))) × points
//! Category  = clamp(Σ sub-metrics − severity_penalty, 0, 100)
//! Penalty   = round(Σ severity_weight / unit_count × scale)
//! ```
//!
//! Every per-unit metric rides the same decay primitive: full credit at or
//! under the threshold, linear decay to zero at five times the threshold.
//! Exemptions (generated units, test context, template functions, switch
//! dispatch, FFI boundaries) adjust effective thresholds before any credit
//! is computed, and the issue boundary always matches the scoring boundary.
//!
//! # Example
//!
//! ```
//! use repogauge::{score_repository, AnalyzedUnit, ScoringProfile};
//!
//! let units: Vec<AnalyzedUnit> = Vec::new(); // produced upstream
//! let profile = ScoringProfile::default();
//! let categories = score_repository(&units, &profile, "example.com/app");
//! for category in &categories {
//!     println!("{}: {:.0}/100", category.name, category.score);
//! }
//! ```

pub mod config;
pub mod duplication;
pub mod graph;
pub mod models;
pub mod roles;
pub mod scoring;

pub use config::{load_profile, load_profile_file, NamingMode, ProfileError, ScoringProfile};
pub use models::{
    AnalyzedUnit, CategoryScore, FunctionRecord, GlobalBinding, InterfaceContract, Issue,
    Severity, SubMetric,
};
pub use roles::{AnnotatedPackage, Role, RoleSignal};
pub use scoring::score_repository;
