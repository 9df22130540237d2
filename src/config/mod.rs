//! Configuration module for Repogauge
//!
//! This module handles:
//! - The `ScoringProfile` threaded explicitly through every scorer
//! - Threshold validation with documented-default fallback
//! - Loading profiles from `repogauge.toml` / `.repogaugerc.json`

mod profile;

pub use profile::{
    Calibration, CategoryWeights, DuplicationConfig, ExemptionRules, GraphConfig, NamingMode,
    ProfileError, ScoringProfile, SignalConfidences, Thresholds, Vocabulary, load_profile,
    load_profile_file,
};
