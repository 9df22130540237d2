//! Scoring profile: every tunable the engine consumes, threaded explicitly
//! through each call so multiple profiles and runs never interfere.
//!
//! Loads from `repogauge.toml` or `.repogaugerc.json` in the repository
//! root; every field has a documented default so a partial (or absent) file
//! works. Non-positive thresholds fall back to their defaults at validation
//! time instead of producing NaN or negative credit.
//!
//! # Configuration Format
//!
//! ```toml
//! # repogauge.toml
//!
//! [thresholds]
//! max_function_lines = 60
//! max_cognitive = 15
//!
//! [duplication]
//! clone_window = 50
//! max_duplication_percent = 5.0
//!
//! [weights]
//! code_health = 0.40
//! discoverability = 0.25
//! architecture = 0.35
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while loading a profile file.
///
/// Scorers themselves never fail; this covers only the optional file-loading
/// path.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML profile: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON profile: {0}")]
    Json(#[from] serde_json::Error),
}

/// Naming convention expected of exported function identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NamingMode {
    /// PascalCase exported identifiers (default; matches the exported-name
    /// convention of the corpus the thresholds were calibrated on)
    #[default]
    Pascal,
    /// camelCase identifiers
    Camel,
    /// snake_case identifiers
    Snake,
}

impl NamingMode {
    /// Whether an identifier conforms to this mode
    pub fn matches(&self, name: &str) -> bool {
        let mut chars = name.chars();
        let first = match chars.next() {
            Some(c) => c,
            None => return false,
        };
        match self {
            NamingMode::Pascal => first.is_ascii_uppercase() && !name.contains('_'),
            NamingMode::Camel => first.is_ascii_lowercase() && !name.contains('_'),
            NamingMode::Snake => !name.chars().any(|c| c.is_ascii_uppercase()),
        }
    }
}

/// Per-metric thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct Thresholds {
    /// Maximum function body lines before credit decays (default: 60)
    #[serde(default = "default_max_function_lines")]
    pub max_function_lines: f64,

    /// Maximum unit lines (default: 500)
    #[serde(default = "default_max_file_lines")]
    pub max_file_lines: f64,

    /// Maximum cognitive complexity per function (default: 15)
    #[serde(default = "default_max_cognitive")]
    pub max_cognitive: f64,

    /// Maximum nesting depth per function (default: 4)
    #[serde(default = "default_max_nesting")]
    pub max_nesting: f64,

    /// Maximum parameters per function (default: 5)
    #[serde(default = "default_max_parameters")]
    pub max_parameters: f64,

    /// Parameter ceiling for FFI-boundary units (default: 12)
    #[serde(default = "default_ffi_max_parameters")]
    pub ffi_max_parameters: f64,

    /// Maximum global mutable bindings per unit (default: 2)
    #[serde(default = "default_max_global_mutables")]
    pub max_global_mutables: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_function_lines: default_max_function_lines(),
            max_file_lines: default_max_file_lines(),
            max_cognitive: default_max_cognitive(),
            max_nesting: default_max_nesting(),
            max_parameters: default_max_parameters(),
            ffi_max_parameters: default_ffi_max_parameters(),
            max_global_mutables: default_max_global_mutables(),
        }
    }
}

fn default_max_function_lines() -> f64 {
    60.0
}
fn default_max_file_lines() -> f64 {
    500.0
}
fn default_max_cognitive() -> f64 {
    15.0
}
fn default_max_nesting() -> f64 {
    4.0
}
fn default_max_parameters() -> f64 {
    5.0
}
fn default_ffi_max_parameters() -> f64 {
    12.0
}
fn default_max_global_mutables() -> f64 {
    2.0
}

/// Exemption policy data, applied before credit computation
#[derive(Debug, Clone, Deserialize)]
pub struct ExemptionRules {
    /// Regex patterns marking test-context unit paths
    #[serde(default = "default_test_path_patterns")]
    pub test_path_patterns: Vec<String>,

    /// Regex patterns marking generated unit paths, in addition to the
    /// upstream generated flag
    #[serde(default = "default_generated_path_patterns")]
    pub generated_path_patterns: Vec<String>,

    /// Function-name prefixes granted full credit on the parameter metric
    /// only (reconstruction-style factories)
    #[serde(default = "default_param_exempt_prefixes")]
    pub param_exempt_prefixes: Vec<String>,

    /// String-literal dominance ratio above which a function counts as a
    /// template (default: 0.8)
    #[serde(default = "default_template_literal_cutoff")]
    pub template_literal_cutoff: f64,

    /// Size-threshold multiplier for template-shaped functions (default: 5)
    #[serde(default = "default_template_multiplier")]
    pub template_multiplier: f64,

    /// Size-threshold multiplier for test-context units (default: 2)
    #[serde(default = "default_test_size_multiplier")]
    pub test_size_multiplier: f64,

    /// Nesting-depth allowance added in test context (default: 1)
    #[serde(default = "default_test_nesting_offset")]
    pub test_nesting_offset: f64,

    /// Parameter allowance added in test context (default: 2)
    #[serde(default = "default_test_parameter_offset")]
    pub test_parameter_offset: f64,

    /// Cognitive-complexity allowance added in test context (default: 5)
    #[serde(default = "default_test_cognitive_offset")]
    pub test_cognitive_offset: f64,

    /// Minimum case arms for switch-dispatch detection (default: 10)
    #[serde(default = "default_dispatch_min_arms")]
    pub dispatch_min_arms: u32,

    /// Maximum average lines per arm for switch-dispatch detection
    /// (default: 3)
    #[serde(default = "default_dispatch_max_arm_lines")]
    pub dispatch_max_arm_lines: f64,
}

impl Default for ExemptionRules {
    fn default() -> Self {
        Self {
            test_path_patterns: default_test_path_patterns(),
            generated_path_patterns: default_generated_path_patterns(),
            param_exempt_prefixes: default_param_exempt_prefixes(),
            template_literal_cutoff: default_template_literal_cutoff(),
            template_multiplier: default_template_multiplier(),
            test_size_multiplier: default_test_size_multiplier(),
            test_nesting_offset: default_test_nesting_offset(),
            test_parameter_offset: default_test_parameter_offset(),
            test_cognitive_offset: default_test_cognitive_offset(),
            dispatch_min_arms: default_dispatch_min_arms(),
            dispatch_max_arm_lines: default_dispatch_max_arm_lines(),
        }
    }
}

fn default_test_path_patterns() -> Vec<String> {
    vec![
        r"(^|/)tests?/".to_string(),
        r"_test\.[a-z]+$".to_string(),
        r"\.test\.[a-z]+$".to_string(),
        r"\.spec\.[a-z]+$".to_string(),
        r"(^|/)testdata/".to_string(),
    ]
}
fn default_generated_path_patterns() -> Vec<String> {
    vec![
        r"\.gen\.[a-z]+$".to_string(),
        r"\.pb\.[a-z]+$".to_string(),
        r"_generated\.[a-z]+$".to_string(),
    ]
}
fn default_param_exempt_prefixes() -> Vec<String> {
    vec![
        "Reconstruct".to_string(),
        "Rehydrate".to_string(),
        "Restore".to_string(),
    ]
}
fn default_template_literal_cutoff() -> f64 {
    0.8
}
fn default_template_multiplier() -> f64 {
    5.0
}
fn default_test_size_multiplier() -> f64 {
    2.0
}
fn default_test_nesting_offset() -> f64 {
    1.0
}
fn default_test_parameter_offset() -> f64 {
    2.0
}
fn default_test_cognitive_offset() -> f64 {
    5.0
}
fn default_dispatch_min_arms() -> u32 {
    10
}
fn default_dispatch_max_arm_lines() -> f64 {
    3.0
}

/// Duplicate-detector configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DuplicationConfig {
    /// Clone window size in tokens (default: 50)
    #[serde(default = "default_clone_window")]
    pub clone_window: usize,

    /// Duplication percentage before credit decays (default: 5.0)
    #[serde(default = "default_max_duplication_percent")]
    pub max_duplication_percent: f64,

    /// Duplication-threshold multiplier for test-context units (default: 2)
    #[serde(default = "default_dup_test_multiplier")]
    pub test_threshold_multiplier: f64,
}

impl Default for DuplicationConfig {
    fn default() -> Self {
        Self {
            clone_window: default_clone_window(),
            max_duplication_percent: default_max_duplication_percent(),
            test_threshold_multiplier: default_dup_test_multiplier(),
        }
    }
}

fn default_clone_window() -> usize {
    50
}
fn default_max_duplication_percent() -> f64 {
    5.0
}
fn default_dup_test_multiplier() -> f64 {
    2.0
}

/// Graph-weighting knobs
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    /// Weight of the cycle signal in the composite graph score (default: 40)
    #[serde(default = "default_cycle_weight")]
    pub cycle_weight: f64,

    /// Weight of the main-sequence distance signal (default: 36)
    #[serde(default = "default_distance_weight")]
    pub distance_weight: f64,

    /// Weight of the coupling-balance signal (default: 24)
    #[serde(default = "default_coupling_weight")]
    pub coupling_weight: f64,

    /// Average distance-from-main-sequence treated as a zero-credit ceiling
    /// (default: 0.5)
    #[serde(default = "default_max_avg_distance")]
    pub max_avg_distance: f64,

    /// A node is a coupling outlier when Ce exceeds median × multiplier
    /// (default: 2.0)
    #[serde(default = "default_outlier_multiplier")]
    pub outlier_multiplier: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            cycle_weight: default_cycle_weight(),
            distance_weight: default_distance_weight(),
            coupling_weight: default_coupling_weight(),
            max_avg_distance: default_max_avg_distance(),
            outlier_multiplier: default_outlier_multiplier(),
        }
    }
}

fn default_cycle_weight() -> f64 {
    40.0
}
fn default_distance_weight() -> f64 {
    36.0
}
fn default_coupling_weight() -> f64 {
    24.0
}
fn default_max_avg_distance() -> f64 {
    0.5
}
fn default_outlier_multiplier() -> f64 {
    2.0
}

/// Curated hint vocabularies and path lists.
///
/// Calibrated against a specific benchmark corpus; treat as replaceable
/// configuration data, not invariant logic.
#[derive(Debug, Clone, Deserialize)]
pub struct Vocabulary {
    #[serde(default)]
    pub naming_mode: NamingMode,

    /// Suffixes an interface-like name is expected to carry
    #[serde(default = "default_expected_suffixes")]
    pub expected_suffixes: Vec<String>,

    /// Directory segments hinting at the Core role
    #[serde(default = "default_core_hints")]
    pub core_hints: Vec<String>,

    /// Directory segments hinting at the Adapter role
    #[serde(default = "default_adapter_hints")]
    pub adapter_hints: Vec<String>,

    /// Directory segments hinting at the Ports role
    #[serde(default = "default_ports_hints")]
    pub ports_hints: Vec<String>,

    /// Directory segments hinting at the Orchestrator role
    #[serde(default = "default_orchestrator_hints")]
    pub orchestrator_hints: Vec<String>,

    /// Directory segments marking inbound adapters
    #[serde(default = "default_inbound_hints")]
    pub inbound_hints: Vec<String>,

    /// Directory segments marking outbound adapters
    #[serde(default = "default_outbound_hints")]
    pub outbound_hints: Vec<String>,

    /// External import fragments marking low-level I/O
    #[serde(default = "default_io_import_hints")]
    pub io_import_hints: Vec<String>,

    /// Parameter-type fragments marking I/O-shaped signatures
    #[serde(default = "default_io_param_hints")]
    pub io_param_hints: Vec<String>,

    /// Map from project-specific directory segment to canonical hint
    #[serde(default)]
    pub layer_aliases: BTreeMap<String, String>,

    /// Path prefixes of designated composition roots (bootstrap wiring),
    /// exempt from the adapter-to-adapter rule
    #[serde(default = "default_composition_roots")]
    pub composition_roots: Vec<String>,

    /// Directory segments marking executable entry points
    #[serde(default = "default_entry_dirs")]
    pub entry_dirs: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            naming_mode: NamingMode::default(),
            expected_suffixes: default_expected_suffixes(),
            core_hints: default_core_hints(),
            adapter_hints: default_adapter_hints(),
            ports_hints: default_ports_hints(),
            orchestrator_hints: default_orchestrator_hints(),
            inbound_hints: default_inbound_hints(),
            outbound_hints: default_outbound_hints(),
            io_import_hints: default_io_import_hints(),
            io_param_hints: default_io_param_hints(),
            layer_aliases: BTreeMap::new(),
            composition_roots: default_composition_roots(),
            entry_dirs: default_entry_dirs(),
        }
    }
}

fn default_expected_suffixes() -> Vec<String> {
    [
        "er", "Service", "Handler", "Repository", "Store", "Client", "Port", "Provider",
        "Gateway",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_core_hints() -> Vec<String> {
    ["domain", "model", "models", "entity", "entities", "core"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_adapter_hints() -> Vec<String> {
    [
        "handler", "handlers", "adapter", "adapters", "infra", "infrastructure", "http", "grpc",
        "rest", "db", "database", "storage", "repository", "repositories", "client", "clients",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_ports_hints() -> Vec<String> {
    ["port", "ports", "contract", "contracts"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_orchestrator_hints() -> Vec<String> {
    ["service", "services", "usecase", "usecases", "app", "application"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_inbound_hints() -> Vec<String> {
    ["handler", "handlers", "http", "grpc", "rest", "api", "controller", "controllers"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_outbound_hints() -> Vec<String> {
    [
        "db", "database", "storage", "repository", "repositories", "client", "clients",
        "gateway", "gateways",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_io_import_hints() -> Vec<String> {
    [
        "net/http", "net/", "database/sql", "os", "io/", "syscall", "bufio",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_io_param_hints() -> Vec<String> {
    [
        "http.ResponseWriter", "http.Request", "sql.DB", "sql.Tx", "net.Conn", "io.Reader",
        "io.Writer",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_composition_roots() -> Vec<String> {
    ["cmd", "internal/bootstrap"].iter().map(|s| s.to_string()).collect()
}
fn default_entry_dirs() -> Vec<String> {
    ["cmd", "bin"].iter().map(|s| s.to_string()).collect()
}

/// Fixed confidences of the individual role signals
#[derive(Debug, Clone, Deserialize)]
pub struct SignalConfidences {
    /// Naming signal confidence for non-entry roles (default: 0.60)
    #[serde(default = "default_naming_confidence")]
    pub naming: f64,

    /// Naming signal confidence for entry-point directories (default: 0.80)
    #[serde(default = "default_naming_entry_confidence")]
    pub naming_entry: f64,

    /// Low-level I/O import present → Adapter (default: 0.70)
    #[serde(default = "default_adapter_io_confidence")]
    pub adapter_io: f64,

    /// Interfaces with no internal imports → Core (default: 0.65)
    #[serde(default = "default_core_pure_confidence")]
    pub core_pure: f64,

    /// Interfaces with some internal imports → Core (default: 0.55)
    #[serde(default = "default_core_mixed_confidence")]
    pub core_mixed: f64,

    /// Entry point present → EntryPoint (default: 0.95)
    #[serde(default = "default_entry_confidence")]
    pub entry: f64,

    /// I/O-shaped parameter present → Adapter (default: 0.75)
    #[serde(default = "default_adapter_param_confidence")]
    pub adapter_param: f64,

    /// High interface-to-concrete ratio → Ports (default: 0.70)
    #[serde(default = "default_ports_ratio_confidence")]
    pub ports_ratio: f64,

    /// Interface share of declared types counting as "high" (default: 0.75)
    #[serde(default = "default_ports_ratio_cutoff")]
    pub ports_ratio_cutoff: f64,
}

impl Default for SignalConfidences {
    fn default() -> Self {
        Self {
            naming: default_naming_confidence(),
            naming_entry: default_naming_entry_confidence(),
            adapter_io: default_adapter_io_confidence(),
            core_pure: default_core_pure_confidence(),
            core_mixed: default_core_mixed_confidence(),
            entry: default_entry_confidence(),
            adapter_param: default_adapter_param_confidence(),
            ports_ratio: default_ports_ratio_confidence(),
            ports_ratio_cutoff: default_ports_ratio_cutoff(),
        }
    }
}

fn default_naming_confidence() -> f64 {
    0.60
}
fn default_naming_entry_confidence() -> f64 {
    0.80
}
fn default_adapter_io_confidence() -> f64 {
    0.70
}
fn default_core_pure_confidence() -> f64 {
    0.65
}
fn default_core_mixed_confidence() -> f64 {
    0.55
}
fn default_entry_confidence() -> f64 {
    0.95
}
fn default_adapter_param_confidence() -> f64 {
    0.75
}
fn default_ports_ratio_confidence() -> f64 {
    0.70
}
fn default_ports_ratio_cutoff() -> f64 {
    0.75
}

/// Calibration constants, tuned against a benchmark corpus.
///
/// k=4 puts zero credit at 5× threshold; scale=120 makes a 6% debt ratio
/// cost about 7 points. Replaceable data, not hard logic.
#[derive(Debug, Clone, Deserialize)]
pub struct Calibration {
    /// Decay span constant k; credit reaches zero at threshold × (k+1)
    #[serde(default = "default_decay_span")]
    pub decay_span: f64,

    /// Debt-ratio → penalty-points scale (default: 120)
    #[serde(default = "default_penalty_scale")]
    pub penalty_scale: f64,

    /// value/threshold ratio at or above which an issue is an error
    /// (default: 3.0)
    #[serde(default = "default_error_ratio")]
    pub error_ratio: f64,

    /// value/threshold ratio at or above which an issue is a warning
    /// (default: 1.5)
    #[serde(default = "default_warning_ratio")]
    pub warning_ratio: f64,

    /// Severity weight of error issues (default: 3.0)
    #[serde(default = "default_error_weight")]
    pub error_weight: f64,

    /// Severity weight of warning issues (default: 1.0)
    #[serde(default = "default_warning_weight")]
    pub warning_weight: f64,

    /// Severity weight of info issues (default: 0.2)
    #[serde(default = "default_info_weight")]
    pub info_weight: f64,

    /// Role signals below this confidence are discarded (default: 0.30)
    #[serde(default = "default_confidence_floor")]
    pub confidence_floor: f64,

    /// Confidence bonus when another signal corroborates the top role
    /// (default: 0.10, capped at 1.0)
    #[serde(default = "default_corroboration_bonus")]
    pub corroboration_bonus: f64,

    /// Node counts as clearly classified at or above this confidence
    /// (default: 0.50)
    #[serde(default = "default_clarity_floor")]
    pub clarity_floor: f64,

    #[serde(default)]
    pub signals: SignalConfidences,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            decay_span: default_decay_span(),
            penalty_scale: default_penalty_scale(),
            error_ratio: default_error_ratio(),
            warning_ratio: default_warning_ratio(),
            error_weight: default_error_weight(),
            warning_weight: default_warning_weight(),
            info_weight: default_info_weight(),
            confidence_floor: default_confidence_floor(),
            corroboration_bonus: default_corroboration_bonus(),
            clarity_floor: default_clarity_floor(),
            signals: SignalConfidences::default(),
        }
    }
}

fn default_decay_span() -> f64 {
    4.0
}
fn default_penalty_scale() -> f64 {
    120.0
}
fn default_error_ratio() -> f64 {
    3.0
}
fn default_warning_ratio() -> f64 {
    1.5
}
fn default_error_weight() -> f64 {
    3.0
}
fn default_warning_weight() -> f64 {
    1.0
}
fn default_info_weight() -> f64 {
    0.2
}
fn default_confidence_floor() -> f64 {
    0.30
}
fn default_corroboration_bonus() -> f64 {
    0.10
}
fn default_clarity_floor() -> f64 {
    0.50
}

/// Relative weights of the scored categories
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryWeights {
    /// Weight for the Code Health category (default: 0.40)
    #[serde(default = "default_code_health_weight")]
    pub code_health: f64,

    /// Weight for the Discoverability category (default: 0.25)
    #[serde(default = "default_discoverability_weight")]
    pub discoverability: f64,

    /// Weight for the Architecture category (default: 0.35)
    #[serde(default = "default_architecture_weight")]
    pub architecture: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            code_health: default_code_health_weight(),
            discoverability: default_discoverability_weight(),
            architecture: default_architecture_weight(),
        }
    }
}

fn default_code_health_weight() -> f64 {
    0.40
}
fn default_discoverability_weight() -> f64 {
    0.25
}
fn default_architecture_weight() -> f64 {
    0.35
}

impl CategoryWeights {
    /// Validate that weights sum to 1.0 (with tolerance)
    pub fn is_valid(&self) -> bool {
        let sum = self.code_health + self.discoverability + self.architecture;
        (sum - 1.0).abs() < 0.001
    }

    /// Normalize weights to sum to 1.0
    pub fn normalize(&mut self) {
        let sum = self.code_health + self.discoverability + self.architecture;
        if sum > 0.0 {
            self.code_health /= sum;
            self.discoverability /= sum;
            self.architecture /= sum;
        }
    }
}

/// Immutable scoring configuration threaded through every scorer
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ScoringProfile {
    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub exemptions: ExemptionRules,

    #[serde(default)]
    pub duplication: DuplicationConfig,

    #[serde(default)]
    pub graph: GraphConfig,

    #[serde(default)]
    pub vocabulary: Vocabulary,

    #[serde(default)]
    pub calibration: Calibration,

    #[serde(default)]
    pub weights: CategoryWeights,
}

impl ScoringProfile {
    /// Return a copy with every non-positive threshold replaced by its
    /// documented default, so downstream arithmetic never sees zero or
    /// negative denominators.
    pub fn validated(&self) -> Self {
        let mut profile = self.clone();

        fix(&mut profile.thresholds.max_function_lines, default_max_function_lines(), "thresholds.max_function_lines");
        fix(&mut profile.thresholds.max_file_lines, default_max_file_lines(), "thresholds.max_file_lines");
        fix(&mut profile.thresholds.max_cognitive, default_max_cognitive(), "thresholds.max_cognitive");
        fix(&mut profile.thresholds.max_nesting, default_max_nesting(), "thresholds.max_nesting");
        fix(&mut profile.thresholds.max_parameters, default_max_parameters(), "thresholds.max_parameters");
        fix(&mut profile.thresholds.ffi_max_parameters, default_ffi_max_parameters(), "thresholds.ffi_max_parameters");
        fix(&mut profile.thresholds.max_global_mutables, default_max_global_mutables(), "thresholds.max_global_mutables");
        fix(&mut profile.duplication.max_duplication_percent, default_max_duplication_percent(), "duplication.max_duplication_percent");
        fix(&mut profile.graph.max_avg_distance, default_max_avg_distance(), "graph.max_avg_distance");
        fix(&mut profile.graph.outlier_multiplier, default_outlier_multiplier(), "graph.outlier_multiplier");
        fix(&mut profile.calibration.decay_span, default_decay_span(), "calibration.decay_span");
        fix(&mut profile.calibration.penalty_scale, default_penalty_scale(), "calibration.penalty_scale");

        if profile.duplication.clone_window == 0 {
            warn!(
                "duplication.clone_window must be positive, falling back to {}",
                default_clone_window()
            );
            profile.duplication.clone_window = default_clone_window();
        }

        if !profile.weights.is_valid() {
            profile.weights.normalize();
        }

        profile
    }
}

fn fix(value: &mut f64, fallback: f64, name: &str) {
    if *value <= 0.0 || !value.is_finite() {
        warn!("{name} must be positive, falling back to {fallback}");
        *value = fallback;
    }
}

/// Load a scoring profile from the repository root.
///
/// Searches for configuration files in this order:
/// 1. `repogauge.toml`
/// 2. `.repogaugerc.json`
///
/// Returns the default profile if no config file is found or a file fails
/// to parse.
pub fn load_profile(repo_path: &Path) -> ScoringProfile {
    let toml_path = repo_path.join("repogauge.toml");
    if toml_path.exists() {
        match load_toml_profile(&toml_path) {
            Ok(profile) => {
                debug!("Loaded scoring profile from {}", toml_path.display());
                return profile.validated();
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    let json_path = repo_path.join(".repogaugerc.json");
    if json_path.exists() {
        match load_json_profile(&json_path) {
            Ok(profile) => {
                debug!("Loaded scoring profile from {}", json_path.display());
                return profile.validated();
            }
            Err(e) => {
                warn!("Failed to load {}: {}", json_path.display(), e);
            }
        }
    }

    debug!("No scoring profile found, using defaults");
    ScoringProfile::default()
}

/// Load a profile from an explicitly named file, dispatching on extension.
///
/// Unlike [`load_profile`], a broken file here is an error rather than a
/// silent fallback — callers naming a file want to know it was bad.
pub fn load_profile_file(path: &Path) -> anyhow::Result<ScoringProfile> {
    let profile = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => load_toml_profile(path)?,
        Some("json") => load_json_profile(path)?,
        other => anyhow::bail!(
            "unsupported profile format {:?} for {} (expected .toml or .json)",
            other.unwrap_or(""),
            path.display()
        ),
    };
    Ok(profile.validated())
}

fn load_toml_profile(path: &Path) -> Result<ScoringProfile, ProfileError> {
    let content = std::fs::read_to_string(path)?;
    let profile: ScoringProfile = toml::from_str(&content)?;
    Ok(profile)
}

fn load_json_profile(path: &Path) -> Result<ScoringProfile, ProfileError> {
    let content = std::fs::read_to_string(path)?;
    let profile: ScoringProfile = serde_json::from_str(&content)?;
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_positive() {
        let profile = ScoringProfile::default();
        assert!(profile.thresholds.max_function_lines > 0.0);
        assert!(profile.thresholds.max_parameters > 0.0);
        assert!(profile.duplication.clone_window > 0);
        assert!(profile.weights.is_valid());
    }

    #[test]
    fn test_validated_replaces_bad_thresholds() {
        let mut profile = ScoringProfile::default();
        profile.thresholds.max_function_lines = -1.0;
        profile.thresholds.max_cognitive = 0.0;
        profile.duplication.clone_window = 0;

        let fixed = profile.validated();
        assert_eq!(fixed.thresholds.max_function_lines, 60.0);
        assert_eq!(fixed.thresholds.max_cognitive, 15.0);
        assert_eq!(fixed.duplication.clone_window, 50);
    }

    #[test]
    fn test_partial_toml_profile() {
        let profile: ScoringProfile = toml::from_str(
            r#"
            [thresholds]
            max_function_lines = 80

            [duplication]
            clone_window = 30
            "#,
        )
        .unwrap();

        assert_eq!(profile.thresholds.max_function_lines, 80.0);
        assert_eq!(profile.duplication.clone_window, 30);
        // Untouched sections keep their defaults
        assert_eq!(profile.thresholds.max_parameters, 5.0);
        assert_eq!(profile.calibration.penalty_scale, 120.0);
    }

    #[test]
    fn test_load_profile_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let profile = load_profile(dir.path());
        assert_eq!(profile.duplication.clone_window, 50);
    }

    #[test]
    fn test_load_profile_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("repogauge.toml"),
            "[thresholds]\nmax_parameters = 7\n",
        )
        .unwrap();

        let profile = load_profile(dir.path());
        assert_eq!(profile.thresholds.max_parameters, 7.0);
    }

    #[test]
    fn test_load_profile_file_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.yaml");
        std::fs::write(&path, "thresholds: {}\n").unwrap();
        assert!(load_profile_file(&path).is_err());
    }

    #[test]
    fn test_load_profile_file_surfaces_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.toml");
        std::fs::write(&path, "not [valid toml").unwrap();
        assert!(load_profile_file(&path).is_err());
    }

    #[test]
    fn test_naming_mode_matching() {
        assert!(NamingMode::Pascal.matches("ScoreRepository"));
        assert!(!NamingMode::Pascal.matches("score_repository"));
        assert!(NamingMode::Snake.matches("score_repository"));
        assert!(!NamingMode::Snake.matches("ScoreRepository"));
        assert!(NamingMode::Camel.matches("scoreRepository"));
        assert!(!NamingMode::Camel.matches("Score_repository"));
    }

    #[test]
    fn test_weights_normalize() {
        let mut weights = CategoryWeights {
            code_health: 2.0,
            discoverability: 1.0,
            architecture: 1.0,
        };
        assert!(!weights.is_valid());
        weights.normalize();
        assert!(weights.is_valid());
        assert!((weights.code_health - 0.5).abs() < 1e-9);
    }
}
