//! System-wide default constants.
//!
//! Centralises magic numbers shared by the config layer, the engine and the CLI.

// ============================================================================
// Config Loading
// ============================================================================

/// Environment variable holding an explicit config path.
pub const CONFIG_ENV_VAR: &str = "PUMPFRONT_CONFIG";

/// Config file searched in the working directory.
pub const CONFIG_FILE_NAME: &str = "station_config.toml";

// ============================================================================
// Sampling
// ============================================================================

/// Population size when none is requested.
pub const DEFAULT_SOLUTIONS: usize = 1_000;

/// Smallest population the engine will generate.
pub const MIN_SOLUTIONS: usize = 1;

/// Largest population the engine will generate.
///
/// Cost is linear in the population size.
pub const MAX_SOLUTIONS: usize = 10_000;

/// Waypoints in a transition path (baseline and target included).
pub const PATH_STEPS: usize = 15;

// ============================================================================
// Recommendations
// ============================================================================

/// A maximised criterion at or above this share of its upper bound is "near maximum".
pub const NEAR_MAX_RATIO: f64 = 0.95;

/// A minimised criterion at or below this multiple of its lower bound is "near minimum".
pub const NEAR_MIN_RATIO: f64 = 1.05;

/// System efficiency (%) below which a low-efficiency warning is raised.
pub const LOW_EFFICIENCY_PERCENT: f64 = 70.0;

/// System efficiency (%) above which the system is reported as healthy.
pub const HIGH_EFFICIENCY_PERCENT: f64 = 90.0;

/// Throughput (m³/h) below which a low-throughput warning is raised.
pub const LOW_THROUGHPUT: f64 = 10.0;

/// Rated pump efficiency (%) below which an upgrade is suggested.
pub const PUMP_EFFICIENCY_UPGRADE_PERCENT: f64 = 90.0;

/// Suggested efficiency gain factor for a pump upgrade.
pub const PUMP_EFFICIENCY_UPGRADE_FACTOR: f64 = 1.15;

/// Required pressure margin of a pump over the outlet pressure.
pub const PUMP_PRESSURE_MARGIN: f64 = 1.1;

/// Relative gap to the required productivity treated as "on target".
pub const TARGET_TOLERANCE: f64 = 0.05;
