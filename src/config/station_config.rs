//! Station Configuration - pump catalog, criteria and model tuning as TOML
//!
//! Each section implements `Default` with the built-in station values, so an
//! empty or missing file behaves exactly like the defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;
use crate::types::{Criterion, CriterionKind, EquipmentConfig, Pump};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a pumping station.
///
/// Load with `StationConfig::load()` which searches:
/// 1. `$PUMPFRONT_CONFIG` env var
/// 2. `./station_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    /// Station identification
    #[serde(default)]
    pub station: StationInfo,

    /// Pump catalog
    #[serde(default = "Pump::default_catalog")]
    pub pumps: Vec<Pump>,

    /// Sampled criteria
    #[serde(default = "Criterion::default_set")]
    pub criteria: Vec<Criterion>,

    /// Default current values; kinds left out keep their built-in value
    #[serde(default = "default_baseline", deserialize_with = "deserialize_baseline")]
    pub baseline: EquipmentConfig,

    /// Equipment model coefficients
    #[serde(default)]
    pub model: ModelCoefficients,

    /// Sampler tuning
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Required-productivity source
    #[serde(default)]
    pub forecast: ForecastConfig,
}

fn default_baseline() -> EquipmentConfig {
    EquipmentConfig::new()
        .with(CriterionKind::Pressure, 16.0)
        .with(CriterionKind::Wear, 20.0)
        .with(CriterionKind::MaintenanceCost, 500.0)
        .with(CriterionKind::Age, 5.0)
}

fn deserialize_baseline<'de, D>(deserializer: D) -> Result<EquipmentConfig, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let parsed = EquipmentConfig::deserialize(deserializer)?;
    let mut baseline = default_baseline();
    for (kind, value) in parsed.iter() {
        baseline.set(kind, value);
    }
    Ok(baseline)
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            station: StationInfo::default(),
            pumps: Pump::default_catalog(),
            criteria: Criterion::default_set(),
            baseline: default_baseline(),
            model: ModelCoefficients::default(),
            sampling: SamplingConfig::default(),
            forecast: ForecastConfig::default(),
        }
    }
}

impl StationConfig {
    /// Load configuration using the standard search order:
    /// 1. `$PUMPFRONT_CONFIG` environment variable
    /// 2. `./station_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), station = %config.station.name, "Loaded station config from PUMPFRONT_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from PUMPFRONT_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "PUMPFRONT_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from(defaults::CONFIG_FILE_NAME);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(station = %config.station.name, "Loaded station config from ./station_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./station_config.toml, using defaults");
                }
            }
        }

        info!("No station_config.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document, warning about unknown keys.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Station config saved");
        Ok(())
    }

    /// Validate internal consistency. Collects every problem before failing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        // Pumps
        let mut ids = HashSet::new();
        for pump in &self.pumps {
            if pump.id.trim().is_empty() {
                errors.push("pumps: id must not be empty".to_string());
            } else if !ids.insert(pump.id.as_str()) {
                errors.push(format!("pumps: duplicate id '{}'", pump.id));
            }
            Self::check_non_negative(pump.max_flow, &format!("pumps.{}.max_flow", pump.id), &mut errors);
            Self::check_positive(pump.max_pressure, &format!("pumps.{}.max_pressure", pump.id), &mut errors);
            Self::check_range(
                pump.rated_efficiency,
                0.0,
                100.0,
                &format!("pumps.{}.rated_efficiency", pump.id),
                &mut errors,
            );
        }

        // Criteria: each kind at most once, valid bounds
        if self.criteria.is_empty() {
            errors.push("criteria: at least one criterion is required".to_string());
        }
        let mut kinds = HashSet::new();
        for c in &self.criteria {
            if !kinds.insert(c.kind) {
                errors.push(format!("criteria: kind '{}' listed more than once", c.kind));
            }
            if let Some(b) = c.bounds {
                if !b.min.is_finite() || !b.max.is_finite() {
                    errors.push(format!("criteria.{}: bounds must be finite", c.kind));
                } else if b.min > b.max {
                    errors.push(format!(
                        "criteria.{}: bounds min ({:.3}) must be <= max ({:.3})",
                        c.kind, b.min, b.max
                    ));
                }
            }
        }

        for (kind, value) in self.baseline.iter() {
            if !value.is_finite() {
                errors.push(format!("baseline.{kind}: value must be finite (got {value})"));
            }
        }

        // Model
        let m = &self.model;
        Self::check_range(m.hydraulic_coeff, 0.0, 1.0, "model.hydraulic_coeff", &mut errors);
        Self::check_range(m.pump_efficiency_coeff, 0.0, 1.0, "model.pump_efficiency_coeff", &mut errors);
        Self::check_range(m.maintenance_impact, 0.0, 1.0, "model.maintenance_impact", &mut errors);
        Self::check_positive(m.maintenance_cost_scale, "model.maintenance_cost_scale", &mut errors);
        Self::check_positive(m.age_horizon_years, "model.age_horizon_years", &mut errors);
        Self::check_positive(m.parallel_coeff, "model.parallel_coeff", &mut errors);
        Self::check_range(m.parallel_coeff, 0.0, 1.0, "model.parallel_coeff", &mut errors);
        Self::check_range(m.pressure_derating, 0.0, 1.0, "model.pressure_derating", &mut errors);
        Self::check_non_negative(m.throughput_weight, "model.throughput_weight", &mut errors);
        Self::check_non_negative(m.efficiency_weight, "model.efficiency_weight", &mut errors);
        Self::check_non_negative(m.target_weight, "model.target_weight", &mut errors);
        Self::check_positive(m.damping, "model.damping", &mut errors);

        // Sampling
        let s = &self.sampling;
        if s.min_solutions > s.max_solutions {
            errors.push(format!(
                "sampling.min_solutions ({}) must be <= max_solutions ({})",
                s.min_solutions, s.max_solutions
            ));
        }
        if s.default_solutions < s.min_solutions || s.default_solutions > s.max_solutions {
            errors.push(format!(
                "sampling.default_solutions ({}) must lie in [{}, {}]",
                s.default_solutions, s.min_solutions, s.max_solutions
            ));
        }
        Self::check_range(s.window_fraction, 0.0, 1.0, "sampling.window_fraction", &mut errors);
        Self::check_non_negative(s.noise_fraction, "sampling.noise_fraction", &mut errors);
        Self::check_positive(s.min_std_dev, "sampling.min_std_dev", &mut errors);
        if s.path_steps < 2 {
            errors.push(format!("sampling.path_steps ({}) must be >= 2", s.path_steps));
        }

        // Forecast
        if let Some(target) = self.forecast.required_productivity {
            Self::check_positive(target, "forecast.required_productivity", &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_range(value: f64, min: f64, max: f64, name: &str, errors: &mut Vec<String>) {
        // NaN comparisons silently pass
        if !value.is_finite() {
            errors.push(format!("{name}: value must be finite (got {value})"));
        } else if value < min || value > max {
            errors.push(format!("{name} = {value:.3} is outside [{min}, {max}]"));
        }
    }

    fn check_positive(value: f64, name: &str, errors: &mut Vec<String>) {
        if !value.is_finite() || value <= 0.0 {
            errors.push(format!("{name} = {value} must be > 0"));
        }
    }

    fn check_non_negative(value: f64, name: &str, errors: &mut Vec<String>) {
        if !value.is_finite() || value < 0.0 {
            errors.push(format!("{name} = {value} must be >= 0"));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),
    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Station Info
// ============================================================================

/// Identification metadata, shown in logs and reports only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationInfo {
    #[serde(default = "default_station_name")]
    pub name: String,

    #[serde(default)]
    pub site: String,
}

fn default_station_name() -> String {
    "DEFAULT".to_string()
}

impl Default for StationInfo {
    fn default() -> Self {
        Self {
            name: default_station_name(),
            site: String::new(),
        }
    }
}

// ============================================================================
// Equipment Model Coefficients
// ============================================================================

/// Fixed coefficients of the equipment model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelCoefficients {
    /// Hydraulic efficiency blended into system efficiency.
    #[serde(default = "default_hydraulic_coeff")]
    pub hydraulic_coeff: f64,

    /// Share of the pump average in the blend; the rest is hydraulic.
    #[serde(default = "default_pump_efficiency_coeff")]
    pub pump_efficiency_coeff: f64,

    /// Weight of the maintenance-cost penalty.
    #[serde(default = "default_maintenance_impact")]
    pub maintenance_impact: f64,

    /// Maintenance cost (rub/h) at which the penalty reaches `maintenance_impact`.
    #[serde(default = "default_maintenance_cost_scale")]
    pub maintenance_cost_scale: f64,

    /// Age (years) at which the age factor reaches zero.
    #[serde(default = "default_age_horizon")]
    pub age_horizon_years: f64,

    /// Diminishing-returns factor per additional pump running in parallel.
    #[serde(default = "default_parallel_coeff")]
    pub parallel_coeff: f64,

    /// Throughput loss at full rated pressure.
    #[serde(default = "default_pressure_derating")]
    pub pressure_derating: f64,

    #[serde(default = "default_throughput_weight")]
    pub throughput_weight: f64,

    #[serde(default = "default_efficiency_weight")]
    pub efficiency_weight: f64,

    /// Weight of the required-productivity closeness term.
    #[serde(default = "default_target_weight")]
    pub target_weight: f64,

    /// Global damping applied to the composite score.
    #[serde(default = "default_damping")]
    pub damping: f64,
}

fn default_hydraulic_coeff() -> f64 { 0.85 }
fn default_pump_efficiency_coeff() -> f64 { 0.6 }
fn default_maintenance_impact() -> f64 { 0.2 }
fn default_maintenance_cost_scale() -> f64 { 2000.0 }
fn default_age_horizon() -> f64 { 30.0 }
fn default_parallel_coeff() -> f64 { 0.97 }
fn default_pressure_derating() -> f64 { 0.2 }
fn default_throughput_weight() -> f64 { 0.4 }
fn default_efficiency_weight() -> f64 { 0.4 }
fn default_target_weight() -> f64 { 0.2 }
fn default_damping() -> f64 { 0.95 }

impl Default for ModelCoefficients {
    fn default() -> Self {
        Self {
            hydraulic_coeff: default_hydraulic_coeff(),
            pump_efficiency_coeff: default_pump_efficiency_coeff(),
            maintenance_impact: default_maintenance_impact(),
            maintenance_cost_scale: default_maintenance_cost_scale(),
            age_horizon_years: default_age_horizon(),
            parallel_coeff: default_parallel_coeff(),
            pressure_derating: default_pressure_derating(),
            throughput_weight: default_throughput_weight(),
            efficiency_weight: default_efficiency_weight(),
            target_weight: default_target_weight(),
            damping: default_damping(),
        }
    }
}

// ============================================================================
// Sampling Config
// ============================================================================

/// Solution sampler tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Population size when the caller does not specify one.
    #[serde(default = "default_solutions")]
    pub default_solutions: usize,

    #[serde(default = "default_min_solutions")]
    pub min_solutions: usize,

    #[serde(default = "default_max_solutions")]
    pub max_solutions: usize,

    /// Half-width of the uniform window around the baseline, as a fraction.
    #[serde(default = "default_window_fraction")]
    pub window_fraction: f64,

    /// Standard deviation of unbounded criteria, as a fraction of the baseline.
    #[serde(default = "default_noise_fraction")]
    pub noise_fraction: f64,

    /// Floor for the standard deviation when the baseline is zero.
    #[serde(default = "default_min_std_dev")]
    pub min_std_dev: f64,

    /// Floor unbounded samples at zero.
    #[serde(default = "default_clamp_non_negative")]
    pub clamp_unbounded_non_negative: bool,

    /// Fixed RNG seed for reproducible populations.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Waypoints in a transition path.
    #[serde(default = "default_path_steps")]
    pub path_steps: usize,
}

fn default_solutions() -> usize { defaults::DEFAULT_SOLUTIONS }
fn default_min_solutions() -> usize { defaults::MIN_SOLUTIONS }
fn default_max_solutions() -> usize { defaults::MAX_SOLUTIONS }
fn default_window_fraction() -> f64 { 0.3 }
fn default_noise_fraction() -> f64 { 0.15 }
fn default_min_std_dev() -> f64 { 1e-9 }
fn default_clamp_non_negative() -> bool { true }
fn default_path_steps() -> usize { defaults::PATH_STEPS }

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            default_solutions: default_solutions(),
            min_solutions: default_min_solutions(),
            max_solutions: default_max_solutions(),
            window_fraction: default_window_fraction(),
            noise_fraction: default_noise_fraction(),
            min_std_dev: default_min_std_dev(),
            clamp_unbounded_non_negative: default_clamp_non_negative(),
            seed: None,
            path_steps: default_path_steps(),
        }
    }
}

impl SamplingConfig {
    /// Clamp a requested population size into the configured range.
    pub fn clamp_size(&self, requested: usize) -> usize {
        let clamped = requested.clamp(self.min_solutions, self.max_solutions);
        if clamped != requested {
            warn!(
                requested,
                clamped,
                min = self.min_solutions,
                max = self.max_solutions,
                "Population size out of range, clamped"
            );
        }
        clamped
    }
}

// ============================================================================
// Forecast Config
// ============================================================================

/// Where the required productivity comes from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Local CSV with `timestamp,val` rows.
    #[serde(default)]
    pub csv_path: Option<PathBuf>,

    /// Explicit target; wins over the forecast.
    #[serde(default)]
    pub required_productivity: Option<f64>,

    /// Use the latest forecast value as the target when none is set explicitly.
    #[serde(default)]
    pub use_as_target: bool,
}
