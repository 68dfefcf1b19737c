//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " — did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for StationConfig.
///
/// Array-of-table entries (`[[pumps]]`, `[[criteria]]`) share one path per
/// field. Any new field added to StationConfig must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [station]
        "station",
        "station.name",
        "station.site",
        // [[pumps]]
        "pumps",
        "pumps.id",
        "pumps.name",
        "pumps.max_flow",
        "pumps.max_pressure",
        "pumps.rated_efficiency",
        "pumps.enabled",
        // [[criteria]]
        "criteria",
        "criteria.kind",
        "criteria.label",
        "criteria.direction",
        "criteria.bounds",
        "criteria.bounds.min",
        "criteria.bounds.max",
        // [baseline]
        "baseline",
        "baseline.pressure",
        "baseline.wear",
        "baseline.maintenance_cost",
        "baseline.age",
        // [model]
        "model",
        "model.hydraulic_coeff",
        "model.pump_efficiency_coeff",
        "model.maintenance_impact",
        "model.maintenance_cost_scale",
        "model.age_horizon_years",
        "model.parallel_coeff",
        "model.pressure_derating",
        "model.throughput_weight",
        "model.efficiency_weight",
        "model.target_weight",
        "model.damping",
        // [sampling]
        "sampling",
        "sampling.default_solutions",
        "sampling.min_solutions",
        "sampling.max_solutions",
        "sampling.window_fraction",
        "sampling.noise_fraction",
        "sampling.min_std_dev",
        "sampling.clamp_unbounded_non_negative",
        "sampling.seed",
        "sampling.path_steps",
        // [forecast]
        "forecast",
        "forecast.csv_path",
        "forecast.required_productivity",
        "forecast.use_as_target",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`. Tables inside arrays are walked under the
/// array's own path, so `[[pumps]] id = "p1"` yields `["pumps", "pumps.id"]`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            match v {
                toml::Value::Table(_) => keys.extend(walk_toml_keys(v, &path)),
                toml::Value::Array(items) => {
                    for item in items.iter().filter(|i| i.is_table()) {
                        for nested in walk_toml_keys(item, &path) {
                            if !keys.contains(&nested) {
                                keys.push(nested);
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties resolve alphabetically so suggestions are stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|k| (*k, levenshtein(unknown, k)))
        .filter(|(_, dist)| *dist <= 3)
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys; it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| {
            let suggestion = suggest_correction(&key, &known);
            ValidationWarning {
                message: format!("Unknown config key '{key}'"),
                field: key,
                suggestion,
            }
        })
        .collect()
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Check a parsed StationConfig for suspicious but legal values.
///
/// Hard errors live in `StationConfig::validate`; these only warn.
pub fn validate_physical_ranges(config: &super::StationConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if !config.pumps.iter().any(|p| p.enabled) {
        warnings.push(ValidationWarning {
            field: "pumps.enabled".to_string(),
            message: "No pump is enabled; throughput will be zero for every solution".to_string(),
            suggestion: None,
        });
    }

    for pump in &config.pumps {
        if pump.max_flow > 5_000.0 {
            warnings.push(ValidationWarning {
                field: "pumps.max_flow".to_string(),
                message: format!(
                    "pump '{}' max_flow = {:.1} is outside typical range (0-5000 m³/h)",
                    pump.id, pump.max_flow
                ),
                suggestion: None,
            });
        }
    }

    if let Some(pressure) = config.baseline.get(crate::types::CriterionKind::Pressure) {
        if let Some(max) = config
            .pumps
            .iter()
            .filter(|p| p.enabled)
            .map(|p| p.max_pressure)
            .reduce(f64::max)
        {
            if pressure > max {
                warnings.push(ValidationWarning {
                    field: "baseline.pressure".to_string(),
                    message: format!(
                        "baseline pressure {pressure:.1} atm exceeds every enabled pump's rating (max {max:.1} atm)"
                    ),
                    suggestion: None,
                });
            }
        }
    }

    let wear = config.baseline.get(crate::types::CriterionKind::Wear);
    if let Some(wear) = wear.filter(|w| !(0.0..=100.0).contains(w)) {
        warnings.push(ValidationWarning {
            field: "baseline.wear".to_string(),
            message: format!("baseline wear = {wear:.1} % is outside 0-100 %"),
            suggestion: None,
        });
    }

    warnings
}

// ============================================================================
// Tests
// ============================================================================
