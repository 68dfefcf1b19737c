//! Config Validation Tests
//!
//! Typo detection, range validation and file round-trips of the station
//! config, exercised through the public API only.

use std::io::Write;

use pumpfront::config::validation::{
    known_config_keys, suggest_correction, validate_physical_ranges, validate_unknown_keys,
};
use pumpfront::config::ConfigError;
use pumpfront::{CriterionKind, StationConfig};

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_model_coefficient_warns_with_suggestion() {
    let toml_str = r#"
[model]
parallel_coef = 0.95
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("parallel_coef"));
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("model.parallel_coeff"),
        "Should suggest the correct spelling"
    );
}

#[test]
fn typo_in_station_section_warns() {
    let toml_str = r#"
[station]
naem = "North intake"
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].suggestion.as_deref(), Some("station.name"));
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[station]
name = "North intake"
site = "Riverside"

[[pumps]]
id = "p1"
name = "Main"
max_flow = 150.0
max_pressure = 24.0
rated_efficiency = 88.0

[[pumps]]
id = "p2"
max_flow = 90.0
max_pressure = 20.0
rated_efficiency = 78.0
enabled = false

[baseline]
pressure = 12.0
wear = 25.0

[sampling]
seed = 7
default_solutions = 500

[forecast]
required_productivity = 180.0
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(
        warnings.is_empty(),
        "Valid config should produce 0 warnings, got: {:?}",
        warnings.iter().map(|w| &w.field).collect::<Vec<_>>()
    );
}

#[test]
fn unknown_section_warns() {
    let toml_str = r#"
[telemetry]
endpoint = "http://example"
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(warnings.iter().any(|w| w.field == "telemetry"));
}

#[test]
fn empty_toml_produces_zero_warnings() {
    assert!(validate_unknown_keys("").is_empty());
}

#[test]
fn known_keys_cover_every_section() {
    let keys = known_config_keys();
    for section in ["station", "pumps", "criteria", "baseline", "model", "sampling", "forecast"] {
        assert!(keys.contains(section), "missing section {section}");
    }
}

#[test]
fn suggest_correction_finds_close_match() {
    let known = known_config_keys();
    assert_eq!(
        suggest_correction("sampling.window_fracton", &known).as_deref(),
        Some("sampling.window_fraction")
    );
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn all_defaults_pass_validation() {
    let config = StationConfig::default();
    let warnings = validate_physical_ranges(&config);
    assert!(
        warnings.is_empty(),
        "Default config should have 0 range warnings: {:?}",
        warnings.iter().map(|w| &w.field).collect::<Vec<_>>()
    );
    assert!(config.validate().is_ok(), "Default config must always pass validation");
}

#[test]
fn rated_efficiency_above_100_is_error() {
    let mut config = StationConfig::default();
    config.pumps[0].rated_efficiency = 120.0;
    match config.validate() {
        Err(ConfigError::Validation(errors)) => {
            assert!(errors.iter().any(|e| e.contains("rated_efficiency")));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn duplicate_pump_ids_are_error() {
    let mut config = StationConfig::default();
    config.pumps[1].id = config.pumps[0].id.clone();
    assert!(config.validate().is_err());
}

#[test]
fn inverted_bounds_are_error() {
    let toml_str = r#"
[[criteria]]
kind = "pressure"
label = "Pressure"
direction = "maximize"
bounds = { min = 30.0, max = 5.0 }
"#;
    assert!(matches!(
        StationConfig::from_toml_str(toml_str),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn every_error_is_collected() {
    let mut config = StationConfig::default();
    config.model.damping = 0.0;
    config.sampling.path_steps = 1;
    config.forecast.required_productivity = Some(-5.0);
    match config.validate() {
        Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 3, "{errors:?}"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn baseline_pressure_above_ratings_warns() {
    let mut config = StationConfig::default();
    config.baseline.set(CriterionKind::Pressure, 40.0);
    let warnings = validate_physical_ranges(&config);
    assert!(warnings.iter().any(|w| w.field == "baseline.pressure"));
}

// ============================================================================
// File Round-trips
// ============================================================================

#[test]
fn config_roundtrip_preserves_values() {
    let mut original = StationConfig::default();
    original.station.name = "Roundtrip-Test".to_string();
    original.model.parallel_coeff = 0.9;
    original.sampling.seed = Some(99);
    original.baseline.set(CriterionKind::Wear, 42.0);

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("station_config.toml");
    original.save_to_file(&path).expect("save should work");

    let loaded = StationConfig::load_from_file(&path).expect("load should work");
    assert_eq!(loaded.station.name, "Roundtrip-Test");
    assert!((loaded.model.parallel_coeff - 0.9).abs() < f64::EPSILON);
    assert_eq!(loaded.sampling.seed, Some(99));
    assert_eq!(loaded.baseline.get(CriterionKind::Wear), Some(42.0));
    assert_eq!(loaded.pumps, original.pumps);
    assert_eq!(loaded.criteria, original.criteria);
}

#[test]
fn parse_error_names_the_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"[model\nbroken").expect("write");
    match StationConfig::load_from_file(file.path()) {
        Err(ConfigError::Parse(path, _)) => assert_eq!(path, file.path()),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn missing_file_is_io_error() {
    let result = StationConfig::load_from_file(std::path::Path::new("/nonexistent/station.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_, _))));
}
