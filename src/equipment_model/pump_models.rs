//! Pump and station hydraulic models
//!
//! Key calculations for operating-point evaluation:
//! - Per-pump efficiency (wear and age degradation)
//! - System efficiency (flow-weighted, parallel-operation attenuated)
//! - Throughput (pressure derated)
//! - Composite score

use crate::config::ModelCoefficients;
use crate::types::Pump;

// ============================================================================
// Pump Efficiency
// ============================================================================

/// Wear factor: share of the pump left after wear.
///
/// Formula: (100 − wear%) / 100
pub fn wear_factor(wear_percent: f64) -> f64 {
    (100.0 - wear_percent) / 100.0
}

/// Age factor: linear degradation reaching zero at `age_horizon_years`.
///
/// Formula: 1 − age / horizon
pub fn age_factor(age_years: f64, age_horizon_years: f64) -> f64 {
    if age_horizon_years <= 0.0 {
        return 1.0;
    }
    1.0 - age_years / age_horizon_years
}

/// Per-pump efficiency as a fraction.
///
/// Formula: rated% / 100 × wear_factor × age_factor
///
/// Not clamped: values outside [0, 1] are possible for out-of-catalog
/// inputs and are clamped by the consumers.
pub fn pump_efficiency(rated_efficiency_percent: f64, wear_percent: f64, age_years: f64, age_horizon_years: f64) -> f64 {
    rated_efficiency_percent / 100.0 * wear_factor(wear_percent) * age_factor(age_years, age_horizon_years)
}

// ============================================================================
// System Efficiency
// ============================================================================

/// System efficiency in percent (0–100).
///
/// Formula:
///   avg     = Σ(max_flow × η_pump) / Σ max_flow        (enabled pumps)
///   blended = avg × k_pump + k_hydraulic × (1 − k_pump)
///   eff     = (blended − k_maint × cost / cost_scale) × k_parallel^(n − 1)
///
/// Clamped to [0, 1] and reported as a percentage. No enabled pumps ⇒ 0.
pub fn system_efficiency(
    pumps: &[Pump],
    wear_percent: f64,
    age_years: f64,
    maintenance_cost: f64,
    coeffs: &ModelCoefficients,
) -> f64 {
    let active: Vec<&Pump> = pumps.iter().filter(|p| p.enabled).collect();
    if active.is_empty() {
        return 0.0;
    }

    let total_flow: f64 = active.iter().map(|p| p.max_flow).sum();
    let avg = if total_flow > 0.0 {
        active
            .iter()
            .map(|p| {
                p.max_flow
                    * pump_efficiency(p.rated_efficiency, wear_percent, age_years, coeffs.age_horizon_years)
            })
            .sum::<f64>()
            / total_flow
    } else {
        // Zero-flow catalog: fall back to a plain mean
        active
            .iter()
            .map(|p| pump_efficiency(p.rated_efficiency, wear_percent, age_years, coeffs.age_horizon_years))
            .sum::<f64>()
            / active.len() as f64
    };

    let blended = avg * coeffs.pump_efficiency_coeff
        + coeffs.hydraulic_coeff * (1.0 - coeffs.pump_efficiency_coeff);

    let maintenance_penalty = if coeffs.maintenance_cost_scale > 0.0 {
        coeffs.maintenance_impact * maintenance_cost / coeffs.maintenance_cost_scale
    } else {
        0.0
    };

    let parallel = coeffs.parallel_coeff.powi(active.len() as i32 - 1);
    let efficiency = (blended - maintenance_penalty) * parallel;

    if efficiency.is_nan() {
        return 0.0;
    }
    efficiency.clamp(0.0, 1.0) * 100.0
}

// ============================================================================
// Throughput
// ============================================================================

/// Pressure derating factor for one pump.
///
/// Formula: 1 − k_derate × (pressure / pump_max_pressure)
pub fn pressure_derating(pressure: f64, pump_max_pressure: f64, derating: f64) -> f64 {
    if pump_max_pressure <= 0.0 {
        return 1.0;
    }
    1.0 - derating * (pressure / pump_max_pressure)
}

/// Station throughput (m³/h).
///
/// Formula: Σ max_flow × derating × sqrt(clamp(η_pump, 0, 1)) over enabled pumps.
/// No enabled pumps ⇒ 0.
pub fn throughput(
    pumps: &[Pump],
    pressure: f64,
    wear_percent: f64,
    age_years: f64,
    coeffs: &ModelCoefficients,
) -> f64 {
    pumps
        .iter()
        .filter(|p| p.enabled)
        .map(|p| {
            let eff = pump_efficiency(p.rated_efficiency, wear_percent, age_years, coeffs.age_horizon_years);
            let eff = if eff.is_nan() { 0.0 } else { eff.clamp(0.0, 1.0) };
            p.max_flow * pressure_derating(pressure, p.max_pressure, coeffs.pressure_derating) * eff.sqrt()
        })
        .sum()
}

// ============================================================================
// Composite Score
// ============================================================================

/// Closeness of `throughput` to a required productivity, in [0, 1].
///
/// Formula: 1 − min(1, |throughput − target| / target). `None` for a
/// missing or non-positive target.
pub fn target_closeness(throughput: f64, target: Option<f64>) -> Option<f64> {
    let target = target.filter(|t| t.is_finite() && *t > 0.0)?;
    Some(1.0 - ((throughput - target).abs() / target).min(1.0))
}

/// Composite score used to choose among non-dominated points.
///
/// Formula: damping × (w_t × throughput + w_e × efficiency + w_c × 100 × closeness)
///
/// The closeness term is expressed in percent like efficiency and is zero
/// without a target.
pub fn composite_score(
    throughput: f64,
    efficiency: f64,
    required_productivity: Option<f64>,
    coeffs: &ModelCoefficients,
) -> f64 {
    let closeness = target_closeness(throughput, required_productivity).unwrap_or(0.0);
    coeffs.damping
        * (coeffs.throughput_weight * throughput
            + coeffs.efficiency_weight * efficiency
            + coeffs.target_weight * closeness * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coeffs() -> ModelCoefficients {
        ModelCoefficients::default()
    }

    #[test]
    fn test_pump_efficiency_new_pump() {
        let eff = pump_efficiency(85.0, 0.0, 0.0, 30.0);
        assert!((eff - 0.85).abs() < 1e-12);
    }

    #[test]
    fn test_pump_efficiency_degrades_with_wear_and_age() {
        // 0.85 × 0.7 × (1 − 5/30)
        let eff = pump_efficiency(85.0, 30.0, 5.0, 30.0);
        assert!((eff - 0.85 * 0.7 * (25.0 / 30.0)).abs() < 1e-12);
    }

    #[test]
    fn test_pump_efficiency_unclamped_past_horizon() {
        assert!(pump_efficiency(85.0, 0.0, 45.0, 30.0) < 0.0);
    }

    #[test]
    fn test_system_efficiency_single_pump() {
        let pumps = vec![Pump::new("p1", 120.0, 25.0, 85.0)];
        let eff = system_efficiency(&pumps, 30.0, 5.0, 500.0, &coeffs());
        let pump = 0.85 * 0.7 * (25.0 / 30.0);
        let expected = (pump * 0.6 + 0.85 * 0.4 - 0.2 * 500.0 / 2000.0) * 100.0;
        assert!((eff - expected).abs() < 1e-9, "got {eff}, expected {expected}");
    }

    #[test]
    fn test_system_efficiency_parallel_attenuation() {
        let one = vec![Pump::new("p1", 100.0, 25.0, 85.0)];
        let two = vec![Pump::new("p1", 100.0, 25.0, 85.0), Pump::new("p2", 100.0, 25.0, 85.0)];
        let e1 = system_efficiency(&one, 10.0, 2.0, 300.0, &coeffs());
        let e2 = system_efficiency(&two, 10.0, 2.0, 300.0, &coeffs());
        assert!((e2 - e1 * 0.97).abs() < 1e-9);
    }

    #[test]
    fn test_system_efficiency_clamped() {
        let pumps = vec![Pump::new("p1", 100.0, 25.0, 85.0)];
        assert_eq!(system_efficiency(&pumps, 0.0, 0.0, 100_000.0, &coeffs()), 0.0);
        let mut c = coeffs();
        c.hydraulic_coeff = 1.0;
        c.pump_efficiency_coeff = 0.0;
        c.maintenance_impact = 0.0;
        assert_eq!(system_efficiency(&pumps, 0.0, 0.0, 0.0, &c), 100.0);
    }

    #[test]
    fn test_no_pumps_enabled_is_zero() {
        let pumps = vec![Pump::new("p1", 120.0, 25.0, 85.0).disabled()];
        for pressure in [0.0, 10.0, 25.0, 100.0] {
            assert_eq!(throughput(&pumps, pressure, 30.0, 5.0, &coeffs()), 0.0);
        }
        assert_eq!(system_efficiency(&pumps, 30.0, 5.0, 500.0, &coeffs()), 0.0);
        assert_eq!(throughput(&[], 10.0, 30.0, 5.0, &coeffs()), 0.0);
    }

    #[test]
    fn test_throughput_single_pump() {
        let pumps = vec![Pump::new("p1", 120.0, 25.0, 85.0)];
        let t = throughput(&pumps, 10.0, 30.0, 5.0, &coeffs());
        let eff: f64 = 0.85 * 0.7 * (25.0 / 30.0);
        let expected = 120.0 * (1.0 - 0.2 * 10.0 / 25.0) * eff.sqrt();
        assert!((t - expected).abs() < 1e-9);
    }

    #[test]
    fn test_throughput_decreases_with_pressure() {
        let pumps = vec![Pump::new("p1", 120.0, 25.0, 85.0)];
        let low = throughput(&pumps, 5.0, 30.0, 5.0, &coeffs());
        let high = throughput(&pumps, 20.0, 30.0, 5.0, &coeffs());
        assert!(low > high);
    }

    #[test]
    fn test_model_is_deterministic() {
        let pumps = Pump::default_catalog();
        let a = (
            throughput(&pumps, 12.0, 25.0, 7.0, &coeffs()),
            system_efficiency(&pumps, 25.0, 7.0, 450.0, &coeffs()),
        );
        let b = (
            throughput(&pumps, 12.0, 25.0, 7.0, &coeffs()),
            system_efficiency(&pumps, 25.0, 7.0, 450.0, &coeffs()),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_target_closeness() {
        assert_eq!(target_closeness(100.0, None), None);
        assert_eq!(target_closeness(100.0, Some(0.0)), None);
        assert_eq!(target_closeness(200.0, Some(200.0)), Some(1.0));
        assert_eq!(target_closeness(100.0, Some(200.0)), Some(0.5));
        assert_eq!(target_closeness(1000.0, Some(200.0)), Some(0.0));
    }

    #[test]
    fn test_composite_score_weights() {
        let c = coeffs();
        let base = composite_score(100.0, 50.0, None, &c);
        assert!((base - 0.95 * (0.4 * 100.0 + 0.4 * 50.0)).abs() < 1e-9);
        let with_target = composite_score(100.0, 50.0, Some(100.0), &c);
        assert!((with_target - base - 0.95 * 0.2 * 100.0).abs() < 1e-9);
    }
}
