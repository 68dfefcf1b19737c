//! Recommendation narrator
//!
//! Turns a configuration (the baseline or one population row) into operator
//! guidance. Read-only: everything comes from the snapshot handed in, so a
//! regeneration running concurrently cannot change the answer halfway.

use tracing::{debug, warn};

use crate::config::defaults::{
    HIGH_EFFICIENCY_PERCENT, LOW_EFFICIENCY_PERCENT, LOW_THROUGHPUT, NEAR_MAX_RATIO,
    NEAR_MIN_RATIO, PUMP_EFFICIENCY_UPGRADE_FACTOR, PUMP_EFFICIENCY_UPGRADE_PERCENT,
    PUMP_PRESSURE_MARGIN, TARGET_TOLERANCE,
};
use crate::equipment_model::target_closeness;
use crate::types::{
    Criterion, CriterionKind, Direction, EquipmentConfig, ObjectiveVector, Pump, Recommendation,
    RecommendationCategory as Cat, RecommendationSet,
};

use super::snapshot::PopulationSnapshot;

/// Build recommendations for `solution` (or the baseline when `None`).
///
/// An index outside the population yields `Unavailable`.
pub fn generate(snapshot: &PopulationSnapshot, solution: Option<usize>) -> RecommendationSet {
    let config = match solution {
        None => snapshot.baseline().clone(),
        Some(idx) => match snapshot.solution_config(idx) {
            Some(cfg) => cfg,
            None => {
                warn!(index = idx, population = snapshot.len(), "Recommendation requested for unknown solution");
                return RecommendationSet::Unavailable;
            }
        },
    };

    let objectives = match solution {
        Some(idx) => snapshot.objectives()[idx],
        None => snapshot.baseline_objectives(),
    };

    let mut items = Vec::new();

    for criterion in snapshot.criteria() {
        if let Some(rec) = criterion_advice(criterion, config.value(criterion.kind)) {
            items.push(rec);
        }
    }

    items.push(Recommendation::new(
        Cat::Computed,
        format!("Computed system efficiency: {:.1}%", objectives.efficiency),
    ));
    items.push(Recommendation::new(
        Cat::Computed,
        format!("Computed throughput: {:.1} m³/h", objectives.throughput),
    ));

    let pumps = snapshot.model().pumps();
    items.push(active_pump_summary(pumps));

    match snapshot.optimal_point() {
        Some(optimum) => {
            if solution.is_some() {
                items.extend(optimum_comparison(&objectives, &optimum));
            }
        }
        None => items.push(Recommendation::new(
            Cat::NoRecommendation,
            "No recommendation available: the population has no Pareto-optimal solution",
        )),
    }

    items.extend(pump_advice(pumps, &config));
    items.extend(health_advice(&objectives));

    if let Some(target) = snapshot.required_productivity() {
        items.extend(forecast_gap(pumps, objectives.throughput, target));
    }

    debug!(
        solution = ?solution,
        generation = snapshot.generation(),
        count = items.len(),
        "Recommendations generated"
    );

    RecommendationSet::Available { solution, items }
}

/// Directional advice for one bounded criterion.
fn criterion_advice(criterion: &Criterion, value: f64) -> Option<Recommendation> {
    let bounds = criterion.bounds?;
    let label = &criterion.label;

    let message = match criterion.direction {
        Direction::Maximize if value >= bounds.max * NEAR_MAX_RATIO => {
            format!("{label}: near maximum ({value:.1} of {:.1})", bounds.max)
        }
        Direction::Minimize if value <= bounds.min * NEAR_MIN_RATIO => {
            format!("{label}: near minimum ({value:.1} of {:.1})", bounds.min)
        }
        Direction::Maximize => {
            format!("{label}: can increase to {:.1} (current {value:.1})", bounds.max)
        }
        Direction::Minimize => {
            format!("{label}: can decrease to {:.1} (current {value:.1})", bounds.min)
        }
    };
    Some(Recommendation::new(Cat::Criterion, message))
}

fn active_pump_summary(pumps: &[Pump]) -> Recommendation {
    let names: Vec<&str> = pumps
        .iter()
        .filter(|p| p.enabled)
        .map(|p| p.display_name())
        .collect();
    let message = if names.is_empty() {
        "Active pumps: none".to_string()
    } else {
        format!("Active pumps: {} ({})", names.len(), names.join(", "))
    };
    Recommendation::new(Cat::ActivePumps, message)
}

fn optimum_comparison(current: &ObjectiveVector, optimum: &ObjectiveVector) -> Option<Recommendation> {
    let throughput_gap = current.throughput < optimum.throughput;
    let efficiency_gap = current.efficiency < optimum.efficiency;

    let message = match (throughput_gap, efficiency_gap) {
        (true, true) => format!(
            "Solution can be improved on both throughput and efficiency (optimum {:.1} m³/h at {:.1}%)",
            optimum.throughput, optimum.efficiency
        ),
        (true, false) => format!(
            "Solution can be improved on throughput (optimum {:.1} m³/h)",
            optimum.throughput
        ),
        (false, true) => format!(
            "Solution can be improved on efficiency (optimum {:.1}%)",
            optimum.efficiency
        ),
        (false, false) => return None,
    };
    Some(Recommendation::new(Cat::Optimum, message))
}

/// Catalog advice for enabled pumps.
fn pump_advice(pumps: &[Pump], config: &EquipmentConfig) -> Vec<Recommendation> {
    let outlet_pressure = config.value(CriterionKind::Pressure);
    let required_rating = outlet_pressure * PUMP_PRESSURE_MARGIN;
    let mut items = Vec::new();

    for pump in pumps.iter().filter(|p| p.enabled) {
        if pump.rated_efficiency < PUMP_EFFICIENCY_UPGRADE_PERCENT {
            let upgraded = (pump.rated_efficiency * PUMP_EFFICIENCY_UPGRADE_FACTOR).min(100.0);
            items.push(Recommendation::new(
                Cat::Pump,
                format!(
                    "{}: rated efficiency {:.1}% could be raised to {upgraded:.1}%",
                    pump.display_name(),
                    pump.rated_efficiency
                ),
            ));
        }
        if pump.max_pressure < required_rating {
            items.push(Recommendation::new(
                Cat::Pump,
                format!(
                    "{}: keep at least a 10% pressure margin (rating {:.1} atm, required {required_rating:.1} atm)",
                    pump.display_name(),
                    pump.max_pressure
                ),
            ));
        }
    }
    items
}

fn health_advice(objectives: &ObjectiveVector) -> Vec<Recommendation> {
    let mut items = Vec::new();
    if objectives.efficiency < LOW_EFFICIENCY_PERCENT {
        items.push(Recommendation::new(
            Cat::Health,
            "Warning: low system efficiency. Check equipment wear and pump parameters.",
        ));
    } else if objectives.efficiency > HIGH_EFFICIENCY_PERCENT {
        items.push(Recommendation::new(Cat::Health, "System is operating at high efficiency."));
    }
    if objectives.throughput < LOW_THROUGHPUT {
        items.push(Recommendation::new(
            Cat::Health,
            "Warning: low throughput. Check pump capacity and system pressure.",
        ));
    }
    items
}

/// Gap between throughput and the required productivity.
fn forecast_gap(pumps: &[Pump], throughput: f64, target: f64) -> Vec<Recommendation> {
    // Non-positive or non-finite targets are treated as absent
    if target_closeness(throughput, Some(target)).is_none() {
        return Vec::new();
    }

    let mut items = Vec::new();
    let gap = target - throughput;

    if throughput < target * (1.0 - TARGET_TOLERANCE) {
        items.push(Recommendation::new(
            Cat::Forecast,
            format!(
                "Throughput {throughput:.1} m³/h is below the required {target:.1} m³/h: increase output by {gap:.1} m³/h"
            ),
        ));
        let idle: Vec<&Pump> = pumps.iter().filter(|p| !p.enabled).collect();
        if idle.is_empty() {
            items.push(Recommendation::new(
                Cat::Forecast,
                "All pumps are running: increase outlet pressure within pump ratings to close the gap",
            ));
        }
        for pump in idle {
            items.push(Recommendation::new(
                Cat::Forecast,
                format!(
                    "Enable {} ({}) to add up to {:.1} m³/h",
                    pump.display_name(),
                    pump.id,
                    pump.max_flow
                ),
            ));
        }
    } else if throughput > target * (1.0 + TARGET_TOLERANCE) {
        let surplus = -gap;
        let active: Vec<&Pump> = pumps.iter().filter(|p| p.enabled).collect();
        let smallest = active
            .iter()
            .min_by(|a, b| a.max_flow.total_cmp(&b.max_flow).then_with(|| a.id.cmp(&b.id)));
        match smallest {
            Some(pump) if active.len() > 1 => items.push(Recommendation::new(
                Cat::Forecast,
                format!(
                    "Throughput exceeds the required {target:.1} m³/h by {surplus:.1} m³/h: consider disabling {} ({}) to save energy",
                    pump.display_name(),
                    pump.id
                ),
            )),
            _ => items.push(Recommendation::new(
                Cat::Forecast,
                format!("Throughput exceeds the required {target:.1} m³/h by {surplus:.1} m³/h"),
            )),
        }
    } else {
        items.push(Recommendation::new(
            Cat::Forecast,
            format!("Throughput {throughput:.1} m³/h is on target ({target:.1} m³/h)"),
        ));
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelCoefficients;
    use crate::equipment_model::EquipmentModel;
    use crate::types::{Bounds, Solution};

    fn baseline() -> EquipmentConfig {
        EquipmentConfig::new()
            .with(CriterionKind::Pressure, 10.0)
            .with(CriterionKind::Wear, 30.0)
            .with(CriterionKind::MaintenanceCost, 500.0)
            .with(CriterionKind::Age, 5.0)
    }

    fn snapshot(pumps: Vec<Pump>, target: Option<f64>, rows: Vec<Vec<f64>>) -> PopulationSnapshot {
        PopulationSnapshot::build(
            1,
            Criterion::default_set(),
            baseline(),
            EquipmentModel::new(pumps, ModelCoefficients::default()),
            target,
            rows.into_iter().map(Solution).collect(),
        )
    }

    #[test]
    fn criterion_directions() {
        let pressure = Criterion::new(CriterionKind::Pressure, "Pressure", Some(Bounds::new(0.0, 25.0)));
        let near = criterion_advice(&pressure, 24.5).expect("bounded");
        assert!(near.message.contains("near maximum"));
        let room = criterion_advice(&pressure, 10.0).expect("bounded");
        assert!(room.message.contains("can increase to 25.0"));

        let wear = Criterion::new(CriterionKind::Wear, "Wear", Some(Bounds::new(0.0, 100.0)));
        assert!(criterion_advice(&wear, 0.0).expect("bounded").message.contains("near minimum"));
        assert!(criterion_advice(&wear, 30.0).expect("bounded").message.contains("can decrease to 0.0"));

        let age = Criterion::new(CriterionKind::Age, "Age", None);
        assert!(criterion_advice(&age, 5.0).is_none());
    }

    #[test]
    fn below_target_suggests_enabling_idle_pump() {
        let pumps = vec![
            Pump::new("pump1", 120.0, 25.0, 85.0),
            Pump::new("pump3", 80.0, 20.0, 75.0).disabled(),
        ];
        let snap = snapshot(pumps, Some(200.0), vec![vec![10.0, 30.0, 500.0, 5.0]]);
        let set = generate(&snap, None);
        let forecast: Vec<&Recommendation> = set.in_category(Cat::Forecast).collect();
        assert!(forecast.iter().any(|r| r.message.contains("increase")));
        assert!(forecast.iter().any(|r| r.message.contains("Enable pump3")));
    }

    #[test]
    fn below_target_without_idle_pump_suggests_pressure() {
        let pumps = vec![Pump::new("pump1", 120.0, 25.0, 85.0)];
        let snap = snapshot(pumps, Some(200.0), vec![vec![10.0, 30.0, 500.0, 5.0]]);
        let set = generate(&snap, None);
        assert!(set.in_category(Cat::Forecast).any(|r| r.message.contains("outlet pressure")));
    }

    #[test]
    fn above_target_suggests_disabling_smallest_pump() {
        let pumps = vec![
            Pump::new("pump1", 120.0, 25.0, 85.0),
            Pump::new("pump2", 100.0, 22.0, 80.0),
        ];
        let snap = snapshot(pumps, Some(20.0), vec![vec![10.0, 30.0, 500.0, 5.0]]);
        let set = generate(&snap, None);
        assert!(set
            .in_category(Cat::Forecast)
            .any(|r| r.message.contains("consider disabling pump2")));
    }

    #[test]
    fn no_target_no_forecast_entries() {
        let snap = snapshot(Pump::default_catalog(), None, vec![vec![10.0, 30.0, 500.0, 5.0]]);
        assert_eq!(generate(&snap, None).in_category(Cat::Forecast).count(), 0);
    }

    #[test]
    fn empty_front_yields_no_recommendation_entry() {
        let snap = snapshot(Pump::default_catalog(), None, Vec::new());
        let set = generate(&snap, None);
        assert!(set.is_available());
        assert_eq!(set.in_category(Cat::NoRecommendation).count(), 1);
        assert_eq!(set.in_category(Cat::Optimum).count(), 0);
    }

    #[test]
    fn dominated_solution_compared_with_optimum() {
        let snap = snapshot(
            vec![Pump::new("pump1", 120.0, 25.0, 85.0)],
            None,
            vec![vec![20.0, 60.0, 900.0, 12.0], vec![5.0, 10.0, 200.0, 1.0]],
        );
        let set = generate(&snap, Some(0));
        assert!(set
            .in_category(Cat::Optimum)
            .any(|r| r.message.contains("both throughput and efficiency")));
    }

    #[test]
    fn unknown_solution_is_unavailable() {
        let snap = snapshot(Pump::default_catalog(), None, vec![vec![10.0, 30.0, 500.0, 5.0]]);
        assert_eq!(generate(&snap, Some(5)), RecommendationSet::Unavailable);
    }

    #[test]
    fn low_rated_pump_gets_upgrade_advice() {
        let snap = snapshot(
            vec![Pump::new("pump2", 100.0, 22.0, 80.0)],
            None,
            vec![vec![10.0, 30.0, 500.0, 5.0]],
        );
        let set = generate(&snap, None);
        assert!(set.in_category(Cat::Pump).any(|r| r.message.contains("could be raised to 92.0%")));
    }
}
