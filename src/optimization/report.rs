//! Serializable summary of a snapshot for presentation layers

use serde::Serialize;

use crate::types::{EquipmentConfig, ObjectiveVector, RecommendationSet};

use super::recommendations;
use super::snapshot::{PopulationSnapshot, PopulationStats};

/// A front member as `(index, throughput, efficiency)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrontPoint {
    pub index: usize,
    pub throughput: f64,
    pub efficiency: f64,
}

/// The recommended operating point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimalSummary {
    pub index: usize,
    pub objectives: ObjectiveVector,
    pub config: EquipmentConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationReport {
    pub station: String,
    pub generation: u64,
    pub required_productivity: Option<f64>,
    pub active_pumps: Vec<String>,
    pub baseline: EquipmentConfig,
    pub baseline_objectives: ObjectiveVector,
    pub stats: PopulationStats,
    pub optimal: Option<OptimalSummary>,
    pub pareto_front: Vec<FrontPoint>,
    pub recommendations: RecommendationSet,
}

impl OptimizationReport {
    pub fn from_snapshot(station: &str, snapshot: &PopulationSnapshot) -> Self {
        let optimal = snapshot.optimal_index().and_then(|index| {
            Some(OptimalSummary {
                index,
                objectives: *snapshot.objectives().get(index)?,
                config: snapshot.solution_config(index)?,
            })
        });

        let pareto_front = snapshot
            .front_indices()
            .iter()
            .map(|&index| {
                let ov = snapshot.objectives()[index];
                FrontPoint {
                    index,
                    throughput: ov.throughput,
                    efficiency: ov.efficiency,
                }
            })
            .collect();

        Self {
            station: station.to_string(),
            generation: snapshot.generation(),
            required_productivity: snapshot.required_productivity(),
            active_pumps: snapshot
                .model()
                .active_pumps()
                .map(|p| p.display_name().to_string())
                .collect(),
            baseline: snapshot.baseline().clone(),
            baseline_objectives: snapshot.baseline_objectives(),
            stats: snapshot.stats(),
            optimal,
            pareto_front,
            recommendations: recommendations::generate(snapshot, None),
        }
    }
}
