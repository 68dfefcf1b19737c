//! Immutable population snapshot
//!
//! A snapshot owns everything a query needs: the criteria, the baseline it
//! was sampled around, a frozen copy of the equipment model, the rows, their
//! objectives and the front. It is never mutated after construction; a new
//! generation replaces it wholesale.

use serde::Serialize;
use statrs::statistics::Statistics;

use crate::equipment_model::EquipmentModel;
use crate::types::{Criterion, EquipmentConfig, ObjectiveVector, Solution};

use super::pareto::{front_indices, pareto_mask, select_optimal};

/// One generated population and its derived arrays.
#[derive(Debug, Clone)]
pub struct PopulationSnapshot {
    generation: u64,
    criteria: Vec<Criterion>,
    baseline: EquipmentConfig,
    model: EquipmentModel,
    required_productivity: Option<f64>,
    solutions: Vec<Solution>,
    objectives: Vec<ObjectiveVector>,
    front_mask: Vec<bool>,
    front_indices: Vec<usize>,
    optimal_index: Option<usize>,
}

impl PopulationSnapshot {
    /// Evaluate `solutions` and compute the front.
    pub fn build(
        generation: u64,
        criteria: Vec<Criterion>,
        baseline: EquipmentConfig,
        model: EquipmentModel,
        required_productivity: Option<f64>,
        solutions: Vec<Solution>,
    ) -> Self {
        let objectives: Vec<ObjectiveVector> = solutions
            .iter()
            .map(|row| {
                let config = baseline.overlay_row(&criteria, row.values());
                model.evaluate(&config, required_productivity)
            })
            .collect();

        // With no active pump every row collapses onto the zero point
        let front_mask = if model.active_pump_count() == 0 {
            vec![false; objectives.len()]
        } else {
            pareto_mask(&objectives)
        };
        let front_indices = front_indices(&objectives, &front_mask);
        let optimal_index = select_optimal(&objectives, &front_mask);

        Self {
            generation,
            criteria,
            baseline,
            model,
            required_productivity,
            solutions,
            objectives,
            front_mask,
            front_indices,
            optimal_index,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Configuration the population was sampled around.
    pub fn baseline(&self) -> &EquipmentConfig {
        &self.baseline
    }

    /// Equipment model frozen at generation time.
    pub fn model(&self) -> &EquipmentModel {
        &self.model
    }

    pub fn required_productivity(&self) -> Option<f64> {
        self.required_productivity
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    pub fn objectives(&self) -> &[ObjectiveVector] {
        &self.objectives
    }

    pub fn throughputs(&self) -> Vec<f64> {
        self.objectives.iter().map(|o| o.throughput).collect()
    }

    pub fn efficiencies(&self) -> Vec<f64> {
        self.objectives.iter().map(|o| o.efficiency).collect()
    }

    /// Front membership, aligned with population indices.
    pub fn front_mask(&self) -> &[bool] {
        &self.front_mask
    }

    /// Front member indices in ascending throughput order.
    pub fn front_indices(&self) -> &[usize] {
        &self.front_indices
    }

    pub fn is_on_front(&self, index: usize) -> bool {
        self.front_mask.get(index).copied().unwrap_or(false)
    }

    pub fn optimal_index(&self) -> Option<usize> {
        self.optimal_index
    }

    pub fn optimal_point(&self) -> Option<ObjectiveVector> {
        self.optimal_index.map(|i| self.objectives[i])
    }

    /// Front points `(throughput, efficiency)` in ascending throughput order.
    pub fn pareto_front(&self) -> Vec<(f64, f64)> {
        self.front_indices
            .iter()
            .map(|&i| self.objectives[i].point())
            .collect()
    }

    pub fn solution(&self, index: usize) -> Option<&Solution> {
        self.solutions.get(index)
    }

    /// Configuration of a population row, laid over the baseline.
    pub fn solution_config(&self, index: usize) -> Option<EquipmentConfig> {
        self.solutions
            .get(index)
            .map(|row| self.baseline.overlay_row(&self.criteria, row.values()))
    }

    /// Objectives of the baseline under the frozen model.
    pub fn baseline_objectives(&self) -> ObjectiveVector {
        self.model.evaluate(&self.baseline, self.required_productivity)
    }

    /// Summary statistics over the whole population.
    pub fn stats(&self) -> PopulationStats {
        PopulationStats {
            population: self.len(),
            front_size: self.front_indices.len(),
            throughput: ObjectiveStats::from_values(&self.throughputs()),
            efficiency: ObjectiveStats::from_values(&self.efficiencies()),
        }
    }
}

/// Mean, spread and range of one objective.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObjectiveStats {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl ObjectiveStats {
    /// `None` for fewer than one finite value.
    fn from_values(values: &[f64]) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        let std_dev = if finite.len() > 1 {
            Statistics::std_dev(finite.iter())
        } else {
            0.0
        };
        Some(Self {
            mean: Statistics::mean(finite.iter()),
            std_dev,
            min: Statistics::min(finite.iter()),
            max: Statistics::max(finite.iter()),
        })
    }
}

/// Population-level statistics for reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PopulationStats {
    pub population: usize,
    pub front_size: usize,
    pub throughput: Option<ObjectiveStats>,
    pub efficiency: Option<ObjectiveStats>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelCoefficients;
    use crate::types::{CriterionKind, Pump};

    fn snapshot_of(rows: Vec<Vec<f64>>) -> PopulationSnapshot {
        let model = EquipmentModel::new(
            vec![Pump::new("pump1", 120.0, 25.0, 85.0)],
            ModelCoefficients::default(),
        );
        let baseline = EquipmentConfig::new()
            .with(CriterionKind::Pressure, 10.0)
            .with(CriterionKind::Wear, 30.0)
            .with(CriterionKind::MaintenanceCost, 500.0)
            .with(CriterionKind::Age, 5.0);
        PopulationSnapshot::build(
            1,
            Criterion::default_set(),
            baseline,
            model,
            None,
            rows.into_iter().map(Solution).collect(),
        )
    }

    #[test]
    fn arrays_are_index_aligned() {
        let snap = snapshot_of(vec![
            vec![10.0, 30.0, 500.0, 5.0],
            vec![5.0, 10.0, 200.0, 1.0],
            vec![20.0, 60.0, 900.0, 12.0],
        ]);
        assert_eq!(snap.len(), 3);
        assert_eq!(snap.objectives().len(), 3);
        assert_eq!(snap.front_mask().len(), 3);
        // Lower pressure, wear, cost and age beat row 2 on both objectives
        assert!(snap.is_on_front(1));
        assert!(!snap.is_on_front(2));
        assert_eq!(snap.optimal_index(), Some(1));
    }

    #[test]
    fn solution_config_round_trips_row() {
        let snap = snapshot_of(vec![vec![12.0, 25.0, 400.0, 3.0]]);
        let cfg = snap.solution_config(0).expect("row 0 exists");
        assert_eq!(cfg.get(CriterionKind::Pressure), Some(12.0));
        assert_eq!(cfg.get(CriterionKind::Age), Some(3.0));
        assert!(snap.solution_config(1).is_none());
    }

    #[test]
    fn empty_population_has_no_optimum_or_stats() {
        let snap = snapshot_of(Vec::new());
        assert!(snap.is_empty());
        assert!(snap.optimal_point().is_none());
        assert!(snap.pareto_front().is_empty());
        let stats = snap.stats();
        assert_eq!(stats.population, 0);
        assert!(stats.throughput.is_none());
    }

    #[test]
    fn stats_bound_the_population() {
        let snap = snapshot_of(vec![
            vec![10.0, 30.0, 500.0, 5.0],
            vec![5.0, 10.0, 200.0, 1.0],
        ]);
        let t = snap.stats().throughput.expect("non-empty population");
        assert!(t.min <= t.mean && t.mean <= t.max);
        assert!(t.std_dev > 0.0);
    }
}
