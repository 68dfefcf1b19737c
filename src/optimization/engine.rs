//! ParetoOptimizer: owns the station model and the current population

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwapOption;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::config::{ForecastConfig, StationConfig};
use crate::equipment_model::EquipmentModel;
use crate::forecast::{CsvForecastProvider, FallbackForecast, ForecastProvider};
use crate::types::{ClosestSolution, Criterion, EquipmentConfig, PumpUpdate, RecommendationSet};

use super::query::{self, TransitionPath};
use super::recommendations;
use super::report::OptimizationReport;
use super::sampler::SolutionSampler;
use super::snapshot::PopulationSnapshot;

/// Multi-objective optimizer for one pumping station.
///
/// Generation builds a fresh [`PopulationSnapshot`] and installs it in one
/// atomic store. Queries load the current snapshot once and work on that
/// `Arc`, so a concurrent regeneration never changes a query's answer.
pub struct ParetoOptimizer {
    station: String,
    criteria: Vec<Criterion>,
    model: EquipmentModel,
    sampler: SolutionSampler,
    default_baseline: EquipmentConfig,
    forecast_config: ForecastConfig,
    required_productivity: Option<f64>,
    forecast: Option<Box<dyn ForecastProvider>>,
    current: ArcSwapOption<PopulationSnapshot>,
    generation: AtomicU64,
}

impl ParetoOptimizer {
    /// Build from a station config.
    ///
    /// A configured forecast CSV is wrapped in the built-in fallback series.
    pub fn new(config: StationConfig) -> Self {
        let forecast: Option<Box<dyn ForecastProvider>> = config
            .forecast
            .csv_path
            .as_ref()
            .map(|path| Box::new(FallbackForecast::new(CsvForecastProvider::new(path))) as Box<dyn ForecastProvider>);

        let mut optimizer = Self {
            station: config.station.name,
            criteria: config.criteria,
            model: EquipmentModel::new(config.pumps, config.model),
            sampler: SolutionSampler::new(config.sampling),
            default_baseline: config.baseline,
            forecast_config: config.forecast,
            required_productivity: None,
            forecast,
            current: ArcSwapOption::empty(),
            generation: AtomicU64::new(0),
        };
        optimizer.set_required_productivity(optimizer.forecast_config.required_productivity);

        info!(
            station = %optimizer.station,
            pumps = optimizer.model.pumps().len(),
            active = optimizer.model.active_pump_count(),
            criteria = optimizer.criteria.len(),
            "Pareto optimizer initialized"
        );
        optimizer
    }

    /// Replace the forecast source.
    pub fn with_forecast(mut self, provider: impl ForecastProvider + 'static) -> Self {
        debug!(source = %provider.describe(), "Forecast provider installed");
        self.forecast = Some(Box::new(provider));
        self
    }

    pub fn station(&self) -> &str {
        &self.station
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Live model; edits apply from the next generation on.
    pub fn model(&self) -> &EquipmentModel {
        &self.model
    }

    pub fn default_solutions(&self) -> usize {
        self.sampler.config().default_solutions
    }

    pub fn path_steps(&self) -> usize {
        self.sampler.config().path_steps
    }

    // ========================================================================
    // Required productivity
    // ========================================================================

    /// Set or clear the explicit target. Non-finite or non-positive values clear it.
    pub fn set_required_productivity(&mut self, target: Option<f64>) {
        self.required_productivity = match target {
            Some(t) if t.is_finite() && t > 0.0 => Some(t),
            Some(t) => {
                warn!(target = t, "Ignoring invalid required productivity");
                None
            }
            None => None,
        };
    }

    /// Use the latest forecast value as the target when no explicit one is set.
    pub fn set_forecast_as_target(&mut self, enabled: bool) {
        self.forecast_config.use_as_target = enabled;
    }

    /// Latest value of the forecast source, if any.
    pub fn forecast_value(&self) -> Option<f64> {
        let provider = self.forecast.as_ref()?;
        match provider.latest_value() {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(source = %provider.describe(), error = %e, "Forecast value unavailable");
                None
            }
        }
    }

    /// Target applied at generation: explicit value, else the forecast when enabled.
    pub fn required_productivity(&self) -> Option<f64> {
        if self.required_productivity.is_some() {
            return self.required_productivity;
        }
        if self.forecast_config.use_as_target {
            return self.forecast_value().filter(|v| *v > 0.0);
        }
        None
    }

    // ========================================================================
    // Pump control
    // ========================================================================

    /// Returns `false` for an unknown pump id.
    pub fn set_pump_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.model.pumps_mut().iter_mut().find(|p| p.id == id) {
            Some(pump) => {
                pump.enabled = enabled;
                info!(pump = id, enabled, "Pump state changed");
                true
            }
            None => {
                warn!(pump = id, "Unknown pump id");
                false
            }
        }
    }

    /// Returns `false` for an unknown pump id.
    pub fn update_pump(&mut self, id: &str, update: PumpUpdate) -> bool {
        match self.model.pumps_mut().iter_mut().find(|p| p.id == id) {
            Some(pump) => {
                update.apply(pump);
                info!(
                    pump = id,
                    max_flow = pump.max_flow,
                    max_pressure = pump.max_pressure,
                    rated_efficiency = pump.rated_efficiency,
                    "Pump updated"
                );
                true
            }
            None => {
                warn!(pump = id, "Unknown pump id");
                false
            }
        }
    }

    // ========================================================================
    // Generation
    // ========================================================================

    /// Sample, evaluate and install a new population.
    ///
    /// `input` overlays the previous baseline (or the configured default on
    /// the first run); missing and non-finite values keep the older value.
    /// `requested` defaults to `sampling.default_solutions` and is clamped to
    /// the configured range.
    pub fn generate(&self, requested: Option<usize>, input: &EquipmentConfig) -> Arc<PopulationSnapshot> {
        let started = Instant::now();

        let previous = self
            .current
            .load_full()
            .map_or_else(|| self.default_baseline.clone(), |snap| snap.baseline().clone());
        let baseline = input.merge_over(&previous);

        let n = self
            .sampler
            .config()
            .clamp_size(requested.unwrap_or_else(|| self.default_solutions()));

        let mut rng = match self.sampler.config().seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let solutions = self.sampler.sample(&self.criteria, &baseline, n, &mut rng);

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = Arc::new(PopulationSnapshot::build(
            generation,
            self.criteria.clone(),
            baseline,
            self.model.clone(),
            self.required_productivity(),
            solutions,
        ));

        // Never replace a newer snapshot with an older one
        self.current.rcu(|current| match current {
            Some(existing) if existing.generation() > generation => Some(Arc::clone(existing)),
            _ => Some(Arc::clone(&snapshot)),
        });

        info!(
            station = %self.station,
            generation,
            population = snapshot.len(),
            front_size = snapshot.front_indices().len(),
            optimal = ?snapshot.optimal_index(),
            target = ?snapshot.required_productivity(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Population generated"
        );
        if snapshot.optimal_index().is_none() {
            warn!(generation, "Pareto front is empty; no optimal point");
        }

        snapshot
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Current population, if one has been generated.
    pub fn snapshot(&self) -> Option<Arc<PopulationSnapshot>> {
        self.current.load_full()
    }

    pub fn find_closest_solution(&self, throughput: f64, efficiency: f64) -> Option<ClosestSolution> {
        let snapshot = self.snapshot()?;
        query::find_closest_solution(&snapshot, throughput, efficiency)
    }

    /// Path from the baseline to `target`; `None` without a population or for an unknown index.
    pub fn transition_path(&self, target: usize, steps: usize) -> Option<TransitionPath> {
        TransitionPath::new(self.snapshot()?, target, steps)
    }

    /// Recommendations for `solution`, or for the baseline when `None`.
    pub fn recommendations(&self, solution: Option<usize>) -> RecommendationSet {
        match self.snapshot() {
            Some(snapshot) => recommendations::generate(&snapshot, solution),
            None => RecommendationSet::Unavailable,
        }
    }

    pub fn report(&self) -> Option<OptimizationReport> {
        let snapshot = self.snapshot()?;
        Some(OptimizationReport::from_snapshot(&self.station, &snapshot))
    }
}
