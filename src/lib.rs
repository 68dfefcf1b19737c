//! PUMPFRONT: Pumping Station Pareto Optimizer
//!
//! Decision support for a pumping-station operator: sample candidate
//! operating configurations around the current one, evaluate throughput and
//! system efficiency for each, and report the non-dominated set plus one
//! recommended operating point.
//!
//! ## Architecture
//!
//! - **Equipment Model**: pump and station efficiency / throughput math
//! - **Optimization**: sampler, Pareto front, snapshot, queries, recommendations
//! - **Forecast**: required-productivity sources (CSV, static, fallback)
//! - **Config**: TOML station config with validation

pub mod config;
pub mod equipment_model;
pub mod forecast;
pub mod optimization;
pub mod types;

// Re-export station configuration
pub use config::{ConfigError, StationConfig};

// Re-export the engine
pub use optimization::{OptimizationReport, ParetoOptimizer, PopulationSnapshot, TransitionPath};

// Re-export commonly used types
pub use types::{
    Bounds, ClosestSolution, Criterion, CriterionKind, Direction, EquipmentConfig,
    ObjectiveVector, Pump, PumpUpdate, Recommendation, RecommendationCategory,
    RecommendationSet, Solution, Waypoint,
};

// Re-export forecast sources
pub use forecast::{
    CsvForecastProvider, FallbackForecast, ForecastError, ForecastProvider, ForecastSample,
    StaticForecast,
};
