//! Pareto Optimization Engine
//!
//! Samples candidate operating points around the current configuration,
//! evaluates them through the equipment model, extracts the non-dominated
//! front over (throughput, efficiency) and picks one recommended point by
//! composite score. Entirely algorithmic and synchronous.
//!
//! ## Stages
//!
//! 1. `sampler`: population around the baseline
//! 2. `snapshot`: objectives, front mask and optimum, frozen together
//! 3. `query`: nearest solution and transition paths
//! 4. `recommendations`: operator guidance for one configuration

mod engine;
pub mod pareto;
pub mod query;
pub mod recommendations;
mod report;
pub mod sampler;
pub mod snapshot;

pub use engine::ParetoOptimizer;
pub use query::TransitionPath;
pub use report::{FrontPoint, OptimalSummary, OptimizationReport};
pub use sampler::{SamplingWindow, SolutionSampler};
pub use snapshot::{ObjectiveStats, PopulationSnapshot, PopulationStats};
