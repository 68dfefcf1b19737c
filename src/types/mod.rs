//! Shared types for the pumping-station optimizer
//!
//! - `criterion`: criteria, directions, bounds, equipment configuration
//! - `pump`: pump catalog entries
//! - `solution`: population rows, objective vectors, query results
//! - `recommendation`: operator guidance

pub mod criterion;
pub mod pump;
pub mod recommendation;
pub mod solution;

pub use criterion::{Bounds, Criterion, CriterionKind, Direction, EquipmentConfig};
pub use pump::{Pump, PumpUpdate};
pub use recommendation::{Recommendation, RecommendationCategory, RecommendationSet};
pub use solution::{ClosestSolution, ObjectiveVector, Solution, Waypoint};
