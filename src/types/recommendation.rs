//! Operator guidance produced by the recommendation narrator

use serde::{Deserialize, Serialize};

/// What a recommendation is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    /// Criterion value relative to its bounds
    Criterion,
    /// Computed throughput / efficiency
    Computed,
    /// Enabled pump summary
    ActivePumps,
    /// Gap to the optimal point
    Optimum,
    /// Pump catalog attributes
    Pump,
    /// Efficiency or throughput warnings
    Health,
    /// Required-productivity gap analysis
    Forecast,
    /// Nothing to recommend (empty front)
    NoRecommendation,
}

impl std::fmt::Display for RecommendationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RecommendationCategory::Criterion => "criterion",
            RecommendationCategory::Computed => "computed",
            RecommendationCategory::ActivePumps => "active_pumps",
            RecommendationCategory::Optimum => "optimum",
            RecommendationCategory::Pump => "pump",
            RecommendationCategory::Health => "health",
            RecommendationCategory::Forecast => "forecast",
            RecommendationCategory::NoRecommendation => "no_recommendation",
        };
        write!(f, "{s}")
    }
}

/// A single line of guidance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub message: String,
}

impl Recommendation {
    pub fn new(category: RecommendationCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Recommendations for one configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecommendationSet {
    /// No population has been generated yet
    Unavailable,
    Available {
        /// Population index, or `None` for the baseline
        solution: Option<usize>,
        items: Vec<Recommendation>,
    },
}

impl RecommendationSet {
    pub fn is_available(&self) -> bool {
        matches!(self, RecommendationSet::Available { .. })
    }

    pub fn items(&self) -> &[Recommendation] {
        match self {
            RecommendationSet::Unavailable => &[],
            RecommendationSet::Available { items, .. } => items,
        }
    }

    /// Plain strings for a presentation layer.
    pub fn lines(&self) -> Vec<String> {
        self.items().iter().map(|r| r.message.clone()).collect()
    }

    pub fn in_category(&self, category: RecommendationCategory) -> impl Iterator<Item = &Recommendation> {
        self.items().iter().filter(move |r| r.category == category)
    }
}
