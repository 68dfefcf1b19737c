//! Optimization criteria and equipment configuration values

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Semantic role of a criterion inside the equipment model.
///
/// The model reads values by role, never by display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    /// Outlet pressure (atm)
    Pressure,
    /// Equipment wear (%)
    Wear,
    /// Maintenance cost (rub/h)
    MaintenanceCost,
    /// Equipment age (years)
    Age,
}

impl CriterionKind {
    /// All kinds in canonical order.
    pub const ALL: [CriterionKind; 4] = [
        CriterionKind::Pressure,
        CriterionKind::Wear,
        CriterionKind::MaintenanceCost,
        CriterionKind::Age,
    ];

    /// Stable key used in config files and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            CriterionKind::Pressure => "pressure",
            CriterionKind::Wear => "wear",
            CriterionKind::MaintenanceCost => "maintenance_cost",
            CriterionKind::Age => "age",
        }
    }

    /// Parse a config / CLI key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key.trim())
    }

    /// Direction the operator wants this quantity to move.
    pub fn natural_direction(&self) -> Direction {
        match self {
            CriterionKind::Pressure => Direction::Maximize,
            CriterionKind::Wear | CriterionKind::MaintenanceCost | CriterionKind::Age => {
                Direction::Minimize
            }
        }
    }
}

impl std::fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Optimization direction of a criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Maximize,
    Minimize,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Maximize => write!(f, "↑"),
            Direction::Minimize => write!(f, "↓"),
        }
    }
}

/// Closed interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

/// A named scalar input with a fixed direction and optional bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub kind: CriterionKind,
    /// Display text only
    pub label: String,
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
}

impl Criterion {
    pub fn new(kind: CriterionKind, label: impl Into<String>, bounds: Option<Bounds>) -> Self {
        Self {
            kind,
            label: label.into(),
            direction: kind.natural_direction(),
            bounds,
        }
    }

    /// Default criteria set: pressure and wear bounded, cost and age noisy.
    pub fn default_set() -> Vec<Criterion> {
        vec![
            Criterion::new(
                CriterionKind::Pressure,
                "Outlet pressure (atm)",
                Some(Bounds::new(0.0, 25.0)),
            ),
            Criterion::new(
                CriterionKind::Wear,
                "Equipment wear (%)",
                Some(Bounds::new(0.0, 100.0)),
            ),
            Criterion::new(CriterionKind::MaintenanceCost, "Maintenance cost (rub/h)", None),
            Criterion::new(CriterionKind::Age, "Equipment age (years)", None),
        ]
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.label, self.direction)
    }
}

/// Current scalar value per criterion kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquipmentConfig {
    values: BTreeMap<CriterionKind, f64>,
}

impl EquipmentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: CriterionKind, value: f64) -> Self {
        self.values.insert(kind, value);
        self
    }

    pub fn set(&mut self, kind: CriterionKind, value: f64) {
        self.values.insert(kind, value);
    }

    pub fn get(&self, kind: CriterionKind) -> Option<f64> {
        self.values.get(&kind).copied()
    }

    /// Value for `kind`, or 0.0 if absent.
    pub fn value(&self, kind: CriterionKind) -> f64 {
        self.get(kind).unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CriterionKind, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    /// Overlay `self` on top of `fallback`.
    ///
    /// Missing or non-finite entries take the fallback value; nothing is rejected.
    pub fn merge_over(&self, fallback: &EquipmentConfig) -> EquipmentConfig {
        let mut merged = fallback.clone();
        for (kind, value) in self.iter() {
            if value.is_finite() {
                merged.set(kind, value);
            } else {
                warn!(criterion = %kind, value, "Non-finite input replaced with previous value");
            }
        }
        merged
    }

    /// Copy of `self` with a solution row aligned with `criteria` written over it.
    ///
    /// Kinds the row does not cover keep the value they have in `self`.
    pub fn overlay_row(&self, criteria: &[Criterion], row: &[f64]) -> Self {
        let mut config = self.clone();
        for (criterion, value) in criteria.iter().zip(row) {
            config.set(criterion.kind, *value);
        }
        config
    }

    /// Row of values aligned with `criteria` (missing → 0.0).
    pub fn to_row(&self, criteria: &[Criterion]) -> Vec<f64> {
        criteria.iter().map(|c| self.value(c.kind)).collect()
    }
}
