//! Population rows and their derived objectives

use serde::{Deserialize, Serialize};

/// One sampled candidate: a value per criterion, aligned with the criteria list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Solution(pub Vec<f64>);

impl Solution {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Derived objectives of a solution: (throughput, efficiency, composite).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveVector {
    /// Throughput (m³/h)
    pub throughput: f64,
    /// System efficiency (0–100 %)
    pub efficiency: f64,
    /// Composite score, used only to pick among front members
    pub composite: f64,
}

impl ObjectiveVector {
    /// Point in the 2-D objective plane.
    pub fn point(&self) -> (f64, f64) {
        (self.throughput, self.efficiency)
    }

    /// Whether `self` dominates `other` under (throughput, efficiency), both maximised.
    pub fn dominates(&self, other: &ObjectiveVector) -> bool {
        self.throughput >= other.throughput
            && self.efficiency >= other.efficiency
            && (self.throughput > other.throughput || self.efficiency > other.efficiency)
    }

    pub fn is_finite(&self) -> bool {
        self.throughput.is_finite() && self.efficiency.is_finite()
    }
}

/// Result of a nearest-solution lookup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosestSolution {
    /// Population index
    pub index: usize,
    /// Euclidean distance in (throughput, efficiency) space
    pub distance: f64,
}

/// One step of a transition path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub step: usize,
    /// Interpolation fraction, 0.0 at the baseline and 1.0 at the target
    pub fraction: f64,
    pub throughput: f64,
    pub efficiency: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ov(t: f64, e: f64) -> ObjectiveVector {
        ObjectiveVector { throughput: t, efficiency: e, composite: 0.0 }
    }

    #[test]
    fn dominance_requires_one_strict_improvement() {
        assert!(ov(10.0, 50.0).dominates(&ov(9.0, 50.0)));
        assert!(ov(10.0, 51.0).dominates(&ov(10.0, 50.0)));
        assert!(!ov(10.0, 50.0).dominates(&ov(10.0, 50.0)));
        assert!(!ov(11.0, 49.0).dominates(&ov(10.0, 50.0)));
    }
}
