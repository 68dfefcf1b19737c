//! Queries over a snapshot: nearest solution and transition paths

use std::sync::Arc;

use crate::types::{ClosestSolution, Waypoint};

use super::snapshot::PopulationSnapshot;

/// Population row nearest to `(throughput, efficiency)` in Euclidean distance.
///
/// Ties resolve to the lowest index. `None` for an empty population or a
/// non-finite query point.
pub fn find_closest_solution(
    snapshot: &PopulationSnapshot,
    throughput: f64,
    efficiency: f64,
) -> Option<ClosestSolution> {
    if !throughput.is_finite() || !efficiency.is_finite() {
        return None;
    }

    let mut best: Option<ClosestSolution> = None;
    for (index, ov) in snapshot.objectives().iter().enumerate() {
        let distance = (ov.throughput - throughput).hypot(ov.efficiency - efficiency);
        if distance.is_nan() {
            continue;
        }
        match best {
            Some(b) if b.distance <= distance => {}
            _ => best = Some(ClosestSolution { index, distance }),
        }
    }
    best
}

/// Lazy, restartable walk from the snapshot baseline to a target solution.
///
/// Every criterion is interpolated linearly; each waypoint is evaluated
/// through the snapshot's equipment model when it is yielded.
#[derive(Debug, Clone)]
pub struct TransitionPath {
    snapshot: Arc<PopulationSnapshot>,
    start: Vec<f64>,
    end: Vec<f64>,
    steps: usize,
    next_step: usize,
}

impl TransitionPath {
    /// `None` when `target` is not a population index. `steps` below 2 is raised to 2.
    pub fn new(snapshot: Arc<PopulationSnapshot>, target: usize, steps: usize) -> Option<Self> {
        let end = snapshot.solution(target)?.values().to_vec();
        let start = snapshot.baseline().to_row(snapshot.criteria());
        Some(Self {
            snapshot,
            start,
            end,
            steps: steps.max(2),
            next_step: 0,
        })
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Rewind to the baseline.
    pub fn restart(&mut self) {
        self.next_step = 0;
    }

    fn waypoint(&self, step: usize) -> Waypoint {
        let fraction = step as f64 / (self.steps - 1) as f64;
        let row: Vec<f64> = self
            .start
            .iter()
            .zip(&self.end)
            .map(|(a, b)| a + (b - a) * fraction)
            .collect();
        let config = self
            .snapshot
            .baseline()
            .overlay_row(self.snapshot.criteria(), &row);
        let ov = self
            .snapshot
            .model()
            .evaluate(&config, self.snapshot.required_productivity());
        Waypoint {
            step,
            fraction,
            throughput: ov.throughput,
            efficiency: ov.efficiency,
        }
    }
}

impl Iterator for TransitionPath {
    type Item = Waypoint;

    fn next(&mut self) -> Option<Waypoint> {
        if self.next_step >= self.steps {
            return None;
        }
        let wp = self.waypoint(self.next_step);
        self.next_step += 1;
        Some(wp)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.steps.saturating_sub(self.next_step);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TransitionPath {}
