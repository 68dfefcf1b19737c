//! Solution sampler: candidate operating points around a baseline

use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};
use tracing::{debug, warn};

use crate::config::SamplingConfig;
use crate::types::{Bounds, Criterion, EquipmentConfig, Solution};

/// How a single criterion is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SamplingWindow {
    /// Uniform over `[low, high]`
    Uniform { low: f64, high: f64 },
    /// Normal around `mean`
    Normal { mean: f64, std_dev: f64 },
    /// Degenerate window: always `value`
    Fixed(f64),
}

impl SamplingWindow {
    /// Window for a bounded criterion.
    ///
    /// Intersects `[baseline × (1 − w), baseline × (1 + w)]` with the bounds.
    /// An empty intersection collapses onto the bound nearest the baseline.
    pub fn bounded(baseline: f64, bounds: Bounds, window_fraction: f64) -> Self {
        let a = baseline * (1.0 - window_fraction);
        let b = baseline * (1.0 + window_fraction);
        let low = a.min(b).max(bounds.min);
        let high = a.max(b).min(bounds.max);

        if low < high {
            SamplingWindow::Uniform { low, high }
        } else if low == high {
            SamplingWindow::Fixed(low)
        } else {
            SamplingWindow::Fixed(bounds.clamp(baseline))
        }
    }

    /// Window for an unbounded criterion.
    pub fn unbounded(baseline: f64, noise_fraction: f64, min_std_dev: f64) -> Self {
        SamplingWindow::Normal {
            mean: baseline,
            std_dev: (baseline.abs() * noise_fraction).max(min_std_dev),
        }
    }

    /// Window for `criterion` at `baseline`.
    pub fn for_criterion(criterion: &Criterion, baseline: f64, cfg: &SamplingConfig) -> Self {
        match criterion.bounds {
            Some(bounds) => Self::bounded(baseline, bounds, cfg.window_fraction),
            None => Self::unbounded(baseline, cfg.noise_fraction, cfg.min_std_dev),
        }
    }

    /// Draw `n` values.
    fn draw<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        match *self {
            SamplingWindow::Uniform { low, high } => {
                let dist = Uniform::new_inclusive(low, high);
                (0..n).map(|_| dist.sample(rng)).collect()
            }
            SamplingWindow::Normal { mean, std_dev } => match Normal::new(mean, std_dev) {
                Ok(dist) => (0..n).map(|_| dist.sample(rng)).collect(),
                Err(e) => {
                    warn!(mean, std_dev, error = %e, "Invalid normal window, using baseline");
                    vec![mean; n]
                }
            },
            SamplingWindow::Fixed(value) => vec![value; n],
        }
    }
}

/// Draws populations of independent per-criterion samples.
#[derive(Debug, Clone)]
pub struct SolutionSampler {
    config: SamplingConfig,
}

impl SolutionSampler {
    pub fn new(config: SamplingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// Sample `n` solutions around `baseline`, one column per criterion.
    ///
    /// Missing baseline values sample around 0.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        criteria: &[Criterion],
        baseline: &EquipmentConfig,
        n: usize,
        rng: &mut R,
    ) -> Vec<Solution> {
        let columns: Vec<Vec<f64>> = criteria
            .iter()
            .map(|criterion| {
                let base = baseline.value(criterion.kind);
                let window = SamplingWindow::for_criterion(criterion, base, &self.config);
                debug!(criterion = %criterion.kind, baseline = base, ?window, "Sampling window");

                let mut column = window.draw(n, rng);
                if criterion.bounds.is_none() && self.config.clamp_unbounded_non_negative {
                    for v in &mut column {
                        *v = v.max(0.0);
                    }
                }
                column
            })
            .collect();

        (0..n)
            .map(|row| Solution(columns.iter().map(|col| col[row]).collect()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CriterionKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn wear_only() -> Vec<Criterion> {
        vec![Criterion::new(CriterionKind::Wear, "Wear", Some(Bounds::new(0.0, 100.0)))]
    }

    #[test]
    fn bounded_samples_respect_window() {
        let sampler = SolutionSampler::new(SamplingConfig::default());
        let baseline = EquipmentConfig::new().with(CriterionKind::Wear, 20.0);
        let mut rng = StdRng::seed_from_u64(7);

        let rows = sampler.sample(&wear_only(), &baseline, 1000, &mut rng);
        assert_eq!(rows.len(), 1000);
        for row in &rows {
            let v = row.values()[0];
            assert!((14.0 - 1e-9..=26.0 + 1e-9).contains(&v), "sample {v} outside [14, 26]");
        }
    }

    #[test]
    fn window_clipped_by_bounds() {
        match SamplingWindow::bounded(90.0, Bounds::new(0.0, 100.0), 0.3) {
            SamplingWindow::Uniform { low, high } => {
                assert!((low - 63.0).abs() < 1e-9);
                assert_eq!(high, 100.0);
            }
            other => panic!("expected uniform window, got {other:?}"),
        }
    }

    #[test]
    fn window_collapses_when_baseline_beyond_bound() {
        let w = SamplingWindow::bounded(200.0, Bounds::new(0.0, 100.0), 0.3);
        assert_eq!(w, SamplingWindow::Fixed(100.0));

        let w = SamplingWindow::bounded(-10.0, Bounds::new(0.0, 100.0), 0.3);
        assert_eq!(w, SamplingWindow::Fixed(0.0));
    }

    #[test]
    fn zero_baseline_bounded_is_fixed() {
        let w = SamplingWindow::bounded(0.0, Bounds::new(0.0, 100.0), 0.3);
        assert_eq!(w, SamplingWindow::Fixed(0.0));
    }

    #[test]
    fn unbounded_std_dev_floored() {
        let w = SamplingWindow::unbounded(0.0, 0.15, 1e-9);
        assert_eq!(w, SamplingWindow::Normal { mean: 0.0, std_dev: 1e-9 });
    }

    #[test]
    fn unbounded_samples_clamped_non_negative() {
        let sampler = SolutionSampler::new(SamplingConfig::default());
        let criteria = vec![Criterion::new(CriterionKind::Age, "Age", None)];
        let baseline = EquipmentConfig::new().with(CriterionKind::Age, 1.0);
        let mut rng = StdRng::seed_from_u64(11);
        let rows = sampler.sample(&criteria, &baseline, 2000, &mut rng);
        assert!(rows.iter().all(|r| r.values()[0] >= 0.0));
    }

    #[test]
    fn same_seed_same_population() {
        let sampler = SolutionSampler::new(SamplingConfig::default());
        let criteria = Criterion::default_set();
        let baseline = EquipmentConfig::new()
            .with(CriterionKind::Pressure, 10.0)
            .with(CriterionKind::Wear, 30.0)
            .with(CriterionKind::MaintenanceCost, 500.0)
            .with(CriterionKind::Age, 5.0);
        let a = sampler.sample(&criteria, &baseline, 50, &mut StdRng::seed_from_u64(3));
        let b = sampler.sample(&criteria, &baseline, 50, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
        assert!(a.iter().all(|row| row.len() == criteria.len()));
    }
}
