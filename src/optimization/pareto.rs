//! Pareto front extraction over (throughput, efficiency)
//!
//! Both objectives are maximised. The front is computed with a skyline
//! sweep: sort by throughput descending, then keep every point whose
//! efficiency strictly exceeds the best efficiency seen so far.
//!
//! Tie-break: equal throughput is ordered by efficiency descending, then by
//! population index ascending. Exact duplicates therefore contribute only
//! their lowest index to the front.

use std::cmp::Ordering;

use crate::types::ObjectiveVector;

/// Membership mask of the non-dominated subset, aligned with `objectives`.
///
/// Non-finite points never join the front.
pub fn pareto_mask(objectives: &[ObjectiveVector]) -> Vec<bool> {
    let mut order: Vec<usize> = (0..objectives.len())
        .filter(|&i| objectives[i].is_finite())
        .collect();

    order.sort_by(|&a, &b| skyline_order(a, &objectives[a], b, &objectives[b]));

    let mut mask = vec![false; objectives.len()];
    let mut best_efficiency = f64::NEG_INFINITY;
    for idx in order {
        let eff = objectives[idx].efficiency;
        if eff > best_efficiency {
            mask[idx] = true;
            best_efficiency = eff;
        }
    }
    mask
}

/// Only called on finite points, so `partial_cmp` is total here and treats
/// `-0.0` and `0.0` as equal, the same way dominance does.
fn skyline_order(ia: usize, a: &ObjectiveVector, ib: usize, b: &ObjectiveVector) -> Ordering {
    b.throughput
        .partial_cmp(&a.throughput)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.efficiency.partial_cmp(&a.efficiency).unwrap_or(Ordering::Equal))
        .then_with(|| ia.cmp(&ib))
}

/// Indices of front members, in ascending throughput order.
pub fn front_indices(objectives: &[ObjectiveVector], mask: &[bool]) -> Vec<usize> {
    let mut indices: Vec<usize> = mask
        .iter()
        .enumerate()
        .filter_map(|(i, &on_front)| on_front.then_some(i))
        .collect();
    indices.sort_by(|&a, &b| {
        objectives[a]
            .throughput
            .total_cmp(&objectives[b].throughput)
            .then_with(|| a.cmp(&b))
    });
    indices
}

/// Front member with the highest composite score; ties go to the lowest index.
///
/// `None` for an empty front.
pub fn select_optimal(objectives: &[ObjectiveVector], mask: &[bool]) -> Option<usize> {
    mask.iter()
        .enumerate()
        .filter(|(_, &on_front)| on_front)
        .map(|(i, _)| i)
        .filter(|&i| !objectives[i].composite.is_nan())
        .fold(None, |best: Option<usize>, i| match best {
            Some(b) if objectives[b].composite >= objectives[i].composite => Some(b),
            _ => Some(i),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn ov(t: f64, e: f64, c: f64) -> ObjectiveVector {
        ObjectiveVector { throughput: t, efficiency: e, composite: c }
    }

    fn random_population(n: usize, seed: u64) -> Vec<ObjectiveVector> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| {
                // Coarse grid so throughput ties actually occur
                let t = f64::from(rng.gen_range(0..40_u32));
                let e = f64::from(rng.gen_range(0..40_u32));
                ov(t, e, t + e)
            })
            .collect()
    }

    #[test]
    fn empty_population_has_empty_front() {
        let mask = pareto_mask(&[]);
        assert!(mask.is_empty());
        assert_eq!(select_optimal(&[], &mask), None);
    }

    #[test]
    fn simple_front() {
        let pop = vec![
            ov(10.0, 50.0, 0.0), // front
            ov(8.0, 60.0, 0.0),  // front
            ov(7.0, 55.0, 0.0),  // dominated by (8, 60)
            ov(5.0, 70.0, 0.0),  // front
            ov(10.0, 40.0, 0.0), // dominated by (10, 50)
        ];
        assert_eq!(pareto_mask(&pop), vec![true, true, false, true, false]);
        assert_eq!(front_indices(&pop, &pareto_mask(&pop)), vec![3, 1, 0]);
    }

    #[test]
    fn duplicates_keep_lowest_index() {
        let pop = vec![ov(5.0, 5.0, 0.0), ov(5.0, 5.0, 0.0), ov(5.0, 5.0, 0.0)];
        assert_eq!(pareto_mask(&pop), vec![true, false, false]);
    }

    #[test]
    fn equal_throughput_prefers_higher_efficiency() {
        let pop = vec![ov(5.0, 1.0, 0.0), ov(5.0, 9.0, 0.0)];
        assert_eq!(pareto_mask(&pop), vec![false, true]);
    }

    #[test]
    fn signed_zero_throughput_counts_as_a_tie() {
        let pop = vec![ov(0.0, 50.0, 0.0), ov(-0.0, 60.0, 0.0)];
        assert!(pop[1].dominates(&pop[0]));
        assert_eq!(pareto_mask(&pop), vec![false, true]);
    }

    #[test]
    fn nan_points_excluded() {
        let pop = vec![ov(f64::NAN, 100.0, 0.0), ov(1.0, 1.0, 0.0)];
        assert_eq!(pareto_mask(&pop), vec![false, true]);
    }

    #[test]
    fn front_members_are_mutually_non_dominated() {
        let pop = random_population(2000, 42);
        let mask = pareto_mask(&pop);
        let front: Vec<&ObjectiveVector> = pop.iter().zip(&mask).filter(|(_, &m)| m).map(|(p, _)| p).collect();
        assert!(!front.is_empty());
        for a in &front {
            for b in &front {
                assert!(!a.dominates(b), "{a:?} dominates {b:?}");
            }
        }
    }

    #[test]
    fn dominated_points_never_on_front() {
        let pop = random_population(1500, 9);
        let mask = pareto_mask(&pop);
        for (i, p) in pop.iter().enumerate() {
            let dominated = pop.iter().enumerate().any(|(j, q)| mask[j] && q.dominates(p));
            if dominated {
                assert!(!mask[i], "dominated point {i} is on the front");
            }
        }
    }

    #[test]
    fn every_undominated_point_is_represented() {
        let pop = random_population(800, 1);
        let mask = pareto_mask(&pop);
        for (i, p) in pop.iter().enumerate() {
            let dominated = pop.iter().any(|q| q.dominates(p));
            if !dominated {
                // Either on the front or an exact duplicate of a front member
                assert!(
                    mask[i] || pop.iter().zip(&mask).any(|(q, &m)| m && q.point() == p.point()),
                    "undominated point {i} missing from front"
                );
            }
        }
    }

    #[test]
    fn optimal_is_max_composite_on_front() {
        let pop = vec![
            ov(10.0, 50.0, 30.0),
            ov(8.0, 60.0, 40.0),
            ov(1.0, 1.0, 99.0), // off-front, must be ignored
            ov(5.0, 70.0, 40.0),
        ];
        let mask = pareto_mask(&pop);
        assert_eq!(select_optimal(&pop, &mask), Some(1));
    }
}
