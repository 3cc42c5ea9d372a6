//! # Ranking
//!
//! Pareto ranking of a population: [`dominance`] compares two objective
//! pairs, [`sort`] peels the population into fronts and [`crowding`] spreads
//! the members of each front.
//!
//! [`rank`] runs the whole pass and [`crowded_cmp`] gives the resulting order
//! used for selection and truncation: lower front first, then larger crowding
//! distance.
//!
//! ## Example
//!
//! ```rust
//! use fjsp_evo::chromosome::{Chromosome, Objectives};
//! use fjsp_evo::ranking::{rank, ranked_order};
//!
//! let mut population: Vec<Chromosome> = [(9, 14), (7, 10), (6, 15)]
//!     .iter()
//!     .map(|&(makespan, load)| {
//!         let mut c = Chromosome::from_genes(vec![0], vec![0]).unwrap();
//!         c.set_objectives(Objectives::new(makespan, load));
//!         c
//!     })
//!     .collect();
//!
//! let fronts = rank(&mut population).unwrap();
//! assert_eq!(fronts, vec![vec![1, 2], vec![0]]);
//! assert_eq!(ranked_order(&population)[2], 0);
//! ```

pub mod crowding;
pub mod dominance;
pub mod sort;

use std::cmp::Ordering;

use tracing::trace;

use crate::chromosome::Chromosome;
use crate::error::Result;

pub use crowding::assign_crowding_distance;
pub use dominance::{compare, Dominance};
pub use sort::fast_non_dominated_sort;

/// Sorts `population` into fronts and assigns crowding distances. Returns the
/// fronts as arena indices, best first.
pub fn rank(population: &mut [Chromosome]) -> Result<Vec<Vec<usize>>> {
    let fronts = fast_non_dominated_sort(population)?;
    for front in &fronts {
        assign_crowding_distance(population, front);
    }
    trace!(
        population = population.len(),
        fronts = fronts.len(),
        "ranked population"
    );
    Ok(fronts)
}

/// The crowded-comparison order: ascending front level, then descending
/// crowding distance.
pub fn crowded_cmp(a: &Chromosome, b: &Chromosome) -> Ordering {
    a.front_level()
        .cmp(&b.front_level())
        .then_with(|| b.crowding_distance().total_cmp(&a.crowding_distance()))
}

/// Arena indices of a ranked population, best first. Ties keep arena order.
pub fn ranked_order(population: &[Chromosome]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..population.len()).collect();
    order.sort_by(|&a, &b| crowded_cmp(&population[a], &population[b]));
    order
}

/// Index of the front-0 member with the largest crowding distance.
pub fn best_index(population: &[Chromosome]) -> Option<usize> {
    ranked_order(population).first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::Objectives;

    fn population(points: &[(u64, u64)]) -> Vec<Chromosome> {
        points
            .iter()
            .map(|&(makespan, load)| {
                let mut c = Chromosome::from_genes(vec![0], vec![0]).unwrap();
                c.set_objectives(Objectives::new(makespan, load));
                c
            })
            .collect()
    }

    #[test]
    fn test_rank_is_idempotent() {
        let mut population = population(&[(3, 9), (4, 7), (6, 6), (5, 8), (8, 8), (2, 12)]);
        rank(&mut population).unwrap();
        let first: Vec<(usize, f64)> = population
            .iter()
            .map(|c| (c.front_level(), c.crowding_distance()))
            .collect();

        rank(&mut population).unwrap();
        let second: Vec<(usize, f64)> = population
            .iter()
            .map(|c| (c.front_level(), c.crowding_distance()))
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_ranked_order_prefers_front_then_spread() {
        // Front 0: (2,12), (3,9), (4,7), (6,6). Front 1: (5,8). Front 2: (8,8).
        let mut population = population(&[(3, 9), (4, 7), (6, 6), (5, 8), (8, 8), (2, 12)]);
        rank(&mut population).unwrap();

        let order = ranked_order(&population);
        assert_eq!(order.len(), 6);
        assert_eq!(&order[4..], &[3, 4]);
        // The two extremes of front 0 come first.
        let mut head = order[..2].to_vec();
        head.sort_unstable();
        assert_eq!(head, vec![2, 5]);
        assert_eq!(best_index(&population), Some(order[0]));
    }

    #[test]
    fn test_ranked_order_follows_fronts() {
        let mut population = population(&[(9, 9), (1, 1), (5, 5)]);
        rank(&mut population).unwrap();
        assert_eq!(ranked_order(&population), vec![1, 2, 0]);
    }

    #[test]
    fn test_best_index_of_empty_population() {
        assert_eq!(best_index(&[]), None);
    }
}
