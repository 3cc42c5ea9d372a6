//! Fast non-dominated sorting over a population arena.
//!
//! Every chromosome is addressed by its index in the slice. After sorting,
//! each chromosome carries the number of population members dominating it,
//! the indices it dominates and the level of the front that admitted it.

use super::dominance::{compare, Dominance};
use crate::chromosome::{Chromosome, Objectives};
use crate::error::{Result, SchedulingError};

/// Sorts `population` into Pareto fronts and returns them, best first. Each
/// front lists arena indices in the order they were admitted.
///
/// `domination_count` keeps the number of dominators found by the pairwise
/// pass; the front peeling works on a copy.
///
/// # Errors
///
/// Returns `SchedulingError::Unevaluated` if any chromosome lacks objectives.
pub fn fast_non_dominated_sort(population: &mut [Chromosome]) -> Result<Vec<Vec<usize>>> {
    let objectives = collect_objectives(population)?;
    let n = objectives.len();

    for chromosome in population.iter_mut() {
        chromosome.reset_ranking();
    }

    for i in 0..n {
        for j in (i + 1)..n {
            match compare(&objectives[i], &objectives[j]) {
                Dominance::Left => {
                    population[i].dominated_set.push(j);
                    population[j].domination_count += 1;
                }
                Dominance::Right => {
                    population[j].dominated_set.push(i);
                    population[i].domination_count += 1;
                }
                Dominance::Neither => {}
            }
        }
    }

    let mut remaining: Vec<usize> = population.iter().map(|c| c.domination_count).collect();
    let mut fronts: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = (0..n).filter(|&i| remaining[i] == 0).collect();

    while !current.is_empty() {
        let level = fronts.len();
        let mut next = Vec::new();
        for &i in &current {
            population[i].front_level = level;
            for &j in &population[i].dominated_set {
                remaining[j] -= 1;
                if remaining[j] == 0 {
                    next.push(j);
                }
            }
        }
        fronts.push(current);
        current = next;
    }

    Ok(fronts)
}

pub(crate) fn collect_objectives(population: &[Chromosome]) -> Result<Vec<Objectives>> {
    population
        .iter()
        .map(|c| c.objectives().ok_or(SchedulingError::Unevaluated))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluated(makespan: u64, total_load: u64) -> Chromosome {
        let mut chromosome = Chromosome::from_genes(vec![0], vec![0]).unwrap();
        chromosome.set_objectives(Objectives::new(makespan, total_load));
        chromosome
    }

    #[test]
    fn test_fronts_partition_population() {
        let mut population = vec![
            evaluated(1, 5),
            evaluated(3, 3),
            evaluated(5, 1),
            evaluated(4, 4),
            evaluated(6, 6),
        ];
        let fronts = fast_non_dominated_sort(&mut population).unwrap();

        assert_eq!(fronts, vec![vec![0, 1, 2], vec![3], vec![4]]);
        assert_eq!(population[3].front_level(), 1);
        assert_eq!(population[4].front_level(), 2);

        let mut all: Vec<usize> = fronts.concat();
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_domination_bookkeeping_survives_peeling() {
        let mut population = vec![evaluated(1, 1), evaluated(2, 2), evaluated(3, 3)];
        fast_non_dominated_sort(&mut population).unwrap();

        assert_eq!(population[0].domination_count(), 0);
        assert_eq!(population[1].domination_count(), 1);
        assert_eq!(population[2].domination_count(), 2);
        assert_eq!(population[0].dominated_set(), &[1, 2]);
        assert_eq!(population[1].dominated_set(), &[2]);
    }

    #[test]
    fn test_duplicates_share_a_front() {
        let mut population = vec![evaluated(2, 2), evaluated(2, 2)];
        let fronts = fast_non_dominated_sort(&mut population).unwrap();
        assert_eq!(fronts, vec![vec![0, 1]]);
    }

    #[test]
    fn test_unevaluated_is_an_error() {
        let mut population = vec![
            evaluated(1, 1),
            Chromosome::from_genes(vec![0], vec![0]).unwrap(),
        ];
        assert!(matches!(
            fast_non_dominated_sort(&mut population),
            Err(SchedulingError::Unevaluated)
        ));
    }

    #[test]
    fn test_empty_population_has_no_fronts() {
        let mut population: Vec<Chromosome> = Vec::new();
        assert!(fast_non_dominated_sort(&mut population).unwrap().is_empty());
    }
}
