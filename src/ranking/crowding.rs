//! Crowding distance within one front.

use crate::chromosome::{Chromosome, Objectives};

/// Assigns the crowding distance of every member of `front` (arena indices
/// into `population`). All members must be evaluated.
///
/// For each objective the front is sorted by that objective; both ends get
/// infinity and every interior member accumulates the normalised gap between
/// its neighbours. A front constant in an objective uses a range of 1.
pub fn assign_crowding_distance(population: &mut [Chromosome], front: &[usize]) {
    for &i in front {
        population[i].crowding_distance = 0.0;
    }
    if front.is_empty() {
        return;
    }

    let objectives: [fn(&Objectives) -> u64; 2] = [|o| o.makespan, |o| o.total_load];

    for objective in objectives {
        let value = |i: usize| {
            population[i]
                .objectives()
                .map(|o| objective(&o))
                .unwrap_or(0) as f64
        };

        let mut sorted = front.to_vec();
        sorted.sort_by(|&a, &b| value(a).total_cmp(&value(b)));

        let first = sorted[0];
        let last = sorted[sorted.len() - 1];
        let range = match value(last) - value(first) {
            r if r == 0.0 => 1.0,
            r => r,
        };

        let gaps: Vec<(usize, f64)> = sorted
            .windows(3)
            .map(|w| (w[1], (value(w[2]) - value(w[0])) / range))
            .collect();

        population[first].crowding_distance = f64::INFINITY;
        population[last].crowding_distance = f64::INFINITY;
        for (i, gap) in gaps {
            population[i].crowding_distance += gap;
        }
    }
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
    fn test_boundaries_are_infinite() {
        let mut population = vec![evaluated(1, 9), evaluated(5, 5), evaluated(3, 7), evaluated(9, 1)];
        assign_crowding_distance(&mut population, &[0, 1, 2, 3]);

        assert!(population[0].crowding_distance().is_infinite());
        assert!(population[3].crowding_distance().is_infinite());
        assert!(population[1].crowding_distance().is_finite());
        assert!(population[2].crowding_distance().is_finite());
    }

    #[test]
    fn test_interior_distance_sums_objectives() {
        // Makespan order: 1, 3, 5, 9 (range 8). Load order: 1, 5, 7, 9 (range 8).
        let mut population = vec![evaluated(1, 9), evaluated(5, 5), evaluated(3, 7), evaluated(9, 1)];
        assign_crowding_distance(&mut population, &[0, 1, 2, 3]);

        // Member 2: makespan gap (5 - 1) / 8, load gap (9 - 5) / 8.
        assert!((population[2].crowding_distance() - 1.0).abs() < 1e-12);
        // Member 1: makespan gap (9 - 3) / 8, load gap (7 - 1) / 8.
        assert!((population[1].crowding_distance() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_constant_front_does_not_divide_by_zero() {
        let mut population = vec![evaluated(4, 4), evaluated(4, 4), evaluated(4, 4)];
        assign_crowding_distance(&mut population, &[0, 1, 2]);

        assert_eq!(population[1].crowding_distance(), 0.0);
        assert!(population[0].crowding_distance().is_infinite());
        assert!(population[2].crowding_distance().is_infinite());
    }

    #[test]
    fn test_small_fronts() {
        let mut population = vec![evaluated(1, 2), evaluated(2, 1)];
        assign_crowding_distance(&mut population, &[1]);
        assert!(population[1].crowding_distance().is_infinite());

        assign_crowding_distance(&mut population, &[0, 1]);
        assert!(population[0].crowding_distance().is_infinite());
        assert!(population[1].crowding_distance().is_infinite());
    }
}
