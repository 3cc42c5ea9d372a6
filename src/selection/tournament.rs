use tracing::trace;

use crate::chromosome::Chromosome;
use crate::error::{Result, SchedulingError};
use crate::rng::RandomNumberGenerator;

/// Binary tournament under the crowded-comparison order.
///
/// Each tournament draws two distinct members of a ranked population. The one
/// on the lower front wins; on equal fronts the first contestant wins only if
/// its crowding distance is strictly larger.
///
/// # Examples
///
/// ```
/// use fjsp_evo::chromosome::{Chromosome, Objectives};
/// use fjsp_evo::ranking::rank;
/// use fjsp_evo::rng::RandomNumberGenerator;
/// use fjsp_evo::selection::CrowdedTournament;
///
/// let mut population: Vec<Chromosome> = [(1, 1), (5, 5), (9, 9)]
///     .iter()
///     .map(|&(makespan, load)| {
///         let mut c = Chromosome::from_genes(vec![0], vec![0]).unwrap();
///         c.set_objectives(Objectives::new(makespan, load));
///         c
///     })
///     .collect();
/// rank(&mut population).unwrap();
///
/// let mut rng = RandomNumberGenerator::from_seed(42);
/// let winners = CrowdedTournament::new().select(&population, 3, &mut rng).unwrap();
///
/// assert_eq!(winners.len(), 3);
/// // The worst member can never win a tournament.
/// assert!(!winners.contains(&2));
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct CrowdedTournament;

impl CrowdedTournament {
    pub fn new() -> Self {
        Self
    }

    /// Runs `num_to_select` tournaments and returns the winners' indices.
    ///
    /// # Errors
    ///
    /// Returns `SchedulingError::EmptyPopulation` for an empty population.
    pub fn select(
        &self,
        population: &[Chromosome],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        if population.is_empty() {
            return Err(SchedulingError::EmptyPopulation);
        }

        let winners: Vec<usize> = (0..num_to_select)
            .map(|_| self.run_tournament(population, rng))
            .collect();
        trace!(selected = winners.len(), "tournament selection");
        Ok(winners)
    }

    /// Runs a single tournament and returns the index of the winner. A
    /// population of one always returns its only member.
    fn run_tournament(&self, population: &[Chromosome], rng: &mut RandomNumberGenerator) -> usize {
        if population.len() < 2 {
            return 0;
        }

        let (first, second) = loop {
            let first = rng.gen_index(population.len());
            let second = rng.gen_index(population.len());
            if first != second {
                break (first, second);
            }
        };

        let a = &population[first];
        let b = &population[second];
        if a.front_level() == b.front_level() {
            if a.crowding_distance() > b.crowding_distance() {
                first
            } else {
                second
            }
        } else if a.front_level() < b.front_level() {
            first
        } else {
            second
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::Objectives;
    use crate::ranking::rank;

    fn ranked(points: &[(u64, u64)]) -> Vec<Chromosome> {
        let mut population: Vec<Chromosome> = points
            .iter()
            .map(|&(makespan, load)| {
                let mut c = Chromosome::from_genes(vec![0], vec![0]).unwrap();
                c.set_objectives(Objectives::new(makespan, load));
                c
            })
            .collect();
        rank(&mut population).unwrap();
        population
    }

    #[test]
    fn test_lower_front_always_wins() {
        let population = ranked(&[(1, 1), (2, 2)]);
        let mut rng = RandomNumberGenerator::from_seed(42);
        let winners = CrowdedTournament::new().select(&population, 20, &mut rng).unwrap();
        assert!(winners.iter().all(|&w| w == 0));
    }

    #[test]
    fn test_crowding_breaks_ties() {
        // One front; member 1 is interior and so has a finite distance.
        let population = ranked(&[(1, 9), (5, 5), (9, 1)]);
        assert!(population[1].crowding_distance().is_finite());

        let mut rng = RandomNumberGenerator::from_seed(7);
        let tournament = CrowdedTournament::new();
        for _ in 0..50 {
            let winner = tournament.run_tournament(&population, &mut rng);
            assert_ne!(winner, 1);
        }
    }

    #[test]
    fn test_single_member_population() {
        let population = ranked(&[(3, 3)]);
        let mut rng = RandomNumberGenerator::from_seed(1);
        let winners = CrowdedTournament::new().select(&population, 4, &mut rng).unwrap();
        assert_eq!(winners, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_empty_population() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        assert!(matches!(
            CrowdedTournament::new().select(&[], 2, &mut rng),
            Err(SchedulingError::EmptyPopulation)
        ));
    }
}
