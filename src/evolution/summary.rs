use std::fmt;

use crate::chromosome::{Chromosome, Objectives};

/// Snapshot of one generation, taken after its population was evaluated and
/// ranked.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    /// 1-based generation index.
    pub generation: usize,
    pub population_size: usize,
    /// Members no other member dominates.
    pub non_dominated: usize,
    pub best: Objectives,
}

impl fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generation {}: population {}, non-dominated {}, best {}",
            self.generation, self.population_size, self.non_dominated, self.best
        )
    }
}

/// Outcome of a finished run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// Best member of the first generation.
    pub initial_best: Chromosome,
    /// Best member after the final ranking.
    pub best: Chromosome,
    /// Worst member after the final ranking.
    pub worst: Chromosome,
    /// One summary per generation run.
    pub generations: Vec<GenerationSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_display() {
        let summary = GenerationSummary {
            generation: 3,
            population_size: 20,
            non_dominated: 4,
            best: Objectives::new(41, 230),
        };
        assert_eq!(
            summary.to_string(),
            "generation 3: population 20, non-dominated 4, best 41 230"
        );
    }
}
