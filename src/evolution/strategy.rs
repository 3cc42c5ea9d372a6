//! # PopulationStrategy
//!
//! The `PopulationStrategy` trait is the seam between the run driver and a
//! concrete population topology. The driver calls, once:
//!
//! - `initialize`
//!
//! then, for every generation:
//!
//! - `evaluate`, `rank`, `breed`, `replace`
//!
//! and finally `finalize` before extracting the best and worst members.
//! [`GenerationalStrategy`](super::generational::GenerationalStrategy) keeps a
//! flat population; [`ReefStrategy`](super::reef::ReefStrategy) keeps a grid.

use crate::chromosome::Chromosome;
use crate::error::Result;
use crate::rng::RandomNumberGenerator;

/// Where the run stands when a generation's operators execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationContext {
    /// 1-based generation index.
    pub generation: usize,
    pub num_generations: usize,
}

impl GenerationContext {
    pub fn new(generation: usize, num_generations: usize) -> Self {
        Self {
            generation,
            num_generations,
        }
    }

    /// `generation / num_generations`, in `(0, 1]` during a run.
    pub fn progress(&self) -> f64 {
        if self.num_generations == 0 {
            return 1.0;
        }
        self.generation as f64 / self.num_generations as f64
    }
}

/// A population topology plus its breeding and replacement policy.
pub trait PopulationStrategy {
    /// Number of generations this strategy is configured for.
    fn num_generations(&self) -> usize;

    /// Builds the initial population.
    fn initialize(&mut self, rng: &mut RandomNumberGenerator) -> Result<()>;

    /// Computes the objectives of every member.
    fn evaluate(&mut self) -> Result<()>;

    /// Ranks the evaluated population.
    fn rank(&mut self) -> Result<()>;

    /// Produces the generation's offspring from the ranked population.
    fn breed(&mut self, context: &GenerationContext, rng: &mut RandomNumberGenerator)
        -> Result<()>;

    /// Merges the offspring into the population.
    fn replace(
        &mut self,
        context: &GenerationContext,
        rng: &mut RandomNumberGenerator,
    ) -> Result<()>;

    /// Final evaluation and ranking after the last generation.
    fn finalize(&mut self) -> Result<()> {
        self.evaluate()?;
        self.rank()
    }

    /// Best member of the ranked population.
    fn extract_best(&self) -> Result<Chromosome>;

    /// Worst member of the ranked population.
    fn extract_worst(&self) -> Result<Chromosome>;

    /// Number of members currently alive.
    fn population_size(&self) -> usize;

    /// Number of ranked members no other member dominates.
    fn non_dominated_count(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress() {
        assert_eq!(GenerationContext::new(5, 10).progress(), 0.5);
        assert_eq!(GenerationContext::new(10, 10).progress(), 1.0);
        assert_eq!(GenerationContext::new(0, 0).progress(), 1.0);
    }
}
