use tracing::{debug, info};

use super::strategy::{GenerationContext, PopulationStrategy};
use super::summary::{EvolutionResult, GenerationSummary};
use crate::chromosome::Chromosome;
use crate::error::{OptionExt, Result, SchedulingError};
use crate::rng::RandomNumberGenerator;

/// Drives a [`PopulationStrategy`] through its configured generations.
#[derive(Debug, Clone)]
pub struct EvolutionLauncher<S>
where
    S: PopulationStrategy,
{
    strategy: S,
}

impl<S> EvolutionLauncher<S>
where
    S: PopulationStrategy,
{
    /// Creates a new `EvolutionLauncher` around `strategy`.
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }

    /// Initialises the population and returns the run as an iterator of
    /// per-generation summaries.
    ///
    /// # Errors
    ///
    /// Returns `SchedulingError::Configuration` if the strategy is configured
    /// for zero generations, or any error raised while initialising.
    pub fn start(self, rng: &mut RandomNumberGenerator) -> Result<Evolution<'_, S>> {
        let mut strategy = self.strategy;
        let num_generations = strategy.num_generations();
        if num_generations == 0 {
            return Err(SchedulingError::Configuration(
                "Number of generations cannot be zero".to_string(),
            ));
        }

        strategy.initialize(rng)?;
        info!(
            generations = num_generations,
            population = strategy.population_size(),
            "evolution started"
        );

        Ok(Evolution {
            strategy,
            rng,
            generation: 0,
            num_generations,
            initial_best: None,
            summaries: Vec::new(),
            failed: false,
        })
    }

    /// Runs every generation and returns the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use fjsp_evo::evolution::{EvolutionLauncher, GenerationalStrategy, NsgaOptions};
    /// use fjsp_evo::instance::Instance;
    /// use fjsp_evo::rng::RandomNumberGenerator;
    ///
    /// let mut rng = RandomNumberGenerator::from_seed(42);
    /// let instance = Instance::generate(4, 3, 8, 10, &mut rng).unwrap();
    /// let strategy = GenerationalStrategy::new(&instance, NsgaOptions::new(10, 5)).unwrap();
    ///
    /// let result = EvolutionLauncher::new(strategy).evolve(&mut rng).unwrap();
    /// assert_eq!(result.generations.len(), 5);
    /// assert!(result.best.is_valid(&instance));
    /// ```
    pub fn evolve(self, rng: &mut RandomNumberGenerator) -> Result<EvolutionResult> {
        self.start(rng)?.finish()
    }
}

/// A run in progress. Each call to `next` executes one generation and yields
/// its summary; [`Evolution::finish`] runs what is left and ranks the final
/// population.
#[derive(Debug)]
pub struct Evolution<'r, S>
where
    S: PopulationStrategy,
{
    strategy: S,
    rng: &'r mut RandomNumberGenerator,
    generation: usize,
    num_generations: usize,
    initial_best: Option<Chromosome>,
    summaries: Vec<GenerationSummary>,
    failed: bool,
}

impl<S> Evolution<'_, S>
where
    S: PopulationStrategy,
{
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Number of generations already run.
    pub fn generation(&self) -> usize {
        self.generation
    }

    fn step(&mut self) -> Result<GenerationSummary> {
        let context = GenerationContext::new(self.generation + 1, self.num_generations);

        self.strategy.evaluate()?;
        self.strategy.rank()?;

        let best = self.strategy.extract_best()?;
        let summary = GenerationSummary {
            generation: context.generation,
            population_size: self.strategy.population_size(),
            non_dominated: self.strategy.non_dominated_count(),
            best: best
                .objectives()
                .ok_or_else_scheduling(|| SchedulingError::Unevaluated)?,
        };
        if self.initial_best.is_none() {
            self.initial_best = Some(best);
        }

        self.strategy.breed(&context, self.rng)?;
        self.strategy.replace(&context, self.rng)?;

        self.generation = context.generation;
        debug!(%summary, "generation finished");
        Ok(summary)
    }

    /// Runs the remaining generations, ranks the final population and
    /// returns its best and worst members.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a generation or by the final
    /// ranking.
    pub fn finish(mut self) -> Result<EvolutionResult> {
        while let Some(summary) = self.next() {
            summary?;
        }

        self.strategy.finalize()?;
        let best = self.strategy.extract_best()?;
        let worst = self.strategy.extract_worst()?;
        let initial_best = self.initial_best.take().unwrap_or_else(|| best.clone());

        info!(
            generations = self.generation,
            best = %best.objectives().unwrap_or_default(),
            initial_best = %initial_best.objectives().unwrap_or_default(),
            "evolution finished"
        );

        Ok(EvolutionResult {
            initial_best,
            best,
            worst,
            generations: std::mem::take(&mut self.summaries),
        })
    }
}

impl<S> Iterator for Evolution<'_, S>
where
    S: PopulationStrategy,
{
    type Item = Result<GenerationSummary>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.generation >= self.num_generations {
            return None;
        }
        match self.step() {
            Ok(summary) => {
                self.summaries.push(summary.clone());
                Some(Ok(summary))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
