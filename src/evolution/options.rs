//! # Options
//!
//! Configuration of the two search strategies.
//!
//! [`NsgaOptions`] configure the generational strategy: population size,
//! generation count and the linearly decaying crossover, mutation and elitist
//! retention rates. [`ReefOptions`] configure the reef strategy: the side of
//! the square grid, the generation count and the integer percentages driving
//! occupation, reproduction, budding and depredation.
//!
//! Both come with `Default` values and a fluent builder, and are checked with
//! `validate()` before a run starts.
//!
//! ## Example
//!
//! ```rust
//! use fjsp_evo::evolution::options::{NsgaOptions, ReefOptions, Schedule};
//!
//! let nsga = NsgaOptions::builder()
//!     .population_size(40)
//!     .num_generations(150)
//!     .crossover(Schedule::new(0.9, 0.5))
//!     .build();
//! assert!(nsga.validate().is_ok());
//!
//! let reef = ReefOptions::builder().reef_size(8).num_generations(100).build();
//! assert_eq!(reef.get_occupation_pct(), 60);
//! ```

use crate::error::{Result, SchedulingError};
use crate::operators::MutationMode;

/// A rate interpolated linearly from `start` (progress 0) to `end`
/// (progress 1).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schedule {
    pub start: f64,
    pub end: f64,
}

impl Schedule {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// A rate that stays at `value` for the whole run.
    pub fn constant(value: f64) -> Self {
        Self::new(value, value)
    }

    /// The rate at `progress`, clamped to `[0, 1]`.
    pub fn at(&self, progress: f64) -> f64 {
        let progress = progress.clamp(0.0, 1.0);
        self.start + progress * (self.end - self.start)
    }

    fn validate(&self, name: &str) -> Result<()> {
        for value in [self.start, self.end] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SchedulingError::Configuration(format!(
                    "{} rate {} lies outside [0, 1]",
                    name, value
                )));
            }
        }
        if self.end > self.start {
            return Err(SchedulingError::Configuration(format!(
                "{} rate must not grow over the run ({} -> {})",
                name, self.start, self.end
            )));
        }
        Ok(())
    }
}

/// Options of the generational (NSGA-II) strategy.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct NsgaOptions {
    population_size: usize,
    num_generations: usize,
    crossover: Schedule,
    mutation: Schedule,
    elitist_retention: Schedule,
    /// Fraction of the run after which elitist retention applies.
    elitist_onset: f64,
    mutation_mode: MutationMode,
}

impl NsgaOptions {
    pub fn new(population_size: usize, num_generations: usize) -> Self {
        Self {
            population_size,
            num_generations,
            ..Self::default()
        }
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_num_generations(&self) -> usize {
        self.num_generations
    }

    pub fn get_crossover(&self) -> Schedule {
        self.crossover
    }

    pub fn get_mutation(&self) -> Schedule {
        self.mutation
    }

    pub fn get_elitist_retention(&self) -> Schedule {
        self.elitist_retention
    }

    pub fn get_elitist_onset(&self) -> f64 {
        self.elitist_onset
    }

    pub fn get_mutation_mode(&self) -> MutationMode {
        self.mutation_mode
    }

    pub fn set_num_generations(&mut self, num_generations: usize) {
        self.num_generations = num_generations;
    }

    pub fn set_population_size(&mut self, population_size: usize) {
        self.population_size = population_size;
    }

    /// Minimum number of parents that must survive replacement at `progress`,
    /// or `None` before elitist retention starts.
    ///
    /// The retention factor decays linearly from `elitist_retention.start` at
    /// the onset to `elitist_retention.end` at the end of the run.
    pub fn elitist_quota(&self, progress: f64) -> Option<usize> {
        if progress < self.elitist_onset {
            return None;
        }
        let span = 1.0 - self.elitist_onset;
        let local = if span > 0.0 {
            (progress - self.elitist_onset) / span
        } else {
            1.0
        };
        let factor = self.elitist_retention.at(local);
        Some((factor * self.population_size as f64).ceil() as usize)
    }

    /// Checks the options.
    ///
    /// # Errors
    ///
    /// Returns `SchedulingError::Configuration` for a zero population or
    /// generation count, rates outside `[0, 1]`, growing rates or an onset
    /// outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(SchedulingError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }
        if self.num_generations == 0 {
            return Err(SchedulingError::Configuration(
                "Number of generations cannot be zero".to_string(),
            ));
        }
        self.crossover.validate("Crossover")?;
        self.mutation.validate("Mutation")?;
        self.elitist_retention.validate("Elitist retention")?;
        if !(0.0..=1.0).contains(&self.elitist_onset) {
            return Err(SchedulingError::Configuration(format!(
                "Elitist onset {} lies outside [0, 1]",
                self.elitist_onset
            )));
        }
        Ok(())
    }

    /// Returns a builder for creating an `NsgaOptions` instance.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fjsp_evo::evolution::options::NsgaOptions;
    /// use fjsp_evo::operators::MutationMode;
    ///
    /// let options = NsgaOptions::builder()
    ///     .population_size(20)
    ///     .num_generations(50)
    ///     .mutation_mode(MutationMode::AnyFeasible)
    ///     .build();
    /// assert_eq!(options.get_population_size(), 20);
    /// ```
    pub fn builder() -> NsgaOptionsBuilder {
        NsgaOptionsBuilder::default()
    }
}

impl Default for NsgaOptions {
    fn default() -> Self {
        Self {
            population_size: 100,
            num_generations: 100,
            crossover: Schedule::new(0.8, 0.4),
            mutation: Schedule::new(0.1, 0.02),
            elitist_retention: Schedule::new(0.4, 0.1),
            elitist_onset: 1.0 / 3.0,
            mutation_mode: MutationMode::Distinct,
        }
    }
}

/// Builder for `NsgaOptions`.
#[derive(Debug, Clone, Default)]
pub struct NsgaOptionsBuilder {
    population_size: Option<usize>,
    num_generations: Option<usize>,
    crossover: Option<Schedule>,
    mutation: Option<Schedule>,
    elitist_retention: Option<Schedule>,
    elitist_onset: Option<f64>,
    mutation_mode: Option<MutationMode>,
}

impl NsgaOptionsBuilder {
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn num_generations(mut self, value: usize) -> Self {
        self.num_generations = Some(value);
        self
    }

    pub fn crossover(mut self, value: Schedule) -> Self {
        self.crossover = Some(value);
        self
    }

    pub fn mutation(mut self, value: Schedule) -> Self {
        self.mutation = Some(value);
        self
    }

    pub fn elitist_retention(mut self, value: Schedule) -> Self {
        self.elitist_retention = Some(value);
        self
    }

    pub fn elitist_onset(mut self, value: f64) -> Self {
        self.elitist_onset = Some(value);
        self
    }

    pub fn mutation_mode(mut self, value: MutationMode) -> Self {
        self.mutation_mode = Some(value);
        self
    }

    pub fn build(self) -> NsgaOptions {
        let defaults = NsgaOptions::default();
        NsgaOptions {
            population_size: self.population_size.unwrap_or(defaults.population_size),
            num_generations: self.num_generations.unwrap_or(defaults.num_generations),
            crossover: self.crossover.unwrap_or(defaults.crossover),
            mutation: self.mutation.unwrap_or(defaults.mutation),
            elitist_retention: self.elitist_retention.unwrap_or(defaults.elitist_retention),
            elitist_onset: self.elitist_onset.unwrap_or(defaults.elitist_onset),
            mutation_mode: self.mutation_mode.unwrap_or(defaults.mutation_mode),
        }
    }
}

/// Options of the reef strategy. Percentages are integers in `0..=100` and
/// counts derived from them round down.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReefOptions {
    reef_size: usize,
    num_generations: usize,
    occupation_pct: usize,
    reproduction_pct: usize,
    budding_pct: usize,
    depredation_pct: usize,
    settle_attempts: usize,
    duplicate_cap: usize,
    mutation_mode: MutationMode,
}

impl ReefOptions {
    pub fn new(reef_size: usize, num_generations: usize) -> Self {
        Self {
            reef_size,
            num_generations,
            ..Self::default()
        }
    }

    /// Side length of the square grid.
    pub fn get_reef_size(&self) -> usize {
        self.reef_size
    }

    pub fn get_num_cells(&self) -> usize {
        self.reef_size * self.reef_size
    }

    pub fn get_num_generations(&self) -> usize {
        self.num_generations
    }

    pub fn get_occupation_pct(&self) -> usize {
        self.occupation_pct
    }

    pub fn get_reproduction_pct(&self) -> usize {
        self.reproduction_pct
    }

    pub fn get_budding_pct(&self) -> usize {
        self.budding_pct
    }

    pub fn get_depredation_pct(&self) -> usize {
        self.depredation_pct
    }

    pub fn get_settle_attempts(&self) -> usize {
        self.settle_attempts
    }

    pub fn get_duplicate_cap(&self) -> usize {
        self.duplicate_cap
    }

    pub fn get_mutation_mode(&self) -> MutationMode {
        self.mutation_mode
    }

    pub fn set_num_generations(&mut self, num_generations: usize) {
        self.num_generations = num_generations;
    }

    /// Number of cells occupied at initialisation.
    pub fn initial_occupants(&self) -> usize {
        percent_of(self.get_num_cells(), self.occupation_pct)
    }

    /// Checks the options.
    ///
    /// # Errors
    ///
    /// Returns `SchedulingError::Configuration` for an empty grid, a zero
    /// generation count, a percentage above 100, a zero settle budget or
    /// duplicate cap, or an occupation rate that leaves the grid empty.
    pub fn validate(&self) -> Result<()> {
        if self.reef_size == 0 {
            return Err(SchedulingError::Configuration(
                "Reef size cannot be zero".to_string(),
            ));
        }
        if self.num_generations == 0 {
            return Err(SchedulingError::Configuration(
                "Number of generations cannot be zero".to_string(),
            ));
        }
        for (name, pct) in [
            ("Occupation", self.occupation_pct),
            ("Reproduction", self.reproduction_pct),
            ("Budding", self.budding_pct),
            ("Depredation", self.depredation_pct),
        ] {
            if pct > 100 {
                return Err(SchedulingError::Configuration(format!(
                    "{} percentage {} exceeds 100",
                    name, pct
                )));
            }
        }
        if self.settle_attempts == 0 {
            return Err(SchedulingError::Configuration(
                "Settle attempts cannot be zero".to_string(),
            ));
        }
        if self.duplicate_cap == 0 {
            return Err(SchedulingError::Configuration(
                "Duplicate cap cannot be zero".to_string(),
            ));
        }
        if self.initial_occupants() == 0 {
            return Err(SchedulingError::Configuration(format!(
                "A {0}x{0} reef at {1}% occupation starts empty",
                self.reef_size, self.occupation_pct
            )));
        }
        Ok(())
    }

    /// Returns a builder for creating a `ReefOptions` instance.
    pub fn builder() -> ReefOptionsBuilder {
        ReefOptionsBuilder::default()
    }
}

impl Default for ReefOptions {
    fn default() -> Self {
        Self {
            reef_size: 10,
            num_generations: 100,
            occupation_pct: 60,
            reproduction_pct: 70,
            budding_pct: 10,
            depredation_pct: 20,
            settle_attempts: 3,
            duplicate_cap: 3,
            mutation_mode: MutationMode::Distinct,
        }
    }
}

/// Builder for `ReefOptions`.
#[derive(Debug, Clone, Default)]
pub struct ReefOptionsBuilder {
    reef_size: Option<usize>,
    num_generations: Option<usize>,
    occupation_pct: Option<usize>,
    reproduction_pct: Option<usize>,
    budding_pct: Option<usize>,
    depredation_pct: Option<usize>,
    settle_attempts: Option<usize>,
    duplicate_cap: Option<usize>,
    mutation_mode: Option<MutationMode>,
}

impl ReefOptionsBuilder {
    pub fn reef_size(mut self, value: usize) -> Self {
        self.reef_size = Some(value);
        self
    }

    pub fn num_generations(mut self, value: usize) -> Self {
        self.num_generations = Some(value);
        self
    }

    pub fn occupation_pct(mut self, value: usize) -> Self {
        self.occupation_pct = Some(value);
        self
    }

    pub fn reproduction_pct(mut self, value: usize) -> Self {
        self.reproduction_pct = Some(value);
        self
    }

    pub fn budding_pct(mut self, value: usize) -> Self {
        self.budding_pct = Some(value);
        self
    }

    pub fn depredation_pct(mut self, value: usize) -> Self {
        self.depredation_pct = Some(value);
        self
    }

    pub fn settle_attempts(mut self, value: usize) -> Self {
        self.settle_attempts = Some(value);
        self
    }

    pub fn duplicate_cap(mut self, value: usize) -> Self {
        self.duplicate_cap = Some(value);
        self
    }

    pub fn mutation_mode(mut self, value: MutationMode) -> Self {
        self.mutation_mode = Some(value);
        self
    }

    pub fn build(self) -> ReefOptions {
        let defaults = ReefOptions::default();
        ReefOptions {
            reef_size: self.reef_size.unwrap_or(defaults.reef_size),
            num_generations: self.num_generations.unwrap_or(defaults.num_generations),
            occupation_pct: self.occupation_pct.unwrap_or(defaults.occupation_pct),
            reproduction_pct: self.reproduction_pct.unwrap_or(defaults.reproduction_pct),
            budding_pct: self.budding_pct.unwrap_or(defaults.budding_pct),
            depredation_pct: self.depredation_pct.unwrap_or(defaults.depredation_pct),
            settle_attempts: self.settle_attempts.unwrap_or(defaults.settle_attempts),
            duplicate_cap: self.duplicate_cap.unwrap_or(defaults.duplicate_cap),
            mutation_mode: self.mutation_mode.unwrap_or(defaults.mutation_mode),
        }
    }
}

/// `count * pct / 100`, rounded down.
pub(crate) fn percent_of(count: usize, pct: usize) -> usize {
    count * pct / 100
}
