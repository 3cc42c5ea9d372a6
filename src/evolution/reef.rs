//! # ReefStrategy
//!
//! Coral reef optimisation over a square grid of optional cells.
//!
//! A generation runs as follows:
//!
//! 1. breeding: the occupied cells are shuffled; the first
//!    `reproduction_pct` of them (rounded down to an even count) spawn in
//!    pairs, each pair yielding one larva by job-partition crossover, and the
//!    rest brood, each yielding a mutated copy of itself;
//! 2. settling: every larva tries a random cell up to `settle_attempts`
//!    times, taking it if empty or if the larva dominates the occupant;
//!    larvae that fail every attempt are dropped;
//! 3. budding: the occupants are cloned, ordered by ascending domination
//!    count, and the first `budding_pct` of them settle again;
//! 4. extreme culling: an objective pair held by more than `duplicate_cap`
//!    occupants loses its excess occupants, scanning cells in row-major order;
//! 5. depredation: the `depredation_pct` occupants with the highest
//!    domination counts are removed;
//! 6. cleanup: every occupant's objectives and ranking state are cleared.
//!
//! The best occupant is the one with the lowest domination count; ties go to
//! the first in row-major order.

use std::collections::HashMap;

use tracing::{debug, trace};

use super::options::{percent_of, ReefOptions};
use super::strategy::{GenerationContext, PopulationStrategy};
use crate::chromosome::{Chromosome, Objectives};
use crate::error::{Result, SchedulingError};
use crate::fitness::Evaluator;
use crate::instance::Instance;
use crate::operators::{job_partition_crossover, mutate, JobPartition};
use crate::ranking;
use crate::rng::RandomNumberGenerator;

/// The reef (coral reef optimisation) population strategy.
#[derive(Debug, Clone)]
pub struct ReefStrategy<'a> {
    instance: &'a Instance,
    evaluator: Evaluator<'a>,
    options: ReefOptions,
    /// Row-major grid of `reef_size * reef_size` cells.
    cells: Vec<Option<Chromosome>>,
    larvae: Vec<Chromosome>,
}

impl<'a> ReefStrategy<'a> {
    /// Creates the strategy after validating `options`.
    pub fn new(instance: &'a Instance, options: ReefOptions) -> Result<Self> {
        options.validate()?;
        let cells = vec![None; options.get_num_cells()];
        Ok(Self {
            instance,
            evaluator: Evaluator::new(instance),
            options,
            cells,
            larvae: Vec::new(),
        })
    }

    pub fn options(&self) -> &ReefOptions {
        &self.options
    }

    pub fn cells(&self) -> &[Option<Chromosome>] {
        &self.cells
    }

    /// Chromosome at `(row, col)`, if the cell is occupied.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Chromosome> {
        let size = self.options.get_reef_size();
        if row >= size || col >= size {
            return None;
        }
        self.cells[row * size + col].as_ref()
    }

    pub fn larvae(&self) -> &[Chromosome] {
        &self.larvae
    }

    fn occupied_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(cell, coral)| coral.as_ref().map(|_| cell))
            .collect()
    }

    fn occupants(&self) -> impl Iterator<Item = &Chromosome> {
        self.cells.iter().flatten()
    }

    fn evaluate_occupants(&mut self) -> Result<()> {
        self.evaluator.evaluate_all(self.cells.iter_mut().flatten())
    }

    /// Ranks the occupants as one arena, in row-major order.
    fn rank_occupants(&mut self) -> Result<()> {
        let occupied = self.occupied_cells();
        let mut corals: Vec<Chromosome> = occupied
            .iter()
            .filter_map(|&cell| self.cells[cell].take())
            .collect();

        let ranked = ranking::rank(&mut corals);

        for (cell, coral) in occupied.into_iter().zip(corals) {
            self.cells[cell] = Some(coral);
        }
        ranked.map(|_| ())
    }

    /// Tries to settle every larva. Returns the number of dropped larvae.
    fn settle(&mut self, larvae: Vec<Chromosome>, rng: &mut RandomNumberGenerator) -> usize {
        let mut dropped = 0;
        for larva in larvae {
            let mut larva = Some(larva);
            for _ in 0..self.options.get_settle_attempts() {
                let cell = rng.gen_index(self.cells.len());
                let takes_cell = match (&self.cells[cell], &larva) {
                    (None, _) => true,
                    (Some(occupant), Some(candidate)) => candidate.dominates(occupant),
                    (Some(_), None) => false,
                };
                if takes_cell {
                    self.cells[cell] = larva.take();
                    break;
                }
            }
            if larva.is_some() {
                dropped += 1;
            }
        }
        dropped
    }

    /// Clones the occupants, orders them by ascending domination count and
    /// settles the first `budding_pct` of them.
    fn bud(&mut self, rng: &mut RandomNumberGenerator) -> usize {
        let mut buds: Vec<Chromosome> = self.occupants().cloned().collect();
        buds.sort_by_key(Chromosome::domination_count);
        buds.truncate(percent_of(buds.len(), self.options.get_budding_pct()));
        let budded = buds.len();
        let dropped = self.settle(buds, rng);
        trace!(budded, dropped, "budding");
        budded
    }

    /// Removes occupants whose objective pair is held by more than
    /// `duplicate_cap` occupants. Returns the number removed.
    fn cull_duplicates(&mut self) -> Result<usize> {
        let mut counts: HashMap<Objectives, usize> = HashMap::new();
        for coral in self.occupants() {
            let objectives = coral.objectives().ok_or(SchedulingError::Unevaluated)?;
            *counts.entry(objectives).or_insert(0) += 1;
        }

        let cap = self.options.get_duplicate_cap();
        let mut removed = 0;
        for slot in self.cells.iter_mut() {
            let Some(objectives) = slot.as_ref().and_then(Chromosome::objectives) else {
                continue;
            };
            if let Some(count) = counts.get_mut(&objectives) {
                if *count > cap {
                    *slot = None;
                    *count -= 1;
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }

    /// Removes the `depredation_pct` occupants with the highest domination
    /// counts. Returns the number removed.
    fn depredate(&mut self) -> usize {
        let mut victims: Vec<(usize, usize)> = self
            .cells
            .iter()
            .enumerate()
            .filter_map(|(cell, coral)| coral.as_ref().map(|c| (cell, c.domination_count())))
            .collect();
        victims.sort_by(|a, b| b.1.cmp(&a.1));
        victims.truncate(percent_of(victims.len(), self.options.get_depredation_pct()));

        for &(cell, _) in &victims {
            self.cells[cell] = None;
        }
        victims.len()
    }

    fn cleanup(&mut self) {
        for coral in self.cells.iter_mut().flatten() {
            coral.invalidate();
            coral.set_child(false);
        }
    }

    fn ranked_occupants(&self) -> Result<Vec<&Chromosome>> {
        let corals: Vec<&Chromosome> = self.occupants().collect();
        if corals.is_empty() {
            return Err(SchedulingError::EmptyPopulation);
        }
        if corals.iter().any(|c| !c.is_evaluated()) {
            return Err(SchedulingError::Unevaluated);
        }
        Ok(corals)
    }
}

impl PopulationStrategy for ReefStrategy<'_> {
    fn num_generations(&self) -> usize {
        self.options.get_num_generations()
    }

    fn initialize(&mut self, rng: &mut RandomNumberGenerator) -> Result<()> {
        self.cells = vec![None; self.options.get_num_cells()];
        self.larvae.clear();

        let mut cells: Vec<usize> = (0..self.cells.len()).collect();
        rng.shuffle(&mut cells);
        for &cell in cells.iter().take(self.options.initial_occupants()) {
            self.cells[cell] = Some(Chromosome::random(self.instance, rng));
        }

        debug!(
            cells = self.cells.len(),
            occupants = self.population_size(),
            "initialized reef"
        );
        Ok(())
    }

    fn evaluate(&mut self) -> Result<()> {
        self.evaluate_occupants()
    }

    fn rank(&mut self) -> Result<()> {
        self.rank_occupants()
    }

    fn breed(&mut self, context: &GenerationContext, rng: &mut RandomNumberGenerator) -> Result<()> {
        let mut occupied = self.occupied_cells();
        rng.shuffle(&mut occupied);

        let mut broadcast = percent_of(occupied.len(), self.options.get_reproduction_pct());
        broadcast -= broadcast % 2;
        let (spawners, brooders) = occupied.split_at(broadcast);

        let mut larvae = Vec::with_capacity(spawners.len() / 2 + brooders.len());
        for pair in spawners.chunks_exact(2) {
            let (Some(parent_a), Some(parent_b)) = (&self.cells[pair[0]], &self.cells[pair[1]])
            else {
                continue;
            };
            let partition = JobPartition::random(self.instance.num_jobs(), rng);
            let (mut larva, _) = job_partition_crossover(parent_a, parent_b, &partition)?;
            larva.set_child(true);
            larvae.push(larva);
        }

        for &cell in brooders {
            let Some(coral) = &self.cells[cell] else {
                continue;
            };
            let mut larva = coral.clone();
            mutate(&mut larva, self.instance, self.options.get_mutation_mode(), rng)?;
            larva.reset_ranking();
            larva.set_child(true);
            larvae.push(larva);
        }

        trace!(
            generation = context.generation,
            spawned = spawners.len() / 2,
            brooded = brooders.len(),
            "released larvae"
        );
        self.larvae = larvae;
        Ok(())
    }

    fn replace(&mut self, context: &GenerationContext, rng: &mut RandomNumberGenerator) -> Result<()> {
        let mut larvae = std::mem::take(&mut self.larvae);
        self.evaluator.evaluate_all(larvae.iter_mut())?;
        let released = larvae.len();
        let dropped = self.settle(larvae, rng);

        self.rank_occupants()?;
        let budded = self.bud(rng);

        self.evaluate_occupants()?;
        self.rank_occupants()?;
        let duplicates = self.cull_duplicates()?;

        self.rank_occupants()?;
        let depredated = self.depredate();

        self.cleanup();

        debug!(
            generation = context.generation,
            released,
            dropped,
            budded,
            duplicates,
            depredated,
            occupants = self.population_size(),
            "reef replacement"
        );
        Ok(())
    }

    fn extract_best(&self) -> Result<Chromosome> {
        let corals = self.ranked_occupants()?;
        corals
            .into_iter()
            .min_by_key(|c| c.domination_count())
            .cloned()
            .ok_or(SchedulingError::EmptyPopulation)
    }

    fn extract_worst(&self) -> Result<Chromosome> {
        let corals = self.ranked_occupants()?;
        corals
            .into_iter()
            .max_by_key(|c| c.domination_count())
            .cloned()
            .ok_or(SchedulingError::EmptyPopulation)
    }

    fn population_size(&self) -> usize {
        self.occupants().count()
    }

    fn non_dominated_count(&self) -> usize {
        self.occupants()
            .filter(|c| c.is_evaluated() && c.domination_count() == 0)
            .count()
    }
}
