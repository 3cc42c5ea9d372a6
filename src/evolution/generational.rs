//! # GenerationalStrategy
//!
//! NSGA-II over a flat population of fixed size.
//!
//! Each generation the ranked population is sampled by crowded binary
//! tournament, the winners are paired by [`unique_pairs`] and every pair
//! yields two children. A child pair undergoes crossover with the current
//! crossover rate (one of the two strategies by coin flip, then repair) and
//! each child is mutated with the current mutation rate. Replacement merges
//! the population with the children, ranks the merged set and keeps the best
//! `population_size` members under the crowded-comparison order. Once
//! elitist retention is active, the lowest ranked surviving children are
//! swapped for the best non-surviving parents until the parent quota is met.

use tracing::{debug, trace};

use super::options::NsgaOptions;
use super::strategy::{GenerationContext, PopulationStrategy};
use crate::chromosome::Chromosome;
use crate::error::{Result, SchedulingError};
use crate::fitness::Evaluator;
use crate::instance::Instance;
use crate::operators::{mutate, repair, Crossover};
use crate::ranking::{self, ranked_order};
use crate::rng::RandomNumberGenerator;
use crate::selection::{unique_pairs, CrowdedTournament};

/// The generational (NSGA-II) population strategy.
#[derive(Debug, Clone)]
pub struct GenerationalStrategy<'a> {
    instance: &'a Instance,
    evaluator: Evaluator<'a>,
    options: NsgaOptions,
    tournament: CrowdedTournament,
    population: Vec<Chromosome>,
    offspring: Vec<Chromosome>,
}

impl<'a> GenerationalStrategy<'a> {
    /// Creates the strategy after validating `options`.
    pub fn new(instance: &'a Instance, options: NsgaOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            instance,
            evaluator: Evaluator::new(instance),
            options,
            tournament: CrowdedTournament::new(),
            population: Vec::new(),
            offspring: Vec::new(),
        })
    }

    pub fn options(&self) -> &NsgaOptions {
        &self.options
    }

    pub fn population(&self) -> &[Chromosome] {
        &self.population
    }

    pub fn offspring(&self) -> &[Chromosome] {
        &self.offspring
    }

    fn variate(
        &self,
        parent_a: &Chromosome,
        parent_b: &Chromosome,
        crossover_rate: f64,
        mutation_rate: f64,
        rng: &mut RandomNumberGenerator,
    ) -> Result<[Chromosome; 2]> {
        let mut children = if rng.gen_probability(crossover_rate) {
            let crossover = Crossover::random(rng);
            let (a, b) = crossover.apply(parent_a, parent_b, self.instance.num_jobs(), rng)?;
            [a, b]
        } else {
            [parent_a.clone(), parent_b.clone()]
        };

        for child in children.iter_mut() {
            repair(child, self.instance, rng)?;
            if rng.gen_probability(mutation_rate) {
                mutate(child, self.instance, self.options.get_mutation_mode(), rng)?;
            }
            child.reset_ranking();
            child.set_child(true);
        }
        Ok(children)
    }
}

impl PopulationStrategy for GenerationalStrategy<'_> {
    fn num_generations(&self) -> usize {
        self.options.get_num_generations()
    }

    fn initialize(&mut self, rng: &mut RandomNumberGenerator) -> Result<()> {
        self.population = (0..self.options.get_population_size())
            .map(|_| Chromosome::random(self.instance, rng))
            .collect();
        self.offspring.clear();
        debug!(population = self.population.len(), "initialized population");
        Ok(())
    }

    fn evaluate(&mut self) -> Result<()> {
        self.evaluator.evaluate_all(self.population.iter_mut())
    }

    fn rank(&mut self) -> Result<()> {
        ranking::rank(&mut self.population)?;
        Ok(())
    }

    fn breed(&mut self, context: &GenerationContext, rng: &mut RandomNumberGenerator) -> Result<()> {
        let progress = context.progress();
        let crossover_rate = self.options.get_crossover().at(progress);
        let mutation_rate = self.options.get_mutation().at(progress);

        let winners = self
            .tournament
            .select(&self.population, self.population.len(), rng)?;
        let pairs = unique_pairs(&winners);

        let mut offspring = Vec::with_capacity(pairs.len() * 2);
        for (a, b) in pairs {
            let children = self.variate(
                &self.population[a],
                &self.population[b],
                crossover_rate,
                mutation_rate,
                rng,
            )?;
            offspring.extend(children);
        }

        trace!(
            generation = context.generation,
            crossover_rate,
            mutation_rate,
            children = offspring.len(),
            "bred offspring"
        );
        self.offspring = offspring;
        Ok(())
    }

    fn replace(&mut self, context: &GenerationContext, _rng: &mut RandomNumberGenerator) -> Result<()> {
        let mut merged = std::mem::take(&mut self.population);
        for parent in merged.iter_mut() {
            parent.set_child(false);
        }
        merged.append(&mut self.offspring);

        self.evaluator.evaluate_all(merged.iter_mut())?;
        ranking::rank(&mut merged)?;

        let order = ranked_order(&merged);
        let keep = self.options.get_population_size().min(order.len());
        let (selected, rest) = order.split_at(keep);
        let mut selected = selected.to_vec();

        if let Some(quota) = self.options.elitist_quota(context.progress()) {
            let swapped = retain_parents(&merged, &mut selected, rest, quota);
            if swapped > 0 {
                trace!(generation = context.generation, quota, swapped, "elitist retention");
            }
        }

        let mut slots: Vec<Option<Chromosome>> = merged.into_iter().map(Some).collect();
        self.population = selected
            .iter()
            .filter_map(|&index| slots[index].take())
            .collect();
        Ok(())
    }

    fn extract_best(&self) -> Result<Chromosome> {
        ensure_ranked(&self.population)?;
        ranking::best_index(&self.population)
            .map(|index| self.population[index].clone())
            .ok_or(SchedulingError::EmptyPopulation)
    }

    fn extract_worst(&self) -> Result<Chromosome> {
        ensure_ranked(&self.population)?;
        ranked_order(&self.population)
            .last()
            .map(|&index| self.population[index].clone())
            .ok_or(SchedulingError::EmptyPopulation)
    }

    fn population_size(&self) -> usize {
        self.population.len()
    }

    fn non_dominated_count(&self) -> usize {
        self.population
            .iter()
            .filter(|c| c.is_evaluated() && c.front_level() == 0)
            .count()
    }
}

/// Swaps the lowest ranked children in `selected` for the best parents in
/// `rest` until `selected` holds at least `quota` parents or no parent is
/// left. Returns the number of swaps.
fn retain_parents(
    merged: &[Chromosome],
    selected: &mut [usize],
    rest: &[usize],
    quota: usize,
) -> usize {
    let parents = selected.iter().filter(|&&i| !merged[i].is_child()).count();
    let mut missing = quota.saturating_sub(parents);
    let mut spare_parents = rest.iter().copied().filter(|&i| !merged[i].is_child());
    let mut swapped = 0;

    for slot in selected.iter_mut().rev() {
        if missing == 0 {
            break;
        }
        if !merged[*slot].is_child() {
            continue;
        }
        match spare_parents.next() {
            Some(parent) => {
                *slot = parent;
                missing -= 1;
                swapped += 1;
            }
            None => break,
        }
    }
    swapped
}

fn ensure_ranked(population: &[Chromosome]) -> Result<()> {
    if population.is_empty() {
        return Err(SchedulingError::EmptyPopulation);
    }
    if population.iter().any(|c| !c.is_evaluated()) {
        return Err(SchedulingError::Unevaluated);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::Objectives;
    use crate::evolution::options::Schedule;

    fn instance() -> Instance {
        Instance::generate(4, 3, 10, 10, &mut RandomNumberGenerator::from_seed(17)).unwrap()
    }

    fn scored(makespan: u64, load: u64, is_child: bool) -> Chromosome {
        let mut c = Chromosome::from_genes(vec![0], vec![0]).unwrap();
        c.set_objectives(Objectives::new(makespan, load));
        c.set_child(is_child);
        c
    }

    #[test]
    fn test_new_validates_options() {
        let instance = instance();
        assert!(matches!(
            GenerationalStrategy::new(&instance, NsgaOptions::new(0, 5)),
            Err(SchedulingError::Configuration(_))
        ));
    }

    #[test]
    fn test_breed_produces_marked_valid_children() {
        let instance = instance();
        let mut rng = RandomNumberGenerator::from_seed(3);
        let options = NsgaOptions::builder()
            .population_size(12)
            .num_generations(5)
            .crossover(Schedule::constant(1.0))
            .mutation(Schedule::constant(1.0))
            .build();
        let mut strategy = GenerationalStrategy::new(&instance, options).unwrap();

        strategy.initialize(&mut rng).unwrap();
        strategy.evaluate().unwrap();
        strategy.rank().unwrap();
        strategy
            .breed(&GenerationContext::new(1, 5), &mut rng)
            .unwrap();

        assert!(!strategy.offspring().is_empty());
        assert_eq!(strategy.offspring().len() % 2, 0);
        for child in strategy.offspring() {
            assert!(child.is_child());
            assert!(child.is_valid(&instance));
            assert!(!child.is_evaluated());
        }
    }

    #[test]
    fn test_replace_truncates_to_population_size() {
        let instance = instance();
        let mut rng = RandomNumberGenerator::from_seed(8);
        let mut strategy = GenerationalStrategy::new(&instance, NsgaOptions::new(10, 3)).unwrap();
        let context = GenerationContext::new(1, 3);

        strategy.initialize(&mut rng).unwrap();
        strategy.evaluate().unwrap();
        strategy.rank().unwrap();
        strategy.breed(&context, &mut rng).unwrap();
        strategy.replace(&context, &mut rng).unwrap();

        assert_eq!(strategy.population_size(), 10);
        assert!(strategy.offspring().is_empty());
        assert!(strategy.population().iter().all(|c| c.is_valid(&instance)));
        assert!(strategy.extract_best().is_ok());
    }

    #[test]
    fn test_retain_parents_swaps_worst_children() {
        // Ranked order: children 0, 1, 2 then parents 3, 4.
        let merged = vec![
            scored(1, 1, true),
            scored(2, 2, true),
            scored(3, 3, true),
            scored(4, 4, false),
            scored(5, 5, false),
        ];
        let mut selected = vec![0, 1, 2];
        let swapped = retain_parents(&merged, &mut selected, &[3, 4], 2);

        assert_eq!(swapped, 2);
        assert_eq!(selected, vec![0, 4, 3]);
    }

    #[test]
    fn test_retain_parents_quota_already_met() {
        let merged = vec![scored(1, 1, false), scored(2, 2, true), scored(3, 3, false)];
        let mut selected = vec![0, 1];
        assert_eq!(retain_parents(&merged, &mut selected, &[2], 1), 0);
        assert_eq!(selected, vec![0, 1]);
    }

    #[test]
    fn test_extract_before_evaluation_fails() {
        let instance = instance();
        let mut rng = RandomNumberGenerator::from_seed(8);
        let mut strategy = GenerationalStrategy::new(&instance, NsgaOptions::new(4, 1)).unwrap();
        assert!(matches!(
            strategy.extract_best(),
            Err(SchedulingError::EmptyPopulation)
        ));

        strategy.initialize(&mut rng).unwrap();
        assert!(matches!(
            strategy.extract_best(),
            Err(SchedulingError::Unevaluated)
        ));
    }
}
