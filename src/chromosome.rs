//! # Chromosome
//!
//! A candidate schedule encoded as two parallel vectors:
//!
//! - `job_tags`: one job index per operation. Each job appears exactly as many
//!   times as it has operations, and the k-th occurrence of a job (scanning
//!   left to right) stands for that job's k-th operation.
//! - `machines`: the machine index assigned to the operation at the same
//!   position.
//!
//! Alongside the genes a chromosome caches its [`Objectives`] and the
//! bookkeeping written by the ranking engine. Any change to the genes must go
//! through a method that invalidates the cache.
//!
//! ## Example
//!
//! ```rust
//! use fjsp_evo::chromosome::Chromosome;
//!
//! let chromosome = Chromosome::from_genes(vec![1, 0, 1], vec![0, 1, 1]).unwrap();
//! // The second `1` is job 1's second operation.
//! assert_eq!(chromosome.operation_indices(), vec![0, 0, 1]);
//! ```

use std::fmt;

use crate::error::{Result, SchedulingError};
use crate::instance::Instance;
use crate::rng::RandomNumberGenerator;

/// The two minimised objectives of a schedule.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Objectives {
    /// Latest completion time over all machines.
    pub makespan: u64,
    /// Sum of the machines' completion times.
    pub total_load: u64,
}

impl Objectives {
    pub fn new(makespan: u64, total_load: u64) -> Self {
        Self {
            makespan,
            total_load,
        }
    }

    /// Pareto dominance for minimisation: no worse on both objectives and
    /// strictly better on at least one.
    pub fn dominates(&self, other: &Objectives) -> bool {
        self.makespan <= other.makespan
            && self.total_load <= other.total_load
            && (self.makespan < other.makespan || self.total_load < other.total_load)
    }
}

impl fmt::Display for Objectives {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.makespan, self.total_load)
    }
}

/// A candidate schedule plus its cached evaluation and ranking state.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct Chromosome {
    job_tags: Vec<usize>,
    machines: Vec<usize>,
    objectives: Option<Objectives>,
    pub(crate) domination_count: usize,
    pub(crate) dominated_set: Vec<usize>,
    pub(crate) front_level: usize,
    pub(crate) crowding_distance: f64,
    is_child: bool,
}

impl Chromosome {
    /// Builds a chromosome from raw genes. Only the lengths are checked here;
    /// use [`Chromosome::is_valid`] to check the genes against an instance.
    pub fn from_genes(job_tags: Vec<usize>, machines: Vec<usize>) -> Result<Self> {
        if job_tags.len() != machines.len() {
            return Err(SchedulingError::InvariantViolation(format!(
                "job sequence has {} genes but machine sequence has {}",
                job_tags.len(),
                machines.len()
            )));
        }
        Ok(Self {
            job_tags,
            machines,
            objectives: None,
            domination_count: 0,
            dominated_set: Vec::new(),
            front_level: 0,
            crowding_distance: 0.0,
            is_child: false,
        })
    }

    /// Draws a random feasible chromosome: the job tags are a uniform shuffle
    /// of the instance's operation multiset and every operation gets a
    /// uniformly chosen machine able to execute it.
    pub fn random(instance: &Instance, rng: &mut RandomNumberGenerator) -> Self {
        let mut job_tags: Vec<usize> = instance
            .operation_counts()
            .into_iter()
            .enumerate()
            .flat_map(|(job, count)| std::iter::repeat(job).take(count))
            .collect();
        rng.shuffle(&mut job_tags);

        let mut occurrences = vec![0usize; instance.num_jobs()];
        let machines = job_tags
            .iter()
            .map(|&job| {
                let operation = occurrences[job];
                occurrences[job] += 1;
                let feasible = instance.feasible_machines(job, operation);
                // Instance::new guarantees at least one feasible machine.
                rng.choose(&feasible).copied().unwrap_or(0)
            })
            .collect();

        Self {
            job_tags,
            machines,
            objectives: None,
            domination_count: 0,
            dominated_set: Vec::new(),
            front_level: 0,
            crowding_distance: 0.0,
            is_child: false,
        }
    }

    pub fn job_tags(&self) -> &[usize] {
        &self.job_tags
    }

    pub fn machines(&self) -> &[usize] {
        &self.machines
    }

    pub fn len(&self) -> usize {
        self.job_tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.job_tags.is_empty()
    }

    /// The operation index (within its job) of every position.
    pub fn operation_indices(&self) -> Vec<usize> {
        let num_jobs = self.job_tags.iter().max().map_or(0, |&j| j + 1);
        let mut occurrences = vec![0usize; num_jobs];
        self.job_tags
            .iter()
            .map(|&job| {
                let operation = occurrences[job];
                occurrences[job] += 1;
                operation
            })
            .collect()
    }

    /// Operation index (within its job) of the gene at `position`.
    pub fn operation_index_at(&self, position: usize) -> Option<usize> {
        let job = *self.job_tags.get(position)?;
        Some(
            self.job_tags[..position]
                .iter()
                .filter(|&&tag| tag == job)
                .count(),
        )
    }

    /// Checks the genes against `instance`: matching length, per-job tag
    /// counts equal to the job's operation count, and every assigned machine
    /// feasible for its operation.
    pub fn is_valid(&self, instance: &Instance) -> bool {
        if self.job_tags.len() != instance.num_operations() {
            return false;
        }

        let mut counts = vec![0usize; instance.num_jobs()];
        for &job in &self.job_tags {
            match counts.get_mut(job) {
                Some(count) => *count += 1,
                None => return false,
            }
        }
        if counts != instance.operation_counts() {
            return false;
        }

        self.operation_indices()
            .into_iter()
            .zip(self.job_tags.iter().zip(&self.machines))
            .all(|(operation, (&job, &machine))| {
                instance
                    .operation(job, operation)
                    .is_some_and(|op| op.is_feasible_on(machine))
            })
    }

    pub fn objectives(&self) -> Option<Objectives> {
        self.objectives
    }

    pub fn set_objectives(&mut self, objectives: Objectives) {
        self.objectives = Some(objectives);
    }

    pub fn makespan(&self) -> Option<u64> {
        self.objectives.map(|o| o.makespan)
    }

    pub fn total_load(&self) -> Option<u64> {
        self.objectives.map(|o| o.total_load)
    }

    pub fn is_evaluated(&self) -> bool {
        self.objectives.is_some()
    }

    /// Pareto dominance on the cached objectives. An unevaluated chromosome
    /// neither dominates nor is dominated.
    pub fn dominates(&self, other: &Chromosome) -> bool {
        match (self.objectives, other.objectives) {
            (Some(a), Some(b)) => a.dominates(&b),
            _ => false,
        }
    }

    /// Number of chromosomes dominating this one, as of the last ranking.
    pub fn domination_count(&self) -> usize {
        self.domination_count
    }

    /// Arena indices of the chromosomes this one dominates, as of the last
    /// ranking.
    pub fn dominated_set(&self) -> &[usize] {
        &self.dominated_set
    }

    pub fn front_level(&self) -> usize {
        self.front_level
    }

    pub fn crowding_distance(&self) -> f64 {
        self.crowding_distance
    }

    pub fn is_child(&self) -> bool {
        self.is_child
    }

    pub fn set_child(&mut self, is_child: bool) {
        self.is_child = is_child;
    }

    /// Overwrites the machine at `position` and drops the cached objectives.
    pub fn set_machine(&mut self, position: usize, machine: usize) {
        self.machines[position] = machine;
        self.invalidate();
    }

    /// Swaps the machine genes at `position` here and `other_position` in
    /// `other`, invalidating both.
    pub(crate) fn swap_machine_with(
        &mut self,
        position: usize,
        other: &mut Chromosome,
        other_position: usize,
    ) {
        std::mem::swap(
            &mut self.machines[position],
            &mut other.machines[other_position],
        );
        self.invalidate();
        other.invalidate();
    }

    /// Drops the cached objectives and all ranking state.
    pub fn invalidate(&mut self) {
        self.objectives = None;
        self.reset_ranking();
    }

    /// Clears the ranking bookkeeping while keeping the objectives.
    pub fn reset_ranking(&mut self) {
        self.domination_count = 0;
        self.dominated_set.clear();
        self.front_level = 0;
        self.crowding_distance = 0.0;
    }
}

impl PartialEq for Chromosome {
    /// Two chromosomes are equal when their genes are equal.
    fn eq(&self, other: &Self) -> bool {
        self.job_tags == other.job_tags && self.machines == other.machines
    }
}

impl Eq for Chromosome {}

impl fmt::Display for Chromosome {
    /// The genes string: `job,occurrence` per operation (1-based), then the
    /// machines (1-based), then makespan and total load (0 when unevaluated),
    /// all space separated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tokens: Vec<String> = self
            .job_tags
            .iter()
            .zip(self.operation_indices())
            .map(|(job, operation)| format!("{},{}", job + 1, operation + 1))
            .collect();
        tokens.extend(self.machines.iter().map(|machine| (machine + 1).to_string()));

        let objectives = self.objectives.unwrap_or_default();
        tokens.push(objectives.makespan.to_string());
        tokens.push(objectives.total_load.to_string());

        write!(f, "{}", tokens.join(" "))
    }
}
