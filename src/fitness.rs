//! # Fitness Evaluation
//!
//! The `Evaluator` simulates the schedule a chromosome encodes and returns its
//! [`Objectives`]. Genes are scanned left to right; each operation starts as
//! soon as both its job and its machine are free:
//!
//! ```text
//! start  = max(job_ready[j], machine_ready[m])
//! finish = start + duration(j, op, m)
//! job_ready[j] = machine_ready[m] = finish
//! ```
//!
//! The makespan is the largest machine ready time and the total load is their
//! sum. Evaluation is deterministic: it draws no randomness.
//!
//! ## Example
//!
//! ```rust
//! use fjsp_evo::chromosome::Chromosome;
//! use fjsp_evo::fitness::Evaluator;
//! use fjsp_evo::instance::{Instance, Job, Operation};
//!
//! let instance = Instance::new(vec![
//!     Job::new(vec![Operation::new(vec![5, 7])]),
//!     Job::new(vec![Operation::new(vec![3, 9])]),
//! ])
//! .unwrap();
//!
//! let chromosome = Chromosome::from_genes(vec![0, 1], vec![1, 0]).unwrap();
//! let objectives = Evaluator::new(&instance).evaluate(&chromosome).unwrap();
//! assert_eq!((objectives.makespan, objectives.total_load), (7, 10));
//! ```

use tracing::trace;

use crate::chromosome::{Chromosome, Objectives};
use crate::error::{Result, SchedulingError};
use crate::instance::Instance;

/// Computes objectives of chromosomes against one instance.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    instance: &'a Instance,
}

impl<'a> Evaluator<'a> {
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    /// Simulates `chromosome` and returns its objectives.
    ///
    /// # Errors
    ///
    /// Returns `SchedulingError::InvariantViolation` when a gene addresses a
    /// job, operation or machine the instance does not have. Infeasible
    /// assignments are not rejected here; operators repair them before
    /// evaluation.
    pub fn evaluate(&self, chromosome: &Chromosome) -> Result<Objectives> {
        let mut job_ready = vec![0u64; self.instance.num_jobs()];
        let mut machine_ready = vec![0u64; self.instance.num_machines()];
        let mut occurrences = vec![0usize; self.instance.num_jobs()];

        for (position, (&job, &machine)) in chromosome
            .job_tags()
            .iter()
            .zip(chromosome.machines())
            .enumerate()
        {
            let operation = occurrences.get(job).copied().ok_or_else(|| {
                SchedulingError::InvariantViolation(format!(
                    "gene {} references unknown job {}",
                    position, job
                ))
            })?;
            occurrences[job] += 1;

            let duration = self
                .instance
                .duration(job, operation, machine)
                .ok_or_else(|| {
                    SchedulingError::InvariantViolation(format!(
                        "gene {} references operation {} of job {} on machine {}",
                        position, operation, job, machine
                    ))
                })?;

            let start = job_ready[job].max(machine_ready[machine]);
            let finish = start + u64::from(duration);
            job_ready[job] = finish;
            machine_ready[machine] = finish;
        }

        let makespan = machine_ready.iter().copied().max().unwrap_or(0);
        let total_load = machine_ready.iter().sum();
        trace!(makespan, total_load, "evaluated chromosome");

        Ok(Objectives::new(makespan, total_load))
    }

    /// Evaluates `chromosome` and caches the result on it.
    pub fn evaluate_in_place(&self, chromosome: &mut Chromosome) -> Result<Objectives> {
        let objectives = self.evaluate(chromosome)?;
        chromosome.set_objectives(objectives);
        Ok(objectives)
    }

    /// Evaluates every chromosome of `population` in place.
    pub fn evaluate_all<'c, I>(&self, population: I) -> Result<()>
    where
        I: IntoIterator<Item = &'c mut Chromosome>,
    {
        for chromosome in population {
            self.evaluate_in_place(chromosome)?;
        }
        Ok(())
    }
}
