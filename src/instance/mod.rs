//! # Instance Model
//!
//! A flexible job-shop instance: an ordered list of jobs, each an ordered list
//! of operations, each operation carrying one processing duration per machine.
//! A machine that cannot execute an operation carries [`INFEASIBLE_DURATION`].
//!
//! Jobs, operations and machines are addressed by 0-based indices throughout
//! the crate.
//!
//! ## Example
//!
//! ```rust
//! use fjsp_evo::instance::{Instance, Job, Operation, INFEASIBLE_DURATION};
//!
//! let instance = Instance::new(vec![
//!     Job::new(vec![Operation::new(vec![5, 7])]),
//!     Job::new(vec![Operation::new(vec![3, INFEASIBLE_DURATION])]),
//! ])
//! .unwrap();
//!
//! assert_eq!(instance.num_jobs(), 2);
//! assert_eq!(instance.num_machines(), 2);
//! assert_eq!(instance.feasible_machines(1, 0), vec![0]);
//! ```

pub mod parser;

use std::fmt::Write;

use crate::error::{Result, SchedulingError};
use crate::rng::RandomNumberGenerator;

pub use parser::{load, InstanceSource, DEFAULT_DATASET};

/// Duration marking a machine that cannot execute an operation.
pub const INFEASIBLE_DURATION: u32 = 100;

/// Upper bound for durations drawn by [`Instance::generate`] when the caller
/// has no preference.
pub const DEFAULT_MAX_DURATION: u32 = 10;

/// One unit of work: its processing duration on every machine.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    durations: Vec<u32>,
}

impl Operation {
    pub fn new(durations: Vec<u32>) -> Self {
        Self { durations }
    }

    /// Duration on `machine`; `None` if the machine index is out of range.
    pub fn duration(&self, machine: usize) -> Option<u32> {
        self.durations.get(machine).copied()
    }

    pub fn durations(&self) -> &[u32] {
        &self.durations
    }

    pub fn is_feasible_on(&self, machine: usize) -> bool {
        matches!(self.duration(machine), Some(d) if d != INFEASIBLE_DURATION)
    }

    pub fn feasible_machines(&self) -> Vec<usize> {
        (0..self.durations.len())
            .filter(|&machine| self.is_feasible_on(machine))
            .collect()
    }
}

/// An ordered sequence of operations.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    operations: Vec<Operation>,
}

impl Job {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn num_operations(&self) -> usize {
        self.operations.len()
    }
}

/// A validated problem instance.
///
/// Construction through [`Instance::new`] guarantees that every job has at
/// least one operation, every operation has a duration for every machine, and
/// every operation has at least one machine able to execute it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    jobs: Vec<Job>,
    num_machines: usize,
}

impl Instance {
    /// Validates and wraps a list of jobs. The machine count is taken from
    /// the first operation.
    pub fn new(jobs: Vec<Job>) -> Result<Self> {
        if jobs.is_empty() {
            return Err(SchedulingError::InvalidInstance(
                "instance has no jobs".to_string(),
            ));
        }

        let num_machines = jobs
            .iter()
            .flat_map(|job| job.operations.first())
            .map(|op| op.durations.len())
            .next()
            .unwrap_or(0);

        if num_machines == 0 {
            return Err(SchedulingError::InvalidInstance(
                "instance has no machines".to_string(),
            ));
        }

        for (job_idx, job) in jobs.iter().enumerate() {
            if job.operations.is_empty() {
                return Err(SchedulingError::InvalidInstance(format!(
                    "job {} has no operations",
                    job_idx + 1
                )));
            }
            for (op_idx, op) in job.operations.iter().enumerate() {
                if op.durations.len() != num_machines {
                    return Err(SchedulingError::InvalidInstance(format!(
                        "operation {},{} lists {} durations, expected {}",
                        job_idx + 1,
                        op_idx + 1,
                        op.durations.len(),
                        num_machines
                    )));
                }
                if op.feasible_machines().is_empty() {
                    return Err(SchedulingError::InvalidInstance(format!(
                        "operation {},{} cannot run on any machine",
                        job_idx + 1,
                        op_idx + 1
                    )));
                }
            }
        }

        Ok(Self { jobs, num_machines })
    }

    /// Generates a random instance.
    ///
    /// Every job receives one operation, then the remaining
    /// `num_operations - num_jobs` operations are attached to uniformly chosen
    /// jobs. Every duration is drawn uniformly from `1..=max_duration`.
    pub fn generate(
        num_jobs: usize,
        num_machines: usize,
        num_operations: usize,
        max_duration: u32,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Self> {
        if num_jobs == 0 || num_machines == 0 {
            return Err(SchedulingError::Configuration(
                "Number of jobs and machines must be positive".to_string(),
            ));
        }
        if num_operations < num_jobs {
            return Err(SchedulingError::Configuration(format!(
                "Number of operations ({}) cannot be lower than the number of jobs ({})",
                num_operations, num_jobs
            )));
        }
        if max_duration == 0 || max_duration >= INFEASIBLE_DURATION {
            return Err(SchedulingError::Configuration(format!(
                "Maximum duration must lie in 1..{}",
                INFEASIBLE_DURATION
            )));
        }

        let random_operation = |rng: &mut RandomNumberGenerator| {
            Operation::new(
                (0..num_machines)
                    .map(|_| rng.gen_range_inclusive(1, max_duration as usize) as u32)
                    .collect(),
            )
        };

        let mut jobs: Vec<Job> = (0..num_jobs)
            .map(|_| Job::new(vec![random_operation(rng)]))
            .collect();

        for _ in num_jobs..num_operations {
            let job = rng.gen_index(num_jobs);
            let operation = random_operation(rng);
            jobs[job].operations.push(operation);
        }

        Self::new(jobs)
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn num_jobs(&self) -> usize {
        self.jobs.len()
    }

    pub fn num_machines(&self) -> usize {
        self.num_machines
    }

    /// Total number of operations across all jobs, i.e. the chromosome length.
    pub fn num_operations(&self) -> usize {
        self.jobs.iter().map(Job::num_operations).sum()
    }

    /// Number of operations of each job, indexed by job.
    pub fn operation_counts(&self) -> Vec<usize> {
        self.jobs.iter().map(Job::num_operations).collect()
    }

    pub fn operation(&self, job: usize, operation: usize) -> Option<&Operation> {
        self.jobs.get(job)?.operations.get(operation)
    }

    /// Duration of `job`'s `operation` on `machine`, `None` if any index is out
    /// of range.
    pub fn duration(&self, job: usize, operation: usize, machine: usize) -> Option<u32> {
        self.operation(job, operation)?.duration(machine)
    }

    pub fn feasible_machines(&self, job: usize, operation: usize) -> Vec<usize> {
        self.operation(job, operation)
            .map(Operation::feasible_machines)
            .unwrap_or_default()
    }

    /// Renders the instance in the semicolon-separated dataset format
    /// (`job,op:d1,...,dM;...` terminated by a period), 1-based.
    pub fn to_dataset_string(&self) -> String {
        let mut out = String::new();
        let mut first = true;
        for (job_idx, job) in self.jobs.iter().enumerate() {
            for (op_idx, op) in job.operations.iter().enumerate() {
                if !first {
                    out.push(';');
                }
                first = false;
                let _ = write!(out, "{},{}:", job_idx + 1, op_idx + 1);
                let durations: Vec<String> = op.durations.iter().map(u32::to_string).collect();
                out.push_str(&durations.join(","));
            }
        }
        out.push('.');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(durations: &[u32]) -> Operation {
        Operation::new(durations.to_vec())
    }

    #[test]
    fn test_new_rejects_empty_instance() {
        assert!(matches!(
            Instance::new(vec![]),
            Err(SchedulingError::InvalidInstance(_))
        ));
    }

    #[test]
    fn test_new_rejects_job_without_operations() {
        let jobs = vec![Job::new(vec![op(&[1, 2])]), Job::new(vec![])];
        let err = Instance::new(jobs).unwrap_err();
        assert!(err.to_string().contains("job 2 has no operations"));
    }

    #[test]
    fn test_new_rejects_ragged_durations() {
        let jobs = vec![Job::new(vec![op(&[1, 2]), op(&[1, 2, 3])])];
        assert!(Instance::new(jobs).is_err());
    }

    #[test]
    fn test_new_rejects_operation_without_machine() {
        let jobs = vec![Job::new(vec![op(&[INFEASIBLE_DURATION, INFEASIBLE_DURATION])])];
        let err = Instance::new(jobs).unwrap_err();
        assert!(err.to_string().contains("cannot run on any machine"));
    }

    #[test]
    fn test_accessors() {
        let instance = Instance::new(vec![
            Job::new(vec![op(&[5, 7]), op(&[INFEASIBLE_DURATION, 2])]),
            Job::new(vec![op(&[3, 9])]),
        ])
        .unwrap();

        assert_eq!(instance.num_jobs(), 2);
        assert_eq!(instance.num_machines(), 2);
        assert_eq!(instance.num_operations(), 3);
        assert_eq!(instance.operation_counts(), vec![2, 1]);
        assert_eq!(instance.duration(0, 1, 1), Some(2));
        assert_eq!(instance.duration(0, 2, 1), None);
        assert_eq!(instance.feasible_machines(0, 1), vec![1]);
        assert_eq!(instance.feasible_machines(5, 0), Vec::<usize>::new());
    }

    #[test]
    fn test_generate_respects_counts_and_bounds() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let instance = Instance::generate(4, 3, 11, DEFAULT_MAX_DURATION, &mut rng).unwrap();

        assert_eq!(instance.num_jobs(), 4);
        assert_eq!(instance.num_machines(), 3);
        assert_eq!(instance.num_operations(), 11);
        for job in instance.jobs() {
            assert!(job.num_operations() >= 1);
            for operation in job.operations() {
                assert!(operation
                    .durations()
                    .iter()
                    .all(|&d| (1..=DEFAULT_MAX_DURATION).contains(&d)));
            }
        }
    }

    #[test]
    fn test_generate_rejects_too_few_operations() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        assert!(matches!(
            Instance::generate(4, 3, 3, 10, &mut rng),
            Err(SchedulingError::Configuration(_))
        ));
    }

    #[test]
    fn test_to_dataset_string() {
        let instance = Instance::new(vec![
            Job::new(vec![op(&[5, 7]), op(&[1, 2])]),
            Job::new(vec![op(&[3, 9])]),
        ])
        .unwrap();

        assert_eq!(instance.to_dataset_string(), "1,1:5,7;1,2:1,2;2,1:3,9.");
    }
}
