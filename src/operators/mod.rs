//! # Variation Operators
//!
//! Crossover and mutation over [`Chromosome`](crate::chromosome::Chromosome)s.
//! Every operator preserves the per-job order of operations; machines that end
//! up infeasible for their operation are fixed with [`repair`].
//!
//! ## Example
//!
//! ```rust
//! use fjsp_evo::chromosome::Chromosome;
//! use fjsp_evo::operators::{job_partition_crossover, JobPartition};
//!
//! let a = Chromosome::from_genes(vec![0, 1, 0, 1], vec![0, 0, 0, 0]).unwrap();
//! let b = Chromosome::from_genes(vec![1, 1, 0, 0], vec![1, 1, 1, 1]).unwrap();
//!
//! // Keep job 0 from `a`, take job 1 from `b`.
//! let partition = JobPartition::from_first_group(2, &[0]);
//! let (child, _) = job_partition_crossover(&a, &b, &partition).unwrap();
//! assert_eq!(child.job_tags(), &[0, 1, 0, 1]);
//! assert_eq!(child.machines(), &[0, 1, 0, 1]);
//! ```

pub mod crossover;
pub mod mutation;

pub use crossover::{
    half_mask, job_partition_crossover, machine_reassignment_crossover, Crossover, JobPartition,
};
pub use mutation::{mutate, repair, MutationMode};
