//! Crossover operators.
//!
//! Both operators keep the per-job order of operations intact, so every child
//! still satisfies the occurrence encoding of its parents.
//!
//! - [`job_partition_crossover`] splits the jobs into two groups; each child
//!   keeps one parent's genes for one group in place and takes the other
//!   group's genes, in order, from the other parent.
//! - [`machine_reassignment_crossover`] keeps both sequences and swaps the
//!   machines of matching operations at half of the positions.

use tracing::trace;

use crate::chromosome::Chromosome;
use crate::error::{Result, SchedulingError};
use crate::rng::RandomNumberGenerator;

/// A split of the job indices into two disjoint groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPartition {
    in_first: Vec<bool>,
}

impl JobPartition {
    /// Draws a fresh partition. The first group holds between a third and two
    /// thirds of the jobs (uniform over that range) chosen at random.
    pub fn random(num_jobs: usize, rng: &mut RandomNumberGenerator) -> Self {
        let min_size = num_jobs / 3;
        let first_size = rng.gen_range_inclusive(min_size, num_jobs - min_size);

        let mut jobs: Vec<usize> = (0..num_jobs).collect();
        rng.shuffle(&mut jobs);

        Self::from_first_group(num_jobs, &jobs[..first_size])
    }

    /// Builds a partition whose first group is `first_group`; every other job
    /// of `0..num_jobs` lands in the second group.
    pub fn from_first_group(num_jobs: usize, first_group: &[usize]) -> Self {
        let mut in_first = vec![false; num_jobs];
        for &job in first_group {
            if let Some(slot) = in_first.get_mut(job) {
                *slot = true;
            }
        }
        Self { in_first }
    }

    pub fn in_first(&self, job: usize) -> bool {
        self.in_first.get(job).copied().unwrap_or(false)
    }

    pub fn first_group_size(&self) -> usize {
        self.in_first.iter().filter(|&&b| b).count()
    }

    pub fn num_jobs(&self) -> usize {
        self.in_first.len()
    }
}

/// Precedence-preserving order crossover over a job partition.
///
/// Child A keeps parent A's first-group genes at their positions and fills
/// the remaining positions with parent B's second-group genes in the order B
/// holds them. Child B mirrors this with the parents and groups swapped.
/// Machines travel with their genes.
///
/// # Errors
///
/// Returns `SchedulingError::InvariantViolation` if the parents differ in
/// length or the donor runs out of genes for a position, which means the
/// parents do not share one multiset of job tags.
pub fn job_partition_crossover(
    parent_a: &Chromosome,
    parent_b: &Chromosome,
    partition: &JobPartition,
) -> Result<(Chromosome, Chromosome)> {
    check_lengths(parent_a, parent_b)?;

    let child_a = merge(parent_a, parent_b, |job| partition.in_first(job))?;
    let child_b = merge(parent_b, parent_a, |job| !partition.in_first(job))?;

    trace!(
        first_group = partition.first_group_size(),
        "job partition crossover"
    );
    Ok((child_a, child_b))
}

/// Keeps `base` genes whose job satisfies `keep` and fills the gaps with the
/// `donor` genes that do not, in donor order.
fn merge(base: &Chromosome, donor: &Chromosome, keep: impl Fn(usize) -> bool) -> Result<Chromosome> {
    let len = base.len();
    let mut job_tags = Vec::with_capacity(len);
    let mut machines = Vec::with_capacity(len);

    let mut donor_genes = donor
        .job_tags()
        .iter()
        .zip(donor.machines())
        .filter(|&(&job, _)| !keep(job));

    for (position, (&job, &machine)) in base.job_tags().iter().zip(base.machines()).enumerate() {
        if keep(job) {
            job_tags.push(job);
            machines.push(machine);
            continue;
        }
        let (&donor_job, &donor_machine) = donor_genes.next().ok_or_else(|| {
            SchedulingError::InvariantViolation(format!(
                "no donor gene left for position {} (job {})",
                position, job
            ))
        })?;
        job_tags.push(donor_job);
        machines.push(donor_machine);
    }

    Chromosome::from_genes(job_tags, machines)
}

/// A shuffled mask over `len` positions with exactly `len / 2` of them set.
pub fn half_mask(len: usize, rng: &mut RandomNumberGenerator) -> Vec<bool> {
    let mut mask: Vec<bool> = (0..len).map(|i| i < len / 2).collect();
    rng.shuffle(&mut mask);
    mask
}

/// Machine-reassignment crossover.
///
/// For every marked position `g` of parent A, finds the position `g'` of
/// parent B holding the same occurrence of the same job, and swaps the
/// machines at child A's `g` and child B's `g'`. Job sequences are unchanged.
///
/// # Errors
///
/// Returns `SchedulingError::InvariantViolation` if the mask or the parents
/// differ in length, or if parent B lacks the matching operation.
pub fn machine_reassignment_crossover(
    parent_a: &Chromosome,
    parent_b: &Chromosome,
    mask: &[bool],
) -> Result<(Chromosome, Chromosome)> {
    check_lengths(parent_a, parent_b)?;
    if mask.len() != parent_a.len() {
        return Err(SchedulingError::InvariantViolation(format!(
            "mask covers {} positions but chromosomes have {}",
            mask.len(),
            parent_a.len()
        )));
    }

    // positions[job][occurrence] = position of that operation in parent B.
    let mut positions: Vec<Vec<usize>> = Vec::new();
    for (position, &job) in parent_b.job_tags().iter().enumerate() {
        if positions.len() <= job {
            positions.resize(job + 1, Vec::new());
        }
        positions[job].push(position);
    }

    let mut child_a = parent_a.clone();
    let mut child_b = parent_b.clone();
    child_a.invalidate();
    child_b.invalidate();

    let occurrences = parent_a.operation_indices();
    for (position, (&job, &marked)) in parent_a.job_tags().iter().zip(mask).enumerate() {
        if !marked {
            continue;
        }
        let occurrence = occurrences[position];
        let other = positions
            .get(job)
            .and_then(|p| p.get(occurrence))
            .copied()
            .ok_or_else(|| {
                SchedulingError::InvariantViolation(format!(
                    "operation {} of job {} is missing from the second parent",
                    occurrence, job
                ))
            })?;
        child_a.swap_machine_with(position, &mut child_b, other);
    }

    trace!(swapped = mask.iter().filter(|&&m| m).count(), "machine reassignment crossover");
    Ok((child_a, child_b))
}

fn check_lengths(parent_a: &Chromosome, parent_b: &Chromosome) -> Result<()> {
    if parent_a.len() != parent_b.len() {
        return Err(SchedulingError::InvariantViolation(format!(
            "parents have {} and {} genes",
            parent_a.len(),
            parent_b.len()
        )));
    }
    Ok(())
}

/// The two crossover strategies, picked per mating event.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossover {
    JobPartition,
    MachineReassignment,
}

impl Crossover {
    /// Fair coin flip between the two strategies.
    pub fn random(rng: &mut RandomNumberGenerator) -> Self {
        if rng.gen_probability(0.5) {
            Crossover::MachineReassignment
        } else {
            Crossover::JobPartition
        }
    }

    /// Runs this strategy with freshly drawn randomness.
    pub fn apply(
        self,
        parent_a: &Chromosome,
        parent_b: &Chromosome,
        num_jobs: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<(Chromosome, Chromosome)> {
        match self {
            Crossover::JobPartition => {
                let partition = JobPartition::random(num_jobs, rng);
                job_partition_crossover(parent_a, parent_b, &partition)
            }
            Crossover::MachineReassignment => {
                let mask = half_mask(parent_a.len(), rng);
                machine_reassignment_crossover(parent_a, parent_b, &mask)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut tags: Vec<usize>) -> Vec<usize> {
        tags.sort_unstable();
        tags
    }

    #[test]
    fn test_partition_sizes() {
        let mut rng = RandomNumberGenerator::from_seed(42);
        for _ in 0..100 {
            let partition = JobPartition::random(9, &mut rng);
            assert!((3..=6).contains(&partition.first_group_size()));
            assert_eq!(partition.num_jobs(), 9);
        }
    }

    #[test]
    fn test_job_partition_crossover_known_case() {
        // Parent A: 0 1 0 2 1 2   Parent B: 2 2 1 0 1 0
        let a = Chromosome::from_genes(vec![0, 1, 0, 2, 1, 2], vec![10, 11, 12, 13, 14, 15])
            .unwrap();
        let b = Chromosome::from_genes(vec![2, 2, 1, 0, 1, 0], vec![20, 21, 22, 23, 24, 25])
            .unwrap();
        let partition = JobPartition::from_first_group(3, &[0]);

        let (child_a, child_b) = job_partition_crossover(&a, &b, &partition).unwrap();

        // Job 0 stays where A has it; jobs 1 and 2 come from B in B's order.
        assert_eq!(child_a.job_tags(), &[0, 2, 0, 2, 1, 1]);
        assert_eq!(child_a.machines(), &[10, 20, 12, 21, 22, 24]);
        // Jobs 1 and 2 stay where B has them; job 0 comes from A in A's order.
        assert_eq!(child_b.job_tags(), &[2, 2, 1, 0, 1, 0]);
        assert_eq!(child_b.machines(), &[20, 21, 22, 10, 24, 12]);
    }

    #[test]
    fn test_job_partition_crossover_preserves_counts() {
        let a = Chromosome::from_genes(vec![0, 0, 1, 2, 2, 2, 1], vec![0; 7]).unwrap();
        let b = Chromosome::from_genes(vec![2, 1, 2, 0, 1, 2, 0], vec![1; 7]).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(3);

        for _ in 0..50 {
            let partition = JobPartition::random(3, &mut rng);
            let (child_a, child_b) = job_partition_crossover(&a, &b, &partition).unwrap();
            assert_eq!(sorted(child_a.job_tags().to_vec()), sorted(a.job_tags().to_vec()));
            assert_eq!(sorted(child_b.job_tags().to_vec()), sorted(a.job_tags().to_vec()));
        }
    }

    #[test]
    fn test_job_partition_crossover_mismatched_parents() {
        // Child A needs two job-1 genes but B only has one.
        let a = Chromosome::from_genes(vec![0, 1, 1], vec![0; 3]).unwrap();
        let b = Chromosome::from_genes(vec![0, 0, 1], vec![0; 3]).unwrap();
        let partition = JobPartition::from_first_group(2, &[0]);

        assert!(matches!(
            job_partition_crossover(&a, &b, &partition),
            Err(SchedulingError::InvariantViolation(_))
        ));

        let short = Chromosome::from_genes(vec![0, 1], vec![0; 2]).unwrap();
        assert!(job_partition_crossover(&a, &short, &partition).is_err());
    }

    #[test]
    fn test_half_mask() {
        let mut rng = RandomNumberGenerator::from_seed(8);
        let mask = half_mask(7, &mut rng);
        assert_eq!(mask.len(), 7);
        assert_eq!(mask.iter().filter(|&&m| m).count(), 3);
    }

    #[test]
    fn test_machine_reassignment_swaps_matching_operations() {
        // Parent A: 0 1 0   Parent B: 1 0 0
        let a = Chromosome::from_genes(vec![0, 1, 0], vec![10, 11, 12]).unwrap();
        let b = Chromosome::from_genes(vec![1, 0, 0], vec![20, 21, 22]).unwrap();

        // Position 2 of A is job 0's second operation, position 2 of B.
        let (child_a, child_b) =
            machine_reassignment_crossover(&a, &b, &[false, true, true]).unwrap();

        assert_eq!(child_a.job_tags(), a.job_tags());
        assert_eq!(child_b.job_tags(), b.job_tags());
        assert_eq!(child_a.machines(), &[10, 20, 22]);
        assert_eq!(child_b.machines(), &[11, 21, 12]);
    }

    #[test]
    fn test_machine_reassignment_rejects_bad_mask() {
        let a = Chromosome::from_genes(vec![0, 1], vec![0, 0]).unwrap();
        assert!(machine_reassignment_crossover(&a, &a, &[true]).is_err());
    }

    #[test]
    fn test_machine_reassignment_missing_operation() {
        let a = Chromosome::from_genes(vec![0, 0], vec![0, 0]).unwrap();
        let b = Chromosome::from_genes(vec![0, 1], vec![0, 0]).unwrap();
        assert!(matches!(
            machine_reassignment_crossover(&a, &b, &[true, true]),
            Err(SchedulingError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_crossover_apply_yields_children_of_same_length() {
        let a = Chromosome::from_genes(vec![0, 1, 0, 2], vec![0, 1, 2, 0]).unwrap();
        let b = Chromosome::from_genes(vec![2, 0, 1, 0], vec![1, 1, 0, 2]).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(12);

        for strategy in [Crossover::JobPartition, Crossover::MachineReassignment] {
            let (child_a, child_b) = strategy.apply(&a, &b, 3, &mut rng).unwrap();
            assert_eq!(child_a.len(), 4);
            assert_eq!(child_b.len(), 4);
            assert!(!child_a.is_evaluated());
        }
    }
}
