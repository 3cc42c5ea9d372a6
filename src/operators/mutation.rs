//! Machine-reassignment mutation and feasibility repair.

use tracing::trace;

use crate::chromosome::Chromosome;
use crate::error::{Result, SchedulingError};
use crate::instance::Instance;
use crate::rng::RandomNumberGenerator;

/// How [`mutate`] picks the new machine.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MutationMode {
    /// Any feasible machine other than the current one, when the operation
    /// has more than one feasible machine.
    #[default]
    Distinct,
    /// Any feasible machine, possibly the current one.
    AnyFeasible,
}

/// Redraws the machine of one uniformly chosen gene from the feasible
/// machines of its operation. Returns the mutated position, `None` for an
/// empty chromosome.
///
/// # Errors
///
/// Returns `SchedulingError::InvariantViolation` if the chosen gene addresses
/// an operation the instance does not have.
pub fn mutate(
    chromosome: &mut Chromosome,
    instance: &Instance,
    mode: MutationMode,
    rng: &mut RandomNumberGenerator,
) -> Result<Option<usize>> {
    if chromosome.is_empty() {
        return Ok(None);
    }

    let position = rng.gen_index(chromosome.len());
    let current = chromosome.machines()[position];
    let mut feasible = feasible_at(chromosome, instance, position)?;

    if mode == MutationMode::Distinct && feasible.len() > 1 {
        feasible.retain(|&machine| machine != current);
    }

    if let Some(&machine) = rng.choose(&feasible) {
        trace!(position, from = current, to = machine, "mutated machine");
        chromosome.set_machine(position, machine);
    }
    Ok(Some(position))
}

/// Redraws every gene whose machine cannot execute its operation. Returns the
/// number of repaired genes.
pub fn repair(
    chromosome: &mut Chromosome,
    instance: &Instance,
    rng: &mut RandomNumberGenerator,
) -> Result<usize> {
    let mut repaired = 0;
    for position in 0..chromosome.len() {
        let machine = chromosome.machines()[position];
        let feasible = feasible_at(chromosome, instance, position)?;
        if feasible.contains(&machine) {
            continue;
        }
        if let Some(&replacement) = rng.choose(&feasible) {
            chromosome.set_machine(position, replacement);
            repaired += 1;
        }
    }
    if repaired > 0 {
        trace!(repaired, "repaired infeasible machines");
    }
    Ok(repaired)
}

fn feasible_at(chromosome: &Chromosome, instance: &Instance, position: usize) -> Result<Vec<usize>> {
    let job = chromosome.job_tags()[position];
    let operation = chromosome.operation_index_at(position).unwrap_or(0);
    let feasible = instance.feasible_machines(job, operation);
    if feasible.is_empty() {
        return Err(SchedulingError::InvariantViolation(format!(
            "gene {} references operation {} of job {} which has no feasible machine",
            position, operation, job
        )));
    }
    Ok(feasible)
}
