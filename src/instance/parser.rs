//! # Dataset Parsing
//!
//! Two text formats are understood:
//!
//! - the semicolon-separated dataset format, `job,op:d1,d2,...,dM;...`
//!   terminated by a period (job and operation numbers are 1-based);
//! - the classic flexible job-shop benchmark format: a header line
//!   `numJobs numMachines maxOpsPerJob`, then one line per job with
//!   `numOperations` followed, per operation, by `machineCount (machine duration)*`.
//!   Machines not listed for an operation get [`INFEASIBLE_DURATION`].
//!
//! [`load`] turns an [`InstanceSource`] into an [`Instance`], falling back to
//! the built-in [`DEFAULT_DATASET`] when a file cannot be read or parsed.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{Instance, Job, Operation, INFEASIBLE_DURATION};
use crate::error::{Result, SchedulingError};
use crate::rng::RandomNumberGenerator;

/// Built-in 10-job, 10-machine dataset.
pub const DEFAULT_DATASET: &str = "1,1:12,5,18,10,16,23,18,12,21,13;1,2:15,12,5,16,7,18,21,17,16,9;1,3:17,4,12,11,9,14,11,10,25,10;2,1:19,14,5,17,16,13,10,15,14,6;2,2:18,14,24,11,16,19,20,9,22,7;2,3:13,16,10,15,18,16,17,5,15,16;2,4:8,7,12,6,5,10,22,8,8,17;3,1:16,13,18,6,14,7,20,12,19,5;3,2:11,10,9,16,11,8,5,12,10,5;4,1:21,17,21,16,20,5,18,8,19,17;4,2:5,24,12,20,17,18,20,22,21,14;4,3:6,7,5,5,7,6,16,9,17,10;5,1:23,14,12,5,15,11,13,14,5,16;5,2:15,5,22,12,16,8,13,18,8,13;5,3:12,10,11,14,15,25,16,13,15,15;6,1:5,15,6,17,20,16,14,10,5,19;6,2:14,13,12,5,15,7,11,14,17,13;7,1:18,21,15,12,9,24,7,5,20,7;7,2:17,14,15,17,19,20,15,12,16,15;7,3:8,10,9,8,7,12,14,7,8,9;7,4:15,20,18,23,5,16,10,16,6,21;7,5:12,25,16,8,15,9,18,17,20,5;7,6:10,8,7,7,7,8,9,17,6,8;8,1:17,20,8,23,19,19,11,15,16,5;8,2:5,18,15,20,16,22,19,17,13,14;8,3:24,7,26,24,25,24,9,18,10,20;8,4:5,22,16,18,13,7,19,8,20,21;9,1:5,7,7,11,8,11,10,23,8,18;9,2:24,25,7,22,12,18,5,20,17,21;9,3:15,9,13,13,14,10,12,11,16,10;10,1:20,21,18,11,19,18,17,8,22,19;10,2:15,14,8,15,10,16,13,15,16,12;10,3:11,15,8,12,10,13,23,8,9,9";

/// Where a run's instance comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceSource {
    /// A random instance drawn by [`Instance::generate`].
    Generated {
        num_jobs: usize,
        num_machines: usize,
        num_operations: usize,
        max_duration: u32,
    },
    /// The built-in [`DEFAULT_DATASET`].
    BuiltIn,
    /// A file in either supported format.
    File(PathBuf),
}

/// Builds the instance described by `source`.
///
/// Files that cannot be read or parsed fall back to the built-in dataset with
/// a warning; generation errors (bad sizes) are returned.
pub fn load(source: &InstanceSource, rng: &mut RandomNumberGenerator) -> Result<Instance> {
    match source {
        InstanceSource::Generated {
            num_jobs,
            num_machines,
            num_operations,
            max_duration,
        } => Instance::generate(*num_jobs, *num_machines, *num_operations, *max_duration, rng),
        InstanceSource::BuiltIn => parse_dataset(DEFAULT_DATASET),
        InstanceSource::File(path) => match read_file(path) {
            Ok(instance) => Ok(instance),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "falling back to the built-in dataset");
                parse_dataset(DEFAULT_DATASET)
            }
        },
    }
}

fn read_file(path: &Path) -> Result<Instance> {
    let content = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = content.len(), "read dataset file");
    parse(&content)
}

/// Parses either format, telling them apart by the `:` that only the
/// semicolon-separated format contains.
pub fn parse(content: &str) -> Result<Instance> {
    if content.contains(':') {
        parse_dataset(content)
    } else {
        parse_benchmark(content)
    }
}

/// Parses the semicolon-separated dataset format. Anything after the first
/// period is ignored. Records of one job must be contiguous and job numbers
/// must start at 1 and increase by one.
pub fn parse_dataset(content: &str) -> Result<Instance> {
    let body = content.split('.').next().unwrap_or_default();
    let mut jobs: Vec<Vec<Operation>> = Vec::new();

    for record in body.split(';').map(str::trim).filter(|r| !r.is_empty()) {
        let (label, durations) = record
            .split_once(':')
            .ok_or_else(|| SchedulingError::Parse(format!("record '{}' has no ':'", record)))?;

        let job_token = label.split(',').next().unwrap_or_default();
        let job_id = parse_number(job_token, record)?;

        if job_id == 0 || job_id < jobs.len() || job_id > jobs.len() + 1 {
            return Err(SchedulingError::Parse(format!(
                "record '{}' has job number {} out of sequence",
                record, job_id
            )));
        }
        if job_id == jobs.len() + 1 {
            jobs.push(Vec::new());
        }

        let durations = durations
            .split(',')
            .map(|token| parse_duration(token, record))
            .collect::<Result<Vec<u32>>>()?;
        jobs[job_id - 1].push(Operation::new(durations));
    }

    Instance::new(jobs.into_iter().map(Job::new).collect())
}

/// Parses the classic flexible job-shop benchmark format.
pub fn parse_benchmark(content: &str) -> Result<Instance> {
    let mut lines = content.lines().map(str::trim).filter(|l| !l.is_empty());

    let header = lines
        .next()
        .ok_or_else(|| SchedulingError::Parse("missing header line".to_string()))?;
    let header: Vec<usize> = header
        .split_whitespace()
        .map(|token| parse_number(token, header))
        .collect::<Result<_>>()?;
    let (num_jobs, num_machines) = match header.as_slice() {
        [jobs, machines, ..] => (*jobs, *machines),
        _ => {
            return Err(SchedulingError::Parse(
                "header must list the number of jobs and machines".to_string(),
            ))
        }
    };

    let mut jobs = Vec::with_capacity(num_jobs);
    for line in lines.take(num_jobs) {
        let mut tokens = line.split_whitespace();
        let mut next = || {
            tokens
                .next()
                .ok_or_else(|| SchedulingError::Parse(format!("line '{}' ends early", line)))
        };

        let num_operations = parse_number(next()?, line)?;
        let mut operations = Vec::with_capacity(num_operations);
        for _ in 0..num_operations {
            let mut durations = vec![INFEASIBLE_DURATION; num_machines];
            let alternatives = parse_number(next()?, line)?;
            for _ in 0..alternatives {
                let machine = parse_number(next()?, line)?;
                let duration = parse_duration(next()?, line)?;
                if machine == 0 || machine > num_machines {
                    return Err(SchedulingError::Parse(format!(
                        "line '{}' references machine {} of {}",
                        line, machine, num_machines
                    )));
                }
                durations[machine - 1] = duration;
            }
            operations.push(Operation::new(durations));
        }
        jobs.push(Job::new(operations));
    }

    if jobs.len() != num_jobs {
        return Err(SchedulingError::Parse(format!(
            "header announces {} jobs but {} were listed",
            num_jobs,
            jobs.len()
        )));
    }

    Instance::new(jobs)
}

fn parse_number(token: &str, context: &str) -> Result<usize> {
    token.trim().parse::<usize>().map_err(|e| {
        SchedulingError::Parse(format!("invalid number '{}' in '{}': {}", token.trim(), context, e))
    })
}

/// Durations must fit `u32`; larger values are rejected rather than wrapped.
fn parse_duration(token: &str, context: &str) -> Result<u32> {
    token.trim().parse::<u32>().map_err(|e| {
        SchedulingError::Parse(format!("invalid duration '{}' in '{}': {}", token.trim(), context, e))
    })
}
