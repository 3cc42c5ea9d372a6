//! # Error Types
//!
//! This module defines the error type shared by every part of the scheduler:
//! instance loading, the genetic operators, ranking and the run driver.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use fjsp_evo::error::{SchedulingError, Result};
//!
//! fn check_population(size: usize) -> Result<()> {
//!     if size == 0 {
//!         return Err(SchedulingError::EmptyPopulation);
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_population(0).is_err());
//! ```
//!
//! Using the `ResultExt` trait to add context to errors:
//!
//! ```rust
//! use fjsp_evo::error::{Result, ResultExt};
//!
//! fn parse_duration(token: &str) -> Result<u32> {
//!     token.trim().parse::<u32>().context(format!("invalid duration '{}'", token))
//! }
//!
//! assert_eq!(parse_duration(" 12").unwrap(), 12);
//! assert!(parse_duration("x").is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use fjsp_evo::error::{SchedulingError, OptionExt};
//!
//! fn first_makespan(makespans: &[u64]) -> fjsp_evo::error::Result<u64> {
//!     makespans.iter().min().copied().ok_or_else_scheduling(||
//!         SchedulingError::EmptyPopulation
//!     )
//! }
//!
//! assert!(first_makespan(&[]).is_err());
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Represents errors that can occur while loading an instance or searching it.
#[derive(Error, Debug)]
pub enum SchedulingError {
    /// The instance breaks a structural invariant (no jobs, an empty job,
    /// ragged duration rows, an operation no machine can execute).
    #[error("Invalid instance: {0}")]
    InvalidInstance(String),

    /// A dataset could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Ranking or reporting was requested for a chromosome whose objectives
    /// have not been computed since its genes last changed.
    #[error("Chromosome has not been evaluated")]
    Unevaluated,

    /// An internal consistency check failed, e.g. a crossover could not find
    /// the donor gene it needs. No partially built chromosome is returned.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Error that occurs when an I/O operation fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for scheduling operations.
pub type Result<T> = std::result::Result<T, SchedulingError>;

/// Extension trait for Result to add context to errors.
///
/// ## Examples
///
/// ```rust
/// use fjsp_evo::error::ResultExt;
/// use std::fs::File;
///
/// fn read_file(path: &str) -> fjsp_evo::error::Result<()> {
///     File::open(path).context("Failed to open file")?;
///     Ok(())
/// }
/// ```
pub trait ResultExt<T, E> {
    /// Adds context to an error, converting it into `SchedulingError::Other`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| SchedulingError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, SchedulingError>` using a closure
    /// to generate the error.
    fn ok_or_else_scheduling<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> SchedulingError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_scheduling<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> SchedulingError,
    {
        self.ok_or_else(err_fn)
    }
}
