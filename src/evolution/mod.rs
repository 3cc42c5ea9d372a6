pub mod generational;
pub mod launcher;
pub mod options;
pub mod reef;
pub mod strategy;
pub mod summary;

pub use generational::GenerationalStrategy;
pub use launcher::{Evolution, EvolutionLauncher};
pub use options::{NsgaOptions, NsgaOptionsBuilder, ReefOptions, ReefOptionsBuilder, Schedule};
pub use reef::ReefStrategy;
pub use strategy::{GenerationContext, PopulationStrategy};
pub use summary::{EvolutionResult, GenerationSummary};
