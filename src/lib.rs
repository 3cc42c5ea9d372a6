pub mod chromosome;
pub mod error;
pub mod evolution;
pub mod fitness;
pub mod instance;
pub mod operators;
pub mod ranking;
pub mod rng;
pub mod selection;

// Re-export commonly used types for convenience
pub use chromosome::{Chromosome, Objectives};
pub use error::{OptionExt, Result, ResultExt, SchedulingError};
pub use evolution::{
    EvolutionLauncher, EvolutionResult, GenerationSummary, GenerationalStrategy, NsgaOptions,
    PopulationStrategy, ReefOptions, ReefStrategy,
};
pub use fitness::Evaluator;
pub use instance::{Instance, InstanceSource};
pub use rng::RandomNumberGenerator;
