use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use fjsp_evo::evolution::{
    EvolutionLauncher, EvolutionResult, GenerationalStrategy, NsgaOptions, ReefOptions,
    ReefStrategy,
};
use fjsp_evo::instance::{self, InstanceSource, DEFAULT_MAX_DURATION};
use fjsp_evo::rng::RandomNumberGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    /// Generational NSGA-II
    Nsga,
    /// Coral reef optimisation on a square grid
    Reef,
}

#[derive(Parser, Debug)]
#[command(name = "fjsp-evo")]
#[command(version)]
#[command(about = "Multi-objective evolutionary search for flexible job-shop schedules")]
struct Cli {
    /// Number of jobs of a generated instance
    jobs: usize,

    /// Number of machines of a generated instance
    machines: usize,

    /// Number of operations of a generated instance
    operations: usize,

    /// Population size (NSGA-II) or reef side length (reef)
    population: usize,

    /// Number of generations
    generations: usize,

    /// `0` generates an instance, `1` uses the built-in dataset, anything
    /// else is read as a dataset file
    sample: String,

    #[arg(short, long, value_enum, default_value = "nsga")]
    algorithm: Algorithm,

    /// Seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,
}

impl Cli {
    fn source(&self) -> InstanceSource {
        match self.sample.as_str() {
            "0" => InstanceSource::Generated {
                num_jobs: self.jobs,
                num_machines: self.machines,
                num_operations: self.operations,
                max_duration: DEFAULT_MAX_DURATION,
            },
            "1" => InstanceSource::BuiltIn,
            path => InstanceSource::File(PathBuf::from(path)),
        }
    }
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    enable_tracing();
    let cli = Cli::parse();

    let mut rng = match cli.seed {
        Some(seed) => RandomNumberGenerator::from_seed(seed),
        None => RandomNumberGenerator::new(),
    };

    let instance = instance::load(&cli.source(), &mut rng)?;
    println!("{}", instance.to_dataset_string());

    let result: EvolutionResult = match cli.algorithm {
        Algorithm::Nsga => {
            let options = NsgaOptions::new(cli.population, cli.generations);
            let strategy = GenerationalStrategy::new(&instance, options)?;
            EvolutionLauncher::new(strategy).evolve(&mut rng)?
        }
        Algorithm::Reef => {
            let options = ReefOptions::new(cli.population, cli.generations);
            let strategy = ReefStrategy::new(&instance, options)?;
            EvolutionLauncher::new(strategy).evolve(&mut rng)?
        }
    };

    print!("{}", report(&result, cli.algorithm));
    Ok(())
}

/// `initial_best;best` genes strings; the reef also reports its worst coral
/// on a line of its own.
fn report(result: &EvolutionResult, algorithm: Algorithm) -> String {
    let mut out = format!("{};{}\n", result.initial_best, result.best);
    if algorithm == Algorithm::Reef {
        out.push_str(&format!("{}\n", result.worst));
    }
    out
}
