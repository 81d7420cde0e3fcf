//! Charts for the CSV reports written by the garbled-circuit simulator:
//! live wires over gates (`plot_memory_sim`) and the bucketed wire usage
//! histogram (`plot_usage_distribution`).

use std::process::ExitCode;

use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

pub mod axis;
pub mod config;
pub mod draw;
pub mod error;
pub mod format;
pub mod memory;
pub mod table;
pub mod usage;

pub use config::{ChartStyle, Config};
pub use error::PlotError;

/// The two command-line tools built from this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Program {
    MemorySimulation,
    UsageDistribution,
}

impl Program {
    pub fn name(self) -> &'static str {
        match self {
            Program::MemorySimulation => "plot_memory_sim",
            Program::UsageDistribution => "plot_usage_distribution",
        }
    }

    pub fn about(self) -> &'static str {
        match self {
            Program::MemorySimulation => "Plot memory simulation results from CSV file",
            Program::UsageDistribution => "Plot wire usage count distribution from CSV file",
        }
    }

    pub fn examples(self) -> &'static str {
        match self {
            Program::MemorySimulation => {
                "Examples:
    plot_memory_sim circuit.memory_sim.csv
    plot_memory_sim data.csv --output memory_plot.png
    plot_memory_sim data.csv --output memory_plot.pdf"
            }
            Program::UsageDistribution => {
                "Examples:
    plot_usage_distribution psm3_usage_distribution.csv
    plot_usage_distribution usage_dist.csv --output usage_plot.png
    plot_usage_distribution usage_dist.csv --output usage_plot.pdf"
            }
        }
    }

    fn success_message(self) -> &'static str {
        match self {
            Program::MemorySimulation => "✓ Memory simulation plot completed successfully!",
            Program::UsageDistribution => "✓ Wire usage distribution plot completed successfully!",
        }
    }

    /// Validates the configuration, then loads, aggregates and renders.
    pub fn run(self, config: &Config) -> Result<(), PlotError> {
        config.validate()?;
        let style = config.load_style()?;
        match self {
            Program::MemorySimulation => memory::run(config, &style),
            Program::UsageDistribution => usage::run(config, &style),
        }
    }
}

/// Installs the global tracing subscriber; diagnostics go to stderr.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: could not install logger: {err}");
    }
}

/// Entry point shared by both binaries. Any failure is printed and mapped to exit status 1.
pub fn run_program(program: Program) -> ExitCode {
    let config = Config::parse_for(program);
    init_tracing(config.verbose);
    debug!("{} invoked with {:?}", program.name(), config);

    match program.run(&config) {
        Ok(()) => {
            println!("{}", program.success_message());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(1)
        }
    }
}
