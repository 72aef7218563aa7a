//! qmeans - k-means clustering seeded from low-discrepancy sequences.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod load;

use commands::{PointsCommand, RunCommand};

/// qmeans - k-means clustering with quasi-random (Sobol/Halton) seeding.
///
/// Results are deterministic: the same input and settings always produce
/// the same clusters.
#[derive(Parser)]
#[command(name = "qmeans")]
#[command(about = "Deterministic k-means clustering with low-discrepancy seeding")]
#[command(version)]
pub struct Cli {
    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Output as JSON instead of YAML
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (debug logging to stderr)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Cluster a CSV/TSV/JSON dataset
    Run(RunCommand),
    /// Print points of a low-discrepancy sequence
    Points(PointsCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so reports on stdout stay machine-readable.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Run(cmd) => cmd.run(&cli),
        Commands::Points(cmd) => cmd.run(&cli),
    }
}
