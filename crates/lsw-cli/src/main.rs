use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    bins::{self, BinsArgs},
    compare::{self, CompareArgs},
    density::{self, DensityArgs},
    diff::{self, DiffArgs},
    sweep::{self, SweepArgs},
};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "lsw", about = "Exact reference values for lattice-switch double-well benchmarks")]
struct Cli {
    /// Log quadrature diagnostics; `RUST_LOG` takes precedence when set.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tabulate the exact free-energy difference over a temperature range.
    Sweep(SweepArgs),
    /// Print the exact free-energy difference at one temperature.
    Diff(DiffArgs),
    /// Sample the normalised equilibrium density on a grid.
    Density(DensityArgs),
    /// Compare combined simulation results against exact values.
    Compare(CompareArgs),
    /// Check a position histogram against the exact density.
    Bins(BinsArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Sweep(args) => sweep::run(&args),
        Command::Diff(args) => diff::run(&args),
        Command::Density(args) => density::run(&args),
        Command::Compare(args) => compare::run(&args),
        Command::Bins(args) => bins::run(&args),
    }
}
