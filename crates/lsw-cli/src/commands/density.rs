use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use lsw_exact::{equilibrium_density_by_name, write_density_table};
use tracing::info;

use super::SolverArgs;

#[derive(Args, Debug)]
pub struct DensityArgs {
    /// Catalogued potential name.
    #[arg(long)]
    pub potential: String,
    /// Temperature in energy units.
    #[arg(long)]
    pub kt: f64,
    /// Left end of the grid.
    #[arg(long, default_value_t = -4.0, allow_negative_numbers = true)]
    pub from: f64,
    /// Right end of the grid.
    #[arg(long, default_value_t = 4.0, allow_negative_numbers = true)]
    pub to: f64,
    /// Number of grid points, ends included.
    #[arg(long, default_value_t = 401)]
    pub points: usize,
    /// Destination of the `x, density` table.
    #[arg(long)]
    pub out: PathBuf,
    #[command(flatten)]
    pub solver: SolverArgs,
}

pub fn run(args: &DensityArgs) -> Result<(), Box<dyn Error>> {
    let density = equilibrium_density_by_name(&args.potential, args.kt, &args.solver.config())?;
    let samples = density.sample(args.from, args.to, args.points)?;
    let rows = write_density_table(&args.out, &samples)?;
    info!(
        potential = %args.potential,
        kt = args.kt,
        ln_z = density.ln_partition_function(),
        rows,
        "density written"
    );
    Ok(())
}
