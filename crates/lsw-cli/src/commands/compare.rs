use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use lsw_exact::{compare_records, load_simulation_records, write_comparison};
use tracing::{info, warn};

use super::SolverArgs;

/// Deviations beyond this many standard errors are flagged.
const Z_WARN: f64 = 3.0;

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Combined simulation CSV.
    #[arg(long)]
    pub results: PathBuf,
    /// Destination of the comparison CSV.
    #[arg(long)]
    pub out: PathBuf,
    #[command(flatten)]
    pub solver: SolverArgs,
}

pub fn run(args: &CompareArgs) -> Result<(), Box<dyn Error>> {
    let records = load_simulation_records(&args.results)?;
    let rows = compare_records(&records, &args.solver.config())?;
    for row in rows.iter().filter(|row| row.z_score.is_some_and(|z| z.abs() > Z_WARN)) {
        warn!(
            potential = %row.potential,
            kt = row.kt,
            timestep = row.timestep,
            deviation = row.deviation,
            "simulation deviates from the exact value"
        );
    }
    write_comparison(&args.out, &rows)?;
    info!(rows = rows.len(), out = %args.out.display(), "comparison written");
    Ok(())
}
