use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use lsw_exact::{equilibrium_density_by_name, Histogram};
use serde_json::json;

use super::{print_json, write_json, SolverArgs};

#[derive(Args, Debug)]
pub struct BinsArgs {
    /// Headerless `bin_center, count` file.
    #[arg(long)]
    pub bins: PathBuf,
    /// Catalogued potential name.
    #[arg(long)]
    pub potential: String,
    /// Temperature of the run.
    #[arg(long)]
    pub kt: f64,
    /// The run sampled the shifted landscape; reweight before comparing.
    #[arg(long)]
    pub shifted: bool,
    /// Also write the per-bin residuals as JSON.
    #[arg(long)]
    pub out: Option<PathBuf>,
    #[command(flatten)]
    pub solver: SolverArgs,
}

pub fn run(args: &BinsArgs) -> Result<(), Box<dyn Error>> {
    let density = equilibrium_density_by_name(&args.potential, args.kt, &args.solver.config())?;
    let mut histogram = Histogram::load(&args.bins)?;
    if args.shifted {
        histogram = histogram.unshift(density.potential().shift, args.kt)?;
    }
    let comparison = histogram.compare_with_density(&density)?;
    if let Some(out) = &args.out {
        write_json(out, &serde_json::to_value(&comparison)?)?;
    }
    print_json(&json!({
        "potential": density.potential().name(),
        "kt": args.kt,
        "bins": comparison.residuals.len(),
        "bin_width": histogram.bin_width(),
        "max_abs_residual": comparison.max_abs_residual,
        "l1_distance": comparison.l1_distance,
    }))
}
