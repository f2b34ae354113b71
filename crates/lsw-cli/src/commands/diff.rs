use std::error::Error;

use clap::Args;
use lsw_exact::{half_line_masses, SolverConfig};
use serde_json::json;

use super::{print_json, SolverArgs};

#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Catalogued potential name.
    #[arg(long)]
    pub potential: String,
    /// Temperature in energy units.
    #[arg(long)]
    pub kt: f64,
    #[command(flatten)]
    pub solver: SolverArgs,
}

pub fn run(args: &DiffArgs) -> Result<(), Box<dyn Error>> {
    let descriptor = lsw_core::potential(&args.potential)?;
    let config: SolverConfig = args.solver.config();
    let masses = half_line_masses(&descriptor, args.kt, &config)?;
    print_json(&json!({
        "potential": descriptor.name(),
        "kt": args.kt,
        "energy_diff": masses.free_energy_diff(),
        "left_probability": masses.left_probability(),
        "shift": descriptor.shift,
        "quadrature": {
            "left": masses.left.quadrature,
            "right": masses.right.quadrature,
        },
    }))
}
