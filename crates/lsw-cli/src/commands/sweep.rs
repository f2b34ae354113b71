use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use lsw_core::PotentialKind;
use lsw_exact::serde::to_canonical_json_bytes;
use lsw_exact::{load_plan, run_plan, SweepPlan, TemperatureRange, TemperatureSpec};
use tracing::info;

use super::SolverArgs;

#[derive(Args, Debug)]
pub struct SweepArgs {
    /// YAML sweep plan.
    #[arg(long, required_unless_present = "potential", conflicts_with = "potential")]
    pub plan: Option<PathBuf>,
    /// Catalogued potential (KT, QUARTIC, DIFF_WIDTH) when no plan is given.
    #[arg(long)]
    pub potential: Option<String>,
    /// First temperature of the range.
    #[arg(long, default_value_t = 0.1)]
    pub start: f64,
    /// Exclusive upper end of the range.
    #[arg(long, default_value_t = 1.1)]
    pub stop: f64,
    /// Spacing of the range.
    #[arg(long, default_value_t = 0.1)]
    pub step: f64,
    /// Exact table destination; defaults to `<NAME>_exact.csv`.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Optional JSON report with the plan hash and solver settings.
    #[arg(long)]
    pub report: Option<PathBuf>,
    /// Worker threads; overrides the plan.
    #[arg(long)]
    pub jobs: Option<usize>,
    #[command(flatten)]
    pub solver: SolverArgs,
}

fn build_plan(args: &SweepArgs) -> Result<SweepPlan, Box<dyn Error>> {
    let mut plan = match (&args.plan, &args.potential) {
        (Some(path), _) => load_plan(path)?,
        (None, Some(name)) => {
            let mut plan = SweepPlan::new(PotentialKind::from_name(name)?);
            plan.temperatures = TemperatureSpec::Range(TemperatureRange {
                start: args.start,
                stop: args.stop,
                step: args.step,
            });
            plan.solver = args.solver.config();
            plan
        }
        (None, None) => return Err("either --plan or --potential is required".into()),
    };
    if let Some(out) = &args.out {
        plan.output = Some(out.clone());
    }
    if let Some(jobs) = args.jobs {
        plan.parallelism = jobs;
    }
    Ok(plan)
}

pub fn run(args: &SweepArgs) -> Result<(), Box<dyn Error>> {
    let plan = build_plan(args)?;
    let (points, report) = run_plan(&plan, None)?;
    for point in &points {
        info!(kt = point.kt, energy_diff = point.energy_diff, "row");
    }
    if let Some(path) = &args.report {
        fs::write(path, to_canonical_json_bytes(&report)?)?;
    }
    println!(
        "{} rows for {} written to {}",
        report.rows,
        report.potential,
        report.output.as_deref().unwrap_or("-")
    );
    Ok(())
}
