//! Temperature sweeps of the free-energy difference and their plans.

use std::path::PathBuf;

use lsw_core::errors::{ErrorInfo, LswError};
use lsw_core::{potential, PotentialDescriptor};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{SolverConfig, SweepPlan};
use crate::free_energy::free_energy_diff;
use crate::hash::stable_hash_string;
use crate::table::{exact_table_file_name, write_exact_table};

/// One row of an exact table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Temperature.
    pub kt: f64,
    /// Exact free-energy difference at `kt`.
    pub energy_diff: f64,
}

/// Lazy, ordered evaluation of the free-energy difference over temperatures.
///
/// Yields one result per input temperature, in input order. A failed point
/// does not stop the iterator; writers collect into `Result<Vec<_>, _>` so
/// the first failure aborts the whole table.
#[derive(Debug, Clone)]
pub struct Sweep<I> {
    descriptor: PotentialDescriptor,
    temperatures: I,
    config: SolverConfig,
}

impl<I> Sweep<I> {
    /// Catalogue entry being swept.
    pub fn descriptor(&self) -> &PotentialDescriptor {
        &self.descriptor
    }
}

impl<I: Iterator<Item = f64>> Iterator for Sweep<I> {
    type Item = Result<SweepPoint, LswError>;

    fn next(&mut self) -> Option<Self::Item> {
        let kt = self.temperatures.next()?;
        Some(evaluate_point(&self.descriptor, kt, &self.config))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.temperatures.size_hint()
    }
}

fn evaluate_point(
    descriptor: &PotentialDescriptor,
    kt: f64,
    config: &SolverConfig,
) -> Result<SweepPoint, LswError> {
    free_energy_diff(descriptor, kt, config)
        .map(|energy_diff| SweepPoint { kt, energy_diff })
        .map_err(|err| {
            err.with_context("potential", descriptor.name())
                .with_context("kt", kt.to_string())
        })
}

/// Starts a sweep of the named potential over `temperatures`.
///
/// The name is resolved eagerly, so an unknown potential fails here rather
/// than on the first item.
pub fn sweep<T>(
    name: &str,
    temperatures: T,
    config: &SolverConfig,
) -> Result<Sweep<T::IntoIter>, LswError>
where
    T: IntoIterator<Item = f64>,
{
    let descriptor = potential(name)?;
    config.validate()?;
    Ok(Sweep {
        descriptor,
        temperatures: temperatures.into_iter(),
        config: *config,
    })
}

/// Evaluates every temperature on a dedicated pool of `threads` workers.
///
/// The result is in input order; the first failing temperature fails the
/// whole call.
pub fn sweep_parallel(
    name: &str,
    temperatures: &[f64],
    config: &SolverConfig,
    threads: usize,
) -> Result<Vec<SweepPoint>, LswError> {
    let descriptor = potential(name)?;
    config.validate()?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
        .map_err(|err| LswError::InvalidInput(ErrorInfo::new("thread_pool", err.to_string())))?;

    let results: Result<Vec<(usize, SweepPoint)>, LswError> = pool.install(|| {
        temperatures
            .par_iter()
            .enumerate()
            .map(|(index, &kt)| evaluate_point(&descriptor, kt, config).map(|point| (index, point)))
            .collect()
    });

    let mut ordered = results?;
    ordered.sort_by_key(|(index, _)| *index);
    Ok(ordered.into_iter().map(|(_, point)| point).collect())
}

/// Summary persisted next to an exact table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    /// SHA-256 of the canonical plan JSON.
    pub plan_hash: String,
    /// Catalogue name of the swept potential.
    pub potential: String,
    /// Number of data rows written.
    pub rows: usize,
    /// Path of the exact table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Quadrature settings used.
    pub solver: SolverConfig,
}

/// Evaluates a plan and writes its exact table.
///
/// The table goes to `plan.output`, or `<NAME>_exact.csv` under `out_dir`
/// when the plan names none.
pub fn run_plan(
    plan: &SweepPlan,
    out_dir: Option<&std::path::Path>,
) -> Result<(Vec<SweepPoint>, SweepReport), LswError> {
    plan.validate()?;
    let plan_hash = stable_hash_string(plan)?;
    let temperatures = plan.temperatures.values()?;
    let name = plan.potential.name();
    info!(potential = name, points = temperatures.len(), threads = plan.parallelism, "sweep started");

    let points = if plan.parallelism > 1 {
        sweep_parallel(name, &temperatures, &plan.solver, plan.parallelism)?
    } else {
        sweep(name, temperatures, &plan.solver)?.collect::<Result<Vec<_>, _>>()?
    };

    let output = plan.output.clone().unwrap_or_else(|| {
        let file = PathBuf::from(exact_table_file_name(plan.potential));
        match out_dir {
            Some(dir) => dir.join(file),
            None => file,
        }
    });
    let rows = write_exact_table(&output, points.iter().copied().map(Ok))?;
    info!(potential = name, rows, output = %output.display(), "sweep written");

    let report = SweepReport {
        plan_hash,
        potential: name.to_string(),
        rows,
        output: Some(output.display().to_string()),
        solver: plan.solver,
    };
    Ok((points, report))
}
