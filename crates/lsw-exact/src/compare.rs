//! Comparison of combined lattice-switch results against exact values.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};
use lsw_core::errors::{ErrorInfo, LswError};
use lsw_core::{PotentialDescriptor, PotentialKind};
use serde::{Deserialize, Serialize};

use crate::config::SolverConfig;
use crate::free_energy::free_energy_diff;

/// One row of the combined simulation CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    /// Catalogue name as written by the simulation.
    #[serde(rename = "Potential Name")]
    pub potential: String,
    /// Integrator label, carried through unchanged.
    #[serde(rename = "Dynamics Type")]
    pub dynamics_type: String,
    /// Number of integration steps.
    #[serde(rename = "No of steps")]
    pub steps: u64,
    /// Integration timestep.
    #[serde(rename = "Timestep")]
    pub timestep: f64,
    /// Temperature of the run.
    #[serde(rename = "kT")]
    pub kt: f64,
    /// Simulated free-energy difference.
    #[serde(rename = "Free energy diff")]
    pub free_energy_diff: f64,
    /// Standard error of the simulated value.
    #[serde(rename = "Std error")]
    pub std_error: f64,
}

/// A simulated estimate next to its exact value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// Catalogued potential of the run.
    pub potential: PotentialKind,
    /// Integrator label of the run.
    pub dynamics_type: String,
    /// Number of integration steps.
    pub steps: u64,
    /// Integration timestep.
    pub timestep: f64,
    /// Temperature of the run.
    pub kt: f64,
    /// Simulated free-energy difference.
    pub simulated: f64,
    /// Standard error of the simulated value.
    pub std_error: f64,
    /// Exact free-energy difference at `kt`.
    pub exact: f64,
    /// `simulated - exact`.
    pub deviation: f64,
    /// Deviation in units of the standard error; `None` without a positive error.
    pub z_score: Option<f64>,
}

fn read_error(err: impl ToString) -> LswError {
    LswError::Serde(ErrorInfo::new("results_read", err.to_string()))
}

/// Parses combined results from any reader. Fields may be padded with spaces.
pub fn read_simulation_records<R: Read>(reader: R) -> Result<Vec<SimulationRecord>, LswError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);
    rdr.deserialize::<SimulationRecord>()
        .enumerate()
        .map(|(idx, record)| {
            record.map_err(|err| read_error(err).with_context("row", (idx + 1).to_string()))
        })
        .collect()
}

/// Loads the combined results file.
pub fn load_simulation_records(path: &Path) -> Result<Vec<SimulationRecord>, LswError> {
    let file = File::open(path).map_err(|err| {
        LswError::Io(
            ErrorInfo::new("results_open", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    read_simulation_records(file).map_err(|err| err.with_context("path", path.display().to_string()))
}

/// Pairs every record with the exact free-energy difference at its kT.
///
/// Each distinct `(potential, kT)` is integrated once. Rows come back sorted
/// by potential, kT and timestep.
pub fn compare_records(
    records: &[SimulationRecord],
    config: &SolverConfig,
) -> Result<Vec<ComparisonRow>, LswError> {
    let mut exact_cache: BTreeMap<(PotentialKind, u64), f64> = BTreeMap::new();
    let mut rows = Vec::with_capacity(records.len());

    for record in records {
        let kind = PotentialKind::from_name(&record.potential)?;
        let key = (kind, record.kt.to_bits());
        let exact = match exact_cache.get(&key) {
            Some(value) => *value,
            None => {
                let value = free_energy_diff(&PotentialDescriptor::of(kind), record.kt, config)
                    .map_err(|err| {
                        err.with_context("potential", kind.name())
                            .with_context("kt", record.kt.to_string())
                    })?;
                exact_cache.insert(key, value);
                value
            }
        };
        let deviation = record.free_energy_diff - exact;
        let z_score = (record.std_error > 0.0).then(|| deviation / record.std_error);
        rows.push(ComparisonRow {
            potential: kind,
            dynamics_type: record.dynamics_type.clone(),
            steps: record.steps,
            timestep: record.timestep,
            kt: record.kt,
            simulated: record.free_energy_diff,
            std_error: record.std_error,
            exact,
            deviation,
            z_score,
        });
    }

    rows.sort_by(|a, b| {
        a.potential
            .cmp(&b.potential)
            .then(a.kt.total_cmp(&b.kt))
            .then(a.timestep.total_cmp(&b.timestep))
    });
    Ok(rows)
}

/// Writes comparison rows as CSV with a header.
pub fn write_comparison(path: &Path, rows: &[ComparisonRow]) -> Result<(), LswError> {
    let write_error = |err: csv::Error| {
        LswError::Serde(
            ErrorInfo::new("comparison_write", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    };
    let mut wtr = WriterBuilder::new().from_path(path).map_err(write_error)?;
    for row in rows {
        wtr.serialize(row).map_err(write_error)?;
    }
    wtr.flush().map_err(|err| {
        LswError::Io(
            ErrorInfo::new("comparison_write", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })
}
