pub mod bins;
pub mod compare;
pub mod density;
pub mod diff;
pub mod sweep;

use std::error::Error;
use std::fs;
use std::path::Path;

use lsw_exact::serde::to_canonical_json_bytes;
use lsw_exact::SolverConfig;
use serde_json::Value;

/// Quadrature flags shared by every subcommand that integrates.
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct SolverArgs {
    /// Absolute error target per integral.
    #[arg(long, default_value_t = 1e-7)]
    pub abs_tolerance: f64,
    /// Relative error target per integral.
    #[arg(long, default_value_t = 1e-7)]
    pub rel_tolerance: f64,
    /// Subinterval budget per integral.
    #[arg(long, default_value_t = 500)]
    pub max_subdivisions: usize,
}

impl SolverArgs {
    pub fn config(&self) -> SolverConfig {
        SolverConfig {
            abs_tolerance: self.abs_tolerance,
            rel_tolerance: self.rel_tolerance,
            max_subdivisions: self.max_subdivisions,
        }
    }
}

pub(crate) fn write_json(path: &Path, value: &Value) -> Result<(), Box<dyn Error>> {
    let bytes = to_canonical_json_bytes(value)?;
    fs::write(path, bytes)?;
    Ok(())
}

pub(crate) fn print_json(value: &Value) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
