#![deny(missing_docs)]
//! Exact reference quantities for one-dimensional double-well potentials:
//! equilibrium densities, half-line free-energy differences, temperature
//! sweeps and their comparison with lattice-switch simulations.

pub mod boltzmann;
pub mod compare;
pub mod config;
pub mod equilibrium;
pub mod free_energy;
mod hash;
pub mod histogram;
pub mod serde;
pub mod sweep;
pub mod table;

pub use boltzmann::{boltzmann_mass, BoltzmannMass};
pub use compare::{
    compare_records, load_simulation_records, read_simulation_records, write_comparison,
    ComparisonRow, SimulationRecord,
};
pub use config::{load_plan, MAX_RANGE_POINTS, SolverConfig, SweepPlan, TemperatureRange, TemperatureSpec};
pub use equilibrium::{equilibrium_density, equilibrium_density_by_name, EquilibriumDensity};
pub use free_energy::{
    free_energy_diff, free_energy_diff_by_name, half_line_masses, HalfLineMasses, SPLIT_POINT,
};
pub use hash::stable_hash_string;
pub use histogram::{BinResidual, Histogram, HistogramBin, HistogramComparison};
pub use sweep::{run_plan, sweep, sweep_parallel, Sweep, SweepPoint, SweepReport};
pub use table::{
    exact_table_file_name, format_scalar, read_exact_table, write_density_table,
    write_exact_table, EXACT_TABLE_HEADER,
};
