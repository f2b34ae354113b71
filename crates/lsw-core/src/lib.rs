#![deny(missing_docs)]
#![doc = "Core error taxonomy and potential catalogue for the lattice-switch reference solver."]

pub mod errors;
pub mod potential;

pub use errors::{check_kt, ErrorInfo, LswError};
pub use potential::{potential, Potential, PotentialDescriptor, PotentialKind, ShiftedPotential};
