//! Free-energy difference between the half-lines left and right of the
//! origin.

use lsw_core::errors::{check_kt, LswError};
use lsw_core::{potential, Potential};

use crate::boltzmann::{boltzmann_mass, BoltzmannMass};
use crate::config::SolverConfig;

/// Position separating the left and right states.
pub const SPLIT_POINT: f64 = 0.0;

/// Boltzmann masses of the two half-lines at one temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfLineMasses {
    /// Temperature of both integrals.
    pub kt: f64,
    /// Mass on `(-∞, 0]`.
    pub left: BoltzmannMass,
    /// Mass on `[0, ∞)`.
    pub right: BoltzmannMass,
}

impl HalfLineMasses {
    /// `-kT · ln(P_left / P_right)`; positive when the left state is less
    /// probable.
    pub fn free_energy_diff(&self) -> f64 {
        -self.kt * (self.left.integral.ln() - self.right.integral.ln())
            + (self.left.reference - self.right.reference)
    }

    /// Equilibrium probability of finding the particle left of the split.
    pub fn left_probability(&self) -> f64 {
        let log_ratio = self.right.ln_mass(self.kt) - self.left.ln_mass(self.kt);
        1.0 / (1.0 + log_ratio.exp())
    }
}

/// Integrates the Boltzmann weight separately over both half-lines.
pub fn half_line_masses<P>(
    potential: &P,
    kt: f64,
    config: &SolverConfig,
) -> Result<HalfLineMasses, LswError>
where
    P: Potential + ?Sized,
{
    check_kt(kt)?;
    config.validate()?;
    let left = boltzmann_mass(potential, kt, f64::NEG_INFINITY, SPLIT_POINT, config)
        .map_err(|err| err.with_context("side", "left"))?;
    let right = boltzmann_mass(potential, kt, SPLIT_POINT, f64::INFINITY, config)
        .map_err(|err| err.with_context("side", "right"))?;
    Ok(HalfLineMasses { kt, left, right })
}

/// Exact free-energy difference `-kT · ln(P_left / P_right)` of `potential`.
///
/// A vanishing mass on either side fails with
/// [`LswError::DegenerateMassRatio`] instead of yielding an infinity.
pub fn free_energy_diff<P>(potential: &P, kt: f64, config: &SolverConfig) -> Result<f64, LswError>
where
    P: Potential + ?Sized,
{
    half_line_masses(potential, kt, config).map(|masses| masses.free_energy_diff())
}

/// Name-based variant of [`free_energy_diff`] over the catalogue.
pub fn free_energy_diff_by_name(name: &str, kt: f64, config: &SolverConfig) -> Result<f64, LswError> {
    let descriptor = potential(name)?;
    free_energy_diff(&descriptor, kt, config).map_err(|err| err.with_context("potential", name))
}
