//! Normalised equilibrium densities.

use lsw_core::errors::{check_kt, ErrorInfo, LswError};
use lsw_core::{potential, Potential, PotentialDescriptor};
use lsw_quad::QuadEstimate;

use crate::boltzmann::boltzmann_mass;
use crate::config::SolverConfig;

/// Normalised equilibrium density `exp(-U(x)/kT) / Z` of one potential at
/// one temperature.
///
/// Holds the normalisation computed when it was built; build a new one for
/// every `(potential, kT)` pair.
#[derive(Debug, Clone)]
pub struct EquilibriumDensity<P> {
    potential: P,
    kt: f64,
    reference: f64,
    integral: f64,
    quadrature: QuadEstimate,
}

impl<P: Potential> EquilibriumDensity<P> {
    /// Probability density at `x`.
    pub fn density(&self, x: f64) -> f64 {
        (-(self.potential.energy(x) - self.reference) / self.kt).exp() / self.integral
    }

    /// Borrowing closure over [`Self::density`].
    pub fn as_fn(&self) -> impl Fn(f64) -> f64 + '_ {
        move |x| self.density(x)
    }

    /// `ln Z`, finite even where `Z` itself would overflow.
    pub fn ln_partition_function(&self) -> f64 {
        self.integral.ln() - self.reference / self.kt
    }

    /// The partition function `Z = ∫ exp(-U/kT) dx`; may be infinite for
    /// deep wells at very small kT, use [`Self::ln_partition_function`] there.
    pub fn partition_function(&self) -> f64 {
        self.ln_partition_function().exp()
    }

    /// Temperature the density was built for.
    pub fn kt(&self) -> f64 {
        self.kt
    }

    /// The underlying potential.
    pub fn potential(&self) -> &P {
        &self.potential
    }

    /// Diagnostics of the normalising integral.
    pub fn quadrature(&self) -> &QuadEstimate {
        &self.quadrature
    }

    /// Samples the density on `points` evenly spaced positions in `[from, to]`.
    pub fn sample(&self, from: f64, to: f64, points: usize) -> Result<Vec<(f64, f64)>, LswError> {
        if !(from.is_finite() && to.is_finite() && from < to && points >= 2) {
            return Err(LswError::InvalidInput(
                ErrorInfo::new("density-grid", "grid needs finite from < to and at least two points")
                    .with_context("from", from.to_string())
                    .with_context("to", to.to_string())
                    .with_context("points", points.to_string()),
            ));
        }
        let step = (to - from) / (points - 1) as f64;
        Ok((0..points)
            .map(|i| {
                let x = from + i as f64 * step;
                (x, self.density(x))
            })
            .collect())
    }
}

/// Computes the equilibrium density of `potential` at temperature `kt`.
///
/// Fails with [`LswError::IntegrationFailed`] when the normalisation does not
/// converge and with [`LswError::InvalidInput`] for a non-positive `kt`.
pub fn equilibrium_density<P: Potential>(
    potential: P,
    kt: f64,
    config: &SolverConfig,
) -> Result<EquilibriumDensity<P>, LswError> {
    check_kt(kt)?;
    config.validate()?;
    let mass = boltzmann_mass(&potential, kt, f64::NEG_INFINITY, f64::INFINITY, config)?;
    Ok(EquilibriumDensity {
        potential,
        kt,
        reference: mass.reference,
        integral: mass.integral,
        quadrature: mass.quadrature,
    })
}

/// Name-based variant of [`equilibrium_density`] over the catalogue.
pub fn equilibrium_density_by_name(
    name: &str,
    kt: f64,
    config: &SolverConfig,
) -> Result<EquilibriumDensity<PotentialDescriptor>, LswError> {
    let descriptor = potential(name)?;
    equilibrium_density(descriptor, kt, config)
        .map_err(|err| err.with_context("potential", descriptor.name()))
}
