//! Unnormalised Boltzmann masses `∫ exp(-U(x)/kT) dx` over an interval.
//!
//! The weight is integrated relative to a reference energy, the lowest
//! energy found at the potential's feature points inside the interval, so
//! the integrand peaks near one whatever the temperature. When the weight
//! overflows anyway (a well the potential does not declare), the reference
//! drops to the lowest energy the quadrature visited and the integral is
//! redone. A mass is carried as `(integral, reference)` with
//! `ln mass = ln integral - reference / kT`.

use std::cell::Cell;

use lsw_core::errors::{ErrorInfo, LswError};
use lsw_core::Potential;
use lsw_quad::{integrate, QuadEstimate};
use tracing::debug;

use crate::config::SolverConfig;

/// Re-anchoring passes allowed after an overflowing integral.
const MAX_REANCHORS: usize = 8;

/// Boltzmann mass of one interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoltzmannMass {
    /// `∫ exp(-(U - reference)/kT)` over the interval.
    pub integral: f64,
    /// Energy subtracted from `U` inside the exponent.
    pub reference: f64,
    /// Quadrature diagnostics.
    pub quadrature: QuadEstimate,
}

impl BoltzmannMass {
    /// Logarithm of the unshifted mass.
    pub fn ln_mass(&self, kt: f64) -> f64 {
        self.integral.ln() - self.reference / kt
    }
}

/// Lowest finite energy among the feature points, the origin and the finite
/// bounds that lie inside `[lower, upper]`; zero when none is finite.
pub(crate) fn reference_energy<P>(potential: &P, lower: f64, upper: f64, points: &[f64]) -> f64
where
    P: Potential + ?Sized,
{
    points
        .iter()
        .copied()
        .chain([0.0, lower, upper])
        .filter(|x| x.is_finite() && *x >= lower && *x <= upper)
        .map(|x| potential.energy(x))
        .filter(|u| u.is_finite())
        .fold(None, |best: Option<f64>, u| Some(best.map_or(u, |b| b.min(u))))
        .unwrap_or(0.0)
}

/// Integrates the Boltzmann weight of `potential` over `[lower, upper]`.
///
/// A zero or non-finite integral is reported as
/// [`LswError::DegenerateMassRatio`]; quadrature failures carry `kt` in
/// their context.
pub fn boltzmann_mass<P>(
    potential: &P,
    kt: f64,
    lower: f64,
    upper: f64,
    config: &SolverConfig,
) -> Result<BoltzmannMass, LswError>
where
    P: Potential + ?Sized,
{
    let points = potential.feature_points();
    let mut reference = reference_energy(potential, lower, upper, &points);
    let mut reanchors = 0;
    let quadrature = loop {
        let lowest = Cell::new(f64::INFINITY);
        let anchor = reference;
        let weight = |x: f64| {
            let u = potential.energy(x);
            if u.is_finite() && u < lowest.get() {
                lowest.set(u);
            }
            (-(u - anchor) / kt).exp()
        };
        match integrate(&weight, lower, upper, &points, &config.tolerance()) {
            Ok(quadrature) => break quadrature,
            Err(err)
                if err.info().code == "quad-non-finite"
                    && lowest.get() < reference
                    && reanchors < MAX_REANCHORS =>
            {
                debug!(kt, lower, upper, from = reference, to = lowest.get(), "re-anchoring weight");
                reference = lowest.get();
                reanchors += 1;
            }
            Err(err) => return Err(err.with_context("kt", kt.to_string())),
        }
    };

    if !(quadrature.value.is_finite() && quadrature.value > 0.0) {
        return Err(LswError::DegenerateMassRatio(
            ErrorInfo::new("zero-mass", "Boltzmann mass is zero or non-finite")
                .with_context("kt", kt.to_string())
                .with_context("lower", lower.to_string())
                .with_context("upper", upper.to_string())
                .with_context("integral", quadrature.value.to_string()),
        ));
    }

    debug!(
        kt,
        lower,
        upper,
        reference,
        integral = quadrature.value,
        intervals = quadrature.intervals,
        "boltzmann mass"
    );
    Ok(BoltzmannMass {
        integral: quadrature.value,
        reference,
        quadrature,
    })
}
