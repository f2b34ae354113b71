#![deny(missing_docs)]
//! Numerical integration for the reference solver.
//!
//! - **Gauss-Kronrod**: the G7/K15 pair evaluated on a single interval.
//! - **Adaptive integration**: global bisection of the interval with the
//!   largest error estimate until the tolerance is met.
//! - **Improper integrals**: semi-infinite pieces are mapped onto `(0, 1]`
//!   with `x = a ± (1 - t) / t`.

pub mod adaptive;
pub mod gauss_kronrod;

pub use adaptive::{integrate, Tolerance};
pub use gauss_kronrod::{gk15, GkEstimate};

use serde::{Deserialize, Serialize};

/// Result of an adaptive integration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadEstimate {
    /// Integral estimate.
    pub value: f64,
    /// Accumulated absolute error estimate.
    pub error: f64,
    /// Number of integrand evaluations.
    pub evaluations: usize,
    /// Number of subintervals in the final partition.
    pub intervals: usize,
}
