//! Globally adaptive integration with infinite-interval support.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use lsw_core::errors::{ErrorInfo, LswError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::gauss_kronrod::{gk15, GkEstimate, GK15_EVALUATIONS};
use crate::QuadEstimate;

/// Convergence controls for [`integrate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Absolute error target.
    pub abs: f64,
    /// Relative error target.
    pub rel: f64,
    /// Maximum number of subintervals before giving up.
    pub max_subdivisions: usize,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            abs: 1e-7,
            rel: 1e-7,
            max_subdivisions: 500,
        }
    }
}

impl Tolerance {
    fn validate(&self) -> Result<(), LswError> {
        let usable = self.abs.is_finite()
            && self.rel.is_finite()
            && self.abs >= 0.0
            && self.rel >= 0.0
            && (self.abs > 0.0 || self.rel > 0.0)
            && self.max_subdivisions > 0;
        if usable {
            Ok(())
        } else {
            Err(LswError::InvalidInput(
                ErrorInfo::new("quad-tolerance", "tolerances must be non-negative and not both zero")
                    .with_context("abs", self.abs.to_string())
                    .with_context("rel", self.rel.to_string())
                    .with_context("max_subdivisions", self.max_subdivisions.to_string()),
            ))
        }
    }

    fn target(&self, value: f64) -> f64 {
        self.abs.max(self.rel * value.abs())
    }
}

/// How a piece's local coordinate maps onto the real line.
#[derive(Debug, Clone, Copy)]
enum Segment {
    /// Local coordinate is `x` itself.
    Finite,
    /// `[origin, ∞)` through `x = origin + (1 - t) / t`, `t ∈ (0, 1]`.
    Upper { origin: f64 },
    /// `(-∞, origin]` through `x = origin - (1 - t) / t`, `t ∈ (0, 1]`.
    Lower { origin: f64 },
}

impl Segment {
    fn eval<F>(&self, f: &F, u: f64) -> f64
    where
        F: Fn(f64) -> f64 + ?Sized,
    {
        match *self {
            Segment::Finite => f(u),
            Segment::Upper { origin } => tail_value(f, origin + (1.0 - u) / u, u),
            Segment::Lower { origin } => tail_value(f, origin - (1.0 - u) / u, u),
        }
    }
}

fn tail_value<F>(f: &F, x: f64, t: f64) -> f64
where
    F: Fn(f64) -> f64 + ?Sized,
{
    let fx = f(x);
    if fx == 0.0 {
        0.0
    } else {
        fx / (t * t)
    }
}

#[derive(Debug, Clone, Copy)]
struct Piece {
    segment: Segment,
    lo: f64,
    hi: f64,
    estimate: GkEstimate,
}

impl PartialEq for Piece {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Piece {}

impl PartialOrd for Piece {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Piece {
    fn cmp(&self, other: &Self) -> Ordering {
        self.estimate.error.total_cmp(&other.estimate.error)
    }
}

fn failure(code: &str, message: &str, lower: f64, upper: f64) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("lower", lower.to_string())
        .with_context("upper", upper.to_string())
}

fn evaluate<F>(f: &F, segment: Segment, lo: f64, hi: f64) -> Result<Piece, ErrorInfo>
where
    F: Fn(f64) -> f64 + ?Sized,
{
    let estimate = gk15(&|u: f64| segment.eval(f, u), lo, hi);
    if !estimate.value.is_finite() || !estimate.error.is_finite() {
        return Err(ErrorInfo::new("quad-non-finite", "integrand produced a non-finite estimate")
            .with_context("piece_lo", lo.to_string())
            .with_context("piece_hi", hi.to_string()));
    }
    Ok(Piece {
        segment,
        lo,
        hi,
        estimate,
    })
}

fn segments(lower: f64, upper: f64, points: &[f64]) -> Vec<(Segment, f64, f64)> {
    let mut anchors: Vec<f64> = Vec::new();
    if lower.is_finite() {
        anchors.push(lower);
    }
    let mut interior: Vec<f64> = points
        .iter()
        .copied()
        .filter(|p| p.is_finite() && *p > lower && *p < upper)
        .collect();
    interior.sort_by(f64::total_cmp);
    interior.dedup();
    anchors.extend(interior);
    if upper.is_finite() {
        anchors.push(upper);
    }
    if anchors.is_empty() {
        anchors.push(0.0);
    }

    let mut out = Vec::with_capacity(anchors.len() + 1);
    if lower == f64::NEG_INFINITY {
        out.push((Segment::Lower { origin: anchors[0] }, 0.0, 1.0));
    }
    for pair in anchors.windows(2) {
        out.push((Segment::Finite, pair[0], pair[1]));
    }
    if upper == f64::INFINITY {
        out.push((
            Segment::Upper {
                origin: anchors[anchors.len() - 1],
            },
            0.0,
            1.0,
        ));
    }
    out
}

/// Integrates `f` over `[lower, upper]`, either bound may be infinite.
///
/// `points` are split locations (kinks, peaks); those outside the interval
/// are ignored. Reversed bounds negate the result. Fails with
/// [`LswError::IntegrationFailed`] when the estimate is non-finite or the
/// tolerance is not reached within `max_subdivisions` pieces.
pub fn integrate<F>(
    f: &F,
    lower: f64,
    upper: f64,
    points: &[f64],
    tol: &Tolerance,
) -> Result<QuadEstimate, LswError>
where
    F: Fn(f64) -> f64 + ?Sized,
{
    tol.validate()?;
    if lower.is_nan() || upper.is_nan() {
        return Err(LswError::InvalidInput(failure(
            "quad-bounds",
            "integration bounds must not be NaN",
            lower,
            upper,
        )));
    }
    if lower == upper {
        return Ok(QuadEstimate {
            value: 0.0,
            error: 0.0,
            evaluations: 0,
            intervals: 0,
        });
    }
    if lower > upper {
        let flipped = integrate(f, upper, lower, points, tol)?;
        return Ok(QuadEstimate {
            value: -flipped.value,
            ..flipped
        });
    }

    let mut heap = BinaryHeap::new();
    let mut evaluations = 0;
    for (segment, lo, hi) in segments(lower, upper, points) {
        let piece = evaluate(f, segment, lo, hi).map_err(LswError::IntegrationFailed)?;
        evaluations += GK15_EVALUATIONS;
        heap.push(piece);
    }

    loop {
        let value: f64 = heap.iter().map(|p| p.estimate.value).sum();
        let error: f64 = heap.iter().map(|p| p.estimate.error).sum();
        if error <= tol.target(value) {
            debug!(lower, upper, value, error, evaluations, intervals = heap.len(), "quadrature converged");
            return Ok(QuadEstimate {
                value,
                error,
                evaluations,
                intervals: heap.len(),
            });
        }
        if heap.len() >= tol.max_subdivisions {
            return Err(LswError::IntegrationFailed(
                failure("quad-max-subdivisions", "tolerance not reached", lower, upper)
                    .with_context("value", value.to_string())
                    .with_context("error", error.to_string())
                    .with_context("limit", tol.max_subdivisions.to_string())
                    .with_hint("raise max_subdivisions or loosen the tolerance"),
            ));
        }

        let Some(worst) = heap.pop() else {
            return Err(LswError::IntegrationFailed(failure(
                "quad-empty",
                "no subintervals to refine",
                lower,
                upper,
            )));
        };
        let mid = 0.5 * (worst.lo + worst.hi);
        if !(worst.lo < mid && mid < worst.hi) {
            return Err(LswError::IntegrationFailed(
                failure("quad-interval-underflow", "subinterval too small to bisect", lower, upper)
                    .with_context("piece_lo", worst.lo.to_string())
                    .with_context("piece_hi", worst.hi.to_string()),
            ));
        }
        for (lo, hi) in [(worst.lo, mid), (mid, worst.hi)] {
            let piece = evaluate(f, worst.segment, lo, hi).map_err(LswError::IntegrationFailed)?;
            evaluations += GK15_EVALUATIONS;
            heap.push(piece);
        }
    }
}
