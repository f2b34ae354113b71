//! Catalogue of one-dimensional double-well potentials.
//!
//! Every catalogued landscape has a left well, a right well and a barrier
//! whose top sits at the origin, so the half-lines `x < 0` and `x > 0` are
//! the two states compared by the free-energy evaluator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, LswError};

/// Offset of the quartic argument that places its barrier near the origin.
const QUARTIC_OFFSET: f64 = -0.126_000_192_586_256;
/// Constant term of the quartic, chosen so the left minimum sits at zero.
const QUARTIC_CONSTANT: f64 = 2.618_555_980_765;
/// Position of the narrow right well of `DIFF_WIDTH`, equal to `sqrt(0.48)`.
const DIFF_WIDTH_RIGHT_MIN: f64 = 0.692_820_323_027_550_9;
/// Junction between the barrier and the narrow well of `DIFF_WIDTH`.
const DIFF_WIDTH_JUNCTION: f64 = 0.3461;

/// A scalar energy landscape over the real line.
///
/// Implementations must return a value for every finite `x`. Integration
/// intervals are split at the breakpoints (where the derivative may jump)
/// and at the minima (where the Boltzmann weight peaks), and the lowest
/// energy among them anchors the weight. A potential that declares neither
/// still integrates, at the cost of extra subdivisions and, at small kT, a
/// few re-anchored passes.
pub trait Potential: Send + Sync {
    /// Energy at position `x`.
    fn energy(&self, x: f64) -> f64;

    /// Positions where the piecewise definition changes segment.
    fn breakpoints(&self) -> Vec<f64> {
        Vec::new()
    }

    /// Positions of the local minima.
    fn minima(&self) -> Vec<f64> {
        Vec::new()
    }

    /// Sorted, de-duplicated union of breakpoints and minima.
    fn feature_points(&self) -> Vec<f64> {
        let mut points: Vec<f64> = self
            .breakpoints()
            .into_iter()
            .chain(self.minima())
            .filter(|p| p.is_finite())
            .collect();
        points.sort_by(f64::total_cmp);
        points.dedup();
        points
    }
}

impl<P: Potential + ?Sized> Potential for &P {
    fn energy(&self, x: f64) -> f64 {
        (**self).energy(x)
    }

    fn breakpoints(&self) -> Vec<f64> {
        (**self).breakpoints()
    }

    fn minima(&self) -> Vec<f64> {
        (**self).minima()
    }
}

impl<P: Potential + ?Sized> Potential for Box<P> {
    fn energy(&self, x: f64) -> f64 {
        (**self).energy(x)
    }

    fn breakpoints(&self) -> Vec<f64> {
        (**self).breakpoints()
    }

    fn minima(&self) -> Vec<f64> {
        (**self).minima()
    }
}

/// The closed set of catalogued potentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PotentialKind {
    /// Three-segment piecewise quadratic; the right well is 4.4 deeper.
    #[serde(rename = "KT")]
    Kt,
    /// Tilted quartic double well.
    #[serde(rename = "QUARTIC")]
    Quartic,
    /// Four-segment piecewise quadratic with a narrow right well.
    #[serde(rename = "DIFF_WIDTH")]
    DiffWidth,
}

impl PotentialKind {
    /// Every catalogued potential, in catalogue order.
    pub const ALL: [PotentialKind; 3] = [
        PotentialKind::Kt,
        PotentialKind::Quartic,
        PotentialKind::DiffWidth,
    ];

    /// Case-sensitive catalogue name.
    pub fn name(self) -> &'static str {
        match self {
            PotentialKind::Kt => "KT",
            PotentialKind::Quartic => "QUARTIC",
            PotentialKind::DiffWidth => "DIFF_WIDTH",
        }
    }

    /// Looks a potential up by its catalogue name.
    pub fn from_name(name: &str) -> Result<Self, LswError> {
        PotentialKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| {
                let known: Vec<&str> = PotentialKind::ALL.iter().map(|k| k.name()).collect();
                LswError::UnknownPotential(
                    ErrorInfo::new("unknown-potential", "no potential with this name")
                        .with_context("name", name)
                        .with_hint(format!("expected one of {}", known.join(", "))),
                )
            })
    }

    /// Energy `U(x)`.
    pub fn energy(self, x: f64) -> f64 {
        match self {
            PotentialKind::Kt => {
                if x <= -1.0 {
                    5.0 * (x + 2.0) * (x + 2.0)
                } else if x <= 1.2 {
                    10.0 - 5.0 * x * x
                } else {
                    5.0 * (x - 2.4) * (x - 2.4) - 4.4
                }
            }
            PotentialKind::Quartic => {
                let y = x + QUARTIC_OFFSET;
                y.powi(4) - 4.0 * y * y - y + QUARTIC_CONSTANT
            }
            PotentialKind::DiffWidth => {
                if x <= -1.0 {
                    5.0 * (x + 2.0) * (x + 2.0)
                } else if x <= 0.0 {
                    10.0 - 5.0 * x * x
                } else if x <= DIFF_WIDTH_JUNCTION {
                    10.0 - 50.0 * x * x
                } else {
                    let d = x - DIFF_WIDTH_RIGHT_MIN;
                    50.0 * d * d - 2.0
                }
            }
        }
    }

    /// Analytic derivative `dU/dx`, taking the left segment at breakpoints.
    pub fn derivative(self, x: f64) -> f64 {
        match self {
            PotentialKind::Kt => {
                if x <= -1.0 {
                    10.0 * (x + 2.0)
                } else if x <= 1.2 {
                    -10.0 * x
                } else {
                    10.0 * (x - 2.4)
                }
            }
            PotentialKind::Quartic => {
                let y = x + QUARTIC_OFFSET;
                4.0 * y.powi(3) - 8.0 * y - 1.0
            }
            PotentialKind::DiffWidth => {
                if x <= -1.0 {
                    10.0 * (x + 2.0)
                } else if x <= 0.0 {
                    -10.0 * x
                } else if x <= DIFF_WIDTH_JUNCTION {
                    -100.0 * x
                } else {
                    100.0 * (x - DIFF_WIDTH_RIGHT_MIN)
                }
            }
        }
    }

    /// Amount by which the right well is raised in the shifted landscape.
    pub fn shift(self) -> f64 {
        match self {
            PotentialKind::Kt => 4.4,
            PotentialKind::Quartic => 2.825_636_085_845_897_3,
            PotentialKind::DiffWidth => 2.0,
        }
    }

    /// Positions of the left and right minima.
    pub fn well_minima(self) -> [f64; 2] {
        match self {
            PotentialKind::Kt => [-2.0, 2.4],
            PotentialKind::Quartic => [-1.220_997_215_942, 1.598_997_793_7],
            PotentialKind::DiffWidth => [-2.0, DIFF_WIDTH_RIGHT_MIN],
        }
    }

    /// Segment boundaries of the piecewise definition.
    pub fn segment_breakpoints(self) -> &'static [f64] {
        match self {
            PotentialKind::Kt => &[-1.0, 1.2],
            PotentialKind::Quartic => &[],
            PotentialKind::DiffWidth => &[-1.0, 0.0, DIFF_WIDTH_JUNCTION],
        }
    }

    /// Energy of the landscape with the right well raised by [`Self::shift`],
    /// so both wells have equal depth.
    pub fn shifted_energy(self, x: f64) -> f64 {
        let right_half = match self {
            PotentialKind::Quartic => x >= 0.0,
            PotentialKind::Kt | PotentialKind::DiffWidth => x > 0.0,
        };
        if right_half {
            self.energy(x) + self.shift()
        } else {
            self.energy(x)
        }
    }
}

impl fmt::Display for PotentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PotentialKind {
    type Err = LswError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PotentialKind::from_name(s)
    }
}

impl Potential for PotentialKind {
    fn energy(&self, x: f64) -> f64 {
        PotentialKind::energy(*self, x)
    }

    fn breakpoints(&self) -> Vec<f64> {
        self.segment_breakpoints().to_vec()
    }

    fn minima(&self) -> Vec<f64> {
        self.well_minima().to_vec()
    }
}

/// A catalogued potential together with its shift constant and minima.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PotentialDescriptor {
    /// Which catalogued landscape this describes.
    pub kind: PotentialKind,
    /// Energy by which the right well is raised in the shifted landscape.
    pub shift: f64,
    /// Positions of the left and right minima.
    pub minima: [f64; 2],
}

impl PotentialDescriptor {
    /// Builds the descriptor of a catalogued potential.
    pub fn of(kind: PotentialKind) -> Self {
        Self {
            kind,
            shift: kind.shift(),
            minima: kind.well_minima(),
        }
    }

    /// Catalogue name.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Energy at the left minimum minus energy at the right minimum.
    pub fn well_depth_gap(&self) -> f64 {
        self.kind.energy(self.minima[0]) - self.kind.energy(self.minima[1])
    }

    /// Analytic derivative of the unshifted energy.
    pub fn derivative(&self, x: f64) -> f64 {
        self.kind.derivative(x)
    }

    /// Energy of the shifted landscape.
    pub fn shifted_energy(&self, x: f64) -> f64 {
        self.kind.shifted_energy(x)
    }

    /// Returns the shifted landscape as a [`Potential`].
    pub fn shifted(&self) -> ShiftedPotential {
        ShiftedPotential { kind: self.kind }
    }
}

impl Potential for PotentialDescriptor {
    fn energy(&self, x: f64) -> f64 {
        self.kind.energy(x)
    }

    fn breakpoints(&self) -> Vec<f64> {
        self.kind.segment_breakpoints().to_vec()
    }

    fn minima(&self) -> Vec<f64> {
        self.minima.to_vec()
    }
}

/// The landscape sampled by lattice switching: right well raised by the shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftedPotential {
    /// Underlying catalogued landscape.
    pub kind: PotentialKind,
}

impl Potential for ShiftedPotential {
    fn energy(&self, x: f64) -> f64 {
        self.kind.shifted_energy(x)
    }

    fn breakpoints(&self) -> Vec<f64> {
        let mut points = self.kind.segment_breakpoints().to_vec();
        // the shift introduces a jump at the origin
        points.push(0.0);
        points
    }

    fn minima(&self) -> Vec<f64> {
        self.kind.well_minima().to_vec()
    }
}

/// Looks a potential descriptor up by catalogue name.
pub fn potential(name: &str) -> Result<PotentialDescriptor, LswError> {
    PotentialKind::from_name(name).map(PotentialDescriptor::of)
}
