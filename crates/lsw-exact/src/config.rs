//! Solver tolerances and YAML sweep plans.

use std::fs;
use std::path::{Path, PathBuf};

use lsw_core::errors::{check_kt, ErrorInfo, LswError};
use lsw_core::PotentialKind;
use lsw_quad::Tolerance;
use serde::{Deserialize, Serialize};

use crate::serde::{from_yaml_slice, from_yaml_value};

/// Slack subtracted from the point count of a range so that rounding noise
/// in `(stop - start) / step` never adds a trailing point.
const RANGE_COUNT_SLACK: f64 = 1e-9;

/// Largest number of temperatures a range may expand to.
pub const MAX_RANGE_POINTS: usize = 1_000_000;

/// Quadrature settings shared by every exact calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Absolute error target for each integral.
    #[serde(default = "default_tolerance")]
    pub abs_tolerance: f64,
    /// Relative error target for each integral.
    #[serde(default = "default_tolerance")]
    pub rel_tolerance: f64,
    /// Maximum number of subintervals per integral.
    #[serde(default = "default_max_subdivisions")]
    pub max_subdivisions: usize,
}

fn default_tolerance() -> f64 {
    1e-7
}

fn default_max_subdivisions() -> usize {
    500
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            abs_tolerance: default_tolerance(),
            rel_tolerance: default_tolerance(),
            max_subdivisions: default_max_subdivisions(),
        }
    }
}

impl SolverConfig {
    /// Converts the settings into quadrature tolerances.
    pub fn tolerance(&self) -> Tolerance {
        Tolerance {
            abs: self.abs_tolerance,
            rel: self.rel_tolerance,
            max_subdivisions: self.max_subdivisions,
        }
    }

    /// Rejects settings the quadrature cannot honour.
    pub fn validate(&self) -> Result<(), LswError> {
        let ok = self.abs_tolerance >= 0.0
            && self.rel_tolerance >= 0.0
            && (self.abs_tolerance > 0.0 || self.rel_tolerance > 0.0)
            && self.abs_tolerance.is_finite()
            && self.rel_tolerance.is_finite()
            && self.max_subdivisions > 0;
        if ok {
            Ok(())
        } else {
            Err(LswError::InvalidInput(
                ErrorInfo::new("solver-config", "invalid solver tolerances")
                    .with_context("abs_tolerance", self.abs_tolerance.to_string())
                    .with_context("rel_tolerance", self.rel_tolerance.to_string())
                    .with_context("max_subdivisions", self.max_subdivisions.to_string()),
            ))
        }
    }
}

/// Half-open, evenly spaced temperature range `[start, stop)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    /// First temperature.
    pub start: f64,
    /// Exclusive upper end.
    pub stop: f64,
    /// Spacing between temperatures.
    pub step: f64,
}

impl Default for TemperatureRange {
    fn default() -> Self {
        Self {
            start: 0.1,
            stop: 1.1,
            step: 0.1,
        }
    }
}

impl TemperatureRange {
    fn invalid(&self, message: &str) -> ErrorInfo {
        ErrorInfo::new("temperature-range", message)
            .with_context("start", self.start.to_string())
            .with_context("stop", self.stop.to_string())
            .with_context("step", self.step.to_string())
    }

    /// Expands the range into `start + i * step` for every point below `stop`.
    ///
    /// Ranges of more than [`MAX_RANGE_POINTS`] values are rejected.
    pub fn values(&self) -> Result<Vec<f64>, LswError> {
        let finite = self.start.is_finite() && self.stop.is_finite() && self.step.is_finite();
        if !finite || self.step <= 0.0 {
            return Err(LswError::InvalidInput(
                self.invalid("range bounds must be finite with a positive step"),
            ));
        }
        let raw = ((self.stop - self.start) / self.step - RANGE_COUNT_SLACK).ceil();
        if !(raw <= MAX_RANGE_POINTS as f64) {
            return Err(LswError::InvalidInput(
                self.invalid("range expands to too many temperatures")
                    .with_context("limit", MAX_RANGE_POINTS.to_string())
                    .with_hint("use a coarser step or an explicit list"),
            ));
        }
        let count = raw.max(0.0) as usize;
        Ok((0..count)
            .map(|i| self.start + i as f64 * self.step)
            .collect())
    }
}

/// Temperatures visited by a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TemperatureSpec {
    /// Evenly spaced half-open range.
    Range(TemperatureRange),
    /// Explicit list, evaluated in the given order.
    List {
        /// Temperatures to visit.
        values: Vec<f64>,
    },
}

impl Default for TemperatureSpec {
    fn default() -> Self {
        TemperatureSpec::Range(TemperatureRange::default())
    }
}

impl TemperatureSpec {
    /// Expands the temperatures and checks every one is positive.
    pub fn values(&self) -> Result<Vec<f64>, LswError> {
        let values = match self {
            TemperatureSpec::Range(range) => range.values()?,
            TemperatureSpec::List { values } => values.clone(),
        };
        for &kt in &values {
            check_kt(kt)?;
        }
        Ok(values)
    }
}

/// YAML-configurable description of a temperature sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPlan {
    /// Catalogued potential to evaluate.
    pub potential: PotentialKind,
    /// Temperatures to visit.
    #[serde(default)]
    pub temperatures: TemperatureSpec,
    /// Destination of the exact table; defaults to `<NAME>_exact.csv`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Worker threads used to evaluate temperatures.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Quadrature settings.
    #[serde(default)]
    pub solver: SolverConfig,
}

fn default_parallelism() -> usize {
    1
}

impl SweepPlan {
    /// Plan over the default `0.1..1.1` range with default tolerances.
    pub fn new(potential: PotentialKind) -> Self {
        Self {
            potential,
            temperatures: TemperatureSpec::default(),
            output: None,
            parallelism: default_parallelism(),
            solver: SolverConfig::default(),
        }
    }

    /// Parses a plan from YAML.
    ///
    /// The potential name is resolved through the catalogue first, so an
    /// unknown name fails with [`LswError::UnknownPotential`] like every
    /// other lookup.
    pub fn from_yaml(data: &[u8]) -> Result<Self, LswError> {
        let document: serde_yaml::Value = from_yaml_slice(data)?;
        if let Some(name) = document.get("potential").and_then(serde_yaml::Value::as_str) {
            PotentialKind::from_name(name)?;
        }
        from_yaml_value(document)
    }

    /// Checks tolerances and temperatures before any work is scheduled.
    pub fn validate(&self) -> Result<(), LswError> {
        self.solver.validate()?;
        self.temperatures.values()?;
        Ok(())
    }
}

/// Reads and validates a sweep plan from a YAML file.
pub fn load_plan(path: &Path) -> Result<SweepPlan, LswError> {
    let bytes = fs::read(path).map_err(|err| {
        LswError::Io(
            ErrorInfo::new("plan_read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    let plan = SweepPlan::from_yaml(&bytes)
        .map_err(|err| err.with_context("path", path.display().to_string()))?;
    plan.validate()?;
    Ok(plan)
}
