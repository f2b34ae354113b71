//! Position histograms from lattice-switch runs and their correction onto
//! the unshifted landscape.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use lsw_core::errors::{check_kt, ErrorInfo, LswError};
use lsw_core::Potential;
use serde::{Deserialize, Serialize};

use crate::equilibrium::EquilibriumDensity;

/// One `(bin_center, count)` line of a bin file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Bin centre.
    pub center: f64,
    /// Number of samples, possibly reweighted.
    pub count: f64,
}

/// Bins sorted by centre, with non-negative finite counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    bins: Vec<HistogramBin>,
}

/// Observed and exact density at one bin centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinResidual {
    /// Bin centre.
    pub center: f64,
    /// Normalised histogram density.
    pub observed: f64,
    /// Exact density at the centre.
    pub exact: f64,
    /// `observed - exact`.
    pub residual: f64,
}

/// Agreement of a histogram with an exact density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramComparison {
    /// Per-bin residuals in centre order.
    pub residuals: Vec<BinResidual>,
    /// Largest `|residual|`.
    pub max_abs_residual: f64,
    /// `Σ |observed - exact| · width`, between 0 and 2.
    pub l1_distance: f64,
}

fn invalid(code: &str, message: &str) -> LswError {
    LswError::InvalidInput(ErrorInfo::new(code, message))
}

impl Histogram {
    /// Validates and sorts the bins; at least two are needed to infer a width.
    pub fn new(mut bins: Vec<HistogramBin>) -> Result<Self, LswError> {
        if bins.len() < 2 {
            return Err(invalid("histogram-size", "a histogram needs at least two bins")
                .with_context("bins", bins.len().to_string()));
        }
        if let Some(bad) = bins
            .iter()
            .find(|b| !b.center.is_finite() || !b.count.is_finite() || b.count < 0.0)
        {
            return Err(invalid("histogram-bin", "bin centres must be finite and counts non-negative")
                .with_context("center", bad.center.to_string())
                .with_context("count", bad.count.to_string()));
        }
        bins.sort_by(|a, b| a.center.total_cmp(&b.center));
        Ok(Self { bins })
    }

    /// Parses `bin_center, count` lines without a header.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LswError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .trim(Trim::All)
            .from_reader(reader);
        let bins = rdr
            .deserialize::<(f64, f64)>()
            .map(|record| {
                record
                    .map(|(center, count)| HistogramBin { center, count })
                    .map_err(|err| LswError::Serde(ErrorInfo::new("bins_read", err.to_string())))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(bins)
    }

    /// Reads a bin file from disk.
    pub fn load(path: &Path) -> Result<Self, LswError> {
        let file = File::open(path).map_err(|err| {
            LswError::Io(
                ErrorInfo::new("bins_open", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_reader(file).map_err(|err| err.with_context("path", path.display().to_string()))
    }

    /// Bins in centre order.
    pub fn bins(&self) -> &[HistogramBin] {
        &self.bins
    }

    /// Sum of all counts.
    pub fn total(&self) -> f64 {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// Median spacing of neighbouring centres, robust to missing empty bins.
    pub fn bin_width(&self) -> f64 {
        let mut gaps: Vec<f64> = self
            .bins
            .windows(2)
            .map(|w| w[1].center - w[0].center)
            .filter(|gap| *gap > 0.0)
            .collect();
        if gaps.is_empty() {
            return 0.0;
        }
        gaps.sort_by(f64::total_cmp);
        gaps[gaps.len() / 2]
    }

    /// Reweights a histogram sampled on the shifted landscape back onto the
    /// unshifted one: counts right of the origin are multiplied by
    /// `exp(shift / kT)`.
    pub fn unshift(&self, shift: f64, kt: f64) -> Result<Histogram, LswError> {
        check_kt(kt)?;
        let factor = (shift / kt).exp();
        if !factor.is_finite() {
            return Err(invalid("unshift-overflow", "reweighting factor overflows")
                .with_context("shift", shift.to_string())
                .with_context("kt", kt.to_string()));
        }
        let bins = self
            .bins
            .iter()
            .map(|b| HistogramBin {
                center: b.center,
                count: if b.center > 0.0 { b.count * factor } else { b.count },
            })
            .collect();
        Ok(Histogram { bins })
    }

    /// Converts counts into a probability density `(center, count / (N·width))`.
    pub fn normalized(&self) -> Result<Vec<(f64, f64)>, LswError> {
        let total = self.total();
        let width = self.bin_width();
        if total <= 0.0 || width <= 0.0 {
            return Err(invalid("histogram-empty", "histogram has no counts or no spacing")
                .with_context("total", total.to_string())
                .with_context("width", width.to_string()));
        }
        Ok(self
            .bins
            .iter()
            .map(|b| (b.center, b.count / (total * width)))
            .collect())
    }

    /// Residuals of the normalised histogram against an exact density.
    pub fn compare_with_density<P: Potential>(
        &self,
        density: &EquilibriumDensity<P>,
    ) -> Result<HistogramComparison, LswError> {
        let width = self.bin_width();
        let residuals: Vec<BinResidual> = self
            .normalized()?
            .into_iter()
            .map(|(center, observed)| {
                let exact = density.density(center);
                BinResidual {
                    center,
                    observed,
                    exact,
                    residual: observed - exact,
                }
            })
            .collect();
        let max_abs_residual = residuals
            .iter()
            .map(|r| r.residual.abs())
            .fold(0.0, f64::max);
        let l1_distance = residuals.iter().map(|r| r.residual.abs()).sum::<f64>() * width;
        Ok(HistogramComparison {
            residuals,
            max_abs_residual,
            l1_distance,
        })
    }
}
