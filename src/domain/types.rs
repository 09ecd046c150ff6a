//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during profiling
//! - exported to JSON
//! - reloaded later for plotting or comparisons

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// What to do when a raw input sample is NaN or infinite.
///
/// The policy is applied to the raw series **before** any lagged columns are
/// built, so a dropped row vanishes from every lag consistently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MissingDataPolicy {
    /// Reject the run on the first non-finite sample.
    #[default]
    Fail,
    /// Drop the offending row from both series, keeping them aligned.
    DropRows,
}

/// Which peak model shape to fit over the mutual-information profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PeakModelKind {
    /// Downward parabola `y = -a (x + b)^2 + c`.
    Quadratic,
    /// Two line segments joined at a free breakpoint.
    PiecewiseLinear,
}

impl PeakModelKind {
    /// Human-readable label for terminal output and error messages.
    pub fn display_name(self) -> &'static str {
        match self {
            PeakModelKind::Quadratic => "quadratic",
            PeakModelKind::PiecewiseLinear => "piecewise-linear",
        }
    }

    /// Number of free parameters (used for residual degrees of freedom).
    pub fn param_count(self) -> usize {
        match self {
            PeakModelKind::Quadratic => 3,
            PeakModelKind::PiecewiseLinear => 4,
        }
    }
}

impl std::fmt::Display for PeakModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Explicit histogram bin edges for the entropy bound, one set per series.
///
/// Edges must be strictly increasing. A value lands in bin `i` when
/// `edges[i] <= v < edges[i + 1]`; the final right edge is closed so the
/// maximum is not thrown away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropyBins {
    pub edges_a: Vec<f64>,
    pub edges_b: Vec<f64>,
}

impl EntropyBins {
    pub fn validate(&self) -> Result<(), ProfileError> {
        for (label, edges) in [("a", &self.edges_a), ("b", &self.edges_b)] {
            if edges.len() < 2 {
                return Err(ProfileError::invalid_config(format!(
                    "entropy bin edges for series {label} need at least 2 entries, got {}",
                    edges.len()
                )));
            }
            if edges.windows(2).any(|w| !(w[0] < w[1])) {
                return Err(ProfileError::invalid_config(format!(
                    "entropy bin edges for series {label} must be strictly increasing"
                )));
            }
        }
        Ok(())
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults) or built directly by
/// library callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Step between consecutive lags, in samples. Must be positive.
    pub resolution: i64,
    /// Smallest lag applied to series b, inclusive. May be negative.
    pub min_lag: i64,
    /// Largest lag applied to series b, inclusive.
    pub max_lag: i64,
    /// Confidence level for prediction bands, strictly inside (0, 1).
    pub confidence: f64,
    /// Non-finite sample handling.
    pub missing_data: MissingDataPolicy,
    /// Base seed for surrogate generation and estimator jitter. The same seed
    /// and inputs reproduce the run bit for bit.
    pub seed: u64,
    /// Bin edges for the entropy bound. `None` disables the bound entirely
    /// and the output's `min_entropy` stays `None`.
    pub entropy_bins: Option<EntropyBins>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        ProfileConfig {
            resolution: 1,
            min_lag: -60,
            max_lag: 60,
            confidence: 0.80,
            missing_data: MissingDataPolicy::Fail,
            seed: 0,
            entropy_bins: None,
        }
    }
}

impl ProfileConfig {
    /// Reject impossible settings before any data is touched.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.resolution <= 0 {
            return Err(ProfileError::invalid_config(format!(
                "lag resolution must be positive, got {}",
                self.resolution
            )));
        }
        if self.min_lag > self.max_lag {
            return Err(ProfileError::invalid_config(format!(
                "min lag {} exceeds max lag {}",
                self.min_lag, self.max_lag
            )));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(ProfileError::invalid_config(format!(
                "confidence must lie strictly between 0 and 1, got {}",
                self.confidence
            )));
        }
        if let Some(bins) = &self.entropy_bins {
            bins.validate()?;
        }
        Ok(())
    }
}

/// Fitted parameters and quality for one peak model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitSummary {
    pub model: PeakModelKind,
    /// Parameter values in the model's natural order:
    /// `[a, b, c]` for quadratic, `[x0, y0, k1, k2]` for piecewise-linear.
    pub params: Vec<f64>,
    /// Lag from the profiled grid where the fitted curve is highest. Always
    /// one of the grid values, never an interpolated position.
    pub peak_lag: i64,
    /// Fitted curve value at `peak_lag`.
    pub peak_value: f64,
    /// Mean squared residual between the observed profile and the fitted
    /// curve, reported under the traditional RMS label.
    pub rms: f64,
}

/// Pointwise prediction band around a fitted curve, aligned with the lag grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionBand {
    pub confidence: f64,
    pub lower: Vec<f64>,
    pub fitted: Vec<f64>,
    pub upper: Vec<f64>,
}

/// One fitted model together with its prediction band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelReport {
    pub summary: FitSummary,
    pub band: PredictionBand,
}

/// Complete result bundle for one profiling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileOutput {
    /// The profiled lag grid, in samples.
    pub lags: Vec<i64>,
    /// Mutual information between series a and lagged series b, in bits.
    pub mi: Vec<f64>,
    /// Mutual information between the phase-randomized surrogate of series a
    /// and each lagged column, the null baseline. A raw profile that never
    /// clears this floor has no meaningful peak.
    pub surrogate_mi: Vec<f64>,
    pub quadratic: ModelReport,
    pub piecewise: ModelReport,
    /// Smallest histogram entropy in bits over the trimmed series and every
    /// lagged column, when requested. An upper bound on attainable MI.
    pub min_entropy: Option<f64>,
    /// Rows per lag column after the missing-data policy and trimming; the
    /// sample count each estimate actually used.
    pub rows_used: usize,
    /// Rows discarded by the drop-rows policy.
    pub rows_dropped: usize,
    pub elapsed_ms: u128,
}
