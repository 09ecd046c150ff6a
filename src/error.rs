//! Error taxonomy for the profiling pipeline.
//!
//! Everything is fail-fast: a profiling call either returns a complete
//! `ProfileOutput` or one of these errors, never partial results. There is no
//! transient-failure class here (a fit either converges or it doesn't), so
//! there are no retries anywhere.

use thiserror::Error;

use crate::domain::PeakModelKind;

#[derive(Debug, Clone, Error)]
pub enum ProfileError {
    /// The two input series must have identical lengths.
    #[error("input series lengths differ: a has {a} samples, b has {b}")]
    LengthMismatch { a: usize, b: usize },

    /// A non-finite sample was found while the missing-data policy is `fail`.
    #[error("missing (non-finite) sample at row {index}; use the drop-rows policy to discard such rows")]
    MissingData { index: usize },

    /// The lag window swallows the whole series.
    #[error("lag window [{min_lag}, {max_lag}] leaves no rows from {len} samples")]
    InvalidWindow { len: usize, min_lag: i64, max_lag: i64 },

    /// Too few residual degrees of freedom for an interval.
    #[error("degenerate fit: {dof} residual degrees of freedom (need > 0)")]
    DegenerateFit { dof: i64 },

    /// A peak model could not be fitted to the profile.
    #[error("{model} fit did not converge: {reason}")]
    FitConvergence { model: PeakModelKind, reason: String },

    /// Configuration rejected before any computation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Front-end input problems (CSV files). Never produced by the pipeline itself.
    #[error("ingest error: {0}")]
    Ingest(String),

    /// Unexpected internal failures (e.g. serialization of the output bundle).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ProfileError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    pub fn fit_convergence(model: PeakModelKind, reason: impl Into<String>) -> Self {
        Self::FitConvergence {
            model,
            reason: reason.into(),
        }
    }

    pub fn ingest(message: impl Into<String>) -> Self {
        Self::Ingest(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Process exit code for the binary front-end.
    ///
    /// 2 = bad input/configuration (the caller can fix the invocation),
    /// 1 = the computation itself failed on valid input.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::LengthMismatch { .. }
            | Self::MissingData { .. }
            | Self::InvalidWindow { .. }
            | Self::InvalidConfig(_)
            | Self::Ingest(_) => 2,
            Self::DegenerateFit { .. } | Self::FitConvergence { .. } | Self::Internal(_) => 1,
        }
    }
}
