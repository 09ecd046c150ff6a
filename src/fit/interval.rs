//! Prediction intervals from residual spread.
//!
//! The interval around a fitted value comes from the residuals of the whole
//! fit: residual sum of squares over `n - 2` degrees of freedom gives a
//! standard deviation, scaled by the two-sided z-score for the requested
//! confidence. One call per curve point builds a band.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::domain::PredictionBand;
use crate::error::ProfileError;

/// Symmetric prediction interval `(lower, prediction, upper)` around one
/// fitted value.
pub fn prediction_interval(
    prediction: f64,
    observed: &[f64],
    fitted: &[f64],
    confidence: f64,
) -> Result<(f64, f64, f64), ProfileError> {
    debug_assert_eq!(observed.len(), fitted.len());
    let dof = observed.len() as i64 - 2;
    if dof <= 0 {
        return Err(ProfileError::DegenerateFit { dof });
    }

    let rss: f64 = observed
        .iter()
        .zip(fitted)
        .map(|(obs, fit)| (obs - fit) * (obs - fit))
        .sum();
    let stdev = (rss / dof as f64).sqrt();
    let half = two_sided_z(confidence)? * stdev;
    Ok((prediction - half, prediction, prediction + half))
}

/// Band over a whole fitted curve, one interval per grid point.
pub fn prediction_band(
    observed: &[f64],
    fitted: &[f64],
    confidence: f64,
) -> Result<PredictionBand, ProfileError> {
    let mut lower = Vec::with_capacity(fitted.len());
    let mut upper = Vec::with_capacity(fitted.len());
    for &f in fitted {
        let (lo, _, hi) = prediction_interval(f, observed, fitted, confidence)?;
        lower.push(lo);
        upper.push(hi);
    }
    Ok(PredictionBand {
        confidence,
        lower,
        fitted: fitted.to_vec(),
        upper,
    })
}

/// z-score capturing the central `confidence` mass of the standard normal.
fn two_sided_z(confidence: f64) -> Result<f64, ProfileError> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(ProfileError::invalid_config(format!(
            "confidence must lie strictly between 0 and 1, got {confidence}"
        )));
    }
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| ProfileError::internal(format!("standard normal: {e}")))?;
    Ok(normal.inverse_cdf(1.0 - (1.0 - confidence) / 2.0))
}
