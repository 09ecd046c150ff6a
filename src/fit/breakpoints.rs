//! Breakpoint candidate grid for the piecewise-linear model.

use crate::domain::PeakModelKind;
use crate::error::ProfileError;

/// Minimum points on each side of a viable breakpoint, so both segments stay
/// overdetermined.
const MIN_SIDE_POINTS: usize = 2;

/// Candidate breakpoints over a strictly increasing lag grid.
///
/// Candidates are the interior grid values themselves plus the midpoints
/// between adjacent interior values. Every candidate keeps at least two
/// points strictly below it and two at or above it.
pub fn candidate_breakpoints(lags: &[f64]) -> Result<Vec<f64>, ProfileError> {
    let n = lags.len();
    if n < 2 * MIN_SIDE_POINTS {
        return Err(ProfileError::fit_convergence(
            PeakModelKind::PiecewiseLinear,
            format!("need at least {} points, got {n}", 2 * MIN_SIDE_POINTS),
        ));
    }
    debug_assert!(lags.windows(2).all(|w| w[0] < w[1]));

    let mut candidates = Vec::with_capacity(2 * (n - 2 * MIN_SIDE_POINTS + 1));
    // Exact grid values first so an equal-SSE tie resolves to a grid point.
    for j in MIN_SIDE_POINTS..=n - MIN_SIDE_POINTS {
        candidates.push(lags[j]);
    }
    for j in MIN_SIDE_POINTS..=n - MIN_SIDE_POINTS {
        candidates.push(0.5 * (lags[j - 1] + lags[j]));
    }
    Ok(candidates)
}
