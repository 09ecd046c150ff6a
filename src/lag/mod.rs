//! Lag grid construction and the lagged view of the second series.
//!
//! The profiler compares series a against series b shifted by every lag in a
//! window. Rather than shifting repeatedly during estimation, we materialize
//! one column per lag up front and trim series a to the rows shared by every
//! shift. All later stages (MI profiling, entropy bounds) index into this
//! structure.

use crate::error::ProfileError;

/// Evenly spaced integer lags from `min_lag` to `max_lag` at step `resolution`.
///
/// The grid always contains `(max_lag - min_lag) / resolution + 1` entries
/// (integer division), so `max_lag` itself is included only when the span is a
/// multiple of the step.
pub fn lag_grid(min_lag: i64, max_lag: i64, resolution: i64) -> Result<Vec<i64>, ProfileError> {
    if resolution <= 0 {
        return Err(ProfileError::invalid_config(format!(
            "lag resolution must be positive, got {resolution}"
        )));
    }
    if min_lag > max_lag {
        return Err(ProfileError::invalid_config(format!(
            "min lag {min_lag} exceeds max lag {max_lag}"
        )));
    }

    let span = max_lag as i128 - min_lag as i128;
    let count = usize::try_from(span / resolution as i128 + 1)
        .map_err(|_| ProfileError::invalid_config("lag grid does not fit in memory"))?;

    Ok((0..count).map(|i| min_lag + i as i64 * resolution).collect())
}

/// Series b shifted by every lag in the grid, with series a trimmed to match.
///
/// Stored column-wise: `columns[i]` is series b shifted by `lags[i]`, and
/// every column has `trimmed_a.len()` rows. Row `r` of column `i` pairs with
/// `trimmed_a[r]`.
#[derive(Debug, Clone)]
pub struct LagMatrix {
    /// The lag applied to each column, strictly increasing.
    pub lags: Vec<i64>,
    /// Series a restricted to the rows valid under every lag.
    pub trimmed_a: Vec<f64>,
    /// One column of series b per lag.
    pub columns: Vec<Vec<f64>>,
}

impl LagMatrix {
    /// Build the lagged view of `series_b` against `series_a`.
    ///
    /// Both ends of the data are trimmed by the lag magnitudes: rows
    /// `|min_lag| .. len - |max_lag|` survive, so every column is a plain
    /// slice of `series_b` with no wraparound or padding.
    pub fn build(
        series_a: &[f64],
        series_b: &[f64],
        resolution: i64,
        min_lag: i64,
        max_lag: i64,
    ) -> Result<Self, ProfileError> {
        if series_a.len() != series_b.len() {
            return Err(ProfileError::LengthMismatch {
                a: series_a.len(),
                b: series_b.len(),
            });
        }

        let lags = lag_grid(min_lag, max_lag, resolution)?;

        let len = series_a.len();
        let front = min_lag.unsigned_abs() as usize;
        let back = max_lag.unsigned_abs() as usize;
        if len as u128 <= front as u128 + back as u128 {
            return Err(ProfileError::InvalidWindow {
                len,
                min_lag,
                max_lag,
            });
        }
        let end = len - back;
        let rows = end - front;

        let trimmed_a = series_a[front..end].to_vec();
        let columns = lags
            .iter()
            .map(|&lag| {
                // front + lag >= 0 and end + lag <= len for every lag in the
                // window, so the slice never leaves the series.
                let from = (front as i64 + lag) as usize;
                series_b[from..from + rows].to_vec()
            })
            .collect();

        Ok(LagMatrix {
            lags,
            trimmed_a,
            columns,
        })
    }

    /// Number of rows shared by the trimmed series and every column.
    pub fn rows(&self) -> usize {
        self.trimmed_a.len()
    }
}
