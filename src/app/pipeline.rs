//! Shared profiling pipeline behind every front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! validate -> missing-data policy -> lag matrix -> MI profile -> peak fits -> entropy bound
//!
//! The CLI subcommands then focus on presentation (text vs JSON vs plot).

use std::time::Instant;

use crate::domain::{MissingDataPolicy, ModelReport, ProfileConfig, ProfileOutput};
use crate::entropy;
use crate::error::ProfileError;
use crate::fit::{PeakModel, PiecewiseLinearModel, QuadraticModel, prediction_band};
use crate::lag::LagMatrix;
use crate::mi::{self, DEFAULT_K};

/// Execute the full profiling pipeline on an aligned pair of series.
pub fn run_profile(
    config: &ProfileConfig,
    series_a: &[f64],
    series_b: &[f64],
) -> Result<ProfileOutput, ProfileError> {
    // 1) Validate the run configuration before touching any data.
    config.validate()?;

    if series_a.len() != series_b.len() {
        return Err(ProfileError::LengthMismatch {
            a: series_a.len(),
            b: series_b.len(),
        });
    }

    // 2) Resolve missing values according to the configured policy. Rows are
    //    dropped (or rejected) pairwise so the series stay aligned.
    let (series_a, series_b, rows_dropped) =
        apply_missing_policy(series_a, series_b, config.missing_data)?;

    // 3) Build the lag matrix. The trimmed window must leave enough rows for
    //    the neighbor search to mean anything.
    let matrix = LagMatrix::build(
        &series_a,
        &series_b,
        config.resolution,
        config.min_lag,
        config.max_lag,
    )?;
    if matrix.rows() <= DEFAULT_K {
        return Err(ProfileError::invalid_config(format!(
            "trimmed window leaves {} rows; need more than {} for k-nearest-neighbor estimation",
            matrix.rows(),
            DEFAULT_K
        )));
    }

    // 4) Raw and surrogate MI profiles across all lags. This is the dominant
    //    cost, so it is the part that gets timed.
    let started = Instant::now();
    let profile = mi::profile(&matrix, DEFAULT_K, config.seed)?;
    let elapsed_ms = started.elapsed().as_millis();

    // 5) Fit both peak models to the raw profile and wrap each in its
    //    prediction band.
    let quadratic = fit_report(&QuadraticModel, &matrix, &profile.mi, config.confidence)?;
    let piecewise = fit_report(
        &PiecewiseLinearModel,
        &matrix,
        &profile.mi,
        config.confidence,
    )?;

    // 6) Optional entropy upper bound on the profile.
    let min_entropy = config
        .entropy_bins
        .as_ref()
        .map(|bins| entropy::min_entropy_bits(&matrix, bins));

    Ok(ProfileOutput {
        lags: matrix.lags.clone(),
        mi: profile.mi,
        surrogate_mi: profile.surrogate_mi,
        quadratic,
        piecewise,
        min_entropy,
        rows_used: matrix.rows(),
        rows_dropped,
        elapsed_ms,
    })
}

fn fit_report(
    model: &dyn PeakModel,
    matrix: &LagMatrix,
    values: &[f64],
    confidence: f64,
) -> Result<ModelReport, ProfileError> {
    let fit = model.fit(&matrix.lags, values)?;
    let band = prediction_band(values, &fit.curve, confidence)?;
    Ok(ModelReport {
        summary: fit.summary,
        band,
    })
}

fn apply_missing_policy(
    a: &[f64],
    b: &[f64],
    policy: MissingDataPolicy,
) -> Result<(Vec<f64>, Vec<f64>, usize), ProfileError> {
    match policy {
        MissingDataPolicy::Fail => {
            for (index, (x, y)) in a.iter().zip(b).enumerate() {
                if !x.is_finite() || !y.is_finite() {
                    return Err(ProfileError::MissingData { index });
                }
            }
            Ok((a.to_vec(), b.to_vec(), 0))
        }
        MissingDataPolicy::DropRows => {
            let mut kept_a = Vec::with_capacity(a.len());
            let mut kept_b = Vec::with_capacity(b.len());
            for (x, y) in a.iter().zip(b) {
                if x.is_finite() && y.is_finite() {
                    kept_a.push(*x);
                    kept_b.push(*y);
                }
            }
            let rows_dropped = a.len() - kept_a.len();
            Ok((kept_a, kept_b, rows_dropped))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DemoSpec, generate_pair};
    use crate::domain::EntropyBins;

    fn demo_pair(len: usize, shift: i64) -> (Vec<f64>, Vec<f64>) {
        generate_pair(&DemoSpec {
            len,
            noise: 0.25,
            shift,
            seed: 11,
        })
        .unwrap()
    }

    #[test]
    fn full_window_run_produces_one_entry_per_lag() {
        let (a, b) = demo_pair(500, 0);
        let config = ProfileConfig::default();
        let out = run_profile(&config, &a, &b).unwrap();

        // [-60, 60] at resolution 1 is 121 lags.
        assert_eq!(out.lags.len(), 121);
        assert_eq!(out.lags[0], -60);
        assert_eq!(out.lags[120], 60);
        assert_eq!(out.mi.len(), 121);
        assert_eq!(out.surrogate_mi.len(), 121);
        assert_eq!(out.quadratic.band.fitted.len(), 121);
        assert_eq!(out.piecewise.band.fitted.len(), 121);

        assert_eq!(out.rows_used, 500 - 60 - 60);
        assert_eq!(out.rows_dropped, 0);
        assert!(out.min_entropy.is_none());
        assert!(out.mi.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn planted_shift_wins_over_the_surrogate_floor() {
        let (a, b) = demo_pair(240, 4);
        let config = ProfileConfig {
            min_lag: -8,
            max_lag: 8,
            ..ProfileConfig::default()
        };
        let out = run_profile(&config, &a, &b).unwrap();

        let best = (0..out.mi.len())
            .max_by(|&i, &j| out.mi[i].total_cmp(&out.mi[j]))
            .unwrap();
        assert_eq!(out.lags[best], 4);
        assert!(
            out.mi[best] > out.surrogate_mi[best],
            "raw {} vs surrogate {}",
            out.mi[best],
            out.surrogate_mi[best]
        );

        // Same seed, same answer.
        let again = run_profile(&config, &a, &b).unwrap();
        assert_eq!(again.mi, out.mi);
        assert_eq!(again.surrogate_mi, out.surrogate_mi);
    }

    #[test]
    fn fail_policy_reports_the_first_missing_row() {
        let (mut a, b) = demo_pair(80, 0);
        a[5] = f64::NAN;
        let config = ProfileConfig {
            min_lag: -4,
            max_lag: 4,
            ..ProfileConfig::default()
        };
        let err = run_profile(&config, &a, &b).unwrap_err();
        assert!(matches!(err, ProfileError::MissingData { index: 5 }));
    }

    #[test]
    fn drop_rows_policy_shrinks_the_window() {
        let (mut a, mut b) = demo_pair(80, 0);
        a[3] = f64::NAN;
        b[10] = f64::INFINITY;
        b[11] = f64::NAN;
        let config = ProfileConfig {
            min_lag: -4,
            max_lag: 4,
            missing_data: MissingDataPolicy::DropRows,
            ..ProfileConfig::default()
        };
        let out = run_profile(&config, &a, &b).unwrap();

        assert_eq!(out.rows_dropped, 3);
        assert_eq!(out.rows_used, 80 - 3 - 8);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let (a, mut b) = demo_pair(60, 0);
        b.pop();
        let err = run_profile(&ProfileConfig::default(), &a, &b).unwrap_err();
        assert!(matches!(err, ProfileError::LengthMismatch { a: 60, b: 59 }));
    }

    #[test]
    fn window_consuming_the_whole_series_is_rejected() {
        let (a, b) = demo_pair(100, 0);
        let err = run_profile(&ProfileConfig::default(), &a, &b).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidWindow { .. }));
    }

    #[test]
    fn entropy_bins_produce_an_upper_bound() {
        let (a, b) = demo_pair(160, 0);
        let config = ProfileConfig {
            min_lag: -5,
            max_lag: 5,
            entropy_bins: Some(EntropyBins {
                edges_a: vec![-15.0, -5.0, 5.0, 15.0],
                edges_b: vec![-15.0, -5.0, 5.0, 15.0],
            }),
            ..ProfileConfig::default()
        };
        let out = run_profile(&config, &a, &b).unwrap();

        let bound = out.min_entropy.unwrap();
        assert!(bound >= 0.0);
        // Three bins can never carry more than log2(3) bits.
        assert!(bound <= 3.0_f64.log2() + 1e-12);
    }
}
