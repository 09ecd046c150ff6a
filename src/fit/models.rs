//! Peak model strategies over the MI-versus-lag profile.
//!
//! Both models are fitted by exact least squares rather than a generic
//! iterative optimizer. The quadratic is linear in its monomial coefficients.
//! The piecewise-linear model is linear once its breakpoint is fixed, so we
//! scan a candidate grid of breakpoints, solve each reduced problem, and keep
//! the lowest SSE. Candidate selection is deterministic: ties break toward
//! the earlier candidate index.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::domain::{FitSummary, PeakModelKind};
use crate::error::ProfileError;
use crate::fit::breakpoints::candidate_breakpoints;
use crate::math::solve_least_squares;

/// A fitted peak model: the summary record plus the fitted curve on the grid.
#[derive(Debug, Clone)]
pub struct ModelFit {
    pub summary: FitSummary,
    /// Fitted value at every input lag.
    pub curve: Vec<f64>,
}

/// Common capability of the peak models. Further shapes plug in here without
/// touching the pipeline.
pub trait PeakModel {
    fn kind(&self) -> PeakModelKind;
    fn fit(&self, lags: &[i64], values: &[f64]) -> Result<ModelFit, ProfileError>;
}

/// Downward parabola `y = -a (x + b)^2 + c`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuadraticModel;

impl PeakModel for QuadraticModel {
    fn kind(&self) -> PeakModelKind {
        PeakModelKind::Quadratic
    }

    fn fit(&self, lags: &[i64], values: &[f64]) -> Result<ModelFit, ProfileError> {
        debug_assert_eq!(lags.len(), values.len());
        let n = lags.len();
        if n < 3 {
            return Err(ProfileError::fit_convergence(
                self.kind(),
                format!("need at least 3 points, got {n}"),
            ));
        }
        let xs: Vec<f64> = lags.iter().map(|&l| l as f64).collect();

        // Solve the monomial form y = alpha x^2 + slope x + gamma, which is
        // linear, then translate into the peak parameterization.
        let mut design = DMatrix::zeros(n, 3);
        for (r, &x) in xs.iter().enumerate() {
            design[(r, 0)] = 1.0;
            design[(r, 1)] = x;
            design[(r, 2)] = x * x;
        }
        let y = DVector::from_column_slice(values);
        let beta = solve_least_squares(&design, &y).ok_or_else(|| {
            ProfileError::fit_convergence(self.kind(), "least squares solve failed")
        })?;
        let (gamma, slope, alpha) = (beta[0], beta[1], beta[2]);

        if alpha == 0.0 {
            return Err(ProfileError::fit_convergence(
                self.kind(),
                "profile has no curvature",
            ));
        }

        // alpha = -a, slope = 2 alpha b, gamma = c + alpha b^2
        let a = -alpha;
        let b = slope / (2.0 * alpha);
        let c = gamma - alpha * b * b;
        if !(a.is_finite() && b.is_finite() && c.is_finite()) {
            return Err(ProfileError::fit_convergence(
                self.kind(),
                "degenerate curvature",
            ));
        }

        let curve = xs
            .iter()
            .map(|&x| (alpha * x + slope) * x + gamma)
            .collect();
        Ok(finish(self.kind(), vec![a, b, c], lags, values, curve))
    }
}

/// Two line segments joined continuously at a breakpoint `x0`, value `y0`
/// there, slope `k1` left of it and `k2` at and right of it.
///
/// The breakpoint is profiled over the candidate grid; for a fixed breakpoint
/// the remaining three parameters are linear.
#[derive(Debug, Clone, Copy, Default)]
pub struct PiecewiseLinearModel;

impl PeakModel for PiecewiseLinearModel {
    fn kind(&self) -> PeakModelKind {
        PeakModelKind::PiecewiseLinear
    }

    fn fit(&self, lags: &[i64], values: &[f64]) -> Result<ModelFit, ProfileError> {
        debug_assert_eq!(lags.len(), values.len());
        let xs: Vec<f64> = lags.iter().map(|&l| l as f64).collect();
        let candidates = candidate_breakpoints(&xs)?;

        let solved: Vec<Candidate> = candidates
            .par_iter()
            .enumerate()
            .filter_map(|(idx, &x0)| {
                solve_at_breakpoint(&xs, values, x0)
                    .map(|(params, sse)| Candidate { idx, params, sse })
            })
            .collect();

        if solved.is_empty() {
            return Err(ProfileError::fit_convergence(
                self.kind(),
                "no viable breakpoint candidate",
            ));
        }

        // Deterministic selection: minimum SSE, ties by candidate index.
        let mut best = &solved[0];
        for c in &solved[1..] {
            if c.sse < best.sse || (c.sse == best.sse && c.idx < best.idx) {
                best = c;
            }
        }

        let [x0, y0, k1, k2] = best.params;
        let curve = xs
            .iter()
            .map(|&x| piecewise_value(x, x0, y0, k1, k2))
            .collect();
        Ok(finish(self.kind(), best.params.to_vec(), lags, values, curve))
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    idx: usize,
    params: [f64; 4],
    sse: f64,
}

/// Solve the three linear parameters at a fixed breakpoint. Returns the full
/// parameter vector `[x0, y0, k1, k2]` and its SSE, or `None` when the
/// reduced system is singular.
fn solve_at_breakpoint(xs: &[f64], values: &[f64], x0: f64) -> Option<([f64; 4], f64)> {
    let n = xs.len();

    // Columns: intercept y0, left-slope term, right-slope term.
    let mut design = DMatrix::zeros(n, 3);
    for (r, &x) in xs.iter().enumerate() {
        let dx = x - x0;
        design[(r, 0)] = 1.0;
        if x < x0 {
            design[(r, 1)] = dx;
        } else {
            design[(r, 2)] = dx;
        }
    }
    let y = DVector::from_column_slice(values);
    let beta = solve_least_squares(&design, &y)?;
    let (y0, k1, k2) = (beta[0], beta[1], beta[2]);

    let mut sse = 0.0;
    for (r, &x) in xs.iter().enumerate() {
        let resid = values[r] - piecewise_value(x, x0, y0, k1, k2);
        sse += resid * resid;
    }
    sse.is_finite().then(|| ([x0, y0, k1, k2], sse))
}

fn piecewise_value(x: f64, x0: f64, y0: f64, k1: f64, k2: f64) -> f64 {
    let k = if x < x0 { k1 } else { k2 };
    y0 + k * (x - x0)
}

/// Shared wrap-up: locate the peak on the grid and compute the residual
/// figure. Ties in the fitted curve resolve to the earliest lag.
fn finish(
    kind: PeakModelKind,
    params: Vec<f64>,
    lags: &[i64],
    values: &[f64],
    curve: Vec<f64>,
) -> ModelFit {
    let mut peak_idx = 0;
    for (i, v) in curve.iter().enumerate() {
        if *v > curve[peak_idx] {
            peak_idx = i;
        }
    }

    let rms = values
        .iter()
        .zip(curve.iter())
        .map(|(obs, fit)| (obs - fit) * (obs - fit))
        .sum::<f64>()
        / values.len() as f64;

    ModelFit {
        summary: FitSummary {
            model: kind,
            params,
            peak_lag: lags[peak_idx],
            peak_value: curve[peak_idx],
            rms,
        },
        curve,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadratic_recovers_planted_parabola() {
        let lags: Vec<i64> = (-10..=10).collect();
        let (a, b, c) = (0.01, 2.0, 1.5);
        let values: Vec<f64> = lags
            .iter()
            .map(|&l| {
                let x = l as f64;
                -a * (x + b) * (x + b) + c
            })
            .collect();

        let fit = QuadraticModel.fit(&lags, &values).unwrap();
        assert!((fit.summary.params[0] - a).abs() < 1e-8);
        assert!((fit.summary.params[1] - b).abs() < 1e-6);
        assert!((fit.summary.params[2] - c).abs() < 1e-6);
        // Vertex at -b sits on the grid.
        assert_eq!(fit.summary.peak_lag, -2);
        assert!((fit.summary.peak_value - c).abs() < 1e-6);
        assert!(fit.summary.rms < 1e-12);
    }

    #[test]
    fn quadratic_needs_three_points() {
        let err = QuadraticModel.fit(&[0, 1], &[0.0, 1.0]).unwrap_err();
        assert!(matches!(err, ProfileError::FitConvergence { .. }));
    }

    #[test]
    fn quadratic_rejects_all_zero_profile() {
        let lags: Vec<i64> = (-5..=5).collect();
        let values = vec![0.0; lags.len()];
        let err = QuadraticModel.fit(&lags, &values).unwrap_err();
        assert!(matches!(err, ProfileError::FitConvergence { .. }));
    }

    #[test]
    fn piecewise_recovers_planted_segments() {
        let lags: Vec<i64> = (0..=10).collect();
        let (x0, y0, k1, k2) = (3.0, 2.0, 0.3, -0.4);
        let values: Vec<f64> = lags
            .iter()
            .map(|&l| piecewise_value(l as f64, x0, y0, k1, k2))
            .collect();

        let fit = PiecewiseLinearModel.fit(&lags, &values).unwrap();
        let p = &fit.summary.params;
        assert!((p[0] - x0).abs() < 1e-9, "x0 off: {}", p[0]);
        assert!((p[1] - y0).abs() < 1e-8);
        assert!((p[2] - k1).abs() < 1e-8);
        assert!((p[3] - k2).abs() < 1e-8);
        // Rising then falling, so the breakpoint itself is the peak.
        assert_eq!(fit.summary.peak_lag, 3);
        assert!((fit.summary.peak_value - y0).abs() < 1e-8);
        assert!(fit.summary.rms < 1e-12);
    }

    #[test]
    fn piecewise_needs_four_points() {
        let err = PiecewiseLinearModel
            .fit(&[0, 1, 2], &[1.0, 2.0, 3.0])
            .unwrap_err();
        assert!(matches!(err, ProfileError::FitConvergence { .. }));
    }

    #[test]
    fn peak_ties_resolve_to_the_earliest_lag() {
        let lags = [0, 1, 2, 3];
        let values = [0.0, 5.0, 5.0, 0.0];
        let fit = finish(
            PeakModelKind::PiecewiseLinear,
            vec![],
            &lags,
            &values,
            values.to_vec(),
        );
        assert_eq!(fit.summary.peak_lag, 1);
        assert_eq!(fit.summary.rms, 0.0);
    }

    #[test]
    fn rms_is_the_mean_squared_residual() {
        let lags = [0, 1, 2, 3];
        let values = [0.0, 0.0, 0.0, 2.0];
        let fit = finish(PeakModelKind::Quadratic, vec![], &lags, &values, vec![0.0; 4]);
        assert_eq!(fit.summary.rms, 1.0);
    }
}
