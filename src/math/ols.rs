//! Least squares solver.
//!
//! Both peak models reduce to small linear regression problems of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! The quadratic model is linear in its monomial coefficients, and the
//! piecewise-linear model is linear in (intercept, slopes) once the breakpoint
//! is fixed, so we solve β many times during the breakpoint scan.
//!
//! Implementation choices:
//! - We use SVD to solve the least-squares problem robustly even when the
//!   design matrix is tall (more rows than columns).
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - Parameter dimension is tiny (3 columns), so SVD performance is a
//!   non-issue even across a full breakpoint scan.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails. Lag grids in
    // the single digits can produce near-collinear segment columns.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Sum of squared residuals of `y` against the fitted values `x * beta`.
pub fn sum_squared_residuals(x: &DMatrix<f64>, y: &DVector<f64>, beta: &DVector<f64>) -> f64 {
    let fitted = x * beta;
    (y - fitted).norm_squared()
}
