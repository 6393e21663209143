//! Small least-squares solver.
//!
//! Used in two places:
//!
//! - each damped Levenberg–Marquardt step, posed as the augmented system
//!   `[J; sqrt(λ)·D] δ = [r; 0]`
//! - the log-log linear estimate `ln y = ln a - b ln x` used as a retry start
//!
//! Both systems are tall (more rows than columns) and tiny (2 columns), so an
//! SVD solve is cheap and handles rank deficiency without panicking.
//! (Nalgebra's `QR::solve` is intended for square systems and will panic for
//! non-square matrices.)

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}
