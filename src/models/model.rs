//! Power-law retention model.
//!
//! The fitter relies on two primitive operations:
//! - predict `retention(day)` given `(a, b)` (for residuals, projection, plots)
//! - the partial derivatives w.r.t. `(a, b)` (for the Jacobian)

use crate::domain::CurveParameters;

/// Evaluate `a * day^(-b)`.
///
/// Only meaningful for `day >= 1`. Non-positive `a` is not rejected here; the
/// result is simply whatever the arithmetic yields.
pub fn evaluate(params: &CurveParameters, day: u32) -> f64 {
    predict(params.a, params.b, day as f64)
}

/// Evaluate the model at a real-valued day.
pub fn predict(a: f64, b: f64, x: f64) -> f64 {
    a * x.powf(-b)
}

/// Fill the Jacobian row `[df/da, df/db]` at `x`.
pub fn fill_jacobian_row(a: f64, b: f64, x: f64, out: &mut [f64; 2]) {
    let g = x.powf(-b);
    out[0] = g;
    out[1] = -a * g * x.ln();
}
