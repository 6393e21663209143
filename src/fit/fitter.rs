//! Power-law curve fitting.
//!
//! Given observed `(day, retention)` pairs we minimize
//!
//! ```text
//! Σ (y_i - a · x_i^(-b))^2
//! ```
//!
//! over `(a, b)` with a Levenberg–Marquardt iteration:
//!
//! - start at `(a, b) = (1, 1)`
//! - each damped step solves `[J; sqrt(λ)·D] δ = [r; 0]` by SVD least squares
//!   (`D` = Jacobian column norms, Marquardt scaling)
//! - accepted steps shrink `λ`, rejected steps grow it
//!
//! The iteration is fully deterministic: identical inputs give bit-identical
//! parameters.

use nalgebra::{DMatrix, DVector};

use crate::domain::{CurveParameters, FitQuality, PowerLawFit, RetentionObservation};
use crate::error::LtvError;
use crate::math::solve_least_squares;
use crate::models::{fill_jacobian_row, predict};

/// Starting point of the solver.
pub const DEFAULT_START: CurveParameters = CurveParameters { a: 1.0, b: 1.0 };

const INITIAL_LAMBDA: f64 = 1e-3;
const MIN_LAMBDA: f64 = 1e-12;
const MAX_LAMBDA: f64 = 1e16;
const MIN_SCALE: f64 = 1e-12;

/// Solver and validation options.
#[derive(Debug, Clone)]
pub struct FitOptions {
    /// Accept observations whose retention rises with day.
    ///
    /// When `false` (default) such input is rejected as `InvalidObservations`.
    pub allow_non_monotone: bool,
    /// On failure, retry once from the log-log linear estimate.
    pub retry_from_log_linear: bool,
    /// Upper bound on model (SSE) evaluations per solve.
    pub max_evaluations: usize,
    /// Relative SSE reduction tolerance.
    pub ftol: f64,
    /// Relative step size tolerance.
    pub xtol: f64,
    /// Scaled gradient tolerance (cosine between residuals and Jacobian columns).
    pub gtol: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            allow_non_monotone: false,
            retry_from_log_linear: false,
            max_evaluations: 600,
            ftol: 1.49e-8,
            xtol: 1.49e-8,
            gtol: 1e-12,
        }
    }
}

/// Fit `a · day^(-b)` with default options and return only the parameters.
pub fn fit(observations: &[RetentionObservation]) -> Result<CurveParameters, LtvError> {
    fit_power_law(observations, &FitOptions::default()).map(|f| f.params)
}

/// Fit `a · day^(-b)` and return parameters plus diagnostics.
pub fn fit_power_law(
    observations: &[RetentionObservation],
    opts: &FitOptions,
) -> Result<PowerLawFit, LtvError> {
    validate_observations(observations, opts.allow_non_monotone)?;

    let days: Vec<f64> = observations.iter().map(|o| o.day as f64).collect();
    let y: Vec<f64> = observations.iter().map(|o| o.retention).collect();

    match levenberg_marquardt(&days, &y, DEFAULT_START, opts) {
        Ok(fit) => Ok(fit),
        Err(err) if opts.retry_from_log_linear => {
            let start = log_linear_start(&days, &y).ok_or(err)?;
            levenberg_marquardt(&days, &y, start, opts)
        }
        Err(err) => Err(err),
    }
}

/// Check the preconditions of the power-law fit.
///
/// - at least two distinct days
/// - every day `>= 1`
/// - every retention finite and `> 0`
/// - retention non-increasing in day (unless `allow_non_monotone`)
pub fn validate_observations(
    observations: &[RetentionObservation],
    allow_non_monotone: bool,
) -> Result<(), LtvError> {
    if let Some(o) = observations.iter().find(|o| o.day == 0) {
        return Err(LtvError::InvalidObservations(format!(
            "day must be >= 1 (got day {} with retention {}).",
            o.day, o.retention
        )));
    }
    if let Some(o) = observations
        .iter()
        .find(|o| !(o.retention.is_finite() && o.retention > 0.0))
    {
        return Err(LtvError::InvalidObservations(format!(
            "retention must be > 0 (got {} on day {}).",
            o.retention, o.day
        )));
    }

    let mut sorted = observations.to_vec();
    sorted.sort_by_key(|o| o.day);

    let mut distinct = sorted.iter().map(|o| o.day).collect::<Vec<_>>();
    distinct.dedup();
    if distinct.len() < 2 {
        return Err(LtvError::InvalidObservations(format!(
            "need at least 2 distinct days, got {}.",
            distinct.len()
        )));
    }

    if !allow_non_monotone {
        for w in sorted.windows(2) {
            if w[1].day > w[0].day && w[1].retention > w[0].retention {
                return Err(LtvError::InvalidObservations(format!(
                    "retention rises from {} on day {} to {} on day {}.",
                    w[0].retention, w[0].day, w[1].retention, w[1].day
                )));
            }
        }
    }

    Ok(())
}

fn levenberg_marquardt(
    days: &[f64],
    y: &[f64],
    start: CurveParameters,
    opts: &FitOptions,
) -> Result<PowerLawFit, LtvError> {
    let n = days.len();
    let (mut a, mut b) = (start.a, start.b);

    let mut sse = sum_squared_residuals(days, y, a, b);
    if !sse.is_finite() {
        return Err(LtvError::FitDidNotConverge(format!(
            "non-finite residuals at start point a={a}, b={b}."
        )));
    }
    let mut evaluations = 1usize;
    let mut iterations = 0usize;
    let mut lambda = INITIAL_LAMBDA;

    let mut jac = DMatrix::<f64>::zeros(n, 2);
    let mut r = DVector::<f64>::zeros(n);
    let mut row = [0.0; 2];

    loop {
        for i in 0..n {
            fill_jacobian_row(a, b, days[i], &mut row);
            jac[(i, 0)] = row[0];
            jac[(i, 1)] = row[1];
            r[i] = y[i] - predict(a, b, days[i]);
        }

        let r_norm = r.norm();
        if r_norm == 0.0 {
            return Ok(finish(a, b, sse, iterations, n));
        }

        let scale = [
            jac.column(0).norm().max(MIN_SCALE),
            jac.column(1).norm().max(MIN_SCALE),
        ];
        let grad = jac.transpose() * &r;
        let cosine = (grad[0].abs() / (scale[0] * r_norm)).max(grad[1].abs() / (scale[1] * r_norm));
        if cosine <= opts.gtol {
            return Ok(finish(a, b, sse, iterations, n));
        }

        // Inner loop: grow λ until a step lowers the SSE.
        loop {
            if evaluations >= opts.max_evaluations {
                return Err(LtvError::FitDidNotConverge(format!(
                    "no convergence after {evaluations} evaluations (a={a}, b={b})."
                )));
            }

            let step = damped_step(&jac, &r, scale, lambda).ok_or_else(|| {
                LtvError::FitDidNotConverge(format!("singular damped system at a={a}, b={b}."))
            })?;

            // Reduction the linearized model promises for this step.
            let scaled_step = (scale[0] * step[0]).powi(2) + (scale[1] * step[1]).powi(2);
            let predicted = (&jac * &step).norm_squared() + 2.0 * lambda * scaled_step;

            let (a_new, b_new) = (a + step[0], b + step[1]);
            let sse_new = sum_squared_residuals(days, y, a_new, b_new);
            evaluations += 1;

            let step_small = step.norm() <= opts.xtol * ((a * a + b * b).sqrt() + opts.xtol);

            if sse_new.is_finite() && sse_new < sse {
                let reduction = sse - sse_new;
                let sse_old = sse;
                a = a_new;
                b = b_new;
                sse = sse_new;
                iterations += 1;
                lambda = (lambda / 10.0).max(MIN_LAMBDA);

                let settled = reduction <= opts.ftol * sse_old && predicted <= opts.ftol * sse_old;
                if settled || step_small {
                    return Ok(finish(a, b, sse, iterations, n));
                }
                break;
            }

            if step_small {
                return Ok(finish(a, b, sse, iterations, n));
            }

            lambda *= 10.0;
            if lambda > MAX_LAMBDA {
                return Err(LtvError::FitDidNotConverge(format!(
                    "damping exceeded {MAX_LAMBDA:e} without improvement (a={a}, b={b})."
                )));
            }
        }
    }
}

fn damped_step(
    jac: &DMatrix<f64>,
    r: &DVector<f64>,
    scale: [f64; 2],
    lambda: f64,
) -> Option<DVector<f64>> {
    let n = jac.nrows();
    let sl = lambda.sqrt();

    let mut aug = DMatrix::<f64>::zeros(n + 2, 2);
    aug.rows_mut(0, n).copy_from(jac);
    aug[(n, 0)] = sl * scale[0];
    aug[(n + 1, 1)] = sl * scale[1];

    let mut rhs = DVector::<f64>::zeros(n + 2);
    rhs.rows_mut(0, n).copy_from(r);

    solve_least_squares(&aug, &rhs)
}

/// Log-log ordinary least squares: `ln y = ln a - b ln x`.
fn log_linear_start(days: &[f64], y: &[f64]) -> Option<CurveParameters> {
    let n = days.len();
    let mut x = DMatrix::<f64>::zeros(n, 2);
    let mut ly = DVector::<f64>::zeros(n);
    for i in 0..n {
        x[(i, 0)] = 1.0;
        x[(i, 1)] = -days[i].ln();
        ly[i] = y[i].ln();
    }
    let beta = solve_least_squares(&x, &ly)?;
    let a = beta[0].exp();
    let b = beta[1];
    if a.is_finite() && b.is_finite() {
        Some(CurveParameters { a, b })
    } else {
        None
    }
}

fn sum_squared_residuals(days: &[f64], y: &[f64], a: f64, b: f64) -> f64 {
    days.iter()
        .zip(y.iter())
        .map(|(&x, &yi)| {
            let r = yi - predict(a, b, x);
            r * r
        })
        .sum()
}

fn finish(a: f64, b: f64, sse: f64, iterations: usize, n: usize) -> PowerLawFit {
    PowerLawFit {
        params: CurveParameters { a, b },
        quality: FitQuality {
            sse,
            rmse: (sse / n as f64).sqrt(),
            iterations,
            n,
        },
    }
}
