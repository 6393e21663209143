//! Retention curve fitting.
//!
//! Responsibilities:
//!
//! - validate retention observations
//! - fit the power-law model by Levenberg–Marquardt
//! - optionally retry once from a log-log linear start

pub mod fitter;

pub use fitter::*;
