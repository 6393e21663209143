//! `ltv-curves` library crate.
//!
//! The binary (`ltv`) is a thin wrapper around this library so that:
//!
//! - the fit and projection core is testable without spawning processes
//! - front-ends other than the CLI can reuse the same pipeline
//!
//! Core flow: `fit` (power-law retention curve) -> `projection` (LTV, ROAS,
//! break-even) -> `report` (packaging for display).

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod projection;
pub mod report;
