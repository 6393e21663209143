//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - retention inputs (`RetentionObservation`)
//! - fit outputs (`CurveParameters`, `PowerLawFit`)
//! - monetization inputs and projection outputs (`MonetizationInputs`, `ProjectionResult`)

pub mod types;

pub use types::*;
