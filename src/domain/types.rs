//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting and projection
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Largest day index the projection engine supports.
pub const MAX_HORIZON_DAY: u32 = 720;

/// Largest horizon the CLI accepts for reporting.
pub const MAX_REPORT_HORIZON_DAY: u32 = 360;

/// Days shown in the LTV overview table.
pub const STANDARD_DAYS: [u32; 8] = [1, 3, 7, 14, 30, 60, 90, 360];

/// A single observed retention point.
///
/// `retention` is a fraction (`0.305` for 30.5%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetentionObservation {
    pub day: u32,
    pub retention: f64,
}

impl RetentionObservation {
    pub fn new(day: u32, retention: f64) -> Self {
        Self { day, retention }
    }

    /// Build an observation from a percent value (`30.5` -> `0.305`).
    pub fn from_percent(day: u32, percent: f64) -> Self {
        Self {
            day,
            retention: percent / 100.0,
        }
    }
}

/// Fitted power-law parameters: `retention(day) = a * day^(-b)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveParameters {
    pub a: f64,
    pub b: f64,
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    pub iterations: usize,
    pub n: usize,
}

/// Fit output: parameters plus diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerLawFit {
    pub params: CurveParameters,
    pub quality: FitQuality,
}

/// Monetization inputs for a projection request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonetizationInputs {
    /// Revenue per daily active user (USD).
    pub arpdau: f64,
    /// Cost per install (USD).
    pub cpi: f64,
    /// ROAS goal in percent (`120.0` means 120%).
    pub roas_goal_percent: f64,
    /// Projection horizon (days), `0..=MAX_HORIZON_DAY`.
    pub horizon_day: u32,
}

/// How the break-even day is searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BreakEvenSearch {
    /// Scan day 1..=720 in order.
    #[default]
    Linear,
    /// Bisect over the monotone ROAS predicate.
    ///
    /// Only used when the retained-probability series is non-negative and
    /// non-increasing; otherwise the linear scan runs instead.
    Bisect,
}

/// Computed projection for a single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// LTV at the horizon (USD, 3 decimals).
    pub ltv: f64,
    /// Expected active days after install over the horizon (3 decimals).
    pub lifetime_days: f64,
    /// ROAS at the horizon, percent (3 decimals).
    pub roas_percent: f64,
    /// First day reaching the ROAS goal; `0` when not reached within 720 days.
    pub break_even_day: u32,
    /// Cumulative LTV for every day index in `[0, horizon)` (2 decimals).
    pub day_ltv: BTreeMap<u32, f64>,
    /// Cumulative LTV for the standard reporting days (2 decimals).
    pub standard_day_ltv: BTreeMap<u32, f64>,
}

/// One point of the fitted retention curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub day: u32,
    pub retention: f64,
}

/// One cell of a break-even scenario sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRow {
    pub cpi: f64,
    pub roas_goal_percent: f64,
    pub break_even_day: u32,
    /// LTV at the break-even day (0 when not reached).
    pub ltv_at_break_even: f64,
    /// ROAS after the full 720-day window.
    pub max_roas_percent: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct LtvConfig {
    pub observations: Vec<RetentionObservation>,
    pub inputs: MonetizationInputs,

    pub allow_non_monotone: bool,
    pub retry_fit: bool,
    pub search: BreakEvenSearch,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_ltv: Option<PathBuf>,
    pub export_report: Option<PathBuf>,
}
