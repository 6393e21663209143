//! Command-line parsing for the LTV projector.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{BreakEvenSearch, MAX_REPORT_HORIZON_DAY};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ltv", version, about = "Mobile app LTV and break-even projector")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit the retention curve, project LTV/ROAS and find the break-even day.
    Project(ProjectArgs),
    /// Break-even days across a grid of CPIs and ROAS goals.
    Sweep(SweepArgs),
    /// Plot a previously exported report JSON.
    Plot(PlotArgs),
    /// Show genre/geo retention and ARPDAU benchmarks (advisory only).
    Benchmark(BenchmarkArgs),
}

/// Retention and monetization inputs shared by `project` and `sweep`.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Day 1 retention (%).
    #[arg(long, default_value_t = 30.5)]
    pub d1: f64,

    /// Day 7 retention (%).
    #[arg(long, default_value_t = 10.5)]
    pub d7: f64,

    /// Day 30 retention (%).
    #[arg(long, default_value_t = 3.5)]
    pub d30: f64,

    /// Additional observation as DAY:PERCENT (repeatable), e.g. `--point 14:6.2`.
    #[arg(long = "point", value_name = "DAY:PCT", value_parser = parse_point)]
    pub points: Vec<(u32, f64)>,

    /// Average revenue per daily active user (USD).
    #[arg(long, default_value_t = 0.5)]
    pub arpdau: f64,

    /// Cost per install (USD).
    #[arg(long, default_value_t = 1.0)]
    pub cpi: f64,

    /// ROAS goal (%), e.g. 120 means every 1 USD spent returns 1.20 USD.
    #[arg(long, default_value_t = 120.0)]
    pub roas_goal: f64,

    /// Prediction end day.
    #[arg(
        long,
        default_value_t = 90,
        value_parser = clap::value_parser!(u32).range(0..=MAX_REPORT_HORIZON_DAY as i64)
    )]
    pub horizon: u32,

    /// Accept retention that rises with day instead of rejecting it.
    #[arg(long)]
    pub allow_non_monotone: bool,

    /// Retry a failed fit once from a log-log linear start.
    #[arg(long)]
    pub retry_fit: bool,

    /// Break-even search strategy.
    #[arg(long, value_enum, default_value_t = BreakEvenSearch::Linear)]
    pub search: BreakEvenSearch,
}

impl Default for InputArgs {
    fn default() -> Self {
        Self {
            d1: 30.5,
            d7: 10.5,
            d30: 3.5,
            points: Vec::new(),
            arpdau: 0.5,
            cpi: 1.0,
            roas_goal: 120.0,
            horizon: 90,
            allow_non_monotone: false,
            retry_fit: false,
            search: BreakEvenSearch::Linear,
        }
    }
}

#[derive(Debug, Parser, Clone)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the day-indexed LTV table to CSV.
    #[arg(long)]
    pub export_ltv: Option<PathBuf>,

    /// Export the full report (fit + projection + curve) to JSON.
    #[arg(long)]
    pub export_report: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct SweepArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// CPI values (USD) to evaluate.
    #[arg(long, value_delimiter = ',', default_values_t = [0.5, 1.0, 1.5, 2.0, 3.0])]
    pub cpis: Vec<f64>,

    /// ROAS goals (%) to evaluate.
    #[arg(long, value_delimiter = ',', default_values_t = [100.0, 120.0, 150.0, 200.0])]
    pub goals: Vec<f64>,
}

/// Options for plotting a saved report.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Report JSON file produced by `ltv project --export-report`.
    #[arg(long, value_name = "JSON")]
    pub report: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Parser)]
pub struct BenchmarkArgs {
    /// Game genre, e.g. "Puzzle".
    #[arg(long, requires = "geo")]
    pub genre: Option<String>,

    /// Main geo, e.g. "US".
    #[arg(long, requires = "genre")]
    pub geo: Option<String>,

    /// List the available genres and geos.
    #[arg(long)]
    pub list: bool,
}

/// Parse `DAY:PERCENT`.
fn parse_point(raw: &str) -> Result<(u32, f64), String> {
    let (day, pct) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected DAY:PERCENT, got '{raw}'"))?;
    let day = day
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid day '{day}': {e}"))?;
    let pct = pct
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid percent '{pct}': {e}"))?;
    Ok((day, pct))
}
