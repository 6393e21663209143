//! Shared "projection pipeline" logic used by the `project` and `sweep` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! observations -> fit -> projection engine -> projection -> report
//!
//! The commands can then focus on presentation (printing vs exports).

use tracing::{debug, info};

use crate::domain::{LtvConfig, PowerLawFit, ScenarioRow};
use crate::error::AppError;
use crate::fit::{FitOptions, fit_power_law};
use crate::projection::{ProjectionEngine, break_even_matrix};
use crate::report::{LtvReport, assemble_report};

/// All computed outputs of a single `ltv project` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub fit: PowerLawFit,
    pub engine: ProjectionEngine,
    pub report: LtvReport,
}

/// Fit the retention curve and build the projection engine.
pub fn fit_engine(config: &LtvConfig) -> Result<(PowerLawFit, ProjectionEngine), AppError> {
    let opts = FitOptions {
        allow_non_monotone: config.allow_non_monotone,
        retry_from_log_linear: config.retry_fit,
        ..FitOptions::default()
    };

    let fit = fit_power_law(&config.observations, &opts)?;
    info!(
        a = fit.params.a,
        b = fit.params.b,
        sse = fit.quality.sse,
        iterations = fit.quality.iterations,
        "fitted retention curve"
    );

    let engine = ProjectionEngine::new(fit.params);
    Ok((fit, engine))
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_projection(config: &LtvConfig) -> Result<RunOutput, AppError> {
    let (fit, engine) = fit_engine(config)?;

    let result = engine.project(&config.inputs, config.search)?;
    debug!(
        ltv = result.ltv,
        roas = result.roas_percent,
        break_even_day = result.break_even_day,
        "projection complete"
    );

    let report = assemble_report(&config.observations, &fit, &config.inputs, result, &engine)?;

    Ok(RunOutput { fit, engine, report })
}

/// Fit once, then sweep break-even across CPI / goal pairs.
pub fn run_sweep(
    config: &LtvConfig,
    cpis: &[f64],
    goals_percent: &[f64],
) -> Result<(PowerLawFit, Vec<ScenarioRow>), AppError> {
    let (fit, engine) = fit_engine(config)?;
    let rows = break_even_matrix(&engine, config.inputs.arpdau, cpis, goals_percent, config.search)?;
    debug!(scenarios = rows.len(), "sweep complete");
    Ok((fit, rows))
}
