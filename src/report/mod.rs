//! Report assembly: package fit + projection outputs for presentation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CurvePoint, MonetizationInputs, PowerLawFit, ProjectionResult, RetentionObservation};
use crate::error::LtvError;
use crate::projection::ProjectionEngine;

pub mod format;

pub use format::*;

/// Everything a front-end needs to display one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LtvReport {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub observations: Vec<RetentionObservation>,
    pub fit: PowerLawFit,
    pub inputs: MonetizationInputs,
    pub result: ProjectionResult,
    /// Fitted retention for days `1..=horizon`.
    pub curve: Vec<CurvePoint>,
}

/// Bundle the outputs of a run. No computation beyond sampling the fitted curve.
pub fn assemble_report(
    observations: &[RetentionObservation],
    fit: &PowerLawFit,
    inputs: &MonetizationInputs,
    result: ProjectionResult,
    engine: &ProjectionEngine,
) -> Result<LtvReport, LtvError> {
    let curve = engine.retention_curve(inputs.horizon_day)?;
    Ok(LtvReport {
        tool: "ltv".to_string(),
        generated_at: Utc::now(),
        observations: observations.to_vec(),
        fit: fit.clone(),
        inputs: *inputs,
        result,
        curve,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BreakEvenSearch, CurveParameters, FitQuality};

    #[test]
    fn report_carries_inputs_and_curve() {
        let params = CurveParameters { a: 0.3, b: 0.5 };
        let fit = PowerLawFit {
            params,
            quality: FitQuality { sse: 0.0, rmse: 0.0, iterations: 0, n: 2 },
        };
        let engine = ProjectionEngine::new(params);
        let inputs = MonetizationInputs {
            arpdau: 0.5,
            cpi: 1.0,
            roas_goal_percent: 120.0,
            horizon_day: 30,
        };
        let result = engine.project(&inputs, BreakEvenSearch::Linear).unwrap();
        let obs = [RetentionObservation::new(1, 0.3), RetentionObservation::new(4, 0.15)];

        let report = assemble_report(&obs, &fit, &inputs, result.clone(), &engine).unwrap();
        assert_eq!(report.tool, "ltv");
        assert_eq!(report.observations.len(), 2);
        assert_eq!(report.inputs, inputs);
        assert_eq!(report.result.ltv, result.ltv);
        assert_eq!(report.curve.len(), 30);
        assert_eq!(report.curve[3].day, 4);
        assert!((report.curve[3].retention - 0.15).abs() < 1e-15);
    }
}
