//! Break-even scenario sweep.
//!
//! Evaluates every `(cpi, goal)` pair against one engine. Pairs are independent,
//! so they are computed in parallel; output order is row-major over the inputs
//! (all goals for the first CPI, then the next CPI).

use rayon::prelude::*;

use crate::domain::{BreakEvenSearch, MAX_HORIZON_DAY, ScenarioRow};
use crate::error::LtvError;
use crate::math::round_to;
use crate::projection::engine::ProjectionEngine;

pub fn break_even_matrix(
    engine: &ProjectionEngine,
    arpdau: f64,
    cpis: &[f64],
    goals_percent: &[f64],
    search: BreakEvenSearch,
) -> Result<Vec<ScenarioRow>, LtvError> {
    if cpis.iter().any(|&c| c == 0.0) {
        return Err(LtvError::DivisionByZero);
    }

    let pairs: Vec<(f64, f64)> = cpis
        .iter()
        .flat_map(|&cpi| goals_percent.iter().map(move |&goal| (cpi, goal)))
        .collect();

    pairs
        .par_iter()
        .map(|&(cpi, goal)| -> Result<ScenarioRow, LtvError> {
            let break_even_day = engine.find_break_even_day_with(goal, arpdau, cpi, search)?;
            let ltv_at_break_even = if break_even_day > 0 {
                round_to(engine.cumulative_ltv(arpdau, break_even_day)?, 3)
            } else {
                0.0
            };
            let max_roas_percent = engine.roas_at_day(arpdau, cpi, MAX_HORIZON_DAY)?;
            Ok(ScenarioRow {
                cpi,
                roas_goal_percent: goal,
                break_even_day,
                ltv_at_break_even,
                max_roas_percent,
            })
        })
        .collect()
}
