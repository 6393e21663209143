//! Day-by-day LTV / ROAS projection over a fitted retention curve.
//!
//! All metrics read from one `RetainedSeries`, so values agree across calls:
//!
//! - LTV over a horizon `H`: `arpdau · Σ series[0..max(H, 1)]`
//!   (days 0 through `H - 1`; `H = 0` keeps the install-day seed term)
//! - lifetime days: `Σ series[1..H]`
//! - day tables: `arpdau · Σ series[0..=d]` for each reported day `d`
//! - break-even: first day `i` in `1..=720` with `ROAS(i) >= goal`

use std::collections::BTreeMap;

use crate::domain::{
    BreakEvenSearch, CurveParameters, CurvePoint, MAX_HORIZON_DAY, MonetizationInputs,
    ProjectionResult, STANDARD_DAYS,
};
use crate::error::LtvError;
use crate::math::round_to;
use crate::projection::series::RetainedSeries;

/// ROAS in percent: `ltv / cpi · 100`, rounded to 3 decimals.
pub fn compute_roas(ltv: f64, cpi: f64) -> Result<f64, LtvError> {
    if cpi == 0.0 {
        return Err(LtvError::DivisionByZero);
    }
    Ok(round_to(ltv / cpi * 100.0, 3))
}

fn check_horizon(horizon_day: u32) -> Result<(), LtvError> {
    if horizon_day > MAX_HORIZON_DAY {
        return Err(LtvError::HorizonOutOfRange {
            horizon: horizon_day,
            max: MAX_HORIZON_DAY,
        });
    }
    Ok(())
}

/// Projection engine bound to one fitted curve.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    params: CurveParameters,
    series: RetainedSeries,
}

impl ProjectionEngine {
    pub fn new(params: CurveParameters) -> Self {
        Self {
            params,
            series: RetainedSeries::build(&params),
        }
    }

    pub fn params(&self) -> CurveParameters {
        self.params
    }

    pub fn series(&self) -> &RetainedSeries {
        &self.series
    }

    fn retained_through(&self, day: u32) -> Result<f64, LtvError> {
        self.series.sum_through(day).ok_or(LtvError::HorizonOutOfRange {
            horizon: day,
            max: MAX_HORIZON_DAY,
        })
    }

    /// Unrounded cumulative LTV through `day` (inclusive).
    pub fn cumulative_ltv(&self, arpdau: f64, day: u32) -> Result<f64, LtvError> {
        Ok(self.retained_through(day)? * arpdau)
    }

    /// LTV over `horizon_day` days, rounded to 3 decimals.
    pub fn project_ltv(&self, arpdau: f64, horizon_day: u32) -> Result<f64, LtvError> {
        check_horizon(horizon_day)?;
        let last = horizon_day.saturating_sub(1);
        Ok(round_to(self.retained_through(last)? * arpdau, 3))
    }

    /// Expected active days after install, rounded to 3 decimals.
    pub fn project_lifetime_days(&self, horizon_day: u32) -> Result<f64, LtvError> {
        check_horizon(horizon_day)?;
        Ok(round_to(self.series.sum_after_install(horizon_day), 3))
    }

    /// Cumulative LTV at each of `STANDARD_DAYS`, rounded to 2 decimals.
    pub fn standard_day_ltv(&self, arpdau: f64) -> BTreeMap<u32, f64> {
        STANDARD_DAYS
            .iter()
            .filter_map(|&day| {
                let retained = self.series.sum_through(day)?;
                Some((day, round_to(retained * arpdau, 2)))
            })
            .collect()
    }

    /// Cumulative LTV for every day index in `[0, horizon_day)`, rounded to 2 decimals.
    pub fn detailed_day_ltv(
        &self,
        arpdau: f64,
        horizon_day: u32,
    ) -> Result<BTreeMap<u32, f64>, LtvError> {
        check_horizon(horizon_day)?;
        (0..horizon_day)
            .map(|day| -> Result<(u32, f64), LtvError> {
                Ok((day, round_to(self.retained_through(day)? * arpdau, 2)))
            })
            .collect()
    }

    /// ROAS (percent, 3 decimals) with revenue accumulated through `day`.
    pub fn roas_at_day(&self, arpdau: f64, cpi: f64, day: u32) -> Result<f64, LtvError> {
        let ltv = self.cumulative_ltv(arpdau, day)?;
        compute_roas(ltv, cpi)
    }

    /// First day in `1..=720` whose ROAS reaches `roas_goal_percent`; `0` if none.
    pub fn find_break_even_day(
        &self,
        roas_goal_percent: f64,
        arpdau: f64,
        cpi: f64,
    ) -> Result<u32, LtvError> {
        self.find_break_even_day_with(roas_goal_percent, arpdau, cpi, BreakEvenSearch::Linear)
    }

    pub fn find_break_even_day_with(
        &self,
        roas_goal_percent: f64,
        arpdau: f64,
        cpi: f64,
        search: BreakEvenSearch,
    ) -> Result<u32, LtvError> {
        if cpi == 0.0 {
            return Err(LtvError::DivisionByZero);
        }

        let bisect_safe = arpdau >= 0.0 && cpi > 0.0 && self.series.is_monotone_decay();
        match search {
            BreakEvenSearch::Bisect if bisect_safe => self.bisect_break_even(roas_goal_percent, arpdau, cpi),
            _ => self.linear_break_even(roas_goal_percent, arpdau, cpi),
        }
    }

    fn linear_break_even(&self, goal: f64, arpdau: f64, cpi: f64) -> Result<u32, LtvError> {
        for day in 1..=MAX_HORIZON_DAY {
            if self.roas_at_day(arpdau, cpi, day)? >= goal {
                return Ok(day);
            }
        }
        Ok(0)
    }

    fn bisect_break_even(&self, goal: f64, arpdau: f64, cpi: f64) -> Result<u32, LtvError> {
        if self.roas_at_day(arpdau, cpi, MAX_HORIZON_DAY)? < goal {
            return Ok(0);
        }

        // Invariant: the goal is reached at `hi` and not before `lo`.
        let (mut lo, mut hi) = (1u32, MAX_HORIZON_DAY);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.roas_at_day(arpdau, cpi, mid)? >= goal {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        Ok(hi)
    }

    /// Fitted retention for days `1..=horizon_day` (the install-day seed is not part of the curve).
    pub fn retention_curve(&self, horizon_day: u32) -> Result<Vec<CurvePoint>, LtvError> {
        check_horizon(horizon_day)?;
        Ok(self
            .series
            .values()
            .iter()
            .zip(0u32..)
            .skip(1)
            .take(horizon_day as usize)
            .map(|(&retention, day)| CurvePoint { day, retention })
            .collect())
    }

    /// Run every metric for one request.
    pub fn project(
        &self,
        inputs: &MonetizationInputs,
        search: BreakEvenSearch,
    ) -> Result<ProjectionResult, LtvError> {
        let ltv = self.project_ltv(inputs.arpdau, inputs.horizon_day)?;
        let lifetime_days = self.project_lifetime_days(inputs.horizon_day)?;
        let roas_percent = compute_roas(ltv, inputs.cpi)?;
        let break_even_day = self.find_break_even_day_with(
            inputs.roas_goal_percent,
            inputs.arpdau,
            inputs.cpi,
            search,
        )?;
        let day_ltv = self.detailed_day_ltv(inputs.arpdau, inputs.horizon_day)?;
        let standard_day_ltv = self.standard_day_ltv(inputs.arpdau);

        Ok(ProjectionResult {
            ltv,
            lifetime_days,
            roas_percent,
            break_even_day,
            day_ltv,
            standard_day_ltv,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ProjectionEngine {
        ProjectionEngine::new(CurveParameters { a: 0.3, b: 0.5 })
    }

    #[test]
    fn degenerate_horizons_keep_seed_term() {
        let e = engine();
        assert_eq!(e.project_ltv(0.5, 0).unwrap(), 0.5);
        assert_eq!(e.project_ltv(0.5, 1).unwrap(), 0.5);
        assert_eq!(e.project_ltv(1.234, 0).unwrap(), 1.234);
        assert_eq!(e.project_lifetime_days(0).unwrap(), 0.0);
        // 1.0005 is stored just below the halfway point.
        assert_eq!(e.project_ltv(1.0005, 0).unwrap(), 1.0);
        assert_eq!(e.project_ltv(1.0005, 1).unwrap(), 1.0);
    }

    #[test]
    fn small_horizon_values() {
        let e = engine();
        // Days 0..=3: 1 + 0.3 + 0.3/sqrt(2) + 0.3/sqrt(3)
        let expected = 1.0 + 0.3 + 0.3 / 2f64.sqrt() + 0.3 / 3f64.sqrt();
        assert_eq!(e.project_ltv(1.0, 4).unwrap(), round_to(expected, 3));
        assert_eq!(e.project_lifetime_days(4).unwrap(), round_to(expected - 1.0, 3));
    }

    #[test]
    fn horizon_above_cap_fails() {
        let e = engine();
        assert_eq!(
            e.project_ltv(0.5, 721),
            Err(LtvError::HorizonOutOfRange { horizon: 721, max: 720 })
        );
        assert!(e.project_ltv(0.5, 720).is_ok());
        assert!(e.detailed_day_ltv(0.5, 721).is_err());
        assert!(e.project_lifetime_days(800).is_err());
        assert_eq!(
            e.cumulative_ltv(0.5, u32::MAX),
            Err(LtvError::HorizonOutOfRange { horizon: u32::MAX, max: 720 })
        );
        assert!(e.retention_curve(721).is_err());
        assert_eq!(e.retention_curve(720).unwrap().last().map(|p| p.day), Some(720));
    }

    #[test]
    fn roas_rejects_zero_cpi() {
        assert_eq!(compute_roas(1.0, 0.0), Err(LtvError::DivisionByZero));
        assert_eq!(compute_roas(1.2, 1.0).unwrap(), 120.0);
        assert_eq!(compute_roas(1.0, 3.0).unwrap(), 33.333);
    }

    #[test]
    fn detailed_table_matches_prefix_rule() {
        let e = engine();
        let table = e.detailed_day_ltv(0.5, 10).unwrap();
        assert_eq!(table.len(), 10);
        assert_eq!(table[&0], 0.5);
        for (&d, &v) in &table {
            let unrounded = e.cumulative_ltv(0.5, d).unwrap();
            assert_eq!(v, round_to(unrounded, 2));
        }
    }

    #[test]
    fn standard_days_are_fixed() {
        let t = engine().standard_day_ltv(0.5);
        assert_eq!(t.keys().copied().collect::<Vec<_>>(), STANDARD_DAYS.to_vec());
        // Day 1 covers the seed plus day 1: (1 + 0.3) · 0.5
        assert_eq!(t[&1], 0.65);
    }

    #[test]
    fn break_even_zero_goal_is_day_one() {
        let e = engine();
        assert_eq!(e.find_break_even_day(0.0, 0.5, 1.0).unwrap(), 1);
        assert_eq!(e.find_break_even_day(0.0, 0.0, 1.0).unwrap(), 1);
    }

    #[test]
    fn break_even_first_crossing() {
        let e = engine();
        let day = e.find_break_even_day(120.0, 0.5, 1.0).unwrap();
        assert!(day > 1);
        assert!(e.roas_at_day(0.5, 1.0, day).unwrap() >= 120.0);
        assert!(e.roas_at_day(0.5, 1.0, day - 1).unwrap() < 120.0);
    }

    #[test]
    fn break_even_not_reached_returns_sentinel() {
        let e = engine();
        let max_roas = e.roas_at_day(0.01, 10.0, MAX_HORIZON_DAY).unwrap();
        assert!(max_roas < 100.0);
        assert_eq!(e.find_break_even_day(100.0, 0.01, 10.0).unwrap(), 0);
        assert_eq!(
            e.find_break_even_day_with(100.0, 0.01, 10.0, BreakEvenSearch::Bisect).unwrap(),
            0
        );
    }

    #[test]
    fn break_even_zero_cpi_fails() {
        assert_eq!(
            engine().find_break_even_day(120.0, 0.5, 0.0),
            Err(LtvError::DivisionByZero)
        );
    }

    #[test]
    fn bisect_agrees_with_linear_scan() {
        let e = engine();
        for goal in [0.0, 50.0, 65.0, 100.0, 120.0, 250.0, 900.0, 5000.0] {
            let linear = e.find_break_even_day(goal, 0.5, 1.0).unwrap();
            let bisect = e
                .find_break_even_day_with(goal, 0.5, 1.0, BreakEvenSearch::Bisect)
                .unwrap();
            assert_eq!(linear, bisect, "goal {goal}");
        }
    }

    #[test]
    fn bisect_falls_back_for_rising_curve() {
        // Retention grows with day: bisection is unsafe, linear scan is used.
        let e = ProjectionEngine::new(CurveParameters { a: 0.1, b: -0.2 });
        let linear = e.find_break_even_day(150.0, 0.5, 1.0).unwrap();
        let bisect = e
            .find_break_even_day_with(150.0, 0.5, 1.0, BreakEvenSearch::Bisect)
            .unwrap();
        assert_eq!(linear, bisect);
    }

    #[test]
    fn retention_curve_covers_horizon() {
        let e = engine();
        let c = e.retention_curve(30).unwrap();
        assert_eq!(c.len(), 30);
        assert_eq!(c[0].day, 1);
        assert!((c[0].retention - 0.3).abs() < 1e-15);
        assert_eq!(c[29].day, 30);
        assert!(e.retention_curve(0).unwrap().is_empty());
    }

    #[test]
    fn project_bundles_metrics() {
        let e = engine();
        let inputs = MonetizationInputs {
            arpdau: 0.5,
            cpi: 1.0,
            roas_goal_percent: 120.0,
            horizon_day: 90,
        };
        let r = e.project(&inputs, BreakEvenSearch::Linear).unwrap();
        assert_eq!(r.ltv, e.project_ltv(0.5, 90).unwrap());
        assert_eq!(r.roas_percent, compute_roas(r.ltv, 1.0).unwrap());
        assert_eq!(r.lifetime_days, e.project_lifetime_days(90).unwrap());
        assert_eq!(r.day_ltv.len(), 90);
        assert_eq!(r.standard_day_ltv.len(), STANDARD_DAYS.len());
        assert_eq!(r.break_even_day, e.find_break_even_day(120.0, 0.5, 1.0).unwrap());

        let zero_cpi = MonetizationInputs { cpi: 0.0, ..inputs };
        assert_eq!(e.project(&zero_cpi, BreakEvenSearch::Linear).unwrap_err(), LtvError::DivisionByZero);
    }
}
