//! Property tests for fit and projection invariants.
//!
//! Uses proptest to verify:
//! 1. Monotonicity: a decaying curve is strictly decreasing in day
//! 2. Prefix-sum consistency between the LTV tables and the horizon LTV
//! 3. Break-even first crossing (linear and bisection agree)
//! 4. Fit idempotence

use proptest::prelude::*;
use ltv_curves::domain::{BreakEvenSearch, CurveParameters, RetentionObservation};
use ltv_curves::fit::fit;
use ltv_curves::math::round_to;
use ltv_curves::models::evaluate;
use ltv_curves::projection::ProjectionEngine;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_params() -> impl Strategy<Value = CurveParameters> {
    (0.05..0.9_f64, 0.05..1.5_f64).prop_map(|(a, b)| CurveParameters { a, b })
}

fn arb_money() -> impl Strategy<Value = f64> {
    (0.01..5.0_f64).prop_map(|v| (v * 100.0).round() / 100.0)
}

/// Three decaying observations on days 1, 7, 30.
fn arb_observations() -> impl Strategy<Value = Vec<RetentionObservation>> {
    (0.1..0.6_f64, 0.2..0.9_f64, 0.2..0.9_f64).prop_map(|(d1, r7, r30)| {
        let d7 = d1 * r7;
        let d30 = d7 * r30;
        vec![
            RetentionObservation::new(1, d1),
            RetentionObservation::new(7, d7),
            RetentionObservation::new(30, d30),
        ]
    })
}

proptest! {
    #[test]
    fn decaying_curve_is_strictly_decreasing(p in arb_params()) {
        let mut prev = evaluate(&p, 1);
        for day in 2..=720 {
            let v = evaluate(&p, day);
            prop_assert!(v < prev, "day {}: {} !< {}", day, v, prev);
            prev = v;
        }
    }

    #[test]
    fn tables_agree_with_horizon_ltv(p in arb_params(), arpdau in arb_money(), horizon in 1u32..=360) {
        let engine = ProjectionEngine::new(p);
        let table = engine.detailed_day_ltv(arpdau, horizon).unwrap();
        prop_assert_eq!(table.len(), horizon as usize);
        for (&d, &v) in &table {
            let unrounded = engine.cumulative_ltv(arpdau, d).unwrap();
            prop_assert_eq!(v, round_to(unrounded, 2));
            prop_assert_eq!(engine.project_ltv(arpdau, d + 1).unwrap(), round_to(unrounded, 3));
        }
        for (&d, &v) in &engine.standard_day_ltv(arpdau) {
            prop_assert_eq!(v, round_to(engine.cumulative_ltv(arpdau, d).unwrap(), 2));
        }
    }

    #[test]
    fn break_even_is_first_crossing(
        p in arb_params(),
        arpdau in arb_money(),
        cpi in arb_money(),
        goal in 0.0..400.0_f64,
    ) {
        let engine = ProjectionEngine::new(p);
        let day = engine.find_break_even_day(goal, arpdau, cpi).unwrap();
        if day > 0 {
            prop_assert!(engine.roas_at_day(arpdau, cpi, day).unwrap() >= goal);
            if day > 1 {
                prop_assert!(engine.roas_at_day(arpdau, cpi, day - 1).unwrap() < goal);
            }
        } else {
            prop_assert!(engine.roas_at_day(arpdau, cpi, 720).unwrap() < goal);
        }

        let bisect = engine
            .find_break_even_day_with(goal, arpdau, cpi, BreakEvenSearch::Bisect)
            .unwrap();
        prop_assert_eq!(day, bisect);
    }

    #[test]
    fn zero_goal_breaks_even_on_day_one(p in arb_params(), arpdau in arb_money(), cpi in arb_money()) {
        let engine = ProjectionEngine::new(p);
        prop_assert_eq!(engine.find_break_even_day(0.0, arpdau, cpi).unwrap(), 1);
    }

    #[test]
    fn fit_is_idempotent(obs in arb_observations()) {
        let first = fit(&obs);
        let second = fit(&obs);
        prop_assert_eq!(first, second);
    }
}
