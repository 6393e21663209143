//! The retained-probability series shared by every projection metric.
//!
//! Index 0 holds `1.0` (install day, retained with certainty); index `i >= 1`
//! holds `a · i^(-b)`. The series always covers day 0 through
//! `MAX_HORIZON_DAY`, so it is built once per fitted curve.
//!
//! Running sums are accumulated left to right, which yields exactly the same
//! floating-point values as summing each prefix from scratch.

use crate::domain::{CurveParameters, MAX_HORIZON_DAY};
use crate::models::evaluate;

#[derive(Debug, Clone)]
pub struct RetainedSeries {
    values: Vec<f64>,
    /// `cumulative[i] = values[0] + ... + values[i]`.
    cumulative: Vec<f64>,
}

impl RetainedSeries {
    pub fn build(params: &CurveParameters) -> Self {
        let len = MAX_HORIZON_DAY as usize + 1;
        let mut values = Vec::with_capacity(len);
        let mut cumulative = Vec::with_capacity(len);

        values.push(1.0);
        cumulative.push(1.0);
        let mut running = 1.0;
        for day in 1..=MAX_HORIZON_DAY {
            let v = evaluate(params, day);
            running += v;
            values.push(v);
            cumulative.push(running);
        }

        Self { values, cumulative }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum of `values[0..=day]`; `None` past `MAX_HORIZON_DAY`.
    pub fn sum_through(&self, day: u32) -> Option<f64> {
        self.cumulative.get(day as usize).copied()
    }

    /// Sum of `values[1..end]` (install day excluded); `0.0` when `end <= 1`.
    pub fn sum_after_install(&self, end: u32) -> f64 {
        self.values
            .iter()
            .take(end as usize)
            .skip(1)
            .sum()
    }

    /// True when every day-1+ value is non-negative and non-increasing.
    ///
    /// Under this condition cumulative LTV is non-decreasing and grows by
    /// ever-smaller amounts, which is what makes bisection safe.
    pub fn is_monotone_decay(&self) -> bool {
        let tail = &self.values[1..];
        tail.iter().all(|v| v.is_finite() && *v >= 0.0) && tail.windows(2).all(|w| w[1] <= w[0])
    }
}
