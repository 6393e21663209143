//! Decimal rounding for reported money/day values.
//!
//! Rounding goes through the shortest correctly-rounded decimal rendering of
//! the stored binary value, so a value such as `2.675` (stored as
//! `2.67499999...`) rounds down, and exact binary ties go to the even digit.

/// Round `value` to `decimals` decimal places.
///
/// Non-finite inputs are returned unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.prec$}", prec = decimals as usize)
        .parse::<f64>()
        .unwrap_or(value)
}
