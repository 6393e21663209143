//! LTV / ROAS projection.
//!
//! Responsibilities:
//!
//! - build the retained-probability series once per fitted curve (`series`)
//! - derive LTV, lifetime days, ROAS, break-even and day tables (`engine`)
//! - sweep break-even across CPI / goal scenarios (`scenario`)

pub mod engine;
pub mod scenario;
pub mod series;

pub use engine::*;
pub use scenario::*;
pub use series::*;
