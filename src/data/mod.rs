//! External advisory data.

pub mod benchmark;

pub use benchmark::*;
