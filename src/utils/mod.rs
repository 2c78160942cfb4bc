//! Numerical utilities.

pub mod ols;

pub use ols::{fitted_value_weights, polyfit, PolyFit};
