//! Engineered signals computed per region group.
//!
//! - Doubling time: three-point local regression over raw or smoothed counts
//! - Group engine: smoothing plus both doubling-time passes per region
//!
//! # Example
//!
//! ```
//! use covid_features::features::{doubling_time, DoublingRateEstimator};
//!
//! assert_eq!(doubling_time(&[2.0, 4.0, 6.0]).unwrap(), 2.0);
//!
//! let series = vec![Some(2.0), Some(4.0), Some(6.0)];
//! let rates = DoublingRateEstimator::new().estimate(&series);
//! assert_eq!(rates, vec![None, None, Some(2.0)]);
//! ```

pub mod doubling;
pub mod engine;

pub use doubling::{
    doubling_time, fit_centered_line, DoublingRateEstimator, LineFit, DOUBLING_WINDOW,
};
pub use engine::{FeatureSet, GroupFeatureEngine, GroupFeatures};
