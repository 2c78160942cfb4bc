//! Series and table transformations.
//!
//! Provides the wide-to-long reshape, Savitzky-Golay smoothing, and
//! trailing window functions.
//!
//! # Example
//!
//! ```
//! use covid_features::transform::{SavitzkyGolay, SmoothingConfig};
//!
//! let filter = SavitzkyGolay::new(SmoothingConfig::default()).unwrap();
//! let smoothed = filter.smooth(&[1.0, 2.0, 6.0, 4.0, 5.0, 9.0]).unwrap();
//! assert_eq!(smoothed.len(), 6);
//! ```

pub mod reshape;
pub mod smoothing;
pub mod window;

pub use reshape::{parse_date, RelationalTransformer};
pub use smoothing::{MissingValuePolicy, SavitzkyGolay, SmoothingConfig};
pub use window::rolling_apply;
