//! Doubling-time estimation by local linear regression.
//!
//! Over each trailing window of three observations, a line `y = a + b*t`
//! is fitted with `t = -1, 0, 1`. With these symmetric coordinates the
//! least-squares solution is closed-form: the intercept is the window mean
//! and the slope is half the difference of the outer points. The doubling
//! time is `a / b`.
//!
//! A flat window (`b == 0`) has no finite doubling time; it is reported as
//! `f64::INFINITY` whatever the intercept.

use crate::error::{FeatureError, Result};
use crate::transform::rolling_apply;

/// Number of observations in each regression window.
pub const DOUBLING_WINDOW: usize = 3;

/// Intercept and slope of a fitted line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub intercept: f64,
    pub slope: f64,
}

impl LineFit {
    /// Ratio of intercept to slope; infinite for a flat line.
    pub fn doubling_time(&self) -> f64 {
        if self.slope == 0.0 {
            f64::INFINITY
        } else {
            self.intercept / self.slope
        }
    }
}

/// Least-squares line through three points at `t = -1, 0, 1`.
pub fn fit_centered_line(y: [f64; DOUBLING_WINDOW]) -> LineFit {
    LineFit {
        intercept: (y[0] + y[1] + y[2]) / 3.0,
        slope: (y[2] - y[0]) / 2.0,
    }
}

/// Doubling time over exactly three consecutive observations.
pub fn doubling_time(window: &[f64]) -> Result<f64> {
    let y: [f64; DOUBLING_WINDOW] = window.try_into().map_err(|_| {
        if window.len() < DOUBLING_WINDOW {
            FeatureError::InsufficientData {
                needed: DOUBLING_WINDOW,
                got: window.len(),
            }
        } else {
            FeatureError::DimensionMismatch {
                expected: DOUBLING_WINDOW,
                got: window.len(),
            }
        }
    })?;
    Ok(fit_centered_line(y).doubling_time())
}

/// Rolling three-point doubling-time estimator.
///
/// Stateless: every window is solved independently, so series can be
/// processed in any order or concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoublingRateEstimator;

impl DoublingRateEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Minimum series length that yields at least one estimate.
    pub fn min_len(&self) -> usize {
        DOUBLING_WINDOW
    }

    /// Estimate at every position of `series`.
    ///
    /// The first two positions, and positions whose window holds a missing
    /// value, are `None`.
    pub fn estimate(&self, series: &[Option<f64>]) -> Vec<Option<f64>> {
        rolling_apply(series, DOUBLING_WINDOW, |w| doubling_time(w).ok())
    }
}
