//! Savitzky-Golay smoothing.
//!
//! Each output is the value, at the window center, of a least-squares
//! polynomial of degree `D` fitted to a window of `W` consecutive
//! observations (`W` odd). The first and last `W / 2` positions have no
//! centered window; they are evaluated from the polynomial fitted to the
//! first and last full window respectively, so the output has the same
//! length as the input.

use crate::error::{FeatureError, Result};
use crate::utils::fitted_value_weights;

/// How missing observations enter the smoother.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingValuePolicy {
    /// Treat missing observations as zero counts.
    ///
    /// Early-series gaps are then smoothed as true zeros, which biases the
    /// estimates near the series start.
    #[default]
    ZeroFill,
    /// Any output whose window touches a missing observation is missing.
    Propagate,
}

/// Smoother parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmoothingConfig {
    pub window: usize,
    pub degree: usize,
    pub missing: MissingValuePolicy,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            window: 5,
            degree: 1,
            missing: MissingValuePolicy::ZeroFill,
        }
    }
}

impl SmoothingConfig {
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    pub fn with_missing(mut self, missing: MissingValuePolicy) -> Self {
        self.missing = missing;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.window == 0 || self.window % 2 == 0 {
            return Err(FeatureError::InvalidParameter(format!(
                "smoothing window must be a positive odd number, got {}",
                self.window
            )));
        }
        if self.degree >= self.window {
            return Err(FeatureError::InvalidParameter(format!(
                "smoothing degree {} must be less than window {}",
                self.degree, self.window
            )));
        }
        Ok(())
    }
}

/// Savitzky-Golay filter with precomputed convolution weights.
#[derive(Debug, Clone)]
pub struct SavitzkyGolay {
    config: SmoothingConfig,
    /// `weights[p]` evaluates the window's fit at window position `p`.
    weights: Vec<Vec<f64>>,
}

impl SavitzkyGolay {
    pub fn new(config: SmoothingConfig) -> Result<Self> {
        config.validate()?;

        let half = (config.window / 2) as f64;
        let t: Vec<f64> = (0..config.window).map(|i| i as f64 - half).collect();
        let weights = t
            .iter()
            .map(|&at| fitted_value_weights(&t, config.degree, at))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { config, weights })
    }

    pub fn config(&self) -> &SmoothingConfig {
        &self.config
    }

    pub fn window(&self) -> usize {
        self.config.window
    }

    /// Convolution weights applied at interior positions.
    pub fn coefficients(&self) -> &[f64] {
        &self.weights[self.config.window / 2]
    }

    /// Window start and evaluation position for output `i` of `n`.
    fn locate(&self, i: usize, n: usize) -> (usize, usize) {
        let w = self.config.window;
        let half = w / 2;
        if i < half {
            (0, i)
        } else if i + half >= n {
            (n - w, i + w - n)
        } else {
            (i - half, half)
        }
    }

    fn check_len(&self, n: usize) -> Result<()> {
        if n < self.config.window {
            return Err(FeatureError::InsufficientData {
                needed: self.config.window,
                got: n,
            });
        }
        Ok(())
    }

    /// Smooth a complete series.
    pub fn smooth(&self, series: &[f64]) -> Result<Vec<f64>> {
        let n = series.len();
        self.check_len(n)?;

        let w = self.config.window;
        Ok((0..n)
            .map(|i| {
                let (start, p) = self.locate(i, n);
                self.weights[p]
                    .iter()
                    .zip(&series[start..start + w])
                    .map(|(a, b)| a * b)
                    .sum()
            })
            .collect())
    }

    /// Smooth a series with gaps, handling them per the configured policy.
    pub fn smooth_missing(&self, series: &[Option<f64>]) -> Result<Vec<Option<f64>>> {
        match self.config.missing {
            MissingValuePolicy::ZeroFill => {
                let filled: Vec<f64> = series.iter().map(|v| v.unwrap_or(0.0)).collect();
                Ok(self.smooth(&filled)?.into_iter().map(Some).collect())
            }
            MissingValuePolicy::Propagate => {
                let n = series.len();
                self.check_len(n)?;

                let w = self.config.window;
                Ok((0..n)
                    .map(|i| {
                        let (start, p) = self.locate(i, n);
                        self.weights[p]
                            .iter()
                            .zip(&series[start..start + w])
                            .try_fold(0.0, |acc, (a, b)| b.map(|b| acc + a * b))
                    })
                    .collect())
            }
        }
    }
}
