//! Pipeline configuration.
//!
//! [`PipelineConfig`] carries the single data-root parameter and resolves
//! the file layout below it. [`FeatureConfig`] holds library-level tuning
//! of the feature transform.

use crate::error::{FeatureError, Result};
use crate::transform::SmoothingConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Location of the cumulative confirmed-cases table inside `raw/`.
pub const WIDE_TABLE_RELATIVE: &str = "JH_dataset/COVID-19/csse_covid_19_data/\
csse_covid_19_time_series/time_series_covid19_confirmed_global.csv";

pub const RELATIONAL_FILE: &str = "COVID_relational_full.csv";
pub const ENRICHED_FILE: &str = "COVID_final_set.csv";

/// Rows with at most this many raw confirmed cases get no smoothed doubling rate.
pub const DEFAULT_MASK_THRESHOLD: u64 = 100;

/// Data directory layout rooted at one path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    data_root: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new("data")
    }
}

impl PipelineConfig {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
        }
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.data_root.join("raw")
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.data_root.join("processed")
    }

    /// Wide source table supplied by the dataset provider.
    pub fn wide_table_path(&self) -> PathBuf {
        self.raw_dir().join(WIDE_TABLE_RELATIVE)
    }

    /// Long-form table written by the reshape stage.
    pub fn relational_path(&self) -> PathBuf {
        self.processed_dir().join(RELATIONAL_FILE)
    }

    /// Enriched table written by the feature stage.
    pub fn enriched_path(&self) -> PathBuf {
        self.processed_dir().join(ENRICHED_FILE)
    }

    /// Create `raw/` and `processed/` if they do not exist.
    pub fn ensure_layout(&self) -> Result<()> {
        for dir in [self.raw_dir(), self.processed_dir()] {
            fs::create_dir_all(&dir).map_err(|e| FeatureError::io(&dir, &e))?;
        }
        Ok(())
    }
}

/// Tuning of the feature transform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureConfig {
    /// Savitzky-Golay window, degree and missing-value policy.
    pub smoothing: SmoothingConfig,
    /// Raw-count threshold at or below which the smoothed doubling rate is nulled.
    pub mask_threshold: u64,
    /// Distribute region groups across the rayon pool.
    pub parallel: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            smoothing: SmoothingConfig::default(),
            mask_threshold: DEFAULT_MASK_THRESHOLD,
            parallel: true,
        }
    }
}

impl FeatureConfig {
    pub fn with_smoothing(mut self, smoothing: SmoothingConfig) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_mask_threshold(mut self, threshold: u64) -> Self {
        self.mask_threshold = threshold;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.smoothing.validate()
    }
}
