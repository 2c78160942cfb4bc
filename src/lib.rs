//! # covid-features
//!
//! Feature engineering for regional cumulative case counts.
//!
//! Reshapes a wide region-by-date table into one record per region and
//! date, then derives per region a Savitzky-Golay smoothed case curve and
//! two three-point doubling-time estimates (on the raw and on the smoothed
//! counts), and merges them back onto the full table in its original order.

pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod io;
pub mod pipeline;
pub mod transform;
pub mod utils;

pub use error::{FeatureError, Result};

pub mod prelude {
    pub use crate::config::{FeatureConfig, PipelineConfig};
    pub use crate::core::{EnrichedTable, FeatureColumn, RegionKey, RelationalTable, WideTable};
    pub use crate::error::{FeatureError, Result};
    pub use crate::features::{DoublingRateEstimator, GroupFeatureEngine};
    pub use crate::pipeline::{DatasetMerger, FeaturePipeline, PipelineReport};
    pub use crate::transform::{RelationalTransformer, SavitzkyGolay, SmoothingConfig};
}
