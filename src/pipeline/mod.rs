//! End-to-end feature pipeline.
//!
//! ```text
//! wide table -> RelationalTransformer -> GroupFeatureEngine -> DatasetMerger
//!            -> low-count mask -> enriched table
//! ```
//!
//! # Example
//!
//! ```
//! use covid_features::config::FeatureConfig;
//! use covid_features::core::{RegionKey, RelationalRecord, RelationalTable};
//! use covid_features::pipeline::FeaturePipeline;
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
//! let records = (0..6)
//!     .map(|d| {
//!         RelationalRecord::new(
//!             start + chrono::Duration::days(d),
//!             RegionKey::new(None, "Italy"),
//!             Some(200 * (d as u64 + 1)),
//!         )
//!     })
//!     .collect();
//! let table = RelationalTable::new(records).unwrap();
//!
//! let pipeline = FeaturePipeline::new(FeatureConfig::default()).unwrap();
//! let (enriched, report) = pipeline.run(&table).unwrap();
//! assert_eq!(enriched.len(), table.len());
//! assert!(report.warnings.is_empty());
//! ```

pub mod aggregate;
mod mask;
mod merge;

pub use aggregate::{country_timeline, TimelineColumn};
pub use mask::apply_low_count_mask;
pub use merge::{DatasetMerger, DerivedColumn};

use crate::config::{FeatureConfig, PipelineConfig};
use crate::core::{EnrichedTable, RelationalTable};
use crate::error::{FeatureError, Result};
use crate::features::GroupFeatureEngine;
use crate::io::{self, RawDatasetProvider};
use crate::transform::RelationalTransformer;
use tracing::info;

/// Summary of one feature run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineReport {
    /// Rows in and out (always equal).
    pub rows: usize,
    /// Number of region groups processed.
    pub groups: usize,
    /// Smoothed doubling rates nulled by the low-count mask.
    pub masked: usize,
    /// Contained per-group conditions.
    pub warnings: Vec<FeatureError>,
}

/// Reshape-free core: relational table in, enriched table out.
#[derive(Debug, Clone)]
pub struct FeaturePipeline {
    config: FeatureConfig,
    engine: GroupFeatureEngine,
    merger: DatasetMerger,
}

impl FeaturePipeline {
    pub fn new(config: FeatureConfig) -> Result<Self> {
        config.validate()?;
        let engine = GroupFeatureEngine::new(&config)?;
        Ok(Self {
            config,
            engine,
            merger: DatasetMerger::new(),
        })
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Smooth, estimate both doubling rates, merge by row identity and mask.
    pub fn run(&self, table: &RelationalTable) -> Result<(EnrichedTable, PipelineReport)> {
        let features = self.engine.compute(table);
        let mut enriched = self.merger.merge(table, &features.columns())?;
        let masked = apply_low_count_mask(&mut enriched, self.config.mask_threshold);

        let report = PipelineReport {
            rows: enriched.len(),
            groups: features.groups().len(),
            masked,
            warnings: features.warnings().cloned().collect(),
        };
        info!(
            rows = report.rows,
            groups = report.groups,
            masked = report.masked,
            warnings = report.warnings.len(),
            "computed features"
        );
        Ok((enriched, report))
    }
}

/// Fetch the wide table and store its relational form. Returns the row count.
pub fn run_relational_stage(
    paths: &PipelineConfig,
    provider: &dyn RawDatasetProvider,
) -> Result<usize> {
    info!(source = %provider.describe(), "fetching raw dataset");
    let wide = provider.fetch()?;
    let table = RelationalTransformer::new().transform(&wide)?;
    io::write_relational_file(&paths.relational_path(), &table)?;
    info!(rows = table.len(), "number of rows stored");
    Ok(table.len())
}

/// Read the relational table, compute features and store the enriched table.
pub fn run_feature_stage(paths: &PipelineConfig, config: FeatureConfig) -> Result<PipelineReport> {
    let table = io::read_relational_file(&paths.relational_path())?;
    let (enriched, report) = FeaturePipeline::new(config)?.run(&table)?;
    io::write_enriched_file(&paths.enriched_path(), &enriched)?;
    Ok(report)
}
