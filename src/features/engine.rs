//! Per-region feature computation.

use super::doubling::DoublingRateEstimator;
use crate::config::FeatureConfig;
use crate::core::{FeatureColumn, Group, RegionKey, RelationalTable, RowId};
use crate::error::{FeatureError, Result};
use crate::pipeline::DerivedColumn;
use crate::transform::SavitzkyGolay;
use rayon::prelude::*;
use tracing::warn;

/// Derived series for one region group, aligned with `rows`.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupFeatures {
    pub key: RegionKey,
    pub rows: Vec<RowId>,
    pub filtered: Vec<Option<f64>>,
    pub doubling_rate: Vec<Option<f64>>,
    pub filtered_doubling_rate: Vec<Option<f64>>,
    /// Contained insufficient-history conditions for this group.
    pub warnings: Vec<FeatureError>,
}

impl GroupFeatures {
    pub fn values(&self, column: FeatureColumn) -> &[Option<f64>] {
        match column {
            FeatureColumn::Filtered => &self.filtered,
            FeatureColumn::DoublingRate => &self.doubling_rate,
            FeatureColumn::FilteredDoublingRate => &self.filtered_doubling_rate,
        }
    }
}

/// Output of the engine over a whole table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureSet {
    groups: Vec<GroupFeatures>,
}

impl FeatureSet {
    pub fn groups(&self) -> &[GroupFeatures] {
        &self.groups
    }

    pub fn warnings(&self) -> impl Iterator<Item = &FeatureError> {
        self.groups.iter().flat_map(|g| g.warnings.iter())
    }

    /// One sparse column per derived feature, keyed by row identity.
    pub fn columns(&self) -> Vec<DerivedColumn> {
        FeatureColumn::ALL
            .into_iter()
            .map(|column| {
                let values = self
                    .groups
                    .iter()
                    .flat_map(|g| g.rows.iter().copied().zip(g.values(column).iter().copied()))
                    .collect();
                DerivedColumn::new(column, values)
            })
            .collect()
    }
}

/// Runs smoothing and both doubling-rate passes on every region group.
#[derive(Debug, Clone)]
pub struct GroupFeatureEngine {
    smoother: SavitzkyGolay,
    estimator: DoublingRateEstimator,
    parallel: bool,
}

impl GroupFeatureEngine {
    pub fn new(config: &FeatureConfig) -> Result<Self> {
        Ok(Self {
            smoother: SavitzkyGolay::new(config.smoothing)?,
            estimator: DoublingRateEstimator::new(),
            parallel: config.parallel,
        })
    }

    /// Compute features for every group of `table`.
    ///
    /// Groups are independent; with `parallel` set they are spread over the
    /// rayon pool. The result does not depend on scheduling.
    pub fn compute(&self, table: &RelationalTable) -> FeatureSet {
        let groups = table.groups();
        let groups = if self.parallel {
            groups
                .par_iter()
                .map(|g| self.compute_group(table, g))
                .collect()
        } else {
            groups.iter().map(|g| self.compute_group(table, g)).collect()
        };
        FeatureSet { groups }
    }

    /// Compute features for a single group.
    ///
    /// A group shorter than a window yields nulls for the positions that
    /// window cannot reach, plus a warning; it never fails.
    pub fn compute_group(&self, table: &RelationalTable, group: &Group) -> GroupFeatures {
        let confirmed = table.confirmed_series(group);
        let mut warnings = Vec::new();

        let filtered = match self.smoother.smooth_missing(&confirmed) {
            Ok(values) => values,
            Err(err) => {
                warnings.push(scope_to_group(err, group));
                vec![None; confirmed.len()]
            }
        };

        if confirmed.len() < self.estimator.min_len() {
            warnings.push(scope_to_group(
                FeatureError::InsufficientData {
                    needed: self.estimator.min_len(),
                    got: confirmed.len(),
                },
                group,
            ));
        }
        let doubling_rate = self.estimator.estimate(&confirmed);
        let filtered_doubling_rate = self.estimator.estimate(&filtered);

        for warning in &warnings {
            warn!(region = %group.key(), "{warning}");
        }

        GroupFeatures {
            key: group.key().clone(),
            rows: group.rows().to_vec(),
            filtered,
            doubling_rate,
            filtered_doubling_rate,
            warnings,
        }
    }
}

fn scope_to_group(err: FeatureError, group: &Group) -> FeatureError {
    match err {
        FeatureError::InsufficientData { needed, got } => FeatureError::InsufficientHistory {
            group: group.key().to_string(),
            needed,
            got,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RelationalRecord;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn table(regions: &[(&str, &[u64])]) -> RelationalTable {
        let start = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
        let mut records = Vec::new();
        for (country, counts) in regions {
            for (day, &count) in counts.iter().enumerate() {
                records.push(RelationalRecord::new(
                    start + chrono::Duration::days(day as i64),
                    RegionKey::new(None, country),
                    Some(count),
                ));
            }
        }
        RelationalTable::new(records).unwrap()
    }

    #[test]
    fn computes_all_three_series() {
        let table = table(&[("Ghana", &[2, 4, 6, 8, 10, 12])]);
        let engine = GroupFeatureEngine::new(&FeatureConfig::default()).unwrap();
        let set = engine.compute(&table);

        assert_eq!(set.groups().len(), 1);
        let g = &set.groups()[0];
        assert!(g.warnings.is_empty());
        assert_eq!(g.filtered.len(), 6);
        // a linear series is reproduced by the degree-1 smoother
        for (f, raw) in g.filtered.iter().zip([2.0, 4.0, 6.0, 8.0, 10.0, 12.0]) {
            assert_relative_eq!(f.unwrap(), raw, epsilon = 1e-9);
        }
        assert_eq!(g.doubling_rate[..2], [None, None]);
        assert_eq!(g.doubling_rate[2], Some(2.0));
        assert_eq!(g.filtered_doubling_rate[..2], [None, None]);
        assert_relative_eq!(g.filtered_doubling_rate[2].unwrap(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn short_group_is_contained() {
        let table = table(&[("Togo", &[1, 2]), ("Benin", &[1, 2, 3, 4, 5])]);
        let engine = GroupFeatureEngine::new(&FeatureConfig::default()).unwrap();
        let set = engine.compute(&table);

        let togo = &set.groups()[0];
        assert_eq!(togo.filtered, vec![None, None]);
        assert_eq!(togo.doubling_rate, vec![None, None]);
        assert_eq!(
            togo.warnings,
            vec![
                FeatureError::InsufficientHistory {
                    group: "no/Togo".into(),
                    needed: 5,
                    got: 2
                },
                FeatureError::InsufficientHistory {
                    group: "no/Togo".into(),
                    needed: 3,
                    got: 2
                },
            ]
        );

        let benin = &set.groups()[1];
        assert!(benin.warnings.is_empty());
        assert!(benin.filtered.iter().all(Option::is_some));
        assert_eq!(set.warnings().count(), 2);
    }

    #[test]
    fn group_between_windows_keeps_raw_rate() {
        let table = table(&[("Niger", &[2, 4, 6, 8])]);
        let engine = GroupFeatureEngine::new(&FeatureConfig::default()).unwrap();
        let set = engine.compute(&table);
        let g = &set.groups()[0];

        assert_eq!(g.warnings.len(), 1);
        assert!(g.filtered.iter().all(Option::is_none));
        assert!(g.filtered_doubling_rate.iter().all(Option::is_none));
        assert_eq!(g.doubling_rate[2], Some(2.0));
        assert_relative_eq!(g.doubling_rate[3].unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let table = table(&[
            ("A", &[1, 3, 7, 12, 20, 31, 44]),
            ("B", &[5, 5, 5, 6, 9, 15]),
            ("C", &[0, 0, 1]),
        ]);
        let par = GroupFeatureEngine::new(&FeatureConfig::default().with_parallel(true))
            .unwrap()
            .compute(&table);
        let seq = GroupFeatureEngine::new(&FeatureConfig::default().with_parallel(false))
            .unwrap()
            .compute(&table);
        assert_eq!(par, seq);
    }

    #[test]
    fn columns_cover_every_row_once() {
        let table = table(&[("A", &[1, 2, 3, 4, 5, 6]), ("B", &[1, 2])]);
        let set = GroupFeatureEngine::new(&FeatureConfig::default())
            .unwrap()
            .compute(&table);
        let columns = set.columns();
        assert_eq!(columns.len(), 3);
        for column in &columns {
            assert_eq!(column.len(), table.len());
        }
    }
}
