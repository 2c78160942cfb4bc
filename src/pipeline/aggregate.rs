//! Country-level views of the enriched table for downstream charting.

use crate::core::{EnrichedRecord, EnrichedTable, FeatureColumn};
use crate::error::{FeatureError, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// A column of the enriched table that can be charted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineColumn {
    Confirmed,
    Feature(FeatureColumn),
}

impl TimelineColumn {
    pub fn from_name(name: &str) -> Result<Self> {
        if name == "confirmed" {
            return Ok(TimelineColumn::Confirmed);
        }
        FeatureColumn::from_name(name)
            .map(TimelineColumn::Feature)
            .ok_or_else(|| FeatureError::InvalidParameter(format!("unknown column '{}'", name)))
    }

    fn value(self, record: &EnrichedRecord) -> Option<f64> {
        match self {
            TimelineColumn::Confirmed => record.record.confirmed.map(|c| c as f64),
            TimelineColumn::Feature(column) => record.get(column),
        }
    }

    /// Rates are averaged across sub-regions; counts are summed.
    fn averages(self) -> bool {
        matches!(self, TimelineColumn::Feature(c) if c.is_rate())
    }
}

/// Collapse all sub-regions of `country` into one value per date.
///
/// Nulls are skipped; a date with no non-null value yields `None`. Dates
/// come back ascending.
pub fn country_timeline(
    table: &EnrichedTable,
    country: &str,
    column: TimelineColumn,
) -> Vec<(NaiveDate, Option<f64>)> {
    let mut by_date: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for record in table.records() {
        if record.record.region.country() != country {
            continue;
        }
        let slot = by_date.entry(record.record.date).or_insert((0.0, 0));
        if let Some(v) = column.value(record) {
            slot.0 += v;
            slot.1 += 1;
        }
    }

    by_date
        .into_iter()
        .map(|(date, (sum, n))| {
            let value = match n {
                0 => None,
                _ if column.averages() => Some(sum / n as f64),
                _ => Some(sum),
            };
            (date, value)
        })
        .collect()
}
