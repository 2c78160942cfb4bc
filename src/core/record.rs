//! Record types flowing through the pipeline.

use chrono::NaiveDate;
use std::fmt;

/// Token standing in for an absent sub-region.
pub const STATE_SENTINEL: &str = "no";

/// Identifies a geographic reporting unit as a (sub-region, region) pair.
///
/// The sub-region is never empty: a missing value is replaced by
/// [`STATE_SENTINEL`] so the key stays total and hashable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionKey {
    state: String,
    country: String,
}

impl RegionKey {
    pub fn new(state: Option<&str>, country: &str) -> Self {
        let state = match state.map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => STATE_SENTINEL.to_string(),
        };
        Self {
            state,
            country: country.trim().to_string(),
        }
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn country(&self) -> &str {
        &self.country
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.state, self.country)
    }
}

/// Stable identity of a record, assigned at ingestion before any grouping.
///
/// It is the record's position in the [`RelationalTable`](super::RelationalTable)
/// arena and the only key the merge step joins on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub usize);

impl RowId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One cumulative count for one region on one date.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationalRecord {
    pub date: NaiveDate,
    pub region: RegionKey,
    /// Cumulative confirmed cases; `None` when the source cell was blank.
    pub confirmed: Option<u64>,
}

impl RelationalRecord {
    pub fn new(date: NaiveDate, region: RegionKey, confirmed: Option<u64>) -> Self {
        Self {
            date,
            region,
            confirmed,
        }
    }
}

/// Columns derived by the feature engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureColumn {
    /// Savitzky-Golay smoothed confirmed counts.
    Filtered,
    /// Doubling time estimated on the raw counts.
    DoublingRate,
    /// Doubling time estimated on the smoothed counts.
    FilteredDoublingRate,
}

impl FeatureColumn {
    pub const ALL: [FeatureColumn; 3] = [
        FeatureColumn::Filtered,
        FeatureColumn::DoublingRate,
        FeatureColumn::FilteredDoublingRate,
    ];

    /// Column name used in tabular output.
    pub fn name(self) -> &'static str {
        match self {
            FeatureColumn::Filtered => "confirmed_filtered",
            FeatureColumn::DoublingRate => "confirmed_DR",
            FeatureColumn::FilteredDoublingRate => "confirmed_filtered_DR",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Whether the column holds a doubling time rather than a count.
    pub fn is_rate(self) -> bool {
        !matches!(self, FeatureColumn::Filtered)
    }
}

impl fmt::Display for FeatureColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A relational record extended with the derived feature columns.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub record: RelationalRecord,
    pub confirmed_filtered: Option<f64>,
    pub confirmed_dr: Option<f64>,
    pub confirmed_filtered_dr: Option<f64>,
}

impl EnrichedRecord {
    pub fn new(record: RelationalRecord) -> Self {
        Self {
            record,
            confirmed_filtered: None,
            confirmed_dr: None,
            confirmed_filtered_dr: None,
        }
    }

    pub fn get(&self, column: FeatureColumn) -> Option<f64> {
        match column {
            FeatureColumn::Filtered => self.confirmed_filtered,
            FeatureColumn::DoublingRate => self.confirmed_dr,
            FeatureColumn::FilteredDoublingRate => self.confirmed_filtered_dr,
        }
    }

    pub fn set(&mut self, column: FeatureColumn, value: Option<f64>) {
        let slot = match column {
            FeatureColumn::Filtered => &mut self.confirmed_filtered,
            FeatureColumn::DoublingRate => &mut self.confirmed_dr,
            FeatureColumn::FilteredDoublingRate => &mut self.confirmed_filtered_dr,
        };
        *slot = value;
    }
}
