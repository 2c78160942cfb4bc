//! In-memory tables: the wide source matrix, the relational arena and the
//! enriched output.

use super::record::{EnrichedRecord, FeatureColumn, RegionKey, RelationalRecord, RowId};
use crate::error::{FeatureError, Result};
use chrono::NaiveDate;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Region by date matrix of cumulative counts.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    regions: Vec<RegionKey>,
    dates: Vec<NaiveDate>,
    /// Row-major: `counts[region][date]`.
    counts: Vec<Vec<Option<u64>>>,
}

impl WideTable {
    pub fn new(
        regions: Vec<RegionKey>,
        dates: Vec<NaiveDate>,
        counts: Vec<Vec<Option<u64>>>,
    ) -> Result<Self> {
        if counts.len() != regions.len() {
            return Err(FeatureError::DimensionMismatch {
                expected: regions.len(),
                got: counts.len(),
            });
        }
        for row in &counts {
            if row.len() != dates.len() {
                return Err(FeatureError::DimensionMismatch {
                    expected: dates.len(),
                    got: row.len(),
                });
            }
        }

        let mut seen = HashSet::new();
        for date in &dates {
            if !seen.insert(*date) {
                return Err(FeatureError::MalformedDate {
                    column: date.to_string(),
                    value: "duplicate date column".to_string(),
                });
            }
        }

        Ok(Self {
            regions,
            dates,
            counts,
        })
    }

    pub fn regions(&self) -> &[RegionKey] {
        &self.regions
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn count(&self, region: usize, date: usize) -> Option<u64> {
        self.counts.get(region).and_then(|row| row.get(date).copied().flatten())
    }

    pub fn num_regions(&self) -> usize {
        self.regions.len()
    }

    pub fn num_dates(&self) -> usize {
        self.dates.len()
    }
}

/// Records sharing one region key, ordered by date.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    key: RegionKey,
    rows: Vec<RowId>,
}

impl Group {
    pub fn key(&self) -> &RegionKey {
        &self.key
    }

    /// Row identities in ascending date order.
    pub fn rows(&self) -> &[RowId] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Arena of relational records; a record's [`RowId`] is its position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RelationalTable {
    records: Vec<RelationalRecord>,
}

impl RelationalTable {
    /// Build a table, rejecting duplicate (region, date) pairs.
    pub fn new(records: Vec<RelationalRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert((&record.region, record.date)) {
                return Err(FeatureError::DuplicateRecord {
                    region: record.region.to_string(),
                    date: record.date.to_string(),
                });
            }
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[RelationalRecord] {
        &self.records
    }

    pub fn get(&self, id: RowId) -> Option<&RelationalRecord> {
        self.records.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (RowId, &RelationalRecord)> {
        self.records.iter().enumerate().map(|(i, r)| (RowId(i), r))
    }

    /// Partition rows by region key.
    ///
    /// Groups come back in order of first appearance; rows inside a group
    /// are sorted ascending by date.
    pub fn groups(&self) -> Vec<Group> {
        let mut by_key: IndexMap<&RegionKey, Vec<RowId>> = IndexMap::new();
        for (id, record) in self.iter() {
            by_key.entry(&record.region).or_default().push(id);
        }

        by_key
            .into_iter()
            .map(|(key, mut rows)| {
                rows.sort_by_key(|id| self.records[id.index()].date);
                Group {
                    key: key.clone(),
                    rows,
                }
            })
            .collect()
    }

    /// Confirmed counts of a group's rows, as floats, in group order.
    pub fn confirmed_series(&self, group: &Group) -> Vec<Option<f64>> {
        group
            .rows()
            .iter()
            .map(|id| {
                self.get(*id)
                    .and_then(|r| r.confirmed)
                    .map(|c| c as f64)
            })
            .collect()
    }
}

/// Final table handed to writers and consumers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnrichedTable {
    records: Vec<EnrichedRecord>,
}

impl EnrichedTable {
    pub fn new(records: Vec<EnrichedRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [EnrichedRecord] {
        &mut self.records
    }

    pub fn into_records(self) -> Vec<EnrichedRecord> {
        self.records
    }

    pub fn column(&self, column: FeatureColumn) -> Vec<Option<f64>> {
        self.records.iter().map(|r| r.get(column)).collect()
    }

    /// The relational part of every row, ignoring derived columns.
    pub fn to_relational(&self) -> Result<RelationalTable> {
        RelationalTable::new(self.records.iter().map(|r| r.record.clone()).collect())
    }

    /// Distinct countries in order of first appearance.
    pub fn countries(&self) -> Vec<&str> {
        let mut seen = IndexMap::new();
        for record in &self.records {
            seen.entry(record.record.region.country()).or_insert(());
        }
        seen.into_keys().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, day).unwrap()
    }

    fn record(day: u32, country: &str, confirmed: u64) -> RelationalRecord {
        RelationalRecord::new(date(day), RegionKey::new(None, country), Some(confirmed))
    }

    #[test]
    fn rejects_duplicate_region_dates() {
        let err = RelationalTable::new(vec![record(1, "Chad", 1), record(1, "Chad", 2)]).unwrap_err();
        assert!(matches!(err, FeatureError::DuplicateRecord { .. }));
    }

    #[test]
    fn groups_sort_rows_by_date() {
        let table = RelationalTable::new(vec![
            record(3, "Chad", 30),
            record(1, "Mali", 1),
            record(1, "Chad", 10),
            record(2, "Chad", 20),
            record(2, "Mali", 2),
        ])
        .unwrap();

        let groups = table.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key().country(), "Chad");
        assert_eq!(groups[0].rows(), &[RowId(2), RowId(3), RowId(0)]);
        assert_eq!(groups[1].rows(), &[RowId(1), RowId(4)]);
        assert_eq!(
            table.confirmed_series(&groups[0]),
            vec![Some(10.0), Some(20.0), Some(30.0)]
        );
    }

    #[test]
    fn wide_table_checks_dimensions() {
        let regions = vec![RegionKey::new(None, "Chad")];
        let err = WideTable::new(regions.clone(), vec![date(1), date(2)], vec![vec![Some(1)]])
            .unwrap_err();
        assert_eq!(err, FeatureError::DimensionMismatch { expected: 2, got: 1 });

        let err = WideTable::new(regions, vec![date(1), date(1)], vec![vec![None, None]])
            .unwrap_err();
        assert!(matches!(err, FeatureError::MalformedDate { .. }));
    }

    #[test]
    fn enriched_table_lists_countries() {
        let table = EnrichedTable::new(vec![
            EnrichedRecord::new(record(1, "Chad", 1)),
            EnrichedRecord::new(record(1, "Mali", 1)),
            EnrichedRecord::new(record(2, "Chad", 1)),
        ]);
        assert_eq!(table.countries(), vec!["Chad", "Mali"]);
        assert_eq!(table.to_relational().unwrap().len(), 3);
    }
}
