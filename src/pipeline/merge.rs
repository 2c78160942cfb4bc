//! Re-attaching per-group outputs to the full table.

use crate::core::{EnrichedRecord, EnrichedTable, FeatureColumn, RelationalTable, RowId};
use crate::error::{FeatureError, Result};

/// Values of one derived feature keyed by row identity.
///
/// Rows that are absent from `values` receive a null on merge.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedColumn {
    column: FeatureColumn,
    values: Vec<(RowId, Option<f64>)>,
}

impl DerivedColumn {
    pub fn new(column: FeatureColumn, values: Vec<(RowId, Option<f64>)>) -> Self {
        Self { column, values }
    }

    pub fn column(&self) -> FeatureColumn {
        self.column
    }

    pub fn values(&self) -> &[(RowId, Option<f64>)] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Left-joins derived columns onto a relational table by [`RowId`].
///
/// The output has exactly one row per input row, in input order; existing
/// fields are copied unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatasetMerger;

impl DatasetMerger {
    pub fn new() -> Self {
        Self
    }

    pub fn merge(&self, table: &RelationalTable, columns: &[DerivedColumn]) -> Result<EnrichedTable> {
        let size = table.len();
        let mut records: Vec<EnrichedRecord> = table
            .records()
            .iter()
            .cloned()
            .map(EnrichedRecord::new)
            .collect();

        let mut merged = Vec::with_capacity(columns.len());
        for derived in columns {
            if merged.contains(&derived.column) {
                return Err(FeatureError::InvalidParameter(format!(
                    "column {} supplied more than once",
                    derived.column
                )));
            }
            merged.push(derived.column);

            let mut seen = vec![false; size];
            for &(id, value) in &derived.values {
                let index = id.index();
                if index >= size {
                    return Err(FeatureError::IndexOutOfBounds { index, size });
                }
                if std::mem::replace(&mut seen[index], true) {
                    return Err(FeatureError::DuplicateRowIdentity(index));
                }
                records[index].set(derived.column, value);
            }
        }

        if records.len() != size {
            return Err(FeatureError::RowCountMismatch {
                expected: size,
                got: records.len(),
            });
        }
        Ok(EnrichedTable::new(records))
    }
}
