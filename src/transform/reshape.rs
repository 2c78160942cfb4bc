//! Wide-to-long reshaping of cumulative count tables.

use crate::core::{RelationalRecord, RelationalTable, WideTable};
use crate::error::{FeatureError, Result};
use chrono::NaiveDate;

/// Accepted textual date layouts, tried in order.
const DATE_FORMATS: [&str; 3] = ["%m/%d/%y", "%Y-%m-%d", "%m/%d/%Y"];

/// Parse a date header or field.
///
/// Two-digit years (`1/22/20`) are read first; a trailing time component
/// (`2020-01-22 00:00:00`) is tolerated and dropped.
pub fn parse_date(column: &str, value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    let date_part = trimmed.split([' ', 'T']).next().unwrap_or(trimmed);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        .ok_or_else(|| FeatureError::MalformedDate {
            column: column.to_string(),
            value: value.to_string(),
        })
}

/// Reshapes a region by date matrix into one record per (region, date).
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationalTransformer;

impl RelationalTransformer {
    pub fn new() -> Self {
        Self
    }

    /// Emit records date-major: for each date, every region in table order.
    ///
    /// The output has `regions x dates` rows; duplicate region keys are
    /// rejected.
    pub fn transform(&self, wide: &WideTable) -> Result<RelationalTable> {
        let mut records = Vec::with_capacity(wide.num_regions() * wide.num_dates());
        for (d, date) in wide.dates().iter().enumerate() {
            for (r, region) in wide.regions().iter().enumerate() {
                records.push(RelationalRecord::new(*date, region.clone(), wide.count(r, d)));
            }
        }

        let table = RelationalTable::new(records)?;
        tracing::debug!(
            regions = wide.num_regions(),
            dates = wide.num_dates(),
            rows = table.len(),
            "reshaped wide table"
        );
        Ok(table)
    }
}
