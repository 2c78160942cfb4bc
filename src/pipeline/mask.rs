//! Low-count suppression of the smoothed doubling rate.

use crate::core::{EnrichedTable, FeatureColumn};

/// Null `confirmed_filtered_DR` wherever the raw confirmed count is at
/// most `threshold` or missing.
///
/// The raw column is the mask source regardless of the series the rate
/// was computed on. Returns the number of values that were nulled.
pub fn apply_low_count_mask(table: &mut EnrichedTable, threshold: u64) -> usize {
    let mut masked = 0;
    for row in table.records_mut() {
        let keep = row.record.confirmed.is_some_and(|c| c > threshold);
        if !keep && row.get(FeatureColumn::FilteredDoublingRate).is_some() {
            row.set(FeatureColumn::FilteredDoublingRate, None);
            masked += 1;
        }
    }
    masked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EnrichedRecord, RegionKey, RelationalRecord};
    use chrono::NaiveDate;

    fn row(day: u32, confirmed: Option<u64>, rate: Option<f64>) -> EnrichedRecord {
        let date = NaiveDate::from_ymd_opt(2020, 3, day).unwrap();
        let mut r = EnrichedRecord::new(RelationalRecord::new(
            date,
            RegionKey::new(None, "Peru"),
            confirmed,
        ));
        r.confirmed_dr = rate;
        r.confirmed_filtered_dr = rate;
        r
    }

    #[test]
    fn masks_at_or_below_threshold() {
        let mut table = EnrichedTable::new(vec![
            row(1, Some(50), Some(2.0)),
            row(2, Some(100), Some(3.0)),
            row(3, Some(101), Some(4.0)),
            row(4, None, Some(5.0)),
            row(5, Some(10), None),
        ]);
        let masked = apply_low_count_mask(&mut table, 100);

        assert_eq!(masked, 3);
        assert_eq!(
            table.column(FeatureColumn::FilteredDoublingRate),
            vec![None, None, Some(4.0), None, None]
        );
        // the raw-series rate is untouched
        assert_eq!(
            table.column(FeatureColumn::DoublingRate),
            vec![Some(2.0), Some(3.0), Some(4.0), Some(5.0), None]
        );
    }

    #[test]
    fn zero_threshold_keeps_positive_counts() {
        let mut table = EnrichedTable::new(vec![row(1, Some(0), Some(1.0)), row(2, Some(1), Some(1.0))]);
        assert_eq!(apply_low_count_mask(&mut table, 0), 1);
        assert_eq!(
            table.column(FeatureColumn::FilteredDoublingRate),
            vec![None, Some(1.0)]
        );
    }
}
