//! Reader for the comma-separated wide cumulative-count table.

use super::{open_file, parse_count};
use crate::core::schema::{SOURCE_COUNTRY, SOURCE_STATE, WIDE_SCHEMA};
use crate::core::{RegionKey, WideTable};
use crate::error::{FeatureError, Result};
use crate::transform::parse_date;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Read a wide table: one row per region, one column per date.
///
/// `Lat` and `Long` are discarded; every other unrecognized column must be
/// a date header.
pub fn read_wide<R: Read>(reader: R) -> Result<WideTable> {
    let mut rdr = ReaderBuilder::new().from_reader(reader);
    let header = rdr.headers()?.clone();
    let bound = WIDE_SCHEMA.bind(header.iter())?;

    let state_col = bound.column(SOURCE_STATE)?;
    let country_col = bound.column(SOURCE_COUNTRY)?;
    let date_cols: Vec<(usize, &str, NaiveDate)> = bound
        .extras()
        .iter()
        .map(|(idx, name)| parse_date(name, name).map(|d| (*idx, name.as_str(), d)))
        .collect::<Result<_>>()?;

    let mut regions = Vec::new();
    let mut counts = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let country = record.get(country_col).unwrap_or("").trim();
        if country.is_empty() {
            return Err(FeatureError::InvalidValue {
                row: row + 1,
                column: SOURCE_COUNTRY.to_string(),
                value: String::new(),
            });
        }
        regions.push(RegionKey::new(record.get(state_col), country));

        let row_counts = date_cols
            .iter()
            .map(|(idx, name, _)| {
                let cell = record.get(*idx).unwrap_or("");
                parse_count(cell).ok_or_else(|| FeatureError::InvalidValue {
                    row: row + 1,
                    column: name.to_string(),
                    value: cell.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        counts.push(row_counts);
    }

    let dates = date_cols.into_iter().map(|(_, _, d)| d).collect();
    WideTable::new(regions, dates, counts)
}

/// Read a wide table from disk.
pub fn read_wide_file(path: &Path) -> Result<WideTable> {
    let table = read_wide(open_file(path)?)?;
    info!(
        path = %path.display(),
        regions = table.num_regions(),
        dates = table.num_dates(),
        "loaded wide table"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::STATE_SENTINEL;

    const SAMPLE: &str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20
,Afghanistan,33.0,65.0,0,0,1
Hubei,China,30.97,112.27,444,444,549
\"Bonaire, Sint Eustatius and Saba\",Netherlands,12.2,-68.3,0,,2
";

    #[test]
    fn reads_regions_dates_and_counts() {
        let table = read_wide(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.num_regions(), 3);
        assert_eq!(table.num_dates(), 3);
        assert_eq!(table.dates()[0], NaiveDate::from_ymd_opt(2020, 1, 22).unwrap());

        assert_eq!(table.regions()[0].state(), STATE_SENTINEL);
        assert_eq!(table.regions()[0].country(), "Afghanistan");
        assert_eq!(table.regions()[2].state(), "Bonaire, Sint Eustatius and Saba");

        assert_eq!(table.count(1, 2), Some(549));
        assert_eq!(table.count(2, 1), None);
    }

    #[test]
    fn missing_country_column_is_a_schema_error() {
        let err = read_wide("Province/State,Lat,1/22/20\n,1.0,3\n".as_bytes()).unwrap_err();
        match err {
            FeatureError::MissingColumns { expected, .. } => {
                assert_eq!(expected, vec!["Country/Region"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_non_date_column_is_rejected() {
        let err = read_wide("Province/State,Country/Region,Population,1/22/20\n,X,5,1\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, FeatureError::MalformedDate { column, .. } if column == "Population"));
    }

    #[test]
    fn bad_counts_name_row_and_column() {
        let err = read_wide("Province/State,Country/Region,1/22/20\n,X,-1\n".as_bytes()).unwrap_err();
        assert_eq!(
            err,
            FeatureError::InvalidValue {
                row: 1,
                column: "1/22/20".into(),
                value: "-1".into()
            }
        );
    }
}
