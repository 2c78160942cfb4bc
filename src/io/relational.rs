//! Long-form relational table: `date;state;country;confirmed`.

use super::{format_optional, open_file, parse_count, write_atomic, PROCESSED_DELIMITER};
use crate::core::schema::{CONFIRMED, COUNTRY, DATE, RELATIONAL_SCHEMA, STATE};
use crate::core::{BoundSchema, RegionKey, RelationalRecord, RelationalTable};
use crate::error::{FeatureError, Result};
use crate::transform::parse_date;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

const HEADER: [&str; 4] = [DATE, STATE, COUNTRY, CONFIRMED];

/// Positions of the relational fields within a bound header.
pub(super) struct RelationalColumns {
    date: usize,
    state: usize,
    country: usize,
    confirmed: usize,
}

impl RelationalColumns {
    pub(super) fn bind(bound: &BoundSchema) -> Result<Self> {
        Ok(Self {
            date: bound.column(DATE)?,
            state: bound.column(STATE)?,
            country: bound.column(COUNTRY)?,
            confirmed: bound.column(CONFIRMED)?,
        })
    }

    /// Parse the relational part of a data row (`row` is 1-based).
    pub(super) fn parse(&self, record: &StringRecord, row: usize) -> Result<RelationalRecord> {
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let date = parse_date(DATE, field(self.date))?;
        let confirmed =
            parse_count(field(self.confirmed)).ok_or_else(|| FeatureError::InvalidValue {
                row,
                column: CONFIRMED.to_string(),
                value: field(self.confirmed).to_string(),
            })?;
        let region = RegionKey::new(Some(field(self.state)), field(self.country));
        Ok(RelationalRecord::new(date, region, confirmed))
    }
}

/// Read a relational table; columns beyond the schema are ignored.
///
/// Row identities follow file order.
pub fn read_relational<R: Read>(reader: R) -> Result<RelationalTable> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(PROCESSED_DELIMITER)
        .from_reader(reader);
    let header = rdr.headers()?.clone();
    let columns = RelationalColumns::bind(&RELATIONAL_SCHEMA.bind(header.iter())?)?;

    let records = rdr
        .records()
        .enumerate()
        .map(|(row, record)| columns.parse(&record?, row + 1))
        .collect::<Result<Vec<_>>>()?;

    RelationalTable::new(records)
}

pub fn read_relational_file(path: &Path) -> Result<RelationalTable> {
    let table = read_relational(open_file(path)?)?;
    info!(path = %path.display(), rows = table.len(), "loaded relational table");
    Ok(table)
}

/// Write a relational table with ISO dates.
pub fn write_relational<W: Write>(writer: W, table: &RelationalTable) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(PROCESSED_DELIMITER)
        .from_writer(writer);
    wtr.write_record(HEADER)?;
    for record in table.records() {
        wtr.write_record([
            record.date.format("%Y-%m-%d").to_string(),
            record.region.state().to_string(),
            record.region.country().to_string(),
            format_optional(record.confirmed),
        ])?;
    }
    wtr.flush().map_err(|e| FeatureError::Csv(e.to_string()))?;
    Ok(())
}

pub fn write_relational_file(path: &Path, table: &RelationalTable) -> Result<()> {
    write_atomic(path, |out| write_relational(out, table))?;
    info!(path = %path.display(), rows = table.len(), "stored relational table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn reads_with_index_and_extra_columns() {
        let text = "\
index;date;state;country;confirmed;confirmed_DR
0;2020-01-22;no;Chad;0;
1;2020-01-22;Hubei;China;444;2.5
2;2020-01-23 00:00:00;no;Chad;;
";
        let table = read_relational(text.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        let rows = table.records();
        assert_eq!(rows[1].region, RegionKey::new(Some("Hubei"), "China"));
        assert_eq!(rows[1].confirmed, Some(444));
        assert_eq!(rows[2].date, NaiveDate::from_ymd_opt(2020, 1, 23).unwrap());
        assert_eq!(rows[2].confirmed, None);
        assert_eq!(rows[0].region.state(), "no");
    }

    #[test]
    fn missing_fields_are_listed() {
        let err = read_relational("date;country\n2020-01-01;Chad\n".as_bytes()).unwrap_err();
        assert_eq!(
            err,
            FeatureError::MissingColumns {
                expected: vec!["state".into(), "confirmed".into()],
                found: vec!["date".into(), "country".into()],
            }
        );
    }

    #[test]
    fn malformed_dates_fail() {
        let err = read_relational("date;state;country;confirmed\nyesterday;no;Chad;1\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, FeatureError::MalformedDate { .. }));
    }

    #[test]
    fn write_then_read_preserves_rows() {
        let d = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        let table = RelationalTable::new(vec![
            RelationalRecord::new(d, RegionKey::new(None, "Chad"), Some(3)),
            RelationalRecord::new(d, RegionKey::new(Some("Hubei"), "China"), None),
        ])
        .unwrap();

        let mut buf = Vec::new();
        write_relational(&mut buf, &table).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("date;state;country;confirmed\n2020-02-29;no;Chad;3\n"));

        assert_eq!(read_relational(buf.as_slice()).unwrap(), table);
    }
}
