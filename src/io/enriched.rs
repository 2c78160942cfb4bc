//! Enriched output table.
//!
//! Layout: `date;state;country;confirmed;confirmed_filtered;confirmed_DR;confirmed_filtered_DR`.
//! Nulls are empty fields; an infinite doubling time is written as `inf`.

use super::relational::RelationalColumns;
use super::{format_optional, open_file, parse_optional_f64, write_atomic, PROCESSED_DELIMITER};
use crate::core::schema::{CONFIRMED, COUNTRY, DATE, ENRICHED_SCHEMA, STATE};
use crate::core::{EnrichedRecord, EnrichedTable, FeatureColumn};
use crate::error::{FeatureError, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

/// Write the enriched table.
pub fn write_enriched<W: Write>(writer: W, table: &EnrichedTable) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(PROCESSED_DELIMITER)
        .from_writer(writer);

    let mut header = vec![DATE, STATE, COUNTRY, CONFIRMED];
    header.extend(FeatureColumn::ALL.iter().map(|c| c.name()));
    wtr.write_record(&header)?;

    for row in table.records() {
        let mut fields = vec![
            row.record.date.format("%Y-%m-%d").to_string(),
            row.record.region.state().to_string(),
            row.record.region.country().to_string(),
            format_optional(row.record.confirmed),
        ];
        fields.extend(FeatureColumn::ALL.iter().map(|c| format_optional(row.get(*c))));
        wtr.write_record(&fields)?;
    }
    wtr.flush().map_err(|e| FeatureError::Csv(e.to_string()))?;
    Ok(())
}

/// Write the enriched table to `path`, replacing it atomically.
pub fn write_enriched_file(path: &Path, table: &EnrichedTable) -> Result<()> {
    write_atomic(path, |out| write_enriched(out, table))?;
    info!(path = %path.display(), rows = table.len(), "stored enriched table");
    Ok(())
}

/// Read an enriched table; absent derived columns read as null.
pub fn read_enriched<R: Read>(reader: R) -> Result<EnrichedTable> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(PROCESSED_DELIMITER)
        .from_reader(reader);
    let header = rdr.headers()?.clone();
    let bound = ENRICHED_SCHEMA.bind(header.iter())?;

    let relational = RelationalColumns::bind(&bound)?;
    let feature_cols: Vec<(FeatureColumn, usize)> = FeatureColumn::ALL
        .into_iter()
        .filter_map(|c| bound.position(c.name()).map(|idx| (c, idx)))
        .collect();

    let mut records = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let mut enriched = EnrichedRecord::new(relational.parse(&record, row + 1)?);
        for &(column, idx) in &feature_cols {
            let cell = record.get(idx).unwrap_or("");
            let value = parse_optional_f64(cell).ok_or_else(|| FeatureError::InvalidValue {
                row: row + 1,
                column: column.name().to_string(),
                value: cell.to_string(),
            })?;
            enriched.set(column, value);
        }
        records.push(enriched);
    }
    Ok(EnrichedTable::new(records))
}

pub fn read_enriched_file(path: &Path) -> Result<EnrichedTable> {
    let table = read_enriched(open_file(path)?)?;
    info!(path = %path.display(), rows = table.len(), "loaded enriched table");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RegionKey, RelationalRecord};
    use chrono::NaiveDate;

    fn sample() -> EnrichedTable {
        let d = NaiveDate::from_ymd_opt(2020, 3, 10).unwrap();
        let mut a = EnrichedRecord::new(RelationalRecord::new(d, RegionKey::new(None, "Chad"), Some(120)));
        a.confirmed_filtered = Some(118.4);
        a.confirmed_dr = Some(f64::INFINITY);
        a.confirmed_filtered_dr = Some(6.25);
        let b = EnrichedRecord::new(RelationalRecord::new(
            d,
            RegionKey::new(Some("Hubei"), "China"),
            None,
        ));
        EnrichedTable::new(vec![a, b])
    }

    #[test]
    fn writes_schema_and_null_fields() {
        let mut buf = Vec::new();
        write_enriched(&mut buf, &sample()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "date;state;country;confirmed;confirmed_filtered;confirmed_DR;confirmed_filtered_DR"
        );
        assert_eq!(lines[1], "2020-03-10;no;Chad;120;118.4;inf;6.25");
        assert_eq!(lines[2], "2020-03-10;Hubei;China;;;;");
    }

    #[test]
    fn reads_back_what_it_writes() {
        let mut buf = Vec::new();
        write_enriched(&mut buf, &sample()).unwrap();
        assert_eq!(read_enriched(buf.as_slice()).unwrap(), sample());
    }

    #[test]
    fn tolerates_missing_derived_columns() {
        let table = read_enriched("date;state;country;confirmed\n2020-03-10;no;Chad;5\n".as_bytes())
            .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].confirmed_filtered, None);
    }

    #[test]
    fn rejects_non_numeric_features() {
        let text = "date;state;country;confirmed;confirmed_DR\n2020-03-10;no;Chad;5;soon\n";
        assert!(matches!(
            read_enriched(text.as_bytes()),
            Err(FeatureError::InvalidValue { row: 1, .. })
        ));
    }
}
