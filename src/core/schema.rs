//! Typed table schemas validated once at ingestion.
//!
//! A [`Schema`] lists the columns a table is expected to carry and what
//! each one is for. Binding it to a header yields a [`BoundSchema`] with
//! resolved column positions, or a [`FeatureError::MissingColumns`] naming
//! every required field that is absent.

use crate::error::{FeatureError, Result};
use std::collections::HashMap;

pub const DATE: &str = "date";
pub const STATE: &str = "state";
pub const COUNTRY: &str = "country";
pub const CONFIRMED: &str = "confirmed";
pub const INDEX: &str = "index";

pub const SOURCE_STATE: &str = "Province/State";
pub const SOURCE_COUNTRY: &str = "Country/Region";

/// What a column contributes to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Must be present.
    Required,
    /// Read when present.
    Optional,
    /// Recognized and discarded.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub role: ColumnRole,
}

impl ColumnSpec {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            role: ColumnRole::Required,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            role: ColumnRole::Optional,
        }
    }

    pub const fn ignored(name: &'static str) -> Self {
        Self {
            name,
            role: ColumnRole::Ignored,
        }
    }
}

/// Static description of a table layout.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub columns: &'static [ColumnSpec],
}

/// Wide cumulative-count table; every unlisted column is a date.
pub const WIDE_SCHEMA: Schema = Schema {
    name: "wide",
    columns: &[
        ColumnSpec::required(SOURCE_STATE),
        ColumnSpec::required(SOURCE_COUNTRY),
        ColumnSpec::ignored("Lat"),
        ColumnSpec::ignored("Long"),
    ],
};

/// Long-form table of one count per region and date.
pub const RELATIONAL_SCHEMA: Schema = Schema {
    name: "relational",
    columns: &[
        ColumnSpec::optional(INDEX),
        ColumnSpec::required(DATE),
        ColumnSpec::required(STATE),
        ColumnSpec::required(COUNTRY),
        ColumnSpec::required(CONFIRMED),
    ],
};

/// Relational table plus the derived feature columns.
pub const ENRICHED_SCHEMA: Schema = Schema {
    name: "enriched",
    columns: &[
        ColumnSpec::required(DATE),
        ColumnSpec::required(STATE),
        ColumnSpec::required(COUNTRY),
        ColumnSpec::required(CONFIRMED),
        ColumnSpec::optional("confirmed_filtered"),
        ColumnSpec::optional("confirmed_DR"),
        ColumnSpec::optional("confirmed_filtered_DR"),
    ],
};

impl Schema {
    /// Names of all required columns, in schema order.
    pub fn required(&self) -> Vec<&'static str> {
        self.columns
            .iter()
            .filter(|c| c.role == ColumnRole::Required)
            .map(|c| c.name)
            .collect()
    }

    /// Resolve column positions against a header row.
    pub fn bind<'a, I>(&self, header: I) -> Result<BoundSchema>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let header: Vec<String> = header.into_iter().map(|h| h.trim().to_string()).collect();

        let mut positions = HashMap::new();
        let mut extras = Vec::new();
        for (idx, name) in header.iter().enumerate() {
            match self.columns.iter().find(|c| c.name == name) {
                Some(spec) if spec.role != ColumnRole::Ignored => {
                    positions.entry(spec.name).or_insert(idx);
                }
                Some(_) => {}
                None => extras.push((idx, name.clone())),
            }
        }

        let missing: Vec<&str> = self
            .required()
            .into_iter()
            .filter(|name| !positions.contains_key(name))
            .collect();
        if !missing.is_empty() {
            return Err(FeatureError::MissingColumns {
                expected: missing.into_iter().map(String::from).collect(),
                found: header,
            });
        }

        Ok(BoundSchema {
            schema: self.name,
            positions,
            extras,
            width: header.len(),
        })
    }
}

/// A schema resolved against a concrete header.
#[derive(Debug, Clone)]
pub struct BoundSchema {
    schema: &'static str,
    positions: HashMap<&'static str, usize>,
    extras: Vec<(usize, String)>,
    width: usize,
}

impl BoundSchema {
    pub fn schema_name(&self) -> &'static str {
        self.schema
    }

    /// Position of a column, `None` if it is optional and absent.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Position of a column that must exist.
    pub fn column(&self, name: &str) -> Result<usize> {
        self.position(name)
            .ok_or_else(|| FeatureError::MissingColumns {
                expected: vec![name.to_string()],
                found: self.positions.keys().map(|k| k.to_string()).collect(),
            })
    }

    /// Header columns the schema does not describe, with their positions.
    pub fn extras(&self) -> &[(usize, String)] {
        &self.extras
    }

    /// Number of header fields.
    pub fn width(&self) -> usize {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_relational_header() {
        let bound = RELATIONAL_SCHEMA
            .bind(["date", "state", "country", "confirmed"])
            .unwrap();
        assert_eq!(bound.position(DATE), Some(0));
        assert_eq!(bound.position(CONFIRMED), Some(3));
        assert_eq!(bound.position(INDEX), None);
        assert!(bound.extras().is_empty());
        assert_eq!(bound.width(), 4);
    }

    #[test]
    fn reports_every_missing_column() {
        let err = RELATIONAL_SCHEMA.bind(["date", "country"]).unwrap_err();
        match err {
            FeatureError::MissingColumns { expected, found } => {
                assert_eq!(expected, vec!["state", "confirmed"]);
                assert_eq!(found, vec!["date", "country"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn wide_schema_skips_ignored_and_collects_dates() {
        let bound = WIDE_SCHEMA
            .bind(["Province/State", "Country/Region", "Lat", "Long", "1/22/20", "1/23/20"])
            .unwrap();
        assert_eq!(bound.position(SOURCE_STATE), Some(0));
        assert_eq!(bound.position("Lat"), None);
        let extras: Vec<&str> = bound.extras().iter().map(|(_, n)| n.as_str()).collect();
        assert_eq!(extras, vec!["1/22/20", "1/23/20"]);
        assert_eq!(bound.extras()[0].0, 4);
    }

    #[test]
    fn header_names_are_trimmed() {
        let bound = ENRICHED_SCHEMA
            .bind([" date", "state ", "country", "confirmed", "confirmed_DR"])
            .unwrap();
        assert_eq!(bound.position("confirmed_DR"), Some(4));
        assert_eq!(bound.position("confirmed_filtered"), None);
        assert!(bound.column("confirmed_filtered").is_err());
    }
}
