//! Delimited-text input and output at the pipeline edges.
//!
//! Every reader validates its header against a typed [`Schema`](crate::core::Schema)
//! before touching data rows. File writers stage output in a temporary
//! file beside the destination and rename it into place only once every
//! row is written, so a failed run never leaves a partial file behind.

mod enriched;
mod provider;
mod relational;
mod wide;

pub use enriched::{read_enriched, read_enriched_file, write_enriched, write_enriched_file};
pub use provider::{LocalDatasetProvider, RawDatasetProvider};
pub use relational::{read_relational, read_relational_file, write_relational, write_relational_file};
pub use wide::{read_wide, read_wide_file};

use crate::error::{FeatureError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Field separator of the processed tables.
pub const PROCESSED_DELIMITER: u8 = b';';

/// Textual form of a missing value in processed tables.
pub const NULL_FIELD: &str = "";

fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| FeatureError::io(path, &e))
}

/// Write `path` through a temporary sibling file and an atomic rename.
///
/// The temporary file is removed when `write` fails or the rename does.
fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&File>) -> Result<()>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir).map_err(|e| FeatureError::io(dir, &e))?;

    {
        let mut out = BufWriter::new(tmp.as_file());
        write(&mut out)?;
        out.flush().map_err(|e| FeatureError::io(tmp.path(), &e))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|e| FeatureError::io(tmp.path(), &e))?;

    tmp.persist(path)
        .map_err(|e| FeatureError::io(path, &e.error))?;
    Ok(())
}

/// Parse a count cell: blank is missing, otherwise a non-negative integer.
///
/// Integral floats such as `12.0` are accepted.
fn parse_count(value: &str) -> Option<Option<u64>> {
    let value = value.trim();
    if value.is_empty() {
        return Some(None);
    }
    if let Ok(n) = value.parse::<u64>() {
        return Some(Some(n));
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
            Some(Some(f as u64))
        }
        _ => None,
    }
}

/// Parse an optional float cell; blank is missing.
fn parse_optional_f64(value: &str) -> Option<Option<f64>> {
    let value = value.trim();
    if value.is_empty() {
        return Some(None);
    }
    value.parse::<f64>().ok().map(Some)
}

fn format_optional<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| NULL_FIELD.to_string(), |v| v.to_string())
}
