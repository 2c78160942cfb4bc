//! Sources of the raw wide table.

use super::read_wide_file;
use crate::core::WideTable;
use crate::error::{FeatureError, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Supplies the wide cumulative-count table.
///
/// Implementations fail with [`FeatureError::Unavailable`] or
/// [`FeatureError::Stale`] instead of returning partial data, and must not
/// block beyond their own time budget.
pub trait RawDatasetProvider {
    fn fetch(&self) -> Result<WideTable>;

    /// Human-readable origin of the data, for logs.
    fn describe(&self) -> String;
}

/// Reads a wide table already present on the local file system.
#[derive(Debug, Clone)]
pub struct LocalDatasetProvider {
    path: PathBuf,
    max_age: Option<Duration>,
}

impl LocalDatasetProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_age: None,
        }
    }

    /// Reject files whose modification time is older than `max_age`.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check_fresh(&self) -> Result<()> {
        let unavailable = |reason: String| FeatureError::Unavailable {
            path: self.path.display().to_string(),
            reason,
        };

        let meta = std::fs::metadata(&self.path).map_err(|e| unavailable(e.to_string()))?;
        if !meta.is_file() {
            return Err(unavailable("not a regular file".to_string()));
        }

        if let Some(max_age) = self.max_age {
            let modified = meta.modified().map_err(|e| unavailable(e.to_string()))?;
            let age = SystemTime::now()
                .duration_since(modified)
                .unwrap_or(Duration::ZERO);
            if age > max_age {
                return Err(FeatureError::Stale {
                    path: self.path.display().to_string(),
                    age_secs: age.as_secs(),
                    max_age_secs: max_age.as_secs(),
                });
            }
        }
        Ok(())
    }
}

impl RawDatasetProvider for LocalDatasetProvider {
    fn fetch(&self) -> Result<WideTable> {
        self.check_fresh()?;
        read_wide_file(&self.path)
    }

    fn describe(&self) -> String {
        format!("local file {}", self.path.display())
    }
}
