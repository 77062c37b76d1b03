//! GeoLite city database availability.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Tells whether the GeoLite city database can be used.
pub trait GeoLiteCityChecker {
    /// True when IP addresses can be resolved to countries.
    fn is_available(&self) -> bool;
}

/// Checks for a GeoLite city database file on disk.
#[derive(Debug, Clone)]
pub struct FileGeoLiteCityChecker {
    path: PathBuf,
}

impl FileGeoLiteCityChecker {
    /// Create a checker for the database at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GeoLiteCityChecker for FileGeoLiteCityChecker {
    fn is_available(&self) -> bool {
        let available = std::fs::metadata(&self.path)
            .map(|meta| meta.is_file() && meta.len() > 0)
            .unwrap_or(false);
        debug!(path = %self.path.display(), available, "checked GeoLite city database");
        available
    }
}
