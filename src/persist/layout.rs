//! Output directory layout.
//!
//! ```text
//! <base>/
//!   metadata.json
//!   current/listings.json
//!   current/summary.json
//!   historical/YYYY/MM/listings_YYYYMMDD.json
//!   historical/YYYY/MM/summary_YYYYMMDD.json
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

const CURRENT_DIR: &str = "current";
const HISTORICAL_DIR: &str = "historical";
const METADATA_FILE: &str = "metadata.json";

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "public/data";

/// Resolves output paths under a base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    base_dir: PathBuf,
}

impl OutputLayout {
    /// Creates a layout rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Root of the layout.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Latest listings document.
    #[must_use]
    pub fn current_listings(&self) -> PathBuf {
        self.base_dir.join(CURRENT_DIR).join("listings.json")
    }

    /// Latest summary document.
    #[must_use]
    pub fn current_summary(&self) -> PathBuf {
        self.base_dir.join(CURRENT_DIR).join("summary.json")
    }

    /// Dated listings snapshot for the day of `at`.
    #[must_use]
    pub fn historical_listings(&self, at: DateTime<Utc>) -> PathBuf {
        self.base_dir.join(historical_relative(at, "listings"))
    }

    /// Dated summary snapshot for the day of `at`.
    #[must_use]
    pub fn historical_summary(&self, at: DateTime<Utc>) -> PathBuf {
        self.base_dir.join(historical_relative(at, "summary"))
    }

    /// Index of historical snapshots.
    #[must_use]
    pub fn metadata(&self) -> PathBuf {
        self.base_dir.join(METADATA_FILE)
    }
}

/// `historical/YYYY/MM/<stem>_YYYYMMDD.json`, always `/`-separated so the
/// metadata index reads the same on every platform.
#[must_use]
pub fn historical_relative(at: DateTime<Utc>, stem: &str) -> String {
    format!(
        "{HISTORICAL_DIR}/{}/{stem}_{}.json",
        at.format("%Y/%m"),
        at.format("%Y%m%d")
    )
}
