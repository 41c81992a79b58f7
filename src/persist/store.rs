//! Writing listings, summaries and the historical index.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::error::PersistError;
use super::layout::{OutputLayout, historical_relative};
use crate::listing::Listing;
use crate::summary::Summary;

/// On-disk listings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingsDocument {
    /// When the listings were collected.
    pub timestamp: DateTime<Utc>,
    /// Length of `listings`.
    pub total_listings: usize,
    /// The collected listings, in discovery order.
    pub listings: Vec<Listing>,
}

impl ListingsDocument {
    /// Wraps `listings` with a timestamp and count.
    #[must_use]
    pub fn new(listings: Vec<Listing>, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            total_listings: listings.len(),
            listings,
        }
    }
}

/// Index of dated listing snapshots: year → month → relative paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Snapshot paths relative to the output directory, keyed by `YYYY`
    /// then `MM`.
    pub historical_files: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    /// Time of the last recorded snapshot.
    pub last_updated: Option<DateTime<Utc>>,
}

/// Where a document was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPaths {
    /// The `current/` copy, overwritten each run.
    pub current: PathBuf,
    /// The dated copy under `historical/`.
    pub historical: PathBuf,
}

/// Writes the listings document to the current and dated locations.
///
/// # Errors
///
/// Returns [`PersistError`] if a directory cannot be created or a file
/// cannot be written.
#[instrument(skip(layout, listings), fields(count = listings.len()))]
pub fn save_listings(
    layout: &OutputLayout,
    listings: &[Listing],
    timestamp: DateTime<Utc>,
) -> Result<SavedPaths, PersistError> {
    let document = ListingsDocument::new(listings.to_vec(), timestamp);
    let paths = SavedPaths {
        current: layout.current_listings(),
        historical: layout.historical_listings(timestamp),
    };
    write_json(&paths.current, &document)?;
    write_json(&paths.historical, &document)?;
    debug!(current = %paths.current.display(), "listings saved");
    Ok(paths)
}

/// Writes the summary to the current and dated locations, dated by the
/// summary's own timestamp.
///
/// # Errors
///
/// Returns [`PersistError`] if a directory cannot be created or a file
/// cannot be written.
#[instrument(skip_all, fields(total = summary.total_listings))]
pub fn save_summary(layout: &OutputLayout, summary: &Summary) -> Result<SavedPaths, PersistError> {
    let paths = SavedPaths {
        current: layout.current_summary(),
        historical: layout.historical_summary(summary.timestamp),
    };
    write_json(&paths.current, summary)?;
    write_json(&paths.historical, summary)?;
    debug!(current = %paths.current.display(), "summary saved");
    Ok(paths)
}

/// Records the listings snapshot dated `now` in `metadata.json`.
///
/// A missing or unreadable index starts fresh. The snapshot path is added
/// once under its year and month, and `lastUpdated` is set to `now`.
///
/// # Errors
///
/// Returns [`PersistError`] if the index cannot be written.
#[instrument(skip(layout))]
pub fn update_metadata(layout: &OutputLayout, now: DateTime<Utc>) -> Result<Metadata, PersistError> {
    let path = layout.metadata();
    let mut metadata = read_metadata(&path);

    let entry = historical_relative(now, "listings");
    let files = metadata
        .historical_files
        .entry(now.format("%Y").to_string())
        .or_default()
        .entry(now.format("%m").to_string())
        .or_default();
    if !files.contains(&entry) {
        files.push(entry);
    }
    metadata.last_updated = Some(now);

    write_json(&path, &metadata)?;
    Ok(metadata)
}

fn read_metadata(path: &Path) -> Metadata {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no metadata index, starting fresh");
            return Metadata::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "corrupt metadata index, starting fresh");
        Metadata::default()
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PersistError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PersistError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| PersistError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|e| PersistError::serialize(path, e))?;
    writer.flush().map_err(|e| PersistError::io(path, e))
}
