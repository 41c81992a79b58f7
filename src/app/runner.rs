//! One full scouting run: sweep every keyword, summarize, persist.

use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use tracing::{debug, info, instrument, warn};

use super::config::RunConfig;
use crate::fetch::{PageSource, SearchClient, SearchQuery, listing_stream};
use crate::listing::Listing;
use crate::persist::{
    Metadata, OutputLayout, SavedPaths, save_listings, save_summary, update_metadata,
};
use crate::summary::{Summary, summarize_at};

/// What a run produced and where it was written.
#[derive(Debug)]
pub struct RunReport {
    /// Listings collected across all keywords, deduplicated.
    pub listings: Vec<Listing>,
    /// Summary of `listings`.
    pub summary: Summary,
    /// Where the listings document was written.
    pub listings_paths: SavedPaths,
    /// Where the summary was written.
    pub summary_paths: SavedPaths,
    /// The historical index after this run.
    pub metadata: Metadata,
}

/// Runs against the live search endpoint described by `config`.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or output cannot be
/// written. Unreachable pages are skipped, not fatal.
pub async fn run(config: &RunConfig) -> Result<RunReport> {
    let client =
        SearchClient::new(&config.fetch_config()).context("Failed to build search client")?;
    run_with_source(&client, config, Utc::now()).await
}

/// Runs against any page source, stamping output with `now`.
///
/// # Errors
///
/// Returns an error if output cannot be written.
#[instrument(skip_all, fields(keywords = config.keywords.len()))]
pub async fn run_with_source<S>(
    source: &S,
    config: &RunConfig,
    now: DateTime<Utc>,
) -> Result<RunReport>
where
    S: PageSource + ?Sized,
{
    let listings = collect_listings(source, config).await;
    if listings.is_empty() {
        warn!("no listings found");
    }

    let summary = summarize_at(&listings, now);
    let layout = OutputLayout::new(&config.output_dir);

    let listings_paths =
        save_listings(&layout, &listings, now).context("Failed to save listings")?;
    let summary_paths = save_summary(&layout, &summary).context("Failed to save summary")?;
    let metadata = update_metadata(&layout, now).context("Failed to update metadata")?;

    info!(
        total = listings.len(),
        listings = %listings_paths.current.display(),
        summary = %summary_paths.current.display(),
        historical = %listings_paths.historical.display(),
        "run complete"
    );

    Ok(RunReport {
        listings,
        summary,
        listings_paths,
        summary_paths,
        metadata,
    })
}

/// Sweeps each keyword in turn and merges the results, keeping the first
/// occurrence of each `(title, link)` across keywords.
pub async fn collect_listings<S>(source: &S, config: &RunConfig) -> Vec<Listing>
where
    S: PageSource + ?Sized,
{
    let mut seen = HashSet::new();
    let mut collected = Vec::new();

    for keyword in &config.keywords {
        info!(keyword = %keyword, "searching");
        let query = SearchQuery::new(keyword.as_str(), config.zip_code.as_str());
        let mut batches = Box::pin(listing_stream(
            source,
            query,
            config.max_pages,
            config.batch_size,
        ));

        let mut found = 0usize;
        while let Some(batch) = batches.next().await {
            info!(keyword = %keyword, size = batch.len(), "batch extracted");
            found += batch.len();
            for listing in batch {
                if seen.insert(listing.key()) {
                    collected.push(listing);
                } else {
                    debug!(title = %listing.title, "already found under another keyword");
                }
            }
        }
        info!(keyword = %keyword, found, "keyword done");
    }

    collected
}
