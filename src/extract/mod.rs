//! Search-results page extraction.
//!
//! [`extract_page`] turns one page of markup into listings;
//! [`ListingBatches`] and [`PageBatcher`] carry a run across pages,
//! deduplicating on `(title, link)` and emitting fixed-size batches.

mod batch;
mod page;

pub use batch::{
    DEFAULT_BATCH_SIZE, ListingBatches, PageBatcher, listing_batches,
};
pub use page::{extract_page, extract_page_at, total_page_count};
