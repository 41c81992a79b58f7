//! Prusa Scout Core Library
//!
//! Scrapes marketplace search results for Prusa 3D printers and upgrade
//! parts, normalizes each result into a [`Listing`], classifies it, and
//! aggregates a collection into a [`Summary`].
//!
//! # Architecture
//!
//! - [`parser`] - Field parsers for price, shipping, seller and auction text
//! - [`classify`] - Model detection and printer/upgrade classification
//! - [`listing`] - The normalized listing record and its builder
//! - [`extract`] - Search-results page extraction and batching
//! - [`summary`] - Aggregation into per-model, per-category and auction stats
//! - [`fetch`] - HTTP page fetching with pacing and retries
//! - [`persist`] - Current and historical JSON output
//! - [`app`] - Run configuration and orchestration

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod classify;
pub mod extract;
pub mod fetch;
pub mod listing;
pub mod parser;
pub mod persist;
pub mod summary;

// Re-export commonly used types
pub use classify::{Category, ModelTag, classify, detect_model};
pub use extract::{extract_page, listing_batches, total_page_count};
pub use fetch::{FetchError, PageSource, SearchClient, SearchQuery, listing_stream};
pub use listing::{BuildError, Listing, RawItem, build_listing};
pub use parser::{AuctionTime, AuctionType};
pub use persist::{OutputLayout, PersistError};
pub use summary::{Summary, summarize, summarize_at};
