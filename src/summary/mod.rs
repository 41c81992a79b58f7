//! Aggregation of listings into per-model, per-category and auction
//! statistics.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use scout_core::listing::{RawItem, build_listing};
//! use scout_core::summary::summarize_at;
//!
//! let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let raw = RawItem {
//!     title: Some("Prusa MK4".into()),
//!     price: Some("$799.00".into()),
//!     link: Some("https://www.ebay.com/itm/1".into()),
//!     shipping: Some("Free shipping".into()),
//!     ..RawItem::default()
//! };
//! let listing = build_listing(raw, now).unwrap();
//!
//! let summary = summarize_at([&listing], now);
//! assert_eq!(summary.categories.printer.count, 1);
//! assert_eq!(summary.models.mk4.count, 1);
//! ```

mod builder;
mod types;

pub use builder::{AggregatorConfig, SummaryBuilder, summarize, summarize_at, summarize_with};
pub use types::{
    ActiveAuctions, AuctionBuckets, AuctionInfo, AuctionSummary, AuctionTypeCounts,
    AuctionsByCategory, CategoriesSummary, ModelStats, ModelsSummary, PopularTypes, PrinterStats,
    PriceRange, Summary, UnknownModelStats, UpgradeStats,
};
