//! The normalized listing record and its builder.

mod builder;
mod error;

use serde::{Deserialize, Serialize};

pub use builder::{RawItem, build_listing};
pub use error::BuildError;

use crate::classify::{Category, ModelTag};
use crate::parser::{AuctionTime, AuctionType};

/// Marketplace every listing comes from.
pub const PLATFORM: &str = "eBay";

/// One marketplace listing, normalized. Immutable once built.
///
/// `(title, link)` identifies a listing; collections produced by this crate
/// never hold two listings with the same pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Always [`PLATFORM`].
    pub platform: String,
    /// Non-empty title as shown.
    pub title: String,
    /// Asking price; `0.0` when the price text could not be parsed.
    pub price: f64,
    /// `Some(0.0)` for free shipping, `None` when unspecified.
    pub shipping_cost: Option<f64>,
    /// Price plus shipping, rounded to cents. Present only with known shipping.
    pub total_cost: Option<f64>,
    /// Total cost minus the model's reference price, rounded to cents.
    pub price_vs_reference: Option<f64>,
    /// Raw seller line; empty when the card had none.
    pub seller_info: String,
    /// Feedback count parsed from the seller line.
    pub seller_feedback_count: Option<u64>,
    /// Positive feedback percentage parsed from the seller line.
    pub seller_rating_percent: Option<f64>,
    /// Item URL.
    pub link: String,
    /// Printer or upgrade.
    pub category: Category,
    /// Detected printer model.
    pub model: ModelTag,
    /// Selling format.
    pub auction_type: AuctionType,
    /// Bids placed so far, when shown.
    pub bid_count: Option<u32>,
    /// Countdown for auctions and hybrids.
    pub auction_time: Option<AuctionTime>,
}

impl Listing {
    /// Identity key used for deduplication.
    #[must_use]
    pub fn key(&self) -> (String, String) {
        (self.title.clone(), self.link.clone())
    }
}
