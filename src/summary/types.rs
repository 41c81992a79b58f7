//! Finalized summary values, as written to `summary.json`.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::classify::ModelTag;

/// Closed price interval observed in a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    /// Lowest observed price.
    pub min: f64,
    /// Highest observed price.
    pub max: f64,
}

impl PriceRange {
    /// A range holding a single price.
    #[must_use]
    pub fn point(price: f64) -> Self {
        Self {
            min: price,
            max: price,
        }
    }

    /// Widens the range to include `price`.
    pub fn extend(&mut self, price: f64) {
        self.min = self.min.min(price);
        self.max = self.max.max(price);
    }
}

/// Grows an optional range, starting it on the first observation.
pub(crate) fn extend_range(range: &mut Option<PriceRange>, price: f64) {
    match range {
        Some(range) => range.extend(price),
        None => *range = Some(PriceRange::point(price)),
    }
}

/// Statistics for one known printer model.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelStats {
    /// Listings attributed to the model, printers and upgrades alike.
    pub count: u64,
    /// Range of plausible printer total costs; `None` when none were seen.
    pub price_range: Option<PriceRange>,
    /// Plausible printer listings priced under the reference price.
    pub below_reference_count: u64,
    /// Printer listings stating a shipping cost.
    pub listings_with_shipping_count: u64,
}

/// Statistics for listings with no detected model.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnknownModelStats {
    /// Listings without a model.
    pub count: u64,
}

/// Per-model statistics, keyed by model tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelsSummary {
    /// Serialized under the model's tag, e.g. `"MK3S"`.
    #[serde(rename = "MK3S")]
    pub mk3s: ModelStats,
    #[serde(rename = "MK4")]
    pub mk4: ModelStats,
    #[serde(rename = "MINI")]
    pub mini: ModelStats,
    #[serde(rename = "CORE")]
    pub core: ModelStats,
    /// Listings no model pattern matched.
    #[serde(rename = "Unknown")]
    pub unknown: UnknownModelStats,
}

impl ModelsSummary {
    /// Statistics for a known model; `None` for [`ModelTag::Unknown`].
    #[must_use]
    pub fn get(&self, model: ModelTag) -> Option<&ModelStats> {
        match model {
            ModelTag::Mk3s => Some(&self.mk3s),
            ModelTag::Mk4 => Some(&self.mk4),
            ModelTag::Mini => Some(&self.mini),
            ModelTag::Core => Some(&self.core),
            ModelTag::Unknown => None,
        }
    }

    pub(crate) fn get_mut(&mut self, model: ModelTag) -> Option<&mut ModelStats> {
        match model {
            ModelTag::Mk3s => Some(&mut self.mk3s),
            ModelTag::Mk4 => Some(&mut self.mk4),
            ModelTag::Mini => Some(&mut self.mini),
            ModelTag::Core => Some(&mut self.core),
            ModelTag::Unknown => None,
        }
    }

    /// Listing count for any model, including [`ModelTag::Unknown`].
    #[must_use]
    pub fn count(&self, model: ModelTag) -> u64 {
        self.get(model).map_or(self.unknown.count, |stats| stats.count)
    }
}

/// Printer category statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterStats {
    /// Listings classified as printers.
    pub count: u64,
    /// Mean of plausible, positive printer prices; `0.0` when there were none.
    pub avg_price: f64,
    /// Printer listings stating a shipping cost.
    pub listings_with_shipping_count: u64,
    /// Plausible printer listings whose total is under the reference price.
    pub listings_below_reference_count: u64,
}

/// Upgrade category statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeStats {
    /// Listings classified as upgrades or parts.
    pub count: u64,
    /// Mean of prices in `(0, upgrade_max_price]`; `0.0` when there were none.
    pub avg_price: f64,
    /// Range of the prices averaged above; `None` when none qualified.
    pub price_range: Option<PriceRange>,
    /// Sub-type keyword frequencies.
    pub popular_types: PopularTypes,
}

/// Upgrade sub-type frequencies, most frequent first.
///
/// Serializes as a JSON object whose key order is the frequency order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopularTypes(pub Vec<(String, u64)>);

impl PopularTypes {
    /// Frequency of a sub-type, zero if never seen.
    #[must_use]
    pub fn get(&self, keyword: &str) -> u64 {
        self.0
            .iter()
            .find(|(k, _)| k == keyword)
            .map_or(0, |(_, n)| *n)
    }
}

impl Serialize for PopularTypes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (keyword, count) in &self.0 {
            map.serialize_entry(keyword, count)?;
        }
        map.end()
    }
}

/// Category-level statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoriesSummary {
    /// Whole-printer listings.
    pub printer: PrinterStats,
    /// Upgrade and part listings.
    pub upgrade: UpgradeStats,
}

/// Listing counts per selling format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuctionTypeCounts {
    /// Fixed-price listings.
    pub buy_it_now: u64,
    /// Bid-only listings.
    pub auction: u64,
    /// Listings taking bids that also offer Buy It Now.
    pub hybrid: u64,
}

/// Running auctions with a known countdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveAuctions {
    /// Running auctions, ending-soon ones included.
    pub count: u64,
    /// Running auctions under the ending-soon threshold.
    pub ending_soon_count: u64,
    /// Mean current price over running auctions; `0.0` when there were none.
    pub avg_current_bid: f64,
}

/// Digest of one running auction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionInfo {
    /// Listing title.
    pub title: String,
    /// Listing URL.
    pub link: String,
    /// Detected model.
    pub model: ModelTag,
    /// Listed price, taken as the current bid.
    pub current_bid: f64,
    /// Bids placed, when shown.
    pub bid_count: Option<u32>,
    /// Countdown text as scraped, e.g. `"2h 10m left"`.
    pub time_remaining_text: String,
    /// Countdown in seconds.
    pub seconds_remaining: u64,
    /// Scrape time plus the countdown.
    pub estimated_end_time: DateTime<Utc>,
}

/// Running auctions of one category, each list ordered by end time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionBuckets {
    /// Auctions with at least the ending-soon threshold left.
    pub active: Vec<AuctionInfo>,
    /// Auctions closing within the threshold.
    pub ending_soon: Vec<AuctionInfo>,
}

/// Auction buckets per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuctionsByCategory {
    /// Printer auctions.
    pub printer: AuctionBuckets,
    /// Upgrade auctions.
    pub upgrade: AuctionBuckets,
}

/// Auction statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionSummary {
    /// Every listing counted by selling format.
    pub auction_type_counts: AuctionTypeCounts,
    /// Totals over running auctions.
    pub active_auctions: ActiveAuctions,
    /// Running auctions split by category.
    pub by_category: AuctionsByCategory,
}

/// Aggregate view of one collection of listings. Built fresh per call to
/// [`super::summarize`]; never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// When the summary was produced.
    pub timestamp: DateTime<Utc>,
    /// Listings summarized.
    pub total_listings: u64,
    /// Per-model statistics.
    pub models: ModelsSummary,
    /// Per-category statistics.
    pub categories: CategoriesSummary,
    /// Omitted when no listing carried auction fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auctions: Option<AuctionSummary>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_range_starts_at_first_value() {
        let mut range = None;
        extend_range(&mut range, 500.0);
        assert_eq!(range, Some(PriceRange::point(500.0)));
        extend_range(&mut range, 450.0);
        extend_range(&mut range, 620.0);
        assert_eq!(
            range,
            Some(PriceRange {
                min: 450.0,
                max: 620.0
            })
        );
    }

    #[test]
    fn test_popular_types_serializes_in_order() {
        let types = PopularTypes(vec![("nozzle".to_string(), 3), ("frame".to_string(), 1)]);
        let json = serde_json::to_string(&types).unwrap();
        assert_eq!(json, r#"{"nozzle":3,"frame":1}"#);
        assert_eq!(types.get("frame"), 1);
        assert_eq!(types.get("pinda"), 0);
    }

    #[test]
    fn test_models_summary_field_names() {
        let value = serde_json::to_value(ModelsSummary::default()).unwrap();
        assert!(value["MK3S"]["priceRange"].is_null());
        assert_eq!(value["CORE"]["belowReferenceCount"], 0);
        assert_eq!(value["Unknown"], serde_json::json!({ "count": 0 }));
    }

    #[test]
    fn test_auction_type_counts_field_names() {
        let value = serde_json::to_value(AuctionTypeCounts::default()).unwrap();
        assert_eq!(value, serde_json::json!({"BuyItNow": 0, "Auction": 0, "Hybrid": 0}));
    }
}
