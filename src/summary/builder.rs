//! Single-pass summary accumulator.

use std::borrow::Borrow;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use super::types::{
    ActiveAuctions, AuctionBuckets, AuctionInfo, AuctionSummary, AuctionTypeCounts,
    AuctionsByCategory, CategoriesSummary, ModelsSummary, PopularTypes, PrinterStats, PriceRange,
    Summary, UpgradeStats, extend_range,
};
use crate::classify::{Category, UPGRADE_MAX_PRICE, UPGRADE_TYPE_KEYWORDS};
use crate::listing::Listing;
use crate::parser::{AuctionType, ENDING_SOON_SECS, round_cents};

/// Aggregation thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatorConfig {
    /// Upgrade prices above this are left out of upgrade price statistics.
    pub upgrade_max_price: f64,
    /// Auctions with fewer seconds remaining count as ending soon.
    pub ending_soon_secs: u64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            upgrade_max_price: UPGRADE_MAX_PRICE,
            ending_soon_secs: ENDING_SOON_SECS,
        }
    }
}

/// Running (sum, count) pair.
#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    count: u64,
}

impl Mean {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Rounded to cents; zero when nothing was added.
    #[allow(clippy::cast_precision_loss)]
    fn value(self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            round_cents(self.sum / self.count as f64)
        }
    }
}

/// Folds listings into a [`Summary`].
///
/// Each builder is independent; feeding the same listings to two fresh
/// builders produces equal summaries.
#[derive(Debug, Default)]
pub struct SummaryBuilder {
    config: AggregatorConfig,
    total: u64,
    models: ModelsSummary,
    printer: PrinterStats,
    printer_mean: Mean,
    upgrade_count: u64,
    upgrade_mean: Mean,
    upgrade_range: Option<PriceRange>,
    type_counts: [u64; UPGRADE_TYPE_KEYWORDS.len()],
    auctions_seen: bool,
    type_counts_by_format: AuctionTypeCounts,
    active_auctions: u64,
    ending_soon: u64,
    bid_mean: Mean,
    buckets: AuctionsByCategory,
}

impl SummaryBuilder {
    /// Creates a builder with custom thresholds.
    #[must_use]
    pub fn with_config(config: AggregatorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Folds one listing in.
    pub fn add(&mut self, listing: &Listing) {
        self.total += 1;
        match self.models.get_mut(listing.model) {
            Some(stats) => stats.count += 1,
            None => self.models.unknown.count += 1,
        }

        match listing.category {
            Category::Printer => self.add_printer(listing),
            Category::Upgrade => self.add_upgrade(listing),
        }
        self.add_auction(listing);
    }

    /// Folds every listing in `listings`.
    pub fn extend<I>(&mut self, listings: I)
    where
        I: IntoIterator,
        I::Item: Borrow<Listing>,
    {
        for listing in listings {
            self.add(listing.borrow());
        }
    }

    fn add_printer(&mut self, listing: &Listing) {
        let model = listing.model;
        self.printer.count += 1;

        if listing.price > 0.0 && model.is_plausible_price(listing.price) {
            self.printer_mean.add(listing.price);
        }

        if listing.shipping_cost.is_some() {
            self.printer.listings_with_shipping_count += 1;
            if let Some(stats) = self.models.get_mut(model) {
                stats.listings_with_shipping_count += 1;
            }
        }

        let Some(total) = listing.total_cost.filter(|t| model.is_plausible_price(*t)) else {
            return;
        };
        if let Some(stats) = self.models.get_mut(model) {
            extend_range(&mut stats.price_range, total);
            if listing.price_vs_reference.is_some_and(|delta| delta < 0.0) {
                stats.below_reference_count += 1;
                self.printer.listings_below_reference_count += 1;
            }
        }
    }

    fn add_upgrade(&mut self, listing: &Listing) {
        self.upgrade_count += 1;

        if listing.price > 0.0 && listing.price <= self.config.upgrade_max_price {
            self.upgrade_mean.add(listing.price);
            extend_range(&mut self.upgrade_range, listing.price);
        }

        let lower = listing.title.to_lowercase();
        for (count, keyword) in self.type_counts.iter_mut().zip(UPGRADE_TYPE_KEYWORDS) {
            if lower.contains(keyword) {
                *count += 1;
            }
        }
    }

    fn add_auction(&mut self, listing: &Listing) {
        self.auctions_seen = true;
        match listing.auction_type {
            AuctionType::BuyItNow => self.type_counts_by_format.buy_it_now += 1,
            AuctionType::Auction => self.type_counts_by_format.auction += 1,
            AuctionType::Hybrid => self.type_counts_by_format.hybrid += 1,
        }

        if !listing.auction_type.takes_bids() {
            return;
        }
        let Some(time) = &listing.auction_time else {
            return;
        };

        self.active_auctions += 1;
        self.bid_mean.add(listing.price);

        let info = AuctionInfo {
            title: listing.title.clone(),
            link: listing.link.clone(),
            model: listing.model,
            current_bid: listing.price,
            bid_count: listing.bid_count,
            time_remaining_text: time.time_remaining_text.clone(),
            seconds_remaining: time.seconds_remaining,
            estimated_end_time: time.estimated_end_time,
        };

        let bucket = match listing.category {
            Category::Printer => &mut self.buckets.printer,
            Category::Upgrade => &mut self.buckets.upgrade,
        };
        if time.is_ending_soon(self.config.ending_soon_secs) {
            self.ending_soon += 1;
            bucket.ending_soon.push(info);
        } else {
            bucket.active.push(info);
        }
    }

    /// Finalizes into a summary stamped with `timestamp`.
    #[must_use]
    pub fn finish(self, timestamp: DateTime<Utc>) -> Summary {
        let mut printer = self.printer;
        printer.avg_price = self.printer_mean.value();

        let upgrade = UpgradeStats {
            count: self.upgrade_count,
            avg_price: self.upgrade_mean.value(),
            price_range: self.upgrade_range,
            popular_types: popular_types(&self.type_counts),
        };

        let auctions = self.auctions_seen.then(|| {
            let mut by_category = self.buckets;
            for bucket in [&mut by_category.printer, &mut by_category.upgrade] {
                sort_by_end_time(bucket);
            }
            AuctionSummary {
                auction_type_counts: self.type_counts_by_format,
                active_auctions: ActiveAuctions {
                    count: self.active_auctions,
                    ending_soon_count: self.ending_soon,
                    avg_current_bid: self.bid_mean.value(),
                },
                by_category,
            }
        });

        Summary {
            timestamp,
            total_listings: self.total,
            models: self.models,
            categories: CategoriesSummary { printer, upgrade },
            auctions,
        }
    }
}

/// Non-zero sub-type counts, most frequent first. The sort is stable, so
/// ties keep keyword-list order.
fn popular_types(counts: &[u64]) -> PopularTypes {
    let mut types: Vec<(String, u64)> = UPGRADE_TYPE_KEYWORDS
        .iter()
        .zip(counts)
        .filter(|(_, count)| **count > 0)
        .map(|(keyword, count)| ((*keyword).to_string(), *count))
        .collect();
    types.sort_by(|a, b| b.1.cmp(&a.1));
    PopularTypes(types)
}

fn sort_by_end_time(bucket: &mut AuctionBuckets) {
    bucket.active.sort_by_key(|info| info.estimated_end_time);
    bucket.ending_soon.sort_by_key(|info| info.estimated_end_time);
}

/// Summarizes listings, stamping the result with the current time.
#[must_use]
pub fn summarize<I>(listings: I) -> Summary
where
    I: IntoIterator,
    I::Item: Borrow<Listing>,
{
    summarize_at(listings, Utc::now())
}

/// Summarizes listings with default thresholds, stamping the result with
/// `timestamp`. Equal inputs give equal output.
#[must_use]
pub fn summarize_at<I>(listings: I, timestamp: DateTime<Utc>) -> Summary
where
    I: IntoIterator,
    I::Item: Borrow<Listing>,
{
    summarize_with(listings, AggregatorConfig::default(), timestamp)
}

/// Summarizes listings with explicit thresholds.
#[must_use]
#[instrument(level = "debug", skip(listings))]
pub fn summarize_with<I>(listings: I, config: AggregatorConfig, timestamp: DateTime<Utc>) -> Summary
where
    I: IntoIterator,
    I::Item: Borrow<Listing>,
{
    let mut builder = SummaryBuilder::with_config(config);
    builder.extend(listings);
    let summary = builder.finish(timestamp);
    debug!(
        total = summary.total_listings,
        printers = summary.categories.printer.count,
        upgrades = summary.categories.upgrade.count,
        "summary built"
    );
    summary
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::classify::ModelTag;
    use crate::listing::{RawItem, build_listing};
    use crate::summary::PriceRange;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn listing(title: &str, price: &str, shipping: Option<&str>) -> Listing {
        listing_with(title, price, shipping, |_| {})
    }

    fn listing_with(
        title: &str,
        price: &str,
        shipping: Option<&str>,
        tweak: impl FnOnce(&mut RawItem),
    ) -> Listing {
        let mut raw = RawItem {
            title: Some(title.to_string()),
            price: Some(price.to_string()),
            link: Some(format!("https://www.ebay.com/itm/{}", title.len())),
            shipping: shipping.map(str::to_string),
            ..RawItem::default()
        };
        tweak(&mut raw);
        build_listing(raw, now()).unwrap()
    }

    #[test]
    fn test_printer_and_upgrade_scenario() {
        let listings = vec![
            listing("Prusa MK4 3D Printer", "$850.00", Some("Free shipping")),
            listing("Bondtech Extruder Upgrade", "$45.00", None),
        ];
        let summary = summarize_at(&listings, now());

        assert_eq!(summary.total_listings, 2);
        assert_eq!(summary.categories.printer.count, 1);
        assert_eq!(summary.categories.upgrade.count, 1);
        let json = serde_json::to_string(&summary.categories.upgrade.popular_types).unwrap();
        assert_eq!(json, r#"{"extruder":1,"bondtech":1}"#);
    }

    #[test]
    fn test_every_listing_counts_toward_its_model() {
        let listings = vec![
            listing("Prusa MK4", "$799.00", Some("Free")),
            listing("Prusa MK4 nozzle set", "$15.00", None),
            listing("Mystery box", "$5.00", None),
        ];
        let summary = summarize_at(&listings, now());
        // The nozzle set names MK4 but is an upgrade; "nozzle" is not a guard word
        assert_eq!(summary.models.mk4.count, 2);
        assert_eq!(summary.models.unknown.count, 1);
        assert_eq!(summary.models.count(ModelTag::Unknown), 1);
    }

    #[test]
    fn test_printer_stats() {
        let listings = vec![
            listing("Prusa MK3S+", "$700.00", Some("+$20.00 shipping")),
            listing("Prusa MK3S+", "$900.00", Some("Free")),
            listing("Prusa MK3S 3D printer", "$1,500.00", None),
        ];
        let summary = summarize_at(&listings, now());
        let printer = &summary.categories.printer;

        assert_eq!(printer.count, 3);
        // 1500 is outside the MK3S band and left out of the average
        assert_eq!(printer.avg_price, 800.0);
        assert_eq!(printer.listings_with_shipping_count, 2);
        assert_eq!(printer.listings_below_reference_count, 1);

        let mk3s = &summary.models.mk3s;
        assert_eq!(mk3s.listings_with_shipping_count, 2);
        assert_eq!(mk3s.below_reference_count, 1);
        assert_eq!(
            mk3s.price_range,
            Some(PriceRange {
                min: 720.0,
                max: 900.0
            })
        );
    }

    #[test]
    fn test_price_range_null_without_plausible_total() {
        let listings = vec![listing("Prusa MINI+ 3D printer", "$200.00", Some("Free"))];
        let summary = summarize_at(&listings, now());
        assert_eq!(summary.models.mini.count, 1);
        assert_eq!(summary.models.mini.price_range, None);
        assert_eq!(summary.models.mk4.price_range, None);

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["models"]["MINI"]["priceRange"].is_null());
    }

    #[test]
    fn test_price_range_min_not_above_max() {
        let listings = vec![
            listing("Prusa MK4", "$1,100.00", Some("Free")),
            listing("Prusa MK4", "$600.00", Some("$30.00")),
            listing("Prusa MK4", "$950.00", Some("Free")),
        ];
        let range = summarize_at(&listings, now()).models.mk4.price_range.unwrap();
        assert!(range.min <= range.max);
        assert_eq!(range.min, 630.0);
        assert_eq!(range.max, 1100.0);
    }

    #[test]
    fn test_upgrade_stats_exclude_expensive_items() {
        let listings = vec![
            listing("Hotend kit", "$60.00", None),
            listing("Misumi frame", "$40.00", None),
            listing("Bear upgrade frame full kit", "$450.00", None),
        ];
        let upgrade = summarize_at(&listings, now()).categories.upgrade;
        assert_eq!(upgrade.count, 3);
        assert_eq!(upgrade.avg_price, 50.0);
        assert_eq!(
            upgrade.price_range,
            Some(PriceRange {
                min: 40.0,
                max: 60.0
            })
        );
        assert_eq!(upgrade.popular_types.get("frame"), 2);
        assert_eq!(upgrade.popular_types.0[0].0, "frame");
    }

    #[test]
    fn test_empty_input() {
        let summary = summarize_at(Vec::<Listing>::new(), now());
        assert_eq!(summary.total_listings, 0);
        assert_eq!(summary.categories.printer.avg_price, 0.0);
        assert_eq!(summary.categories.upgrade.avg_price, 0.0);
        assert_eq!(summary.categories.upgrade.price_range, None);
        assert!(summary.categories.upgrade.popular_types.0.is_empty());
        assert!(summary.auctions.is_none());

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("auctions").is_none());
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let listings = vec![
            listing("Prusa MK4", "$799.00", Some("Free")),
            listing("Nozzle pack", "$12.00", None),
        ];
        let first = serde_json::to_string_pretty(&summarize_at(&listings, now())).unwrap();
        let second = serde_json::to_string_pretty(&summarize_at(&listings, now())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_auction_buckets() {
        let bid = |text: &'static str, left: &'static str| {
            move |raw: &mut RawItem| {
                raw.bids = Some(text.to_string());
                raw.time_left = Some(left.to_string());
            }
        };
        let listings = vec![
            listing_with("Prusa MK3S", "$500.00", Some("Free"), bid("3 bids", "2d left")),
            listing_with("Prusa MK3S+ kit", "$450.00", None, bid("8 bids", "30m left")),
            listing_with("Prusa MK4", "$700.00", None, bid("1 bid", "5h left")),
            listing_with("Hotend", "$50.00", None, bid("2 bids", "10m left")),
            listing("Prusa MINI+", "$300.00", Some("Free")),
        ];
        let auctions = summarize_at(&listings, now()).auctions.unwrap();

        assert_eq!(auctions.auction_type_counts.auction, 4);
        assert_eq!(auctions.auction_type_counts.buy_it_now, 1);
        assert_eq!(auctions.active_auctions.count, 4);
        assert_eq!(auctions.active_auctions.ending_soon_count, 2);
        assert_eq!(auctions.active_auctions.avg_current_bid, 425.0);

        let printer = &auctions.by_category.printer;
        let active: Vec<&str> = printer.active.iter().map(|a| a.title.as_str()).collect();
        // Ordered by end time: 5h before 2d
        assert_eq!(active, vec!["Prusa MK4", "Prusa MK3S"]);
        assert_eq!(printer.ending_soon.len(), 1);
        assert_eq!(auctions.by_category.upgrade.ending_soon[0].title, "Hotend");
    }

    #[test]
    fn test_custom_upgrade_ceiling() {
        let listings = vec![listing("Spare hotend", "$120.00", None)];
        let config = AggregatorConfig {
            upgrade_max_price: 100.0,
            ..AggregatorConfig::default()
        };
        let summary = summarize_with(&listings, config, now());
        assert_eq!(summary.categories.upgrade.count, 1);
        assert_eq!(summary.categories.upgrade.price_range, None);
    }
}
