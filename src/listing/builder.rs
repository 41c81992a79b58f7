//! Assembles a [`Listing`] from the text fragments of one result card.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{BuildError, Listing, PLATFORM};
use crate::classify::{PLACEHOLDER_TITLE_PREFIX, classify, detect_model};
use crate::parser::{
    AuctionType, detect_auction_type, parse_auction_time_at, parse_bid_count,
    parse_feedback_count, parse_price, parse_rating_percent, parse_shipping_cost, round_cents,
};

/// Shipping text assumed when a card shows no shipping line.
const MISSING_SHIPPING_TEXT: &str = "Varies";

/// Text fragments pulled out of a single result card.
///
/// `None` means the element was absent from the markup; `Some("")` means it
/// was present but empty. The distinction matters for the required fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    /// Title text.
    pub title: Option<String>,
    /// Price text, e.g. `"$799.00"`.
    pub price: Option<String>,
    /// Item URL taken from the link's `href`; empty when the anchor has none.
    /// `None` only when the card has no link anchor at all.
    pub link: Option<String>,
    /// Shipping line, e.g. `"+$25.00 shipping"`.
    pub shipping: Option<String>,
    /// Seller line, e.g. `"printshop (1523) 99.8%"`.
    pub seller: Option<String>,
    /// Bid line, e.g. `"3 bids"`.
    pub bids: Option<String>,
    /// Countdown, e.g. `"2d 3h left"`.
    pub time_left: Option<String>,
    /// Purchase options, e.g. `"or Buy It Now"`.
    pub purchase_options: Option<String>,
}

/// Builds a listing from a raw item, anchoring any auction countdown at `now`.
///
/// Runs every field parser and both classifiers, then derives `total_cost`
/// (only when shipping is known) and `price_vs_reference` (only when the
/// total exists and the model has a reference price).
///
/// # Errors
///
/// Returns [`BuildError`] when the title, price or link is absent, the title
/// is empty, or the card is the "Shop on eBay" placeholder.
pub fn build_listing(raw: RawItem, now: DateTime<Utc>) -> Result<Listing, BuildError> {
    let title = raw.title.ok_or(BuildError::missing("title"))?;
    let price_text = raw.price.ok_or(BuildError::missing("price"))?;
    let link = raw.link.ok_or(BuildError::missing("link"))?;

    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(BuildError::EmptyTitle);
    }
    if title.to_lowercase().starts_with(PLACEHOLDER_TITLE_PREFIX) {
        return Err(BuildError::placeholder(title));
    }

    let price = parse_price(&price_text);
    let shipping_cost =
        parse_shipping_cost(raw.shipping.as_deref().unwrap_or(MISSING_SHIPPING_TEXT));
    let seller_info = raw.seller.unwrap_or_default();

    let model = detect_model(&title);
    let category = classify(&title, price);

    let total_cost = shipping_cost.map(|shipping| round_cents(price + shipping));
    let price_vs_reference = total_cost
        .zip(model.reference_price())
        .map(|(total, reference)| round_cents(total - reference));

    let auction_type = detect_auction_type(
        raw.bids.as_deref(),
        raw.time_left.as_deref(),
        raw.purchase_options.as_deref(),
    );
    let bid_count = raw.bids.as_deref().and_then(parse_bid_count);
    let auction_time = match auction_type {
        AuctionType::Auction | AuctionType::Hybrid => raw
            .time_left
            .as_deref()
            .and_then(|text| parse_auction_time_at(text, now)),
        AuctionType::BuyItNow => None,
    };

    debug!(%title, %model, %category, price, ?total_cost, "built listing");

    Ok(Listing {
        platform: PLATFORM.to_string(),
        seller_feedback_count: parse_feedback_count(&seller_info),
        seller_rating_percent: parse_rating_percent(&seller_info),
        title,
        price,
        shipping_cost,
        total_cost,
        price_vs_reference,
        seller_info,
        link,
        category,
        model,
        auction_type,
        bid_count,
        auction_time,
    })
}
