//! Single-page extraction: result cards and pagination.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

use crate::listing::{Listing, RawItem, build_listing};

macro_rules! selector {
    ($name:ident, $css:literal) => {
        #[allow(clippy::expect_used)]
        static $name: LazyLock<Selector> = LazyLock::new(|| {
            Selector::parse($css).expect("selector is valid") // Static pattern, safe to panic
        });
    };
}

selector!(ITEM, ".s-item");
selector!(TITLE, ".s-item__title");
selector!(PRICE, ".s-item__price");
selector!(LINK, ".s-item__link");
selector!(SHIPPING, ".s-item__logisticsCost, .s-item__shipping");
selector!(SELLER, ".s-item__seller-info-text");
selector!(BIDS, ".s-item__bids, .s-item__bidCount");
selector!(TIME_LEFT, ".s-item__time-left");
selector!(
    PURCHASE_OPTIONS,
    ".s-item__purchase-options, .s-item__purchase-options-with-icon"
);
selector!(PAGINATION, ".pagination__items");
selector!(PAGINATION_LINK, "li a");

/// Extracts every buildable listing from one results page.
///
/// Cards that fail to build (placeholder, missing title/price/link) are
/// skipped. Unrecognizable markup yields an empty list.
#[must_use]
pub fn extract_page(markup: &str) -> Vec<Listing> {
    extract_page_at(markup, Utc::now())
}

/// Like [`extract_page`], anchoring auction countdowns at `now`.
#[must_use]
#[instrument(level = "debug", skip(markup), fields(bytes = markup.len()))]
pub fn extract_page_at(markup: &str, now: DateTime<Utc>) -> Vec<Listing> {
    let document = Html::parse_document(markup);
    let mut listings = Vec::new();
    let mut skipped = 0usize;

    for card in document.select(&ITEM) {
        match build_listing(raw_item(card), now) {
            Ok(listing) => listings.push(listing),
            Err(e) => {
                skipped += 1;
                debug!(error = %e, "skipping result card");
            }
        }
    }

    debug!(extracted = listings.len(), skipped, "page extracted");
    listings
}

/// Number of result pages advertised by the pagination control.
///
/// Takes the largest numeric link label inside `.pagination__items`;
/// returns `1` when the control is missing or has no numeric labels.
///
/// # Examples
///
/// ```
/// use scout_core::extract::total_page_count;
///
/// let html = r#"<ol class="pagination__items">
///     <li><a>1</a></li><li><a>2</a></li><li><a>7</a></li>
/// </ol>"#;
/// assert_eq!(total_page_count(html), 7);
/// assert_eq!(total_page_count("<p>no results</p>"), 1);
/// ```
#[must_use]
pub fn total_page_count(markup: &str) -> u32 {
    let document = Html::parse_document(markup);
    let Some(pagination) = document.select(&PAGINATION).next() else {
        return 1;
    };

    pagination
        .select(&PAGINATION_LINK)
        .filter_map(|link| text_of(link).parse::<u32>().ok())
        .max()
        .unwrap_or(1)
        .max(1)
}

fn raw_item(card: ElementRef<'_>) -> RawItem {
    RawItem {
        title: first_text(card, &TITLE),
        price: first_text(card, &PRICE),
        link: card
            .select(&LINK)
            .next()
            .map(|a| a.value().attr("href").unwrap_or_default().to_string()),
        shipping: first_text(card, &SHIPPING),
        seller: first_text(card, &SELLER),
        bids: first_text(card, &BIDS),
        time_left: first_text(card, &TIME_LEFT),
        purchase_options: first_text(card, &PURCHASE_OPTIONS),
    }
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector).next().map(text_of)
}

/// Trimmed text nodes of an element joined by single spaces.
fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
