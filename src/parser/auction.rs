//! Auction format detection and time-remaining parsing.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Auctions closing within this many seconds count as "ending soon".
pub const ENDING_SOON_SECS: u64 = 3600;

#[allow(clippy::expect_used)]
static DAYS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*d").expect("days regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static HOURS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*h").expect("hours regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static MINUTES_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*m").expect("minutes regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static FIRST_INTEGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+").expect("integer regex is valid") // Static pattern, safe to panic
});

/// How a listing is sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuctionType {
    /// Fixed price only.
    BuyItNow,
    /// Bidding only.
    Auction,
    /// Bidding with a Buy It Now option.
    Hybrid,
}

impl AuctionType {
    /// Returns true for formats that take bids.
    #[must_use]
    pub fn takes_bids(self) -> bool {
        matches!(self, Self::Auction | Self::Hybrid)
    }
}

impl fmt::Display for AuctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuyItNow => write!(f, "BuyItNow"),
            Self::Auction => write!(f, "Auction"),
            Self::Hybrid => write!(f, "Hybrid"),
        }
    }
}

/// Remaining time on an auction, anchored to the moment it was parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionTime {
    /// Text as shown on the page, e.g. `"2d 3h left"`.
    pub time_remaining_text: String,
    /// Days, hours and minutes folded into seconds.
    pub seconds_remaining: u64,
    /// Parse time plus the remaining duration.
    pub estimated_end_time: DateTime<Utc>,
}

impl AuctionTime {
    /// Returns true when fewer than `threshold_secs` seconds remain.
    #[must_use]
    pub fn is_ending_soon(&self, threshold_secs: u64) -> bool {
        self.seconds_remaining < threshold_secs
    }
}

/// Classifies the selling format from the item's bid, time-left and
/// purchase-option fragments.
///
/// A listing showing bids or a countdown is an auction; if it also offers
/// "Buy It Now" it is a hybrid. Everything else is fixed price.
#[must_use]
pub fn detect_auction_type(
    bids: Option<&str>,
    time_left: Option<&str>,
    purchase_options: Option<&str>,
) -> AuctionType {
    let present = |fragment: Option<&str>| fragment.is_some_and(|s| !s.trim().is_empty());
    let takes_bids = present(bids) || present(time_left);
    let buy_now = purchase_options.is_some_and(|s| s.to_lowercase().contains("buy it now"));

    match (takes_bids, buy_now) {
        (true, true) => AuctionType::Hybrid,
        (true, false) => AuctionType::Auction,
        (false, _) => AuctionType::BuyItNow,
    }
}

/// Extracts the bid count from a fragment like `"12 bids"`.
#[must_use]
pub fn parse_bid_count(text: &str) -> Option<u32> {
    FIRST_INTEGER.find(text)?.as_str().parse().ok()
}

/// Parses a time-left fragment relative to the current time.
///
/// See [`parse_auction_time_at`].
#[must_use]
pub fn parse_auction_time(text: &str) -> Option<AuctionTime> {
    parse_auction_time_at(text, Utc::now())
}

/// Parses a time-left fragment such as `"2d 3h left"` relative to `now`.
///
/// Days, hours and minutes are each read by their own pattern and default to
/// zero when missing, so `"45m"` and `"1d 5m left"` both parse. Returns
/// `None` only when the fragment is empty.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use scout_core::parser::parse_auction_time_at;
///
/// let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let time = parse_auction_time_at("1d 2h 3m left", now).unwrap();
/// assert_eq!(time.seconds_remaining, 86_400 + 7_200 + 180);
/// ```
#[must_use]
pub fn parse_auction_time_at(text: &str, now: DateTime<Utc>) -> Option<AuctionTime> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let body = strip_left_marker(trimmed);
    let days = component(&DAYS_PATTERN, body);
    let hours = component(&HOURS_PATTERN, body);
    let minutes = component(&MINUTES_PATTERN, body);

    let seconds_remaining = days
        .saturating_mul(86_400)
        .saturating_add(hours.saturating_mul(3_600))
        .saturating_add(minutes.saturating_mul(60));

    let estimated_end_time = i64::try_from(seconds_remaining)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    debug!(
        raw = %trimmed,
        days,
        hours,
        minutes,
        seconds_remaining,
        "parsed auction time"
    );

    Some(AuctionTime {
        time_remaining_text: trimmed.to_string(),
        seconds_remaining,
        estimated_end_time,
    })
}

/// Drops a trailing "left" (any case) from a time fragment.
fn strip_left_marker(text: &str) -> &str {
    let split = text.len().saturating_sub(4);
    match text.get(split..) {
        Some(tail) if tail.eq_ignore_ascii_case("left") => text[..split].trim_end(),
        _ => text,
    }
}

fn component(pattern: &Regex, text: &str) -> u64 {
    pattern
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_auction_time_all_components() {
        let time = parse_auction_time_at("2d 3h 15m left", fixed_now()).unwrap();
        assert_eq!(time.seconds_remaining, 2 * 86_400 + 3 * 3_600 + 15 * 60);
        assert_eq!(time.time_remaining_text, "2d 3h 15m left");
        assert_eq!(
            time.estimated_end_time,
            Utc.with_ymd_and_hms(2024, 6, 3, 15, 15, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_auction_time_missing_components_default_to_zero() {
        let time = parse_auction_time_at("45m left", fixed_now()).unwrap();
        assert_eq!(time.seconds_remaining, 45 * 60);

        let time = parse_auction_time_at("1d", fixed_now()).unwrap();
        assert_eq!(time.seconds_remaining, 86_400);
    }

    #[test]
    fn test_parse_auction_time_uppercase_left_marker() {
        let time = parse_auction_time_at("5h LEFT", fixed_now()).unwrap();
        assert_eq!(time.seconds_remaining, 5 * 3_600);
    }

    #[test]
    fn test_parse_auction_time_empty_is_none() {
        assert!(parse_auction_time_at("", fixed_now()).is_none());
        assert!(parse_auction_time_at("   ", fixed_now()).is_none());
    }

    #[test]
    fn test_parse_auction_time_without_components_is_zero() {
        let time = parse_auction_time_at("Ending", fixed_now()).unwrap();
        assert_eq!(time.seconds_remaining, 0);
        assert_eq!(time.estimated_end_time, fixed_now());
    }

    #[test]
    fn test_ending_soon_threshold() {
        let soon = parse_auction_time_at("59m left", fixed_now()).unwrap();
        let later = parse_auction_time_at("1h left", fixed_now()).unwrap();
        assert!(soon.is_ending_soon(ENDING_SOON_SECS));
        assert!(!later.is_ending_soon(ENDING_SOON_SECS));
    }

    #[test]
    fn test_detect_auction_type() {
        assert_eq!(
            detect_auction_type(Some("3 bids"), Some("1d left"), None),
            AuctionType::Auction
        );
        assert_eq!(
            detect_auction_type(Some("0 bids"), None, Some("or Buy It Now")),
            AuctionType::Hybrid
        );
        assert_eq!(
            detect_auction_type(None, None, Some("Buy It Now")),
            AuctionType::BuyItNow
        );
        assert_eq!(detect_auction_type(None, Some("  "), None), AuctionType::BuyItNow);
    }

    #[test]
    fn test_parse_bid_count() {
        assert_eq!(parse_bid_count("12 bids"), Some(12));
        assert_eq!(parse_bid_count("1 bid"), Some(1));
        assert_eq!(parse_bid_count("no bids yet"), None);
    }

    #[test]
    fn test_auction_type_serializes_as_tag() {
        let json = serde_json::to_string(&AuctionType::BuyItNow).unwrap();
        assert_eq!(json, "\"BuyItNow\"");
        assert!(AuctionType::Hybrid.takes_bids());
        assert!(!AuctionType::BuyItNow.takes_bids());
    }
}
