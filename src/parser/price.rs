//! Price and shipping-cost parsing.

use tracing::{trace, warn};

/// Shipping phrases meaning the cost is not known up front.
const UNSPECIFIED_SHIPPING_MARKERS: [&str; 3] = ["varies", "not specified", "see details"];

/// Parses a currency string into an amount.
///
/// Every character that is not an ASCII digit or `.` is stripped before
/// parsing, so currency symbols, thousands separators and surrounding words
/// are ignored. Returns `0.0` (and logs a warning) when nothing parseable
/// remains, e.g. for empty input, ranges such as `"$20.00 to $30.00"` or
/// text without digits.
///
/// # Examples
///
/// ```
/// use scout_core::parser::parse_price;
///
/// assert_eq!(parse_price("$1,099.00"), 1099.0);
/// assert_eq!(parse_price("US $45.50"), 45.5);
/// assert_eq!(parse_price("garbage"), 0.0);
/// ```
#[must_use]
pub fn parse_price(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            warn!(raw = %text, "failed to parse price, defaulting to 0.0");
            0.0
        }
    }
}

/// Parses a shipping fragment.
///
/// - contains "free" → `Some(0.0)`
/// - contains "varies", "not specified" or "see details" → `None`
/// - anything else → `Some(parse_price(text))`
///
/// The "free" check runs first, so `"Free shipping, see details"` is free.
///
/// # Examples
///
/// ```
/// use scout_core::parser::parse_shipping_cost;
///
/// assert_eq!(parse_shipping_cost("Free shipping"), Some(0.0));
/// assert_eq!(parse_shipping_cost("Shipping varies"), None);
/// assert_eq!(parse_shipping_cost("+$12.50 shipping"), Some(12.5));
/// ```
#[must_use]
pub fn parse_shipping_cost(text: &str) -> Option<f64> {
    let lower = text.to_lowercase();
    if lower.contains("free") {
        trace!(raw = %text, "free shipping");
        return Some(0.0);
    }
    if UNSPECIFIED_SHIPPING_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
    {
        trace!(raw = %text, "shipping cost unspecified");
        return None;
    }
    Some(parse_price(text))
}

/// Rounds an amount to whole cents.
#[must_use]
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
