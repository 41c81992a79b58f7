//! Seller feedback parsing.
//!
//! Seller info arrives as a single fragment such as `"printshop (1523) 99.8%"`.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// First integer wrapped in parentheses: the feedback count.
#[allow(clippy::expect_used)]
static FEEDBACK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((\d+)\)").expect("feedback regex is valid") // Static pattern, safe to panic
});

/// First number (one optional decimal part) directly followed by `%`.
#[allow(clippy::expect_used)]
static RATING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)%").expect("rating regex is valid") // Static pattern, safe to panic
});

/// Extracts the seller feedback count, e.g. `1523` from `"shop (1523) 99.8%"`.
///
/// # Examples
///
/// ```
/// use scout_core::parser::parse_feedback_count;
///
/// assert_eq!(parse_feedback_count("printshop (1523) 99.8%"), Some(1523));
/// assert_eq!(parse_feedback_count("printshop 99.8%"), None);
/// ```
#[must_use]
pub fn parse_feedback_count(text: &str) -> Option<u64> {
    let caps = FEEDBACK_PATTERN.captures(text)?;
    match caps[1].parse::<u64>() {
        Ok(count) => Some(count),
        Err(e) => {
            debug!(raw = %text, error = %e, "feedback count out of range");
            None
        }
    }
}

/// Extracts the seller positive-feedback percentage.
///
/// Values outside `0..=100` are rejected.
///
/// # Examples
///
/// ```
/// use scout_core::parser::parse_rating_percent;
///
/// assert_eq!(parse_rating_percent("printshop (1523) 99.8%"), Some(99.8));
/// assert_eq!(parse_rating_percent("no rating"), None);
/// ```
#[must_use]
pub fn parse_rating_percent(text: &str) -> Option<f64> {
    let caps = RATING_PATTERN.captures(text)?;
    let rating = caps[1].parse::<f64>().ok()?;
    if (0.0..=100.0).contains(&rating) {
        Some(rating)
    } else {
        debug!(raw = %text, rating, "rating outside 0..=100, ignoring");
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_count_found() {
        assert_eq!(parse_feedback_count("maker_store (42) 100%"), Some(42));
    }

    #[test]
    fn test_feedback_count_first_match_wins() {
        assert_eq!(parse_feedback_count("a (7) b (9)"), Some(7));
    }

    #[test]
    fn test_feedback_count_absent() {
        assert_eq!(parse_feedback_count(""), None);
        assert_eq!(parse_feedback_count("maker_store 100%"), None);
    }

    #[test]
    fn test_feedback_count_with_separator_is_rejected() {
        // Only bare digits inside parentheses count
        assert_eq!(parse_feedback_count("maker_store (1,234)"), None);
    }

    #[test]
    fn test_feedback_count_overflow_is_none() {
        assert_eq!(
            parse_feedback_count("shop (999999999999999999999999)"),
            None
        );
    }

    #[test]
    fn test_rating_percent_decimal() {
        assert_eq!(parse_rating_percent("maker_store (42) 99.5%"), Some(99.5));
    }

    #[test]
    fn test_rating_percent_integer() {
        assert_eq!(parse_rating_percent("100% positive"), Some(100.0));
    }

    #[test]
    fn test_rating_percent_requires_percent_sign() {
        assert_eq!(parse_rating_percent("maker_store (42) 99.5"), None);
    }

    #[test]
    fn test_rating_percent_above_hundred_rejected() {
        assert_eq!(parse_rating_percent("150%"), None);
    }
}
