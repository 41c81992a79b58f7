//! Product catalog: reference prices, plausible price bands and keyword lists.
//!
//! List order is significant wherever it is iterated: model patterns are
//! tried in priority order and upgrade sub-types are reported in list order
//! when their frequencies tie.

use std::sync::LazyLock;

use regex::Regex;

use super::model::ModelTag;

/// Listings priced below this fraction of a model's reference price are
/// too cheap to be the whole printer.
pub const TOO_CHEAP_RATIO: f64 = 0.3;

/// Ceiling for prices counted in upgrade statistics; anything above is most
/// likely a printer listed with an accessory keyword.
pub const UPGRADE_MAX_PRICE: f64 = 300.0;

/// Lower-cased title prefix of the marketplace's placeholder result card.
pub const PLACEHOLDER_TITLE_PREFIX: &str = "shop on ebay";

/// Substrings that veto a model match: the listing references a model but
/// sells an accessory for it.
pub const MODEL_GUARD_WORDS: [&str; 2] = ["upgrade", "part"];

/// Any of these in a title marks the listing as an upgrade or part.
pub const UPGRADE_KEYWORDS: [&str; 18] = [
    "hotend",
    "frame",
    "bear upgrade",
    "nozzle",
    "extruder",
    "thermistor",
    "misumi",
    "sheet",
    "fan shroud",
    "bondtech",
    "thermistor sensor",
    "pinda",
    "bobbin holder",
    "spool holder",
    "upgrade",
    "part",
    "spare",
    "component",
];

/// Any of these in a title suggests a complete printer.
pub const PRINTER_KEYWORDS: [&str; 7] = [
    "3d printer",
    "assembled",
    "complete kit",
    "full kit",
    "working printer",
    "printing",
    "fully built",
];

/// Upgrade sub-types tracked in the summary's popularity table.
pub const UPGRADE_TYPE_KEYWORDS: [&str; 8] = [
    "hotend", "frame", "nozzle", "extruder", "sheet", "bondtech", "bear", "pinda",
];

/// Closed price interval a genuine printer listing is expected to fall in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBand {
    /// Lowest plausible price.
    pub min: f64,
    /// Highest plausible price.
    pub max: f64,
}

impl PriceBand {
    /// Returns true if `price` lies within the band, bounds included.
    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        (self.min..=self.max).contains(&price)
    }
}

/// Model detection patterns in priority order. Titles are lower-cased
/// before matching.
#[allow(clippy::expect_used)]
pub(crate) static MODEL_PATTERNS: LazyLock<Vec<(ModelTag, Vec<Regex>)>> = LazyLock::new(|| {
    let table: [(ModelTag, &[&str]); 4] = [
        (
            ModelTag::Mk3s,
            &[
                r"\bmk3\s*s\+?\b",
                r"\bmk3\s+s\+?\b",
                r"\bi3\s*mk3s\+?\b",
                r"prusa\s+mk3s\+?\b",
            ],
        ),
        (
            ModelTag::Mk4,
            &[r"\bmk4\b", r"\bmk\s*4\b", r"\bi3\s*mk4\b", r"prusa\s+mk4\b"],
        ),
        (
            ModelTag::Mini,
            &[r"\bmini\+?\b", r"prusa\s+mini\+?\b", r"mini\s*\+\b"],
        ),
        (
            ModelTag::Core,
            &[
                r"\bcore\s*one\b",
                r"\bcore\s*1\b",
                r"\bcore1\b",
                r"original\s+core\b",
                r"prusa\s+core",
            ],
        ),
    ];

    table
        .into_iter()
        .map(|(tag, patterns)| {
            let compiled = patterns
                .iter()
                .map(|p| Regex::new(p).expect("model regex is valid")) // Static pattern, safe to panic
                .collect();
            (tag, compiled)
        })
        .collect()
});

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_model_patterns_priority_order() {
        let order: Vec<ModelTag> = MODEL_PATTERNS.iter().map(|(tag, _)| *tag).collect();
        assert_eq!(order, ModelTag::KNOWN);
    }

    #[test]
    fn test_price_band_bounds_inclusive() {
        let band = PriceBand {
            min: 400.0,
            max: 1200.0,
        };
        assert!(band.contains(400.0));
        assert!(band.contains(1200.0));
        assert!(!band.contains(399.99));
        assert!(!band.contains(1200.01));
    }

    #[test]
    fn test_keyword_lists_are_lowercase() {
        for keyword in UPGRADE_KEYWORDS
            .iter()
            .chain(PRINTER_KEYWORDS.iter())
            .chain(UPGRADE_TYPE_KEYWORDS.iter())
        {
            assert_eq!(*keyword, keyword.to_lowercase());
        }
    }
}
