//! Printer-versus-upgrade classification.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::catalog::{PRINTER_KEYWORDS, TOO_CHEAP_RATIO, UPGRADE_KEYWORDS};
use super::model::detect_model;

/// What a listing sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// A complete printer.
    Printer,
    /// An upgrade, spare part or accessory.
    Upgrade,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Printer => write!(f, "printer"),
            Self::Upgrade => write!(f, "upgrade"),
        }
    }
}

/// Classifies a listing as a printer or an upgrade. First rule to match wins:
///
/// 1. an upgrade keyword in the title → upgrade
/// 2. a known model priced inside its plausible band → printer; priced below
///    30% of its reference price → upgrade
/// 3. a printer keyword in the title → printer
/// 4. otherwise upgrade
///
/// # Examples
///
/// ```
/// use scout_core::classify::{Category, classify};
///
/// assert_eq!(classify("Prusa MK4", 799.0), Category::Printer);
/// assert_eq!(classify("Bondtech extruder for MK3S", 85.0), Category::Upgrade);
/// assert_eq!(classify("Prusa MK4", 120.0), Category::Upgrade);
/// ```
#[must_use]
pub fn classify(title: &str, price: f64) -> Category {
    let lower = title.to_lowercase();

    if let Some(keyword) = UPGRADE_KEYWORDS.iter().find(|k| lower.contains(*k)) {
        trace!(title, keyword, "upgrade keyword");
        return Category::Upgrade;
    }

    let model = detect_model(title);
    if let Some(reference) = model.reference_price() {
        if model.is_plausible_price(price) {
            return Category::Printer;
        }
        if price < reference * TOO_CHEAP_RATIO {
            trace!(title, price, %model, "too cheap for a whole printer");
            return Category::Upgrade;
        }
    }

    if PRINTER_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Category::Printer;
    }

    Category::Upgrade
}
