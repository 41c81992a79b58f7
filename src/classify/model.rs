//! Printer model detection from listing titles.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::catalog::{MODEL_GUARD_WORDS, MODEL_PATTERNS, PriceBand};

/// Printer model a listing refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelTag {
    /// Original Prusa i3 MK3S / MK3S+.
    #[serde(rename = "MK3S")]
    Mk3s,
    /// Original Prusa MK4.
    #[serde(rename = "MK4")]
    Mk4,
    /// Original Prusa MINI / MINI+.
    #[serde(rename = "MINI")]
    Mini,
    /// Prusa Core One.
    #[serde(rename = "CORE")]
    Core,
    /// No model could be attributed.
    Unknown,
}

impl ModelTag {
    /// Models with reference prices, in detection priority order.
    pub const KNOWN: [ModelTag; 4] = [Self::Mk3s, Self::Mk4, Self::Mini, Self::Core];

    /// Official kit price in USD, if the model is known.
    #[must_use]
    pub fn reference_price(self) -> Option<f64> {
        match self {
            Self::Mk3s | Self::Mk4 => Some(799.0),
            Self::Mini => Some(379.0),
            Self::Core => Some(399.0),
            Self::Unknown => None,
        }
    }

    /// Price band a whole printer of this model is expected to sell for.
    #[must_use]
    pub fn plausible_range(self) -> Option<PriceBand> {
        let (min, max) = match self {
            Self::Mk3s => (400.0, 1200.0),
            Self::Mk4 => (500.0, 1300.0),
            Self::Mini => (250.0, 500.0),
            Self::Core => (300.0, 500.0),
            Self::Unknown => return None,
        };
        Some(PriceBand { min, max })
    }

    /// Returns true if `price` is plausible for a whole printer of this model.
    /// Always false for [`ModelTag::Unknown`].
    #[must_use]
    pub fn is_plausible_price(self, price: f64) -> bool {
        self.plausible_range().is_some_and(|band| band.contains(price))
    }
}

impl fmt::Display for ModelTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mk3s => write!(f, "MK3S"),
            Self::Mk4 => write!(f, "MK4"),
            Self::Mini => write!(f, "MINI"),
            Self::Core => write!(f, "CORE"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Detects the printer model a title refers to.
///
/// Models are tried in priority order (MK3S, MK4, MINI, CORE). A matching
/// model is rejected when the title also contains "upgrade" or "part", since
/// such titles name a model only to describe an accessory; detection then
/// falls through to the remaining models and finally to
/// [`ModelTag::Unknown`].
///
/// # Examples
///
/// ```
/// use scout_core::classify::{ModelTag, detect_model};
///
/// assert_eq!(detect_model("Original Prusa i3 MK3S+ kit"), ModelTag::Mk3s);
/// assert_eq!(detect_model("MK3S upgrade kit"), ModelTag::Unknown);
/// assert_eq!(detect_model("Ender 3 V2"), ModelTag::Unknown);
/// ```
#[must_use]
pub fn detect_model(title: &str) -> ModelTag {
    let lower = title.to_lowercase();
    let guarded = MODEL_GUARD_WORDS.iter().any(|word| lower.contains(word));

    for (tag, patterns) in MODEL_PATTERNS.iter() {
        if !patterns.iter().any(|pattern| pattern.is_match(&lower)) {
            continue;
        }
        if guarded {
            trace!(model = %tag, title, "model match rejected by accessory guard");
            continue;
        }
        return *tag;
    }

    ModelTag::Unknown
}
