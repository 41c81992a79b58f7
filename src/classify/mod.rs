//! Listing classification: which printer model a title names and whether the
//! listing sells a whole printer or an upgrade.
//!
//! Everything here is pure and keyed on the listing title (plus price for
//! the category).
//!
//! # Example
//!
//! ```
//! use scout_core::classify::{Category, ModelTag, classify, detect_model};
//!
//! let title = "Original Prusa MK4 assembled";
//! assert_eq!(detect_model(title), ModelTag::Mk4);
//! assert_eq!(classify(title, 899.0), Category::Printer);
//! ```

mod catalog;
mod category;
mod model;

pub use catalog::{
    PLACEHOLDER_TITLE_PREFIX, PRINTER_KEYWORDS, PriceBand, TOO_CHEAP_RATIO, UPGRADE_KEYWORDS,
    UPGRADE_MAX_PRICE, UPGRADE_TYPE_KEYWORDS,
};
pub use category::{Category, classify};
pub use model::{ModelTag, detect_model};
