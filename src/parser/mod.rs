//! Field parsers for raw listing text fragments.
//!
//! Every function in this module converts one text fragment scraped from a
//! search-results item (price, shipping, seller info, bids, time left) into a
//! typed value. None of them fail: unparseable input degrades to a sentinel
//! (`0.0` or `None`) and, where the degradation hides data, a `warn!`
//! diagnostic is emitted instead of an error.
//!
//! # Example
//!
//! ```
//! use scout_core::parser::{parse_price, parse_shipping_cost};
//!
//! assert_eq!(parse_price("$1,099.00"), 1099.0);
//! assert_eq!(parse_shipping_cost("Free shipping"), Some(0.0));
//! assert_eq!(parse_shipping_cost("Varies"), None);
//! ```

mod auction;
mod price;
mod seller;

pub use auction::{
    AuctionTime, AuctionType, ENDING_SOON_SECS, detect_auction_type, parse_auction_time,
    parse_auction_time_at, parse_bid_count,
};
pub use price::{parse_price, parse_shipping_cost, round_cents};
pub use seller::{parse_feedback_count, parse_rating_percent};
