//! JSON output: current and dated copies of listings and summaries, plus a
//! metadata index of the dated listing snapshots.

mod error;
mod layout;
mod store;

pub use error::PersistError;
pub use layout::{DEFAULT_OUTPUT_DIR, OutputLayout, historical_relative};
pub use store::{
    ListingsDocument, Metadata, SavedPaths, save_listings, save_summary, update_metadata,
};
