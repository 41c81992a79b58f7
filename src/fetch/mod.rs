//! Fetching marketplace search pages.
//!
//! [`SearchClient`] requests result pages with per-host pacing
//! ([`RateLimiter`]) and exponential-backoff retries ([`RetryPolicy`]).
//! [`listing_stream`] drives any [`PageSource`] through one keyword's
//! pagination sweep and yields deduplicated listing batches.

mod client;
mod error;
mod rate_limiter;
mod retry;
mod stream;

pub use client::{
    DEFAULT_SEARCH_URL, DEFAULT_TIMEOUT_SECS, FetchConfig, SearchClient, SearchQuery,
    default_user_agent,
};
pub use error::FetchError;
pub use rate_limiter::{DEFAULT_REQUEST_DELAY, RateLimiter, extract_host, parse_retry_after};
pub use retry::{
    DEFAULT_MAX_RETRIES, FailureType, RetryDecision, RetryPolicy, classify_error,
    classify_http_status,
};
pub use stream::{PageSource, listing_stream};
