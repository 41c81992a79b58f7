//! Per-host request pacing.
//!
//! Successive requests to the same host are spaced at least a configured
//! delay apart; the first request to a host goes out immediately.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use scout_core::fetch::RateLimiter;
//!
//! # async fn example() {
//! let limiter = RateLimiter::new(Duration::from_secs(1));
//! limiter.acquire("https://www.ebay.com/sch/i.html?_pgn=1").await; // immediate
//! limiter.acquire("https://www.ebay.com/sch/i.html?_pgn=2").await; // waits ~1s
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

/// Default spacing between requests to one host.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(1000);

/// Cap on server-requested waits.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(3600);

/// Per-host rate limiter, shareable across tasks behind an `Arc`.
#[derive(Debug)]
pub struct RateLimiter {
    delay: Duration,
    hosts: DashMap<String, Arc<HostState>>,
}

#[derive(Debug)]
struct HostState {
    /// `None` until the first request to the host.
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter spacing same-host requests by `delay`. A zero delay
    /// disables limiting.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        debug!(delay_ms = delay.as_millis(), "creating rate limiter");
        Self {
            delay,
            hosts: DashMap::new(),
        }
    }

    /// A limiter that never waits.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Returns whether the limiter never waits.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.delay.is_zero()
    }

    /// Spacing between requests to the same host.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits until a request to `url`'s host is allowed, then records it.
    #[instrument(level = "debug", skip(self), fields(host))]
    pub async fn acquire(&self, url: &str) {
        if self.is_disabled() {
            return;
        }

        let host = extract_host(url);
        tracing::Span::current().record("host", host.as_str());

        // Clone the Arc so the map shard is not locked across the await
        let state = self
            .hosts
            .entry(host)
            .or_insert_with(|| {
                Arc::new(HostState {
                    last_request: Mutex::new(None),
                })
            })
            .clone();

        let mut last_request = state.last_request.lock().await;
        if let Some(previous) = *last_request {
            let elapsed = previous.elapsed();
            if elapsed < self.delay {
                let wait = self.delay - elapsed;
                debug!(wait_ms = wait.as_millis(), "pacing request");
                tokio::time::sleep(wait).await;
            }
        }
        *last_request = Some(Instant::now());
    }
}

/// Lower-cased host of `url`, or `"unknown"` when it has none.
///
/// # Examples
///
/// ```
/// use scout_core::fetch::extract_host;
///
/// assert_eq!(extract_host("https://WWW.eBay.com/sch/i.html"), "www.ebay.com");
/// assert_eq!(extract_host("not a url"), "unknown");
/// ```
#[must_use]
pub fn extract_host(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Parses a `Retry-After` value: delta seconds or an HTTP date.
///
/// Negative, unparseable or past values give `None`; waits longer than an
/// hour are capped.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use scout_core::fetch::parse_retry_after;
///
/// assert_eq!(parse_retry_after("120"), Some(Duration::from_secs(120)));
/// assert_eq!(parse_retry_after("soon"), None);
/// ```
#[must_use]
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let value = value.trim();

    let requested = if let Ok(seconds) = value.parse::<u64>() {
        Duration::from_secs(seconds)
    } else {
        let at = httpdate::parse_http_date(value).ok()?;
        match at.duration_since(std::time::SystemTime::now()) {
            Ok(wait) => wait,
            Err(_) => {
                debug!(value, "Retry-After date already passed");
                return None;
            }
        }
    };

    if requested > MAX_RETRY_AFTER {
        warn!(
            requested_secs = requested.as_secs(),
            "Retry-After exceeds one hour, capping"
        );
        return Some(MAX_RETRY_AFTER);
    }
    Some(requested)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::SystemTime;

    use super::*;

    #[tokio::test]
    async fn test_first_request_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_secs(5));
        let start = Instant::now();
        limiter.acquire("https://www.ebay.com/a").await;
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_same_host_is_paced() {
        let limiter = RateLimiter::new(Duration::from_millis(200));
        assert_eq!(limiter.delay(), Duration::from_millis(200));
        assert!(!limiter.is_disabled());
        let start = Instant::now();
        limiter.acquire("https://www.ebay.com/a").await;
        limiter.acquire("https://www.ebay.com/b").await;
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_other_hosts_not_paced() {
        let limiter = RateLimiter::new(Duration::from_secs(5));
        let start = Instant::now();
        limiter.acquire("https://www.ebay.com/a").await;
        limiter.acquire("https://www.ebay.co.uk/a").await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_disabled_never_waits() {
        let limiter = RateLimiter::disabled();
        assert!(limiter.is_disabled());
        assert_eq!(limiter.delay(), Duration::ZERO);
        let start = Instant::now();
        for _ in 0..5 {
            limiter.acquire("https://www.ebay.com/a").await;
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn test_parse_retry_after_seconds_and_cap() {
        assert_eq!(parse_retry_after(" 30 "), Some(Duration::from_secs(30)));
        assert_eq!(parse_retry_after("0"), Some(Duration::ZERO));
        assert_eq!(parse_retry_after("999999"), Some(MAX_RETRY_AFTER));
        assert_eq!(parse_retry_after("-5"), None);
    }

    #[test]
    fn test_parse_retry_after_http_date() {
        let future = SystemTime::now() + Duration::from_secs(120);
        let header = httpdate::fmt_http_date(future);
        let wait = parse_retry_after(&header).unwrap();
        assert!(wait <= Duration::from_secs(120));
        assert!(wait >= Duration::from_secs(100));

        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }
}
