//! HTTP client for marketplace search pages.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::RETRY_AFTER;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::rate_limiter::{DEFAULT_REQUEST_DELAY, RateLimiter, parse_retry_after};
use super::retry::{DEFAULT_MAX_RETRIES, FailureType, RetryDecision, RetryPolicy, classify_error};
use super::FetchError;

/// Search endpoint queried by default.
pub const DEFAULT_SEARCH_URL: &str = "https://www.ebay.com/sch/i.html";

/// Results requested per page.
const ITEMS_PER_PAGE: u32 = 50;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Project URL advertised in the User-Agent.
const PROJECT_UA_URL: &str = "https://github.com/fierce/prusa-scout";

/// User-Agent identifying this tool and its version.
#[must_use]
pub fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("prusa-scout/{version} (listing-research-tool; +{PROJECT_UA_URL})")
}

/// One keyword search near a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Search terms, e.g. `"Prusa MK4"`.
    pub keyword: String,
    /// Buyer postal code used for location-preferred results.
    pub zip_code: String,
}

impl SearchQuery {
    /// Creates a query.
    pub fn new(keyword: impl Into<String>, zip_code: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            zip_code: zip_code.into(),
        }
    }
}

/// Client settings.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Search endpoint; overridable to point at a test server.
    pub base_url: String,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Connection establishment timeout.
    pub connect_timeout: Duration,
    /// Minimum spacing between requests to the same host; zero disables it.
    pub request_delay: Duration,
    /// Attempts per page, the first one included.
    pub max_retries: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SEARCH_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            request_delay: DEFAULT_REQUEST_DELAY,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Fetches search result pages with pacing and retries.
///
/// Create once per run and reuse; the underlying connection pool and the
/// per-host pacing state are shared by every fetch.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    base_url: Url,
    retry_policy: RetryPolicy,
    rate_limiter: Arc<RateLimiter>,
}

impl SearchClient {
    /// Builds a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] for an unparseable base URL and
    /// [`FetchError::Client`] when the HTTP client cannot be built.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|_| FetchError::invalid_url(&config.base_url))?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .gzip(true)
            .user_agent(default_user_agent())
            .build()
            .map_err(FetchError::Client)?;

        let rate_limiter = Arc::new(RateLimiter::new(config.request_delay));
        debug!(
            %base_url,
            delay_ms = rate_limiter.delay().as_millis(),
            max_attempts = config.max_retries,
            "search client ready"
        );

        Ok(Self {
            client,
            base_url,
            retry_policy: RetryPolicy::with_max_attempts(config.max_retries),
            rate_limiter,
        })
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// URL of result page `page` (1-indexed) for `query`.
    #[must_use]
    pub fn page_url(&self, query: &SearchQuery, page: u32) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("_nkw", &query.keyword)
            .append_pair("_stpos", &query.zip_code)
            .append_pair("_ipg", &ITEMS_PER_PAGE.to_string())
            .append_pair("LH_PrefLoc", "2")
            .append_pair("_pgn", &page.to_string());
        url
    }

    /// Fetches one results page, or `None` once retries are exhausted or the
    /// failure is permanent. The final error is logged.
    #[instrument(skip(self), fields(keyword = %query.keyword))]
    pub async fn fetch_page(&self, query: &SearchQuery, page: u32) -> Option<String> {
        match self.try_fetch_page(query, page).await {
            Ok(markup) => Some(markup),
            Err(e) => {
                warn!(page, error = %e, "giving up on page");
                None
            }
        }
    }

    /// Fetches one results page, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns the last [`FetchError`] once the retry policy stops retrying.
    pub async fn try_fetch_page(&self, query: &SearchQuery, page: u32) -> Result<String, FetchError> {
        let url = self.page_url(query, page);
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            self.rate_limiter.acquire(url.as_str()).await;
            debug!(%url, attempt, "requesting page");

            let error = match self.get_once(&url).await {
                Ok(markup) => return Ok(markup),
                Err(e) => e,
            };

            let failure_type = classify_error(&error);
            let retry_after = if failure_type == FailureType::RateLimited {
                error.retry_after().and_then(parse_retry_after)
            } else {
                None
            };

            match self.retry_policy.should_retry(failure_type, attempt) {
                RetryDecision::Retry {
                    delay,
                    attempt: next_attempt,
                } => {
                    let delay = retry_after.unwrap_or(delay);
                    info!(
                        page,
                        attempt = next_attempt,
                        max_attempts = self.retry_policy.max_attempts(),
                        delay_ms = delay.as_millis(),
                        using_retry_after = retry_after.is_some(),
                        error = %error,
                        "retrying page"
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::DoNotRetry { reason } => {
                    debug!(page, %reason, "not retrying page");
                    return Err(error);
                }
            }
        }
    }

    async fn get_once(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_request(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            return Err(FetchError::http_status_with_retry_after(
                url.as_str(),
                status.as_u16(),
                retry_after,
            ));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::body(url.as_str(), e))
    }
}
