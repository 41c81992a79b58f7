//! Retry policy with exponential backoff for page fetches.
//!
//! A failed fetch is classified into a [`FailureType`]; the [`RetryPolicy`]
//! then decides whether another attempt is worth it and how long to wait.
//!
//! # Example
//!
//! ```
//! use scout_core::fetch::{FetchError, RetryDecision, RetryPolicy, classify_error};
//!
//! let policy = RetryPolicy::default();
//! let error = FetchError::http_status("https://www.ebay.com/sch/i.html", 503);
//!
//! match policy.should_retry(classify_error(&error), 1) {
//!     RetryDecision::Retry { attempt, .. } => assert_eq!(attempt, 2),
//!     RetryDecision::DoNotRetry { reason } => panic!("unexpected: {reason}"),
//! }
//! ```

use std::time::Duration;

use rand::Rng;
use tracing::{debug, instrument};

use super::FetchError;

/// Default attempts per page, the first one included.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(32);
const DEFAULT_BACKOFF_MULTIPLIER: f32 = 2.0;

/// Upper bound on random jitter added to each backoff delay.
const MAX_JITTER: Duration = Duration::from_millis(500);

/// How a fetch failure affects retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// May succeed on retry: timeouts, connection errors, 5xx, 408.
    Transient,
    /// Will not succeed on retry: 4xx, bad URL, TLS problems.
    Permanent,
    /// HTTP 429; retried, honouring `Retry-After` when present.
    RateLimited,
}

/// Outcome of [`RetryPolicy::should_retry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Try again after `delay`.
    Retry {
        /// Backoff before the next attempt.
        delay: Duration,
        /// Number of the next attempt (1-indexed).
        attempt: u32,
    },
    /// Give up.
    DoNotRetry {
        /// Why retrying stopped.
        reason: String,
    },
}

/// Exponential backoff settings.
///
/// `delay = min(base_delay * multiplier^(attempt - 1), max_delay) + jitter`,
/// so the defaults wait roughly 1s then 2s before giving up after the third
/// attempt.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    backoff_multiplier: f32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy. `max_attempts` is clamped to at least 1.
    #[must_use]
    pub fn new(
        max_attempts: u32,
        base_delay: Duration,
        max_delay: Duration,
        backoff_multiplier: f32,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
            backoff_multiplier,
        }
    }

    /// Default backoff with a custom attempt budget.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Attempts allowed per page, the first one included.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Decides whether to retry after `attempt` (1-indexed) failed.
    #[instrument(level = "debug", skip(self), fields(max_attempts = self.max_attempts))]
    pub fn should_retry(&self, failure_type: FailureType, attempt: u32) -> RetryDecision {
        if failure_type == FailureType::Permanent {
            return RetryDecision::DoNotRetry {
                reason: "permanent failure".to_string(),
            };
        }

        if attempt >= self.max_attempts {
            debug!(attempt, "attempt budget exhausted");
            return RetryDecision::DoNotRetry {
                reason: format!("max attempts ({}) exhausted", self.max_attempts),
            };
        }

        let delay = self.backoff(attempt);
        debug!(attempt, delay_ms = delay.as_millis(), "will retry");
        RetryDecision::Retry {
            delay,
            attempt: attempt + 1,
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn backoff(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as f64;
        let exponent = f64::from(attempt.saturating_sub(1));
        let delay_ms = base_ms * f64::from(self.backoff_multiplier).powf(exponent);
        let capped_ms = delay_ms.min(self.max_delay.as_millis() as f64);

        let jitter_ms = rand::thread_rng().gen_range(0..=MAX_JITTER.as_millis() as u64);
        Duration::from_millis(capped_ms as u64) + Duration::from_millis(jitter_ms)
    }
}

/// Classifies a fetch error for retry decisions.
#[must_use]
pub fn classify_error(error: &FetchError) -> FailureType {
    match error {
        FetchError::HttpStatus { status, .. } => classify_http_status(*status),
        FetchError::Timeout { .. } | FetchError::Body { .. } => FailureType::Transient,
        FetchError::Network { source, .. } => {
            if is_tls_error(source) {
                FailureType::Permanent
            } else {
                FailureType::Transient
            }
        }
        FetchError::Client(_) | FetchError::InvalidUrl { .. } => FailureType::Permanent,
    }
}

/// 429 is rate limiting, 408 and 5xx are transient, everything else is
/// permanent.
#[must_use]
pub fn classify_http_status(status: u16) -> FailureType {
    match status {
        429 => FailureType::RateLimited,
        408 | 500..=599 => FailureType::Transient,
        _ => FailureType::Permanent,
    }
}

fn is_tls_error(error: &reqwest::Error) -> bool {
    let message = error.to_string().to_lowercase();
    ["certificate", "tls", "ssl", "handshake"]
        .iter()
        .any(|needle| message.contains(needle))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(
            max_attempts,
            Duration::from_millis(100),
            Duration::from_millis(300),
            2.0,
        )
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
        assert_eq!(policy.max_delay, Duration::from_secs(32));
    }

    #[test]
    fn test_max_attempts_clamped_to_one() {
        assert_eq!(RetryPolicy::with_max_attempts(0).max_attempts(), 1);
        assert_eq!(RetryPolicy::new(0, Duration::ZERO, Duration::ZERO, 2.0).max_attempts(), 1);
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = fast_policy(10);
        let first = policy.backoff(1);
        assert!(first >= Duration::from_millis(100) && first <= Duration::from_millis(600));

        let second = policy.backoff(2);
        assert!(second >= Duration::from_millis(200) && second <= Duration::from_millis(700));

        // 100 * 2^5 = 3200, capped at 300
        let capped = policy.backoff(6);
        assert!(capped >= Duration::from_millis(300) && capped <= Duration::from_millis(800));
    }

    #[test]
    fn test_transient_retried_until_budget_exhausted() {
        let policy = fast_policy(3);
        assert!(matches!(
            policy.should_retry(FailureType::Transient, 1),
            RetryDecision::Retry { attempt: 2, .. }
        ));
        assert!(matches!(
            policy.should_retry(FailureType::RateLimited, 2),
            RetryDecision::Retry { attempt: 3, .. }
        ));
        assert!(matches!(
            policy.should_retry(FailureType::Transient, 3),
            RetryDecision::DoNotRetry { .. }
        ));
    }

    #[test]
    fn test_permanent_never_retried() {
        let decision = fast_policy(5).should_retry(FailureType::Permanent, 1);
        assert_eq!(
            decision,
            RetryDecision::DoNotRetry {
                reason: "permanent failure".to_string()
            }
        );
    }

    #[test]
    fn test_classify_http_status() {
        assert_eq!(classify_http_status(429), FailureType::RateLimited);
        assert_eq!(classify_http_status(408), FailureType::Transient);
        assert_eq!(classify_http_status(503), FailureType::Transient);
        assert_eq!(classify_http_status(404), FailureType::Permanent);
        assert_eq!(classify_http_status(403), FailureType::Permanent);
        assert_eq!(classify_http_status(301), FailureType::Permanent);
    }

    #[test]
    fn test_classify_error_variants() {
        assert_eq!(
            classify_error(&FetchError::http_status("u", 502)),
            FailureType::Transient
        );
        assert_eq!(
            classify_error(&FetchError::Timeout { url: "u".into() }),
            FailureType::Transient
        );
        assert_eq!(
            classify_error(&FetchError::invalid_url("::")),
            FailureType::Permanent
        );
    }
}
