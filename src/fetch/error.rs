//! Errors raised while fetching search pages.

use thiserror::Error;

/// Errors that can occur while fetching a results page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection-level failure (DNS, refused connection, TLS).
    #[error("network error fetching {url}: {source}")]
    Network {
        /// Page URL.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// No response within the configured timeout.
    #[error("timeout fetching {url}")]
    Timeout {
        /// Page URL.
        url: String,
    },

    /// Non-success HTTP status.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// Page URL.
        url: String,
        /// Response status code.
        status: u16,
        /// `Retry-After` header value, when the server sent one.
        retry_after: Option<String>,
    },

    /// The response body could not be read as text.
    #[error("failed to read body of {url}: {source}")]
    Body {
        /// Page URL.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The configured base URL cannot be parsed.
    #[error("invalid search URL: {url}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
    },
}

impl FetchError {
    /// Creates a network error, mapping client timeouts to [`FetchError::Timeout`].
    pub fn from_request(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            retry_after: None,
        }
    }

    /// Creates an HTTP status error carrying a `Retry-After` value.
    pub fn http_status_with_retry_after(
        url: impl Into<String>,
        status: u16,
        retry_after: Option<String>,
    ) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            retry_after,
        }
    }

    /// Creates a body read error.
    pub fn body(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Body {
            url: url.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// The `Retry-After` header value, if this is a status error carrying one.
    #[must_use]
    pub fn retry_after(&self) -> Option<&str> {
        match self {
            Self::HttpStatus { retry_after, .. } => retry_after.as_deref(),
            _ => None,
        }
    }
}
