//! Errors raised while turning a raw result card into a [`super::Listing`].

use thiserror::Error;

/// Reasons a raw item yields no listing.
///
/// These are expected on every results page (ads, placeholder cards, cards
/// still loading) and are logged and skipped rather than surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A structurally required fragment was not present in the card.
    #[error("item has no {field}")]
    MissingField {
        /// Which fragment was absent: `title`, `price` or `link`.
        field: &'static str,
    },

    /// The title element exists but holds no text.
    #[error("item title is empty")]
    EmptyTitle,

    /// The card is the marketplace's "Shop on eBay" filler.
    #[error("placeholder item: {title}")]
    Placeholder {
        /// The placeholder title as shown.
        title: String,
    },
}

impl BuildError {
    /// Creates a missing-field error.
    #[must_use]
    pub fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Creates a placeholder error.
    pub fn placeholder(title: impl Into<String>) -> Self {
        Self::Placeholder {
            title: title.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_messages() {
        assert_eq!(BuildError::missing("link").to_string(), "item has no link");
        assert_eq!(BuildError::EmptyTitle.to_string(), "item title is empty");
        assert_eq!(
            BuildError::placeholder("Shop on eBay").to_string(),
            "placeholder item: Shop on eBay"
        );
    }
}
