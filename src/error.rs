//! Error types for page access and product lookup.

use thiserror::Error;

/// Failures reported by a page accessor.
#[derive(Debug, Error)]
pub enum PageError {
    /// No page has been loaded yet.
    #[error("no page loaded")]
    NotLoaded,

    /// A CSS selector could not be parsed.
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// The element handle does not belong to the current page.
    #[error("stale element handle {0}")]
    StaleElement(usize),

    /// Loading an address failed.
    #[error("navigation to {address} failed: {message}")]
    Navigation { address: String, message: String },

    /// The page did not finish loading in time.
    #[error("page did not finish loading within {0}ms")]
    LoadTimeout(u128),
}

/// Failures of a product lookup. These reach the caller.
#[derive(Debug, Error)]
pub enum LookupError {
    /// No locator strategy matched within its time budget.
    #[error("product '{query}' not found with any search strategy")]
    NotFound { query: String },

    /// The product element matched but no detail-page address could be derived.
    #[error("could not find product link for '{query}'")]
    AddressResolution { query: String },

    /// The page accessor failed outside of field extraction.
    #[error(transparent)]
    Page(#[from] PageError),
}

impl LookupError {
    /// Returns true when no product matched the query.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound { .. })
    }
}
