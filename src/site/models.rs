//! Data models for product lookups, extracted fields, and menu listings.

use crate::site::page::ElementHandle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A requested product name.
///
/// Matching is case and whitespace insensitive where the strategy allows it,
/// so the query keeps both the raw input and its normalized forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    raw: String,
    normalized: String,
    folded: String,
}

impl ProductQuery {
    pub fn new(name: impl Into<String>) -> Self {
        let raw = name.into();
        let normalized = collapse_whitespace(&raw);
        let folded = normalized.to_lowercase();
        Self { raw, normalized, folded }
    }

    /// The name exactly as requested.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Trimmed, with internal whitespace runs collapsed to one space.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Normalized and lowercased.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Returns true if `text` names this product, ignoring case and spacing.
    pub fn same_name(&self, text: &str) -> bool {
        collapse_whitespace(text).to_lowercase() == self.folded
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

impl fmt::Display for ProductQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

/// Collapses whitespace runs to single spaces and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One entry of the locator cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStrategy {
    /// Name container text equals the query exactly.
    Exact,
    /// Name container text equals the query ignoring case.
    CaseInsensitive,
    /// Name container text contains the query.
    Contains,
    /// An alternate name container contains the query.
    ContainsAlternate,
}

impl LookupStrategy {
    /// Every strategy in priority order.
    pub const CASCADE: [LookupStrategy; 4] = [
        LookupStrategy::Exact,
        LookupStrategy::CaseInsensitive,
        LookupStrategy::Contains,
        LookupStrategy::ContainsAlternate,
    ];
}

impl fmt::Display for LookupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupStrategy::Exact => write!(f, "exact"),
            LookupStrategy::CaseInsensitive => write!(f, "case-insensitive"),
            LookupStrategy::Contains => write!(f, "contains"),
            LookupStrategy::ContainsAlternate => write!(f, "contains-alternate"),
        }
    }
}

/// The element a locator matched and how it got there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateResult {
    pub element: ElementHandle,
    /// Zero-based position of the winning strategy in the cascade.
    pub strategy_index: usize,
    pub strategy: LookupStrategy,
}

/// Where a detail-page address came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressSource {
    /// Built from the id of the surrounding product card.
    CardId(String),
    /// Taken from a link next to or around the product name.
    Link,
}

/// A navigable detail-page address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductAddress {
    pub address: String,
    pub source: AddressSource,
}

/// Field names of a detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    BadgeText,
    Price,
    Description,
    Ingredients,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::BadgeText => write!(f, "badge_text"),
            Field::Price => write!(f, "price"),
            Field::Description => write!(f, "description"),
            Field::Ingredients => write!(f, "ingredients"),
        }
    }
}

/// Raw field values pulled from a detail page. Missing fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProductInfo {
    pub badge_text: String,
    pub price: String,
    pub description: String,
    pub ingredients: String,
}

impl RawProductInfo {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::BadgeText => &self.badge_text,
            Field::Price => &self.price,
            Field::Description => &self.description,
            Field::Ingredients => &self.ingredients,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::BadgeText => self.badge_text = value,
            Field::Price => self.price = value,
            Field::Description => self.description = value,
            Field::Ingredients => self.ingredients = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.badge_text.is_empty()
            && self.price.is_empty()
            && self.description.is_empty()
            && self.ingredients.is_empty()
    }
}

/// A field that could not be extracted. Advisory only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionWarning {
    pub field: Field,
    pub message: String,
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error extracting {}: {}", self.field, self.message)
    }
}

/// An entry of the menu listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    /// Image address without its query string
    pub image_url: Option<String>,
}
