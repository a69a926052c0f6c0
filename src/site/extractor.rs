//! Pulls raw product fields out of a loaded detail page.

use crate::cascade::first_success;
use crate::error::PageError;
use crate::site::models::{ExtractionWarning, Field, RawProductInfo};
use crate::site::page::PageAccessor;
use crate::site::selectors::{detail, keywords};
use tracing::{debug, info, warn};

/// Badge texts are joined with this before formatting.
const BADGE_JOIN: &str = " | ";

const MIN_DESCRIPTION_CHARS: usize = 20;
const MAX_DESCRIPTION_CHARS: usize = 200;
const MIN_INGREDIENT_CHARS: usize = 10;
const MAX_INGREDIENT_CHARS: usize = 150;

/// Extracts badge, price, description and ingredients from a detail page.
///
/// Fields are independent: a failure while reading one leaves it empty and
/// the rest are still attempted.
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldExtractor;

impl FieldExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts every field, logging and discarding per-field failures.
    pub fn extract<P: PageAccessor + ?Sized>(&self, page: &P) -> RawProductInfo {
        self.extract_with_warnings(page).0
    }

    /// Extracts every field and also returns a warning per failed field.
    pub fn extract_with_warnings<P: PageAccessor + ?Sized>(
        &self,
        page: &P,
    ) -> (RawProductInfo, Vec<ExtractionWarning>) {
        let mut info = RawProductInfo::default();
        let mut warnings = Vec::new();

        for field in [Field::BadgeText, Field::Price, Field::Description, Field::Ingredients] {
            match extract_field(page, field) {
                Ok(Some(value)) => {
                    info!("Found {}: {}", field, value);
                    info.set(field, value);
                }
                Ok(None) => debug!("No {} on page", field),
                Err(err) => {
                    let warning = ExtractionWarning { field, message: err.to_string() };
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        (info, warnings)
    }
}

fn extract_field<P: PageAccessor + ?Sized>(
    page: &P,
    field: Field,
) -> Result<Option<String>, PageError> {
    match field {
        Field::BadgeText => badge_text(page),
        Field::Price => price(page),
        Field::Description => description(page),
        Field::Ingredients => ingredients(page),
    }
}

/// Texts of the first badge selector that yields any, joined with `" | "`.
fn badge_text<P: PageAccessor + ?Sized>(page: &P) -> Result<Option<String>, PageError> {
    let hit = first_success(detail::BADGE, |css| {
        let mut texts = Vec::new();
        for element in page.find_all(css)? {
            let text = page.text(element)?;
            let text = text.trim();
            if !text.is_empty() {
                texts.push(text.to_string());
            }
        }
        Ok(if texts.is_empty() { None } else { Some(texts.join(BADGE_JOIN)) })
    })?;
    Ok(hit.map(|hit| hit.value))
}

fn price<P: PageAccessor + ?Sized>(page: &P) -> Result<Option<String>, PageError> {
    first_text(page, detail::PRICE, |text| looks_like_price(text).then(|| text.to_string()))
}

fn description<P: PageAccessor + ?Sized>(page: &P) -> Result<Option<String>, PageError> {
    first_text(page, detail::DESCRIPTION, |text| {
        (text.chars().count() > MIN_DESCRIPTION_CHARS)
            .then(|| truncate_chars(text, MAX_DESCRIPTION_CHARS))
    })
}

/// Full text of the first element whose own text mentions an ingredient keyword.
fn ingredients<P: PageAccessor + ?Sized>(page: &P) -> Result<Option<String>, PageError> {
    let elements = page.find_all(detail::ANY)?;

    let hit = first_success(keywords::INGREDIENTS, |keyword| {
        let keyword = keyword.to_lowercase();
        for &element in &elements {
            if !page.own_text(element)?.to_lowercase().contains(&keyword) {
                continue;
            }
            let text = page.text(element)?;
            let text = text.trim();
            if text.chars().count() > MIN_INGREDIENT_CHARS {
                return Ok(Some(truncate_chars(text, MAX_INGREDIENT_CHARS)));
            }
        }
        Ok(None)
    })?;
    Ok(hit.map(|hit| hit.value))
}

/// First trimmed element text, across `selectors` in order, that `accept` maps to a value.
fn first_text<P: PageAccessor + ?Sized>(
    page: &P,
    selectors: &[&str],
    accept: impl Fn(&str) -> Option<String>,
) -> Result<Option<String>, PageError> {
    let hit = first_success(selectors, |css| {
        for element in page.find_all(css)? {
            let text = page.text(element)?;
            if let Some(value) = accept(text.trim()) {
                return Ok(Some(value));
            }
        }
        Ok(None)
    })?;
    Ok(hit.map(|hit| hit.value))
}

/// A currency marker, or nothing but digits once `.` and `,` are removed.
fn looks_like_price(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    if keywords::CURRENCY.iter().any(|marker| text.contains(marker)) {
        return true;
    }
    let digits: String = text.chars().filter(|c| *c != '.' && *c != ',').collect();
    !digits.is_empty() && digits.chars().all(char::is_numeric)
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
