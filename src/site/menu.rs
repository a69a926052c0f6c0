//! Menu listing extraction.

use crate::error::PageError;
use crate::site::models::{collapse_whitespace, MenuItem};
use crate::site::page::PageAccessor;
use crate::site::selectors::menu;
use tracing::debug;
use url::Url;

/// Lists up to `max` products shown on the loaded menu page.
///
/// Names and images are paired by position. Entries without a name are
/// skipped; a name without a matching image keeps `image_url` empty.
pub fn list_menu<P: PageAccessor + ?Sized>(
    page: &P,
    max: usize,
) -> Result<Vec<MenuItem>, PageError> {
    let names = page.find_all(menu::LISTING_NAME)?;
    let images = page.find_all(menu::LISTING_IMAGE)?;
    debug!("Menu page has {} names and {} images", names.len(), images.len());

    let base = page.current_address();
    let mut items = Vec::new();

    for (position, name) in names.into_iter().enumerate() {
        if items.len() >= max {
            break;
        }

        let name = collapse_whitespace(&page.text(name)?);
        if name.is_empty() {
            continue;
        }

        let image_url = match images.get(position) {
            Some(&image) => page.attribute(image, "src")?.and_then(|src| image_address(base, &src)),
            None => None,
        };
        items.push(MenuItem { name, image_url });
    }

    Ok(items)
}

/// Absolute image address with query string and fragment removed.
fn image_address(base: Option<&str>, src: &str) -> Option<String> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }

    let parsed = match base.and_then(|base| Url::parse(base).ok()) {
        Some(base) => base.join(src),
        None => Url::parse(src),
    };

    match parsed {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            Some(url.to_string())
        }
        // Keep unparseable sources, minus anything after '?'
        Err(_) => src.split(['?', '#']).next().map(String::from),
    }
}
