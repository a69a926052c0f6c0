//! CSS selectors and keyword tables for menu and product pages.
//!
//! This file contains every selector the crawler hands to a page accessor.
//! Update it when the site changes its markup.
//!
//! **Update process**: when a field comes back empty, capture an HTML sample,
//! add the new variant to the matching cascade, and add a test fixture.
//! Cascades are tried top to bottom, so order is priority.

/// Selectors for locating a product on the menu page.
pub mod menu {
    /// Primary product-name container.
    pub const PRODUCT_HEADER: &str = "div[class*='menu-product-header']";

    /// Alternate name containers seen on other menu layouts.
    pub const ALTERNATE_HEADERS: &[&str] =
        &["h3[class*='product-title']", "div[class*='product-name']"];

    /// Card wrapping a product; its `id` names the detail page.
    pub const PRODUCT_CARD: &str = "div[class*='plp-item-card']";

    /// Link that may surround or sit next to a product name.
    pub const PRODUCT_LINK: &str = "a[href]";

    /// Product names in the menu listing.
    pub const LISTING_NAME: &str = "div.small-menu-product-header";

    /// Product images in the menu listing.
    pub const LISTING_IMAGE: &str = "img.small-menu-product-image";
}

/// Selector cascades for the product detail page.
pub mod detail {
    /// Badge containers listing bundled items.
    pub const BADGE: &[&str] = &[
        ".textbadgecontainer",
        ".badge, .tag, .label, [class*='badge'], [class*='tag']",
    ];

    /// Price candidates.
    pub const PRICE: &[&str] = &[".price", "[class*='price']", ".product-price", "[data-testid*='price']"];

    /// Description candidates.
    pub const DESCRIPTION: &[&str] = &[
        ".product-description",
        "[class*='description']",
        ".product-detail",
        "[class*='detail']",
    ];

    /// Every element; ingredients are found by text rather than by class.
    pub const ANY: &str = "*";
}

/// Keywords and markers matched against element text.
pub mod keywords {
    /// Words announcing an ingredient list, matched case-insensitively.
    pub const INGREDIENTS: &[&str] = &["ingredient", "ส่วนประกอบ", "วัตถุดิบ"];

    /// Markers that make a price candidate acceptable on their own.
    pub const CURRENCY: &[&str] = &["฿", "บาท"];

    /// Store-selection prompt shown in place of real content.
    pub const STORE_PROMPT: &str = "choose a store";

    /// Full form of the prompt as it appears inside descriptions.
    pub const STORE_PROMPT_FULL: &str = "choose a store and order mode";
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_selectors_compile() {
        let all = [menu::PRODUCT_HEADER, menu::PRODUCT_CARD, menu::PRODUCT_LINK]
            .into_iter()
            .chain([menu::LISTING_NAME, menu::LISTING_IMAGE, detail::ANY])
            .chain(menu::ALTERNATE_HEADERS.iter().copied())
            .chain(detail::BADGE.iter().copied())
            .chain(detail::PRICE.iter().copied())
            .chain(detail::DESCRIPTION.iter().copied());

        for css in all {
            assert!(Selector::parse(css).is_ok(), "selector failed to parse: {}", css);
        }
    }

    #[test]
    fn test_header_matches_class_variants() {
        let html = Html::parse_document(
            r#"<div class="small-menu-product-header">A</div>
               <div class="menu-product-header big">B</div>
               <span class="menu-product-header">C</span>"#,
        );
        let selector = Selector::parse(menu::PRODUCT_HEADER).unwrap();
        assert_eq!(html.select(&selector).count(), 2);
    }
}
