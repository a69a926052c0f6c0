//! Menu site access: fetching, page querying, product lookup and field extraction.

pub mod client;
pub mod extractor;
pub mod locator;
pub mod menu;
pub mod models;
pub mod page;
pub mod selectors;

pub use client::{SiteClient, SiteFetch};
pub use extractor::FieldExtractor;
pub use locator::Locator;
pub use menu::list_menu;
pub use models::{MenuItem, ProductQuery, RawProductInfo};
pub use page::{ElementHandle, HtmlPage, PageAccessor};
