//! menu-crawler - Product lookup and menu listing for the KFC Thailand menu site
//!
//! Finds a product by name on the menu page, follows it to its detail page,
//! and turns what it finds there into a short localized report.

pub mod cascade;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod lookup;
pub mod report;
pub mod site;

pub use config::Config;
pub use error::{LookupError, PageError};
pub use lookup::describe_product;
pub use report::{format_report, FormattedReport};
pub use site::{HtmlPage, PageAccessor, ProductQuery, RawProductInfo};
