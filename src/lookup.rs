//! End-to-end product lookup: menu page to formatted report.

use crate::config::Config;
use crate::error::LookupError;
use crate::report::{format_report, FormattedReport};
use crate::site::models::ProductQuery;
use crate::site::{FieldExtractor, Locator, PageAccessor};
use tracing::{info, warn};

/// Looks up `name` on the menu page and describes the matching product.
///
/// The page is borrowed for the whole lookup and left on the product's
/// detail page afterwards. A report without sections renders as the
/// "no details" message.
pub async fn describe_product<P: PageAccessor + ?Sized>(
    page: &mut P,
    name: &str,
    config: &Config,
) -> Result<FormattedReport, LookupError> {
    let query = ProductQuery::new(name);
    info!("Describing product: {}", query);

    page.navigate(&config.menu_url).await?;
    wait_for_page(page, config).await;

    let locator = Locator::new(config);
    let address = locator.find_product(&*page, &query).await?;

    page.navigate(&address.address).await?;
    wait_for_page(page, config).await;

    let info = FieldExtractor::new().extract(&*page);
    Ok(format_report(&info, &query))
}

/// Waits for the current page; a slow page is searched anyway.
async fn wait_for_page<P: PageAccessor + ?Sized>(page: &mut P, config: &Config) {
    if let Err(err) = page.wait_until_loaded(config.load_timeout()).await {
        warn!("Page not ready, continuing: {}", err);
    }
}
