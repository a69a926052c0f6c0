//! Finds a product on the menu page and derives its detail-page address.
//!
//! Lookup runs [`LookupStrategy::CASCADE`] in order. Each strategy polls the
//! page until it matches or its own timeout elapses; the first match wins.

use crate::cascade::{first_success, poll_until};
use crate::config::Config;
use crate::error::{LookupError, PageError};
use crate::site::models::{
    collapse_whitespace, AddressSource, LocateResult, LookupStrategy, ProductAddress, ProductQuery,
};
use crate::site::page::{ElementHandle, PageAccessor};
use crate::site::selectors::menu;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Axes searched for a link when the product card carries no id.
#[derive(Debug, Clone, Copy)]
enum LinkAxis {
    Ancestor,
    PrecedingSibling,
    FollowingSibling,
}

/// Document order: an enclosing link, then links before the name, then after.
const LINK_AXES: [LinkAxis; 3] =
    [LinkAxis::Ancestor, LinkAxis::PrecedingSibling, LinkAxis::FollowingSibling];

/// Locates products on a menu page.
pub struct Locator {
    menu_url: String,
    primary_timeout: Duration,
    fallback_timeout: Duration,
    poll_interval: Duration,
}

impl Locator {
    pub fn new(config: &Config) -> Self {
        Self {
            menu_url: config.menu_url.clone(),
            primary_timeout: config.strategy_timeout(0),
            fallback_timeout: config.strategy_timeout(1),
            poll_interval: config.poll_interval(),
        }
    }

    fn timeout_for(&self, index: usize) -> Duration {
        if index == 0 {
            self.primary_timeout
        } else {
            self.fallback_timeout
        }
    }

    /// Upper bound on how long [`Locator::locate`] waits before giving up.
    pub fn total_budget(&self) -> Duration {
        (0..LookupStrategy::CASCADE.len()).map(|i| self.timeout_for(i)).sum()
    }

    /// Finds the element naming `query`.
    pub async fn locate<P: PageAccessor + ?Sized>(
        &self,
        page: &P,
        query: &ProductQuery,
    ) -> Result<LocateResult, LookupError> {
        if query.is_empty() {
            return Err(LookupError::NotFound { query: query.normalized().to_string() });
        }

        for (index, strategy) in LookupStrategy::CASCADE.into_iter().enumerate() {
            info!("Trying search strategy {} ({}) for product: {}", index + 1, strategy, query);

            let timeout = self.timeout_for(index);
            let found =
                poll_until(timeout, self.poll_interval, || probe(page, strategy, query)).await?;

            if let Some(element) = found {
                info!("Found product using strategy {}", index + 1);
                return Ok(LocateResult { element, strategy_index: index, strategy });
            }

            debug!("Strategy {} found nothing within {:?}", index + 1, timeout);
        }

        Err(LookupError::NotFound { query: query.normalized().to_string() })
    }

    /// Derives the detail-page address of a located product.
    ///
    /// Prefers the id of the surrounding product card; falls back to a link
    /// around or beside the name.
    pub fn resolve_address<P: PageAccessor + ?Sized>(
        &self,
        page: &P,
        located: &LocateResult,
        query: &ProductQuery,
    ) -> Result<ProductAddress, LookupError> {
        let element = located.element;

        if let Some(card) = page.ancestor(element, menu::PRODUCT_CARD)? {
            let id = page.attribute(card, "id")?.map(|id| id.trim().to_string());
            match id {
                Some(id) if !id.is_empty() => {
                    let address = format!(
                        "{}/{}-prod",
                        self.menu_url.trim_end_matches('/'),
                        urlencoding::encode(&id)
                    );
                    return Ok(ProductAddress { address, source: AddressSource::CardId(id) });
                }
                _ => debug!("Product card has no id, looking for a link"),
            }
        }

        let href = first_success(&LINK_AXES, |axis| link_href(page, element, *axis))?;
        match href {
            Some(hit) => {
                let base = page.current_address().unwrap_or(self.menu_url.as_str());
                Ok(ProductAddress { address: absolutize(base, &hit.value), source: AddressSource::Link })
            }
            None => Err(LookupError::AddressResolution { query: query.normalized().to_string() }),
        }
    }

    /// Locates `query` and resolves its detail-page address.
    pub async fn find_product<P: PageAccessor + ?Sized>(
        &self,
        page: &P,
        query: &ProductQuery,
    ) -> Result<ProductAddress, LookupError> {
        let located = self.locate(page, query).await?;
        let address = self.resolve_address(page, &located, query)?;
        info!("Product URL: {}", address.address);
        Ok(address)
    }
}

/// One polling round of a strategy.
fn probe<P: PageAccessor + ?Sized>(
    page: &P,
    strategy: LookupStrategy,
    query: &ProductQuery,
) -> Result<Option<ElementHandle>, PageError> {
    match strategy {
        LookupStrategy::Exact => {
            first_named(page, &[menu::PRODUCT_HEADER], |text| text == query.normalized())
        }
        LookupStrategy::CaseInsensitive => {
            first_named(page, &[menu::PRODUCT_HEADER], |text| text.to_lowercase() == query.folded())
        }
        LookupStrategy::Contains => {
            first_named(page, &[menu::PRODUCT_HEADER], |text| text.contains(query.normalized()))
        }
        LookupStrategy::ContainsAlternate => {
            first_named(page, menu::ALTERNATE_HEADERS, |text| text.contains(query.normalized()))
        }
    }
}

/// First element, across `containers` in order, whose direct text satisfies `accept`.
fn first_named<P: PageAccessor + ?Sized>(
    page: &P,
    containers: &[&str],
    accept: impl Fn(&str) -> bool,
) -> Result<Option<ElementHandle>, PageError> {
    let hit = first_success(containers, |css| {
        for element in page.find_all(css)? {
            let text = collapse_whitespace(&page.own_text(element)?);
            if accept(&text) {
                return Ok(Some(element));
            }
        }
        Ok(None)
    })?;
    Ok(hit.map(|hit| hit.value))
}

fn link_href<P: PageAccessor + ?Sized>(
    page: &P,
    element: ElementHandle,
    axis: LinkAxis,
) -> Result<Option<String>, PageError> {
    let link = match axis {
        LinkAxis::Ancestor => page.ancestor(element, menu::PRODUCT_LINK)?,
        LinkAxis::FollowingSibling => page.following_sibling(element, menu::PRODUCT_LINK)?,
        LinkAxis::PrecedingSibling => page.preceding_sibling(element, menu::PRODUCT_LINK)?,
    };

    match link {
        Some(link) => Ok(page.attribute(link, "href")?.filter(|href| !href.trim().is_empty())),
        None => Ok(None),
    }
}

/// Resolves `href` against `base`, keeping it as-is when either does not parse.
fn absolutize(base: &str, href: &str) -> String {
    let href = href.trim();
    Url::parse(base)
        .and_then(|base| base.join(href))
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}
