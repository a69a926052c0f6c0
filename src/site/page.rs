//! Page accessor capability and an HTML-backed implementation.
//!
//! The extraction engine only talks to a page through [`PageAccessor`]. It
//! never creates or tears down the page; callers hand one in per query.

use crate::error::PageError;
use crate::site::client::SiteFetch;
use anyhow::Result as AnyResult;
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, trace};

/// Opaque reference to an element of the currently loaded page.
///
/// Handles are owned by the accessor that issued them and become stale after
/// the next navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(usize);

impl ElementHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// DOM query and navigation operations against a loaded page.
#[async_trait]
pub trait PageAccessor: Send + Sync {
    /// Loads `address`, replacing the current page.
    async fn navigate(&mut self, address: &str) -> Result<(), PageError>;

    /// Waits until the current page reports it finished loading.
    async fn wait_until_loaded(&mut self, timeout: Duration) -> Result<(), PageError>;

    /// Address of the current page, if any.
    fn current_address(&self) -> Option<&str>;

    /// All elements matching a CSS selector, in document order.
    fn find_all(&self, css: &str) -> Result<Vec<ElementHandle>, PageError>;

    /// First element matching a CSS selector.
    fn find(&self, css: &str) -> Result<Option<ElementHandle>, PageError> {
        Ok(self.find_all(css)?.into_iter().next())
    }

    /// Visible text of the element and its descendants.
    fn text(&self, element: ElementHandle) -> Result<String, PageError>;

    /// Text nodes that are direct children of the element.
    fn own_text(&self, element: ElementHandle) -> Result<String, PageError>;

    fn attribute(&self, element: ElementHandle, name: &str) -> Result<Option<String>, PageError>;

    /// Nearest ancestor matching `css`.
    fn ancestor(&self, element: ElementHandle, css: &str)
        -> Result<Option<ElementHandle>, PageError>;

    /// Nearest following sibling matching `css`.
    fn following_sibling(
        &self,
        element: ElementHandle,
        css: &str,
    ) -> Result<Option<ElementHandle>, PageError>;

    /// Earliest preceding sibling matching `css`, in document order.
    fn preceding_sibling(
        &self,
        element: ElementHandle,
        css: &str,
    ) -> Result<Option<ElementHandle>, PageError>;
}

/// Fetcher for pages built from literal HTML; it refuses to navigate.
pub struct Offline;

#[async_trait]
impl SiteFetch for Offline {
    async fn fetch(&self, url: &str) -> AnyResult<String> {
        anyhow::bail!("offline page cannot load {}", url)
    }
}

/// Elements whose text never renders.
const INVISIBLE: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that start a new line when rendered.
const BLOCKS: &[&str] = &[
    "address", "article", "br", "dd", "div", "dl", "dt", "footer", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hr", "li", "nav", "ol", "p", "section", "table", "td", "th", "tr", "ul",
];

struct ElementSnapshot {
    attrs: Vec<(String, String)>,
    own_text: String,
    text: String,
}

/// A page loaded as static HTML through a [`SiteFetch`].
///
/// Text and attributes are captured once per navigation. Selector queries
/// re-parse the stored source, which keeps the page `Send` and `Sync`.
pub struct HtmlPage<F: SiteFetch = Offline> {
    fetcher: F,
    address: Option<String>,
    source: Option<String>,
    elements: Vec<ElementSnapshot>,
}

impl<F: SiteFetch> HtmlPage<F> {
    /// Creates an empty page that loads addresses through `fetcher`.
    pub fn new(fetcher: F) -> Self {
        Self { fetcher, address: None, source: None, elements: Vec::new() }
    }

    /// Replaces the current page with `html` served from `address`.
    pub fn load_html(&mut self, address: impl Into<String>, html: impl Into<String>) {
        let source = html.into();
        let document = Html::parse_document(&source);
        self.elements = elements_of(&document).into_iter().map(snapshot).collect();
        debug!("Loaded page with {} elements", self.elements.len());

        self.address = Some(address.into());
        self.source = Some(source);
    }

    fn snapshot_of(&self, element: ElementHandle) -> Result<&ElementSnapshot, PageError> {
        self.elements.get(element.0).ok_or(PageError::StaleElement(element.0))
    }

    /// Parses the current source and hands its elements, in document order, to `f`.
    fn with_elements<T>(
        &self,
        f: impl FnOnce(&[ElementRef<'_>]) -> Result<T, PageError>,
    ) -> Result<T, PageError> {
        let source = self.source.as_deref().ok_or(PageError::NotLoaded)?;
        let document = Html::parse_document(source);
        let elements = elements_of(&document);
        f(&elements)
    }

    fn relative(
        &self,
        element: ElementHandle,
        css: &str,
        walk: impl for<'a> Fn(ElementRef<'a>, &Selector) -> Option<ElementRef<'a>>,
    ) -> Result<Option<ElementHandle>, PageError> {
        let selector = parse_selector(css)?;
        self.with_elements(|elements| {
            let start = *elements.get(element.0).ok_or(PageError::StaleElement(element.0))?;
            Ok(walk(start, &selector).and_then(|found| {
                elements.iter().position(|e| e.id() == found.id()).map(ElementHandle)
            }))
        })
    }
}

impl HtmlPage<Offline> {
    /// Builds a page from literal HTML without any network access.
    pub fn from_html(address: impl Into<String>, html: impl Into<String>) -> Self {
        let mut page = Self::new(Offline);
        page.load_html(address, html);
        page
    }
}

#[async_trait]
impl<F: SiteFetch> PageAccessor for HtmlPage<F> {
    async fn navigate(&mut self, address: &str) -> Result<(), PageError> {
        debug!("Navigating to: {}", address);
        let html = self.fetcher.fetch(address).await.map_err(|err| PageError::Navigation {
            address: address.to_string(),
            message: format!("{err:#}"),
        })?;
        self.load_html(address, html);
        Ok(())
    }

    // A fetched document is complete on arrival.
    async fn wait_until_loaded(&mut self, _timeout: Duration) -> Result<(), PageError> {
        if self.source.is_some() {
            Ok(())
        } else {
            Err(PageError::NotLoaded)
        }
    }

    fn current_address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    fn find_all(&self, css: &str) -> Result<Vec<ElementHandle>, PageError> {
        let selector = parse_selector(css)?;
        let found = self.with_elements(|elements| {
            Ok(elements
                .iter()
                .enumerate()
                .filter(|(_, element)| selector.matches(element))
                .map(|(index, _)| ElementHandle(index))
                .collect::<Vec<_>>())
        })?;
        trace!("{} matched {} elements", css, found.len());
        Ok(found)
    }

    fn text(&self, element: ElementHandle) -> Result<String, PageError> {
        Ok(self.snapshot_of(element)?.text.clone())
    }

    fn own_text(&self, element: ElementHandle) -> Result<String, PageError> {
        Ok(self.snapshot_of(element)?.own_text.clone())
    }

    fn attribute(&self, element: ElementHandle, name: &str) -> Result<Option<String>, PageError> {
        Ok(self
            .snapshot_of(element)?
            .attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone()))
    }

    fn ancestor(
        &self,
        element: ElementHandle,
        css: &str,
    ) -> Result<Option<ElementHandle>, PageError> {
        self.relative(element, css, |start, selector| {
            start.ancestors().filter_map(ElementRef::wrap).find(|e| selector.matches(e))
        })
    }

    fn following_sibling(
        &self,
        element: ElementHandle,
        css: &str,
    ) -> Result<Option<ElementHandle>, PageError> {
        self.relative(element, css, |start, selector| {
            start.next_siblings().filter_map(ElementRef::wrap).find(|e| selector.matches(e))
        })
    }

    fn preceding_sibling(
        &self,
        element: ElementHandle,
        css: &str,
    ) -> Result<Option<ElementHandle>, PageError> {
        self.relative(element, css, |start, selector| {
            start
                .prev_siblings()
                .filter_map(ElementRef::wrap)
                .filter(|e| selector.matches(e))
                .last()
        })
    }
}

fn parse_selector(css: &str) -> Result<Selector, PageError> {
    Selector::parse(css).map_err(|err| PageError::InvalidSelector {
        selector: css.to_string(),
        reason: format!("{err:?}"),
    })
}

fn elements_of(document: &Html) -> Vec<ElementRef<'_>> {
    document.root_element().descendants().filter_map(ElementRef::wrap).collect()
}

fn is_invisible(element: &ElementRef<'_>) -> bool {
    INVISIBLE.contains(&element.value().name())
}

/// Appends the rendered text under `element`. Inline markup adds nothing;
/// block elements are padded with a space.
fn push_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            if is_invisible(&child) {
                continue;
            }
            let block = BLOCKS.contains(&child.value().name());
            if block {
                out.push(' ');
            }
            push_visible_text(child, out);
            if block {
                out.push(' ');
            }
        }
    }
}

fn snapshot(element: ElementRef<'_>) -> ElementSnapshot {
    let attrs = element.value().attrs().map(|(k, v)| (k.to_string(), v.to_string())).collect();

    if is_invisible(&element) {
        return ElementSnapshot { attrs, own_text: String::new(), text: String::new() };
    }

    let own_text = element
        .children()
        .filter_map(|node| node.value().as_text().map(|t| t.to_string()))
        .collect::<String>();

    let mut text = String::new();
    push_visible_text(element, &mut text);
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    ElementSnapshot { attrs, own_text, text }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const CARD_HTML: &str = r#"
        <html><body>
            <div class="plp-item-card" id="zinger-box">
                <a href="/menu/meals/zinger-box-prod">link</a>
                <div class="small-menu-product-header">  Zinger   Box </div>
                <span class="after">next</span>
            </div>
            <script>var ingredient = "hidden";</script>
            <p>Spicy <b>crispy</b> chicken</p>
        </body></html>
    "#;

    fn page() -> HtmlPage {
        HtmlPage::from_html("https://example.test/menu/meals", CARD_HTML)
    }

    struct RecordingFetch {
        html: String,
        fail: bool,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SiteFetch for RecordingFetch {
        async fn fetch(&self, url: &str) -> AnyResult<String> {
            self.seen.lock().unwrap().push(url.to_string());
            if self.fail {
                anyhow::bail!("Simulated network error")
            }
            Ok(self.html.clone())
        }
    }

    #[test]
    fn test_find_all_and_text() {
        let page = page();
        let headers = page.find_all("div.small-menu-product-header").unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(page.own_text(headers[0]).unwrap(), "  Zinger   Box ");
        assert_eq!(page.text(headers[0]).unwrap(), "Zinger Box");
    }

    #[test]
    fn test_text_joins_nested_nodes() {
        let page = page();
        let para = page.find("p").unwrap().unwrap();
        assert_eq!(page.text(para).unwrap(), "Spicy crispy chicken");
        assert_eq!(page.own_text(para).unwrap(), "Spicy  chicken");
    }

    #[test]
    fn test_text_keeps_inline_markup_together() {
        let page = HtmlPage::from_html(
            "https://example.test/p",
            r#"<div class="price">159<small>.00</small></div>
               <h1>Zin<b>ger</b> Box</h1>
               <ul id="items"><li>Fries</li><li>Coke</li></ul>"#,
        );

        let price = page.find(".price").unwrap().unwrap();
        assert_eq!(page.text(price).unwrap(), "159.00");

        let title = page.find("h1").unwrap().unwrap();
        assert_eq!(page.text(title).unwrap(), "Zinger Box");

        let items = page.find("#items").unwrap().unwrap();
        assert_eq!(page.text(items).unwrap(), "Fries Coke");
    }

    #[test]
    fn test_script_text_is_invisible() {
        let page = page();
        let script = page.find("script").unwrap().unwrap();
        assert_eq!(page.own_text(script).unwrap(), "");

        let body = page.find("body").unwrap().unwrap();
        assert!(!page.text(body).unwrap().contains("hidden"));
    }

    #[test]
    fn test_attribute() {
        let page = page();
        let card = page.find("div.plp-item-card").unwrap().unwrap();
        assert_eq!(page.attribute(card, "id").unwrap().as_deref(), Some("zinger-box"));
        assert_eq!(page.attribute(card, "data-missing").unwrap(), None);
    }

    #[test]
    fn test_ancestor_and_siblings() {
        let page = page();
        let header = page.find("div.small-menu-product-header").unwrap().unwrap();

        let card = page.ancestor(header, "div[class*='plp-item-card']").unwrap().unwrap();
        assert_eq!(page.attribute(card, "id").unwrap().as_deref(), Some("zinger-box"));

        let link = page.preceding_sibling(header, "a[href]").unwrap().unwrap();
        assert_eq!(
            page.attribute(link, "href").unwrap().as_deref(),
            Some("/menu/meals/zinger-box-prod")
        );

        assert!(page.following_sibling(header, "a[href]").unwrap().is_none());
        assert!(page.following_sibling(header, "span.after").unwrap().is_some());
        assert!(page.ancestor(header, "section").unwrap().is_none());
    }

    #[test]
    fn test_invalid_selector() {
        let err = page().find_all("div[").unwrap_err();
        assert!(matches!(err, PageError::InvalidSelector { .. }));
    }

    #[test]
    fn test_stale_handle() {
        let page = page();
        let err = page.text(ElementHandle::new(10_000)).unwrap_err();
        assert!(matches!(err, PageError::StaleElement(10_000)));
        assert!(page.ancestor(ElementHandle::new(10_000), "div").is_err());
    }

    #[tokio::test]
    async fn test_not_loaded() {
        let mut page = HtmlPage::new(Offline);
        assert!(matches!(page.find_all("div"), Err(PageError::NotLoaded)));
        assert!(page.wait_until_loaded(Duration::from_millis(1)).await.is_err());
        assert!(page.current_address().is_none());
    }

    #[tokio::test]
    async fn test_navigate_loads_page() {
        let fetch = RecordingFetch {
            html: "<div class='price'>฿99</div>".to_string(),
            fail: false,
            seen: Mutex::new(Vec::new()),
        };
        let mut page = HtmlPage::new(fetch);

        page.navigate("https://example.test/menu/meals/a-prod").await.unwrap();
        page.wait_until_loaded(Duration::from_secs(1)).await.unwrap();

        assert_eq!(page.current_address(), Some("https://example.test/menu/meals/a-prod"));
        let price = page.find(".price").unwrap().unwrap();
        assert_eq!(page.text(price).unwrap(), "฿99");
        assert_eq!(page.fetcher.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_navigate_failure() {
        let fetch =
            RecordingFetch { html: String::new(), fail: true, seen: Mutex::new(Vec::new()) };
        let mut page = HtmlPage::new(fetch);

        let err = page.navigate("https://example.test/x").await.unwrap_err();
        assert!(matches!(err, PageError::Navigation { .. }));
        assert!(err.to_string().contains("Simulated network error"));
    }

    #[tokio::test]
    async fn test_offline_page_refuses_navigation() {
        let mut page = page();
        assert!(page.navigate("https://example.test/other").await.is_err());
        // The previous page stays loaded
        assert!(page.find("p").unwrap().is_some());
    }
}
