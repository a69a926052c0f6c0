//! Product description command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::lookup::describe_product;
use crate::report::messages;
use crate::site::models::ProductQuery;
use crate::site::{HtmlPage, PageAccessor, SiteClient};
use anyhow::{Context, Result};
use tracing::error;

/// Describes a single menu product by name.
pub struct DescribeCommand {
    config: Config,
}

impl DescribeCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Looks up `name` on the live site and returns the reply text.
    pub async fn execute(&self, name: &str) -> Result<String> {
        let client = SiteClient::new(&self.config).await.context("Failed to create HTTP client")?;
        let mut page = HtmlPage::new(client);

        self.execute_with_page(&mut page, name).await
    }

    /// Looks up `name` through a provided page (for testing).
    ///
    /// Lookup failures become the localized reply, in the configured output
    /// format, rather than an error; only setup problems are returned as `Err`.
    pub async fn execute_with_page<P: PageAccessor + ?Sized>(
        &self,
        page: &mut P,
        name: &str,
    ) -> Result<String> {
        let query = ProductQuery::new(name);
        let formatter = Formatter::new(self.config.format);

        match describe_product(page, name, &self.config).await {
            Ok(report) => Ok(formatter.format_report(&report)),
            Err(err) => {
                error!("Lookup for '{}' failed: {}", query, err);
                let message = messages::for_error(query.normalized(), &err);
                Ok(formatter.format_message(query.normalized(), &message))
            }
        }
    }
}
