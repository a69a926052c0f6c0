//! Menu listing command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::site::{list_menu, HtmlPage, PageAccessor, SiteClient};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// Lists the products on the menu page.
pub struct MenuCommand {
    config: Config,
}

impl MenuCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetches the menu and returns formatted output, or writes it to `output`.
    pub async fn execute(&self, output: Option<&Path>) -> Result<String> {
        let client = SiteClient::new(&self.config).await.context("Failed to create HTTP client")?;
        let mut page = HtmlPage::new(client);

        self.execute_with_page(&mut page, output).await
    }

    /// Lists the menu through a provided page (for testing).
    pub async fn execute_with_page<P: PageAccessor + ?Sized>(
        &self,
        page: &mut P,
        output: Option<&Path>,
    ) -> Result<String> {
        page.navigate(&self.config.menu_url).await.context("Failed to load menu page")?;
        if let Err(err) = page.wait_until_loaded(self.config.load_timeout()).await {
            warn!("Menu page not ready, continuing: {}", err);
        }

        let items =
            list_menu(&*page, self.config.max_items).context("Failed to read menu listing")?;
        info!("Found {} menu items", items.len());

        let formatted = Formatter::new(self.config.format).format_menu(&items);

        match output {
            Some(path) => {
                std::fs::write(path, format!("{}\n", formatted))
                    .with_context(|| format!("Failed to write menu to: {}", path.display()))?;
                Ok(format!("Saved {} menu items to {}", items.len(), path.display()))
            }
            None => Ok(formatted),
        }
    }
}
