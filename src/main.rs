//! menu-crawler - Product lookup CLI for the KFC Thailand menu
//!
//! Uses TLS fingerprint emulation so the menu site serves regular pages.

use anyhow::Result;
use clap::{Parser, Subcommand};
use menu_crawler::commands::{DescribeCommand, MenuCommand};
use menu_crawler::config::{Config, OutputFormat};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "menu-crawler",
    version,
    about = "Product lookup CLI for the KFC Thailand menu",
    long_about = "Finds menu products by name and reports their bundled items, price, description and ingredients."
)]
struct Cli {
    /// Menu page to search
    #[arg(long, global = true, env = "MENU_URL")]
    menu_url: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "MENU_PROXY")]
    proxy: Option<String>,

    /// Delay between requests in milliseconds
    #[arg(long, global = true, env = "MENU_DELAY")]
    delay: Option<u64>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe a menu product by name
    #[command(alias = "d")]
    Describe {
        /// Product name as shown on the menu
        name: String,
    },

    /// List products on the menu page
    #[command(alias = "m")]
    Menu {
        /// Maximum number of items
        #[arg(short, long)]
        max: Option<usize>,

        /// Write the listing to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(menu_url) = cli.menu_url {
        config.menu_url = menu_url;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    match cli.command {
        Commands::Describe { name } => {
            let cmd = DescribeCommand::new(config);
            let output = cmd.execute(&name).await?;
            println!("{}", output);
        }

        Commands::Menu { max, output } => {
            if let Some(max) = max {
                config.max_items = max;
            }

            let cmd = MenuCommand::new(config);
            let result = cmd.execute(output.as_deref()).await?;
            println!("{}", result);
        }
    }

    Ok(())
}
