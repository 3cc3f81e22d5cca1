use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use discount_scraper::config::BrowserOptions;
use discount_scraper::{DiscountFinder, Site};

/// Scrape weekly discount listings from Lithuanian grocery chains into CSV files
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Sites to scrape (defaults to all)
    #[arg(long = "site", value_enum, env = "SCRAPER_SITES", value_delimiter = ',')]
    sites: Vec<Site>,

    /// Directory the CSV files are written to
    #[arg(long, env = "SCRAPER_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Show the browser window
    #[arg(long, env = "SCRAPER_HEADFUL")]
    headful: bool,

    /// Chromium executable to launch instead of auto-detection
    #[arg(long = "chrome", env = "CHROME_EXECUTABLE")]
    chrome: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let sites = if cli.sites.is_empty() {
        Site::ALL.to_vec()
    } else {
        cli.sites
    };

    let browser = BrowserOptions {
        headless: !cli.headful,
        executable: cli.chrome,
    };
    let finder = DiscountFinder::new(browser, cli.output_dir);

    info!("Starting discount scraper for {} site(s)", sites.len());
    let summaries = finder.scrape_all(&sites).await?;

    for summary in &summaries {
        info!("{}: {} products", summary.site, summary.products);
    }

    Ok(())
}
