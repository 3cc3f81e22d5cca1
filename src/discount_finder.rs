use std::path::PathBuf;

use anyhow::{Result, anyhow};
use tracing::{error, info};

use crate::browser::ChromiumSession;
use crate::config::BrowserOptions;
use crate::scraper::{ScrapeSummary, Scraper};
use crate::scrapers::Site;

/// Runs site scrapes one after another, each in a fresh browser.
#[derive(Debug, Clone)]
pub struct DiscountFinder {
    browser: BrowserOptions,
    output_dir: PathBuf,
}

impl DiscountFinder {
    pub fn new(browser: BrowserOptions, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            browser,
            output_dir: output_dir.into(),
        }
    }

    pub async fn scrape_site(&self, site: Site) -> Result<ScrapeSummary> {
        let scraper = Scraper::with_default_output(site.config()?, &self.output_dir);
        let session = ChromiumSession::launch(&self.browser).await?;
        scraper.run(&session).await
    }

    /// Scrape every requested site, continuing past failures.
    ///
    /// # Returns
    /// * `Result<Vec<ScrapeSummary>>` - Summaries of the successful sites, or an
    ///   error naming the sites that failed
    pub async fn scrape_all(&self, sites: &[Site]) -> Result<Vec<ScrapeSummary>> {
        let mut summaries = Vec::with_capacity(sites.len());
        let mut failed = Vec::new();

        for &site in sites {
            info!("Scraping {}", site);
            match self.scrape_site(site).await {
                Ok(summary) => summaries.push(summary),
                Err(e) => {
                    error!("Fetch failed for {}: {:#}", site, e);
                    failed.push(site.to_string());
                }
            }
        }

        if failed.is_empty() {
            Ok(summaries)
        } else {
            Err(anyhow!("Scraping failed for: {}", failed.join(", ")))
        }
    }
}
