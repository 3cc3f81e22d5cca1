//! Site-agnostic scraping pipeline
//!
//! navigate → (follow discount link) → wait for first card → stabilize the
//! feed → snapshot the page and extract every card → export CSV. The page
//! session is closed on every exit path.

pub mod extractor;
pub mod links;
pub mod stabilizer;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};

use crate::export::{ExportOutcome, export_to_csv};
use crate::models::ProductRecord;
use crate::schema::css;
use crate::traits::{PageSession, SiteConfig};

use self::extractor::extract_page;
use self::links::resolve_discount_link;
use self::stabilizer::{stabilize, wait_for_selector};

/// Result of one site scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub site: String,
    pub products: usize,
    pub export: ExportOutcome,
}

/// Matches the document element, so its outer HTML is the whole page.
const DOCUMENT_ROOT: &str = ":root";

pub struct Scraper {
    site: SiteConfig,
    destination: PathBuf,
}

impl Scraper {
    pub fn new(site: SiteConfig, destination: impl Into<PathBuf>) -> Self {
        Self {
            site,
            destination: destination.into(),
        }
    }

    /// Scraper writing to the site's default file inside `output_dir`.
    pub fn with_default_output(site: SiteConfig, output_dir: &Path) -> Self {
        let destination = output_dir.join(&site.default_output);
        Self::new(site, destination)
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Run the whole pipeline, then close the session whatever happened.
    ///
    /// A scrape error takes precedence over a close error; a close error after
    /// a successful scrape is logged and does not discard the export.
    pub async fn run<S>(&self, session: &S) -> Result<ScrapeSummary>
    where
        S: PageSession + ?Sized,
    {
        let outcome = self.scrape(session).await;

        if let Err(e) = session.close().await {
            warn!("Failed to close page session for {}: {:#}", self.site.name, e);
        }

        outcome
    }

    async fn scrape<S>(&self, session: &S) -> Result<ScrapeSummary>
    where
        S: PageSession + ?Sized,
    {
        let products = self.collect_products(session).await?;
        let count = products.len();
        let export = export_to_csv(products, &self.destination).await?;

        info!("{} product count: {}", self.site.name, count);
        Ok(ScrapeSummary {
            site: self.site.name.clone(),
            products: count,
            export,
        })
    }

    /// Everything up to and including extraction.
    pub async fn collect_products<S>(&self, session: &S) -> Result<Vec<ProductRecord>>
    where
        S: PageSession + ?Sized,
    {
        let site = &self.site;
        let timeouts = &site.timeouts;

        info!("Opening {} at {}", site.name, site.start_url);
        session.navigate(&site.start_url, timeouts.landing).await?;

        let card_selector = css(&site.card_selector)?;

        if let Some(link) = &site.discount_link {
            let url = resolve_discount_link(session, &site.name, link, &site.start_url).await?;
            session.navigate(&url, timeouts.navigation).await?;
        }

        wait_for_selector(
            session,
            &site.card_selector,
            timeouts.selector,
            timeouts.selector_poll,
        )
        .await?;

        if let Some(scroll) = &site.scroll {
            stabilize(session, &site.card_selector, scroll).await?;
        }

        let snapshot = session.outer_html(DOCUMENT_ROOT).await?.concat();
        let base = session.base_url().await?;
        let products = extract_page(&snapshot, &card_selector, &site.schema, &base);
        info!("Extracted {} cards from {}", products.len(), base);
        Ok(products)
    }
}
