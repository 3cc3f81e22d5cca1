//! Traits and interfaces for site-agnostic scraping

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use url::Url;

use crate::config::{ScrollConfig, Timeouts};
use crate::schema::RecordSchema;

/// Configuration for one retail site
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Display name for the website
    pub name: String,
    /// First URL the session navigates to
    pub start_url: Url,
    /// Link to follow from the start page to reach the discount listing
    pub discount_link: Option<DiscountLink>,
    /// Selector matching one product card
    pub card_selector: String,
    /// Scroll loop parameters; `None` for listings that render all at once
    pub scroll: Option<ScrollConfig>,
    /// Navigation and selector timeouts
    pub timeouts: Timeouts,
    /// Fields extracted from each card
    pub schema: RecordSchema,
    /// CSV file name used when the caller doesn't pick one
    pub default_output: String,
}

/// An anchor located by selector plus visible text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountLink {
    pub selector: String,
    /// Case-insensitive substring of the anchor text
    pub text: String,
}

/// The page primitives the scraping core needs from a browser.
///
/// Implemented by the Chromium session in production and by scripted fakes
/// in tests, so stabilization, extraction and export never touch a real
/// browser directly.
#[async_trait]
pub trait PageSession: Send + Sync {
    /// Navigate to a URL and wait for it to load
    ///
    /// # Arguments
    /// * `url` - Absolute URL to open
    /// * `timeout` - Upper bound on the whole navigation
    ///
    /// # Returns
    /// * `Result<()>` - Fails with `ScrapeError::NavigationTimeout` when the bound is hit
    async fn navigate(&self, url: &Url, timeout: Duration) -> Result<()>;

    /// Scroll the viewport vertically by `delta_y` pixels
    async fn scroll_by(&self, delta_y: i64) -> Result<()>;

    /// Suspend for the given duration
    async fn pause(&self, duration: Duration);

    /// Number of elements currently matching `selector`
    async fn count(&self, selector: &str) -> Result<usize>;

    /// Outer HTML of every element matching `selector`, in document order
    async fn outer_html(&self, selector: &str) -> Result<Vec<String>>;

    /// URL the loaded document resolves relative references against
    ///
    /// # Returns
    /// * `Result<Url>` - The final URL after redirects, or the `<base href>` target when the page sets one
    async fn base_url(&self) -> Result<Url>;

    /// Release the page and the browser behind it
    async fn close(&self) -> Result<()>;
}
