//! Headless Chromium page session backed by chromiumoxide

pub mod mock_session;

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::BrowserOptions;
use crate::errors::ScrapeError;
use crate::traits::PageSession;

/// One browser process with a single page.
///
/// The CDP handler runs on its own task for the lifetime of the session and is
/// stopped by `close`. Dropping the session without closing it still kills the
/// Chromium child process through `Browser`'s own drop.
pub struct ChromiumSession {
    browser: Mutex<Option<Browser>>,
    page: Page,
    handler: Mutex<Option<JoinHandle<()>>>,
}

impl ChromiumSession {
    pub async fn launch(options: &BrowserOptions) -> Result<Self> {
        let mut builder = BrowserConfig::builder();
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &options.executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|e| anyhow!("Failed to build browser config: {e}"))?;

        info!("Launching Chromium (headless: {})", options.headless);
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(ScrapeError::from)
            .context("Failed to launch Chromium")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler stopped: {}", e);
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(ScrapeError::from)
            .context("Failed to open a new page")?;

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            page,
            handler: Mutex::new(Some(handler)),
        })
    }

    async fn evaluate<T: serde::de::DeserializeOwned>(&self, script: &str) -> Result<T> {
        let value = self
            .page
            .evaluate(script)
            .await
            .map_err(ScrapeError::from)?
            .into_value::<T>()
            .context("Unexpected value returned by page script")?;
        Ok(value)
    }
}

/// Quote a selector as a JavaScript string literal.
fn js_string(value: &str) -> Result<String> {
    serde_json::to_string(value).context("Failed to encode selector")
}

#[async_trait]
impl PageSession for ChromiumSession {
    async fn navigate(&self, url: &Url, timeout: Duration) -> Result<()> {
        debug!("Navigating to {}", url);
        match tokio::time::timeout(timeout, self.page.goto(url.as_str())).await {
            Ok(result) => {
                result.map_err(ScrapeError::from)?;
                Ok(())
            }
            Err(_) => Err(ScrapeError::NavigationTimeout {
                url: url.to_string(),
                timeout,
            }
            .into()),
        }
    }

    async fn scroll_by(&self, delta_y: i64) -> Result<()> {
        self.page
            .evaluate(format!("window.scrollBy(0, {delta_y})").as_str())
            .await
            .map_err(ScrapeError::from)?;
        Ok(())
    }

    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let script = format!(
            "document.querySelectorAll({}).length",
            js_string(selector)?
        );
        self.evaluate(&script).await
    }

    async fn outer_html(&self, selector: &str) -> Result<Vec<String>> {
        let script = format!(
            "Array.from(document.querySelectorAll({}), (node) => node.outerHTML)",
            js_string(selector)?
        );
        self.evaluate(&script).await
    }

    async fn base_url(&self) -> Result<Url> {
        let base: String = self.evaluate("document.baseURI").await?;
        let url = Url::parse(&base).map_err(ScrapeError::from)?;
        Ok(url)
    }

    async fn close(&self) -> Result<()> {
        let Some(mut browser) = self.browser.lock().await.take() else {
            return Ok(());
        };

        let closed = browser.close().await.map_err(ScrapeError::from);
        if let Err(e) = browser.wait().await {
            warn!("Chromium did not exit cleanly: {}", e);
        }
        if let Some(handler) = self.handler.lock().await.take() {
            handler.abort();
        }

        closed.context("Failed to close Chromium")?;
        info!("Browser closed");
        Ok(())
    }
}
