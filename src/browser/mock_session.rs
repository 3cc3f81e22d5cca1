//! Scripted in-memory `PageSession` for exercising the pipeline without a browser

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use scraper::Html;
use url::Url;

use crate::errors::ScrapeError;
use crate::schema::css;
use crate::traits::PageSession;

/// Every primitive the mock received, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Navigate(String),
    Scroll(i64),
    Pause(Duration),
    Count(String),
    OuterHtml(String),
    BaseUrl,
    Close,
}

#[derive(Default)]
pub struct MockSession {
    counts: Mutex<HashMap<String, VecDeque<usize>>>,
    last_counts: Mutex<HashMap<String, usize>>,
    html: HashMap<String, Vec<String>>,
    pages: HashMap<String, String>,
    redirects: HashMap<String, String>,
    failing_counts: HashMap<String, usize>,
    unreachable: HashSet<String>,
    current: Mutex<Option<Url>>,
    calls: Mutex<Vec<MockCall>>,
    closed: AtomicBool,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the values `count(selector)` returns, one per call.
    /// Once exhausted the last value repeats.
    #[must_use]
    pub fn with_counts(mut self, selector: &str, counts: impl IntoIterator<Item = usize>) -> Self {
        if let Ok(map) = self.counts.get_mut() {
            map.insert(selector.to_string(), counts.into_iter().collect());
        }
        self
    }

    /// Elements returned by `outer_html(selector)` whatever page is loaded.
    /// Unscripted counts for the same selector report their number.
    #[must_use]
    pub fn with_html(mut self, selector: &str, elements: Vec<String>) -> Self {
        self.html.insert(selector.to_string(), elements);
        self
    }

    /// Document served once `url` is loaded. Selectors without scripted
    /// results are answered by querying it.
    #[must_use]
    pub fn with_page(mut self, url: &str, document: &str) -> Self {
        self.pages.insert(url.to_string(), document.to_string());
        self
    }

    /// Navigating to `from` lands on `to`.
    #[must_use]
    pub fn with_redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }

    /// `count(selector)` answers `after` times, then fails as if the page
    /// handle had gone away.
    #[must_use]
    pub fn with_failing_count(mut self, selector: &str, after: usize) -> Self {
        self.failing_counts.insert(selector.to_string(), after);
        self
    }

    /// Navigations to this URL time out.
    #[must_use]
    pub fn with_unreachable(mut self, url: &str) -> Self {
        self.unreachable.insert(url.to_string());
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn count_calls(&self, selector: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, MockCall::Count(s) if s == selector))
            .count()
    }

    pub fn scroll_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, MockCall::Scroll(_)))
            .count()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockCall::Navigate(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn record(&self, call: MockCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn current(&self) -> Option<Url> {
        self.current.lock().ok().and_then(|current| current.clone())
    }

    fn document(&self) -> Option<String> {
        let current = self.current()?;
        self.pages.get(current.as_str()).cloned()
    }

    fn next_count(&self, selector: &str) -> Option<usize> {
        let mut counts = self.counts.lock().ok()?;
        let queue = counts.get_mut(selector)?;
        let mut last_counts = self.last_counts.lock().ok()?;
        match queue.pop_front() {
            Some(count) => {
                last_counts.insert(selector.to_string(), count);
                Some(count)
            }
            None => Some(last_counts.get(selector).copied().unwrap_or(0)),
        }
    }
}

/// Outer HTML of every element in `document` matching `selector`.
fn query(document: &str, selector: &str) -> Result<Vec<String>> {
    let selector = css(selector)?;
    let html = Html::parse_document(document);
    Ok(html.select(&selector).map(|element| element.html()).collect())
}

/// `current`, or the document's `<base href>` resolved against it.
fn document_base(document: &str, current: &Url) -> Result<Url> {
    let selector = css("base[href]")?;
    let html = Html::parse_document(document);
    let href = html
        .select(&selector)
        .next()
        .and_then(|base| base.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty());

    match href {
        Some(href) => Ok(current.join(href)?),
        None => Ok(current.clone()),
    }
}

#[async_trait]
impl PageSession for MockSession {
    async fn navigate(&self, url: &Url, timeout: Duration) -> Result<()> {
        self.record(MockCall::Navigate(url.to_string()));
        if self.unreachable.contains(url.as_str()) {
            return Err(ScrapeError::NavigationTimeout {
                url: url.to_string(),
                timeout,
            }
            .into());
        }

        let landed = match self.redirects.get(url.as_str()) {
            Some(target) => Url::parse(target)?,
            None => url.clone(),
        };
        if let Ok(mut current) = self.current.lock() {
            *current = Some(landed);
        }
        Ok(())
    }

    async fn scroll_by(&self, delta_y: i64) -> Result<()> {
        self.record(MockCall::Scroll(delta_y));
        Ok(())
    }

    async fn pause(&self, duration: Duration) {
        self.record(MockCall::Pause(duration));
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        self.record(MockCall::Count(selector.to_string()));
        if let Some(&after) = self.failing_counts.get(selector)
            && self.count_calls(selector) > after
        {
            return Err(anyhow!("Page handle closed while counting `{}`", selector));
        }

        if let Some(count) = self.next_count(selector) {
            return Ok(count);
        }
        if let Some(elements) = self.html.get(selector) {
            return Ok(elements.len());
        }
        match self.document() {
            Some(document) => Ok(query(&document, selector)?.len()),
            None => Ok(0),
        }
    }

    async fn outer_html(&self, selector: &str) -> Result<Vec<String>> {
        self.record(MockCall::OuterHtml(selector.to_string()));
        if let Some(elements) = self.html.get(selector) {
            return Ok(elements.clone());
        }
        match self.document() {
            Some(document) => query(&document, selector),
            None => Ok(Vec::new()),
        }
    }

    async fn base_url(&self) -> Result<Url> {
        self.record(MockCall::BaseUrl);
        let current = self.current().ok_or_else(|| anyhow!("No page loaded"))?;
        match self.document() {
            Some(document) => document_base(&document, &current),
            None => Ok(current),
        }
    }

    async fn close(&self) -> Result<()> {
        self.record(MockCall::Close);
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
