//! Typed failures that cross the scraping pipeline boundary

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Discount link was not found on {site} (selector `{selector}`, text `{text}`)")]
    DiscountLinkNotFound {
        site: String,
        selector: String,
        text: String,
    },
    #[error("Navigation to {url} timed out after {timeout:?}")]
    NavigationTimeout { url: String, timeout: Duration },
    #[error("Selector `{selector}` did not appear within {timeout:?}")]
    SelectorTimeout { selector: String, timeout: Duration },
    #[error("Failed to parse selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
    #[error("Field `{0}` is declared more than once in the record schema")]
    DuplicateField(String),
    #[error("Invalid site URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),
}
