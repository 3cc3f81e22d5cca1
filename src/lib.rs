pub mod browser;
pub mod config;
pub mod discount_finder;
pub mod errors;
pub mod export;
pub mod models;
pub mod schema;
pub mod scraper;
pub mod scrapers;
pub mod traits;

pub use discount_finder::DiscountFinder;
pub use errors::ScrapeError;
pub use models::{FieldValue, ProductRecord};
pub use crate::scraper::{ScrapeSummary, Scraper};
pub use scrapers::Site;
pub use traits::{PageSession, SiteConfig};
