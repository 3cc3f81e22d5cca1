//! iki.lt weekly offers

use url::Url;

use crate::config::{ScrollConfig, Timeouts};
use crate::errors::ScrapeError;
use crate::schema::{Extractor, Field, RecordSchema};
use crate::traits::{DiscountLink, SiteConfig};

pub const CARD_SELECTOR: &str = ".tag_class-savaites-akcijos";

pub fn schema() -> Result<RecordSchema, ScrapeError> {
    RecordSchema::new(vec![
        Field::new("title", Extractor::text(".akcija_title")?),
        Field::new("description", Extractor::text(".akcija_description")?),
        Field::new("image", Extractor::attr(".card-img-top", "src")?),
        Field::new(
            "productWrapper",
            Extractor::joined_text(".price_block_red_wrapper span", "")?,
        ),
        Field::new(
            "price",
            Extractor::composite(
                ".price_block_wrapper > .price_int",
                ".price_block_wrapper > .price_cents > span",
                ".",
            )?,
        ),
        Field::new(
            "oldPrice",
            Extractor::composite(
                ".price_old_block > .price_int",
                ".price_old_block > .price_cents",
                ".",
            )?,
        ),
        Field::new("limitedTime", Extractor::text(".mt-3 > p")?),
        Field::new("storeSize", Extractor::count(".store-list-item__hearts img")?),
    ])
}

pub fn config() -> Result<SiteConfig, ScrapeError> {
    Ok(SiteConfig {
        name: "Iki".to_string(),
        start_url: Url::parse("https://iki.lt/")?,
        discount_link: Some(DiscountLink {
            selector: "a.button".to_string(),
            text: "VISOS AKCIJOS".to_string(),
        }),
        card_selector: CARD_SELECTOR.to_string(),
        scroll: Some(ScrollConfig::new(1500, 2000, 1500)),
        timeouts: Timeouts::default(),
        schema: schema()?,
        default_output: "ikiProducts.csv".to_string(),
    })
}
