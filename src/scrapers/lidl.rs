//! lidl.lt weekly offers

use url::Url;

use crate::config::{ScrollConfig, Timeouts};
use crate::errors::ScrapeError;
use crate::schema::{Extractor, Field, RecordSchema};
use crate::traits::{DiscountLink, SiteConfig};

pub const CARD_SELECTOR: &str = ".product-grid-box";

pub fn schema() -> Result<RecordSchema, ScrapeError> {
    RecordSchema::new(vec![
        Field::new("title", Extractor::text(".product-grid-box__title")?),
        Field::new("brand", Extractor::text(".product-grid-box__brand")?),
        Field::new("oldPrice", Extractor::text(".ods-price__stroke-price s")?),
        Field::new("currentPrice", Extractor::text(".ods-price__value")?),
        Field::new(
            "priceWrapper",
            Extractor::text(".ods-price__box-content-text-el")?,
        ),
        Field::new("lidlPlusDeal", Extractor::presence(".ods-price__lidl-plus-icon")?),
        Field::new("productSize", Extractor::text(".ods-price__footer")?),
        Field::new("limitedTime", Extractor::text(".ods-badge__label")?),
        Field::new("image", Extractor::attr(".odsc-image-gallery__image", "src")?),
    ])
}

pub fn config() -> Result<SiteConfig, ScrapeError> {
    Ok(SiteConfig {
        name: "Lidl".to_string(),
        start_url: Url::parse("https://www.lidl.lt/")?,
        discount_link: Some(DiscountLink {
            selector: "a.ABaseContentTile__content".to_string(),
            text: "savaitės akcijos".to_string(),
        }),
        card_selector: CARD_SELECTOR.to_string(),
        scroll: Some(ScrollConfig::new(1000, 1500, 800)),
        timeouts: Timeouts::default(),
        schema: schema()?,
        default_output: "lidlProducts.csv".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldValue, ProductRecord};
    use crate::schema::css;
    use crate::scraper::extractor::extract_page;

    fn extract(cards: &[&str], base: &Url) -> Vec<ProductRecord> {
        let html = format!("<html><body>{}</body></html>", cards.concat());
        extract_page(&html, &css(CARD_SELECTOR).unwrap(), &schema().unwrap(), base)
    }

    #[test]
    fn lidl_plus_flag_follows_icon_presence() {
        let base = Url::parse("https://www.lidl.lt/c/savaites-akcijos/a10023").unwrap();
        let cards = [
            r#"<div class="product-grid-box">
                 <div class="product-grid-box__title">Jogurtas</div>
                 <div class="ods-price__stroke-price"><s>1,19</s></div>
                 <div class="ods-price__value">0,89</div>
                 <span class="ods-price__lidl-plus-icon"></span>
               </div>"#,
            r#"<div class="product-grid-box">
                 <div class="product-grid-box__title">Duona</div>
                 <div class="ods-price__value">1,49</div>
                 <div class="ods-badge__label">Tik šią savaitę</div>
               </div>"#,
        ];

        let records = extract(&cards, &base);

        assert_eq!(records[0].get("lidlPlusDeal"), Some(&FieldValue::from(true)));
        assert_eq!(records[0].get("oldPrice"), Some(&FieldValue::from("1,19")));
        assert_eq!(records[1].get("lidlPlusDeal"), Some(&FieldValue::from(false)));
        assert_eq!(records[1].get("oldPrice"), Some(&FieldValue::from("")));
        assert_eq!(
            records[1].get("limitedTime"),
            Some(&FieldValue::from("Tik šią savaitę"))
        );
        assert_eq!(records[0].len(), records[1].len());
    }
}
