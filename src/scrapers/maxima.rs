//! maxima.lt offers
//!
//! The offers page renders every card up front, so it is neither reached
//! through a discount link nor scrolled.

use url::Url;

use crate::config::Timeouts;
use crate::errors::ScrapeError;
use crate::schema::{Extractor, Field, RecordSchema};
use crate::traits::SiteConfig;

pub const CARD_SELECTOR: &str = "[data-controller=\"offerCard\"]";

pub fn schema() -> Result<RecordSchema, ScrapeError> {
    RecordSchema::new(vec![
        Field::new("title", Extractor::text(".mt-4")?),
        Field::new("image", Extractor::attr(".offer-image img", "src")?),
        Field::new("description", Extractor::text(".row .col-12")?),
        Field::new("limitedTime", Extractor::text(".text-small span")?),
        Field::new(
            "discountPercentage",
            Extractor::composite(".discount", ".percentage-symbol", "")?,
        ),
        Field::new(
            "oldPrice",
            Extractor::composite_or(
                "div.bg-white .price-eur",
                "div.bg-white .price-cents",
                ".",
                ".price-old",
            )?,
        ),
        Field::new(
            "price",
            Extractor::composite("div.bg-primary .price-eur", "div.bg-primary .price-cents", ".")?,
        ),
        Field::new("aciuDeal", Extractor::attr_presence(".icon-wrapper img", "src")?),
        Field::new("storeSize", Extractor::count(".d-inline-block img.x-icon")?),
    ])
}

pub fn config() -> Result<SiteConfig, ScrapeError> {
    Ok(SiteConfig {
        name: "Maxima".to_string(),
        start_url: Url::parse("https://www.maxima.lt/pasiulymai")?,
        discount_link: None,
        card_selector: CARD_SELECTOR.to_string(),
        scroll: None,
        timeouts: Timeouts::default(),
        schema: schema()?,
        default_output: "maximaProducts.csv".to_string(),
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

    fn base() -> Url {
        Url::parse("https://www.maxima.lt/pasiulymai").unwrap()
    }

    #[test]
    fn split_prices_and_discount_are_joined() {
        let card = r#"
            <div data-controller="offerCard">
                <div class="offer-image"><img src="https://cdn.maxima.lt/sviestas.png"></div>
                <h4 class="mt-4">Sviestas</h4>
                <div class="discount">-25</div><div class="percentage-symbol">%</div>
                <div class="bg-white"><span class="price-eur">2</span><span class="price-cents">59</span></div>
                <div class="bg-primary"><span class="price-eur">1</span><span class="price-cents">94</span></div>
                <div class="icon-wrapper"><img src="/icons/aciu.svg"></div>
                <div class="d-inline-block"><img class="x-icon"><img class="x-icon"><img class="x-icon"></div>
            </div>"#;

        let records = extract(&[card], &base());
        let record = &records[0];

        assert_eq!(record.get("discountPercentage"), Some(&FieldValue::from("-25%")));
        assert_eq!(record.get("oldPrice"), Some(&FieldValue::from("2.59")));
        assert_eq!(record.get("price"), Some(&FieldValue::from("1.94")));
        assert_eq!(record.get("aciuDeal"), Some(&FieldValue::from(true)));
        assert_eq!(record.get("storeSize"), Some(&FieldValue::from(3_usize)));
    }

    #[test]
    fn crossed_out_price_replaces_missing_split_old_price() {
        let card = r#"
            <div data-controller="offerCard">
                <h4 class="mt-4">Kiaušiniai</h4>
                <span class="price-old">3,19 €</span>
                <div class="icon-wrapper"><img></div>
            </div>"#;

        let records = extract(&[card], &base());
        let record = &records[0];

        assert_eq!(record.get("oldPrice"), Some(&FieldValue::from("3,19 €")));
        assert_eq!(record.get("price"), Some(&FieldValue::from("")));
        assert_eq!(record.get("discountPercentage"), Some(&FieldValue::from("")));
        assert_eq!(record.get("aciuDeal"), Some(&FieldValue::from(false)));
        assert_eq!(record.get("storeSize"), Some(&FieldValue::from(0_usize)));
    }

    #[test]
    fn card_classes_do_not_leak_into_fields() {
        let card = r#"<div class="mt-4 x-icon" data-controller="offerCard"><h4 class="mt-4">Sviestas</h4><span>-25%</span><img class="x-icon"></div>"#;
        let html = format!(r#"<html><body><div class="d-inline-block">{card}</div></body></html>"#);

        let records = extract_page(&html, &css(CARD_SELECTOR).unwrap(), &schema().unwrap(), &base());

        assert_eq!(records[0].get("title"), Some(&FieldValue::from("Sviestas")));
        assert_eq!(records[0].get("storeSize"), Some(&FieldValue::from(1_usize)));
    }

    #[test]
    fn description_row_may_wrap_the_card() {
        let html = r#"<html><body><div class="row">
            <div data-controller="offerCard">
                <h4 class="mt-4">Varškė</h4>
                <div class="col-12"> 9 %, 180 g </div>
            </div>
        </div></body></html>"#;

        let records = extract_page(html, &css(CARD_SELECTOR).unwrap(), &schema().unwrap(), &base());

        assert_eq!(records[0].get("description"), Some(&FieldValue::from("9 %, 180 g")));
    }
}
