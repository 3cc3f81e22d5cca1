use std::time::Duration;

use discount_scraper::browser::mock_session::MockSession;
use discount_scraper::export::ExportOutcome;
use discount_scraper::scrapers::lidl;
use discount_scraper::{Scraper, Site};

fn card(title: &str, image: &str, price: &str, plus: bool) -> String {
    let icon = if plus {
        r#"<span class="ods-price__lidl-plus-icon"></span>"#
    } else {
        ""
    };
    format!(
        r#"<div class="product-grid-box">
             <div class="product-grid-box__title">{title}</div>
             <div class="ods-price__value">{price}</div>
             {icon}
             <img class="odsc-image-gallery__image" src="/assets/{image}.jpg">
           </div>"#
    )
}

const LANDING: &str = "https://www.lidl.lt/";
const LISTING: &str = "https://www.lidl.lt/c/savaites-akcijos/a10023";

fn lidl_session(cards: Vec<String>, counts: Vec<usize>) -> MockSession {
    let landing = r#"<html><body><nav>
        <a class="ABaseContentTile__content" href="/c/naujienos/a10001">Naujienos</a>
        <a class="ABaseContentTile__content" href="/c/savaites-akcijos/a10023">Savaitės akcijos</a>
    </nav></body></html>"#;
    let listing = format!(
        r#"<html><body><div class="product-grid">{}</div></body></html>"#,
        cards.concat()
    );

    MockSession::new()
        .with_page(LANDING, landing)
        .with_page(LISTING, &listing)
        .with_counts(lidl::CARD_SELECTOR, counts)
}

fn instant_lidl() -> discount_scraper::SiteConfig {
    let mut config = Site::Lidl.config().unwrap();
    config.scroll = config.scroll.map(|scroll| scroll.instant());
    config.timeouts.selector_poll = Duration::from_millis(500);
    config
}

#[tokio::test]
async fn lidl_pipeline_writes_one_row_per_card() {
    let dir = tempfile::tempdir().unwrap();
    let cards = vec![
        card("Jogurtas \"Natūralus\"", "jogurtas", "0,89", true),
        card("Duona", "duona", "1,49", false),
    ];
    let session = lidl_session(cards, vec![1, 1, 2, 2, 2, 2]);
    let scraper = Scraper::with_default_output(instant_lidl(), dir.path());

    let summary = scraper.run(&session).await.unwrap();

    let path = dir.path().join("lidlProducts.csv");
    assert_eq!(summary.products, 2);
    assert_eq!(
        summary.export,
        ExportOutcome::Written {
            path: path.clone(),
            rows: 2
        }
    );
    assert!(session.is_closed());
    assert_eq!(
        session.navigations(),
[LANDING, LISTING]
    );
    // first appearance check, then 5 scroll rounds (1, 2, 2, 2, 2)
    assert_eq!(session.scroll_calls(), 5);

    let csv = std::fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        r#""title","brand","oldPrice","currentPrice","priceWrapper","lidlPlusDeal","productSize","limitedTime","image""#
    );
    assert_eq!(
        lines[1],
        r#""Jogurtas ""Natūralus""","","","0,89","","true","","","https://www.lidl.lt/assets/jogurtas.jpg""#
    );
    assert_eq!(
        lines[2],
        r#""Duona","","","1,49","","false","","","https://www.lidl.lt/assets/duona.jpg""#
    );
    assert_eq!(lines.len(), 3);
    assert!(!csv.ends_with('\n'));
}

#[tokio::test]
async fn empty_listing_is_not_an_error_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let session = lidl_session(Vec::new(), vec![3, 3, 3, 3, 3]);
    let scraper = Scraper::with_default_output(instant_lidl(), dir.path());

    let summary = scraper.run(&session).await.unwrap();

    assert_eq!(summary.products, 0);
    assert_eq!(summary.export, ExportOutcome::Skipped);
    assert!(!dir.path().join("lidlProducts.csv").exists());
    assert!(session.is_closed());
}
