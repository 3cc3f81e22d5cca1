//! Discount page discovery from a site's landing page

use anyhow::{Context, Result};
use scraper::Html;
use tracing::info;
use url::Url;

use crate::errors::ScrapeError;
use crate::schema::css;
use crate::traits::{DiscountLink, PageSession};

/// Lowercase and collapse whitespace so text matching ignores layout.
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Find the `href` of the first anchor matching `link` among the given
/// outer HTML fragments.
pub fn find_link_href(fragments: &[String], link: &DiscountLink) -> Result<Option<String>, ScrapeError> {
    let selector = css(&link.selector)?;
    let wanted = normalize(&link.text);

    for fragment in fragments {
        let document = Html::parse_fragment(fragment);
        let href = document
            .select(&selector)
            .filter(|anchor| normalize(&anchor.text().collect::<String>()).contains(&wanted))
            .find_map(|anchor| anchor.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty());

        if let Some(href) = href {
            return Ok(Some(href.to_string()));
        }
    }

    Ok(None)
}

/// Locate the discount listing link on the current page.
///
/// # Arguments
/// * `session` - Page already showing the landing page
/// * `site` - Site name, for error reporting
/// * `link` - Selector and text identifying the anchor
/// * `base` - Landing page URL that relative links are resolved against
///
/// # Returns
/// * `Result<Url>` - Absolute discount page URL, or `ScrapeError::DiscountLinkNotFound`
pub async fn resolve_discount_link<S>(session: &S, site: &str, link: &DiscountLink, base: &Url) -> Result<Url>
where
    S: PageSession + ?Sized,
{
    let fragments = session.outer_html(&link.selector).await?;

    let Some(href) = find_link_href(&fragments, link)? else {
        return Err(ScrapeError::DiscountLinkNotFound {
            site: site.to_string(),
            selector: link.selector.clone(),
            text: link.text.clone(),
        }
        .into());
    };

    let url = base
        .join(&href)
        .with_context(|| format!("Invalid discount link `{href}` on {site}"))?;
    info!("Found discount page for {}: {}", site, url);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::mock_session::MockSession;

    fn lidl_link() -> DiscountLink {
        DiscountLink {
            selector: "a.ABaseContentTile__content".to_string(),
            text: "savaitės akcijos".to_string(),
        }
    }

    #[test]
    fn matches_text_case_insensitively() {
        let fragments = vec![
            r#"<a class="ABaseContentTile__content" href="/c/naujienos">Naujienos</a>"#.to_string(),
            r#"<a class="ABaseContentTile__content" href="/c/savaites-akcijos/a10023">
                 <span>Savaitės</span>
                 <span>AKCIJOS</span>
               </a>"#
                .to_string(),
        ];

        let href = find_link_href(&fragments, &lidl_link()).unwrap();

        assert_eq!(href.as_deref(), Some("/c/savaites-akcijos/a10023"));
    }

    #[test]
    fn anchor_without_href_does_not_match() {
        let fragments =
            vec![r#"<a class="ABaseContentTile__content">Savaitės akcijos</a>"#.to_string()];

        assert_eq!(find_link_href(&fragments, &lidl_link()).unwrap(), None);
    }

    #[tokio::test]
    async fn relative_links_resolve_against_the_landing_page() {
        let session = MockSession::new().with_html(
            "a.button",
            vec![r#"<a class="button" href="/akcijos">Visos akcijos</a>"#.to_string()],
        );
        let link = DiscountLink {
            selector: "a.button".to_string(),
            text: "VISOS AKCIJOS".to_string(),
        };
        let base = Url::parse("https://iki.lt/").unwrap();

        let url = resolve_discount_link(&session, "Iki", &link, &base).await.unwrap();

        assert_eq!(url.as_str(), "https://iki.lt/akcijos");
    }

    #[tokio::test]
    async fn missing_link_is_a_resolution_failure() {
        let session = MockSession::new();
        let base = Url::parse("https://www.lidl.lt/").unwrap();

        let err = resolve_discount_link(&session, "Lidl", &lidl_link(), &base)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ScrapeError>(),
            Some(ScrapeError::DiscountLinkNotFound { site, .. }) if site == "Lidl"
        ));
    }
}
