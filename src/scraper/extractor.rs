//! Turns rendered product cards into uniformly shaped records
//!
//! Every field of the schema is produced for every card. A sub-node that
//! cannot be found yields the field's default (`""`, `false` or `0`) instead of
//! failing the record, so the output never varies in shape.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::models::{FieldValue, ProductRecord};
use crate::schema::{Extractor, Fallback, RecordSchema};

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Elements under `card` matching `selector`, in document order.
///
/// The card itself never matches, while its real ancestors still take part in
/// the match, the same as `querySelector` on a live node.
fn within<'a>(card: ElementRef<'a>, selector: &Selector) -> impl Iterator<Item = ElementRef<'a>> {
    let scope = card.id();
    card.select(selector).filter(move |element| element.id() != scope)
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> String {
    within(card, selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

fn first_attr<'a>(card: ElementRef<'a>, selector: &Selector, attr: &str) -> Option<&'a str> {
    within(card, selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Resolve a raw attribute against the page URL, the way the DOM resolves
/// `img.src`. Values that don't parse as a URL reference are kept verbatim.
fn resolve(raw: &str, base: &Url) -> String {
    base.join(raw)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn apply(extractor: &Extractor, card: ElementRef<'_>, base: &Url) -> FieldValue {
    match extractor {
        Extractor::Text(selector) => first_text(card, selector).into(),
        Extractor::Attr { selector, attr } => first_attr(card, selector, attr)
            .map(|raw| resolve(raw, base))
            .unwrap_or_default()
            .into(),
        Extractor::JoinedText { selector, joiner } => within(card, selector)
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(joiner.as_str())
            .into(),
        Extractor::Composite {
            primary,
            secondary,
            joiner,
            fallback,
        } => {
            let head = first_text(card, primary);
            let tail = first_text(card, secondary);
            if !head.is_empty() && !tail.is_empty() {
                format!("{head}{joiner}{tail}").into()
            } else {
                match fallback {
                    Fallback::Primary => head.into(),
                    Fallback::Node(legacy) => first_text(card, legacy).into(),
                }
            }
        }
        Extractor::Presence(selector) => within(card, selector).next().is_some().into(),
        Extractor::AttrPresence { selector, attr } => {
            first_attr(card, selector, attr).is_some().into()
        }
        Extractor::Count(selector) => within(card, selector).count().into(),
    }
}

/// Extract one record from one card, in schema order.
pub fn extract_record(card: ElementRef<'_>, schema: &RecordSchema, base: &Url) -> ProductRecord {
    schema
        .fields()
        .iter()
        .map(|field| (field.name.as_str(), apply(&field.extractor, card, base)))
        .collect()
}

/// Extract records from a snapshot of cards, preserving their order.
pub fn extract_all<'a>(
    cards: impl IntoIterator<Item = ElementRef<'a>>,
    schema: &RecordSchema,
    base: &Url,
) -> Vec<ProductRecord> {
    cards
        .into_iter()
        .map(|card| extract_record(card, schema, base))
        .collect()
}

/// Extract one record per card from a whole-page HTML snapshot.
///
/// Cards are the elements matching `card_selector`, in document order. Field
/// selectors are evaluated against the full document, scoped to each card.
pub fn extract_page(html: &str, card_selector: &Selector, schema: &RecordSchema, base: &Url) -> Vec<ProductRecord> {
    let document = Html::parse_document(html);
    extract_all(document.select(card_selector), schema, base)
}
