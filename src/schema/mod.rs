//! Record schemas: the ordered field list each site produces per product card
//!
//! A schema is built once per site and stays immutable for the whole scrape.
//! Its field order is the CSV header order and the key order of every record.

use std::collections::HashSet;

use scraper::Selector;

use crate::errors::ScrapeError;

/// Parse a CSS selector, keeping the offending text in the error.
pub fn css(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}

/// What a composite field falls back to when its two parts don't both resolve.
#[derive(Debug, Clone)]
pub enum Fallback {
    /// Use the primary part alone (empty when it is missing too)
    Primary,
    /// Use the trimmed text of a legacy combined node (empty when missing)
    Node(Selector),
}

/// How a field value is derived from one product card.
#[derive(Debug, Clone)]
pub enum Extractor {
    /// Trimmed text of the first match
    Text(Selector),
    /// Attribute of the first match, resolved against the page URL
    Attr { selector: Selector, attr: String },
    /// Trimmed text of every match, empty pieces dropped, then joined
    JoinedText { selector: Selector, joiner: String },
    /// Two parts joined when both resolve, otherwise the fallback
    Composite {
        primary: Selector,
        secondary: Selector,
        joiner: String,
        fallback: Fallback,
    },
    /// Whether any node matches
    Presence(Selector),
    /// Whether the first match carries a non-empty attribute
    AttrPresence { selector: Selector, attr: String },
    /// Number of matching nodes
    Count(Selector),
}

impl Extractor {
    pub fn text(selector: &str) -> Result<Self, ScrapeError> {
        Ok(Self::Text(css(selector)?))
    }

    pub fn attr(selector: &str, attr: &str) -> Result<Self, ScrapeError> {
        Ok(Self::Attr {
            selector: css(selector)?,
            attr: attr.to_string(),
        })
    }

    pub fn joined_text(selector: &str, joiner: &str) -> Result<Self, ScrapeError> {
        Ok(Self::JoinedText {
            selector: css(selector)?,
            joiner: joiner.to_string(),
        })
    }

    /// Composite that falls back to the primary part alone.
    pub fn composite(primary: &str, secondary: &str, joiner: &str) -> Result<Self, ScrapeError> {
        Ok(Self::Composite {
            primary: css(primary)?,
            secondary: css(secondary)?,
            joiner: joiner.to_string(),
            fallback: Fallback::Primary,
        })
    }

    /// Composite that falls back to a legacy combined node.
    pub fn composite_or(
        primary: &str,
        secondary: &str,
        joiner: &str,
        legacy: &str,
    ) -> Result<Self, ScrapeError> {
        Ok(Self::Composite {
            primary: css(primary)?,
            secondary: css(secondary)?,
            joiner: joiner.to_string(),
            fallback: Fallback::Node(css(legacy)?),
        })
    }

    pub fn presence(selector: &str) -> Result<Self, ScrapeError> {
        Ok(Self::Presence(css(selector)?))
    }

    pub fn attr_presence(selector: &str, attr: &str) -> Result<Self, ScrapeError> {
        Ok(Self::AttrPresence {
            selector: css(selector)?,
            attr: attr.to_string(),
        })
    }

    pub fn count(selector: &str) -> Result<Self, ScrapeError> {
        Ok(Self::Count(css(selector)?))
    }
}

/// One named column of a record.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub extractor: Extractor,
}

impl Field {
    pub fn new(name: impl Into<String>, extractor: Extractor) -> Self {
        Self {
            name: name.into(),
            extractor,
        }
    }
}

/// Ordered, immutable list of fields.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    fields: Vec<Field>,
}

impl RecordSchema {
    /// Build a schema, rejecting duplicate field names.
    ///
    /// # Errors
    /// * `ScrapeError::DuplicateField` - a name appears twice
    pub fn new(fields: Vec<Field>) -> Result<Self, ScrapeError> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(ScrapeError::DuplicateField(field.name.clone()));
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
