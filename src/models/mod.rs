//! Data models for scraped product listings

use std::fmt;

/// A single cell of a product record.
///
/// Text is the common case; flags and counters keep their type until export,
/// where they are rendered in canonical string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Count(usize),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Flag(flag) => write!(f, "{flag}"),
            Self::Count(count) => write!(f, "{count}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<usize> for FieldValue {
    fn from(value: usize) -> Self {
        Self::Count(value)
    }
}

/// A product listing scraped from one card, keyed by schema field name.
///
/// Keys keep insertion order, which is the order of the schema that produced
/// the record and therefore the order of the CSV header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductRecord {
    fields: Vec<(String, FieldValue)>,
}

impl ProductRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. Callers keep names unique; the schema guarantees it.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ProductRecord
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (name, value) in iter {
            record.push(name, value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_render_canonically() {
        assert_eq!(FieldValue::from("1.99").to_string(), "1.99");
        assert_eq!(FieldValue::from(true).to_string(), "true");
        assert_eq!(FieldValue::from(false).to_string(), "false");
        assert_eq!(FieldValue::from(12_usize).to_string(), "12");
    }

    #[test]
    fn keys_keep_insertion_order() {
        let record: ProductRecord = [("title", "Milk"), ("price", "1.29"), ("brand", "")]
            .into_iter()
            .collect();

        assert_eq!(record.keys().collect::<Vec<_>>(), ["title", "price", "brand"]);
        assert_eq!(record.get("price"), Some(&FieldValue::from("1.29")));
        assert_eq!(record.get("missing"), None);
    }
}
