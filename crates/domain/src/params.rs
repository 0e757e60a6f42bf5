//! Ordered multi-valued Solr parameter map.
//!
//! Solr select parameters are a mapping from key to an ordered sequence of
//! values (`fq`, `facet.field`, … repeat). Planning must be deterministic,
//! so keys keep their first-insertion order and values keep append order.

use serde::Serialize;

/// An ordered multi-valued parameter map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SolrParams {
    entries: Vec<(Box<str>, Vec<Box<str>>)>,
}

impl SolrParams {
    /// Create an empty parameter map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a value to `key`, creating the key at the end on first use.
    pub fn append(&mut self, key: impl Into<Box<str>>, value: impl Into<Box<str>>) {
        let key = key.into();
        let value = value.into();
        if let Some((_, values)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            values.push(value);
        } else {
            self.entries.push((key, vec![value]));
        }
    }

    /// Replace all values of `key` with a single value.
    pub fn set(&mut self, key: impl Into<Box<str>>, value: impl Into<Box<str>>) {
        let key = key.into();
        let value = value.into();
        if let Some((_, values)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            values.clear();
            values.push(value);
        } else {
            self.entries.push((key, vec![value]));
        }
    }

    /// First value of `key`, when present.
    #[must_use]
    pub fn get_first(&self, key: &str) -> Option<&str> {
        self.values(key).next()
    }

    /// All values of `key` in append order.
    pub fn values(&self, key: &str) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |(k, _)| k.as_ref() == key)
            .flat_map(|(_, values)| values.iter().map(AsRef::as_ref))
    }

    /// Returns true when `key` has at least one value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k.as_ref() == key)
    }

    /// Flattened `(key, value)` pairs in deterministic emission order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(key, values)| {
            values
                .iter()
                .map(move |value| (key.as_ref(), value.as_ref()))
        })
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no parameter is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
