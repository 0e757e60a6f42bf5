//! Normalized search response model.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One facet bucket: value and document count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetCount {
    /// Bucket value (field value, range start, or raw query).
    pub value: Box<str>,
    /// Number of matching documents.
    pub count: u64,
}

/// Ordered facet buckets for one facet name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FacetResults {
    /// Buckets in the order Solr returned them.
    pub counts: Vec<FacetCount>,
}

/// One matching document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResult {
    /// Document identifier.
    pub id: Box<str>,
    /// Projected stored fields.
    pub fields: BTreeMap<Box<str>, Value>,
    /// Joined highlight snippet; empty when highlighting was off or missed.
    pub snippet: Box<str>,
    /// Individual highlight fragments in field order.
    pub matched_text: Vec<Box<str>>,
}

/// A normalized search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResponse {
    /// Matching documents in rank order.
    pub results: Vec<SearchResult>,
    /// Facet results keyed by facet name.
    pub facets: BTreeMap<Box<str>, FacetResults>,
    /// Total matching documents reported by Solr (`numFound`).
    pub total_results: u64,
    /// Solr-reported query time in milliseconds.
    pub q_time_ms: u32,
    /// Wall-clock time of response mapping, epoch milliseconds.
    pub time_of_search_ms: u64,
}
