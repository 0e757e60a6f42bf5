//! Solr boundary contract.
//!
//! The core emits one select-style request per search; the payload types
//! here are the normalized form of Solr's select response envelope.

use crate::BoxFuture;
use searchgate_domain::{CollectionName, SolrParams};
use searchgate_shared::{RequestContext, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A planned Solr query: target collection plus the ordered parameter map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolrQueryData {
    /// Collection the select request targets.
    pub collection: CollectionName,
    /// Ordered multi-valued select parameters.
    pub params: SolrParams,
}

/// A returned Solr document: stored fields keyed by name.
pub type SolrDocument = BTreeMap<Box<str>, Value>;

/// Highlight fragments: document id → field → fragments.
pub type SolrHighlighting = BTreeMap<Box<str>, BTreeMap<Box<str>, Vec<Box<str>>>>;

/// Ordered `(value, count)` buckets for one named facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolrNamedCounts {
    /// Facet name (field name or range field name).
    pub name: Box<str>,
    /// Buckets in Solr's order.
    pub counts: Vec<(Box<str>, u64)>,
}

/// Facet payloads of one select response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolrFacetCounts {
    /// `facet_fields` entries in response order.
    pub fields: Vec<SolrNamedCounts>,
    /// `facet_queries` entries in response order.
    pub queries: Vec<(Box<str>, u64)>,
    /// `facet_ranges` entries in response order.
    pub ranges: Vec<SolrNamedCounts>,
}

impl SolrFacetCounts {
    /// Returns true when no facet payload is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.queries.is_empty() && self.ranges.is_empty()
    }
}

/// A normalized Solr select response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SolrSelectResponse {
    /// Total number of matching documents.
    pub num_found: u64,
    /// Offset of the first returned document.
    pub start: u64,
    /// Solr-reported query time in milliseconds.
    pub q_time_ms: u32,
    /// Returned documents in rank order.
    pub docs: Vec<SolrDocument>,
    /// Highlight fragments, when highlighting was requested.
    pub highlighting: SolrHighlighting,
    /// Facet counts, when faceting was requested.
    pub facets: SolrFacetCounts,
}

/// Boundary contract for executing planned Solr queries.
pub trait SolrPort: Send + Sync {
    /// Execute one select request.
    fn select(
        &self,
        ctx: &RequestContext,
        request: SolrQueryData,
    ) -> BoxFuture<'_, Result<SolrSelectResponse>>;
}
