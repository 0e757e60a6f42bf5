//! Structured search request model.
//!
//! A request combines one or more retrieval strategies (keyword, semantic)
//! with filters, facets, sorting, highlighting, and field projection. The
//! shapes here mirror the RPC contract; request-scoped values are immutable
//! during planning.

use crate::primitives::VectorFieldName;
use serde::{Deserialize, Serialize};

/// Logical operator joining top-level strategy fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyOperator {
    /// Any strategy may match.
    Or,
    /// Every strategy must match.
    And,
}

impl StrategyOperator {
    /// Solr boolean operator spelling.
    #[must_use]
    pub const fn as_solr(self) -> &'static str {
        match self {
            Self::Or => "OR",
            Self::And => "AND",
        }
    }
}

impl Default for StrategyOperator {
    fn default() -> Self {
        Self::Or
    }
}

/// Logical operator applied between terms inside a keyword query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeywordOperator {
    /// All terms must match.
    And,
    /// Any term may match.
    Or,
}

impl KeywordOperator {
    /// Solr `q.op` spelling.
    #[must_use]
    pub const fn as_solr(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl Default for KeywordOperator {
    fn default() -> Self {
        Self::Or
    }
}

/// Options for a keyword (edismax) sub-strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeywordOptions {
    /// Replacement for the request's query text, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_text_override: Option<Box<str>>,
    /// Replacement for the configured keyword fields, when non-empty.
    pub override_fields_to_query: Vec<Box<str>>,
    /// Term operator inside the keyword query.
    pub keyword_logical_operator: KeywordOperator,
    /// Legacy flag: also search every configured vector field.
    pub boost_with_semantic: bool,
}

/// A single field/value pre-filter clause applied inside the kNN traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreFilterClause {
    /// Solr field name.
    pub field: Box<str>,
    /// Exact value to require.
    pub value: Box<str>,
}

/// Similarity constraints for vector retrieval.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimilarityOptions {
    /// Minimum similarity for a document to be returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_return: Option<f32>,
    /// Minimum similarity for graph traversal to continue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_traverse: Option<f32>,
    /// Filter clauses applied before the kNN traversal.
    pub pre_filter: Vec<PreFilterClause>,
}

impl SimilarityOptions {
    /// Returns true when no similarity constraint is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_return.is_none() && self.min_traverse.is_none() && self.pre_filter.is_empty()
    }
}

/// Options for a semantic (vector kNN) sub-strategy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SemanticOptions {
    /// Per-strategy top-K override; falls back to each field's default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Logical vector fields to search; empty means all configured fields.
    pub vector_fields: Vec<VectorFieldName>,
    /// Optional similarity constraints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<SimilarityOptions>,
    /// Tags whose filters are applied during traversal.
    pub include_tags: Vec<Box<str>>,
    /// Tags whose filters are excluded during traversal.
    pub exclude_tags: Vec<Box<str>>,
}

/// The retrieval flavor of one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyKind {
    /// Keyword (edismax) retrieval.
    Keyword(KeywordOptions),
    /// Semantic (vector kNN) retrieval.
    Semantic(SemanticOptions),
}

/// One retrieval strategy plus its score boost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStrategy {
    /// Retrieval flavor and options.
    #[serde(flatten)]
    pub kind: StrategyKind,
    /// Multiplicative score boost; `0` means no boost wrapper.
    #[serde(default)]
    pub boost: f32,
}

impl SearchStrategy {
    /// A keyword strategy with default options and no boost.
    #[must_use]
    pub fn keyword(options: KeywordOptions, boost: f32) -> Self {
        Self {
            kind: StrategyKind::Keyword(options),
            boost,
        }
    }

    /// A semantic strategy with the given options and boost.
    #[must_use]
    pub fn semantic(options: SemanticOptions, boost: f32) -> Self {
        Self {
            kind: StrategyKind::Semantic(options),
            boost,
        }
    }
}

/// The full strategy tree of a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchStrategyOptions {
    /// Operator joining the strategy fragments.
    pub operator: StrategyOperator,
    /// Ordered strategies; at least one is required.
    pub strategies: Vec<SearchStrategy>,
}

/// Sort axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortType {
    /// Sort by relevance score.
    Score,
    /// Sort by an explicit field.
    Field,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Solr sort direction spelling.
    #[must_use]
    pub const fn as_solr(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Requested result ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortOptions {
    /// Sort axis.
    pub sort_type: SortType,
    /// Field to sort by; required when `sort_type` is `Field`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<Box<str>>,
    /// Sort direction.
    pub sort_order: SortOrder,
}

/// Field facet over the distinct values of one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldFacet {
    /// Field to facet on.
    pub field: Box<str>,
    /// Maximum number of facet values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Also count documents missing the field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<bool>,
    /// Restrict values to this prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<Box<str>>,
}

/// Range facet over a numeric or date field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RangeFacet {
    /// Field to facet on.
    pub field: Box<str>,
    /// Inclusive lower bound.
    pub start: Box<str>,
    /// Exclusive upper bound.
    pub end: Box<str>,
    /// Bucket width.
    pub gap: Box<str>,
    /// Clamp the final bucket at `end`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardend: Option<bool>,
    /// Which out-of-range counts to include (`before`, `after`, `between`, …).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<Box<str>>,
}

/// Facet over an arbitrary raw query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryFacet {
    /// Raw Solr query counted as one facet bucket.
    pub query: Box<str>,
}

/// One facet request; exactly one variant per entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FacetRequest {
    /// Facet over field values.
    Field(FieldFacet),
    /// Facet over range buckets.
    Range(RangeFacet),
    /// Facet over one raw query.
    Query(QueryFacet),
}

/// Highlighting options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HighlightOptions {
    /// Fields to highlight; defaults to `title,body` when empty.
    pub fields: Vec<Box<str>>,
    /// Opening tag around matched text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_tag: Option<Box<str>>,
    /// Closing tag around matched text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_tag: Option<Box<str>>,
    /// Number of snippets per field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet_count: Option<u32>,
    /// Maximum snippet size in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet_size: Option<u32>,
    /// Hint that snippets come from semantically matched chunks.
    pub semantic_highlight: bool,
}

/// Requested field projection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldListOptions {
    /// Fields to include in results.
    pub inclusion_fields: Vec<Box<str>>,
    /// Fields to remove from results.
    pub exclusion_fields: Vec<Box<str>>,
}

/// A structured search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// User query text; required and non-empty.
    pub query: Box<str>,
    /// Zero-based offset of the first result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    /// Number of results to return; defaults from configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_results: Option<u32>,
    /// Raw Solr filter clauses, applied in order.
    #[serde(default)]
    pub filter_queries: Vec<Box<str>>,
    /// Result ordering; defaults from configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOptions>,
    /// Facet requests, applied in order.
    #[serde(default)]
    pub facet_requests: Vec<FacetRequest>,
    /// Highlighting options; highlighting is off when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<HighlightOptions>,
    /// Field projection overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_list: Option<FieldListOptions>,
    /// Raw passthrough parameters appended after all structured parameters.
    #[serde(default)]
    pub additional_params: Vec<(Box<str>, Box<str>)>,
    /// The strategy tree.
    #[serde(default)]
    pub strategy: SearchStrategyOptions,
}

impl SearchRequest {
    /// A request with only the query text set.
    #[must_use]
    pub fn with_query(query: impl Into<Box<str>>) -> Self {
        Self {
            query: query.into(),
            start: None,
            num_results: None,
            filter_queries: Vec::new(),
            sort: None,
            facet_requests: Vec::new(),
            highlight: None,
            field_list: None,
            additional_params: Vec::new(),
            strategy: SearchStrategyOptions::default(),
        }
    }
}
