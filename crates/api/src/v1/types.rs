//! API v1 DTO types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Error kind exposed in API v1 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiV1ErrorKind {
    /// Expected, user-facing errors (validation, cancellation).
    Expected,
    /// Invariant violations that indicate a bug.
    Invariant,
}

/// API v1 error code string (stable contract value).
pub type ApiV1ErrorCode = String;

/// Metadata map attached to API v1 errors.
pub type ApiV1ErrorMeta = BTreeMap<String, String>;

/// API v1 error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiV1ErrorDto {
    /// Stable error code (e.g. `ERR_CORE_INVALID_INPUT`).
    pub code: ApiV1ErrorCode,
    /// Human-readable message for the caller.
    pub message: String,
    /// Error category.
    pub kind: ApiV1ErrorKind,
    /// Optional metadata for debugging and correlation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ApiV1ErrorMeta>,
}

/// API v1 result wrapper for success or failure payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiV1Result<T> {
    /// Success response.
    Ok {
        /// Indicates success.
        ok: bool,
        /// Success payload.
        data: T,
    },
    /// Error response.
    Err {
        /// Indicates failure.
        ok: bool,
        /// Error payload.
        error: ApiV1ErrorDto,
    },
}

impl<T> ApiV1Result<T> {
    /// Build a success response wrapper.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self::Ok { ok: true, data }
    }

    /// Build an error response wrapper.
    #[must_use]
    pub const fn err(error: ApiV1ErrorDto) -> Self {
        Self::Err { ok: false, error }
    }
}

/// Strategy flavor discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiV1StrategyType {
    /// Keyword (edismax) retrieval.
    Keyword,
    /// Semantic (vector kNN) retrieval.
    Semantic,
}

/// Operator joining top-level strategy fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiV1Operator {
    /// Any strategy may match.
    Or,
    /// Every strategy must match.
    And,
}

impl Default for ApiV1Operator {
    fn default() -> Self {
        Self::Or
    }
}

/// Keyword sub-strategy options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ApiV1KeywordOptionsDto {
    /// Replacement for the request's query text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_text_override: Option<String>,
    /// Replacement for the configured keyword fields.
    pub override_fields_to_query: Vec<String>,
    /// Term operator inside the keyword query (`AND`/`OR`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_logical_operator: Option<ApiV1Operator>,
    /// Legacy flag: also search every configured vector field.
    pub boost_with_semantic: bool,
}

/// One pre-filter clause applied inside the kNN traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApiV1PreFilterDto {
    /// Solr field name.
    pub field: String,
    /// Exact value to require.
    pub value: String,
}

/// Similarity constraints for vector retrieval.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ApiV1SimilarityOptionsDto {
    /// Minimum similarity for a document to be returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_return: Option<f32>,
    /// Minimum similarity for graph traversal to continue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_traverse: Option<f32>,
    /// Filter clauses applied before the kNN traversal.
    pub pre_filter: Vec<ApiV1PreFilterDto>,
}

/// Semantic sub-strategy options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ApiV1SemanticOptionsDto {
    /// Per-strategy top-K override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Logical vector field names; empty means all configured fields.
    pub vector_fields: Vec<String>,
    /// Optional similarity constraints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<ApiV1SimilarityOptionsDto>,
    /// Tags whose filters are applied during traversal.
    pub include_tags: Vec<String>,
    /// Tags whose filters are excluded during traversal.
    pub exclude_tags: Vec<String>,
}

/// One retrieval strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApiV1SearchStrategyDto {
    /// Strategy flavor.
    #[serde(rename = "type")]
    pub strategy_type: ApiV1StrategyType,
    /// Keyword options; only valid when `type` is `KEYWORD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<ApiV1KeywordOptionsDto>,
    /// Semantic options; only valid when `type` is `SEMANTIC`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic: Option<ApiV1SemanticOptionsDto>,
    /// Multiplicative score boost; `0` means no boost wrapper.
    #[serde(default)]
    pub boost: f32,
}

/// The strategy tree of a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ApiV1StrategyOptionsDto {
    /// Operator joining the strategy fragments.
    pub operator: ApiV1Operator,
    /// Ordered strategies; at least one is required.
    pub strategies: Vec<ApiV1SearchStrategyDto>,
}

/// Sort axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiV1SortType {
    /// Sort by relevance score.
    Score,
    /// Sort by an explicit field.
    Field,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiV1SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// Requested result ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApiV1SortOptionsDto {
    /// Sort axis.
    pub sort_type: ApiV1SortType,
    /// Field to sort by; required when `sortType` is `FIELD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    /// Sort direction.
    pub sort_order: ApiV1SortOrder,
}

/// Field facet options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ApiV1FieldFacetDto {
    /// Field to facet on.
    pub field: String,
    /// Maximum number of facet values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Also count documents missing the field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<bool>,
    /// Restrict values to this prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

/// Range facet options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ApiV1RangeFacetDto {
    /// Field to facet on.
    pub field: String,
    /// Inclusive lower bound.
    pub start: String,
    /// Exclusive upper bound.
    pub end: String,
    /// Bucket width.
    pub gap: String,
    /// Clamp the final bucket at `end`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardend: Option<bool>,
    /// Which out-of-range counts to include.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
}

/// Query facet options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ApiV1QueryFacetDto {
    /// Raw Solr query counted as one facet bucket.
    pub query: String,
}

/// One facet request; exactly one of the three members must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ApiV1FacetRequestDto {
    /// Facet over field values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet_field: Option<ApiV1FieldFacetDto>,
    /// Facet over range buckets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet_range: Option<ApiV1RangeFacetDto>,
    /// Facet over one raw query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet_query: Option<ApiV1QueryFacetDto>,
}

/// Highlighting options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ApiV1HighlightOptionsDto {
    /// Fields to highlight.
    pub fields: Vec<String>,
    /// Opening tag around matched text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_tag: Option<String>,
    /// Closing tag around matched text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_tag: Option<String>,
    /// Number of snippets per field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet_count: Option<u32>,
    /// Maximum snippet size in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet_size: Option<u32>,
    /// Hint that snippets come from semantically matched chunks.
    pub semantic_highlight: bool,
}

/// Field projection overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ApiV1FieldListDto {
    /// Fields to include in results.
    pub inclusion_fields: Vec<String>,
    /// Fields to remove from results.
    pub exclusion_fields: Vec<String>,
}

/// One raw passthrough parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApiV1AdditionalParamDto {
    /// Solr parameter key.
    pub key: String,
    /// Parameter value.
    pub value: String,
}

/// API v1 search request payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ApiV1SearchRequestDto {
    /// User query text; required and non-empty.
    pub query: String,
    /// Zero-based offset of the first result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    /// Number of results to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_results: Option<u32>,
    /// Raw Solr filter clauses, applied in order.
    pub filter_queries: Vec<String>,
    /// Result ordering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<ApiV1SortOptionsDto>,
    /// Facet requests, applied in order.
    pub facet_requests: Vec<ApiV1FacetRequestDto>,
    /// Highlighting options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_options: Option<ApiV1HighlightOptionsDto>,
    /// Field projection overrides.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_list: Option<ApiV1FieldListDto>,
    /// Raw passthrough parameters appended last.
    pub additional_params: Vec<ApiV1AdditionalParamDto>,
    /// The strategy tree.
    pub strategy: ApiV1StrategyOptionsDto,
}

/// One matching document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiV1SearchResultDto {
    /// Document identifier.
    pub id: String,
    /// Projected stored fields.
    pub fields: BTreeMap<String, Value>,
    /// Joined highlight snippet.
    pub snippet: String,
    /// Individual highlight fragments.
    pub matched_text: Vec<String>,
}

/// Facet buckets for one facet name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiV1FacetResultsDto {
    /// Buckets in rank order: value and count pairs.
    pub counts: Vec<ApiV1FacetCountDto>,
}

/// One facet bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiV1FacetCountDto {
    /// Bucket value.
    pub value: String,
    /// Number of matching documents.
    pub count: u64,
}

/// API v1 search response payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiV1SearchResponseDto {
    /// Matching documents in rank order.
    pub results: Vec<ApiV1SearchResultDto>,
    /// Facet results keyed by facet name.
    pub facets: BTreeMap<String, ApiV1FacetResultsDto>,
    /// Total matching documents reported by Solr.
    pub total_results: u64,
    /// Solr-reported query time in milliseconds.
    pub q_time: u32,
    /// Wall-clock time of response mapping, epoch milliseconds.
    pub time_of_search: u64,
}
