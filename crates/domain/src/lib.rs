//! # searchgate-domain
//!
//! Domain model for the searchgate workspace: the structured search
//! request/response shapes, validated primitives, and the ordered
//! multi-valued Solr parameter map.
//!
//! This crate depends only on `searchgate-shared` and holds no I/O.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod params;
pub mod primitives;
pub mod request;
pub mod response;

pub use params::SolrParams;
pub use primitives::{CollectionName, PrimitiveError, VectorFieldName};
pub use request::{
    FacetRequest, FieldFacet, FieldListOptions, HighlightOptions, KeywordOperator, KeywordOptions,
    PreFilterClause, QueryFacet, RangeFacet, SearchRequest, SearchStrategy, SearchStrategyOptions,
    SemanticOptions, SimilarityOptions, SortOptions, SortOrder, SortType, StrategyKind,
    StrategyOperator,
};
pub use response::{FacetCount, FacetResults, SearchResponse, SearchResult};

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
