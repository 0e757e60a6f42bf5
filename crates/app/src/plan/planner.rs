//! Top-level Solr query planner.

use crate::plan::facet::apply_facets;
use crate::plan::fields::{FieldListOutcome, build_field_list};
use crate::plan::highlight::apply_highlight;
use crate::plan::keyword::build_keyword_fragment;
use crate::plan::semantic::build_semantic_fragment;
use crate::plan::Fragment;
use searchgate_config::GatewayConfig;
use searchgate_domain::{
    CollectionName, SearchRequest, SearchStrategy, SemanticOptions, SolrParams, SortOptions,
    SortType, StrategyKind,
};
use searchgate_ports::{EmbeddingPort, SolrQueryData};
use searchgate_shared::{ErrorCode, ErrorEnvelope, RequestContext, Result};

/// A planned Solr query plus the projection decision the response mapper
/// needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedQuery {
    /// Target collection and ordered select parameters.
    pub query: SolrQueryData,
    /// Merged field-list outcome (projection + conflicts to log).
    pub field_list: FieldListOutcome,
}

/// Plan one search request into a Solr parameter map.
///
/// Planning is pure given a warm embedding cache: the same request yields
/// byte-identical parameters, with `$var` slot names a function of strategy
/// position.
pub async fn plan_query(
    ctx: &RequestContext,
    config: &GatewayConfig,
    embedding: &dyn EmbeddingPort,
    request: &SearchRequest,
) -> Result<PlannedQuery> {
    ctx.ensure_not_cancelled("plan.start")?;

    if request.query.trim().is_empty() {
        return Err(ErrorEnvelope::expected(
            ErrorCode::invalid_input(),
            "query must be non-empty",
        ));
    }
    if request.strategy.strategies.is_empty() {
        return Err(ErrorEnvelope::expected(
            ErrorCode::invalid_input(),
            "at least one search strategy is required",
        ));
    }

    let strategies = expand_legacy_strategies(&request.strategy.strategies);

    let mut fragments: Vec<Fragment> = Vec::with_capacity(strategies.len());
    let mut pre_filters_seen = 0usize;
    for (index, strategy) in strategies.iter().enumerate() {
        let position = index + 1;
        let fragment = match &strategy.kind {
            StrategyKind::Keyword(options) => build_keyword_fragment(
                &config.collection,
                options,
                &request.query,
                strategy.boost,
                position,
            )?,
            StrategyKind::Semantic(options) => {
                if semantic_has_pre_filter(options) {
                    pre_filters_seen += 1;
                }
                build_semantic_fragment(
                    ctx,
                    &config.collection,
                    embedding,
                    options,
                    &request.query,
                    strategy.boost,
                    position,
                    pre_filters_seen,
                )
                .await?
            },
        };
        fragments.push(fragment);
    }

    let mut params = SolrParams::new();

    let joined = fragments
        .iter()
        .map(|fragment| fragment.query.as_str())
        .collect::<Vec<&str>>()
        .join(&format!(" {} ", request.strategy.operator.as_solr()));
    params.set("q", joined);
    for fragment in &fragments {
        for (name, value) in &fragment.bindings {
            params.append(name.as_ref(), value.as_ref());
        }
    }

    params.set("start", request.start.unwrap_or(0).to_string());
    params.set(
        "rows",
        request
            .num_results
            .unwrap_or(config.collection.default_rows)
            .to_string(),
    );

    for filter in &request.filter_queries {
        params.append("fq", filter.as_ref());
    }

    params.set("sort", sort_clause(request.sort.as_ref(), config)?);

    apply_facets(&mut params, &request.facet_requests);

    if let Some(highlight) = &request.highlight {
        apply_highlight(&mut params, highlight);
    }

    let field_list = build_field_list(request.field_list.as_ref(), &config.collection);
    params.set("fl", field_list.fl.as_str());

    // Passthrough params append last and never replace structured keys.
    for (key, value) in &request.additional_params {
        params.append(key.as_ref(), value.as_ref());
    }

    let collection = CollectionName::parse(&config.collection.collection_name)
        .map_err(|error| ErrorEnvelope::invariant(
            ErrorCode::failed_precondition(),
            format!("configured collection name became invalid: {error}"),
        ))?;

    Ok(PlannedQuery {
        query: SolrQueryData { collection, params },
        field_list,
    })
}

/// Expand the legacy `boostWithSemantic` flag into the composite form: the
/// keyword strategy stays, and an implicit unboosted semantic strategy over
/// all configured vector fields is appended.
fn expand_legacy_strategies(strategies: &[SearchStrategy]) -> Vec<SearchStrategy> {
    let mut expanded: Vec<SearchStrategy> = strategies.to_vec();
    for strategy in strategies {
        if let StrategyKind::Keyword(options) = &strategy.kind
            && options.boost_with_semantic
        {
            expanded.push(SearchStrategy::semantic(SemanticOptions::default(), 0.0));
        }
    }
    expanded
}

fn semantic_has_pre_filter(options: &SemanticOptions) -> bool {
    options
        .similarity
        .as_ref()
        .is_some_and(|similarity| !similarity.pre_filter.is_empty())
}

fn sort_clause(sort: Option<&SortOptions>, config: &GatewayConfig) -> Result<String> {
    let Some(sort) = sort else {
        return Ok(config.collection.default_sort.clone());
    };
    match sort.sort_type {
        SortType::Score => Ok(format!("score {}", sort.sort_order.as_solr())),
        SortType::Field => {
            let Some(field) = sort.sort_field.as_deref().map(str::trim).filter(|f| !f.is_empty())
            else {
                return Err(ErrorEnvelope::expected(
                    ErrorCode::invalid_input(),
                    "sortField is required when sortType is FIELD",
                ));
            };
            Ok(format!("{field} {}", sort.sort_order.as_solr()))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use searchgate_config::{VectorFieldKind, VectorFieldSpec};
    use searchgate_domain::{
        FacetRequest, FieldFacet, HighlightOptions, KeywordOptions, PreFilterClause, RangeFacet,
        SearchStrategyOptions, SimilarityOptions, SortOrder, StrategyOperator, VectorFieldName,
    };
    use searchgate_ports::{BoxFuture, EmbedRequest, EmbeddingProviderInfo, EmbeddingVector};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TestEmbedding {
        provider: EmbeddingProviderInfo,
        vector: Vec<f32>,
        calls: Arc<AtomicUsize>,
    }

    impl TestEmbedding {
        fn new(vector: Vec<f32>) -> Self {
            Self {
                provider: EmbeddingProviderInfo {
                    id: "test".into(),
                    name: "test".into(),
                },
                vector,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl EmbeddingPort for TestEmbedding {
        fn provider(&self) -> &EmbeddingProviderInfo {
            &self.provider
        }

        fn embed(
            &self,
            _ctx: &RequestContext,
            _request: EmbedRequest,
        ) -> BoxFuture<'_, Result<EmbeddingVector>> {
            let vector = self.vector.clone();
            let calls = Arc::clone(&self.calls);
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(EmbeddingVector::from_vec(vector))
            })
        }
    }

    fn gateway_config() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.collection.collection_name = "documents".to_string();
        config.collection.keyword_query_fields = vec!["title".to_string(), "body".to_string()];
        config.collection.default_rows = 10;
        config.collection.vector_fields.insert(
            "title_vec".to_string(),
            VectorFieldSpec {
                solr_field_name: "title-vector".to_string(),
                kind: VectorFieldKind::Inline,
                default_top_k: 30,
                chunk_collection: None,
                parent_filter: None,
                embedding_source: "default".to_string(),
            },
        );
        config.collection.vector_fields.insert(
            "body_vec".to_string(),
            VectorFieldSpec {
                solr_field_name: "body-vector".to_string(),
                kind: VectorFieldKind::Inline,
                default_top_k: 40,
                chunk_collection: None,
                parent_filter: None,
                embedding_source: "default".to_string(),
            },
        );
        config
    }

    fn keyword_request(query: &str) -> SearchRequest {
        let mut request = SearchRequest::with_query(query);
        request.strategy = SearchStrategyOptions {
            operator: StrategyOperator::Or,
            strategies: vec![SearchStrategy::keyword(KeywordOptions::default(), 0.0)],
        };
        request
    }

    fn semantic_request(query: &str, fields: &[&str]) -> SearchRequest {
        let mut request = SearchRequest::with_query(query);
        request.strategy = SearchStrategyOptions {
            operator: StrategyOperator::Or,
            strategies: vec![SearchStrategy::semantic(
                SemanticOptions {
                    vector_fields: fields
                        .iter()
                        .filter_map(|name| VectorFieldName::parse(name).ok())
                        .collect(),
                    ..SemanticOptions::default()
                },
                0.0,
            )],
        };
        request
    }

    // Scenario: pure keyword search over the configured fields.
    #[tokio::test]
    async fn pure_keyword_plan() -> Result<()> {
        let config = gateway_config();
        let embedding = TestEmbedding::new(vec![0.0]);
        let ctx = RequestContext::for_search();

        let planned = plan_query(&ctx, &config, &embedding, &keyword_request("hello world")).await?;
        let params = &planned.query.params;

        assert_eq!(
            params.get_first("q"),
            Some("{!edismax q.op=OR qf=\"title body\" v=$keywordQuery_1}")
        );
        assert_eq!(params.get_first("keywordQuery_1"), Some("hello\\ world"));
        assert_eq!(params.get_first("start"), Some("0"));
        assert_eq!(params.get_first("rows"), Some("10"));
        assert_eq!(params.get_first("sort"), Some("score desc"));
        assert_eq!(params.get_first("fl"), Some("*,score"));
        assert_eq!(embedding.calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    // Scenario: pure semantic search against one INLINE field.
    #[tokio::test]
    async fn pure_semantic_plan() -> Result<()> {
        let config = gateway_config();
        let embedding = TestEmbedding::new(vec![0.1, 0.2, 0.3]);
        let ctx = RequestContext::for_search();

        let planned =
            plan_query(&ctx, &config, &embedding, &semantic_request("q", &["title_vec"])).await?;
        let params = &planned.query.params;

        assert_eq!(
            params.get_first("q"),
            Some("{!knn f=title-vector topK=30 v=$vectorQuery_1}")
        );
        assert_eq!(
            params.get_first("vectorQuery_1"),
            Some("[0.100000,0.200000,0.300000]")
        );
        Ok(())
    }

    // Scenario: hybrid AND with per-strategy boosts; the two vector fields
    // share one embedding lookup.
    #[tokio::test]
    async fn hybrid_and_with_boosts() -> Result<()> {
        let config = gateway_config();
        let embedding = TestEmbedding::new(vec![0.5]);
        let ctx = RequestContext::for_search();

        let mut request = SearchRequest::with_query("hello");
        request.strategy = SearchStrategyOptions {
            operator: StrategyOperator::And,
            strategies: vec![
                SearchStrategy::keyword(KeywordOptions::default(), 1.5),
                SearchStrategy::semantic(
                    SemanticOptions {
                        vector_fields: vec![
                            VectorFieldName::parse("title_vec").map_err(ErrorEnvelope::from)?,
                            VectorFieldName::parse("body_vec").map_err(ErrorEnvelope::from)?,
                        ],
                        ..SemanticOptions::default()
                    },
                    1.2,
                ),
            ],
        };

        let planned = plan_query(&ctx, &config, &embedding, &request).await?;
        let params = &planned.query.params;

        assert_eq!(
            params.get_first("q"),
            Some(
                "scale({!edismax q.op=OR qf=\"title body\" v=$keywordQuery_1},0,1)^1.50 AND \
                 (scale({!knn f=title-vector topK=30 v=$vectorQuery_2},0,1)^1.20 OR \
                 scale({!knn f=body-vector topK=40 v=$vectorQuery_2},0,1)^1.20)"
            )
        );
        assert_eq!(embedding.calls.load(Ordering::SeqCst), 1);
        assert!(params.contains_key("keywordQuery_1"));
        assert!(params.contains_key("vectorQuery_2"));
        Ok(())
    }

    // Scenario: similarity options plus a pre-filter binding; the main fq
    // list stays untouched.
    #[tokio::test]
    async fn similarity_with_pre_filter() -> Result<()> {
        let config = gateway_config();
        let embedding = TestEmbedding::new(vec![0.5]);
        let ctx = RequestContext::for_search();

        let mut request = SearchRequest::with_query("q");
        request.filter_queries = vec!["lang:en".into()];
        request.strategy = SearchStrategyOptions {
            operator: StrategyOperator::Or,
            strategies: vec![SearchStrategy::semantic(
                SemanticOptions {
                    vector_fields: vec![
                        VectorFieldName::parse("title_vec").map_err(ErrorEnvelope::from)?,
                    ],
                    similarity: Some(SimilarityOptions {
                        min_return: Some(0.7),
                        min_traverse: Some(0.5),
                        pre_filter: vec![PreFilterClause {
                            field: "type".into(),
                            value: "article".into(),
                        }],
                    }),
                    ..SemanticOptions::default()
                },
                0.0,
            )],
        };

        let planned = plan_query(&ctx, &config, &embedding, &request).await?;
        let params = &planned.query.params;

        let q = params.get_first("q").unwrap_or_default();
        assert!(q.contains("{!vectorSimilarity f=title-vector"));
        assert!(q.contains("minReturn=0.7 minTraverse=0.5"));
        assert!(q.contains("preFilter=$knnPreFilter"));
        assert_eq!(params.get_first("knnPreFilter"), Some("type:article"));

        let filters: Vec<&str> = params.values("fq").collect();
        assert_eq!(filters, vec!["lang:en"]);
        Ok(())
    }

    // Scenario: facets and highlighting together.
    #[tokio::test]
    async fn facets_and_highlighting() -> Result<()> {
        let config = gateway_config();
        let embedding = TestEmbedding::new(vec![0.0]);
        let ctx = RequestContext::for_search();

        let mut request = keyword_request("hello");
        request.facet_requests = vec![
            FacetRequest::Field(FieldFacet {
                field: "category".into(),
                limit: Some(5),
                ..FieldFacet::default()
            }),
            FacetRequest::Range(RangeFacet {
                field: "price".into(),
                start: "0".into(),
                end: "100".into(),
                gap: "10".into(),
                hardend: None,
                other: None,
            }),
        ];
        request.highlight = Some(HighlightOptions {
            fields: vec!["title".into()],
            pre_tag: Some("<b>".into()),
            post_tag: Some("</b>".into()),
            ..HighlightOptions::default()
        });

        let planned = plan_query(&ctx, &config, &embedding, &request).await?;
        let params = &planned.query.params;

        assert_eq!(params.get_first("facet"), Some("true"));
        assert_eq!(params.get_first("facet.field"), Some("category"));
        assert_eq!(params.get_first("f.category.facet.limit"), Some("5"));
        assert_eq!(params.get_first("facet.range"), Some("price"));
        assert_eq!(params.get_first("f.price.facet.range.start"), Some("0"));
        assert_eq!(params.get_first("f.price.facet.range.end"), Some("100"));
        assert_eq!(params.get_first("f.price.facet.range.gap"), Some("10"));
        assert_eq!(params.get_first("hl"), Some("true"));
        assert_eq!(params.get_first("hl.fl"), Some("title"));
        assert_eq!(params.get_first("hl.simple.pre"), Some("<b>"));
        assert_eq!(params.get_first("hl.simple.post"), Some("</b>"));
        assert_eq!(params.get_first("hl.snippets"), Some("1"));
        assert_eq!(params.get_first("hl.fragsize"), Some("100"));
        Ok(())
    }

    // Scenario: unknown vector field is a user error surfaced before any
    // backend is touched.
    #[tokio::test]
    async fn unknown_vector_field_is_invalid_argument() {
        let config = gateway_config();
        let embedding = TestEmbedding::new(vec![0.0]);
        let ctx = RequestContext::for_search();

        let request = semantic_request("q", &["does_not_exist"]);
        let error = plan_query(&ctx, &config, &embedding, &request).await.err();

        assert!(matches!(
            error,
            Some(error) if error.code == ErrorCode::invalid_input()
        ));
        assert_eq!(embedding.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_strategies_are_rejected() {
        let config = gateway_config();
        let embedding = TestEmbedding::new(vec![0.0]);
        let ctx = RequestContext::for_search();

        let request = SearchRequest::with_query("hello");
        let error = plan_query(&ctx, &config, &embedding, &request).await.err();
        assert!(matches!(
            error,
            Some(error) if error.code == ErrorCode::invalid_input()
        ));
    }

    #[tokio::test]
    async fn legacy_boost_with_semantic_appends_implicit_strategy() -> Result<()> {
        let config = gateway_config();
        let embedding = TestEmbedding::new(vec![0.5]);
        let ctx = RequestContext::for_search();

        let mut request = SearchRequest::with_query("hello");
        request.strategy = SearchStrategyOptions {
            operator: StrategyOperator::Or,
            strategies: vec![SearchStrategy::keyword(
                KeywordOptions {
                    boost_with_semantic: true,
                    ..KeywordOptions::default()
                },
                0.0,
            )],
        };

        let planned = plan_query(&ctx, &config, &embedding, &request).await?;
        let q = planned.query.params.get_first("q").unwrap_or_default();

        // Keyword fragment first, implicit semantic over both fields after.
        assert!(q.starts_with("{!edismax"));
        assert!(q.contains(" OR ("));
        assert!(q.contains("f=body-vector"));
        assert!(q.contains("f=title-vector"));
        assert!(planned.query.params.contains_key("vectorQuery_2"));
        assert_eq!(embedding.calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn explicit_field_sort_and_paging() -> Result<()> {
        let config = gateway_config();
        let embedding = TestEmbedding::new(vec![0.0]);
        let ctx = RequestContext::for_search();

        let mut request = keyword_request("hello");
        request.start = Some(20);
        request.num_results = Some(5);
        request.sort = Some(SortOptions {
            sort_type: SortType::Field,
            sort_field: Some("published_at".into()),
            sort_order: SortOrder::Asc,
        });

        let planned = plan_query(&ctx, &config, &embedding, &request).await?;
        let params = &planned.query.params;
        assert_eq!(params.get_first("start"), Some("20"));
        assert_eq!(params.get_first("rows"), Some("5"));
        assert_eq!(params.get_first("sort"), Some("published_at asc"));
        Ok(())
    }

    #[tokio::test]
    async fn additional_params_append_without_replacing() -> Result<()> {
        let config = gateway_config();
        let embedding = TestEmbedding::new(vec![0.0]);
        let ctx = RequestContext::for_search();

        let mut request = keyword_request("hello");
        request.filter_queries = vec!["lang:en".into()];
        request.additional_params = vec![
            ("fq".into(), "site:docs".into()),
            ("debugQuery".into(), "true".into()),
        ];

        let planned = plan_query(&ctx, &config, &embedding, &request).await?;
        let params = &planned.query.params;

        let filters: Vec<&str> = params.values("fq").collect();
        assert_eq!(filters, vec!["lang:en", "site:docs"]);
        assert_eq!(params.get_first("debugQuery"), Some("true"));
        Ok(())
    }

    #[tokio::test]
    async fn planning_is_deterministic() -> Result<()> {
        let config = gateway_config();
        let embedding = TestEmbedding::new(vec![0.25, 0.75]);
        let ctx = RequestContext::for_search();

        let mut request = semantic_request("determinism", &[]);
        request.facet_requests = vec![FacetRequest::Field(FieldFacet {
            field: "category".into(),
            ..FieldFacet::default()
        })];

        let first = plan_query(&ctx, &config, &embedding, &request).await?;
        let second = plan_query(&ctx, &config, &embedding, &request).await?;

        let first_pairs: Vec<(String, String)> = first
            .query
            .params
            .pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let second_pairs: Vec<(String, String)> = second
            .query
            .params
            .pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(first_pairs, second_pairs);
        Ok(())
    }
}
