//! API v1 DTO mapping helpers.

use crate::v1::{
    ApiV1ErrorCode, ApiV1ErrorDto, ApiV1ErrorKind, ApiV1ErrorMeta, ApiV1FacetCountDto,
    ApiV1FacetRequestDto, ApiV1FacetResultsDto, ApiV1Operator, ApiV1Result,
    ApiV1SearchRequestDto, ApiV1SearchResponseDto, ApiV1SearchResultDto, ApiV1SearchStrategyDto,
    ApiV1SortOrder, ApiV1SortType, ApiV1StrategyType, validate_search_request,
};
use searchgate_domain::{
    FacetRequest, FieldFacet, FieldListOptions, HighlightOptions, KeywordOperator,
    KeywordOptions, PreFilterClause, QueryFacet, RangeFacet, SearchRequest, SearchResponse,
    SearchStrategy, SearchStrategyOptions, SemanticOptions, SimilarityOptions, SortOptions,
    SortOrder, SortType, StrategyKind, StrategyOperator, VectorFieldName,
};
use searchgate_shared::{ErrorCode, ErrorEnvelope, ErrorKind, Result};

const API_V1_REDACTED: &str = "[REDACTED]";
const API_V1_REDACTED_PREFIX: &str = "[REDACTED,len=";

/// Convert a shared `ErrorCode` into an API v1 error code string.
#[must_use]
pub fn error_code_to_api_v1(code: &ErrorCode) -> ApiV1ErrorCode {
    let namespace = sanitize_code_segment(code.namespace());
    let detail = sanitize_code_segment(code.code());
    format!("ERR_{namespace}_{detail}")
}

/// Map an `ErrorEnvelope` into an API v1 error DTO.
#[must_use]
pub fn error_envelope_to_api_v1_error(
    envelope: &ErrorEnvelope,
    extra_meta: Option<ApiV1ErrorMeta>,
) -> ApiV1ErrorDto {
    let mut merged = ApiV1ErrorMeta::new();
    for (key, value) in &envelope.metadata {
        merged.insert(key.clone(), value.clone());
    }
    if let Some(extra) = extra_meta {
        for (key, value) in extra {
            merged.insert(key, value);
        }
    }
    let meta = if merged.is_empty() {
        None
    } else {
        Some(redact_api_v1_meta(&merged))
    };

    ApiV1ErrorDto {
        code: error_code_to_api_v1(&envelope.code),
        message: envelope.message.clone(),
        kind: map_error_kind(envelope.kind),
        meta,
    }
}

/// Map a shared result into an API v1 result wrapper.
#[must_use]
pub fn result_to_api_v1_result<T>(
    result: Result<T>,
    extra_meta: Option<ApiV1ErrorMeta>,
) -> ApiV1Result<T> {
    match result {
        Ok(data) => ApiV1Result::ok(data),
        Err(error) => ApiV1Result::err(error_envelope_to_api_v1_error(&error, extra_meta)),
    }
}

/// Map an API v1 search request into the domain model.
///
/// Shape validation runs first; any failure maps to an `invalid_input`
/// envelope naming the offending field.
pub fn search_request_from_api_v1(dto: &ApiV1SearchRequestDto) -> Result<SearchRequest> {
    validate_search_request(dto).map_err(|issue| {
        ErrorEnvelope::expected(ErrorCode::invalid_input(), issue.message.to_string())
            .with_metadata("field", issue.field)
    })?;

    let mut strategies = Vec::with_capacity(dto.strategy.strategies.len());
    for strategy in &dto.strategy.strategies {
        strategies.push(map_strategy(strategy)?);
    }

    Ok(SearchRequest {
        query: dto.query.clone().into_boxed_str(),
        start: dto.start,
        num_results: dto.num_results,
        filter_queries: dto
            .filter_queries
            .iter()
            .map(|fq| fq.clone().into_boxed_str())
            .collect(),
        sort: dto.sort.as_ref().map(|sort| SortOptions {
            sort_type: match sort.sort_type {
                ApiV1SortType::Score => SortType::Score,
                ApiV1SortType::Field => SortType::Field,
            },
            sort_field: sort.sort_field.as_deref().map(Box::from),
            sort_order: match sort.sort_order {
                ApiV1SortOrder::Asc => SortOrder::Asc,
                ApiV1SortOrder::Desc => SortOrder::Desc,
            },
        }),
        facet_requests: dto.facet_requests.iter().filter_map(map_facet).collect(),
        highlight: dto.highlight_options.as_ref().map(|hl| HighlightOptions {
            fields: hl.fields.iter().map(|f| f.clone().into_boxed_str()).collect(),
            pre_tag: hl.pre_tag.as_deref().map(Box::from),
            post_tag: hl.post_tag.as_deref().map(Box::from),
            snippet_count: hl.snippet_count,
            snippet_size: hl.snippet_size,
            semantic_highlight: hl.semantic_highlight,
        }),
        field_list: dto.field_list.as_ref().map(|fl| FieldListOptions {
            inclusion_fields: fl
                .inclusion_fields
                .iter()
                .map(|f| f.clone().into_boxed_str())
                .collect(),
            exclusion_fields: fl
                .exclusion_fields
                .iter()
                .map(|f| f.clone().into_boxed_str())
                .collect(),
        }),
        additional_params: dto
            .additional_params
            .iter()
            .map(|p| (Box::from(p.key.as_str()), Box::from(p.value.as_str())))
            .collect(),
        strategy: SearchStrategyOptions {
            operator: match dto.strategy.operator {
                ApiV1Operator::Or => StrategyOperator::Or,
                ApiV1Operator::And => StrategyOperator::And,
            },
            strategies,
        },
    })
}

/// Map a domain search response into the API v1 DTO.
#[must_use]
pub fn search_response_to_api_v1(response: &SearchResponse) -> ApiV1SearchResponseDto {
    ApiV1SearchResponseDto {
        results: response
            .results
            .iter()
            .map(|result| ApiV1SearchResultDto {
                id: result.id.to_string(),
                fields: result
                    .fields
                    .iter()
                    .map(|(key, value)| (key.to_string(), value.clone()))
                    .collect(),
                snippet: result.snippet.to_string(),
                matched_text: result
                    .matched_text
                    .iter()
                    .map(|fragment| fragment.to_string())
                    .collect(),
            })
            .collect(),
        facets: response
            .facets
            .iter()
            .map(|(name, facet)| {
                (
                    name.to_string(),
                    ApiV1FacetResultsDto {
                        counts: facet
                            .counts
                            .iter()
                            .map(|count| ApiV1FacetCountDto {
                                value: count.value.to_string(),
                                count: count.count,
                            })
                            .collect(),
                    },
                )
            })
            .collect(),
        total_results: response.total_results,
        q_time: response.q_time_ms,
        time_of_search: response.time_of_search_ms,
    }
}

fn map_strategy(dto: &ApiV1SearchStrategyDto) -> Result<SearchStrategy> {
    let kind = match dto.strategy_type {
        ApiV1StrategyType::Keyword => {
            let options = dto.keyword.clone().unwrap_or_default();
            StrategyKind::Keyword(KeywordOptions {
                query_text_override: options.query_text_override.map(String::into_boxed_str),
                override_fields_to_query: options
                    .override_fields_to_query
                    .into_iter()
                    .map(String::into_boxed_str)
                    .collect(),
                keyword_logical_operator: match options.keyword_logical_operator {
                    Some(ApiV1Operator::And) => KeywordOperator::And,
                    Some(ApiV1Operator::Or) | None => KeywordOperator::Or,
                },
                boost_with_semantic: options.boost_with_semantic,
            })
        },
        ApiV1StrategyType::Semantic => {
            let options = dto.semantic.clone().unwrap_or_default();
            let mut vector_fields = Vec::with_capacity(options.vector_fields.len());
            for name in &options.vector_fields {
                vector_fields.push(VectorFieldName::parse(name).map_err(ErrorEnvelope::from)?);
            }
            StrategyKind::Semantic(SemanticOptions {
                top_k: options.top_k,
                vector_fields,
                similarity: options.similarity.map(|similarity| SimilarityOptions {
                    min_return: similarity.min_return,
                    min_traverse: similarity.min_traverse,
                    pre_filter: similarity
                        .pre_filter
                        .into_iter()
                        .map(|clause| PreFilterClause {
                            field: clause.field.into_boxed_str(),
                            value: clause.value.into_boxed_str(),
                        })
                        .collect(),
                }),
                include_tags: options
                    .include_tags
                    .into_iter()
                    .map(String::into_boxed_str)
                    .collect(),
                exclude_tags: options
                    .exclude_tags
                    .into_iter()
                    .map(String::into_boxed_str)
                    .collect(),
            })
        },
    };

    Ok(SearchStrategy {
        kind,
        boost: dto.boost,
    })
}

fn map_facet(dto: &ApiV1FacetRequestDto) -> Option<FacetRequest> {
    if let Some(field) = &dto.facet_field {
        return Some(FacetRequest::Field(FieldFacet {
            field: Box::from(field.field.as_str()),
            limit: field.limit,
            missing: field.missing,
            prefix: field.prefix.as_deref().map(Box::from),
        }));
    }
    if let Some(range) = &dto.facet_range {
        return Some(FacetRequest::Range(RangeFacet {
            field: Box::from(range.field.as_str()),
            start: Box::from(range.start.as_str()),
            end: Box::from(range.end.as_str()),
            gap: Box::from(range.gap.as_str()),
            hardend: range.hardend,
            other: range.other.as_deref().map(Box::from),
        }));
    }
    dto.facet_query.as_ref().map(|query| {
        FacetRequest::Query(QueryFacet {
            query: Box::from(query.query.as_str()),
        })
    })
}

const fn map_error_kind(kind: ErrorKind) -> ApiV1ErrorKind {
    match kind {
        ErrorKind::Expected | ErrorKind::Unexpected => ApiV1ErrorKind::Expected,
        ErrorKind::Invariant => ApiV1ErrorKind::Invariant,
    }
}

fn sanitize_code_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn redact_api_v1_meta(meta: &ApiV1ErrorMeta) -> ApiV1ErrorMeta {
    let mut redacted = ApiV1ErrorMeta::new();
    for (key, value) in meta {
        let redacted_value = if searchgate_shared::is_secret_key(key) {
            API_V1_REDACTED.to_string()
        } else if is_query_key(key) {
            format!("{API_V1_REDACTED_PREFIX}{}]", value.len())
        } else {
            value.clone()
        };
        redacted.insert(key.clone(), redacted_value);
    }
    redacted
}

fn is_query_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key == "query" || key.ends_with("query") || key == "content"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::v1::{ApiV1SemanticOptionsDto, ApiV1StrategyOptionsDto};
    use searchgate_shared::ErrorClass;
    use std::collections::BTreeMap;

    #[test]
    fn mapping_redacts_sensitive_metadata() {
        let envelope = ErrorEnvelope::expected(ErrorCode::invalid_input(), "bad input")
            .with_metadata("token", "secret-token")
            .with_metadata("query", "hello world")
            .with_metadata("field", "query");

        let dto = error_envelope_to_api_v1_error(&envelope, None);
        let Some(meta) = dto.meta else {
            panic!("meta should be present");
        };
        assert_eq!(dto.code, "ERR_CORE_INVALID_INPUT");
        assert_eq!(dto.kind, ApiV1ErrorKind::Expected);
        assert_eq!(meta.get("token").map(String::as_str), Some("[REDACTED]"));
        assert_eq!(
            meta.get("query").map(String::as_str),
            Some("[REDACTED,len=11]")
        );
        assert_eq!(meta.get("field").map(String::as_str), Some("query"));
    }

    #[test]
    fn unexpected_errors_map_to_expected_kind() {
        let envelope = ErrorEnvelope::unexpected(
            ErrorCode::dependency_unavailable(),
            "solr down",
            ErrorClass::Retriable,
        );
        let dto = error_envelope_to_api_v1_error(&envelope, None);
        assert_eq!(dto.kind, ApiV1ErrorKind::Expected);
        assert_eq!(dto.code, "ERR_CORE_DEPENDENCY_UNAVAILABLE");
    }

    #[test]
    fn result_mapping_preserves_ok_and_err() {
        let ok_result: Result<u32> = Ok(10);
        let mapped = result_to_api_v1_result(ok_result, None);
        assert!(matches!(mapped, ApiV1Result::Ok { ok: true, .. }));

        let mut extra = BTreeMap::new();
        extra.insert("requestId".to_string(), "req_1".to_string());
        let err_result: Result<u32> = Err(ErrorEnvelope::expected(
            ErrorCode::invalid_input(),
            "bad input",
        ));
        let mapped = result_to_api_v1_result(err_result, Some(extra));
        assert!(matches!(mapped, ApiV1Result::Err { ok: false, .. }));
    }

    #[test]
    fn request_maps_semantic_fields_into_domain_names() {
        let dto = ApiV1SearchRequestDto {
            query: "hello".to_string(),
            strategy: ApiV1StrategyOptionsDto {
                strategies: vec![ApiV1SearchStrategyDto {
                    strategy_type: ApiV1StrategyType::Semantic,
                    keyword: None,
                    semantic: Some(ApiV1SemanticOptionsDto {
                        vector_fields: vec!["title_vec".to_string()],
                        ..ApiV1SemanticOptionsDto::default()
                    }),
                    boost: 1.2,
                }],
                ..ApiV1StrategyOptionsDto::default()
            },
            ..ApiV1SearchRequestDto::default()
        };

        let request = search_request_from_api_v1(&dto);
        let Ok(request) = request else {
            panic!("mapping should succeed");
        };
        let StrategyKind::Semantic(options) = &request.strategy.strategies[0].kind else {
            panic!("expected semantic strategy");
        };
        assert_eq!(options.vector_fields.len(), 1);
        assert_eq!(options.vector_fields[0].as_str(), "title_vec");
    }

    #[test]
    fn request_mapping_rejects_invalid_shape() {
        let dto = ApiV1SearchRequestDto {
            query: "".to_string(),
            ..ApiV1SearchRequestDto::default()
        };
        let error = search_request_from_api_v1(&dto).err();
        assert!(matches!(
            error,
            Some(error) if error.code == ErrorCode::invalid_input()
        ));
    }

    #[test]
    fn response_maps_facets_and_results() {
        let mut response = SearchResponse::default();
        response.total_results = 3;
        response.q_time_ms = 9;
        response.results.push(searchgate_domain::SearchResult {
            id: "doc-1".into(),
            ..searchgate_domain::SearchResult::default()
        });
        response.facets.insert(
            "category".into(),
            searchgate_domain::FacetResults {
                counts: vec![searchgate_domain::FacetCount {
                    value: "news".into(),
                    count: 2,
                }],
            },
        );

        let dto = search_response_to_api_v1(&response);
        assert_eq!(dto.total_results, 3);
        assert_eq!(dto.q_time, 9);
        assert_eq!(dto.results[0].id, "doc-1");
        assert_eq!(dto.facets["category"].counts[0].count, 2);
    }
}
