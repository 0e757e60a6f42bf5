//! API v1 request validation (shape and limit checks only).
//!
//! Cross-field rules that need configuration (unknown vector fields,
//! similarity/tag conflicts) are enforced by the planner; this layer
//! rejects requests that are malformed regardless of configuration.

use crate::v1::{ApiV1SearchRequestDto, ApiV1SearchStrategyDto, ApiV1SortType, ApiV1StrategyType};
use std::fmt;

/// Validation failure details for API v1 DTOs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiV1ValidationIssue {
    /// Field name that failed validation.
    pub field: &'static str,
    /// Human-readable validation error message.
    pub message: Box<str>,
}

impl ApiV1ValidationIssue {
    fn new(field: &'static str, message: impl Into<Box<str>>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn empty(field: &'static str) -> Self {
        Self::new(field, "value must be non-empty")
    }

    fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::new(field, reason)
    }

    fn must_be_positive(field: &'static str) -> Self {
        Self::new(field, "value must be at least 1")
    }
}

impl fmt::Display for ApiV1ValidationIssue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ApiV1ValidationIssue {}

/// Validate a search request DTO before mapping it into the domain.
pub fn validate_search_request(dto: &ApiV1SearchRequestDto) -> Result<(), ApiV1ValidationIssue> {
    if dto.query.trim().is_empty() {
        return Err(ApiV1ValidationIssue::empty("query"));
    }

    if dto.strategy.strategies.is_empty() {
        return Err(ApiV1ValidationIssue::invalid(
            "strategy.strategies",
            "at least one strategy is required",
        ));
    }
    for strategy in &dto.strategy.strategies {
        validate_strategy(strategy)?;
    }

    if let Some(sort) = &dto.sort
        && sort.sort_type == ApiV1SortType::Field
        && sort.sort_field.as_deref().is_none_or(|f| f.trim().is_empty())
    {
        return Err(ApiV1ValidationIssue::invalid(
            "sort.sortField",
            "sortField is required when sortType is FIELD",
        ));
    }

    validate_facets(dto)?;

    if let Some(highlight) = &dto.highlight_options {
        if highlight.snippet_count == Some(0) {
            return Err(ApiV1ValidationIssue::must_be_positive(
                "highlightOptions.snippetCount",
            ));
        }
        if highlight.snippet_size == Some(0) {
            return Err(ApiV1ValidationIssue::must_be_positive(
                "highlightOptions.snippetSize",
            ));
        }
    }

    for param in &dto.additional_params {
        if param.key.trim().is_empty() {
            return Err(ApiV1ValidationIssue::empty("additionalParams.key"));
        }
    }

    Ok(())
}

fn validate_strategy(strategy: &ApiV1SearchStrategyDto) -> Result<(), ApiV1ValidationIssue> {
    if !strategy.boost.is_finite() || strategy.boost < 0.0 {
        return Err(ApiV1ValidationIssue::invalid(
            "strategy.strategies.boost",
            "boost must be a finite value >= 0",
        ));
    }

    match strategy.strategy_type {
        ApiV1StrategyType::Keyword => {
            if strategy.semantic.is_some() {
                return Err(ApiV1ValidationIssue::invalid(
                    "strategy.strategies.semantic",
                    "semantic options are not valid on a KEYWORD strategy",
                ));
            }
        },
        ApiV1StrategyType::Semantic => {
            if strategy.keyword.is_some() {
                return Err(ApiV1ValidationIssue::invalid(
                    "strategy.strategies.keyword",
                    "keyword options are not valid on a SEMANTIC strategy",
                ));
            }
            if let Some(semantic) = &strategy.semantic
                && semantic.top_k == Some(0)
            {
                return Err(ApiV1ValidationIssue::must_be_positive(
                    "strategy.strategies.semantic.topK",
                ));
            }
        },
    }

    Ok(())
}

fn validate_facets(dto: &ApiV1SearchRequestDto) -> Result<(), ApiV1ValidationIssue> {
    for facet in &dto.facet_requests {
        let set = usize::from(facet.facet_field.is_some())
            + usize::from(facet.facet_range.is_some())
            + usize::from(facet.facet_query.is_some());
        if set != 1 {
            return Err(ApiV1ValidationIssue::invalid(
                "facetRequests",
                "exactly one of facetField, facetRange, facetQuery must be set",
            ));
        }
        if let Some(field_facet) = &facet.facet_field
            && field_facet.field.trim().is_empty()
        {
            return Err(ApiV1ValidationIssue::empty("facetRequests.facetField.field"));
        }
        if let Some(range) = &facet.facet_range
            && (range.field.trim().is_empty()
                || range.start.trim().is_empty()
                || range.end.trim().is_empty()
                || range.gap.trim().is_empty())
        {
            return Err(ApiV1ValidationIssue::invalid(
                "facetRequests.facetRange",
                "field, start, end, and gap are all required",
            ));
        }
        if let Some(query) = &facet.facet_query
            && query.query.trim().is_empty()
        {
            return Err(ApiV1ValidationIssue::empty("facetRequests.facetQuery.query"));
        }
    }
    Ok(())
}
