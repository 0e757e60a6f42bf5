//! Search use-case: plan → Solr → map.

use crate::plan::plan_query;
use crate::response::map_response;
use searchgate_config::GatewayConfig;
use searchgate_domain::{SearchRequest, SearchResponse};
use searchgate_ports::{EmbeddingPort, LogFields, LoggerPort, SolrPort};
use searchgate_shared::{ErrorEnvelope, RequestContext, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Dependencies required by the search use-case.
#[derive(Clone)]
pub struct SearchDeps {
    /// Embedding adapter (normally the caching wrapper).
    pub embedding: Arc<dyn EmbeddingPort>,
    /// Solr adapter.
    pub solr: Arc<dyn SolrPort>,
    /// Optional logger.
    pub logger: Option<Arc<dyn LoggerPort>>,
}

/// Execute one search request.
///
/// No retries happen here; a failed embedding or Solr call fails the whole
/// search and the error propagates unchanged.
pub async fn search(
    ctx: &RequestContext,
    deps: &SearchDeps,
    config: &GatewayConfig,
    request: SearchRequest,
) -> Result<SearchResponse> {
    let started_at = Instant::now();

    if let Some(logger) = deps.logger.as_ref() {
        logger.info(
            "search.start",
            "Search started",
            Some(log_fields_start(ctx, &request)),
        );
    }

    let result = run_search(ctx, deps, config, &request).await;

    match result {
        Ok(response) => {
            if let Some(logger) = deps.logger.as_ref() {
                logger.info(
                    "search.completed",
                    "Search completed",
                    Some(log_fields_completed(ctx, &response, started_at)),
                );
            }
            Ok(response)
        },
        Err(error) => {
            let duration_ms = duration_ms(started_at);
            if error.is_cancelled() {
                if let Some(logger) = deps.logger.as_ref() {
                    logger.info(
                        "search.aborted",
                        "Search aborted",
                        Some(log_fields_duration(ctx, duration_ms)),
                    );
                }
            } else if let Some(logger) = deps.logger.as_ref() {
                logger.error(
                    "search.failed",
                    "Search failed",
                    Some(log_fields_error(ctx, duration_ms, &error)),
                );
            }
            Err(error)
        },
    }
}

async fn run_search(
    ctx: &RequestContext,
    deps: &SearchDeps,
    config: &GatewayConfig,
    request: &SearchRequest,
) -> Result<SearchResponse> {
    ctx.ensure_not_cancelled("search.plan")?;
    let planned = plan_query(ctx, config, deps.embedding.as_ref(), request).await?;

    if let Some(logger) = deps.logger.as_ref() {
        for conflict in &planned.field_list.conflicts {
            let mut fields = LogFields::new();
            fields.insert("field".into(), Value::String(conflict.to_string()));
            logger.warn(
                "search.field_list.conflict",
                "Field requested for both inclusion and exclusion; excluding",
                Some(fields),
            );
        }
    }

    ctx.ensure_not_cancelled("search.solr")?;
    let solr_response = deps.solr.select(ctx, planned.query).await?;

    Ok(map_response(
        request,
        &planned.field_list,
        solr_response,
        deps.logger.as_deref(),
    ))
}

fn duration_ms(started_at: Instant) -> u64 {
    u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn log_fields_start(ctx: &RequestContext, request: &SearchRequest) -> LogFields {
    let mut fields = LogFields::new();
    fields.insert(
        "correlationId".into(),
        Value::String(ctx.correlation_id().to_string()),
    );
    fields.insert("queryLength".into(), Value::from(request.query.len()));
    fields.insert(
        "strategies".into(),
        Value::from(request.strategy.strategies.len()),
    );
    fields.insert(
        "facetRequests".into(),
        Value::from(request.facet_requests.len()),
    );
    fields
}

fn log_fields_duration(ctx: &RequestContext, duration_ms: u64) -> LogFields {
    let mut fields = LogFields::new();
    fields.insert(
        "correlationId".into(),
        Value::String(ctx.correlation_id().to_string()),
    );
    fields.insert("durationMs".into(), Value::from(duration_ms));
    fields
}

fn log_fields_completed(
    ctx: &RequestContext,
    response: &SearchResponse,
    started_at: Instant,
) -> LogFields {
    let mut fields = log_fields_duration(ctx, duration_ms(started_at));
    fields.insert("results".into(), Value::from(response.results.len()));
    fields.insert("totalResults".into(), Value::from(response.total_results));
    fields.insert("qTimeMs".into(), Value::from(response.q_time_ms));
    fields
}

fn log_fields_error(ctx: &RequestContext, duration_ms: u64, error: &ErrorEnvelope) -> LogFields {
    let mut fields = log_fields_duration(ctx, duration_ms);
    fields.insert("error".into(), Value::String(error.to_string()));
    fields
}
