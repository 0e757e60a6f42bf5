//! Solr error mapping helpers.

use searchgate_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use serde::Deserialize;

/// Context payload attached to Solr error envelopes.
#[derive(Debug, Clone)]
pub struct SolrErrorContext {
    /// Operation label for tracing failures.
    pub operation: &'static str,
    /// Collection name of the failing request.
    pub collection: Option<String>,
    /// Endpoint path, when available.
    pub endpoint: Option<String>,
}

impl SolrErrorContext {
    fn attach(&self, mut envelope: ErrorEnvelope) -> ErrorEnvelope {
        envelope = envelope.with_metadata("operation", self.operation);
        if let Some(collection) = self.collection.as_ref() {
            envelope = envelope.with_metadata("collection", collection.to_owned());
        }
        if let Some(endpoint) = self.endpoint.as_ref() {
            envelope = envelope.with_metadata("endpoint", endpoint.to_owned());
        }
        envelope
    }
}

#[derive(Debug, Deserialize)]
struct SolrErrorBody {
    error: Option<SolrErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct SolrErrorDetail {
    msg: Option<String>,
}

/// Maps reqwest transport errors into shared error envelopes.
pub fn map_solr_transport_error(error: &reqwest::Error, ctx: &SolrErrorContext) -> ErrorEnvelope {
    if error.is_timeout() {
        return ctx.attach(ErrorEnvelope::unexpected(
            ErrorCode::timeout(),
            "Solr request timed out",
            ErrorClass::Retriable,
        ));
    }
    if error.is_connect() {
        return ctx.attach(ErrorEnvelope::unexpected(
            ErrorCode::dependency_unavailable(),
            format!("Solr connection failed: {error}"),
            ErrorClass::Retriable,
        ));
    }
    ctx.attach(ErrorEnvelope::unexpected(
        ErrorCode::new("solr", "request_failed"),
        format!("Solr request failed: {error}"),
        ErrorClass::NonRetriable,
    ))
}

/// Maps Solr HTTP status codes and error payloads into shared envelopes.
pub fn map_solr_http_error(status: u16, payload: &[u8], ctx: &SolrErrorContext) -> ErrorEnvelope {
    let message = serde_json::from_slice::<SolrErrorBody>(payload)
        .ok()
        .and_then(|body| body.error)
        .and_then(|detail| detail.msg)
        .unwrap_or_else(|| format!("Solr request failed with HTTP {status}"));

    let envelope = match status {
        // Solr signals rejected queries (unknown fields, bad syntax) as 400.
        400 => ErrorEnvelope::expected(ErrorCode::invalid_input(), message),
        401 | 403 => ErrorEnvelope::expected(ErrorCode::permission_denied(), message),
        404 => ErrorEnvelope::expected(ErrorCode::not_found(), message),
        408 | 504 => {
            ErrorEnvelope::unexpected(ErrorCode::timeout(), message, ErrorClass::Retriable)
        },
        _ if status >= 500 => ErrorEnvelope::unexpected(
            ErrorCode::dependency_unavailable(),
            message,
            ErrorClass::Retriable,
        ),
        _ => ErrorEnvelope::unexpected(
            ErrorCode::new("solr", "http_error"),
            message,
            ErrorClass::NonRetriable,
        ),
    };

    ctx.attach(envelope).with_metadata("status", status.to_string())
}
