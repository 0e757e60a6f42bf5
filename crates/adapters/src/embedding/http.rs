//! HTTP embedding adapter.

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use searchgate_config::EmbeddingServiceConfig;
use searchgate_ports::{
    BoxFuture, EmbedRequest, EmbeddingPort, EmbeddingProviderInfo, EmbeddingVector,
};
use searchgate_shared::{ErrorClass, ErrorCode, ErrorEnvelope, RequestContext, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const EMBED_PATH: &str = "/embed";

/// HTTP embedding adapter configuration.
#[derive(Debug, Clone)]
pub struct HttpEmbeddingConfig {
    /// Base URL of the embedding service.
    pub address: Box<str>,
    /// Optional model name forwarded to the service.
    pub model: Option<Box<str>>,
    /// Optional bearer token.
    pub api_key: Option<Box<str>>,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl HttpEmbeddingConfig {
    /// Build from the shared embedding service config.
    #[must_use]
    pub fn from_service_config(config: &EmbeddingServiceConfig) -> Self {
        Self {
            address: config.address.as_str().into(),
            model: config.model.as_deref().map(Box::from),
            api_key: config.api_key.as_deref().map(Box::from),
            timeout_ms: config.timeout_ms,
        }
    }
}

/// HTTP embedding adapter implementation.
pub struct HttpEmbedding {
    provider: EmbeddingProviderInfo,
    client: reqwest::Client,
    endpoint: Box<str>,
    model: Option<Box<str>>,
}

impl HttpEmbedding {
    /// Create a new HTTP embedding adapter.
    pub fn new(config: &HttpEmbeddingConfig) -> Result<Self> {
        let base_url = config.address.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ErrorEnvelope::expected(
                ErrorCode::invalid_input(),
                "embedding service address must be non-empty",
            ));
        }
        if config.timeout_ms == 0 {
            return Err(ErrorEnvelope::expected(
                ErrorCode::invalid_input(),
                "embedding timeout must be greater than zero",
            ));
        }

        let mut headers = HeaderMap::new();
        if let Some(api_key) = config.api_key.as_deref() {
            let value = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
                ErrorEnvelope::expected(
                    ErrorCode::invalid_input(),
                    "embedding api key contains invalid characters",
                )
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(|error| {
                ErrorEnvelope::unexpected(
                    ErrorCode::new("embedding", "client_init_failed"),
                    format!("failed to build embedding client: {error}"),
                    ErrorClass::NonRetriable,
                )
            })?;

        let provider = EmbeddingProviderInfo {
            id: "http".into(),
            name: "HTTP embedding service".into(),
        };
        let endpoint = format!("{base_url}{EMBED_PATH}").into_boxed_str();

        Ok(Self {
            provider,
            client,
            endpoint,
            model: config.model.clone(),
        })
    }

    async fn embed_text(&self, ctx: &RequestContext, text: Box<str>) -> Result<EmbeddingVector> {
        ctx.ensure_not_cancelled("embedding_http.embed")?;
        if text.is_empty() {
            return Err(ErrorEnvelope::expected(
                ErrorCode::invalid_input(),
                "embedding input must be non-empty",
            ));
        }

        let request = EmbedHttpRequest {
            input: vec![text],
            model: self.model.clone(),
        };
        let response = self.send_request(ctx, &request).await?;
        map_embeddings(response)
    }

    async fn send_request(
        &self,
        ctx: &RequestContext,
        request: &EmbedHttpRequest,
    ) -> Result<EmbedHttpResponse> {
        let response = tokio::select! {
            () = ctx.cancelled() => return Err(cancelled_error("embedding_http.embed")),
            result = self.client.post(self.endpoint.as_ref()).json(request).send() => {
                result.map_err(|error| map_reqwest_error(&error))?
            }
        };

        let status = response.status();
        let payload = tokio::select! {
            () = ctx.cancelled() => return Err(cancelled_error("embedding_http.embed")),
            result = response.bytes() => result.map_err(|error| map_reqwest_error(&error))?,
        };

        if !status.is_success() {
            return Err(map_http_error(status, &payload));
        }

        serde_json::from_slice(&payload).map_err(|error| {
            ErrorEnvelope::unexpected(
                ErrorCode::new("embedding", "invalid_response"),
                format!("failed to decode embedding response: {error}"),
                ErrorClass::NonRetriable,
            )
        })
    }
}

impl EmbeddingPort for HttpEmbedding {
    fn provider(&self) -> &EmbeddingProviderInfo {
        &self.provider
    }

    fn embed(
        &self,
        ctx: &RequestContext,
        request: EmbedRequest,
    ) -> BoxFuture<'_, Result<EmbeddingVector>> {
        let ctx = ctx.clone();
        let text = request.text;
        Box::pin(async move { self.embed_text(&ctx, text).await })
    }
}

#[derive(Debug, Serialize)]
struct EmbedHttpRequest {
    input: Vec<Box<str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<Box<str>>,
}

#[derive(Debug, Deserialize)]
struct EmbedHttpResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
struct EmbedHttpErrorResponse {
    error: Option<String>,
}

fn cancelled_error(operation: &'static str) -> ErrorEnvelope {
    ErrorEnvelope::cancelled("operation cancelled").with_metadata("operation", operation)
}

fn map_reqwest_error(error: &reqwest::Error) -> ErrorEnvelope {
    if error.is_timeout() {
        return ErrorEnvelope::unexpected(
            ErrorCode::timeout(),
            "embedding request timed out",
            ErrorClass::Retriable,
        );
    }
    if error.is_connect() {
        return ErrorEnvelope::unexpected(
            ErrorCode::dependency_unavailable(),
            format!("embedding connection failed: {error}"),
            ErrorClass::Retriable,
        );
    }
    ErrorEnvelope::unexpected(
        ErrorCode::new("embedding", "request_failed"),
        format!("embedding request failed: {error}"),
        ErrorClass::NonRetriable,
    )
}

fn map_http_error(status: StatusCode, payload: &[u8]) -> ErrorEnvelope {
    let message = serde_json::from_slice::<EmbedHttpErrorResponse>(payload)
        .ok()
        .and_then(|response| response.error)
        .unwrap_or_else(|| "embedding request failed".to_string());

    let envelope = match status.as_u16() {
        400 | 404 | 422 => ErrorEnvelope::expected(ErrorCode::invalid_input(), message),
        401 | 403 => ErrorEnvelope::expected(ErrorCode::permission_denied(), message),
        408 => ErrorEnvelope::unexpected(ErrorCode::timeout(), message, ErrorClass::Retriable),
        429 => ErrorEnvelope::unexpected(
            ErrorCode::new("core", "rate_limited"),
            message,
            ErrorClass::Retriable,
        ),
        _ if status.is_server_error() => ErrorEnvelope::unexpected(
            ErrorCode::dependency_unavailable(),
            message,
            ErrorClass::Retriable,
        ),
        _ => ErrorEnvelope::unexpected(
            ErrorCode::new("embedding", "http_error"),
            message,
            ErrorClass::NonRetriable,
        ),
    };

    envelope.with_metadata("status", status.as_u16().to_string())
}

fn map_embeddings(response: EmbedHttpResponse) -> Result<EmbeddingVector> {
    let mut embeddings = response.embeddings;
    if embeddings.len() != 1 {
        return Err(ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!(
                "embedding response count mismatch (expected 1, got {})",
                embeddings.len()
            ),
            ErrorClass::NonRetriable,
        ));
    }
    let values = embeddings.swap_remove(0);
    if values.is_empty() {
        return Err(ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            "embedding response vector is empty",
            ErrorClass::NonRetriable,
        ));
    }
    Ok(EmbeddingVector::from_vec(values))
}
