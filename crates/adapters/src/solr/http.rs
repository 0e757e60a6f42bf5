//! Solr HTTP select client.

use crate::solr::error::{SolrErrorContext, map_solr_http_error, map_solr_transport_error};
use searchgate_config::SolrConfig;
use searchgate_ports::{
    BoxFuture, SolrFacetCounts, SolrNamedCounts, SolrPort, SolrQueryData, SolrSelectResponse,
};
use searchgate_shared::{ErrorClass, ErrorCode, ErrorEnvelope, RequestContext, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Solr HTTP client configuration.
#[derive(Debug, Clone)]
pub struct SolrHttpConfig {
    /// Base URL of the Solr service.
    pub url: Box<str>,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl SolrHttpConfig {
    /// Build from the shared Solr config.
    #[must_use]
    pub fn from_service_config(config: &SolrConfig) -> Self {
        Self {
            url: config.url.as_str().into(),
            timeout_ms: config.timeout_ms,
        }
    }

    /// Validates configuration invariants for the HTTP client.
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(ErrorEnvelope::expected(
                ErrorCode::invalid_input(),
                "Solr URL is required",
            ));
        }
        if self.timeout_ms == 0 {
            return Err(ErrorEnvelope::expected(
                ErrorCode::invalid_input(),
                "Solr timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Solr HTTP adapter issuing form-encoded select requests.
#[derive(Clone)]
pub struct SolrHttpClient {
    client: reqwest::Client,
    base_url: Box<str>,
}

impl SolrHttpClient {
    /// Creates a Solr HTTP client from configuration.
    pub fn new(config: SolrHttpConfig) -> Result<Self> {
        config.validate()?;
        let base_url = config
            .url
            .trim()
            .trim_end_matches('/')
            .to_owned()
            .into_boxed_str();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|error| {
                ErrorEnvelope::unexpected(
                    ErrorCode::new("solr", "client_init_failed"),
                    format!("failed to build Solr client: {error}"),
                    ErrorClass::NonRetriable,
                )
            })?;

        Ok(Self { client, base_url })
    }

    async fn run_select(
        &self,
        ctx: &RequestContext,
        request: SolrQueryData,
    ) -> Result<SolrSelectResponse> {
        ctx.ensure_not_cancelled("solr_http.select")?;

        let endpoint = format!("/solr/{}/select", request.collection.as_str());
        let url = format!("{}{endpoint}", self.base_url);
        let error_ctx = SolrErrorContext {
            operation: "solr_http.select",
            collection: Some(request.collection.as_str().to_owned()),
            endpoint: Some(endpoint),
        };

        // Form-encoded body avoids URL length limits on large vector literals.
        let mut form: Vec<(&str, &str)> = request.params.pairs().collect();
        form.push(("wt", "json"));

        let response = tokio::select! {
            () = ctx.cancelled() => return Err(cancelled_error()),
            result = self.client.post(&url).form(&form).send() => {
                result.map_err(|error| map_solr_transport_error(&error, &error_ctx))?
            }
        };

        let status = response.status();
        let payload = tokio::select! {
            () = ctx.cancelled() => return Err(cancelled_error()),
            result = response.bytes() => {
                result.map_err(|error| map_solr_transport_error(&error, &error_ctx))?
            }
        };

        if !status.is_success() {
            return Err(map_solr_http_error(status.as_u16(), &payload, &error_ctx));
        }

        let wire: SelectWire = serde_json::from_slice(&payload).map_err(|error| {
            ErrorEnvelope::unexpected(
                ErrorCode::internal(),
                format!("invalid Solr select response: {error}"),
                ErrorClass::NonRetriable,
            )
        })?;

        map_select_response(wire)
    }
}

impl SolrPort for SolrHttpClient {
    fn select(
        &self,
        ctx: &RequestContext,
        request: SolrQueryData,
    ) -> BoxFuture<'_, Result<SolrSelectResponse>> {
        let ctx = ctx.clone();
        Box::pin(async move { self.run_select(&ctx, request).await })
    }
}

fn cancelled_error() -> ErrorEnvelope {
    ErrorEnvelope::cancelled("operation cancelled").with_metadata("operation", "solr_http.select")
}

#[derive(Debug, Deserialize)]
struct SelectWire {
    #[serde(rename = "responseHeader")]
    response_header: HeaderWire,
    response: BodyWire,
    #[serde(default)]
    highlighting: Option<BTreeMap<String, BTreeMap<String, Vec<String>>>>,
    #[serde(default)]
    facet_counts: Option<FacetCountsWire>,
}

#[derive(Debug, Deserialize)]
struct HeaderWire {
    #[serde(rename = "QTime", default)]
    q_time: u32,
}

#[derive(Debug, Deserialize)]
struct BodyWire {
    #[serde(rename = "numFound")]
    num_found: u64,
    #[serde(default)]
    start: u64,
    #[serde(default)]
    docs: Vec<BTreeMap<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct FacetCountsWire {
    #[serde(default)]
    facet_fields: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    facet_queries: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    facet_ranges: Option<BTreeMap<String, Value>>,
}

fn map_select_response(wire: SelectWire) -> Result<SolrSelectResponse> {
    let docs = wire
        .response
        .docs
        .into_iter()
        .map(|doc| {
            doc.into_iter()
                .map(|(key, value)| (key.into_boxed_str(), value))
                .collect()
        })
        .collect();

    let highlighting = wire
        .highlighting
        .unwrap_or_default()
        .into_iter()
        .map(|(doc_id, fields)| {
            let fields = fields
                .into_iter()
                .map(|(field, fragments)| {
                    (
                        field.into_boxed_str(),
                        fragments
                            .into_iter()
                            .map(String::into_boxed_str)
                            .collect::<Vec<_>>(),
                    )
                })
                .collect();
            (doc_id.into_boxed_str(), fields)
        })
        .collect();

    let mut facets = SolrFacetCounts::default();
    if let Some(wire_facets) = wire.facet_counts {
        for (name, value) in wire_facets.facet_fields.unwrap_or_default() {
            facets.fields.push(SolrNamedCounts {
                name: name.into_boxed_str(),
                counts: parse_flat_counts(&value)?,
            });
        }
        for (query, value) in wire_facets.facet_queries.unwrap_or_default() {
            facets
                .queries
                .push((query.into_boxed_str(), parse_count(&value)?));
        }
        for (name, value) in wire_facets.facet_ranges.unwrap_or_default() {
            let counts = value
                .get("counts")
                .map(parse_flat_counts)
                .transpose()?
                .unwrap_or_default();
            facets.ranges.push(SolrNamedCounts {
                name: name.into_boxed_str(),
                counts,
            });
        }
    }

    Ok(SolrSelectResponse {
        num_found: wire.response.num_found,
        start: wire.response.start,
        q_time_ms: wire.response_header.q_time,
        docs,
        highlighting,
        facets,
    })
}

// Solr's default wt=json named-list style interleaves values and counts in
// one flat array: ["a", 10, "b", 5].
fn parse_flat_counts(value: &Value) -> Result<Vec<(Box<str>, u64)>> {
    let Some(items) = value.as_array() else {
        return Err(invalid_facet_payload("facet counts are not an array"));
    };
    if items.len() % 2 != 0 {
        return Err(invalid_facet_payload("facet counts array has odd length"));
    }

    let mut counts = Vec::with_capacity(items.len() / 2);
    for pair in items.chunks_exact(2) {
        let value = match &pair[0] {
            Value::String(text) => text.clone().into_boxed_str(),
            other => other.to_string().into_boxed_str(),
        };
        let count = parse_count(&pair[1])?;
        counts.push((value, count));
    }
    Ok(counts)
}

fn parse_count(value: &Value) -> Result<u64> {
    value
        .as_u64()
        .ok_or_else(|| invalid_facet_payload("facet count is not an unsigned integer"))
}

fn invalid_facet_payload(reason: &str) -> ErrorEnvelope {
    ErrorEnvelope::unexpected(
        ErrorCode::internal(),
        format!("invalid Solr facet payload: {reason}"),
        ErrorClass::NonRetriable,
    )
}
