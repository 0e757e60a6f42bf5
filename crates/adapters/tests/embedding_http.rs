// HTTP embedding adapter integration tests.
#![allow(missing_docs)]

use searchgate_adapters::embedding::{HttpEmbedding, HttpEmbeddingConfig};
use searchgate_ports::EmbeddingPort;
use searchgate_shared::{ErrorCode, RequestContext, Result};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn embed_uses_mock_server() -> Result<()> {
    let server = MockServer::start().await;
    let response = ResponseTemplate::new(200).set_body_json(json!({
        "embeddings": [[0.1, 0.2, 0.3]]
    }));

    Mock::given(method("POST"))
        .and(path("/embed"))
        .and(body_json(json!({
            "input": ["hello"],
            "model": "all-minilm"
        })))
        .respond_with(response)
        .mount(&server)
        .await;

    let config = HttpEmbeddingConfig {
        address: server.uri().into(),
        model: Some("all-minilm".into()),
        api_key: None,
        timeout_ms: 5_000,
    };
    let adapter = HttpEmbedding::new(&config)?;
    let ctx = RequestContext::for_search();
    let embedding = adapter.embed(&ctx, "hello".into()).await?;
    assert_eq!(embedding.dimension(), 3);
    assert_eq!(embedding.as_slice(), &[0.1, 0.2, 0.3]);
    Ok(())
}

#[tokio::test]
async fn embed_sends_bearer_token() -> Result<()> {
    let server = MockServer::start().await;
    let response = ResponseTemplate::new(200).set_body_json(json!({
        "embeddings": [[0.5]]
    }));

    Mock::given(method("POST"))
        .and(path("/embed"))
        .and(header("authorization", "Bearer example"))
        .respond_with(response)
        .mount(&server)
        .await;

    let config = HttpEmbeddingConfig {
        address: server.uri().into(),
        model: None,
        api_key: Some("example".into()), // pragma: allowlist secret
        timeout_ms: 5_000,
    };
    let adapter = HttpEmbedding::new(&config)?;
    let ctx = RequestContext::for_search();
    let embedding = adapter.embed(&ctx, "hello".into()).await?;
    assert_eq!(embedding.dimension(), 1);
    Ok(())
}

#[tokio::test]
async fn server_error_maps_to_dependency_unavailable() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embed"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": "overloaded"
        })))
        .mount(&server)
        .await;

    let config = HttpEmbeddingConfig {
        address: server.uri().into(),
        model: None,
        api_key: None,
        timeout_ms: 5_000,
    };
    let adapter = HttpEmbedding::new(&config)?;
    let ctx = RequestContext::for_search();
    let error = adapter.embed(&ctx, "hello".into()).await.err();
    assert!(matches!(
        error,
        Some(error) if error.code == ErrorCode::dependency_unavailable() && error.class.is_retriable()
    ));
    Ok(())
}

#[tokio::test]
async fn bad_request_maps_to_invalid_input() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embed"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "text too long"
        })))
        .mount(&server)
        .await;

    let config = HttpEmbeddingConfig {
        address: server.uri().into(),
        model: None,
        api_key: None,
        timeout_ms: 5_000,
    };
    let adapter = HttpEmbedding::new(&config)?;
    let ctx = RequestContext::for_search();
    let error = adapter.embed(&ctx, "hello".into()).await.err();
    assert!(matches!(
        error,
        Some(error) if error.code == ErrorCode::invalid_input() && error.message == "text too long"
    ));
    Ok(())
}

#[tokio::test]
async fn cancelled_context_short_circuits() -> Result<()> {
    let server = MockServer::start().await;
    let config = HttpEmbeddingConfig {
        address: server.uri().into(),
        model: None,
        api_key: None,
        timeout_ms: 5_000,
    };
    let adapter = HttpEmbedding::new(&config)?;
    let ctx = RequestContext::for_search();
    ctx.cancel();

    let error = adapter.embed(&ctx, "hello".into()).await.err();
    assert!(matches!(error, Some(error) if error.is_cancelled()));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
    Ok(())
}
