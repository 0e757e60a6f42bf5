use crate::error::CliError;
use crate::format::print_json;
use searchgate_adapters::cache::{CachingEmbedding, EmbeddingCache};
use searchgate_adapters::embedding::{FixedEmbedding, HttpEmbedding, HttpEmbeddingConfig};
use searchgate_adapters::solr::{SolrHttpClient, SolrHttpConfig};
use searchgate_adapters::{JsonLineLogger, StderrWriter};
use searchgate_api::v1::{
    ApiV1SearchRequestDto, search_request_from_api_v1, search_response_to_api_v1,
};
use searchgate_app::{SearchDeps, search};
use searchgate_config::load_config;
use searchgate_ports::{EmbeddingPort, LoggerPort};
use searchgate_shared::RequestContext;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Inputs for the `search` command.
#[derive(Debug, Clone)]
pub struct SearchCommandInput {
    /// Gateway config file.
    pub config: PathBuf,
    /// JSON search request file.
    pub request: PathBuf,
    /// Use a fixed zero embedding of this dimension instead of the
    /// configured embedding service.
    pub fixed_embedding_dim: Option<usize>,
    /// Pretty-print the response.
    pub pretty: bool,
}

/// Run one search against live collaborators and print the response DTO.
pub async fn run_search(input: SearchCommandInput) -> Result<(), CliError> {
    let config = load_config(&input.config).map_err(CliError::from)?;
    let dto = read_request(&input.request)?;
    let request = search_request_from_api_v1(&dto).map_err(CliError::from)?;

    let backend: Arc<dyn EmbeddingPort> = match input.fixed_embedding_dim {
        Some(dimension) => Arc::new(FixedEmbedding::zeros(dimension).map_err(CliError::from)?),
        None => Arc::new(
            HttpEmbedding::new(&HttpEmbeddingConfig::from_service_config(&config.embedding))
                .map_err(CliError::from)?,
        ),
    };
    let cache = EmbeddingCache::new(&config.embedding.cache).map_err(CliError::from)?;
    let embedding: Arc<dyn EmbeddingPort> = Arc::new(CachingEmbedding::new(
        backend,
        cache,
        config.collection.collection_name.as_str().into(),
    ));

    let solr = Arc::new(
        SolrHttpClient::new(SolrHttpConfig::from_service_config(&config.solr))
            .map_err(CliError::from)?,
    );
    let logger: Arc<dyn LoggerPort> = Arc::new(JsonLineLogger::for_collection(
        &config.collection.collection_name,
        Arc::new(StderrWriter),
    ));

    let deps = SearchDeps {
        embedding,
        solr,
        logger: Some(logger),
    };

    let ctx = RequestContext::for_search();
    let response = search(&ctx, &deps, config.as_ref(), request)
        .await
        .map_err(CliError::from)?;

    print_json(&search_response_to_api_v1(&response), input.pretty)
}

fn read_request(path: &Path) -> Result<ApiV1SearchRequestDto, CliError> {
    let contents = std::fs::read_to_string(path)?;
    let dto: ApiV1SearchRequestDto = serde_json::from_str(&contents)?;
    Ok(dto)
}
