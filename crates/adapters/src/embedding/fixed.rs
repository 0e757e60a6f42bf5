//! Fixed embedding adapter for development and tests.

use searchgate_ports::{
    BoxFuture, EmbedRequest, EmbeddingPort, EmbeddingProviderInfo, EmbeddingVector,
};
use searchgate_shared::{ErrorCode, ErrorEnvelope, RequestContext, Result};
use std::sync::Arc;

/// Embedding adapter that returns the same vector for every text.
///
/// Useful for wiring checks and deterministic tests without a running
/// embedding service.
#[derive(Debug, Clone)]
pub struct FixedEmbedding {
    provider: EmbeddingProviderInfo,
    vector: Arc<[f32]>,
}

impl FixedEmbedding {
    /// Create an adapter returning `vector` for every input.
    pub fn new(vector: Vec<f32>) -> Result<Self> {
        if vector.is_empty() {
            return Err(ErrorEnvelope::expected(
                ErrorCode::invalid_input(),
                "fixed embedding vector must be non-empty",
            ));
        }
        Ok(Self {
            provider: EmbeddingProviderInfo {
                id: "fixed".into(),
                name: "Fixed embedding".into(),
            },
            vector: Arc::from(vector),
        })
    }

    /// Create an adapter returning a zero vector of the given dimension.
    pub fn zeros(dimension: usize) -> Result<Self> {
        Self::new(vec![0.0; dimension.max(1)])
    }
}

impl EmbeddingPort for FixedEmbedding {
    fn provider(&self) -> &EmbeddingProviderInfo {
        &self.provider
    }

    fn embed(
        &self,
        ctx: &RequestContext,
        _request: EmbedRequest,
    ) -> BoxFuture<'_, Result<EmbeddingVector>> {
        let ctx = ctx.clone();
        let vector = Arc::clone(&self.vector);
        Box::pin(async move {
            ctx.ensure_not_cancelled("embedding_fixed.embed")?;
            Ok(EmbeddingVector::new(vector))
        })
    }
}
