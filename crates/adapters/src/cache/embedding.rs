//! Caching embedding wrapper with single-flight deduplication.

use super::EmbeddingCache;
use searchgate_ports::{
    BoxFuture, EmbedRequest, EmbeddingPort, EmbeddingProviderInfo, EmbeddingVector,
};
use searchgate_shared::{RequestContext, Result, SingleFlight};
use std::sync::Arc;

/// Embedding port wrapper that adds a process-scoped cache and single-flight
/// deduplication.
///
/// Guarantees, per distinct text:
/// - a cache hit returns without touching the backend,
/// - concurrent cold-key callers share exactly one backend call,
/// - backend failures propagate to the waiting callers and are not cached.
pub struct CachingEmbedding {
    inner: Arc<dyn EmbeddingPort>,
    cache: EmbeddingCache,
    cache_namespace: Box<str>,
    flight: SingleFlight<EmbeddingVector>,
}

impl CachingEmbedding {
    /// Create a new caching wrapper.
    #[must_use]
    pub fn new(
        inner: Arc<dyn EmbeddingPort>,
        cache: EmbeddingCache,
        cache_namespace: Box<str>,
    ) -> Self {
        Self {
            inner,
            cache,
            cache_namespace,
            flight: SingleFlight::new(),
        }
    }

    fn cache_key(&self, text: &str) -> Box<str> {
        EmbeddingCache::make_key(&self.cache_namespace, text)
    }
}

impl EmbeddingPort for CachingEmbedding {
    fn provider(&self) -> &EmbeddingProviderInfo {
        self.inner.provider()
    }

    fn embed(
        &self,
        ctx: &RequestContext,
        request: EmbedRequest,
    ) -> BoxFuture<'_, Result<EmbeddingVector>> {
        let ctx = ctx.clone();
        let text = request.text;
        Box::pin(async move {
            let key = self.cache_key(&text);
            if let Some(hit) = self.cache.get(&key).await {
                return Ok(hit);
            }

            let ctx_ref = &ctx;
            self.flight
                .run(&key, || async {
                    // A flight that just completed may have filled the cache
                    // between our miss and joining; re-check before the call.
                    if let Some(hit) = self.cache.get(&key).await {
                        return Ok(hit);
                    }
                    let vector = self.inner.embed(ctx_ref, text.clone().into()).await?;
                    self.cache.insert(&key, vector.clone()).await;
                    Ok(vector)
                })
                .await
        })
    }
}
