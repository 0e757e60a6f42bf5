//! Process-scoped embedding cache.

mod embedding;
mod memory;

pub use embedding::CachingEmbedding;

use memory::MemoryCache;
use searchgate_config::EmbeddingCacheConfig;
use searchgate_ports::EmbeddingVector;
use searchgate_shared::Result;
use sha2::{Digest, Sha256};

/// Embedding cache keyed by exact query text.
///
/// Memory-only: correctness does not require eviction, but the store is
/// bounded by `maxEntries` with least-recently-used displacement.
#[derive(Debug)]
pub struct EmbeddingCache {
    memory: Option<MemoryCache>,
}

impl EmbeddingCache {
    /// Create a new cache from config.
    pub fn new(config: &EmbeddingCacheConfig) -> Result<Self> {
        let memory = if config.enabled {
            Some(MemoryCache::new(config.max_entries as usize)?)
        } else {
            None
        };
        Ok(Self { memory })
    }

    /// Compute a stable cache key for an embedding payload.
    ///
    /// The key hashes the exact text bytes; any normalization is the
    /// caller's responsibility.
    #[must_use]
    pub fn make_key(namespace: &str, text: &str) -> Box<str> {
        let mut hasher = Sha256::new();
        hasher.update(namespace.as_bytes());
        hasher.update([0u8]);
        hasher.update(text.as_bytes());
        let hash = hasher.finalize();
        format!("{hash:x}").into_boxed_str()
    }

    /// Read from cache.
    pub async fn get(&self, key: &str) -> Option<EmbeddingVector> {
        match &self.memory {
            Some(memory) => memory.get(key).await,
            None => None,
        }
    }

    /// Insert into cache.
    pub async fn insert(&self, key: &str, value: EmbeddingVector) {
        if let Some(memory) = &self.memory {
            memory.insert(key, value).await;
        }
    }
}
