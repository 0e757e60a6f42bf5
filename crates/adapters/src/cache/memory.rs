use searchgate_ports::EmbeddingVector;
use searchgate_shared::{ErrorCode, ErrorEnvelope, Result};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

#[derive(Debug)]
pub(super) struct MemoryCache {
    max_entries: usize,
    state: tokio::sync::Mutex<CacheState>,
}

#[derive(Debug)]
struct CacheState {
    entries: HashMap<Box<str>, Arc<[f32]>>,
    order: VecDeque<Box<str>>,
}

impl MemoryCache {
    pub(crate) fn new(max_entries: usize) -> Result<Self> {
        if max_entries == 0 {
            return Err(ErrorEnvelope::expected(
                ErrorCode::invalid_input(),
                "cache max_entries must be greater than zero",
            ));
        }
        Ok(Self {
            max_entries,
            state: tokio::sync::Mutex::new(CacheState {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
        })
    }

    pub(crate) async fn get(&self, key: &str) -> Option<EmbeddingVector> {
        let vector = {
            let mut state = self.state.lock().await;
            let vector = Arc::clone(state.entries.get(key)?);
            Self::touch(&mut state, key);
            drop(state);
            vector
        };
        Some(EmbeddingVector::new(vector))
    }

    pub(crate) async fn insert(&self, key: &str, value: EmbeddingVector) {
        let mut state = self.state.lock().await;
        state
            .entries
            .insert(key.to_owned().into_boxed_str(), value.into_vector());
        Self::touch(&mut state, key);
        Self::evict(&mut state, self.max_entries);
        drop(state);
    }

    fn touch(state: &mut CacheState, key: &str) {
        if let Some(pos) = state.order.iter().position(|k| k.as_ref() == key) {
            state.order.remove(pos);
        }
        state.order.push_back(key.to_owned().into_boxed_str());
    }

    fn evict(state: &mut CacheState, max_entries: usize) {
        while state.entries.len() > max_entries {
            let Some(oldest) = state.order.pop_front() else {
                break;
            };
            state.entries.remove(&oldest);
        }
    }
}
