//! Request-scoped context and shared-call deduplication.
//!
//! One gateway search fans out into an embedding call and a Solr call, all
//! of which must stop promptly when the transport drops the request. The
//! pieces here make that tractable:
//!
//! - [`RequestContext`]: a correlation id plus a cancellation signal,
//!   cloned into every collaborator call of one search
//! - [`SingleFlight`]: shares one in-flight embedding computation among
//!   concurrent searches for the same query text
//!
//! Cancellation is cooperative: adapters race their I/O against
//! [`RequestContext::cancelled`], and CPU-only planning stages check
//! [`RequestContext::ensure_not_cancelled`] between steps.

use crate::{ErrorEnvelope, Result};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{OnceCell, watch};

static SEARCH_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifier tying together the log events of one search: planner,
/// embedding call, Solr call, and response mapping all stamp it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(Arc<str>);

impl CorrelationId {
    /// Allocate the next `search_N` id, unique within this process.
    #[must_use]
    pub fn new_search_id() -> Self {
        let n = SEARCH_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(Arc::from(format!("search_{n}")))
    }

    /// Borrow the identifier as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Awaitable cancellation signal shared by all clones.
///
/// Built on a `watch` channel: `cancel` flips the flag once, and every
/// waiter past or future observes it. There is no un-cancel.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    signal: Arc<watch::Sender<bool>>,
}

impl CancellationToken {
    /// Create a token in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            signal: Arc::new(sender),
        }
    }

    /// Flip the token; all current and future waiters resume.
    pub fn cancel(&self) {
        let _ = self.signal.send_replace(true);
    }

    /// Returns true once `cancel` has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.signal.borrow()
    }

    /// Resolve when the token is cancelled.
    pub async fn cancelled(&self) {
        let mut watcher = self.signal.subscribe();
        while !*watcher.borrow_and_update() {
            // Cannot error: `self` keeps the sender alive while we wait.
            if watcher.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-search context handed to every port call.
///
/// The context is immutable for the life of the search; clones share the
/// same correlation id and cancellation signal.
#[derive(Debug, Clone)]
pub struct RequestContext {
    id: CorrelationId,
    cancellation: CancellationToken,
}

impl RequestContext {
    /// Context for a fresh search with a generated `search_N` id.
    #[must_use]
    pub fn for_search() -> Self {
        Self::with_id(CorrelationId::new_search_id())
    }

    /// Context carrying a transport-supplied correlation id.
    #[must_use]
    pub fn with_id(id: CorrelationId) -> Self {
        Self {
            id,
            cancellation: CancellationToken::new(),
        }
    }

    /// The search's correlation id.
    #[must_use]
    pub const fn correlation_id(&self) -> &CorrelationId {
        &self.id
    }

    /// Cancel this search; in-flight embedding and Solr calls unwind.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Returns true once the search was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Resolve when the search is cancelled (adapters race I/O against
    /// this).
    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await;
    }

    /// Checkpoint for CPU-only stages: error out promptly once cancelled.
    pub fn ensure_not_cancelled(&self, operation: &'static str) -> Result<()> {
        if self.is_cancelled() {
            return Err(ErrorEnvelope::cancelled("operation cancelled")
                .with_metadata("operation", operation)
                .with_metadata("correlationId", self.id.as_str()));
        }
        Ok(())
    }
}

/// Keyed single-flight map: concurrent callers for the same key share one
/// computation and its outcome.
///
/// The embedding cache uses this with text-derived keys so that two
/// searches arriving with the same query text trigger a single backend
/// embed call. The outcome (success or failure) is broadcast to every
/// caller that joined the flight, then the entry is dropped: failures are
/// never remembered beyond the flight that observed them, and the next
/// caller starts fresh.
#[derive(Debug)]
pub struct SingleFlight<T> {
    entries: Mutex<HashMap<Box<str>, Arc<OnceCell<Result<T>>>>>,
}

impl<T: Clone> SingleFlight<T> {
    /// Create an empty single-flight map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Run `compute` for `key`, sharing one execution among concurrent
    /// callers.
    ///
    /// The first caller for a cold key executes `compute`; callers arriving
    /// while it is in flight await the same outcome without executing their
    /// own closure.
    pub async fn run<F, Fut>(&self, key: &str, compute: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let cell = self.join(key);
        let result = cell
            .get_or_init(|| async move { compute().await })
            .await
            .clone();
        self.leave(key, &cell);
        result
    }

    /// Number of flights currently in progress.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.lock_entries().len()
    }

    fn join(&self, key: &str) -> Arc<OnceCell<Result<T>>> {
        let mut entries = self.lock_entries();
        Arc::clone(
            entries
                .entry(key.to_owned().into_boxed_str())
                .or_insert_with(|| Arc::new(OnceCell::new())),
        )
    }

    fn leave(&self, key: &str, cell: &Arc<OnceCell<Result<T>>>) {
        let mut entries = self.lock_entries();
        // Only the flight we joined is removed; a newer flight for the same
        // key keeps its entry.
        if let Some(current) = entries.get(key)
            && Arc::ptr_eq(current, cell)
        {
            entries.remove(key);
        }
    }

    fn lock_entries(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<Box<str>, Arc<OnceCell<Result<T>>>>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> Default for SingleFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}
