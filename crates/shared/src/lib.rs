//! # searchgate-shared
//!
//! Foundation types for the searchgate workspace: the error envelope every
//! crate speaks, the per-search request context with cancellation, the
//! single-flight map behind the embedding cache, and credential scrubbing
//! for logs and errors.
//!
//! This crate has no workspace dependencies; everything above it (domain,
//! ports, adapters, the planning core) builds on these types.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod concurrency;
pub mod errors;
pub mod redaction;

pub use concurrency::{CancellationToken, CorrelationId, RequestContext, SingleFlight};
pub use errors::{ErrorClass, ErrorCode, ErrorEnvelope, ErrorKind, ErrorMetadata, Result};
pub use redaction::{REDACTED, is_secret_key, redact_url_credentials};

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_and_context_types_compose() {
        let ctx = RequestContext::for_search();
        let error = ErrorEnvelope::expected(ErrorCode::invalid_input(), "query must be non-empty")
            .with_metadata("correlationId", ctx.correlation_id().as_str());

        assert_eq!(error.kind, ErrorKind::Expected);
        assert!(!error.class.is_retriable());
        assert!(error.metadata.contains_key("correlationId"));
    }

    #[test]
    fn result_alias_defaults_to_the_envelope() {
        fn lookup_rows() -> Result<u32> {
            Ok(10)
        }
        assert!(matches!(lookup_rows(), Ok(10)));
    }
}
