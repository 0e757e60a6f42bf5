//! Error currency of the gateway.
//!
//! Every failure a search can hit funnels into one [`ErrorEnvelope`] with a
//! stable code the transport can map onto its own status space:
//!
//! - rejected requests (unknown vector field, conflicting similarity
//!   options, missing keyword fields) carry `core:invalid_input`,
//! - configuration refused at startup carries `core:failed_precondition`,
//! - an unreachable embedding service or Solr carries
//!   `core:dependency_unavailable` or `core:timeout` and is retriable,
//! - a Solr payload the mapper cannot parse carries `core:internal`.
//!
//! The gateway never retries internally; the retry [`ErrorClass`] tells the
//! caller whether doing so could help.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Result type used across the gateway workspace.
pub type Result<T, E = ErrorEnvelope> = std::result::Result<T, E>;

/// Metadata attached to errors for diagnostics (offending field, HTTP
/// status, collection name, ...).
pub type ErrorMetadata = BTreeMap<String, String>;

/// High-level classification of error origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Failures a caller can provoke: bad requests, bad config, cancellation.
    Expected,
    /// Invariant violations that indicate a gateway bug.
    Invariant,
    /// Failures of the outside world: embedding service or Solr misbehaving.
    Unexpected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected => formatter.write_str("expected"),
            Self::Invariant => formatter.write_str("invariant"),
            Self::Unexpected => formatter.write_str("unexpected"),
        }
    }
}

/// Whether retrying the search could succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Transient collaborator failure; the caller may retry.
    Retriable,
    /// Retrying the same request would fail the same way.
    NonRetriable,
}

impl ErrorClass {
    /// Returns true when the error is considered retriable.
    #[must_use]
    pub const fn is_retriable(self) -> bool {
        matches!(self, Self::Retriable)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retriable => formatter.write_str("retriable"),
            Self::NonRetriable => formatter.write_str("non-retriable"),
        }
    }
}

/// Stable error code: a namespace (`core`, `domain`, `embedding`, `solr`)
/// plus an identifier within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode {
    namespace: String,
    code: String,
}

impl ErrorCode {
    /// Create a code in an arbitrary namespace (adapters use `embedding`
    /// and `solr` for protocol-specific failures).
    pub fn new(namespace: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            code: code.into(),
        }
    }

    /// The request is malformed: unknown vector field, empty strategy list,
    /// conflicting similarity and tag filters, missing keyword fields.
    pub fn invalid_input() -> Self {
        Self::new("core", "invalid_input")
    }

    /// Configuration violated a startup invariant; the process should not
    /// serve searches.
    pub fn failed_precondition() -> Self {
        Self::new("core", "failed_precondition")
    }

    /// The embedding service or Solr is unreachable or returned a 5xx.
    pub fn dependency_unavailable() -> Self {
        Self::new("core", "dependency_unavailable")
    }

    /// A collaborator call exceeded its deadline.
    pub fn timeout() -> Self {
        Self::new("core", "timeout")
    }

    /// The caller cancelled the search before it finished.
    pub fn cancelled() -> Self {
        Self::new("core", "cancelled")
    }

    /// The target (collection, endpoint) does not exist.
    pub fn not_found() -> Self {
        Self::new("core", "not_found")
    }

    /// A collaborator rejected the gateway's credentials.
    pub fn permission_denied() -> Self {
        Self::new("core", "permission_denied")
    }

    /// The gateway could not make sense of a structurally valid-looking
    /// response, or hit a bug.
    pub fn internal() -> Self {
        Self::new("core", "internal")
    }

    /// Returns the namespace portion.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the code identifier.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.namespace, self.code)
    }
}

/// Structured error envelope shared across the workspace.
///
/// Adapters attach context through [`ErrorEnvelope::with_metadata`]
/// (operation, collection, HTTP status); the planner and search use-case
/// pass envelopes through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Origin category.
    pub kind: ErrorKind,
    /// Retry classification.
    pub class: ErrorClass,
    /// Stable error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Additional diagnostic metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: ErrorMetadata,
}

impl ErrorEnvelope {
    /// An expected, caller-provoked failure (never retriable).
    pub fn expected(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Expected,
            class: ErrorClass::NonRetriable,
            code,
            message: message.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// An invariant violation (always non-retriable; indicates a bug).
    pub fn invariant(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Invariant,
            class: ErrorClass::NonRetriable,
            code,
            message: message.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// A collaborator failure with an explicit retry classification.
    pub fn unexpected(code: ErrorCode, message: impl Into<String>, class: ErrorClass) -> Self {
        Self {
            kind: ErrorKind::Unexpected,
            class,
            code,
            message: message.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// A cancellation observed while a search was in flight.
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Expected,
            class: ErrorClass::NonRetriable,
            code: ErrorCode::cancelled(),
            message: message.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Returns true if the error represents a cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.code == ErrorCode::cancelled()
    }

    /// Attach a single metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} [{}/{}]: {}",
            self.code, self.kind, self.class, self.message
        )
    }
}

impl std::error::Error for ErrorEnvelope {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_request_is_expected_and_final() {
        let error = ErrorEnvelope::expected(
            ErrorCode::invalid_input(),
            "unknown vector field \"does_not_exist\"",
        )
        .with_metadata("vectorField", "does_not_exist");

        assert_eq!(error.kind, ErrorKind::Expected);
        assert_eq!(error.class, ErrorClass::NonRetriable);
        assert_eq!(error.code, ErrorCode::invalid_input());
        assert_eq!(
            error.metadata.get("vectorField").map(String::as_str),
            Some("does_not_exist")
        );
    }

    #[test]
    fn unreachable_solr_is_retriable() {
        let error = ErrorEnvelope::unexpected(
            ErrorCode::dependency_unavailable(),
            "Solr connection refused",
            ErrorClass::Retriable,
        );
        assert_eq!(error.kind, ErrorKind::Unexpected);
        assert!(error.class.is_retriable());
    }

    #[test]
    fn bad_configuration_is_a_failed_precondition() {
        let error = ErrorEnvelope::expected(
            ErrorCode::failed_precondition(),
            "vectorFields.chunks_vec: chunkCollection is required",
        );
        assert_eq!(error.code.namespace(), "core");
        assert_eq!(error.code.code(), "failed_precondition");
    }

    #[test]
    fn cancellation_is_detectable() {
        let cancelled = ErrorEnvelope::cancelled("search cancelled by caller");
        assert!(cancelled.is_cancelled());

        let other = ErrorEnvelope::expected(ErrorCode::invalid_input(), "bad");
        assert!(!other.is_cancelled());
    }

    #[test]
    fn display_leads_with_the_stable_code() {
        let error = ErrorEnvelope::unexpected(
            ErrorCode::new("solr", "http_error"),
            "HTTP 418",
            ErrorClass::NonRetriable,
        );
        assert_eq!(
            error.to_string(),
            "solr:http_error [unexpected/non-retriable]: HTTP 418"
        );
    }
}
