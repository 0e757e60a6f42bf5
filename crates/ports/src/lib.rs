//! # searchgate-ports
//!
//! Port traits for the searchgate hexagonal architecture.
//!
//! This crate defines the interfaces between the planning core and the
//! external collaborators (embedding service, Solr). It depends only on
//! `domain` and `shared`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::future::Future;
use std::pin::Pin;

/// Boxed future used by port traits.
///
/// We deliberately use boxed futures for boundary traits (I/O-bound work);
/// the planning core itself is synchronous CPU-only code.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod embedding;
pub mod logger;
pub mod solr;

pub use embedding::*;
pub use logger::*;
pub use solr::*;

// Re-export selected domain types used in port signatures, so adapter crates
// can implement ports without directly depending on `searchgate-domain`.
pub use searchgate_domain::{CollectionName, SolrParams, VectorFieldName};
