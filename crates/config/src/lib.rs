//! # searchgate-config
//!
//! Gateway configuration: schema, defaults, fail-fast validation, and the
//! JSON file loader.
//!
//! Configuration is loaded once before the first request, validated and
//! normalized into a [`ValidatedGatewayConfig`], and never mutated
//! afterwards. Invalid combinations are rejected at load time, not at
//! request time.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod load;
mod schema;

pub use load::{load_config, parse_config};
pub use schema::{
    CURRENT_CONFIG_VERSION, CollectionConfig, ConfigSchemaError, EmbeddingCacheConfig,
    EmbeddingServiceConfig, GatewayConfig, SolrConfig, ValidatedGatewayConfig, VectorFieldKind,
    VectorFieldSpec,
};
