//! Embedding adapters.

pub mod fixed;
pub mod http;

pub use fixed::FixedEmbedding;
pub use http::{HttpEmbedding, HttpEmbeddingConfig};
