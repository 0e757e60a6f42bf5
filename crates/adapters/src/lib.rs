//! # searchgate-adapters
//!
//! Adapter implementations behind the searchgate ports:
//!
//! - HTTP embedding client plus a fixed (deterministic) variant
//! - Caching embedding wrapper with single-flight deduplication
//! - Solr HTTP select client
//! - Structured JSON logger

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod cache;
pub mod embedding;
mod logger;
pub mod solr;

pub use logger::{JsonLineLogger, LogWriter, StderrWriter};
