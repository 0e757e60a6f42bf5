//! # searchgate-api
//!
//! Versioned RPC contract types for the searchgate service: serde DTOs,
//! shape validation, JSON Schema exports, and mappers between the wire
//! shapes and the domain model.
//!
//! The transport server (gRPC or HTTP) is an external collaborator; this
//! crate only defines the structured forms it exchanges.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod v1;
