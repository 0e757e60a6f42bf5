//! JSON Schema exports for API v1 documents.

use crate::v1::{ApiV1SearchRequestDto, ApiV1SearchResponseDto};
use schemars::schema::RootSchema;
use schemars::schema_for;

/// JSON Schema for `ApiV1SearchRequestDto`.
#[must_use]
pub fn api_v1_search_request_schema() -> RootSchema {
    schema_for!(ApiV1SearchRequestDto)
}

/// JSON Schema for `ApiV1SearchResponseDto`.
#[must_use]
pub fn api_v1_search_response_schema() -> RootSchema {
    schema_for!(ApiV1SearchResponseDto)
}
