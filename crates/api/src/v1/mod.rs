//! API v1 contract surface.

mod mappers;
mod schema;
mod types;
mod validation;

pub use mappers::{
    error_code_to_api_v1, error_envelope_to_api_v1_error, result_to_api_v1_result,
    search_request_from_api_v1, search_response_to_api_v1,
};
pub use schema::{api_v1_search_request_schema, api_v1_search_response_schema};
pub use types::*;
pub use validation::{ApiV1ValidationIssue, validate_search_request};
