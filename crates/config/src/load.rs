//! Configuration loading from JSON documents.

use crate::schema::{GatewayConfig, ValidatedGatewayConfig};
use searchgate_shared::{ErrorCode, ErrorEnvelope, Result};
use std::path::Path;

/// Parse and validate a configuration document from a JSON string.
pub fn parse_config(json: &str) -> Result<ValidatedGatewayConfig> {
    let config: GatewayConfig = serde_json::from_str(json).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::failed_precondition(),
            format!("config document is not valid JSON: {error}"),
        )
    })?;
    config.validate_and_normalize().map_err(ErrorEnvelope::from)
}

/// Load, parse, and validate a configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<ValidatedGatewayConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::failed_precondition(),
            format!("failed to read config file: {error}"),
        )
        .with_metadata("path", path.display().to_string())
    })?;
    parse_config(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::VectorFieldKind;

    const VALID_CONFIG: &str = r#"{
        "version": 1,
        "collection": {
            "collectionName": "documents",
            "keywordQueryFields": ["title", "body"],
            "defaultRows": 10,
            "defaultSort": "score desc",
            "vectorFields": {
                "title_vec": {
                    "solrFieldName": "title-vector",
                    "kind": "INLINE",
                    "defaultTopK": 30,
                    "embeddingSource": "default"
                },
                "chunks_vec": {
                    "solrFieldName": "chunk-vector",
                    "kind": "CHILD_COLLECTION",
                    "defaultTopK": 50,
                    "chunkCollection": "document-chunks",
                    "embeddingSource": "default"
                }
            }
        },
        "embedding": { "address": "http://localhost:9000", "timeoutMs": 5000 },
        "solr": { "url": "http://localhost:8983", "timeoutMs": 5000 }
    }"#;

    #[test]
    fn parses_valid_document() -> Result<()> {
        let config = parse_config(VALID_CONFIG)?;
        assert_eq!(config.collection.collection_name, "documents");
        assert_eq!(config.collection.vector_fields.len(), 2);

        let chunks = config.collection.vector_field("chunks_vec");
        assert!(matches!(
            chunks,
            Some(spec) if spec.kind == VectorFieldKind::ChildCollection
        ));
        Ok(())
    }

    #[test]
    fn rejects_malformed_json() {
        let error = parse_config("{ not json").err();
        assert!(matches!(
            error,
            Some(error) if error.code == ErrorCode::failed_precondition()
        ));
    }

    #[test]
    fn rejects_unknown_fields() {
        let error = parse_config(r#"{ "version": 1, "unknown": true }"#).err();
        assert!(matches!(
            error,
            Some(error) if error.code == ErrorCode::failed_precondition()
        ));
    }

    #[test]
    fn rejects_child_collection_without_chunk_collection() {
        // Startup must fail, never deferring to request time.
        let document = VALID_CONFIG.replace("\"chunkCollection\": \"document-chunks\",", "");
        let error = parse_config(&document).err();
        assert!(matches!(
            error,
            Some(error) if error.code == ErrorCode::failed_precondition()
        ));
    }

    #[test]
    fn missing_file_maps_to_failed_precondition() {
        let error = load_config("/definitely/not/here.json").err();
        assert!(matches!(
            error,
            Some(error) if error.code == ErrorCode::failed_precondition()
        ));
    }
}
