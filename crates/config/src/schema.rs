//! Gateway configuration schema, defaults, validation, and normalization.
//!
//! Configuration parsing is deterministic and safe:
//! - Deserialization uses `serde` (JSON).
//! - Validation is manual and returns typed errors mapped to `ErrorEnvelope`.
//! - Normalization enforces stable ordering for list fields.

use searchgate_domain::{CollectionName, VectorFieldName};
use searchgate_shared::{ErrorCode, ErrorEnvelope, redact_url_credentials};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Current supported configuration schema version.
pub const CURRENT_CONFIG_VERSION: u32 = 1;

const ROWS_MIN: u32 = 1;
const ROWS_MAX: u32 = 10_000;
const TOP_K_MIN: u32 = 1;
const TOP_K_MAX: u32 = 10_000;
const TIMEOUT_MIN_MS: u64 = 100;
const TIMEOUT_MAX_MS: u64 = 600_000;
const CACHE_MAX_ENTRIES_MIN: u32 = 1;
const CACHE_MAX_ENTRIES_MAX: u32 = 1_000_000;

/// Top-level gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct GatewayConfig {
    /// Schema version for forward-compatible migrations.
    pub version: u32,
    /// Collection binding: keyword fields, defaults, vector-field registry.
    pub collection: CollectionConfig,
    /// Embedding service settings.
    pub embedding: EmbeddingServiceConfig,
    /// Solr settings.
    pub solr: SolrConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            collection: CollectionConfig::default(),
            embedding: EmbeddingServiceConfig::default(),
            solr: SolrConfig::default(),
        }
    }
}

/// Retrieval mode of one logical vector field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VectorFieldKind {
    /// Dense vector stored on the primary document.
    Inline,
    /// Dense vector stored on nested child documents of the primary document.
    EmbeddedDoc,
    /// Dense vector stored in a separate chunk collection.
    ChildCollection,
}

impl VectorFieldKind {
    /// Stable identifier used in errors and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "INLINE",
            Self::EmbeddedDoc => "EMBEDDED_DOC",
            Self::ChildCollection => "CHILD_COLLECTION",
        }
    }
}

/// Registry entry binding a logical vector field to its physical layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VectorFieldSpec {
    /// Physical dense-vector field name in Solr.
    pub solr_field_name: String,
    /// Retrieval mode.
    pub kind: VectorFieldKind,
    /// Default kNN top-K when the request does not override it.
    pub default_top_k: u32,
    /// Chunk collection name; required iff `kind` is `CHILD_COLLECTION`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_collection: Option<String>,
    /// Parent filter clause; only meaningful for `EMBEDDED_DOC`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_filter: Option<String>,
    /// Identifier of the embedding backend producing this vector.
    pub embedding_source: String,
}

impl VectorFieldSpec {
    /// Parent filter applied for `EMBEDDED_DOC` fields.
    #[must_use]
    pub fn parent_filter_or_default(&self) -> &str {
        self.parent_filter
            .as_deref()
            .unwrap_or("content_type:parent")
    }
}

/// Collection binding: keyword fields, projection defaults, vector registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct CollectionConfig {
    /// Solr collection targeted by searches.
    pub collection_name: String,
    /// Ordered default field list for keyword edismax queries.
    pub keyword_query_fields: Vec<String>,
    /// Baseline inclusion fields for the `fl` projection.
    pub default_inclusion_fields: Vec<String>,
    /// Baseline exclusion fields for the `fl` projection.
    pub default_exclusion_fields: Vec<String>,
    /// Rows returned when the request omits `numResults`.
    pub default_rows: u32,
    /// Sort clause applied when the request omits `sort`.
    pub default_sort: String,
    /// Logical vector fields keyed by client-visible name.
    pub vector_fields: BTreeMap<String, VectorFieldSpec>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            collection_name: String::new(),
            keyword_query_fields: Vec::new(),
            default_inclusion_fields: Vec::new(),
            default_exclusion_fields: Vec::new(),
            default_rows: 10,
            default_sort: "score desc".to_string(),
            vector_fields: BTreeMap::new(),
        }
    }
}

impl CollectionConfig {
    /// Look up a vector field spec by logical name.
    #[must_use]
    pub fn vector_field(&self, name: &str) -> Option<&VectorFieldSpec> {
        self.vector_fields.get(name)
    }

    /// All configured logical vector field names in deterministic order.
    pub fn vector_field_names(&self) -> impl Iterator<Item = &str> {
        self.vector_fields.keys().map(String::as_str)
    }
}

/// Bounds for the in-process embedding cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct EmbeddingCacheConfig {
    /// Whether the cache is enabled.
    pub enabled: bool,
    /// Maximum number of cached embeddings.
    pub max_entries: u32,
}

impl Default for EmbeddingCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 10_000,
        }
    }
}

/// Embedding service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct EmbeddingServiceConfig {
    /// Base URL of the embedding service.
    pub address: String,
    /// Optional model name forwarded to the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Optional bearer token for the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Cache bounds.
    pub cache: EmbeddingCacheConfig,
}

impl Default for EmbeddingServiceConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            model: None,
            api_key: None,
            timeout_ms: 10_000,
            cache: EmbeddingCacheConfig::default(),
        }
    }
}

/// Solr settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct SolrConfig {
    /// Base URL of the Solr service (e.g. `http://localhost:8983`).
    pub url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for SolrConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_ms: 15_000,
        }
    }
}

impl GatewayConfig {
    /// Validate and normalize the config.
    pub fn validate_and_normalize(mut self) -> Result<ValidatedGatewayConfig, ConfigSchemaError> {
        self.validate_version()?;

        self.collection.normalize();
        self.collection.validate()?;
        self.embedding.validate()?;
        self.solr.validate()?;

        Ok(ValidatedGatewayConfig { raw: self })
    }

    const fn validate_version(&self) -> Result<(), ConfigSchemaError> {
        if self.version != CURRENT_CONFIG_VERSION {
            return Err(ConfigSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_CONFIG_VERSION,
            });
        }
        Ok(())
    }
}

impl CollectionConfig {
    fn normalize(&mut self) {
        normalize_list(&mut self.keyword_query_fields);
        normalize_list(&mut self.default_inclusion_fields);
        normalize_list(&mut self.default_exclusion_fields);
        self.collection_name = self.collection_name.trim().to_string();
        self.default_sort = self.default_sort.trim().to_string();
    }

    fn validate(&self) -> Result<(), ConfigSchemaError> {
        CollectionName::parse(&self.collection_name).map_err(|_| {
            ConfigSchemaError::InvalidName {
                section: "collection",
                field: "collectionName",
                input: self.collection_name.clone(),
            }
        })?;

        bounded_u32(
            "collection",
            "defaultRows",
            self.default_rows,
            ROWS_MIN,
            ROWS_MAX,
        )?;

        if self.default_sort.is_empty() {
            return Err(ConfigSchemaError::MissingValue {
                section: "collection",
                field: "defaultSort",
            });
        }

        for (name, spec) in &self.vector_fields {
            VectorFieldName::parse(name).map_err(|_| ConfigSchemaError::InvalidName {
                section: "collection.vectorFields",
                field: "name",
                input: name.clone(),
            })?;
            spec.validate(name)?;
        }

        Ok(())
    }
}

impl VectorFieldSpec {
    fn validate(&self, name: &str) -> Result<(), ConfigSchemaError> {
        if self.solr_field_name.trim().is_empty() {
            return Err(ConfigSchemaError::MissingVectorFieldValue {
                name: name.to_owned(),
                field: "solrFieldName",
            });
        }
        if self.embedding_source.trim().is_empty() {
            return Err(ConfigSchemaError::MissingVectorFieldValue {
                name: name.to_owned(),
                field: "embeddingSource",
            });
        }

        bounded_u32(
            "collection.vectorFields",
            "defaultTopK",
            self.default_top_k,
            TOP_K_MIN,
            TOP_K_MAX,
        )?;

        let chunk = self
            .chunk_collection
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty());
        match self.kind {
            VectorFieldKind::ChildCollection => {
                let Some(chunk) = chunk else {
                    return Err(ConfigSchemaError::ChunkCollectionRequired {
                        name: name.to_owned(),
                    });
                };
                CollectionName::parse(chunk).map_err(|_| ConfigSchemaError::InvalidName {
                    section: "collection.vectorFields",
                    field: "chunkCollection",
                    input: chunk.to_owned(),
                })?;
            },
            VectorFieldKind::Inline | VectorFieldKind::EmbeddedDoc => {
                if chunk.is_some() {
                    return Err(ConfigSchemaError::ChunkCollectionForbidden {
                        name: name.to_owned(),
                        kind: self.kind,
                    });
                }
            },
        }

        if self.parent_filter.is_some() && self.kind != VectorFieldKind::EmbeddedDoc {
            return Err(ConfigSchemaError::ParentFilterForbidden {
                name: name.to_owned(),
                kind: self.kind,
            });
        }

        Ok(())
    }
}

impl EmbeddingServiceConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        validate_url("embedding", "address", &self.address)?;
        bounded_u64(
            "embedding",
            "timeoutMs",
            self.timeout_ms,
            TIMEOUT_MIN_MS,
            TIMEOUT_MAX_MS,
        )?;
        if self.cache.enabled {
            bounded_u32(
                "embedding.cache",
                "maxEntries",
                self.cache.max_entries,
                CACHE_MAX_ENTRIES_MIN,
                CACHE_MAX_ENTRIES_MAX,
            )?;
        }
        Ok(())
    }
}

impl SolrConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        validate_url("solr", "url", &self.url)?;
        bounded_u64(
            "solr",
            "timeoutMs",
            self.timeout_ms,
            TIMEOUT_MIN_MS,
            TIMEOUT_MAX_MS,
        )
    }
}

/// Validated config wrapper.
#[derive(Debug, Clone)]
pub struct ValidatedGatewayConfig {
    raw: GatewayConfig,
}

impl ValidatedGatewayConfig {
    /// Borrow the raw config.
    #[must_use]
    pub const fn as_ref(&self) -> &GatewayConfig {
        &self.raw
    }

    /// Consume the wrapper and return the raw config.
    #[must_use]
    pub fn into_inner(self) -> GatewayConfig {
        self.raw
    }
}

impl AsRef<GatewayConfig> for ValidatedGatewayConfig {
    fn as_ref(&self) -> &GatewayConfig {
        &self.raw
    }
}

impl std::ops::Deref for ValidatedGatewayConfig {
    type Target = GatewayConfig;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

/// Typed configuration validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSchemaError {
    /// Unsupported schema version.
    UnsupportedVersion {
        /// Version found in the document.
        found: u32,
        /// Version this build supports.
        supported: u32,
    },
    /// A required value is missing or empty.
    MissingValue {
        /// Config section.
        section: &'static str,
        /// Field name.
        field: &'static str,
    },
    /// A required vector-field attribute is missing or empty.
    MissingVectorFieldValue {
        /// Logical vector field name.
        name: String,
        /// Attribute name.
        field: &'static str,
    },
    /// A numeric value is outside its allowed range.
    OutOfRange {
        /// Config section.
        section: &'static str,
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: u64,
        /// Allowed minimum.
        min: u64,
        /// Allowed maximum.
        max: u64,
    },
    /// A URL failed to parse.
    InvalidUrl {
        /// Config section.
        section: &'static str,
        /// Field name.
        field: &'static str,
        /// Sanitized offending URL.
        url: String,
    },
    /// A name failed its allowlist pattern.
    InvalidName {
        /// Config section.
        section: &'static str,
        /// Field name.
        field: &'static str,
        /// Offending input.
        input: String,
    },
    /// `chunkCollection` missing for a `CHILD_COLLECTION` field.
    ChunkCollectionRequired {
        /// Logical vector field name.
        name: String,
    },
    /// `chunkCollection` set for a field kind that has no chunk collection.
    ChunkCollectionForbidden {
        /// Logical vector field name.
        name: String,
        /// Offending kind.
        kind: VectorFieldKind,
    },
    /// `parentFilter` set for a field kind that has no parent documents.
    ParentFilterForbidden {
        /// Logical vector field name.
        name: String,
        /// Offending kind.
        kind: VectorFieldKind,
    },
}

impl fmt::Display for ConfigSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, supported } => write!(
                formatter,
                "unsupported config version {found} (supported: {supported})"
            ),
            Self::MissingValue { section, field } => {
                write!(formatter, "{section}.{field} must be set and non-empty")
            },
            Self::MissingVectorFieldValue { name, field } => write!(
                formatter,
                "vectorFields.{name}.{field} must be set and non-empty"
            ),
            Self::OutOfRange {
                section,
                field,
                value,
                min,
                max,
            } => write!(
                formatter,
                "{section}.{field} = {value} is outside [{min}, {max}]"
            ),
            Self::InvalidUrl {
                section,
                field,
                url,
            } => write!(formatter, "{section}.{field} is not a valid URL: {url}"),
            Self::InvalidName {
                section,
                field,
                input,
            } => write!(formatter, "{section}.{field} is invalid: {input:?}"),
            Self::ChunkCollectionRequired { name } => write!(
                formatter,
                "vectorFields.{name}: chunkCollection is required for kind CHILD_COLLECTION"
            ),
            Self::ChunkCollectionForbidden { name, kind } => write!(
                formatter,
                "vectorFields.{name}: chunkCollection is not allowed for kind {}",
                kind.as_str()
            ),
            Self::ParentFilterForbidden { name, kind } => write!(
                formatter,
                "vectorFields.{name}: parentFilter is not allowed for kind {}",
                kind.as_str()
            ),
        }
    }
}

impl std::error::Error for ConfigSchemaError {}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        Self::expected(ErrorCode::failed_precondition(), error.to_string())
    }
}

fn normalize_list(values: &mut Vec<String>) {
    let mut seen = Vec::new();
    values.retain_mut(|value| {
        *value = value.trim().to_string();
        if value.is_empty() || seen.contains(value) {
            false
        } else {
            seen.push(value.clone());
            true
        }
    });
}

fn bounded_u32(
    section: &'static str,
    field: &'static str,
    value: u32,
    min: u32,
    max: u32,
) -> Result<(), ConfigSchemaError> {
    if value < min || value > max {
        return Err(ConfigSchemaError::OutOfRange {
            section,
            field,
            value: u64::from(value),
            min: u64::from(min),
            max: u64::from(max),
        });
    }
    Ok(())
}

fn bounded_u64(
    section: &'static str,
    field: &'static str,
    value: u64,
    min: u64,
    max: u64,
) -> Result<(), ConfigSchemaError> {
    if value < min || value > max {
        return Err(ConfigSchemaError::OutOfRange {
            section,
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn validate_url(
    section: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ConfigSchemaError> {
    if value.trim().is_empty() {
        return Err(ConfigSchemaError::MissingValue { section, field });
    }
    // Credentials are stripped before the URL can surface in an error.
    Url::parse(value).map_err(|_| ConfigSchemaError::InvalidUrl {
        section,
        field,
        url: redact_url_credentials(value),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.collection.collection_name = "documents".to_string();
        config.collection.keyword_query_fields = vec!["title".to_string(), "body".to_string()];
        config.embedding.address = "http://localhost:9000".to_string();
        config.solr.url = "http://localhost:8983".to_string();
        config
    }

    fn inline_field(solr_field_name: &str) -> VectorFieldSpec {
        VectorFieldSpec {
            solr_field_name: solr_field_name.to_string(),
            kind: VectorFieldKind::Inline,
            default_top_k: 30,
            chunk_collection: None,
            parent_filter: None,
            embedding_source: "default".to_string(),
        }
    }

    #[test]
    fn valid_config_passes() {
        let mut config = base_config();
        config
            .collection
            .vector_fields
            .insert("title_vec".to_string(), inline_field("title-vector"));

        assert!(config.validate_and_normalize().is_ok());
    }

    #[test]
    fn version_mismatch_fails() {
        let mut config = base_config();
        config.version = 99;
        assert!(matches!(
            config.validate_and_normalize().err(),
            Some(ConfigSchemaError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn chunk_collection_required_for_child_collection() {
        let mut config = base_config();
        config.collection.vector_fields.insert(
            "chunks_vec".to_string(),
            VectorFieldSpec {
                kind: VectorFieldKind::ChildCollection,
                ..inline_field("chunk-vector")
            },
        );

        assert!(matches!(
            config.validate_and_normalize().err(),
            Some(ConfigSchemaError::ChunkCollectionRequired { name }) if name == "chunks_vec"
        ));
    }

    #[test]
    fn chunk_collection_forbidden_for_inline() {
        let mut config = base_config();
        config.collection.vector_fields.insert(
            "title_vec".to_string(),
            VectorFieldSpec {
                chunk_collection: Some("chunks".to_string()),
                ..inline_field("title-vector")
            },
        );

        assert!(matches!(
            config.validate_and_normalize().err(),
            Some(ConfigSchemaError::ChunkCollectionForbidden { .. })
        ));
    }

    #[test]
    fn parent_filter_forbidden_for_inline() {
        let mut config = base_config();
        config.collection.vector_fields.insert(
            "title_vec".to_string(),
            VectorFieldSpec {
                parent_filter: Some("content_type:parent".to_string()),
                ..inline_field("title-vector")
            },
        );

        assert!(matches!(
            config.validate_and_normalize().err(),
            Some(ConfigSchemaError::ParentFilterForbidden { .. })
        ));
    }

    #[test]
    fn zero_top_k_fails() {
        let mut config = base_config();
        config.collection.vector_fields.insert(
            "title_vec".to_string(),
            VectorFieldSpec {
                default_top_k: 0,
                ..inline_field("title-vector")
            },
        );

        assert!(matches!(
            config.validate_and_normalize().err(),
            Some(ConfigSchemaError::OutOfRange { field: "defaultTopK", .. })
        ));
    }

    #[test]
    fn empty_solr_field_name_fails() {
        let mut config = base_config();
        config
            .collection
            .vector_fields
            .insert("title_vec".to_string(), inline_field("  "));

        assert!(matches!(
            config.validate_and_normalize().err(),
            Some(ConfigSchemaError::MissingVectorFieldValue { field: "solrFieldName", .. })
        ));
    }

    #[test]
    fn keyword_fields_normalize_and_deduplicate() {
        let mut config = base_config();
        config.collection.keyword_query_fields = vec![
            " title ".to_string(),
            "body".to_string(),
            "title".to_string(),
            "".to_string(),
        ];

        let validated = config.validate_and_normalize().ok();
        let Some(validated) = validated else {
            panic!("expected valid config");
        };
        assert_eq!(
            validated.collection.keyword_query_fields,
            vec!["title".to_string(), "body".to_string()]
        );
    }

    #[test]
    fn invalid_embedding_url_fails() {
        let mut config = base_config();
        config.embedding.address = "not a url".to_string();

        assert!(matches!(
            config.validate_and_normalize().err(),
            Some(ConfigSchemaError::InvalidUrl { section: "embedding", .. })
        ));
    }

    #[test]
    fn default_sort_must_be_non_empty() {
        let mut config = base_config();
        config.collection.default_sort = "  ".to_string();

        assert!(matches!(
            config.validate_and_normalize().err(),
            Some(ConfigSchemaError::MissingValue { field: "defaultSort", .. })
        ));
    }

    #[test]
    fn schema_error_maps_to_failed_precondition() {
        let error = ConfigSchemaError::MissingValue {
            section: "solr",
            field: "url",
        };
        let envelope = ErrorEnvelope::from(error);
        assert_eq!(envelope.code, ErrorCode::failed_precondition());
    }

    #[test]
    fn invalid_url_errors_never_echo_credentials() {
        let mut config = base_config();
        config.solr.url = "http ://user:hunter2@host.example/solr".to_string();

        let error = config.validate_and_normalize().err();
        let Some(ConfigSchemaError::InvalidUrl { url, .. }) = error else {
            panic!("expected an InvalidUrl error");
        };
        assert!(!url.contains("hunter2"));
    }
}
