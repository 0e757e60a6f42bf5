//! Domain primitives with validated constructors.

use searchgate_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validation failures for domain primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    /// `CollectionName` is empty after trimming.
    EmptyCollectionName {
        /// Length of the raw input before trimming.
        input_length: usize,
    },
    /// `CollectionName` violates the allowed pattern.
    InvalidCollectionName {
        /// Trimmed collection name that failed validation.
        input: String,
    },
    /// `VectorFieldName` is empty after trimming.
    EmptyVectorFieldName {
        /// Length of the raw input before trimming.
        input_length: usize,
    },
    /// `VectorFieldName` contains whitespace or Solr-reserved characters.
    InvalidVectorFieldName {
        /// Trimmed vector field name that failed validation.
        input: String,
    },
}

impl PrimitiveError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyCollectionName { .. } | Self::InvalidCollectionName { .. } => {
                ErrorCode::new("domain", "invalid_collection_name")
            },
            Self::EmptyVectorFieldName { .. } | Self::InvalidVectorFieldName { .. } => {
                ErrorCode::new("domain", "invalid_vector_field_name")
            },
        }
    }
}

impl fmt::Display for PrimitiveError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCollectionName { .. } => {
                formatter.write_str("CollectionName must be non-empty")
            },
            Self::InvalidCollectionName { .. } => {
                formatter.write_str("CollectionName must match /^[a-zA-Z][a-zA-Z0-9_-]*$/")
            },
            Self::EmptyVectorFieldName { .. } => {
                formatter.write_str("VectorFieldName must be non-empty")
            },
            Self::InvalidVectorFieldName { .. } => formatter
                .write_str("VectorFieldName must not contain whitespace or reserved characters"),
        }
    }
}

impl std::error::Error for PrimitiveError {}

impl From<PrimitiveError> for ErrorEnvelope {
    fn from(error: PrimitiveError) -> Self {
        let mut envelope = Self::expected(error.error_code(), error.to_string());

        match error {
            PrimitiveError::EmptyCollectionName { input_length }
            | PrimitiveError::EmptyVectorFieldName { input_length } => {
                envelope = envelope.with_metadata("input_length", input_length.to_string());
            },
            PrimitiveError::InvalidCollectionName { input }
            | PrimitiveError::InvalidVectorFieldName { input } => {
                envelope = envelope.with_metadata("input", input);
            },
        }

        envelope
    }
}

/// Identifier for a Solr collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionName(Box<str>);

impl CollectionName {
    /// Parse a collection name that satisfies the allowlist pattern.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, PrimitiveError> {
        let raw = input.as_ref();
        let Some(trimmed) = trimmed_non_empty(raw) else {
            return Err(PrimitiveError::EmptyCollectionName {
                input_length: raw.len(),
            });
        };

        if !is_valid_collection_name(trimmed) {
            return Err(PrimitiveError::InvalidCollectionName {
                input: trimmed.to_owned(),
            });
        }

        Ok(Self(trimmed.to_owned().into_boxed_str()))
    }

    /// Access the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the underlying string.
    #[must_use]
    pub fn into_inner(self) -> Box<str> {
        self.0
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Client-visible name of a logical vector field (e.g. `title_vec`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorFieldName(Box<str>);

impl VectorFieldName {
    /// Parse a logical vector field name.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, PrimitiveError> {
        let raw = input.as_ref();
        let Some(trimmed) = trimmed_non_empty(raw) else {
            return Err(PrimitiveError::EmptyVectorFieldName {
                input_length: raw.len(),
            });
        };

        if trimmed.chars().any(|c| c.is_whitespace() || "{}\"$".contains(c)) {
            return Err(PrimitiveError::InvalidVectorFieldName {
                input: trimmed.to_owned(),
            });
        }

        Ok(Self(trimmed.to_owned().into_boxed_str()))
    }

    /// Access the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for VectorFieldName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for VectorFieldName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

fn trimmed_non_empty(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

fn is_valid_collection_name(input: &str) -> bool {
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
