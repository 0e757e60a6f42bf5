//! Vector query fragmenter: emits one kNN (or join-kNN) fragment per field.

use searchgate_config::{VectorFieldKind, VectorFieldSpec};
use searchgate_domain::SimilarityOptions;
use searchgate_shared::{ErrorCode, ErrorEnvelope, Result};

/// Inputs for one vector fragment.
#[derive(Debug, Clone)]
pub(crate) struct VectorFragmentSpec<'a> {
    /// Physical field binding.
    pub field: &'a VectorFieldSpec,
    /// kNN top-K; must be positive.
    pub top_k: u32,
    /// Parameter slot holding the vector literal.
    pub vector_slot: &'a str,
    /// Similarity constraints, when requested.
    pub similarity: Option<&'a SimilarityOptions>,
    /// Traversal tag filters to apply.
    pub include_tags: &'a [Box<str>],
    /// Traversal tag filters to exclude.
    pub exclude_tags: &'a [Box<str>],
    /// Parameter slot holding the pre-filter clause, when present.
    pub pre_filter_slot: Option<&'a str>,
}

impl VectorFragmentSpec<'_> {
    fn needs_similarity_parser(&self) -> bool {
        self.similarity
            .is_some_and(|similarity| similarity.min_return.is_some() || similarity.min_traverse.is_some())
            || !self.include_tags.is_empty()
            || !self.exclude_tags.is_empty()
            || self.pre_filter_slot.is_some()
    }
}

/// Emit the Solr local-parameters fragment for one vector field.
pub(crate) fn build_vector_fragment(spec: &VectorFragmentSpec<'_>) -> Result<String> {
    if spec.top_k == 0 {
        return Err(ErrorEnvelope::expected(
            ErrorCode::invalid_input(),
            "topK must be greater than zero",
        ));
    }

    let inner = if spec.needs_similarity_parser() {
        // vectorSimilarity traverses by similarity floor rather than a
        // fixed K, and is the only parser accepting tag/pre-filter params.
        let mut local = format!("{{!vectorSimilarity f={}", spec.field.solr_field_name);
        if let Some(similarity) = spec.similarity {
            if let Some(min_return) = similarity.min_return {
                local.push_str(&format!(" minReturn={min_return}"));
            }
            if let Some(min_traverse) = similarity.min_traverse {
                local.push_str(&format!(" minTraverse={min_traverse}"));
            }
        }
        if !spec.include_tags.is_empty() {
            local.push_str(&format!(" includeTags={}", join_tags(spec.include_tags)));
        }
        if !spec.exclude_tags.is_empty() {
            local.push_str(&format!(" excludeTags={}", join_tags(spec.exclude_tags)));
        }
        if let Some(slot) = spec.pre_filter_slot {
            local.push_str(&format!(" preFilter=${slot}"));
        }
        local.push_str(&format!(" v=${}}}", spec.vector_slot));
        local
    } else {
        format!(
            "{{!knn f={} topK={} v=${}}}",
            spec.field.solr_field_name, spec.top_k, spec.vector_slot
        )
    };

    Ok(match spec.field.kind {
        VectorFieldKind::Inline => inner,
        VectorFieldKind::EmbeddedDoc => format!(
            "{{!parent which='{}' score=max}}{inner}",
            spec.field.parent_filter_or_default()
        ),
        VectorFieldKind::ChildCollection => {
            let Some(chunk_collection) = spec.field.chunk_collection.as_deref() else {
                return Err(ErrorEnvelope::invariant(
                    ErrorCode::failed_precondition(),
                    "CHILD_COLLECTION vector field is missing its chunk collection",
                ));
            };
            format!(
                "{{!join method=crossCollection fromIndex={chunk_collection} \
                 from=parent-id to=id score=max}}{inner}"
            )
        },
    })
}

fn join_tags(tags: &[Box<str>]) -> String {
    tags.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(",")
}
