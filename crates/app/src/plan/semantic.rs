//! Semantic strategy builder: resolves vector fields, acquires the query
//! embedding, and composes per-field kNN fragments.

use crate::plan::Fragment;
use crate::plan::syntax::{escape_query_text, format_vector_literal, pre_filter_slot, vector_slot, wrap_boost};
use crate::plan::vector::{VectorFragmentSpec, build_vector_fragment};
use searchgate_config::{CollectionConfig, VectorFieldSpec};
use searchgate_ports::EmbeddingPort;
use searchgate_shared::{ErrorCode, ErrorEnvelope, RequestContext, Result};

/// Build the combined fragment for one semantic strategy.
///
/// All resolved vector fields share the request's query embedding, bound
/// once in the strategy's positional `vectorQuery_N` slot.
pub(crate) async fn build_semantic_fragment(
    ctx: &RequestContext,
    config: &CollectionConfig,
    embedding: &dyn EmbeddingPort,
    options: &searchgate_domain::SemanticOptions,
    query_text: &str,
    boost: f32,
    position: usize,
    pre_filter_occurrence: usize,
) -> Result<Fragment> {
    validate_similarity(options)?;
    let fields = resolve_vector_fields(config, options)?;

    ctx.ensure_not_cancelled("plan.semantic.embed")?;
    let vector = embedding.embed(ctx, query_text.into()).await?;

    let slot = vector_slot(position);
    let mut bindings = vec![(
        slot.clone().into_boxed_str(),
        format_vector_literal(vector.as_slice()).into_boxed_str(),
    )];

    let filter_slot = options
        .similarity
        .as_ref()
        .filter(|similarity| !similarity.pre_filter.is_empty())
        .map(|similarity| {
            let name = pre_filter_slot(pre_filter_occurrence);
            let clause = similarity
                .pre_filter
                .iter()
                .map(|clause| format!("{}:{}", clause.field, escape_query_text(&clause.value)))
                .collect::<Vec<String>>()
                .join(" AND ");
            bindings.push((name.clone().into_boxed_str(), clause.into_boxed_str()));
            name
        });

    let mut fragments = Vec::with_capacity(fields.len());
    for field in &fields {
        let spec = VectorFragmentSpec {
            field,
            top_k: options.top_k.unwrap_or(field.default_top_k),
            vector_slot: &slot,
            similarity: options.similarity.as_ref(),
            include_tags: &options.include_tags,
            exclude_tags: &options.exclude_tags,
            pre_filter_slot: filter_slot.as_deref(),
        };
        fragments.push(wrap_boost(build_vector_fragment(&spec)?, boost));
    }

    let query = if fragments.len() == 1 {
        fragments.swap_remove(0)
    } else {
        format!("({})", fragments.join(" OR "))
    };

    Ok(Fragment { query, bindings })
}

fn validate_similarity(options: &searchgate_domain::SemanticOptions) -> Result<()> {
    let has_pre_filter = options
        .similarity
        .as_ref()
        .is_some_and(|similarity| !similarity.pre_filter.is_empty());
    if has_pre_filter && !(options.include_tags.is_empty() && options.exclude_tags.is_empty()) {
        return Err(ErrorEnvelope::expected(
            ErrorCode::invalid_input(),
            "preFilter cannot be combined with includeTags or excludeTags",
        ));
    }
    Ok(())
}

fn resolve_vector_fields<'a>(
    config: &'a CollectionConfig,
    options: &searchgate_domain::SemanticOptions,
) -> Result<Vec<&'a VectorFieldSpec>> {
    if options.vector_fields.is_empty() {
        let fields: Vec<&VectorFieldSpec> = config.vector_fields.values().collect();
        if fields.is_empty() {
            return Err(ErrorEnvelope::expected(
                ErrorCode::invalid_input(),
                "no vector fields are configured for this collection",
            ));
        }
        return Ok(fields);
    }

    let mut fields = Vec::with_capacity(options.vector_fields.len());
    for name in &options.vector_fields {
        let Some(field) = config.vector_field(name.as_str()) else {
            return Err(ErrorEnvelope::expected(
                ErrorCode::invalid_input(),
                format!("unknown vector field {:?}", name.as_str()),
            )
            .with_metadata("vectorField", name.as_str()));
        };
        fields.push(field);
    }
    Ok(fields)
}
