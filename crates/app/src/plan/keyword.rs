//! Keyword (edismax) strategy builder.

use crate::plan::Fragment;
use crate::plan::syntax::{escape_query_text, keyword_slot, wrap_boost};
use searchgate_config::CollectionConfig;
use searchgate_domain::KeywordOptions;
use searchgate_shared::{ErrorCode, ErrorEnvelope, Result};

/// Build the edismax fragment for one keyword strategy.
///
/// The user text is stored in a positional parameter slot and referenced
/// via `v=$slot` so the fragment itself stays free of user input.
pub(crate) fn build_keyword_fragment(
    config: &CollectionConfig,
    options: &KeywordOptions,
    query_text: &str,
    boost: f32,
    position: usize,
) -> Result<Fragment> {
    let fields: Vec<&str> = if options.override_fields_to_query.is_empty() {
        config
            .keyword_query_fields
            .iter()
            .map(String::as_str)
            .collect()
    } else {
        options
            .override_fields_to_query
            .iter()
            .map(AsRef::as_ref)
            .collect()
    };

    if fields.is_empty() {
        return Err(ErrorEnvelope::expected(
            ErrorCode::invalid_input(),
            "no keyword query fields configured and no override provided",
        ));
    }

    let text = options
        .query_text_override
        .as_deref()
        .unwrap_or(query_text);
    let slot = keyword_slot(position);
    let fragment = format!(
        "{{!edismax q.op={} qf=\"{}\" v=${slot}}}",
        options.keyword_logical_operator.as_solr(),
        fields.join(" "),
    );

    Ok(Fragment {
        query: wrap_boost(fragment, boost),
        bindings: vec![(
            slot.into_boxed_str(),
            escape_query_text(text).into_boxed_str(),
        )],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use searchgate_domain::KeywordOperator;

    fn config_with_fields(fields: &[&str]) -> CollectionConfig {
        CollectionConfig {
            keyword_query_fields: fields.iter().map(ToString::to_string).collect(),
            ..CollectionConfig::default()
        }
    }

    #[test]
    fn builds_unboosted_edismax_fragment() -> Result<()> {
        let config = config_with_fields(&["title", "body"]);
        let fragment = build_keyword_fragment(
            &config,
            &KeywordOptions::default(),
            "hello world",
            0.0,
            1,
        )?;

        assert_eq!(
            fragment.query,
            "{!edismax q.op=OR qf=\"title body\" v=$keywordQuery_1}"
        );
        assert_eq!(
            fragment.bindings,
            vec![(Box::from("keywordQuery_1"), Box::from("hello\\ world"))]
        );
        Ok(())
    }

    #[test]
    fn boost_wraps_with_scale() -> Result<()> {
        let config = config_with_fields(&["title"]);
        let fragment =
            build_keyword_fragment(&config, &KeywordOptions::default(), "hello", 1.5, 2)?;
        assert_eq!(
            fragment.query,
            "scale({!edismax q.op=OR qf=\"title\" v=$keywordQuery_2},0,1)^1.50"
        );
        Ok(())
    }

    #[test]
    fn override_fields_take_precedence() -> Result<()> {
        let config = config_with_fields(&["title"]);
        let options = KeywordOptions {
            override_fields_to_query: vec!["abstract".into(), "notes".into()],
            keyword_logical_operator: KeywordOperator::And,
            ..KeywordOptions::default()
        };
        let fragment = build_keyword_fragment(&config, &options, "hello", 0.0, 1)?;
        assert!(fragment.query.contains("q.op=AND"));
        assert!(fragment.query.contains("qf=\"abstract notes\""));
        Ok(())
    }

    #[test]
    fn query_text_override_replaces_request_text() -> Result<()> {
        let config = config_with_fields(&["title"]);
        let options = KeywordOptions {
            query_text_override: Some("other".into()),
            ..KeywordOptions::default()
        };
        let fragment = build_keyword_fragment(&config, &options, "hello", 0.0, 1)?;
        assert_eq!(
            fragment.bindings[0],
            (Box::from("keywordQuery_1"), Box::from("other"))
        );
        Ok(())
    }

    #[test]
    fn empty_field_sets_are_rejected() {
        let config = config_with_fields(&[]);
        let error =
            build_keyword_fragment(&config, &KeywordOptions::default(), "hello", 0.0, 1).err();
        assert!(matches!(
            error,
            Some(error) if error.code == ErrorCode::invalid_input()
        ));
    }
}
