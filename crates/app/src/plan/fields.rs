//! Field-list (`fl`) projection builder.

use searchgate_config::CollectionConfig;
use searchgate_domain::FieldListOptions;

/// Outcome of merging requested and default projections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldListOutcome {
    /// The `fl` parameter value.
    pub fl: String,
    /// Effective inclusion set in insertion order; empty means "all fields".
    pub effective_inclusions: Vec<Box<str>>,
    /// Fields requested for both inclusion and exclusion (resolved to
    /// exclusion; callers log these as warnings).
    pub conflicts: Vec<Box<str>>,
}

/// Compute the `fl` projection from request overrides merged with defaults.
pub(crate) fn build_field_list(
    request: Option<&FieldListOptions>,
    config: &CollectionConfig,
) -> FieldListOutcome {
    let mut inclusions: Vec<&str> = Vec::new();
    if let Some(options) = request {
        extend_unique(&mut inclusions, options.inclusion_fields.iter().map(AsRef::as_ref));
    }
    extend_unique(
        &mut inclusions,
        config.default_inclusion_fields.iter().map(String::as_str),
    );

    let mut exclusions: Vec<&str> = Vec::new();
    if let Some(options) = request {
        extend_unique(&mut exclusions, options.exclusion_fields.iter().map(AsRef::as_ref));
    }
    extend_unique(
        &mut exclusions,
        config.default_exclusion_fields.iter().map(String::as_str),
    );

    let conflicts: Vec<Box<str>> = inclusions
        .iter()
        .filter(|field| exclusions.contains(field))
        .map(|field| Box::from(*field))
        .collect();

    let effective: Vec<Box<str>> = inclusions
        .iter()
        .filter(|field| !exclusions.contains(field))
        .map(|field| Box::from(*field))
        .collect();

    let fl = if effective.is_empty() {
        "*,score".to_string()
    } else {
        effective
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join(",")
    };

    FieldListOutcome {
        fl,
        effective_inclusions: effective,
        conflicts,
    }
}

fn extend_unique<'a>(target: &mut Vec<&'a str>, values: impl Iterator<Item = &'a str>) {
    for value in values {
        if !value.is_empty() && !target.contains(&value) {
            target.push(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(inclusions: &[&str], exclusions: &[&str]) -> CollectionConfig {
        CollectionConfig {
            default_inclusion_fields: inclusions.iter().map(ToString::to_string).collect(),
            default_exclusion_fields: exclusions.iter().map(ToString::to_string).collect(),
            ..CollectionConfig::default()
        }
    }

    #[test]
    fn empty_merge_falls_back_to_all_fields() {
        let outcome = build_field_list(None, &config(&[], &[]));
        assert_eq!(outcome.fl, "*,score");
        assert!(outcome.effective_inclusions.is_empty());
        assert!(outcome.conflicts.is_empty());
    }

    #[test]
    fn request_inclusions_come_before_defaults() {
        let options = FieldListOptions {
            inclusion_fields: vec!["title".into()],
            exclusion_fields: Vec::new(),
        };
        let outcome = build_field_list(Some(&options), &config(&["id", "title"], &[]));
        assert_eq!(outcome.fl, "title,id");
    }

    #[test]
    fn exclusions_remove_merged_fields() {
        let options = FieldListOptions {
            inclusion_fields: vec!["title".into(), "body".into()],
            exclusion_fields: vec!["body".into()],
        };
        let outcome = build_field_list(Some(&options), &config(&["id"], &[]));
        assert_eq!(outcome.fl, "title,id");
        assert_eq!(outcome.conflicts, vec![Box::from("body")]);
    }

    #[test]
    fn conflicts_resolve_to_exclusion_not_error() {
        let options = FieldListOptions {
            inclusion_fields: vec!["secret".into()],
            exclusion_fields: vec!["secret".into()],
        };
        let outcome = build_field_list(Some(&options), &config(&[], &[]));
        assert_eq!(outcome.fl, "*,score");
        assert_eq!(outcome.conflicts, vec![Box::from("secret")]);
    }

    #[test]
    fn default_exclusions_apply_to_request_inclusions() {
        let options = FieldListOptions {
            inclusion_fields: vec!["title".into(), "internal".into()],
            exclusion_fields: Vec::new(),
        };
        let outcome = build_field_list(Some(&options), &config(&[], &["internal"]));
        assert_eq!(outcome.fl, "title");
    }
}
