//! Highlight parameter builder.

use searchgate_domain::{HighlightOptions, SolrParams};

const DEFAULT_HIGHLIGHT_FIELDS: &str = "title,body";
const DEFAULT_PRE_TAG: &str = "<em>";
const DEFAULT_POST_TAG: &str = "</em>";
const DEFAULT_SNIPPETS: u32 = 1;
const DEFAULT_FRAGSIZE: u32 = 100;

/// Emit highlight parameters for a request that asked for highlighting.
///
/// `semanticHighlight` is a response-mapping hint and adds no parameter.
pub(crate) fn apply_highlight(params: &mut SolrParams, options: &HighlightOptions) {
    params.set("hl", "true");

    let fields = if options.fields.is_empty() {
        DEFAULT_HIGHLIGHT_FIELDS.to_string()
    } else {
        options
            .fields
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join(",")
    };
    params.set("hl.fl", fields);

    params.set(
        "hl.simple.pre",
        options.pre_tag.as_deref().unwrap_or(DEFAULT_PRE_TAG),
    );
    params.set(
        "hl.simple.post",
        options.post_tag.as_deref().unwrap_or(DEFAULT_POST_TAG),
    );
    params.set(
        "hl.snippets",
        options
            .snippet_count
            .unwrap_or(DEFAULT_SNIPPETS)
            .max(1)
            .to_string(),
    );
    params.set(
        "hl.fragsize",
        options
            .snippet_size
            .unwrap_or(DEFAULT_FRAGSIZE)
            .max(1)
            .to_string(),
    );
}

/// The highlight fields the response mapper should read, in order.
pub(crate) fn effective_highlight_fields(options: &HighlightOptions) -> Vec<Box<str>> {
    if options.fields.is_empty() {
        DEFAULT_HIGHLIGHT_FIELDS
            .split(',')
            .map(Box::from)
            .collect()
    } else {
        options.fields.clone()
    }
}
