//! Facet parameter builder.

use searchgate_domain::{FacetRequest, SolrParams};

/// Translate facet requests into Solr facet parameters, in request order.
///
/// `facet=true` is emitted exactly once, and only when at least one facet
/// was requested.
pub(crate) fn apply_facets(params: &mut SolrParams, requests: &[FacetRequest]) {
    if requests.is_empty() {
        return;
    }
    params.set("facet", "true");

    for request in requests {
        match request {
            FacetRequest::Field(field) => {
                params.append("facet.field", field.field.as_ref());
                if let Some(limit) = field.limit {
                    params.append(
                        format!("f.{}.facet.limit", field.field),
                        limit.to_string(),
                    );
                }
                if let Some(missing) = field.missing {
                    params.append(
                        format!("f.{}.facet.missing", field.field),
                        missing.to_string(),
                    );
                }
                if let Some(prefix) = &field.prefix {
                    params.append(
                        format!("f.{}.facet.prefix", field.field),
                        prefix.as_ref(),
                    );
                }
            },
            FacetRequest::Range(range) => {
                params.append("facet.range", range.field.as_ref());
                params.append(
                    format!("f.{}.facet.range.start", range.field),
                    range.start.as_ref(),
                );
                params.append(
                    format!("f.{}.facet.range.end", range.field),
                    range.end.as_ref(),
                );
                params.append(
                    format!("f.{}.facet.range.gap", range.field),
                    range.gap.as_ref(),
                );
                if let Some(hardend) = range.hardend {
                    params.append(
                        format!("f.{}.facet.range.hardend", range.field),
                        hardend.to_string(),
                    );
                }
                if let Some(other) = &range.other {
                    params.append(
                        format!("f.{}.facet.range.other", range.field),
                        other.as_ref(),
                    );
                }
            },
            FacetRequest::Query(query) => {
                params.append("facet.query", query.query.as_ref());
            },
        }
    }
}
