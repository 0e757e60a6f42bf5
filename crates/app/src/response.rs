//! Response mapping: Solr select payload → normalized search response.

use crate::plan::FieldListOutcome;
use crate::plan::highlight::effective_highlight_fields;
use searchgate_domain::{
    FacetCount, FacetResults, SearchRequest, SearchResponse, SearchResult,
};
use searchgate_ports::{LogFields, LoggerPort, SolrDocument, SolrSelectResponse};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Map one Solr select response into the API result shape.
///
/// Documents without a usable `id` are skipped with a warning; they never
/// fail the search.
#[must_use]
pub fn map_response(
    request: &SearchRequest,
    field_list: &FieldListOutcome,
    solr: SolrSelectResponse,
    logger: Option<&dyn LoggerPort>,
) -> SearchResponse {
    let highlight_fields = request
        .highlight
        .as_ref()
        .map(effective_highlight_fields)
        .unwrap_or_default();

    let mut results = Vec::with_capacity(solr.docs.len());
    for doc in solr.docs {
        let Some(id) = document_id(&doc) else {
            if let Some(logger) = logger {
                let mut fields = LogFields::new();
                fields.insert("reason".into(), Value::from("missing id field"));
                logger.warn(
                    "search.response.doc_skipped",
                    "Skipping Solr document without id",
                    Some(fields),
                );
            }
            continue;
        };

        let matched_text = collect_fragments(&solr.highlighting, &id, &highlight_fields);
        let snippet = matched_text
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join(" ... ")
            .into_boxed_str();

        results.push(SearchResult {
            id,
            fields: project_fields(doc, &field_list.effective_inclusions),
            snippet,
            matched_text,
        });
    }

    if let Some(limit) = request.num_results {
        results.truncate(limit as usize);
    }

    let mut facets: BTreeMap<Box<str>, FacetResults> = BTreeMap::new();
    for named in solr.facets.fields {
        merge_facet(&mut facets, named.name, named.counts);
    }
    for (query, count) in solr.facets.queries {
        merge_facet(&mut facets, query.clone(), vec![(query, count)]);
    }
    for named in solr.facets.ranges {
        merge_facet(&mut facets, named.name, named.counts);
    }

    SearchResponse {
        results,
        facets,
        total_results: solr.num_found,
        q_time_ms: solr.q_time_ms,
        time_of_search_ms: now_epoch_ms(),
    }
}

fn document_id(doc: &SolrDocument) -> Option<Box<str>> {
    match doc.get("id")? {
        Value::String(id) => Some(id.as_str().into()),
        Value::Number(id) => Some(id.to_string().into_boxed_str()),
        _ => None,
    }
}

fn project_fields(
    doc: SolrDocument,
    effective_inclusions: &[Box<str>],
) -> BTreeMap<Box<str>, Value> {
    if effective_inclusions.is_empty() {
        return doc;
    }
    doc.into_iter()
        .filter(|(name, _)| effective_inclusions.iter().any(|field| field == name))
        .collect()
}

fn collect_fragments(
    highlighting: &searchgate_ports::SolrHighlighting,
    id: &str,
    highlight_fields: &[Box<str>],
) -> Vec<Box<str>> {
    let Some(per_field) = highlighting.get(id) else {
        return Vec::new();
    };
    let mut fragments = Vec::new();
    for field in highlight_fields {
        if let Some(field_fragments) = per_field.get(field) {
            fragments.extend(field_fragments.iter().cloned());
        }
    }
    fragments
}

fn merge_facet(
    facets: &mut BTreeMap<Box<str>, FacetResults>,
    name: Box<str>,
    counts: Vec<(Box<str>, u64)>,
) {
    let entry = facets.entry(name).or_default();
    entry.counts.extend(
        counts
            .into_iter()
            .map(|(value, count)| FacetCount { value, count }),
    );
}

fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|duration| u64::try_from(duration.as_millis()).ok())
        .unwrap_or_default()
}
