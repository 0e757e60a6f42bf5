//! Solr HTTP adapter.

mod error;
mod http;

pub use error::{SolrErrorContext, map_solr_http_error, map_solr_transport_error};
pub use http::{SolrHttpClient, SolrHttpConfig};
