//! Retrieval of the NMWG topology document.

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::config::NmwgSource;
use crate::error::TranslateError;
use crate::source::{self, SourceTopology};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },
    #[error("topology service returned {status} for {url}")]
    Status { url: String, status: StatusCode },
    #[error(transparent)]
    Document(#[from] TranslateError),
}

/// Request URL for `domain`: the base URL with `domain` and the configured
/// parameters appended to its query.
pub fn topology_url(source: &NmwgSource, domain: &str) -> Url {
    let mut url = source.base_url.clone();
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("domain", domain);
        for parameter in &source.parameters {
            query.append_pair(&parameter.name, &parameter.value);
        }
    }
    url
}

/// Fetch and read the NMWG topology for `domain`.
pub fn fetch_topology(
    client: &Client,
    source: &NmwgSource,
    domain: &str,
) -> Result<SourceTopology, FetchError> {
    let url = topology_url(source, domain);
    info!(%url, "fetching NMWG topology");

    let request_error = |source| FetchError::Request {
        url: url.to_string(),
        source,
    };
    let response = client
        .get(url.clone())
        .header(ACCEPT, "application/xml")
        .send()
        .map_err(request_error)?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    let body = response.text().map_err(request_error)?;
    Ok(source::parse_document(&body)?)
}
