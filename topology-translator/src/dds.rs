//! Publishing documents to a Document Distribution Service.
//!
//! Each document travels inside a DDS `document` envelope whose content is
//! the gzip-compressed, base64-encoded XML. An existing document is replaced
//! with PUT on its own path; a new one is created with POST on the
//! collection.

use std::io::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::info;
use url::Url;
use xml_tree::{WriteError, XmlNode};

use crate::nml::{timestamp, NmlTopology};
use crate::nsa::NsaDocument;

pub const DDS_NAMESPACE: &str = "http://schemas.ogf.org/nsi/2014/02/discovery/types";
pub const DDS_MEDIA_TYPE: &str = "application/vnd.ogf.nsi.dds.v1+xml";
pub const NSA_DOCUMENT_TYPE: &str = "vnd.ogf.nsi.nsa.v1+xml";
pub const TOPOLOGY_DOCUMENT_TYPE: &str = "vnd.ogf.nsi.topology.v2+xml";
const CONTENT_TYPE_GZIP: &str = "application/x-gzip";
const TRANSFER_ENCODING_BASE64: &str = "base64";

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("DDS {op} {url} failed: {source}")]
    Request {
        op: &'static str,
        url: String,
        source: reqwest::Error,
    },
    #[error("DDS {op} {url} returned {status}")]
    Status {
        op: &'static str,
        url: String,
        status: StatusCode,
    },
    #[error("NSA description {0} has not been stamped with a version")]
    Unversioned(String),
    #[error("invalid DDS document url: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] WriteError),
    #[error("failed to compress document: {0}")]
    Compress(#[from] std::io::Error),
}

/// A document ready for the DDS.
#[derive(Debug, Clone, PartialEq)]
pub struct DdsDocument {
    pub nsa: String,
    pub doc_type: &'static str,
    pub id: String,
    pub version: DateTime<Utc>,
    pub expires: DateTime<Utc>,
    pub content: XmlNode,
}

impl DdsDocument {
    pub fn for_nsa(nsa: &NsaDocument) -> Result<Self, PublishError> {
        let (Some(version), Some(expires)) = (nsa.version(), nsa.expires()) else {
            return Err(PublishError::Unversioned(nsa.id().to_string()));
        };
        Ok(Self {
            nsa: nsa.id().to_string(),
            doc_type: NSA_DOCUMENT_TYPE,
            id: nsa.id().to_string(),
            version,
            expires,
            content: nsa.to_xml().clone(),
        })
    }

    pub fn for_topology(nsa_id: &str, topology: &NmlTopology) -> Self {
        Self {
            nsa: nsa_id.to_string(),
            doc_type: TOPOLOGY_DOCUMENT_TYPE,
            id: topology.id.clone(),
            version: topology.version,
            expires: topology.lifetime.end,
            content: topology.to_xml(),
        }
    }

    /// Render the DDS envelope.
    pub fn to_xml(&self) -> Result<XmlNode, PublishError> {
        let encoded = encode_content(&xml_tree::write_document(&self.content)?)?;
        Ok(XmlNode::new("dds:document")
            .with_attribute("xmlns:dds", DDS_NAMESPACE)
            .with_attribute("id", &self.id)
            .with_attribute("version", timestamp(&self.version))
            .with_attribute("expires", timestamp(&self.expires))
            .with_child(XmlNode::new("nsa").with_text(&self.nsa))
            .with_child(XmlNode::new("type").with_text(self.doc_type))
            .with_child(
                XmlNode::new("content")
                    .with_attribute("contentType", CONTENT_TYPE_GZIP)
                    .with_attribute("contentTransferEncoding", TRANSFER_ENCODING_BASE64)
                    .with_text(encoded),
            ))
    }
}

/// Gzip then base64-encode `bytes`.
pub fn encode_content(bytes: &[u8]) -> Result<String, std::io::Error> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(STANDARD.encode(encoder.finish()?))
}

/// DDS REST client rooted at the service base URL.
pub struct DdsClient {
    client: Client,
    base: Url,
}

impl DdsClient {
    pub fn new(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    fn collection_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}/documents",
            self.base.as_str().trim_end_matches('/')
        ))
    }

    /// `{base}/documents/{nsa}/{type}/{id}` with every segment percent-encoded.
    pub fn document_url(&self, document: &DdsDocument) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}/{}/{}/{}",
            self.collection_url()?.as_str(),
            urlencoding::encode(document.nsa.trim()),
            urlencoding::encode(document.doc_type),
            urlencoding::encode(document.id.trim()),
        ))
    }

    /// Create or replace `document`.
    pub fn publish(&self, document: &DdsDocument) -> Result<(), PublishError> {
        let body = xml_tree::write_document(&document.to_xml()?)?;
        let path = self.document_url(document)?;

        let status = self.send("GET", self.client.get(path.clone()), &path)?;
        match status {
            StatusCode::OK => {
                let request = self
                    .client
                    .put(path.clone())
                    .header(CONTENT_TYPE, DDS_MEDIA_TYPE)
                    .body(body);
                expect("PUT", self.send("PUT", request, &path)?, StatusCode::OK, &path)?;
                info!(id = %document.id, kind = document.doc_type, "updated DDS document");
            }
            StatusCode::NOT_FOUND => {
                let collection = self.collection_url()?;
                let request = self
                    .client
                    .post(collection.clone())
                    .header(CONTENT_TYPE, DDS_MEDIA_TYPE)
                    .body(body);
                expect(
                    "POST",
                    self.send("POST", request, &collection)?,
                    StatusCode::CREATED,
                    &collection,
                )?;
                info!(id = %document.id, kind = document.doc_type, "created DDS document");
            }
            status => {
                return Err(PublishError::Status {
                    op: "GET",
                    url: path.to_string(),
                    status,
                })
            }
        }
        Ok(())
    }

    fn send(
        &self,
        op: &'static str,
        request: reqwest::blocking::RequestBuilder,
        url: &Url,
    ) -> Result<StatusCode, PublishError> {
        request
            .header(ACCEPT, DDS_MEDIA_TYPE)
            .send()
            .map(|response| response.status())
            .map_err(|source| PublishError::Request {
                op,
                url: url.to_string(),
                source,
            })
    }
}

fn expect(
    op: &'static str,
    status: StatusCode,
    wanted: StatusCode,
    url: &Url,
) -> Result<(), PublishError> {
    if status == wanted {
        Ok(())
    } else {
        Err(PublishError::Status {
            op,
            url: url.to_string(),
            status,
        })
    }
}
