use std::fs;
use std::path::Path;

use reqwest::blocking::Client;
use reqwest::Certificate;
use thiserror::Error;

use crate::config::ClientConfig;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to read CA certificate {path}: {source}")]
    ReadCertificate {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid CA certificate {path}: {source}")]
    Certificate {
        path: String,
        source: reqwest::Error,
    },
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Blocking HTTP client honoring the configured timeout and extra trust root.
pub fn build_client(config: &ClientConfig) -> Result<Client, ClientError> {
    let mut builder = Client::builder().timeout(config.timeout);

    if let Some(path) = &config.ca_certificate {
        builder = builder.add_root_certificate(read_certificate(path)?);
    }

    Ok(builder.build()?)
}

fn read_certificate(path: &Path) -> Result<Certificate, ClientError> {
    let pem = fs::read(path).map_err(|source| ClientError::ReadCertificate {
        path: path.display().to_string(),
        source,
    })?;
    Certificate::from_pem(&pem).map_err(|source| ClientError::Certificate {
        path: path.display().to_string(),
        source,
    })
}
