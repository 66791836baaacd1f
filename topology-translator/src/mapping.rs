//! JSON mapping between NSI STP identifiers and the source link identifiers.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::model::Domain;
use crate::nsa::NsaDocument;

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("no connection service provider version in NSA description {nsa}")]
    MissingProviderVersion { nsa: String },
    #[error("no service type configured for NSA {nsa}")]
    MissingServiceType { nsa: String },
    #[error("failed to serialize identifier mapping: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write mapping file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// One NSI STP id and the source link id it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StpMapping {
    pub stp_id: String,
    pub oscars_id: String,
}

/// The `local` section of the mapping file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalMapping {
    pub nsa_id: String,
    pub protocol_version: String,
    pub service_type: String,
    pub network_id: String,
    pub stps: Vec<StpMapping>,
}

#[derive(Serialize)]
struct MappingFile<'a> {
    local: &'a LocalMapping,
}

impl LocalMapping {
    /// Assemble the mapping for `nsa`; the provider version and service
    /// type are both required.
    pub fn new(
        nsa: &NsaDocument,
        service_type: Option<&str>,
        network_id: &str,
        stps: Vec<StpMapping>,
    ) -> Result<Self, MappingError> {
        let protocol_version =
            nsa.provider_version()
                .ok_or_else(|| MappingError::MissingProviderVersion {
                    nsa: nsa.id().to_string(),
                })?;
        let service_type = service_type.ok_or_else(|| MappingError::MissingServiceType {
            nsa: nsa.id().to_string(),
        })?;

        Ok(Self {
            nsa_id: nsa.id().to_string(),
            protocol_version: protocol_version.to_string(),
            service_type: service_type.to_string(),
            network_id: network_id.to_string(),
            stps,
        })
    }
}

/// Mapping for every link in the domain, whatever its role, in id order.
pub fn stp_mappings(domain: &Domain) -> Vec<StpMapping> {
    domain
        .links()
        .map(|link| StpMapping {
            stp_id: link.id.clone(),
            oscars_id: link.original_id.clone(),
        })
        .collect()
}

/// Write `{"local": {...}}` to `path`.
pub fn write_mapping_file(path: &Path, local: &LocalMapping) -> Result<(), MappingError> {
    let json = serde_json::to_string_pretty(&MappingFile { local })?;
    write(path, json)?;
    info!(path = %path.display(), stps = local.stps.len(), "wrote identifier mapping");
    Ok(())
}

/// Write a bare JSON array of STP mappings to `path`.
pub fn write_stp_list(path: &Path, stps: &[StpMapping]) -> Result<(), MappingError> {
    let json = serde_json::to_string_pretty(stps)?;
    write(path, json)
}

fn write(path: &Path, json: String) -> Result<(), MappingError> {
    fs::write(path, json + "\n").map_err(|source| MappingError::Io {
        path: path.display().to_string(),
        source,
    })
}
