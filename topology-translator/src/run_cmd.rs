use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use nsi_topology_translator::builder::build_domain;
use nsi_topology_translator::classify::classify_domain;
use nsi_topology_translator::config::Configuration;
use nsi_topology_translator::dds::{DdsClient, DdsDocument};
use nsi_topology_translator::fetch::fetch_topology;
use nsi_topology_translator::http::build_client;
use nsi_topology_translator::ids;
use nsi_topology_translator::mapping::{stp_mappings, write_mapping_file, LocalMapping};
use nsi_topology_translator::nsa::NsaDocument;
use nsi_topology_translator::translate::translate;
use tracing::{info, warn};
use xml_tree::write_file;

use crate::cli::RunArgs;

/// Fetch, translate and publish the configured domain.
///
/// Every fallible step up to and including translation runs before the
/// first file is written or document published.
pub fn run(args: RunArgs) -> Result<()> {
    let config = Configuration::load(&args.basedir, &args.config)
        .context("could not read configuration")?;
    let nsa = NsaDocument::load(&config.nsa_file, config.lifetime)
        .context("could not read NSA description document")?;

    let network_id = nsa.network_id()?.to_string();
    let domain_name = ids::domain_name(&network_id)?;
    let nmwg = config
        .nmwg
        .as_ref()
        .context("configuration has no [nmwg] topology source")?;
    let client = build_client(&config.client)?;

    let source = fetch_topology(&client, nmwg, &domain_name)
        .with_context(|| format!("could not retrieve NMWG topology for {domain_name}"))?;
    let domain = classify_domain(build_domain(&source)?);
    if domain.id != network_id {
        warn!(domain = %domain.id, network_id = %network_id, "NMWG domain differs from NSA networkId");
    }
    let nml = translate(
        &domain,
        config.lifetime,
        &config.service_definitions,
        &config.peerings,
    )
    .with_context(|| format!("could not process topology for networkId {network_id}"))?;

    let local = match &config.mapping_file {
        Some(_) => Some(LocalMapping::new(
            &nsa,
            config.service_type(),
            &network_id,
            stp_mappings(&domain),
        )?),
        None => None,
    };
    let publish = match &config.dds {
        Some(url) => Some((
            DdsClient::new(client.clone(), url.clone()),
            DdsDocument::for_nsa(&nsa)?,
            DdsDocument::for_topology(nsa.id(), &nml),
        )),
        None => None,
    };

    if let Some(path) = &config.topology_file {
        ensure_parent(path)?;
        write_file(&nml.to_xml(), path)
            .with_context(|| format!("failed to write NML topology {}", path.display()))?;
        info!(path = %path.display(), "wrote NML topology");
    }
    if let (Some(path), Some(local)) = (&config.mapping_file, &local) {
        ensure_parent(path)?;
        write_mapping_file(path, local)?;
    }
    if let Some((dds, nsa_document, topology_document)) = publish {
        dds.publish(&nsa_document)
            .with_context(|| format!("could not publish NSA description {}", nsa.id()))?;
        dds.publish(&topology_document)
            .with_context(|| format!("could not publish topology {}", nml.id))?;
    }

    info!(
        network_id = %network_id,
        ports = nml.bidirectional_ports.len(),
        "topology translation complete"
    );
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    Ok(())
}
