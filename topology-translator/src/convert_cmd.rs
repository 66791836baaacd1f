use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use nsi_topology_translator::builder::build_domain;
use nsi_topology_translator::classify::classify_domain;
use nsi_topology_translator::config::Configuration;
use nsi_topology_translator::constants::DEFAULT_LIFETIME_SECS;
use nsi_topology_translator::mapping::{stp_mappings, write_stp_list};
use nsi_topology_translator::service::ServiceDefinition;
use nsi_topology_translator::source::parse_document;
use nsi_topology_translator::translate::translate;
use xml_tree::write_file;

use crate::cli::ConvertArgs;
use crate::path_guard::ensure_output_not_input;

/// Translate a local NMWG file into an NML file.
pub fn run_convert(args: ConvertArgs) -> Result<()> {
    ensure_output_not_input(&args.output, &args.input)?;
    if let Some(mapping) = &args.mapping {
        ensure_output_not_input(mapping, &args.input)?;
    }

    let (definitions, peerings, configured_lifetime) = match &args.config {
        Some(path) => {
            let config = load_config(path)?;
            (config.service_definitions, config.peerings, config.lifetime)
        }
        None => (
            vec![ServiceDefinition::evts_agole()],
            BTreeMap::new(),
            DEFAULT_LIFETIME_SECS,
        ),
    };
    let lifetime = args.lifetime.unwrap_or(configured_lifetime);

    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let source =
        parse_document(&raw).with_context(|| format!("failed to read {}", args.input.display()))?;
    let domain = classify_domain(build_domain(&source)?);
    let nml = translate(&domain, lifetime, &definitions, &peerings)?;

    write_file(&nml.to_xml(), &args.output)
        .with_context(|| format!("failed to write output XML {}", args.output.display()))?;
    if let Some(mapping) = &args.mapping {
        write_stp_list(mapping, &stp_mappings(&domain))?;
    }

    println!(
        "topology={} links={} ports={} output={}",
        nml.id,
        domain.link_count(),
        nml.bidirectional_ports.len(),
        args.output.display()
    );
    Ok(())
}

fn load_config(path: &Path) -> Result<Configuration> {
    let basedir = path.parent().unwrap_or_else(|| Path::new(""));
    let file = path.file_name().map_or(path, Path::new);
    Configuration::load(basedir, file)
        .with_context(|| format!("could not read configuration {}", path.display()))
}
