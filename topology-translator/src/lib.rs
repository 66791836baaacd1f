//! NMWG CtrlPlane to NSI NML topology translation.
//!
//! A network domain describes itself in the legacy NMWG control plane schema;
//! the NSI federation discovers ports and services from NML documents. This
//! library reads the former, classifies every link and writes the latter,
//! together with the identifier mapping used by the NSI bridge.
//!
//! # Architecture
//!
//! ## Translation
//!
//! - [`ids`]: NMWG to NSI identifier normalization
//! - [`source`]: typed reading of the NMWG document tree
//! - [`builder`]: flattening of source records into one [`model::Domain`]
//! - [`classify`]: internal, external and client link roles
//! - [`service`]: service definitions and include/exclude matching
//! - [`translate`]: construction of the [`nml::NmlTopology`]
//!
//! ## Surrounding services
//!
//! - [`config`]: TOML configuration
//! - [`nsa`]: NSA description document
//! - [`mapping`]: STP to source id mapping file
//! - [`fetch`]: NMWG topology retrieval
//! - [`dds`]: publication to a Document Distribution Service
//!
//! # Workflow
//!
//! 1. **Read** the NMWG document into a [`source::SourceTopology`]
//! 2. **Build** the [`model::Domain`] with normalized link ids
//! 3. **Classify** each link by its remote link id
//! 4. **Translate** client, external and unclassified links into NML ports
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use nsi_topology_translator::{builder, classify, service::ServiceDefinition, source, translate};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let xml = std::fs::read_to_string("nmwg.xml")?;
//! let domain = classify::classify_domain(builder::build_domain(&source::parse_document(&xml)?)?);
//! let nml = translate::translate(&domain, 86_400, &[ServiceDefinition::evts_agole()], &BTreeMap::new())?;
//! let bytes = xml_tree::write_document(&nml.to_xml())?;
//! # let _ = bytes;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod classify;
pub mod config;
pub mod constants;
pub mod dds;
pub mod error;
pub mod fetch;
pub mod http;
pub mod ids;
pub mod mapping;
pub mod model;
pub mod nml;
pub mod nsa;
pub mod service;
pub mod source;
pub mod translate;
