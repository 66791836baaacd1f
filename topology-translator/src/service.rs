//! Service definitions and the include/exclude rules that attach links to them.

use serde::Deserialize;

use crate::constants::{
    NML_ETHERNET, NML_ETHERNET_VLAN, SD_EVTS_AGOLE_ID, SD_EVTS_AGOLE_NAME, SD_EVTS_AGOLE_TYPE,
};
use crate::ids;
use crate::nml::SwitchingService;

/// A configured NSI service definition.
///
/// `include` and `exclude` hold plain substrings tested against normalized
/// link ids.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceDefinition {
    pub id: String,
    pub name: String,
    pub service_type: String,
    pub encoding: String,
    pub label_type: String,
    #[serde(default)]
    pub label_swapping: bool,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl ServiceDefinition {
    /// The GLIF automated GOLE Ethernet VLAN transfer service, used when no
    /// definitions are configured.
    pub fn evts_agole() -> Self {
        Self {
            id: SD_EVTS_AGOLE_ID.to_string(),
            name: SD_EVTS_AGOLE_NAME.to_string(),
            service_type: SD_EVTS_AGOLE_TYPE.to_string(),
            encoding: NML_ETHERNET.to_string(),
            label_type: NML_ETHERNET_VLAN.to_string(),
            label_swapping: false,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

/// A service definition paired with the switching service generated for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDefinitionMapping<'a> {
    pub definition: &'a ServiceDefinition,
    pub switching_service: SwitchingService,
}

impl<'a> ServiceDefinitionMapping<'a> {
    /// Create the empty switching service for `definition` within `network_id`.
    pub fn new(network_id: &str, definition: &'a ServiceDefinition) -> Self {
        Self {
            definition,
            switching_service: SwitchingService {
                id: ids::switching_service_id(network_id, &definition.id),
                encoding: definition.encoding.clone(),
                label_type: definition.label_type.clone(),
                label_swapping: definition.label_swapping,
                service_definition_id: ids::service_definition_id(network_id, &definition.id),
                inbound_ports: Vec::new(),
                outbound_ports: Vec::new(),
            },
        }
    }
}

/// Whether `link_id` belongs to `definition`.
///
/// An empty include list admits every link; any exclude hit rejects it.
pub fn matches(link_id: &str, definition: &ServiceDefinition) -> bool {
    let included = definition.include.is_empty()
        || definition
            .include
            .iter()
            .any(|pattern| link_id.contains(pattern.as_str()));
    included
        && !definition
            .exclude
            .iter()
            .any(|pattern| link_id.contains(pattern.as_str()))
}

/// Switching services whose definitions admit `link_id`, in configuration order.
pub fn match_services<'m>(
    link_id: &str,
    mappings: &'m [ServiceDefinitionMapping<'_>],
) -> Vec<&'m SwitchingService> {
    mappings
        .iter()
        .filter(|mapping| matches(link_id, mapping.definition))
        .map(|mapping| &mapping.switching_service)
        .collect()
}
