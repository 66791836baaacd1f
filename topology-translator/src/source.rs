//! Typed view of an NMWG CtrlPlane topology document.
//!
//! Elements are matched by local name so that documents using either the
//! `nmtopo` base namespace or the `CtrlPlane` namespace for the root read the
//! same way. Values are kept as trimmed strings; interpretation happens in
//! [`crate::builder`].

use xml_tree::XmlNode;

use crate::error::TranslateError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceTopology {
    pub domains: Vec<SourceDomain>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceDomain {
    pub id: String,
    pub nodes: Vec<SourceNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceNode {
    pub id: String,
    pub ports: Vec<SourcePort>,
}

/// Bandwidth attributes shared by ports and links.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bandwidth {
    pub capacity: Option<String>,
    pub maximum_reservable_capacity: Option<String>,
    pub minimum_reservable_capacity: Option<String>,
    pub granularity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourcePort {
    pub id: String,
    pub bandwidth: Bandwidth,
    pub links: Vec<SourceLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceLink {
    pub id: String,
    pub remote_link_id: Option<String>,
    pub bandwidth: Bandwidth,
    pub switching_capability: Option<SwitchingCapability>,
}

/// `SwitchingCapabilityDescriptors` of a link.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SwitchingCapability {
    pub encoding_type: Option<String>,
    pub specific_info: Option<SpecificInfo>,
}

/// `switchingCapabilitySpecificInfo` of a capability descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecificInfo {
    pub vlan_range_availability: Option<String>,
    pub vlan_translation: Option<bool>,
}

/// Parse raw document text into a [`SourceTopology`].
///
/// # Errors
///
/// [`TranslateError::EmptyDocument`] for blank input, unparsable XML or a
/// topology without domains; [`TranslateError::MissingAttribute`] when a
/// domain, node, port or link lacks its `id`.
pub fn parse_document(xml: &str) -> Result<SourceTopology, TranslateError> {
    if xml.trim().is_empty() {
        return Err(TranslateError::EmptyDocument);
    }
    let root = xml_tree::parse_str(xml).map_err(|err| {
        tracing::error!(error = %err, "source topology is not well-formed XML");
        TranslateError::EmptyDocument
    })?;
    read_topology(&root)
}

/// Read a parsed topology tree.
pub fn read_topology(root: &XmlNode) -> Result<SourceTopology, TranslateError> {
    let domains = root
        .children_named("domain")
        .map(read_domain)
        .collect::<Result<Vec<_>, _>>()?;

    if domains.is_empty() {
        return Err(TranslateError::EmptyDocument);
    }
    Ok(SourceTopology { domains })
}

fn read_domain(node: &XmlNode) -> Result<SourceDomain, TranslateError> {
    Ok(SourceDomain {
        id: required_id(node)?,
        nodes: node
            .children_named("node")
            .map(read_node)
            .collect::<Result<_, _>>()?,
    })
}

fn read_node(node: &XmlNode) -> Result<SourceNode, TranslateError> {
    Ok(SourceNode {
        id: required_id(node)?,
        ports: node
            .children_named("port")
            .map(read_port)
            .collect::<Result<_, _>>()?,
    })
}

fn read_port(node: &XmlNode) -> Result<SourcePort, TranslateError> {
    Ok(SourcePort {
        id: required_id(node)?,
        bandwidth: read_bandwidth(node),
        links: node
            .children_named("link")
            .map(read_link)
            .collect::<Result<_, _>>()?,
    })
}

fn read_link(node: &XmlNode) -> Result<SourceLink, TranslateError> {
    Ok(SourceLink {
        id: required_id(node)?,
        remote_link_id: text(node, "remoteLinkId"),
        bandwidth: read_bandwidth(node),
        switching_capability: node
            .child("SwitchingCapabilityDescriptors")
            .map(read_switching_capability),
    })
}

fn read_bandwidth(node: &XmlNode) -> Bandwidth {
    Bandwidth {
        capacity: text(node, "capacity"),
        maximum_reservable_capacity: text(node, "maximumReservableCapacity"),
        minimum_reservable_capacity: text(node, "minimumReservableCapacity"),
        granularity: text(node, "granularity"),
    }
}

fn read_switching_capability(node: &XmlNode) -> SwitchingCapability {
    SwitchingCapability {
        encoding_type: text(node, "encodingType"),
        specific_info: node
            .child("switchingCapabilitySpecificInfo")
            .map(|info| SpecificInfo {
                vlan_range_availability: text(info, "vlanRangeAvailability"),
                vlan_translation: info.child_text("vlanTranslation").and_then(parse_xsd_bool),
            }),
    }
}

fn parse_xsd_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn text(node: &XmlNode, local: &str) -> Option<String> {
    node.child_text(local).map(str::to_string)
}

fn required_id(node: &XmlNode) -> Result<String, TranslateError> {
    node.attribute("id")
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| TranslateError::MissingAttribute {
            element: node.local_name().to_string(),
            attribute: "id",
        })
}
