//! Typed NML topology document and its XML rendering.

use chrono::{DateTime, SecondsFormat, Utc};
use xml_tree::XmlNode;

use crate::constants::{
    NML_ETHERNET, NML_HAS_SERVICE, NML_IS_ALIAS, NML_NAMESPACE, NML_PORT_INBOUND,
    NML_PORT_OUTBOUND, NSI_SERVICE_DEFINITION_NAMESPACE,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NmlTopology {
    pub id: String,
    pub name: String,
    pub version: DateTime<Utc>,
    pub lifetime: Lifetime,
    pub service_definitions: Vec<NsiServiceDefinition>,
    pub switching_services: Vec<SwitchingService>,
    pub bidirectional_ports: Vec<BidirectionalPort>,
    pub inbound_ports: Vec<PortGroup>,
    pub outbound_ports: Vec<PortGroup>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifetime {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsiServiceDefinition {
    pub id: String,
    pub name: String,
    pub service_type: String,
}

/// Switching service with references to the unidirectional ports it can join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchingService {
    pub id: String,
    pub encoding: String,
    pub label_type: String,
    pub label_swapping: bool,
    pub service_definition_id: String,
    pub inbound_ports: Vec<String>,
    pub outbound_ports: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidirectionalPort {
    pub id: String,
    pub inbound_id: String,
    pub outbound_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelGroup {
    pub label_type: String,
    pub value: String,
}

/// Capacity metadata in bits per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bandwidth {
    pub capacity: Option<u64>,
    pub maximum_reservable_capacity: Option<u64>,
    pub minimum_reservable_capacity: Option<u64>,
    pub granularity: Option<u64>,
}

/// A unidirectional port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortGroup {
    pub id: String,
    pub encoding: String,
    pub label_group: Option<LabelGroup>,
    pub bandwidth: Bandwidth,
    /// Id of the peer port this one is an alias of.
    pub alias: Option<String>,
}

impl NmlTopology {
    pub fn to_xml(&self) -> XmlNode {
        let mut root = XmlNode::new("nml:Topology")
            .with_attribute("xmlns:nml", NML_NAMESPACE)
            .with_attribute("xmlns:sd", NSI_SERVICE_DEFINITION_NAMESPACE)
            .with_attribute("xmlns:nml-eth", NML_ETHERNET)
            .with_attribute("id", &self.id)
            .with_attribute("version", timestamp(&self.version))
            .with_child(XmlNode::new("nml:name").with_text(&self.name))
            .with_child(
                XmlNode::new("nml:Lifetime")
                    .with_child(XmlNode::new("nml:start").with_text(timestamp(&self.lifetime.start)))
                    .with_child(XmlNode::new("nml:end").with_text(timestamp(&self.lifetime.end))),
            );

        for port in &self.bidirectional_ports {
            root.push(
                XmlNode::new("nml:BidirectionalPort")
                    .with_attribute("id", &port.id)
                    .with_child(port_reference(&port.inbound_id))
                    .with_child(port_reference(&port.outbound_id)),
            );
        }

        for definition in &self.service_definitions {
            root.push(
                XmlNode::new("sd:serviceDefinition")
                    .with_attribute("id", &definition.id)
                    .with_child(XmlNode::new("name").with_text(&definition.name))
                    .with_child(XmlNode::new("serviceType").with_text(&definition.service_type)),
            );
        }

        for service in &self.switching_services {
            root.push(relation(NML_HAS_SERVICE).with_child(switching_service(service)));
        }

        let mut inbound = relation(NML_PORT_INBOUND);
        for port in &self.inbound_ports {
            inbound.push(port_group(port));
        }
        root.push(inbound);

        let mut outbound = relation(NML_PORT_OUTBOUND);
        for port in &self.outbound_ports {
            outbound.push(port_group(port));
        }
        root.push(outbound);

        root
    }
}

fn switching_service(service: &SwitchingService) -> XmlNode {
    let mut inbound = relation(NML_PORT_INBOUND);
    for id in &service.inbound_ports {
        inbound.push(port_reference(id));
    }
    let mut outbound = relation(NML_PORT_OUTBOUND);
    for id in &service.outbound_ports {
        outbound.push(port_reference(id));
    }

    XmlNode::new("nml:SwitchingService")
        .with_attribute("id", &service.id)
        .with_attribute("encoding", &service.encoding)
        .with_attribute("labelType", &service.label_type)
        .with_attribute("labelSwapping", service.label_swapping.to_string())
        .with_child(inbound)
        .with_child(outbound)
        .with_child(
            XmlNode::new("sd:serviceDefinition").with_attribute("id", &service.service_definition_id),
        )
}

fn port_group(port: &PortGroup) -> XmlNode {
    let mut node = XmlNode::new("nml:PortGroup")
        .with_attribute("id", &port.id)
        .with_attribute("encoding", &port.encoding);

    if let Some(labels) = &port.label_group {
        node.push(
            XmlNode::new("nml:LabelGroup")
                .with_attribute("labeltype", &labels.label_type)
                .with_text(&labels.value),
        );
    }

    let bandwidth = [
        ("nml-eth:capacity", port.bandwidth.capacity),
        ("nml-eth:maximumReservableCapacity", port.bandwidth.maximum_reservable_capacity),
        ("nml-eth:minimumReservableCapacity", port.bandwidth.minimum_reservable_capacity),
        ("nml-eth:granularity", port.bandwidth.granularity),
    ];
    for (tag, value) in bandwidth {
        if let Some(value) = value {
            node.push(XmlNode::new(tag).with_text(value.to_string()));
        }
    }

    if let Some(alias) = &port.alias {
        node.push(relation(NML_IS_ALIAS).with_child(port_reference(alias)));
    }
    node
}

fn relation(kind: &str) -> XmlNode {
    XmlNode::new("nml:Relation").with_attribute("type", kind)
}

fn port_reference(id: &str) -> XmlNode {
    XmlNode::new("nml:PortGroup").with_attribute("id", id)
}

/// RFC 3339 UTC with millisecond precision.
pub fn timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}
