//! Build the NML topology for a classified domain.
//!
//! Every client, external or unclassified link that at least one switching
//! service admits becomes a bidirectional port made of an inbound and an
//! outbound port group. Internal and invalid links are not modelled.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::constants::{NML_ETHERNET, NML_ETHERNET_VLAN, UNKNOWN_ENCODING};
use crate::error::TranslateError;
use crate::ids;
use crate::model::{Domain, Link, LinkRole};
use crate::nml::{
    Bandwidth, BidirectionalPort, LabelGroup, Lifetime, NmlTopology, NsiServiceDefinition,
    PortGroup,
};
use crate::service::{match_services, matches, ServiceDefinition, ServiceDefinitionMapping};

/// Operator overrides for one link, keyed by its normalized id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Peering {
    pub id: String,
    /// Alias target for the inbound port.
    pub inbound: Option<String>,
    /// Alias target for the outbound port.
    pub outbound: Option<String>,
    pub labels: Option<PeeringLabels>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeeringLabels {
    #[serde(rename = "type")]
    pub label_type: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Inbound,
    Outbound,
}

impl Peering {
    fn alias_for(&self, direction: Direction) -> Option<&str> {
        let target = match direction {
            Direction::Inbound => self.inbound.as_deref(),
            Direction::Outbound => self.outbound.as_deref(),
        };
        target.map(str::trim).filter(|t| !t.is_empty())
    }
}

/// Translate `domain` with the document lifetime starting now.
pub fn translate(
    domain: &Domain,
    lifetime_secs: u64,
    definitions: &[ServiceDefinition],
    peerings: &BTreeMap<String, Peering>,
) -> Result<NmlTopology, TranslateError> {
    translate_at(domain, lifetime_secs, definitions, peerings, Utc::now())
}

/// Translate `domain` using `now` as the topology version.
///
/// # Errors
///
/// [`TranslateError::Datetime`] when the lifetime end overflows,
/// [`TranslateError::MissingRemoteLink`] when a port needs an alias that can
/// only come from an absent remote link id, and
/// [`TranslateError::InvalidIdentifier`] for a domain id without the
/// network prefix.
pub fn translate_at(
    domain: &Domain,
    lifetime_secs: u64,
    definitions: &[ServiceDefinition],
    peerings: &BTreeMap<String, Peering>,
    now: DateTime<Utc>,
) -> Result<NmlTopology, TranslateError> {
    let end = i64::try_from(lifetime_secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| {
            TranslateError::Datetime(format!("lifetime of {lifetime_secs} seconds is out of range"))
        })?;

    let service_definitions = definitions
        .iter()
        .map(|sd| NsiServiceDefinition {
            id: ids::service_definition_id(&domain.id, &sd.id),
            name: sd.name.clone(),
            service_type: sd.service_type.clone(),
        })
        .collect();

    let mut mappings: Vec<ServiceDefinitionMapping<'_>> = definitions
        .iter()
        .map(|sd| ServiceDefinitionMapping::new(&domain.id, sd))
        .collect();

    let mut bidirectional_ports = Vec::new();
    let mut inbound_ports = Vec::new();
    let mut outbound_ports = Vec::new();

    for link in domain.links() {
        if !matches!(
            link.role,
            LinkRole::External | LinkRole::Client | LinkRole::Unknown
        ) {
            continue;
        }
        if match_services(&link.id, &mappings).is_empty() {
            debug!(link_id = %link.id, role = %link.role, "no switching service matches link");
            continue;
        }

        let peering = peerings.get(&link.id);
        let inbound = port_group(link, Direction::Inbound, peering)?;
        let outbound = port_group(link, Direction::Outbound, peering)?;

        for mapping in mappings
            .iter_mut()
            .filter(|mapping| matches(&link.id, mapping.definition))
        {
            let service = &mut mapping.switching_service;
            if service.encoding.eq_ignore_ascii_case(&inbound.encoding) {
                service.inbound_ports.push(inbound.id.clone());
            }
            if service.encoding.eq_ignore_ascii_case(&outbound.encoding) {
                service.outbound_ports.push(outbound.id.clone());
            }
        }

        bidirectional_ports.push(BidirectionalPort {
            id: link.id.clone(),
            inbound_id: inbound.id.clone(),
            outbound_id: outbound.id.clone(),
        });
        inbound_ports.push(inbound);
        outbound_ports.push(outbound);
    }

    info!(
        topology = %domain.id,
        ports = bidirectional_ports.len(),
        services = mappings.len(),
        "translated domain to NML"
    );

    Ok(NmlTopology {
        id: domain.id.clone(),
        name: ids::domain_name(&domain.id)?,
        version: now,
        lifetime: Lifetime { start: now, end },
        service_definitions,
        switching_services: mappings
            .into_iter()
            .map(|mapping| mapping.switching_service)
            .collect(),
        bidirectional_ports,
        inbound_ports,
        outbound_ports,
    })
}

/// NML encoding URI for an NMWG encoding token.
pub fn encoding_type(encoding: Option<&str>) -> &'static str {
    match encoding.map(str::trim) {
        Some(token) if token.eq_ignore_ascii_case("packet") => NML_ETHERNET,
        _ => UNKNOWN_ENCODING,
    }
}

fn port_group(
    link: &Link,
    direction: Direction,
    peering: Option<&Peering>,
) -> Result<PortGroup, TranslateError> {
    let id = match direction {
        Direction::Inbound => ids::inbound_port_id(&link.id),
        Direction::Outbound => ids::outbound_port_id(&link.id),
    };

    let label_group = match peering.and_then(|p| p.labels.as_ref()) {
        Some(labels) => Some(LabelGroup {
            label_type: labels.label_type.clone(),
            value: labels.value.clone(),
        }),
        None => link.vlan_range_availability.as_ref().map(|range| LabelGroup {
            label_type: NML_ETHERNET_VLAN.to_string(),
            value: range.clone(),
        }),
    };

    Ok(PortGroup {
        id,
        encoding: encoding_type(link.encoding_type.as_deref()).to_string(),
        label_group,
        bandwidth: bandwidth(link),
        alias: alias(link, direction, peering)?,
    })
}

fn alias(
    link: &Link,
    direction: Direction,
    peering: Option<&Peering>,
) -> Result<Option<String>, TranslateError> {
    if let Some(target) = peering.and_then(|p| p.alias_for(direction)) {
        return Ok(Some(target.to_string()));
    }
    if link.role != LinkRole::External {
        return Ok(None);
    }

    let remote = link
        .remote_link_id
        .as_deref()
        .ok_or_else(|| TranslateError::MissingRemoteLink {
            link_id: link.id.clone(),
        })?;
    // Our inbound port receives from the peer's outbound port.
    Ok(Some(match direction {
        Direction::Inbound => ids::outbound_port_id(remote),
        Direction::Outbound => ids::inbound_port_id(remote),
    }))
}

fn bandwidth(link: &Link) -> Bandwidth {
    Bandwidth {
        capacity: parse_bandwidth(&link.id, "capacity", link.capacity.as_deref()),
        maximum_reservable_capacity: parse_bandwidth(
            &link.id,
            "maximumReservableCapacity",
            link.maximum_reservable_capacity.as_deref(),
        ),
        minimum_reservable_capacity: parse_bandwidth(
            &link.id,
            "minimumReservableCapacity",
            link.minimum_reservable_capacity.as_deref(),
        ),
        granularity: parse_bandwidth(&link.id, "granularity", link.granularity.as_deref()),
    }
}

fn parse_bandwidth(link_id: &str, attribute: &str, value: Option<&str>) -> Option<u64> {
    let value = value?;
    match value.trim().parse::<u64>() {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            error!(
                link_id,
                attribute,
                value,
                error = %err,
                "bandwidth value is not an unsigned integer; omitting it"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::{encoding_type, translate_at, Peering, PeeringLabels};
    use crate::error::TranslateError;
    use crate::model::{Domain, Link, LinkRole};
    use crate::service::ServiceDefinition;

    const NET: &str = "urn:ogf:network:es.net:2013:";

    fn link(name: &str, role: LinkRole, remote: Option<&str>) -> Link {
        let id = format!("{NET}:{name}");
        let mut link = Link::new(id.clone(), id);
        link.role = role;
        link.remote_link_id = remote.map(str::to_string);
        link.encoding_type = Some("packet".to_string());
        link
    }

    fn domain(links: Vec<Link>) -> Domain {
        let mut domain = Domain::new(NET, "urn:ogf:network:domain=es.net");
        for link in links {
            domain.add_link(link);
        }
        domain
    }

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("valid time")
    }

    #[test]
    fn header_uses_domain_and_lifetime() {
        let nml = translate_at(
            &domain(Vec::new()),
            3600,
            &[ServiceDefinition::evts_agole()],
            &BTreeMap::new(),
            now(),
        )
        .expect("translate");

        assert_eq!(nml.id, NET);
        assert_eq!(nml.name, "es.net");
        assert_eq!(nml.version, now());
        assert_eq!(nml.lifetime.end, Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap());
        assert_eq!(
            nml.service_definitions[0].id,
            "urn:ogf:network:es.net:2013::ServiceDefinition:EVTS.A-GOLE"
        );
        assert_eq!(nml.switching_services.len(), 1);
        assert!(nml.bidirectional_ports.is_empty());
    }

    #[test]
    fn only_client_external_and_unknown_links_become_ports() {
        let d = domain(vec![
            link("a", LinkRole::Internal, Some("x")),
            link("b", LinkRole::Invalid, Some("x")),
            link("c", LinkRole::Client, Some("urn:ogf:network:*:2013::+")),
            link("d", LinkRole::External, Some("urn:ogf:network:peer:2013::p")),
            link("e", LinkRole::Unknown, None),
        ]);
        let nml = translate_at(&d, 60, &[ServiceDefinition::evts_agole()], &BTreeMap::new(), now())
            .expect("translate");

        let ids: Vec<_> = nml.bidirectional_ports.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "urn:ogf:network:es.net:2013::c",
                "urn:ogf:network:es.net:2013::d",
                "urn:ogf:network:es.net:2013::e",
            ]
        );
        let service = &nml.switching_services[0];
        assert_eq!(service.inbound_ports.len(), 3);
        assert_eq!(service.outbound_ports.len(), 3);
    }

    #[test]
    fn external_links_alias_the_opposite_remote_direction() {
        let d = domain(vec![link(
            "d",
            LinkRole::External,
            Some("urn:ogf:network:peer:2013::p"),
        )]);
        let nml = translate_at(&d, 60, &[ServiceDefinition::evts_agole()], &BTreeMap::new(), now())
            .expect("translate");

        assert_eq!(
            nml.inbound_ports[0].alias.as_deref(),
            Some("urn:ogf:network:peer:2013::p:out")
        );
        assert_eq!(
            nml.outbound_ports[0].alias.as_deref(),
            Some("urn:ogf:network:peer:2013::p:in")
        );
    }

    #[test]
    fn link_without_remote_gets_port_without_alias() {
        let d = domain(vec![link("e", LinkRole::Unknown, None)]);
        let nml = translate_at(&d, 60, &[ServiceDefinition::evts_agole()], &BTreeMap::new(), now())
            .expect("translate");
        assert_eq!(nml.inbound_ports[0].alias, None);
        assert_eq!(nml.outbound_ports[0].alias, None);
    }

    #[test]
    fn peering_overrides_alias_and_labels() {
        let mut client = link("c", LinkRole::Client, Some("urn:ogf:network:es.net:2013::sw"));
        client.vlan_range_availability = Some("2-4094".to_string());
        let d = domain(vec![client]);

        let peering = Peering {
            id: format!("{NET}:c"),
            inbound: Some("urn:ogf:network:peer:2013::x:out".to_string()),
            outbound: Some("  ".to_string()),
            labels: Some(PeeringLabels {
                label_type: "http://schemas.ogf.org/nml/2012/10/ethernet#vlan".to_string(),
                value: "100-200".to_string(),
            }),
        };
        let peerings = BTreeMap::from([(peering.id.clone(), peering)]);

        let nml = translate_at(&d, 60, &[ServiceDefinition::evts_agole()], &peerings, now())
            .expect("translate");
        let inbound = &nml.inbound_ports[0];
        assert_eq!(inbound.alias.as_deref(), Some("urn:ogf:network:peer:2013::x:out"));
        assert_eq!(
            inbound.label_group.as_ref().map(|l| l.value.as_str()),
            Some("100-200")
        );
        assert_eq!(nml.outbound_ports[0].alias, None);
    }

    #[test]
    fn vlan_range_becomes_label_group() {
        let mut client = link("c", LinkRole::Client, Some("urn:ogf:network:*:2013::+"));
        client.vlan_range_availability = Some("1779-1799".to_string());
        let nml = translate_at(
            &domain(vec![client]),
            60,
            &[ServiceDefinition::evts_agole()],
            &BTreeMap::new(),
            now(),
        )
        .expect("translate");
        let labels = nml.outbound_ports[0].label_group.clone().expect("labels");
        assert_eq!(labels.label_type, "http://schemas.ogf.org/nml/2012/10/ethernet#vlan");
        assert_eq!(labels.value, "1779-1799");
    }

    #[test]
    fn unparsable_bandwidth_is_dropped_alone() {
        let mut client = link("c", LinkRole::Client, Some("urn:ogf:network:*:2013::+"));
        client.capacity = Some("abc".to_string());
        client.granularity = Some("1000000".to_string());
        client.maximum_reservable_capacity = Some("10000000000".to_string());
        let nml = translate_at(
            &domain(vec![client]),
            60,
            &[ServiceDefinition::evts_agole()],
            &BTreeMap::new(),
            now(),
        )
        .expect("translate");

        let bandwidth = nml.inbound_ports[0].bandwidth;
        assert_eq!(bandwidth.capacity, None);
        assert_eq!(bandwidth.granularity, Some(1_000_000));
        assert_eq!(bandwidth.maximum_reservable_capacity, Some(10_000_000_000));
        assert_eq!(bandwidth.minimum_reservable_capacity, None);
    }

    #[test]
    fn orphan_link_matching_no_service_is_dropped() {
        let sd = ServiceDefinition {
            exclude: vec!["orphan".to_string()],
            ..ServiceDefinition::evts_agole()
        };
        let nml = translate_at(
            &domain(vec![link("orphan", LinkRole::Unknown, None)]),
            60,
            &[sd],
            &BTreeMap::new(),
            now(),
        )
        .expect("translate");
        assert!(nml.bidirectional_ports.is_empty());
        assert!(nml.inbound_ports.is_empty());
        assert!(nml.switching_services[0].inbound_ports.is_empty());
    }

    #[test]
    fn encoding_mismatch_keeps_port_out_of_service() {
        let mut unknown = link("u", LinkRole::Client, Some("urn:ogf:network:*:2013::+"));
        unknown.encoding_type = Some("sonet".to_string());
        let nml = translate_at(
            &domain(vec![unknown]),
            60,
            &[ServiceDefinition::evts_agole()],
            &BTreeMap::new(),
            now(),
        )
        .expect("translate");

        assert_eq!(nml.inbound_ports[0].encoding, "unknown");
        assert_eq!(nml.bidirectional_ports.len(), 1);
        assert!(nml.switching_services[0].inbound_ports.is_empty());
        assert!(nml.switching_services[0].outbound_ports.is_empty());
    }

    #[test]
    fn encoding_token_is_trimmed_and_case_insensitive() {
        assert_eq!(
            encoding_type(Some(" PACKET ")),
            "http://schemas.ogf.org/nml/2012/10/ethernet"
        );
        assert_eq!(encoding_type(Some("tdm")), "unknown");
        assert_eq!(encoding_type(None), "unknown");
    }

    #[test]
    fn external_link_without_remote_is_an_error() {
        let d = domain(vec![link("x", LinkRole::External, None)]);
        let err = translate_at(&d, 60, &[ServiceDefinition::evts_agole()], &BTreeMap::new(), now())
            .expect_err("missing remote");
        assert_eq!(
            err,
            TranslateError::MissingRemoteLink {
                link_id: "urn:ogf:network:es.net:2013::x".to_string()
            }
        );
    }

    #[test]
    fn overflowing_lifetime_is_an_error() {
        let err = translate_at(
            &domain(Vec::new()),
            u64::MAX,
            &[ServiceDefinition::evts_agole()],
            &BTreeMap::new(),
            now(),
        )
        .expect_err("overflow");
        assert!(matches!(err, TranslateError::Datetime(_)));
    }
}
