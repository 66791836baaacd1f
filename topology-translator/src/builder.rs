//! Flatten source records into a single [`Domain`] keyed by NSI link id.

use std::collections::BTreeSet;

use tracing::debug;

use crate::constants::DEFAULT_VLAN_RANGE;
use crate::error::TranslateError;
use crate::ids;
use crate::model::{Domain, Link};
use crate::source::{Bandwidth, SourceLink, SourcePort, SourceTopology};

/// Build the domain described by `topology`.
///
/// Bandwidth attributes missing on a link are inherited from its port.
/// Source domains whose ids normalize to the same URN are merged.
///
/// # Errors
///
/// [`TranslateError::MultipleDomains`] unless exactly one normalized domain id
/// results; [`TranslateError::InvalidIdentifier`] for any id without the
/// network prefix.
pub fn build_domain(topology: &SourceTopology) -> Result<Domain, TranslateError> {
    let domain_ids = topology
        .domains
        .iter()
        .map(|domain| ids::normalize(&domain.id))
        .collect::<Result<BTreeSet<_>, _>>()?;

    if domain_ids.len() != 1 {
        return Err(TranslateError::MultipleDomains {
            count: domain_ids.len(),
        });
    }

    let source = &topology.domains[0];
    let mut domain = Domain::new(ids::normalize(&source.id)?, source.id.clone());

    let ports = topology
        .domains
        .iter()
        .flat_map(|d| d.nodes.iter())
        .flat_map(|n| n.ports.iter());
    for port in ports {
        for link in &port.links {
            domain.add_link(build_link(port, link)?);
        }
    }

    debug!(
        domain = %domain.id,
        links = domain.link_count(),
        "built domain from source topology"
    );
    Ok(domain)
}

fn build_link(port: &SourcePort, source: &SourceLink) -> Result<Link, TranslateError> {
    let mut link = Link::new(ids::normalize(&source.id)?, source.id.clone());
    link.remote_link_id = source
        .remote_link_id
        .as_deref()
        .map(ids::normalize)
        .transpose()?;

    let Bandwidth {
        capacity,
        maximum_reservable_capacity,
        minimum_reservable_capacity,
        granularity,
    } = inherit(&source.bandwidth, &port.bandwidth);
    link.capacity = capacity;
    link.maximum_reservable_capacity = maximum_reservable_capacity;
    link.minimum_reservable_capacity = minimum_reservable_capacity;
    link.granularity = granularity;

    if let Some(swcap) = &source.switching_capability {
        link.encoding_type = swcap.encoding_type.clone();
        if let Some(info) = &swcap.specific_info {
            link.vlan_range_availability = Some(
                info.vlan_range_availability
                    .clone()
                    .unwrap_or_else(|| DEFAULT_VLAN_RANGE.to_string()),
            );
            link.vlan_translation = info.vlan_translation.unwrap_or(false);
        }
    }

    Ok(link)
}

fn inherit(link: &Bandwidth, port: &Bandwidth) -> Bandwidth {
    let pick = |own: &Option<String>, parent: &Option<String>| own.clone().or_else(|| parent.clone());
    Bandwidth {
        capacity: pick(&link.capacity, &port.capacity),
        maximum_reservable_capacity: pick(
            &link.maximum_reservable_capacity,
            &port.maximum_reservable_capacity,
        ),
        minimum_reservable_capacity: pick(
            &link.minimum_reservable_capacity,
            &port.minimum_reservable_capacity,
        ),
        granularity: pick(&link.granularity, &port.granularity),
    }
}
