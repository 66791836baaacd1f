//! NMWG to NSI identifier normalization.
//!
//! NMWG ids are hierarchical and labelled
//! (`urn:ogf:network:domain=es.net:node=albu-cr5:port=xe-0/0/0:link=*`);
//! NSI ids drop the labels, insert the schema year after the domain and
//! avoid characters reserved by STP syntax
//! (`urn:ogf:network:es.net:2013::albu-cr5:xe-0_0_0:+`).

use crate::constants::{
    NMWG_LABELS, NSI_REWRITES, PORT_SUFFIX_IN, PORT_SUFFIX_OUT, URN_DOMAIN_YEAR, URN_OGF_NETWORK,
    URN_SEPARATOR, URN_SERVICE_DEFINITION, URN_SERVICE_DOMAIN,
};
use crate::error::TranslateError;

/// Convert an NMWG identifier into its NSI form.
///
/// Labels are stripped from the whole id; the `/` and `*` rewrites only touch
/// the part after the domain segment, which keeps its leading separator. A
/// bare domain id gets the year and a trailing separator appended.
///
/// # Errors
///
/// Returns [`TranslateError::InvalidIdentifier`] when the trimmed id lacks the
/// `urn:ogf:network:` prefix.
pub fn normalize(id: &str) -> Result<String, TranslateError> {
    let id = require_prefix(id.trim())?;

    let mut id = id.to_string();
    for label in NMWG_LABELS {
        id = id.replace(label, "");
    }

    let rest = &id[URN_OGF_NETWORK.len()..];
    let Some(end) = rest.find(URN_SEPARATOR) else {
        return Ok(format!("{id}{URN_SEPARATOR}{URN_DOMAIN_YEAR}{URN_SEPARATOR}"));
    };

    let (domain, remainder) = rest.split_at(end);
    let remainder = NSI_REWRITES
        .iter()
        .fold(remainder.to_string(), |acc, (from, to)| acc.replace(from, to));

    Ok(format!(
        "{URN_OGF_NETWORK}{domain}{URN_SEPARATOR}{URN_DOMAIN_YEAR}{URN_SEPARATOR}{remainder}"
    ))
}

/// Extract the domain segment from an NSI identifier.
pub fn domain_name(id: &str) -> Result<String, TranslateError> {
    let id = require_prefix(id)?;
    let rest = &id[URN_OGF_NETWORK.len()..];
    let domain = rest
        .split_once(URN_SEPARATOR)
        .map_or(rest, |(domain, _)| domain);
    Ok(domain.to_string())
}

pub fn inbound_port_id(id: &str) -> String {
    format!("{id}{URN_SEPARATOR}{PORT_SUFFIX_IN}")
}

pub fn outbound_port_id(id: &str) -> String {
    format!("{id}{URN_SEPARATOR}{PORT_SUFFIX_OUT}")
}

pub fn service_definition_id(network_id: &str, name: &str) -> String {
    format!("{network_id}{URN_SEPARATOR}{URN_SERVICE_DEFINITION}{URN_SEPARATOR}{name}")
}

pub fn switching_service_id(network_id: &str, name: &str) -> String {
    format!("{network_id}{URN_SEPARATOR}{URN_SERVICE_DOMAIN}{URN_SEPARATOR}{name}")
}

fn require_prefix(id: &str) -> Result<&str, TranslateError> {
    if id.starts_with(URN_OGF_NETWORK) {
        Ok(id)
    } else {
        Err(TranslateError::InvalidIdentifier {
            id: id.to_string(),
            prefix: URN_OGF_NETWORK,
        })
    }
}
