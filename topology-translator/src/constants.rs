//! Fixed identifiers shared by the NMWG reader and the NML writer.

/// Prefix every network URN must carry.
pub const URN_OGF_NETWORK: &str = "urn:ogf:network:";
pub const URN_SEPARATOR: &str = ":";
pub const URN_DOMAIN_YEAR: &str = "2013";
pub const URN_SERVICE_DOMAIN: &str = "ServiceDomain";
pub const URN_SERVICE_DEFINITION: &str = "ServiceDefinition";
pub const PORT_SUFFIX_IN: &str = "in";
pub const PORT_SUFFIX_OUT: &str = "out";

/// Remote ids starting with this belong to a wildcard client domain.
pub const LOCAL_CLIENT_PORT: &str = "urn:ogf:network:*:2013:";

/// NMWG hierarchy labels, removed in this order.
pub const NMWG_LABELS: [&str; 4] = ["domain=", "node=", "port=", "link="];

/// Characters rewritten in the part of an id after the domain segment.
pub const NSI_REWRITES: [(&str, &str); 2] = [("/", "_"), ("*", "+")];

pub const NML_NAMESPACE: &str = "http://schemas.ogf.org/nml/2013/05/base#";
pub const NML_ETHERNET: &str = "http://schemas.ogf.org/nml/2012/10/ethernet";
pub const NML_ETHERNET_VLAN: &str = "http://schemas.ogf.org/nml/2012/10/ethernet#vlan";
pub const NML_PORT_INBOUND: &str = "http://schemas.ogf.org/nml/2013/05/base#hasInboundPort";
pub const NML_PORT_OUTBOUND: &str = "http://schemas.ogf.org/nml/2013/05/base#hasOutboundPort";
pub const NML_IS_ALIAS: &str = "http://schemas.ogf.org/nml/2013/05/base#isAlias";
pub const NML_HAS_SERVICE: &str = "http://schemas.ogf.org/nml/2013/05/base#hasService";
pub const NSI_SERVICE_DEFINITION_NAMESPACE: &str =
    "http://schemas.ogf.org/nsi/2013/12/services/definition";

/// VLAN range assumed when a capability block omits one.
pub const DEFAULT_VLAN_RANGE: &str = "2-4094";

/// Encoding assigned to ports whose NMWG encoding is not recognised.
pub const UNKNOWN_ENCODING: &str = "unknown";

pub const SD_EVTS_AGOLE_ID: &str = "EVTS.A-GOLE";
pub const SD_EVTS_AGOLE_NAME: &str = "GLIF Automated GOLE Ethernet VLAN Transfer Service";
pub const SD_EVTS_AGOLE_TYPE: &str = "http://services.ogf.org/nsi/2013/07/definitions/EVTS.A-GOLE";

/// Default document lifetime in seconds (60 days).
pub const DEFAULT_LIFETIME_SECS: u64 = 5_184_000;
