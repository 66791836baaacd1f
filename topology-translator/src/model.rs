use std::collections::BTreeMap;
use std::fmt;

use tracing::warn;

/// Role of a link within the domain, as decided by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkRole {
    /// Not classified yet, or no remote link to classify by.
    #[default]
    Unknown,
    /// Cross-reference did not agree.
    Invalid,
    /// INNI: both ends inside the domain.
    Internal,
    /// ENNI: connects to another domain.
    External,
    /// UNI: client-facing port.
    Client,
}

impl fmt::Display for LinkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkRole::Unknown => "unknown",
            LinkRole::Invalid => "invalid",
            LinkRole::Internal => "internal",
            LinkRole::External => "external",
            LinkRole::Client => "client",
        };
        f.write_str(name)
    }
}

/// A control plane link with NSI-normalized identifiers.
///
/// Bandwidth values stay as the raw source strings; they are parsed when the
/// NML document is built so that an unparsable value can be dropped on its own.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Link {
    pub id: String,
    pub original_id: String,
    pub role: LinkRole,
    pub remote_link_id: Option<String>,
    pub encoding_type: Option<String>,
    pub vlan_range_availability: Option<String>,
    pub vlan_translation: bool,
    pub capacity: Option<String>,
    pub maximum_reservable_capacity: Option<String>,
    pub minimum_reservable_capacity: Option<String>,
    pub granularity: Option<String>,
}

impl Link {
    pub fn new(id: impl Into<String>, original_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            original_id: original_id.into(),
            ..Self::default()
        }
    }
}

/// The single network domain described by one source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub id: String,
    pub original_id: String,
    links: BTreeMap<String, Link>,
}

impl Domain {
    pub fn new(id: impl Into<String>, original_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            original_id: original_id.into(),
            links: BTreeMap::new(),
        }
    }

    /// Insert a link keyed by its normalized id; a later duplicate wins.
    pub fn add_link(&mut self, link: Link) {
        if let Some(previous) = self.links.insert(link.id.clone(), link) {
            warn!(
                link_id = %previous.id,
                original_id = %previous.original_id,
                "duplicate link id in source document; keeping the later definition"
            );
        }
    }

    pub fn link(&self, id: &str) -> Option<&Link> {
        self.links.get(id)
    }

    /// Links in identifier order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn links_mut(&mut self) -> &mut BTreeMap<String, Link> {
        &mut self.links
    }
}
