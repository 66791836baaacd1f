//! NSA description document handling.

use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;
use tracing::debug;
use xml_tree::{ParseError, XmlNode};

use crate::nml::timestamp;

/// Connection Service provider interface types and their protocol versions.
const CS_PROVIDERS: [(&str, f32); 2] = [
    ("application/vnd.org.ogf.nsi.cs.v1+soap", 1.0),
    ("application/vnd.ogf.nsi.cs.v2.provider+soap", 2.0),
];

/// Elements that precede `startTime` in an NSA description.
const BEFORE_START_TIME: [&str; 2] = ["name", "softwareVersion"];

#[derive(Debug, Error)]
pub enum NsaError {
    #[error("failed to read NSA description {path}: {source}")]
    Parse { path: String, source: ParseError },
    #[error("{path} is not an NSA description (root element <{root}>)")]
    NotNsa { path: String, root: String },
    #[error("NSA description is missing its id attribute")]
    MissingId,
    #[error("NSA description ({nsa}) must contain exactly one networkId, found {count}")]
    NetworkIdCount { nsa: String, count: usize },
    #[error("NSA lifetime of {0} seconds is out of range")]
    Lifetime(u64),
}

/// A parsed NSA description with its version stamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NsaDocument {
    id: String,
    root: XmlNode,
    version: Option<DateTime<Utc>>,
    expires: Option<DateTime<Utc>>,
}

impl NsaDocument {
    /// Read the description at `path` and stamp it valid from now for
    /// `lifetime_secs`.
    pub fn load(path: &Path, lifetime_secs: u64) -> Result<Self, NsaError> {
        let root = xml_tree::parse_file(path).map_err(|source| NsaError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        let mut document = Self::from_xml(root, path.display().to_string())?;
        document.refresh(Utc::now(), lifetime_secs)?;
        debug!(nsa = %document.id, path = %path.display(), "loaded NSA description");
        Ok(document)
    }

    /// Wrap a parsed tree; `origin` names its source in errors.
    pub fn from_xml(root: XmlNode, origin: String) -> Result<Self, NsaError> {
        if root.local_name() != "nsa" {
            return Err(NsaError::NotNsa {
                path: origin,
                root: root.tag,
            });
        }
        let id = root
            .attribute("id")
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(NsaError::MissingId)?
            .to_string();
        Ok(Self {
            id,
            root,
            version: None,
            expires: None,
        })
    }

    /// Set `version` and `startTime` to `now` and `expires` to now plus the lifetime.
    pub fn refresh(&mut self, now: DateTime<Utc>, lifetime_secs: u64) -> Result<(), NsaError> {
        let expires = i64::try_from(lifetime_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(NsaError::Lifetime(lifetime_secs))?;

        let stamp = timestamp(&now);
        self.root.attributes.insert("version".to_string(), stamp.clone());
        self.root
            .attributes
            .insert("expires".to_string(), timestamp(&expires));

        match self.root.child_mut("startTime") {
            Some(start) => start.text = Some(stamp),
            None => {
                let position = self
                    .root
                    .children
                    .iter()
                    .rposition(|child| BEFORE_START_TIME.contains(&child.local_name()))
                    .map_or(0, |index| index + 1);
                self.root
                    .children
                    .insert(position, XmlNode::new("startTime").with_text(stamp));
            }
        }

        self.version = Some(now);
        self.expires = Some(expires);
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> Option<DateTime<Utc>> {
        self.version
    }

    pub fn expires(&self) -> Option<DateTime<Utc>> {
        self.expires
    }

    pub fn to_xml(&self) -> &XmlNode {
        &self.root
    }

    /// The single network this NSA manages.
    pub fn network_id(&self) -> Result<&str, NsaError> {
        let ids: Vec<&str> = self
            .root
            .children_named("networkId")
            .filter_map(|node| node.text.as_deref())
            .map(str::trim)
            .collect();
        match ids.as_slice() {
            [id] => Ok(*id),
            _ => Err(NsaError::NetworkIdCount {
                nsa: self.id.clone(),
                count: ids.len(),
            }),
        }
    }

    /// Interface type of the highest Connection Service provider version offered.
    pub fn provider_version(&self) -> Option<&str> {
        let mut best: Option<(&str, f32)> = None;
        for kind in self
            .root
            .children_named("interface")
            .filter_map(|interface| interface.child_text("type"))
        {
            let Some((_, version)) = CS_PROVIDERS.iter().find(|(name, _)| *name == kind) else {
                continue;
            };
            if best.map_or(true, |(_, highest)| *version > highest) {
                best = Some((kind, *version));
            }
        }
        best.map(|(kind, _)| kind)
    }
}
