//! Link role classification.
//!
//! A link whose remote id names another link of the same domain is internal
//! when both ends point at each other. A remote id outside the map is a
//! client port when it lies inside the local (or wildcard) domain and an
//! external peering otherwise.

use std::collections::BTreeMap;

use tracing::{debug, error};

use crate::constants::LOCAL_CLIENT_PORT;
use crate::model::{Domain, Link, LinkRole};

/// Assign roles to every unclassified link that has a remote id.
///
/// `local_domain` is the normalized domain id. Links already classified and
/// links without a remote id are left as they are, so a second pass changes
/// nothing.
pub fn classify(links: &mut BTreeMap<String, Link>, local_domain: &str) {
    let ids: Vec<String> = links.keys().cloned().collect();

    for id in ids {
        let Some(link) = links.get(&id) else {
            continue;
        };
        if link.role != LinkRole::Unknown {
            continue;
        }
        let Some(remote_id) = link.remote_link_id.clone() else {
            continue;
        };

        let role = match links.get(&remote_id) {
            Some(remote) => {
                let agrees = remote.role == LinkRole::Unknown
                    && remote
                        .remote_link_id
                        .as_deref()
                        .is_some_and(|back| back.eq_ignore_ascii_case(&id));
                if agrees {
                    set_role(links, &remote_id, LinkRole::Internal);
                    LinkRole::Internal
                } else {
                    error!(link_id = %id, remote_link_id = %remote_id, "remote link mismatch");
                    LinkRole::Invalid
                }
            }
            None if remote_id.starts_with(local_domain)
                || remote_id.starts_with(LOCAL_CLIENT_PORT) =>
            {
                LinkRole::Client
            }
            None => LinkRole::External,
        };

        debug!(link_id = %id, %role, "classified link");
        set_role(links, &id, role);
    }
}

/// Classify the links of `domain` against its own id.
pub fn classify_domain(mut domain: Domain) -> Domain {
    let local = domain.id.clone();
    classify(domain.links_mut(), &local);
    domain
}

fn set_role(links: &mut BTreeMap<String, Link>, id: &str, role: LinkRole) {
    if let Some(link) = links.get_mut(id) {
        link.role = role;
    }
}
