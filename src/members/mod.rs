//! Cluster membership derivation
//!
//! Turns a bootstrap descriptor (cluster token plus `name=peer-url`
//! initial-cluster map) into a derived member set. Member IDs are
//! deterministic: the same names, URLs, and token always produce the same
//! 64-bit IDs on every host, so a restored member and the peers later added
//! to it agree on identity without coordination.
//!
//! ID derivation: SHA-256 over the member's sorted peer URLs, its name, and
//! the cluster token, truncated to the first 8 bytes (big-endian). The
//! cluster ID folds the sorted member IDs and the token the same way.

mod errors;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub use errors::{MemberError, MemberResult};

/// One cluster member as declared by the bootstrap descriptor.
///
/// This record, serialized as JSON, is the context payload of the
/// configuration-change entry that adds the member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Deterministically derived 64-bit member ID
    pub id: u64,
    /// Display name
    pub name: String,
    /// Peer URLs, sorted
    #[serde(rename = "peerURLs")]
    pub peer_urls: Vec<String>,
}

/// A derived member set with its cluster ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSet {
    id: u64,
    members: Vec<Member>,
}

impl MemberSet {
    /// Derive a member set from a cluster token and an initial-cluster map.
    ///
    /// The map is the raw `name1=url1,name2=url2` flag value; a name may
    /// appear more than once to declare several peer URLs. Each URL is
    /// validated, IDs are derived per member, and members are ordered by ID
    /// (the stable iteration order every consumer sees).
    pub fn build(token: &str, initial_cluster: &str) -> MemberResult<Self> {
        let urls_map = parse_urls_map(initial_cluster)?;
        if urls_map.is_empty() {
            return Err(MemberError::EmptyCluster);
        }

        let mut members = Vec::with_capacity(urls_map.len());
        for (name, urls) in &urls_map {
            let id = member_id(token, name, urls);
            members.push(Member {
                id,
                name: name.clone(),
                peer_urls: urls.clone(),
            });
        }

        members.sort_by_key(|m| m.id);
        for pair in members.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(MemberError::DuplicateMemberId(pair[1].name.clone()));
            }
        }

        let id = cluster_id(token, &members);
        Ok(Self { id, members })
    }

    /// Cluster ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Members in stable iteration order (ascending ID).
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Look up a member by display name.
    pub fn member_by_name(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// Parse the `name=url` comma-separated initial-cluster flag into a map of
/// name to sorted, deduplicated peer URLs.
fn parse_urls_map(initial_cluster: &str) -> MemberResult<BTreeMap<String, Vec<String>>> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for entry in initial_cluster.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (name, url) = entry
            .split_once('=')
            .ok_or_else(|| MemberError::InvalidClusterEntry(entry.to_string()))?;
        if name.is_empty() {
            return Err(MemberError::InvalidClusterEntry(entry.to_string()));
        }
        validate_peer_url(url)?;
        let urls = map.entry(name.to_string()).or_default();
        if !urls.contains(&url.to_string()) {
            urls.push(url.to_string());
        }
    }

    for urls in map.values_mut() {
        urls.sort();
    }
    Ok(map)
}

/// Validate one peer URL: http or https scheme, non-empty host, no spaces.
pub fn validate_peer_url(url: &str) -> MemberResult<()> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .ok_or_else(|| MemberError::InvalidUrl(url.to_string()))?;
    let host = rest.split('/').next().unwrap_or("");
    if host.is_empty() || url.chars().any(|c| c.is_whitespace()) {
        return Err(MemberError::InvalidUrl(url.to_string()));
    }
    Ok(())
}

/// Derive a 64-bit member ID from the token, name, and sorted peer URLs.
fn member_id(token: &str, name: &str, urls: &[String]) -> u64 {
    let mut hasher = Sha256::new();
    for url in urls {
        update_framed(&mut hasher, url.as_bytes());
    }
    update_framed(&mut hasher, name.as_bytes());
    update_framed(&mut hasher, token.as_bytes());
    truncate_to_u64(&hasher.finalize())
}

/// Derive the cluster ID from the token and the sorted member IDs.
fn cluster_id(token: &str, members: &[Member]) -> u64 {
    let mut hasher = Sha256::new();
    for member in members {
        hasher.update(member.id.to_be_bytes());
    }
    update_framed(&mut hasher, token.as_bytes());
    truncate_to_u64(&hasher.finalize())
}

/// Feed one length-prefixed field into the hash. Without the prefix,
/// distinct field sequences whose concatenations coincide (`"xy"` + url vs
/// `"y"` + a one-byte-longer url) would derive the same ID.
fn update_framed(hasher: &mut Sha256, field: &[u8]) {
    hasher.update((field.len() as u64).to_be_bytes());
    hasher.update(field);
}

fn truncate_to_u64(digest: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(buf)
}
