//! Restore bootstrap configuration
//!
//! An immutable descriptor of the cluster being bootstrapped from a
//! snapshot. The CLI builds it once from its flags and passes it down;
//! nothing here is process-global state. Validation happens exactly once,
//! before any filesystem mutation.

use std::path::PathBuf;

use crate::members::{validate_peer_url, MemberSet};

use super::errors::{RestoreError, RestoreResult};

/// Default member name when none is given.
pub const DEFAULT_NAME: &str = "default";

/// Default cluster token.
pub const DEFAULT_CLUSTER_TOKEN: &str = "quorum-cluster";

/// Default advertised peer URL.
pub const DEFAULT_PEER_URL: &str = "http://localhost:2380";

/// Suffix for the derived default data directory.
const DATA_DIR_SUFFIX: &str = ".qdb";

/// Immutable bootstrap descriptor for one restore run.
#[derive(Debug, Clone)]
pub struct RestoreConfig {
    /// Path to the snapshot file being restored
    pub snapshot_path: PathBuf,
    /// This member's display name
    pub name: String,
    /// Explicit data directory; derived from `name` when absent
    pub data_dir: Option<PathBuf>,
    /// Initial-cluster map, `name=url` comma-separated
    pub initial_cluster: String,
    /// Cluster token mixed into every derived ID
    pub initial_cluster_token: String,
    /// This member's advertised peer URLs
    pub peer_urls: Vec<String>,
}

impl RestoreConfig {
    /// Validate the descriptor and derive the member set.
    ///
    /// Checks, in order: every advertised peer URL parses, the
    /// initial-cluster map parses into a non-empty member set, and the
    /// named self member exists in that set. Performs no filesystem access.
    pub fn validate(&self) -> RestoreResult<MemberSet> {
        for url in &self.peer_urls {
            validate_peer_url(url).map_err(RestoreError::invalid_config)?;
        }

        let member_set = MemberSet::build(&self.initial_cluster_token, &self.initial_cluster)
            .map_err(RestoreError::invalid_config)?;

        if member_set.member_by_name(&self.name).is_none() {
            return Err(RestoreError::self_not_found(&self.name));
        }

        Ok(member_set)
    }

    /// The data directory this restore will create: explicit, or
    /// `<name>.qdb` next to the working directory.
    pub fn data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => PathBuf::from(format!("{}{}", self.name, DATA_DIR_SUFFIX)),
        }
    }

    /// The log directory inside the data directory.
    pub fn wal_dir(&self) -> PathBuf {
        self.data_dir().join("member").join("wal")
    }

    /// The store directory inside the data directory.
    pub fn snap_dir(&self) -> PathBuf {
        self.data_dir().join("member").join("snap")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restore::RestoreErrorCode;
    use std::path::Path;

    fn sample_config() -> RestoreConfig {
        RestoreConfig {
            snapshot_path: PathBuf::from("snap.db"),
            name: "node-a".to_string(),
            data_dir: None,
            initial_cluster: "node-a=http://h1:2380,node-b=http://h2:2380".to_string(),
            initial_cluster_token: "recovery-1".to_string(),
            peer_urls: vec!["http://h1:2380".to_string()],
        }
    }

    #[test]
    fn test_valid_config_derives_member_set() {
        let set = sample_config().validate().unwrap();
        assert_eq!(set.members().len(), 2);
        assert!(set.member_by_name("node-a").is_some());
    }

    #[test]
    fn test_self_absent_is_self_not_found() {
        let mut config = sample_config();
        config.name = "node-z".to_string();
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), RestoreErrorCode::QuorumRestoreSelfNotFound);
    }

    #[test]
    fn test_bad_peer_url_is_invalid_config() {
        let mut config = sample_config();
        config.peer_urls = vec!["not-a-url".to_string()];
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), RestoreErrorCode::QuorumRestoreInvalidConfig);
    }

    #[test]
    fn test_bad_cluster_map_is_invalid_config() {
        let mut config = sample_config();
        config.initial_cluster = "broken".to_string();
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), RestoreErrorCode::QuorumRestoreInvalidConfig);
    }

    #[test]
    fn test_default_data_dir_derived_from_name() {
        let config = sample_config();
        assert_eq!(config.data_dir(), Path::new("node-a.qdb"));
        assert_eq!(config.wal_dir(), Path::new("node-a.qdb/member/wal"));
        assert_eq!(config.snap_dir(), Path::new("node-a.qdb/member/snap"));
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let mut config = sample_config();
        config.data_dir = Some(PathBuf::from("/var/lib/quorum"));
        assert_eq!(config.data_dir(), Path::new("/var/lib/quorum"));
    }
}
