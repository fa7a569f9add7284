//! Restore orchestration
//!
//! Validates the bootstrap descriptor, derives the target directory layout,
//! and sequences store surgery then log bootstrapping. Ordering matters:
//! the store's consistency index must be durably 1 before the new log
//! exists, so the log's entries are strictly ahead of the store's recorded
//! index and get reapplied at startup.
//!
//! There is no partial-success mode. Validation failures and an existing
//! target directory are reported before anything is written; a later
//! failure leaves the target directory unusable, and the caller removes it
//! before retrying.

use crate::observability::Logger;

use super::bootstrap::bootstrap_log;
use super::config::RestoreConfig;
use super::errors::{RestoreError, RestoreResult};
use super::surgeon::rehost_store;

/// Restore a snapshot into a bootable single-member data directory.
///
/// On success, `<data_dir>/member/snap/db` holds the rehosted store and
/// `<data_dir>/member/wal` the bootstrap log. Starting a server against the
/// directory is the caller's concern.
pub fn restore(config: &RestoreConfig) -> RestoreResult<()> {
    // validate before any filesystem mutation
    let member_set = config.validate()?;

    let data_dir = config.data_dir();
    if data_dir.exists() {
        return Err(RestoreError::already_exists(&data_dir));
    }

    rehost_store(&config.snapshot_path, &config.snap_dir())?;
    bootstrap_log(&config.wal_dir(), &member_set, &config.name)?;

    Logger::info(
        "RESTORE_COMPLETE",
        &[
            ("data_dir", &data_dir.display().to_string()),
            ("name", &config.name),
            ("snapshot", &config.snapshot_path.display().to_string()),
        ],
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{StoreFile, BUCKET_KEY, BUCKET_MEMBERS};
    use crate::restore::RestoreErrorCode;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_snapshot(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("snapshot.db");
        let mut store = StoreFile::new();
        store
            .bucket_mut(BUCKET_KEY)
            .insert(b"k".to_vec(), b"v".to_vec());
        store
            .bucket_mut(BUCKET_MEMBERS)
            .insert(b"old".to_vec(), b"urls".to_vec());
        store.write(&path).unwrap();
        path
    }

    fn config_for(dir: &TempDir, snapshot: PathBuf) -> RestoreConfig {
        RestoreConfig {
            snapshot_path: snapshot,
            name: "node-a".to_string(),
            data_dir: Some(dir.path().join("node-a.qdb")),
            initial_cluster: "node-a=http://h1:2380".to_string(),
            initial_cluster_token: "recovery-1".to_string(),
            peer_urls: vec!["http://h1:2380".to_string()],
        }
    }

    #[test]
    fn test_restore_produces_full_layout() {
        let dir = TempDir::new().unwrap();
        let snapshot = write_snapshot(&dir);
        let config = config_for(&dir, snapshot);

        restore(&config).unwrap();

        assert!(config.snap_dir().join("db").is_file());
        assert!(config.wal_dir().join("wal.log").is_file());
    }

    #[test]
    fn test_existing_data_dir_refused_without_writes() {
        let dir = TempDir::new().unwrap();
        let snapshot = write_snapshot(&dir);
        let config = config_for(&dir, snapshot);
        fs::create_dir_all(config.data_dir()).unwrap();

        let err = restore(&config).unwrap_err();
        assert_eq!(err.code(), RestoreErrorCode::QuorumRestoreAlreadyExists);

        // nothing was written beneath the existing directory
        let entries: Vec<_> = fs::read_dir(config.data_dir()).unwrap().collect();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_invalid_config_reported_before_any_mutation() {
        let dir = TempDir::new().unwrap();
        let snapshot = write_snapshot(&dir);
        let mut config = config_for(&dir, snapshot);
        config.name = "absent".to_string();

        let err = restore(&config).unwrap_err();
        assert_eq!(err.code(), RestoreErrorCode::QuorumRestoreSelfNotFound);
        assert!(!config.data_dir().exists());
    }
}
