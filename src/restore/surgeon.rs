//! Store surgery: rehost a snapshot as a fresh member's store
//!
//! Copies a raw snapshot file into the target store directory, then reopens
//! the copy and removes everything that ties it to the old cluster: the
//! `members` and `members_removed` buckets are emptied, and the persisted
//! consistency-index marker is forced to 1 regardless of the source store's
//! history. The new log's entries all carry indices above 1, so a server
//! starting from the rehosted store sees them as strictly ahead and
//! reapplies the bootstrap entries.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use crate::backend::{
    ConsistentIndexProvider, Store, BUCKET_MEMBERS, BUCKET_MEMBERS_REMOVED,
};
use crate::observability::Logger;

use super::errors::{RestoreError, RestoreResult};

/// Name of the store file inside the store directory.
pub const STORE_FILE_NAME: &str = "db";

/// Consistency index for a freshly restored store.
///
/// Injected into the reopened store so surgery never waits on a future log
/// index from the old cluster's history, and so this module stays decoupled
/// from the server's index tracking.
struct BootstrapIndex;

impl ConsistentIndexProvider for BootstrapIndex {
    fn consistent_index(&self) -> u64 {
        1
    }
}

/// Rehost `snapshot_path` as the store of a brand-new single-member cluster
/// under `snap_dir`.
///
/// `snap_dir` must not exist yet; this never merges into or overwrites an
/// existing store directory. On any failure the caller must treat the
/// target directory as unusable and remove it before retrying.
pub fn rehost_store(snapshot_path: &Path, snap_dir: &Path) -> RestoreResult<()> {
    if snap_dir.exists() {
        return Err(RestoreError::already_exists(snap_dir));
    }

    let mut src = File::open(snapshot_path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            RestoreError::not_found(snapshot_path, e)
        } else {
            RestoreError::io_error_at_path(snapshot_path, e)
        }
    })?;

    create_private_dir(snap_dir)?;

    let db_path = snap_dir.join(STORE_FILE_NAME);
    copy_verbatim(&mut src, &db_path)?;

    // Reopen the copy as a live store and cut it loose from the old cluster.
    let mut store = Store::open(&db_path, Box::new(BootstrapIndex))
        .map_err(|e| RestoreError::corrupt_store(&db_path, e))?;

    let mut tx = store.begin();
    tx.delete_all(BUCKET_MEMBERS);
    tx.delete_all(BUCKET_MEMBERS_REMOVED);
    // commit also forces the consistency-index marker out as 1
    tx.commit()
        .map_err(|e| RestoreError::from_surgery(&db_path, e))?;

    Logger::info(
        "STORE_REHOSTED",
        &[
            ("source", &snapshot_path.display().to_string()),
            ("target", &db_path.display().to_string()),
        ],
    );
    Ok(())
}

/// Create the target directory (and parents) with owner-only permissions.
fn create_private_dir(dir: &Path) -> RestoreResult<()> {
    fs::create_dir_all(dir).map_err(|e| RestoreError::io_error_at_path(dir, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))
            .map_err(|e| RestoreError::io_error_at_path(dir, e))?;
    }
    Ok(())
}

/// Byte-copy the snapshot into place with fsync; a failure at any step is
/// an I/O failure and the partial target file must not be trusted.
fn copy_verbatim(src: &mut File, dst_path: &Path) -> RestoreResult<()> {
    let mut dst = OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(dst_path)
        .map_err(|e| RestoreError::io_error_at_path(dst_path, e))?;

    io::copy(src, &mut dst).map_err(|e| RestoreError::io_error_at_path(dst_path, e))?;
    dst.sync_all()
        .map_err(|e| RestoreError::io_error_at_path(dst_path, e))?;
    Ok(())
}
