//! Snapshot restore subsystem
//!
//! Reconstructs a bootable single-member data directory from a raw snapshot
//! file after catastrophic data loss:
//!
//! 1. The restore orchestrator validates the bootstrap descriptor and
//!    derives the `<data_dir>/member/{snap,wal}` layout.
//! 2. The store surgeon copies the snapshot in as `member/snap/db`, strips
//!    stale membership records, and pins the consistency index to 1.
//! 3. The log bootstrapper writes `member/wal` with one
//!    configuration-change entry per declared member, all committed.
//!
//! The surgeon always runs before the bootstrapper; see `restorer` for why
//! the ordering is load-bearing. Nothing here retries: a failed restore
//! leaves a directory the operator deletes before trying again.

mod bootstrap;
mod config;
mod errors;
mod restorer;
mod surgeon;

pub use bootstrap::bootstrap_log;
pub use config::{RestoreConfig, DEFAULT_CLUSTER_TOKEN, DEFAULT_NAME, DEFAULT_PEER_URL};
pub use errors::{RestoreError, RestoreErrorCode, RestoreResult};
pub use restorer::restore;
pub use surgeon::{rehost_store, STORE_FILE_NAME};
