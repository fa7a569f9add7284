//! Log bootstrapping: synthesize the initial replication log
//!
//! A freshly restored member has no log history; it gets a new one holding
//! exactly the configuration-change entries that declare the initial
//! membership set. Every entry carries term 1 and a contiguous index
//! starting at 1, and the hard state marks them all committed, so a
//! single-member cluster starts serving without waiting on further
//! agreement.

use std::path::Path;

use crate::members::MemberSet;
use crate::observability::Logger;
use crate::raftlog::{
    ConfChange, ConfChangeType, EntryType, HardState, LogEntry, LogMetadata, LogWriter,
};

use super::errors::{RestoreError, RestoreResult};

/// Create `wal_dir` and write the bootstrap log for `member_set`.
///
/// Fails with `SelfNotFound` if `self_name` is absent from the set. Entry
/// order follows the set's stable iteration order; the first member in that
/// order receives the recorded vote.
pub fn bootstrap_log(
    wal_dir: &Path,
    member_set: &MemberSet,
    self_name: &str,
) -> RestoreResult<()> {
    let self_member = member_set
        .member_by_name(self_name)
        .ok_or_else(|| RestoreError::self_not_found(self_name))?;

    let metadata = LogMetadata {
        node_id: self_member.id,
        cluster_id: member_set.id(),
    };

    let mut entries = Vec::with_capacity(member_set.members().len());
    for (i, member) in member_set.members().iter().enumerate() {
        let context = serde_json::to_vec(member).map_err(|e| {
            RestoreError::encode_error(format!(
                "cannot serialize member {:?}: {}",
                member.name, e
            ))
        })?;
        let conf_change = ConfChange {
            change_type: ConfChangeType::AddNode,
            node_id: member.id,
            context,
        };
        entries.push(LogEntry {
            term: 1,
            index: (i + 1) as u64,
            entry_type: EntryType::ConfChange,
            data: conf_change.serialize(),
        });
    }

    let hard_state = HardState {
        term: 1,
        vote: member_set.members()[0].id,
        commit: entries.len() as u64,
    };

    let mut writer = LogWriter::create(wal_dir, metadata).map_err(RestoreError::from_log)?;
    writer
        .save(hard_state, &entries)
        .map_err(RestoreError::from_log)?;
    writer.close().map_err(RestoreError::from_log)?;

    Logger::info(
        "LOG_BOOTSTRAPPED",
        &[
            ("dir", &wal_dir.display().to_string()),
            ("members", &member_set.members().len().to_string()),
            ("commit", &hard_state.commit.to_string()),
        ],
    );
    Ok(())
}
