//! Full restore scenarios
//!
//! Exercises the orchestrator end to end: layout production, log contents,
//! ordering guarantees, and the refuse-before-write failure modes.

use std::fs;
use std::path::PathBuf;

use quorumdb::backend::{
    ConsistentIndexProvider, Store, StoreFile, BUCKET_KEY, BUCKET_MEMBERS,
};
use quorumdb::members::{Member, MemberSet};
use quorumdb::raftlog::{
    ConfChange, ConfChangeType, EntryType, LogReader, LogRecord, LOG_FILE_NAME,
};
use quorumdb::restore::{restore, RestoreConfig, RestoreErrorCode, STORE_FILE_NAME};
use quorumdb::revision::Revision;
use tempfile::TempDir;

struct NoIndex;

impl ConsistentIndexProvider for NoIndex {
    fn consistent_index(&self) -> u64 {
        0
    }
}

fn write_snapshot(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("snapshot.db");
    let mut store = StoreFile::new();
    store
        .bucket_mut(BUCKET_KEY)
        .insert(Revision::new(1, 0).encode().to_vec(), b"v".to_vec());
    store
        .bucket_mut(BUCKET_MEMBERS)
        .insert(b"stale-member".to_vec(), b"urls".to_vec());
    store.write(&path).unwrap();
    path
}

fn single_member_config(dir: &TempDir, snapshot: PathBuf) -> RestoreConfig {
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
fn restore_produces_bootable_layout() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&dir);
    let config = single_member_config(&dir, snapshot);

    restore(&config).unwrap();

    let db_path = config.data_dir().join("member/snap").join(STORE_FILE_NAME);
    let wal_path = config.data_dir().join("member/wal").join(LOG_FILE_NAME);
    assert!(db_path.is_file());
    assert!(wal_path.is_file());

    // store side: membership purged, consistency index pinned
    let store = Store::open(&db_path, Box::new(NoIndex)).unwrap();
    assert_eq!(store.bucket(BUCKET_MEMBERS).unwrap().len(), 0);
    assert_eq!(store.bucket(BUCKET_KEY).unwrap().len(), 1);
    assert_eq!(store.consistent_index(), Some(1));

    // log side: metadata, hard state, one committed conf-change entry
    let records = LogReader::open(&wal_path).unwrap().read_all().unwrap();
    assert_eq!(records.len(), 3);

    let set = MemberSet::build("recovery-1", "node-a=http://h1:2380").unwrap();
    let self_id = set.member_by_name("node-a").unwrap().id;

    let LogRecord::Metadata(md) = &records[0] else {
        panic!("expected metadata record first");
    };
    assert_eq!(md.node_id, self_id);
    assert_eq!(md.cluster_id, set.id());

    let LogRecord::HardState(hs) = &records[1] else {
        panic!("expected hard state second");
    };
    assert_eq!((hs.term, hs.vote, hs.commit), (1, self_id, 1));

    let LogRecord::Entry(entry) = &records[2] else {
        panic!("expected entry third");
    };
    assert_eq!(entry.term, 1);
    assert_eq!(entry.index, 1);
    assert_eq!(entry.entry_type, EntryType::ConfChange);

    let cc = ConfChange::deserialize(&entry.data).unwrap();
    assert_eq!(cc.change_type, ConfChangeType::AddNode);
    assert_eq!(cc.node_id, self_id);
    let member: Member = serde_json::from_slice(&cc.context).unwrap();
    assert_eq!(member.name, "node-a");
    assert_eq!(member.peer_urls, vec!["http://h1:2380"]);
}

#[test]
fn restore_with_three_members_commits_all_entries() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&dir);
    let config = RestoreConfig {
        snapshot_path: snapshot,
        name: "n2".to_string(),
        data_dir: Some(dir.path().join("n2.qdb")),
        initial_cluster: "n1=http://h1:2380,n2=http://h2:2380,n3=http://h3:2380".to_string(),
        initial_cluster_token: "recovery-1".to_string(),
        peer_urls: vec!["http://h2:2380".to_string()],
    };

    restore(&config).unwrap();

    let wal_path = config.data_dir().join("member/wal").join(LOG_FILE_NAME);
    let records = LogReader::open(&wal_path).unwrap().read_all().unwrap();

    let entries: Vec<_> = records
        .iter()
        .filter_map(|r| match r {
            LogRecord::Entry(e) => Some(e),
            _ => None,
        })
        .collect();
    assert_eq!(entries.len(), 3);
    let indices: Vec<u64> = entries.iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![1, 2, 3]);

    let LogRecord::HardState(hs) = &records[1] else {
        panic!("expected hard state");
    };
    assert_eq!(hs.commit, 3);
    assert_eq!(hs.term, 1);

    // the metadata names this member, not the first member
    let set = MemberSet::build(
        "recovery-1",
        "n1=http://h1:2380,n2=http://h2:2380,n3=http://h3:2380",
    )
    .unwrap();
    let LogRecord::Metadata(md) = &records[0] else {
        panic!("expected metadata");
    };
    assert_eq!(md.node_id, set.member_by_name("n2").unwrap().id);
    assert_eq!(hs.vote, set.members()[0].id);
}

#[test]
fn restore_into_existing_data_dir_fails_clean() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&dir);
    let config = single_member_config(&dir, snapshot);

    fs::create_dir_all(config.data_dir()).unwrap();

    let err = restore(&config).unwrap_err();
    assert_eq!(err.code(), RestoreErrorCode::QuorumRestoreAlreadyExists);

    let entries: Vec<_> = fs::read_dir(config.data_dir()).unwrap().collect();
    assert!(entries.is_empty(), "no writes under the existing directory");
}

#[test]
fn restore_with_absent_self_fails_before_any_directory() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&dir);
    let config = RestoreConfig {
        snapshot_path: snapshot,
        name: "node-c".to_string(),
        data_dir: Some(dir.path().join("node-c.qdb")),
        initial_cluster: "node-a=http://h1:2380,node-b=http://h2:2380".to_string(),
        initial_cluster_token: "recovery-1".to_string(),
        peer_urls: vec!["http://h3:2380".to_string()],
    };

    let err = restore(&config).unwrap_err();
    assert_eq!(err.code(), RestoreErrorCode::QuorumRestoreSelfNotFound);
    assert!(!config.data_dir().exists());
}

#[test]
fn restored_ids_are_stable_across_runs() {
    let dir_a = TempDir::new().unwrap();
    let dir_b = TempDir::new().unwrap();

    for dir in [&dir_a, &dir_b] {
        let snapshot = write_snapshot(dir);
        let config = single_member_config(dir, snapshot);
        restore(&config).unwrap();
    }

    let read_metadata = |dir: &TempDir| {
        let wal_path = dir
            .path()
            .join("node-a.qdb/member/wal")
            .join(LOG_FILE_NAME);
        let records = LogReader::open(&wal_path).unwrap().read_all().unwrap();
        match &records[0] {
            LogRecord::Metadata(md) => *md,
            other => panic!("expected metadata, got {:?}", other),
        }
    };

    assert_eq!(read_metadata(&dir_a), read_metadata(&dir_b));
}
