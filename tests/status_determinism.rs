//! Digest determinism and accounting properties
//!
//! The status record must be a pure function of the snapshot's bytes:
//! identical files yield identical records, the key count equals the sum of
//! entry counts over every bucket, and the hash folds buckets in sorted
//! name order.

use std::fs;

use quorumdb::backend::StoreFile;
use quorumdb::revision::Revision;
use quorumdb::status::{compute_status, StatusErrorCode};
use tempfile::TempDir;

fn versioned_key(main: i64, sub: i64) -> Vec<u8> {
    Revision::new(main, sub).encode().to_vec()
}

#[test]
fn identical_files_yield_identical_status() {
    let dir = TempDir::new().unwrap();

    let mut store = StoreFile::new();
    store
        .bucket_mut(b"key")
        .insert(versioned_key(1, 0), b"one".to_vec());
    store
        .bucket_mut(b"key")
        .insert(versioned_key(2, 1), b"two".to_vec());
    store
        .bucket_mut(b"members")
        .insert(b"m".to_vec(), b"urls".to_vec());

    let path_a = dir.path().join("a.db");
    let path_b = dir.path().join("b.db");
    store.write(&path_a).unwrap();
    fs::copy(&path_a, &path_b).unwrap();

    let status_a = compute_status(&path_a).unwrap();
    let status_b = compute_status(&path_b).unwrap();
    assert_eq!(status_a, status_b);

    // and repeated runs over the same file agree
    assert_eq!(compute_status(&path_a).unwrap(), status_a);
}

#[test]
fn total_key_counts_every_bucket() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db");

    let mut store = StoreFile::new();
    for main in 1..=5 {
        store
            .bucket_mut(b"key")
            .insert(versioned_key(main, 0), b"v".to_vec());
    }
    for i in 0..3u8 {
        store
            .bucket_mut(b"members")
            .insert(vec![b'm', i], b"urls".to_vec());
    }
    store.bucket_mut(b"meta"); // empty bucket contributes zero
    store.write(&path).unwrap();

    let status = compute_status(&path).unwrap();
    assert_eq!(status.total_key, 8);
    assert_eq!(status.revision, 5);
}

#[test]
fn scenario_key_and_empty_meta_bucket() {
    // Bucket "key" holds revisions (1,0) and (3,0); bucket "meta" is
    // empty. "key" sorts before "meta", so its name and entries enter
    // the hash first.
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db");

    let mut store = StoreFile::new();
    store
        .bucket_mut(b"key")
        .insert(versioned_key(1, 0), b"v1".to_vec());
    store
        .bucket_mut(b"key")
        .insert(versioned_key(3, 0), b"v3".to_vec());
    store.bucket_mut(b"meta");
    store.write(&path).unwrap();

    let status = compute_status(&path).unwrap();
    assert_eq!(status.revision, 3);
    assert_eq!(status.total_key, 2);
    assert_eq!(
        status.total_size,
        fs::metadata(&path).unwrap().len() as i64
    );

    let mut expected = 0u32;
    expected = crc32c::crc32c_append(expected, b"key");
    expected = crc32c::crc32c_append(expected, &versioned_key(1, 0));
    expected = crc32c::crc32c_append(expected, b"v1");
    expected = crc32c::crc32c_append(expected, &versioned_key(3, 0));
    expected = crc32c::crc32c_append(expected, b"v3");
    expected = crc32c::crc32c_append(expected, b"meta");
    assert_eq!(status.hash, expected);
}

#[test]
fn value_bytes_change_the_hash() {
    let dir = TempDir::new().unwrap();

    let mut store = StoreFile::new();
    store
        .bucket_mut(b"key")
        .insert(versioned_key(1, 0), b"aaa".to_vec());
    let path_a = dir.path().join("a.db");
    store.write(&path_a).unwrap();

    let mut altered = StoreFile::new();
    altered
        .bucket_mut(b"key")
        .insert(versioned_key(1, 0), b"bbb".to_vec());
    let path_b = dir.path().join("b.db");
    altered.write(&path_b).unwrap();

    assert_ne!(
        compute_status(&path_a).unwrap().hash,
        compute_status(&path_b).unwrap().hash
    );
}

#[test]
fn empty_store_reports_zero_revision() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db");
    StoreFile::new().write(&path).unwrap();

    let status = compute_status(&path).unwrap();
    assert_eq!(status.revision, 0);
    assert_eq!(status.total_key, 0);
    assert!(status.total_size > 0);
}

#[test]
fn undecodable_versioned_key_is_corruption() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db");

    let mut store = StoreFile::new();
    store
        .bucket_mut(b"key")
        .insert(b"way-too-short".to_vec(), b"v".to_vec());
    store.write(&path).unwrap();

    let err = compute_status(&path).unwrap_err();
    assert_eq!(err.code(), StatusErrorCode::QuorumStatusCorrupt);
}
