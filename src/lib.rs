//! quorumdb - disaster-recovery snapshot tooling for a replicated
//! key-value store
//!
//! Computes verifiable integrity digests of store snapshots and rebuilds
//! bootable single-member data directories from them.

pub mod backend;
pub mod cli;
pub mod members;
pub mod observability;
pub mod raftlog;
pub mod restore;
pub mod revision;
pub mod status;
