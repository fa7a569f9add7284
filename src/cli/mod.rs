//! CLI module for quorumdb
//!
//! Provides the `snapshot` command family:
//! - save: copy the local member's store to a snapshot file
//! - status: print a snapshot's integrity digest
//! - restore: rebuild a bootable data directory from a snapshot

mod args;
mod commands;
mod errors;
mod printer;

pub use args::{Cli, Command, SnapshotCommand};
pub use commands::{run, run_command, save_snapshot};
pub use errors::{CliError, CliErrorKind, CliResult};
pub use printer::{format_json, format_table, print_status};
