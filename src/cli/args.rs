//! CLI argument definitions using clap
//!
//! Commands:
//! - quorumdb snapshot save <file> [--data-dir <dir>]
//! - quorumdb snapshot status <file> [--json]
//! - quorumdb snapshot restore <file> [--data-dir] [--name]
//!   [--initial-cluster] [--initial-cluster-token]
//!   [--initial-advertise-peer-urls]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::restore::{DEFAULT_CLUSTER_TOKEN, DEFAULT_NAME, DEFAULT_PEER_URL};

/// quorumdb - disaster-recovery snapshot tooling
#[derive(Parser, Debug)]
#[command(name = "quorumdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage store snapshots
    #[command(subcommand)]
    Snapshot(SnapshotCommand),
}

#[derive(Subcommand, Debug)]
pub enum SnapshotCommand {
    /// Save a copy of the local member's store to a file
    Save {
        /// Destination file for the snapshot
        file: PathBuf,

        /// Data directory of the member to snapshot
        #[arg(long, default_value = "default.qdb")]
        data_dir: PathBuf,
    },

    /// Print the integrity status of a snapshot file
    Status {
        /// Snapshot file to examine
        file: PathBuf,

        /// Emit the status record as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Restore a snapshot into a new single-member data directory
    Restore {
        /// Snapshot file to restore from
        file: PathBuf,

        /// Path to the target data directory (defaults to <name>.qdb)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Human-readable name for this member
        #[arg(long, default_value = DEFAULT_NAME)]
        name: String,

        /// Initial cluster configuration for restore bootstrap
        #[arg(long, default_value_t = default_initial_cluster())]
        initial_cluster: String,

        /// Initial cluster token for the cluster during restore bootstrap
        #[arg(long, default_value = DEFAULT_CLUSTER_TOKEN)]
        initial_cluster_token: String,

        /// Comma-separated list of this member's peer URLs to advertise
        #[arg(long, default_value = DEFAULT_PEER_URL)]
        initial_advertise_peer_urls: String,
    },
}

/// Default initial-cluster map for a lone default-named member.
fn default_initial_cluster() -> String {
    format!("{}={}", DEFAULT_NAME, DEFAULT_PEER_URL)
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
