//! CLI command dispatch
//!
//! Each subcommand builds its inputs, calls into the library, and prints.
//! No command retries; failures map onto exit codes via `CliError`.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::observability::Logger;
use crate::restore::{restore, RestoreConfig, STORE_FILE_NAME};
use crate::status::compute_status;

use super::args::{Cli, Command, SnapshotCommand};
use super::errors::{CliError, CliResult};
use super::printer::print_status;

/// Parse arguments and run the selected command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run one parsed command.
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Snapshot(SnapshotCommand::Save { file, data_dir }) => {
            save_snapshot(&data_dir, &file)
        }
        Command::Snapshot(SnapshotCommand::Status { file, json }) => {
            let status = compute_status(&file)?;
            print_status(&status, json)
        }
        Command::Snapshot(SnapshotCommand::Restore {
            file,
            data_dir,
            name,
            initial_cluster,
            initial_cluster_token,
            initial_advertise_peer_urls,
        }) => {
            let config = RestoreConfig {
                snapshot_path: file,
                name,
                data_dir,
                initial_cluster,
                initial_cluster_token,
                peer_urls: initial_advertise_peer_urls
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            };
            restore(&config)?;
            Ok(())
        }
    }
}

/// Copy the local member's store file out as a snapshot.
///
/// Writes to `<file>.part` first and renames into place once the copy is
/// durable, so a crashed save never leaves a plausible-looking partial
/// snapshot under the requested name.
pub fn save_snapshot(data_dir: &Path, file: &Path) -> CliResult<()> {
    let source_path = data_dir.join("member").join("snap").join(STORE_FILE_NAME);
    let mut source = File::open(&source_path).map_err(|e| {
        CliError::invalid_input(format!(
            "cannot open store file {}: {}",
            source_path.display(),
            e
        ))
    })?;

    let part_path = part_path_for(file);
    let result = copy_to_part(&mut source, &part_path).and_then(|()| {
        fs::rename(&part_path, file).map_err(|e| {
            CliError::io(format!(
                "cannot rename {} to {}: {}",
                part_path.display(),
                file.display(),
                e
            ))
        })
    });

    if result.is_err() {
        // never leave a stale .part behind
        let _ = fs::remove_file(&part_path);
        return result;
    }

    Logger::info("SNAPSHOT_SAVED", &[("file", &file.display().to_string())]);
    println!("Snapshot saved at {}", file.display());
    Ok(())
}

fn part_path_for(file: &Path) -> PathBuf {
    let mut name = file.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

fn copy_to_part(source: &mut File, part_path: &Path) -> CliResult<()> {
    let mut part = OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(part_path)
        .map_err(|e| CliError::io(format!("cannot create {}: {}", part_path.display(), e)))?;

    io::copy(source, &mut part)
        .map_err(|e| CliError::io(format!("cannot copy into {}: {}", part_path.display(), e)))?;
    part.sync_all()
        .map_err(|e| CliError::io(format!("cannot fsync {}: {}", part_path.display(), e)))?;
    Ok(())
}
