//! Status record printers
//!
//! The digest engine only returns the record; rendering belongs here.
//! Two formats: a fixed-order human table and the JSON wire shape.

use std::io::{self, Write};

use crate::status::DbStatus;

use super::errors::{CliError, CliResult};

/// Render the status record as an aligned table.
pub fn format_table(status: &DbStatus) -> String {
    format!(
        "hash     : {:08x}\n\
         revision : {}\n\
         totalKey : {}\n\
         totalSize: {}\n",
        status.hash, status.revision, status.total_key, status.total_size
    )
}

/// Render the status record as one JSON line.
pub fn format_json(status: &DbStatus) -> CliResult<String> {
    serde_json::to_string(status)
        .map_err(|e| CliError::error(format!("cannot serialize status record: {}", e)))
}

/// Write the status record to stdout in the requested format.
pub fn print_status(status: &DbStatus, json: bool) -> CliResult<()> {
    let rendered = if json {
        let mut line = format_json(status)?;
        line.push('\n');
        line
    } else {
        format_table(status)
    };

    io::stdout()
        .write_all(rendered.as_bytes())
        .map_err(|e| CliError::io(format!("cannot write to stdout: {}", e)))
}
