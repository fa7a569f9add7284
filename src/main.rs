//! quorumdb CLI entry point
//!
//! A minimal entrypoint that parses arguments, dispatches via cli::run,
//! prints errors to stderr, and exits with the error's code. All logic
//! lives in the library modules.

use quorumdb::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}
