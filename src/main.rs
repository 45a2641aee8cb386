//! faultgraph CLI entry point
//!
//! This is a minimal entrypoint that:
//! 1. Parses CLI arguments (via cli::run)
//! 2. Dispatches to CLI commands (via cli::run)
//! 3. Exits with non-zero on failure
//!
//! The error envelope has already been written to stdout by cli::run; the
//! plain message goes to stderr.

use faultgraph::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
