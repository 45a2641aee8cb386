//! CLI module for faultgraph
//!
//! Provides command-line interface for:
//! - failures: failure concepts to diagnose
//! - runs: cascading run selection
//! - rules: trigger registry inspection
//! - traverse: knowledge graph traversal
//! - diagnose: full diagnostic run

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, RunArgs};
pub use commands::{diagnose, failures, rules, run, run_command, runs, traverse};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{error_envelope, success_envelope, write_error, write_response, write_text};
