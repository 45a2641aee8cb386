//! CLI argument definitions using clap
//!
//! Commands:
//! - faultgraph failures --config <path>
//! - faultgraph runs --config <path> [--serial <s> [--job <j>]]
//! - faultgraph rules --config <path>
//! - faultgraph traverse --config <path> --failure <label> [--max-depth <n>]
//! - faultgraph diagnose --config <path> --failure <label> (--run <id> | --serial <s> --job <j> --job-start <ts>) [--max-depth <n>] [--table]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// faultgraph - knowledge-graph failure diagnosis over equipment telemetry
#[derive(Parser, Debug)]
#[command(name = "faultgraph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the failure concepts of the knowledge graph
    Failures {
        /// Path to configuration file
        #[arg(long, default_value = "./faultgraph.json")]
        config: PathBuf,
    },

    /// List run choices: serials, then jobs of a serial, then job starts
    Runs {
        /// Path to configuration file
        #[arg(long, default_value = "./faultgraph.json")]
        config: PathBuf,

        #[arg(long)]
        serial: Option<String>,

        #[arg(long, requires = "serial")]
        job: Option<String>,
    },

    /// List trigger labels, their rules and the SQL each rule issues
    Rules {
        /// Path to configuration file
        #[arg(long, default_value = "./faultgraph.json")]
        config: PathBuf,
    },

    /// Traverse the knowledge graph from a failure
    Traverse {
        /// Path to configuration file
        #[arg(long, default_value = "./faultgraph.json")]
        config: PathBuf,

        /// Failure label to start from
        #[arg(long)]
        failure: String,

        /// Exclusive depth cutoff, -1 for unbounded
        #[arg(long, allow_negative_numbers = true)]
        max_depth: Option<i64>,
    },

    /// Diagnose a failure against the telemetry of one run
    Diagnose {
        /// Path to configuration file
        #[arg(long, default_value = "./faultgraph.json")]
        config: PathBuf,

        /// Failure label to diagnose
        #[arg(long)]
        failure: String,

        #[command(flatten)]
        run: RunArgs,

        /// Exclusive depth cutoff, -1 for unbounded
        #[arg(long, allow_negative_numbers = true)]
        max_depth: Option<i64>,

        /// Print the root-cause table instead of JSON
        #[arg(long)]
        table: bool,
    },
}

/// A run given directly or by its metadata
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Partition id of the run
    #[arg(long, conflicts_with_all = ["serial", "job", "job_start"])]
    pub run: Option<u64>,

    /// Equipment serial number
    #[arg(long, requires_all = ["job", "job_start"])]
    pub serial: Option<String>,

    #[arg(long, requires = "serial")]
    pub job: Option<String>,

    /// Job start, YYYY-MM-DD HH:MM:SS[.ffffff]
    #[arg(long, requires = "serial")]
    pub job_start: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
