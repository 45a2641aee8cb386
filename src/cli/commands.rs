//! CLI command implementations
//!
//! Each command loads the configuration, sets the log level, loads only the
//! collaborators it needs and returns its result as JSON. Nothing is
//! persisted.

use std::path::Path;

use serde_json::{json, Value};

use crate::diagnosis::{DiagnosticReport, DiagnosticRequest, Diagnoser};
use crate::evidence::{RunCatalog, RunId, RunSelection, TelemetrySnapshot};
use crate::graph::{ConceptType, GraphLoader, GraphStore, KnowledgeGraph};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::rules::{RuleId, RuleRegistry};
use crate::traversal::TraversalEngine;

use super::args::{Command, RunArgs};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response, write_text};

/// Main CLI entry point
///
/// Parses arguments, dispatches, and reports any failure as the JSON error
/// envelope. This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    match run_command(cli.command) {
        Ok(()) => Ok(()),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Failures { config } => write_response(failures(&config)?),
        Command::Runs {
            config,
            serial,
            job,
        } => write_response(runs(&config, serial.as_deref(), job.as_deref())?),
        Command::Rules { config } => write_response(rules(&config)?),
        Command::Traverse {
            config,
            failure,
            max_depth,
        } => write_response(traverse(&config, &failure, max_depth)?),
        Command::Diagnose {
            config,
            failure,
            run,
            max_depth,
            table,
        } => {
            let report = diagnose(&config, &failure, &run, max_depth)?;
            if table {
                write_text(&report.to_string())
            } else {
                write_response(serde_json::to_value(&report)?)
            }
        }
    }
}

fn boot(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity());

    let path = config_path.display().to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("log_level", config.log_level.as_str()), ("path", path.as_str())],
    );
    Ok(config)
}

fn load_graph(config: &Config) -> CliResult<KnowledgeGraph> {
    Ok(GraphLoader::load_file(&config.graph_path)?)
}

fn open_telemetry(config: &Config) -> CliResult<TelemetrySnapshot> {
    Ok(TelemetrySnapshot::open(&config.telemetry_path)?)
}

fn load_registry(config: &Config) -> RuleRegistry {
    let registry = config.registry();
    let entries = registry.len().to_string();
    let overrides = config.rules.len().to_string();
    log_event_with_fields(
        Event::RulesLoaded,
        &[("entries", entries.as_str()), ("overrides", overrides.as_str())],
    );
    registry
}

/// Failure labels of the knowledge graph, in graph order
pub fn failures(config_path: &Path) -> CliResult<Value> {
    let config = boot(config_path)?;
    let graph = load_graph(&config)?;
    Ok(json!({
        "failures": graph.list_concepts_of_type(ConceptType::Failure),
        "graph_digest": graph.digest(),
    }))
}

/// Cascading run choices
///
/// No serial: all serial numbers. Serial: its job numbers. Serial and job:
/// their job starts.
pub fn runs(config_path: &Path, serial: Option<&str>, job: Option<&str>) -> CliResult<Value> {
    let config = boot(config_path)?;
    let mut telemetry = open_telemetry(&config)?;
    let catalog = RunCatalog::load(&mut telemetry)?;

    let data = match (serial, job) {
        (None, None) => json!({ "serial_numbers": catalog.serial_numbers() }),
        (Some(serial), None) => json!({
            "serial_number": serial,
            "job_numbers": catalog.job_numbers(serial),
        }),
        (Some(serial), Some(job)) => json!({
            "serial_number": serial,
            "job_number": job,
            "job_starts": catalog.job_starts(serial, job),
        }),
        (None, Some(_)) => {
            return Err(CliError::invalid_arguments("--job requires --serial"));
        }
    };
    Ok(data)
}

/// The effective registry and the rule catalogue
pub fn rules(config_path: &Path) -> CliResult<Value> {
    let config = boot(config_path)?;
    let registry = load_registry(&config);

    let entries: Vec<Value> = registry
        .entries()
        .map(|(label, rule)| json!({ "label": label, "rule": rule }))
        .collect();

    let catalogue: Vec<Value> = RuleId::ALL
        .iter()
        .map(|rule| {
            let query = rule.query("?");
            json!({
                "rule": rule,
                "query": query.name(),
                "condition": rule.condition().to_string(),
                "uses_channel": rule.uses_channel(),
                "sql": query.sql(RunId(0)).text,
                "labels": registry.labels_for(*rule),
            })
        })
        .collect();

    Ok(json!({ "entries": entries, "catalogue": catalogue }))
}

/// Depth-bucketed triples reachable from a failure
pub fn traverse(config_path: &Path, failure: &str, max_depth: Option<i64>) -> CliResult<Value> {
    let config = boot(config_path)?;
    let max_depth = config.max_depth(max_depth)?;
    let graph = load_graph(&config)?;

    let traversal = TraversalEngine::new(&graph).traverse(failure, max_depth)?;
    Ok(json!({
        "failure": failure,
        "max_depth": max_depth,
        "traversal": traversal,
    }))
}

fn resolve_run(run: &RunArgs, telemetry: &mut TelemetrySnapshot) -> CliResult<RunId> {
    match (run.run, &run.serial, &run.job, &run.job_start) {
        (Some(id), None, None, None) => Ok(RunId(id)),
        (None, Some(serial), Some(job), Some(job_start)) => {
            let catalog = RunCatalog::load(telemetry)?;
            let selection = RunSelection {
                serial_number: serial.clone(),
                job_number: job.clone(),
                job_start: job_start.clone(),
            };
            Ok(catalog.resolve(&selection)?)
        }
        _ => Err(CliError::invalid_arguments(
            "Give either --run, or --serial with --job and --job-start",
        )),
    }
}

/// Full diagnostic run for one failure and one run
pub fn diagnose(
    config_path: &Path,
    failure: &str,
    run: &RunArgs,
    max_depth: Option<i64>,
) -> CliResult<DiagnosticReport> {
    let config = boot(config_path)?;
    let max_depth = config.max_depth(max_depth)?;
    let graph = load_graph(&config)?;
    let mut telemetry = open_telemetry(&config)?;
    let registry = load_registry(&config);
    let run_id = resolve_run(run, &mut telemetry)?;

    let request = DiagnosticRequest::new(failure, run_id).with_max_depth(max_depth);
    let report = Diagnoser::new(&graph, &mut telemetry, &registry).diagnose(&request)?;
    Ok(report)
}
