//! SIEVE: schema-driven row validation stage.
//!
//! Reads a CSV of scraped records, validates every row against a declarative
//! rule document, and writes the accepted and rejected partitions.
//!
//! Usage:
//!   sieve validate --input data/raw/normas.csv
//!   sieve validate -i data/raw/normas.csv -r configs/validation_rules.yaml -o data/output --report
//!   sieve check-rules -r configs/validation_rules.yaml
//!   sieve verify-report data/output/run_report.json

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sieve_contracts::error::{SieveError, SieveResult};
use sieve_core::{
    traits::{PartitionSink, RowSource},
    BatchRunner,
};
use sieve_io::{CsvPartitionWriter, CsvRowSource};
use sieve_report::{RunRecorder, RunReport, REPORT_FILE};

// ── CLI definition ────────────────────────────────────────────────────────────

/// SIEVE: validate scraped records against a declarative rule set.
#[derive(Parser)]
#[command(
    name = "sieve",
    about = "Schema-driven row validation stage",
    long_about = "Validates each row of a CSV file against a YAML/TOML rule document and\n\
                  partitions the rows into valid.csv and discarded.csv."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate an input CSV and write both partitions.
    Validate(ValidateArgs),
    /// Load and compile a rule document, then list its fields.
    CheckRules {
        /// Rule document (YAML, or TOML by extension).
        #[arg(short, long, env = "SIEVE_RULES", default_value = DEFAULT_RULES)]
        rules: PathBuf,
    },
    /// Recompute the artifact digests recorded in a run report.
    VerifyReport {
        /// Path to run_report.json.
        report: PathBuf,
    },
}

#[derive(clap::Args)]
struct ValidateArgs {
    /// Input CSV with a header row.
    #[arg(short, long)]
    input: PathBuf,

    /// Rule document (YAML, or TOML by extension).
    #[arg(short, long, env = "SIEVE_RULES", default_value = DEFAULT_RULES)]
    rules: PathBuf,

    /// Directory receiving valid.csv and discarded.csv.
    #[arg(short, long, env = "SIEVE_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Validation threads.  Output is identical for any value.
    #[arg(short, long, env = "SIEVE_WORKERS", default_value_t = 1)]
    workers: usize,

    /// Also write run_report.json with artifact digests.
    #[arg(long)]
    report: bool,
}

const DEFAULT_RULES: &str = "configs/validation_rules.yaml";
const DEFAULT_OUTPUT_DIR: &str = "data/output";

/// Exit status for configuration problems detected before processing.
const EXIT_CONFIG: u8 = 2;
/// Exit status for failures after processing started.
const EXIT_RUNTIME: u8 = 1;

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    // Initialize structured logging.  Set RUST_LOG=debug for per-field output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Validate(args) => validate(&args),
        Command::CheckRules { rules } => check_rules(&rules),
        Command::VerifyReport { report } => verify_report(&report),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", diagnostic(&e));
            ExitCode::from(exit_status(&e))
        }
    }
}

fn exit_status(err: &SieveError) -> u8 {
    match err {
        SieveError::ConfigError { .. } | SieveError::InputError { .. } => EXIT_CONFIG,
        SieveError::OutputError { .. } | SieveError::ReportError { .. } => EXIT_RUNTIME,
    }
}

/// The stderr line for a failed command.  Problems found before processing
/// print their reason alone, e.g. `ERROR: input file not found: in.csv`.
fn diagnostic(err: &SieveError) -> String {
    match err {
        SieveError::ConfigError { .. } | SieveError::InputError { .. } => {
            format!("ERROR: {}", err.reason())
        }
        other => format!("ERROR: {}", other),
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn not_found(what: &str, path: &Path) -> String {
    format!("{} file not found: {}", what, path.display())
}

/// Fail before any processing if the rule document is missing.
fn ensure_rules(path: &Path) -> SieveResult<()> {
    if path.exists() {
        return Ok(());
    }
    Err(SieveError::ConfigError {
        reason: not_found("rules", path),
    })
}

fn validate(args: &ValidateArgs) -> SieveResult<()> {
    if !args.input.exists() {
        return Err(SieveError::InputError {
            reason: not_found("input", &args.input),
        });
    }
    ensure_rules(&args.rules)?;

    let recorder = RunRecorder::start(&args.input, &args.rules);
    let rules = sieve_rules::from_file(&args.rules)?;
    let mut source = CsvRowSource::from_path(&args.input)?;

    info!(
        run_id = %recorder.run_id().0,
        input = %args.input.display(),
        fields = rules.len(),
        workers = args.workers,
        "validation run starting"
    );

    let result = BatchRunner::new(&rules)
        .with_workers(args.workers)
        .run_source(&mut source)?;

    let mut sink = CsvPartitionWriter::new(&args.output_dir);
    let written = sink.write_partitions(&rules, source.columns(), &result)?;

    if args.report {
        let report = recorder.finish(
            result.summary.clone(),
            &[
                (written.accepted_path.clone(), written.accepted_rows),
                (written.rejected_path.clone(), written.rejected_rows),
            ],
        )?;
        report.write_json(&args.output_dir.join(REPORT_FILE))?;
    }

    println!(
        "TOTAL={}  VALID={}  DISCARDED={}  valid -> {}  discarded -> {}",
        result.summary.total,
        result.summary.accepted,
        result.summary.rejected,
        written.accepted_path.display(),
        written.rejected_path.display(),
    );
    Ok(())
}

fn check_rules(path: &Path) -> SieveResult<()> {
    ensure_rules(path)?;
    let rules = sieve_rules::from_file(path)?;
    println!("{}: {} field rule(s)", path.display(), rules.len());
    for (name, rule) in rules.iter() {
        println!(
            "  {:<20} {:<8} {}",
            name,
            rule.field_type.as_str(),
            if rule.required { "required" } else { "optional" }
        );
    }
    Ok(())
}

fn verify_report(path: &Path) -> SieveResult<()> {
    let report = RunReport::read_json(path)?;
    if !report.verify_artifacts()? {
        return Err(SieveError::ReportError {
            reason: format!(
                "artifacts of run {} do not match {}",
                report.run_id.0,
                path.display()
            ),
        });
    }
    println!(
        "run {}: {} artifact(s) verified",
        report.run_id.0,
        report.artifacts.len()
    );
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
