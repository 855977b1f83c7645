//! `toml-oracle` CLI — run the conformance oracle and inspect fixtures.
//!
//! ## Usage
//!
//! ```sh
//! # Run every corpus listed in ./toml-oracle.toml against the `toml` crate
//! toml-oracle run
//!
//! # Run corpora given on the command line, report as JSON
//! toml-oracle run --corpus bs=toml-test:tests/data/burntsushi --json
//!
//! # Print the canonical form of a fixture
//! toml-oracle normalize --dialect toml-test -i valid/float.json
//!
//! # Cross-check two fixtures written in different dialects
//! toml-oracle compare a.json b.json --expected-dialect compliance --actual-dialect toml-test
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use toml_oracle::manifest::{validate_corpora, DEFAULT_MANIFEST_PATH};
use toml_oracle::{
    compare, load_manifest, normalize_fixture, run_corpora, Corpus, Dialect, Outcome, RunReport,
    TomlCrateDecoder,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "toml-oracle",
    version,
    about = "Conformance oracle for TOML decoders"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fixture corpora against the `toml` crate decoder
    Run {
        /// Corpus manifest (defaults to ./toml-oracle.toml when no --corpus is given)
        #[arg(short, long, conflicts_with = "corpus")]
        manifest: Option<PathBuf>,
        /// Corpus as NAME=DIALECT:PATH (repeatable)
        #[arg(long, value_parser = parse_corpus)]
        corpus: Vec<Corpus>,
        /// Print the full report as JSON instead of a text summary
        #[arg(long)]
        json: bool,
    },
    /// Print the canonical tagged-JSON form of a fixture
    Normalize {
        /// Fixture dialect: compliance or toml-test
        #[arg(short, long)]
        dialect: Dialect,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Compare two fixtures after normalizing each in its own dialect
    Compare {
        expected: String,
        actual: String,
        #[arg(long, default_value = "compliance")]
        expected_dialect: Dialect,
        #[arg(long, default_value = "compliance")]
        actual_dialect: Dialect,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            manifest,
            corpus,
            json,
        } => {
            let corpora = resolve_corpora(manifest, corpus)?;
            info!(corpora = corpora.len(), "running oracle");
            let report = run_corpora(&TomlCrateDecoder, &corpora)
                .context("Failed to discover fixture cases")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            if !report.summary.is_success() {
                process::exit(1);
            }
        }
        Commands::Normalize {
            dialect,
            input,
            output,
        } => {
            debug!(%dialect, input = input.as_deref().unwrap_or("<stdin>"), "normalizing fixture");
            let raw = read_input(input.as_deref())?;
            let fixture: serde_json::Value =
                serde_json::from_str(&raw).context("Fixture is not valid JSON")?;
            let canonical =
                normalize_fixture(&fixture, dialect).context("Failed to normalize fixture")?;
            write_output(output.as_deref(), &serde_json::to_string_pretty(&canonical)?)?;
        }
        Commands::Compare {
            expected,
            actual,
            expected_dialect,
            actual_dialect,
        } => {
            debug!(%expected, %actual, "comparing fixtures");
            let expected = load_normalized(&expected, expected_dialect)?;
            let actual = load_normalized(&actual, actual_dialect)?;
            match compare(&expected, &actual) {
                Ok(()) => println!("equal"),
                Err(difference) => {
                    println!("differ {difference}");
                    process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn parse_corpus(spec: &str) -> std::result::Result<Corpus, String> {
    Corpus::parse_spec(spec).map_err(|e| e.to_string())
}

/// Corpora from `--corpus` flags, else from the manifest (explicit or default).
fn resolve_corpora(manifest: Option<PathBuf>, corpus: Vec<Corpus>) -> Result<Vec<Corpus>> {
    if !corpus.is_empty() {
        validate_corpora(&corpus)?;
        return Ok(corpus);
    }
    let path = manifest.unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST_PATH));
    load_manifest(&path).with_context(|| format!("Failed to load manifest: {}", path.display()))
}

fn print_report(report: &RunReport) {
    for case in &report.cases {
        match &case.outcome {
            Outcome::Pass => {}
            Outcome::Fail { failure } => println!("FAIL {}: {}", case.name, failure),
            Outcome::Inconclusive { reason } => println!("INCONCLUSIVE {}: {}", case.name, reason),
        }
    }
    let summary = &report.summary;
    println!(
        "passed: {}  failed: {}  inconclusive: {}",
        summary.passed, summary.failed, summary.inconclusive
    );
}

fn load_normalized(path: &str, dialect: Dialect) -> Result<toml_oracle::CanonicalValue> {
    let raw = read_input(Some(path))?;
    let fixture: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path))?;
    normalize_fixture(&fixture, dialect)
        .with_context(|| format!("Failed to normalize {} as {}", path, dialect))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
