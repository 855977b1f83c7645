//! Fixture driver — discovers fixture cases and runs the oracle over them.
//!
//! Each case is independent: one document, at most one oracle file, one
//! decoder call, one comparison. A case that fails for any reason (decoder
//! error, converter contract violation, malformed oracle) records the
//! failure in its own `CaseReport`; the run always continues.
//!
//! # Case state machine
//!
//! | Corpus subtree | Decoder result | Oracle file | Outcome |
//! |---|---|---|---|
//! | `invalid/` | error | — | pass |
//! | `invalid/` | success | — | fail (unexpected success) |
//! | `valid/` | error | any | fail (decode) |
//! | `valid/` | success | missing | inconclusive |
//! | `valid/` | success | present | pass iff canonical forms are equal |

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::canonical::{first_difference, CanonicalValue, Difference};
use crate::convert::convert_table;
use crate::decoder::{DecodeError, Decoder};
use crate::dialect::Dialect;
use crate::error::{OracleError, Result};
use crate::manifest::Corpus;
use crate::normalize::normalize_fixture;

const DOCUMENT_EXTENSION: &str = "toml";
const ORACLE_EXTENSION: &str = "json";

/// Whether a document is expected to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Expectation {
    Valid,
    Invalid,
}

/// The oracle side of a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Oracle {
    /// The document must fail to decode; there is nothing to compare.
    Invalid,
    /// Compare against this oracle file.
    Expected(PathBuf),
    /// A valid document whose oracle file does not exist (the path it would
    /// have had).
    Missing(PathBuf),
}

/// One document/oracle pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureCase {
    /// `<corpus>/<path relative to the corpus root, without extension>`.
    pub name: String,
    pub document: PathBuf,
    pub oracle: Oracle,
    pub dialect: Dialect,
}

impl FixtureCase {
    pub fn expectation(&self) -> Expectation {
        match self.oracle {
            Oracle::Invalid => Expectation::Invalid,
            Oracle::Expected(_) | Oracle::Missing(_) => Expectation::Valid,
        }
    }
}

/// Why a case failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Failure {
    /// An `invalid/` document decoded successfully.
    UnexpectedSuccess,
    /// A `valid/` document failed to decode.
    Decode { message: String },
    /// Decoder output and oracle disagree.
    Mismatch { difference: Difference },
    /// The converter, normalizer, or fixture loading failed.
    Oracle { message: String },
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::UnexpectedSuccess => f.write_str("invalid document decoded successfully"),
            Failure::Decode { message } => write!(f, "valid document failed to decode: {message}"),
            Failure::Mismatch { difference } => write!(f, "mismatch {difference}"),
            Failure::Oracle { message } => f.write_str(message),
        }
    }
}

/// The result of one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Outcome {
    Pass,
    Fail { failure: Failure },
    /// Known-incomplete fixture; neither pass nor fail.
    Inconclusive { reason: String },
}

impl Outcome {
    fn fail(failure: Failure) -> Self {
        Outcome::Fail { failure }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    pub name: String,
    pub expectation: Expectation,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub inconclusive: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.inconclusive
    }

    /// Inconclusive cases do not count against success.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Pass => self.passed += 1,
            Outcome::Fail { .. } => self.failed += 1,
            Outcome::Inconclusive { .. } => self.inconclusive += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub cases: Vec<CaseReport>,
    pub summary: RunSummary,
}

impl RunReport {
    fn push(&mut self, report: CaseReport) {
        self.summary.record(&report.outcome);
        self.cases.push(report);
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases
            .iter()
            .filter(|case| matches!(case.outcome, Outcome::Fail { .. }))
    }

    pub fn inconclusive(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases
            .iter()
            .filter(|case| matches!(case.outcome, Outcome::Inconclusive { .. }))
    }
}

/// Compare two canonical trees: `Ok(())` when deeply equal, otherwise the
/// first position where they disagree.
pub fn compare(
    expected: &CanonicalValue,
    actual: &CanonicalValue,
) -> std::result::Result<(), Difference> {
    match first_difference(expected, actual) {
        None => Ok(()),
        Some(difference) => Err(difference),
    }
}

/// Read and parse a JSON oracle file.
pub fn load_fixture(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path).map_err(|source| OracleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| OracleError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Enumerate every `.toml` document under the corpus's `valid/` and
/// `invalid/` subtrees, sorted by path. A missing subtree contributes no
/// cases.
pub fn discover_cases(corpus: &Corpus) -> Result<Vec<FixtureCase>> {
    let mut cases = Vec::new();
    for expectation in [Expectation::Valid, Expectation::Invalid] {
        let subtree = corpus.root.join(match expectation {
            Expectation::Valid => "valid",
            Expectation::Invalid => "invalid",
        });
        if !subtree.is_dir() {
            debug!(corpus = %corpus.name, path = %subtree.display(), "subtree absent, skipping");
            continue;
        }

        for entry in WalkDir::new(&subtree).sort_by_file_name() {
            let entry = entry.map_err(|e| OracleError::Io {
                path: e.path().unwrap_or(&subtree).to_path_buf(),
                source: e.into(),
            })?;
            let document = entry.path();
            if !entry.file_type().is_file()
                || document.extension().and_then(|ext| ext.to_str()) != Some(DOCUMENT_EXTENSION)
            {
                continue;
            }

            let oracle = match expectation {
                Expectation::Invalid => Oracle::Invalid,
                Expectation::Valid => {
                    let oracle_path = document.with_extension(ORACLE_EXTENSION);
                    if oracle_path.is_file() {
                        Oracle::Expected(oracle_path)
                    } else {
                        Oracle::Missing(oracle_path)
                    }
                }
            };
            cases.push(FixtureCase {
                name: case_name(corpus, document),
                document: document.to_path_buf(),
                oracle,
                dialect: corpus.dialect,
            });
        }
    }
    Ok(cases)
}

fn case_name(corpus: &Corpus, document: &Path) -> String {
    let relative = document.strip_prefix(&corpus.root).unwrap_or(document);
    let mut name = corpus.name.clone();
    for component in relative.with_extension("").components() {
        name.push('/');
        name.push_str(&component.as_os_str().to_string_lossy());
    }
    name
}

/// Run one case. Never fails: every error becomes part of the outcome.
pub fn run_case(decoder: &dyn Decoder, case: &FixtureCase) -> CaseReport {
    debug!(case = %case.name, "running fixture case");
    let outcome = evaluate(decoder, case)
        .unwrap_or_else(|e| Outcome::fail(Failure::Oracle { message: e.to_string() }));

    match &outcome {
        Outcome::Pass => debug!(case = %case.name, "pass"),
        Outcome::Fail { failure } => warn!(case = %case.name, %failure, "fail"),
        Outcome::Inconclusive { reason } => warn!(case = %case.name, %reason, "inconclusive"),
    }

    CaseReport {
        name: case.name.clone(),
        expectation: case.expectation(),
        outcome,
    }
}

fn evaluate(decoder: &dyn Decoder, case: &FixtureCase) -> Result<Outcome> {
    let bytes = fs::read(&case.document).map_err(|source| OracleError::Io {
        path: case.document.clone(),
        source,
    })?;
    // TOML documents must be UTF-8; anything else is a decode failure that
    // never reaches the decoder.
    let decoded = match String::from_utf8(bytes) {
        Ok(text) => decoder.decode(&text),
        Err(_) => Err(DecodeError::new("document is not valid UTF-8")),
    };

    match (&case.oracle, decoded) {
        (Oracle::Invalid, Err(_)) => Ok(Outcome::Pass),
        (Oracle::Invalid, Ok(_)) => Ok(Outcome::fail(Failure::UnexpectedSuccess)),
        (_, Err(e)) => Ok(Outcome::fail(Failure::Decode {
            message: e.message().to_string(),
        })),
        (Oracle::Missing(path), Ok(_)) => Ok(Outcome::Inconclusive {
            reason: format!("missing oracle file {}", path.display()),
        }),
        (Oracle::Expected(path), Ok(table)) => {
            let actual = convert_table(&table)?;
            let fixture = load_fixture(path)?;
            let expected = normalize_fixture(&fixture, case.dialect)?;
            Ok(match compare(&expected, &actual) {
                Ok(()) => Outcome::Pass,
                Err(difference) => Outcome::fail(Failure::Mismatch { difference }),
            })
        }
    }
}

/// Discover and run every case in one corpus.
///
/// # Errors
/// Only discovery (walking the corpus directory) can fail; case-level errors
/// are recorded in the report.
pub fn run_corpus(decoder: &dyn Decoder, corpus: &Corpus) -> Result<RunReport> {
    let mut report = RunReport::default();
    for case in discover_cases(corpus)? {
        report.push(run_case(decoder, &case));
    }
    info!(
        corpus = %corpus.name,
        dialect = %corpus.dialect,
        passed = report.summary.passed,
        failed = report.summary.failed,
        inconclusive = report.summary.inconclusive,
        "corpus finished"
    );
    Ok(report)
}

/// Run several corpora into one report, in the given order.
pub fn run_corpora(decoder: &dyn Decoder, corpora: &[Corpus]) -> Result<RunReport> {
    let mut combined = RunReport::default();
    for corpus in corpora {
        for case in run_corpus(decoder, corpus)?.cases {
            combined.push(case);
        }
    }
    Ok(combined)
}
