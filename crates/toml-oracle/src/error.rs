//! Error types for conversion, normalization, and fixture loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::canonical::Kind;

/// Errors that terminate a single fixture case.
///
/// None of these abort a whole run: the driver records them against the
/// case that raised them and moves on.
#[derive(Error, Debug)]
pub enum OracleError {
    /// The decoder produced a value the converter has no canonical mapping for.
    /// Indicates a decoder/harness contract mismatch, never a fixture problem.
    #[error("Unsupported native value: {0}")]
    UnsupportedType(String),

    /// An oracle file violates the leaf/table/array structural rule.
    /// `path` is a JSON-pointer-like location inside the fixture.
    #[error("Malformed fixture at {path}: {reason}")]
    MalformedFixture { path: String, reason: String },

    /// A literal could not be re-parsed as the kind its tag declares.
    #[error("Invalid {kind} literal: {literal:?}")]
    InvalidLiteral { kind: Kind, literal: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON oracle {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The corpus manifest is missing, unreadable, or inconsistent.
    #[error("Manifest error: {0}")]
    Manifest(String),
}

impl OracleError {
    pub(crate) fn malformed(path: &str, reason: impl Into<String>) -> Self {
        OracleError::MalformedFixture {
            path: display_path(path),
            reason: reason.into(),
        }
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

/// Convenience alias used throughout toml-oracle.
pub type Result<T> = std::result::Result<T, OracleError>;
