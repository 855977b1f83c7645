//! # toml-oracle
//!
//! Conformance oracle for **TOML decoders**.
//!
//! Given a decoded document and an externally authored JSON fixture that
//! describes the same document as tagged strings, the oracle decides whether
//! the two are semantically equal. Both sides are first mapped into one
//! canonical tagged form, in which equivalent floats, datetimes, and times
//! have byte-identical text, so the comparison itself is exact.
//!
//! ## Quick start
//!
//! ```rust
//! use serde_json::json;
//! use toml_oracle::{convert_table, normalize_fixture, Decoder, Dialect, TomlCrateDecoder};
//!
//! let decoded = TomlCrateDecoder.decode("arr = [1.0, 1e0]").unwrap();
//! let actual = convert_table(&decoded).unwrap();
//!
//! let fixture = json!({"arr": {"type": "array", "value": [
//!     {"type": "float", "value": "1.0"},
//!     {"type": "float", "value": "1.00"},
//! ]}});
//! let expected = normalize_fixture(&fixture, Dialect::TomlTest).unwrap();
//!
//! assert_eq!(actual, expected);
//! ```
//!
//! ## Modules
//!
//! - [`canonical`] — `CanonicalValue` model and first-difference reporting
//! - [`literal`] — float / datetime / time canonicalization and rendering
//! - [`dialect`] — fixture dialects and the tag spelling table
//! - [`convert`] — decoder output (`toml::Value`) → canonical form
//! - [`normalize`] — JSON fixture + dialect → canonical form
//! - [`decoder`] — the decoder-under-test contract
//! - [`driver`] — fixture discovery, per-case outcomes, run reports
//! - [`manifest`] — corpus configuration
//! - [`error`] — error types

pub mod canonical;
pub mod convert;
pub mod decoder;
pub mod dialect;
pub mod driver;
pub mod error;
pub mod literal;
pub mod manifest;
pub mod normalize;

pub use canonical::{first_difference, CanonicalValue, Difference, Kind};
pub use convert::{convert_table, convert_value};
pub use decoder::{DecodeError, Decoder, TomlCrateDecoder};
pub use dialect::{Dialect, FixtureTag};
pub use driver::{
    compare, discover_cases, load_fixture, run_case, run_corpora, run_corpus, CaseReport,
    Expectation, Failure, FixtureCase, Oracle, Outcome, RunReport, RunSummary,
};
pub use error::OracleError;
pub use manifest::{load_manifest, Corpus};
pub use normalize::{normalize_fixture, FixtureNode};
