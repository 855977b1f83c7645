//! Corpus configuration — which fixture trees to run and in which dialect.
//!
//! Corpora are usually listed in a manifest file:
//!
//! ```toml
//! [[corpus]]
//! name = "toml-test"
//! root = "data/toml-test"
//! dialect = "toml-test"
//!
//! [[corpus]]
//! name = "compliance"
//! root = "data/toml-lang-compliance"
//! dialect = "compliance"
//! ```
//!
//! Relative roots resolve against the manifest's own directory.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::error::{OracleError, Result};

/// Default manifest file name, looked up in the working directory.
pub const DEFAULT_MANIFEST_PATH: &str = "toml-oracle.toml";

/// One fixture corpus: a directory with `valid/` and `invalid/` subtrees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Corpus {
    pub name: String,
    pub root: PathBuf,
    pub dialect: Dialect,
}

impl Corpus {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>, dialect: Dialect) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            dialect,
        }
    }

    /// Parse a `NAME=DIALECT:PATH` command-line corpus spec.
    ///
    /// ```
    /// use toml_oracle::{Corpus, Dialect};
    ///
    /// let corpus = Corpus::parse_spec("bs=toml-test:tests/data").unwrap();
    /// assert_eq!(corpus, Corpus::new("bs", "tests/data", Dialect::TomlTest));
    /// ```
    pub fn parse_spec(spec: &str) -> Result<Self> {
        let malformed = || {
            OracleError::Manifest(format!(
                "corpus spec {spec:?} must look like NAME=DIALECT:PATH"
            ))
        };
        let (name, rest) = spec.split_once('=').ok_or_else(malformed)?;
        let (dialect, root) = rest.split_once(':').ok_or_else(malformed)?;
        if name.trim().is_empty() || root.is_empty() {
            return Err(malformed());
        }
        let dialect = dialect.parse::<Dialect>().map_err(OracleError::Manifest)?;
        Ok(Self::new(name.trim(), root, dialect))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestDocument {
    #[serde(default)]
    corpus: Vec<CorpusEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CorpusEntry {
    name: String,
    root: String,
    dialect: Dialect,
}

/// Load a manifest file and validate the corpora it lists.
///
/// # Errors
/// Returns `OracleError::Manifest` if the file is missing, unreadable, not
/// valid TOML, or fails [`validate_corpora`].
pub fn load_manifest(path: &Path) -> Result<Vec<Corpus>> {
    if !path.is_file() {
        return Err(OracleError::Manifest(format!(
            "manifest not found: {}",
            path.display()
        )));
    }
    let raw = fs::read_to_string(path).map_err(|e| {
        OracleError::Manifest(format!("failed to read {}: {e}", path.display()))
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let corpora = parse_manifest(&raw, base_dir)?;
    validate_corpora(&corpora)?;
    Ok(corpora)
}

/// Parse manifest text, resolving relative roots against `base_dir`.
/// Does not touch the file system.
pub fn parse_manifest(raw: &str, base_dir: &Path) -> Result<Vec<Corpus>> {
    let doc = toml::from_str::<ManifestDocument>(raw)
        .map_err(|e| OracleError::Manifest(format!("failed to parse manifest: {e}")))?;
    Ok(doc
        .corpus
        .into_iter()
        .map(|entry| {
            let root = PathBuf::from(&entry.root);
            let root = if root.is_absolute() {
                root
            } else {
                base_dir.join(root)
            };
            Corpus::new(entry.name, root, entry.dialect)
        })
        .collect())
}

/// Check that there is at least one corpus, names are non-empty and unique,
/// and every root is an existing directory.
pub fn validate_corpora(corpora: &[Corpus]) -> Result<()> {
    if corpora.is_empty() {
        return Err(OracleError::Manifest("no corpora configured".to_string()));
    }
    let mut seen = BTreeSet::new();
    for corpus in corpora {
        if corpus.name.trim().is_empty() {
            return Err(OracleError::Manifest("corpus name must not be empty".to_string()));
        }
        if !seen.insert(corpus.name.as_str()) {
            return Err(OracleError::Manifest(format!(
                "duplicate corpus name: {}",
                corpus.name
            )));
        }
        if !corpus.root.is_dir() {
            return Err(OracleError::Manifest(format!(
                "corpus {} root is not a directory: {}",
                corpus.name,
                corpus.root.display()
            )));
        }
    }
    Ok(())
}
