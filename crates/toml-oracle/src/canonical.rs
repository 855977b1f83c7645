//! Canonical tagged values — the form every comparison converges to.
//!
//! Both sides of a comparison end up here: the converter maps decoder output
//! into a `CanonicalValue`, and the normalizer maps a fixture tree into one.
//! Scalars are a `(Kind, text)` pair whose text is already canonical, so
//! equality is plain structural equality and never re-parses anything.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// The scalar kinds of the TOML value model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    String,
    Boolean,
    Integer,
    Float,
    OffsetDateTime,
    LocalDateTime,
    LocalDate,
    LocalTime,
}

impl Kind {
    /// Canonical tag spelling, used in serialized output and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Boolean => "boolean",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::OffsetDateTime => "offset datetime",
            Kind::LocalDateTime => "local datetime",
            Kind::LocalDate => "local date",
            Kind::LocalTime => "local time",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canonical value tree.
///
/// Tables use a `BTreeMap`, so key insertion order never affects equality.
/// Arrays compare positionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalValue {
    Scalar { kind: Kind, value: String },
    Array(Vec<CanonicalValue>),
    Table(BTreeMap<String, CanonicalValue>),
}

impl CanonicalValue {
    pub fn scalar(kind: Kind, value: impl Into<String>) -> Self {
        CanonicalValue::Scalar {
            kind,
            value: value.into(),
        }
    }

    /// The tag this node carries when serialized (`"array"`, `"table"`, or a
    /// scalar kind).
    pub fn type_name(&self) -> &'static str {
        match self {
            CanonicalValue::Scalar { kind, .. } => kind.as_str(),
            CanonicalValue::Array(_) => "array",
            CanonicalValue::Table(_) => "table",
        }
    }

    /// One-line description used in mismatch reports.
    fn summary(&self) -> String {
        match self {
            CanonicalValue::Scalar { kind, value } => format!("{kind} {value:?}"),
            CanonicalValue::Array(items) => format!("array of {} element(s)", items.len()),
            CanonicalValue::Table(map) => {
                let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                format!("table with keys [{}]", keys.join(", "))
            }
        }
    }
}

/// Serializes to the tagged JSON form fixtures use: scalars as
/// `{"type": .., "value": ..}`, arrays as `{"type": "array", "value": [..]}`,
/// and tables as plain objects.
impl Serialize for CanonicalValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CanonicalValue::Scalar { kind, value } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", kind.as_str())?;
                map.serialize_entry("value", value)?;
                map.end()
            }
            CanonicalValue::Array(items) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "array")?;
                map.serialize_entry("value", items)?;
                map.end()
            }
            CanonicalValue::Table(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// The first position at which two canonical trees disagree.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Difference {
    /// JSON-pointer-like path (`/` for the root).
    pub path: String,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "at {}: expected {}, got {}",
            self.path, self.expected, self.actual
        )
    }
}

const MISSING: &str = "<missing>";

/// Walk both trees in lockstep and report the first disagreement, or `None`
/// when they are equal.
///
/// Table keys are visited in sorted order so the reported difference is
/// deterministic.
pub fn first_difference(expected: &CanonicalValue, actual: &CanonicalValue) -> Option<Difference> {
    let mut diff = diff_at(String::new(), expected, actual)?;
    if diff.path.is_empty() {
        diff.path.push('/');
    }
    Some(diff)
}

fn diff_at(path: String, expected: &CanonicalValue, actual: &CanonicalValue) -> Option<Difference> {
    match (expected, actual) {
        (CanonicalValue::Array(left), CanonicalValue::Array(right)) => {
            for (i, (l, r)) in left.iter().zip(right).enumerate() {
                if let Some(diff) = diff_at(child_path(&path, &i.to_string()), l, r) {
                    return Some(diff);
                }
            }
            if left.len() != right.len() {
                return Some(Difference {
                    path,
                    expected: expected.summary(),
                    actual: actual.summary(),
                });
            }
            None
        }
        (CanonicalValue::Table(left), CanonicalValue::Table(right)) => {
            let mut keys: Vec<&String> = left.keys().chain(right.keys()).collect();
            keys.sort();
            keys.dedup();
            for key in keys {
                let at = child_path(&path, key);
                match (left.get(key), right.get(key)) {
                    (Some(l), Some(r)) => {
                        if let Some(diff) = diff_at(at, l, r) {
                            return Some(diff);
                        }
                    }
                    (Some(l), None) => {
                        return Some(Difference {
                            path: at,
                            expected: l.summary(),
                            actual: MISSING.to_string(),
                        })
                    }
                    (None, Some(r)) => {
                        return Some(Difference {
                            path: at,
                            expected: MISSING.to_string(),
                            actual: r.summary(),
                        })
                    }
                    (None, None) => unreachable!("key came from one of the two tables"),
                }
            }
            None
        }
        _ if expected == actual => None,
        _ => Some(Difference {
            path,
            expected: expected.summary(),
            actual: actual.summary(),
        }),
    }
}

/// Append one segment to a JSON-pointer-like path, escaping `~` and `/`.
pub(crate) fn child_path(parent: &str, segment: &str) -> String {
    let escaped = segment.replace('~', "~0").replace('/', "~1");
    format!("{parent}/{escaped}")
}
