//! Fixture normalizer — tagged JSON oracle trees to canonical form.
//!
//! Normalization runs in two passes:
//!
//! 1. [`FixtureNode::parse`] decodes the raw JSON once into leaves, arrays,
//!    and tables, resolving every tag through the dialect's spelling table.
//!    All structural validation happens here.
//! 2. [`FixtureNode::canonicalize`] re-renders the literals the dialect asks
//!    for (see [`Dialect::reparses`]) and builds the `CanonicalValue`.
//!
//! # Structural rule
//!
//! - An object with exactly the keys `type` and `value` is a leaf.
//! - A leaf tagged `array` holds a JSON array of nodes.
//! - Any other object is a table; any JSON array is an array.
//! - Anything else (a bare string, number, bool, or null in node position)
//!   is a `MalformedFixture`.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::canonical::{child_path, CanonicalValue, Kind};
use crate::dialect::{Dialect, FixtureTag};
use crate::error::{OracleError, Result};
use crate::literal;

/// A fixture tree after structural decoding, before literal canonicalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureNode {
    Leaf { kind: Kind, literal: String },
    Array(Vec<FixtureNode>),
    /// Entries in fixture order.
    Table(Vec<(String, FixtureNode)>),
}

/// Normalize a fixture tree written in `dialect`.
///
/// # Errors
/// Returns `OracleError::MalformedFixture` when the tree breaks the structural
/// rule, uses a tag unknown to `dialect`, or holds a literal that does not
/// re-parse as its tagged kind.
pub fn normalize_fixture(fixture: &Value, dialect: Dialect) -> Result<CanonicalValue> {
    FixtureNode::parse(fixture, dialect)?.canonicalize(dialect)
}

impl FixtureNode {
    pub fn parse(fixture: &Value, dialect: Dialect) -> Result<Self> {
        parse_node(fixture, dialect, "")
    }

    pub fn canonicalize(&self, dialect: Dialect) -> Result<CanonicalValue> {
        canonicalize_node(self, dialect, "")
    }
}

fn parse_node(value: &Value, dialect: Dialect, path: &str) -> Result<FixtureNode> {
    match value {
        Value::Object(map) if is_leaf(map) => parse_leaf(map, dialect, path),
        Value::Object(map) => {
            let mut entries = Vec::with_capacity(map.len());
            for (key, child) in map {
                let node = parse_node(child, dialect, &child_path(path, key))?;
                entries.push((key.clone(), node));
            }
            Ok(FixtureNode::Table(entries))
        }
        Value::Array(items) => parse_items(items, dialect, path),
        other => Err(OracleError::malformed(
            path,
            format!(
                "expected a leaf, table, or array, found bare {}",
                json_type(other)
            ),
        )),
    }
}

fn is_leaf(map: &Map<String, Value>) -> bool {
    map.len() == 2 && map.contains_key("type") && map.contains_key("value")
}

fn parse_leaf(map: &Map<String, Value>, dialect: Dialect, path: &str) -> Result<FixtureNode> {
    let spelling = match &map["type"] {
        Value::String(s) => s.as_str(),
        other => {
            return Err(OracleError::malformed(
                path,
                format!("leaf `type` must be a string, found {}", json_type(other)),
            ))
        }
    };
    let tag = dialect.resolve_tag(spelling).ok_or_else(|| {
        OracleError::malformed(
            path,
            format!("unknown tag {spelling:?} for the {dialect} dialect"),
        )
    })?;

    match (tag, &map["value"]) {
        (FixtureTag::Array, Value::Array(items)) => parse_items(items, dialect, path),
        (FixtureTag::Scalar(kind), Value::String(literal)) => Ok(FixtureNode::Leaf {
            kind,
            literal: literal.clone(),
        }),
        (FixtureTag::Array, other) => Err(OracleError::malformed(
            path,
            format!("array leaf value must be an array, found {}", json_type(other)),
        )),
        (FixtureTag::Scalar(kind), other) => Err(OracleError::malformed(
            path,
            format!(
                "{kind} leaf value must be a string, found {}",
                json_type(other)
            ),
        )),
    }
}

fn parse_items(items: &[Value], dialect: Dialect, path: &str) -> Result<FixtureNode> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_node(item, dialect, &child_path(path, &i.to_string())))
        .collect::<Result<Vec<_>>>()
        .map(FixtureNode::Array)
}

fn canonicalize_node(node: &FixtureNode, dialect: Dialect, path: &str) -> Result<CanonicalValue> {
    match node {
        FixtureNode::Leaf { kind, literal } => {
            let value = canonical_literal(*kind, literal, dialect)
                .map_err(|e| OracleError::malformed(path, e.to_string()))?;
            Ok(CanonicalValue::scalar(*kind, value))
        }
        FixtureNode::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| canonicalize_node(item, dialect, &child_path(path, &i.to_string())))
            .collect::<Result<Vec<_>>>()
            .map(CanonicalValue::Array),
        FixtureNode::Table(entries) => {
            let mut out = BTreeMap::new();
            for (key, child) in entries {
                let value = canonicalize_node(child, dialect, &child_path(path, key))?;
                out.insert(key.clone(), value);
            }
            Ok(CanonicalValue::Table(out))
        }
    }
}

fn canonical_literal(kind: Kind, literal: &str, dialect: Dialect) -> Result<String> {
    if !dialect.reparses(kind) {
        return Ok(literal.to_string());
    }
    match kind {
        Kind::Float => literal::canonical_float(literal),
        Kind::OffsetDateTime => literal::canonical_offset_datetime(literal),
        Kind::LocalDateTime => literal::canonical_local_datetime(literal),
        Kind::LocalTime => literal::canonical_local_time(literal),
        Kind::String | Kind::Boolean | Kind::Integer | Kind::LocalDate => {
            Ok(literal.to_string())
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
