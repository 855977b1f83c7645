//! Fixture dialects and their tag vocabularies.
//!
//! Two fixture corpora tag the same leaf kinds with different spellings.
//! `TAG_SPELLINGS` is the single table mapping every tag to its spelling in
//! each dialect; the normalizer resolves a tag through it once, and nothing
//! downstream ever sees a dialect-specific spelling.
//!
//! | Tag | `compliance` | `toml-test` |
//! |---|---|---|
//! | boolean | `boolean` | `bool` |
//! | offset datetime | `offset datetime` | `datetime` |
//! | local datetime | `local datetime` | `datetime-local` |
//! | local date | `local date` | `date-local` |
//! | local time | `local time` | `time-local` |
//!
//! `string`, `integer`, `float`, and `array` are spelled the same in both.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::canonical::Kind;

/// A fixture tagging convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// Long, canonical tag spellings (`boolean`, `offset datetime`, ...).
    Compliance,
    /// Short toml-test spellings (`bool`, `datetime`, `time-local`, ...).
    TomlTest,
}

/// A resolved fixture tag: either a scalar kind or the `array` container tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureTag {
    Scalar(Kind),
    Array,
}

/// `(tag, compliance spelling, toml-test spelling)`.
static TAG_SPELLINGS: [(FixtureTag, &str, &str); 9] = [
    (FixtureTag::Scalar(Kind::String), "string", "string"),
    (FixtureTag::Scalar(Kind::Integer), "integer", "integer"),
    (FixtureTag::Scalar(Kind::Float), "float", "float"),
    (FixtureTag::Scalar(Kind::Boolean), "boolean", "bool"),
    (
        FixtureTag::Scalar(Kind::OffsetDateTime),
        "offset datetime",
        "datetime",
    ),
    (
        FixtureTag::Scalar(Kind::LocalDateTime),
        "local datetime",
        "datetime-local",
    ),
    (FixtureTag::Scalar(Kind::LocalDate), "local date", "date-local"),
    (FixtureTag::Scalar(Kind::LocalTime), "local time", "time-local"),
    (FixtureTag::Array, "array", "array"),
];

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::Compliance, Dialect::TomlTest];

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Compliance => "compliance",
            Dialect::TomlTest => "toml-test",
        }
    }

    /// Look up a tag by its spelling in this dialect.
    ///
    /// Spellings belonging only to the other dialect are not accepted.
    pub fn resolve_tag(self, spelling: &str) -> Option<FixtureTag> {
        TAG_SPELLINGS
            .iter()
            .find(|entry| self.pick(entry) == spelling)
            .map(|&(tag, _, _)| tag)
    }

    /// The spelling this dialect uses for `tag`.
    pub fn spelling(self, tag: FixtureTag) -> &'static str {
        TAG_SPELLINGS
            .iter()
            .find(|entry| entry.0 == tag)
            .map(|entry| self.pick(entry))
            .unwrap_or_else(|| unreachable!("every tag has a row in TAG_SPELLINGS"))
    }

    /// Whether leaves of this kind are re-parsed and re-rendered before
    /// comparison. Everything else passes through verbatim.
    pub fn reparses(self, kind: Kind) -> bool {
        match kind {
            Kind::Float | Kind::OffsetDateTime | Kind::LocalDateTime => true,
            Kind::LocalTime => self == Dialect::TomlTest,
            Kind::String | Kind::Boolean | Kind::Integer | Kind::LocalDate => false,
        }
    }

    fn pick(self, entry: &(FixtureTag, &'static str, &'static str)) -> &'static str {
        match self {
            Dialect::Compliance => entry.1,
            Dialect::TomlTest => entry.2,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| {
                format!("Unknown dialect: '{s}'. Available dialects: compliance, toml-test")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tag_round_trips_through_both_dialects() {
        for dialect in Dialect::ALL {
            for (tag, _, _) in TAG_SPELLINGS {
                assert_eq!(dialect.resolve_tag(dialect.spelling(tag)), Some(tag));
            }
        }
    }

    #[test]
    fn dialect_specific_spellings_are_not_shared() {
        assert_eq!(Dialect::Compliance.resolve_tag("bool"), None);
        assert_eq!(Dialect::TomlTest.resolve_tag("boolean"), None);
        assert_eq!(Dialect::TomlTest.resolve_tag("local time"), None);
    }
}
