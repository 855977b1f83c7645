//! Native-value converter — decoder output (`toml::Value`) to canonical form.
//!
//! Temporal values are rebuilt as `chrono` values and rendered through
//! [`crate::literal`], the same renderer the normalizer uses for fixtures.
//! The decoder's offset is kept as given; nothing is shifted to UTC.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use toml::value::{Date, Datetime, Offset, Time};

use crate::canonical::{CanonicalValue, Kind};
use crate::error::{OracleError, Result};
use crate::literal;

/// Convert a decoded document root.
pub fn convert_table(table: &toml::Table) -> Result<CanonicalValue> {
    let mut out = BTreeMap::new();
    for (key, value) in table {
        out.insert(key.clone(), convert_value(value)?);
    }
    Ok(CanonicalValue::Table(out))
}

/// Convert one decoded value.
///
/// # Errors
/// Returns `OracleError::UnsupportedType` for a datetime whose parts do not
/// form one of TOML's four temporal kinds, or whose components are out of
/// range. A conforming decoder never produces one.
pub fn convert_value(value: &toml::Value) -> Result<CanonicalValue> {
    Ok(match value {
        toml::Value::String(s) => CanonicalValue::scalar(Kind::String, s.as_str()),
        toml::Value::Boolean(b) => CanonicalValue::scalar(Kind::Boolean, b.to_string()),
        toml::Value::Integer(i) => CanonicalValue::scalar(Kind::Integer, i.to_string()),
        toml::Value::Float(f) => CanonicalValue::scalar(Kind::Float, literal::render_float(*f)),
        toml::Value::Datetime(dt) => convert_datetime(dt)?,
        toml::Value::Array(items) => CanonicalValue::Array(
            items
                .iter()
                .map(convert_value)
                .collect::<Result<Vec<_>>>()?,
        ),
        toml::Value::Table(table) => convert_table(table)?,
    })
}

fn convert_datetime(dt: &Datetime) -> Result<CanonicalValue> {
    let unsupported = || {
        OracleError::UnsupportedType(format!(
            "datetime {dt} (date: {}, time: {}, offset: {})",
            dt.date.is_some(),
            dt.time.is_some(),
            dt.offset.is_some()
        ))
    };

    match (&dt.date, &dt.time, &dt.offset) {
        (Some(date), Some(time), Some(offset)) => {
            let local = NaiveDateTime::new(
                naive_date(date).ok_or_else(unsupported)?,
                naive_time(time).ok_or_else(unsupported)?,
            );
            let stamped: DateTime<FixedOffset> = local
                .and_local_timezone(fixed_offset(offset).ok_or_else(unsupported)?)
                .single()
                .ok_or_else(unsupported)?;
            Ok(CanonicalValue::scalar(
                Kind::OffsetDateTime,
                literal::render_offset_datetime(&stamped),
            ))
        }
        (Some(date), Some(time), None) => {
            let local = NaiveDateTime::new(
                naive_date(date).ok_or_else(unsupported)?,
                naive_time(time).ok_or_else(unsupported)?,
            );
            Ok(CanonicalValue::scalar(
                Kind::LocalDateTime,
                literal::render_local_datetime(&local),
            ))
        }
        (Some(date), None, None) => Ok(CanonicalValue::scalar(
            Kind::LocalDate,
            literal::render_local_date(naive_date(date).ok_or_else(unsupported)?),
        )),
        (None, Some(time), None) => Ok(CanonicalValue::scalar(
            Kind::LocalTime,
            literal::render_local_time(naive_time(time).ok_or_else(unsupported)?),
        )),
        _ => Err(unsupported()),
    }
}

fn naive_date(date: &Date) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(
        i32::from(date.year),
        u32::from(date.month),
        u32::from(date.day),
    )
}

fn naive_time(time: &Time) -> Option<NaiveTime> {
    literal::time_of_day(
        u32::from(time.hour),
        u32::from(time.minute),
        u32::from(time.second),
        time.nanosecond,
    )
}

fn fixed_offset(offset: &Offset) -> Option<FixedOffset> {
    match offset {
        Offset::Z => FixedOffset::east_opt(0),
        Offset::Custom { minutes } => FixedOffset::east_opt(i32::from(*minutes) * 60),
    }
}
