//! Literal canonicalization — floats, datetimes, and times re-rendered in one
//! textual form.
//!
//! Fixture authors spell the same value many ways (`1.0`, `1.00`, `1e0`;
//! `Z` or `+00:00`; three or six fraction digits). Each `canonical_*`
//! function parses a literal permissively and re-renders it strictly, so
//! equivalent values produce byte-identical text. The `render_*` functions
//! are the strict half on its own; the converter uses them directly on
//! decoder output so both sides share one rendering.
//!
//! Every `canonical_*` function is idempotent: feeding its output back in
//! returns the same text.
//!
//! # Rendering rules
//!
//! - Floats: Rust's shortest round-trip `Debug` form (`1.0`, `1e16`, `-0.0`),
//!   with `inf`, `-inf`, and an unsigned `nan`.
//! - Times: `HH:MM:SS`, then `.ffffff` when the fraction is a whole number of
//!   microseconds, `.fffffffff` otherwise, nothing when it is zero. A leap
//!   second keeps its `:60`.
//! - Datetimes: `YYYY-MM-DDT` + time, then `±HH:MM` for offset datetimes
//!   (`Z` becomes `+00:00`; offsets are never converted to UTC).

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::canonical::Kind;
use crate::error::{OracleError, Result};

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// Canonicalize a float literal.
///
/// Accepts anything Rust's float parser accepts plus `_` digit separators,
/// so `inf`, `+inf`, `-inf`, `nan`, `+nan`, and `-nan` all parse. Every NaN
/// renders as `nan`.
///
/// ```
/// use toml_oracle::literal::canonical_float;
///
/// assert_eq!(canonical_float("1e0").unwrap(), "1.0");
/// assert_eq!(canonical_float("-nan").unwrap(), "nan");
/// ```
pub fn canonical_float(literal: &str) -> Result<String> {
    let cleaned: String = literal.trim().chars().filter(|&c| c != '_').collect();
    let value: f64 = cleaned
        .parse()
        .map_err(|_| invalid(Kind::Float, literal))?;
    Ok(render_float(value))
}

/// Render a float in canonical form.
pub fn render_float(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{value:?}")
    }
}

/// Canonicalize an offset datetime literal. The literal must carry an offset.
pub fn canonical_offset_datetime(literal: &str) -> Result<String> {
    canonical_datetime(Kind::OffsetDateTime, literal)
}

/// Canonicalize a local datetime literal. The literal must not carry an offset.
pub fn canonical_local_datetime(literal: &str) -> Result<String> {
    canonical_datetime(Kind::LocalDateTime, literal)
}

fn canonical_datetime(kind: Kind, literal: &str) -> Result<String> {
    let parts = parse_components(literal).ok_or_else(|| invalid(kind, literal))?;
    let (Some(date), Some(time)) = (parts.date, parts.time) else {
        return Err(invalid(kind, literal));
    };
    let local = NaiveDateTime::new(date, time);
    match (kind, parts.offset) {
        (Kind::OffsetDateTime, Some(offset)) => {
            let stamped = local
                .and_local_timezone(offset)
                .single()
                .ok_or_else(|| invalid(kind, literal))?;
            Ok(render_offset_datetime(&stamped))
        }
        (Kind::LocalDateTime, None) => Ok(render_local_datetime(&local)),
        _ => Err(invalid(kind, literal)),
    }
}

/// Canonicalize a local time literal.
///
/// A full datetime is accepted too; its date part is discarded and only the
/// time of day is rendered. An offset is rejected, since a local time has none.
pub fn canonical_local_time(literal: &str) -> Result<String> {
    let parts = parse_components(literal).ok_or_else(|| invalid(Kind::LocalTime, literal))?;
    match (parts.time, parts.offset) {
        (Some(time), None) => Ok(render_local_time(time)),
        _ => Err(invalid(Kind::LocalTime, literal)),
    }
}

pub fn render_offset_datetime(value: &DateTime<FixedOffset>) -> String {
    let mut out = render_local_datetime(&value.naive_local());
    push_offset(&mut out, value.offset());
    out
}

pub fn render_local_datetime(value: &NaiveDateTime) -> String {
    let mut out = render_local_date(value.date());
    out.push('T');
    out.push_str(&render_local_time(value.time()));
    out
}

pub fn render_local_date(value: NaiveDate) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        value.year(),
        value.month(),
        value.day()
    )
}

pub fn render_local_time(value: NaiveTime) -> String {
    // chrono stores a leap second as second 59 with an extra second of nanos.
    let (second, nanos) = match value.nanosecond() {
        n if n >= NANOS_PER_SECOND => (value.second() + 1, n - NANOS_PER_SECOND),
        n => (value.second(), n),
    };
    let mut out = format!("{:02}:{:02}:{:02}", value.hour(), value.minute(), second);
    if nanos != 0 {
        if nanos % 1_000 == 0 {
            out.push_str(&format!(".{:06}", nanos / 1_000));
        } else {
            out.push_str(&format!(".{nanos:09}"));
        }
    }
    out
}

/// Build a time of day from TOML's components, where `second` may be 60.
pub(crate) fn time_of_day(hour: u32, minute: u32, second: u32, nanos: u32) -> Option<NaiveTime> {
    if second == 60 {
        NaiveTime::from_hms_nano_opt(hour, minute, 59, nanos.checked_add(NANOS_PER_SECOND)?)
    } else {
        NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
    }
}

fn push_offset(out: &mut String, offset: &FixedOffset) {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.unsigned_abs() / 60;
    out.push_str(&format!("{sign}{:02}:{:02}", minutes / 60, minutes % 60));
}

fn invalid(kind: Kind, literal: &str) -> OracleError {
    OracleError::InvalidLiteral {
        kind,
        literal: literal.to_string(),
    }
}

/// The pieces of an ISO-8601-like literal. Which ones are present decides
/// which temporal kind the literal can be.
#[derive(Debug, Default)]
struct Components {
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
    offset: Option<FixedOffset>,
}

/// Permissive parse of `[date][sep time[offset]]` or `time[offset]`.
///
/// The separator may be `T`, `t`, or a space. Seconds are optional. Fraction
/// digits beyond nanoseconds are truncated. Offsets may be `Z`, `z`,
/// `±HH:MM`, `±HHMM`, or `±HH`. Returns `None` on any trailing garbage.
fn parse_components(literal: &str) -> Option<Components> {
    let s = literal.trim();
    let bytes = s.as_bytes();
    let mut parts = Components::default();

    let looks_like_date = bytes.len() >= 10 && bytes[4] == b'-' && bytes[7] == b'-';
    let rest = if looks_like_date {
        parts.date = Some(NaiveDate::parse_from_str(s.get(..10)?, "%Y-%m-%d").ok()?);
        let rest = &s[10..];
        match rest.as_bytes().first() {
            None => return Some(parts),
            Some(b'T' | b't' | b' ') => &rest[1..],
            Some(_) => return None,
        }
    } else {
        s
    };

    let (time, rest) = parse_time(rest)?;
    parts.time = Some(time);
    parts.offset = parse_offset(rest)?;
    Some(parts)
}

fn parse_time(s: &str) -> Option<(NaiveTime, &str)> {
    let b = s.as_bytes();
    let hour = two_digits(b, 0)?;
    if b.get(2) != Some(&b':') {
        return None;
    }
    let minute = two_digits(b, 3)?;
    let mut pos = 5;

    let mut second = 0;
    if b.get(pos) == Some(&b':') {
        second = two_digits(b, pos + 1)?;
        pos += 3;
    }

    let mut nanos = 0;
    if b.get(pos) == Some(&b'.') {
        let digits = b[pos + 1..].iter().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }
        for (i, d) in b[pos + 1..pos + 1 + digits].iter().take(9).enumerate() {
            nanos += u32::from(d - b'0') * 10u32.pow(8 - i as u32);
        }
        pos += 1 + digits;
    }

    let time = time_of_day(hour, minute, second, nanos)?;
    // Everything up to `pos` was ASCII, so this is a char boundary.
    Some((time, &s[pos..]))
}

/// `Some(None)` means no offset; `None` means an unparseable offset.
fn parse_offset(s: &str) -> Option<Option<FixedOffset>> {
    match s {
        "" => return Some(None),
        "Z" | "z" => return Some(FixedOffset::east_opt(0)),
        _ => {}
    }
    let b = s.as_bytes();
    let sign = match b.first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let hours = two_digits(b, 1)?;
    let minutes = match &b[3..] {
        [] => 0,
        [b':', _, _] => two_digits(b, 4)?,
        [_, _] => two_digits(b, 3)?,
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    let seconds = (hours * 3600 + minutes * 60) as i32;
    FixedOffset::east_opt(sign * seconds).map(Some)
}

fn two_digits(b: &[u8], at: usize) -> Option<u32> {
    match (b.get(at), b.get(at + 1)) {
        (Some(hi), Some(lo)) if hi.is_ascii_digit() && lo.is_ascii_digit() => {
            Some(u32::from(hi - b'0') * 10 + u32::from(lo - b'0'))
        }
        _ => None,
    }
}
