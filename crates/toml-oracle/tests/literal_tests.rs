use toml_oracle::literal::{
    canonical_float, canonical_local_datetime, canonical_local_time, canonical_offset_datetime,
    render_float,
};
use toml_oracle::{Kind, OracleError};

fn assert_invalid(result: Result<String, OracleError>, expected_kind: Kind) {
    match result {
        Err(OracleError::InvalidLiteral { kind, .. }) => assert_eq!(kind, expected_kind),
        other => panic!("expected InvalidLiteral({expected_kind}), got {other:?}"),
    }
}

// ============================================================================
// Floats
// ============================================================================

#[test]
fn float_spellings_of_one_are_identical() {
    let one = canonical_float("1.0").unwrap();
    assert_eq!(one, "1.0");
    assert_eq!(canonical_float("1.00").unwrap(), one);
    assert_eq!(canonical_float("1e0").unwrap(), one);
    assert_eq!(canonical_float("1E0").unwrap(), one);
    assert_eq!(canonical_float("+1.0").unwrap(), one);
    assert_eq!(canonical_float("10e-1").unwrap(), one);
}

#[test]
fn float_nan_spellings_collapse() {
    assert_eq!(canonical_float("nan").unwrap(), "nan");
    assert_eq!(canonical_float("-nan").unwrap(), "nan");
    assert_eq!(canonical_float("+nan").unwrap(), "nan");
}

#[test]
fn float_infinities_keep_sign() {
    assert_eq!(canonical_float("inf").unwrap(), "inf");
    assert_eq!(canonical_float("+inf").unwrap(), "inf");
    assert_eq!(canonical_float("-inf").unwrap(), "-inf");
}

#[test]
fn float_negative_zero_is_distinct() {
    assert_eq!(canonical_float("-0.0").unwrap(), "-0.0");
    assert_eq!(canonical_float("+0.0").unwrap(), "0.0");
    assert_ne!(
        canonical_float("-0.0").unwrap(),
        canonical_float("0.0").unwrap()
    );
}

#[test]
fn float_underscores_are_ignored() {
    assert_eq!(canonical_float("224_617.445_991").unwrap(), "224617.445991");
    assert_eq!(canonical_float("1_000").unwrap(), "1000.0");
}

#[test]
fn float_exponent_forms() {
    assert_eq!(canonical_float("5e+22").unwrap(), "5e22");
    assert_eq!(canonical_float("6.626e-34").unwrap(), "6.626e-34");
    assert_eq!(canonical_float("-2E-2").unwrap(), "-0.02");
}

#[test]
fn float_canonical_is_idempotent() {
    for literal in ["3.1415", "-0.01", "5e+22", "1e-7", "nan", "-inf", "0.1"] {
        let once = canonical_float(literal).unwrap();
        assert_eq!(canonical_float(&once).unwrap(), once, "literal {literal}");
    }
}

#[test]
fn float_rejects_garbage() {
    assert_invalid(canonical_float("abc"), Kind::Float);
    assert_invalid(canonical_float(""), Kind::Float);
    assert_invalid(canonical_float("1.0.0"), Kind::Float);
}

#[test]
fn render_float_matches_canonical() {
    assert_eq!(render_float(1.0), "1.0");
    assert_eq!(render_float(f64::NAN), "nan");
    assert_eq!(render_float(-f64::NAN), "nan");
    assert_eq!(render_float(f64::NEG_INFINITY), "-inf");
    assert_eq!(render_float(0.1 + 0.2), "0.30000000000000004");
}

// ============================================================================
// Offset datetimes
// ============================================================================

#[test]
fn offset_datetime_is_stable() {
    let literal = "1979-05-27T00:32:00.999999-07:00";
    assert_eq!(canonical_offset_datetime(literal).unwrap(), literal);
}

#[test]
fn offset_datetime_zulu_becomes_numeric_offset() {
    let expected = "1979-05-27T07:32:00+00:00";
    assert_eq!(canonical_offset_datetime("1979-05-27T07:32:00Z").unwrap(), expected);
    assert_eq!(canonical_offset_datetime("1979-05-27T07:32:00z").unwrap(), expected);
    assert_eq!(canonical_offset_datetime("1979-05-27 07:32:00Z").unwrap(), expected);
    assert_eq!(
        canonical_offset_datetime("1979-05-27T07:32:00+00:00").unwrap(),
        expected
    );
}

#[test]
fn offset_datetime_keeps_offset_instead_of_converting() {
    let zulu = canonical_offset_datetime("1979-05-27T07:32:00Z").unwrap();
    let pacific = canonical_offset_datetime("1979-05-27T00:32:00-07:00").unwrap();
    assert_eq!(pacific, "1979-05-27T00:32:00-07:00");
    assert_ne!(zulu, pacific);
}

#[test]
fn offset_datetime_fraction_padding() {
    assert_eq!(
        canonical_offset_datetime("1979-05-27T00:32:00.5-07:00").unwrap(),
        "1979-05-27T00:32:00.500000-07:00"
    );
    assert_eq!(
        canonical_offset_datetime("1979-05-27T00:32:00.123456789+05:30").unwrap(),
        "1979-05-27T00:32:00.123456789+05:30"
    );
    assert_eq!(
        canonical_offset_datetime("1979-05-27T00:32:00.1234567891Z").unwrap(),
        "1979-05-27T00:32:00.123456789+00:00"
    );
    assert_eq!(
        canonical_offset_datetime("1979-05-27T00:32:00.000Z").unwrap(),
        "1979-05-27T00:32:00+00:00"
    );
}

#[test]
fn offset_datetime_compact_offsets() {
    assert_eq!(
        canonical_offset_datetime("1979-05-27T00:32:00-0700").unwrap(),
        "1979-05-27T00:32:00-07:00"
    );
    assert_eq!(
        canonical_offset_datetime("1979-05-27T00:32:00+01").unwrap(),
        "1979-05-27T00:32:00+01:00"
    );
}

#[test]
fn offset_datetime_without_seconds() {
    assert_eq!(
        canonical_offset_datetime("1979-05-27T07:32Z").unwrap(),
        "1979-05-27T07:32:00+00:00"
    );
}

#[test]
fn offset_datetime_requires_offset() {
    assert_invalid(
        canonical_offset_datetime("1979-05-27T07:32:00"),
        Kind::OffsetDateTime,
    );
    assert_invalid(canonical_offset_datetime("1979-05-27"), Kind::OffsetDateTime);
    assert_invalid(canonical_offset_datetime("07:32:00Z"), Kind::OffsetDateTime);
}

#[test]
fn offset_datetime_rejects_impossible_dates() {
    assert_invalid(
        canonical_offset_datetime("1979-02-30T07:32:00Z"),
        Kind::OffsetDateTime,
    );
    assert_invalid(
        canonical_offset_datetime("1979-05-27T24:00:00Z"),
        Kind::OffsetDateTime,
    );
    assert_invalid(
        canonical_offset_datetime("1979-05-27T07:32:00Zjunk"),
        Kind::OffsetDateTime,
    );
}

#[test]
fn offset_datetime_leap_second() {
    assert_eq!(
        canonical_offset_datetime("1990-12-31T23:59:60Z").unwrap(),
        "1990-12-31T23:59:60+00:00"
    );
    assert_eq!(
        canonical_offset_datetime("1990-12-31T23:59:60.000001Z").unwrap(),
        "1990-12-31T23:59:60.000001+00:00"
    );
    assert_invalid(
        canonical_offset_datetime("1990-12-31T23:59:61Z"),
        Kind::OffsetDateTime,
    );
}

// ============================================================================
// Local datetimes
// ============================================================================

#[test]
fn local_datetime_round_trip() {
    assert_eq!(
        canonical_local_datetime("1979-05-27T07:32:00").unwrap(),
        "1979-05-27T07:32:00"
    );
    assert_eq!(
        canonical_local_datetime("1979-05-27t07:32").unwrap(),
        "1979-05-27T07:32:00"
    );
    assert_eq!(
        canonical_local_datetime("1979-05-27 00:32:00.999999").unwrap(),
        "1979-05-27T00:32:00.999999"
    );
}

#[test]
fn local_datetime_rejects_offset() {
    assert_invalid(
        canonical_local_datetime("1979-05-27T07:32:00Z"),
        Kind::LocalDateTime,
    );
}

// ============================================================================
// Local times
// ============================================================================

#[test]
fn local_time_forms() {
    assert_eq!(canonical_local_time("07:32:00").unwrap(), "07:32:00");
    assert_eq!(canonical_local_time("07:32").unwrap(), "07:32:00");
    assert_eq!(canonical_local_time("00:32:00.999999").unwrap(), "00:32:00.999999");
    assert_eq!(canonical_local_time("00:32:00.5").unwrap(), "00:32:00.500000");
    assert_eq!(canonical_local_time("23:59:60").unwrap(), "23:59:60");
    let leap = canonical_local_time("23:59:60").unwrap();
    assert_eq!(canonical_local_time(&leap).unwrap(), leap);
}

#[test]
fn local_time_discards_date_part() {
    assert_eq!(
        canonical_local_time("1979-05-27T07:32:00").unwrap(),
        "07:32:00"
    );
}

#[test]
fn local_time_rejects_offset_and_out_of_range() {
    assert_invalid(canonical_local_time("07:32:00Z"), Kind::LocalTime);
    assert_invalid(canonical_local_time("25:00:00"), Kind::LocalTime);
    assert_invalid(canonical_local_time("7:32:00"), Kind::LocalTime);
    assert_invalid(canonical_local_time("1979-05-27"), Kind::LocalTime);
}
