use std::collections::BTreeMap;

use toml::value::{Date, Datetime, Offset, Time};
use toml_oracle::{convert_table, convert_value, CanonicalValue, Decoder, Kind, OracleError, TomlCrateDecoder};

fn decode(doc: &str) -> CanonicalValue {
    let table = TomlCrateDecoder.decode(doc).expect("document should decode");
    convert_table(&table).expect("conversion should succeed")
}

fn scalar(kind: Kind, value: &str) -> CanonicalValue {
    CanonicalValue::scalar(kind, value)
}

/// Look up `key` in a converted document root.
fn get<'a>(value: &'a CanonicalValue, key: &str) -> &'a CanonicalValue {
    match value {
        CanonicalValue::Table(map) => map.get(key).unwrap_or_else(|| panic!("missing key {key}")),
        other => panic!("expected a table, got {other:?}"),
    }
}

#[test]
fn integer_scenario() {
    let mut expected = BTreeMap::new();
    expected.insert("one".to_string(), scalar(Kind::Integer, "1"));
    assert_eq!(decode("one=1"), CanonicalValue::Table(expected));
}

#[test]
fn scalars() {
    let doc = decode(
        r#"
        s = "two"
        t = true
        f = false
        neg = -17
        hex = 0xff
        pi = 3.14
        "#,
    );
    assert_eq!(get(&doc, "s"), &scalar(Kind::String, "two"));
    assert_eq!(get(&doc, "t"), &scalar(Kind::Boolean, "true"));
    assert_eq!(get(&doc, "f"), &scalar(Kind::Boolean, "false"));
    assert_eq!(get(&doc, "neg"), &scalar(Kind::Integer, "-17"));
    assert_eq!(get(&doc, "hex"), &scalar(Kind::Integer, "255"));
    assert_eq!(get(&doc, "pi"), &scalar(Kind::Float, "3.14"));
}

#[test]
fn special_floats() {
    let doc = decode(
        "
        biggest1 = inf
        biggest2 = +inf
        smallest = -inf
        notnum1 = nan
        notnum2 = -nan
        notnum3 = +nan
        exp = 1e0
        ",
    );
    assert_eq!(get(&doc, "biggest1"), &scalar(Kind::Float, "inf"));
    assert_eq!(get(&doc, "biggest2"), &scalar(Kind::Float, "inf"));
    assert_eq!(get(&doc, "smallest"), &scalar(Kind::Float, "-inf"));
    for key in ["notnum1", "notnum2", "notnum3"] {
        assert_eq!(get(&doc, key), &scalar(Kind::Float, "nan"), "key {key}");
    }
    assert_eq!(get(&doc, "exp"), &scalar(Kind::Float, "1.0"));
}

#[test]
fn temporal_kinds() {
    let doc = decode(
        "
        odt = 1979-05-27T00:32:00.999999-07:00
        zulu = 1979-05-27T07:32:00Z
        ldt = 1979-05-27T07:32:00
        ld = 1979-05-27
        lt = 07:32:00
        lt_frac = 00:32:00.999999
        ",
    );
    assert_eq!(
        get(&doc, "odt"),
        &scalar(Kind::OffsetDateTime, "1979-05-27T00:32:00.999999-07:00")
    );
    assert_eq!(
        get(&doc, "zulu"),
        &scalar(Kind::OffsetDateTime, "1979-05-27T07:32:00+00:00")
    );
    assert_eq!(
        get(&doc, "ldt"),
        &scalar(Kind::LocalDateTime, "1979-05-27T07:32:00")
    );
    assert_eq!(get(&doc, "ld"), &scalar(Kind::LocalDate, "1979-05-27"));
    assert_eq!(get(&doc, "lt"), &scalar(Kind::LocalTime, "07:32:00"));
    assert_eq!(
        get(&doc, "lt_frac"),
        &scalar(Kind::LocalTime, "00:32:00.999999")
    );
}

#[test]
fn leap_second_keeps_sixty() {
    let doc = decode(
        "
        odt = 1990-12-31T23:59:60Z
        ldt = 1990-12-31T23:59:60.5
        ",
    );
    assert_eq!(
        get(&doc, "odt"),
        &scalar(Kind::OffsetDateTime, "1990-12-31T23:59:60+00:00")
    );
    assert_eq!(
        get(&doc, "ldt"),
        &scalar(Kind::LocalDateTime, "1990-12-31T23:59:60.500000")
    );

    let lt = toml::Value::Datetime(Datetime {
        date: None,
        time: Some(Time {
            hour: 23,
            minute: 59,
            second: 60,
            nanosecond: 0,
        }),
        offset: None,
    });
    assert_eq!(
        convert_value(&lt).unwrap(),
        scalar(Kind::LocalTime, "23:59:60")
    );
}

#[test]
fn leap_second_matches_fixture_literal() {
    let doc = decode("t = 1990-12-31T15:59:60-08:00");
    let fixture =
        toml_oracle::literal::canonical_offset_datetime("1990-12-31T15:59:60-0800").unwrap();
    assert_eq!(get(&doc, "t"), &scalar(Kind::OffsetDateTime, &fixture));
}

#[test]
fn nested_offset_datetime_in_array() {
    let doc = decode(
        "
        [bliibaa.diibaa]
        offsettime=[1979-05-27T00:32:00.999999-07:00]
        ",
    );
    let diibaa = get(get(&doc, "bliibaa"), "diibaa");
    assert_eq!(
        get(diibaa, "offsettime"),
        &CanonicalValue::Array(vec![scalar(
            Kind::OffsetDateTime,
            "1979-05-27T00:32:00.999999-07:00"
        )])
    );
}

#[test]
fn arrays_preserve_order() {
    let doc = decode("arr = [1, [2, 3], \"x\"]");
    assert_eq!(
        get(&doc, "arr"),
        &CanonicalValue::Array(vec![
            scalar(Kind::Integer, "1"),
            CanonicalValue::Array(vec![scalar(Kind::Integer, "2"), scalar(Kind::Integer, "3")]),
            scalar(Kind::String, "x"),
        ])
    );
}

#[test]
fn array_of_tables() {
    let doc = decode(
        r#"
        [[fruit]]
        name = "apple"
        [[fruit]]
        name = "banana"
        "#,
    );
    let CanonicalValue::Array(fruits) = get(&doc, "fruit") else {
        panic!("fruit should be an array");
    };
    assert_eq!(fruits.len(), 2);
    assert_eq!(get(&fruits[1], "name"), &scalar(Kind::String, "banana"));
}

#[test]
fn keys_are_copied_verbatim() {
    let doc = decode(r#""quoted key" = 1"#);
    assert_eq!(get(&doc, "quoted key"), &scalar(Kind::Integer, "1"));
}

#[test]
fn empty_document_is_empty_table() {
    assert_eq!(decode(""), CanonicalValue::Table(BTreeMap::new()));
}

#[test]
fn time_with_offset_is_unsupported() {
    let value = toml::Value::Datetime(Datetime {
        date: None,
        time: Some(Time {
            hour: 7,
            minute: 32,
            second: 0,
            nanosecond: 0,
        }),
        offset: Some(Offset::Z),
    });
    assert!(matches!(
        convert_value(&value),
        Err(OracleError::UnsupportedType(_))
    ));
}

#[test]
fn out_of_range_date_is_unsupported() {
    let value = toml::Value::Datetime(Datetime {
        date: Some(Date {
            year: 2021,
            month: 2,
            day: 30,
        }),
        time: None,
        offset: None,
    });
    let err = convert_value(&value).unwrap_err();
    assert!(matches!(err, OracleError::UnsupportedType(_)));
    assert!(err.to_string().starts_with("Unsupported native value"));
}

#[test]
fn unsupported_value_nested_in_table_fails_whole_conversion() {
    let mut table = toml::Table::new();
    table.insert("ok".to_string(), toml::Value::Integer(1));
    table.insert(
        "bad".to_string(),
        toml::Value::Array(vec![toml::Value::Datetime(Datetime {
            date: None,
            time: None,
            offset: None,
        })]),
    );
    assert!(convert_table(&table).is_err());
}
