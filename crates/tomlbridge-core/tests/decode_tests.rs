/// Decode converter tests: TOML document trees → typed values.
///
/// Covers the type mapping table, temporal normalization, the
/// collect-then-fail diagnostic policy, and deep nesting.
use std::collections::BTreeMap;
use toml::value::{Date, Datetime, Time};
use tomlbridge_core::document::parse;
use tomlbridge_core::{decode, DocumentValue, Severity, TypeDescriptor, TypedValue};

fn decode_text(text: &str) -> TypedValue {
    let document = parse(text).expect("parse failed");
    let converted = decode(&document);
    assert!(
        converted.diagnostics.is_empty(),
        "unexpected diagnostics: {}",
        converted.diagnostics
    );
    converted.value.expect("decode produced no value")
}

fn attr<'a>(value: &'a TypedValue, name: &str) -> &'a TypedValue {
    match value {
        TypedValue::Object(attributes) => &attributes[name],
        other => panic!("expected object, got {other:?}"),
    }
}

/// A local date whose components don't name a real day.
fn impossible_date(month: u8, day: u8) -> DocumentValue {
    DocumentValue::LocalDate(Datetime {
        date: Some(Date {
            year: 2023,
            month,
            day,
        }),
        time: None,
        offset: None,
    })
}

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn decode_string() {
    let value = decode_text(r#"s = "hello""#);
    assert_eq!(attr(&value, "s"), &TypedValue::from("hello"));
}

#[test]
fn decode_integer_keeps_full_width() {
    let value = decode_text("big = 9223372036854775807\nsmall = -9223372036854775808");
    assert_eq!(attr(&value, "big"), &TypedValue::Int64(i64::MAX));
    assert_eq!(attr(&value, "small"), &TypedValue::Int64(i64::MIN));
}

#[test]
fn decode_float() {
    let value = decode_text("pi = 3.14\nwhole = 2.0");
    assert_eq!(attr(&value, "pi"), &TypedValue::Float64(3.14));
    assert_eq!(attr(&value, "whole"), &TypedValue::Float64(2.0));
}

#[test]
fn decode_special_floats() {
    let value = decode_text("a = inf\nb = -inf\nc = nan");
    assert_eq!(attr(&value, "a"), &TypedValue::Float64(f64::INFINITY));
    assert_eq!(attr(&value, "b"), &TypedValue::Float64(f64::NEG_INFINITY));
    assert!(matches!(attr(&value, "c"), TypedValue::Float64(f) if f.is_nan()));
}

#[test]
fn decode_bool() {
    let value = decode_text("yes = true\nno = false");
    assert_eq!(attr(&value, "yes"), &TypedValue::Bool(true));
    assert_eq!(attr(&value, "no"), &TypedValue::Bool(false));
}

#[test]
fn decode_null() {
    let converted = decode(&DocumentValue::Null);
    assert_eq!(converted.value, Some(TypedValue::Null));
    assert!(converted.diagnostics.is_empty());
}

// ============================================================================
// Temporal kinds collapse to strings
// ============================================================================

#[test]
fn decode_temporal_kinds_as_strings() {
    let value = decode_text("odt = 1979-05-27T07:32:00Z\nld = 1979-05-27\nlt = 07:32:00");
    assert_eq!(attr(&value, "odt"), &TypedValue::from("1979-05-27T07:32:00Z"));
    assert_eq!(attr(&value, "ld"), &TypedValue::from("1979-05-27"));
    assert_eq!(attr(&value, "lt"), &TypedValue::from("07:32:00"));
}

#[test]
fn decode_local_date_time() {
    let value = decode_text("ldt = 1979-05-27T07:32:00");
    assert_eq!(attr(&value, "ldt"), &TypedValue::from("1979-05-27T07:32:00"));
}

#[test]
fn decode_offset_date_time_keeps_non_zero_offset() {
    let value = decode_text("odt = 1979-05-27T00:32:00-07:00");
    assert_eq!(
        attr(&value, "odt"),
        &TypedValue::from("1979-05-27T00:32:00-07:00")
    );
}

#[test]
fn decode_offset_date_time_drops_fractional_seconds() {
    let value = decode_text("odt = 1979-05-27T00:32:00.999999-07:00");
    assert_eq!(
        attr(&value, "odt"),
        &TypedValue::from("1979-05-27T00:32:00-07:00")
    );
}

#[test]
fn decode_local_time_keeps_fractional_seconds() {
    let value = decode_text("lt = 00:32:00.999999");
    assert_eq!(attr(&value, "lt"), &TypedValue::from("00:32:00.999999"));
}

#[test]
fn decode_local_fraction_is_not_padded() {
    let value = decode_text("lt = 07:32:00.5\nldt = 1979-05-27T07:32:00.5");
    assert_eq!(attr(&value, "lt"), &TypedValue::from("07:32:00.5"));
    assert_eq!(attr(&value, "ldt"), &TypedValue::from("1979-05-27T07:32:00.5"));
}

// ============================================================================
// Arrays → tuples, tables → objects
// ============================================================================

#[test]
fn decode_end_to_end_dotted_key() {
    let value = decode_text(r#"section.field1 = "value1""#);
    assert_eq!(
        value,
        TypedValue::object([(
            "section",
            TypedValue::object([("field1", TypedValue::from("value1"))]),
        )])
    );
}

#[test]
fn decode_heterogeneous_array_as_tuple() {
    let value = decode_text(r#"mixed = [1, "two", true, 4.5]"#);
    let mixed = attr(&value, "mixed");
    assert_eq!(
        mixed,
        &TypedValue::Tuple(vec![
            TypedValue::Int64(1),
            TypedValue::from("two"),
            TypedValue::Bool(true),
            TypedValue::Float64(4.5),
        ])
    );
    assert_eq!(
        mixed.type_of(),
        TypeDescriptor::Tuple(vec![
            TypeDescriptor::Int64,
            TypeDescriptor::String,
            TypeDescriptor::Bool,
            TypeDescriptor::Float64,
        ])
    );
}

#[test]
fn decode_empty_array_and_table() {
    let value = decode_text("empty = []\n[nothing]");
    assert_eq!(attr(&value, "empty"), &TypedValue::Tuple(vec![]));
    assert_eq!(attr(&value, "nothing"), &TypedValue::Object(BTreeMap::new()));
}

#[test]
fn decode_array_of_tables() {
    let value = decode_text(
        r#"
[[fruit]]
name = "apple"

[[fruit]]
name = "banana"
ripe = false
"#,
    );
    assert_eq!(
        attr(&value, "fruit"),
        &TypedValue::Tuple(vec![
            TypedValue::object([("name", TypedValue::from("apple"))]),
            TypedValue::object([
                ("name", TypedValue::from("banana")),
                ("ripe", TypedValue::Bool(false)),
            ]),
        ])
    );
}

#[test]
fn decode_inline_table_same_as_table() {
    let inline = decode_text(r#"point = { x = 1, y = 2 }"#);
    let standard = decode_text("[point]\nx = 1\ny = 2");
    assert_eq!(inline, standard);
}

#[test]
fn decode_keys_pass_through_unchanged() {
    let value = decode_text(r#""key with spaces" = 1
"ключ" = 2
"a.b" = 3"#);
    let TypedValue::Object(attributes) = &value else {
        panic!("expected object");
    };
    let keys: Vec<&str> = attributes.keys().map(String::as_str).collect();
    assert_eq!(keys, ["a.b", "key with spaces", "ключ"]);
}

#[test]
fn decode_does_not_touch_input() {
    let document = parse("a = [1, 2]\n[b]\nc = 1979-05-27").unwrap();
    let before = document.clone();
    let _ = decode(&document);
    assert_eq!(document, before);
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn decode_reports_every_malformed_array_element() {
    let array = DocumentValue::Array(vec![
        impossible_date(2, 30),
        DocumentValue::Integer(1),
        impossible_date(13, 1),
    ]);
    let converted = decode(&array);
    assert_eq!(converted.value, None);
    assert_eq!(converted.diagnostics.error_count(), 2);
    for diagnostic in &converted.diagnostics {
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.summary, "Invalid value to convert to typed value");
        assert!(diagnostic.detail.contains("local date"), "{}", diagnostic.detail);
    }
}

#[test]
fn decode_reports_errors_across_nested_siblings() {
    let table = DocumentValue::Table(BTreeMap::from([
        (
            "a".to_string(),
            DocumentValue::Array(vec![impossible_date(2, 31)]),
        ),
        ("b".to_string(), DocumentValue::String("fine".into())),
        (
            "c".to_string(),
            DocumentValue::Table(BTreeMap::from([(
                "d".to_string(),
                impossible_date(0, 1),
            )])),
        ),
    ]));
    let converted = decode(&table);
    assert_eq!(converted.value, None);
    assert_eq!(converted.diagnostics.error_count(), 2);
}

#[test]
fn decode_rejects_temporal_with_wrong_components() {
    // An offset date-time without its offset.
    let datetime = Datetime {
        date: Some(Date {
            year: 1979,
            month: 5,
            day: 27,
        }),
        time: Some(Time {
            hour: 7,
            minute: 32,
            second: 0,
            nanosecond: 0,
        }),
        offset: None,
    };
    let converted = decode(&DocumentValue::OffsetDateTime(datetime));
    assert_eq!(converted.value, None);
    assert_eq!(converted.diagnostics.error_count(), 1);
    let detail = &converted.diagnostics.iter().next().unwrap().detail;
    assert!(detail.contains("1979-05-27T07:32:00"), "{detail}");
    assert!(detail.contains("offset date-time"), "{detail}");
}

#[test]
fn decode_emits_no_warnings_on_success() {
    let document = parse("a = 1\nb = [true, 1979-05-27]").unwrap();
    let converted = decode(&document);
    assert!(converted.value.is_some());
    assert!(converted.diagnostics.is_empty());
}

// ============================================================================
// Depth
// ============================================================================

#[test]
fn decode_deeply_nested_arrays() {
    const DEPTH: usize = 2_000;
    let mut document = DocumentValue::Integer(7);
    for _ in 0..DEPTH {
        document = DocumentValue::Array(vec![document]);
    }

    let converted = decode(&document);
    assert!(converted.diagnostics.is_empty());

    let mut value = converted.value.as_ref().unwrap();
    let mut levels = 0;
    while let TypedValue::Tuple(elements) = value {
        assert_eq!(elements.len(), 1);
        value = &elements[0];
        levels += 1;
    }
    assert_eq!(levels, DEPTH);
    assert_eq!(value, &TypedValue::Int64(7));
}
