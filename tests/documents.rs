//! Whole JSON documents written and read through `TemporalCodec`.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use temporal_json::{
    error::ErrorKind,
    options::{Feature, ReadConfig, WriteConfig},
    provider::FixedOffsetProvider,
    Duration, Instant, OffsetDateTime, PlainDate, PlainTime, TemporalCodec, TemporalKind,
    TemporalValue, TimeZone, UtcOffset, Year,
};

fn codec() -> TemporalCodec<FixedOffsetProvider> {
    TemporalCodec::new(FixedOffsetProvider)
}

fn record() -> Vec<(&'static str, TemporalValue)> {
    vec![
        ("created", Instant::from_epoch_seconds(1_377_069_777, 123_456_789).unwrap().into()),
        ("due", PlainDate::new(2013, 8, 21).unwrap().into()),
        ("alarm", PlainTime::new(9, 22, 0, 57).unwrap().into()),
        ("timeout", Duration::new(-3, 250_000_000).unwrap().into()),
        ("season", Year::new(2013).unwrap().into()),
        (
            "sent",
            OffsetDateTime::from_ixdtf_str("2013-08-21T09:22:57.5Z").unwrap().into(),
        ),
    ]
}

fn write_document(codec: &TemporalCodec<FixedOffsetProvider>, config: &WriteConfig) -> String {
    let mut object = Map::new();
    for (name, value) in record() {
        object.insert(name.into(), codec.serialize(&value, config).unwrap());
    }
    Value::Object(object).to_string()
}

fn read_document(
    codec: &TemporalCodec<FixedOffsetProvider>,
    text: &str,
    config: &ReadConfig,
) -> Vec<(&'static str, Option<TemporalValue>)> {
    let Value::Object(object) = serde_json::from_str::<Value>(text).unwrap() else {
        panic!("expected an object: {text}");
    };
    record()
        .into_iter()
        .map(|(name, value)| {
            let decoded = codec.deserialize(value.kind(), &object[name], config).unwrap();
            (name, decoded)
        })
        .collect()
}

#[test]
fn default_document_shapes() {
    let text = write_document(&codec(), &WriteConfig::default());
    assert_eq!(
        text,
        concat!(
            r#"{"alarm":[9,22,0,57],"created":1377069777.123456789,"due":[2013,8,21],"#,
            r#""season":2013,"sent":1377076977.500000000,"timeout":-2.750000000}"#
        )
    );
}

#[test]
fn documents_round_trip_under_every_timestamp_flag() {
    let codec = codec();
    for as_timestamp in [false, true] {
        for nanos in [false, true] {
            let write = WriteConfig::default()
                .set(Feature::AsTimestamp, as_timestamp)
                .set(Feature::TimestampsAsNanoseconds, nanos);
            let read = ReadConfig::default().set(Feature::TimestampsAsNanoseconds, nanos);
            let text = write_document(&codec, &write);

            let decoded = read_document(&codec, &text, &read);
            for ((name, decoded), (_, original)) in decoded.into_iter().zip(record()) {
                let decoded = decoded.unwrap();
                // Millisecond timestamps drop sub-millisecond digits.
                if as_timestamp && !nanos && matches!(name, "created" | "sent" | "timeout" | "alarm") {
                    assert_eq!(decoded.kind(), original.kind(), "{name} in {text}");
                    continue;
                }
                assert_eq!(decoded, original, "{name} in {text}");
            }
        }
    }
}

#[test]
fn text_document_shapes() {
    let text = write_document(&codec(), &WriteConfig::default().without(Feature::AsTimestamp));
    let object: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(object["created"], "2013-08-21T07:22:57.123456789Z");
    assert_eq!(object["due"], "2013-08-21");
    assert_eq!(object["alarm"], "09:22:00.000000057");
    assert_eq!(object["timeout"], "-PT2.75S");
    assert_eq!(object["season"], "2013");
    assert_eq!(object["sent"], "2013-08-21T09:22:57.5Z");
}

#[test]
fn offsets_follow_the_context_zone() {
    let text = r#"{"sent":"2013-08-21T09:22:57+05:00"}"#;
    let object: Value = serde_json::from_str(text).unwrap();
    let minus_three = TimeZone::Offset(UtcOffset::from_seconds(-3 * 3_600).unwrap());
    let codec = codec().with_context_zone(minus_three);

    let keep = ReadConfig::default().without(Feature::AdjustToContextZone);
    let Some(TemporalValue::OffsetDateTime(kept)) = codec
        .deserialize(TemporalKind::OffsetDateTime, &object["sent"], &keep)
        .unwrap()
    else {
        panic!("expected an offset date-time");
    };
    assert_eq!(kept.offset().seconds(), 5 * 3_600);

    let Some(TemporalValue::OffsetDateTime(adjusted)) = codec
        .deserialize(TemporalKind::OffsetDateTime, &object["sent"], &ReadConfig::default())
        .unwrap()
    else {
        panic!("expected an offset date-time");
    };
    assert_eq!(adjusted.offset().seconds(), -3 * 3_600);
    assert_eq!(adjusted.to_instant(), kept.to_instant());
}

#[test]
fn temporal_map_keys() {
    let codec = codec();
    let mut counts = BTreeMap::new();
    for day in [21, 22, 23] {
        let date = TemporalValue::from(PlainDate::new(2013, 8, day).unwrap());
        let key = codec.serialize_key(Some(&date), &WriteConfig::default()).unwrap();
        counts.insert(key, u32::from(day) * 10);
    }
    counts.insert(codec.serialize_key(None, &WriteConfig::default()).unwrap(), 0);

    let text = serde_json::to_string(&counts).unwrap();
    assert_eq!(text, r#"{"":0,"2013-08-21":210,"2013-08-22":220,"2013-08-23":230}"#);

    let decoded: BTreeMap<String, u32> = serde_json::from_str(&text).unwrap();
    let keys: Vec<_> = decoded
        .keys()
        .map(|key| {
            codec
                .deserialize_key(TemporalKind::PlainDate, key, &ReadConfig::default())
                .unwrap()
        })
        .collect();
    assert_eq!(keys[0], None);
    assert_eq!(keys[3], Some(PlainDate::new(2013, 8, 23).unwrap().into()));
}

#[test]
fn typed_values_inside_a_list() {
    let codec = codec();
    let values = [
        TemporalValue::from(PlainDate::new(2013, 8, 21).unwrap()),
        TemporalValue::from(Duration::from_milliseconds(1_500)),
    ];
    let list: Vec<Value> = values
        .iter()
        .map(|value| codec.serialize_typed(value, &WriteConfig::default()).unwrap())
        .collect();
    let text = Value::Array(list).to_string();
    assert_eq!(
        text,
        r#"[["temporal_json::PlainDate",[2013,8,21]],["temporal_json::Duration",1.500000000]]"#
    );

    let Value::Array(items) = serde_json::from_str::<Value>(&text).unwrap() else {
        panic!("expected a list");
    };
    let date = codec
        .deserialize_typed(TemporalKind::PlainDate, &items[0], &ReadConfig::default())
        .unwrap();
    assert_eq!(date.as_ref(), Some(&values[0]));
    let duration = codec
        .deserialize_typed(TemporalKind::Duration, &items[1], &ReadConfig::default())
        .unwrap();
    assert_eq!(duration.as_ref(), Some(&values[1]));

    let err = codec
        .deserialize_typed(TemporalKind::Duration, &items[0], &ReadConfig::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructuralMismatch);
}

#[test]
fn leniency_flags_for_empty_arrays() {
    let codec = codec();
    let none = ReadConfig::NONE;
    let empty_as_null = none.with(Feature::EmptyArrayAsNull);
    let both = empty_as_null.with(Feature::UnwrapSingleElementArray);

    for config in [none, empty_as_null] {
        let err = codec
            .deserialize_str(TemporalKind::Instant, "[]", &config)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralMismatch, "{config:?}");
    }
    assert_eq!(codec.deserialize_str(TemporalKind::Instant, "[]", &both).unwrap(), None);
    assert_eq!(
        codec.deserialize_str(TemporalKind::Instant, "[0.5]", &both).unwrap(),
        Some(Instant::from_epoch_seconds(0, 500_000_000).unwrap().into())
    );
}
