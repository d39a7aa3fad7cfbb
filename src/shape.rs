//! Wire shape selection and detection.
//!
//! `select_output_shape` picks the JSON shape written for a kind under a
//! `WriteConfig`. `detect_input_shape` picks the shape to read from the
//! kind of the next JSON token under a `ReadConfig`. Every combination of
//! flags maps to exactly one shape or one structural error.

use serde_json::Value;

use crate::{
    decimal::EpochUnit,
    error::ErrorMessage,
    kind::TemporalKind,
    options::{Feature, ReadConfig, WriteConfig},
    TemporalJsonError, TemporalJsonResult,
};

/// The JSON shape written for a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    /// ISO-8601 text. `zone_id` appends the region zone as `[id]`.
    IsoText { zone_id: bool },
    /// Text rendered with the caller's pattern.
    PatternText,
    /// Decimal epoch seconds with nine fractional digits.
    DecimalEpoch,
    /// Integer epoch milliseconds.
    MillisEpoch,
    /// An ordered array of numeric fields. `nanos` writes the sub-second
    /// field as nanoseconds instead of milliseconds.
    FieldArray { nanos: bool },
    /// A plain integer (years).
    Integer,
}

/// The shape to read from the next JSON token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputShape {
    /// The value decodes to `None`.
    Null,
    /// ISO-8601 text.
    IsoText,
    /// Text read with the caller's pattern.
    PatternText,
    /// A decimal epoch literal, `seconds[.fraction]` or with an exponent.
    DecimalEpoch,
    /// An integer epoch literal in the given unit.
    IntegerEpoch { unit: EpochUnit },
    /// An integer count of days since 1970-01-01.
    EpochDay,
    /// A plain integer field (years).
    Integer,
    /// An ordered array of fields.
    FieldArray,
    /// A single element array whose element is read in its place.
    UnwrapSingle,
}

/// The kind of the next JSON token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A number literal without a fraction or exponent.
    Integer,
    /// A number literal with a fraction or exponent.
    Float,
    /// A string. `blank` is set for empty or whitespace-only strings.
    String { blank: bool },
    /// A string of an optional `-`, digits and at most one `.`.
    NumericString { integer: bool },
    /// A non-empty array.
    StartArray,
    /// An empty array.
    EmptyArray,
    Null,
    Boolean,
    StartObject,
}

impl Token {
    /// Classifies a JSON value by its first token.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(number) => {
                if number.to_string().contains(['.', 'e', 'E']) {
                    Self::Float
                } else {
                    Self::Integer
                }
            }
            Value::String(text) => {
                let text = text.trim();
                if text.is_empty() {
                    Self::String { blank: true }
                } else if is_numeric_text(text) {
                    Self::NumericString {
                        integer: !text.contains('.'),
                    }
                } else {
                    Self::String { blank: false }
                }
            }
            Value::Array(items) if items.is_empty() => Self::EmptyArray,
            Value::Array(_) => Self::StartArray,
            Value::Object(_) => Self::StartObject,
        }
    }
}

fn is_numeric_text(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let mut points = 0;
    let mut any_digit = false;
    for b in digits.bytes() {
        match b {
            b'0'..=b'9' => any_digit = true,
            b'.' => points += 1,
            _ => return false,
        }
    }
    any_digit && points <= 1
}

/// Returns the shape written for `kind`.
///
/// A pattern, when the kind accepts one, overrides every flag.
#[must_use]
pub fn select_output_shape(kind: TemporalKind, config: &WriteConfig, has_pattern: bool) -> OutputShape {
    let traits = kind.traits();
    let nanos = config.is_enabled(Feature::TimestampsAsNanoseconds);
    let shape = if has_pattern && traits.accepts_pattern {
        OutputShape::PatternText
    } else if !config.is_enabled(Feature::AsTimestamp) || !traits.timestamp_shape {
        OutputShape::IsoText {
            zone_id: kind == TemporalKind::ZonedDateTime && config.is_enabled(Feature::WriteZoneId),
        }
    } else if traits.numeric_epoch {
        if nanos {
            OutputShape::DecimalEpoch
        } else {
            OutputShape::MillisEpoch
        }
    } else if kind == TemporalKind::Year {
        OutputShape::Integer
    } else {
        OutputShape::FieldArray { nanos }
    };
    #[cfg(feature = "log")]
    log::trace!("output shape for {kind:?} with {config:?}: {shape:?}");
    shape
}

/// Returns the shape to read for `kind` given the next token.
pub fn detect_input_shape(
    kind: TemporalKind,
    config: &ReadConfig,
    token: Token,
    has_pattern: bool,
) -> TemporalJsonResult<InputShape> {
    let traits = kind.traits();
    let epoch_unit = if config.is_enabled(Feature::TimestampsAsNanoseconds) {
        EpochUnit::Seconds
    } else {
        EpochUnit::Milliseconds
    };
    let mismatch = || {
        TemporalJsonError::structural()
            .with_enum(ErrorMessage::UnexpectedToken)
            .with_kind(kind)
            .with_input(format!("{token:?}"))
    };

    let shape = match token {
        Token::Null | Token::String { blank: true } => InputShape::Null,
        Token::NumericString { integer } if traits.numeric_epoch && kind != TemporalKind::Duration => {
            if integer {
                InputShape::IntegerEpoch { unit: epoch_unit }
            } else {
                InputShape::DecimalEpoch
            }
        }
        Token::String { .. } | Token::NumericString { .. } => {
            if has_pattern && traits.accepts_pattern {
                InputShape::PatternText
            } else {
                InputShape::IsoText
            }
        }
        Token::Integer if traits.numeric_epoch => InputShape::IntegerEpoch { unit: epoch_unit },
        Token::Integer if kind == TemporalKind::PlainDate => InputShape::EpochDay,
        Token::Integer if kind == TemporalKind::Year => InputShape::Integer,
        Token::Float if traits.numeric_epoch => InputShape::DecimalEpoch,
        Token::EmptyArray => {
            let as_null = config.is_enabled(Feature::EmptyArrayAsNull);
            let eligible = traits.array_fields || config.is_enabled(Feature::UnwrapSingleElementArray);
            if as_null && eligible {
                InputShape::Null
            } else {
                let feature = if as_null {
                    Feature::UnwrapSingleElementArray
                } else {
                    Feature::EmptyArrayAsNull
                };
                return Err(TemporalJsonError::structural()
                    .with_enum(ErrorMessage::EmptyArray)
                    .with_kind(kind)
                    .with_feature(feature)
                    .with_input("[]"));
            }
        }
        Token::StartArray if traits.array_fields => InputShape::FieldArray,
        Token::StartArray if config.is_enabled(Feature::UnwrapSingleElementArray) => InputShape::UnwrapSingle,
        Token::StartArray => {
            return Err(TemporalJsonError::structural()
                .with_enum(ErrorMessage::ArrayNotSupported)
                .with_kind(kind)
                .with_feature(Feature::UnwrapSingleElementArray));
        }
        Token::Integer | Token::Float | Token::Boolean | Token::StartObject => return Err(mismatch()),
    };
    #[cfg(feature = "log")]
    log::trace!("input shape for {kind:?} from {token:?} with {config:?}: {shape:?}");
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{detect_input_shape, select_output_shape, InputShape, OutputShape, Token};
    use crate::{
        decimal::EpochUnit,
        error::ErrorKind,
        kind::TemporalKind,
        options::{Feature, ReadConfig, WriteConfig},
    };

    #[test]
    fn classifies_tokens() {
        assert_eq!(Token::of(&json!(null)), Token::Null);
        assert_eq!(Token::of(&json!(12)), Token::Integer);
        assert_eq!(Token::of(&json!(-12)), Token::Integer);
        assert_eq!(Token::of(&json!("  ")), Token::String { blank: true });
        assert_eq!(Token::of(&json!("2013-08-21")), Token::String { blank: false });
        assert_eq!(Token::of(&json!("-12.5")), Token::NumericString { integer: false });
        assert_eq!(Token::of(&json!("1.2.3")), Token::String { blank: false });
        assert_eq!(Token::of(&json!("-")), Token::String { blank: false });
        assert_eq!(Token::of(&json!(" 1420324047 ")), Token::NumericString { integer: true });
        assert_eq!(Token::of(&json!("\t-12.5\n")), Token::NumericString { integer: false });
        assert_eq!(Token::of(&json!([])), Token::EmptyArray);
        assert_eq!(Token::of(&json!([1])), Token::StartArray);
        assert_eq!(Token::of(&json!({})), Token::StartObject);

        let float: serde_json::Value = serde_json::from_str("1.5").unwrap();
        assert_eq!(Token::of(&float), Token::Float);
        let exponent: serde_json::Value = serde_json::from_str("1e3").unwrap();
        assert_eq!(Token::of(&exponent), Token::Float);
    }

    #[test]
    fn output_shapes() {
        let config = WriteConfig::default();
        let text = config.without(Feature::AsTimestamp);
        let millis = config.without(Feature::TimestampsAsNanoseconds);

        assert_eq!(select_output_shape(TemporalKind::Instant, &config, false), OutputShape::DecimalEpoch);
        assert_eq!(select_output_shape(TemporalKind::Instant, &millis, false), OutputShape::MillisEpoch);
        assert_eq!(
            select_output_shape(TemporalKind::Instant, &text, false),
            OutputShape::IsoText { zone_id: false }
        );
        assert_eq!(
            select_output_shape(TemporalKind::ZonedDateTime, &text.with(Feature::WriteZoneId), false),
            OutputShape::IsoText { zone_id: true }
        );
        assert_eq!(
            select_output_shape(TemporalKind::OffsetDateTime, &text.with(Feature::WriteZoneId), false),
            OutputShape::IsoText { zone_id: false }
        );
        assert_eq!(
            select_output_shape(TemporalKind::PlainTime, &millis, false),
            OutputShape::FieldArray { nanos: false }
        );
        assert_eq!(select_output_shape(TemporalKind::Year, &config, false), OutputShape::Integer);
        assert_eq!(select_output_shape(TemporalKind::Duration, &config, false), OutputShape::DecimalEpoch);
        assert_eq!(
            select_output_shape(TemporalKind::Period, &config, false),
            OutputShape::IsoText { zone_id: false }
        );
        assert_eq!(
            select_output_shape(TemporalKind::TimeZone, &config, true),
            OutputShape::IsoText { zone_id: false }
        );
        assert_eq!(select_output_shape(TemporalKind::PlainDate, &config, true), OutputShape::PatternText);
        assert_eq!(select_output_shape(TemporalKind::Instant, &config, true), OutputShape::PatternText);
    }

    #[test]
    fn every_flag_combination_has_an_output_shape() {
        let features = [
            Feature::AsTimestamp,
            Feature::TimestampsAsNanoseconds,
            Feature::WriteZoneId,
        ];
        for bits in 0..8u8 {
            let config = features
                .iter()
                .enumerate()
                .fold(WriteConfig::NONE, |config, (i, f)| config.set(*f, bits & (1 << i) != 0));
            for kind in TemporalKind::ALL {
                let shape = select_output_shape(kind, &config, false);
                if !config.is_enabled(Feature::AsTimestamp) {
                    assert!(matches!(shape, OutputShape::IsoText { .. }), "{kind:?} {config:?}");
                }
            }
        }
    }

    #[test]
    fn numeric_tokens() {
        let config = ReadConfig::default();
        assert_eq!(
            detect_input_shape(TemporalKind::Instant, &config, Token::Integer, false).unwrap(),
            InputShape::IntegerEpoch { unit: EpochUnit::Seconds }
        );
        let millis = config.without(Feature::TimestampsAsNanoseconds);
        assert_eq!(
            detect_input_shape(TemporalKind::Duration, &millis, Token::Integer, false).unwrap(),
            InputShape::IntegerEpoch { unit: EpochUnit::Milliseconds }
        );
        assert_eq!(
            detect_input_shape(TemporalKind::ZonedDateTime, &config, Token::Float, false).unwrap(),
            InputShape::DecimalEpoch
        );
        assert_eq!(
            detect_input_shape(TemporalKind::PlainDate, &config, Token::Integer, false).unwrap(),
            InputShape::EpochDay
        );
        assert_eq!(
            detect_input_shape(TemporalKind::Year, &config, Token::Integer, false).unwrap(),
            InputShape::Integer
        );
        let err = detect_input_shape(TemporalKind::PlainTime, &config, Token::Integer, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralMismatch);
        let err = detect_input_shape(TemporalKind::Period, &config, Token::Float, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralMismatch);
    }

    #[test]
    fn string_tokens() {
        let config = ReadConfig::default();
        let text = Token::String { blank: false };
        assert_eq!(
            detect_input_shape(TemporalKind::Instant, &config, text, false).unwrap(),
            InputShape::IsoText
        );
        assert_eq!(
            detect_input_shape(TemporalKind::PlainDate, &config, text, true).unwrap(),
            InputShape::PatternText
        );
        assert_eq!(
            detect_input_shape(TemporalKind::Duration, &config, text, true).unwrap(),
            InputShape::IsoText
        );
        assert_eq!(
            detect_input_shape(TemporalKind::Instant, &config, Token::String { blank: true }, false).unwrap(),
            InputShape::Null
        );
        assert_eq!(
            detect_input_shape(
                TemporalKind::Instant,
                &config,
                Token::NumericString { integer: false },
                false
            )
            .unwrap(),
            InputShape::DecimalEpoch
        );
        assert_eq!(
            detect_input_shape(
                TemporalKind::Year,
                &config,
                Token::NumericString { integer: true },
                false
            )
            .unwrap(),
            InputShape::IsoText
        );
    }

    #[test]
    fn leniency_flags() {
        let none = ReadConfig::NONE;
        let as_null = none.with(Feature::EmptyArrayAsNull);
        let both = as_null.with(Feature::UnwrapSingleElementArray);

        let err = detect_input_shape(TemporalKind::Instant, &none, Token::EmptyArray, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralMismatch);
        assert_eq!(err.feature(), Some(Feature::EmptyArrayAsNull));

        let err = detect_input_shape(TemporalKind::Instant, &as_null, Token::EmptyArray, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralMismatch);
        assert_eq!(err.feature(), Some(Feature::UnwrapSingleElementArray));

        assert_eq!(
            detect_input_shape(TemporalKind::Instant, &both, Token::EmptyArray, false).unwrap(),
            InputShape::Null
        );
        assert_eq!(
            detect_input_shape(TemporalKind::PlainDate, &as_null, Token::EmptyArray, false).unwrap(),
            InputShape::Null
        );
        assert!(detect_input_shape(TemporalKind::PlainDate, &none, Token::EmptyArray, false).is_err());

        let err = detect_input_shape(TemporalKind::Duration, &none, Token::StartArray, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralMismatch);
        assert_eq!(
            detect_input_shape(
                TemporalKind::Duration,
                &none.with(Feature::UnwrapSingleElementArray),
                Token::StartArray,
                false
            )
            .unwrap(),
            InputShape::UnwrapSingle
        );
        assert_eq!(
            detect_input_shape(TemporalKind::PlainDateTime, &none, Token::StartArray, false).unwrap(),
            InputShape::FieldArray
        );
    }
}
