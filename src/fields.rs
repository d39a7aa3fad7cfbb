//! The ordered field array shape.
//!
//! Arrays list the fields of a kind from most to least significant, such as
//! `[2013,8,21,9,22,57]`. Time fields are minimal: the second is only
//! written when it or the sub-second field is non-zero, and the sub-second
//! field only when it is non-zero.

use serde_json::Value;

use crate::{
    components::{
        PlainDate, PlainDateTime, PlainMonthDay, PlainTime, PlainYearMonth, TemporalValue, Year,
    },
    error::ErrorMessage,
    iso::{IsoDate, IsoDateTime, IsoTime},
    kind::TemporalKind,
    options::{Feature, ReadConfig},
    TemporalJsonError, TemporalJsonResult,
};

const NANOS_PER_MILLI: u32 = 1_000_000;

/// The result of decoding a field array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedFields {
    /// A complete value that needs no zone resolution.
    Value(TemporalValue),
    /// Wall-clock fields of a zone-aware kind, with the trailing zone
    /// element if one was present.
    Local {
        datetime: IsoDateTime,
        zone: Option<String>,
    },
}

// ==== Encoding ====

/// Encodes `value` as an ordered field array.
///
/// `use_nanos` writes the sub-second field as nanoseconds, otherwise as
/// milliseconds. Epoch kinds, zone-aware kinds included, have no array
/// form on output.
pub fn encode_fields(value: &TemporalValue, use_nanos: bool) -> TemporalJsonResult<Vec<Value>> {
    let mut out = Vec::with_capacity(7);
    match value {
        TemporalValue::PlainDate(date) => push_date(&mut out, date.iso()),
        TemporalValue::PlainTime(time) => push_time(&mut out, time.iso(), use_nanos),
        TemporalValue::PlainDateTime(datetime) => {
            push_date(&mut out, datetime.iso().date);
            push_time(&mut out, datetime.iso().time, use_nanos);
        }
        TemporalValue::Year(year) => out.push(Value::from(year.value())),
        TemporalValue::YearMonth(year_month) => {
            out.push(Value::from(year_month.year()));
            out.push(Value::from(year_month.month()));
        }
        TemporalValue::MonthDay(month_day) => {
            out.push(Value::from(month_day.month()));
            out.push(Value::from(month_day.day()));
        }
        TemporalValue::Instant(_)
        | TemporalValue::OffsetDateTime(_)
        | TemporalValue::ZonedDateTime(_)
        | TemporalValue::Duration(_)
        | TemporalValue::Period(_)
        | TemporalValue::TimeZone(_) => {
            return Err(TemporalJsonError::structural()
                .with_enum(ErrorMessage::ArrayNotSupported)
                .with_kind(value.kind()));
        }
    }
    Ok(out)
}

fn push_date(out: &mut Vec<Value>, date: IsoDate) {
    out.push(Value::from(date.year));
    out.push(Value::from(date.month));
    out.push(Value::from(date.day));
}

fn push_time(out: &mut Vec<Value>, time: IsoTime, use_nanos: bool) {
    out.push(Value::from(time.hour));
    out.push(Value::from(time.minute));
    let fraction = if use_nanos {
        time.nanosecond
    } else {
        time.nanosecond / NANOS_PER_MILLI
    };
    if time.second > 0 || fraction > 0 {
        out.push(Value::from(time.second));
        if fraction > 0 {
            out.push(Value::from(fraction));
        }
    }
}

// ==== Decoding ====

/// A cursor over the elements of a field array.
struct FieldCursor<'a> {
    items: &'a [Value],
    index: usize,
    kind: TemporalKind,
}

impl<'a> FieldCursor<'a> {
    fn new(items: &'a [Value], kind: TemporalKind) -> Self {
        Self { items, index: 0, kind }
    }

    fn peek(&self) -> Option<&'a Value> {
        self.items.get(self.index)
    }

    /// Reads an optional integer field. Non-integer elements are left for
    /// the caller.
    fn optional(&mut self) -> TemporalJsonResult<Option<i64>> {
        let Some(Value::Number(number)) = self.peek() else {
            return Ok(None);
        };
        let value = number.as_i64().ok_or_else(|| {
            TemporalJsonError::malformed_number()
                .with_enum(ErrorMessage::NotANumber)
                .with_kind(self.kind)
                .with_input(number.to_string())
        })?;
        self.index += 1;
        Ok(Some(value))
    }

    /// Reads a required integer field.
    fn required(&mut self) -> TemporalJsonResult<i64> {
        match self.optional()? {
            Some(value) => Ok(value),
            None if self.peek().is_some() => Err(self.unexpected()),
            None => Err(TemporalJsonError::structural()
                .with_enum(ErrorMessage::MissingArrayField)
                .with_kind(self.kind)
                .with_input(format!("field {}", self.index))),
        }
    }

    /// Reads an optional trailing string element.
    fn optional_text(&mut self) -> Option<&'a str> {
        let text = self.peek()?.as_str()?;
        self.index += 1;
        Some(text)
    }

    fn finish(self) -> TemporalJsonResult<()> {
        if self.index < self.items.len() {
            return Err(self.unexpected());
        }
        Ok(())
    }

    fn unexpected(&self) -> TemporalJsonError {
        let input = self.peek().map(Value::to_string).unwrap_or_default();
        TemporalJsonError::structural()
            .with_enum(ErrorMessage::UnexpectedToken)
            .with_kind(self.kind)
            .with_input(input)
    }

    fn date(&mut self) -> TemporalJsonResult<IsoDate> {
        let year = self.required()?;
        let month = self.required()?;
        let day = self.required()?;
        IsoDate::try_from_fields(year, month, day).map_err(|e| e.with_kind(self.kind))
    }

    fn time(&mut self, config: &ReadConfig) -> TemporalJsonResult<IsoTime> {
        let hour = self.required()?;
        let minute = self.required()?;
        let second = self.optional()?.unwrap_or(0);
        let fraction = match self.optional()? {
            Some(value) => fraction_nanos(value, config),
            None => 0,
        };
        IsoTime::try_from_fields(hour, minute, second, fraction).map_err(|e| e.with_kind(self.kind))
    }
}

/// Interprets the sub-second array field.
///
/// With `TimestampsAsNanoseconds` the field is nanoseconds. Without it, a
/// field below 1000 is milliseconds and anything larger is nanoseconds.
fn fraction_nanos(value: i64, config: &ReadConfig) -> i64 {
    if !config.is_enabled(Feature::TimestampsAsNanoseconds) && (0..1_000).contains(&value) {
        value * i64::from(NANOS_PER_MILLI)
    } else {
        value
    }
}

/// Decodes an ordered field array for `kind`.
pub fn decode_fields(
    kind: TemporalKind,
    items: &[Value],
    config: &ReadConfig,
) -> TemporalJsonResult<DecodedFields> {
    let mut cursor = FieldCursor::new(items, kind);
    let narrow = |value: i64| {
        i32::try_from(value).map_err(|_| {
            TemporalJsonError::overflow()
                .with_enum(ErrorMessage::InvalidDate)
                .with_kind(kind)
                .with_input(value.to_string())
        })
    };
    let small = |value: i64| {
        u8::try_from(value).map_err(|_| {
            TemporalJsonError::parse()
                .with_enum(ErrorMessage::InvalidDate)
                .with_kind(kind)
                .with_input(value.to_string())
        })
    };

    let value: TemporalValue = match kind {
        TemporalKind::PlainDate => PlainDate::from(cursor.date()?).into(),
        TemporalKind::PlainTime => PlainTime::from(cursor.time(config)?).into(),
        TemporalKind::PlainDateTime => {
            let date = cursor.date()?;
            let time = cursor.time(config)?;
            PlainDateTime::from(IsoDateTime::new(date, time)).into()
        }
        TemporalKind::Year => Year::try_from_i64(cursor.required()?)?.into(),
        TemporalKind::YearMonth => {
            let year = narrow(cursor.required()?)?;
            let month = small(cursor.required()?)?;
            PlainYearMonth::new(year, month).map_err(|e| e.with_kind(kind))?.into()
        }
        TemporalKind::MonthDay => {
            let month = small(cursor.required()?)?;
            let day = small(cursor.required()?)?;
            PlainMonthDay::new(month, day).map_err(|e| e.with_kind(kind))?.into()
        }
        TemporalKind::OffsetDateTime | TemporalKind::ZonedDateTime => {
            let date = cursor.date()?;
            let time = cursor.time(config)?;
            let zone = cursor.optional_text().map(str::to_owned);
            cursor.finish()?;
            return Ok(DecodedFields::Local {
                datetime: IsoDateTime::new(date, time),
                zone,
            });
        }
        TemporalKind::Instant | TemporalKind::Duration | TemporalKind::Period | TemporalKind::TimeZone => {
            return Err(TemporalJsonError::structural()
                .with_enum(ErrorMessage::ArrayNotSupported)
                .with_kind(kind));
        }
    };
    cursor.finish()?;
    #[cfg(feature = "log")]
    log::trace!("decoded {kind:?} from {} array fields", items.len());
    Ok(DecodedFields::Value(value))
}
