//! The `TemporalCodec`: JSON encoding and decoding of temporal values.
//!
//! A codec holds the caller's configuration: a zone provider, an optional
//! format pattern and an optional context zone. Each call to `serialize` or
//! `deserialize` picks a wire shape from the value's kind and the call's
//! flags, then runs the matching encoder or decoder.
//!
//! ```rust
//! use temporal_json::{
//!     options::{Feature, ReadConfig, WriteConfig},
//!     provider::FixedOffsetProvider,
//!     Instant, TemporalCodec, TemporalKind, TemporalValue,
//! };
//!
//! let codec = TemporalCodec::new(FixedOffsetProvider);
//! let instant = Instant::from_epoch_seconds(123_456_789, 183_917_322).unwrap();
//!
//! let json = codec.serialize(&instant.into(), &WriteConfig::default()).unwrap();
//! assert_eq!(json.to_string(), "123456789.183917322");
//!
//! let text = WriteConfig::default().without(Feature::AsTimestamp);
//! let json = codec.serialize(&instant.into(), &text).unwrap();
//! assert_eq!(json, "1973-11-29T21:33:09.183917322Z");
//!
//! let decoded = codec
//!     .deserialize(TemporalKind::Instant, &json, &ReadConfig::default())
//!     .unwrap();
//! assert_eq!(decoded, Some(TemporalValue::Instant(instant)));
//! ```

use core::str::FromStr;

use serde_json::{Number, Value};

use crate::{
    components::{
        Duration, Instant, OffsetDateTime, Period, PlainDate, PlainDateTime, PlainMonthDay,
        PlainTime, PlainYearMonth, TemporalValue, TimeZone, UtcOffset, Year, ZonedDateTime,
    },
    decimal,
    epoch::{EpochBounds, SecondsNanos},
    error::ErrorMessage,
    fields::{self, DecodedFields},
    iso::IsoDateTime,
    kind::TemporalKind,
    options::{Feature, ReadConfig, WriteConfig},
    pattern::{FormatPattern, PatternFields},
    provider::TimeZoneProvider,
    reconcile::{self, ReconciliationContext},
    shape::{self, InputShape, OutputShape, Token},
    TemporalJsonError, TemporalJsonResult,
};


/// Encodes and decodes temporal values as JSON.
#[derive(Debug, Clone)]
pub struct TemporalCodec<P> {
    provider: P,
    pattern: Option<FormatPattern>,
    context_zone: Option<TimeZone>,
}

#[cfg(feature = "tzdb")]
impl Default for TemporalCodec<crate::tzdb::CompiledTzdbProvider> {
    fn default() -> Self {
        Self::new(crate::tzdb::CompiledTzdbProvider)
    }
}

impl<P: TimeZoneProvider> TemporalCodec<P> {
    /// Creates a codec resolving region zones through `provider`.
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self {
            provider,
            pattern: None,
            context_zone: None,
        }
    }

    /// Sets the pattern used for the text shape of calendar and clock kinds.
    #[must_use]
    pub fn with_pattern(mut self, pattern: FormatPattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Sets the zone that decoded values are reconciled against.
    #[must_use]
    pub fn with_context_zone(mut self, zone: TimeZone) -> Self {
        self.context_zone = Some(zone);
        self
    }

    #[inline]
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[inline]
    #[must_use]
    pub fn pattern(&self) -> Option<&FormatPattern> {
        self.pattern.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn context_zone(&self) -> Option<&TimeZone> {
        self.context_zone.as_ref()
    }

    fn has_pattern(&self, kind: TemporalKind) -> bool {
        self.pattern.is_some() && kind.accepts_pattern()
    }

    fn default_zone(&self) -> TimeZone {
        self.context_zone.clone().unwrap_or(TimeZone::UTC)
    }

    // ==== Serialization ====

    /// Encodes `value` in the shape selected by `config`.
    pub fn serialize(&self, value: &TemporalValue, config: &WriteConfig) -> TemporalJsonResult<Value> {
        let kind = value.kind();
        let shape = shape::select_output_shape(kind, config, self.pattern.is_some());
        self.serialize_shape(value, shape)
            .map_err(|e| e.or_kind(kind))
    }

    fn serialize_shape(&self, value: &TemporalValue, shape: OutputShape) -> TemporalJsonResult<Value> {
        match shape {
            OutputShape::PatternText => self.format_with_pattern(value).map(Value::String),
            OutputShape::IsoText { zone_id } => iso_text(value, zone_id).map(Value::String),
            OutputShape::DecimalEpoch => epoch_number(value, true),
            OutputShape::MillisEpoch => epoch_number(value, false),
            OutputShape::FieldArray { nanos } => fields::encode_fields(value, nanos).map(Value::Array),
            OutputShape::Integer => match value {
                TemporalValue::Year(year) => Ok(Value::from(year.value())),
                _ => Err(TemporalJsonError::structural()
                    .with_enum(ErrorMessage::UnexpectedToken)
                    .with_kind(value.kind())),
            },
        }
    }

    fn format_with_pattern(&self, value: &TemporalValue) -> TemporalJsonResult<String> {
        let Some(pattern) = &self.pattern else {
            return iso_text(value, false);
        };
        let fields = PatternFields::default();
        let fields = match value {
            TemporalValue::Instant(instant) => {
                let zone = self.default_zone();
                let offset = zone.offset_at(instant.epoch(), &self.provider)?;
                let local = IsoDateTime::from_epoch(instant.epoch(), offset.seconds())?;
                zoned_fields(local, offset, &zone)
            }
            TemporalValue::OffsetDateTime(value) => zoned_fields(
                value.to_iso_date_time()?,
                value.offset(),
                &TimeZone::Offset(value.offset()),
            ),
            TemporalValue::ZonedDateTime(value) => {
                zoned_fields(value.to_iso_date_time()?, value.offset(), value.zone())
            }
            TemporalValue::PlainDate(date) => fields.with_date(date.iso()),
            TemporalValue::PlainTime(time) => fields.with_time(time.iso()),
            TemporalValue::PlainDateTime(datetime) => {
                fields.with_date(datetime.iso().date).with_time(datetime.iso().time)
            }
            TemporalValue::Year(year) => PatternFields {
                year: Some(year.value()),
                ..fields
            },
            TemporalValue::YearMonth(year_month) => PatternFields {
                year: Some(year_month.year()),
                month: Some(year_month.month()),
                ..fields
            },
            TemporalValue::MonthDay(month_day) => PatternFields {
                month: Some(month_day.month()),
                day: Some(month_day.day()),
                ..fields
            },
            TemporalValue::Duration(_) | TemporalValue::Period(_) | TemporalValue::TimeZone(_) => {
                return iso_text(value, false);
            }
        };
        pattern.format(&fields)
    }

    /// Encodes `value` as a JSON object key.
    ///
    /// Keys always use a text form. `None` is written as the empty string.
    pub fn serialize_key(
        &self,
        value: Option<&TemporalValue>,
        config: &WriteConfig,
    ) -> TemporalJsonResult<String> {
        let Some(value) = value else {
            return Ok(String::new());
        };
        let kind = value.kind();
        if self.has_pattern(kind) {
            return self.format_with_pattern(value).map_err(|e| e.or_kind(kind));
        }
        let zone_id = kind == TemporalKind::ZonedDateTime && config.is_enabled(Feature::WriteZoneId);
        iso_text(value, zone_id).map_err(|e| e.or_kind(kind))
    }

    /// Encodes `value` inside a `["type name", value]` envelope.
    pub fn serialize_typed(&self, value: &TemporalValue, config: &WriteConfig) -> TemporalJsonResult<Value> {
        let inner = self.serialize(value, config)?;
        Ok(Value::Array(vec![
            Value::String(value.kind().type_name().into()),
            inner,
        ]))
    }

    // ==== Deserialization ====

    /// Decodes a value of `kind` from `json`.
    ///
    /// `Ok(None)` is returned for `null`, blank strings, and empty arrays
    /// accepted by `EmptyArrayAsNull`.
    pub fn deserialize(
        &self,
        kind: TemporalKind,
        json: &Value,
        config: &ReadConfig,
    ) -> TemporalJsonResult<Option<TemporalValue>> {
        let token = Token::of(json);
        let shape = shape::detect_input_shape(kind, config, token, self.has_pattern(kind))?;
        self.deserialize_shape(kind, json, shape, config)
            .map_err(|e| e.or_kind(kind))
    }

    fn deserialize_shape(
        &self,
        kind: TemporalKind,
        json: &Value,
        shape: InputShape,
        config: &ReadConfig,
    ) -> TemporalJsonResult<Option<TemporalValue>> {
        let context = ReconciliationContext::from_config(self.context_zone.as_ref(), config);
        let value = match shape {
            InputShape::Null => return Ok(None),
            InputShape::IsoText => self.parse_text(kind, json_text(json)?, &context)?,
            InputShape::PatternText => self.parse_with_pattern(kind, json_text(json)?, &context)?,
            InputShape::DecimalEpoch => {
                let epoch = decimal::decode_with_bounds(&numeric_text(json)?, bounds_of(kind))?;
                self.from_epoch(kind, epoch, &context)?
            }
            InputShape::IntegerEpoch { unit } => {
                let epoch = decimal::decode_integer(&numeric_text(json)?, unit, bounds_of(kind))?;
                self.from_epoch(kind, epoch, &context)?
            }
            InputShape::EpochDay => {
                PlainDate::from_epoch_days(decimal::parse_i64(&numeric_text(json)?)?)?.into()
            }
            InputShape::Integer => Year::try_from_i64(decimal::parse_i64(&numeric_text(json)?)?)?.into(),
            InputShape::FieldArray => {
                let items = json_items(json)?;
                if let [inner @ Value::String(_)] = items {
                    if config.is_enabled(Feature::UnwrapSingleElementArray) {
                        return self.deserialize(kind, inner, config);
                    }
                }
                match fields::decode_fields(kind, items, config)? {
                    DecodedFields::Value(value) => value,
                    DecodedFields::Local { datetime, zone } => {
                        self.from_local(kind, datetime, zone.as_deref(), None, &context)?
                    }
                }
            }
            InputShape::UnwrapSingle => {
                let inner = match json_items(json)? {
                    [Value::Array(_)] => {
                        return Err(TemporalJsonError::structural()
                            .with_enum(ErrorMessage::NestedArray)
                            .with_kind(kind)
                            .with_feature(Feature::UnwrapSingleElementArray));
                    }
                    [inner] => inner,
                    items => {
                        return Err(TemporalJsonError::structural()
                            .with_message("Expected a single element array to unwrap.")
                            .with_kind(kind)
                            .with_feature(Feature::UnwrapSingleElementArray)
                            .with_input(format!("{} elements", items.len())));
                    }
                };
                #[cfg(feature = "log")]
                log::trace!("unwrapping single element array for {kind:?}");
                return self.deserialize(kind, inner, config);
            }
        };
        Ok(Some(value))
    }

    fn from_epoch(
        &self,
        kind: TemporalKind,
        epoch: SecondsNanos,
        context: &ReconciliationContext,
    ) -> TemporalJsonResult<TemporalValue> {
        if kind == TemporalKind::Duration {
            return Ok(Duration::from(epoch).into());
        }
        reconcile::reconcile(kind, epoch, None, context, &self.provider)
    }

    /// Resolves wall-clock fields of an instant-like kind.
    ///
    /// `zone_text` is the zone written with the fields, if any; otherwise the
    /// fields are read in the default zone.
    fn from_local(
        &self,
        kind: TemporalKind,
        local: IsoDateTime,
        zone_text: Option<&str>,
        offset: Option<UtcOffset>,
        context: &ReconciliationContext,
    ) -> TemporalJsonResult<TemporalValue> {
        let embedded = match (zone_text, offset) {
            (Some(text), _) => Some(TimeZone::try_from_str_with_provider(text, &self.provider)?),
            (None, Some(offset)) => Some(TimeZone::Offset(offset)),
            (None, None) => None,
        };
        let zone = embedded.clone().unwrap_or_else(|| context.default_zone());
        let (epoch, _) = zone.resolve_local(local, offset, &self.provider)?;
        reconcile::reconcile(kind, epoch, embedded.as_ref(), context, &self.provider)
    }

    fn parse_text(
        &self,
        kind: TemporalKind,
        text: &str,
        context: &ReconciliationContext,
    ) -> TemporalJsonResult<TemporalValue> {
        let text = text.trim();
        let value = match kind {
            TemporalKind::Instant => Instant::from_str(text)?.into(),
            TemporalKind::OffsetDateTime => {
                let parsed = OffsetDateTime::from_ixdtf_str(text)?;
                let embedded = TimeZone::Offset(parsed.offset());
                reconcile::reconcile(kind, parsed.epoch(), Some(&embedded), context, &self.provider)?
            }
            TemporalKind::ZonedDateTime => {
                let parsed = ZonedDateTime::from_ixdtf_str_with_provider(text, &self.provider)?;
                reconcile::reconcile(kind, parsed.epoch(), Some(parsed.zone()), context, &self.provider)?
            }
            TemporalKind::PlainDate => PlainDate::from_str(text)?.into(),
            TemporalKind::PlainTime => PlainTime::from_str(text)?.into(),
            TemporalKind::PlainDateTime => PlainDateTime::from_str(text)?.into(),
            TemporalKind::Year => Year::from_str(text)?.into(),
            TemporalKind::YearMonth => PlainYearMonth::from_str(text)?.into(),
            TemporalKind::MonthDay => PlainMonthDay::from_str(text)?.into(),
            TemporalKind::Duration => Duration::from_str(text)?.into(),
            TemporalKind::Period => Period::from_str(text)?.into(),
            TemporalKind::TimeZone => TimeZone::try_from_str_with_provider(text, &self.provider)?.into(),
        };
        Ok(value)
    }

    fn parse_with_pattern(
        &self,
        kind: TemporalKind,
        text: &str,
        context: &ReconciliationContext,
    ) -> TemporalJsonResult<TemporalValue> {
        let Some(pattern) = &self.pattern else {
            return self.parse_text(kind, text, context);
        };
        let fields = pattern.parse(text.trim())?;
        let missing = || {
            TemporalJsonError::parse()
                .with_message("Pattern does not provide every field of this kind.")
                .with_kind(kind)
                .with_input(text)
        };
        let value = match kind {
            TemporalKind::PlainDate => PlainDate::from(fields.date()?.ok_or_else(missing)?).into(),
            TemporalKind::PlainTime => PlainTime::from(fields.time()?.ok_or_else(missing)?).into(),
            TemporalKind::PlainDateTime => {
                let date = fields.date()?.ok_or_else(missing)?;
                let time = fields.time()?.ok_or_else(missing)?;
                PlainDateTime::from(IsoDateTime::new(date, time)).into()
            }
            TemporalKind::Year => Year::new(fields.year.ok_or_else(missing)?)?.into(),
            TemporalKind::YearMonth => {
                PlainYearMonth::new(fields.year.ok_or_else(missing)?, fields.month.ok_or_else(missing)?)?
                    .into()
            }
            TemporalKind::MonthDay => {
                PlainMonthDay::new(fields.month.ok_or_else(missing)?, fields.day.ok_or_else(missing)?)?
                    .into()
            }
            TemporalKind::Instant | TemporalKind::OffsetDateTime | TemporalKind::ZonedDateTime => {
                let date = fields.date()?.ok_or_else(missing)?;
                let time = fields.time()?.ok_or_else(missing)?;
                self.from_local(
                    kind,
                    IsoDateTime::new(date, time),
                    fields.zone.as_deref(),
                    fields.offset,
                    context,
                )?
            }
            TemporalKind::Duration | TemporalKind::Period | TemporalKind::TimeZone => {
                return self.parse_text(kind, text, context);
            }
        };
        Ok(value)
    }

    /// Decodes a value of `kind` from a JSON object key.
    ///
    /// The empty key decodes to `None`.
    pub fn deserialize_key(
        &self,
        kind: TemporalKind,
        key: &str,
        config: &ReadConfig,
    ) -> TemporalJsonResult<Option<TemporalValue>> {
        if key.trim().is_empty() {
            return Ok(None);
        }
        let context = ReconciliationContext::from_config(self.context_zone.as_ref(), config);
        let value = if self.has_pattern(kind) {
            self.parse_with_pattern(kind, key, &context)
        } else {
            self.parse_text(kind, key, &context)
        };
        value.map(Some).map_err(|e| e.or_kind(kind))
    }

    /// Decodes a value of `kind` from a `["type name", value]` envelope.
    pub fn deserialize_typed(
        &self,
        kind: TemporalKind,
        json: &Value,
        config: &ReadConfig,
    ) -> TemporalJsonResult<Option<TemporalValue>> {
        let (name, inner) = match json {
            Value::Null => return Ok(None),
            Value::Array(items) => match items.as_slice() {
                [Value::String(name), inner] => (name, inner),
                _ => {
                    return Err(TemporalJsonError::structural()
                        .with_message("Type envelope must be a two element array.")
                        .with_kind(kind));
                }
            },
            _ => {
                return Err(TemporalJsonError::structural()
                    .with_enum(ErrorMessage::UnexpectedToken)
                    .with_kind(kind));
            }
        };
        if name != kind.type_name() {
            return Err(TemporalJsonError::structural()
                .with_enum(ErrorMessage::TypeIdMismatch)
                .with_kind(kind)
                .with_input(name.as_str()));
        }
        self.deserialize(kind, inner, config)
    }

    /// Parses JSON text and decodes a value of `kind` from it.
    pub fn deserialize_str(
        &self,
        kind: TemporalKind,
        json: &str,
        config: &ReadConfig,
    ) -> TemporalJsonResult<Option<TemporalValue>> {
        let json: Value = serde_json::from_str(json).map_err(|err| {
            TemporalJsonError::parse()
                .with_message(format!("Input is not valid JSON: {err}"))
                .with_kind(kind)
        })?;
        self.deserialize(kind, &json, config)
    }
}

// ==== Shape helpers ====

fn zoned_fields(local: IsoDateTime, offset: UtcOffset, zone: &TimeZone) -> PatternFields {
    let mut fields = PatternFields::default().with_date(local.date).with_time(local.time);
    fields.offset = Some(offset);
    fields.zone = zone.identifier().map(str::to_owned);
    fields
}

fn iso_text(value: &TemporalValue, zone_id: bool) -> TemporalJsonResult<String> {
    let text = match value {
        TemporalValue::Instant(instant) => instant.to_ixdtf_string()?,
        TemporalValue::OffsetDateTime(value) => value.to_ixdtf_string()?,
        TemporalValue::ZonedDateTime(value) => value.to_ixdtf_string(zone_id)?,
        TemporalValue::PlainDate(date) => date.to_string(),
        TemporalValue::PlainTime(time) => time.to_string(),
        TemporalValue::PlainDateTime(datetime) => datetime.to_string(),
        TemporalValue::Year(year) => year.to_string(),
        TemporalValue::YearMonth(year_month) => year_month.to_string(),
        TemporalValue::MonthDay(month_day) => month_day.to_string(),
        TemporalValue::Duration(duration) => duration.to_string(),
        TemporalValue::Period(period) => period.to_string(),
        TemporalValue::TimeZone(zone) => zone.to_string(),
    };
    Ok(text)
}

fn epoch_of(value: &TemporalValue) -> Option<SecondsNanos> {
    match value {
        TemporalValue::Instant(instant) => Some(instant.epoch()),
        TemporalValue::OffsetDateTime(value) => Some(value.epoch()),
        TemporalValue::ZonedDateTime(value) => Some(value.epoch()),
        TemporalValue::Duration(duration) => Some(duration.as_seconds_nanos()),
        _ => None,
    }
}

fn epoch_number(value: &TemporalValue, use_nanos: bool) -> TemporalJsonResult<Value> {
    let epoch = epoch_of(value).ok_or_else(|| {
        TemporalJsonError::structural()
            .with_message("Kind has no epoch value.")
            .with_kind(value.kind())
    })?;
    let text = decimal::encode(epoch, use_nanos)?;
    let number = Number::from_str(&text).map_err(|_| {
        TemporalJsonError::malformed_number()
            .with_enum(ErrorMessage::NotANumber)
            .with_input(text.as_str())
    })?;
    Ok(Value::Number(number))
}

fn bounds_of(kind: TemporalKind) -> EpochBounds {
    EpochBounds::for_kind(kind).unwrap_or(EpochBounds::INSTANT)
}

fn json_text(json: &Value) -> TemporalJsonResult<&str> {
    json.as_str().ok_or_else(|| {
        TemporalJsonError::structural()
            .with_enum(ErrorMessage::UnexpectedToken)
            .with_input(json.to_string())
    })
}

fn json_items(json: &Value) -> TemporalJsonResult<&[Value]> {
    match json {
        Value::Array(items) => Ok(items),
        _ => Err(TemporalJsonError::structural()
            .with_enum(ErrorMessage::UnexpectedToken)
            .with_input(json.to_string())),
    }
}

/// Returns the literal text of a number or numeric string.
fn numeric_text(json: &Value) -> TemporalJsonResult<String> {
    match json {
        Value::Number(number) => Ok(number.to_string()),
        Value::String(text) => Ok(text.trim().to_owned()),
        _ => Err(TemporalJsonError::malformed_number()
            .with_enum(ErrorMessage::NotANumber)
            .with_input(json.to_string())),
    }
}
