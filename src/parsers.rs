//! This module implements ISO-8601 text parsing and formatting.
//!
//! Parsing goes through `ixdtf`, then each kind validates the records it
//! needs. Formatting is done with `Writeable` builders so that text can be
//! written into any sink without intermediate allocation.

use core::fmt;

use ixdtf::{
    parsers::IxdtfParser,
    records::{DateRecord, TimeRecord, UtcOffsetRecord, UtcOffsetRecordOrZ},
    ParseError,
};
use writeable::{impl_display_with_writeable, LengthHint, Writeable};

use crate::{
    components::UtcOffset,
    epoch::{SecondsNanos, NANOS_PER_SECOND},
    error::{ErrorMessage, ParseCause},
    iso::{IsoDate, IsoDateTime, IsoTime},
    TemporalJsonError, TemporalJsonResult,
};

mod duration;
mod timezone;

pub(crate) use duration::{parse_duration, parse_period, FormattableDuration, FormattablePeriod};
pub(crate) use timezone::{parse_zone_text, ZoneText};

fn ixdtf_error(err: ParseError, source: &str) -> TemporalJsonError {
    TemporalJsonError::parse()
        .with_message("Text is not valid ISO-8601.")
        .with_input(source)
        .with_cause(ParseCause::Ixdtf(err))
}

// ==== Parsed records ====

/// An owned, validated view of an `ixdtf` parse record.
#[derive(Debug, Clone, Default)]
pub(crate) struct ParsedRecord {
    pub(crate) date: Option<IsoDate>,
    pub(crate) time: Option<IsoTime>,
    /// `Some(UtcOffset::UTC)` for both `Z` and `+00:00`.
    pub(crate) offset: Option<UtcOffset>,
    /// The content of the zone annotation, without brackets or critical flag.
    pub(crate) zone: Option<String>,
}

/// The reference year of month-day values.
pub(crate) const LEAP_YEAR: i32 = 1972;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ParseVariant {
    DateTime,
    YearMonth,
    MonthDay,
    Time,
}

fn date_from_record(record: DateRecord) -> TemporalJsonResult<IsoDate> {
    IsoDate::new(record.year, record.month, record.day)
}

fn time_from_record(record: TimeRecord) -> TemporalJsonResult<IsoTime> {
    let nanosecond = match record.fraction {
        Some(fraction) => fraction.to_nanoseconds().ok_or_else(|| {
            TemporalJsonError::parse().with_message("Fractional seconds exceed nanosecond precision.")
        })?,
        None => 0,
    };
    // A leap second is read as the last second of the minute.
    IsoTime::new(record.hour, record.minute, record.second.min(59), nanosecond)
}

fn offset_from_record(record: UtcOffsetRecordOrZ) -> TemporalJsonResult<UtcOffset> {
    match record {
        UtcOffsetRecordOrZ::Z => Ok(UtcOffset::UTC),
        UtcOffsetRecordOrZ::Offset(offset) => offset_from_utc_record(&offset),
    }
}

fn offset_from_utc_record(record: &UtcOffsetRecord) -> TemporalJsonResult<UtcOffset> {
    UtcOffset::from_hms(
        (record.sign() as i8) < 0,
        record.hour(),
        record.minute(),
        record.second().unwrap_or(0),
    )
}

/// Returns the text of the first zone annotation in `source`.
///
/// Key-value annotations such as `[u-ca=iso8601]` are skipped.
fn zone_annotation(source: &str) -> Option<String> {
    let mut rest = source;
    while let Some(start) = rest.find('[') {
        let end = rest[start..].find(']')? + start;
        let content = &rest[start + 1..end];
        if !content.contains('=') {
            return Some(content.trim_start_matches('!').to_owned());
        }
        rest = &rest[end + 1..];
    }
    None
}

fn parse_record(source: &str, variant: ParseVariant) -> TemporalJsonResult<ParsedRecord> {
    let mut parser = IxdtfParser::from_str(source);
    let record = match variant {
        ParseVariant::DateTime => parser.parse(),
        ParseVariant::YearMonth => parser.parse_year_month(),
        ParseVariant::MonthDay => parser.parse_month_day(),
        ParseVariant::Time => parser.parse_time(),
    }
    .map_err(|e| ixdtf_error(e, source))?;

    let date = match (record.date, variant) {
        // Month-days are validated against a leap year so that `--02-29` is accepted.
        (Some(date), ParseVariant::MonthDay) => Some(IsoDate::new(LEAP_YEAR, date.month, date.day)?),
        (date, _) => date.map(date_from_record).transpose()?,
    };
    let time = record.time.map(time_from_record).transpose()?;
    let offset = record.offset.map(offset_from_record).transpose()?;
    let zone = record.tz.and_then(|_| zone_annotation(source));

    Ok(ParsedRecord {
        date,
        time,
        offset,
        zone,
    })
}

fn missing(part: &'static str, source: &str) -> TemporalJsonError {
    TemporalJsonError::parse()
        .with_message(part)
        .with_input(source)
}

/// Parses an instant. The text must carry a date, a time and an offset.
pub(crate) fn parse_instant(source: &str) -> TemporalJsonResult<SecondsNanos> {
    let record = parse_record(source, ParseVariant::DateTime)?;
    let (Some(date), Some(time)) = (record.date, record.time) else {
        return Err(missing("An instant requires a date and a time.", source));
    };
    let offset = record
        .offset
        .ok_or_else(|| missing("An instant requires an offset or `Z`.", source))?;
    Ok(IsoDateTime::new(date, time).to_epoch(offset.seconds()))
}

/// Parses a date-time with an optional offset and zone annotation.
pub(crate) fn parse_zoned_date_time(source: &str) -> TemporalJsonResult<ParsedRecord> {
    let record = parse_record(source, ParseVariant::DateTime)?;
    if record.time.is_none() {
        return Err(missing("A date-time requires a time.", source));
    }
    Ok(record)
}

/// Parses a date. A date-time is accepted and its time is dropped.
pub(crate) fn parse_date(source: &str) -> TemporalJsonResult<IsoDate> {
    parse_record(source, ParseVariant::DateTime)?
        .date
        .ok_or_else(|| missing("Text does not contain a date.", source))
}

/// Parses a time. A date-time is accepted and its date is dropped.
pub(crate) fn parse_time(source: &str) -> TemporalJsonResult<IsoTime> {
    let record = match parse_record(source, ParseVariant::Time) {
        Ok(record) => record,
        Err(err) => parse_record(source, ParseVariant::DateTime).map_err(|_| err)?,
    };
    record
        .time
        .ok_or_else(|| missing("Text does not contain a time.", source))
}

/// Parses a date-time without a zone.
pub(crate) fn parse_date_time(source: &str) -> TemporalJsonResult<IsoDateTime> {
    let record = parse_zoned_date_time(source)?;
    match (record.date, record.time) {
        (Some(date), Some(time)) => Ok(IsoDateTime::new(date, time)),
        _ => Err(missing("Text does not contain a date-time.", source)),
    }
}

/// Parses a year and month. A full date is accepted and its day is dropped.
pub(crate) fn parse_year_month(source: &str) -> TemporalJsonResult<(i32, u8)> {
    let record = match parse_record(source, ParseVariant::YearMonth) {
        Ok(record) => record,
        Err(err) => parse_record(source, ParseVariant::DateTime).map_err(|_| err)?,
    };
    let date = record
        .date
        .ok_or_else(|| missing("Text does not contain a year and month.", source))?;
    Ok((date.year, date.month))
}

/// Parses a month and day, as `--MM-DD`, `MM-DD` or a full date.
pub(crate) fn parse_month_day(source: &str) -> TemporalJsonResult<(u8, u8)> {
    let record = match parse_record(source, ParseVariant::MonthDay) {
        Ok(record) => record,
        Err(err) => parse_record(source, ParseVariant::DateTime).map_err(|_| err)?,
    };
    let date = record
        .date
        .ok_or_else(|| missing("Text does not contain a month and day.", source))?;
    Ok((date.month, date.day))
}

/// Parses a year as an optionally signed integer.
pub(crate) fn parse_year(source: &str) -> TemporalJsonResult<i32> {
    let digits = source
        .strip_prefix(['+', '-'])
        .unwrap_or(source);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TemporalJsonError::parse()
            .with_message("A year must be an integer.")
            .with_input(source));
    }
    let year = source
        .trim_start_matches('+')
        .parse::<i32>()
        .map_err(|_| TemporalJsonError::overflow().with_enum(ErrorMessage::InvalidDate).with_input(source))?;
    IsoDate::new(year, 1, 1).map(|_| year)
}

// ==== Formatting ====

/// A wall-clock time written as `HH:MM:SS`, followed by the fraction of a
/// second trimmed of trailing zeros when it is not zero.
#[derive(Debug, Clone, Copy)]
pub struct FormattableTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanosecond: u32,
}

impl From<IsoTime> for FormattableTime {
    fn from(time: IsoTime) -> Self {
        Self {
            hour: time.hour,
            minute: time.minute,
            second: time.second,
            nanosecond: time.nanosecond,
        }
    }
}

impl Writeable for FormattableTime {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        write_padded_u8(self.hour, sink)?;
        sink.write_char(':')?;
        write_padded_u8(self.minute, sink)?;
        sink.write_char(':')?;
        write_padded_u8(self.second, sink)?;
        if self.nanosecond == 0 {
            return Ok(());
        }
        sink.write_char('.')?;
        write_trimmed_fraction(self.nanosecond, sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        if self.nanosecond == 0 {
            return LengthHint::exact(8);
        }
        LengthHint::between(10, 18)
    }
}

/// A date written as `YYYY-MM-DD`, with extended years for years outside
/// of `0..=9999`.
#[derive(Debug, Clone, Copy)]
pub struct FormattableDate(pub i32, pub u8, pub u8);

impl From<IsoDate> for FormattableDate {
    fn from(date: IsoDate) -> Self {
        Self(date.year, date.month, date.day)
    }
}

impl Writeable for FormattableDate {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        write_year(self.0, sink)?;
        sink.write_char('-')?;
        write_padded_u8(self.1, sink)?;
        sink.write_char('-')?;
        write_padded_u8(self.2, sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        year_length_hint(self.0) + 6
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FormattableYearMonth(pub i32, pub u8);

impl Writeable for FormattableYearMonth {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        write_year(self.0, sink)?;
        sink.write_char('-')?;
        write_padded_u8(self.1, sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        year_length_hint(self.0) + 3
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FormattableMonthDay(pub u8, pub u8);

impl Writeable for FormattableMonthDay {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        sink.write_str("--")?;
        write_padded_u8(self.0, sink)?;
        sink.write_char('-')?;
        write_padded_u8(self.1, sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::exact(7)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FormattableUtcOffset {
    Z,
    Offset(FormattableOffset),
}

impl FormattableUtcOffset {
    pub(crate) fn from_seconds(seconds: i32) -> Self {
        if seconds == 0 {
            return Self::Z;
        }
        let magnitude = seconds.unsigned_abs();
        Self::Offset(FormattableOffset {
            negative: seconds < 0,
            hour: (magnitude / 3_600) as u8,
            minute: (magnitude / 60 % 60) as u8,
            second: (magnitude % 60) as u8,
        })
    }
}

impl Writeable for FormattableUtcOffset {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        match self {
            Self::Z => sink.write_char('Z'),
            Self::Offset(offset) => offset.write_to(sink),
        }
    }

    fn writeable_length_hint(&self) -> LengthHint {
        match self {
            Self::Z => LengthHint::exact(1),
            Self::Offset(o) => o.writeable_length_hint(),
        }
    }
}

/// `±HH:MM`, with `:SS` appended only when the seconds are non-zero.
#[derive(Debug, Clone, Copy)]
pub struct FormattableOffset {
    pub negative: bool,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Writeable for FormattableOffset {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        sink.write_char(if self.negative { '-' } else { '+' })?;
        write_padded_u8(self.hour, sink)?;
        sink.write_char(':')?;
        write_padded_u8(self.minute, sink)?;
        if self.second != 0 {
            sink.write_char(':')?;
            write_padded_u8(self.second, sink)?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::exact(if self.second == 0 { 6 } else { 9 })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FormattableTimeZone<'a>(pub &'a str);

impl Writeable for FormattableTimeZone<'_> {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        sink.write_char('[')?;
        sink.write_str(self.0)?;
        sink.write_char(']')
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::exact(2 + self.0.len())
    }
}

/// A full ISO-8601 date-time with optional offset and zone annotation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormattableIxdtf<'a> {
    pub date: Option<FormattableDate>,
    pub time: Option<FormattableTime>,
    pub utc_offset: Option<FormattableUtcOffset>,
    pub timezone: Option<FormattableTimeZone<'a>>,
}

impl Writeable for FormattableIxdtf<'_> {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        if let Some(date) = &self.date {
            date.write_to(sink)?;
        }
        if let Some(time) = &self.time {
            if self.date.is_some() {
                sink.write_char('T')?;
            }
            time.write_to(sink)?;
        }
        if let Some(offset) = &self.utc_offset {
            offset.write_to(sink)?;
        }
        if let Some(timezone) = &self.timezone {
            timezone.write_to(sink)?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        let date_length = self
            .date
            .map(|d| d.writeable_length_hint())
            .unwrap_or(LengthHint::exact(0));
        let time_length = self
            .time
            .map(|t| t.writeable_length_hint() + usize::from(self.date.is_some()))
            .unwrap_or(LengthHint::exact(0));
        let utc_length = self
            .utc_offset
            .map(|utc| utc.writeable_length_hint())
            .unwrap_or(LengthHint::exact(0));
        let timezone_length = self
            .timezone
            .map(|tz| tz.writeable_length_hint())
            .unwrap_or(LengthHint::exact(0));

        date_length + time_length + utc_length + timezone_length
    }
}

impl_display_with_writeable!(FormattableIxdtf<'_>);
impl_display_with_writeable!(FormattableDate);
impl_display_with_writeable!(FormattableTime);
impl_display_with_writeable!(FormattableYearMonth);
impl_display_with_writeable!(FormattableMonthDay);
impl_display_with_writeable!(FormattableUtcOffset);
impl_display_with_writeable!(FormattableOffset);
impl_display_with_writeable!(FormattableTimeZone<'_>);

// ==== Formatting helpers ====

pub(crate) fn write_padded_u8<W: fmt::Write + ?Sized>(num: u8, sink: &mut W) -> fmt::Result {
    if num < 10 {
        sink.write_char('0')?;
    }
    num.write_to(sink)
}

/// Splits a nanosecond value into its nine digits and returns the index
/// after the last non-zero digit.
pub(crate) fn u32_to_digits(mut value: u32) -> ([u8; 9], usize) {
    let mut output = [0; 9];
    let mut precision = 0;
    let mut i = 9;
    while i != 0 {
        let v = (value % 10) as u8;
        value /= 10;
        if precision == 0 && v != 0 {
            precision = i;
        }
        output[i - 1] = v;
        i -= 1;
    }

    (output, precision)
}

pub(crate) fn write_digit_slice_to_precision<W: fmt::Write + ?Sized>(
    digits: [u8; 9],
    base: usize,
    precision: usize,
    sink: &mut W,
) -> fmt::Result {
    for digit in digits.iter().take(precision).skip(base) {
        digit.write_to(sink)?;
    }
    Ok(())
}

/// Writes the fraction of a second, trimmed of trailing zeros.
pub(crate) fn write_trimmed_fraction<W: fmt::Write + ?Sized>(
    nanoseconds: u32,
    sink: &mut W,
) -> fmt::Result {
    debug_assert!(nanoseconds < NANOS_PER_SECOND);
    let (digits, index) = u32_to_digits(nanoseconds);
    write_digit_slice_to_precision(digits, 0, index, sink)
}

fn year_length_hint(year: i32) -> LengthHint {
    if (0..=9999).contains(&year) {
        LengthHint::exact(4)
    } else {
        LengthHint::between(7, 11)
    }
}

fn write_year<W: fmt::Write + ?Sized>(year: i32, sink: &mut W) -> fmt::Result {
    if (0..=9999).contains(&year) {
        write_four_digit_year(year, sink)
    } else {
        write_extended_year(year, sink)
    }
}

fn write_four_digit_year<W: fmt::Write + ?Sized>(mut y: i32, sink: &mut W) -> fmt::Result {
    (y / 1_000).write_to(sink)?;
    y %= 1_000;
    (y / 100).write_to(sink)?;
    y %= 100;
    (y / 10).write_to(sink)?;
    y %= 10;
    y.write_to(sink)
}

/// Writes a signed year of at least six digits.
fn write_extended_year<W: fmt::Write + ?Sized>(y: i32, sink: &mut W) -> fmt::Result {
    sink.write_char(if y < 0 { '-' } else { '+' })?;
    let magnitude = y.unsigned_abs();
    if magnitude >= 1_000_000 {
        return magnitude.write_to(sink);
    }
    let (digits, _) = u32_to_digits(magnitude);
    write_digit_slice_to_precision(digits, 3, 9, sink)
}
