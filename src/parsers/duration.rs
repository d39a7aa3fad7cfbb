//! ISO-8601 durations and periods.
//!
//! Text without per-field signs goes through `ixdtf`. Text such as
//! `P-1Y2M` or `PT-0.5S`, where individual fields carry their own sign, is
//! read by a small fallback scanner.

use core::fmt;

use ixdtf::{
    parsers::IsoDurationParser,
    records::{Fraction, TimeDurationRecord},
};
use writeable::{impl_display_with_writeable, LengthHint, Writeable};

use crate::{
    epoch::{SecondsNanos, NANOS_PER_SECOND},
    error::ErrorMessage,
    TemporalJsonError, TemporalJsonResult,
};

use super::{ixdtf_error, write_trimmed_fraction};

const NANOS_PER_MINUTE: i128 = 60 * NANOS_PER_SECOND as i128;
const NANOS_PER_HOUR: i128 = 60 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: i128 = 24 * NANOS_PER_HOUR;

/// One field of a duration string, with its sign applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SignedField {
    value: i128,
    /// Nanoseconds of one unit, with the same sign as `value`.
    fraction: i128,
    unit: Unit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

fn fraction_nanos(fraction: Option<Fraction>, source: &str) -> TemporalJsonResult<i128> {
    match fraction {
        Some(fraction) => fraction.to_nanoseconds().map(i128::from).ok_or_else(|| {
            TemporalJsonError::parse()
                .with_message("Fractional part exceeds nanosecond precision.")
                .with_input(source)
        }),
        None => Ok(0),
    }
}

/// Reads a duration string into signed fields.
fn parse_fields(source: &str) -> TemporalJsonResult<Vec<SignedField>> {
    let record = match IsoDurationParser::from_str(source).parse() {
        Ok(record) => record,
        Err(err) => return scan_signed_fields(source).ok_or_else(|| ixdtf_error(err, source)),
    };
    let sign = i128::from(record.sign as i8);
    let mut fields = Vec::new();
    let mut push = |value: i128, fraction: i128, unit: Unit| {
        if value != 0 || fraction != 0 {
            fields.push(SignedField {
                value: value * sign,
                fraction: fraction * sign,
                unit,
            });
        }
    };

    if let Some(date) = record.date {
        push(i128::from(date.years), 0, Unit::Years);
        push(i128::from(date.months), 0, Unit::Months);
        push(i128::from(date.weeks), 0, Unit::Weeks);
        push(i128::from(date.days), 0, Unit::Days);
    }
    match record.time {
        Some(TimeDurationRecord::Hours { hours, fraction }) => {
            push(i128::from(hours), fraction_nanos(fraction, source)?, Unit::Hours);
        }
        Some(TimeDurationRecord::Minutes {
            hours,
            minutes,
            fraction,
        }) => {
            push(i128::from(hours), 0, Unit::Hours);
            push(i128::from(minutes), fraction_nanos(fraction, source)?, Unit::Minutes);
        }
        Some(TimeDurationRecord::Seconds {
            hours,
            minutes,
            seconds,
            fraction,
        }) => {
            push(i128::from(hours), 0, Unit::Hours);
            push(i128::from(minutes), 0, Unit::Minutes);
            push(i128::from(seconds), fraction_nanos(fraction, source)?, Unit::Seconds);
        }
        None => {}
    }
    Ok(fields)
}

/// Scans `[+-]P[n[.f]Y..D][T n[.f]H..S]` where each field may carry a sign.
fn scan_signed_fields(source: &str) -> Option<Vec<SignedField>> {
    let bytes = source.as_bytes();
    let mut cursor = 0;
    let outer_sign: i128 = match bytes.first()? {
        b'-' => {
            cursor += 1;
            -1
        }
        b'+' => {
            cursor += 1;
            1
        }
        _ => 1,
    };
    if !bytes.get(cursor)?.eq_ignore_ascii_case(&b'P') {
        return None;
    }
    cursor += 1;

    let mut fields = Vec::new();
    let mut in_time = false;
    let mut last_unit: Option<Unit> = None;
    let mut fractional = false;
    while cursor < bytes.len() {
        if bytes[cursor].eq_ignore_ascii_case(&b'T') {
            if in_time {
                return None;
            }
            in_time = true;
            cursor += 1;
            continue;
        }
        // A fractional field is the last field.
        if fractional {
            return None;
        }
        let field_sign: i128 = match bytes[cursor] {
            b'-' => {
                cursor += 1;
                -1
            }
            b'+' => {
                cursor += 1;
                1
            }
            _ => 1,
        };
        let start = cursor;
        while bytes.get(cursor).is_some_and(u8::is_ascii_digit) {
            cursor += 1;
        }
        let whole: i128 = source.get(start..cursor)?.parse().ok()?;
        let mut fraction = 0;
        if matches!(bytes.get(cursor), Some(b'.' | b',')) {
            cursor += 1;
            let frac_start = cursor;
            while bytes.get(cursor).is_some_and(u8::is_ascii_digit) {
                cursor += 1;
            }
            let digits = source.get(frac_start..cursor)?;
            if digits.is_empty() || digits.len() > 9 {
                return None;
            }
            fraction = digits.parse::<i128>().ok()? * 10i128.pow(9 - digits.len() as u32);
            fractional = true;
        }
        let unit = match (in_time, bytes.get(cursor)?.to_ascii_uppercase()) {
            (false, b'Y') => Unit::Years,
            (false, b'M') => Unit::Months,
            (false, b'W') => Unit::Weeks,
            (false, b'D') => Unit::Days,
            (true, b'H') => Unit::Hours,
            (true, b'M') => Unit::Minutes,
            (true, b'S') => Unit::Seconds,
            _ => return None,
        };
        cursor += 1;
        // Units must be strictly descending, and only time fields may be fractional.
        if last_unit.is_some_and(|last| last as u8 >= unit as u8) || (fractional && !in_time) {
            return None;
        }
        last_unit = Some(unit);
        let sign = outer_sign * field_sign;
        fields.push(SignedField {
            value: whole * sign,
            fraction: fraction * sign,
            unit,
        });
    }

    // A `T` designator needs at least one time field after it.
    match last_unit {
        Some(unit) if !in_time || unit as u8 >= Unit::Hours as u8 => Some(fields),
        _ => None,
    }
}

/// Parses a duration into exact seconds and nanoseconds. Days are 24 hours;
/// years, months and weeks are rejected.
pub(crate) fn parse_duration(source: &str) -> TemporalJsonResult<SecondsNanos> {
    let mut total: i128 = 0;
    for field in parse_fields(source)? {
        let unit_nanos = match field.unit {
            Unit::Days => NANOS_PER_DAY,
            Unit::Hours => NANOS_PER_HOUR,
            Unit::Minutes => NANOS_PER_MINUTE,
            Unit::Seconds => i128::from(NANOS_PER_SECOND),
            Unit::Years | Unit::Months | Unit::Weeks => {
                return Err(TemporalJsonError::parse()
                    .with_message("A duration cannot carry years, months or weeks.")
                    .with_input(source));
            }
        };
        // `fraction` is in nanoseconds of a second-sized unit.
        let fraction = field.fraction * unit_nanos / i128::from(NANOS_PER_SECOND);
        total = field
            .value
            .checked_mul(unit_nanos)
            .and_then(|v| v.checked_add(fraction))
            .and_then(|v| total.checked_add(v))
            .ok_or_else(|| overflow(source))?;
    }
    SecondsNanos::from_total_nanoseconds(total).map_err(|e| e.with_input(source))
}

/// Parses a period into years, months and days. Weeks are read as seven days.
pub(crate) fn parse_period(source: &str) -> TemporalJsonResult<(i32, i32, i32)> {
    let (mut years, mut months, mut days) = (0i128, 0i128, 0i128);
    for field in parse_fields(source)? {
        let (total, value) = match field.unit {
            Unit::Years => (&mut years, Some(field.value)),
            Unit::Months => (&mut months, Some(field.value)),
            Unit::Weeks => (&mut days, field.value.checked_mul(7)),
            Unit::Days => (&mut days, Some(field.value)),
            Unit::Hours | Unit::Minutes | Unit::Seconds => {
                return Err(TemporalJsonError::parse()
                    .with_message("A period cannot carry a time part.")
                    .with_input(source));
            }
        };
        *total = value
            .and_then(|v| total.checked_add(v))
            .ok_or_else(|| overflow(source))?;
    }
    let narrow = |v: i128| i32::try_from(v).map_err(|_| overflow(source));
    Ok((narrow(years)?, narrow(months)?, narrow(days)?))
}

fn overflow(source: &str) -> TemporalJsonError {
    TemporalJsonError::overflow()
        .with_enum(ErrorMessage::SecondsOutOfRange)
        .with_input(source)
}

// ==== Formatting ====

/// `PT{h}H{m}M{s}.{f}S` with days folded into hours, a leading `-` for
/// negative values and `PT0S` for zero.
#[derive(Debug, Clone, Copy)]
pub struct FormattableDuration {
    pub negative: bool,
    pub hours: u128,
    pub minutes: u8,
    pub seconds: u8,
    pub nanoseconds: u32,
}

impl From<SecondsNanos> for FormattableDuration {
    fn from(value: SecondsNanos) -> Self {
        let total = value.as_total_nanoseconds();
        let magnitude = total.unsigned_abs();
        let seconds = magnitude / u128::from(NANOS_PER_SECOND);
        Self {
            negative: total < 0,
            hours: seconds / 3_600,
            minutes: (seconds / 60 % 60) as u8,
            seconds: (seconds % 60) as u8,
            nanoseconds: (magnitude % u128::from(NANOS_PER_SECOND)) as u32,
        }
    }
}

impl Writeable for FormattableDuration {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        if self.negative {
            sink.write_char('-')?;
        }
        sink.write_str("PT")?;
        if self.hours != 0 {
            self.hours.write_to(sink)?;
            sink.write_char('H')?;
        }
        if self.minutes != 0 {
            self.minutes.write_to(sink)?;
            sink.write_char('M')?;
        }
        let is_zero = self.hours == 0 && self.minutes == 0;
        if self.seconds != 0 || self.nanoseconds != 0 || is_zero {
            self.seconds.write_to(sink)?;
            if self.nanoseconds != 0 {
                sink.write_char('.')?;
                write_trimmed_fraction(self.nanoseconds, sink)?;
            }
            sink.write_char('S')?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::between(4, 48)
    }
}

/// `P{y}Y{m}M{d}D`, `P0D` for zero.
///
/// When every field is non-positive the sign is written once in front;
/// otherwise each negative field carries its own sign.
#[derive(Debug, Clone, Copy)]
pub struct FormattablePeriod {
    pub years: i32,
    pub months: i32,
    pub days: i32,
}

impl Writeable for FormattablePeriod {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        let fields = [(self.years, 'Y'), (self.months, 'M'), (self.days, 'D')];
        if fields.iter().all(|(v, _)| *v == 0) {
            return sink.write_str("P0D");
        }
        let all_negative = fields.iter().all(|(v, _)| *v <= 0);
        if all_negative {
            sink.write_char('-')?;
        }
        sink.write_char('P')?;
        for (value, suffix) in fields {
            if value == 0 {
                continue;
            }
            if all_negative {
                value.unsigned_abs().write_to(sink)?;
            } else {
                value.write_to(sink)?;
            }
            sink.write_char(suffix)?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::between(3, 40)
    }
}

impl_display_with_writeable!(FormattableDuration);
impl_display_with_writeable!(FormattablePeriod);

#[cfg(test)]
mod tests {
    use super::{parse_duration, parse_period, FormattableDuration, FormattablePeriod};
    use crate::{epoch::SecondsNanos, error::ErrorKind};
    use writeable::assert_writeable_eq;

    fn duration(seconds: i64, nanos: i64) -> SecondsNanos {
        SecondsNanos::from_signed_parts(seconds, nanos).unwrap()
    }

    #[test]
    fn duration_text() {
        assert_writeable_eq!(FormattableDuration::from(duration(817, 120_000_000)), "PT13M37.12S");
        assert_writeable_eq!(FormattableDuration::from(SecondsNanos::ZERO), "PT0S");
        assert_writeable_eq!(FormattableDuration::from(duration(90_061, 0)), "PT25H1M1S");
        assert_writeable_eq!(FormattableDuration::from(duration(0, -500_000_000)), "-PT0.5S");
        assert_writeable_eq!(FormattableDuration::from(duration(3_600, 0)), "PT1H");
    }

    #[test]
    fn parses_durations() {
        assert_eq!(parse_duration("PT13M37.12S").unwrap(), duration(817, 120_000_000));
        assert_eq!(parse_duration("PT0S").unwrap(), SecondsNanos::ZERO);
        assert_eq!(parse_duration("-PT0.5S").unwrap(), duration(0, -500_000_000));
        assert_eq!(parse_duration("P1DT1H").unwrap(), duration(90_000, 0));
        assert_eq!(parse_duration("PT1.5H").unwrap(), duration(5_400, 0));
        assert_eq!(parse_duration("PT-0.5S").unwrap(), duration(0, -500_000_000));
        assert_eq!(parse_duration("PT1H-30M").unwrap(), duration(1_800, 0));

        let err = parse_duration("P1Y").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
        assert_eq!(parse_duration("13 minutes").unwrap_err().kind(), ErrorKind::ParseFailure);
        assert!(parse_duration("P").is_err());
    }

    #[test]
    fn fractions_end_the_duration() {
        assert!(parse_duration("PT1.5H30M").is_err());
        assert!(parse_duration("PT1.5H-30M").is_err());
        assert!(parse_duration("PT-0.5M1S").is_err());
        assert_eq!(parse_duration("PT1H-0.5M").unwrap(), duration(3_570, 0));
    }

    #[test]
    fn time_designator_needs_a_field() {
        assert!(parse_duration("P1DT").is_err());
        assert!(parse_duration("P-1DT").is_err());
        assert!(parse_duration("PT").is_err());
        assert!(parse_period("P-1DT").is_err());
    }

    #[test]
    fn duration_text_round_trips() {
        for value in [
            duration(0, 1),
            duration(-1, 0),
            duration(-86_401, -999_999_999),
            duration(1_000_000_000_000, 5),
        ] {
            let text = FormattableDuration::from(value).to_string();
            assert_eq!(parse_duration(&text).unwrap(), value, "{text}");
        }
    }

    #[test]
    fn period_text() {
        let period = |years, months, days| FormattablePeriod { years, months, days };
        assert_writeable_eq!(period(3, 1, 4), "P3Y1M4D");
        assert_writeable_eq!(period(0, 0, 0), "P0D");
        assert_writeable_eq!(period(-1, 0, -2), "-P1Y2D");
        assert_writeable_eq!(period(-1, 2, 0), "P-1Y2M");
    }

    #[test]
    fn parses_periods() {
        assert_eq!(parse_period("P3Y1M4D").unwrap(), (3, 1, 4));
        assert_eq!(parse_period("P0D").unwrap(), (0, 0, 0));
        assert_eq!(parse_period("-P1Y2D").unwrap(), (-1, 0, -2));
        assert_eq!(parse_period("P-1Y2M").unwrap(), (-1, 2, 0));
        assert_eq!(parse_period("P2W").unwrap(), (0, 0, 14));
        assert_eq!(parse_period("PT1H").unwrap_err().kind(), ErrorKind::ParseFailure);
        assert_eq!(parse_period("P9999999999Y").unwrap_err().kind(), ErrorKind::Overflow);
    }

    #[test]
    fn period_fields_overflow_without_wrapping() {
        let weeks = "P48611766702991209066196372490252601637W";
        assert_eq!(parse_period(weeks).unwrap_err().kind(), ErrorKind::Overflow);
        let days = "P1W170141183460469231731687303715884105727D";
        assert_eq!(parse_period(days).unwrap_err().kind(), ErrorKind::Overflow);
        let negative = "P-24305883351495604533098186245126300818W-3D";
        assert_eq!(parse_period(negative).unwrap_err().kind(), ErrorKind::Overflow);
    }
}
