//! Caller supplied format patterns.
//!
//! A pattern is a sequence of field letters and literals:
//!
//! | Letter | Field | Widths |
//! |---|---|---|
//! | `y`, `u` | year (`yy` is a two-digit year in 2000..=2099) | 1..=10 |
//! | `M` | month | 1..=2 |
//! | `d` | day of month | 1..=2 |
//! | `H` | hour of day | 1..=2 |
//! | `m` | minute | 1..=2 |
//! | `s` | second | 1..=2 |
//! | `S` | fraction of second, truncated to the width | 1..=9 |
//! | `n` | nanosecond of second | 1..=9 |
//! | `X` | offset, `Z` for zero | 1..=3 |
//! | `x` | offset | 1..=3 |
//! | `Z` | offset as `+HHMM`, or `+HH:MM`/`Z` with width 5 | 1..=3, 5 |
//! | `V` | zone id (`VV` only) | 2 |
//!
//! Text inside `'...'` is literal, `''` is a single quote, and any other
//! non-letter is literal.

use core::fmt::{self, Write};

use crate::{
    components::UtcOffset,
    error::ParseCause,
    iso::{IsoDate, IsoTime},
    parsers::write_padded_u8,
    TemporalJsonError, TemporalJsonResult,
};

/// The result of a parse step: a value and the remaining input.
#[derive(Debug)]
struct Parsed<'i, V> {
    value: V,
    input: &'i [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Fraction,
    NanoOfSecond,
    Offset(OffsetStyle),
    ZoneId,
}

impl Field {
    const fn is_numeric(self) -> bool {
        !matches!(self, Self::Offset(_) | Self::ZoneId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OffsetStyle {
    /// `+HH:MM` rather than `+HHMM`.
    colon: bool,
    /// Minutes may be omitted when zero.
    optional_minutes: bool,
    /// The zero offset is written as `Z`.
    zulu: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Literal(String),
    Field {
        field: Field,
        width: u8,
        /// Byte offset of the field letter in the pattern.
        position: usize,
    },
}

/// Date, time and zone fields read from or written with a `FormatPattern`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PatternFields {
    pub year: Option<i32>,
    pub month: Option<u8>,
    pub day: Option<u8>,
    pub hour: Option<u8>,
    pub minute: Option<u8>,
    pub second: Option<u8>,
    pub nanosecond: Option<u32>,
    pub offset: Option<UtcOffset>,
    pub zone: Option<String>,
}

impl PatternFields {
    /// Sets the date fields.
    #[must_use]
    pub fn with_date(mut self, date: IsoDate) -> Self {
        self.year = Some(date.year);
        self.month = Some(date.month);
        self.day = Some(date.day);
        self
    }

    /// Sets the time fields.
    #[must_use]
    pub fn with_time(mut self, time: IsoTime) -> Self {
        self.hour = Some(time.hour);
        self.minute = Some(time.minute);
        self.second = Some(time.second);
        self.nanosecond = Some(time.nanosecond);
        self
    }

    /// Returns the date, if the year, month and day were all read.
    pub fn date(&self) -> TemporalJsonResult<Option<IsoDate>> {
        match (self.year, self.month, self.day) {
            (Some(year), Some(month), Some(day)) => IsoDate::new(year, month, day).map(Some),
            _ => Ok(None),
        }
    }

    /// Returns the time, if at least the hour was read. Missing minutes,
    /// seconds and nanoseconds are zero.
    pub fn time(&self) -> TemporalJsonResult<Option<IsoTime>> {
        let Some(hour) = self.hour else {
            return Ok(None);
        };
        IsoTime::new(
            hour,
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
            self.nanosecond.unwrap_or(0),
        )
        .map(Some)
    }
}

/// A compiled format pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatPattern {
    source: String,
    items: Vec<Item>,
}

impl FormatPattern {
    /// Compiles a pattern such as `yyyy-MM-dd HH:mm`.
    pub fn new(pattern: &str) -> TemporalJsonResult<Self> {
        let items = compile(pattern)?;
        Ok(Self {
            source: pattern.to_owned(),
            items,
        })
    }

    /// Returns the pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns whether the pattern reads or writes an offset or zone.
    #[must_use]
    pub fn has_zone_field(&self) -> bool {
        self.items.iter().any(|item| {
            matches!(
                item,
                Item::Field {
                    field: Field::Offset(_) | Field::ZoneId,
                    ..
                }
            )
        })
    }

    /// Renders `fields` with this pattern. Every field the pattern names
    /// must be present.
    pub fn format(&self, fields: &PatternFields) -> TemporalJsonResult<String> {
        let mut out = String::new();
        for item in &self.items {
            match item {
                Item::Literal(text) => out.push_str(text),
                Item::Field {
                    field,
                    width,
                    position,
                } => write_field(&mut out, *field, *width, fields)
                    .map_err(|_| self.missing_field(*position))?,
            }
        }
        Ok(out)
    }

    /// Reads `text` with this pattern. The whole text must be consumed.
    pub fn parse(&self, text: &str) -> TemporalJsonResult<PatternFields> {
        let mut fields = PatternFields::default();
        let mut input = text.as_bytes();
        for (index, item) in self.items.iter().enumerate() {
            let consumed = text.len() - input.len();
            let mismatch = || {
                TemporalJsonError::parse()
                    .with_message(format!("Text does not match the pattern `{}`.", self.source))
                    .with_input(text)
                    .with_cause(ParseCause::Pattern { position: consumed })
            };
            input = match item {
                Item::Literal(literal) => input
                    .strip_prefix(literal.as_bytes())
                    .ok_or_else(mismatch)?,
                Item::Field { field, width, .. } => {
                    let adjacent = matches!(
                        self.items.get(index + 1),
                        Some(Item::Field { field, .. }) if field.is_numeric()
                    );
                    parse_field(input, *field, *width, adjacent, &mut fields).ok_or_else(mismatch)?
                }
            };
        }
        if !input.is_empty() {
            return Err(TemporalJsonError::parse()
                .with_message("Trailing text after the pattern.")
                .with_input(text)
                .with_cause(ParseCause::Pattern {
                    position: text.len() - input.len(),
                }));
        }
        Ok(fields)
    }

    fn missing_field(&self, position: usize) -> TemporalJsonError {
        TemporalJsonError::parse()
            .with_message(format!(
                "Value has no field for pattern letter at byte {position} of `{}`.",
                self.source
            ))
            .with_cause(ParseCause::Pattern { position })
    }
}

impl fmt::Display for FormatPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// ==== Compilation ====

fn compile(pattern: &str) -> TemporalJsonResult<Vec<Item>> {
    let invalid = |position: usize, msg: &'static str| {
        TemporalJsonError::parse()
            .with_message(msg)
            .with_input(pattern)
            .with_cause(ParseCause::Pattern { position })
    };

    let mut items = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.char_indices().peekable();
    while let Some((position, ch)) = chars.next() {
        if ch == '\'' {
            if chars.next_if(|&(_, c)| c == '\'').is_some() {
                literal.push('\'');
                continue;
            }
            loop {
                match chars.next() {
                    Some((_, '\'')) if chars.next_if(|&(_, c)| c == '\'').is_some() => {
                        literal.push('\'');
                    }
                    Some((_, '\'')) => break,
                    Some((_, c)) => literal.push(c),
                    None => return Err(invalid(position, "Unterminated quoted literal in pattern.")),
                }
            }
            continue;
        }
        if !ch.is_ascii_alphabetic() {
            literal.push(ch);
            continue;
        }

        let mut count = 1usize;
        while chars.next_if(|&(_, c)| c == ch).is_some() {
            count += 1;
        }
        let field = match (ch, count) {
            ('y' | 'u', 1..=10) => Field::Year,
            ('M', 1..=2) => Field::Month,
            ('d', 1..=2) => Field::Day,
            ('H', 1..=2) => Field::Hour,
            ('m', 1..=2) => Field::Minute,
            ('s', 1..=2) => Field::Second,
            ('S', 1..=9) => Field::Fraction,
            ('n', 1..=9) => Field::NanoOfSecond,
            ('X' | 'x', 1..=3) => Field::Offset(OffsetStyle {
                colon: count == 3,
                optional_minutes: count == 1,
                zulu: ch == 'X',
            }),
            ('Z', 1..=3) => Field::Offset(OffsetStyle {
                colon: false,
                optional_minutes: false,
                zulu: false,
            }),
            ('Z', 5) => Field::Offset(OffsetStyle {
                colon: true,
                optional_minutes: false,
                zulu: true,
            }),
            ('V', 2) => Field::ZoneId,
            ('y' | 'u' | 'M' | 'd' | 'H' | 'm' | 's' | 'S' | 'n' | 'X' | 'x' | 'Z' | 'V', _) => {
                return Err(invalid(position, "Unsupported width for pattern letter."));
            }
            _ => return Err(invalid(position, "Unknown pattern letter.")),
        };
        if !literal.is_empty() {
            items.push(Item::Literal(core::mem::take(&mut literal)));
        }
        items.push(Item::Field {
            field,
            width: count as u8,
            position,
        });
    }
    if !literal.is_empty() {
        items.push(Item::Literal(literal));
    }
    Ok(items)
}

// ==== Formatting ====

fn write_field(out: &mut String, field: Field, width: u8, fields: &PatternFields) -> fmt::Result {
    let width = usize::from(width);
    match field {
        Field::Year => {
            let year = fields.year.ok_or(fmt::Error)?;
            if width == 2 {
                return write_padded_u8(year.rem_euclid(100) as u8, out);
            }
            if year < 0 {
                out.push('-');
            }
            write!(out, "{:0width$}", year.unsigned_abs())
        }
        Field::Month => write_number(out, fields.month, width),
        Field::Day => write_number(out, fields.day, width),
        Field::Hour => write_number(out, fields.hour, width),
        Field::Minute => write_number(out, fields.minute, width),
        Field::Second => write_number(out, fields.second, width),
        Field::Fraction => {
            let nanos = fields.nanosecond.ok_or(fmt::Error)?;
            let digits = format!("{nanos:09}");
            out.push_str(&digits[..width]);
            Ok(())
        }
        Field::NanoOfSecond => write!(out, "{:0width$}", fields.nanosecond.ok_or(fmt::Error)?),
        Field::Offset(style) => write_offset(out, fields.offset.ok_or(fmt::Error)?, style),
        Field::ZoneId => {
            // A fixed-offset value has no region id; its offset stands in.
            match (&fields.zone, fields.offset) {
                (Some(zone), _) => out.push_str(zone),
                (None, Some(offset)) => {
                    let style = OffsetStyle {
                        colon: true,
                        optional_minutes: false,
                        zulu: true,
                    };
                    write_offset(out, offset, style)?;
                }
                (None, None) => return Err(fmt::Error),
            }
            Ok(())
        }
    }
}

fn write_number(out: &mut String, value: Option<u8>, width: usize) -> fmt::Result {
    write!(out, "{:0width$}", value.ok_or(fmt::Error)?)
}

fn write_offset(out: &mut String, offset: UtcOffset, style: OffsetStyle) -> fmt::Result {
    let seconds = offset.seconds();
    if seconds == 0 && style.zulu {
        out.push('Z');
        return Ok(());
    }
    let magnitude = seconds.unsigned_abs();
    let (hour, minute) = ((magnitude / 3_600) as u8, (magnitude / 60 % 60) as u8);
    out.push(if seconds < 0 { '-' } else { '+' });
    write_padded_u8(hour, out)?;
    if style.optional_minutes && minute == 0 {
        return Ok(());
    }
    if style.colon {
        out.push(':');
    }
    write_padded_u8(minute, out)
}

// ==== Parsing ====

/// Splits off up to `max` leading ASCII digits, requiring at least `min`.
fn split_digits(input: &[u8], min: usize, max: usize) -> Option<(&[u8], &[u8])> {
    let len = input
        .iter()
        .take(max)
        .take_while(|b| b.is_ascii_digit())
        .count();
    (len >= min).then(|| input.split_at(len))
}

fn digits_to_u64(digits: &[u8]) -> Option<u64> {
    digits.iter().try_fold(0u64, |acc, b| {
        acc.checked_mul(10)?.checked_add(u64::from(b - b'0'))
    })
}

fn parse_number(input: &[u8], min: usize, max: usize) -> Option<Parsed<'_, u64>> {
    let (digits, input) = split_digits(input, min, max)?;
    Some(Parsed {
        value: digits_to_u64(digits)?,
        input,
    })
}

fn parse_year(input: &[u8], width: usize, adjacent: bool) -> Option<Parsed<'_, i32>> {
    if width == 2 {
        let parsed = parse_number(input, 2, 2)?;
        return Some(Parsed {
            value: 2000 + parsed.value as i32,
            input: parsed.input,
        });
    }
    let (negative, input) = match input.first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };
    let max = if adjacent { width } else { 10 };
    let parsed = parse_number(input, width.min(max), max)?;
    let magnitude = i32::try_from(parsed.value).ok()?;
    Some(Parsed {
        value: if negative { -magnitude } else { magnitude },
        input: parsed.input,
    })
}

fn parse_two_digit_field(input: &[u8], width: usize) -> Option<Parsed<'_, u8>> {
    let parsed = parse_number(input, width, 2)?;
    Some(Parsed {
        value: u8::try_from(parsed.value).ok()?,
        input: parsed.input,
    })
}

fn parse_offset(input: &[u8], style: OffsetStyle) -> Option<Parsed<'_, UtcOffset>> {
    if style.zulu {
        if let Some(rest) = input.strip_prefix(b"Z") {
            return Some(Parsed {
                value: UtcOffset::UTC,
                input: rest,
            });
        }
    }
    let negative = match input.first()? {
        b'+' => false,
        b'-' => true,
        _ => return None,
    };
    let Parsed { value: hour, input } = parse_number(&input[1..], 2, 2)?;
    let after_colon = if style.colon {
        input.strip_prefix(b":")
    } else {
        Some(input)
    };
    let (minute, input) = match after_colon.and_then(|rest| parse_number(rest, 2, 2)) {
        Some(Parsed { value, input }) => (value, input),
        None if style.optional_minutes => (0, input),
        None => return None,
    };
    let value = UtcOffset::from_hms(negative, hour as u8, minute as u8, 0).ok()?;
    Some(Parsed { value, input })
}

fn parse_zone_id(input: &[u8]) -> Option<Parsed<'_, String>> {
    let len = input
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'/' | b'+' | b'-' | b':' | b'.'))
        .count();
    if len == 0 {
        return None;
    }
    let (id, input) = input.split_at(len);
    Some(Parsed {
        value: core::str::from_utf8(id).ok()?.to_owned(),
        input,
    })
}

fn parse_field<'i>(
    input: &'i [u8],
    field: Field,
    width: u8,
    adjacent: bool,
    fields: &mut PatternFields,
) -> Option<&'i [u8]> {
    let width = usize::from(width);
    let rest = match field {
        Field::Year => {
            let parsed = parse_year(input, width, adjacent)?;
            fields.year = Some(parsed.value);
            parsed.input
        }
        Field::Month | Field::Day | Field::Hour | Field::Minute | Field::Second => {
            let parsed = parse_two_digit_field(input, width)?;
            let slot = match field {
                Field::Month => &mut fields.month,
                Field::Day => &mut fields.day,
                Field::Hour => &mut fields.hour,
                Field::Minute => &mut fields.minute,
                _ => &mut fields.second,
            };
            *slot = Some(parsed.value);
            parsed.input
        }
        Field::Fraction => {
            let parsed = parse_number(input, width, width)?;
            fields.nanosecond = Some(parsed.value as u32 * 10u32.pow(9 - width as u32));
            parsed.input
        }
        Field::NanoOfSecond => {
            let parsed = parse_number(input, 1, 9)?;
            fields.nanosecond = Some(parsed.value as u32);
            parsed.input
        }
        Field::Offset(style) => {
            let parsed = parse_offset(input, style)?;
            fields.offset = Some(parsed.value);
            parsed.input
        }
        Field::ZoneId => {
            let parsed = parse_zone_id(input)?;
            fields.zone = Some(parsed.value);
            parsed.input
        }
    };
    Some(rest)
}

#[cfg(test)]
mod tests {
    use super::{FormatPattern, PatternFields};
    use crate::{
        components::UtcOffset,
        error::{ErrorKind, ParseCause},
        iso::{IsoDate, IsoTime},
    };

    fn fields(date: (i32, u8, u8), time: (u8, u8, u8, u32)) -> PatternFields {
        PatternFields::default()
            .with_date(IsoDate::new(date.0, date.1, date.2).unwrap())
            .with_time(IsoTime::new(time.0, time.1, time.2, time.3).unwrap())
    }

    #[test]
    fn formats_date_time_fields() {
        let value = fields((2013, 8, 21), (9, 22, 57, 123_456_789));
        let pattern = FormatPattern::new("yyyy/MM/dd HH:mm:ss.SSS").unwrap();
        assert_eq!(pattern.format(&value).unwrap(), "2013/08/21 09:22:57.123");

        let pattern = FormatPattern::new("d.M.yy 'at' H'h'").unwrap();
        assert_eq!(pattern.format(&value).unwrap(), "21.8.13 at 9h");

        let pattern = FormatPattern::new("HH:mm:ss.n").unwrap();
        assert_eq!(pattern.format(&value).unwrap(), "09:22:57.123456789");

        let pattern = FormatPattern::new("'It''s' yyyy").unwrap();
        assert_eq!(pattern.format(&value).unwrap(), "It's 2013");
    }

    #[test]
    fn formats_offsets_and_zones() {
        let mut value = fields((2013, 8, 21), (9, 22, 0, 0));
        value.offset = Some(UtcOffset::from_seconds(-(5 * 3_600 + 30 * 60)).unwrap());
        let pattern = FormatPattern::new("HH:mm X|XX|XXX|x|Z|ZZZZZ").unwrap();
        assert_eq!(
            pattern.format(&value).unwrap(),
            "09:22 -0530|-0530|-05:30|-0530|-0530|-05:30"
        );

        value.offset = Some(UtcOffset::UTC);
        value.zone = Some("Europe/Paris".into());
        let pattern = FormatPattern::new("X|x|Z|ZZZZZ|VV").unwrap();
        assert_eq!(pattern.format(&value).unwrap(), "Z|+00|+0000|Z|Europe/Paris");
    }

    #[test]
    fn missing_fields_are_reported() {
        let value = PatternFields::default().with_date(IsoDate::new(2013, 8, 21).unwrap());
        let pattern = FormatPattern::new("yyyy-MM-dd HH").unwrap();
        let err = pattern.format(&value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
        assert!(matches!(err.cause(), Some(ParseCause::Pattern { position: 11 })));
    }

    #[test]
    fn parses_text() {
        let pattern = FormatPattern::new("yyyy/MM/dd HH:mm:ss.SSS").unwrap();
        let parsed = pattern.parse("2013/08/21 09:22:57.123").unwrap();
        assert_eq!(parsed.date().unwrap(), Some(IsoDate::new(2013, 8, 21).unwrap()));
        assert_eq!(
            parsed.time().unwrap(),
            Some(IsoTime::new(9, 22, 57, 123_000_000).unwrap())
        );

        let pattern = FormatPattern::new("yyyyMMddHHmm").unwrap();
        let parsed = pattern.parse("201308210922").unwrap();
        assert_eq!(parsed.year, Some(2013));
        assert_eq!(parsed.minute, Some(22));

        let pattern = FormatPattern::new("yyyy-MM-dd'T'HH:mmXXX'['VV']'").unwrap();
        let parsed = pattern.parse("2013-08-21T09:22+02:00[Europe/Berlin]").unwrap();
        assert_eq!(parsed.offset, Some(UtcOffset::from_seconds(7_200).unwrap()));
        assert_eq!(parsed.zone.as_deref(), Some("Europe/Berlin"));
    }

    #[test]
    fn parse_failures_carry_position() {
        let pattern = FormatPattern::new("yyyy-MM-dd").unwrap();
        let err = pattern.parse("2013/08/21").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
        assert!(matches!(err.cause(), Some(ParseCause::Pattern { position: 4 })));

        let err = pattern.parse("2013-08-21x").unwrap_err();
        assert!(matches!(err.cause(), Some(ParseCause::Pattern { position: 10 })));
    }

    #[test]
    fn rejects_bad_patterns() {
        assert!(FormatPattern::new("MMM").is_err());
        assert!(FormatPattern::new("yyyy-QQ").is_err());
        assert!(FormatPattern::new("'open").is_err());
        assert_eq!(FormatPattern::new("yyyy").unwrap().to_string(), "yyyy");
    }
}
