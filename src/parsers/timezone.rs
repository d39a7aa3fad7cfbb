use core::{iter::Peekable, str::Chars};

use crate::{components::UtcOffset, error::ErrorMessage, TemporalJsonError, TemporalJsonResult};

/// A zone as written in text, before any provider lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ZoneText<'a> {
    Offset(UtcOffset),
    Name(&'a str),
}

/// Parses `Z`, `±HH[:MM[:SS]]`, `±HHMM[SS]` or a region identifier.
#[inline]
pub(crate) fn parse_zone_text(source: &str) -> TemporalJsonResult<ZoneText<'_>> {
    if source == "Z" || source == "z" {
        return Ok(ZoneText::Offset(UtcOffset::UTC));
    }
    let mut cursor = source.chars().peekable();
    if cursor.peek().is_some_and(is_ascii_sign) {
        let offset = parse_offset(&mut cursor).map_err(|e| e.with_input(source))?;
        if cursor.peek().is_some() {
            return Err(invalid_zone(source));
        }
        return Ok(ZoneText::Offset(offset));
    } else if parse_iana_component(&mut cursor) {
        return Ok(ZoneText::Name(source));
    }
    Err(invalid_zone(source))
}

#[inline]
pub(crate) fn parse_offset(chars: &mut Peekable<Chars<'_>>) -> TemporalJsonResult<UtcOffset> {
    let negative = chars.next().is_some_and(|c| c == '-');
    let hour = parse_digit_pair(chars)?;

    let sep = chars.peek().is_some_and(|ch| *ch == ':');
    if sep {
        let _ = chars.next();
    }

    let minute = match chars.peek().map(char::is_ascii_digit) {
        Some(true) => parse_digit_pair(chars)?,
        Some(false) => return Err(non_ascii_digit()),
        None => 0,
    };

    // Seconds keep the separator style of the minutes.
    let second = match chars.peek().copied() {
        Some(':') if sep => {
            let _ = chars.next();
            parse_digit_pair(chars)?
        }
        Some(ch) if !sep && ch.is_ascii_digit() => parse_digit_pair(chars)?,
        _ => 0,
    };

    UtcOffset::from_hms(negative, hour, minute, second)
}

fn parse_digit_pair(chars: &mut Peekable<Chars<'_>>) -> TemporalJsonResult<u8> {
    let tens = chars.next().ok_or_else(abrupt_end)?;
    let ones = chars.next().ok_or_else(abrupt_end)?;
    match (tens.to_digit(10), ones.to_digit(10)) {
        (Some(tens), Some(ones)) => Ok((tens * 10 + ones) as u8),
        _ => Err(non_ascii_digit()),
    }
}

fn parse_iana_component(chars: &mut Peekable<Chars<'_>>) -> bool {
    // Confirm leading Tz char
    if !chars.peek().is_some_and(is_tz_leading_char) {
        return false;
    }
    chars.next();

    while chars.peek().is_some_and(is_tz_char) {
        chars.next();
    }

    if chars.peek().is_some_and(is_slash) {
        chars.next();
        return parse_iana_component(chars);
    }

    // Confirm full source text has been parsed.
    chars.peek().is_none()
}

fn invalid_zone(source: &str) -> TemporalJsonError {
    TemporalJsonError::parse()
        .with_enum(ErrorMessage::UnknownTimeZone)
        .with_input(source)
}

fn abrupt_end() -> TemporalJsonError {
    TemporalJsonError::parse().with_message("Abrupt end while parsing offset string")
}

fn non_ascii_digit() -> TemporalJsonError {
    TemporalJsonError::parse().with_message("Non ascii digit found while parsing offset string")
}

fn is_ascii_sign(ch: &char) -> bool {
    *ch == '+' || *ch == '-'
}

fn is_slash(ch: &char) -> bool {
    *ch == '/'
}

fn is_tz_leading_char(ch: &char) -> bool {
    ch.is_ascii_alphabetic() || *ch == '.' || *ch == '_'
}

fn is_tz_char(ch: &char) -> bool {
    is_tz_leading_char(ch) || ch.is_ascii_digit() || *ch == '+' || *ch == '-'
}
