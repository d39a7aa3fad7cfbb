//! Conversions between `SecondsNanos` and decimal epoch text.
//!
//! The decimal form is `-?\d+\.\d{9}`, with `0.0` as the canonical zero.
//! Decoding accepts any JSON number literal, including exponents, and never
//! expands a literal into an arbitrary precision value: the work done is
//! bounded by the length of the literal, not by the magnitude of its
//! exponent.

use crate::{
    epoch::{EpochBounds, SecondsNanos, NANOS_PER_SECOND},
    error::ErrorMessage,
    TemporalJsonError, TemporalJsonResult,
};

/// Exponents at or above this leave at least 64 trailing zeros in the
/// integer part. Such a value is a multiple of `2^64`, so its 64-bit
/// seconds are exactly zero.
const ZERO_EXPONENT_THRESHOLD: i64 = 64;

/// Exponent magnitudes are saturated here while scanning.
const EXPONENT_SATURATION: i64 = 1 << 40;

/// The unit of an integer epoch literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpochUnit {
    Seconds,
    Milliseconds,
}

/// Renders `value` as epoch text.
///
/// With `use_nanos` the output is `{seconds}.{nanos:09}` (`0.0` for the
/// epoch itself); otherwise it is the integer count of epoch milliseconds,
/// failing with `Overflow` when that count does not fit in an `i64`.
pub fn encode(value: SecondsNanos, use_nanos: bool) -> TemporalJsonResult<String> {
    if !use_nanos {
        return value.to_epoch_millis().map(|millis| millis.to_string());
    }
    if value == SecondsNanos::ZERO {
        return Ok(String::from("0.0"));
    }
    if value.is_negative() && value.nanos() != 0 {
        // The text is the exact value, so -0.5s is `-0.500000000` and not
        // `-1.500000000`.
        let magnitude = value.as_total_nanoseconds().unsigned_abs();
        let whole = magnitude / u128::from(NANOS_PER_SECOND);
        let fraction = magnitude % u128::from(NANOS_PER_SECOND);
        return Ok(format!("-{whole}.{fraction:09}"));
    }
    Ok(format!("{}.{:09}", value.seconds(), value.nanos()))
}

/// Decodes decimal epoch text, validated against the instant range.
pub fn decode(text: &str) -> TemporalJsonResult<SecondsNanos> {
    decode_with_bounds(text, EpochBounds::INSTANT)
}

/// Decodes decimal epoch text, validated against `bounds`.
///
/// Sub-nanosecond digits are truncated. A literal whose magnitude is below
/// one nanosecond, or whose exponent is at least 64, decodes to zero.
pub fn decode_with_bounds(text: &str, bounds: EpochBounds) -> TemporalJsonResult<SecondsNanos> {
    let literal = DecimalLiteral::scan(text)?;
    let Some(parts) = literal.split(text)? else {
        return Ok(SecondsNanos::ZERO);
    };

    let nanos = parts.fraction_nanos(false);
    let (seconds, nanos) = if literal.negative {
        (-(parts.whole as i128), -(nanos as i64))
    } else {
        (parts.whole as i128, nanos as i64)
    };
    let seconds = i64::try_from(seconds).map_err(|_| {
        TemporalJsonError::overflow()
            .with_enum(ErrorMessage::SecondsOutOfRange)
            .with_input(text)
    })?;
    bounds
        .check(seconds, nanos)
        .map_err(|e| e.with_input(text))
}

/// Decodes an integer epoch literal in the given unit, validated against `bounds`.
pub fn decode_integer(text: &str, unit: EpochUnit, bounds: EpochBounds) -> TemporalJsonResult<SecondsNanos> {
    let value = parse_i64(text)?;
    let value = match unit {
        EpochUnit::Seconds => SecondsNanos::new_unchecked(value, 0),
        EpochUnit::Milliseconds => SecondsNanos::from_epoch_millis(value),
    };
    bounds.check_value(value).map_err(|e| e.with_input(text))
}

/// Returns `round((value - whole_seconds) * 1e9)` for the decimal literal
/// `text`, computed on its digits.
///
/// The result keeps the sign of the difference and rounds half away from zero.
pub fn extract_nanos(text: &str, whole_seconds: i64) -> TemporalJsonResult<i64> {
    let literal = DecimalLiteral::scan(text)?;
    let (whole, fraction) = match literal.split(text)? {
        Some(parts) => (parts.whole as i128, i128::from(parts.fraction_nanos(true))),
        None => (0, 0),
    };
    let signed = if literal.negative {
        -(whole * i128::from(NANOS_PER_SECOND) + fraction)
    } else {
        whole * i128::from(NANOS_PER_SECOND) + fraction
    };
    let result = signed - i128::from(whole_seconds) * i128::from(NANOS_PER_SECOND);
    i64::try_from(result).map_err(|_| {
        TemporalJsonError::overflow()
            .with_message("Fractional difference does not fit in 64-bit nanoseconds.")
            .with_input(text)
    })
}

/// Parses a plain integer literal. Non-digits and values wider than an
/// `i64` are `MalformedNumber`.
pub(crate) fn parse_i64(text: &str) -> TemporalJsonResult<i64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TemporalJsonError::malformed_number()
            .with_enum(ErrorMessage::NotANumber)
            .with_input(text));
    }
    text.parse::<i64>().map_err(|_| {
        TemporalJsonError::malformed_number()
            .with_enum(ErrorMessage::SecondsOutOfRange)
            .with_input(text)
    })
}

/// The lexical parts of a JSON number literal.
#[derive(Debug, Clone, Copy)]
struct DecimalLiteral {
    negative: bool,
    int_range: (usize, usize),
    frac_range: (usize, usize),
    exponent: i64,
}

/// The magnitude of a literal split at the decimal point.
#[derive(Debug)]
struct DecimalParts {
    /// Truncated integer magnitude, at most `2^63`.
    whole: u128,
    /// Significant digit values with no leading or trailing zeros.
    digits: Vec<u8>,
    /// Index into `digits` where the fraction starts; negative when the
    /// fraction has leading zeros.
    point: i64,
}

impl DecimalLiteral {
    fn scan(text: &str) -> TemporalJsonResult<Self> {
        let bytes = text.as_bytes();
        let malformed = || {
            TemporalJsonError::malformed_number()
                .with_enum(ErrorMessage::NotANumber)
                .with_input(text)
        };

        let mut cursor = 0;
        let negative = bytes.first() == Some(&b'-');
        if negative {
            cursor += 1;
        }

        let int_start = cursor;
        while bytes.get(cursor).is_some_and(u8::is_ascii_digit) {
            cursor += 1;
        }
        let int_range = (int_start, cursor);
        if int_range.0 == int_range.1 {
            return Err(malformed());
        }

        let mut frac_range = (cursor, cursor);
        if bytes.get(cursor) == Some(&b'.') {
            cursor += 1;
            let frac_start = cursor;
            while bytes.get(cursor).is_some_and(u8::is_ascii_digit) {
                cursor += 1;
            }
            if frac_start == cursor {
                return Err(malformed());
            }
            frac_range = (frac_start, cursor);
        }

        let mut exponent = 0i64;
        if matches!(bytes.get(cursor), Some(b'e' | b'E')) {
            cursor += 1;
            let exp_negative = match bytes.get(cursor) {
                Some(b'-') => {
                    cursor += 1;
                    true
                }
                Some(b'+') => {
                    cursor += 1;
                    false
                }
                _ => false,
            };
            let exp_start = cursor;
            while let Some(digit) = bytes.get(cursor).filter(|b| b.is_ascii_digit()) {
                exponent = (exponent * 10 + i64::from(digit - b'0')).min(EXPONENT_SATURATION);
                cursor += 1;
            }
            if exp_start == cursor {
                return Err(malformed());
            }
            if exp_negative {
                exponent = -exponent;
            }
        }

        if cursor != bytes.len() {
            return Err(malformed());
        }

        Ok(Self {
            negative,
            int_range,
            frac_range,
            exponent,
        })
    }

    /// Splits the literal into its integer magnitude and significant digits.
    ///
    /// Returns `None` when the literal truncates to zero nanoseconds or is
    /// short-circuited to zero by its exponent.
    fn split(&self, text: &str) -> TemporalJsonResult<Option<DecimalParts>> {
        let bytes = text.as_bytes();
        let int_digits = &bytes[self.int_range.0..self.int_range.1];
        let frac_digits = &bytes[self.frac_range.0..self.frac_range.1];

        let leading = int_digits
            .iter()
            .chain(frac_digits)
            .take_while(|&&b| b == b'0')
            .count();
        let mut digits: Vec<u8> = int_digits
            .iter()
            .chain(frac_digits)
            .skip(leading)
            .map(|b| b - b'0')
            .collect();
        while digits.last() == Some(&0) {
            digits.pop();
        }
        if digits.is_empty() {
            return Ok(None);
        }

        let point = (int_digits.len() as i64 - leading as i64).saturating_add(self.exponent);
        if point.saturating_add(9) <= 0 {
            // Magnitude below one nanosecond.
            return Ok(None);
        }
        if point - digits.len() as i64 >= ZERO_EXPONENT_THRESHOLD {
            #[cfg(feature = "log")]
            log::debug!(
                "decimal literal with exponent {} short-circuited to zero",
                self.exponent
            );
            return Ok(None);
        }

        // A plain integer part wider than 64 bits is malformed; one that only
        // becomes too wide through its exponent is out of range.
        let too_wide = || {
            let err = if self.exponent == 0 {
                TemporalJsonError::malformed_number()
            } else {
                TemporalJsonError::overflow()
            };
            err.with_enum(ErrorMessage::SecondsOutOfRange)
                .with_input(text)
        };
        if point > 19 {
            return Err(too_wide());
        }

        let mut parts = DecimalParts {
            whole: 0,
            digits,
            point,
        };
        parts.whole = (0..point.max(0)).fold(0u128, |acc, i| acc * 10 + u128::from(parts.digit(i)));
        let limit = if self.negative { 1u128 << 63 } else { i64::MAX as u128 };
        if parts.whole > limit {
            return Err(too_wide());
        }

        Ok(Some(parts))
    }
}

impl DecimalParts {
    /// Returns the digit at `index`, zero outside of the significant digits.
    fn digit(&self, index: i64) -> u8 {
        if index < 0 {
            return 0;
        }
        self.digits.get(index as usize).copied().unwrap_or(0)
    }

    /// Returns the first nine fractional digits as nanoseconds, either
    /// truncated or rounded half away from zero on the tenth digit.
    ///
    /// Rounding may return exactly `1_000_000_000`.
    fn fraction_nanos(&self, round: bool) -> u32 {
        let nanos = (0..9).fold(0u32, |acc, i| acc * 10 + u32::from(self.digit(self.point + i)));
        if round && self.digit(self.point + 9) >= 5 {
            return nanos + 1;
        }
        nanos
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, decode_integer, decode_with_bounds, encode, extract_nanos, EpochUnit};
    use crate::{
        epoch::{EpochBounds, SecondsNanos, MAX_INSTANT_SECONDS, MIN_INSTANT_SECONDS},
        error::ErrorKind,
    };

    #[test]
    fn canonical_zero() {
        assert_eq!(encode(SecondsNanos::ZERO, true).unwrap(), "0.0");
        assert_eq!(decode("0.0").unwrap(), SecondsNanos::ZERO);
        assert_eq!(decode("0").unwrap(), SecondsNanos::ZERO);
        assert_eq!(decode("-0.000").unwrap(), SecondsNanos::ZERO);
    }

    #[test]
    fn encodes_nine_fraction_digits() {
        let value = SecondsNanos::try_new(1_420_324_047, 123_456_789).unwrap();
        assert_eq!(encode(value, true).unwrap(), "1420324047.123456789");
        assert_eq!(decode("1420324047.123456789").unwrap(), value);

        let value = SecondsNanos::try_new(12, 0).unwrap();
        assert_eq!(encode(value, true).unwrap(), "12.000000000");
    }

    #[test]
    fn negative_values_keep_their_decimal_value() {
        let value = SecondsNanos::from_signed_parts(0, -500_000_000).unwrap();
        assert_eq!(value.seconds(), -1);
        assert_eq!(encode(value, true).unwrap(), "-0.500000000");
        assert_eq!(decode("-0.500000000").unwrap(), value);

        let value = decode("-1.5").unwrap();
        assert_eq!(value, SecondsNanos::try_new(-2, 500_000_000).unwrap());
        assert_eq!(encode(value, true).unwrap(), "-1.500000000");

        let value = SecondsNanos::try_new(-3, 0).unwrap();
        assert_eq!(encode(value, true).unwrap(), "-3.000000000");
    }

    #[test]
    fn millis_text() {
        let value = SecondsNanos::try_new(123_456_789, 183_917_322).unwrap();
        assert_eq!(encode(value, false).unwrap(), "123456789183");
        let err = encode(SecondsNanos::MAX_INSTANT, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
    }

    #[test]
    fn instant_boundaries() {
        let max = format!("{MAX_INSTANT_SECONDS}.999999999");
        assert_eq!(decode(&max).unwrap(), SecondsNanos::MAX_INSTANT);
        assert_eq!(encode(SecondsNanos::MAX_INSTANT, true).unwrap(), max);

        let past = format!("{}.0", MAX_INSTANT_SECONDS + 1);
        assert_eq!(decode(&past).unwrap_err().kind(), ErrorKind::Overflow);

        let min = format!("{MIN_INSTANT_SECONDS}.0");
        assert_eq!(decode(&min).unwrap(), SecondsNanos::MIN_INSTANT);
        let before = format!("{MIN_INSTANT_SECONDS}.000000001");
        assert_eq!(decode(&before).unwrap_err().kind(), ErrorKind::Overflow);
    }

    #[test]
    fn huge_exponents_short_circuit_to_zero() {
        assert_eq!(decode("1e10000000").unwrap(), SecondsNanos::ZERO);
        assert_eq!(decode("-1e10000000").unwrap(), SecondsNanos::ZERO);
        assert_eq!(decode("1e-10000000").unwrap(), SecondsNanos::ZERO);
        assert_eq!(decode("1e99999999999999999999").unwrap(), SecondsNanos::ZERO);
        assert_eq!(decode("1.5e-10").unwrap(), SecondsNanos::ZERO);
    }

    #[test]
    fn moderate_exponents() {
        assert_eq!(
            decode("1.5e3").unwrap(),
            SecondsNanos::try_new(1_500, 0).unwrap()
        );
        assert_eq!(
            decode("15E-1").unwrap(),
            SecondsNanos::try_new(1, 500_000_000).unwrap()
        );
        assert_eq!(
            decode("1e-9").unwrap(),
            SecondsNanos::try_new(0, 1).unwrap()
        );
        assert_eq!(decode("1e30").unwrap_err().kind(), ErrorKind::Overflow);
        assert_eq!(
            decode_with_bounds("1e18", EpochBounds::DURATION).unwrap(),
            SecondsNanos::try_new(1_000_000_000_000_000_000, 0).unwrap()
        );
    }

    #[test]
    fn sub_nanosecond_digits_truncate() {
        assert_eq!(
            decode("1.0000000019").unwrap(),
            SecondsNanos::try_new(1, 1).unwrap()
        );
    }

    #[test]
    fn malformed_literals() {
        for text in ["", "-", "abc", "1.", ".5", "1e", "1.0x", "--1", "1e+"] {
            let err = decode(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedNumber, "{text}");
        }
        let err = decode_with_bounds("123456789012345678901234.5", EpochBounds::DURATION).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedNumber);
    }

    #[test]
    fn integer_part_limits_follow_the_sign() {
        let err = decode_with_bounds("9223372036854775808", EpochBounds::DURATION).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedNumber);
        let err = decode_with_bounds("9223372036854775808.25", EpochBounds::DURATION).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedNumber);
        let err = decode_with_bounds("9.223372036854775808e18", EpochBounds::DURATION).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);

        let max = decode_with_bounds("9223372036854775807", EpochBounds::DURATION).unwrap();
        assert_eq!(max.seconds(), i64::MAX);
        let min = decode_with_bounds("-9223372036854775808", EpochBounds::DURATION).unwrap();
        assert_eq!(min.seconds(), i64::MIN);
    }

    #[test]
    fn integer_epochs() {
        let value = decode_integer("1420324047", EpochUnit::Seconds, EpochBounds::INSTANT).unwrap();
        assert_eq!(value, SecondsNanos::try_new(1_420_324_047, 0).unwrap());

        let value = decode_integer("-1", EpochUnit::Milliseconds, EpochBounds::INSTANT).unwrap();
        assert_eq!(value, SecondsNanos::try_new(-1, 999_000_000).unwrap());

        let err = decode_integer("9223372036854775807", EpochUnit::Seconds, EpochBounds::INSTANT).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);

        let err = decode_integer("99999999999999999999", EpochUnit::Seconds, EpochBounds::INSTANT).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedNumber);
    }

    #[test]
    fn extracts_rounded_nanos() {
        assert_eq!(extract_nanos("0.1", 0).unwrap(), 100_000_000);
        assert_eq!(extract_nanos("1.0000000005", 1).unwrap(), 1);
        assert_eq!(extract_nanos("1.0000000004", 1).unwrap(), 0);
        assert_eq!(extract_nanos("1.9999999999", 1).unwrap(), 1_000_000_000);
        assert_eq!(extract_nanos("-0.5", -1).unwrap(), 500_000_000);
        assert_eq!(extract_nanos("-0.5", 0).unwrap(), -500_000_000);
        assert_eq!(extract_nanos("1e10000000", 0).unwrap(), 0);
    }
}
