//! Seconds/nanoseconds pairs and the representable epoch range.

use crate::{error::ErrorMessage, kind::TemporalKind, TemporalJsonError, TemporalJsonResult};

/// Nanoseconds in one second.
pub const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// The earliest representable instant in epoch seconds (-1000000000-01-01T00:00Z).
pub const MIN_INSTANT_SECONDS: i64 = -31_557_014_167_219_200;

/// The latest representable instant in epoch seconds (+1000000000-12-31T23:59:59Z).
pub const MAX_INSTANT_SECONDS: i64 = 31_556_889_864_403_199;

/// A point or length on the time line as whole seconds plus a
/// nanosecond-of-second.
///
/// `nanos` is always within `0..1_000_000_000`, the sign lives entirely
/// in `seconds`: `-0.5s` is `{ seconds: -1, nanos: 500_000_000 }`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SecondsNanos {
    seconds: i64,
    nanos: u32,
}

impl SecondsNanos {
    /// The epoch itself.
    pub const ZERO: Self = Self::new_unchecked(0, 0);

    /// The latest representable instant.
    pub const MAX_INSTANT: Self = Self::new_unchecked(MAX_INSTANT_SECONDS, NANOS_PER_SECOND - 1);

    /// The earliest representable instant.
    pub const MIN_INSTANT: Self = Self::new_unchecked(MIN_INSTANT_SECONDS, 0);

    pub(crate) const fn new_unchecked(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    /// Creates a new `SecondsNanos` from an already normalized pair.
    pub fn try_new(seconds: i64, nanos: u32) -> TemporalJsonResult<Self> {
        if nanos >= NANOS_PER_SECOND {
            return Err(TemporalJsonError::overflow()
                .with_message("Nanosecond-of-second must be below 1_000_000_000."));
        }
        Ok(Self::new_unchecked(seconds, nanos))
    }

    /// Creates a `SecondsNanos` from a pair whose nanoseconds may be negative
    /// or exceed one second, carrying the excess into `seconds`.
    pub fn from_signed_parts(seconds: i64, nanos: i64) -> TemporalJsonResult<Self> {
        let carry = nanos.div_euclid(i64::from(NANOS_PER_SECOND));
        let nanos = nanos.rem_euclid(i64::from(NANOS_PER_SECOND)) as u32;
        let seconds = seconds
            .checked_add(carry)
            .ok_or_else(|| TemporalJsonError::overflow().with_enum(ErrorMessage::SecondsOutOfRange))?;
        Ok(Self::new_unchecked(seconds, nanos))
    }

    /// Creates a `SecondsNanos` from epoch milliseconds.
    pub fn from_epoch_millis(millis: i64) -> Self {
        let seconds = millis.div_euclid(1_000);
        let nanos = millis.rem_euclid(1_000) as u32 * 1_000_000;
        Self::new_unchecked(seconds, nanos)
    }

    /// Creates a `SecondsNanos` from a total count of nanoseconds.
    pub(crate) fn from_total_nanoseconds(total: i128) -> TemporalJsonResult<Self> {
        let seconds = total.div_euclid(i128::from(NANOS_PER_SECOND));
        let nanos = total.rem_euclid(i128::from(NANOS_PER_SECOND)) as u32;
        let seconds = i64::try_from(seconds)
            .map_err(|_| TemporalJsonError::overflow().with_enum(ErrorMessage::SecondsOutOfRange))?;
        Ok(Self::new_unchecked(seconds, nanos))
    }

    /// Returns the whole seconds, floored toward negative infinity.
    #[inline]
    #[must_use]
    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Returns the nanosecond-of-second, always in `0..1_000_000_000`.
    #[inline]
    #[must_use]
    pub const fn nanos(&self) -> u32 {
        self.nanos
    }

    /// Returns whether this value is before the epoch (or a negative length).
    #[inline]
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.seconds < 0
    }

    /// Returns the total number of nanoseconds.
    #[inline]
    #[must_use]
    pub fn as_total_nanoseconds(&self) -> i128 {
        i128::from(self.seconds) * i128::from(NANOS_PER_SECOND) + i128::from(self.nanos)
    }

    /// Returns this value as whole epoch milliseconds, truncating sub-millisecond
    /// precision toward negative infinity.
    pub fn to_epoch_millis(&self) -> TemporalJsonResult<i64> {
        self.seconds
            .checked_mul(1_000)
            .and_then(|ms| ms.checked_add(i64::from(self.nanos / 1_000_000)))
            .ok_or_else(|| TemporalJsonError::overflow().with_enum(ErrorMessage::EpochMillisOverflow))
    }

    /// Returns the negated value, used for negative durations.
    pub(crate) fn checked_neg(&self) -> TemporalJsonResult<Self> {
        Self::from_total_nanoseconds(-self.as_total_nanoseconds())
    }
}

/// The inclusive range of a value measured in seconds and nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochBounds {
    min: SecondsNanos,
    max: SecondsNanos,
}

impl EpochBounds {
    /// Bounds of instant-like values.
    pub const INSTANT: Self = Self {
        min: SecondsNanos::MIN_INSTANT,
        max: SecondsNanos::MAX_INSTANT,
    };

    /// Bounds of durations: any 64-bit count of seconds.
    pub const DURATION: Self = Self {
        min: SecondsNanos::new_unchecked(i64::MIN, 0),
        max: SecondsNanos::new_unchecked(i64::MAX, NANOS_PER_SECOND - 1),
    };

    /// Returns the bounds of the given kind, or `None` for kinds that
    /// are not measured on the epoch time line.
    #[must_use]
    pub const fn for_kind(kind: TemporalKind) -> Option<Self> {
        match kind {
            TemporalKind::Instant | TemporalKind::OffsetDateTime | TemporalKind::ZonedDateTime => {
                Some(Self::INSTANT)
            }
            TemporalKind::Duration => Some(Self::DURATION),
            _ => None,
        }
    }

    /// Returns the smallest accepted value.
    #[inline]
    #[must_use]
    pub const fn min(&self) -> SecondsNanos {
        self.min
    }

    /// Returns the largest accepted value.
    #[inline]
    #[must_use]
    pub const fn max(&self) -> SecondsNanos {
        self.max
    }

    /// Validates a `(seconds, nanos)` pair against these bounds.
    ///
    /// `nanos` may be negative or larger than a second. The check is made on
    /// the combined value, so one nanosecond past either end fails even when
    /// `seconds` alone is in range.
    pub fn check(&self, seconds: i64, nanos: i64) -> TemporalJsonResult<SecondsNanos> {
        let total = i128::from(seconds) * i128::from(NANOS_PER_SECOND) + i128::from(nanos);
        if total < self.min.as_total_nanoseconds() || total > self.max.as_total_nanoseconds() {
            return Err(TemporalJsonError::overflow()
                .with_enum(ErrorMessage::InstantOutOfRange)
                .with_input(format!("{seconds}s {nanos}ns")));
        }
        SecondsNanos::from_total_nanoseconds(total)
    }

    /// Validates an already normalized value against these bounds.
    pub fn check_value(&self, value: SecondsNanos) -> TemporalJsonResult<SecondsNanos> {
        self.check(value.seconds(), i64::from(value.nanos()))
    }
}

/// Validates a pair against the bounds of `kind`, passing it through
/// unchanged for kinds without epoch bounds.
pub fn check_bounds(seconds: i64, nanos: i64, kind: TemporalKind) -> TemporalJsonResult<SecondsNanos> {
    match EpochBounds::for_kind(kind) {
        Some(bounds) => bounds.check(seconds, nanos).map_err(|e| e.with_kind(kind)),
        None => SecondsNanos::from_signed_parts(seconds, nanos),
    }
}
