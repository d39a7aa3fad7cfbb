//! This module implements `Duration` and `Period`.

use core::{fmt, str::FromStr};

use writeable::{impl_display_with_writeable, LengthHint, Writeable};

use crate::{
    epoch::{EpochBounds, SecondsNanos},
    kind::TemporalKind,
    parsers::{self, FormattableDuration, FormattablePeriod},
    TemporalJsonError, TemporalJsonResult,
};

/// An exact length of time as signed seconds and a nanosecond adjustment.
///
/// The seconds span the full `i64` range. Like `SecondsNanos`, the
/// nanosecond part is always positive: `-0.5s` is `-1s + 500_000_000ns`.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(SecondsNanos);

impl Duration {
    /// The zero length.
    pub const ZERO: Self = Self(SecondsNanos::ZERO);

    /// Creates a new `Duration` from seconds and a nanosecond adjustment
    /// that may be negative or exceed one second.
    pub fn new(seconds: i64, nanos: i64) -> TemporalJsonResult<Self> {
        EpochBounds::DURATION
            .check(seconds, nanos)
            .map(Self)
            .map_err(|e| e.with_kind(TemporalKind::Duration))
    }

    /// Creates a new `Duration` from milliseconds.
    #[must_use]
    pub fn from_milliseconds(millis: i64) -> Self {
        Self(SecondsNanos::from_epoch_millis(millis))
    }

    /// Returns the seconds and nanoseconds of this duration.
    #[inline]
    #[must_use]
    pub const fn as_seconds_nanos(&self) -> SecondsNanos {
        self.0
    }

    /// Returns the whole seconds, floored toward negative infinity.
    #[inline]
    #[must_use]
    pub const fn seconds(&self) -> i64 {
        self.0.seconds()
    }

    /// Returns the nanosecond adjustment, always in `0..1_000_000_000`.
    #[inline]
    #[must_use]
    pub const fn subsec_nanoseconds(&self) -> u32 {
        self.0.nanos()
    }

    #[inline]
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Returns the negated duration, failing only for `i64::MIN` seconds.
    pub fn negated(&self) -> TemporalJsonResult<Self> {
        self.0
            .checked_neg()
            .map(Self)
            .map_err(|e| e.with_kind(TemporalKind::Duration))
    }
}

impl From<SecondsNanos> for Duration {
    fn from(value: SecondsNanos) -> Self {
        Self(value)
    }
}

impl FromStr for Duration {
    type Err = TemporalJsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsers::parse_duration(s)
            .map(Self)
            .map_err(|e| e.or_kind(TemporalKind::Duration))
    }
}

impl Writeable for Duration {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        FormattableDuration::from(self.0).write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        FormattableDuration::from(self.0).writeable_length_hint()
    }
}

/// A calendar length in years, months and days.
///
/// Fields are independent and may carry different signs.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    pub years: i32,
    pub months: i32,
    pub days: i32,
}

impl Period {
    /// The zero period.
    pub const ZERO: Self = Self::new(0, 0, 0);

    #[inline]
    #[must_use]
    pub const fn new(years: i32, months: i32, days: i32) -> Self {
        Self {
            years,
            months,
            days,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }

    fn formattable(&self) -> FormattablePeriod {
        FormattablePeriod {
            years: self.years,
            months: self.months,
            days: self.days,
        }
    }
}

impl FromStr for Period {
    type Err = TemporalJsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsers::parse_period(s)
            .map(|(years, months, days)| Self::new(years, months, days))
            .map_err(|e| e.or_kind(TemporalKind::Period))
    }
}

impl Writeable for Period {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        self.formattable().write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        self.formattable().writeable_length_hint()
    }
}

impl_display_with_writeable!(Duration);
impl_display_with_writeable!(Period);

#[cfg(test)]
mod tests {
    use core::str::FromStr;

    use super::{Duration, Period};
    use crate::{error::ErrorKind, kind::TemporalKind};
    use writeable::assert_writeable_eq;

    #[test]
    fn duration() {
        let duration = Duration::from_str("PT13M37.12S").unwrap();
        assert_eq!(duration.seconds(), 817);
        assert_eq!(duration.subsec_nanoseconds(), 120_000_000);
        assert_writeable_eq!(duration, "PT13M37.12S");

        let negative = duration.negated().unwrap();
        assert!(negative.is_negative());
        assert_writeable_eq!(negative, "-PT13M37.12S");
        assert_eq!(negative.seconds(), -818);
        assert_eq!(negative.subsec_nanoseconds(), 880_000_000);

        assert_writeable_eq!(Duration::ZERO, "PT0S");
        assert_eq!(Duration::from_milliseconds(-1).seconds(), -1);

        let err = Duration::from_str("P1M").unwrap_err();
        assert_eq!(err.temporal_kind(), Some(TemporalKind::Duration));
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
    }

    #[test]
    fn duration_bounds() {
        assert!(Duration::new(i64::MAX, 999_999_999).is_ok());
        let err = Duration::new(i64::MAX, 1_000_000_000).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
        assert!(Duration::new(i64::MIN, 0).unwrap().negated().is_err());
    }

    #[test]
    fn period() {
        let period = Period::from_str("P3Y1M4D").unwrap();
        assert_eq!(period, Period::new(3, 1, 4));
        assert_writeable_eq!(period, "P3Y1M4D");
        assert_writeable_eq!(Period::ZERO, "P0D");
        assert!(Period::from_str("P0D").unwrap().is_zero());
    }
}
