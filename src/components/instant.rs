//! An implementation of `Instant`.

use core::str::FromStr;

use writeable::Writeable;

use crate::{
    epoch::{EpochBounds, SecondsNanos},
    iso::IsoDateTime,
    kind::TemporalKind,
    parsers::{self, FormattableDate, FormattableIxdtf, FormattableTime, FormattableUtcOffset},
    TemporalJsonError, TemporalJsonResult,
};

/// A point on the UTC time line, bounded to the years ±1_000_000_000.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(SecondsNanos);

impl Instant {
    /// The earliest representable instant.
    pub const MIN: Self = Self(SecondsNanos::MIN_INSTANT);

    /// The latest representable instant.
    pub const MAX: Self = Self(SecondsNanos::MAX_INSTANT);

    #[inline]
    pub(crate) const fn new_unchecked(epoch: SecondsNanos) -> Self {
        Self(epoch)
    }

    /// Creates a new `Instant`, failing with `Overflow` outside of the
    /// representable range.
    pub fn try_new(epoch: SecondsNanos) -> TemporalJsonResult<Self> {
        EpochBounds::INSTANT
            .check_value(epoch)
            .map(Self)
            .map_err(|e| e.with_kind(TemporalKind::Instant))
    }

    /// Creates a new `Instant` from epoch seconds and a nanosecond adjustment
    /// that may be negative or exceed one second.
    pub fn from_epoch_seconds(seconds: i64, nanos: i64) -> TemporalJsonResult<Self> {
        EpochBounds::INSTANT
            .check(seconds, nanos)
            .map(Self)
            .map_err(|e| e.with_kind(TemporalKind::Instant))
    }

    /// Creates a new `Instant` from epoch milliseconds.
    pub fn from_epoch_milliseconds(millis: i64) -> TemporalJsonResult<Self> {
        Self::try_new(SecondsNanos::from_epoch_millis(millis))
    }

    /// Returns the epoch value.
    #[inline]
    #[must_use]
    pub const fn epoch(&self) -> SecondsNanos {
        self.0
    }

    /// Returns the whole epoch seconds.
    #[inline]
    #[must_use]
    pub const fn epoch_seconds(&self) -> i64 {
        self.0.seconds()
    }

    /// Returns the nanosecond-of-second.
    #[inline]
    #[must_use]
    pub const fn subsec_nanoseconds(&self) -> u32 {
        self.0.nanos()
    }

    /// Returns the epoch milliseconds, failing with `Overflow` when they do
    /// not fit in an `i64`.
    pub fn epoch_milliseconds(&self) -> TemporalJsonResult<i64> {
        self.0.to_epoch_millis()
    }

    /// Returns the UTC wall-clock fields of this instant.
    pub fn to_utc_date_time(&self) -> TemporalJsonResult<IsoDateTime> {
        IsoDateTime::from_epoch(self.0, 0)
    }

    /// Returns this instant as ISO-8601 text ending in `Z`.
    pub fn to_ixdtf_string(&self) -> TemporalJsonResult<String> {
        let local = self.to_utc_date_time()?;
        let ixdtf = FormattableIxdtf {
            date: Some(FormattableDate::from(local.date)),
            time: Some(FormattableTime::from(local.time)),
            utc_offset: Some(FormattableUtcOffset::Z),
            timezone: None,
        };
        Ok(ixdtf.write_to_string().into_owned())
    }
}

impl From<Instant> for SecondsNanos {
    fn from(value: Instant) -> Self {
        value.0
    }
}

impl TryFrom<SecondsNanos> for Instant {
    type Error = TemporalJsonError;

    fn try_from(value: SecondsNanos) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl FromStr for Instant {
    type Err = TemporalJsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsers::parse_instant(s)
            .and_then(Self::try_new)
            .map_err(|e| e.or_kind(TemporalKind::Instant))
    }
}
