//! This module implements `PlainTime`.

use core::{fmt, str::FromStr};

use writeable::{impl_display_with_writeable, LengthHint, Writeable};

use crate::{
    iso::IsoTime,
    kind::TemporalKind,
    parsers::{self, FormattableTime},
    TemporalJsonError, TemporalJsonResult,
};

/// A wall-clock time with nanosecond precision.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlainTime(IsoTime);

impl PlainTime {
    /// Creates a new validated `PlainTime`.
    pub fn new(hour: u8, minute: u8, second: u8, nanosecond: u32) -> TemporalJsonResult<Self> {
        IsoTime::new(hour, minute, second, nanosecond)
            .map(Self)
            .map_err(|e| e.with_kind(TemporalKind::PlainTime))
    }

    #[inline]
    pub(crate) const fn from_iso(iso: IsoTime) -> Self {
        Self(iso)
    }

    #[inline]
    #[must_use]
    pub const fn iso(&self) -> IsoTime {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.0.hour
    }

    #[inline]
    #[must_use]
    pub const fn minute(&self) -> u8 {
        self.0.minute
    }

    #[inline]
    #[must_use]
    pub const fn second(&self) -> u8 {
        self.0.second
    }

    #[inline]
    #[must_use]
    pub const fn nanosecond(&self) -> u32 {
        self.0.nanosecond
    }
}

impl From<IsoTime> for PlainTime {
    fn from(value: IsoTime) -> Self {
        Self(value)
    }
}

impl FromStr for PlainTime {
    type Err = TemporalJsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsers::parse_time(s)
            .map(Self)
            .map_err(|e| e.or_kind(TemporalKind::PlainTime))
    }
}

impl Writeable for PlainTime {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        FormattableTime::from(self.0).write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        FormattableTime::from(self.0).writeable_length_hint()
    }
}

impl_display_with_writeable!(PlainTime);

#[cfg(test)]
mod tests {
    use core::str::FromStr;

    use super::PlainTime;
    use writeable::assert_writeable_eq;

    #[test]
    fn text() {
        assert_writeable_eq!(PlainTime::new(9, 22, 0, 57).unwrap(), "09:22:00.000000057");
        assert_writeable_eq!(PlainTime::new(9, 22, 0, 0).unwrap(), "09:22:00");
        assert_writeable_eq!(PlainTime::new(23, 59, 59, 120_000_000).unwrap(), "23:59:59.12");

        let time = PlainTime::from_str("14:27:31.5").unwrap();
        assert_eq!(time.nanosecond(), 500_000_000);
        assert_eq!(PlainTime::from_str("2013-08-21T14:27:31.5").unwrap(), time);
        assert!(PlainTime::new(24, 0, 0, 0).is_err());
    }
}
