//! This module implements `PlainDateTime`.

use core::{fmt, str::FromStr};

use writeable::{impl_display_with_writeable, LengthHint, Writeable};

use crate::{
    iso::{IsoDate, IsoDateTime, IsoTime},
    kind::TemporalKind,
    parsers::{self, FormattableDate, FormattableIxdtf, FormattableTime},
    TemporalJsonError, TemporalJsonResult,
};

use super::{PlainDate, PlainTime};

/// A calendar date and wall-clock time with no zone.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlainDateTime(IsoDateTime);

impl PlainDateTime {
    /// Creates a new validated `PlainDateTime`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        nanosecond: u32,
    ) -> TemporalJsonResult<Self> {
        let date = IsoDate::new(year, month, day);
        let time = IsoTime::new(hour, minute, second, nanosecond);
        date.and_then(|date| time.map(|time| Self(IsoDateTime::new(date, time))))
            .map_err(|e| e.with_kind(TemporalKind::PlainDateTime))
    }

    /// Combines a `PlainDate` and a `PlainTime`.
    #[must_use]
    pub const fn from_date_and_time(date: PlainDate, time: PlainTime) -> Self {
        Self(IsoDateTime::new(date.iso(), time.iso()))
    }

    #[inline]
    #[must_use]
    pub const fn iso(&self) -> IsoDateTime {
        self.0
    }

    /// Returns the date part.
    #[inline]
    #[must_use]
    pub const fn date(&self) -> PlainDate {
        PlainDate::from_iso(self.0.date)
    }

    /// Returns the time part.
    #[inline]
    #[must_use]
    pub const fn time(&self) -> PlainTime {
        PlainTime::from_iso(self.0.time)
    }
}

impl From<IsoDateTime> for PlainDateTime {
    fn from(value: IsoDateTime) -> Self {
        Self(value)
    }
}

impl FromStr for PlainDateTime {
    type Err = TemporalJsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsers::parse_date_time(s)
            .map(Self)
            .map_err(|e| e.or_kind(TemporalKind::PlainDateTime))
    }
}

impl Writeable for PlainDateTime {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        self.formattable().write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        self.formattable().writeable_length_hint()
    }
}

impl PlainDateTime {
    fn formattable(&self) -> FormattableIxdtf<'static> {
        FormattableIxdtf {
            date: Some(FormattableDate::from(self.0.date)),
            time: Some(FormattableTime::from(self.0.time)),
            utc_offset: None,
            timezone: None,
        }
    }
}

impl_display_with_writeable!(PlainDateTime);
