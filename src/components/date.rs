//! This module implements `PlainDate`, `Year`, `PlainYearMonth` and
//! `PlainMonthDay`.

use core::{fmt, str::FromStr};

use writeable::{impl_display_with_writeable, LengthHint, Writeable};

use crate::{
    iso::{IsoDate, MAX_ISO_YEAR, MIN_ISO_YEAR},
    kind::TemporalKind,
    parsers::{self, FormattableDate, FormattableMonthDay, FormattableYearMonth, LEAP_YEAR},
    TemporalJsonError, TemporalJsonResult,
};

// ==== `PlainDate` ====

/// A calendar date with no time or zone.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlainDate(IsoDate);

impl PlainDate {
    /// Creates a new validated `PlainDate`.
    pub fn new(year: i32, month: u8, day: u8) -> TemporalJsonResult<Self> {
        IsoDate::new(year, month, day)
            .map(Self)
            .map_err(|e| e.with_kind(TemporalKind::PlainDate))
    }

    /// Creates a `PlainDate` from a count of days since 1970-01-01.
    pub fn from_epoch_days(days: i64) -> TemporalJsonResult<Self> {
        IsoDate::from_epoch_days(days)
            .map(Self)
            .map_err(|e| e.with_kind(TemporalKind::PlainDate))
    }

    /// Returns the number of days since 1970-01-01.
    #[must_use]
    pub fn to_epoch_days(&self) -> i64 {
        self.0.to_epoch_days()
    }

    #[inline]
    pub(crate) const fn from_iso(iso: IsoDate) -> Self {
        Self(iso)
    }

    #[inline]
    #[must_use]
    pub const fn iso(&self) -> IsoDate {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.0.year
    }

    #[inline]
    #[must_use]
    pub const fn month(&self) -> u8 {
        self.0.month
    }

    #[inline]
    #[must_use]
    pub const fn day(&self) -> u8 {
        self.0.day
    }
}

impl From<IsoDate> for PlainDate {
    fn from(value: IsoDate) -> Self {
        Self(value)
    }
}

impl FromStr for PlainDate {
    type Err = TemporalJsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsers::parse_date(s)
            .map(Self)
            .map_err(|e| e.or_kind(TemporalKind::PlainDate))
    }
}

impl Writeable for PlainDate {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        FormattableDate::from(self.0).write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        FormattableDate::from(self.0).writeable_length_hint()
    }
}

// ==== `Year` ====

/// A proleptic ISO year.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Year(i32);

impl Year {
    /// Creates a new `Year` within ±1_000_000_000.
    pub fn new(year: i32) -> TemporalJsonResult<Self> {
        if !(MIN_ISO_YEAR..=MAX_ISO_YEAR).contains(&year) {
            return Err(TemporalJsonError::overflow()
                .with_message("Year is outside of the supported range.")
                .with_kind(TemporalKind::Year)
                .with_input(year.to_string()));
        }
        Ok(Self(year))
    }

    /// Creates a new `Year` from a wide integer field.
    pub(crate) fn try_from_i64(year: i64) -> TemporalJsonResult<Self> {
        i32::try_from(year)
            .map_err(|_| {
                TemporalJsonError::overflow()
                    .with_message("Year is outside of the supported range.")
                    .with_kind(TemporalKind::Year)
                    .with_input(year.to_string())
            })
            .and_then(Self::new)
    }

    #[inline]
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }

    /// Returns whether this is a leap year.
    #[inline]
    #[must_use]
    pub const fn is_leap(&self) -> bool {
        crate::iso::is_leap_year(self.0)
    }
}

impl FromStr for Year {
    type Err = TemporalJsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsers::parse_year(s)
            .map(Self)
            .map_err(|e| e.or_kind(TemporalKind::Year))
    }
}

impl Writeable for Year {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        self.0.write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        self.0.writeable_length_hint()
    }
}

// ==== `PlainYearMonth` ====

/// A year and month.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlainYearMonth {
    year: i32,
    month: u8,
}

impl PlainYearMonth {
    /// Creates a new validated `PlainYearMonth`.
    pub fn new(year: i32, month: u8) -> TemporalJsonResult<Self> {
        IsoDate::new(year, month, 1)
            .map(|_| Self { year, month })
            .map_err(|e| e.with_kind(TemporalKind::YearMonth))
    }

    #[inline]
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[inline]
    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }
}

impl FromStr for PlainYearMonth {
    type Err = TemporalJsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsers::parse_year_month(s)
            .and_then(|(year, month)| Self::new(year, month))
            .map_err(|e| e.or_kind(TemporalKind::YearMonth))
    }
}

impl Writeable for PlainYearMonth {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        FormattableYearMonth(self.year, self.month).write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        FormattableYearMonth(self.year, self.month).writeable_length_hint()
    }
}

// ==== `PlainMonthDay` ====

/// A month and day, validated against a leap year so that February 29th
/// is representable.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlainMonthDay {
    month: u8,
    day: u8,
}

impl PlainMonthDay {
    /// Creates a new validated `PlainMonthDay`.
    pub fn new(month: u8, day: u8) -> TemporalJsonResult<Self> {
        IsoDate::new(LEAP_YEAR, month, day)
            .map(|_| Self { month, day })
            .map_err(|e| e.with_kind(TemporalKind::MonthDay))
    }

    #[inline]
    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    #[inline]
    #[must_use]
    pub const fn day(&self) -> u8 {
        self.day
    }
}

impl FromStr for PlainMonthDay {
    type Err = TemporalJsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsers::parse_month_day(s)
            .and_then(|(month, day)| Self::new(month, day))
            .map_err(|e| e.or_kind(TemporalKind::MonthDay))
    }
}

impl Writeable for PlainMonthDay {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        FormattableMonthDay(self.month, self.day).write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::exact(7)
    }
}

impl_display_with_writeable!(PlainDate);
impl_display_with_writeable!(Year);
impl_display_with_writeable!(PlainYearMonth);
impl_display_with_writeable!(PlainMonthDay);

#[cfg(test)]
mod tests {
    use core::str::FromStr;

    use super::{PlainDate, PlainMonthDay, PlainYearMonth, Year};
    use crate::{error::ErrorKind, kind::TemporalKind};
    use writeable::assert_writeable_eq;

    #[test]
    fn plain_date() {
        let date = PlainDate::from_str("2013-08-21").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2013, 8, 21));
        assert_writeable_eq!(date, "2013-08-21");
        assert_eq!(PlainDate::from_epoch_days(date.to_epoch_days()).unwrap(), date);
        assert_eq!(PlainDate::from_epoch_days(0).unwrap(), PlainDate::default());

        let err = PlainDate::new(2013, 2, 29).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
        assert_eq!(err.temporal_kind(), Some(TemporalKind::PlainDate));
    }

    #[test]
    fn year() {
        assert_writeable_eq!(Year::new(2013).unwrap(), "2013");
        assert_writeable_eq!(Year::new(-42).unwrap(), "-42");
        assert_eq!(Year::from_str("1972").unwrap().value(), 1972);
        assert!(Year::from_str("1972").unwrap().is_leap());
        assert_eq!(Year::try_from_i64(i64::MAX).unwrap_err().kind(), ErrorKind::Overflow);
    }

    #[test]
    fn year_month_and_month_day() {
        let year_month = PlainYearMonth::from_str("2013-08").unwrap();
        assert_writeable_eq!(year_month, "2013-08");
        assert!(PlainYearMonth::new(2013, 13).is_err());

        let month_day = PlainMonthDay::from_str("--01-17").unwrap();
        assert_writeable_eq!(month_day, "--01-17");
        assert_writeable_eq!(PlainMonthDay::new(2, 29).unwrap(), "--02-29");
        assert!(PlainMonthDay::new(2, 30).is_err());
    }
}
