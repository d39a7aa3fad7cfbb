//! This module implements the ISO field records.
//!
//! The three record types are:
//!   - `IsoDate`: year, month and day
//!   - `IsoTime`: hour, minute, second and nanosecond
//!   - `IsoDateTime`: an `IsoDate` and an `IsoTime`
//!
//! All records are proleptic Gregorian and carry no zone. Conversions to
//! and from the epoch are done in whole days and seconds with integer
//! arithmetic only.

use crate::{
    epoch::{SecondsNanos, NANOS_PER_SECOND},
    error::ErrorMessage,
    TemporalJsonError, TemporalJsonResult,
};

/// The largest supported ISO year.
pub const MAX_ISO_YEAR: i32 = 1_000_000_000;
/// The smallest supported ISO year.
pub const MIN_ISO_YEAR: i32 = -1_000_000_000;

pub(crate) const SECONDS_PER_DAY: i64 = 86_400;

/// Days from 0000-03-01 to 1970-01-01.
const EPOCH_SHIFT: i64 = 719_468;
const DAYS_PER_ERA: i64 = 146_097;

/// `IsoDateTime` is the record of an `IsoDate` and an `IsoTime`.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoDateTime {
    pub date: IsoDate,
    pub time: IsoTime,
}

impl IsoDateTime {
    /// Creates a new `IsoDateTime` from already validated records.
    #[inline]
    #[must_use]
    pub const fn new(date: IsoDate, time: IsoTime) -> Self {
        Self { date, time }
    }

    /// Returns the wall-clock fields observed at `epoch` with the given
    /// UTC offset in seconds.
    pub fn from_epoch(epoch: SecondsNanos, offset_seconds: i32) -> TemporalJsonResult<Self> {
        let local = epoch
            .seconds()
            .checked_add(i64::from(offset_seconds))
            .ok_or_else(|| TemporalJsonError::overflow().with_enum(ErrorMessage::SecondsOutOfRange))?;
        let days = local.div_euclid(SECONDS_PER_DAY);
        let second_of_day = local.rem_euclid(SECONDS_PER_DAY) as u32;
        let date = IsoDate::from_epoch_days(days)?;
        Ok(Self::new(date, IsoTime::from_second_of_day(second_of_day, epoch.nanos())))
    }

    /// Returns the epoch value of these wall-clock fields under the given
    /// UTC offset in seconds.
    #[must_use]
    pub fn to_epoch(&self, offset_seconds: i32) -> SecondsNanos {
        let seconds = self.date.to_epoch_days() * SECONDS_PER_DAY
            + i64::from(self.time.second_of_day())
            - i64::from(offset_seconds);
        // Years are bounded by `MAX_ISO_YEAR`, so `seconds` cannot overflow.
        SecondsNanos::new_unchecked(seconds, self.time.nanosecond)
    }
}

// ==== `IsoDate` section ====

/// `IsoDate` is a proleptic Gregorian calendar date.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl Default for IsoDate {
    fn default() -> Self {
        Self::new_unchecked(1970, 1, 1)
    }
}

impl IsoDate {
    /// Creates a new `IsoDate` without determining the validity.
    #[inline]
    pub(crate) const fn new_unchecked(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Creates a new validated `IsoDate`.
    pub fn new(year: i32, month: u8, day: u8) -> TemporalJsonResult<Self> {
        if !(MIN_ISO_YEAR..=MAX_ISO_YEAR).contains(&year)
            || !(1..=12).contains(&month)
            || day == 0
            || day > days_in_month(year, month)
        {
            return Err(TemporalJsonError::parse()
                .with_enum(ErrorMessage::InvalidDate)
                .with_input(format!("{year}-{month}-{day}")));
        }
        Ok(Self::new_unchecked(year, month, day))
    }

    /// Creates a new validated `IsoDate` from wide field values.
    pub(crate) fn try_from_fields(year: i64, month: i64, day: i64) -> TemporalJsonResult<Self> {
        let invalid = || {
            TemporalJsonError::parse()
                .with_enum(ErrorMessage::InvalidDate)
                .with_input(format!("{year}-{month}-{day}"))
        };
        let year = i32::try_from(year).map_err(|_| invalid())?;
        let month = u8::try_from(month).map_err(|_| invalid())?;
        let day = u8::try_from(day).map_err(|_| invalid())?;
        Self::new(year, month, day)
    }

    /// Returns the number of days since 1970-01-01.
    #[must_use]
    pub fn to_epoch_days(&self) -> i64 {
        let year = i64::from(self.year) - i64::from(self.month <= 2);
        let era = year.div_euclid(400);
        let year_of_era = year - era * 400;
        let month_index = (i64::from(self.month) + 9) % 12;
        let day_of_year = (153 * month_index + 2) / 5 + i64::from(self.day) - 1;
        let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
        era * DAYS_PER_ERA + day_of_era - EPOCH_SHIFT
    }

    /// Creates an `IsoDate` from a count of days since 1970-01-01.
    pub fn from_epoch_days(days: i64) -> TemporalJsonResult<Self> {
        let out_of_range = || {
            TemporalJsonError::overflow()
                .with_enum(ErrorMessage::InvalidDate)
                .with_input(days.to_string())
        };
        let shifted = days.checked_add(EPOCH_SHIFT).ok_or_else(out_of_range)?;
        let era = shifted.div_euclid(DAYS_PER_ERA);
        let day_of_era = shifted - era * DAYS_PER_ERA;
        let year_of_era =
            (day_of_era - day_of_era / 1460 + day_of_era / 36524 - day_of_era / 146_096) / 365;
        let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
        let month_index = (5 * day_of_year + 2) / 153;
        let day = day_of_year - (153 * month_index + 2) / 5 + 1;
        let month = if month_index < 10 {
            month_index + 3
        } else {
            month_index - 9
        };
        let year = year_of_era + era * 400 + i64::from(month <= 2);

        let year = i32::try_from(year)
            .ok()
            .filter(|y| (MIN_ISO_YEAR..=MAX_ISO_YEAR).contains(y))
            .ok_or_else(out_of_range)?;
        Ok(Self::new_unchecked(year, month as u8, day as u8))
    }
}

// ==== `IsoTime` section ====

/// An `IsoTime` is a wall-clock time with nanosecond precision.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanosecond: u32,
}

impl IsoTime {
    /// Midnight.
    pub const MIDNIGHT: Self = Self::new_unchecked(0, 0, 0, 0);

    #[inline]
    pub(crate) const fn new_unchecked(hour: u8, minute: u8, second: u8, nanosecond: u32) -> Self {
        Self {
            hour,
            minute,
            second,
            nanosecond,
        }
    }

    /// Creates a new validated `IsoTime`.
    pub fn new(hour: u8, minute: u8, second: u8, nanosecond: u32) -> TemporalJsonResult<Self> {
        if hour > 23 || minute > 59 || second > 59 || nanosecond >= NANOS_PER_SECOND {
            return Err(TemporalJsonError::parse()
                .with_enum(ErrorMessage::InvalidTime)
                .with_input(format!("{hour}:{minute}:{second}.{nanosecond}")));
        }
        Ok(Self::new_unchecked(hour, minute, second, nanosecond))
    }

    /// Creates a new validated `IsoTime` from wide field values.
    pub(crate) fn try_from_fields(
        hour: i64,
        minute: i64,
        second: i64,
        nanosecond: i64,
    ) -> TemporalJsonResult<Self> {
        let invalid = || {
            TemporalJsonError::parse()
                .with_enum(ErrorMessage::InvalidTime)
                .with_input(format!("{hour}:{minute}:{second}.{nanosecond}"))
        };
        Self::new(
            u8::try_from(hour).map_err(|_| invalid())?,
            u8::try_from(minute).map_err(|_| invalid())?,
            u8::try_from(second).map_err(|_| invalid())?,
            u32::try_from(nanosecond).map_err(|_| invalid())?,
        )
    }

    /// Creates an `IsoTime` from a second of the day in `0..86_400`.
    pub(crate) const fn from_second_of_day(second_of_day: u32, nanosecond: u32) -> Self {
        Self::new_unchecked(
            (second_of_day / 3_600) as u8,
            (second_of_day / 60 % 60) as u8,
            (second_of_day % 60) as u8,
            nanosecond,
        )
    }

    /// Returns the second of the day, ignoring the nanosecond.
    #[must_use]
    pub const fn second_of_day(&self) -> u32 {
        self.hour as u32 * 3_600 + self.minute as u32 * 60 + self.second as u32
    }
}

// ==== Utility functions ====

/// Returns whether `year` is a leap year in the proleptic Gregorian calendar.
#[inline]
#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Returns the number of days in the given month, or zero for an invalid month.
#[must_use]
pub const fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}
