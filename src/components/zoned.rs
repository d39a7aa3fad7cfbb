//! This module implements `OffsetDateTime` and `ZonedDateTime`.
//!
//! Both types store the exact instant alongside the offset in effect, so
//! the wall-clock fields are always derived and never disagree with the
//! epoch value.

use writeable::Writeable;

use crate::{
    epoch::{EpochBounds, SecondsNanos},
    iso::IsoDateTime,
    kind::TemporalKind,
    parsers::{self, FormattableDate, FormattableIxdtf, FormattableTime, FormattableTimeZone},
    provider::TimeZoneProvider,
    TemporalJsonError, TemporalJsonResult,
};

use super::{Instant, TimeZone, UtcOffset};

fn check_epoch(epoch: SecondsNanos, kind: TemporalKind) -> TemporalJsonResult<SecondsNanos> {
    EpochBounds::INSTANT
        .check_value(epoch)
        .map_err(|e| e.with_kind(kind))
}

// ==== `OffsetDateTime` ====

/// An instant observed at a fixed UTC offset.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffsetDateTime {
    epoch: SecondsNanos,
    offset: UtcOffset,
}

impl OffsetDateTime {
    /// Creates a new `OffsetDateTime` from an epoch value and an offset.
    pub fn try_new(epoch: SecondsNanos, offset: UtcOffset) -> TemporalJsonResult<Self> {
        let epoch = check_epoch(epoch, TemporalKind::OffsetDateTime)?;
        Ok(Self { epoch, offset })
    }

    /// Creates a new `OffsetDateTime` from wall-clock fields and an offset.
    pub fn from_local(local: IsoDateTime, offset: UtcOffset) -> TemporalJsonResult<Self> {
        Self::try_new(local.to_epoch(offset.seconds()), offset)
    }

    /// Parses ISO-8601 text that carries an offset or `Z`. A trailing zone
    /// annotation is accepted and ignored.
    pub fn from_ixdtf_str(source: &str) -> TemporalJsonResult<Self> {
        let record = parsers::parse_zoned_date_time(source)?;
        let (Some(date), Some(time), Some(offset)) = (record.date, record.time, record.offset)
        else {
            return Err(TemporalJsonError::parse()
                .with_message("An offset date-time requires a date, a time and an offset.")
                .with_kind(TemporalKind::OffsetDateTime)
                .with_input(source));
        };
        Self::from_local(IsoDateTime::new(date, time), offset)
    }

    #[inline]
    #[must_use]
    pub const fn epoch(&self) -> SecondsNanos {
        self.epoch
    }

    #[inline]
    #[must_use]
    pub const fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// Returns the instant of this value.
    #[must_use]
    pub fn to_instant(&self) -> Instant {
        // `epoch` was checked against the instant bounds on construction.
        Instant::new_unchecked(self.epoch)
    }

    /// Returns the wall-clock fields at this value's offset.
    pub fn to_iso_date_time(&self) -> TemporalJsonResult<IsoDateTime> {
        IsoDateTime::from_epoch(self.epoch, self.offset.seconds())
    }

    /// Returns the ISO-8601 text of this value, such as `2000-01-01T12:00:00+05:00`.
    pub fn to_ixdtf_string(&self) -> TemporalJsonResult<String> {
        let local = self.to_iso_date_time()?;
        let ixdtf = FormattableIxdtf {
            date: Some(FormattableDate::from(local.date)),
            time: Some(FormattableTime::from(local.time)),
            utc_offset: Some(self.offset.formattable()),
            timezone: None,
        };
        Ok(ixdtf.write_to_string().into_owned())
    }
}

// ==== `ZonedDateTime` ====

/// An instant observed in a zone, with the offset the zone had at that
/// instant.
#[non_exhaustive]
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct ZonedDateTime {
    epoch: SecondsNanos,
    offset: UtcOffset,
    zone: TimeZone,
}

impl ZonedDateTime {
    /// Creates a new `ZonedDateTime`, looking up the zone's offset at `epoch`.
    pub fn try_new(
        epoch: SecondsNanos,
        zone: TimeZone,
        provider: &(impl TimeZoneProvider + ?Sized),
    ) -> TemporalJsonResult<Self> {
        let epoch = check_epoch(epoch, TemporalKind::ZonedDateTime)?;
        let offset = zone.offset_at(epoch, provider)?;
        Ok(Self {
            epoch,
            offset,
            zone,
        })
    }

    /// Creates a new `ZonedDateTime` from wall-clock fields in `zone`.
    ///
    /// When the fields fall in a repeated hour, `preferred` picks the
    /// matching offset; otherwise the earlier offset is used.
    pub fn from_local(
        local: IsoDateTime,
        zone: TimeZone,
        preferred: Option<UtcOffset>,
        provider: &(impl TimeZoneProvider + ?Sized),
    ) -> TemporalJsonResult<Self> {
        let (epoch, offset) = zone.resolve_local(local, preferred, provider)?;
        let epoch = check_epoch(epoch, TemporalKind::ZonedDateTime)?;
        Ok(Self {
            epoch,
            offset,
            zone,
        })
    }

    /// Parses ISO-8601 text with an offset, a zone annotation, or both.
    ///
    /// With only an offset, the zone is that fixed offset. With a zone
    /// annotation, the offset (if any) only chooses between the two
    /// readings of a repeated local time.
    pub fn from_ixdtf_str_with_provider(
        source: &str,
        provider: &(impl TimeZoneProvider + ?Sized),
    ) -> TemporalJsonResult<Self> {
        let record = parsers::parse_zoned_date_time(source)?;
        let (Some(date), Some(time)) = (record.date, record.time) else {
            return Err(TemporalJsonError::parse()
                .with_message("A zoned date-time requires a date and a time.")
                .with_kind(TemporalKind::ZonedDateTime)
                .with_input(source));
        };
        let local = IsoDateTime::new(date, time);
        match (record.zone, record.offset) {
            (Some(zone), preferred) => {
                let zone = TimeZone::try_from_str_with_provider(&zone, provider)?;
                Self::from_local(local, zone, preferred, provider)
            }
            (None, Some(offset)) => Self::from_local(local, TimeZone::Offset(offset), None, provider),
            (None, None) => Err(TemporalJsonError::parse()
                .with_message("A zoned date-time requires an offset or a zone.")
                .with_kind(TemporalKind::ZonedDateTime)
                .with_input(source)),
        }
    }

    #[inline]
    #[must_use]
    pub const fn epoch(&self) -> SecondsNanos {
        self.epoch
    }

    #[inline]
    #[must_use]
    pub const fn offset(&self) -> UtcOffset {
        self.offset
    }

    #[inline]
    #[must_use]
    pub fn zone(&self) -> &TimeZone {
        &self.zone
    }

    /// Returns the same instant observed in `zone`.
    pub fn with_zone(
        &self,
        zone: TimeZone,
        provider: &(impl TimeZoneProvider + ?Sized),
    ) -> TemporalJsonResult<Self> {
        Self::try_new(self.epoch, zone, provider)
    }

    /// Returns the instant of this value.
    #[must_use]
    pub fn to_instant(&self) -> Instant {
        Instant::new_unchecked(self.epoch)
    }

    /// Returns this value with its zone replaced by the offset in effect.
    #[must_use]
    pub fn to_offset_date_time(&self) -> OffsetDateTime {
        OffsetDateTime {
            epoch: self.epoch,
            offset: self.offset,
        }
    }

    /// Returns the wall-clock fields at this value's offset.
    pub fn to_iso_date_time(&self) -> TemporalJsonResult<IsoDateTime> {
        IsoDateTime::from_epoch(self.epoch, self.offset.seconds())
    }

    /// Returns the ISO-8601 text of this value.
    ///
    /// A region zone is appended as `[id]` when `write_zone_id` is set.
    pub fn to_ixdtf_string(&self, write_zone_id: bool) -> TemporalJsonResult<String> {
        let local = self.to_iso_date_time()?;
        let timezone = match (&self.zone, write_zone_id) {
            (TimeZone::Named(id), true) => Some(FormattableTimeZone(id)),
            _ => None,
        };
        let ixdtf = FormattableIxdtf {
            date: Some(FormattableDate::from(local.date)),
            time: Some(FormattableTime::from(local.time)),
            utc_offset: Some(self.offset.formattable()),
            timezone,
        };
        Ok(ixdtf.write_to_string().into_owned())
    }
}
