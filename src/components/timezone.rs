//! This module implements `UtcOffset` and `TimeZone`.

use core::fmt;

use writeable::{impl_display_with_writeable, LengthHint, Writeable};

use crate::{
    epoch::SecondsNanos,
    error::ErrorMessage,
    iso::IsoDateTime,
    parsers::{self, FormattableUtcOffset},
    provider::{CandidateOffsets, TimeZoneProvider},
    TemporalJsonError, TemporalJsonResult,
};

/// The largest offset magnitude accepted, in seconds (18 hours).
const MAX_OFFSET_SECONDS: i32 = 18 * 3_600;

/// A fixed difference from UTC with second precision.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcOffset(i32);

impl UtcOffset {
    /// The zero offset.
    pub const UTC: Self = Self(0);

    /// Creates a `UtcOffset` from a number of seconds within ±18:00.
    pub fn from_seconds(seconds: i32) -> TemporalJsonResult<Self> {
        if !(-MAX_OFFSET_SECONDS..=MAX_OFFSET_SECONDS).contains(&seconds) {
            return Err(TemporalJsonError::parse()
                .with_enum(ErrorMessage::InvalidOffset)
                .with_input(seconds.to_string()));
        }
        Ok(Self(seconds))
    }

    /// Creates a `UtcOffset` from a sign and its hour, minute and second parts.
    pub fn from_hms(negative: bool, hour: u8, minute: u8, second: u8) -> TemporalJsonResult<Self> {
        if minute > 59 || second > 59 {
            return Err(TemporalJsonError::parse().with_enum(ErrorMessage::InvalidOffset));
        }
        let magnitude = i32::from(hour) * 3_600 + i32::from(minute) * 60 + i32::from(second);
        Self::from_seconds(if negative { -magnitude } else { magnitude })
    }

    /// Returns the offset in seconds.
    #[inline]
    #[must_use]
    pub const fn seconds(&self) -> i32 {
        self.0
    }

    pub(crate) fn formattable(&self) -> FormattableUtcOffset {
        FormattableUtcOffset::from_seconds(self.0)
    }
}

impl Writeable for UtcOffset {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        self.formattable().write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        self.formattable().writeable_length_hint()
    }
}

impl_display_with_writeable!(UtcOffset);

/// A zone: either a fixed offset or a region identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimeZone {
    /// A fixed UTC offset.
    Offset(UtcOffset),
    /// A normalized region identifier, resolved through a `TimeZoneProvider`.
    Named(String),
}

impl Default for TimeZone {
    fn default() -> Self {
        Self::UTC
    }
}

impl From<UtcOffset> for TimeZone {
    fn from(offset: UtcOffset) -> Self {
        Self::Offset(offset)
    }
}

impl TimeZone {
    /// The zero offset zone.
    pub const UTC: Self = Self::Offset(UtcOffset::UTC);

    /// Parses a zone from `Z`, an offset string or a region identifier.
    pub fn try_from_str_with_provider(
        source: &str,
        provider: &(impl TimeZoneProvider + ?Sized),
    ) -> TemporalJsonResult<Self> {
        match parsers::parse_zone_text(source)? {
            parsers::ZoneText::Offset(offset) => Ok(Self::Offset(offset)),
            parsers::ZoneText::Name(name) => provider.normalize_identifier(name).map(Self::Named),
        }
    }

    /// Returns the zone of the host system.
    #[cfg(feature = "sys")]
    pub fn system() -> TemporalJsonResult<Self> {
        crate::sys::get_system_timezone()
    }

    /// Returns the region identifier, if this is a named zone.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Offset(_) => None,
        }
    }

    /// Returns the offset of this zone at `epoch`.
    pub fn offset_at(
        &self,
        epoch: SecondsNanos,
        provider: &(impl TimeZoneProvider + ?Sized),
    ) -> TemporalJsonResult<UtcOffset> {
        match self {
            Self::Offset(offset) => Ok(*offset),
            Self::Named(name) => provider.offset_for_epoch_seconds(name, epoch.seconds()),
        }
    }

    /// Resolves a local date-time in this zone to an epoch value and the
    /// offset in effect.
    ///
    /// A local time skipped by a transition is moved forward by the length
    /// of the gap. A repeated local time takes the earlier offset unless
    /// `preferred` names the later one.
    pub fn resolve_local(
        &self,
        local: IsoDateTime,
        preferred: Option<UtcOffset>,
        provider: &(impl TimeZoneProvider + ?Sized),
    ) -> TemporalJsonResult<(SecondsNanos, UtcOffset)> {
        let name = match self {
            Self::Offset(offset) => return Ok((local.to_epoch(offset.seconds()), *offset)),
            Self::Named(name) => name,
        };
        match provider.candidate_offsets(name, local)? {
            CandidateOffsets::Unambiguous(offset) => Ok((local.to_epoch(offset.seconds()), offset)),
            CandidateOffsets::Gap { before, after } => Ok((local.to_epoch(before.seconds()), after)),
            CandidateOffsets::Fold { before, after } => {
                let offset = if preferred == Some(after) { after } else { before };
                Ok((local.to_epoch(offset.seconds()), offset))
            }
        }
    }
}

impl Writeable for TimeZone {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        match self {
            Self::Offset(offset) => offset.write_to(sink),
            Self::Named(name) => sink.write_str(name),
        }
    }

    fn writeable_length_hint(&self) -> LengthHint {
        match self {
            Self::Offset(offset) => offset.writeable_length_hint(),
            Self::Named(name) => LengthHint::exact(name.len()),
        }
    }
}

impl_display_with_writeable!(TimeZone);

#[cfg(test)]
mod tests {
    use super::{TimeZone, UtcOffset};
    use crate::{
        error::ErrorKind,
        iso::{IsoDate, IsoDateTime, IsoTime},
        provider::FixedOffsetProvider,
    };
    use writeable::assert_writeable_eq;

    #[test]
    fn offset_text() {
        assert_writeable_eq!(UtcOffset::UTC, "Z");
        assert_writeable_eq!(UtcOffset::from_seconds(5 * 3_600).unwrap(), "+05:00");
        assert_writeable_eq!(UtcOffset::from_seconds(-(9 * 3_600 + 30 * 60)).unwrap(), "-09:30");
        assert_writeable_eq!(UtcOffset::from_seconds(3_600 + 1).unwrap(), "+01:00:01");
        assert!(UtcOffset::from_seconds(18 * 3_600 + 1).is_err());
    }

    #[test]
    fn parses_zone_text() {
        let provider = FixedOffsetProvider;
        assert_eq!(
            TimeZone::try_from_str_with_provider("Z", &provider).unwrap(),
            TimeZone::UTC
        );
        assert_eq!(
            TimeZone::try_from_str_with_provider("-05:00", &provider).unwrap(),
            TimeZone::Offset(UtcOffset::from_seconds(-5 * 3_600).unwrap())
        );
        assert_eq!(
            TimeZone::try_from_str_with_provider("utc", &provider).unwrap(),
            TimeZone::Named("UTC".into())
        );
        let err = TimeZone::try_from_str_with_provider("Europe/Paris", &provider).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
        assert!(TimeZone::try_from_str_with_provider("+25:00", &provider).is_err());
        assert!(TimeZone::try_from_str_with_provider("", &provider).is_err());
    }

    #[test]
    fn fixed_offsets_resolve_directly() {
        let zone = TimeZone::Offset(UtcOffset::from_seconds(3_600).unwrap());
        let local = IsoDateTime::new(
            IsoDate::new(2000, 1, 1).unwrap(),
            IsoTime::new(12, 0, 0, 0).unwrap(),
        );
        let (epoch, offset) = zone.resolve_local(local, None, &FixedOffsetProvider).unwrap();
        assert_eq!(epoch.seconds(), 946_724_400);
        assert_eq!(offset.seconds(), 3_600);
    }
}
