//! A `TimeZoneProvider` backed by the IANA time zone database compiled
//! into the binary.
//!
//! Zone rules come from `jiff`'s bundled copy of the database, so lookups
//! never touch the file system.
//!
//! ```rust
//! use temporal_json::provider::TimeZoneProvider;
//! use temporal_json::tzdb::CompiledTzdbProvider;
//!
//! let provider = CompiledTzdbProvider::default();
//! let offset = provider.offset_for_epoch_seconds("America/Chicago", 0).unwrap();
//! assert_eq!(offset.seconds(), -6 * 3_600);
//! ```

use jiff::{
    civil,
    tz::{self, AmbiguousOffset},
    Timestamp,
};

use crate::{
    components::UtcOffset,
    error::ErrorMessage,
    iso::IsoDateTime,
    provider::{CandidateOffsets, TimeZoneProvider},
    TemporalJsonError, TemporalJsonResult,
};

/// Years `jiff` can represent as civil date-times.
const CIVIL_YEARS: core::ops::RangeInclusive<i32> = -9999..=9999;

/// A `TimeZoneProvider` using the compiled IANA time zone database.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompiledTzdbProvider;

impl CompiledTzdbProvider {
    fn get(&self, identifier: &str) -> TemporalJsonResult<tz::TimeZone> {
        tz::TimeZone::get(identifier).map_err(|_| {
            TemporalJsonError::parse()
                .with_enum(ErrorMessage::UnknownTimeZone)
                .with_input(identifier)
        })
    }
}

fn to_utc_offset(offset: tz::Offset) -> TemporalJsonResult<UtcOffset> {
    UtcOffset::from_seconds(offset.seconds())
}

impl TimeZoneProvider for CompiledTzdbProvider {
    fn normalize_identifier(&self, identifier: &str) -> TemporalJsonResult<String> {
        let zone = self.get(identifier)?;
        Ok(zone.iana_name().unwrap_or(identifier).to_owned())
    }

    fn offset_for_epoch_seconds(&self, identifier: &str, epoch_seconds: i64) -> TemporalJsonResult<UtcOffset> {
        let zone = self.get(identifier)?;
        // Outside of the supported range the rules at the nearest end apply.
        let clamped = epoch_seconds.clamp(Timestamp::MIN.as_second(), Timestamp::MAX.as_second());
        let timestamp = Timestamp::from_second(clamped)
            .map_err(|e| TemporalJsonError::overflow().with_message(e.to_string()))?;
        to_utc_offset(zone.to_offset(timestamp))
    }

    fn candidate_offsets(&self, identifier: &str, local: IsoDateTime) -> TemporalJsonResult<CandidateOffsets> {
        if !CIVIL_YEARS.contains(&local.date.year) {
            let offset = self.offset_for_epoch_seconds(identifier, local.to_epoch(0).seconds())?;
            return Ok(CandidateOffsets::Unambiguous(offset));
        }
        let zone = self.get(identifier)?;
        let datetime = civil::DateTime::new(
            local.date.year as i16,
            local.date.month as i8,
            local.date.day as i8,
            local.time.hour as i8,
            local.time.minute as i8,
            local.time.second as i8,
            local.time.nanosecond as i32,
        )
        .map_err(|e| TemporalJsonError::parse().with_message(e.to_string()))?;

        #[cfg(feature = "log")]
        log::trace!("resolving {datetime} in {identifier}");

        Ok(match zone.to_ambiguous_timestamp(datetime).offset() {
            AmbiguousOffset::Unambiguous { offset } => CandidateOffsets::Unambiguous(to_utc_offset(offset)?),
            AmbiguousOffset::Gap { before, after } => CandidateOffsets::Gap {
                before: to_utc_offset(before)?,
                after: to_utc_offset(after)?,
            },
            AmbiguousOffset::Fold { before, after } => CandidateOffsets::Fold {
                before: to_utc_offset(before)?,
                after: to_utc_offset(after)?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::CompiledTzdbProvider;
    use crate::{
        components::UtcOffset,
        error::ErrorKind,
        iso::{IsoDate, IsoDateTime, IsoTime},
        provider::{CandidateOffsets, TimeZoneProvider},
    };

    fn local(year: i32, month: u8, day: u8, hour: u8, minute: u8) -> IsoDateTime {
        IsoDateTime::new(
            IsoDate::new(year, month, day).unwrap(),
            IsoTime::new(hour, minute, 0, 0).unwrap(),
        )
    }

    fn hours(h: i32) -> UtcOffset {
        UtcOffset::from_seconds(h * 3_600).unwrap()
    }

    #[test]
    fn normalizes_identifiers() {
        let provider = CompiledTzdbProvider;
        assert_eq!(
            provider.normalize_identifier("America/Chicago").unwrap(),
            "America/Chicago"
        );
        let err = provider.normalize_identifier("Mars/Olympus_Mons").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
    }

    #[test]
    fn offsets_follow_daylight_saving() {
        let provider = CompiledTzdbProvider;
        // 2020-01-01T00:00Z and 2020-07-01T00:00Z
        assert_eq!(
            provider.offset_for_epoch_seconds("America/New_York", 1_577_836_800).unwrap(),
            hours(-5)
        );
        assert_eq!(
            provider.offset_for_epoch_seconds("America/New_York", 1_593_561_600).unwrap(),
            hours(-4)
        );
    }

    #[test]
    fn gaps_and_folds() {
        let provider = CompiledTzdbProvider;
        assert_eq!(
            provider
                .candidate_offsets("America/New_York", local(2020, 3, 8, 2, 30))
                .unwrap(),
            CandidateOffsets::Gap {
                before: hours(-5),
                after: hours(-4)
            }
        );
        assert_eq!(
            provider
                .candidate_offsets("America/New_York", local(2020, 11, 1, 1, 30))
                .unwrap(),
            CandidateOffsets::Fold {
                before: hours(-4),
                after: hours(-5)
            }
        );
        assert_eq!(
            provider
                .candidate_offsets("America/New_York", local(2020, 6, 1, 12, 0))
                .unwrap(),
            CandidateOffsets::Unambiguous(hours(-4))
        );
    }
}
