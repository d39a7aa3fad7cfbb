//! The `TimeZoneProvider` trait.
//!
//! Fixed offsets never reach a provider. Region zones are resolved through
//! this seam, so the codec itself carries no zone rules.

use crate::{components::UtcOffset, error::ErrorMessage, iso::IsoDateTime, TemporalJsonError, TemporalJsonResult};

/// The offsets a region zone may have at a local date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOffsets {
    /// Exactly one offset applies.
    Unambiguous(UtcOffset),
    /// The local date-time was skipped by a transition.
    Gap { before: UtcOffset, after: UtcOffset },
    /// The local date-time occurs twice around a transition.
    Fold { before: UtcOffset, after: UtcOffset },
}

/// The `TimeZoneProvider` trait provides the methods a source of region
/// zone rules must implement.
pub trait TimeZoneProvider {
    /// Validates `identifier` and returns its normalized spelling.
    fn normalize_identifier(&self, identifier: &str) -> TemporalJsonResult<String>;

    /// Returns the offset of the zone at the given epoch second.
    fn offset_for_epoch_seconds(&self, identifier: &str, epoch_seconds: i64) -> TemporalJsonResult<UtcOffset>;

    /// Returns the offsets the zone may have at a local date-time.
    fn candidate_offsets(&self, identifier: &str, local: IsoDateTime) -> TemporalJsonResult<CandidateOffsets>;
}

impl<P: TimeZoneProvider + ?Sized> TimeZoneProvider for &P {
    fn normalize_identifier(&self, identifier: &str) -> TemporalJsonResult<String> {
        (**self).normalize_identifier(identifier)
    }

    fn offset_for_epoch_seconds(&self, identifier: &str, epoch_seconds: i64) -> TemporalJsonResult<UtcOffset> {
        (**self).offset_for_epoch_seconds(identifier, epoch_seconds)
    }

    fn candidate_offsets(&self, identifier: &str, local: IsoDateTime) -> TemporalJsonResult<CandidateOffsets> {
        (**self).candidate_offsets(identifier, local)
    }
}

/// A provider without zone rules: only `UTC` is accepted as a named zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedOffsetProvider;

impl FixedOffsetProvider {
    fn check(identifier: &str) -> TemporalJsonResult<()> {
        if identifier.eq_ignore_ascii_case("UTC") || identifier.eq_ignore_ascii_case("Etc/UTC") {
            return Ok(());
        }
        Err(TemporalJsonError::parse()
            .with_enum(ErrorMessage::UnknownTimeZone)
            .with_input(identifier))
    }
}

impl TimeZoneProvider for FixedOffsetProvider {
    fn normalize_identifier(&self, identifier: &str) -> TemporalJsonResult<String> {
        Self::check(identifier)?;
        Ok(String::from("UTC"))
    }

    fn offset_for_epoch_seconds(&self, identifier: &str, _: i64) -> TemporalJsonResult<UtcOffset> {
        Self::check(identifier)?;
        Ok(UtcOffset::UTC)
    }

    fn candidate_offsets(&self, identifier: &str, _: IsoDateTime) -> TemporalJsonResult<CandidateOffsets> {
        Self::check(identifier)?;
        Ok(CandidateOffsets::Unambiguous(UtcOffset::UTC))
    }
}

#[cfg(test)]
mod tests {
    use super::{CandidateOffsets, FixedOffsetProvider, TimeZoneProvider};
    use crate::{components::UtcOffset, error::ErrorKind, iso::IsoDateTime};

    #[test]
    fn fixed_provider_only_knows_utc() {
        let provider = FixedOffsetProvider;
        assert_eq!(provider.normalize_identifier("utc").unwrap(), "UTC");
        assert_eq!(provider.offset_for_epoch_seconds("Etc/UTC", 0).unwrap(), UtcOffset::UTC);
        assert_eq!(
            provider
                .candidate_offsets("UTC", IsoDateTime::default())
                .unwrap(),
            CandidateOffsets::Unambiguous(UtcOffset::UTC)
        );

        let err = provider.normalize_identifier("America/Chicago").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
        assert_eq!(err.input(), Some("America/Chicago"));
    }
}
