//! Zone reconciliation for decoded zone-aware values.
//!
//! A decoded `OffsetDateTime` or `ZonedDateTime` either keeps the offset or
//! zone it was written with, or is re-expressed in the caller's context
//! zone. The instant never changes; only the attached zone does.

use crate::{
    components::{Instant, OffsetDateTime, TemporalValue, TimeZone, ZonedDateTime},
    epoch::SecondsNanos,
    kind::TemporalKind,
    options::{Feature, ReadConfig},
    provider::TimeZoneProvider,
    TemporalJsonError, TemporalJsonResult,
};

/// The caller supplied inputs to reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationContext {
    context_zone: Option<TimeZone>,
    adjust: bool,
}

impl ReconciliationContext {
    /// Creates a new context.
    #[must_use]
    pub const fn new(context_zone: Option<TimeZone>, adjust: bool) -> Self {
        Self { context_zone, adjust }
    }

    /// Creates a context from a read configuration.
    #[must_use]
    pub fn from_config(context_zone: Option<&TimeZone>, config: &ReadConfig) -> Self {
        Self::new(
            context_zone.cloned(),
            config.is_enabled(Feature::AdjustToContextZone),
        )
    }

    #[inline]
    #[must_use]
    pub fn context_zone(&self) -> Option<&TimeZone> {
        self.context_zone.as_ref()
    }

    #[inline]
    #[must_use]
    pub const fn adjust(&self) -> bool {
        self.adjust
    }

    /// The zone used when the input carried none: the context zone, or UTC.
    #[must_use]
    pub fn default_zone(&self) -> TimeZone {
        self.context_zone.clone().unwrap_or(TimeZone::UTC)
    }

    /// Returns the zone to attach to a decoded value.
    ///
    /// Input without a zone takes the default zone. With `adjust` set the
    /// context zone (or UTC when there is none) replaces the embedded zone;
    /// otherwise the embedded zone is kept exactly as parsed.
    #[must_use]
    pub fn effective_zone(&self, embedded: Option<&TimeZone>) -> TimeZone {
        match embedded {
            Some(zone) if !self.adjust => zone.clone(),
            _ => self.default_zone(),
        }
    }
}

/// Attaches the effective zone to an instant decoded for `kind`.
pub fn reconcile(
    kind: TemporalKind,
    epoch: SecondsNanos,
    embedded: Option<&TimeZone>,
    context: &ReconciliationContext,
    provider: &(impl TimeZoneProvider + ?Sized),
) -> TemporalJsonResult<TemporalValue> {
    let zone = context.effective_zone(embedded);
    #[cfg(feature = "log")]
    if embedded.is_some_and(|embedded| *embedded != zone) {
        log::debug!("re-expressing {kind:?} from {embedded:?} in context zone {zone}");
    }
    match kind {
        TemporalKind::Instant => Instant::try_new(epoch).map(Into::into),
        TemporalKind::OffsetDateTime => {
            let offset = zone.offset_at(epoch, provider)?;
            OffsetDateTime::try_new(epoch, offset).map(Into::into)
        }
        TemporalKind::ZonedDateTime => ZonedDateTime::try_new(epoch, zone, provider).map(Into::into),
        _ => Err(TemporalJsonError::structural()
            .with_message("Only instant-like kinds are reconciled against a zone.")
            .with_kind(kind)),
    }
}

#[cfg(test)]
mod tests {
    use super::{reconcile, ReconciliationContext};
    use crate::{
        components::{OffsetDateTime, TemporalValue, TimeZone, UtcOffset},
        epoch::SecondsNanos,
        error::ErrorKind,
        kind::TemporalKind,
        options::{Feature, ReadConfig},
        provider::FixedOffsetProvider,
    };

    fn offset(hours: i32) -> TimeZone {
        TimeZone::Offset(UtcOffset::from_seconds(hours * 3_600).unwrap())
    }

    #[test]
    fn effective_zone_table() {
        let plus_five = offset(5);
        let context = offset(-3);

        let keep = ReconciliationContext::new(Some(context.clone()), false);
        assert_eq!(keep.effective_zone(Some(&plus_five)), plus_five);
        assert_eq!(keep.effective_zone(None), context);

        let adjust = ReconciliationContext::new(Some(context.clone()), true);
        assert_eq!(adjust.effective_zone(Some(&plus_five)), context);
        assert_eq!(adjust.effective_zone(None), context);

        let bare = ReconciliationContext::new(None, false);
        assert_eq!(bare.effective_zone(Some(&plus_five)), plus_five);
        assert_eq!(bare.effective_zone(None), TimeZone::UTC);

        let adjust_without_context = ReconciliationContext::new(None, true);
        assert_eq!(adjust_without_context.effective_zone(Some(&plus_five)), TimeZone::UTC);
    }

    #[test]
    fn from_config_reads_the_adjust_flag() {
        let config = ReadConfig::default();
        assert!(ReconciliationContext::from_config(None, &config).adjust());
        let config = config.without(Feature::AdjustToContextZone);
        let context = ReconciliationContext::from_config(Some(&TimeZone::UTC), &config);
        assert!(!context.adjust());
        assert_eq!(context.context_zone(), Some(&TimeZone::UTC));
    }

    #[test]
    fn reconciling_keeps_the_instant() {
        let epoch = SecondsNanos::try_new(946_710_000, 0).unwrap();
        let plus_five = offset(5);

        let keep = ReconciliationContext::new(Some(offset(-3)), false);
        let value = reconcile(
            TemporalKind::OffsetDateTime,
            epoch,
            Some(&plus_five),
            &keep,
            &FixedOffsetProvider,
        )
        .unwrap();
        let TemporalValue::OffsetDateTime(kept) = value else {
            panic!("unexpected value {value:?}");
        };
        assert_eq!(kept.offset().seconds(), 5 * 3_600);

        let adjust = ReconciliationContext::new(Some(offset(-3)), true);
        let value = reconcile(
            TemporalKind::OffsetDateTime,
            epoch,
            Some(&plus_five),
            &adjust,
            &FixedOffsetProvider,
        )
        .unwrap();
        let TemporalValue::OffsetDateTime(adjusted) = value else {
            panic!("unexpected value {value:?}");
        };
        assert_eq!(adjusted.offset().seconds(), -3 * 3_600);
        assert_eq!(adjusted.epoch(), kept.epoch());
        assert_eq!(
            adjusted,
            OffsetDateTime::try_new(epoch, UtcOffset::from_seconds(-3 * 3_600).unwrap()).unwrap()
        );
    }

    #[test]
    fn zoned_values_take_the_zone() {
        let epoch = SecondsNanos::try_new(0, 5).unwrap();
        let context = ReconciliationContext::new(None, true);
        let value = reconcile(TemporalKind::ZonedDateTime, epoch, None, &context, &FixedOffsetProvider).unwrap();
        let TemporalValue::ZonedDateTime(zoned) = value else {
            panic!("unexpected value {value:?}");
        };
        assert_eq!(zoned.zone(), &TimeZone::UTC);
        assert_eq!(zoned.epoch(), epoch);
    }

    #[test]
    fn plain_kinds_are_rejected() {
        let err = reconcile(
            TemporalKind::PlainDate,
            SecondsNanos::ZERO,
            None,
            &ReconciliationContext::default(),
            &FixedOffsetProvider,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralMismatch);
    }
}
