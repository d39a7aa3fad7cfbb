//! The `TemporalKind` tag and its per-kind constants.
//!
//! Every value handled by the codec is one of a small set of kinds. The
//! kind alone decides which wire shapes are legal, which array fields are
//! written and whether a numeric token means an epoch.

use core::fmt;

/// The tagged kind of a temporal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalKind {
    /// A point on the UTC time line with no zone.
    Instant,
    /// A date-time with a fixed UTC offset.
    OffsetDateTime,
    /// A date-time with a region-based zone.
    ZonedDateTime,
    /// A calendar date.
    PlainDate,
    /// A wall-clock time.
    PlainTime,
    /// A calendar date and wall-clock time.
    PlainDateTime,
    /// A proleptic ISO year.
    Year,
    /// A year and month.
    YearMonth,
    /// A month and day.
    MonthDay,
    /// An exact length of time in seconds and nanoseconds.
    Duration,
    /// A calendar length in years, months and days.
    Period,
    /// A zone identifier or fixed offset.
    TimeZone,
}

/// Constant facts about a `TemporalKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindTraits {
    /// Whether the kind reads an ordered field array shape.
    pub array_fields: bool,
    /// Whether a numeric token is an epoch value (seconds or milliseconds).
    pub numeric_epoch: bool,
    /// Whether the value carries an offset or zone to reconcile.
    pub zone_aware: bool,
    /// Whether a caller supplied format pattern applies.
    pub accepts_pattern: bool,
    /// Whether `AsTimestamp` has any effect on the written shape.
    pub timestamp_shape: bool,
    /// The name written in type envelopes.
    pub type_name: &'static str,
}

impl TemporalKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Instant,
        Self::OffsetDateTime,
        Self::ZonedDateTime,
        Self::PlainDate,
        Self::PlainTime,
        Self::PlainDateTime,
        Self::Year,
        Self::YearMonth,
        Self::MonthDay,
        Self::Duration,
        Self::Period,
        Self::TimeZone,
    ];

    /// Returns the constant table entry for this kind.
    #[must_use]
    pub const fn traits(self) -> KindTraits {
        const fn entry(
            array_fields: bool,
            numeric_epoch: bool,
            zone_aware: bool,
            accepts_pattern: bool,
            timestamp_shape: bool,
            type_name: &'static str,
        ) -> KindTraits {
            KindTraits {
                array_fields,
                numeric_epoch,
                zone_aware,
                accepts_pattern,
                timestamp_shape,
                type_name,
            }
        }
        match self {
            Self::Instant => entry(false, true, false, true, true, "temporal_json::Instant"),
            Self::OffsetDateTime => entry(true, true, true, true, true, "temporal_json::OffsetDateTime"),
            Self::ZonedDateTime => entry(true, true, true, true, true, "temporal_json::ZonedDateTime"),
            Self::PlainDate => entry(true, false, false, true, true, "temporal_json::PlainDate"),
            Self::PlainTime => entry(true, false, false, true, true, "temporal_json::PlainTime"),
            Self::PlainDateTime => entry(true, false, false, true, true, "temporal_json::PlainDateTime"),
            Self::Year => entry(true, false, false, true, true, "temporal_json::Year"),
            Self::YearMonth => entry(true, false, false, true, true, "temporal_json::PlainYearMonth"),
            Self::MonthDay => entry(true, false, false, true, true, "temporal_json::PlainMonthDay"),
            Self::Duration => entry(false, true, false, false, true, "temporal_json::Duration"),
            Self::Period => entry(false, false, false, false, false, "temporal_json::Period"),
            Self::TimeZone => entry(false, false, false, false, false, "temporal_json::TimeZone"),
        }
    }

    /// Returns whether the kind has an ordered field array shape.
    #[inline]
    #[must_use]
    pub const fn supports_array(self) -> bool {
        self.traits().array_fields
    }

    /// Returns whether a numeric token is read as an epoch value.
    #[inline]
    #[must_use]
    pub const fn is_epoch_based(self) -> bool {
        self.traits().numeric_epoch
    }

    /// Returns whether the kind carries an offset or zone.
    #[inline]
    #[must_use]
    pub const fn is_zone_aware(self) -> bool {
        self.traits().zone_aware
    }

    /// Returns whether a format pattern applies to the kind.
    #[inline]
    #[must_use]
    pub const fn accepts_pattern(self) -> bool {
        self.traits().accepts_pattern
    }

    /// Returns the type envelope name of the kind.
    #[inline]
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        self.traits().type_name
    }

    /// Looks up a kind from its type envelope name.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }
}

impl fmt::Display for TemporalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
