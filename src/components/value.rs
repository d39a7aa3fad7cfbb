//! The `TemporalValue` union of all value types.

use crate::kind::TemporalKind;

use super::{
    Duration, Instant, OffsetDateTime, Period, PlainDate, PlainDateTime, PlainMonthDay, PlainTime,
    PlainYearMonth, TimeZone, Year, ZonedDateTime,
};

/// A value of any `TemporalKind`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TemporalValue {
    Instant(Instant),
    OffsetDateTime(OffsetDateTime),
    ZonedDateTime(ZonedDateTime),
    PlainDate(PlainDate),
    PlainTime(PlainTime),
    PlainDateTime(PlainDateTime),
    Year(Year),
    YearMonth(PlainYearMonth),
    MonthDay(PlainMonthDay),
    Duration(Duration),
    Period(Period),
    TimeZone(TimeZone),
}

impl TemporalValue {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> TemporalKind {
        match self {
            Self::Instant(_) => TemporalKind::Instant,
            Self::OffsetDateTime(_) => TemporalKind::OffsetDateTime,
            Self::ZonedDateTime(_) => TemporalKind::ZonedDateTime,
            Self::PlainDate(_) => TemporalKind::PlainDate,
            Self::PlainTime(_) => TemporalKind::PlainTime,
            Self::PlainDateTime(_) => TemporalKind::PlainDateTime,
            Self::Year(_) => TemporalKind::Year,
            Self::YearMonth(_) => TemporalKind::YearMonth,
            Self::MonthDay(_) => TemporalKind::MonthDay,
            Self::Duration(_) => TemporalKind::Duration,
            Self::Period(_) => TemporalKind::Period,
            Self::TimeZone(_) => TemporalKind::TimeZone,
        }
    }
}

macro_rules! impl_from_component {
    ($($variant:ident => $ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for TemporalValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

impl_from_component! {
    Instant => Instant,
    OffsetDateTime => OffsetDateTime,
    ZonedDateTime => ZonedDateTime,
    PlainDate => PlainDate,
    PlainTime => PlainTime,
    PlainDateTime => PlainDateTime,
    Year => Year,
    YearMonth => PlainYearMonth,
    MonthDay => PlainMonthDay,
    Duration => Duration,
    Period => Period,
    TimeZone => TimeZone,
}

#[cfg(test)]
mod tests {
    use super::TemporalValue;
    use crate::{
        components::{Duration, Period, PlainDate, TimeZone},
        kind::TemporalKind,
    };

    #[test]
    fn kinds() {
        assert_eq!(TemporalValue::from(PlainDate::default()).kind(), TemporalKind::PlainDate);
        assert_eq!(TemporalValue::from(Duration::ZERO).kind(), TemporalKind::Duration);
        assert_eq!(TemporalValue::from(Period::ZERO).kind(), TemporalKind::Period);
        assert_eq!(TemporalValue::from(TimeZone::UTC).kind(), TemporalKind::TimeZone);
    }
}
