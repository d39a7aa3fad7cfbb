//! The value types read and written by the codec.
//!
//! Each type is a thin validated wrapper over the ISO records or a
//! `SecondsNanos` pair, with ISO-8601 parsing through `FromStr` (or a
//! provider-aware constructor for zone-carrying types) and rendering
//! through `Writeable`.

mod date;
mod datetime;
mod duration;
mod instant;
mod time;
mod timezone;
mod value;
mod zoned;

#[doc(inline)]
pub use date::{PlainDate, PlainMonthDay, PlainYearMonth, Year};
#[doc(inline)]
pub use datetime::PlainDateTime;
#[doc(inline)]
pub use duration::{Duration, Period};
#[doc(inline)]
pub use instant::Instant;
#[doc(inline)]
pub use time::PlainTime;
#[doc(inline)]
pub use timezone::{TimeZone, UtcOffset};
#[doc(inline)]
pub use value::TemporalValue;
#[doc(inline)]
pub use zoned::{OffsetDateTime, ZonedDateTime};
