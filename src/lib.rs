//! The `temporal_json` crate implements the JSON wire shapes of temporal
//! values: instants, offset and zoned date-times, local dates and times,
//! years, durations, periods and zone identifiers.
//!
//! ```rust
//! use temporal_json::{
//!     options::{Feature, ReadConfig, WriteConfig},
//!     provider::FixedOffsetProvider,
//!     PlainTime, TemporalCodec, TemporalKind,
//! };
//! use serde_json::json;
//!
//! let codec = TemporalCodec::new(FixedOffsetProvider);
//! let time = PlainTime::new(9, 22, 0, 57).unwrap();
//!
//! // Timestamps are written as ordered field arrays for clock values.
//! let json = codec.serialize(&time.into(), &WriteConfig::default()).unwrap();
//! assert_eq!(json, json!([9, 22, 0, 57]));
//!
//! // Text is written when `AsTimestamp` is turned off.
//! let text = WriteConfig::default().without(Feature::AsTimestamp);
//! assert_eq!(codec.serialize(&time.into(), &text).unwrap(), "09:22:00.000000057");
//!
//! let decoded = codec
//!     .deserialize(TemporalKind::PlainTime, &json, &ReadConfig::default())
//!     .unwrap();
//! assert_eq!(decoded, Some(time.into()));
//! ```
//!
//! Every value kind has a text shape (ISO-8601, or a caller supplied
//! pattern) and, where it makes sense, numeric shapes: decimal epoch
//! seconds with nanosecond precision, integer epoch milliseconds, or an
//! ordered array of fields. `WriteConfig` and `ReadConfig` flag sets decide
//! which shape is written and which shapes are accepted.
//!
//! Region zones are resolved through a `TimeZoneProvider`. With the default
//! `tzdb` feature, `CompiledTzdbProvider` uses the IANA time zone database
//! bundled with `jiff`.
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    clippy::module_name_repetitions,
    clippy::redundant_pub_crate,
    clippy::too_many_lines,
    clippy::missing_errors_doc,
    clippy::option_if_let_else,

    // Field values are range checked before narrowing.
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
)]

pub mod codec;
pub mod components;
pub mod decimal;
pub mod epoch;
pub mod error;
pub mod fields;
pub mod iso;
pub mod kind;
pub mod options;
pub mod pattern;
pub mod provider;
pub mod reconcile;
pub mod shape;

mod parsers;

#[cfg(feature = "sys")]
pub(crate) mod sys;

#[cfg(feature = "tzdb")]
pub mod tzdb;

#[doc(inline)]
pub use error::TemporalJsonError;

/// The `temporal_json` result type.
pub type TemporalJsonResult<T> = Result<T, TemporalJsonError>;

#[doc(inline)]
pub use codec::TemporalCodec;
#[doc(inline)]
pub use kind::TemporalKind;
#[doc(inline)]
pub use pattern::FormatPattern;

pub use crate::components::{
    Duration, Instant, OffsetDateTime, Period, PlainDate, PlainDateTime, PlainMonthDay, PlainTime,
    PlainYearMonth, TemporalValue, TimeZone, UtcOffset, Year, ZonedDateTime,
};
