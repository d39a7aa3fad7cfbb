//! Serialization and deserialization feature flags.
//!
//! `WriteConfig` and `ReadConfig` are immutable flag sets. Every combination
//! of flags is valid and maps to exactly one wire shape per kind.

use core::fmt;

/// A single on/off feature consulted by the codec.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Write numeric shapes (epoch numbers, field arrays) instead of text.
    AsTimestamp = 0,
    /// Use decimal epoch seconds and nanosecond array fields instead of
    /// integer milliseconds.
    TimestampsAsNanoseconds = 1,
    /// Append the region zone id to zoned text.
    WriteZoneId = 2,
    /// Re-express decoded zone-aware values in the context zone.
    AdjustToContextZone = 3,
    /// Accept a single element array in place of its element.
    UnwrapSingleElementArray = 4,
    /// Accept an empty array as `null`.
    EmptyArrayAsNull = 5,
}

impl Feature {
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AsTimestamp => "AS_TIMESTAMP",
            Self::TimestampsAsNanoseconds => "TIMESTAMPS_AS_NANOSECONDS",
            Self::WriteZoneId => "WRITE_ZONE_ID",
            Self::AdjustToContextZone => "ADJUST_TO_CONTEXT_ZONE",
            Self::UnwrapSingleElementArray => "UNWRAP_SINGLE_ELEMENT_ARRAY",
            Self::EmptyArrayAsNull => "EMPTY_ARRAY_AS_NULL",
        }
        .fmt(f)
    }
}

const DEFAULT_FLAGS: u8 = Feature::AsTimestamp.bit()
    | Feature::TimestampsAsNanoseconds.bit()
    | Feature::AdjustToContextZone.bit();

macro_rules! flag_set {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(u8);

        impl $name {
            /// A flag set with every feature disabled.
            pub const NONE: Self = Self(0);

            /// Returns a copy with `feature` enabled.
            #[inline]
            #[must_use]
            pub const fn with(self, feature: Feature) -> Self {
                Self(self.0 | feature.bit())
            }

            /// Returns a copy with `feature` disabled.
            #[inline]
            #[must_use]
            pub const fn without(self, feature: Feature) -> Self {
                Self(self.0 & !feature.bit())
            }

            /// Returns a copy with `feature` set to `enabled`.
            #[inline]
            #[must_use]
            pub const fn set(self, feature: Feature, enabled: bool) -> Self {
                if enabled {
                    self.with(feature)
                } else {
                    self.without(feature)
                }
            }

            /// Returns whether `feature` is enabled.
            #[inline]
            #[must_use]
            pub const fn is_enabled(&self, feature: Feature) -> bool {
                self.0 & feature.bit() != 0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self(DEFAULT_FLAGS)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut list = f.debug_set();
                for feature in ALL_FEATURES {
                    if self.is_enabled(feature) {
                        list.entry(&feature);
                    }
                }
                list.finish()
            }
        }
    };
}

const ALL_FEATURES: [Feature; 6] = [
    Feature::AsTimestamp,
    Feature::TimestampsAsNanoseconds,
    Feature::WriteZoneId,
    Feature::AdjustToContextZone,
    Feature::UnwrapSingleElementArray,
    Feature::EmptyArrayAsNull,
];

flag_set!(
    /// Flags consulted when writing a value.
    WriteConfig
);

flag_set!(
    /// Flags consulted when reading a value.
    ReadConfig
);
