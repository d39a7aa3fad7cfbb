//! This module implements `TemporalJsonError`.

use std::borrow::Cow;
use std::fmt;

use crate::{kind::TemporalKind, options::Feature};

/// `TemporalJsonError`'s error type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Numeric text that could not be read as a decimal or integer.
    #[default]
    MalformedNumber,
    /// A decoded value outside of the representable range of its kind.
    Overflow,
    /// The JSON shape is not legal for the kind and flags.
    StructuralMismatch,
    /// Text did not match the canonical formatter or the caller's pattern.
    ParseFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedNumber => "MalformedNumber",
            Self::Overflow => "Overflow",
            Self::StructuralMismatch => "StructuralMismatch",
            Self::ParseFailure => "ParseFailure",
        }
        .fmt(f)
    }
}

/// Canned messages for the errors raised most often.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorMessage {
    InstantOutOfRange,
    EpochMillisOverflow,
    SecondsOutOfRange,
    NotANumber,
    ArrayNotSupported,
    EmptyArray,
    NestedArray,
    UnexpectedToken,
    MissingArrayField,
    InvalidDate,
    InvalidTime,
    InvalidOffset,
    UnknownTimeZone,
    TypeIdMismatch,
}

impl ErrorMessage {
    pub(crate) fn to_str(self) -> &'static str {
        match self {
            Self::InstantOutOfRange => "Instant is outside of the representable epoch range.",
            Self::EpochMillisOverflow => "Epoch milliseconds do not fit in a 64-bit integer.",
            Self::SecondsOutOfRange => "Seconds do not fit in a 64-bit integer.",
            Self::NotANumber => "Value is not a decimal or integer number.",
            Self::ArrayNotSupported => "Array shape is not supported for this kind.",
            Self::EmptyArray => "Empty array is not accepted as null.",
            Self::NestedArray => "Nested arrays cannot be unwrapped.",
            Self::UnexpectedToken => "Unexpected JSON token for this kind.",
            Self::MissingArrayField => "Array is missing a required field.",
            Self::InvalidDate => "Not a valid ISO date.",
            Self::InvalidTime => "Not a valid ISO time.",
            Self::InvalidOffset => "UTC offset must be within +/-18:00.",
            Self::UnknownTimeZone => "Time zone identifier does not exist.",
            Self::TypeIdMismatch => "Type id does not match the expected kind.",
        }
    }
}

/// The underlying cause of a `ParseFailure`.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum ParseCause {
    /// The ISO-8601 parser rejected the text.
    Ixdtf(ixdtf::ParseError),
    /// A caller supplied pattern did not match at the given byte offset.
    Pattern { position: usize },
}

impl fmt::Display for ParseCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ixdtf(err) => write!(f, "{err}"),
            Self::Pattern { position } => write!(f, "pattern mismatch at byte {position}"),
        }
    }
}

/// The error type returned by every fallible operation of this crate.
///
/// None of these represent corrupted state; every operation is a single
/// pure attempt, so the caller only needs to attach location information.
#[derive(Debug, Clone)]
pub struct TemporalJsonError {
    kind: ErrorKind,
    msg: Cow<'static, str>,
    temporal_kind: Option<TemporalKind>,
    input: Option<String>,
    feature: Option<Feature>,
    cause: Option<ParseCause>,
}

impl TemporalJsonError {
    #[inline]
    #[must_use]
    const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            msg: Cow::Borrowed(""),
            temporal_kind: None,
            input: None,
            feature: None,
            cause: None,
        }
    }

    /// Create a `MalformedNumber` error.
    #[inline]
    #[must_use]
    pub const fn malformed_number() -> Self {
        Self::new(ErrorKind::MalformedNumber)
    }

    /// Create an `Overflow` error.
    #[inline]
    #[must_use]
    pub const fn overflow() -> Self {
        Self::new(ErrorKind::Overflow)
    }

    /// Create a `StructuralMismatch` error.
    #[inline]
    #[must_use]
    pub const fn structural() -> Self {
        Self::new(ErrorKind::StructuralMismatch)
    }

    /// Create a `ParseFailure` error.
    #[inline]
    #[must_use]
    pub const fn parse() -> Self {
        Self::new(ErrorKind::ParseFailure)
    }

    /// Add a message to the error.
    #[inline]
    #[must_use]
    pub fn with_message<S>(mut self, msg: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        self.msg = msg.into();
        self
    }

    #[inline]
    #[must_use]
    pub(crate) fn with_enum(mut self, msg: ErrorMessage) -> Self {
        self.msg = Cow::Borrowed(msg.to_str());
        self
    }

    /// Attach the `TemporalKind` that was being encoded or decoded.
    #[inline]
    #[must_use]
    pub fn with_kind(mut self, kind: TemporalKind) -> Self {
        self.temporal_kind = Some(kind);
        self
    }

    /// Attach the raw input text.
    #[inline]
    #[must_use]
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Attach the flag whose setting decided the failing branch.
    #[inline]
    #[must_use]
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.feature = Some(feature);
        self
    }

    /// Attach the underlying parser error.
    #[inline]
    #[must_use]
    pub fn with_cause(mut self, cause: ParseCause) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Attaches the kind only if no kind was recorded closer to the failure.
    #[inline]
    #[must_use]
    pub(crate) fn or_kind(mut self, kind: TemporalKind) -> Self {
        self.temporal_kind.get_or_insert(kind);
        self
    }

    /// Returns this error's kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the `TemporalKind` this error was raised for, if recorded.
    #[inline]
    #[must_use]
    pub fn temporal_kind(&self) -> Option<TemporalKind> {
        self.temporal_kind
    }

    /// Returns the raw input, if recorded.
    #[inline]
    #[must_use]
    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    /// Returns the offending flag, if recorded.
    #[inline]
    #[must_use]
    pub fn feature(&self) -> Option<Feature> {
        self.feature
    }

    /// Returns the underlying parse error, if any.
    #[inline]
    #[must_use]
    pub fn cause(&self) -> Option<&ParseCause> {
        self.cause.as_ref()
    }
}

impl fmt::Display for TemporalJsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        let msg = self.msg.trim();
        if !msg.is_empty() {
            write!(f, ": {msg}")?;
        }
        if let Some(kind) = self.temporal_kind {
            write!(f, " (kind: {kind:?})")?;
        }
        if let Some(feature) = self.feature {
            write!(f, " (flag: {feature:?})")?;
        }
        if let Some(input) = &self.input {
            write!(f, " (input: {input:?})")?;
        }
        if let Some(cause) = &self.cause {
            write!(f, ": {cause}")?;
        }

        Ok(())
    }
}

impl std::error::Error for TemporalJsonError {}
