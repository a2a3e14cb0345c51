//! Error types for the TTF library.
//!
//! Two families live here:
//!
//! - [`TtfError`]: the request could not be understood (unknown kind tag,
//!   malformed reference, bad date). Returned as `Err`.
//! - [`NoMatch`]: the request was understood but the calendar holds no
//!   qualifying contract. Carried as a value by the query facade so callers
//!   can tell "bad input" from "no data".

use serde::Serialize;
use thiserror::Error;

use crate::types::{Month, ReferenceKind};

/// A specialized Result type for TTF operations.
pub type TtfResult<T> = Result<T, TtfError>;

/// The stage of a query that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// The reference kind tag was not recognized.
    Dispatch,
    /// The reference string (or a date/month argument) did not parse.
    Parse,
    /// The reference parsed but no calendar row qualified.
    Lookup,
}

/// The main error type for TTF operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TtfError {
    /// The caller supplied a reference kind tag nobody recognizes.
    #[error("Unknown reference kind: {tag}")]
    UnknownKind {
        /// The rejected tag.
        tag: String,
    },

    /// The input does not match the code grammar for its declared kind.
    #[error("Malformed {kind} reference '{input}': {reason}")]
    MalformedReference {
        /// Declared kind of the reference.
        kind: ReferenceKind,
        /// The raw input.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Invalid or unparseable date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Unrecognized month abbreviation or name.
    #[error("Invalid month: {input}")]
    InvalidMonth {
        /// The rejected input.
        input: String,
    },
}

impl TtfError {
    /// Creates an unknown kind error.
    #[must_use]
    pub fn unknown_kind(tag: impl Into<String>) -> Self {
        Self::UnknownKind { tag: tag.into() }
    }

    /// Creates a malformed reference error.
    #[must_use]
    pub fn malformed(kind: ReferenceKind, input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedReference {
            kind,
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid month error.
    #[must_use]
    pub fn invalid_month(input: impl Into<String>) -> Self {
        Self::InvalidMonth {
            input: input.into(),
        }
    }

    /// Returns the query stage this error belongs to.
    #[must_use]
    pub fn stage(&self) -> FailureStage {
        match self {
            Self::UnknownKind { .. } => FailureStage::Dispatch,
            Self::MalformedReference { .. } | Self::InvalidDate { .. } | Self::InvalidMonth { .. } => {
                FailureStage::Parse
            }
        }
    }
}

/// A well-formed reference with no qualifying calendar row.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NoMatch {
    /// No row carries this exact code.
    #[error("No contract with code {code}")]
    UnknownCode {
        /// Normalized code that was looked up.
        code: String,
    },

    /// Fewer qualifying rows than the requested sequence position.
    #[error("Sequence {requested} requested but only {available} qualifying contracts")]
    SequenceOutOfRange {
        /// 1-indexed position asked for.
        requested: u32,
        /// Number of rows that qualified.
        available: usize,
    },

    /// The front leg of a spread did not resolve.
    #[error("Spread front leg {month} unresolved: {cause}")]
    FrontLeg {
        /// Month of the front leg.
        month: Month,
        /// Why the front leg failed.
        cause: Box<NoMatch>,
    },

    /// No row exists for the back leg's month and rolled year.
    #[error("Spread back leg {month} {year} not in calendar")]
    BackLeg {
        /// Month of the back leg.
        month: Month,
        /// Year the back leg was rolled to.
        year: i32,
    },
}

impl NoMatch {
    /// A no-match always fails at the lookup stage.
    #[must_use]
    pub fn stage(&self) -> FailureStage {
        FailureStage::Lookup
    }
}
