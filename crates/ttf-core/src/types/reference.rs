//! Security references and points in time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::codes::PRODUCT_ROOT;
use crate::error::{TtfError, TtfResult};
use crate::types::{Date, Month};

/// The kind tag a caller attaches to a raw reference string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// An exact contract code.
    Specific,
    /// The Nth contract by contract month.
    Generic,
    /// The Nth active contract of one calendar month.
    MonthlyGeneric,
    /// A two-leg calendar spread.
    Spread,
}

impl ReferenceKind {
    /// All kinds, in dispatch order.
    pub const ALL: [ReferenceKind; 4] = [
        ReferenceKind::Specific,
        ReferenceKind::Generic,
        ReferenceKind::MonthlyGeneric,
        ReferenceKind::Spread,
    ];

    /// The canonical tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceKind::Specific => "specific",
            ReferenceKind::Generic => "generic",
            ReferenceKind::MonthlyGeneric => "monthly_generic",
            ReferenceKind::Spread => "spread",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReferenceKind {
    type Err = TtfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "specific" => Ok(Self::Specific),
            "generic" => Ok(Self::Generic),
            "monthly_generic" | "monthly-generic" => Ok(Self::MonthlyGeneric),
            "spread" => Ok(Self::Spread),
            other => Err(TtfError::unknown_kind(other)),
        }
    }
}

/// A 1-indexed position in a ranked candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence(NonZeroU32);

impl Sequence {
    /// The front position.
    pub const FIRST: Sequence = Sequence(NonZeroU32::MIN);

    /// Creates a sequence position; zero is rejected.
    #[must_use]
    pub fn new(n: u32) -> Option<Self> {
        NonZeroU32::new(n).map(Sequence)
    }

    /// The 1-indexed position.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// The 0-indexed offset into a ranked list.
    #[must_use]
    pub fn offset(self) -> usize {
        // u32 always fits in usize on supported targets.
        usize::try_from(self.0.get() - 1).unwrap_or(usize::MAX)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A parsed security reference.
///
/// `Display` renders the canonical code, so a parsed reference can be
/// written back out (`TFMAPR1`, `TFMDECJUN2`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SecurityReference {
    /// An exact contract code, prefix already stripped.
    Specific {
        /// Normalized contract code.
        code: String,
    },
    /// The Nth contract by contract month.
    Generic {
        /// Position in contract-month order.
        sequence: Sequence,
    },
    /// The Nth active contract delivering in `month`.
    MonthlyGeneric {
        /// Delivery month.
        month: Month,
        /// Position in contract-year order.
        sequence: Sequence,
    },
    /// A calendar spread, front leg first.
    Spread {
        /// Front leg month.
        front: Month,
        /// Back leg month.
        back: Month,
        /// Position of the front leg.
        sequence: Sequence,
    },
}

impl SecurityReference {
    /// The kind of this reference.
    #[must_use]
    pub fn kind(&self) -> ReferenceKind {
        match self {
            SecurityReference::Specific { .. } => ReferenceKind::Specific,
            SecurityReference::Generic { .. } => ReferenceKind::Generic,
            SecurityReference::MonthlyGeneric { .. } => ReferenceKind::MonthlyGeneric,
            SecurityReference::Spread { .. } => ReferenceKind::Spread,
        }
    }
}

impl fmt::Display for SecurityReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityReference::Specific { code } => f.write_str(code),
            SecurityReference::Generic { sequence } => write!(f, "{PRODUCT_ROOT}{sequence}"),
            SecurityReference::MonthlyGeneric { month, sequence } => {
                write!(f, "{PRODUCT_ROOT}{}{sequence}", month.abbr())
            }
            SecurityReference::Spread {
                front,
                back,
                sequence,
            } => write!(f, "{PRODUCT_ROOT}{}{}{sequence}", front.abbr(), back.abbr()),
        }
    }
}

/// The instant (or window) against which "active" is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointInTime {
    /// A single reference date.
    At {
        /// Reference date.
        date: Date,
    },
    /// An inclusive expiry window; the reference instant is `start`.
    Range {
        /// First date of the window.
        start: Date,
        /// Last date of the window.
        end: Date,
    },
}

impl PointInTime {
    /// A single reference date.
    #[must_use]
    pub fn at(date: Date) -> Self {
        PointInTime::At { date }
    }

    /// An expiry window.
    ///
    /// # Errors
    ///
    /// Returns `TtfError::InvalidDate` if `start` is after `end`.
    pub fn range(start: Date, end: Date) -> TtfResult<Self> {
        if start > end {
            return Err(TtfError::invalid_date(format!(
                "range start {start} is after end {end}"
            )));
        }
        Ok(PointInTime::Range { start, end })
    }

    /// The date "expired" and "next available" are measured against.
    #[must_use]
    pub fn reference_date(&self) -> Date {
        match *self {
            PointInTime::At { date } => date,
            PointInTime::Range { start, .. } => start,
        }
    }

    /// Whether a contract with this expiry is still listed at this point in
    /// time: `expiry >= date`, or `start <= expiry <= end` for a window.
    #[must_use]
    pub fn lists(&self, expiry: Date) -> bool {
        match *self {
            PointInTime::At { date } => expiry >= date,
            PointInTime::Range { start, end } => start <= expiry && expiry <= end,
        }
    }

    /// Whether a contract with this expiry has not yet lapsed at the
    /// reference instant. Stricter than [`lists`](Self::lists): a contract
    /// expiring on the reference date itself is excluded.
    #[must_use]
    pub fn is_active(&self, expiry: Date) -> bool {
        self.lists(expiry) && expiry > self.reference_date()
    }
}

impl fmt::Display for PointInTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointInTime::At { date } => write!(f, "{date}"),
            PointInTime::Range { start, end } => write!(f, "{start}..{end}"),
        }
    }
}
