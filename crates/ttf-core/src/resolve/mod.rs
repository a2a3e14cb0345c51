//! Contract and spread resolution.
//!
//! A [`Resolver`] borrows a [`CalendarTable`] and turns structured references
//! into concrete contracts. Every method is a pure read over the table:
//! the same inputs against the same table always give the same result.
//!
//! Failures to find data come back as [`NoMatch`]; notes about expired
//! contracts, the chosen year, and ambiguous rows come back as typed
//! metadata next to the result.

mod contract;
mod spread;

pub use spread::{ResolvedSpread, SpreadLeg, SpreadMetadata};

use serde::Serialize;

use crate::calendar::{CalendarTable, DataWarning};
use crate::error::NoMatch;
use crate::types::{ContractRecord, Date, Month, PointInTime, SecurityReference, Sequence};

/// A same-year contract that had already lapsed at the reference date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiredNotice {
    /// Delivery month of the lapsed contract.
    pub month: Month,
    /// Contract year (the reference date's year).
    pub year: i32,
    /// Code of the lapsed contract.
    pub code: String,
    /// Its expiry date.
    pub expiry_date: Date,
}

/// The year and expiry of the contract a monthly generic settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NextAvailable {
    /// Contract year of the chosen contract.
    pub year: i32,
    /// Expiry of the chosen contract.
    pub expiry_date: Date,
}

/// Resolution metadata attached to a [`ResolvedContract`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContractMetadata {
    /// Month matched by a monthly generic.
    pub month: Option<Month>,
    /// Point in time the query was evaluated at, if any.
    pub point_in_time: Option<PointInTime>,
    /// Number of rows that qualified before ranking.
    pub candidates: usize,
    /// Set when the reference year's contract had already expired.
    pub expired: Option<ExpiredNotice>,
    /// Chosen contract's year and expiry, reported when a point in time was given.
    pub next_available: Option<NextAvailable>,
    /// Data-quality notes about the rows involved.
    pub warnings: Vec<DataWarning>,
}

/// A reference resolved to one concrete contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedContract {
    /// The reference that was resolved.
    pub reference: SecurityReference,
    /// The matching calendar row.
    pub record: ContractRecord,
    /// How the match was reached.
    pub metadata: ContractMetadata,
}

impl ResolvedContract {
    /// Code of the resolved contract.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.record.code
    }
}

/// Resolves references against one calendar snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    table: &'a CalendarTable,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over `table`.
    #[must_use]
    pub fn new(table: &'a CalendarTable) -> Self {
        Self { table }
    }

    /// The table being resolved against.
    #[must_use]
    pub fn table(&self) -> &'a CalendarTable {
        self.table
    }
}

/// Picks the `sequence`-th candidate, or reports how many there were.
fn pick<'r>(
    candidates: &[&'r ContractRecord],
    sequence: Sequence,
) -> Result<&'r ContractRecord, NoMatch> {
    candidates
        .get(sequence.offset())
        .copied()
        .ok_or(NoMatch::SequenceOutOfRange {
            requested: sequence.get(),
            available: candidates.len(),
        })
}

/// An `AmbiguousData` warning when more than one row matches `same_key`.
fn tie_warning(
    rows: &[&ContractRecord],
    key: String,
    same_key: impl Fn(&ContractRecord) -> bool,
) -> Option<DataWarning> {
    let codes: Vec<String> = rows
        .iter()
        .filter(|&&r| same_key(r))
        .map(|r| r.code.clone())
        .collect();
    (codes.len() > 1).then(|| {
        log::warn!("Ambiguous calendar rows for {key}: {}", codes.join(", "));
        DataWarning::AmbiguousData { key, codes }
    })
}
