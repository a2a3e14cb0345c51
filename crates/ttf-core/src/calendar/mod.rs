//! The contract calendar table.
//!
//! A [`CalendarTable`] is built once from loader rows and never mutated.
//! Resolvers only read from it; a reload builds a new table and swaps it in
//! through [`SharedCalendar`].
//!
//! # Example
//!
//! ```
//! use ttf_core::calendar::CalendarTable;
//! use ttf_core::types::{CalendarRow, Date, Month, YearMonth};
//!
//! let table = CalendarTable::load(vec![CalendarRow::new(
//!     "ENDEX::F:TFM\\J25",
//!     YearMonth::new(2025, Month::April),
//!     Date::from_ymd(2025, 4, 15).unwrap(),
//! )]);
//!
//! assert_eq!(table.len(), 1);
//! assert!(table.get("TFM\\J25").is_some());
//! ```

mod snapshot;

pub use snapshot::SharedCalendar;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::codes::normalize_code;
use crate::types::{CalendarRow, ContractRecord, Month, YearMonth};

/// A data-quality observation about the calendar.
///
/// None of these stop a load or a query; they ride along so callers can
/// show or log them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataWarning {
    /// A second row carried an already-seen code and was dropped.
    DuplicateCode {
        /// The repeated code.
        code: String,
    },
    /// A code did not decode to a delivery month.
    UnparseableCode {
        /// The offending code.
        code: String,
    },
    /// Several rows share a key that should be unique; the first in table
    /// order wins.
    AmbiguousData {
        /// The shared key, e.g. `April 2025` or `2025-04`.
        key: String,
        /// Codes sharing the key, in table order.
        codes: Vec<String>,
    },
}

impl fmt::Display for DataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataWarning::DuplicateCode { code } => write!(f, "duplicate code {code} dropped"),
            DataWarning::UnparseableCode { code } => {
                write!(f, "code {code} has no delivery month")
            }
            DataWarning::AmbiguousData { key, codes } => {
                write!(f, "{} rows for {key}: {}", codes.len(), codes.join(", "))
            }
        }
    }
}

/// Immutable, normalized table of every known contract.
#[derive(Debug, Clone, Default)]
pub struct CalendarTable {
    records: Vec<ContractRecord>,
    by_code: HashMap<String, usize>,
    warnings: Vec<DataWarning>,
}

impl CalendarTable {
    /// Builds a table from loader rows.
    ///
    /// Codes are normalized and derived columns computed. When two rows
    /// share a normalized code the first is kept and a
    /// [`DataWarning::DuplicateCode`] recorded.
    #[must_use]
    pub fn load(rows: impl IntoIterator<Item = CalendarRow>) -> Self {
        Self::from_records(rows.into_iter().map(ContractRecord::from_row))
    }

    /// Builds a table from already-normalized records, e.g. a cache.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = ContractRecord>) -> Self {
        let mut table = Self::default();

        for record in records {
            if table.by_code.contains_key(&record.code) {
                log::warn!("Dropping duplicate calendar row for {}", record.code);
                table.warnings.push(DataWarning::DuplicateCode {
                    code: record.code,
                });
                continue;
            }
            if !record.has_delivery_month() {
                log::debug!("Code {} has no delivery month", record.code);
                table.warnings.push(DataWarning::UnparseableCode {
                    code: record.code.clone(),
                });
            }
            table.by_code.insert(record.code.clone(), table.records.len());
            table.records.push(record);
        }

        table.warnings.extend(table.ambiguous_keys());
        log::debug!(
            "Calendar loaded: {} contracts, {} warnings",
            table.records.len(),
            table.warnings.len()
        );
        table
    }

    /// Number of contracts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in load order.
    #[must_use]
    pub fn records(&self) -> &[ContractRecord] {
        &self.records
    }

    /// Iterates records in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, ContractRecord> {
        self.records.iter()
    }

    /// Looks up a contract by code, with or without the source prefix.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&ContractRecord> {
        self.by_code
            .get(normalize_code(code))
            .map(|&i| &self.records[i])
    }

    /// Records delivering in `month`, in load order.
    pub fn by_month(&self, month: Month) -> impl Iterator<Item = &ContractRecord> {
        self.records
            .iter()
            .filter(move |r| r.month_name == Some(month))
    }

    /// Records delivering in `month` of contract year `year`, in load order.
    pub fn by_month_year(&self, month: Month, year: i32) -> impl Iterator<Item = &ContractRecord> {
        self.by_month(month).filter(move |r| r.contract_year == year)
    }

    /// Data-quality warnings collected while building the table.
    #[must_use]
    pub fn warnings(&self) -> &[DataWarning] {
        &self.warnings
    }

    /// Month/year keys and contract months claimed by more than one row.
    fn ambiguous_keys(&self) -> Vec<DataWarning> {
        let mut by_month_year: KeyGroups<(Month, i32)> = KeyGroups::default();
        let mut by_contract_month: KeyGroups<YearMonth> = KeyGroups::default();

        for record in &self.records {
            if let Some(month) = record.month_name {
                by_month_year.push((month, record.contract_year), &record.code);
            }
            by_contract_month.push(record.contract_month, &record.code);
        }

        let month_year = by_month_year
            .shared()
            .map(|((month, year), codes)| DataWarning::AmbiguousData {
                key: format!("{month} {year}"),
                codes,
            });
        let contract_month = by_contract_month
            .shared()
            .map(|(key, codes)| DataWarning::AmbiguousData {
                key: key.to_string(),
                codes,
            });

        let warnings: Vec<DataWarning> = month_year.chain(contract_month).collect();
        for warning in &warnings {
            log::warn!("Calendar data: {warning}");
        }
        warnings
    }
}

/// Codes grouped by key, in first-seen key order.
struct KeyGroups<K> {
    index: HashMap<K, usize>,
    groups: Vec<(K, Vec<String>)>,
}

impl<K> Default for KeyGroups<K> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Copy> KeyGroups<K> {
    fn push(&mut self, key: K, code: &str) {
        match self.index.get(&key) {
            Some(&i) => self.groups[i].1.push(code.to_string()),
            None => {
                self.index.insert(key, self.groups.len());
                self.groups.push((key, vec![code.to_string()]));
            }
        }
    }

    /// Keys held by more than one code.
    fn shared(self) -> impl Iterator<Item = (K, Vec<String>)> {
        self.groups.into_iter().filter(|(_, codes)| codes.len() > 1)
    }
}

impl<'a> IntoIterator for &'a CalendarTable {
    type Item = &'a ContractRecord;
    type IntoIter = std::slice::Iter<'a, ContractRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Builds a calendar table from loader rows.
#[must_use]
pub fn load(rows: impl IntoIterator<Item = CalendarRow>) -> CalendarTable {
    CalendarTable::load(rows)
}

/// Builds a replacement calendar table from fresh loader rows.
///
/// Identical to [`load`]; the result is meant to be handed to
/// [`SharedCalendar::swap`] rather than mutating a table in use.
#[must_use]
pub fn rebuild(rows: impl IntoIterator<Item = CalendarRow>) -> CalendarTable {
    CalendarTable::load(rows)
}
