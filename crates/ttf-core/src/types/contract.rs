//! Calendar rows and normalized contract records.

use serde::{Deserialize, Serialize};

use crate::codes::{normalize_code, parse_delivery_month};
use crate::types::{Date, Month, YearMonth};

/// A raw calendar row as supplied by a loader.
///
/// The loader is responsible for turning its source columns into typed
/// dates; everything else is derived by [`ContractRecord::from_row`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRow {
    /// Contract code as found in the source, prefix and all.
    pub code: String,
    /// Month the contract nominally represents.
    pub contract_month: YearMonth,
    /// Last date on which the contract is active.
    pub expiry_date: Date,
}

impl CalendarRow {
    /// Creates a new calendar row.
    #[must_use]
    pub fn new(code: impl Into<String>, contract_month: YearMonth, expiry_date: Date) -> Self {
        Self {
            code: code.into(),
            contract_month,
            expiry_date,
        }
    }
}

/// One normalized row of the calendar table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRecord {
    /// Contract code with the source prefix stripped, e.g. `TFM\J25`.
    pub code: String,
    /// Contract code exactly as the loader supplied it.
    pub original_code: String,
    /// Delivery month decoded from the code, `None` when the code is malformed.
    pub delivery_month: Option<YearMonth>,
    /// Month the contract nominally represents.
    pub contract_month: YearMonth,
    /// Last date on which the contract is active.
    pub expiry_date: Date,
    /// Month of `delivery_month`, used for monthly-generic matching.
    pub month_name: Option<Month>,
    /// Year of `contract_month`.
    pub contract_year: i32,
}

impl ContractRecord {
    /// Normalizes a loader row into a record.
    #[must_use]
    pub fn from_row(row: CalendarRow) -> Self {
        let code = normalize_code(&row.code).to_string();
        let delivery_month = parse_delivery_month(&code);
        Self {
            delivery_month,
            month_name: delivery_month.map(|d| d.month),
            contract_year: row.contract_month.year,
            contract_month: row.contract_month,
            expiry_date: row.expiry_date,
            original_code: row.code,
            code,
        }
    }

    /// Whether the code decoded to a delivery month.
    ///
    /// Records that fail this are kept for specific and generic lookups but
    /// never take part in monthly-generic or spread matching.
    #[must_use]
    pub fn has_delivery_month(&self) -> bool {
        self.delivery_month.is_some()
    }
}
