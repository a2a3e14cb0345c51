//! Calendar source and cache traits.
//!
//! - [`CalendarSource`]: produces raw calendar rows (CSV export, database, ...)
//! - [`CalendarCache`]: persists a built table so the next start skips the source
//!
//! Neither is called during resolution. A loader runs them once, builds a
//! [`CalendarTable`], and hands the table to the core.

use ttf_core::calendar::CalendarTable;
use ttf_core::types::{CalendarRow, ContractRecord};

use crate::error::TraitError;

/// Source of raw contract calendar rows.
pub trait CalendarSource: Send + Sync {
    /// Human-readable name for logs.
    fn name(&self) -> &str;

    /// Reads every row, in source order.
    fn load_rows(&self) -> Result<Vec<CalendarRow>, TraitError>;

    /// Reads the rows and builds a table.
    fn load_table(&self) -> Result<CalendarTable, TraitError> {
        Ok(CalendarTable::load(self.load_rows()?))
    }
}

/// Persistent cache of a built calendar table.
pub trait CalendarCache: Send + Sync {
    /// Reads cached records; `Ok(None)` when nothing is cached yet.
    fn load(&self) -> Result<Option<Vec<ContractRecord>>, TraitError>;

    /// Writes the table, replacing any previous contents.
    fn store(&self, table: &CalendarTable) -> Result<(), TraitError>;

    /// Drops the cached contents, if any.
    fn clear(&self) -> Result<(), TraitError>;

    /// Reads the cache and rebuilds the table from it.
    fn load_table(&self) -> Result<Option<CalendarTable>, TraitError> {
        Ok(self.load()?.map(CalendarTable::from_records))
    }
}

/// In-memory rows act as a source, mainly for tests and embedding.
impl CalendarSource for Vec<CalendarRow> {
    fn name(&self) -> &str {
        "memory"
    }

    fn load_rows(&self) -> Result<Vec<CalendarRow>, TraitError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttf_core::types::{Date, Month, YearMonth};

    #[test]
    fn test_vec_source_builds_table() {
        let rows = vec![CalendarRow::new(
            "ENDEX::F:TFM\\J25",
            YearMonth::new(2025, Month::April),
            Date::from_ymd(2025, 4, 15).unwrap(),
        )];
        let table = rows.load_table().unwrap();
        assert_eq!(rows.name(), "memory");
        assert!(table.get("TFM\\J25").is_some());
    }
}
