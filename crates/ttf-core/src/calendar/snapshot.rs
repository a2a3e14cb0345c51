//! Shared, swappable calendar snapshot.

use std::sync::Arc;

use parking_lot::RwLock;

use super::CalendarTable;
use crate::types::CalendarRow;

/// Holds the calendar snapshot that new queries should use.
///
/// Readers take an `Arc` to the current table and keep using it for the
/// whole query, so a concurrent [`swap`](Self::swap) never changes data
/// underneath an in-flight resolution.
///
/// # Example
///
/// ```
/// use ttf_core::calendar::{CalendarTable, SharedCalendar};
///
/// let shared = SharedCalendar::new(CalendarTable::default());
/// let before = shared.snapshot();
/// shared.swap(CalendarTable::default());
/// assert!(before.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct SharedCalendar {
    current: RwLock<Arc<CalendarTable>>,
}

impl SharedCalendar {
    /// Wraps an initial table.
    #[must_use]
    pub fn new(table: CalendarTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
        }
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<CalendarTable> {
        self.current.read().clone()
    }

    /// Installs a new table and returns the one it replaced.
    pub fn swap(&self, table: CalendarTable) -> Arc<CalendarTable> {
        let next = Arc::new(table);
        let len = next.len();
        let previous = std::mem::replace(&mut *self.current.write(), next);
        log::debug!(
            "Calendar snapshot swapped: {} -> {len} contracts",
            previous.len()
        );
        previous
    }

    /// Builds a table from fresh rows and swaps it in.
    pub fn rebuild(&self, rows: impl IntoIterator<Item = CalendarRow>) -> Arc<CalendarTable> {
        self.swap(super::rebuild(rows))
    }
}

impl From<CalendarTable> for SharedCalendar {
    fn from(table: CalendarTable) -> Self {
        Self::new(table)
    }
}
