//! Calendar bootstrap: cache first, source second.

use ttf_core::calendar::{CalendarTable, SharedCalendar};
use ttf_traits::calendar::{CalendarCache, CalendarSource};
use ttf_traits::error::TraitError;

/// Loads the calendar from `cache`, falling back to `source`.
///
/// When the cache is empty or unreadable the table is built from the source
/// and written back to the cache. A failed cache write is logged and does
/// not fail the load.
pub fn load_or_build(
    source: &dyn CalendarSource,
    cache: &dyn CalendarCache,
) -> Result<CalendarTable, TraitError> {
    match cache.load_table() {
        Ok(Some(table)) => {
            tracing::info!(contracts = table.len(), "Calendar loaded from cache");
            return Ok(table);
        }
        Ok(None) => tracing::debug!("No calendar cache, building from {}", source.name()),
        Err(e) => tracing::warn!(error = %e, "Calendar cache unreadable, rebuilding"),
    }

    build(source, cache)
}

/// Rebuilds the calendar from `source`, refreshes `cache`, and swaps the new
/// table into `shared`. In-flight queries keep the snapshot they started with.
pub fn refresh(
    shared: &SharedCalendar,
    source: &dyn CalendarSource,
    cache: &dyn CalendarCache,
) -> Result<(), TraitError> {
    let table = build(source, cache)?;
    shared.swap(table);
    Ok(())
}

fn build(source: &dyn CalendarSource, cache: &dyn CalendarCache) -> Result<CalendarTable, TraitError> {
    let table = source.load_table()?;
    for warning in table.warnings() {
        tracing::warn!(%warning, "Calendar data quality");
    }
    if let Err(e) = cache.store(&table) {
        tracing::warn!(error = %e, "Failed to write calendar cache");
    }
    tracing::info!(source = source.name(), contracts = table.len(), "Calendar built");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CsvCalendarSource, JsonCalendarCache};
    use tempfile::tempdir;
    use ttf_core::types::{CalendarRow, Date, Month, YearMonth};

    fn rows(code: &str) -> Vec<CalendarRow> {
        vec![CalendarRow::new(
            code,
            YearMonth::new(2025, Month::April),
            Date::from_ymd(2025, 4, 15).unwrap(),
        )]
    }

    #[test]
    fn test_builds_then_reuses_cache() {
        let dir = tempdir().unwrap();
        let cache = JsonCalendarCache::new(dir.path().join("calendar.json"));

        let first = load_or_build(&rows("TFM\\J25"), &cache).unwrap();
        assert!(first.get("TFM\\J25").is_some());

        // The cache now wins over a different source.
        let second = load_or_build(&rows("TFM\\J26"), &cache).unwrap();
        assert!(second.get("TFM\\J25").is_some());
        assert!(second.get("TFM\\J26").is_none());
    }

    #[test]
    fn test_corrupt_cache_rebuilds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("calendar.json");
        std::fs::write(&path, "{").unwrap();
        let cache = JsonCalendarCache::new(&path);

        let table = load_or_build(&rows("TFM\\J25"), &cache).unwrap();
        assert_eq!(table.len(), 1);
        assert!(cache.load().unwrap().is_some());
    }

    #[test]
    fn test_missing_source_without_cache_fails() {
        let dir = tempdir().unwrap();
        let source = CsvCalendarSource::new(dir.path().join("missing.csv"));
        let cache = JsonCalendarCache::new(dir.path().join("calendar.json"));
        assert!(load_or_build(&source, &cache).is_err());
    }

    #[test]
    fn test_refresh_swaps_snapshot() {
        let dir = tempdir().unwrap();
        let cache = JsonCalendarCache::new(dir.path().join("calendar.json"));
        let shared = SharedCalendar::new(load_or_build(&rows("TFM\\J25"), &cache).unwrap());
        let held = shared.snapshot();

        refresh(&shared, &rows("TFM\\J26"), &cache).unwrap();

        assert!(held.get("TFM\\J25").is_some());
        assert!(shared.snapshot().get("TFM\\J26").is_some());
        assert!(cache.load_table().unwrap().unwrap().get("TFM\\J26").is_some());
    }
}
