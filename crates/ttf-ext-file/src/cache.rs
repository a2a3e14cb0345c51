//! JSON calendar cache.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use ttf_core::calendar::CalendarTable;
use ttf_core::types::ContractRecord;
use ttf_traits::calendar::CalendarCache;
use ttf_traits::error::TraitError;

// =============================================================================
// JSON CALENDAR CACHE
// =============================================================================

const CACHE_VERSION: u32 = 1;

#[derive(Serialize)]
struct CacheFileRef<'a> {
    version: u32,
    records: &'a [ContractRecord],
}

#[derive(Deserialize)]
struct CacheFile {
    version: u32,
    records: Vec<ContractRecord>,
}

/// Built calendar persisted as a JSON document.
///
/// A cache written by an incompatible version is treated as absent.
#[derive(Debug, Clone)]
pub struct JsonCalendarCache {
    file_path: PathBuf,
}

impl JsonCalendarCache {
    /// Create a cache backed by `file_path`. Nothing is read until
    /// [`load`](CalendarCache::load).
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl CalendarCache for JsonCalendarCache {
    fn load(&self) -> Result<Option<Vec<ContractRecord>>, TraitError> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.file_path)?;
        let cache: CacheFile =
            serde_json::from_str(&content).map_err(|e| TraitError::ParseError(e.to_string()))?;

        if cache.version != CACHE_VERSION {
            tracing::warn!(
                path = %self.file_path.display(),
                found = cache.version,
                expected = CACHE_VERSION,
                "Ignoring calendar cache from another version"
            );
            return Ok(None);
        }

        tracing::debug!(path = %self.file_path.display(), records = cache.records.len(), "Read calendar cache");
        Ok(Some(cache.records))
    }

    fn store(&self, table: &CalendarTable) -> Result<(), TraitError> {
        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let document = CacheFileRef {
            version: CACHE_VERSION,
            records: table.records(),
        };
        let json = serde_json::to_string_pretty(&document)
            .map_err(|e| TraitError::SerializationError(e.to_string()))?;

        // Write beside the target and rename so readers never see a partial file.
        let staging = self.file_path.with_extension("json.tmp");
        std::fs::write(&staging, json)?;
        std::fs::rename(&staging, &self.file_path)?;

        tracing::debug!(path = %self.file_path.display(), records = table.len(), "Wrote calendar cache");
        Ok(())
    }

    fn clear(&self) -> Result<(), TraitError> {
        match std::fs::remove_file(&self.file_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use ttf_core::types::{CalendarRow, Date, Month, YearMonth};

    fn table() -> CalendarTable {
        CalendarTable::load(vec![
            CalendarRow::new(
                "ENDEX::F:TFM\\J25",
                YearMonth::new(2025, Month::April),
                Date::from_ymd(2025, 3, 28).unwrap(),
            ),
            CalendarRow::new(
                "TFM-SPOT",
                YearMonth::new(2025, Month::April),
                Date::from_ymd(2025, 4, 1).unwrap(),
            ),
        ])
    }

    #[test]
    fn test_store_and_load() {
        let dir = tempdir().unwrap();
        let cache = JsonCalendarCache::new(dir.path().join("nested/calendar.json"));
        assert!(cache.load().unwrap().is_none());

        let original = table();
        cache.store(&original).unwrap();

        let restored = cache.load_table().unwrap().unwrap();
        assert_eq!(restored.records(), original.records());
        assert_eq!(
            restored.get("TFM\\J25").unwrap().original_code,
            "ENDEX::F:TFM\\J25"
        );
        assert!(restored.get("TFM-SPOT").unwrap().delivery_month.is_none());
    }

    #[test]
    fn test_version_mismatch_is_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("calendar.json");
        std::fs::write(&path, r#"{"version": 999, "records": []}"#).unwrap();
        assert!(JsonCalendarCache::new(&path).load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_cache_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("calendar.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            JsonCalendarCache::new(&path).load(),
            Err(TraitError::ParseError(_))
        ));
    }

    #[test]
    fn test_clear() {
        let dir = tempdir().unwrap();
        let cache = JsonCalendarCache::new(dir.path().join("calendar.json"));
        cache.clear().unwrap();
        cache.store(&table()).unwrap();
        cache.clear().unwrap();
        assert!(cache.load().unwrap().is_none());
    }
}
