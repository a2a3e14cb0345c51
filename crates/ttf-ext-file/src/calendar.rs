//! CSV contract calendar source.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use ttf_core::types::{CalendarRow, Date, YearMonth};
use ttf_traits::calendar::CalendarSource;
use ttf_traits::error::TraitError;

// =============================================================================
// CSV CALENDAR SOURCE
// =============================================================================

/// CSV record for calendar rows.
#[derive(Debug, Deserialize)]
struct CalendarRecord {
    #[serde(rename = "TFM_Code")]
    code: String,
    contract_month: String,
    expiry_date: String,
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%d.%m.%Y %H:%M:%S"];

/// Contract calendar exported as delimited text.
///
/// Expected columns are `TFM_Code`, `contract_month` and `expiry_date`;
/// further columns are ignored. The file is read on every
/// [`load_rows`](CalendarSource::load_rows) call, so a source can be built
/// before the file exists.
#[derive(Debug, Clone)]
pub struct CsvCalendarSource {
    file_path: PathBuf,
    delimiter: u8,
}

impl CsvCalendarSource {
    /// Create a source for a `;`-delimited file.
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
            delimiter: b';',
        }
    }

    /// Use a different field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Path of the backing file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl CalendarSource for CsvCalendarSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn load_rows(&self) -> Result<Vec<CalendarRow>, TraitError> {
        if !self.file_path.exists() {
            return Err(TraitError::SourceNotAvailable(format!(
                "calendar file {} does not exist",
                self.file_path.display()
            )));
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_path(&self.file_path)
            .map_err(|e| TraitError::IoError(e.to_string()))?;

        let mut rows = Vec::new();
        for (line, result) in reader.deserialize().enumerate() {
            let record: CalendarRecord =
                result.map_err(|e| TraitError::ParseError(e.to_string()))?;
            let row = to_row(record).map_err(|e| {
                TraitError::ParseError(format!("{} row {}: {e}", self.file_path.display(), line + 1))
            })?;
            rows.push(row);
        }

        tracing::info!(
            path = %self.file_path.display(),
            rows = rows.len(),
            "Loaded contract calendar"
        );
        Ok(rows)
    }
}

fn to_row(record: CalendarRecord) -> Result<CalendarRow, TraitError> {
    let contract_month = parse_contract_month(&record.contract_month)?;
    let expiry_date = parse_date(&record.expiry_date)?;
    Ok(CalendarRow::new(record.code, contract_month, expiry_date))
}

/// Parses a calendar date in any of the formats seen in exports.
pub(crate) fn parse_date(s: &str) -> Result<Date, TraitError> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .map(Date::from)
        .ok_or_else(|| TraitError::ParseError(format!("unrecognized date '{s}'")))
}

fn parse_contract_month(s: &str) -> Result<YearMonth, TraitError> {
    YearMonth::parse(s.trim())
        .or_else(|_| parse_date(s).map(YearMonth::from))
        .map_err(|_| TraitError::ParseError(format!("unrecognized contract month '{s}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use ttf_core::types::Month;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_rows() {
        let file = write_csv(
            "TFM_Code;contract_month;expiry_date;Description\n\
             ENDEX::F:TFM\\J25;2025-04-01;2025-03-28;TTF Apr-25\n\
             ENDEX::F:TFM\\K25;2025-05;28.04.2025;TTF May-25\n",
        );
        let rows = CsvCalendarSource::new(file.path()).load_rows().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].code, "ENDEX::F:TFM\\J25");
        assert_eq!(rows[0].contract_month, YearMonth::new(2025, Month::April));
        assert_eq!(rows[1].contract_month, YearMonth::new(2025, Month::May));
        assert_eq!(rows[1].expiry_date, Date::from_ymd(2025, 4, 28).unwrap());
    }

    #[test]
    fn test_custom_delimiter() {
        let file = write_csv("TFM_Code,contract_month,expiry_date\nTFM\\Z25,2025-12-01,2025-11-27\n");
        let table = CsvCalendarSource::new(file.path())
            .with_delimiter(b',')
            .load_table()
            .unwrap();
        assert!(table.get("TFM\\Z25").is_some());
    }

    #[test]
    fn test_missing_file() {
        let source = CsvCalendarSource::new("/nonexistent/ttf_calendar.csv");
        assert!(matches!(
            source.load_rows(),
            Err(TraitError::SourceNotAvailable(_))
        ));
    }

    #[test]
    fn test_bad_date_reports_row() {
        let file = write_csv("TFM_Code;contract_month;expiry_date\nTFM\\J25;2025-04;soon\n");
        let err = CsvCalendarSource::new(file.path()).load_rows().unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = Date::from_ymd(2025, 4, 15).unwrap();
        assert_eq!(parse_date("2025-04-15").unwrap(), expected);
        assert_eq!(parse_date("15.04.2025").unwrap(), expected);
        assert_eq!(parse_date("2025-04-15 00:00:00").unwrap(), expected);
        assert!(parse_date("15 April").is_err());
    }
}
