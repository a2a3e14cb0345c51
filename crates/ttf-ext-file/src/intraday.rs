//! CSV intraday price source.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDateTime;
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::Deserialize;

use ttf_core::bars::Bar;
use ttf_core::codes::normalize_code;
use ttf_traits::error::TraitError;
use ttf_traits::intraday::IntradaySource;

// =============================================================================
// CSV INTRADAY SOURCE
// =============================================================================

/// CSV record for intraday bars.
#[derive(Debug, Deserialize)]
struct BarRecord {
    symbol: String,
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "OPEN")]
    open: String,
    #[serde(rename = "HIGH")]
    high: String,
    #[serde(rename = "LOW")]
    low: String,
    #[serde(rename = "CLOSE")]
    close: String,
    #[serde(rename = "VOLUME")]
    volume: String,
}

const TIME_FORMATS: [&str; 2] = ["%d.%m.%Y %H:%M:%S", "%d.%m.%Y %H:%M"];

/// Intraday OHLCV bars exported as delimited text.
///
/// Columns are `symbol;Time;OPEN;HIGH;LOW;CLOSE;VOLUME` with `Time` as
/// `DD.MM.YYYY HH:MM[:SS]`. Prices may use either `.` or `,` as the decimal
/// separator. Symbols are normalized, so bars are looked up by `TFM\J25`
/// whatever prefix the export carried.
pub struct CsvIntradaySource {
    file_path: PathBuf,
    delimiter: u8,
    bars: DashMap<String, Vec<Bar>>,
}

impl CsvIntradaySource {
    /// Create a new CSV intraday source from a `;`-delimited file.
    pub fn new(file_path: impl AsRef<Path>) -> Result<Self, TraitError> {
        Self::with_delimiter(file_path, b';')
    }

    /// Create a new CSV intraday source with a custom delimiter.
    pub fn with_delimiter(file_path: impl AsRef<Path>, delimiter: u8) -> Result<Self, TraitError> {
        let source = Self {
            file_path: file_path.as_ref().to_path_buf(),
            delimiter,
            bars: DashMap::new(),
        };
        source.reload()?;
        Ok(source)
    }

    /// Reload bars from file.
    ///
    /// The whole file is parsed before the loaded bars are replaced, so a
    /// failed reload leaves the previous bars in place.
    pub fn reload(&self) -> Result<(), TraitError> {
        if !self.file_path.exists() {
            tracing::warn!(path = %self.file_path.display(), "Intraday file missing, no prices loaded");
            self.bars.clear();
            return Ok(()); // Empty source
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_path(&self.file_path)
            .map_err(|e| TraitError::IoError(e.to_string()))?;

        let mut loaded: HashMap<String, Vec<Bar>> = HashMap::new();
        let mut count = 0usize;
        for result in reader.deserialize() {
            let record: BarRecord = result.map_err(|e| TraitError::ParseError(e.to_string()))?;
            let code = normalize_code(&record.symbol).to_string();
            let bar = to_bar(&record)?;
            loaded.entry(code).or_default().push(bar);
            count += 1;
        }
        for bars in loaded.values_mut() {
            bars.sort_by_key(|b| b.timestamp);
        }

        self.bars.clear();
        let contracts = loaded.len();
        for (code, bars) in loaded {
            self.bars.insert(code, bars);
        }

        tracing::info!(
            path = %self.file_path.display(),
            bars = count,
            contracts,
            "Loaded intraday prices"
        );
        Ok(())
    }

    /// Number of bars loaded across every contract.
    pub fn len(&self) -> usize {
        self.bars.iter().map(|entry| entry.value().len()).sum()
    }

    /// Whether no bars are loaded.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

impl IntradaySource for CsvIntradaySource {
    fn bars(&self, code: &str) -> Result<Vec<Bar>, TraitError> {
        Ok(self
            .bars
            .get(normalize_code(code))
            .map(|bars| bars.clone())
            .unwrap_or_default())
    }

    fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.bars.iter().map(|entry| entry.key().clone()).collect();
        codes.sort();
        codes
    }
}

fn to_bar(record: &BarRecord) -> Result<Bar, TraitError> {
    Ok(Bar {
        timestamp: parse_timestamp(&record.time)?,
        open: parse_decimal(&record.open, "OPEN")?,
        high: parse_decimal(&record.high, "HIGH")?,
        low: parse_decimal(&record.low, "LOW")?,
        close: parse_decimal(&record.close, "CLOSE")?,
        volume: parse_decimal(&record.volume, "VOLUME")?,
    })
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, TraitError> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| TraitError::ParseError(format!("unrecognized timestamp '{s}'")))
}

fn parse_decimal(s: &str, column: &str) -> Result<Decimal, TraitError> {
    let normalized = s.replace(',', ".");
    Decimal::from_str(&normalized)
        .map_err(|e| TraitError::ParseError(format!("{column} value '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use ttf_core::types::Date;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const SAMPLE: &str = "symbol;Time;OPEN;HIGH;LOW;CLOSE;VOLUME\n\
        ENDEX::F:TFM\\J25;03.03.2025 09:15;40,50;41,00;40,25;40,75;120\n\
        ENDEX::F:TFM\\J25;03.03.2025 09:00:00;40.00;40.60;39.90;40.50;80\n\
        ENDEX::F:TFM\\K25;03.03.2025 09:00;38.10;38.20;38.00;38.05;15\n";

    #[test]
    fn test_load_and_sort() {
        let file = write_csv(SAMPLE);
        let source = CsvIntradaySource::new(file.path()).unwrap();

        assert_eq!(source.len(), 3);
        assert_eq!(source.codes(), vec!["TFM\\J25", "TFM\\K25"]);

        let bars = source.bars("TFM\\J25").unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, dec!(40.50));
        assert_eq!(bars[1].open, dec!(40.50));
        assert_eq!(bars[1].volume, dec!(120));
    }

    #[test]
    fn test_lookup_with_prefix() {
        let file = write_csv(SAMPLE);
        let source = CsvIntradaySource::new(file.path()).unwrap();
        assert_eq!(source.bars("ENDEX::F:TFM\\K25").unwrap().len(), 1);
        assert!(source.bars("TFM\\M25").unwrap().is_empty());
    }

    #[test]
    fn test_window_through_trait() {
        let file = write_csv(SAMPLE);
        let source = CsvIntradaySource::new(file.path()).unwrap();
        let bars = source
            .bars_in_window("TFM\\J25", Date::from_ymd(2025, 3, 2).unwrap(), 5)
            .unwrap();
        assert!(bars.is_empty());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let source = CsvIntradaySource::new("/nonexistent/contract_data.csv").unwrap();
        assert!(source.is_empty());
    }

    #[test]
    fn test_bad_price() {
        let file = write_csv(
            "symbol;Time;OPEN;HIGH;LOW;CLOSE;VOLUME\nTFM\\J25;03.03.2025 09:00;n/a;1;1;1;1\n",
        );
        let err = CsvIntradaySource::new(file.path()).err().unwrap();
        assert!(err.to_string().contains("OPEN"));
    }

    #[test]
    fn test_reload_replaces() {
        let file = write_csv(SAMPLE);
        let source = CsvIntradaySource::new(file.path()).unwrap();
        std::fs::write(
            file.path(),
            "symbol;Time;OPEN;HIGH;LOW;CLOSE;VOLUME\nTFM\\Z25;04.03.2025 10:00;30;30;30;30;1\n",
        )
        .unwrap();
        source.reload().unwrap();
        assert_eq!(source.codes(), vec!["TFM\\Z25"]);
    }

    #[test]
    fn test_failed_reload_keeps_previous_bars() {
        let file = write_csv(SAMPLE);
        let source = CsvIntradaySource::new(file.path()).unwrap();
        std::fs::write(
            file.path(),
            "symbol;Time;OPEN;HIGH;LOW;CLOSE;VOLUME\n\
             TFM\\K25;04.03.2025 10:00;30;30;30;30;1\n\
             TFM\\J25;2025-03-04T10:00;30;30;30;30;1\n",
        )
        .unwrap();

        assert!(source.reload().is_err());
        assert_eq!(source.codes(), vec!["TFM\\J25", "TFM\\K25"]);
        assert_eq!(source.len(), 3);
        assert_eq!(source.bars("TFM\\K25").unwrap()[0].close, dec!(38.05));
    }
}
