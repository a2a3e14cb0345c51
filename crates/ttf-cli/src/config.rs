//! CLI configuration.
//!
//! ```toml
//! [data]
//! calendar_csv = "ttf_calendar.csv"
//! intraday_csv = "contract_data.csv"
//! cache_path = "ttf_calendar.json"
//! delimiter = ";"
//!
//! [session]
//! open_hour = 7
//! close_hour = 17
//! days = 5
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use ttf_core::bars::SessionWindow;

use crate::error::{CliError, CliResult};

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "ttf.toml";

/// Longest configurable look-back, in calendar days.
pub const MAX_SESSION_DAYS: u32 = 36_600;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TtfConfig {
    /// Input files.
    #[serde(default)]
    pub data: DataConfig,

    /// Trading session used for price statistics.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Input file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Contract calendar export
    #[serde(default = "default_calendar_csv")]
    pub calendar_csv: PathBuf,

    /// Intraday bar export
    #[serde(default = "default_intraday_csv")]
    pub intraday_csv: PathBuf,

    /// Built calendar cache
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// CSV field delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

/// Session hours and look-back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionConfig {
    /// First hour of the session
    #[serde(default = "default_open_hour")]
    pub open_hour: u32,

    /// Last hour of the session (inclusive)
    #[serde(default = "default_close_hour")]
    pub close_hour: u32,

    /// Calendar days shown before the reference date
    #[serde(default = "default_days")]
    pub days: u32,
}

fn default_calendar_csv() -> PathBuf {
    PathBuf::from("ttf_calendar.csv")
}

fn default_intraday_csv() -> PathBuf {
    PathBuf::from("contract_data.csv")
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("ttf_calendar.json")
}

fn default_delimiter() -> char {
    ';'
}

fn default_open_hour() -> u32 {
    7
}

fn default_close_hour() -> u32 {
    17
}

fn default_days() -> u32 {
    5
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            calendar_csv: default_calendar_csv(),
            intraday_csv: default_intraday_csv(),
            cache_path: default_cache_path(),
            delimiter: default_delimiter(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            open_hour: default_open_hour(),
            close_hour: default_close_hour(),
            days: default_days(),
        }
    }
}

impl DataConfig {
    /// The delimiter as the single byte the CSV reader wants.
    pub fn delimiter_byte(&self) -> CliResult<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| CliError::Config(format!("delimiter '{}' is not ASCII", self.delimiter)))
    }
}

impl SessionConfig {
    /// Session hours as a core session window.
    pub fn window(&self) -> SessionWindow {
        SessionWindow {
            open_hour: self.open_hour,
            close_hour: self.close_hour,
        }
    }
}

impl TtfConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit file, or `ttf.toml` if present, or defaults.
    pub fn load(explicit: Option<&Path>) -> CliResult<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> CliResult<()> {
        let session = &self.session;
        if session.open_hour > session.close_hour || session.close_hour > 23 {
            return Err(CliError::Config(format!(
                "session hours {}..={} are not a valid range",
                session.open_hour, session.close_hour
            )));
        }
        if session.days > MAX_SESSION_DAYS {
            return Err(CliError::Config(format!(
                "session days {} exceeds {MAX_SESSION_DAYS}",
                session.days
            )));
        }
        self.data.delimiter_byte()?;
        Ok(())
    }
}
