//! CLI command implementations.

pub mod bars;
pub mod calendar;
pub mod query;
pub mod spread;

// Re-export submodules for convenience
pub use bars::BarsArgs;
pub use calendar::CalendarArgs;
pub use query::QueryArgs;
pub use spread::SpreadArgs;

use std::path::Path;

use clap::Args;
use ttf_core::calendar::CalendarTable;
use ttf_core::types::{Date, PointInTime};
use ttf_ext_file::{load_or_build, CsvCalendarSource, CsvIntradaySource, JsonCalendarCache};
use ttf_traits::CalendarSource;

use crate::cli::Cli;
use crate::config::TtfConfig;
use crate::error::{CliError, CliResult};

/// Parses a date string in YYYY-MM-DD format.
pub fn parse_date(s: &str) -> CliResult<Date> {
    Date::parse(s).map_err(|_| CliError::InvalidDate(s.to_string()))
}

/// Point-in-time flags shared by the resolving commands.
#[derive(Args, Debug, Default)]
pub struct PointInTimeArgs {
    /// Reference date (YYYY-MM-DD)
    #[arg(short, long, conflicts_with_all = ["start", "end"])]
    pub date: Option<String>,

    /// Start of an expiry window (YYYY-MM-DD)
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// End of an expiry window (YYYY-MM-DD)
    #[arg(long, requires = "start")]
    pub end: Option<String>,
}

impl PointInTimeArgs {
    /// The point in time, or `None` to resolve without an expiry filter.
    pub fn point_in_time(&self) -> CliResult<Option<PointInTime>> {
        match (&self.date, &self.start, &self.end) {
            (Some(date), _, _) => Ok(Some(PointInTime::at(parse_date(date)?))),
            (None, Some(start), Some(end)) => {
                let window = PointInTime::range(parse_date(start)?, parse_date(end)?)
                    .map_err(|e| CliError::InvalidDate(e.to_string()))?;
                Ok(Some(window))
            }
            _ => Ok(None),
        }
    }

    /// The last date of interest: `--date`, else `--end`.
    pub fn as_of(&self) -> CliResult<Option<Date>> {
        self.date
            .as_deref()
            .or(self.end.as_deref())
            .map(parse_date)
            .transpose()
    }
}

/// Resolved configuration and data locations for one invocation.
#[derive(Debug)]
pub struct Context {
    /// Effective configuration.
    pub config: TtfConfig,
    /// Skip the calendar cache.
    pub no_cache: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
}

impl Context {
    /// Builds the context from global flags.
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        let mut config = TtfConfig::load(cli.config.as_deref())?;
        if let Some(path) = &cli.calendar {
            config.data.calendar_csv = path.clone();
        }
        if let Some(path) = &cli.intraday {
            config.data.intraday_csv = path.clone();
        }
        Ok(Self {
            config,
            no_cache: cli.no_cache,
            quiet: cli.quiet,
        })
    }

    /// The configured calendar CSV source.
    pub fn calendar_source(&self) -> CliResult<CsvCalendarSource> {
        Ok(CsvCalendarSource::new(&self.config.data.calendar_csv)
            .with_delimiter(self.config.data.delimiter_byte()?))
    }

    /// The configured calendar cache.
    pub fn cache(&self) -> JsonCalendarCache {
        JsonCalendarCache::new(&self.config.data.cache_path)
    }

    /// Path of the calendar cache.
    pub fn cache_path(&self) -> &Path {
        &self.config.data.cache_path
    }

    /// Loads the calendar, through the cache unless disabled.
    pub fn load_calendar(&self) -> anyhow::Result<CalendarTable> {
        let source = self.calendar_source()?;
        let table = if self.no_cache {
            source.load_table()?
        } else {
            load_or_build(&source, &self.cache())?
        };
        Ok(table)
    }

    /// Loads intraday prices.
    pub fn intraday(&self) -> anyhow::Result<CsvIntradaySource> {
        Ok(CsvIntradaySource::with_delimiter(
            &self.config.data.intraday_csv,
            self.config.data.delimiter_byte()?,
        )?)
    }
}
