//! Bars command implementation.
//!
//! Prints intraday bars for whatever a reference resolves to: the contract's
//! own bars, or the joined series for a spread.

use anyhow::Result;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

use ttf_core::bars::{price_changes, spread_series, window, Bar, PriceChange};
use ttf_core::query::{QueryFacade, QueryOutcome};
use ttf_core::types::Date;
use ttf_traits::IntradaySource;

use crate::cli::OutputFormat;
use crate::commands::{Context, PointInTimeArgs};
use crate::error::CliError;
use crate::output::{print_header, print_info, print_output};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Arguments for the bars command.
#[derive(Args, Debug)]
pub struct BarsArgs {
    /// Reference, e.g. TFM\J25, TFM1 or TFMDECJUN1
    pub reference: String,

    /// Reference kind: specific, generic, monthly_generic or spread
    #[arg(short, long, default_value = "specific")]
    pub kind: String,

    #[command(flatten)]
    pub when: PointInTimeArgs,

    /// Calendar days of bars to show (defaults to the configured session days)
    #[arg(long)]
    pub days: Option<u32>,

    /// Show each in-session bar's change from the previous close
    #[arg(long)]
    pub changes: bool,
}

/// One intraday bar.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct BarRow {
    #[tabled(rename = "Time")]
    pub timestamp: String,
    #[tabled(rename = "Open")]
    pub open: Decimal,
    #[tabled(rename = "High")]
    pub high: Decimal,
    #[tabled(rename = "Low")]
    pub low: Decimal,
    #[tabled(rename = "Close")]
    pub close: Decimal,
    #[tabled(rename = "Volume")]
    pub volume: Decimal,
}

impl From<&Bar> for BarRow {
    fn from(bar: &Bar) -> Self {
        Self {
            timestamp: bar.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}

/// One bar's change from the previous close.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct ChangeRow {
    #[tabled(rename = "Time")]
    pub timestamp: String,
    #[tabled(rename = "Close")]
    pub close: Decimal,
    #[tabled(rename = "Prev Close")]
    pub reference: Decimal,
    #[tabled(rename = "Change")]
    pub change: Decimal,
}

impl From<&PriceChange> for ChangeRow {
    fn from(change: &PriceChange) -> Self {
        Self {
            timestamp: change.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            close: change.close,
            reference: change.reference,
            change: change.change,
        }
    }
}

/// Date of the last bar, if any.
pub fn latest_date(bars: &[Bar]) -> Option<Date> {
    bars.iter().map(Bar::date).max().map(Date::from)
}

/// Execute the bars command.
pub fn execute(args: BarsArgs, format: OutputFormat, ctx: &Context) -> Result<()> {
    let point_in_time = args.when.point_in_time()?;
    let table = ctx.load_calendar()?;
    let response = QueryFacade::new(&table).query(&args.reference, &args.kind, point_in_time)?;

    let prices = ctx.intraday()?;
    let (label, bars) = match &response.outcome {
        QueryOutcome::Contract(contract) => {
            let code = contract.code().to_string();
            let bars = prices.bars(&code)?;
            (code, bars)
        }
        QueryOutcome::Spread(spread) => {
            let leg1 = prices.bars(&spread.leg1.code)?;
            let leg2 = prices.bars(&spread.leg2.code)?;
            let series = spread_series(spread, &leg1, &leg2);
            (series.spread_code, series.bars)
        }
        QueryOutcome::NoMatch(reason) => {
            return Err(CliError::NoMatch {
                reference: args.reference,
                reason: reason.clone(),
            }
            .into());
        }
    };

    let Some(as_of) = args.when.as_of()?.or_else(|| latest_date(&bars)) else {
        print_info(&format!("No bars for {label}"));
        return Ok(());
    };
    let days = args.days.unwrap_or(ctx.config.session.days);
    let bars = window(&bars, as_of, days);

    if format == OutputFormat::Table && !ctx.quiet {
        print_header(&format!("{label} bars, {days} days to {as_of}"));
    }

    if args.changes {
        let rows: Vec<ChangeRow> = price_changes(&bars, ctx.config.session.window())
            .iter()
            .map(ChangeRow::from)
            .collect();
        print_output(&rows, format)
    } else {
        let rows: Vec<BarRow> = bars.iter().map(BarRow::from).collect();
        print_output(&rows, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(day: u32, hour: u32) -> Bar {
        let timestamp = NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        Bar {
            timestamp,
            open: Decimal::from(40),
            high: Decimal::from(41),
            low: Decimal::from(39),
            close: Decimal::from(40),
            volume: Decimal::from(10),
        }
    }

    #[test]
    fn test_latest_date() {
        let bars = vec![bar(3, 9), bar(5, 8), bar(4, 16)];
        assert_eq!(latest_date(&bars), Some(Date::from_ymd(2025, 3, 5).unwrap()));
        assert_eq!(latest_date(&[]), None);
    }

    #[test]
    fn test_bar_row_timestamp() {
        let row = BarRow::from(&bar(3, 9));
        assert_eq!(row.timestamp, "2025-03-03 09:00");
        assert_eq!(row.close, Decimal::from(40));
    }
}
