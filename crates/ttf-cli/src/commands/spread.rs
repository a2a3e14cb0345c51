//! Spread command implementation.
//!
//! Resolves a calendar spread to its two legs and, optionally, prints the
//! joined spread price series.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use ttf_core::bars::{spread_series, window};
use ttf_core::query::{QueryFacade, QueryResponse};
use ttf_core::resolve::ResolvedSpread;
use ttf_core::types::ReferenceKind;
use ttf_traits::IntradaySource;

use crate::cli::OutputFormat;
use crate::commands::bars::{latest_date, BarRow};
use crate::commands::query::{metadata_rows, render};
use crate::commands::{Context, PointInTimeArgs};
use crate::output::{print_header, print_info, print_output, print_single, KeyValue};

/// Arguments for the spread command.
#[derive(Args, Debug)]
pub struct SpreadArgs {
    /// Spread code, e.g. TFMDECJUN1
    pub code: String,

    #[command(flatten)]
    pub when: PointInTimeArgs,

    /// Also print the spread's intraday bars
    #[arg(long)]
    pub bars: bool,

    /// Calendar days of bars to show (defaults to the configured session days)
    #[arg(long)]
    pub days: Option<u32>,
}

/// Spread resolution together with its bars, for JSON output.
#[derive(Serialize)]
struct SpreadReport<'a> {
    resolution: &'a QueryResponse,
    bars: &'a [BarRow],
}

/// Execute the spread command.
pub fn execute(args: SpreadArgs, format: OutputFormat, ctx: &Context) -> Result<()> {
    let point_in_time = args.when.point_in_time()?;
    let table = ctx.load_calendar()?;
    let response =
        QueryFacade::new(&table).query_kind(&args.code, ReferenceKind::Spread, point_in_time)?;

    let Some(spread) = response.spread().filter(|_| args.bars) else {
        return render(&args.code, &response, format, ctx);
    };

    let prices = ctx.intraday()?;
    let leg1 = prices.bars(&spread.leg1.code)?;
    let leg2 = prices.bars(&spread.leg2.code)?;
    let series = spread_series(spread, &leg1, &leg2);

    let days = args.days.unwrap_or(ctx.config.session.days);
    let rows: Vec<BarRow> = match args.when.as_of()?.or_else(|| latest_date(&series.bars)) {
        Some(as_of) => window(&series.bars, as_of, days).iter().map(BarRow::from).collect(),
        None => Vec::new(),
    };

    if format == OutputFormat::Json {
        return print_single(&SpreadReport {
            resolution: &response,
            bars: &rows,
        });
    }

    render(&args.code, &response, format, ctx)?;
    if rows.is_empty() {
        print_info(&format!(
            "No overlapping bars for {} and {}",
            series.leg1_code, series.leg2_code
        ));
        return Ok(());
    }
    if format == OutputFormat::Table && !ctx.quiet {
        print_header(&format!("{} ({}) bars", series.spread_code, series.spread_type));
    }
    print_output(&rows, format)
}

/// Rows describing a resolved spread.
pub fn spread_rows(spread: &ResolvedSpread) -> Vec<KeyValue> {
    let mut rows = vec![
        KeyValue::new("Spread", spread.spread_code.clone()),
        KeyValue::new("Type", spread.spread_type.clone()),
        KeyValue::new(
            "Leg 1",
            format!(
                "{} ({} {}, expires {})",
                spread.leg1.code, spread.leg1.month, spread.leg1.year, spread.leg1.expiry_date
            ),
        ),
        KeyValue::new(
            "Leg 2",
            format!(
                "{} ({} {}, expires {})",
                spread.leg2.code, spread.leg2.month, spread.leg2.year, spread.leg2.expiry_date
            ),
        ),
        KeyValue::new("Back leg rolled", spread.metadata.rolled.to_string()),
    ];
    rows.extend(metadata_rows(&spread.metadata.leg1));
    rows
}
