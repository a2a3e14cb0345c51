//! Calendar command implementation.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use ttf_core::calendar::SharedCalendar;
use ttf_core::types::{ContractRecord, Month};
use ttf_ext_file::refresh;

use crate::cli::OutputFormat;
use crate::commands::Context;
use crate::output::{print_header, print_info, print_output, KeyValue};

/// Arguments for the calendar command.
#[derive(Args, Debug)]
pub struct CalendarArgs {
    #[command(subcommand)]
    pub command: CalendarCommand,
}

/// Calendar subcommands.
#[derive(Subcommand, Debug)]
pub enum CalendarCommand {
    /// List known contracts
    List {
        /// Only contracts delivering in this month (name or abbreviation)
        #[arg(long)]
        month: Option<String>,

        /// Only contracts whose contract month falls in this year
        #[arg(long)]
        year: Option<i32>,
    },

    /// Show data-quality warnings found while loading
    Warnings,

    /// Rebuild the calendar from CSV and rewrite the cache
    Rebuild,
}

/// A contract row for display.
#[derive(Debug, Clone, Serialize, Tabled)]
struct ContractRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Source Code")]
    original_code: String,
    #[tabled(rename = "Delivery")]
    delivery_month: String,
    #[tabled(rename = "Contract Month")]
    contract_month: String,
    #[tabled(rename = "Expiry")]
    expiry: String,
}

impl From<&ContractRecord> for ContractRow {
    fn from(record: &ContractRecord) -> Self {
        Self {
            code: record.code.clone(),
            original_code: record.original_code.clone(),
            delivery_month: record
                .delivery_month
                .map_or_else(|| "-".to_string(), |d| d.long_name()),
            contract_month: record.contract_month.to_string(),
            expiry: record.expiry_date.to_string(),
        }
    }
}

/// Execute the calendar command.
pub fn execute(args: CalendarArgs, format: OutputFormat, ctx: &Context) -> Result<()> {
    match args.command {
        CalendarCommand::List { month, year } => list(month.as_deref(), year, format, ctx),
        CalendarCommand::Warnings => warnings(format, ctx),
        CalendarCommand::Rebuild => rebuild(ctx),
    }
}

fn list(month: Option<&str>, year: Option<i32>, format: OutputFormat, ctx: &Context) -> Result<()> {
    let month = month
        .map(str::parse::<Month>)
        .transpose()
        .context("invalid --month")?;
    let table = ctx.load_calendar()?;

    let rows: Vec<ContractRow> = table
        .iter()
        .filter(|r| month.map_or(true, |m| r.month_name == Some(m)))
        .filter(|r| year.map_or(true, |y| r.contract_year == y))
        .map(ContractRow::from)
        .collect();

    if format == OutputFormat::Table && !ctx.quiet {
        print_header(&format!("{} of {} contracts", rows.len(), table.len()));
    }
    print_output(&rows, format)
}

fn warnings(format: OutputFormat, ctx: &Context) -> Result<()> {
    let table = ctx.load_calendar()?;
    if table.warnings().is_empty() {
        if !ctx.quiet {
            print_info("No data warnings.");
        }
        return Ok(());
    }

    let rows: Vec<KeyValue> = table
        .warnings()
        .iter()
        .enumerate()
        .map(|(i, w)| KeyValue::new((i + 1).to_string(), w.to_string()))
        .collect();
    print_output(&rows, format)
}

fn rebuild(ctx: &Context) -> Result<()> {
    let source = ctx.calendar_source()?;
    let shared = SharedCalendar::default();
    refresh(&shared, &source, &ctx.cache())?;

    let table = shared.snapshot();
    if !ctx.quiet {
        print_info(&format!(
            "Rebuilt {} contracts ({} warnings) into {}",
            table.len(),
            table.warnings().len(),
            ctx.cache_path().display()
        ));
    }
    Ok(())
}
