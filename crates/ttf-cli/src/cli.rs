//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{BarsArgs, CalendarArgs, QueryArgs, SpreadArgs};

/// TTF - Resolve generic, monthly and spread futures references to contracts
#[derive(Parser)]
#[command(name = "ttf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (defaults to ./ttf.toml if present)
    #[arg(long, env = "TTF_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Contract calendar CSV, overriding the configuration
    #[arg(long, global = true)]
    pub calendar: Option<PathBuf>,

    /// Intraday prices CSV, overriding the configuration
    #[arg(long, global = true)]
    pub intraday: Option<PathBuf>,

    /// Read the calendar straight from CSV, ignoring and not writing the cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a reference to a concrete contract (or spread legs)
    Query(QueryArgs),

    /// Resolve a calendar spread and show its legs
    Spread(SpreadArgs),

    /// Show intraday bars for a reference
    Bars(BarsArgs),

    /// Inspect or rebuild the contract calendar
    Calendar(CalendarArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the contract codes)
    Minimal,
}
