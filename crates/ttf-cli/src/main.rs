//! TTF CLI - Resolve TTF futures references to concrete contracts.
//!
//! # Usage
//!
//! ```bash
//! # Front contract still trading on a date
//! ttf query TFM1 --kind generic --date 2025-03-14
//!
//! # Next April contract expiring after a date
//! ttf query TFMAPR1 --kind monthly_generic --date 2025-03-14
//!
//! # Spread legs and the last five days of spread bars
//! ttf spread TFMDECJUN1 --date 2025-03-14 --bars
//!
//! # Price changes for a contract
//! ttf bars 'TFM\J25' --changes --days 3
//!
//! # Rebuild the calendar cache
//! ttf calendar rebuild
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod config;
mod error;
mod output;

use cli::{Cli, Commands};
use commands::Context;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.quiet { "error" } else { "warn,ttf=info" };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let ctx = Context::from_cli(&cli)?;
    let format = cli.format;
    tracing::debug!(config = ?ctx.config, "Configuration loaded");

    match cli.command {
        Commands::Query(args) => commands::query::execute(args, format, &ctx)?,
        Commands::Spread(args) => commands::spread::execute(args, format, &ctx)?,
        Commands::Bars(args) => commands::bars::execute(args, format, &ctx)?,
        Commands::Calendar(args) => commands::calendar::execute(args, format, &ctx)?,
    }

    Ok(())
}
