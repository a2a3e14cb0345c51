//! # TTF Traits
//!
//! Collaborator traits for TTF contract resolution.
//!
//! This crate contains ONLY trait definitions. Implementations live in
//! extension crates such as `ttf-ext-file`.
//!
//! ## Module Structure
//!
//! - [`calendar`]: calendar row sources and built-table caches
//! - [`intraday`]: intraday OHLCV bar sources
//!
//! ## Dependency Injection
//!
//! The core never does I/O. A front end wires sources in and hands the core
//! a built table:
//!
//! ```ignore
//! let table = load_or_build(&CsvCalendarSource::new(path)?, &JsonCalendarCache::new(cache))?;
//! let response = QueryFacade::new(&table).query("TFMAPR1", "monthly_generic", Some(pit))?;
//! let bars = prices.bars(&response.codes()[0])?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod calendar;
pub mod error;
pub mod intraday;

// Re-export commonly used types
pub use calendar::{CalendarCache, CalendarSource};
pub use error::TraitError;
pub use intraday::IntradaySource;
