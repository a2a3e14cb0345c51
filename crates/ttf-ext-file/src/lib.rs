//! # TTF Ext File
//!
//! File-based collaborators for TTF contract resolution.
//!
//! This crate provides the implementations used by the CLI and for EOD loads:
//! - CSV contract calendar source
//! - CSV intraday price source
//! - JSON calendar cache, plus [`load_or_build`] to pick between the two

#![warn(missing_docs)]
#![warn(clippy::all)]

mod bootstrap;
mod cache;
mod calendar;
mod intraday;

pub use bootstrap::{load_or_build, refresh};
pub use cache::JsonCalendarCache;
pub use calendar::CsvCalendarSource;
pub use intraday::CsvIntradaySource;
