//! # TTF Core
//!
//! Contract calendar, code parser and resolution engine for TTF natural gas
//! futures references.
//!
//! This crate turns symbolic references into concrete contracts:
//!
//! - **Codes**: the `TFM` code grammar (`TFM1`, `TFMAPR1`, `TFMDECJUN1`,
//!   `TFM\J25`) and the exchange month letters
//! - **Calendar**: an immutable, normalized table of every known contract,
//!   shared through swappable snapshots
//! - **Resolvers**: generic, monthly-generic and spread resolution with
//!   expiry and roll rules, returning typed metadata
//! - **Query facade**: one entry point dispatching on a kind tag
//! - **Bars**: spread legs joined into a synthetic price series, and price
//!   changes from the previous close
//!
//! Resolution never performs I/O. Loading the calendar and prices is left to
//! the collaborator crates.
//!
//! ## Example
//!
//! ```rust
//! use ttf_core::prelude::*;
//!
//! let table = CalendarTable::load(vec![
//!     CalendarRow::new("ENDEX::F:TFM\\Z25", YearMonth::new(2025, Month::December), Date::from_ymd(2025, 12, 19).unwrap()),
//!     CalendarRow::new("ENDEX::F:TFM\\M26", YearMonth::new(2026, Month::June), Date::from_ymd(2026, 6, 17).unwrap()),
//! ]);
//!
//! let pit = PointInTime::at(Date::from_ymd(2025, 1, 1).unwrap());
//! let response = QueryFacade::new(&table)
//!     .query("TFMDECJUN1", "spread", Some(pit))
//!     .unwrap();
//!
//! assert_eq!(response.codes(), vec!["TFM\\Z25", "TFM\\M26"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::similar_names)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::unnecessary_map_or)]

pub mod bars;
pub mod calendar;
pub mod codes;
pub mod error;
pub mod query;
pub mod resolve;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bars::{price_changes, spread_series, window, Bar, SessionWindow, SpreadSeries};
    pub use crate::calendar::{CalendarTable, DataWarning, SharedCalendar};
    pub use crate::codes::{normalize_code, parse_reference};
    pub use crate::error::{FailureStage, NoMatch, TtfError, TtfResult};
    pub use crate::query::{QueryFacade, QueryOutcome, QueryResponse};
    pub use crate::resolve::{ResolvedContract, ResolvedSpread, Resolver};
    pub use crate::types::{
        CalendarRow, ContractRecord, Date, Month, PointInTime, ReferenceKind, SecurityReference,
        Sequence, YearMonth,
    };
}

// Re-export commonly used types at crate root
pub use calendar::{CalendarTable, SharedCalendar};
pub use error::{NoMatch, TtfError, TtfResult};
pub use query::{QueryFacade, QueryResponse};
pub use types::{Date, Month, PointInTime, SecurityReference};
