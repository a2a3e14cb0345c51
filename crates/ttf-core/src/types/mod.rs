//! Domain types for contract resolution.
//!
//! - [`Date`]: Calendar date for expiries and points in time
//! - [`Month`], [`YearMonth`]: Calendar months and contract months
//! - [`CalendarRow`], [`ContractRecord`]: Raw and normalized calendar rows
//! - [`SecurityReference`], [`ReferenceKind`], [`Sequence`]: Parsed references
//! - [`PointInTime`]: Reference date or expiry window

mod contract;
mod date;
mod month;
mod reference;

pub use contract::{CalendarRow, ContractRecord};
pub use date::Date;
pub use month::{Month, YearMonth};
pub use reference::{PointInTime, ReferenceKind, SecurityReference, Sequence};
