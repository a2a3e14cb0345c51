//! Date type for contract calendars.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{TtfError, TtfResult};

/// A calendar date used for expiries and points in time.
///
/// This is a newtype wrapper around `chrono::NaiveDate` so that contract
/// dates cannot be confused with arbitrary timestamps.
///
/// # Example
///
/// ```rust
/// use ttf_core::types::Date;
///
/// let expiry = Date::from_ymd(2025, 4, 15).unwrap();
/// assert_eq!(expiry.year(), 2025);
/// assert_eq!(expiry.to_string(), "2025-04-15");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a new date from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns `TtfError::InvalidDate` if the date is invalid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> TtfResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| TtfError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Creates a date from an ISO 8601 string (YYYY-MM-DD).
    ///
    /// # Errors
    ///
    /// Returns `TtfError::InvalidDate` if the string is not a valid date.
    pub fn parse(s: &str) -> TtfResult<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|_| TtfError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Adds a number of days to the date, `None` past the representable range.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Option<Self> {
        chrono::Duration::try_days(days)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map(Date)
    }

    /// Returns the underlying `NaiveDate`.
    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        date.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_creation() {
        let date = Date::from_ymd(2025, 4, 15).unwrap();
        assert_eq!(date.year(), 2025);
        assert_eq!(date.month(), 4);
    }

    #[test]
    fn test_invalid_date() {
        assert!(Date::from_ymd(2025, 2, 30).is_err());
        assert!(Date::from_ymd(2025, 13, 1).is_err());
    }

    #[test]
    fn test_parse() {
        let date = Date::parse("2025-12-19").unwrap();
        assert_eq!(date, Date::from_ymd(2025, 12, 19).unwrap());
        assert!(Date::parse("19.12.2025").is_err());
    }

    #[test]
    fn test_add_days() {
        let d1 = Date::from_ymd(2025, 1, 1).unwrap();
        assert_eq!(d1.add_days(10), Some(Date::from_ymd(2025, 1, 11).unwrap()));
        assert_eq!(d1.add_days(-1), Some(Date::from_ymd(2024, 12, 31).unwrap()));
    }

    #[test]
    fn test_add_days_out_of_range() {
        let d1 = Date::from_ymd(2025, 3, 3).unwrap();
        assert_eq!(d1.add_days(-i64::from(u32::MAX)), None);
        assert_eq!(d1.add_days(i64::MAX), None);
    }

    #[test]
    fn test_display() {
        let date = Date::from_ymd(2026, 6, 17).unwrap();
        assert_eq!(format!("{}", date), "2026-06-17");
    }

    #[test]
    fn test_serde() {
        let date = Date::from_ymd(2025, 4, 15).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2025-04-15\"");
        let parsed: Date = serde_json::from_str(&json).unwrap();
        assert_eq!(date, parsed);
    }
}
