//! Calendar months and year-month values.
//!
//! Futures codes name months three ways: the single-letter exchange month
//! code (`J` for April), the three-letter abbreviation used by generic
//! references (`APR`), and the full name (`April`). [`Month`] converts
//! between all three.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{TtfError, TtfResult};
use crate::types::Date;

/// A calendar month.
///
/// Variants are declared in calendar order, so the derived `Ord` matches
/// January < ... < December.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    /// January (`F`).
    January,
    /// February (`G`).
    February,
    /// March (`H`).
    March,
    /// April (`J`).
    April,
    /// May (`K`).
    May,
    /// June (`M`).
    June,
    /// July (`N`).
    July,
    /// August (`Q`).
    August,
    /// September (`U`).
    September,
    /// October (`V`).
    October,
    /// November (`X`).
    November,
    /// December (`Z`).
    December,
}

const CODE_LETTERS: [char; 12] = ['F', 'G', 'H', 'J', 'K', 'M', 'N', 'Q', 'U', 'V', 'X', 'Z'];

const ABBREVIATIONS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

const NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl Month {
    /// All months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Zero-based position in the calendar (January = 0, December = 11).
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Month number (1-12).
    #[must_use]
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    /// Creates a month from its number (1-12).
    #[must_use]
    pub fn from_number(number: u32) -> Option<Self> {
        let index = usize::try_from(number.checked_sub(1)?).ok()?;
        Self::ALL.get(index).copied()
    }

    /// Exchange month code letter.
    #[must_use]
    pub fn code_letter(self) -> char {
        CODE_LETTERS[self.index()]
    }

    /// Creates a month from an exchange month code letter (case-sensitive).
    #[must_use]
    pub fn from_code_letter(letter: char) -> Option<Self> {
        CODE_LETTERS
            .iter()
            .position(|&c| c == letter)
            .map(|i| Self::ALL[i])
    }

    /// Upper-case three-letter abbreviation (`APR`).
    #[must_use]
    pub fn abbr(self) -> &'static str {
        ABBREVIATIONS[self.index()]
    }

    /// Creates a month from a three-letter abbreviation, ignoring case.
    #[must_use]
    pub fn from_abbr(abbr: &str) -> Option<Self> {
        ABBREVIATIONS
            .iter()
            .position(|a| a.eq_ignore_ascii_case(abbr))
            .map(|i| Self::ALL[i])
    }

    /// Full English month name (`April`).
    #[must_use]
    pub fn name(self) -> &'static str {
        NAMES[self.index()]
    }

    /// Creates a month from its full name, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        NAMES
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
            .map(|i| Self::ALL[i])
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Month {
    type Err = TtfError;

    /// Accepts either the full name or the three-letter abbreviation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::from_name(s)
            .or_else(|| Self::from_abbr(s))
            .ok_or_else(|| TtfError::invalid_month(s))
    }
}

/// A year and month, ordered chronologically.
///
/// Used both for a contract's nominal `contract_month` and for the delivery
/// month encoded in its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    /// Calendar year.
    pub year: i32,
    /// Calendar month.
    pub month: Month,
}

impl YearMonth {
    /// Creates a new year-month.
    #[must_use]
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// Creates a year-month from a year and a month number (1-12).
    ///
    /// # Errors
    ///
    /// Returns `TtfError::InvalidDate` if `month` is out of range.
    pub fn from_ym(year: i32, month: u32) -> TtfResult<Self> {
        Month::from_number(month)
            .map(|m| Self::new(year, m))
            .ok_or_else(|| TtfError::invalid_date(format!("{year}-{month:02}")))
    }

    /// Parses `YYYY-MM`.
    ///
    /// # Errors
    ///
    /// Returns `TtfError::InvalidDate` for anything else.
    pub fn parse(s: &str) -> TtfResult<Self> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| TtfError::invalid_date(format!("Cannot parse year-month: {s}")))?;
        let year: i32 = year
            .parse()
            .map_err(|_| TtfError::invalid_date(format!("Cannot parse year-month: {s}")))?;
        let month: u32 = month
            .parse()
            .map_err(|_| TtfError::invalid_date(format!("Cannot parse year-month: {s}")))?;
        Self::from_ym(year, month)
    }

    /// Human-readable form, e.g. `April 2025`.
    #[must_use]
    pub fn long_name(&self) -> String {
        format!("{} {}", self.month.name(), self.year)
    }
}

impl From<Date> for YearMonth {
    fn from(date: Date) -> Self {
        // Date::month() is always 1-12.
        let month = Month::from_number(date.month()).unwrap_or(Month::January);
        Self::new(date.year(), month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_letters_cover_calendar() {
        for month in Month::ALL {
            assert_eq!(Month::from_code_letter(month.code_letter()), Some(month));
        }
        assert_eq!(Month::from_code_letter('J'), Some(Month::April));
        assert_eq!(Month::from_code_letter('Z'), Some(Month::December));
        assert_eq!(Month::from_code_letter('A'), None);
        assert_eq!(Month::from_code_letter('j'), None);
    }

    #[test]
    fn test_abbr_and_name() {
        assert_eq!(Month::from_abbr("apr"), Some(Month::April));
        assert_eq!(Month::from_abbr("XYZ"), None);
        assert_eq!(Month::June.abbr(), "JUN");
        assert_eq!(Month::from_name("december"), Some(Month::December));
        assert_eq!(Month::September.name(), "September");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("April".parse::<Month>().unwrap(), Month::April);
        assert_eq!("dec".parse::<Month>().unwrap(), Month::December);
        assert!("Smarch".parse::<Month>().is_err());
    }

    #[test]
    fn test_calendar_order() {
        assert_eq!(Month::January.index(), 0);
        assert_eq!(Month::December.index(), 11);
        assert!(Month::June < Month::December);
        assert_eq!(Month::from_number(4), Some(Month::April));
        assert_eq!(Month::from_number(0), None);
        assert_eq!(Month::from_number(13), None);
    }

    #[test]
    fn test_year_month_ordering() {
        let dec25 = YearMonth::new(2025, Month::December);
        let jan26 = YearMonth::new(2026, Month::January);
        assert!(dec25 < jan26);
    }

    #[test]
    fn test_year_month_parse_and_display() {
        let ym = YearMonth::parse("2025-04").unwrap();
        assert_eq!(ym, YearMonth::new(2025, Month::April));
        assert_eq!(ym.to_string(), "2025-04");
        assert_eq!(ym.long_name(), "April 2025");
        assert!(YearMonth::parse("2025-13").is_err());
        assert!(YearMonth::parse("April").is_err());
    }

    #[test]
    fn test_year_month_from_date() {
        let date = Date::from_ymd(2026, 6, 17).unwrap();
        assert_eq!(YearMonth::from(date), YearMonth::new(2026, Month::June));
    }
}
