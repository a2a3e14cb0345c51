//! Intraday bar arithmetic.
//!
//! The core never reads prices itself; an intraday source hands it bars and
//! these functions do the domain arithmetic on them:
//!
//! - [`spread_series`] joins two legs on timestamp, subtracting O/H/L/C and
//!   averaging volume.
//! - [`window`] keeps the bars of the last `days` calendar days.
//! - [`price_changes`] measures each bar's close against the previous
//!   session's last close.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::resolve::ResolvedSpread;
use crate::types::Date;

/// One OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar timestamp (exchange local time).
    pub timestamp: NaiveDateTime,
    /// Opening price.
    pub open: Decimal,
    /// High price.
    pub high: Decimal,
    /// Low price.
    pub low: Decimal,
    /// Closing price.
    pub close: Decimal,
    /// Traded volume.
    pub volume: Decimal,
}

impl Bar {
    /// Calendar date of the bar.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// The spread bar `self - back` at the same timestamp.
    ///
    /// Prices are subtracted field by field; volume is the mean of both legs.
    #[must_use]
    pub fn spread_against(&self, back: &Bar) -> Bar {
        Bar {
            timestamp: self.timestamp,
            open: self.open - back.open,
            high: self.high - back.high,
            low: self.low - back.low,
            close: self.close - back.close,
            volume: (self.volume + back.volume) / Decimal::TWO,
        }
    }
}

/// A spread's synthetic price series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpreadSeries {
    /// Canonical spread code.
    pub spread_code: String,
    /// Leg month label, e.g. `DEC-JUN`.
    pub spread_type: String,
    /// Front leg contract code.
    pub leg1_code: String,
    /// Back leg contract code.
    pub leg2_code: String,
    /// Joined bars, in front-leg order.
    pub bars: Vec<Bar>,
}

/// Joins the legs of a resolved spread into one bar series.
///
/// Only timestamps present in both legs survive. Output follows the order of
/// `leg1`; if `leg2` repeats a timestamp its first bar is used.
#[must_use]
pub fn spread_series(spread: &ResolvedSpread, leg1: &[Bar], leg2: &[Bar]) -> SpreadSeries {
    let mut back: HashMap<NaiveDateTime, &Bar> = HashMap::with_capacity(leg2.len());
    for bar in leg2 {
        back.entry(bar.timestamp).or_insert(bar);
    }

    let bars: Vec<Bar> = leg1
        .iter()
        .filter_map(|front| back.get(&front.timestamp).map(|b| front.spread_against(b)))
        .collect();

    log::debug!(
        "{}: joined {} of {} front bars",
        spread.spread_code,
        bars.len(),
        leg1.len()
    );

    SpreadSeries {
        spread_code: spread.spread_code.clone(),
        spread_type: spread.spread_type.clone(),
        leg1_code: spread.leg1.code.clone(),
        leg2_code: spread.leg2.code.clone(),
        bars,
    }
}

/// Bars dated within `[as_of - days, as_of]`, inclusive, in input order.
#[must_use]
pub fn window(bars: &[Bar], as_of: Date, days: u32) -> Vec<Bar> {
    let end = as_of.as_naive_date();
    let start = as_of
        .add_days(-i64::from(days))
        .map_or(NaiveDate::MIN, |d| d.as_naive_date());
    bars.iter()
        .filter(|b| (start..=end).contains(&b.date()))
        .copied()
        .collect()
}

/// Trading hours used for session statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionWindow {
    /// First hour included.
    pub open_hour: u32,
    /// Last hour included.
    pub close_hour: u32,
}

impl Default for SessionWindow {
    fn default() -> Self {
        Self {
            open_hour: 7,
            close_hour: 17,
        }
    }
}

impl SessionWindow {
    /// Whether the bar's hour lies in `open_hour..=close_hour`.
    #[must_use]
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        (self.open_hour..=self.close_hour).contains(&timestamp.hour())
    }
}

/// A bar's move relative to the previous session's close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceChange {
    /// Bar timestamp.
    pub timestamp: NaiveDateTime,
    /// Bar close.
    pub close: Decimal,
    /// Previous session's last close, or the first day's first open.
    pub reference: Decimal,
    /// `close - reference`.
    pub change: Decimal,
}

/// Price change from the previous close for every in-session bar.
///
/// Bars outside `session` are dropped. Each remaining bar is measured
/// against the last close of the previous day that has bars; the first day
/// has no previous close and uses its own first open instead. Bars are
/// expected in time order.
#[must_use]
pub fn price_changes(bars: &[Bar], session: SessionWindow) -> Vec<PriceChange> {
    let in_session: Vec<&Bar> = bars.iter().filter(|b| session.contains(b.timestamp)).collect();

    let mut last_close: Vec<(NaiveDate, Decimal)> = Vec::new();
    for bar in &in_session {
        match last_close.last_mut() {
            Some((day, close)) if *day == bar.date() => *close = bar.close,
            _ => last_close.push((bar.date(), bar.close)),
        }
    }
    let previous_close: HashMap<NaiveDate, Decimal> = last_close
        .windows(2)
        .map(|pair| (pair[1].0, pair[0].1))
        .collect();

    let Some(first) = in_session.first() else {
        return Vec::new();
    };
    let first_open = first.open;

    in_session
        .iter()
        .map(|bar| {
            let reference = previous_close
                .get(&bar.date())
                .copied()
                .unwrap_or(first_open);
            PriceChange {
                timestamp: bar.timestamp,
                close: bar.close,
                reference,
                change: bar.close - reference,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarTable;
    use crate::resolve::Resolver;
    use crate::types::{CalendarRow, Month, PointInTime, Sequence, YearMonth};
    use rust_decimal_macros::dec;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn bar(at: &str, open: Decimal, close: Decimal, volume: Decimal) -> Bar {
        Bar {
            timestamp: ts(at),
            open,
            high: open.max(close) + dec!(1),
            low: open.min(close) - dec!(1),
            close,
            volume,
        }
    }

    fn dec_jun() -> ResolvedSpread {
        let table = CalendarTable::load(vec![
            CalendarRow::new(
                "TFM\\Z25",
                YearMonth::new(2025, Month::December),
                Date::from_ymd(2025, 12, 19).unwrap(),
            ),
            CalendarRow::new(
                "TFM\\M26",
                YearMonth::new(2026, Month::June),
                Date::from_ymd(2026, 6, 17).unwrap(),
            ),
        ]);
        Resolver::new(&table)
            .resolve_spread(
                Month::December,
                Month::June,
                Sequence::FIRST,
                Some(PointInTime::at(Date::from_ymd(2025, 1, 1).unwrap())),
            )
            .unwrap()
    }

    #[test]
    fn test_spread_against() {
        let front = bar("2025-03-03 09:00", dec!(40.50), dec!(41.00), dec!(100));
        let back = bar("2025-03-03 09:00", dec!(35.25), dec!(35.75), dec!(50));
        let spread = front.spread_against(&back);
        assert_eq!(spread.open, dec!(5.25));
        assert_eq!(spread.close, dec!(5.25));
        assert_eq!(spread.high, dec!(5.25));
        assert_eq!(spread.volume, dec!(75));
    }

    #[test]
    fn test_spread_series_inner_join() {
        let leg1 = vec![
            bar("2025-03-03 09:00", dec!(40), dec!(41), dec!(10)),
            bar("2025-03-03 09:15", dec!(41), dec!(42), dec!(10)),
            bar("2025-03-03 09:30", dec!(42), dec!(43), dec!(10)),
        ];
        let leg2 = vec![
            bar("2025-03-03 09:30", dec!(30), dec!(30), dec!(20)),
            bar("2025-03-03 09:00", dec!(35), dec!(36), dec!(20)),
            bar("2025-03-03 09:00", dec!(99), dec!(99), dec!(99)),
        ];

        let series = spread_series(&dec_jun(), &leg1, &leg2);
        assert_eq!(series.spread_code, "TFMDECJUN1");
        assert_eq!(series.leg1_code, "TFM\\Z25");
        assert_eq!(series.leg2_code, "TFM\\M26");

        let closes: Vec<_> = series.bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![dec!(5), dec!(13)]);
        assert_eq!(series.bars[0].volume, dec!(15));
    }

    #[test]
    fn test_window_inclusive() {
        let bars = vec![
            bar("2025-02-25 23:00", dec!(1), dec!(1), dec!(1)),
            bar("2025-02-26 00:00", dec!(1), dec!(1), dec!(1)),
            bar("2025-03-03 17:00", dec!(1), dec!(1), dec!(1)),
            bar("2025-03-04 07:00", dec!(1), dec!(1), dec!(1)),
        ];
        let kept = window(&bars, Date::from_ymd(2025, 3, 3).unwrap(), 5);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].timestamp, ts("2025-02-26 00:00"));
    }

    #[test]
    fn test_window_huge_look_back_keeps_history() {
        let bars = vec![
            bar("1970-01-02 09:00", dec!(1), dec!(1), dec!(1)),
            bar("2025-03-03 09:00", dec!(1), dec!(1), dec!(1)),
            bar("2025-03-04 09:00", dec!(1), dec!(1), dec!(1)),
        ];
        let as_of = Date::from_ymd(2025, 3, 3).unwrap();
        assert!(window(&[], as_of, u32::MAX).is_empty());

        let kept = window(&bars, as_of, u32::MAX);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].timestamp, ts("2025-03-03 09:00"));
    }

    #[test]
    fn test_session_window() {
        let session = SessionWindow::default();
        assert!(session.contains(ts("2025-03-03 07:00")));
        assert!(session.contains(ts("2025-03-03 17:45")));
        assert!(!session.contains(ts("2025-03-03 06:59")));
        assert!(!session.contains(ts("2025-03-03 18:00")));
    }

    #[test]
    fn test_price_changes_from_previous_close() {
        let bars = vec![
            bar("2025-03-03 06:00", dec!(10), dec!(99), dec!(1)),
            bar("2025-03-03 08:00", dec!(40), dec!(41), dec!(1)),
            bar("2025-03-03 16:00", dec!(41), dec!(42), dec!(1)),
            bar("2025-03-03 19:00", dec!(42), dec!(50), dec!(1)),
            bar("2025-03-04 08:00", dec!(42), dec!(43.5), dec!(1)),
            bar("2025-03-04 12:00", dec!(43), dec!(41), dec!(1)),
        ];
        let changes = price_changes(&bars, SessionWindow::default());
        assert_eq!(changes.len(), 4);

        // First day is measured against its first open.
        assert_eq!(changes[0].reference, dec!(40));
        assert_eq!(changes[1].change, dec!(2));

        // Second day against the first day's last in-session close.
        assert_eq!(changes[2].reference, dec!(42));
        assert_eq!(changes[2].change, dec!(1.5));
        assert_eq!(changes[3].change, dec!(-1));
    }

    #[test]
    fn test_price_changes_empty() {
        assert!(price_changes(&[], SessionWindow::default()).is_empty());
    }
}
