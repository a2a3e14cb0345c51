//! End-to-end resolution scenarios through the query facade.

use ttf_core::prelude::*;

fn row(code: &str, year: i32, month: u32, expiry: &str) -> CalendarRow {
    CalendarRow::new(
        code,
        YearMonth::from_ym(year, month).unwrap(),
        Date::parse(expiry).unwrap(),
    )
}

fn at(date: &str) -> Option<PointInTime> {
    Some(PointInTime::at(Date::parse(date).unwrap()))
}

// ============================================================================
// Monthly generic
// ============================================================================

#[test]
fn april_before_and_after_expiry() {
    let table = CalendarTable::load(vec![
        row("ENDEX::F:TFM\\J25", 2025, 4, "2025-04-15"),
        row("ENDEX::F:TFM\\J26", 2026, 4, "2026-04-15"),
    ]);
    let facade = QueryFacade::new(&table);

    let january = facade
        .query("TFMAPR1", "monthly_generic", at("2025-01-12"))
        .unwrap();
    let contract = january.contract().unwrap();
    assert_eq!(contract.code(), "TFM\\J25");
    assert!(contract.metadata.expired.is_none());

    let may = facade
        .query("TFMAPR1", "monthly_generic", at("2025-05-01"))
        .unwrap();
    let contract = may.contract().unwrap();
    assert_eq!(contract.code(), "TFM\\J26");
    let expired = contract.metadata.expired.as_ref().unwrap();
    assert_eq!(expired.month, Month::April);
    assert_eq!(expired.year, 2025);
    assert_eq!(expired.expiry_date, Date::parse("2025-04-15").unwrap());
    assert_eq!(contract.metadata.next_available.unwrap().year, 2026);
}

#[test]
fn monthly_generic_without_point_in_time_can_pick_expired() {
    let table = CalendarTable::load(vec![
        row("TFM\\J20", 2020, 4, "2020-04-15"),
        row("TFM\\J25", 2025, 4, "2025-04-15"),
    ]);
    let response = QueryFacade::new(&table)
        .query_monthly_generic("APR", 1)
        .unwrap();
    assert_eq!(response.codes(), vec!["TFM\\J20"]);
}

// ============================================================================
// Spreads
// ============================================================================

#[test]
fn dec_jun_spread() {
    let table = CalendarTable::load(vec![
        row("TFM\\Z25", 2025, 12, "2025-12-19"),
        row("TFM\\M26", 2026, 6, "2026-06-17"),
    ]);
    let response = QueryFacade::new(&table)
        .query("TFMDECJUN1", "spread", at("2025-01-01"))
        .unwrap();
    let spread = response.spread().unwrap();
    assert_eq!(spread.leg1.code, "TFM\\Z25");
    assert_eq!(spread.leg1.year, 2025);
    assert_eq!(spread.leg2.code, "TFM\\M26");
    assert_eq!(spread.leg2.year, 2026);
    assert_eq!(spread.spread_type, "DEC-JUN");
}

#[test]
fn spread_missing_back_leg_is_no_match() {
    let table = CalendarTable::load(vec![row("TFM\\Z25", 2025, 12, "2025-12-19")]);
    let response = QueryFacade::new(&table)
        .query("TFMDECJUN1", "spread", at("2025-01-01"))
        .unwrap();
    assert_eq!(
        response.no_match(),
        Some(&NoMatch::BackLeg {
            month: Month::June,
            year: 2026
        })
    );
}

#[test]
fn spread_series_from_resolved_legs() {
    use chrono::NaiveDateTime;
    use rust_decimal_macros::dec;

    let table = CalendarTable::load(vec![
        row("TFM\\Z25", 2025, 12, "2025-12-19"),
        row("TFM\\M26", 2026, 6, "2026-06-17"),
    ]);
    let response = QueryFacade::new(&table)
        .query("TFMDECJUN1", "spread", at("2025-01-01"))
        .unwrap();
    let spread = response.spread().unwrap();

    let ts = NaiveDateTime::parse_from_str("2025-03-03 10:00", "%Y-%m-%d %H:%M").unwrap();
    let leg = |price| Bar {
        timestamp: ts,
        open: price,
        high: price,
        low: price,
        close: price,
        volume: dec!(10),
    };
    let series = spread_series(spread, &[leg(dec!(45))], &[leg(dec!(38.5))]);
    assert_eq!(series.bars.len(), 1);
    assert_eq!(series.bars[0].close, dec!(6.5));
    assert_eq!(series.bars[0].volume, dec!(10));
}

// ============================================================================
// Generic and failure modes
// ============================================================================

#[test]
fn generic_past_end_is_no_match() {
    let table = CalendarTable::load(vec![
        row("TFM\\J25", 2025, 4, "2025-04-15"),
        row("TFM\\K25", 2025, 5, "2025-05-15"),
        row("TFM\\M25", 2025, 6, "2025-06-16"),
    ]);
    let response = QueryFacade::new(&table).query("TFM5", "generic", None).unwrap();
    assert!(!response.is_match());
    assert_eq!(response.no_match().unwrap().stage(), FailureStage::Lookup);
}

#[test]
fn bad_month_abbreviation_is_malformed() {
    let table = CalendarTable::default();
    let err = QueryFacade::new(&table)
        .query("TFMXYZ1", "monthly_generic", None)
        .unwrap_err();
    assert!(matches!(
        err,
        TtfError::MalformedReference {
            kind: ReferenceKind::MonthlyGeneric,
            ..
        }
    ));
}

#[test]
fn zero_sequence_is_malformed() {
    let table = CalendarTable::default();
    let facade = QueryFacade::new(&table);
    assert!(facade.query("TFM0", "generic", None).is_err());
    assert!(facade.query("TFMAPR0", "monthly_generic", None).is_err());
}

#[test]
fn snapshot_swap_does_not_disturb_held_table() {
    let shared = SharedCalendar::new(CalendarTable::load(vec![row(
        "TFM\\J25", 2025, 4, "2025-04-15",
    )]));
    let held = shared.snapshot();
    shared.rebuild(vec![row("TFM\\J26", 2026, 4, "2026-04-15")]);

    let old = QueryFacade::new(&held).query_generic(1).unwrap();
    let new = shared.query("TFM1", "generic", None).unwrap();
    assert_eq!(old.codes(), vec!["TFM\\J25"]);
    assert_eq!(new.codes(), vec!["TFM\\J26"]);
}
