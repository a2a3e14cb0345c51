//! Query facade.
//!
//! [`QueryFacade`] is the single entry point for callers: it takes a raw
//! reference string, a kind tag and an optional point in time, parses the
//! string and dispatches to the matching resolver.
//!
//! Outcomes are split three ways:
//!
//! - `Err(TtfError)`: unknown kind tag, or a reference that does not parse.
//! - `Ok` with [`QueryOutcome::NoMatch`]: the reference is fine but no
//!   contract qualifies.
//! - `Ok` with a contract or spread.
//!
//! # Example
//!
//! ```
//! use ttf_core::calendar::CalendarTable;
//! use ttf_core::query::QueryFacade;
//! use ttf_core::types::{CalendarRow, Date, Month, PointInTime, YearMonth};
//!
//! let table = CalendarTable::load(vec![
//!     CalendarRow::new("TFM\\J25", YearMonth::new(2025, Month::April), Date::from_ymd(2025, 4, 15).unwrap()),
//!     CalendarRow::new("TFM\\J26", YearMonth::new(2026, Month::April), Date::from_ymd(2026, 4, 15).unwrap()),
//! ]);
//!
//! let facade = QueryFacade::new(&table);
//! let pit = PointInTime::at(Date::from_ymd(2025, 5, 1).unwrap());
//! let response = facade.query("TFMAPR1", "monthly_generic", Some(pit)).unwrap();
//! assert_eq!(response.codes(), vec!["TFM\\J26"]);
//! ```

use serde::Serialize;

use crate::calendar::{CalendarTable, DataWarning, SharedCalendar};
use crate::codes::parse_reference;
use crate::error::{NoMatch, TtfError, TtfResult};
use crate::resolve::{ResolvedContract, ResolvedSpread, Resolver};
use crate::types::{Month, PointInTime, ReferenceKind, SecurityReference, Sequence};

/// What a query found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "result", rename_all = "snake_case")]
pub enum QueryOutcome {
    /// One concrete contract.
    Contract(ResolvedContract),
    /// A two-legged spread.
    Spread(ResolvedSpread),
    /// The reference parsed but nothing qualified.
    NoMatch(NoMatch),
}

/// Uniform response returned by every facade query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResponse {
    /// The parsed reference.
    pub reference: SecurityReference,
    /// Point in time the query was evaluated at.
    pub point_in_time: Option<PointInTime>,
    /// Result of the lookup.
    pub outcome: QueryOutcome,
}

impl QueryResponse {
    /// Whether any contract was found.
    #[must_use]
    pub fn is_match(&self) -> bool {
        !matches!(self.outcome, QueryOutcome::NoMatch(_))
    }

    /// Resolved contract codes: none, one, or two legs for a spread.
    #[must_use]
    pub fn codes(&self) -> Vec<&str> {
        match &self.outcome {
            QueryOutcome::Contract(contract) => vec![contract.code()],
            QueryOutcome::Spread(spread) => {
                let (leg1, leg2) = spread.leg_codes();
                vec![leg1, leg2]
            }
            QueryOutcome::NoMatch(_) => Vec::new(),
        }
    }

    /// The resolved contract, if this was a single-contract query that matched.
    #[must_use]
    pub fn contract(&self) -> Option<&ResolvedContract> {
        match &self.outcome {
            QueryOutcome::Contract(contract) => Some(contract),
            _ => None,
        }
    }

    /// The resolved spread, if this was a spread query that matched.
    #[must_use]
    pub fn spread(&self) -> Option<&ResolvedSpread> {
        match &self.outcome {
            QueryOutcome::Spread(spread) => Some(spread),
            _ => None,
        }
    }

    /// Why nothing was found, if nothing was.
    #[must_use]
    pub fn no_match(&self) -> Option<&NoMatch> {
        match &self.outcome {
            QueryOutcome::NoMatch(miss) => Some(miss),
            _ => None,
        }
    }

    /// Data-quality warnings raised while resolving.
    #[must_use]
    pub fn warnings(&self) -> Vec<&DataWarning> {
        match &self.outcome {
            QueryOutcome::Contract(contract) => contract.metadata.warnings.iter().collect(),
            QueryOutcome::Spread(spread) => spread
                .metadata
                .leg1
                .warnings
                .iter()
                .chain(&spread.metadata.warnings)
                .collect(),
            QueryOutcome::NoMatch(_) => Vec::new(),
        }
    }
}

/// Parses and dispatches references against one calendar snapshot.
#[derive(Debug, Clone, Copy)]
pub struct QueryFacade<'a> {
    resolver: Resolver<'a>,
}

impl<'a> QueryFacade<'a> {
    /// Creates a facade over `table`.
    #[must_use]
    pub fn new(table: &'a CalendarTable) -> Self {
        Self {
            resolver: Resolver::new(table),
        }
    }

    /// The underlying resolver.
    #[must_use]
    pub fn resolver(&self) -> Resolver<'a> {
        self.resolver
    }

    /// Parses `raw` as a reference of kind `kind` and resolves it.
    ///
    /// `kind` is one of `specific`, `generic`, `monthly_generic` or
    /// `spread`; it is checked before `raw` is looked at.
    ///
    /// # Errors
    ///
    /// Returns `TtfError::UnknownKind` for an unrecognized tag and
    /// `TtfError::MalformedReference` if `raw` does not parse.
    pub fn query(
        &self,
        raw: &str,
        kind: &str,
        point_in_time: Option<PointInTime>,
    ) -> TtfResult<QueryResponse> {
        let kind: ReferenceKind = kind.parse()?;
        self.query_kind(raw, kind, point_in_time)
    }

    /// Like [`query`](Self::query) with an already-typed kind.
    ///
    /// # Errors
    ///
    /// Returns `TtfError::MalformedReference` if `raw` does not parse.
    pub fn query_kind(
        &self,
        raw: &str,
        kind: ReferenceKind,
        point_in_time: Option<PointInTime>,
    ) -> TtfResult<QueryResponse> {
        let reference = parse_reference(raw, kind)?;
        Ok(self.resolve(reference, point_in_time))
    }

    /// Resolves an already-parsed reference.
    #[must_use]
    pub fn resolve(
        &self,
        reference: SecurityReference,
        point_in_time: Option<PointInTime>,
    ) -> QueryResponse {
        let outcome = match &reference {
            SecurityReference::Specific { code } => {
                contract_outcome(self.resolver.resolve_specific(code))
            }
            SecurityReference::Generic { sequence } => {
                contract_outcome(self.resolver.resolve_generic(*sequence, point_in_time))
            }
            SecurityReference::MonthlyGeneric { month, sequence } => contract_outcome(
                self.resolver
                    .resolve_monthly_generic(*month, *sequence, point_in_time),
            ),
            SecurityReference::Spread {
                front,
                back,
                sequence,
            } => match self
                .resolver
                .resolve_spread(*front, *back, *sequence, point_in_time)
            {
                Ok(spread) => QueryOutcome::Spread(spread),
                Err(miss) => QueryOutcome::NoMatch(miss),
            },
        };

        if let QueryOutcome::NoMatch(miss) = &outcome {
            log::info!("No match for {reference}: {miss}");
        }

        QueryResponse {
            reference,
            point_in_time,
            outcome,
        }
    }

    /// Looks up an exact contract code.
    ///
    /// # Errors
    ///
    /// Returns `TtfError::MalformedReference` if the code is empty.
    pub fn query_specific(&self, code: &str) -> TtfResult<QueryResponse> {
        self.query_kind(code, ReferenceKind::Specific, None)
    }

    /// The `n`-th contract in contract-month order, with no expiry filter.
    ///
    /// # Errors
    ///
    /// Returns `TtfError::MalformedReference` if `n` is zero.
    pub fn query_generic(&self, n: u32) -> TtfResult<QueryResponse> {
        let sequence = sequence_arg(n, ReferenceKind::Generic, || format!("TFM{n}"))?;
        Ok(self.resolve(SecurityReference::Generic { sequence }, None))
    }

    /// The `n`-th contract delivering in `month`, across every year.
    ///
    /// `month` may be a full name (`April`) or an abbreviation (`APR`).
    ///
    /// # Errors
    ///
    /// Returns `TtfError::InvalidMonth` for an unknown month and
    /// `TtfError::MalformedReference` if `n` is zero.
    pub fn query_monthly_generic(&self, month: &str, n: u32) -> TtfResult<QueryResponse> {
        let month: Month = month.parse()?;
        let sequence = sequence_arg(n, ReferenceKind::MonthlyGeneric, || {
            format!("TFM{}{n}", month.abbr())
        })?;
        Ok(self.resolve(SecurityReference::MonthlyGeneric { month, sequence }, None))
    }
}

impl SharedCalendar {
    /// Runs a facade query against the current snapshot.
    ///
    /// # Errors
    ///
    /// See [`QueryFacade::query`].
    pub fn query(
        &self,
        raw: &str,
        kind: &str,
        point_in_time: Option<PointInTime>,
    ) -> TtfResult<QueryResponse> {
        let snapshot = self.snapshot();
        QueryFacade::new(&snapshot).query(raw, kind, point_in_time)
    }
}

fn contract_outcome(result: Result<ResolvedContract, NoMatch>) -> QueryOutcome {
    match result {
        Ok(contract) => QueryOutcome::Contract(contract),
        Err(miss) => QueryOutcome::NoMatch(miss),
    }
}

fn sequence_arg(
    n: u32,
    kind: ReferenceKind,
    input: impl FnOnce() -> String,
) -> TtfResult<Sequence> {
    Sequence::new(n)
        .ok_or_else(|| TtfError::malformed(kind, input(), "sequence must be a positive integer"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureStage;
    use crate::types::{CalendarRow, Date, YearMonth};

    fn row(code: &str, year: i32, month: u32, expiry: &str) -> CalendarRow {
        CalendarRow::new(
            code,
            YearMonth::from_ym(year, month).unwrap(),
            Date::parse(expiry).unwrap(),
        )
    }

    fn table() -> CalendarTable {
        CalendarTable::load(vec![
            row("ENDEX::F:TFM\\J25", 2025, 4, "2025-04-15"),
            row("ENDEX::F:TFM\\Z25", 2025, 12, "2025-12-19"),
            row("ENDEX::F:TFM\\J26", 2026, 4, "2026-04-15"),
            row("ENDEX::F:TFM\\M26", 2026, 6, "2026-06-17"),
        ])
    }

    fn at(date: &str) -> Option<PointInTime> {
        Some(PointInTime::at(Date::parse(date).unwrap()))
    }

    #[test]
    fn test_unknown_kind_rejected_before_parse() {
        let table = table();
        let err = QueryFacade::new(&table)
            .query("not a code at all", "futures", None)
            .unwrap_err();
        assert_eq!(err, TtfError::unknown_kind("futures"));
        assert_eq!(err.stage(), FailureStage::Dispatch);
    }

    #[test]
    fn test_malformed_distinct_from_no_match() {
        let table = table();
        let facade = QueryFacade::new(&table);

        let err = facade.query("TFMXYZ1", "monthly_generic", None).unwrap_err();
        assert!(matches!(err, TtfError::MalformedReference { .. }));
        assert_eq!(err.stage(), FailureStage::Parse);

        let response = facade.query("TFM9", "generic", None).unwrap();
        assert!(!response.is_match());
        assert!(response.codes().is_empty());
        assert_eq!(response.no_match().unwrap().stage(), FailureStage::Lookup);
    }

    #[test]
    fn test_dispatch_each_kind() {
        let table = table();
        let facade = QueryFacade::new(&table);

        let specific = facade.query("ENDEX::F:TFM\\Z25", "specific", None).unwrap();
        assert_eq!(specific.codes(), vec!["TFM\\Z25"]);

        let generic = facade.query("tfm2", "generic", at("2025-05-01")).unwrap();
        assert_eq!(generic.codes(), vec!["TFM\\J26"]);

        let monthly = facade.query("TFMAPR1", "monthly_generic", at("2025-05-01")).unwrap();
        assert_eq!(monthly.codes(), vec!["TFM\\J26"]);
        assert!(monthly.contract().unwrap().metadata.expired.is_some());

        let spread = facade.query("TFMDECJUN1", "spread", at("2025-01-01")).unwrap();
        assert_eq!(spread.codes(), vec!["TFM\\Z25", "TFM\\M26"]);
        assert_eq!(spread.spread().unwrap().spread_type, "DEC-JUN");
    }

    #[test]
    fn test_convenience_queries() {
        let table = table();
        let facade = QueryFacade::new(&table);

        assert_eq!(facade.query_specific("TFM\\J25").unwrap().codes(), vec!["TFM\\J25"]);
        assert_eq!(facade.query_generic(4).unwrap().codes(), vec!["TFM\\M26"]);
        assert_eq!(
            facade.query_monthly_generic("April", 2).unwrap().codes(),
            vec!["TFM\\J26"]
        );
        assert_eq!(
            facade.query_monthly_generic("apr", 1).unwrap().codes(),
            vec!["TFM\\J25"]
        );

        assert!(facade.query_generic(0).is_err());
        assert!(matches!(
            facade.query_monthly_generic("Smarch", 1),
            Err(TtfError::InvalidMonth { .. })
        ));
    }

    #[test]
    fn test_shared_calendar_query() {
        let shared = SharedCalendar::new(table());
        let response = shared.query("TFM1", "generic", None).unwrap();
        assert_eq!(response.codes(), vec!["TFM\\J25"]);
    }

    #[test]
    fn test_response_serializes_outcome_tag() {
        let table = table();
        let response = QueryFacade::new(&table).query("TFM9", "generic", None).unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["outcome"]["outcome"], "no_match");
        assert_eq!(json["outcome"]["result"]["reason"], "sequence_out_of_range");
    }
}
