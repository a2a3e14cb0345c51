//! Specific, generic and monthly-generic resolution.

use super::{
    pick, tie_warning, ContractMetadata, ExpiredNotice, NextAvailable, ResolvedContract, Resolver,
};
use crate::codes::normalize_code;
use crate::error::NoMatch;
use crate::types::{ContractRecord, Month, PointInTime, SecurityReference, Sequence};

impl Resolver<'_> {
    /// Resolves an exact contract code, with or without the source prefix.
    pub fn resolve_specific(&self, code: &str) -> Result<ResolvedContract, NoMatch> {
        let code = normalize_code(code);
        let record = self.table.get(code).ok_or_else(|| NoMatch::UnknownCode {
            code: code.to_string(),
        })?;

        Ok(ResolvedContract {
            reference: SecurityReference::Specific {
                code: code.to_string(),
            },
            record: record.clone(),
            metadata: ContractMetadata {
                candidates: 1,
                ..ContractMetadata::default()
            },
        })
    }

    /// Resolves the `sequence`-th contract in contract-month order.
    ///
    /// With a point in time only contracts still listed (`expiry >= date`,
    /// or inside the window) are ranked.
    pub fn resolve_generic(
        &self,
        sequence: Sequence,
        point_in_time: Option<PointInTime>,
    ) -> Result<ResolvedContract, NoMatch> {
        let mut candidates: Vec<&ContractRecord> = self
            .table
            .iter()
            .filter(|r| point_in_time.map_or(true, |p| p.lists(r.expiry_date)))
            .collect();
        // Stable: ties keep table order.
        candidates.sort_by_key(|r| r.contract_month);

        let record = pick(&candidates, sequence)?;
        let warnings = tie_warning(&candidates, record.contract_month.to_string(), |r| {
            r.contract_month == record.contract_month
        })
        .into_iter()
        .collect();

        log::debug!(
            "TFM{sequence}: {} of {} candidates",
            record.code,
            candidates.len()
        );

        Ok(ResolvedContract {
            reference: SecurityReference::Generic { sequence },
            record: record.clone(),
            metadata: ContractMetadata {
                point_in_time,
                candidates: candidates.len(),
                warnings,
                ..ContractMetadata::default()
            },
        })
    }

    /// Resolves the `sequence`-th contract delivering in `month`, by
    /// contract year.
    ///
    /// With a point in time, contracts that have lapsed at the reference
    /// date (`expiry <= date`) are skipped and the metadata reports the
    /// chosen year, plus an expired notice if this year's contract has
    /// already gone. Without one, every year is ranked.
    pub fn resolve_monthly_generic(
        &self,
        month: Month,
        sequence: Sequence,
        point_in_time: Option<PointInTime>,
    ) -> Result<ResolvedContract, NoMatch> {
        let month_rows: Vec<&ContractRecord> = self.table.by_month(month).collect();
        let mut candidates: Vec<&ContractRecord> = month_rows
            .iter()
            .copied()
            .filter(|r| point_in_time.map_or(true, |p| p.is_active(r.expiry_date)))
            .collect();
        candidates.sort_by_key(|r| r.contract_year);

        log::debug!(
            "{month}: {} contracts, {} qualifying",
            month_rows.len(),
            candidates.len()
        );

        let expired = point_in_time.and_then(|p| expired_notice(&month_rows, month, p));
        let record = pick(&candidates, sequence)?;
        let warnings = tie_warning(
            &candidates,
            format!("{month} {}", record.contract_year),
            |r| r.contract_year == record.contract_year,
        )
        .into_iter()
        .collect();

        Ok(ResolvedContract {
            reference: SecurityReference::MonthlyGeneric { month, sequence },
            record: record.clone(),
            metadata: ContractMetadata {
                month: Some(month),
                point_in_time,
                candidates: candidates.len(),
                expired,
                next_available: point_in_time.map(|_| NextAvailable {
                    year: record.contract_year,
                    expiry_date: record.expiry_date,
                }),
                warnings,
            },
        })
    }
}

/// The reference year's contract for `month`, if it lapsed on or before the
/// reference date.
fn expired_notice(
    month_rows: &[&ContractRecord],
    month: Month,
    point_in_time: PointInTime,
) -> Option<ExpiredNotice> {
    let reference = point_in_time.reference_date();
    let same_year = month_rows
        .iter()
        .find(|r| r.contract_year == reference.year())?;
    (same_year.expiry_date <= reference).then(|| ExpiredNotice {
        month,
        year: same_year.contract_year,
        code: same_year.code.clone(),
        expiry_date: same_year.expiry_date,
    })
}
