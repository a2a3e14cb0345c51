//! Calendar spread resolution.
//!
//! A spread `TFM<M1><M2><N>` pairs the `N`-th active `M1` contract with the
//! `M2` contract that follows it. Spreads are named front leg first, so when
//! `M2` does not come strictly after `M1` in the calendar the back leg rolls
//! into the next year: DEC-JUN pairs Dec 2025 with Jun 2026, DEC-DEC pairs
//! Dec 2025 with Dec 2026, JAN-APR pairs Jan 2025 with Apr 2025.

use serde::Serialize;

use super::{tie_warning, ContractMetadata, Resolver};
use crate::calendar::DataWarning;
use crate::error::NoMatch;
use crate::types::{ContractRecord, Date, Month, PointInTime, SecurityReference, Sequence};

/// One leg of a resolved spread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpreadLeg {
    /// Concrete contract code.
    pub code: String,
    /// Expiry of the leg contract.
    pub expiry_date: Date,
    /// Delivery month of the leg.
    pub month: Month,
    /// Contract year of the leg.
    pub year: i32,
}

impl SpreadLeg {
    fn from_record(record: &ContractRecord, month: Month) -> Self {
        Self {
            code: record.code.clone(),
            expiry_date: record.expiry_date,
            month,
            year: record.contract_year,
        }
    }
}

/// Resolution metadata for a spread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpreadMetadata {
    /// Metadata from resolving the front leg as a monthly generic.
    pub leg1: ContractMetadata,
    /// Whether the back leg was rolled into the following year.
    pub rolled: bool,
    /// Data-quality notes about the back leg lookup.
    pub warnings: Vec<DataWarning>,
}

/// A spread reference resolved to two concrete contracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSpread {
    /// The reference that was resolved.
    pub reference: SecurityReference,
    /// Canonical spread code, e.g. `TFMDECJUN1`.
    pub spread_code: String,
    /// Leg month label, e.g. `DEC-JUN`.
    pub spread_type: String,
    /// Front leg.
    pub leg1: SpreadLeg,
    /// Back leg.
    pub leg2: SpreadLeg,
    /// How the legs were chosen.
    pub metadata: SpreadMetadata,
}

impl ResolvedSpread {
    /// Codes of both legs, front first.
    #[must_use]
    pub fn leg_codes(&self) -> (&str, &str) {
        (&self.leg1.code, &self.leg2.code)
    }
}

/// Year of the back leg given the front leg's month and year.
#[must_use]
pub fn back_leg_year(front: Month, back: Month, front_year: i32) -> i32 {
    if back.index() <= front.index() {
        front_year + 1
    } else {
        front_year
    }
}

impl Resolver<'_> {
    /// Resolves a calendar spread.
    ///
    /// The front leg is the `sequence`-th `front` monthly generic at
    /// `point_in_time`. The back leg is the single `back` contract in the
    /// rolled year, looked up over the whole calendar with no expiry filter.
    pub fn resolve_spread(
        &self,
        front: Month,
        back: Month,
        sequence: Sequence,
        point_in_time: Option<PointInTime>,
    ) -> Result<ResolvedSpread, NoMatch> {
        let leg1 = self
            .resolve_monthly_generic(front, sequence, point_in_time)
            .map_err(|cause| NoMatch::FrontLeg {
                month: front,
                cause: Box::new(cause),
            })?;

        let year1 = leg1.record.contract_year;
        let year2 = back_leg_year(front, back, year1);
        let back_rows: Vec<&ContractRecord> = self.table.by_month_year(back, year2).collect();
        let record2 = back_rows
            .first()
            .copied()
            .ok_or(NoMatch::BackLeg { month: back, year: year2 })?;
        let warnings = tie_warning(&back_rows, format!("{back} {year2}"), |_| true)
            .into_iter()
            .collect();

        let reference = SecurityReference::Spread {
            front,
            back,
            sequence,
        };
        log::debug!(
            "{reference}: {} / {}",
            leg1.record.code,
            record2.code
        );

        Ok(ResolvedSpread {
            spread_code: reference.to_string(),
            spread_type: format!("{}-{}", front.abbr(), back.abbr()),
            reference,
            leg1: SpreadLeg::from_record(&leg1.record, front),
            leg2: SpreadLeg::from_record(record2, back),
            metadata: SpreadMetadata {
                leg1: leg1.metadata,
                rolled: year2 != year1,
                warnings,
            },
        })
    }
}
