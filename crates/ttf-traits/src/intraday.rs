//! Intraday price source trait.

use ttf_core::bars::{self, Bar};
use ttf_core::types::Date;

use crate::error::TraitError;

/// Source of OHLCV bars keyed by contract code.
///
/// Codes are normalized (no `ENDEX::F:` prefix). Implementations return
/// bars in timestamp order.
pub trait IntradaySource: Send + Sync {
    /// Every bar for `code`; empty when the code has no prices.
    fn bars(&self, code: &str) -> Result<Vec<Bar>, TraitError>;

    /// Codes with at least one bar.
    fn codes(&self) -> Vec<String>;

    /// Bars for `code` dated within `[as_of - days, as_of]`.
    fn bars_in_window(&self, code: &str, as_of: Date, days: u32) -> Result<Vec<Bar>, TraitError> {
        Ok(bars::window(&self.bars(code)?, as_of, days))
    }
}
