//! Price source trait
//!
//! The cache layer in [`super::service`] talks to the outside world only
//! through this trait, so a provider can be swapped (or mocked in tests)
//! without touching the caching logic.

use chrono::NaiveDate;

use crate::error::Result;
use crate::prices::bar::PriceBar;

/// A source of historical OHLCV data.
///
/// Implementations map provider-native rows onto [`PriceBar`] and must
/// return `Ok` with an empty vec when the source has no rows for the
/// requested window. Source failures are real errors, never an empty
/// success.
pub trait PriceProvider: Send + Sync {
    /// Short provider name used in log lines.
    fn name(&self) -> &'static str;

    /// Fetch bars for `symbol` over `[start, end)` at `interval`
    /// (e.g. "1d", "1h").
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: &str,
    ) -> Result<Vec<PriceBar>>;
}
