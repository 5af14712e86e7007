//! Price history service
//!
//! Cache-first lookup over any [`PriceProvider`]: serve a fresh cache file
//! when one exists, otherwise download, sort, cache, and return. Cache
//! write failures are logged and swallowed; the series still reaches the
//! caller.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::CacheConfig;
use crate::error::{AppError, Result};
use crate::prices::bar::{sort_bars, PriceBar};
use crate::prices::cache;
use crate::prices::provider::PriceProvider;
use crate::prices::yahoo::YahooProvider;

/// How a [`PriceHistory`] was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheOutcome {
    /// Served from a cache file younger than the configured max age.
    Fresh,
    /// Downloaded from the provider (cache absent, stale, or damaged).
    Refreshed,
}

/// One resolved price series, sorted ascending by date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistory {
    /// Canonical (uppercased, path-safe) symbol the cache is keyed on.
    pub symbol: String,
    pub interval: String,
    pub bars: Vec<PriceBar>,
    pub outcome: CacheOutcome,
}

/// Cache-first price lookup over a provider.
pub struct PriceService<P> {
    config: CacheConfig,
    provider: P,
}

impl PriceService<YahooProvider> {
    /// Service backed by the Yahoo chart API.
    pub fn with_yahoo(config: CacheConfig) -> Result<Self> {
        Ok(Self::new(config, YahooProvider::new()?))
    }
}

impl<P: PriceProvider> PriceService<P> {
    pub fn new(config: CacheConfig, provider: P) -> Self {
        Self { config, provider }
    }

    /// Price series for `symbol` over `[start, end)`.
    ///
    /// An inverted range (start after end) is rejected as a validation
    /// error before any cache or provider I/O. A fresh, readable cache
    /// file short-circuits the provider entirely. A stale or damaged file
    /// triggers a download; the old file is only replaced once a non-empty
    /// download succeeds, so a failed refresh leaves the previous data on
    /// disk.
    pub fn price_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: &str,
    ) -> Result<PriceHistory> {
        if start > end {
            return Err(AppError::Validation(format!(
                "invalid date range: start {start} is after end {end}"
            )));
        }

        let canonical = cache::sanitized_symbol(symbol);
        let path = cache::cache_file(&self.config.cache_dir, symbol, interval, start, end);

        if cache::is_fresh(&path, self.config.max_age) {
            match cache::read_series(&path) {
                // Empty series are never written, so an empty read means the
                // file was damaged after the fact.
                Ok(mut bars) if !bars.is_empty() => {
                    sort_bars(&mut bars);
                    debug!("serving {} {} from cache ({})", canonical, interval, path.display());
                    return Ok(PriceHistory {
                        symbol: canonical,
                        interval: interval.to_string(),
                        bars,
                        outcome: CacheOutcome::Fresh,
                    });
                }
                Ok(_) => {
                    warn!("cache file {} is empty, refreshing", path.display());
                }
                Err(err) => {
                    warn!("cache file {} is unreadable ({}), refreshing", path.display(), err);
                }
            }
        }

        let mut bars = self.provider.fetch(symbol, start, end, interval)?;
        sort_bars(&mut bars);

        if bars.is_empty() {
            debug!(
                "{} returned no rows for {} {} [{} .. {}]",
                self.provider.name(),
                canonical,
                interval,
                start,
                end
            );
        } else if let Err(err) = cache::write_series(&path, &bars) {
            warn!("could not cache {} at {}: {}", canonical, path.display(), err);
        } else {
            info!(
                "downloaded {} bars for {} {} and cached at {}",
                bars.len(),
                canonical,
                interval,
                path.display()
            );
        }

        Ok(PriceHistory {
            symbol: canonical,
            interval: interval.to_string(),
            bars,
            outcome: CacheOutcome::Refreshed,
        })
    }

    /// Price series for the trailing `lookback_days` ending today.
    pub fn recent_window(
        &self,
        symbol: &str,
        lookback_days: i64,
        interval: &str,
    ) -> Result<PriceHistory> {
        let end = Utc::now().date_naive();
        let start = end - chrono::Duration::days(lookback_days);
        self.price_history(symbol, start, end, interval)
    }
}
