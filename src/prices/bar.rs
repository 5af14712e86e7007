//! Canonical OHLCV bar
//!
//! Every price series in the crate, whether freshly downloaded or read back
//! from the CSV cache, is a `Vec<PriceBar>` sorted ascending by date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day (or one interval) of price data in canonical column order.
///
/// `adj_close` is the split/dividend adjusted close; sources that do not
/// supply an adjusted series repeat the raw close there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: u64,
}

/// Sort bars ascending by date.
///
/// The sort is stable: bars sharing a date keep the order the source
/// delivered them in.
pub fn sort_bars(bars: &mut [PriceBar]) {
    bars.sort_by_key(|bar| bar.date);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64) -> PriceBar {
        PriceBar {
            date: date.parse().unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            adj_close: close,
            volume: 0,
        }
    }

    #[test]
    fn test_sort_bars_ascending() {
        let mut bars = vec![bar("2024-01-03", 3.0), bar("2024-01-01", 1.0), bar("2024-01-02", 2.0)];
        sort_bars(&mut bars);

        let dates: Vec<String> = bars.iter().map(|b| b.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
    }

    #[test]
    fn test_sort_bars_keeps_duplicate_dates_in_source_order() {
        let mut bars = vec![bar("2024-01-02", 2.0), bar("2024-01-01", 1.0), bar("2024-01-01", 1.5)];
        sort_bars(&mut bars);

        assert_eq!(bars[0].close, 1.0);
        assert_eq!(bars[1].close, 1.5);
        assert_eq!(bars[2].close, 2.0);
    }
}
