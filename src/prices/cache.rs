//! CSV cache files
//!
//! One file per (symbol, interval, window) under the configured cache
//! directory. Freshness is judged purely by file modification time; the
//! service layer decides what to do when a file is stale or damaged.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::NaiveDate;

use crate::prices::bar::PriceBar;

/// Uppercase the symbol and replace path separators so it is safe to embed
/// in a file name.
pub fn sanitized_symbol(symbol: &str) -> String {
    symbol.replace(['/', '\\'], "_").to_uppercase()
}

/// Cache file path for one request window, e.g.
/// `price_data_cache/AAPL_1d_2024-01-01_2024-02-01.csv`.
pub fn cache_file(
    cache_dir: &Path,
    symbol: &str,
    interval: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> PathBuf {
    let name = format!("{}_{}_{}_{}.csv", sanitized_symbol(symbol), interval, start, end);
    cache_dir.join(name)
}

/// Whether the file exists and was modified within `max_age`.
pub fn is_fresh(path: &Path, max_age: Duration) -> bool {
    let modified = match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(modified) => modified,
        Err(_) => return false,
    };
    // A modification time in the future counts as age zero.
    let age = SystemTime::now().duration_since(modified).unwrap_or(Duration::ZERO);
    age < max_age
}

/// Read a cached series. Any I/O or parse failure is the caller's cue to
/// treat the entry as missing.
pub fn read_series(path: &Path) -> Result<Vec<PriceBar>, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut bars = Vec::new();
    for row in reader.deserialize() {
        bars.push(row?);
    }
    Ok(bars)
}

/// Write a series to `path`, creating the cache directory if needed.
pub fn write_series(path: &Path, bars: &[PriceBar]) -> Result<(), csv::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for bar in bars {
        writer.serialize(bar)?;
    }
    writer.flush()?;
    Ok(())
}
