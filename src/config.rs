//! Environment-driven configuration
//!
//! Both configs read from the process environment with sensible defaults,
//! loading a `.env` file first if one is present. Embedders and tests can
//! bypass the environment entirely via the plain constructors.

use std::path::PathBuf;
use std::time::Duration;

/// Relational store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path of the SQLite database file
    pub db_path: PathBuf,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            db_path: std::env::var("NEWSPULSE_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("newspulse.db")),
        }
    }
}

/// Price cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Directory holding one CSV file per cached price series
    pub cache_dir: PathBuf,
    /// Maximum age before a cached entry is considered stale
    pub max_age: Duration,
}

impl CacheConfig {
    pub fn new(cache_dir: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            max_age,
        }
    }

    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let max_age_hours = std::env::var("NEWSPULSE_CACHE_MAX_AGE_HOURS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(6);
        Self {
            cache_dir: std::env::var("NEWSPULSE_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("price_data_cache")),
            // Saturate rather than overflow on absurd hour counts
            max_age: Duration::from_secs(max_age_hours.saturating_mul(3600)),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("price_data_cache"),
            max_age: Duration::from_secs(6 * 3600),
        }
    }
}
