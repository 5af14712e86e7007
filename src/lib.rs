//! NewsPulse - news and market data persistence
//!
//! Ingestion-side storage for a news-driven trading pipeline: a SQLite
//! store for articles, tickers, and prediction facts, plus a CSV-backed
//! price cache in front of pluggable market data providers.

pub mod config;
pub mod db;
pub mod error;
pub mod hash;
pub mod prices;
pub mod sentiment;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export the types most embedders touch
pub use config::{CacheConfig, StoreConfig};
pub use db::models::{Article, LinkFields, NewActual, NewArticle};
pub use db::Database;
pub use error::{AppError, Result};
pub use prices::{CacheOutcome, PriceBar, PriceHistory, PriceService, YahooProvider};
pub use sentiment::{SentimentScore, SentimentScorer};

/// Install the process-wide tracing subscriber. Call once, from the
/// embedding binary; the library never installs one on its own.
///
/// Honors `RUST_LOG`, defaulting to info-level output for this crate.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newspulse=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
