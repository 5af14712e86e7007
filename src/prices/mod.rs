//! Market price retrieval and caching
//!
//! A cache-first pipeline for historical OHLCV data:
//!
//! ```text
//! PriceService --> CSV cache (one file per symbol/interval/window)
//!       │
//!       └──> PriceProvider (YahooProvider, or anything test-shaped)
//! ```
//!
//! Cached series live as plain CSV under the configured directory and are
//! considered stale once their file modification time exceeds the
//! configured max age.

pub mod bar;
mod cache;
pub mod provider;
pub mod service;
pub mod yahoo;

// Re-export commonly used types
pub use bar::PriceBar;
pub use provider::PriceProvider;
pub use service::{CacheOutcome, PriceHistory, PriceService};
pub use yahoo::YahooProvider;
