//! Relational persistence for articles, tickers, links, and outcome facts
//!
//! The facade owns an explicit connection pool; there is no module-level
//! database state. Construct once at process start, clone to share, drop
//! to shut the pool down. Every operation is atomic on its own: either the
//! whole insert-or-update commits or nothing does.

pub mod models;

mod actual;
mod article;
mod link;
mod migrations;
mod prediction;
mod ticker;

use crate::config::StoreConfig;
use crate::error::Result;
use chrono::{DateTime, Utc};
use models::{Article, LinkFields, NewActual, NewArticle};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;

pub use ticker::normalize_symbol;

/// Applied to every pooled connection before first use. WAL plus a busy
/// timeout lets concurrent writers queue instead of failing, so natural-key
/// races resolve at the UNIQUE constraint.
const CONNECTION_PRAGMAS: &str = "PRAGMA journal_mode=WAL; \
     PRAGMA synchronous=NORMAL; \
     PRAGMA busy_timeout=5000; \
     PRAGMA foreign_keys=ON;";

const DEFAULT_POOL_SIZE: u32 = 8;

/// Relational store facade
#[derive(Clone)]
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Open (or create) the store at the given path and run migrations
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_pool_size(path, DEFAULT_POOL_SIZE)
    }

    pub fn open_with_pool_size(path: &Path, max_size: u32) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path)
            .with_init(|conn| conn.execute_batch(CONNECTION_PRAGMAS));
        let pool = Pool::builder().max_size(max_size).build(manager)?;

        let db = Self { pool };
        let conn = db.pool.get()?;
        migrations::run_migrations(&conn)?;

        tracing::info!("Opened relational store at {}", path.display());
        Ok(db)
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Self::open(&config.db_path)
    }

    // ========== Article Methods ==========

    /// Insert or update an article by URL hash, returning its stable ID.
    ///
    /// The headline always takes the incoming value; source, published_at,
    /// scraped_html and full_text only when the incoming value is non-null.
    pub fn upsert_article(&self, article: &NewArticle) -> Result<i64> {
        let mut conn = self.pool.get()?;
        article::upsert_article(&mut conn, article)
    }

    /// Look up an article by URL without writing
    pub fn get_article_by_url(&self, url: &str) -> Result<Option<Article>> {
        let conn = self.pool.get()?;
        article::get_article_by_url(&conn, url)
    }

    // ========== Ticker Methods ==========

    /// Ensure a ticker exists (normalized symbol) and return its ID
    pub fn get_or_create_ticker(&self, symbol: &str) -> Result<i64> {
        let mut conn = self.pool.get()?;
        ticker::get_or_create_ticker(&mut conn, symbol)
    }

    // ========== Link Methods ==========

    /// Insert or update the (article, ticker) link, touching only the
    /// supplied fields; returns the link's stable ID
    pub fn upsert_article_ticker(
        &self,
        article_id: i64,
        ticker_id: i64,
        fields: &LinkFields,
    ) -> Result<i64> {
        let mut conn = self.pool.get()?;
        link::upsert_article_ticker(&mut conn, article_id, ticker_id, fields)
    }

    // ========== Fact Methods ==========

    /// Record a prediction; duplicates on the full key are dropped silently
    pub fn insert_prediction(
        &self,
        article_ticker_id: i64,
        horizon: &str,
        probability: Option<f64>,
        predicted_pct: Option<f64>,
        prediction_time: DateTime<Utc>,
    ) -> Result<()> {
        let conn = self.pool.get()?;
        prediction::insert_prediction(
            &conn,
            article_ticker_id,
            horizon,
            probability,
            predicted_pct,
            prediction_time,
        )
    }

    /// Insert a batch of realized returns in one transaction
    pub fn bulk_insert_actuals(&self, actuals: &[NewActual]) -> Result<()> {
        let mut conn = self.pool.get()?;
        actual::bulk_insert_actuals(&mut conn, actuals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn open_test_db(dir: &tempfile::TempDir) -> Database {
        Database::open(&dir.path().join("test.db")).unwrap()
    }

    #[test]
    fn test_open_creates_schema() {
        let dir = tempdir().unwrap();
        let db = open_test_db(&dir);

        // Schema is queryable straight away
        assert!(db.get_article_by_url("https://example.com/x").unwrap().is_none());
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let db = Database::open(&path).unwrap();
        let id = db
            .upsert_article(&NewArticle {
                url: "https://example.com/a".to_string(),
                headline: "A".to_string(),
                ..Default::default()
            })
            .unwrap();
        drop(db);

        // Second open skips applied migrations and sees existing data
        let db = Database::open(&path).unwrap();
        let again = db
            .upsert_article(&NewArticle {
                url: "https://example.com/a".to_string(),
                headline: "A".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(id, again);
    }

    #[test]
    fn test_ticker_race_converges_across_threads() {
        let dir = tempdir().unwrap();
        let db = open_test_db(&dir);

        let mut handles = Vec::new();
        for i in 0..8 {
            let db = db.clone();
            let symbol = if i % 2 == 0 { "aapl" } else { "AAPL" };
            handles.push(std::thread::spawn(move || {
                db.get_or_create_ticker(symbol).unwrap()
            }));
        }
        let ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(ids.iter().all(|&id| id == ids[0]));

        let conn = db.pool.get().unwrap();
        let (count, symbol): (i64, String) = conn
            .query_row("SELECT COUNT(*), MAX(symbol) FROM tickers", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(symbol, "AAPL");
    }

    #[test]
    fn test_full_ingestion_flow() {
        let dir = tempdir().unwrap();
        let db = open_test_db(&dir);

        let article_id = db
            .upsert_article(&NewArticle {
                url: "https://example.com/earnings".to_string(),
                headline: "Quarterly earnings beat expectations".to_string(),
                source: Some("Example Wire".to_string()),
                ..Default::default()
            })
            .unwrap();
        let ticker_id = db.get_or_create_ticker("msft").unwrap();
        let link_id = db
            .upsert_article_ticker(
                article_id,
                ticker_id,
                &LinkFields {
                    relevance: Some(0.92),
                    ..Default::default()
                },
            )
            .unwrap();

        let at = Utc.with_ymd_and_hms(2024, 4, 2, 13, 0, 0).unwrap();
        db.insert_prediction(link_id, "1d", Some(0.66), Some(0.9), at)
            .unwrap();
        db.insert_prediction(link_id, "1d", Some(0.99), Some(9.9), at)
            .unwrap();

        db.bulk_insert_actuals(&[NewActual {
            article_ticker_id: link_id,
            horizon: "1d".to_string(),
            actual_pct: 1.1,
            computed_at: at + chrono::Duration::days(1),
        }])
        .unwrap();
        db.bulk_insert_actuals(&[]).unwrap();

        let conn = db.pool.get().unwrap();
        let predictions: i64 = conn
            .query_row("SELECT COUNT(*) FROM predictions", [], |row| row.get(0))
            .unwrap();
        let actuals: i64 = conn
            .query_row("SELECT COUNT(*) FROM actuals", [], |row| row.get(0))
            .unwrap();
        assert_eq!(predictions, 1);
        assert_eq!(actuals, 1);
    }
}
