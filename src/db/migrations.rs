//! Database migrations

use crate::error::Result;
use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> Result<()> {
    // Create migrations table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // Run each migration
    run_migration(conn, "001_articles", CREATE_ARTICLES_TABLE)?;
    run_migration(conn, "002_tickers", CREATE_TICKERS_TABLE)?;
    run_migration(conn, "003_article_tickers", CREATE_ARTICLE_TICKERS_TABLE)?;
    run_migration(conn, "004_predictions", CREATE_PREDICTIONS_TABLE)?;
    run_migration(conn, "005_actuals", CREATE_ACTUALS_TABLE)?;

    tracing::info!("Database migrations completed");
    Ok(())
}

fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
    // Check if migration already applied
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM migrations WHERE name = ?)",
        [name],
        |row| row.get(0),
    )?;

    if !exists {
        tracing::info!("Running migration: {}", name);
        conn.execute_batch(sql)?;
        conn.execute("INSERT INTO migrations (name) VALUES (?)", [name])?;
    }

    Ok(())
}

const CREATE_ARTICLES_TABLE: &str = r#"
CREATE TABLE articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    url_hash TEXT NOT NULL UNIQUE,
    headline TEXT NOT NULL,
    source TEXT,
    published_at TEXT,
    scraped_html TEXT,
    full_text TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

const CREATE_TICKERS_TABLE: &str = r#"
CREATE TABLE tickers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

const CREATE_ARTICLE_TICKERS_TABLE: &str = r#"
CREATE TABLE article_tickers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    article_id INTEGER NOT NULL REFERENCES articles(id),
    ticker_id INTEGER NOT NULL REFERENCES tickers(id),
    relevance REAL,
    vader_score REAL,
    finbert_score REAL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(article_id, ticker_id)
);
"#;

const CREATE_PREDICTIONS_TABLE: &str = r#"
CREATE TABLE predictions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    article_ticker_id INTEGER NOT NULL REFERENCES article_tickers(id),
    horizon TEXT NOT NULL,
    probability REAL,
    predicted_pct REAL,
    prediction_time TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(article_ticker_id, horizon, prediction_time)
);
CREATE INDEX IF NOT EXISTS idx_predictions_link ON predictions(article_ticker_id);
"#;

const CREATE_ACTUALS_TABLE: &str = r#"
CREATE TABLE actuals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    article_ticker_id INTEGER NOT NULL REFERENCES article_tickers(id),
    horizon TEXT NOT NULL,
    actual_pct REAL NOT NULL,
    computed_at TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(article_ticker_id, horizon, computed_at)
);
CREATE INDEX IF NOT EXISTS idx_actuals_link ON actuals(article_ticker_id);
"#;
