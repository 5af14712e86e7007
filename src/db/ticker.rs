//! Ticker registry
//!
//! Tickers are created lazily on first reference. The UNIQUE constraint on
//! the normalized symbol is the race arbiter: concurrent callers racing on
//! the same symbol all converge on one row and observe the same ID.

use crate::error::{AppError, Result};
use rusqlite::{params, Connection};

/// Widest symbol stored
const MAX_SYMBOL_CHARS: usize = 10;

/// Normalize a symbol before any lookup or write: uppercase, bounded width.
pub fn normalize_symbol(symbol: &str) -> String {
    let upper = symbol.to_uppercase();
    match upper.char_indices().nth(MAX_SYMBOL_CHARS) {
        Some((idx, _)) => upper[..idx].to_string(),
        None => upper,
    }
}

/// Ensure a ticker row exists and return its ID
pub fn get_or_create_ticker(conn: &mut Connection, symbol: &str) -> Result<i64> {
    let sym = normalize_symbol(symbol);
    if sym.is_empty() {
        return Err(AppError::Validation(
            "symbol must not be empty".to_string(),
        ));
    }

    let tx = conn.transaction()?;
    let created = tx.execute(
        "INSERT OR IGNORE INTO tickers (symbol) VALUES (?1)",
        params![sym],
    )? > 0;

    let id: i64 = tx.query_row(
        "SELECT id FROM tickers WHERE symbol = ?1",
        params![sym],
        |row| row.get(0),
    )?;
    tx.commit()?;

    if created {
        tracing::info!("Created ticker '{}' with id {}", sym, id);
    }
    Ok(id)
}
