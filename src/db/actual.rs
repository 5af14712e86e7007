//! Realized-return facts
//!
//! Same append-only, first-writer-wins keying as predictions, with a bulk
//! entry point: the whole batch commits in one transaction.

use crate::db::models::{format_utc, NewActual};
use crate::error::Result;
use rusqlite::{params, Connection};

/// Insert a batch of realized returns; an empty batch is a no-op.
///
/// Rows whose (link, horizon, computed_at) key already exists are dropped
/// silently; the rest of the batch still commits.
pub fn bulk_insert_actuals(conn: &mut Connection, actuals: &[NewActual]) -> Result<()> {
    if actuals.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    let mut stmt = tx.prepare(
        "INSERT OR IGNORE INTO actuals (article_ticker_id, horizon, actual_pct, computed_at)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    for actual in actuals {
        stmt.execute(params![
            actual.article_ticker_id,
            actual.horizon,
            actual.actual_pct,
            format_utc(actual.computed_at),
        ])?;
    }

    drop(stmt);
    tx.commit()?;

    tracing::info!("Stored batch of {} actual returns", actuals.len());
    Ok(())
}
