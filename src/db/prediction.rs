//! Prediction facts
//!
//! Append-only: a prediction is keyed by (link, horizon, prediction time)
//! and the first writer wins. A later insert with the same key is silently
//! dropped, never merged.

use crate::db::models::format_utc;
use crate::error::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

/// Record a prediction; a duplicate key is a silent no-op
pub fn insert_prediction(
    conn: &Connection,
    article_ticker_id: i64,
    horizon: &str,
    probability: Option<f64>,
    predicted_pct: Option<f64>,
    prediction_time: DateTime<Utc>,
) -> Result<()> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO predictions
           (article_ticker_id, horizon, probability, predicted_pct, prediction_time)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            article_ticker_id,
            horizon,
            probability,
            predicted_pct,
            format_utc(prediction_time),
        ],
    )?;

    if inserted == 0 {
        tracing::debug!(
            "Dropped duplicate prediction for link {} horizon {}",
            article_ticker_id,
            horizon
        );
    }
    Ok(())
}
