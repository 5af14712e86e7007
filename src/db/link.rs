//! Article-ticker link persistence
//!
//! One row per (article, ticker) pair. The per-link attributes form a
//! closed set; an upsert only touches the attributes supplied in that call.
//! The update clause is assembled from fixed fragments with every value
//! bound as a parameter.

use crate::db::models::LinkFields;
use crate::error::Result;
use rusqlite::{params, Connection};

/// Insert or update the link row for (article, ticker), returning its ID.
///
/// With no supplied fields this degenerates to ensuring the row exists.
pub fn upsert_article_ticker(
    conn: &mut Connection,
    article_id: i64,
    ticker_id: i64,
    fields: &LinkFields,
) -> Result<i64> {
    let sql = if fields.is_empty() {
        "INSERT INTO article_tickers (article_id, ticker_id, relevance, vader_score, finbert_score)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(article_id, ticker_id) DO NOTHING"
            .to_string()
    } else {
        let mut updates: Vec<&str> = Vec::new();
        if fields.relevance.is_some() {
            updates.push("relevance = excluded.relevance");
        }
        if fields.vader_score.is_some() {
            updates.push("vader_score = excluded.vader_score");
        }
        if fields.finbert_score.is_some() {
            updates.push("finbert_score = excluded.finbert_score");
        }
        format!(
            "INSERT INTO article_tickers (article_id, ticker_id, relevance, vader_score, finbert_score)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(article_id, ticker_id) DO UPDATE SET {}",
            updates.join(", ")
        )
    };

    let tx = conn.transaction()?;
    tx.execute(
        &sql,
        params![
            article_id,
            ticker_id,
            fields.relevance,
            fields.vader_score,
            fields.finbert_score,
        ],
    )?;

    let id: i64 = tx.query_row(
        "SELECT id FROM article_tickers WHERE article_id = ?1 AND ticker_id = ?2",
        params![article_id, ticker_id],
        |row| row.get(0),
    )?;
    tx.commit()?;

    tracing::debug!(
        "Upserted link {} for article {} ticker {}",
        id,
        article_id,
        ticker_id
    );
    Ok(id)
}
