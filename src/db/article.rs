//! Article persistence
//!
//! Articles are deduplicated by the SHA-256 of their URL: exactly one row
//! per distinct URL hash, ever. Re-ingesting a URL always overwrites the
//! headline; the other mutable fields only take non-null incoming values,
//! so a later scrape that lost the publish date cannot erase a known one.

use crate::db::models::{format_utc, Article, NewArticle};
use crate::error::Result;
use crate::hash::sha256_hex;
use rusqlite::{params, Connection};

/// Longest headline stored; longer values are truncated
const MAX_HEADLINE_CHARS: usize = 65_535;

/// Insert or update an article, returning its stable ID
pub fn upsert_article(conn: &mut Connection, article: &NewArticle) -> Result<i64> {
    let url_hash = sha256_hex(&article.url);
    let headline = truncate_chars(&article.headline, MAX_HEADLINE_CHARS);
    let published_at = article.published_at.map(format_utc);

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO articles (url, url_hash, headline, source, published_at, scraped_html, full_text)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(url_hash) DO UPDATE SET
           headline = excluded.headline,
           source = COALESCE(excluded.source, source),
           published_at = COALESCE(excluded.published_at, published_at),
           scraped_html = COALESCE(excluded.scraped_html, scraped_html),
           full_text = COALESCE(excluded.full_text, full_text)",
        params![
            article.url,
            url_hash,
            headline,
            article.source,
            published_at,
            article.scraped_html,
            article.full_text,
        ],
    )?;

    let id: i64 = tx.query_row(
        "SELECT id FROM articles WHERE url_hash = ?1",
        params![url_hash],
        |row| row.get(0),
    )?;
    tx.commit()?;

    tracing::debug!("Upserted article {} for url hash {}", id, url_hash);
    Ok(id)
}

/// Look up an article by URL without writing
pub fn get_article_by_url(conn: &Connection, url: &str) -> Result<Option<Article>> {
    let url_hash = sha256_hex(url);
    let result = conn.query_row(
        "SELECT id, url, url_hash, headline, source, published_at, scraped_html, full_text, created_at
         FROM articles
         WHERE url_hash = ?1",
        params![url_hash],
        |row| {
            Ok(Article {
                id: row.get(0)?,
                url: row.get(1)?,
                url_hash: row.get(2)?,
                headline: row.get(3)?,
                source: row.get(4)?,
                published_at: row.get(5)?,
                scraped_html: row.get(6)?,
                full_text: row.get(7)?,
                created_at: row.get(8)?,
            })
        },
    );

    match result {
        Ok(article) => Ok(Some(article)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
