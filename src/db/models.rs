//! Relational store models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sentiment::SentimentScore;

/// Article row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub url: String,
    pub url_hash: String,
    pub headline: String,
    pub source: Option<String>,
    pub published_at: Option<String>,
    pub scraped_html: Option<String>,
    pub full_text: Option<String>,
    pub created_at: String,
}

/// Input for article upsert
#[derive(Debug, Clone, Default)]
pub struct NewArticle {
    pub url: String,
    pub headline: String,
    pub source: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub scraped_html: Option<String>,
    pub full_text: Option<String>,
}

/// Optional per-link attributes
///
/// The field set is a closed enumeration; an upsert writes only the fields
/// that are `Some`, leaving previously stored values for the rest intact.
#[derive(Debug, Clone, Default)]
pub struct LinkFields {
    pub relevance: Option<f64>,
    pub vader_score: Option<f64>,
    pub finbert_score: Option<f64>,
}

impl LinkFields {
    /// True when no field is supplied (the upsert degenerates to
    /// ensure-the-link-row-exists)
    pub fn is_empty(&self) -> bool {
        self.relevance.is_none() && self.vader_score.is_none() && self.finbert_score.is_none()
    }

    /// Fold a sentiment score into the link fields. Absent scores are left
    /// unsupplied so they never clobber stored values.
    pub fn with_sentiment(mut self, score: &SentimentScore) -> Self {
        if score.vader.is_some() {
            self.vader_score = score.vader;
        }
        if score.finbert.is_some() {
            self.finbert_score = score.finbert;
        }
        self
    }
}

/// One realized-return record for bulk insertion
#[derive(Debug, Clone)]
pub struct NewActual {
    pub article_ticker_id: i64,
    pub horizon: String,
    pub actual_pct: f64,
    pub computed_at: DateTime<Utc>,
}

/// Timestamps are stored as TEXT at second granularity; two instants that
/// format identically are the same fact key.
pub(crate) fn format_utc(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}
