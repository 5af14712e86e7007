//! Sentiment collaborator seam
//!
//! Scoring itself lives outside this crate (wrapped pretrained models);
//! the store only consumes the resulting pair of nullable scores via
//! [`LinkFields::with_sentiment`](crate::db::models::LinkFields::with_sentiment).

use serde::{Deserialize, Serialize};

/// Two independent sentiment readings for one text, each in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    /// Lexicon-based score
    pub vader: Option<f64>,
    /// Finance-tuned model score
    pub finbert: Option<f64>,
}

impl SentimentScore {
    /// The score for text no model was run on
    pub fn empty() -> Self {
        Self {
            vader: None,
            finbert: None,
        }
    }
}

/// Produces sentiment scores for raw text.
///
/// Implementations must return [`SentimentScore::empty`] for empty or
/// whitespace-only input rather than failing.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> SentimentScore;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed-output scorer standing in for the real model wrappers
    struct CannedScorer(SentimentScore);

    impl SentimentScorer for CannedScorer {
        fn score(&self, text: &str) -> SentimentScore {
            if text.trim().is_empty() {
                SentimentScore::empty()
            } else {
                self.0
            }
        }
    }

    #[test]
    fn test_blank_text_scores_empty() {
        let scorer = CannedScorer(SentimentScore {
            vader: Some(0.5),
            finbert: Some(0.2),
        });
        assert_eq!(scorer.score("   "), SentimentScore::empty());
        assert_eq!(scorer.score(""), SentimentScore::empty());
    }

    #[test]
    fn test_scores_pass_through() {
        let scorer = CannedScorer(SentimentScore {
            vader: Some(-0.3),
            finbert: Some(0.1),
        });
        let score = scorer.score("Shares tumbled after the recall notice");
        assert_eq!(score.vader, Some(-0.3));
        assert_eq!(score.finbert, Some(0.1));
    }
}
