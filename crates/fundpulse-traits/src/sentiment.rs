//! Sentiment scoring.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SentimentServiceError;

/// Document-level sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    /// Polarity, roughly -1 (negative) to 1 (positive)
    pub score: f64,
    /// Strength of emotion regardless of polarity, >= 0
    pub magnitude: f64,
}

impl SentimentScore {
    /// Create a score.
    pub fn new(score: f64, magnitude: f64) -> Self {
        Self { score, magnitude }
    }
}

/// Trait for sentiment-scoring services.
///
/// Callers must not submit empty text.
#[async_trait]
pub trait SentimentClient: Send + Sync {
    /// Score a block of accumulated article text.
    async fn score_text(&self, text: &str) -> Result<SentimentScore, SentimentServiceError>;
}
