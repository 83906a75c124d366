//! Analysis results: per-holding outcomes, fund contributions and crawl statistics.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::holding::Holding;

// =============================================================================
// CONTRIBUTION STATUS
// =============================================================================

/// How a holding's sentiment score was obtained.
///
/// Every variant other than [`ContributionStatus::Scored`] means the score was
/// forced to zero by an upstream failure rather than read from the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ContributionStatus {
    /// The sentiment service scored the accumulated articles.
    Scored,
    /// No article text could be gathered for the holding.
    NoContent,
    /// The news search itself failed.
    SearchFailed(String),
    /// The sentiment service rejected or failed the request.
    SentimentFailed(String),
}

impl ContributionStatus {
    /// True if the score is a forced zero.
    pub fn is_degraded(&self) -> bool {
        !matches!(self, ContributionStatus::Scored)
    }

    /// Failure reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            ContributionStatus::SearchFailed(r) | ContributionStatus::SentimentFailed(r) => {
                Some(r)
            }
            _ => None,
        }
    }
}

impl fmt::Display for ContributionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContributionStatus::Scored => write!(f, "scored"),
            ContributionStatus::NoContent => write!(f, "degraded: no content"),
            ContributionStatus::SearchFailed(r) => write!(f, "degraded: search failed ({})", r),
            ContributionStatus::SentimentFailed(r) => {
                write!(f, "degraded: sentiment failed ({})", r)
            }
        }
    }
}

// =============================================================================
// HOLDING ANALYSIS
// =============================================================================

/// Outcome of analysing a single holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingAnalysis {
    /// Holding code
    pub code: String,
    /// Holding name (the search query)
    pub name: String,
    /// Sentiment score, zero when degraded
    pub score: f64,
    /// Sentiment magnitude, when the service scored the text
    pub magnitude: Option<f64>,
    /// Number of search results attempted
    pub links_attempted: usize,
    /// Number of articles successfully extracted
    pub articles_extracted: usize,
    /// How the score was obtained
    pub status: ContributionStatus,
}

impl HoldingAnalysis {
    /// A degraded analysis with a zero score.
    pub fn degraded(holding: &Holding, status: ContributionStatus) -> Self {
        Self {
            code: holding.code.clone(),
            name: holding.name.clone(),
            score: 0.0,
            magnitude: None,
            links_attempted: 0,
            articles_extracted: 0,
            status,
        }
    }
}

// =============================================================================
// PREDICTION CONTRIBUTION
// =============================================================================

/// One holding's share of the fund-level prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionContribution {
    /// Holding code
    pub code: String,
    /// Holding name
    pub name: String,
    /// Sentiment score in roughly [-1, 1]
    pub sentiment_score: f64,
    /// Portfolio weight in percent
    pub position_weight: Decimal,
    /// `sentiment_score * position_weight`
    pub weighted_score: f64,
    /// How the score was obtained
    pub status: ContributionStatus,
}

impl PredictionContribution {
    /// Weight a holding analysis by the holding's portfolio weight.
    pub fn from_analysis(holding: &Holding, analysis: &HoldingAnalysis) -> Self {
        let weight = holding.weight.to_f64().unwrap_or(0.0);
        Self {
            code: holding.code.clone(),
            name: holding.name.clone(),
            sentiment_score: analysis.score,
            position_weight: holding.weight,
            weighted_score: analysis.score * weight,
            status: analysis.status.clone(),
        }
    }
}

// =============================================================================
// FUND PREDICTION
// =============================================================================

/// Fund-level result of a full run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundPrediction {
    /// Fund code
    pub fund_code: String,
    /// Fund name
    pub fund_name: String,
    /// `sum(score * weight) / 100`
    pub value: f64,
    /// Holdings analysed in this run
    pub attempted: usize,
    /// Holdings scored by the sentiment service
    pub scored: usize,
    /// Holdings whose score was forced to zero
    pub degraded: usize,
    /// When the run finished
    pub predicted_at: DateTime<Utc>,
}

impl FundPrediction {
    /// True when every holding was scored without degradation.
    pub fn is_complete(&self) -> bool {
        self.degraded == 0 && self.scored == self.attempted
    }

    /// Coarse direction label for display.
    pub fn trend(&self) -> &'static str {
        if self.value > 0.0 {
            "up"
        } else if self.value < 0.0 {
            "down"
        } else {
            "flat"
        }
    }
}

// =============================================================================
// STATISTICS
// =============================================================================

/// A link that could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedLink {
    /// The URL that failed
    pub url: String,
    /// Why it failed
    pub reason: String,
}

/// Crawl statistics for one predict invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisStatistics {
    /// Links attempted, successful or not
    pub crawled_links: usize,
    /// Links that failed, in attempt order
    pub failed_links: Vec<FailedLink>,
}

impl AnalysisStatistics {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all counters.
    pub fn reset(&mut self) {
        self.crawled_links = 0;
        self.failed_links.clear();
    }

    /// Count a successfully extracted link.
    pub fn record_success(&mut self) {
        self.crawled_links += 1;
    }

    /// Count a failed link and remember why.
    pub fn record_failure(&mut self, url: impl Into<String>, reason: impl Into<String>) {
        self.crawled_links += 1;
        self.failed_links.push(FailedLink {
            url: url.into(),
            reason: reason.into(),
        });
    }

    /// Links that extracted successfully.
    pub fn succeeded_links(&self) -> usize {
        self.crawled_links.saturating_sub(self.failed_links.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_degraded_flag() {
        assert!(!ContributionStatus::Scored.is_degraded());
        assert!(ContributionStatus::NoContent.is_degraded());
        assert!(ContributionStatus::SearchFailed("timeout".into()).is_degraded());
        assert_eq!(
            ContributionStatus::SentimentFailed("quota".into()).reason(),
            Some("quota")
        );
    }

    #[test]
    fn test_contribution_weights_score() {
        let holding = Holding::new("600519", "Kweichow Moutai", dec!(60)).unwrap();
        let analysis = HoldingAnalysis {
            code: holding.code.clone(),
            name: holding.name.clone(),
            score: 0.5,
            magnitude: Some(1.2),
            links_attempted: 1,
            articles_extracted: 1,
            status: ContributionStatus::Scored,
        };

        let contribution = PredictionContribution::from_analysis(&holding, &analysis);
        assert_relative_eq!(contribution.weighted_score, 30.0);
        assert_eq!(contribution.position_weight, dec!(60));
    }

    #[test]
    fn test_degraded_analysis_is_zero() {
        let holding = Holding::new("000858", "Wuliangye", dec!(40)).unwrap();
        let analysis = HoldingAnalysis::degraded(&holding, ContributionStatus::NoContent);

        let contribution = PredictionContribution::from_analysis(&holding, &analysis);
        assert_eq!(contribution.weighted_score, 0.0);
        assert!(contribution.status.is_degraded());
    }

    #[test]
    fn test_statistics_counts_every_attempt() {
        let mut stats = AnalysisStatistics::new();
        stats.record_success();
        stats.record_failure("https://example.com/a", "timeout");
        stats.record_success();

        assert_eq!(stats.crawled_links, 3);
        assert_eq!(stats.failed_links.len(), 1);
        assert_eq!(stats.succeeded_links(), 2);

        stats.reset();
        assert_eq!(stats, AnalysisStatistics::default());
    }

    #[test]
    fn test_prediction_completeness() {
        let mut prediction = FundPrediction {
            fund_code: "161725".into(),
            fund_name: "Liquor Index Fund".into(),
            value: 0.22,
            attempted: 2,
            scored: 2,
            degraded: 0,
            predicted_at: Utc::now(),
        };
        assert!(prediction.is_complete());
        assert_eq!(prediction.trend(), "up");

        prediction.scored = 1;
        prediction.degraded = 1;
        assert!(!prediction.is_complete());
    }

    #[test]
    fn test_status_serializes_with_reason() {
        let json = serde_json::to_string(&ContributionStatus::SearchFailed("rate limited".into()))
            .unwrap();
        assert_eq!(json, r#"{"status":"search_failed","reason":"rate limited"}"#);
    }
}
