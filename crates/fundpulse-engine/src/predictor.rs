//! The holdings-weighted sentiment predictor.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use fundpulse_core::{
    AnalysisStatistics, ContributionStatus, FundPrediction, FundSnapshot, Holding,
    HoldingAnalysis, PredictionContribution,
};
use fundpulse_traits::{ArticleCache, SearchClient, SentimentClient, TextExtractor};

use crate::accumulator::SentimentAccumulator;
use crate::builder::PredictorBuilder;
use crate::config::PredictorConfig;
use crate::error::EngineError;

// =============================================================================
// PHASE
// =============================================================================

/// Where a predict run currently is.
///
/// ```text
/// Idle ─> Searching(h) ─> Extracting(h, url)* ─> Scoring(h) ─┬─> Searching(h+1)
///                                                            └─> Aggregating ─> Idle
/// ```
///
/// Holding failures never leave the cycle; they skip ahead to the next holding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PredictorPhase {
    /// No run in progress
    Idle,
    /// Waiting on the news search for a holding
    Searching {
        /// Holding name
        holding: String,
    },
    /// Extracting one search result
    Extracting {
        /// Holding name
        holding: String,
        /// Result URL
        url: String,
    },
    /// Waiting on the sentiment service
    Scoring {
        /// Holding name
        holding: String,
    },
    /// Summing weighted scores
    Aggregating,
}

impl fmt::Display for PredictorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictorPhase::Idle => write!(f, "idle"),
            PredictorPhase::Searching { holding } => write!(f, "searching news for {}", holding),
            PredictorPhase::Extracting { holding, url } => {
                write!(f, "extracting {} for {}", url, holding)
            }
            PredictorPhase::Scoring { holding } => write!(f, "scoring {}", holding),
            PredictorPhase::Aggregating => write!(f, "aggregating"),
        }
    }
}

/// Callback invoked on every phase transition.
pub type PhaseObserver = Arc<dyn Fn(&PredictorPhase) + Send + Sync>;

// =============================================================================
// PREDICTOR
// =============================================================================

/// Predicts a fund's short-term trend from the news sentiment of its holdings.
///
/// Holdings are processed one at a time in snapshot order, and each holding's
/// search results in result order.
pub struct HoldingsPredictor {
    config: PredictorConfig,
    search: Arc<dyn SearchClient>,
    extractor: Arc<dyn TextExtractor>,
    sentiment: Arc<dyn SentimentClient>,
    cache: Arc<dyn ArticleCache>,
    observer: Option<PhaseObserver>,

    snapshot: Option<FundSnapshot>,
    statistics: AnalysisStatistics,
    contributions: Vec<PredictionContribution>,
    prediction: Option<FundPrediction>,
    phase: PredictorPhase,
}

impl HoldingsPredictor {
    /// Create a predictor with no fund selected.
    pub fn new(
        config: PredictorConfig,
        search: Arc<dyn SearchClient>,
        extractor: Arc<dyn TextExtractor>,
        sentiment: Arc<dyn SentimentClient>,
        cache: Arc<dyn ArticleCache>,
    ) -> Self {
        Self {
            config,
            search,
            extractor,
            sentiment,
            cache,
            observer: None,
            snapshot: None,
            statistics: AnalysisStatistics::new(),
            contributions: Vec::new(),
            prediction: None,
            phase: PredictorPhase::Idle,
        }
    }

    /// Start building a predictor.
    pub fn builder() -> PredictorBuilder {
        PredictorBuilder::new()
    }

    /// Register a phase observer.
    pub fn set_observer(&mut self, observer: PhaseObserver) {
        self.observer = Some(observer);
    }

    // -------------------------------------------------------------------------
    // Fund selection
    // -------------------------------------------------------------------------

    /// Select a fund, replacing any previous one along with its contributions,
    /// prediction and statistics.
    pub fn set_fund(&mut self, snapshot: FundSnapshot) {
        info!(
            fund = snapshot.code(),
            name = snapshot.name(),
            holdings = snapshot.holdings().len(),
            "Fund selected"
        );
        self.snapshot = Some(snapshot);
        self.contributions.clear();
        self.prediction = None;
        self.statistics.reset();
        self.set_phase(PredictorPhase::Idle);
    }

    /// The selected fund.
    pub fn snapshot(&self) -> Option<&FundSnapshot> {
        self.snapshot.as_ref()
    }

    fn require_snapshot(&self) -> Result<&FundSnapshot, EngineError> {
        self.snapshot.as_ref().ok_or(EngineError::NoFundSelected)
    }

    // -------------------------------------------------------------------------
    // Prediction
    // -------------------------------------------------------------------------

    /// Analyse one holding, identified by code or name.
    ///
    /// Statistics are reset first. Contributions and the fund prediction are
    /// left untouched.
    pub async fn predict_one(&mut self, identifier: &str) -> Result<HoldingAnalysis, EngineError> {
        let snapshot = self.require_snapshot()?;
        let holding = snapshot
            .find_holding(identifier)
            .cloned()
            .ok_or_else(|| EngineError::UnknownHolding {
                identifier: identifier.trim().to_string(),
                fund_code: snapshot.code().to_string(),
            })?;

        self.statistics.reset();
        let analysis = self.analyze(&holding).await;
        self.set_phase(PredictorPhase::Idle);

        info!(
            holding = %holding.name,
            score = analysis.score,
            status = %analysis.status,
            "Holding analysed"
        );
        Ok(analysis)
    }

    /// Analyse every holding and aggregate the weighted fund prediction.
    ///
    /// The prediction is `sum(score * weight) / 100`. Holdings whose score was
    /// forced to zero still count as attempted.
    pub async fn predict_all(&mut self) -> Result<FundPrediction, EngineError> {
        let snapshot = self.require_snapshot()?.clone();

        self.statistics.reset();
        self.contributions.clear();
        self.prediction = None;

        info!(
            fund = snapshot.code(),
            holdings = snapshot.holdings().len(),
            "Predicting fund"
        );

        for holding in snapshot.holdings() {
            let analysis = self.analyze(holding).await;
            let contribution = PredictionContribution::from_analysis(holding, &analysis);
            debug!(
                holding = %holding.name,
                score = contribution.sentiment_score,
                weighted = contribution.weighted_score,
                "Contribution recorded"
            );
            // A repeated code replaces the earlier entry in place.
            match self
                .contributions
                .iter_mut()
                .find(|c| c.code == contribution.code)
            {
                Some(existing) => *existing = contribution,
                None => self.contributions.push(contribution),
            }
        }

        self.set_phase(PredictorPhase::Aggregating);
        let total: f64 = self.contributions.iter().map(|c| c.weighted_score).sum();
        let degraded = self
            .contributions
            .iter()
            .filter(|c| c.status.is_degraded())
            .count();

        let prediction = FundPrediction {
            fund_code: snapshot.code().to_string(),
            fund_name: snapshot.name().to_string(),
            value: total / 100.0,
            attempted: self.contributions.len(),
            scored: self.contributions.len() - degraded,
            degraded,
            predicted_at: Utc::now(),
        };
        self.prediction = Some(prediction.clone());
        self.set_phase(PredictorPhase::Idle);

        info!(
            fund = %prediction.fund_code,
            value = prediction.value,
            degraded = prediction.degraded,
            crawled = self.statistics.crawled_links,
            failed = self.statistics.failed_links.len(),
            "Fund prediction complete"
        );
        Ok(prediction)
    }

    /// Search, extract, cache and score one holding.
    async fn analyze(&mut self, holding: &Holding) -> HoldingAnalysis {
        self.set_phase(PredictorPhase::Searching {
            holding: holding.name.clone(),
        });

        let results = match self
            .search
            .search(
                &holding.name,
                self.config.results_per_holding,
                self.config.date_window,
            )
            .await
        {
            Ok(results) => results,
            Err(e) => {
                warn!(holding = %holding.name, error = %e, "News search failed");
                return HoldingAnalysis::degraded(
                    holding,
                    ContributionStatus::SearchFailed(e.to_string()),
                );
            }
        };
        debug!(holding = %holding.name, results = results.len(), "Search complete");

        let mut accumulator = SentimentAccumulator::new();
        for result in &results {
            self.set_phase(PredictorPhase::Extracting {
                holding: holding.name.clone(),
                url: result.url.clone(),
            });

            match self.extractor.extract(&result.url).await {
                Ok(lines) => {
                    let mut article = Vec::with_capacity(lines.len() + 1);
                    article.push(result.title.clone());
                    article.extend(lines);
                    let content = article.join("\n");

                    if let Err(e) = self
                        .cache
                        .put(&holding.name, &result.url, &result.title, &content)
                        .await
                    {
                        warn!(url = %result.url, error = %e, "Failed to cache article");
                    }
                    accumulator.push(content);
                    self.statistics.record_success();
                }
                Err(e) => {
                    warn!(holding = %holding.name, url = %result.url, error = %e, "Extraction failed");
                    self.statistics.record_failure(result.url.clone(), e.to_string());
                }
            }
        }

        let mut analysis = HoldingAnalysis::degraded(holding, ContributionStatus::NoContent);
        analysis.links_attempted = results.len();
        analysis.articles_extracted = accumulator.len();

        if accumulator.is_empty() {
            warn!(holding = %holding.name, "No article text to score");
            return analysis;
        }

        self.set_phase(PredictorPhase::Scoring {
            holding: holding.name.clone(),
        });
        match self.sentiment.score_text(&accumulator.document()).await {
            Ok(score) => {
                analysis.score = score.score;
                analysis.magnitude = Some(score.magnitude);
                analysis.status = ContributionStatus::Scored;
            }
            Err(e) => {
                warn!(holding = %holding.name, error = %e, "Sentiment scoring failed");
                analysis.status = ContributionStatus::SentimentFailed(e.to_string());
            }
        }
        analysis
    }

    fn set_phase(&mut self, phase: PredictorPhase) {
        if let Some(observer) = &self.observer {
            observer(&phase);
        }
        self.phase = phase;
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Search settings.
    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Current phase.
    pub fn phase(&self) -> &PredictorPhase {
        &self.phase
    }

    /// Statistics of the last predict invocation.
    pub fn statistics(&self) -> &AnalysisStatistics {
        &self.statistics
    }

    /// Contributions of the last [`predict_all`](Self::predict_all), one per code in holding order.
    pub fn contributions(&self) -> &[PredictionContribution] {
        &self.contributions
    }

    /// Contribution of one holding by code.
    pub fn contribution(&self, code: &str) -> Option<&PredictionContribution> {
        self.contributions.iter().find(|c| c.code == code)
    }

    /// Result of the last [`predict_all`](Self::predict_all).
    pub fn prediction(&self) -> Option<&FundPrediction> {
        self.prediction.as_ref()
    }

    /// The article cache.
    pub fn cache(&self) -> &Arc<dyn ArticleCache> {
        &self.cache
    }
}

impl fmt::Debug for HoldingsPredictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HoldingsPredictor")
            .field("config", &self.config)
            .field("cache", &self.cache.backend_name())
            .field("fund", &self.snapshot.as_ref().map(|s| s.code()))
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}
