//! Builder pattern for the predictor.

use std::sync::Arc;

use fundpulse_core::FundSnapshot;
use fundpulse_traits::{ArticleCache, SearchClient, SentimentClient, TextExtractor};

use crate::config::PredictorConfig;
use crate::error::EngineError;
use crate::predictor::{HoldingsPredictor, PhaseObserver};

/// Builder for constructing a [`HoldingsPredictor`].
pub struct PredictorBuilder {
    config: Option<PredictorConfig>,
    search: Option<Arc<dyn SearchClient>>,
    extractor: Option<Arc<dyn TextExtractor>>,
    sentiment: Option<Arc<dyn SentimentClient>>,
    cache: Option<Arc<dyn ArticleCache>>,
    observer: Option<PhaseObserver>,
    snapshot: Option<FundSnapshot>,
}

impl PredictorBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            search: None,
            extractor: None,
            sentiment: None,
            cache: None,
            observer: None,
            snapshot: None,
        }
    }

    /// Set the search settings.
    pub fn with_config(mut self, config: PredictorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the news search client.
    pub fn with_search(mut self, search: Arc<dyn SearchClient>) -> Self {
        self.search = Some(search);
        self
    }

    /// Set the article extractor.
    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Set the sentiment client.
    pub fn with_sentiment(mut self, sentiment: Arc<dyn SentimentClient>) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    /// Set the article cache.
    pub fn with_cache(mut self, cache: Arc<dyn ArticleCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Set a phase observer.
    pub fn with_observer(mut self, observer: PhaseObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Select a fund up front.
    pub fn with_snapshot(mut self, snapshot: FundSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Build the predictor.
    pub fn build(self) -> Result<HoldingsPredictor, EngineError> {
        let config = self.config.unwrap_or_default();

        let search = self
            .search
            .ok_or_else(|| EngineError::Config("search client not configured".into()))?;

        let extractor = self
            .extractor
            .ok_or_else(|| EngineError::Config("extractor not configured".into()))?;

        let sentiment = self
            .sentiment
            .ok_or_else(|| EngineError::Config("sentiment client not configured".into()))?;

        let cache = self
            .cache
            .ok_or_else(|| EngineError::Config("article cache not configured".into()))?;

        let mut predictor = HoldingsPredictor::new(config, search, extractor, sentiment, cache);
        if let Some(observer) = self.observer {
            predictor.set_observer(observer);
        }
        if let Some(snapshot) = self.snapshot {
            predictor.set_fund(snapshot);
        }
        Ok(predictor)
    }
}

impl Default for PredictorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
