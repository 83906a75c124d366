//! In-memory collaborators for predictor tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use fundpulse_core::{FundSnapshot, Holding};
use fundpulse_engine::{HoldingsPredictor, PredictorConfig};
use fundpulse_ext_file::MemoryArticleCache;
use fundpulse_traits::{
    DateWindow, ExtractionError, SearchClient, SearchError, SearchResult, SentimentClient,
    SentimentScore, SentimentServiceError, TextExtractor,
};

// =============================================================================
// SEARCH
// =============================================================================

#[derive(Default)]
pub struct FakeSearch {
    responses: HashMap<String, Result<Vec<SearchResult>, SearchError>>,
    pub calls: Mutex<Vec<(String, usize, DateWindow)>>,
}

impl FakeSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(mut self, query: &str, results: Vec<SearchResult>) -> Self {
        self.responses.insert(query.to_string(), Ok(results));
        self
    }

    pub fn failure(mut self, query: &str, error: SearchError) -> Self {
        self.responses.insert(query.to_string(), Err(error));
        self
    }
}

#[async_trait]
impl SearchClient for FakeSearch {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        window: DateWindow,
    ) -> Result<Vec<SearchResult>, SearchError> {
        self.calls
            .lock()
            .push((query.to_string(), max_results, window));
        match self.responses.get(query) {
            Some(Ok(results)) => Ok(results.iter().take(max_results).cloned().collect()),
            Some(Err(e)) => Err(e.clone()),
            None => Ok(Vec::new()),
        }
    }
}

// =============================================================================
// EXTRACTOR
// =============================================================================

#[derive(Default)]
pub struct FakeExtractor {
    pages: HashMap<String, Vec<String>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, lines: &[&str]) -> Self {
        self.pages
            .insert(url.to_string(), lines.iter().map(|l| l.to_string()).collect());
        self
    }
}

#[async_trait]
impl TextExtractor for FakeExtractor {
    async fn extract(&self, url: &str) -> Result<Vec<String>, ExtractionError> {
        self.calls.lock().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ExtractionError::Timeout {
                url: url.to_string(),
            })
    }
}

// =============================================================================
// SENTIMENT
// =============================================================================

/// Scores a document by the first marker it contains.
#[derive(Default)]
pub struct FakeSentiment {
    scores: Vec<(String, Result<f64, SentimentServiceError>)>,
    pub documents: Mutex<Vec<String>>,
}

impl FakeSentiment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(mut self, marker: &str, score: f64) -> Self {
        self.scores.push((marker.to_string(), Ok(score)));
        self
    }

    pub fn failure(mut self, marker: &str, error: SentimentServiceError) -> Self {
        self.scores.push((marker.to_string(), Err(error)));
        self
    }
}

#[async_trait]
impl SentimentClient for FakeSentiment {
    async fn score_text(&self, text: &str) -> Result<SentimentScore, SentimentServiceError> {
        self.documents.lock().push(text.to_string());
        match self.scores.iter().find(|(marker, _)| text.contains(marker.as_str())) {
            Some((_, Ok(score))) => Ok(SentimentScore::new(*score, score.abs())),
            Some((_, Err(e))) => Err(e.clone()),
            None => Ok(SentimentScore::new(0.0, 0.0)),
        }
    }
}

// =============================================================================
// HARNESS
// =============================================================================

pub struct Harness {
    pub search: Arc<FakeSearch>,
    pub extractor: Arc<FakeExtractor>,
    pub sentiment: Arc<FakeSentiment>,
    pub cache: Arc<MemoryArticleCache>,
}

impl Harness {
    pub fn new(search: FakeSearch, extractor: FakeExtractor, sentiment: FakeSentiment) -> Self {
        Self {
            search: Arc::new(search),
            extractor: Arc::new(extractor),
            sentiment: Arc::new(sentiment),
            cache: Arc::new(MemoryArticleCache::new()),
        }
    }

    pub fn predictor(&self) -> HoldingsPredictor {
        self.predictor_with(PredictorConfig::default())
    }

    pub fn predictor_with(&self, config: PredictorConfig) -> HoldingsPredictor {
        HoldingsPredictor::builder()
            .with_config(config)
            .with_search(self.search.clone())
            .with_extractor(self.extractor.clone())
            .with_sentiment(self.sentiment.clone())
            .with_cache(self.cache.clone())
            .build()
            .unwrap()
    }
}

pub fn holding(code: &str, name: &str, weight: Decimal) -> Holding {
    Holding::new(code, name, weight).unwrap()
}

pub fn snapshot(holdings: Vec<Holding>) -> FundSnapshot {
    FundSnapshot::builder("161725", "Liquor Index Fund")
        .holdings(holdings)
        .build()
}

/// One result per holding whose article carries a `[code]` marker.
pub fn single_article_harness(holdings: &[(Holding, f64)]) -> Harness {
    let mut search = FakeSearch::new();
    let mut extractor = FakeExtractor::new();
    let mut sentiment = FakeSentiment::new();

    for (holding, score) in holdings {
        let url = format!("https://news.example.com/{}", holding.code);
        let marker = format!("[{}]", holding.code);
        search = search.results(
            &holding.name,
            vec![SearchResult::new(format!("{} news", holding.name), url.clone())],
        );
        extractor = extractor.page(&url, &[marker.as_str(), "body"]);
        sentiment = sentiment.score(&marker, *score);
    }

    Harness::new(search, extractor, sentiment)
}
