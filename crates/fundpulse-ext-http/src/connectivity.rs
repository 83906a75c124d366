//! Health checks for the external services.
//!
//! Page targets pass only on a 2xx answer. The sentiment service is checked
//! with a real scoring request, so a missing or rejected API key fails too.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use fundpulse_traits::{SentimentClient, SentimentServiceError, TraitError};

use crate::client::{build_client, HttpConfig};
use crate::eastmoney::EASTMONEY_BASE_URL;
use crate::google_search::GOOGLE_SEARCH_URL;

/// Document scored by the sentiment check.
pub const SENTIMENT_CHECK_TEXT: &str = "基金净值稳步上涨";

/// Label of the sentiment check row.
pub const SENTIMENT_TARGET: &str = "sentiment api";

/// One endpoint to check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckTarget {
    /// Display label
    pub name: String,
    /// URL requested with GET
    pub url: String,
}

impl CheckTarget {
    /// Create a target.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Outcome of checking one target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    /// Target label
    pub name: String,
    /// Checked URL
    pub url: String,
    /// True if the service answered successfully
    pub reachable: bool,
    /// HTTP status, when a response arrived
    pub status: Option<u16>,
    /// Round trip in milliseconds
    pub elapsed_ms: u64,
    /// Why the check failed
    pub error: Option<String>,
}

struct SentimentCheck {
    url: String,
    client: Result<Arc<dyn SentimentClient>, SentimentServiceError>,
}

/// Checks the fund data, search and sentiment endpoints.
pub struct ConnectivityChecker {
    client: reqwest::Client,
    targets: Vec<CheckTarget>,
    sentiment: Option<SentimentCheck>,
}

impl ConnectivityChecker {
    /// Checker over explicit page targets.
    pub fn new(config: &HttpConfig, targets: Vec<CheckTarget>) -> Result<Self, TraitError> {
        Ok(Self {
            client: build_client(config)?,
            targets,
            sentiment: None,
        })
    }

    /// Also check a sentiment client at `url`.
    ///
    /// Pass the construction error (e.g. a missing key) as `Err` to have it
    /// reported as a failed check.
    pub fn with_sentiment(
        mut self,
        url: impl Into<String>,
        client: Result<Arc<dyn SentimentClient>, SentimentServiceError>,
    ) -> Self {
        self.sentiment = Some(SentimentCheck {
            url: url.into(),
            client,
        });
        self
    }

    /// The fund data and search pages, using `fund_code` for the fund pages.
    pub fn default_targets(fund_code: &str) -> Vec<CheckTarget> {
        vec![
            CheckTarget::new(
                "fund data script",
                format!("{}/pingzhongdata/{}.js", EASTMONEY_BASE_URL, fund_code),
            ),
            CheckTarget::new(
                "fund page",
                format!("{}/{}.html", EASTMONEY_BASE_URL, fund_code),
            ),
            CheckTarget::new("news search", format!("{}?q=fund&tbm=nws", GOOGLE_SEARCH_URL)),
        ]
    }

    /// Page targets in check order.
    pub fn targets(&self) -> &[CheckTarget] {
        &self.targets
    }

    /// Check every page target in order, then the sentiment service.
    pub async fn run(&self) -> Vec<CheckResult> {
        let mut results = Vec::with_capacity(self.targets.len() + 1);
        for target in &self.targets {
            results.push(self.check(target).await);
        }
        if let Some(sentiment) = &self.sentiment {
            results.push(check_sentiment(sentiment).await);
        }
        results
    }

    async fn check(&self, target: &CheckTarget) -> CheckResult {
        let started = Instant::now();
        let outcome = self.client.get(&target.url).send().await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let (status, error) = match outcome {
            Ok(response) if response.status().is_success() => {
                (Some(response.status().as_u16()), None)
            }
            Ok(response) => {
                let status = response.status();
                (Some(status.as_u16()), Some(format!("HTTP {}", status)))
            }
            Err(e) => (None, Some(e.to_string())),
        };
        report(&target.name, &target.url, status, error, elapsed_ms)
    }
}

async fn check_sentiment(check: &SentimentCheck) -> CheckResult {
    let started = Instant::now();
    let outcome = match &check.client {
        Ok(client) => client.score_text(SENTIMENT_CHECK_TEXT).await.map(|_| ()),
        Err(e) => Err(e.clone()),
    };
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let (status, error) = match outcome {
        Ok(()) => (Some(200), None),
        Err(e) => {
            let status = match &e {
                SentimentServiceError::Service { status, .. } => Some(*status),
                _ => None,
            };
            (status, Some(e.to_string()))
        }
    };
    report(SENTIMENT_TARGET, &check.url, status, error, elapsed_ms)
}

fn report(
    name: &str,
    url: &str,
    status: Option<u16>,
    error: Option<String>,
    elapsed_ms: u64,
) -> CheckResult {
    match &error {
        None => info!(endpoint = name, ?status, elapsed_ms, "Endpoint healthy"),
        Some(e) => warn!(endpoint = name, ?status, error = %e, "Endpoint check failed"),
    }
    CheckResult {
        name: name.to_string(),
        url: url.to_string(),
        reachable: error.is_none(),
        status,
        elapsed_ms,
        error,
    }
}
