//! Page fetching.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use fundpulse_traits::{ExtractionError, TraitError};

use crate::config::ExtractorConfig;

/// Raw bytes of a fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,
    /// Undecoded response body
    pub body: Vec<u8>,
    /// `Content-Type` header, if sent
    pub content_type: Option<String>,
}

/// Fetches a page body.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url`, failing on transport errors and non-success statuses.
    async fn fetch(&self, url: &str) -> Result<FetchedPage, ExtractionError>;
}

/// [`PageFetcher`] over a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    /// Build a fetcher with the configured timeout and user agent.
    pub fn new(config: &ExtractorConfig) -> Result<Self, TraitError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| TraitError::Internal(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// Reject anything that is not an absolute http(s) URL.
pub fn validate_url(url: &str) -> Result<Url, ExtractionError> {
    let parsed = Url::parse(url).map_err(|e| ExtractionError::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ExtractionError::InvalidUrl {
            url: url.to_string(),
            message: format!("unsupported scheme '{}'", other),
        }),
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, ExtractionError> {
        let parsed = validate_url(url)?;

        let response = self.client.get(parsed).send().await.map_err(|e| {
            if e.is_timeout() {
                ExtractionError::Timeout {
                    url: url.to_string(),
                }
            } else {
                ExtractionError::Fetch {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                ExtractionError::Timeout {
                    url: url.to_string(),
                }
            } else {
                ExtractionError::Fetch {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        debug!(url = %final_url, bytes = body.len(), "Fetched page");

        Ok(FetchedPage {
            url: final_url,
            body: body.to_vec(),
            content_type,
        })
    }
}
