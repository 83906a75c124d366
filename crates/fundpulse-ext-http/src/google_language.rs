//! Google Cloud Natural Language sentiment client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use fundpulse_traits::{SentimentClient, SentimentScore, SentimentServiceError};

use crate::client::{build_client, HttpConfig};

/// Default `analyzeSentiment` endpoint.
pub const GOOGLE_LANGUAGE_URL: &str =
    "https://language.googleapis.com/v1/documents:analyzeSentiment";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest<'a> {
    document: Document<'a>,
    encoding_type: &'static str,
}

#[derive(Debug, Serialize)]
struct Document<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    content: &'a str,
    language: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    document_sentiment: Option<Sentiment>,
}

// Zero-valued fields are omitted from the response.
#[derive(Debug, Deserialize)]
struct Sentiment {
    #[serde(default)]
    score: f64,
    #[serde(default)]
    magnitude: f64,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Build the JSON request body for `text`.
fn request_body(text: &str, language: &str) -> Result<String, SentimentServiceError> {
    let request = AnalyzeRequest {
        document: Document {
            kind: "PLAIN_TEXT",
            content: text,
            language,
        },
        encoding_type: "UTF8",
    };
    serde_json::to_string(&request).map_err(|e| SentimentServiceError::InvalidResponse(e.to_string()))
}

/// Read the document sentiment from a success body.
fn parse_response(body: &str) -> Result<SentimentScore, SentimentServiceError> {
    let response: AnalyzeResponse = serde_json::from_str(body)
        .map_err(|e| SentimentServiceError::InvalidResponse(e.to_string()))?;
    let sentiment = response.document_sentiment.ok_or_else(|| {
        SentimentServiceError::InvalidResponse("missing documentSentiment".to_string())
    })?;
    Ok(SentimentScore::new(sentiment.score, sentiment.magnitude))
}

/// Pull the message out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string())
}

/// [`SentimentClient`] over the Natural Language API.
pub struct GoogleLanguageClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    language: String,
}

impl std::fmt::Debug for GoogleLanguageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleLanguageClient")
            .field("endpoint", &self.endpoint)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl GoogleLanguageClient {
    /// Client with an explicit key.
    ///
    /// `key_source` names where the key came from, for the error message when
    /// it is blank.
    pub fn new(
        api_key: impl Into<String>,
        key_source: &str,
        language: impl Into<String>,
        config: &HttpConfig,
    ) -> Result<Self, SentimentServiceError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SentimentServiceError::MissingApiKey(key_source.to_string()));
        }
        let client =
            build_client(config).map_err(|e| SentimentServiceError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: GOOGLE_LANGUAGE_URL.to_string(),
            api_key: api_key.trim().to_string(),
            language: language.into(),
        })
    }

    /// Client with the key read from environment variable `var`.
    pub fn from_env(
        var: &str,
        language: impl Into<String>,
        config: &HttpConfig,
    ) -> Result<Self, SentimentServiceError> {
        let key = std::env::var(var).unwrap_or_default();
        Self::new(key, var, language, config)
    }

    /// Override the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Document language sent with each request.
    pub fn language(&self) -> &str {
        &self.language
    }
}

#[async_trait]
impl SentimentClient for GoogleLanguageClient {
    async fn score_text(&self, text: &str) -> Result<SentimentScore, SentimentServiceError> {
        if text.trim().is_empty() {
            return Err(SentimentServiceError::EmptyDocument);
        }

        let body = request_body(text, &self.language)?;
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| SentimentServiceError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SentimentServiceError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(SentimentServiceError::Service {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let score = parse_response(&text)?;
        debug!(score = score.score, magnitude = score.magnitude, "Scored document");
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = request_body("茅台股价上涨", "zh").unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(value["document"]["type"], "PLAIN_TEXT");
        assert_eq!(value["document"]["content"], "茅台股价上涨");
        assert_eq!(value["document"]["language"], "zh");
        assert_eq!(value["encodingType"], "UTF8");
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{"documentSentiment":{"magnitude":1.3,"score":0.4},"language":"zh","sentences":[]}"#;
        assert_eq!(parse_response(body).unwrap(), SentimentScore::new(0.4, 1.3));
    }

    #[test]
    fn test_parse_response_omitted_zero_fields() {
        let body = r#"{"documentSentiment":{"magnitude":0.2},"language":"zh"}"#;
        assert_eq!(parse_response(body).unwrap(), SentimentScore::new(0.0, 0.2));
    }

    #[test]
    fn test_parse_response_without_sentiment() {
        assert!(matches!(
            parse_response(r#"{"language":"zh"}"#),
            Err(SentimentServiceError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(body), "API key not valid.");
        assert_eq!(error_message(" upstream down "), "upstream down");
    }

    #[test]
    fn test_blank_key_is_missing() {
        let err = GoogleLanguageClient::new("  ", "API_KEY", "zh", &HttpConfig::default())
            .unwrap_err();
        assert_eq!(err, SentimentServiceError::MissingApiKey("API_KEY".into()));
    }

    #[tokio::test]
    async fn test_empty_document_rejected_before_request() {
        let client =
            GoogleLanguageClient::new("key", "API_KEY", "zh", &HttpConfig::default()).unwrap();
        assert_eq!(
            client.score_text(" \n ").await.unwrap_err(),
            SentimentServiceError::EmptyDocument
        );
    }
}
