//! Error types for collaborator operations.

use thiserror::Error;

/// Common error type for storage and data-source operations.
#[derive(Debug, Error)]
pub enum TraitError {
    /// Connection to external service failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Requested resource not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Operation timed out
    #[error("timeout")]
    Timeout,

    /// Parse/deserialization error
    #[error("parse error: {0}")]
    ParseError(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Database error
    #[error("database error: {0}")]
    DatabaseError(String),

    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for TraitError {
    fn from(e: std::io::Error) -> Self {
        TraitError::IoError(e.to_string())
    }
}

/// News search failed outright.
///
/// An empty result list is not an error; see [`crate::SearchClient`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The provider could not be reached
    #[error("search request failed: {0}")]
    Transport(String),

    /// The provider answered with a non-success status
    #[error("search provider returned HTTP {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// The query could not be turned into a request
    #[error("invalid search query: {0}")]
    InvalidQuery(String),
}

/// Fetching or parsing one article failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// The fetch exceeded its timeout
    #[error("timed out fetching {url}")]
    Timeout {
        /// Article URL
        url: String,
    },

    /// The server answered with a non-success status
    #[error("HTTP {status} fetching {url}")]
    Status {
        /// Article URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Any other transport or decoding failure
    #[error("failed to fetch {url}: {message}")]
    Fetch {
        /// Article URL
        url: String,
        /// Underlying cause
        message: String,
    },

    /// The URL is not a fetchable http(s) URL
    #[error("invalid url {url}: {message}")]
    InvalidUrl {
        /// Offending URL
        url: String,
        /// Parser message
        message: String,
    },
}

impl ExtractionError {
    /// The URL the error refers to.
    pub fn url(&self) -> &str {
        match self {
            ExtractionError::Timeout { url }
            | ExtractionError::Status { url, .. }
            | ExtractionError::Fetch { url, .. }
            | ExtractionError::InvalidUrl { url, .. } => url,
        }
    }
}

/// The sentiment service could not score a document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SentimentServiceError {
    /// No API key was configured
    #[error("sentiment service API key missing (set {0})")]
    MissingApiKey(String),

    /// The service could not be reached
    #[error("sentiment request failed: {0}")]
    Transport(String),

    /// The service rejected the request
    #[error("sentiment service returned HTTP {status}: {message}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Error message from the service
        message: String,
    },

    /// The response did not contain a document sentiment
    #[error("invalid sentiment response: {0}")]
    InvalidResponse(String),

    /// Empty text was submitted
    #[error("cannot score an empty document")]
    EmptyDocument,
}
