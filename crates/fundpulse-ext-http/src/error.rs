//! Fund data errors.

use thiserror::Error;

use fundpulse_traits::TraitError;

/// Loading a fund from the data provider failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FundDataError {
    /// The request failed before a response arrived
    #[error("request to {url} failed: {message}")]
    Http {
        /// Requested URL
        url: String,
        /// Underlying cause
        message: String,
    },

    /// The provider answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The fund does not exist at the provider
    #[error("fund {0} not found")]
    UnknownFund(String),

    /// A required script variable is absent
    #[error("variable '{0}' not found in fund script")]
    MissingVariable(String),

    /// A script variable is not valid JSON of the expected shape
    #[error("variable '{name}' is malformed: {message}")]
    InvalidVariable {
        /// Variable name
        name: String,
        /// Parser message
        message: String,
    },
}

impl From<FundDataError> for TraitError {
    fn from(e: FundDataError) -> Self {
        match e {
            FundDataError::Http { .. } => TraitError::ConnectionFailed(e.to_string()),
            FundDataError::Status { .. } => TraitError::ConnectionFailed(e.to_string()),
            FundDataError::UnknownFund(code) => TraitError::NotFound(format!("fund {}", code)),
            FundDataError::MissingVariable(_) | FundDataError::InvalidVariable { .. } => {
                TraitError::ParseError(e.to_string())
            }
        }
    }
}
