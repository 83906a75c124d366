//! Engine error types.

use thiserror::Error;

/// Engine error type.
///
/// Only precondition failures surface here. Per-holding search, extraction
/// and sentiment failures degrade the holding's score instead.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No fund has been selected yet
    #[error("no fund selected")]
    NoFundSelected,

    /// The identifier matches no holding of the current fund
    #[error("unknown holding '{identifier}' in fund {fund_code}")]
    UnknownHolding {
        /// Code or name that was looked up
        identifier: String,
        /// Fund that was searched
        fund_code: String,
    },

    /// Article cache error
    #[error("cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<fundpulse_traits::TraitError> for EngineError {
    fn from(e: fundpulse_traits::TraitError) -> Self {
        EngineError::Cache(e.to_string())
    }
}
