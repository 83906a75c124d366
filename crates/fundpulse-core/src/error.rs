//! Error types for the core domain.

use rust_decimal::Decimal;
use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while building domain values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A holding weight was negative.
    #[error("Invalid weight for {code}: {weight} (weights must be non-negative)")]
    NegativeWeight {
        /// Holding code.
        code: String,
        /// The rejected weight.
        weight: Decimal,
    },

    /// A holding code or name was blank.
    #[error("Invalid holding: {reason}")]
    InvalidHolding {
        /// Description of the problem.
        reason: String,
    },

    /// A weight string could not be parsed.
    #[error("Invalid weight '{input}'")]
    InvalidWeight {
        /// The raw input.
        input: String,
    },
}
