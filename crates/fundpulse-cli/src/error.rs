//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

use fundpulse_traits::TraitError;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// No fund has been selected yet.
    #[error("No fund selected. Run `fundpulse fund set <code>` first.")]
    NoFundSelected,

    /// An explicitly requested config file does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No cached article has the URL.
    #[error("No cached article for {0}")]
    ArticleNotFound(String),

    /// Logging could not be initialised.
    #[error("Logging error: {0}")]
    Logging(String),

    /// Storage or data provider error.
    #[error("{0}")]
    Backend(#[from] TraitError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
