//! CLI error types.

use thiserror::Error;

use ttf_core::NoMatch;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid date format.
    #[error("Invalid date format: {0}. Use YYYY-MM-DD.")]
    InvalidDate(String),

    /// A reference resolved to nothing.
    #[error("No match for {reference}: {reason}")]
    NoMatch {
        /// The reference as typed.
        reference: String,
        /// Why nothing qualified.
        reason: NoMatch,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
