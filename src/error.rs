//! Error types for Unibergers
//!
//! Provides standardized error handling across the search pipeline. None of
//! these are fatal to a session: each one is recovered by further user input,
//! except catalog errors which only occur at startup.

use thiserror::Error;

/// Errors that can occur in the search pipeline
#[derive(Debug, Error)]
pub enum UniError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The bundled or supplied catalog could not be loaded
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Remote round trip failed or answered with a non-success status
    #[error("Search failed: {0}")]
    RemoteFailure(String),

    /// A remote round trip was requested for an empty term
    #[error("Search term must not be empty")]
    EmptyTermRejected,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Catalog loading errors. Always fatal at startup: no partial catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
}

/// Raised when a term cannot be packed into the fixed code-point buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("TOO_LONG: string contains {len} code points, at most 8 allowed")]
    TooLong { len: usize },
}

/// Result type alias for Unibergers operations
pub type UniResult<T> = Result<T, UniError>;

impl From<toml::de::Error> for UniError {
    fn from(err: toml::de::Error) -> Self {
        UniError::Config(err.to_string())
    }
}
