//! Error types for orgclone

use thiserror::Error;

/// Result type alias for orgclone operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for orgclone operations
#[derive(Error, Debug)]
pub enum Error {
    /// The organization does not exist or the token cannot see it
    #[error("Organization '{0}' not found or not accessible")]
    OrgNotFound(String),

    /// The provider refused the request (HTTP 403)
    #[error("API rate limit exceeded or insufficient permissions")]
    RateLimited,

    /// Any other non-success response from the provider
    #[error("GitHub API error: {status} - {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body text
        body: String,
    },

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
