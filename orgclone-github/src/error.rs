//! Error types for GitHub operations

use thiserror::Error;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while listing repositories
#[derive(Error, Debug)]
pub enum Error {
    /// Organization not found (HTTP 404)
    #[error("Organization '{0}' not found or not accessible")]
    NotFound(String),

    /// Rate limit exceeded or forbidden (HTTP 403)
    #[error("API rate limit exceeded or insufficient permissions")]
    RateLimited,

    /// Any other non-success status
    #[error("GitHub API error: {status} - {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body text
        body: String,
    },

    /// Transport error from the HTTP client
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<Error> for orgclone_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(org) => orgclone_core::Error::OrgNotFound(org),
            Error::RateLimited => orgclone_core::Error::RateLimited,
            Error::Api { status, body } => orgclone_core::Error::Api { status, body },
            Error::Http(e) => orgclone_core::Error::Http(e.to_string()),
            Error::Parse(msg) => orgclone_core::Error::Parse(msg),
            Error::Config(msg) => orgclone_core::Error::Config(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_errors_keep_their_kind() {
        let err: orgclone_core::Error = Error::NotFound("ghost".to_string()).into();
        assert!(matches!(err, orgclone_core::Error::OrgNotFound(ref org) if org == "ghost"));

        let err: orgclone_core::Error = Error::RateLimited.into();
        assert!(matches!(err, orgclone_core::Error::RateLimited));

        let err: orgclone_core::Error = Error::Api {
            status: 502,
            body: "Bad Gateway".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "GitHub API error: 502 - Bad Gateway");
    }
}
