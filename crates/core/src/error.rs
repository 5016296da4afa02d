//! Unified error types for the candidate-source cache.
//!
//! Display strings carry a stable `CODE:` prefix so the MCP layer and logs
//! agree on what went wrong.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the candidate-source cache and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., zero page size).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// No cache entry found for the given source.
    #[error("CACHE_MISS: {0}")]
    CacheMiss(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// A stored entry could not be encoded or decoded.
    #[error("CACHE_ERROR: serialization failed: {0}")]
    Serialization(String),

    /// The remote paged search failed.
    #[error("SEARCH_FAILED: {0}")]
    SearchFailed(String),

    /// A remote mutation (merge, copy, star, ...) failed.
    #[error("MUTATION_FAILED: {0}")]
    MutationFailed(String),

    /// The remote API rejected our credentials.
    #[error("API_AUTH_ERROR: {0}")]
    ApiAuth(String),

    /// The remote API did not answer in time.
    #[error("API_TIMEOUT: {0}")]
    ApiTimeout(String),

    /// HTTP error response from the remote API.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::CacheMiss(msg) => (-32001, msg.clone()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::Serialization(msg) => (-32002, msg.clone()),
            Error::SearchFailed(msg) => (-32003, msg.clone()),
            Error::MutationFailed(msg) => (-32004, msg.clone()),
            Error::ApiAuth(msg) => (-32005, msg.clone()),
            Error::ApiTimeout(msg) => (-32006, msg.clone()),
            Error::HttpError(msg) => (-32007, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::CacheMiss("saved-list:7".to_string());
        assert!(err.to_string().contains("CACHE_MISS"));
        assert!(err.to_string().contains("saved-list:7"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::CacheMiss("saved-list:7".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32001);

        let mcp_err: McpError = Error::SearchFailed("HTTP 500".into()).into();
        assert_eq!(mcp_err.code.0, -32003);
        assert_eq!(mcp_err.message, "HTTP 500");
    }

    #[test]
    fn test_serde_error_is_serialization() {
        let err: Error = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
