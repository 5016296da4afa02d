//! Admin API client error types.

use std::sync::Arc;

/// Errors from the admin REST API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No bearer token configured.
    #[error("missing API token: TC_SOURCES_API_TOKEN not set")]
    MissingToken,

    /// Base URL could not be parsed or joined.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Request rejected before it was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed (expired or invalid token).
    #[error("authentication failed: {status}")]
    AuthError { status: u16 },

    /// HTTP error response, with the server's message when it sent one.
    #[error("HTTP error: {status}{}", message.as_deref().map(|m| format!(" ({m})")).unwrap_or_default())]
    HttpError { status: u16, message: Option<String> },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ApiError::Timeout } else { ApiError::Network(Arc::new(err)) }
    }
}

impl ApiError {
    /// Map into the core error, using `wrap` for failures that are neither
    /// auth nor timeout (search vs mutation).
    pub fn into_core(self, wrap: fn(String) -> tcs_core::Error) -> tcs_core::Error {
        match self {
            ApiError::MissingToken | ApiError::AuthError { .. } => tcs_core::Error::ApiAuth(self.to_string()),
            ApiError::Timeout => tcs_core::Error::ApiTimeout(self.to_string()),
            ApiError::HttpError { .. } => tcs_core::Error::HttpError(self.to_string()),
            ApiError::InvalidRequest(msg) => tcs_core::Error::InvalidInput(msg),
            ApiError::InvalidUrl(_) | ApiError::Network(_) | ApiError::Parse(_) => wrap(self.to_string()),
        }
    }
}

impl From<ApiError> for tcs_core::Error {
    fn from(err: ApiError) -> Self {
        err.into_core(tcs_core::Error::SearchFailed)
    }
}
