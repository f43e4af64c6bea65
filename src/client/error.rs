//! Request client error types
//!
//! Every failure a `get` or `post` can produce. Errors are `Clone` because a
//! single coalesced GET hands the same outcome to every waiting caller.

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the request client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Network failure before any response arrived (offline, refused, reset)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status. Displays the server message verbatim.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Success status, but the body carried a business-level `error` field.
    /// Displays the server message verbatim.
    #[error("{0}")]
    Application(String),

    /// The call did not settle before its deadline
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// A success response whose body was not valid JSON
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// An authenticated operation was attempted without a credential
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The request was rejected locally before reaching the network
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Whether the failure came from the server rather than the network or
    /// local validation
    pub fn is_remote(&self) -> bool {
        matches!(self, ApiError::Server { .. } | ApiError::Application(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Result type alias for request client operations
pub type ApiResult<T> = Result<T, ApiError>;
