//! SDK error types.

use thiserror::Error;

/// Errors returned by remote API calls.
///
/// Callers that treat a missing resource as a distinct case (read after
/// delete, existence probes) can match on [`ApiError::NotFound`]; everything
/// else that the server rejected lands in [`ApiError::Api`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// The remote object does not exist (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The server rejected the request or reported a failure.
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The request never produced a usable HTTP response.
    #[error("transport: {0}")]
    Transport(String),

    /// The response body did not match the expected shape.
    #[error("invalid response payload: {0}")]
    Decode(String),

    /// The request was rejected locally, before any remote call.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Result type for API calls.
pub type Result<T> = std::result::Result<T, ApiError>;
