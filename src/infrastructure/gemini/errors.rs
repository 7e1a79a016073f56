use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::ports::GenerationError;
use crate::infrastructure::logging::secret_scrubbing::scrub_secrets;

/// Errors that can occur when interacting with the Gemini API
#[derive(Error, Debug)]
pub enum GeminiApiError {
    /// Invalid request parameters (HTTP 400)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid API key or permission denied (HTTP 401/403)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Unknown model (HTTP 404)
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded - too many requests")]
    RateLimitExceeded,

    /// Server error from the API (HTTP 5xx)
    #[error("Server error ({0}): {1}")]
    ServerError(StatusCode, String),

    /// Network or connection error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The reply carried no candidate text
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// Unexpected status code
    #[error("Unknown error ({0}): {1}")]
    UnknownError(StatusCode, String),
}

impl GeminiApiError {
    /// Classify a non-success HTTP response.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status.as_u16() {
            400 => Self::InvalidRequest(body),
            401 | 403 => Self::AuthenticationFailed(body),
            404 => Self::ModelNotFound(body),
            429 => Self::RateLimitExceeded,
            500..=599 => Self::ServerError(status, body),
            _ => Self::UnknownError(status, body),
        }
    }

    /// Returns true if this error is transient and a later attempt may
    /// succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded | Self::ServerError(_, _) | Self::NetworkError(_)
        )
    }
}

impl From<GeminiApiError> for GenerationError {
    fn from(err: GeminiApiError) -> Self {
        let text = scrub_secrets(&err.to_string());
        match err {
            GeminiApiError::AuthenticationFailed(_) => Self::AuthError(text),
            GeminiApiError::RateLimitExceeded => Self::RateLimitExceeded(text),
            GeminiApiError::NetworkError(_) => Self::NetworkError(text),
            GeminiApiError::EmptyResponse(_) => Self::EmptyResponse(text),
            GeminiApiError::InvalidRequest(_)
            | GeminiApiError::ModelNotFound(_)
            | GeminiApiError::ServerError(_, _)
            | GeminiApiError::UnknownError(_, _) => Self::ServiceError(text),
        }
    }
}
