//! Text generation port.
//!
//! Abstracts the generative model behind a single prompt-in, text-out
//! call so the analysis pipeline can run against Gemini in production and
//! a scripted generator in tests.

use async_trait::async_trait;

/// Error types for text generation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("Generator not configured: {0}")]
    NotConfigured(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Generation timeout after {0}s")]
    Timeout(u64),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

/// Port trait for text generation backends
///
/// Implementations must be `Send + Sync` so one instance can be shared
/// across the batch.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Identifier used in logs, e.g. "gemini"
    fn generator_id(&self) -> &str;

    /// Generate a reply for `prompt`. Single attempt, no streaming.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Generator used when no API key is configured; every call fails with
/// [`GenerationError::NotConfigured`].
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredGenerator;

#[async_trait]
impl TextGenerator for UnconfiguredGenerator {
    fn generator_id(&self) -> &str {
        "unconfigured"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::NotConfigured(
            "no API key found; set GOOGLE_API_KEY or GEMINI_API_KEY".to_string(),
        ))
    }
}
