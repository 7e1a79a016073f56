use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::errors::GeminiApiError;
use super::types::{GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::domain::models::GeneratorConfig;
use crate::domain::ports::{GenerationError, TextGenerator, UnconfiguredGenerator};

/// Configuration for the Gemini HTTP client
#[derive(Debug, Clone)]
pub struct GeminiClientConfig {
    /// Google API key
    pub api_key: String,

    /// Base URL for the Generative Language API
    pub base_url: String,

    /// Model name, e.g. "gemini-2.0-flash"
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    pub temperature: Option<f32>,

    pub max_output_tokens: Option<u32>,
}

impl GeminiClientConfig {
    /// Client settings from the generator section, with the resolved key.
    pub fn from_generator_config(config: &GeneratorConfig, api_key: String) -> Self {
        Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

/// HTTP client for the Gemini `generateContent` endpoint.
///
/// One attempt per call. Retries and throttling belong to the caller.
pub struct GeminiClient {
    http_client: ReqwestClient,
    config: GeminiClientConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiClientConfig) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(4)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    async fn send_request(&self, prompt: &str) -> Result<String, GeminiApiError> {
        let request = GenerateContentRequest::from_prompt(
            prompt,
            GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(GeminiApiError::from_status(status, body));
        }

        let body: GenerateContentResponse = response.json().await?;
        body.text().ok_or_else(|| {
            let reason = body
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
                .map_or_else(
                    || "no candidate text".to_string(),
                    |reason| format!("prompt blocked: {reason}"),
                );
            GeminiApiError::EmptyResponse(reason)
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn generator_id(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, prompt), fields(model = %self.config.model, prompt_chars = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        match self.send_request(prompt).await {
            Ok(text) => {
                debug!(reply_chars = text.len(), "gemini reply received");
                Ok(text)
            }
            Err(GeminiApiError::NetworkError(ref err)) if err.is_timeout() => {
                warn!(timeout_secs = self.config.timeout_secs, "gemini request timed out");
                Err(GenerationError::Timeout(self.config.timeout_secs))
            }
            Err(err) => {
                let transient = err.is_transient();
                let err = GenerationError::from(err);
                warn!(error = %err, transient, "gemini request failed");
                Err(err)
            }
        }
    }
}

/// Build the production generator: Gemini when an API key resolves,
/// otherwise a generator whose every call fails with `NotConfigured`.
pub fn build_generator(config: &GeneratorConfig) -> Result<Arc<dyn TextGenerator>> {
    match config.resolve_api_key() {
        Some(api_key) => {
            let client =
                GeminiClient::new(GeminiClientConfig::from_generator_config(config, api_key))?;
            Ok(Arc::new(client))
        }
        None => {
            warn!("no API key configured; analyses will use fallback output");
            Ok(Arc::new(UnconfiguredGenerator))
        }
    }
}
