use serde::{Deserialize, Serialize};

/// Main configuration structure for jenkins-triage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Text generation service configuration
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Prompt construction configuration
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Gemini text generation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GeneratorConfig {
    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL for the API (for testing/proxies)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key (can also be set via `GOOGLE_API_KEY` or `GEMINI_API_KEY`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    60
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            temperature: None,
            max_output_tokens: None,
        }
    }
}

impl GeneratorConfig {
    /// API key from config, then `GOOGLE_API_KEY`, then `GEMINI_API_KEY`.
    /// Blank values are skipped so the next source is still consulted.
    pub fn resolve_api_key(&self) -> Option<String> {
        let non_blank = |key: &String| !key.trim().is_empty();

        self.api_key
            .clone()
            .filter(non_blank)
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok().filter(non_blank))
            .or_else(|| std::env::var("GEMINI_API_KEY").ok().filter(non_blank))
    }
}

/// How calls to the text generation service are throttled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrottleStrategy {
    /// Shared token bucket
    TokenBucket,
    /// Fixed sleep after every call
    FixedDelay,
    /// No throttling
    None,
}

/// Rate limiting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RateLimitConfig {
    #[serde(default = "default_strategy")]
    pub strategy: ThrottleStrategy,

    /// Requests per second allowed (token bucket refill rate)
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: f64,

    /// Burst size for token bucket
    #[serde(default = "default_burst_size")]
    pub burst_size: u32,

    /// Delay after each call for the fixed-delay strategy
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
}

const fn default_strategy() -> ThrottleStrategy {
    ThrottleStrategy::TokenBucket
}

const fn default_requests_per_second() -> f64 {
    1.0
}

const fn default_burst_size() -> u32 {
    1
}

const fn default_min_delay_ms() -> u64 {
    1000
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            requests_per_second: default_requests_per_second(),
            burst_size: default_burst_size(),
            min_delay_ms: default_min_delay_ms(),
        }
    }
}

/// Prompt construction configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AnalysisConfig {
    /// Character budget for each merged prompt section (messages, traces)
    #[serde(default = "default_max_section_chars")]
    pub max_section_chars: usize,
}

const fn default_max_section_chars() -> usize {
    60_000
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_section_chars: default_max_section_chars(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files (stderr only when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,

    /// Rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
