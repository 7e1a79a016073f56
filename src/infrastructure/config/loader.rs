use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project-local configuration directory
pub const CONFIG_DIR: &str = ".jenkins-triage";

/// Prefix for environment overrides, e.g. `JENKINS_TRIAGE_GENERATOR__MODEL`
pub const ENV_PREFIX: &str = "JENKINS_TRIAGE_";

/// Configuration error types
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid rate limit: {0}. Must be positive")]
    InvalidRateLimit(f64),

    #[error("Invalid burst_size: {0}. Must be at least 1")]
    InvalidBurstSize(u32),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error("Generator model cannot be empty")]
    EmptyModel,

    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("Invalid max_section_chars: {0}. Must be at least 1")]
    InvalidSectionBudget(usize),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .jenkins-triage/config.yaml
    /// 3. .jenkins-triage/local.yaml (optional local overrides)
    /// 4. Environment variables (`JENKINS_TRIAGE_*`, `__` separates sections)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(Path::new(CONFIG_DIR).join("config.yaml")))
            .merge(Yaml::file(Path::new(CONFIG_DIR).join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file over the defaults
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let rate = config.rate_limit.requests_per_second;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ConfigError::InvalidRateLimit(rate));
        }

        if config.rate_limit.burst_size == 0 {
            return Err(ConfigError::InvalidBurstSize(config.rate_limit.burst_size));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(
                config.logging.rotation.clone(),
            ));
        }

        if config.generator.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }

        if config.generator.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.generator.timeout_secs));
        }

        if config.analysis.max_section_chars == 0 {
            return Err(ConfigError::InvalidSectionBudget(
                config.analysis.max_section_chars,
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::config::{LoggingConfig, RateLimitConfig, ThrottleStrategy};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.generator.model, "gemini-2.0-flash");
        assert_eq!(config.generator.timeout_secs, 60);
        assert_eq!(config.rate_limit.strategy, ThrottleStrategy::TokenBucket);
        assert!((config.rate_limit.requests_per_second - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
generator:
  model: gemini-1.5-pro
  timeout_secs: 30
  temperature: 0.2
rate_limit:
  strategy: fixed_delay
  min_delay_ms: 250
analysis:
  max_section_chars: 1000
logging:
  level: debug
  format: json
  rotation: hourly
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.generator.model, "gemini-1.5-pro");
        assert_eq!(config.generator.timeout_secs, 30);
        assert_eq!(config.generator.temperature, Some(0.2));
        assert_eq!(config.rate_limit.strategy, ThrottleStrategy::FixedDelay);
        assert_eq!(config.rate_limit.min_delay_ms, 250);
        assert_eq!(config.rate_limit.burst_size, 1);
        assert_eq!(config.analysis.max_section_chars, 1000);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.rotation, "hourly");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let config = Config {
            logging: LoggingConfig {
                level: "verbose".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogLevel("verbose".to_string()))
        );
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let config = Config {
            logging: LoggingConfig {
                format: "xml".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogFormat(_))
        ));
    }

    #[test]
    fn test_validate_rate_limit() {
        for rate in [0.0, -1.0, f64::NAN] {
            let config = Config {
                rate_limit: RateLimitConfig {
                    requests_per_second: rate,
                    ..Default::default()
                },
                ..Default::default()
            };
            assert!(matches!(
                ConfigLoader::validate(&config),
                Err(ConfigError::InvalidRateLimit(_))
            ));
        }

        let config = Config {
            rate_limit: RateLimitConfig {
                burst_size: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidBurstSize(0))
        );
    }

    #[test]
    fn test_validate_generator() {
        let mut config = Config::default();
        config.generator.model = "  ".to_string();
        assert_eq!(ConfigLoader::validate(&config), Err(ConfigError::EmptyModel));

        let mut config = Config::default();
        config.generator.timeout_secs = 0;
        assert_eq!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTimeout(0))
        );
    }

    #[test]
    fn test_env_override() {
        let config = temp_env::with_vars(
            [
                ("JENKINS_TRIAGE_GENERATOR__MODEL", Some("gemini-1.5-flash")),
                ("JENKINS_TRIAGE_RATE_LIMIT__BURST_SIZE", Some("4")),
                ("JENKINS_TRIAGE_LOGGING__LEVEL", Some("debug")),
            ],
            ConfigLoader::load,
        )
        .unwrap();

        assert_eq!(config.generator.model, "gemini-1.5-flash");
        assert_eq!(config.rate_limit.burst_size, 4);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "rate_limit:\n  strategy: none\nlogging:\n  format: json").unwrap();
        file.flush().unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.rate_limit.strategy, ThrottleStrategy::None);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");

        assert!(ConfigLoader::load_from_file("/nonexistent/config.yaml").is_err());
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "rate_limit:\n  requests_per_second: 0.0").unwrap();
        file.flush().unwrap();

        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid rate limit"));
    }

    #[test]
    fn test_hierarchical_merging() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut base_file = NamedTempFile::new().unwrap();
        writeln!(
            base_file,
            "generator:\n  model: gemini-1.5-pro\nlogging:\n  level: info\n  format: json"
        )
        .unwrap();
        base_file.flush().unwrap();

        let mut override_file = NamedTempFile::new().unwrap();
        writeln!(override_file, "logging:\n  level: debug").unwrap();
        override_file.flush().unwrap();

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.generator.model, "gemini-1.5-pro");
        assert_eq!(
            config.logging.level, "debug",
            "Override should win for nested fields"
        );
        assert_eq!(
            config.logging.format, "json",
            "Base value should persist when not overridden"
        );
    }
}
