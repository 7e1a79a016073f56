//! `config` command: print the effective configuration.

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

const REDACTED: &str = "[REDACTED]";

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    #[serde(flatten)]
    pub config: Config,
    /// Whether a key was found in config or the environment
    pub api_key_present: bool,
}

impl ConfigOutput {
    /// Copy of `config` safe to print: the API key is never shown.
    pub fn redacted(config: &Config) -> Self {
        let api_key_present = config.generator.resolve_api_key().is_some();
        let mut config = config.clone();
        if config.generator.api_key.is_some() {
            config.generator.api_key = Some(REDACTED.to_string());
        }
        Self {
            config,
            api_key_present,
        }
    }
}

impl CommandOutput for ConfigOutput {
    fn to_human(&self) -> String {
        serde_yaml::to_string(self).unwrap_or_default()
    }
}

pub fn execute(config: &Config, json_mode: bool) -> Result<()> {
    output(&ConfigOutput::redacted(config), json_mode);
    Ok(())
}
