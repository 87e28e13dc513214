//! Runtime configuration loaded from the environment (and `.env`).

use crate::models::Provider;
use crate::{Error, Result};
use std::time::Duration;

pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20241022";
/// Most current model first.
pub const DEFAULT_GEMINI_MODELS: [&str; 3] = [
    "gemini-2.5-flash",
    "gemini-2.5-flash-latest",
    "gemini-1.5-pro-latest",
];
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: Provider,
    pub anthropic_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub anthropic_model: String,
    pub gemini_models: Vec<String>,
    pub anthropic_base_url: String,
    pub gemini_base_url: String,
    pub request_timeout: Duration,
}

impl Config {
    /// Load `.env` if there is one, then read the process environment.
    pub fn from_env() -> Result<Self> {
        env_file_loaded(dotenvy::dotenv())?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let provider = match var("AGRISCAN_PROVIDER") {
            Some(value) => value.parse().map_err(Error::Config)?,
            None => Provider::Gemini,
        };

        let gemini_models = match var("GEMINI_MODELS") {
            Some(list) => parse_model_list(&list),
            None => DEFAULT_GEMINI_MODELS.iter().map(|m| m.to_string()).collect(),
        };
        if gemini_models.is_empty() {
            return Err(Error::Config(
                "GEMINI_MODELS must list at least one model".to_string(),
            ));
        }

        let request_timeout = match var("AGRISCAN_TIMEOUT_SECS") {
            Some(value) => {
                let secs: u64 = value.trim().parse().map_err(|_| {
                    Error::Config(format!(
                        "AGRISCAN_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                        value
                    ))
                })?;
                if secs == 0 {
                    return Err(Error::Config(
                        "AGRISCAN_TIMEOUT_SECS must be greater than zero".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            provider,
            anthropic_api_key: var("ANTHROPIC_API_KEY"),
            gemini_api_key: var("GEMINI_API_KEY"),
            anthropic_model: var("ANTHROPIC_MODEL")
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
            gemini_models,
            anthropic_base_url: var("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_BASE_URL.to_string()),
            gemini_base_url: var("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            request_timeout,
        })
    }

    /// Switch vendors, e.g. from a CLI flag.
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    /// API key for the selected provider, if one is configured.
    pub fn credential(&self) -> Option<&str> {
        match self.provider {
            Provider::Anthropic => self.anthropic_api_key.as_deref(),
            Provider::Gemini => self.gemini_api_key.as_deref(),
        }
    }
}

/// A missing `.env` is fine; an unreadable or malformed one is not.
fn env_file_loaded<T>(result: std::result::Result<T, dotenvy::Error>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn parse_model_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|model| !model.is_empty())
        .map(|model| model.strip_prefix("models/").unwrap_or(model).to_string())
        .collect()
}
