//! Model client configuration.
//!
//! Read once at startup and passed by reference to whatever needs it. Nothing
//! in the workspace reads credentials from the environment after this point.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use listingforge_ai::SamplingParams;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const MODEL_VAR: &str = "OPENAI_MODEL";
pub const TEMPERATURE_VAR: &str = "LISTINGFORGE_TEMPERATURE";
pub const MAX_TOKENS_VAR: &str = "LISTINGFORGE_MAX_TOKENS";
pub const TIMEOUT_VAR: &str = "LISTINGFORGE_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set (add it to the environment or to a .env file)")]
    MissingApiKey,

    #[error("invalid value for {var} ({value:?}): {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            var,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Secret API credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Everything the HTTP model client needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub api_key: ApiKey,
    pub base_url: String,
    pub model: String,
    pub sampling: SamplingParams,
    pub timeout: Duration,
}

impl ModelConfig {
    /// Config with defaults for everything but the key.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            sampling: SamplingParams::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_VAR).ok_or(ConfigError::MissingApiKey)?;
        let mut config = Self::new(ApiKey::new(api_key.trim()));

        if let Some(base_url) = get(BASE_URL_VAR) {
            config.base_url = base_url.trim().trim_end_matches('/').to_string();
        }
        if let Some(model) = get(MODEL_VAR) {
            config.model = model.trim().to_string();
        }
        if let Some(raw) = get(TEMPERATURE_VAR) {
            let temperature: f32 = parse_var(TEMPERATURE_VAR, &raw)?;
            config.sampling = config
                .sampling
                .with_temperature(temperature)
                .map_err(|reason| ConfigError::invalid(TEMPERATURE_VAR, &raw, reason))?;
        }
        if let Some(raw) = get(MAX_TOKENS_VAR) {
            let max_tokens: u32 = parse_var(MAX_TOKENS_VAR, &raw)?;
            config.sampling = config
                .sampling
                .with_max_tokens(max_tokens)
                .map_err(|reason| ConfigError::invalid(MAX_TOKENS_VAR, &raw, reason))?;
        }
        if let Some(raw) = get(TIMEOUT_VAR) {
            let secs: u64 = parse_var(TIMEOUT_VAR, &raw)?;
            if secs == 0 {
                return Err(ConfigError::invalid(TIMEOUT_VAR, raw, "must be greater than 0"));
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    /// Full URL of the chat completions endpoint.
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: core::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid(var, raw, e.to_string()))
}

/// Load a `.env` file from the current directory or the nearest ancestor
/// that has one. Variables already set in the environment win.
///
/// Returns the file that was loaded, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}
