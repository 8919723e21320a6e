//! Process-wide settings, built once at start-up and passed by reference.
//!
//! Values come from the environment (a `.env` file is loaded by the binaries
//! through `dotenvy` before calling [`Settings::load`]). Keys are matched
//! case-insensitively, e.g. `OPENAI_API_KEY` -> `openai_api_key`.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::llm::RetryPolicy;

#[derive(Clone, Deserialize)]
pub struct Settings {
    // OpenAI
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_max_tokens: u32,
    pub openai_temperature: f32,
    pub openai_base_url: String,
    pub openai_timeout_secs: u64,

    // Retry
    pub retry_attempts: u32,
    /// Base backoff delay in seconds
    pub retry_delay: u64,

    /// Outbound connection pool size per host
    pub http_pool_max_idle_per_host: usize,

    /// Minimum candle count before indicators are computed
    pub min_candles: usize,

    // Server
    pub server_host: String,
    pub server_port: u16,
    pub allowed_origins: String,

    pub log_level: String,
}

impl Settings {
    /// Load settings from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(Environment::default())
    }

    /// Load settings from an explicit key/value map instead of the process environment
    pub fn from_map(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::build(Environment::default().source(Some(vars)))
    }

    fn build(env: Environment) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .set_default("openai_model", "gpt-4o-mini")?
            .set_default("openai_max_tokens", 2000_i64)?
            .set_default("openai_temperature", 0.7_f64)?
            .set_default("openai_base_url", "https://api.openai.com/v1")?
            .set_default("openai_timeout_secs", 30_i64)?
            .set_default("retry_attempts", 3_i64)?
            .set_default("retry_delay", 1_i64)?
            .set_default("http_pool_max_idle_per_host", 32_i64)?
            .set_default("min_candles", 20_i64)?
            .set_default("server_host", "0.0.0.0")?
            .set_default("server_port", 8000_i64)?
            .set_default("allowed_origins", "*")?
            .set_default("log_level", "info")?
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.openai_api_key.trim().is_empty() {
            return Err(ConfigError::Message("OPENAI_API_KEY must not be empty".into()));
        }
        if self.retry_attempts == 0 {
            return Err(ConfigError::Message("RETRY_ATTEMPTS must be at least 1".into()));
        }
        if !(0.0..=2.0).contains(&self.openai_temperature) {
            return Err(ConfigError::Message(format!(
                "OPENAI_TEMPERATURE must be within [0, 2], got {}",
                self.openai_temperature
            )));
        }
        if self.min_candles == 0 {
            return Err(ConfigError::Message("MIN_CANDLES must be at least 1".into()));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_attempts, Duration::from_secs(self.retry_delay))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.openai_timeout_secs)
    }

    pub fn allowed_origins_list(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("openai_api_key", &"<redacted>")
            .field("openai_model", &self.openai_model)
            .field("openai_max_tokens", &self.openai_max_tokens)
            .field("openai_temperature", &self.openai_temperature)
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_timeout_secs", &self.openai_timeout_secs)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_delay", &self.retry_delay)
            .field("http_pool_max_idle_per_host", &self.http_pool_max_idle_per_host)
            .field("min_candles", &self.min_candles)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("allowed_origins", &self.allowed_origins)
            .field("log_level", &self.log_level)
            .finish()
    }
}
