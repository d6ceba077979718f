//! Language model configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// OpenAI access and call behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Needed by every command that talks to the model
    pub openai_api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Moderation model; the API default when unset
    pub moderation_model: Option<String>,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Seed for assistant completions
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Seed for the profile confirmation call
    #[serde(default = "default_confirmation_seed")]
    pub confirmation_seed: u64,

    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,

    #[serde(default = "default_retry_min_delay_ms")]
    pub retry_min_delay_ms: u64,

    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_min_delay(&self) -> Duration {
        Duration::from_millis(self.retry_min_delay_ms)
    }

    pub fn retry_max_delay(&self) -> Duration {
        Duration::from_millis(self.retry_max_delay_ms)
    }

    pub fn has_openai(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.trim().is_empty())
    }

    /// The API key, for commands that cannot run without one.
    pub fn require_api_key(&self) -> Result<&str, ValidationError> {
        match &self.openai_api_key {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ValidationError::MissingRequired("LAPTOP_ADVISOR__AI__OPENAI_API_KEY")),
        }
    }

    /// Checks values; the API key is checked by the commands that need it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("ai.timeout_secs must be positive"));
        }
        if self.retry_max_attempts == 0 {
            return Err(ValidationError::InvalidRetryPolicy("at least one attempt is required"));
        }
        if self.retry_min_delay_ms > self.retry_max_delay_ms {
            return Err(ValidationError::InvalidRetryPolicy(
                "minimum delay exceeds maximum delay",
            ));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            moderation_model: None,
            timeout_secs: default_timeout(),
            seed: default_seed(),
            confirmation_seed: default_confirmation_seed(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_min_delay_ms: default_retry_min_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_seed() -> u64 {
    2345
}

fn default_confirmation_seed() -> u64 {
    1234
}

fn default_retry_max_attempts() -> u32 {
    6
}

fn default_retry_min_delay_ms() -> u64 {
    1_000
}

fn default_retry_max_delay_ms() -> u64 {
    20_000
}
