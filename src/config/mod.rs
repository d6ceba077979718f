//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `LAPTOP_ADVISOR`
//! prefix and `__` between nesting levels.
//!
//! # Example
//!
//! ```no_run
//! use laptop_advisor::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod catalogue;
mod conversation;
mod error;
mod server;

pub use ai::AiConfig;
pub use catalogue::CatalogueConfig;
pub use conversation::ConversationConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment loads. The OpenAI
/// key is only demanded by the commands that call the model.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub catalogue: CatalogueConfig,

    #[serde(default)]
    pub conversation: ConversationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads `LAPTOP_ADVISOR__*` variables:
    ///
    /// - `LAPTOP_ADVISOR__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `LAPTOP_ADVISOR__AI__OPENAI_API_KEY=...` -> `ai.openai_api_key = ...`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LAPTOP_ADVISOR")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.catalogue.validate()?;
        self.conversation.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
