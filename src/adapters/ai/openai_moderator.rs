//! OpenAI moderation endpoint as a ContentModerator.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::openai_provider::{check_status, OpenAIConfig};
use crate::ports::{AIError, ContentModerator};

/// Calls `POST {base_url}/moderations` once per check.
pub struct OpenAIModerator {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIModerator {
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
        let client = config.http_client()?;
        Ok(Self { config, client })
    }

    fn moderations_url(&self) -> String {
        format!("{}/moderations", self.config.base_url)
    }
}

#[async_trait]
impl ContentModerator for OpenAIModerator {
    async fn is_flagged(&self, text: &str) -> Result<bool, AIError> {
        let request = ModerationRequest {
            input: text,
            model: self.config.moderation_model.as_deref(),
        };

        let response = self
            .client
            .post(self.moderations_url())
            .bearer_auth(self.config.api_key())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.config.map_send_error(e))?;

        let body: ModerationResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse moderation response: {}", e)))?;

        let flagged = body
            .results
            .first()
            .map(|result| result.flagged)
            .ok_or_else(|| AIError::parse("No results in moderation response"))?;
        debug!(flagged, "Moderation verdict");
        Ok(flagged)
    }
}

#[derive(Debug, Serialize)]
struct ModerationRequest<'a> {
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ModerationResponse {
    results: Vec<ModerationResult>,
}

#[derive(Debug, Deserialize)]
struct ModerationResult {
    flagged: bool,
}
