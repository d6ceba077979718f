//! OpenAI Provider - Implementation of AIProvider for OpenAI's chat completions.
//!
//! Sends the declared functions with `function_call: "auto"` when the
//! request allows it and maps `message.function_call` back into a
//! [`FunctionInvocation`]. Transient failures are reported, not retried;
//! wrap the provider in a `RetryingProvider` for that.
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-3.5-turbo")
//!     .with_base_url("https://api.openai.com/v1");
//! let provider = OpenAIProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::domain::conversation::{FunctionDefinition, FunctionInvocation, Role};
use crate::ports::{
    AIError, AIProvider, CompletionOutput, CompletionRequest, CompletionResponse, FinishReason,
    ProviderInfo, TokenUsage,
};

/// Configuration shared by the OpenAI completion and moderation clients.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    api_key: Secret<String>,
    /// Chat model (e.g. "gpt-3.5-turbo").
    pub model: String,
    /// Moderation model; the API default is used when unset.
    pub moderation_model: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-3.5-turbo".to_string(),
            moderation_model: None,
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_moderation_model(mut self, model: impl Into<String>) -> Self {
        self.moderation_model = Some(model.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(super) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    pub(super) fn http_client(&self) -> Result<Client, AIError> {
        Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))
    }

    pub(super) fn map_send_error(&self, e: reqwest::Error) -> AIError {
        if e.is_timeout() {
            AIError::Timeout {
                timeout_secs: self.timeout.as_secs() as u32,
            }
        } else if e.is_connect() {
            AIError::network(format!("Connection failed: {}", e))
        } else {
            AIError::network(e.to_string())
        }
    }
}

/// OpenAI chat-completions client.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
        let client = config.http_client()?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn to_openai_request<'a>(&'a self, request: &'a CompletionRequest) -> OpenAIRequest<'a> {
        let messages = request
            .messages
            .iter()
            .map(|msg| OpenAIMessage {
                role: match msg.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                },
                content: &msg.content,
            })
            .collect();

        let (functions, function_call) = if request.allows_function_calls() {
            (Some(request.functions.as_slice()), Some("auto"))
        } else {
            (None, None)
        };

        OpenAIRequest {
            model: &self.config.model,
            messages,
            functions,
            function_call,
            seed: request.seed,
        }
    }

    fn parse_completion(body: OpenAIResponse) -> Result<CompletionResponse, AIError> {
        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AIError::parse("No choices in response"))?;

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            Some("function_call") => FinishReason::FunctionCall,
            _ => FinishReason::Stop,
        };

        let output = match (choice.message.function_call, choice.message.content) {
            (Some(call), _) => CompletionOutput::FunctionCall(FunctionInvocation::new(
                call.name,
                call.arguments,
            )),
            (None, Some(content)) => CompletionOutput::Text(content),
            (None, None) if finish_reason == FinishReason::ContentFilter => {
                return Err(AIError::content_filtered("completion withheld by provider"));
            }
            (None, None) => return Err(AIError::parse("Response has neither content nor function call")),
        };

        Ok(CompletionResponse {
            output,
            usage: body
                .usage
                .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
                .unwrap_or_default(),
            model: body.model,
            finish_reason,
        })
    }
}

/// Maps a non-success HTTP status to an [`AIError`].
pub(super) async fn check_status(response: Response) -> Result<Response, AIError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(error_for_status(status, &body))
}

fn error_for_status(status: StatusCode, body: &str) -> AIError {
    match status.as_u16() {
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::rate_limited(parse_retry_after(body)),
        400 | 404 | 422 => AIError::InvalidRequest(body.to_string()),
        500..=599 => AIError::unavailable(format!("Server error {}: {}", status, body)),
        _ => AIError::network(format!("Unexpected status {}: {}", status, body)),
    }
}

/// Reads "try again in Ns" out of a rate-limit error body; 20s otherwise.
fn parse_retry_after(body: &str) -> u32 {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .and_then(|message| {
            let rest = &message[message.find("try again in ")? + "try again in ".len()..];
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        })
        .unwrap_or(20)
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        debug!(
            purpose = request.purpose,
            messages = request.messages.len(),
            functions = request.functions.len(),
            "Sending chat completion"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(&self.to_openai_request(&request))
            .send()
            .await
            .map_err(|e| self.config.map_send_error(e))?;

        let body: OpenAIResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        Self::parse_completion(body)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai", &self.config.model).with_functions(true)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    functions: Option<&'a [FunctionDefinition]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    model: String,
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
    function_call: Option<OpenAIFunctionCall>,
}

#[derive(Debug, Deserialize)]
struct OpenAIFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
