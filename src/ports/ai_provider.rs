//! AI Provider Port - Interface for chat-completion models.
//!
//! The advisor talks to a language model in three ways: elicitation turns
//! with two declared functions, plain text turns (welcome, recommendation,
//! discussion, feature grading), and the profile confirmation check. All
//! of them go through [`AIProvider::complete`].
//!
//! # Example
//!
//! ```ignore
//! let request = CompletionRequest::from_transcript(ctx.primary())
//!     .with_functions(declared_functions())
//!     .with_seed(2345);
//! match provider.complete(request).await?.output {
//!     CompletionOutput::Text(reply) => { /* keep eliciting */ }
//!     CompletionOutput::FunctionCall(invocation) => { /* candidate profile */ }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::conversation::{FunctionDefinition, FunctionInvocation, Role, Transcript};

/// Port for language-model completions.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Generate a single, non-streaming completion.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    /// Provider name, model and capabilities.
    fn provider_info(&self) -> ProviderInfo;
}

/// Whether the model may answer with a function call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionCallMode {
    /// The model decides.
    #[default]
    Auto,
    /// Text only, even if functions are declared.
    None,
}

/// Request for a completion.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    /// Functions the model may call. Empty disables function calling.
    pub functions: Vec<FunctionDefinition>,
    pub function_call: FunctionCallMode,
    /// Sampling seed for reproducible answers.
    pub seed: Option<u64>,
    /// Short tag describing the call, used in logs.
    pub purpose: &'static str,
}

impl CompletionRequest {
    pub fn new(purpose: &'static str) -> Self {
        Self {
            purpose,
            ..Default::default()
        }
    }

    /// Request carrying every turn of `transcript`.
    pub fn from_transcript(purpose: &'static str, transcript: &Transcript) -> Self {
        transcript
            .turns()
            .iter()
            .fold(Self::new(purpose), |request, turn| {
                request.with_message(turn.role, turn.content.render())
            })
    }

    pub fn with_message(mut self, role: Role, content: impl Into<String>) -> Self {
        self.messages.push(Message::new(role, content));
        self
    }

    pub fn with_functions(mut self, functions: &[FunctionDefinition]) -> Self {
        self.functions = functions.to_vec();
        self.function_call = FunctionCallMode::Auto;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// True when the model is allowed to call one of the declared functions.
    pub fn allows_function_calls(&self) -> bool {
        !self.functions.is_empty() && self.function_call == FunctionCallMode::Auto
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// What the model produced: text, or a call to a declared function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutput {
    Text(String),
    FunctionCall(FunctionInvocation),
}

impl CompletionOutput {
    pub fn text(&self) -> Option<&str> {
        match self {
            CompletionOutput::Text(text) => Some(text),
            CompletionOutput::FunctionCall(_) => None,
        }
    }

    /// Text output, or a parse error naming `purpose` if the model called a
    /// function where only text makes sense.
    pub fn into_text(self, purpose: &str) -> Result<String, AIError> {
        match self {
            CompletionOutput::Text(text) => Ok(text),
            CompletionOutput::FunctionCall(invocation) => Err(AIError::parse(format!(
                "{} expected text but the model called '{}'",
                purpose, invocation.name
            ))),
        }
    }
}

/// Response from a completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub output: CompletionOutput,
    pub usage: TokenUsage,
    /// Model that generated the response.
    pub model: String,
    pub finish_reason: FinishReason,
}

impl CompletionResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            output: CompletionOutput::Text(content.into()),
            usage: TokenUsage::default(),
            model: String::new(),
            finish_reason: FinishReason::Stop,
        }
    }

    pub fn function_call(invocation: FunctionInvocation) -> Self {
        Self {
            output: CompletionOutput::FunctionCall(invocation),
            usage: TokenUsage::default(),
            model: String::new(),
            finish_reason: FinishReason::FunctionCall,
        }
    }
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    FunctionCall,
    ContentFilter,
    Error,
}

/// Provider information and capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    pub model: String,
    pub supports_functions: bool,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            supports_functions: false,
        }
    }

    pub fn with_functions(mut self, supports: bool) -> Self {
        self.supports_functions = supports;
        self
    }
}

/// AI provider errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AIError {
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error("content filtered: {reason}")]
    ContentFiltered { reason: String },

    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl AIError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable { .. }
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}
