//! Mock AI Provider for testing.
//!
//! Scripted replies are consumed in order; once the script runs out the
//! mock answers with a fixed text. Every request is recorded so tests can
//! assert on what was sent.
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_response("Hello! What will you use the laptop for?")
//!     .with_function_call("get_user_info", r#"{"Budget": 60000}"#)
//!     .with_error(AIError::rate_limited(1));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::conversation::FunctionInvocation;
use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// Reply used once the script is exhausted.
pub const DEFAULT_MOCK_REPLY: &str = "Mock response";

#[derive(Debug, Clone)]
enum MockReply {
    Completion(CompletionResponse),
    Error(AIError),
}

/// Scripted AIProvider.
#[derive(Debug, Clone, Default)]
pub struct MockAIProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a text reply.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push(MockReply::Completion(CompletionResponse::text(content)))
    }

    /// Queues a function-call reply.
    pub fn with_function_call(self, name: &str, arguments: &str) -> Self {
        self.push(MockReply::Completion(CompletionResponse::function_call(
            FunctionInvocation::new(name, arguments),
        )))
    }

    pub fn with_error(self, error: AIError) -> Self {
        self.push(MockReply::Error(error))
    }

    pub fn call_count(&self) -> usize {
        locked(&self.calls).len()
    }

    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        locked(&self.calls).clone()
    }

    /// Requests recorded with the given purpose tag.
    pub fn calls_for(&self, purpose: &str) -> Vec<CompletionRequest> {
        locked(&self.calls)
            .iter()
            .filter(|call| call.purpose == purpose)
            .cloned()
            .collect()
    }

    /// Scripted replies not yet consumed.
    pub fn remaining(&self) -> usize {
        locked(&self.replies).len()
    }

    fn push(self, reply: MockReply) -> Self {
        locked(&self.replies).push_back(reply);
        self
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        locked(&self.calls).push(request);
        let next = locked(&self.replies).pop_front();
        match next {
            Some(MockReply::Completion(response)) => Ok(response),
            Some(MockReply::Error(err)) => Err(err),
            None => Ok(CompletionResponse::text(DEFAULT_MOCK_REPLY)),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", "mock-model").with_functions(true)
    }
}
