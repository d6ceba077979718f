//! Retrying decorator for completion providers.
//!
//! Retries transient failures with randomized exponential backoff. Only
//! completion calls are wrapped; moderation and profile confirmation talk
//! to their providers directly.

use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// Backoff bounds and attempt budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            min_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(20),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            min_delay,
            max_delay,
        }
    }

    /// Ceiling of the wait after the `failed_attempt`-th failure:
    /// `min_delay * 2^(n-1)`, capped at `max_delay`.
    pub fn ceiling(&self, failed_attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(failed_attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.min_delay
            .saturating_mul(factor)
            .clamp(self.min_delay, self.max_delay.max(self.min_delay))
    }

    /// Random wait in `[min_delay, ceiling]`.
    pub fn delay_for(&self, failed_attempt: u32) -> Duration {
        let ceiling = self.ceiling(failed_attempt);
        if ceiling <= self.min_delay {
            return self.min_delay;
        }
        rand::thread_rng().gen_range(self.min_delay..=ceiling)
    }
}

/// Wraps an [`AIProvider`] and retries retryable errors.
///
/// Callers see the same contract as the inner provider; only latency and
/// the final error after exhaustion differ.
pub struct RetryingProvider {
    inner: Arc<dyn AIProvider>,
    policy: RetryPolicy,
}

impl RetryingProvider {
    pub fn new(inner: Arc<dyn AIProvider>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl AIProvider for RetryingProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.inner.complete(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(err) if !err.is_retryable() || attempt >= max_attempts => return Err(err),
                Err(err) => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        purpose = request.purpose,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Completion failed, retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.inner.provider_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(1), Duration::from_millis(4))
    }

    mod policy {
        use super::*;

        #[test]
        fn defaults_are_six_attempts_between_one_and_twenty_seconds() {
            let policy = RetryPolicy::default();
            assert_eq!(policy.max_attempts, 6);
            assert_eq!(policy.min_delay, Duration::from_secs(1));
            assert_eq!(policy.max_delay, Duration::from_secs(20));
        }

        #[test]
        fn ceiling_doubles_then_caps() {
            let policy = RetryPolicy::default();
            let ceilings: Vec<u64> = (1..=7).map(|n| policy.ceiling(n).as_secs()).collect();
            assert_eq!(ceilings, vec![1, 2, 4, 8, 16, 20, 20]);
        }

        #[test]
        fn delay_stays_within_bounds() {
            let policy = RetryPolicy::default();
            for attempt in 1..=10 {
                let delay = policy.delay_for(attempt);
                assert!(delay >= policy.min_delay);
                assert!(delay <= policy.max_delay);
            }
        }

        #[test]
        fn huge_attempt_numbers_do_not_overflow() {
            assert_eq!(RetryPolicy::default().ceiling(200), Duration::from_secs(20));
        }
    }

    mod retrying {
        use super::*;

        #[tokio::test]
        async fn recovers_after_transient_failures() {
            let mock = MockAIProvider::new()
                .with_error(AIError::rate_limited(1))
                .with_error(AIError::network("reset"))
                .with_response("finally");
            let provider = RetryingProvider::new(Arc::new(mock.clone()), fast_policy(6));

            let response = provider.complete(CompletionRequest::new("test")).await.unwrap();
            assert_eq!(response.output.text(), Some("finally"));
            assert_eq!(mock.call_count(), 3);
        }

        #[tokio::test]
        async fn gives_up_after_max_attempts() {
            let mut mock = MockAIProvider::new();
            for _ in 0..10 {
                mock = mock.with_error(AIError::unavailable("down"));
            }
            let provider = RetryingProvider::new(Arc::new(mock.clone()), fast_policy(6));

            let err = provider.complete(CompletionRequest::new("test")).await.unwrap_err();
            assert!(matches!(err, AIError::Unavailable { .. }));
            assert_eq!(mock.call_count(), 6);
        }

        #[tokio::test]
        async fn does_not_retry_permanent_errors() {
            let mock = MockAIProvider::new()
                .with_error(AIError::AuthenticationFailed)
                .with_response("never reached");
            let provider = RetryingProvider::new(Arc::new(mock.clone()), fast_policy(6));

            let err = provider.complete(CompletionRequest::new("test")).await.unwrap_err();
            assert_eq!(err, AIError::AuthenticationFailed);
            assert_eq!(mock.call_count(), 1);
        }

        #[tokio::test]
        async fn passes_the_request_through_unchanged() {
            let mock = MockAIProvider::new().with_response("ok");
            let provider = RetryingProvider::new(Arc::new(mock.clone()), fast_policy(2));
            let request = CompletionRequest::new("welcome").with_seed(2345);

            provider.complete(request).await.unwrap();
            let calls = mock.get_calls();
            assert_eq!(calls[0].purpose, "welcome");
            assert_eq!(calls[0].seed, Some(2345));
        }
    }
}
