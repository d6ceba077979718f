//! Conversation rules configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationConfig {
    /// Smallest budget (INR) a profile may carry
    #[serde(default = "default_min_budget")]
    pub min_budget: u64,

    /// Minutes a session may sit idle before it is dropped
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: u64,

    /// Most sessions held in memory at once
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

impl ConversationConfig {
    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_minutes * 60)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min_budget == 0 {
            return Err(ValidationError::InvalidMinimumBudget);
        }
        if self.session_idle_minutes == 0 {
            return Err(ValidationError::InvalidSessionLimit("session_idle_minutes must be positive"));
        }
        if self.max_sessions == 0 {
            return Err(ValidationError::InvalidSessionLimit("max_sessions must be positive"));
        }
        Ok(())
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            min_budget: default_min_budget(),
            session_idle_minutes: default_session_idle_minutes(),
            max_sessions: default_max_sessions(),
        }
    }
}

fn default_min_budget() -> u64 {
    crate::domain::profile::DEFAULT_MIN_BUDGET
}

fn default_session_idle_minutes() -> u64 {
    30
}

fn default_max_sessions() -> usize {
    10_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConversationConfig::default();
        assert_eq!(config.min_budget, 25_000);
        assert_eq!(config.session_idle_timeout(), Duration::from_secs(30 * 60));
        assert_eq!(config.max_sessions, 10_000);
    }

    #[test]
    fn test_zero_min_budget_is_rejected() {
        let config = ConversationConfig {
            min_budget: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidMinimumBudget));
    }

    #[test]
    fn test_zero_session_limits_are_rejected() {
        let idle = ConversationConfig {
            session_idle_minutes: 0,
            ..Default::default()
        };
        let capped = ConversationConfig {
            max_sessions: 0,
            ..Default::default()
        };
        assert!(matches!(idle.validate(), Err(ValidationError::InvalidSessionLimit(_))));
        assert!(matches!(capped.validate(), Err(ValidationError::InvalidSessionLimit(_))));
    }
}
