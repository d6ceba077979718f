//! Profile Confirmation - independent check of an extracted profile.
//!
//! A candidate is first checked structurally (all six keys, levels within
//! low/medium/high, budget at or above the minimum). Only candidates that
//! pass are sent to the model, which answers with a JSON verdict. A verdict
//! that does not parse is an error; nothing is guessed.
//!
//! The confirmer talks to the raw provider: it is not wrapped in retries.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::conversation::{prompts, Role};
use crate::domain::foundation::strip_code_fence;
use crate::domain::profile::CandidateProfile;
use crate::ports::{AIError, AIProvider, CompletionRequest};

pub const CONFIRMATION_SEED: u64 = 1234;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmationResult {
    Yes,
    No,
}

/// Yes/No verdict with an optional reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationVerdict {
    pub result: ConfirmationResult,
    pub reason: Option<String>,
}

impl ConfirmationVerdict {
    pub fn yes() -> Self {
        Self {
            result: ConfirmationResult::Yes,
            reason: None,
        }
    }

    pub fn no(reason: impl Into<String>) -> Self {
        Self {
            result: ConfirmationResult::No,
            reason: Some(reason.into()),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.result == ConfirmationResult::Yes
    }

    /// Parses the model's answer, e.g. `{"result": "No", "reason": "Budget missing"}`.
    ///
    /// A surrounding markdown code fence is tolerated. `result` must be
    /// "yes" or "no" in any case.
    pub fn parse(raw: &str) -> Result<Self, ConfirmationError> {
        let body = strip_code_fence(raw);
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ConfirmationError::UnparsableVerdict(format!("{}: {}", e, raw.trim())))?;

        let result = match value.get("result").and_then(Value::as_str).map(str::trim) {
            Some(r) if r.eq_ignore_ascii_case("yes") => ConfirmationResult::Yes,
            Some(r) if r.eq_ignore_ascii_case("no") => ConfirmationResult::No,
            _ => {
                return Err(ConfirmationError::UnparsableVerdict(format!(
                    "no yes/no 'result' in {}",
                    raw.trim()
                )))
            }
        };
        let reason = value
            .get("reason")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        Ok(Self { result, reason })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfirmationError {
    #[error("confirmation call failed: {0}")]
    Upstream(#[from] AIError),

    #[error("confirmation verdict did not parse: {0}")]
    UnparsableVerdict(String),
}

pub struct ProfileConfirmer {
    provider: Arc<dyn AIProvider>,
    min_budget: u64,
    seed: u64,
}

impl ProfileConfirmer {
    pub fn new(provider: Arc<dyn AIProvider>, min_budget: u64) -> Self {
        Self {
            provider,
            min_budget,
            seed: CONFIRMATION_SEED,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn min_budget(&self) -> u64 {
        self.min_budget
    }

    pub async fn confirm(
        &self,
        candidate: &CandidateProfile,
    ) -> Result<ConfirmationVerdict, ConfirmationError> {
        if let Err(problem) = candidate.check(self.min_budget) {
            debug!(%problem, "Candidate profile failed structural check");
            return Ok(ConfirmationVerdict::no(problem.to_string()));
        }

        let request = CompletionRequest::new("confirmation")
            .with_message(Role::System, prompts::confirmation_system_prompt(self.min_budget))
            .with_message(Role::User, prompts::confirmation_input(&candidate.to_json_string()))
            .with_seed(self.seed);

        let response = self.provider.complete(request).await?;
        let text = response.output.into_text("confirmation")?;
        let verdict = ConfirmationVerdict::parse(&text)?;

        info!(result = ?verdict.result, reason = ?verdict.reason, "Profile confirmation verdict");
        Ok(verdict)
    }
}
