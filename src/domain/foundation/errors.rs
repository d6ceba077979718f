//! Error types for the domain layer.

use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be at least {min}, got {actual}")]
    BelowMinimum { field: String, min: i64, actual: i64 },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    pub fn below_minimum(field: impl Into<String>, min: i64, actual: i64) -> Self {
        ValidationError::BelowMinimum {
            field: field.into(),
            min,
            actual,
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the field the error refers to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::BelowMinimum { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Machine-readable error codes surfaced to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationFailed,
    SessionNotFound,
    InvalidStateTransition,
    MalformedModelOutput,
    AIProviderError,
    RateLimited,
    CatalogueError,
    RestartRequired,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::SessionNotFound => "SESSION_NOT_FOUND",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::MalformedModelOutput => "MALFORMED_MODEL_OUTPUT",
            ErrorCode::AIProviderError => "AI_PROVIDER_ERROR",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::CatalogueError => "CATALOGUE_ERROR",
            ErrorCode::RestartRequired => "RESTART_REQUIRED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_minimum_displays_threshold_and_value() {
        let err = ValidationError::below_minimum("Budget", 25000, 20000);
        assert_eq!(
            format!("{}", err),
            "Field 'Budget' must be at least 25000, got 20000"
        );
    }

    #[test]
    fn invalid_format_displays_reason() {
        let err = ValidationError::invalid_format("Portability", "expected low, medium or high");
        assert_eq!(
            format!("{}", err),
            "Field 'Portability' has invalid format: expected low, medium or high"
        );
    }

    #[test]
    fn field_accessor_covers_every_variant() {
        assert_eq!(ValidationError::empty_field("Budget").field(), "Budget");
        assert_eq!(ValidationError::below_minimum("Budget", 1, 0).field(), "Budget");
        assert_eq!(ValidationError::invalid_format("Multitasking", "x").field(), "Multitasking");
    }

    #[test]
    fn error_code_display_is_screaming_snake_case() {
        assert_eq!(ErrorCode::SessionNotFound.to_string(), "SESSION_NOT_FOUND");
        assert_eq!(ErrorCode::RestartRequired.to_string(), "RESTART_REQUIRED");
    }
}
