//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid timeout: {0}")]
    InvalidTimeout(&'static str),

    #[error("Invalid retry policy: {0}")]
    InvalidRetryPolicy(&'static str),

    #[error("Minimum budget must be positive")]
    InvalidMinimumBudget,

    #[error("Invalid session limit: {0}")]
    InvalidSessionLimit(&'static str),

    #[error("Catalogue column name for '{0}' is empty")]
    EmptyColumnName(&'static str),

    #[error("Invalid bind address '{0}'")]
    InvalidSocketAddr(String),
}
