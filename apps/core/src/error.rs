use crate::engine::EngineError;
use std::io;
use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors originating from the history database.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The text engine rejected its input.
    #[error("{0}")]
    Engine(#[from] EngineError),

    /// The language-model API failed or answered with an error status.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Actor communication failures (closed channels, dropped responders).
    #[error("Actor error: {0}")]
    Actor(String),

    /// Data validation errors (e.g., invalid input format).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration-related errors (e.g., missing or malformed environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// A user exceeded the request rate limit.
    #[error("Rate limit exceeded")]
    RateLimited,
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("Operation timed out: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("URL parse error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Llm(format!("HTTP error: {}", err))
    }
}
