//! Error Handling
//!
//! Unified error types for the interview engine.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;
use worldforge_llm::LlmError;

use crate::services::world::GeneratorError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(String),

    /// SQLite errors (auto-converted from rusqlite::Error)
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Configuration file errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No active interview, unknown world, ...
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Uniqueness conflicts
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Text-generation client failures
    #[error("Upstream error: {0}")]
    Upstream(#[from] LlmError),

    /// Model output that could not be parsed into the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Procedural generator failures on an explicit regenerate
    #[error("Generation error: {0}")]
    Generation(#[from] GeneratorError),

    /// Extracted world configuration failed required/enum checks
    #[error("World configuration invalid: {}", .0.join("; "))]
    ConfigurationInvalid(Vec<String>),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the failure came from the text-generation service or its output.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_) | Self::Parse(_))
    }
}

/// Convert AppError to a string suitable for transport responses
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
