//! Error types for health insights

use thiserror::Error;

/// Errors that can occur while parsing input or computing insights
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("Failed to parse input: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Date parse error: {0}")]
    DateParseError(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Invalid health entry: {0}")]
    InvalidEntry(String),

    #[error("Invalid simulation scenario: {0}")]
    InvalidScenario(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
