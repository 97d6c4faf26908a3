//! Error types for the evaluator.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom error.
pub type Result<T> = std::result::Result<T, EvaluatorError>;

/// Errors that can occur while generating or exporting a benchmark report.
#[derive(Error, Debug)]
pub enum EvaluatorError {
    /// Error reading or writing files.
    #[error("I/O error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// LLM API error.
    #[error("LLM API error: {0}")]
    LlmApi(String),

    /// LLM response parsing error.
    #[error("Failed to parse LLM response: {0}")]
    LlmParse(String),

    /// The model reply did not match the declared output schema.
    #[error("Model output does not match schema '{prompt}': {reason}")]
    SchemaMismatch { prompt: &'static str, reason: String },

    /// HTTP request error.
    #[error("HTTP request failed: {0}")]
    Http(String),
}

impl EvaluatorError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for EvaluatorError {
    fn from(err: reqwest::Error) -> Self {
        EvaluatorError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for EvaluatorError {
    fn from(err: serde_json::Error) -> Self {
        EvaluatorError::LlmParse(err.to_string())
    }
}
