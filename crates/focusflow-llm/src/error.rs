//! Error types for AI provider calls.
//!
//! Callers treat every variant the same way — fall back to deterministic
//! generation — but the variants keep log lines informative.

use thiserror::Error;

/// Alias for `Result<T, LlmError>`.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors from the AI provider pipeline.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No provider credential is configured; fallback mode is active.
    #[error("no ai provider configured")]
    NotConfigured,

    /// The HTTP request to the provider failed (network, timeout, non-2xx).
    #[error("provider request failed: {reason}")]
    RequestFailed { reason: String },

    /// The provider responded, but the body could not be interpreted.
    #[error("provider response parse error: {reason}")]
    ParseFailed { reason: String },

    /// The provider returned a well-formed but empty completion.
    #[error("provider returned an empty completion")]
    EmptyResponse,

    /// AI-produced schedule output violated a schedule invariant.
    #[error("invalid ai schedule: {reason}")]
    InvalidSchedule { reason: String },
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseFailed {
            reason: err.to_string(),
        }
    }
}
