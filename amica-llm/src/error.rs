//! Error types for amica-llm

use amica_core::Error as CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LanguageError {
    #[error("API key not set (expected in {0})")]
    MissingApiKey(String),

    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Authentication failed")]
    AuthenticationFailed,
}

pub type Result<T> = std::result::Result<T, LanguageError>;

impl From<LanguageError> for CoreError {
    fn from(err: LanguageError) -> Self {
        CoreError::Language(err.to_string())
    }
}
