//! Error types for amica-voice

use amica_core::Error as CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<VoiceError> for CoreError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::Capture(msg) => CoreError::Hearing(msg),
            other => CoreError::Speech(other.to_string()),
        }
    }
}
