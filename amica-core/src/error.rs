//! Error types shared across the amica workspace

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Perception error: {0}")]
    Perception(String),

    #[error("Hearing error: {0}")]
    Hearing(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("Language error: {0}")]
    Language(String),

    #[error("Identity registry error: {0}")]
    Registry(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Configuration("bad frame size".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("bad frame size"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }
}
