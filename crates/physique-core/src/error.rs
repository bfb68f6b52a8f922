//! Error types for physique scan analysis.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Mask shape mismatch: expected {expected} values, got {actual}")]
    MaskShape { expected: usize, actual: usize },

    #[error("Unknown pose template: {0}")]
    UnknownTemplate(String),

    #[error("Invalid pose template {id}: joint {joint} has no {missing}")]
    InvalidTemplate {
        id: String,
        joint: String,
        missing: &'static str,
    },

    #[error("No person detected")]
    NoPoseDetected,

    #[error("Insufficient landmarks: {0}")]
    InsufficientLandmarks(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::Config(e.to_string())
    }
}
