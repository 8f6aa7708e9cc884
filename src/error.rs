use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("Invalid sampling rate: {0} (must be a positive, finite number)")]
    InvalidSampleRate(f64),

    #[error("Trigger '{0}' is missing from the trigger table")]
    MissingTrigger(String),

    #[error("Trigger '{0}' is defined more than once")]
    DuplicateTriggerName(String),

    #[error("Trigger code {code} is assigned to both '{first}' and '{second}'")]
    DuplicateTriggerCode {
        code: i32,
        first: String,
        second: String,
    },

    #[error("Invalid trigger code for '{name}': {value}")]
    InvalidTriggerCode { name: String, value: String },

    #[error("Invalid trigger table format at line {line}: {message}")]
    InvalidFormat { line: usize, message: String },

    #[error("Stim channel not found: {0}")]
    ChannelNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnnotationError>;
